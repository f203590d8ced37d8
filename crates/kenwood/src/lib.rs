//! # Overview
//!
//! A declarative table of the Kenwood-HF command set plus the generic
//! engine that emits and parses frames against it ([`session`]), a
//! capability-gated [`Rig`] wrapping a live session, and concrete model
//! initializers ([`models`]) that wire a model's capability bitmaps onto
//! that engine.
//!
//! # Design
//!
//! Everything above [`command`]/[`param`] is generic across the whole
//! Kenwood-HF family; a model module's only job is to populate
//! `may-set`/`may-read` bitmaps, `supported_modes`/`supported_vfos`
//! masks, and a [`capability::Capabilities`] set, then hand the
//! assembled [`session::KenwoodHfSession`] to [`Rig::KenwoodHf`].
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod capability;
pub mod command;
pub mod framer;
pub mod models;
pub mod param;
pub mod rig;
pub mod session;
pub mod sink;
mod transport_config;

pub use capability::Capabilities;
pub use command::{Command, CommandId};
pub use framer::KenwoodFramer;
pub use param::{ParamId, ParamType, ParamValue};
pub use rig::Rig;
pub use session::KenwoodHfSession;
pub use sink::TracingSink;
pub use transport_config::resolve_serial_config;
