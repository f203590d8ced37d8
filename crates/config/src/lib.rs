//! # Overview
//!
//! The core consumes configuration as an opaque, section-keyed key/value
//! store: [`ConfigSource`]. This crate is the one concrete adapter over
//! that interface, backed by an INI file via the `ini` crate.
//!
//! # Design
//!
//! `ConfigSource` is intentionally narrow — `get_string`, `get_int`,
//! `set_default` — because that is all the core ever needs: per-rig
//! model initializers read their own keys and fill in defaults for
//! anything the operator's file left unset, and nothing above the
//! transport layer assumes the store is persisted back to disk.
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod error;
mod ini_source;

pub use error::ConfigError;
pub use ini_source::IniConfig;

/// A keyed string store with per-section lookups, consumed abstractly by
/// the rig drivers and the daemon's addressing logic.
///
/// The core never assumes this is persisted; `IniConfig` is the only
/// implementation this repository ships, but nothing below this trait
/// cares that it is backed by a file at all.
pub trait ConfigSource {
    /// Looks up `section:key`, falling back to `default` if the section
    /// or key is absent.
    fn get_string(&self, section: &str, key: &str, default: &str) -> String;

    /// Looks up `section:key` as an integer, falling back to `default` if
    /// the key is absent or does not parse.
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;

    /// Sets `section:key` to `default` only if it is not already present.
    ///
    /// Used by model initializers to populate serial-port defaults
    /// (baud, data bits, ...) without clobbering an operator's explicit
    /// choice.
    fn set_default(&mut self, section: &str, key: &str, default: &str);
}
