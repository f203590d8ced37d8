//! Concrete Kenwood-HF model initializers.
//!
//! Each submodule wires a model's capability bitmaps and transport
//! defaults onto the generic engine in [`crate::session`]; the engine
//! itself has no model-specific knowledge.

pub mod ts940s;
