//! Feature derivation.
//!
//! The same functions serve dataset rows and scoring requests, so the model
//! always sees features built one way.

pub mod derive;

pub use derive::*;
