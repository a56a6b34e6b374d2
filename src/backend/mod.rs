//! Backend command layer
//!
//! The view-models only talk to a backend through the [`PlaylistBackend`]
//! trait. Two implementations ship with the crate: an in-memory one and one
//! persisted to the library XML file.

mod memory;
mod traits;
mod xml;

pub use memory::{Command, MemoryBackend};
pub use traits::{BackendError, BackendResult, PlaylistBackend};
pub use xml::XmlBackend;
