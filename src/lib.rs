//! Mirrors a generated aspect definitions directory into a destination directory.
//!
//! The copy is an overlay: files are created or overwritten, nothing already at the
//! destination is ever deleted.

pub mod api;
pub mod config;
pub mod errors;
pub mod locator;
pub mod mirror;
pub mod preview;
pub mod writer;

pub use api::{write_aspects, AspectMirrorError, WriteOptions};
pub use locator::{AspectLocator, ConfiguredLocator};
pub use mirror::{mirror, MirrorError, MirrorSummary, TreeEntry};
pub use writer::{AspectWriter, DefaultAspectWriter, WriterRegistry};
