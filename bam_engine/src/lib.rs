//! Serialization of scene graphs into versioned bam streams.
//!
//! A [`SceneGraph`] owns every object. A write session ([`BamWriter`]) walks it from one or more
//! roots, gives each distinct object an index on first encounter, and writes every object's
//! record exactly once. Pointer fields are written as indices, so shared objects and cycles cost
//! one record each. A read session ([`BamReader`]) allocates one object per record, then resolves
//! the indices.

pub mod bam_file;
pub mod graph;
pub mod reader;
pub mod registry;
pub mod scene;
pub mod stream;
pub mod type_tag;
pub mod writable;
pub mod writer;

pub use bam_file::*;
pub use graph::{BamObject, ObjectId, ObjectKind, SceneGraph};
pub use reader::{BamReadResult, BamReader, PointerResolver};
pub use registry::TypeRegistry;
pub use type_tag::TypeTag;
pub use writable::{BamType, Writable};
pub use writer::BamWriter;
