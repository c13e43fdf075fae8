use crate::graph::BamObject;
use crate::reader::{BamReader, PointerResolver};
use crate::type_tag::TypeTag;
use crate::writer::BamWriter;
use anyhow::Result;
use bam_types::datagram::{Datagram, DatagramIterator};

/// The capability of every object that can live in a bam stream.
pub trait Writable {
    fn type_tag(&self) -> TypeTag;

    /// Appends the body (everything after the record header) to `dg`.
    ///
    /// Pointer fields must go through [`BamWriter::write_pointer`] or [`BamWriter::write_object`]
    /// with the kind the reader will resolve them as; version-conditional fields must go through
    /// [`BamWriter::is_enabled`].
    fn write_datagram(&self, manager: &mut BamWriter<'_>, dg: &mut Datagram) -> Result<()>;

    /// Replaces the file indices held by pointer fields with resolved [`crate::ObjectId`]s.
    fn complete_pointers(&mut self, resolver: &PointerResolver) -> Result<()>;
}

/// A concrete variant that can be registered in a [`crate::TypeRegistry`].
pub trait BamType: Writable + Sized {
    /// Reads a body written by [`Writable::write_datagram`].
    ///
    /// Pointer fields hold file indices until [`Writable::complete_pointers`] runs.
    fn read_datagram(
        tag: TypeTag,
        scan: &mut DatagramIterator<'_>,
        manager: &BamReader<'_>,
    ) -> Result<Self>;

    fn from_object(obj: &BamObject) -> Option<&Self>;

    fn into_object(self) -> BamObject;
}
