use crate::graph::BamObject;
use crate::reader::{BamReader, PointerResolver};
use crate::type_tag::TypeTag;
use crate::writable::{BamType, Writable};
use crate::writer::BamWriter;
use anyhow::Result;
use bam_types::datagram::{Datagram, DatagramIterator};

/// A name of a vertex column, such as `vertex` or `texcoord`.
///
/// A [`crate::SceneGraph`] interns these: one object per distinct name.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct InternalName {
    pub name: String,
}

impl Writable for InternalName {
    fn type_tag(&self) -> TypeTag {
        TypeTag::InternalName
    }

    fn write_datagram(&self, _manager: &mut BamWriter<'_>, dg: &mut Datagram) -> Result<()> {
        dg.add_string(&self.name)
    }

    fn complete_pointers(&mut self, _resolver: &PointerResolver) -> Result<()> {
        Ok(())
    }
}

impl BamType for InternalName {
    fn read_datagram(
        _tag: TypeTag,
        scan: &mut DatagramIterator<'_>,
        _manager: &BamReader<'_>,
    ) -> Result<Self> {
        let name = scan.get_string()?;
        Ok(Self { name })
    }

    fn from_object(obj: &BamObject) -> Option<&Self> {
        match obj {
            BamObject::InternalName(moi) => Some(moi),
            _ => None,
        }
    }

    fn into_object(self) -> BamObject {
        BamObject::InternalName(self)
    }
}
