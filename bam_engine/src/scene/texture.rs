use crate::graph::BamObject;
use crate::reader::{BamReader, PointerResolver};
use crate::scene::enums::{get_u8_enum, TextureStageMode};
use crate::type_tag::TypeTag;
use crate::writable::{BamType, Writable};
use crate::writer::BamWriter;
use anyhow::Result;
use bam_types::datagram::{Datagram, DatagramIterator};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TextureStage {
    pub name: String,
    pub sort: i32,
    pub priority: i32,
    pub mode: TextureStageMode,
}

impl TextureStage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sort: 0,
            priority: 0,
            mode: TextureStageMode::Modulate,
        }
    }
}

impl Writable for TextureStage {
    fn type_tag(&self) -> TypeTag {
        TypeTag::TextureStage
    }

    fn write_datagram(&self, _manager: &mut BamWriter<'_>, dg: &mut Datagram) -> Result<()> {
        dg.add_string(&self.name)?;
        dg.add_i32(self.sort);
        dg.add_i32(self.priority);
        dg.add_u8(self.mode as u8);
        Ok(())
    }

    fn complete_pointers(&mut self, _resolver: &PointerResolver) -> Result<()> {
        Ok(())
    }
}

impl BamType for TextureStage {
    fn read_datagram(
        _tag: TypeTag,
        scan: &mut DatagramIterator<'_>,
        _manager: &BamReader<'_>,
    ) -> Result<Self> {
        Ok(Self {
            name: scan.get_string()?,
            sort: scan.get_i32()?,
            priority: scan.get_i32()?,
            mode: get_u8_enum(scan)?,
        })
    }

    fn from_object(obj: &BamObject) -> Option<&Self> {
        match obj {
            BamObject::TextureStage(moi) => Some(moi),
            _ => None,
        }
    }

    fn into_object(self) -> BamObject {
        BamObject::TextureStage(self)
    }
}

/// A texture by reference to its image file. Image data is never embedded.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Texture {
    pub name: String,
    pub filename: String,
}

impl Writable for Texture {
    fn type_tag(&self) -> TypeTag {
        TypeTag::Texture
    }

    fn write_datagram(&self, _manager: &mut BamWriter<'_>, dg: &mut Datagram) -> Result<()> {
        dg.add_string(&self.name)?;
        dg.add_string(&self.filename)?;
        Ok(())
    }

    fn complete_pointers(&mut self, _resolver: &PointerResolver) -> Result<()> {
        Ok(())
    }
}

impl BamType for Texture {
    fn read_datagram(
        _tag: TypeTag,
        scan: &mut DatagramIterator<'_>,
        _manager: &BamReader<'_>,
    ) -> Result<Self> {
        let name = scan.get_string()?;
        let filename = scan.get_string()?;
        Ok(Self { name, filename })
    }

    fn from_object(obj: &BamObject) -> Option<&Self> {
        match obj {
            BamObject::Texture(moi) => Some(moi),
            _ => None,
        }
    }

    fn into_object(self) -> BamObject {
        BamObject::Texture(self)
    }
}
