//! Shared primitive arrays. Like any object, one array referenced from several places is written once.

use crate::graph::BamObject;
use crate::reader::{BamReader, PointerResolver};
use crate::type_tag::TypeTag;
use crate::writable::{BamType, Writable};
use crate::writer::BamWriter;
use anyhow::Result;
use bam_types::datagram::{Datagram, DatagramIterator};
use derive_more::{Deref, DerefMut, From};

#[derive(From, Deref, DerefMut, Default, Clone, PartialEq, Eq, Debug)]
pub struct PtaInt32(pub Vec<i32>);

impl Writable for PtaInt32 {
    fn type_tag(&self) -> TypeTag {
        TypeTag::PtaInt32
    }

    fn write_datagram(&self, _manager: &mut BamWriter<'_>, dg: &mut Datagram) -> Result<()> {
        dg.add_count_u32("pta_int32", self.0.len())?;
        for v in self.0.iter() {
            dg.add_i32(*v);
        }
        Ok(())
    }

    fn complete_pointers(&mut self, _resolver: &PointerResolver) -> Result<()> {
        Ok(())
    }
}

impl BamType for PtaInt32 {
    fn read_datagram(
        _tag: TypeTag,
        scan: &mut DatagramIterator<'_>,
        _manager: &BamReader<'_>,
    ) -> Result<Self> {
        let ct = scan.get_u32()? as usize;
        let mut vals = Vec::with_capacity(ct.min(scan.remaining() / 4));
        for _ in 0..ct {
            vals.push(scan.get_i32()?);
        }
        Ok(Self(vals))
    }

    fn from_object(obj: &BamObject) -> Option<&Self> {
        match obj {
            BamObject::PtaInt32(moi) => Some(moi),
            _ => None,
        }
    }

    fn into_object(self) -> BamObject {
        BamObject::PtaInt32(self)
    }
}

#[derive(From, Deref, DerefMut, Default, Clone, PartialEq, Debug)]
pub struct PtaFloat32(pub Vec<f32>);

impl Writable for PtaFloat32 {
    fn type_tag(&self) -> TypeTag {
        TypeTag::PtaFloat32
    }

    fn write_datagram(&self, _manager: &mut BamWriter<'_>, dg: &mut Datagram) -> Result<()> {
        dg.add_count_u32("pta_float32", self.0.len())?;
        for v in self.0.iter() {
            dg.add_stdfloat(*v);
        }
        Ok(())
    }

    fn complete_pointers(&mut self, _resolver: &PointerResolver) -> Result<()> {
        Ok(())
    }
}

impl BamType for PtaFloat32 {
    fn read_datagram(
        _tag: TypeTag,
        scan: &mut DatagramIterator<'_>,
        _manager: &BamReader<'_>,
    ) -> Result<Self> {
        let ct = scan.get_u32()? as usize;
        let mut vals = Vec::with_capacity(ct.min(scan.remaining() / 4));
        for _ in 0..ct {
            vals.push(scan.get_stdfloat()?);
        }
        Ok(Self(vals))
    }

    fn from_object(obj: &BamObject) -> Option<&Self> {
        match obj {
            BamObject::PtaFloat32(moi) => Some(moi),
            _ => None,
        }
    }

    fn into_object(self) -> BamObject {
        BamObject::PtaFloat32(self)
    }
}
