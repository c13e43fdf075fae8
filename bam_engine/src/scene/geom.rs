use crate::graph::{BamObject, ObjectId, ObjectKind};
use crate::reader::{BamReader, PointerResolver};
use crate::scene::enums::{get_u8_enum, BoundsType, PrimitiveType, ShadeModel};
use crate::type_tag::TypeTag;
use crate::writable::{BamType, Writable};
use crate::writer::BamWriter;
use anyhow::Result;
use bam_types::datagram::{Datagram, DatagramIterator};
use bam_types::version::Feature;

/// A set of primitives that all draw from one [`crate::scene::GeomVertexData`].
///
/// Every primitive's [`crate::scene::PrimitiveKind::primitive_type`] equals `primitive_type`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Geom {
    pub(crate) data: ObjectId,
    pub(crate) primitives: Vec<ObjectId>,
    pub(crate) primitive_type: PrimitiveType,
    pub shade_model: ShadeModel,
    pub bounds_type: BoundsType,
}

impl Geom {
    pub(crate) fn new(data: ObjectId, primitive_type: PrimitiveType) -> Self {
        Self {
            data,
            primitives: vec![],
            primitive_type,
            shade_model: ShadeModel::Smooth,
            bounds_type: BoundsType::Default,
        }
    }

    pub fn data(&self) -> ObjectId {
        self.data
    }
    pub fn primitives(&self) -> &[ObjectId] {
        &self.primitives
    }
    pub fn primitive_type(&self) -> PrimitiveType {
        self.primitive_type
    }
}

impl Writable for Geom {
    fn type_tag(&self) -> TypeTag {
        TypeTag::Geom
    }

    fn write_datagram(&self, manager: &mut BamWriter<'_>, dg: &mut Datagram) -> Result<()> {
        manager.write_object(dg, self.data, ObjectKind::VertexData)?;

        dg.add_count_u16("primitives", self.primitives.len())?;
        for prim in self.primitives.iter() {
            manager.write_object(dg, *prim, ObjectKind::Primitive)?;
        }

        dg.add_u8(self.primitive_type as u8);
        dg.add_u8(self.shade_model as u8);

        /* reserved */
        dg.add_u16(0);

        if manager.is_enabled(Feature::GeomBoundsType) {
            dg.add_u8(self.bounds_type as u8);
        }
        Ok(())
    }

    fn complete_pointers(&mut self, resolver: &PointerResolver) -> Result<()> {
        self.data = resolver.resolve(self.data, ObjectKind::VertexData)?;
        resolver.resolve_all(&mut self.primitives, ObjectKind::Primitive)
    }
}

impl BamType for Geom {
    fn read_datagram(
        _tag: TypeTag,
        scan: &mut DatagramIterator<'_>,
        manager: &BamReader<'_>,
    ) -> Result<Self> {
        let data = manager.read_object(scan, "geom vertex data")?;

        let prims_ct = scan.get_u16()?;
        let mut primitives = Vec::with_capacity(prims_ct as usize);
        for _ in 0..prims_ct {
            primitives.push(manager.read_object(scan, "primitive")?);
        }

        let primitive_type = get_u8_enum(scan)?;
        let shade_model = get_u8_enum(scan)?;

        /* reserved */
        scan.get_u16()?;

        let bounds_type = if manager.is_enabled(Feature::GeomBoundsType) {
            get_u8_enum(scan)?
        } else {
            BoundsType::Default
        };

        Ok(Self {
            data,
            primitives,
            primitive_type,
            shade_model,
            bounds_type,
        })
    }

    fn from_object(obj: &BamObject) -> Option<&Self> {
        match obj {
            BamObject::Geom(moi) => Some(moi),
            _ => None,
        }
    }

    fn into_object(self) -> BamObject {
        BamObject::Geom(self)
    }
}
