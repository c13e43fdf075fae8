use crate::graph::{BamObject, ObjectId, ObjectKind};
use crate::reader::{BamReader, PointerResolver};
use crate::type_tag::TypeTag;
use crate::writable::{BamType, Writable};
use crate::writer::BamWriter;
use anyhow::{anyhow, Result};
use bam_types::datagram::{Datagram, DatagramIterator};
use bam_types::error::BamError;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct AttribEntry {
    pub attrib: ObjectId,
    pub override_priority: i32,
}

/// A set of render attributes.
#[derive(Default, Clone, PartialEq, Debug)]
pub struct RenderState {
    pub(crate) attribs: Vec<AttribEntry>,
}

impl RenderState {
    pub fn attribs(&self) -> &[AttribEntry] {
        &self.attribs
    }
}

impl Writable for RenderState {
    fn type_tag(&self) -> TypeTag {
        TypeTag::RenderState
    }

    fn write_datagram(&self, manager: &mut BamWriter<'_>, dg: &mut Datagram) -> Result<()> {
        dg.add_count_u16("attribs", self.attribs.len())?;
        for entry in self.attribs.iter() {
            manager.write_object(dg, entry.attrib, ObjectKind::RenderAttrib)?;
            dg.add_i32(entry.override_priority);
        }
        Ok(())
    }

    fn complete_pointers(&mut self, resolver: &PointerResolver) -> Result<()> {
        for entry in self.attribs.iter_mut() {
            entry.attrib = resolver.resolve(entry.attrib, ObjectKind::RenderAttrib)?;
        }
        Ok(())
    }
}

impl BamType for RenderState {
    fn read_datagram(
        _tag: TypeTag,
        scan: &mut DatagramIterator<'_>,
        manager: &BamReader<'_>,
    ) -> Result<Self> {
        let attribs_ct = scan.get_u16()?;
        let mut attribs = Vec::with_capacity(attribs_ct as usize);
        for _ in 0..attribs_ct {
            let attrib = manager.read_object(scan, "attrib")?;
            let override_priority = scan.get_i32()?;
            attribs.push(AttribEntry {
                attrib,
                override_priority,
            });
        }
        Ok(Self { attribs })
    }

    fn from_object(obj: &BamObject) -> Option<&Self> {
        match obj {
            BamObject::RenderState(moi) => Some(moi),
            _ => None,
        }
    }

    fn into_object(self) -> BamObject {
        BamObject::RenderState(self)
    }
}

const F_IS_IDENTITY: u32 = 0x0001;
const F_COMPONENTS_GIVEN: u32 = 0x0008;

#[derive(PartialEq, Clone, Copy, Debug)]
pub struct TransformComponents {
    pub pos: [f32; 3],
    pub hpr: [f32; 3],
    pub scale: [f32; 3],
    pub shear: [f32; 3],
}

impl Default for TransformComponents {
    fn default() -> Self {
        Self {
            pos: [0.0; 3],
            hpr: [0.0; 3],
            scale: [1.0; 3],
            shear: [0.0; 3],
        }
    }
}

/// A node's transform relative to its parent.
///
/// ```text
/// flags:          u32,
/// // iff flags has F_COMPONENTS_GIVEN and not F_IS_IDENTITY:
/// pos:            vec3,
/// hpr:            vec3,
/// scale:          vec3,
/// shear:          vec3,
/// ```
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum TransformState {
    Identity,
    Components(TransformComponents),
}

impl Writable for TransformState {
    fn type_tag(&self) -> TypeTag {
        TypeTag::TransformState
    }

    fn write_datagram(&self, _manager: &mut BamWriter<'_>, dg: &mut Datagram) -> Result<()> {
        match self {
            Self::Identity => dg.add_u32(F_IS_IDENTITY),
            Self::Components(comps) => {
                dg.add_u32(F_COMPONENTS_GIVEN);
                dg.add_vec3(comps.pos);
                dg.add_vec3(comps.hpr);
                dg.add_vec3(comps.scale);
                dg.add_vec3(comps.shear);
            }
        }
        Ok(())
    }

    fn complete_pointers(&mut self, _resolver: &PointerResolver) -> Result<()> {
        Ok(())
    }
}

impl BamType for TransformState {
    fn read_datagram(
        _tag: TypeTag,
        scan: &mut DatagramIterator<'_>,
        _manager: &BamReader<'_>,
    ) -> Result<Self> {
        let flags = scan.get_u32()?;
        if flags & F_IS_IDENTITY != 0 {
            return Ok(Self::Identity);
        }
        if flags & F_COMPONENTS_GIVEN == 0 {
            return Err(anyhow!(BamError::malformed(format!(
                "Transform flags {:#x} give neither identity nor components",
                flags
            ))));
        }
        let pos = scan.get_vec3()?;
        let hpr = scan.get_vec3()?;
        let scale = scan.get_vec3()?;
        let shear = scan.get_vec3()?;
        Ok(Self::Components(TransformComponents {
            pos,
            hpr,
            scale,
            shear,
        }))
    }

    fn from_object(obj: &BamObject) -> Option<&Self> {
        match obj {
            BamObject::TransformState(moi) => Some(moi),
            _ => None,
        }
    }

    fn into_object(self) -> BamObject {
        BamObject::TransformState(self)
    }
}

/// Special effects attached to a node. No effect types are modelled; the pointers are kept as is.
#[derive(Default, Clone, PartialEq, Debug)]
pub struct RenderEffects {
    pub effects: Vec<ObjectId>,
}

impl Writable for RenderEffects {
    fn type_tag(&self) -> TypeTag {
        TypeTag::RenderEffects
    }

    fn write_datagram(&self, manager: &mut BamWriter<'_>, dg: &mut Datagram) -> Result<()> {
        dg.add_count_u16("effects", self.effects.len())?;
        for effect in self.effects.iter() {
            manager.write_object_any(dg, *effect)?;
        }
        Ok(())
    }

    fn complete_pointers(&mut self, resolver: &PointerResolver) -> Result<()> {
        for effect in self.effects.iter_mut() {
            *effect = resolver.resolve_any(*effect)?;
        }
        Ok(())
    }
}

impl BamType for RenderEffects {
    fn read_datagram(
        _tag: TypeTag,
        scan: &mut DatagramIterator<'_>,
        manager: &BamReader<'_>,
    ) -> Result<Self> {
        let effects_ct = scan.get_u16()?;
        let mut effects = Vec::with_capacity(effects_ct as usize);
        for _ in 0..effects_ct {
            effects.push(manager.read_object(scan, "effect")?);
        }
        Ok(Self { effects })
    }

    fn from_object(obj: &BamObject) -> Option<&Self> {
        match obj {
            BamObject::RenderEffects(moi) => Some(moi),
            _ => None,
        }
    }

    fn into_object(self) -> BamObject {
        BamObject::RenderEffects(self)
    }
}
