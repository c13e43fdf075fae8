use crate::graph::{BamObject, ObjectId, ObjectKind};
use crate::reader::{BamReader, PointerResolver};
use crate::scene::enums::{get_i8_enum, get_u8_enum, FilterType, TransparencyMode, WrapMode};
use crate::type_tag::TypeTag;
use crate::writable::{BamType, Writable};
use crate::writer::BamWriter;
use anyhow::{anyhow, Result};
use bam_types::datagram::{Datagram, DatagramIterator};
use bam_types::error::BamError;
use bam_types::version::Feature;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct TransparencyAttrib {
    pub mode: TransparencyMode,
}

impl Writable for TransparencyAttrib {
    fn type_tag(&self) -> TypeTag {
        TypeTag::TransparencyAttrib
    }

    fn write_datagram(&self, _manager: &mut BamWriter<'_>, dg: &mut Datagram) -> Result<()> {
        dg.add_i8(self.mode as i8);
        Ok(())
    }

    fn complete_pointers(&mut self, _resolver: &PointerResolver) -> Result<()> {
        Ok(())
    }
}

impl BamType for TransparencyAttrib {
    fn read_datagram(
        _tag: TypeTag,
        scan: &mut DatagramIterator<'_>,
        _manager: &BamReader<'_>,
    ) -> Result<Self> {
        let mode = get_i8_enum(scan)?;
        Ok(Self { mode })
    }

    fn from_object(obj: &BamObject) -> Option<&Self> {
        match obj {
            BamObject::TransparencyAttrib(moi) => Some(moi),
            _ => None,
        }
    }

    fn into_object(self) -> BamObject {
        BamObject::TransparencyAttrib(self)
    }
}

/// Texture sampling parameters, written inline inside a [`TextureAttrib`] record.
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct SamplerState {
    pub wrap_u: WrapMode,
    pub wrap_v: WrapMode,
    pub wrap_w: WrapMode,
    pub min_filter: FilterType,
    pub mag_filter: FilterType,
    pub anisotropic_degree: i16,
    pub border_color: [f32; 4],
    pub min_lod: f32,
    pub max_lod: f32,
    pub lod_bias: f32,
}

impl Default for SamplerState {
    fn default() -> Self {
        Self {
            wrap_u: WrapMode::Repeat,
            wrap_v: WrapMode::Repeat,
            wrap_w: WrapMode::Repeat,
            min_filter: FilterType::Default,
            mag_filter: FilterType::Default,
            anisotropic_degree: 0,
            border_color: [0.0, 0.0, 0.0, 1.0],
            min_lod: -1000.0,
            max_lod: 1000.0,
            lod_bias: 0.0,
        }
    }
}

impl SamplerState {
    fn write_inline(&self, dg: &mut Datagram) {
        dg.add_u8(self.wrap_u as u8);
        dg.add_u8(self.wrap_v as u8);
        dg.add_u8(self.wrap_w as u8);
        dg.add_u8(self.min_filter as u8);
        dg.add_u8(self.mag_filter as u8);
        dg.add_i16(self.anisotropic_degree);
        dg.add_vec4(self.border_color);
        dg.add_stdfloat(self.min_lod);
        dg.add_stdfloat(self.max_lod);
        dg.add_stdfloat(self.lod_bias);
    }

    fn read_inline(scan: &mut DatagramIterator<'_>) -> Result<Self> {
        Ok(Self {
            wrap_u: get_u8_enum(scan)?,
            wrap_v: get_u8_enum(scan)?,
            wrap_w: get_u8_enum(scan)?,
            min_filter: get_u8_enum(scan)?,
            mag_filter: get_u8_enum(scan)?,
            anisotropic_degree: scan.get_i16()?,
            border_color: scan.get_vec4()?,
            min_lod: scan.get_stdfloat()?,
            max_lod: scan.get_stdfloat()?,
            lod_bias: scan.get_stdfloat()?,
        })
    }
}

/// One stage turned on by a [`TextureAttrib`].
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct StageNode {
    pub stage: ObjectId,
    pub texture: ObjectId,
    pub implicit_sort: u16,
    pub override_priority: i32,
    pub sampler: Option<SamplerState>,
}

impl StageNode {
    pub fn new(stage: ObjectId, texture: ObjectId, implicit_sort: u16) -> Self {
        Self {
            stage,
            texture,
            implicit_sort,
            override_priority: 0,
            sampler: None,
        }
    }
}

/// Turns texture stages on or off.
///
/// ```text
/// off_all_stages: bool,
/// off_stages:     u16 count + stage ptr*,
/// on_stages:      u16 count + StageNode*,
///
/// struct StageNode {
///     stage:              ptr,
///     texture:            ptr,
///     implicit_sort:      u16,                // TextureStageImplicitSort
///     override_priority:  i32,                // TextureStageOverride
///     has_sampler:        bool,               // TextureStageSampler
///     sampler:            SamplerState,       // iff has_sampler
/// }
/// ```
///
/// When an older stream lacks `implicit_sort`, a stage's position in `on_stages` takes its place.
#[derive(Default, Clone, PartialEq, Debug)]
pub struct TextureAttrib {
    pub off_all_stages: bool,
    pub off_stages: Vec<ObjectId>,
    pub on_stages: Vec<StageNode>,
}

impl TextureAttrib {
    /// Turns `stage` on with `texture`, sorted after every stage already on.
    pub fn add_on_stage(&mut self, stage: ObjectId, texture: ObjectId) -> Result<&mut StageNode> {
        let implicit_sort = u16::try_from(self.on_stages.len()).map_err(|_| {
            anyhow!(BamError::Range {
                field: "on_stages",
                value: self.on_stages.len() as u64 + 1,
                max: u16::MAX as u64,
            })
        })?;
        self.on_stages
            .push(StageNode::new(stage, texture, implicit_sort));
        let last_i = self.on_stages.len() - 1;
        Ok(&mut self.on_stages[last_i])
    }
}

impl Writable for TextureAttrib {
    fn type_tag(&self) -> TypeTag {
        TypeTag::TextureAttrib
    }

    fn write_datagram(&self, manager: &mut BamWriter<'_>, dg: &mut Datagram) -> Result<()> {
        dg.add_bool(self.off_all_stages);

        dg.add_count_u16("off_stages", self.off_stages.len())?;
        for stage in self.off_stages.iter() {
            manager.write_object(dg, *stage, ObjectKind::TextureStage)?;
        }

        dg.add_count_u16("on_stages", self.on_stages.len())?;
        for stage_node in self.on_stages.iter() {
            manager.write_object(dg, stage_node.stage, ObjectKind::TextureStage)?;
            manager.write_object(dg, stage_node.texture, ObjectKind::Texture)?;
            if manager.is_enabled(Feature::TextureStageImplicitSort) {
                dg.add_u16(stage_node.implicit_sort);
            }
            if manager.is_enabled(Feature::TextureStageOverride) {
                dg.add_i32(stage_node.override_priority);
            }
            if manager.is_enabled(Feature::TextureStageSampler) {
                match &stage_node.sampler {
                    None => dg.add_bool(false),
                    Some(sampler) => {
                        dg.add_bool(true);
                        sampler.write_inline(dg);
                    }
                }
            }
        }
        Ok(())
    }

    fn complete_pointers(&mut self, resolver: &PointerResolver) -> Result<()> {
        resolver.resolve_all(&mut self.off_stages, ObjectKind::TextureStage)?;
        for stage_node in self.on_stages.iter_mut() {
            stage_node.stage = resolver.resolve(stage_node.stage, ObjectKind::TextureStage)?;
            stage_node.texture = resolver.resolve(stage_node.texture, ObjectKind::Texture)?;
        }
        Ok(())
    }
}

impl BamType for TextureAttrib {
    fn read_datagram(
        _tag: TypeTag,
        scan: &mut DatagramIterator<'_>,
        manager: &BamReader<'_>,
    ) -> Result<Self> {
        let off_all_stages = scan.get_bool()?;

        let off_ct = scan.get_u16()?;
        let mut off_stages = Vec::with_capacity(off_ct as usize);
        for _ in 0..off_ct {
            off_stages.push(manager.read_object(scan, "off stage")?);
        }

        let on_ct = scan.get_u16()?;
        let mut on_stages = Vec::with_capacity(on_ct as usize);
        for stage_i in 0..on_ct {
            let stage = manager.read_object(scan, "on stage")?;
            let texture = manager.read_object(scan, "on stage texture")?;
            let implicit_sort = if manager.is_enabled(Feature::TextureStageImplicitSort) {
                scan.get_u16()?
            } else {
                stage_i
            };
            let override_priority = if manager.is_enabled(Feature::TextureStageOverride) {
                scan.get_i32()?
            } else {
                0
            };
            let sampler = if manager.is_enabled(Feature::TextureStageSampler) && scan.get_bool()? {
                Some(SamplerState::read_inline(scan)?)
            } else {
                None
            };
            on_stages.push(StageNode {
                stage,
                texture,
                implicit_sort,
                override_priority,
                sampler,
            });
        }

        Ok(Self {
            off_all_stages,
            off_stages,
            on_stages,
        })
    }

    fn from_object(obj: &BamObject) -> Option<&Self> {
        match obj {
            BamObject::TextureAttrib(moi) => Some(moi),
            _ => None,
        }
    }

    fn into_object(self) -> BamObject {
        BamObject::TextureAttrib(self)
    }
}
