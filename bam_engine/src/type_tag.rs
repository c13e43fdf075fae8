use anyhow::{anyhow, Result};
use bam_types::error::BamError;
use derive_more::{Deref, Display, From};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

#[derive(From, Deref, Clone, Copy, Debug)]
pub struct TypeTagInt(u16);
impl From<TypeTag> for TypeTagInt {
    fn from(tag: TypeTag) -> Self {
        Self(tag as u16)
    }
}

/// Identifies the concrete type of every record in a stream.
///
/// Discriminants are written to disk. A tag is never reassigned; retired types leave a gap.
#[repr(u16)]
#[derive(
    Display, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, FromPrimitive, Debug,
)]
pub enum TypeTag {
    PandaNode = 1,
    ModelNode = 2,
    ModelRoot = 3,
    LodNode = 4,
    GeomNode = 5,

    RenderState = 10,
    TransformState = 11,
    RenderEffects = 12,

    TransparencyAttrib = 20,
    TextureAttrib = 21,
    TextureStage = 22,
    Texture = 23,

    InternalName = 30,
    GeomVertexArrayFormat = 31,
    GeomVertexFormat = 32,
    GeomVertexArrayData = 33,
    GeomVertexData = 34,
    Geom = 35,

    GeomPoints = 40,
    GeomLines = 41,
    GeomLinestrips = 42,
    GeomTriangles = 43,
    GeomTristrips = 44,
    GeomTrifans = 45,
    GeomPatches = 46,

    PtaInt32 = 50,
    PtaFloat32 = 51,
}
impl TryFrom<TypeTagInt> for TypeTag {
    type Error = anyhow::Error;
    fn try_from(int: TypeTagInt) -> Result<Self> {
        TypeTag::from_u16(int.0).ok_or(anyhow!(BamError::UnknownTypeTag(int.0)))
    }
}
