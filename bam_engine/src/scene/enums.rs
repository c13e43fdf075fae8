//! Enumerations written as one byte.

use anyhow::{anyhow, Result};
use bam_types::datagram::DatagramIterator;
use bam_types::error::BamError;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::any;

pub(crate) fn get_u8_enum<T: FromPrimitive>(scan: &mut DatagramIterator<'_>) -> Result<T> {
    let int = scan.get_u8()?;
    T::from_u8(int).ok_or_else(|| {
        anyhow!(BamError::malformed(format!(
            "Unknown {} {}",
            any::type_name::<T>(),
            int
        )))
    })
}

pub(crate) fn get_i8_enum<T: FromPrimitive>(scan: &mut DatagramIterator<'_>) -> Result<T> {
    let int = scan.get_i8()?;
    T::from_i8(int).ok_or_else(|| {
        anyhow!(BamError::malformed(format!(
            "Unknown {} {}",
            any::type_name::<T>(),
            int
        )))
    })
}

#[repr(u8)]
#[derive(PartialEq, Eq, Hash, Clone, Copy, FromPrimitive, Debug)]
pub enum UsageHint {
    Client = 0,
    Stream = 1,
    Dynamic = 2,
    Static = 3,
    Unspecified = 4,
}

#[repr(u8)]
#[derive(PartialEq, Eq, Hash, Clone, Copy, FromPrimitive, Debug)]
pub enum NumericType {
    Uint8 = 0,
    Uint16 = 1,
    Uint32 = 2,
    PackedDcba = 3,
    PackedDabc = 4,
    Float32 = 5,
    Float64 = 6,
    Stdfloat = 7,
    Int8 = 8,
    Int16 = 9,
    Int32 = 10,
}
impl NumericType {
    /// Bytes of one component.
    pub fn component_bytes(&self) -> u16 {
        match self {
            Self::Uint8 | Self::Int8 => 1,
            Self::Uint16 | Self::Int16 => 2,
            Self::Uint32
            | Self::Int32
            | Self::PackedDcba
            | Self::PackedDabc
            | Self::Float32
            | Self::Stdfloat => 4,
            Self::Float64 => 8,
        }
    }

    /// Whether vertex indices may be stored in this type.
    pub fn is_index_type(&self) -> bool {
        matches!(self, Self::Uint8 | Self::Uint16 | Self::Uint32)
    }
}

#[repr(u8)]
#[derive(PartialEq, Eq, Hash, Clone, Copy, FromPrimitive, Debug)]
pub enum Contents {
    Other = 0,
    Point = 1,
    ClipPoint = 2,
    Vector = 3,
    Texcoord = 4,
    Color = 5,
    Index = 6,
    MorphDelta = 7,
    Matrix = 8,
    Normal = 9,
}

#[repr(u8)]
#[derive(PartialEq, Eq, Hash, Clone, Copy, FromPrimitive, Debug)]
pub enum ShadeModel {
    Uniform = 0,
    Smooth = 1,
    FlatFirstVertex = 2,
    FlatLastVertex = 3,
}

#[repr(u8)]
#[derive(PartialEq, Eq, Hash, Clone, Copy, FromPrimitive, Debug)]
pub enum PrimitiveType {
    None = 0,
    Polygons = 1,
    Lines = 2,
    Points = 3,
    Patches = 4,
}

#[repr(u8)]
#[derive(PartialEq, Eq, Hash, Clone, Copy, FromPrimitive, Debug)]
pub enum BoundsType {
    Default = 0,
    Best = 1,
    Sphere = 2,
    Box = 3,
    Fastest = 4,
}

#[repr(u8)]
#[derive(PartialEq, Eq, Hash, Clone, Copy, FromPrimitive, Debug)]
pub enum PreserveTransform {
    None = 0,
    Local = 1,
    Net = 2,
    DropNode = 3,
    NoTouch = 4,
}

#[repr(i8)]
#[derive(PartialEq, Eq, Hash, Clone, Copy, FromPrimitive, Debug)]
pub enum TransparencyMode {
    None = 0,
    Alpha = 1,
    NotUsed = 2,
    Multisample = 3,
    MultisampleMask = 4,
    Binary = 5,
    Dual = 6,
}

#[repr(u8)]
#[derive(PartialEq, Eq, Hash, Clone, Copy, FromPrimitive, Debug)]
pub enum AnimationType {
    None = 0,
    Panda = 1,
    Hardware = 2,
}

#[repr(u8)]
#[derive(PartialEq, Eq, Hash, Clone, Copy, FromPrimitive, Debug)]
pub enum WrapMode {
    Clamp = 0,
    Repeat = 1,
    Mirror = 2,
    MirrorOnce = 3,
    BorderColor = 4,
}

#[repr(u8)]
#[derive(PartialEq, Eq, Hash, Clone, Copy, FromPrimitive, Debug)]
pub enum FilterType {
    Nearest = 0,
    Linear = 1,
    NearestMipmapNearest = 2,
    LinearMipmapNearest = 3,
    NearestMipmapLinear = 4,
    LinearMipmapLinear = 5,
    Shadow = 6,
    Default = 7,
}

#[repr(u8)]
#[derive(PartialEq, Eq, Hash, Clone, Copy, FromPrimitive, Debug)]
pub enum TextureStageMode {
    Modulate = 0,
    Add = 1,
    Decal = 2,
    Blend = 3,
    Replace = 4,
    Combine = 5,
    BlendColorScale = 6,
    ModulateGlow = 7,
    ModulateGloss = 8,
    Normal = 9,
    NormalHeight = 10,
    Glow = 11,
    Gloss = 12,
    Height = 13,
    Selector = 14,
    NormalGloss = 15,
    Emission = 16,
}
