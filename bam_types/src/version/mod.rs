//! # Version policy
//!
//! Every version-conditional field is governed by one row of [`GATES`].
//! A field is present in a body iff the session's target version is at least the row's minimum.
//!
//! Gates are monotonic: once a feature is introduced, every later version carries it.

use crate::error::BamError;
use anyhow::{anyhow, Result};
use derive_more::Display;
use std::str::FromStr;


#[derive(Display, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
#[display(fmt = "{}.{}", major, minor)]
pub struct BamVersion {
    pub major: u16,
    pub minor: u16,
}

impl BamVersion {
    pub const CURRENT: BamVersion = BamVersion::new(6, 45);
    pub const MIN_SUPPORTED: BamVersion = BamVersion::new(6, 14);

    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    pub fn is_supported(&self) -> bool {
        Self::MIN_SUPPORTED <= *self && *self <= Self::CURRENT
    }

    pub fn check_supported(&self) -> Result<()> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(anyhow!(BamError::UnsupportedVersion(*self)))
        }
    }
}

impl FromStr for BamVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (major, minor) = s
            .trim()
            .split_once('.')
            .ok_or_else(|| anyhow!("Expected a \"major.minor\" bam version. Got {:?}.", s))?;
        let major = major.parse::<u16>()?;
        let minor = minor.parse::<u16>()?;
        Ok(Self::new(major, minor))
    }
}

impl From<(u16, u16)> for BamVersion {
    fn from((major, minor): (u16, u16)) -> Self {
        Self::new(major, minor)
    }
}

/// Fields whose presence depends on the target version.
///
/// The discriminant is the row of the feature in [`GATES`].
#[repr(usize)]
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Feature {
    TextureStageImplicitSort = 0,
    NodeBoundsType = 1,
    GeomBoundsType = 2,
    TextureStageOverride = 3,
    VertexColumnAlignment = 4,
    TextureStageSampler = 5,
}

/// `(feature, minimum version)`, ordered by minimum version.
pub const GATES: [(Feature, BamVersion); 6] = [
    (Feature::TextureStageImplicitSort, BamVersion::new(6, 15)),
    (Feature::NodeBoundsType, BamVersion::new(6, 19)),
    (Feature::GeomBoundsType, BamVersion::new(6, 19)),
    (Feature::TextureStageOverride, BamVersion::new(6, 23)),
    (Feature::VertexColumnAlignment, BamVersion::new(6, 29)),
    (Feature::TextureStageSampler, BamVersion::new(6, 36)),
];

pub fn gate(feature: Feature) -> BamVersion {
    GATES[feature as usize].1
}

pub fn is_enabled(feature: Feature, target_version: BamVersion) -> bool {
    target_version >= gate(feature)
}
