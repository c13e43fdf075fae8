use crate::version::BamVersion;
use anyhow::{Context, Result};
use std::env;

/// Overrides the target version of write sessions, as `"major.minor"`.
pub const ENV_VAR_BAM_VERSION: &str = "PANDA_BAM_VERSION";

/// The target version named by [`ENV_VAR_BAM_VERSION`], or [`BamVersion::CURRENT`] if it is unset.
pub fn target_version_from_env() -> Result<BamVersion> {
    match env::var(ENV_VAR_BAM_VERSION) {
        Err(_) => Ok(BamVersion::CURRENT),
        Ok(s) => parse_target_version(&s),
    }
}

pub fn parse_target_version(s: &str) -> Result<BamVersion> {
    let ver = s
        .parse::<BamVersion>()
        .with_context(|| format!("Invalid {} value {:?}", ENV_VAR_BAM_VERSION, s))?;
    ver.check_supported()?;
    Ok(ver)
}
