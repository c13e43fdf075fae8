use crate::error::BamError;
use anyhow::{anyhow, Result};
use derive_more::Deref;

#[derive(Deref, Clone, Copy, Debug)]
pub struct CountU16(u16);
impl CountU16 {
    pub fn from_len(field: &'static str, len: usize) -> Result<Self> {
        let int = u16::try_from(len).map_err(|_| range_err(field, len, u16::MAX as u64))?;
        Ok(Self(int))
    }
}

#[derive(Deref, Clone, Copy, Debug)]
pub struct CountU32(u32);
impl CountU32 {
    pub fn from_len(field: &'static str, len: usize) -> Result<Self> {
        let int = u32::try_from(len).map_err(|_| range_err(field, len, u32::MAX as u64))?;
        Ok(Self(int))
    }
}

fn range_err(field: &'static str, len: usize, max: u64) -> anyhow::Error {
    anyhow!(BamError::Range {
        field,
        value: len as u64,
        max,
    })
}
