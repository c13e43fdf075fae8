//! # Stream layout
//!
//! All integers are little-endian.
//!
//! ```text
//! struct BamStream {
//!     magic:          [u8; 6],                // b"pbj\0\n\r"
//!     major:          u16,
//!     minor:          u16,
//!     roots_count:    u16,
//!     roots:          [u32; roots_count],     // object indices
//!     objects_count:  u32,
//!     records:        [Record; objects_count],
//!     // Record i holds the object of index i + 1. Index 0 is the null pointer.
//! }
//! ```
//!
//! See [`crate::registry::TypeRegistry`] for the layout of `Record`.

use anyhow::{anyhow, Result};
use bam_types::datagram::{Datagram, DatagramIterator};
use bam_types::error::BamError;
use bam_types::version::BamVersion;

pub const MAGIC: &[u8; 6] = b"pbj\0\n\r";

pub fn write_header(dg: &mut Datagram, version: BamVersion) {
    dg.append_data(MAGIC);
    dg.add_u16(version.major);
    dg.add_u16(version.minor);
}

/// Reads the magic and the version. The version must be supported.
pub fn read_header(scan: &mut DatagramIterator<'_>) -> Result<BamVersion> {
    let magic = scan.get_bytes(MAGIC.len())?;
    if magic != MAGIC {
        return Err(anyhow!(BamError::malformed(format!(
            "Not a bam stream; magic is {:?}",
            magic
        ))));
    }
    let major = scan.get_u16()?;
    let minor = scan.get_u16()?;
    let version = BamVersion::new(major, minor);
    version.check_supported()?;
    Ok(version)
}
