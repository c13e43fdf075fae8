use crate::error::BamError;
use anyhow::{anyhow, Result};

/// A read cursor over the bytes written by a [`crate::datagram::Datagram`].
///
/// Every read checks the remaining length first, so a short input is always reported as
/// [`BamError::TruncatedStream`] and never as a panic.
#[derive(Clone, Debug)]
pub struct DatagramIterator<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> DatagramIterator<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn get_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(anyhow!(BamError::TruncatedStream {
                needed: len,
                remaining: self.remaining(),
                position: self.pos,
            }));
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }
    fn get_array<const LEN: usize>(&mut self) -> Result<[u8; LEN]> {
        let mut arr = [0u8; LEN];
        arr.copy_from_slice(self.get_bytes(LEN)?);
        Ok(arr)
    }

    pub fn get_u8(&mut self) -> Result<u8> {
        Ok(u8::from_le_bytes(self.get_array()?))
    }
    pub fn get_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.get_array()?))
    }
    pub fn get_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.get_array()?))
    }
    pub fn get_i8(&mut self) -> Result<i8> {
        Ok(i8::from_le_bytes(self.get_array()?))
    }
    pub fn get_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.get_array()?))
    }
    pub fn get_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.get_array()?))
    }
    pub fn get_bool(&mut self) -> Result<bool> {
        match self.get_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            int => Err(anyhow!(BamError::malformed(format!(
                "Byte {} at position {} is not a bool",
                int,
                self.pos - 1
            )))),
        }
    }
    pub fn get_stdfloat(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.get_array()?))
    }
    pub fn get_vec3(&mut self) -> Result<[f32; 3]> {
        Ok([
            self.get_stdfloat()?,
            self.get_stdfloat()?,
            self.get_stdfloat()?,
        ])
    }
    pub fn get_vec4(&mut self) -> Result<[f32; 4]> {
        Ok([
            self.get_stdfloat()?,
            self.get_stdfloat()?,
            self.get_stdfloat()?,
            self.get_stdfloat()?,
        ])
    }

    pub fn get_string(&mut self) -> Result<String> {
        let len = self.get_u16()? as usize;
        let start = self.pos;
        let bytes = self.get_bytes(len)?;
        let s = String::from_utf8(bytes.to_vec()).map_err(|_| {
            anyhow!(BamError::malformed(format!(
                "Invalid UTF-8 in string at position {}",
                start
            )))
        })?;
        Ok(s)
    }
    pub fn get_blob(&mut self) -> Result<Vec<u8>> {
        let len = self.get_u32()? as usize;
        let bytes = self.get_bytes(len)?;
        Ok(bytes.to_vec())
    }

    /// Fails unless every byte has been consumed.
    pub fn expect_end(&self, what: &str) -> Result<()> {
        if self.remaining() != 0 {
            return Err(anyhow!(BamError::malformed(format!(
                "{} trailing bytes after {}",
                self.remaining(),
                what
            ))));
        }
        Ok(())
    }
}
