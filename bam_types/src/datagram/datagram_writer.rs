use crate::datagram::{CountU16, CountU32};
use anyhow::Result;
use derive_more::{Deref, From, Into};

#[derive(From, Into, Deref, Default, Clone, PartialEq, Eq, Debug)]
pub struct Datagram {
    buf: Vec<u8>,
}

impl Datagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_u8(&mut self, v: u8) {
        self.buf.push(v);
    }
    pub fn add_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }
    pub fn add_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }
    pub fn add_i8(&mut self, v: i8) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }
    pub fn add_i16(&mut self, v: i16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }
    pub fn add_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }
    pub fn add_bool(&mut self, v: bool) {
        self.buf.push(v as u8);
    }
    pub fn add_stdfloat(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }
    pub fn add_vec3(&mut self, v: [f32; 3]) {
        for component in v {
            self.add_stdfloat(component);
        }
    }
    pub fn add_vec4(&mut self, v: [f32; 4]) {
        for component in v {
            self.add_stdfloat(component);
        }
    }

    /// Writes the length of a collection as a u16.
    pub fn add_count_u16(&mut self, field: &'static str, len: usize) -> Result<()> {
        let count = CountU16::from_len(field, len)?;
        self.add_u16(*count);
        Ok(())
    }
    /// Writes the length of a collection as a u32.
    pub fn add_count_u32(&mut self, field: &'static str, len: usize) -> Result<()> {
        let count = CountU32::from_len(field, len)?;
        self.add_u32(*count);
        Ok(())
    }

    pub fn add_string(&mut self, s: &str) -> Result<()> {
        self.add_count_u16("string length", s.len())?;
        self.buf.extend_from_slice(s.as_bytes());
        Ok(())
    }
    pub fn add_blob(&mut self, blob: &[u8]) -> Result<()> {
        self.add_count_u32("blob length", blob.len())?;
        self.buf.extend_from_slice(blob);
        Ok(())
    }

    /// Appends bytes verbatim, without a length.
    pub fn append_data(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}
