//! Binary writing primitives.
//!
//! Output is accumulated in memory and only handed to the filesystem once
//! complete, so a failed encode never produces a partial buffer.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use encoding_rs::WINDOWS_1252;
use glam::{Vec2, Vec3};

use crate::error::{Result, TsoError};

pub(crate) struct BinaryWriter {
    buf: Vec<u8>,
}

impl BinaryWriter {
    pub(crate) fn new() -> BinaryWriter {
        BinaryWriter { buf: Vec::new() }
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub(crate) fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub(crate) fn write_i8(&mut self, value: i8) {
        self.buf.push(value as u8);
    }

    pub(crate) fn write_u16_be(&mut self, value: u16) {
        let mut bytes = [0_u8; 2];
        BigEndian::write_u16(&mut bytes, value);
        self.buf.extend_from_slice(&bytes);
    }

    pub(crate) fn write_u32_be(&mut self, value: u32) {
        let mut bytes = [0_u8; 4];
        BigEndian::write_u32(&mut bytes, value);
        self.buf.extend_from_slice(&bytes);
    }

    pub(crate) fn write_i32_be(&mut self, value: i32) {
        let mut bytes = [0_u8; 4];
        BigEndian::write_i32(&mut bytes, value);
        self.buf.extend_from_slice(&bytes);
    }

    pub(crate) fn write_f32_le(&mut self, value: f32) {
        let mut bytes = [0_u8; 4];
        LittleEndian::write_f32(&mut bytes, value);
        self.buf.extend_from_slice(&bytes);
    }

    pub(crate) fn write_vec3_le(&mut self, value: Vec3) {
        self.write_f32_le(value.x);
        self.write_f32_le(value.y);
        self.write_f32_le(value.z);
    }

    pub(crate) fn write_vec2_le(&mut self, value: Vec2) {
        self.write_f32_le(value.x);
        self.write_f32_le(value.y);
    }

    pub(crate) fn write_quat_raw_le(&mut self, raw: [f32; 4]) {
        for component in raw {
            self.write_f32_le(component);
        }
    }

    fn encode_1252(text: &str) -> Result<Vec<u8>> {
        let (bytes, _, had_unmappable) = WINDOWS_1252.encode(text);
        if had_unmappable {
            return Err(TsoError::Encoding(format!(
                "\"{text}\" contains characters outside Windows-1252"
            )));
        }
        Ok(bytes.into_owned())
    }

    /// Pascal string with an 8-bit length prefix.
    pub(crate) fn write_string(&mut self, text: &str) -> Result<()> {
        let bytes = Self::encode_1252(text)?;
        if bytes.len() > u8::MAX as usize {
            return Err(TsoError::Encoding(format!(
                "string of {} bytes overflows the 8-bit length prefix",
                bytes.len()
            )));
        }
        self.write_u8(bytes.len() as u8);
        self.write_bytes(&bytes);
        Ok(())
    }

    /// Pascal string with a 16-bit big-endian length prefix.
    pub(crate) fn write_string_16_be(&mut self, text: &str) -> Result<()> {
        let bytes = Self::encode_1252(text)?;
        if bytes.len() > u16::MAX as usize {
            return Err(TsoError::Encoding(format!(
                "string of {} bytes overflows the 16-bit length prefix",
                bytes.len()
            )));
        }
        self.write_u16_be(bytes.len() as u16);
        self.write_bytes(&bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary_reader::BinaryReader;

    #[test]
    fn string_round_trip() {
        let mut writer = BinaryWriter::new();
        writer.write_string("b\u{e9}\u{df}t").unwrap();
        let bytes = writer.into_bytes();
        let mut reader = BinaryReader::new(&bytes);
        assert_eq!(reader.read_string().unwrap(), "b\u{e9}\u{df}t");
        reader.expect_end("test").unwrap();
    }

    #[test]
    fn string_16_round_trip() {
        let long = "x".repeat(300);
        let mut writer = BinaryWriter::new();
        writer.write_string_16_be(&long).unwrap();
        let bytes = writer.into_bytes();
        let mut reader = BinaryReader::new(&bytes);
        assert_eq!(reader.read_string_16_be().unwrap(), long);
    }

    #[test]
    fn oversized_string_fails() {
        let mut writer = BinaryWriter::new();
        let err = writer.write_string(&"x".repeat(256)).unwrap_err();
        assert!(matches!(err, TsoError::Encoding(_)));
    }

    #[test]
    fn unmappable_string_fails() {
        let mut writer = BinaryWriter::new();
        let err = writer.write_string("\u{3042}").unwrap_err();
        assert!(matches!(err, TsoError::Encoding(_)));
    }

    #[test]
    fn integers_are_big_endian() {
        let mut writer = BinaryWriter::new();
        writer.write_u32_be(0x0102_0304);
        writer.write_u16_be(0x0506);
        assert_eq!(writer.into_bytes(), [1, 2, 3, 4, 5, 6]);
    }
}
