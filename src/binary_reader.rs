//! Binary reading primitives.
//!
//! The file formats mix endianness field by field: count, index and flag
//! words are big-endian while floating point values are little-endian.
//! Every read therefore names its byte order at the call site.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use encoding_rs::WINDOWS_1252;
use glam::{Vec2, Vec3};

use crate::error::{Result, TsoError};

/// Cursor over a fully buffered input file.
pub(crate) struct BinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> BinaryReader<'a> {
        BinaryReader { data, pos: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize, context: &'static str) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(TsoError::TruncatedInput(context));
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Skip reserved bytes.
    pub(crate) fn skip(&mut self, n: usize, context: &'static str) -> Result<()> {
        self.take(n, context).map(|_| ())
    }

    pub(crate) fn read_u8(&mut self, context: &'static str) -> Result<u8> {
        Ok(self.take(1, context)?[0])
    }

    pub(crate) fn read_i8(&mut self, context: &'static str) -> Result<i8> {
        Ok(self.take(1, context)?[0] as i8)
    }

    pub(crate) fn read_u16_be(&mut self, context: &'static str) -> Result<u16> {
        Ok(BigEndian::read_u16(self.take(2, context)?))
    }

    pub(crate) fn read_u32_be(&mut self, context: &'static str) -> Result<u32> {
        Ok(BigEndian::read_u32(self.take(4, context)?))
    }

    pub(crate) fn read_i32_be(&mut self, context: &'static str) -> Result<i32> {
        Ok(BigEndian::read_i32(self.take(4, context)?))
    }

    pub(crate) fn read_f32_le(&mut self, context: &'static str) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.take(4, context)?))
    }

    /// Three little-endian floats in file component order.
    pub(crate) fn read_vec3_le(&mut self, context: &'static str) -> Result<Vec3> {
        let bytes = self.take(12, context)?;
        Ok(Vec3::new(
            LittleEndian::read_f32(&bytes[0..4]),
            LittleEndian::read_f32(&bytes[4..8]),
            LittleEndian::read_f32(&bytes[8..12]),
        ))
    }

    pub(crate) fn read_vec2_le(&mut self, context: &'static str) -> Result<Vec2> {
        let bytes = self.take(8, context)?;
        Ok(Vec2::new(
            LittleEndian::read_f32(&bytes[0..4]),
            LittleEndian::read_f32(&bytes[4..8]),
        ))
    }

    /// Four little-endian floats, kept in file order (x, y, z, w).
    pub(crate) fn read_quat_raw_le(&mut self, context: &'static str) -> Result<[f32; 4]> {
        let bytes = self.take(16, context)?;
        let mut raw = [0.0_f32; 4];
        LittleEndian::read_f32_into(bytes, &mut raw);
        Ok(raw)
    }

    /// Pascal string with an 8-bit length prefix, Windows-1252 encoded.
    pub(crate) fn read_string(&mut self) -> Result<String> {
        let length = self.read_u8("string length")? as usize;
        let bytes = self.take(length, "string bytes")?;
        let (text, _, _) = WINDOWS_1252.decode(bytes);
        Ok(text.into_owned())
    }

    /// Pascal string with a 16-bit big-endian length prefix.
    ///
    /// Only the animation's top-level name uses this variant.
    pub(crate) fn read_string_16_be(&mut self) -> Result<String> {
        let length = self.read_u16_be("string length")? as usize;
        let bytes = self.take(length, "string bytes")?;
        let (text, _, _) = WINDOWS_1252.decode(bytes);
        Ok(text.into_owned())
    }

    /// Every file must be consumed to its exact end.
    pub(crate) fn expect_end(&self, format: &'static str) -> Result<()> {
        if self.remaining() != 0 {
            return Err(TsoError::TrailingData {
                format,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_endianness() {
        let data = [0x00, 0x00, 0x40, 0x00, 0x00, 0x00, 0x80, 0x3f];
        let mut reader = BinaryReader::new(&data);
        assert_eq!(reader.read_u32_be("count").unwrap(), 0x4000);
        assert_eq!(reader.read_f32_le("value").unwrap(), 1.0);
        reader.expect_end("test").unwrap();
    }

    #[test]
    fn short_read_is_truncated_input() {
        let mut reader = BinaryReader::new(&[0x01, 0x02]);
        let err = reader.read_u32_be("count").unwrap_err();
        assert!(matches!(err, TsoError::TruncatedInput("count")));
    }

    #[test]
    fn pascal_string_windows_1252() {
        // 0xE9 is "é" in Windows-1252, not valid UTF-8
        let data = [0x04, b'b', b'e', 0xE9, b'f'];
        let mut reader = BinaryReader::new(&data);
        assert_eq!(reader.read_string().unwrap(), "be\u{e9}f");
    }

    #[test]
    fn pascal_string_truncated_body() {
        let mut reader = BinaryReader::new(&[0x05, b'a', b'b']);
        assert!(matches!(
            reader.read_string().unwrap_err(),
            TsoError::TruncatedInput(_)
        ));
    }

    #[test]
    fn trailing_bytes_rejected() {
        let reader = BinaryReader::new(&[0x00]);
        assert!(matches!(
            reader.expect_end("test").unwrap_err(),
            TsoError::TrailingData {
                format: "test",
                remaining: 1
            }
        ));
    }
}
