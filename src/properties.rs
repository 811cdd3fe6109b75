//! Property list codec.
//!
//! Property lists are a recurring sub-structure of bones and motions. In
//! both places the block is gated by a single flag byte; the format cannot
//! distinguish "absent" from "present but empty", so an empty list always
//! writes the absent flag.

use crate::binary_reader::BinaryReader;
use crate::binary_writer::BinaryWriter;
use crate::error::Result;
use crate::types::{Property, PropertyList};

pub(crate) fn read_properties(reader: &mut BinaryReader) -> Result<Vec<Property>> {
    let count = reader.read_u32_be("property count")?;
    (0..count)
        .map(|_| {
            Ok(Property {
                name: reader.read_string()?,
                value: reader.read_string()?,
            })
        })
        .collect()
}

pub(crate) fn read_property_lists(reader: &mut BinaryReader) -> Result<Vec<PropertyList>> {
    let count = reader.read_u32_be("property list count")?;
    (0..count)
        .map(|_| {
            Ok(PropertyList {
                properties: read_properties(reader)?,
            })
        })
        .collect()
}

/// Read a flag byte, then the property list block when it is nonzero.
pub(crate) fn read_gated_property_lists(reader: &mut BinaryReader) -> Result<Vec<PropertyList>> {
    let present = reader.read_u8("property list flag")?;
    if present != 0 {
        read_property_lists(reader)
    } else {
        Ok(Vec::new())
    }
}

pub(crate) fn write_property_lists(
    writer: &mut BinaryWriter,
    lists: &[PropertyList],
) -> Result<()> {
    writer.write_u32_be(lists.len() as u32);
    for list in lists {
        writer.write_u32_be(list.properties.len() as u32);
        for property in &list.properties {
            writer.write_string(&property.name)?;
            writer.write_string(&property.value)?;
        }
    }
    Ok(())
}

/// Write the flag byte, then the block only when the list is non-empty.
pub(crate) fn write_gated_property_lists(
    writer: &mut BinaryWriter,
    lists: &[PropertyList],
) -> Result<()> {
    if lists.is_empty() {
        writer.write_u8(0);
    } else {
        writer.write_u8(1);
        write_property_lists(writer, lists)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_lists() -> Vec<PropertyList> {
        vec![
            PropertyList {
                properties: vec![
                    Property {
                        name: "rotation".to_owned(),
                        value: "0".to_owned(),
                    },
                    Property {
                        name: "sound".to_owned(),
                        value: "footstep".to_owned(),
                    },
                ],
            },
            PropertyList {
                properties: vec![],
            },
        ]
    }

    #[test]
    fn round_trip() {
        let lists = sample_lists();
        let mut writer = BinaryWriter::new();
        write_property_lists(&mut writer, &lists).unwrap();
        let bytes = writer.into_bytes();
        let mut reader = BinaryReader::new(&bytes);
        assert_eq!(read_property_lists(&mut reader).unwrap(), lists);
        reader.expect_end("test").unwrap();
    }

    #[test]
    fn gated_round_trip() {
        let lists = sample_lists();
        let mut writer = BinaryWriter::new();
        write_gated_property_lists(&mut writer, &lists).unwrap();
        let bytes = writer.into_bytes();
        let mut reader = BinaryReader::new(&bytes);
        assert_eq!(read_gated_property_lists(&mut reader).unwrap(), lists);
    }

    #[test]
    fn empty_writes_absent_flag() {
        let mut writer = BinaryWriter::new();
        write_gated_property_lists(&mut writer, &[]).unwrap();
        assert_eq!(writer.into_bytes(), [0]);
    }

    #[test]
    fn present_but_empty_collapses_to_absent() {
        // flag byte set, zero lists
        let bytes = [0x01, 0x00, 0x00, 0x00, 0x00];
        let mut reader = BinaryReader::new(&bytes);
        let lists = read_gated_property_lists(&mut reader).unwrap();
        assert_eq!(lists, vec![]);

        let mut writer = BinaryWriter::new();
        write_gated_property_lists(&mut writer, &lists).unwrap();
        assert_eq!(writer.into_bytes(), [0]);
    }
}
