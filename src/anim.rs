//! `.anim` animation codec.
//!
//! An animation stores two shared sample pools (translations and rotations)
//! and per-bone motions that address them by offset. A motion that does not
//! animate a channel carries -1 in that channel's offset. Pool samples stay
//! in raw file space; the transform layer owns their conversion.

use std::fs;
use std::path::Path;

use crate::binary_reader::BinaryReader;
use crate::binary_writer::BinaryWriter;
use crate::error::{Result, TsoError};
use crate::properties;
use crate::types::{Anim, Motion, TimeProperty, TimePropertyList};

pub const ANIM_VERSION: u32 = 2;

fn read_time_properties(reader: &mut BinaryReader) -> Result<Vec<TimeProperty>> {
    let count = reader.read_u32_be("time property count")?;
    (0..count)
        .map(|_| {
            Ok(TimeProperty {
                time: reader.read_u32_be("time property time")?,
                property_lists: properties::read_property_lists(reader)?,
            })
        })
        .collect()
}

fn read_time_property_lists(reader: &mut BinaryReader) -> Result<Vec<TimePropertyList>> {
    let count = reader.read_u32_be("time property list count")?;
    (0..count)
        .map(|_| {
            Ok(TimePropertyList {
                time_properties: read_time_properties(reader)?,
            })
        })
        .collect()
}

fn write_time_property_lists(
    writer: &mut BinaryWriter,
    lists: &[TimePropertyList],
) -> Result<()> {
    writer.write_u32_be(lists.len() as u32);
    for list in lists {
        writer.write_u32_be(list.time_properties.len() as u32);
        for time_property in &list.time_properties {
            writer.write_u32_be(time_property.time);
            properties::write_property_lists(writer, &time_property.property_lists)?;
        }
    }
    Ok(())
}

fn read_motion(reader: &mut BinaryReader) -> Result<Motion> {
    reader.skip(4, "motion reserved bytes")?;

    let bone_name = reader.read_string()?;
    let frame_count = reader.read_u32_be("motion frame count")?;
    let duration = reader.read_f32_le("motion duration")?;

    let uses_positions = reader.read_u8("motion positions flag")? != 0;
    let uses_rotations = reader.read_u8("motion rotations flag")? != 0;

    let position_offset = reader.read_i32_be("motion position offset")?;
    let rotation_offset = reader.read_i32_be("motion rotation offset")?;

    let property_lists = properties::read_gated_property_lists(reader)?;

    let has_time_property_lists = reader.read_u8("time property list flag")?;
    let time_property_lists = if has_time_property_lists != 0 {
        read_time_property_lists(reader)?
    } else {
        Vec::new()
    };

    Ok(Motion {
        bone_name,
        frame_count,
        duration,
        uses_positions,
        uses_rotations,
        position_offset,
        rotation_offset,
        property_lists,
        time_property_lists,
    })
}

fn write_motion(writer: &mut BinaryWriter, motion: &Motion) -> Result<()> {
    writer.write_bytes(&[0; 4]);

    writer.write_string(&motion.bone_name)?;
    writer.write_u32_be(motion.frame_count);
    writer.write_f32_le(motion.duration);

    writer.write_u8(motion.uses_positions as u8);
    writer.write_u8(motion.uses_rotations as u8);

    writer.write_i32_be(motion.position_offset);
    writer.write_i32_be(motion.rotation_offset);

    properties::write_gated_property_lists(writer, &motion.property_lists)?;

    if motion.time_property_lists.is_empty() {
        writer.write_u8(0);
    } else {
        writer.write_u8(1);
        write_time_property_lists(writer, &motion.time_property_lists)?;
    }

    Ok(())
}

/// Decode a complete `.anim` buffer. The whole input must be consumed.
pub fn read_anim(data: &[u8]) -> Result<Anim> {
    let mut reader = BinaryReader::new(data);

    let version = reader.read_u32_be("anim version")?;
    if version != ANIM_VERSION {
        return Err(TsoError::UnsupportedVersion {
            format: "anim",
            expected: ANIM_VERSION,
            found: version,
        });
    }

    // the one 16-bit length string in the three formats
    let name = reader.read_string_16_be()?;

    let duration = reader.read_f32_le("anim duration")?;
    let distance = reader.read_f32_le("anim distance")?;
    let moves = reader.read_i8("anim moves flag")? != 0;

    let translation_count = reader.read_u32_be("translation count")?;
    let translations = (0..translation_count)
        .map(|_| reader.read_vec3_le("translation sample"))
        .collect::<Result<Vec<_>>>()?;

    let rotation_count = reader.read_u32_be("rotation count")?;
    let rotations = (0..rotation_count)
        .map(|_| reader.read_quat_raw_le("rotation sample"))
        .collect::<Result<Vec<_>>>()?;

    let motion_count = reader.read_u32_be("motion count")?;
    let motions = (0..motion_count)
        .map(|_| read_motion(&mut reader))
        .collect::<Result<Vec<_>>>()?;

    reader.expect_end("anim")?;

    Ok(Anim {
        name,
        duration,
        distance,
        moves,
        translations,
        rotations,
        motions,
    })
}

/// Encode an animation to a complete `.anim` buffer.
pub fn write_anim(anim: &Anim) -> Result<Vec<u8>> {
    let mut writer = BinaryWriter::new();
    writer.write_u32_be(ANIM_VERSION);

    writer.write_string_16_be(&anim.name)?;

    writer.write_f32_le(anim.duration);
    writer.write_f32_le(anim.distance);
    writer.write_i8(anim.moves as i8);

    writer.write_u32_be(anim.translations.len() as u32);
    for translation in &anim.translations {
        writer.write_vec3_le(*translation);
    }

    writer.write_u32_be(anim.rotations.len() as u32);
    for rotation in &anim.rotations {
        writer.write_quat_raw_le(*rotation);
    }

    writer.write_u32_be(anim.motions.len() as u32);
    for motion in &anim.motions {
        write_motion(&mut writer, motion)?;
    }

    Ok(writer.into_bytes())
}

/// Read an `.anim` file, fully buffered.
pub fn read_anim_file<P: AsRef<Path>>(path: P) -> Result<Anim> {
    read_anim(&fs::read(path)?)
}

/// Write an `.anim` file.
///
/// The buffer is encoded completely before a single write call; a failure
/// in the write itself may still leave a truncated file behind.
pub fn write_anim_file<P: AsRef<Path>>(path: P, anim: &Anim) -> Result<()> {
    let bytes = write_anim(anim)?;
    fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Property, PropertyList};
    use glam::Vec3;
    use pretty_assertions::assert_eq;

    fn sample_anim() -> Anim {
        Anim {
            name: "a2a-walk-loop".to_owned(),
            duration: 967.0,
            distance: 2.5,
            moves: true,
            translations: vec![
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.1, 1.0, 0.0),
                Vec3::new(0.2, 1.0, 0.0),
            ],
            rotations: vec![[0.0, 0.0, 0.0, 1.0], [0.0, 0.707, 0.0, 0.707]],
            motions: vec![
                Motion {
                    bone_name: "ROOT".to_owned(),
                    frame_count: 3,
                    duration: 967.0,
                    uses_positions: true,
                    uses_rotations: false,
                    position_offset: 0,
                    rotation_offset: -1,
                    property_lists: vec![],
                    time_property_lists: vec![TimePropertyList {
                        time_properties: vec![TimeProperty {
                            time: 333,
                            property_lists: vec![PropertyList {
                                properties: vec![Property {
                                    name: "sound".to_owned(),
                                    value: "footstep".to_owned(),
                                }],
                            }],
                        }],
                    }],
                },
                Motion {
                    bone_name: "SPINE".to_owned(),
                    frame_count: 2,
                    duration: 967.0,
                    uses_positions: false,
                    uses_rotations: true,
                    position_offset: -1,
                    rotation_offset: 0,
                    property_lists: vec![PropertyList {
                        properties: vec![Property {
                            name: "priority".to_owned(),
                            value: "2".to_owned(),
                        }],
                    }],
                    time_property_lists: vec![],
                },
            ],
        }
    }

    #[test]
    fn round_trip() {
        let anim = sample_anim();
        let bytes = write_anim(&anim).unwrap();
        assert_eq!(read_anim(&bytes).unwrap(), anim);
    }

    #[test]
    fn re_encode_is_byte_exact() {
        let bytes = write_anim(&sample_anim()).unwrap();
        let reencoded = write_anim(&read_anim(&bytes).unwrap()).unwrap();
        assert_eq!(reencoded, bytes);
    }

    #[test]
    fn unused_channel_offsets_survive() {
        let anim = sample_anim();
        let decoded = read_anim(&write_anim(&anim).unwrap()).unwrap();
        assert_eq!(decoded.motions[0].rotation_offset, -1);
        assert_eq!(decoded.motions[1].position_offset, -1);
    }

    #[test]
    fn version_mismatch() {
        let mut bytes = write_anim(&sample_anim()).unwrap();
        bytes[3] = 1;
        assert!(matches!(
            read_anim(&bytes).unwrap_err(),
            TsoError::UnsupportedVersion { format: "anim", .. }
        ));
    }

    #[test]
    fn truncated_file_fails() {
        let bytes = write_anim(&sample_anim()).unwrap();
        assert!(matches!(
            read_anim(&bytes[..bytes.len() - 2]).unwrap_err(),
            TsoError::TruncatedInput(_)
        ));
    }

    #[test]
    fn trailing_bytes_fail() {
        let mut bytes = write_anim(&sample_anim()).unwrap();
        bytes.push(0xab);
        assert!(matches!(
            read_anim(&bytes).unwrap_err(),
            TsoError::TrailingData { format: "anim", .. }
        ));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a2a-walk-loop.anim");
        let anim = sample_anim();
        write_anim_file(&path, &anim).unwrap();
        assert_eq!(read_anim_file(&path).unwrap(), anim);
    }
}
