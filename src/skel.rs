//! `.skel` skeleton codec.

use std::fs;
use std::path::Path;

use crate::binary_reader::BinaryReader;
use crate::binary_writer::BinaryWriter;
use crate::error::{Result, TsoError};
use crate::properties;
use crate::transform::{quat_from_file, quat_to_file, vector_from_file, vector_to_file};
use crate::types::{Bone, Skeleton};

pub const SKEL_VERSION: u32 = 1;

fn read_bone(reader: &mut BinaryReader) -> Result<Bone> {
    reader.skip(4, "bone reserved bytes")?;

    let name = reader.read_string()?;
    let parent = reader.read_string()?;

    let property_lists = properties::read_gated_property_lists(reader)?;

    let translation = vector_from_file(reader.read_vec3_le("bone translation")?);
    let rotation = quat_from_file(reader.read_quat_raw_le("bone rotation")?);

    let can_translate = reader.read_u32_be("bone can_translate")?;
    let can_rotate = reader.read_u32_be("bone can_rotate")?;
    let can_blend = reader.read_u32_be("bone can_blend")?;

    let wiggle_value = reader.read_f32_le("bone wiggle_value")?;
    let wiggle_power = reader.read_f32_le("bone wiggle_power")?;

    Ok(Bone {
        name,
        parent,
        property_lists,
        translation,
        rotation,
        can_translate,
        can_rotate,
        can_blend,
        wiggle_value,
        wiggle_power,
    })
}

fn write_bone(writer: &mut BinaryWriter, bone: &Bone) -> Result<()> {
    writer.write_bytes(&[0; 4]);

    writer.write_string(&bone.name)?;
    writer.write_string(&bone.parent)?;

    properties::write_gated_property_lists(writer, &bone.property_lists)?;

    writer.write_vec3_le(vector_to_file(bone.translation));
    writer.write_quat_raw_le(quat_to_file(bone.rotation));

    writer.write_u32_be(bone.can_translate);
    writer.write_u32_be(bone.can_rotate);
    writer.write_u32_be(bone.can_blend);

    writer.write_f32_le(bone.wiggle_value);
    writer.write_f32_le(bone.wiggle_power);

    Ok(())
}

/// Decode a complete `.skel` buffer. The whole input must be consumed.
pub fn read_skeleton(data: &[u8]) -> Result<Skeleton> {
    let mut reader = BinaryReader::new(data);

    let version = reader.read_u32_be("skel version")?;
    if version != SKEL_VERSION {
        return Err(TsoError::UnsupportedVersion {
            format: "skel",
            expected: SKEL_VERSION,
            found: version,
        });
    }

    let name = reader.read_string()?;

    // bone count is the one u16 count in the three formats
    let bone_count = reader.read_u16_be("bone count")?;
    let bones = (0..bone_count)
        .map(|_| read_bone(&mut reader))
        .collect::<Result<Vec<_>>>()?;

    reader.expect_end("skel")?;

    Ok(Skeleton { name, bones })
}

/// Encode a skeleton to a complete `.skel` buffer.
pub fn write_skeleton(skeleton: &Skeleton) -> Result<Vec<u8>> {
    if skeleton.bones.len() > u16::MAX as usize {
        return Err(TsoError::InvalidData(format!(
            "{} bones overflow the u16 bone count",
            skeleton.bones.len()
        )));
    }

    let mut writer = BinaryWriter::new();
    writer.write_u32_be(SKEL_VERSION);
    writer.write_string(&skeleton.name)?;
    writer.write_u16_be(skeleton.bones.len() as u16);
    for bone in &skeleton.bones {
        write_bone(&mut writer, bone)?;
    }
    Ok(writer.into_bytes())
}

/// Read a `.skel` file, fully buffered.
pub fn read_skeleton_file<P: AsRef<Path>>(path: P) -> Result<Skeleton> {
    read_skeleton(&fs::read(path)?)
}

/// Write a `.skel` file.
///
/// The buffer is encoded completely before a single write call; a failure
/// in the write itself may still leave a truncated file behind.
pub fn write_skeleton_file<P: AsRef<Path>>(path: P, skeleton: &Skeleton) -> Result<()> {
    let bytes = write_skeleton(skeleton)?;
    fs::write(path, bytes)?;
    Ok(())
}
