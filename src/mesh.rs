//! `.mesh` mesh codec.
//!
//! Vertex storage is two-tier: primary vertices carry a single bone's full
//! weight, blend vertices carry a second bone's influence over a primary
//! vertex. The codec keeps vertex data in raw file space; conversion to the
//! scene convention lives in the transform layer.

use std::fs;
use std::path::Path;

use crate::binary_reader::BinaryReader;
use crate::binary_writer::BinaryWriter;
use crate::error::{Result, TsoError};
use crate::types::{Blend, BoneBinding, Mesh, Vertex};

pub const MESH_VERSION: u32 = 2;

fn read_bone_binding(reader: &mut BinaryReader) -> Result<BoneBinding> {
    Ok(BoneBinding {
        bone_index: reader.read_u32_be("binding bone index")?,
        vertex_index: reader.read_u32_be("binding vertex index")?,
        vertex_count: reader.read_u32_be("binding vertex count")?,
        blended_vertex_index: reader.read_u32_be("binding blended vertex index")?,
        blended_vertex_count: reader.read_u32_be("binding blended vertex count")?,
    })
}

fn read_blend(reader: &mut BinaryReader) -> Result<Blend> {
    Ok(Blend {
        weight: reader.read_u32_be("blend weight")?,
        vertex_index: reader.read_u32_be("blend vertex index")?,
    })
}

fn read_vertex(reader: &mut BinaryReader) -> Result<Vertex> {
    Ok(Vertex {
        position: reader.read_vec3_le("vertex position")?,
        normal: reader.read_vec3_le("vertex normal")?,
    })
}

/// Decode a complete `.mesh` buffer. The whole input must be consumed.
pub fn read_mesh(data: &[u8]) -> Result<Mesh> {
    let mut reader = BinaryReader::new(data);

    let version = reader.read_u32_be("mesh version")?;
    if version != MESH_VERSION {
        return Err(TsoError::UnsupportedVersion {
            format: "mesh",
            expected: MESH_VERSION,
            found: version,
        });
    }

    let bone_count = reader.read_u32_be("mesh bone count")?;
    let bones = (0..bone_count)
        .map(|_| reader.read_string())
        .collect::<Result<Vec<_>>>()?;

    let face_count = reader.read_u32_be("face count")?;
    let faces = (0..face_count)
        .map(|_| {
            Ok([
                reader.read_u32_be("face index")?,
                reader.read_u32_be("face index")?,
                reader.read_u32_be("face index")?,
            ])
        })
        .collect::<Result<Vec<_>>>()?;

    let binding_count = reader.read_u32_be("bone binding count")?;
    let bone_bindings = (0..binding_count)
        .map(|_| read_bone_binding(&mut reader))
        .collect::<Result<Vec<_>>>()?;

    let vertex_count = reader.read_u32_be("vertex count")?;
    let uvs = (0..vertex_count)
        .map(|_| reader.read_vec2_le("uv"))
        .collect::<Result<Vec<_>>>()?;

    let blend_count = reader.read_u32_be("blend vertex count")?;
    let blends = (0..blend_count)
        .map(|_| read_blend(&mut reader))
        .collect::<Result<Vec<_>>>()?;

    // redundant total vertex count, recomputed on write
    reader.skip(4, "total vertex count")?;

    let vertices = (0..vertex_count)
        .map(|_| read_vertex(&mut reader))
        .collect::<Result<Vec<_>>>()?;
    let blend_vertices = (0..blend_count)
        .map(|_| read_vertex(&mut reader))
        .collect::<Result<Vec<_>>>()?;

    reader.expect_end("mesh")?;

    Ok(Mesh {
        bones,
        faces,
        bone_bindings,
        uvs,
        blends,
        vertices,
        blend_vertices,
    })
}

/// Encode a mesh to a complete `.mesh` buffer.
///
/// The primary vertex count is written once and shared by the UV and
/// vertex lists, so `uvs` and `vertices` must have the same length.
pub fn write_mesh(mesh: &Mesh) -> Result<Vec<u8>> {
    if mesh.uvs.len() != mesh.vertices.len() {
        return Err(TsoError::InvalidData(format!(
            "{} uvs for {} primary vertices",
            mesh.uvs.len(),
            mesh.vertices.len()
        )));
    }

    let mut writer = BinaryWriter::new();
    writer.write_u32_be(MESH_VERSION);

    writer.write_u32_be(mesh.bones.len() as u32);
    for bone in &mesh.bones {
        writer.write_string(bone)?;
    }

    writer.write_u32_be(mesh.faces.len() as u32);
    for face in &mesh.faces {
        writer.write_u32_be(face[0]);
        writer.write_u32_be(face[1]);
        writer.write_u32_be(face[2]);
    }

    writer.write_u32_be(mesh.bone_bindings.len() as u32);
    for binding in &mesh.bone_bindings {
        writer.write_u32_be(binding.bone_index);
        writer.write_u32_be(binding.vertex_index);
        writer.write_u32_be(binding.vertex_count);
        writer.write_u32_be(binding.blended_vertex_index);
        writer.write_u32_be(binding.blended_vertex_count);
    }

    writer.write_u32_be(mesh.vertices.len() as u32);
    for uv in &mesh.uvs {
        writer.write_vec2_le(*uv);
    }

    writer.write_u32_be(mesh.blend_vertices.len() as u32);
    for blend in &mesh.blends {
        writer.write_u32_be(blend.weight);
        writer.write_u32_be(blend.vertex_index);
    }

    writer.write_u32_be((mesh.vertices.len() + mesh.blend_vertices.len()) as u32);

    for vertex in mesh.vertices.iter().chain(&mesh.blend_vertices) {
        writer.write_vec3_le(vertex.position);
        writer.write_vec3_le(vertex.normal);
    }

    Ok(writer.into_bytes())
}

/// Read a `.mesh` file, fully buffered.
pub fn read_mesh_file<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    read_mesh(&fs::read(path)?)
}

/// Write a `.mesh` file.
///
/// The buffer is encoded completely before a single write call; a failure
/// in the write itself may still leave a truncated file behind.
pub fn write_mesh_file<P: AsRef<Path>>(path: P, mesh: &Mesh) -> Result<()> {
    let bytes = write_mesh(mesh)?;
    fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};
    use pretty_assertions::assert_eq;

    fn vertex(px: f32, py: f32, pz: f32) -> Vertex {
        Vertex {
            position: Vec3::new(px, py, pz),
            normal: Vec3::new(0.0, 0.0, 1.0),
        }
    }

    fn sample_mesh() -> Mesh {
        Mesh {
            bones: vec!["ROOT".to_owned(), "SPINE".to_owned()],
            faces: vec![[0, 1, 2], [2, 1, 3]],
            bone_bindings: vec![
                BoneBinding {
                    bone_index: 0,
                    vertex_index: 0,
                    vertex_count: 3,
                    blended_vertex_index: 0,
                    blended_vertex_count: 1,
                },
                BoneBinding {
                    bone_index: 1,
                    vertex_index: 3,
                    vertex_count: 1,
                    blended_vertex_index: 0,
                    blended_vertex_count: 0,
                },
            ],
            uvs: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(1.0, 1.0),
            ],
            blends: vec![Blend {
                weight: 0x4000,
                vertex_index: 3,
            }],
            vertices: vec![
                vertex(0.0, 0.0, 0.0),
                vertex(1.0, 0.0, 0.0),
                vertex(0.0, 1.0, 0.0),
                vertex(1.0, 1.0, 0.0),
            ],
            blend_vertices: vec![vertex(1.0, 1.0, 0.1)],
        }
    }

    #[test]
    fn round_trip() {
        let mesh = sample_mesh();
        let bytes = write_mesh(&mesh).unwrap();
        assert_eq!(read_mesh(&bytes).unwrap(), mesh);
    }

    #[test]
    fn re_encode_is_byte_exact() {
        let bytes = write_mesh(&sample_mesh()).unwrap();
        let reencoded = write_mesh(&read_mesh(&bytes).unwrap()).unwrap();
        assert_eq!(reencoded, bytes);
    }

    #[test]
    fn total_vertex_count_is_recomputed() {
        let mesh = sample_mesh();
        let mut bytes = write_mesh(&mesh).unwrap();

        // corrupt the redundant total count; decode must not care
        let uv_bytes = mesh.uvs.len() * 8;
        let total_count_start = 4
            + 4 + (1 + 4) + (1 + 5)
            + 4 + mesh.faces.len() * 12
            + 4 + mesh.bone_bindings.len() * 20
            + 4 + uv_bytes
            + 4 + mesh.blends.len() * 8;
        bytes[total_count_start..total_count_start + 4].copy_from_slice(&[0xff; 4]);

        let decoded = read_mesh(&bytes).unwrap();
        assert_eq!(decoded, mesh);

        // and the writer restores the real total
        let rewritten = write_mesh(&decoded).unwrap();
        assert_eq!(
            &rewritten[total_count_start..total_count_start + 4],
            &(mesh.vertices.len() as u32 + 1).to_be_bytes(),
        );
    }

    #[test]
    fn uv_vertex_mismatch_fails_encode() {
        let mut mesh = sample_mesh();
        mesh.uvs.pop();
        assert!(matches!(
            write_mesh(&mesh).unwrap_err(),
            TsoError::InvalidData(_)
        ));
    }

    #[test]
    fn version_mismatch() {
        let mut bytes = write_mesh(&sample_mesh()).unwrap();
        bytes[3] = 1;
        assert!(matches!(
            read_mesh(&bytes).unwrap_err(),
            TsoError::UnsupportedVersion { format: "mesh", .. }
        ));
    }

    #[test]
    fn truncated_file_fails() {
        let bytes = write_mesh(&sample_mesh()).unwrap();
        assert!(matches!(
            read_mesh(&bytes[..bytes.len() - 1]).unwrap_err(),
            TsoError::TruncatedInput(_)
        ));
    }

    #[test]
    fn blend_weight_fixed_point() {
        let blend = Blend {
            weight: 0x4000,
            vertex_index: 0,
        };
        assert_eq!(blend.weight_f32(), 0.5);
        assert_eq!(Blend::quantize_weight(0.5), 0x4000);
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("body.mesh");
        let mesh = sample_mesh();
        write_mesh_file(&path, &mesh).unwrap();
        assert_eq!(read_mesh_file(&path).unwrap(), mesh);
    }
}
