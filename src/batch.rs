//! Batch import/export driver.
//!
//! Files are processed one at a time and a bad file never aborts the rest
//! of the batch: the failure is logged, recorded in the report, and the
//! driver moves on. Skeletons are imported first so that meshes and
//! animations in the same batch can bind against the last one that loaded.

use std::path::{Path, PathBuf};

use crate::anim::{read_anim_file, write_anim_file};
use crate::error::{Result, TsoError};
use crate::mesh::{read_mesh_file, write_mesh_file};
use crate::scene::{
    bind_mesh, build_hierarchy, extract_anim, extract_mesh, resolve_animation, BoneHierarchy,
    SceneBuilder, SceneExtractor,
};
use crate::skel::read_skeleton_file;

/// Per-file outcomes of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub imported: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, TsoError)>,
    /// Files that were never attempted, e.g. meshes with no skeleton to
    /// bind against.
    pub skipped: Vec<PathBuf>,
}

impl BatchReport {
    fn success(&mut self, path: &Path) {
        self.imported.push(path.to_owned());
    }

    fn failure(&mut self, path: &Path, error: TsoError) {
        log::warn!("could not process {}: {error}", path.display());
        self.failed.push((path.to_owned(), error));
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

fn import_skeleton_file<B: SceneBuilder>(
    builder: &mut B,
    path: &Path,
) -> Result<BoneHierarchy> {
    let skeleton = read_skeleton_file(path)?;
    let hierarchy = build_hierarchy(&skeleton)?;
    builder.add_hierarchy(hierarchy.clone())?;
    Ok(hierarchy)
}

fn import_mesh_file<B: SceneBuilder>(
    builder: &mut B,
    path: &Path,
    hierarchy: &BoneHierarchy,
) -> Result<()> {
    let mesh = read_mesh_file(path)?;
    let geometry = bind_mesh(&mesh, hierarchy)?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mesh");
    builder.add_geometry(name, geometry)
}

fn import_anim_file<B: SceneBuilder>(
    builder: &mut B,
    path: &Path,
    hierarchy: &BoneHierarchy,
) -> Result<()> {
    let anim = read_anim_file(path)?;
    let curves = resolve_animation(&anim, hierarchy)?;
    builder.add_animation(curves)
}

/// Import a set of `.skel`/`.mesh`/`.anim` files into a scene.
///
/// All skeletons are imported first; the last one that loads successfully
/// becomes the binding target for every mesh and animation in the batch.
/// Without one, meshes and animations are skipped. Files with any other
/// extension are skipped.
pub fn import_files<B: SceneBuilder>(builder: &mut B, paths: &[PathBuf]) -> BatchReport {
    let mut report = BatchReport::default();
    let mut active: Option<BoneHierarchy> = None;

    for path in paths {
        if extension(path) != Some("skel") {
            continue;
        }
        match import_skeleton_file(builder, path) {
            Ok(hierarchy) => {
                active = Some(hierarchy);
                report.success(path);
            }
            Err(error) => report.failure(path, error),
        }
    }

    for path in paths {
        match extension(path) {
            Some("mesh") => match &active {
                Some(hierarchy) => match import_mesh_file(builder, path, hierarchy) {
                    Ok(()) => report.success(path),
                    Err(error) => report.failure(path, error),
                },
                None => {
                    log::warn!("no skeleton to bind {} against", path.display());
                    report.skipped.push(path.clone());
                }
            },
            Some("anim") => match &active {
                Some(hierarchy) => match import_anim_file(builder, path, hierarchy) {
                    Ok(()) => report.success(path),
                    Err(error) => report.failure(path, error),
                },
                None => {
                    log::warn!("no skeleton to bind {} against", path.display());
                    report.skipped.push(path.clone());
                }
            },
            Some("skel") => {}
            _ => report.skipped.push(path.clone()),
        }
    }

    report
}

/// Export a scene's meshes and animations into `output_directory`, one
/// file per asset, continuing past individual failures.
pub fn export_files<E: SceneExtractor>(
    extractor: &E,
    output_directory: &Path,
    export_meshes: bool,
    export_animations: bool,
) -> BatchReport {
    let mut report = BatchReport::default();

    let Some(hierarchy) = extractor.hierarchy() else {
        if export_meshes || export_animations {
            log::warn!("scene has no skeleton, nothing exported");
        }
        return report;
    };

    if export_meshes {
        for (name, geometry) in extractor.geometries() {
            let path = output_directory.join(format!("{name}.mesh"));
            let result = extract_mesh(geometry, hierarchy)
                .and_then(|mesh| write_mesh_file(&path, &mesh));
            match result {
                Ok(()) => report.success(&path),
                Err(error) => report.failure(&path, error),
            }
        }
    }

    if export_animations {
        for curves in extractor.animations() {
            let path = output_directory.join(format!("{}.anim", curves.name));
            let result = extract_anim(curves, hierarchy)
                .and_then(|anim| write_anim_file(&path, &anim));
            match result {
                Ok(()) => report.success(&path),
                Err(error) => report.failure(&path, error),
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::{read_anim, write_anim_file};
    use crate::mesh::{read_mesh_file, write_mesh_file};
    use crate::scene::MemoryScene;
    use crate::skel::write_skeleton_file;
    use crate::types::{
        Anim, Blend, Bone, BoneBinding, Mesh, Motion, Skeleton, Vertex,
    };
    use glam::{Quat, Vec2, Vec3};
    use pretty_assertions::assert_eq;
    use std::fs;

    fn bone(name: &str, parent: &str, translation: Vec3) -> Bone {
        Bone {
            name: name.to_owned(),
            parent: parent.to_owned(),
            property_lists: vec![],
            translation,
            rotation: Quat::IDENTITY,
            can_translate: 1,
            can_rotate: 1,
            can_blend: 0,
            wiggle_value: 0.0,
            wiggle_power: 0.0,
        }
    }

    fn sample_skeleton() -> Skeleton {
        Skeleton {
            name: "adult".to_owned(),
            bones: vec![
                bone("ROOT", "NULL", Vec3::ZERO),
                bone("SPINE", "ROOT", Vec3::new(0.0, 0.9, 0.0)),
            ],
        }
    }

    fn sample_mesh() -> Mesh {
        Mesh {
            bones: vec!["ROOT".to_owned(), "SPINE".to_owned()],
            faces: vec![[0, 1, 2]],
            bone_bindings: vec![
                BoneBinding {
                    bone_index: 0,
                    vertex_index: 0,
                    vertex_count: 2,
                    blended_vertex_index: 0,
                    blended_vertex_count: 0,
                },
                BoneBinding {
                    bone_index: 1,
                    vertex_index: 2,
                    vertex_count: 1,
                    blended_vertex_index: 0,
                    blended_vertex_count: 1,
                },
            ],
            uvs: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(0.5, 1.0),
            ],
            blends: vec![Blend {
                weight: 0x4000,
                vertex_index: 0,
            }],
            vertices: vec![
                Vertex {
                    position: Vec3::new(0.0, 0.0, 0.0),
                    normal: Vec3::new(0.0, 0.0, 1.0),
                },
                Vertex {
                    position: Vec3::new(3.0, 0.0, 0.0),
                    normal: Vec3::new(0.0, 0.0, 1.0),
                },
                Vertex {
                    position: Vec3::new(0.0, 3.0, 0.0),
                    normal: Vec3::new(0.0, 0.0, 1.0),
                },
            ],
            blend_vertices: vec![Vertex {
                position: Vec3::new(0.0, -2.7, 0.0),
                normal: Vec3::new(0.0, 0.0, 1.0),
            }],
        }
    }

    fn sample_anim() -> Anim {
        Anim {
            name: "wave".to_owned(),
            duration: 67.0,
            distance: 0.0,
            moves: false,
            translations: vec![],
            rotations: vec![[0.0, 0.0, 0.0, 1.0], [0.259, 0.0, 0.0, 0.966]],
            motions: vec![Motion {
                bone_name: "SPINE".to_owned(),
                frame_count: 2,
                duration: 67.0,
                uses_positions: false,
                uses_rotations: true,
                position_offset: -1,
                rotation_offset: 0,
                property_lists: vec![],
                time_property_lists: vec![],
            }],
        }
    }

    #[test]
    fn imports_skeleton_first_regardless_of_order() {
        let dir = tempfile::tempdir().unwrap();
        let mesh_path = dir.path().join("body.mesh");
        let skel_path = dir.path().join("adult.skel");
        write_mesh_file(&mesh_path, &sample_mesh()).unwrap();
        write_skeleton_file(&skel_path, &sample_skeleton()).unwrap();

        let mut scene = MemoryScene::default();
        // mesh listed before the skeleton it needs
        let report = import_files(&mut scene, &[mesh_path, skel_path]);

        assert_eq!(report.imported.len(), 2);
        assert!(report.failed.is_empty());
        assert!(scene.hierarchy.is_some());
        assert_eq!(scene.geometries.len(), 1);
        assert_eq!(scene.geometries[0].0, "body");
    }

    #[test]
    fn continues_past_corrupt_files() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = tempfile::tempdir().unwrap();
        let skel_path = dir.path().join("adult.skel");
        let bad_path = dir.path().join("broken.mesh");
        let anim_path = dir.path().join("wave.anim");
        write_skeleton_file(&skel_path, &sample_skeleton()).unwrap();
        fs::write(&bad_path, b"not a mesh").unwrap();
        write_anim_file(&anim_path, &sample_anim()).unwrap();

        let mut scene = MemoryScene::default();
        let report = import_files(&mut scene, &[skel_path, bad_path.clone(), anim_path]);

        assert_eq!(report.imported.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, bad_path);
        assert_eq!(scene.animations.len(), 1);
    }

    #[test]
    fn skips_assets_without_a_skeleton() {
        let dir = tempfile::tempdir().unwrap();
        let mesh_path = dir.path().join("body.mesh");
        write_mesh_file(&mesh_path, &sample_mesh()).unwrap();

        let mut scene = MemoryScene::default();
        let report = import_files(&mut scene, &[mesh_path.clone()]);

        assert!(report.imported.is_empty());
        assert_eq!(report.skipped, vec![mesh_path]);
        assert!(scene.geometries.is_empty());
    }

    #[test]
    fn import_export_round_trip() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();

        let skel_path = input.path().join("adult.skel");
        let mesh_path = input.path().join("body.mesh");
        let anim_path = input.path().join("wave.anim");
        write_skeleton_file(&skel_path, &sample_skeleton()).unwrap();
        write_mesh_file(&mesh_path, &sample_mesh()).unwrap();
        write_anim_file(&anim_path, &sample_anim()).unwrap();

        let mut scene = MemoryScene::default();
        let report = import_files(&mut scene, &[skel_path, mesh_path, anim_path]);
        assert!(report.failed.is_empty());

        let report = export_files(&scene, output.path(), true, true);
        assert!(report.failed.is_empty());
        assert_eq!(report.imported.len(), 2);

        let mesh = read_mesh_file(output.path().join("body.mesh")).unwrap();
        assert_eq!(mesh.bones, sample_mesh().bones);
        assert_eq!(mesh.faces, sample_mesh().faces);
        assert_eq!(mesh.blends.len(), 1);

        let anim = read_anim(&fs::read(output.path().join("wave.anim")).unwrap()).unwrap();
        assert_eq!(anim.name, "wave");
        assert_eq!(anim.motions.len(), 1);
        assert_eq!(anim.motions[0].frame_count, 2);
        assert_eq!(anim.motions[0].position_offset, -1);
        assert!(!anim.moves);
    }

    #[test]
    fn export_without_skeleton_is_empty() {
        let output = tempfile::tempdir().unwrap();
        let scene = MemoryScene::default();
        let report = export_files(&scene, output.path(), true, true);
        assert!(report.imported.is_empty());
        assert!(report.failed.is_empty());
    }
}
