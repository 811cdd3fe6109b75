//! Host-agnostic scene seam.
//!
//! The codecs produce value structs in file conventions; this module turns
//! them into scene-side data (world-space hierarchy, skinned vertices, pose
//! curves) and back. Hosts plug in through [`SceneBuilder`] and
//! [`SceneExtractor`]; [`MemoryScene`] is the in-memory implementation used
//! by the batch driver tests.

use glam::{Mat4, Quat, Vec2, Vec3};

use crate::error::{Result, TsoError};
use crate::transform::{
    quat_from_file, quat_to_file, vector_from_file, vector_to_file, BoneBasis, RestPose,
    DEFAULT_BONE_LENGTH, FRAME_INTERVAL_MS,
};
use crate::types::{
    Anim, Blend, Bone, BoneBinding, Mesh, Motion, Property, PropertyList, Skeleton, TimeProperty,
    TimePropertyList, Vertex, ROOT_PARENT,
};

/// Bone metadata that has no geometric meaning but must survive a
/// skeleton round trip through the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneAttributes {
    pub can_translate: u32,
    pub can_rotate: u32,
    pub can_blend: u32,
    pub wiggle_value: f32,
    pub wiggle_power: f32,
    pub property_lists: Vec<PropertyList>,
}

/// One bone as the scene sees it: resolved head position plus a display
/// length following the original tail rules.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyBone {
    pub name: String,
    pub parent: Option<String>,
    pub head: Vec3,
    pub length: f32,
    pub attributes: BoneAttributes,
}

/// A skeleton resolved into world space, ready for meshes and animations
/// to bind against.
#[derive(Debug, Clone)]
pub struct BoneHierarchy {
    name: String,
    basis: BoneBasis,
    rest: RestPose,
    bones: Vec<HierarchyBone>,
}

impl BoneHierarchy {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bones in skeleton declaration order.
    pub fn bones(&self) -> &[HierarchyBone] {
        &self.bones
    }

    pub fn contains(&self, bone_name: &str) -> bool {
        self.rest.contains(bone_name)
    }

    pub fn world_matrix(&self, bone_name: &str) -> Option<Mat4> {
        self.rest.world_matrix(bone_name)
    }

    pub fn parent_world_matrix(&self, bone_name: &str) -> Option<Mat4> {
        self.rest.parent_world_matrix(bone_name)
    }
}

/// Resolve a decoded skeleton into a scene hierarchy.
///
/// Bone lengths follow the original display rules: a bone reaches to its
/// first child, a childless bone copies its parent's length, and a
/// childless root falls back to [`DEFAULT_BONE_LENGTH`].
pub fn build_hierarchy(skeleton: &Skeleton) -> Result<BoneHierarchy> {
    let basis = BoneBasis::new();
    let rest = RestPose::from_skeleton(skeleton, &basis)?;

    let length_to_first_child = |name: &str| -> Option<f32> {
        let head = rest.head(name)?;
        let child = rest.children(name).first().copied()?.to_owned();
        Some((rest.head(&child)? - head).length())
    };

    let bones = skeleton
        .bones
        .iter()
        .map(|bone| {
            let length = length_to_first_child(&bone.name)
                .or_else(|| {
                    let parent = rest.parent_name(&bone.name)?;
                    length_to_first_child(parent)
                })
                .unwrap_or(DEFAULT_BONE_LENGTH);

            HierarchyBone {
                name: bone.name.clone(),
                parent: rest.parent_name(&bone.name).map(str::to_owned),
                head: rest.head(&bone.name).unwrap_or(Vec3::ZERO),
                length,
                attributes: BoneAttributes {
                    can_translate: bone.can_translate,
                    can_rotate: bone.can_rotate,
                    can_blend: bone.can_blend,
                    wiggle_value: bone.wiggle_value,
                    wiggle_power: bone.wiggle_power,
                    property_lists: bone.property_lists.clone(),
                },
            }
        })
        .collect();

    Ok(BoneHierarchy {
        name: skeleton.name.clone(),
        basis,
        rest,
        bones,
    })
}

/// A scene-space vertex with its one or two bone influences. The primary
/// bone implicitly carries the remainder of the secondary weight.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinnedVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    pub primary_group: String,
    pub secondary_group: Option<(String, f32)>,
}

impl SkinnedVertex {
    /// Build a vertex from a host's group assignments. The format supports
    /// exactly one or two influences per vertex.
    pub fn new(
        vertex: usize,
        position: Vec3,
        normal: Vec3,
        uv: Vec2,
        groups: &[(String, f32)],
    ) -> Result<SkinnedVertex> {
        match groups {
            [primary] => Ok(SkinnedVertex {
                position,
                normal,
                uv,
                primary_group: primary.0.clone(),
                secondary_group: None,
            }),
            [primary, secondary] => Ok(SkinnedVertex {
                position,
                normal,
                uv,
                primary_group: primary.0.clone(),
                secondary_group: Some(secondary.clone()),
            }),
            _ => Err(TsoError::DegenerateSkinning {
                vertex,
                group_count: groups.len(),
            }),
        }
    }
}

/// Mesh geometry in scene space, faces in scene winding.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinnedGeometry {
    pub vertices: Vec<SkinnedVertex>,
    pub faces: Vec<[u32; 3]>,
}

/// Resolve the name a binding refers to, clamping a runaway index to the
/// last bone as the original importer does.
fn binding_bone<'a>(bones: &'a [String], bone_index: u32) -> Result<&'a str> {
    if bones.is_empty() {
        return Err(TsoError::InvalidData(
            "bone binding in a mesh with no bones".to_owned(),
        ));
    }
    let clamped = (bone_index as usize).min(bones.len() - 1);
    if clamped != bone_index as usize {
        log::warn!(
            "bone binding index {} out of range, clamped to {}",
            bone_index,
            clamped
        );
    }
    Ok(&bones[clamped])
}

/// Skin a decoded mesh against a hierarchy.
///
/// Primary vertices are placed by their owning bone's world matrix; blend
/// entries hand the listed weight to the blending bone, leaving the
/// remainder on the owner. Face winding and the UV V axis are flipped into
/// the scene convention.
pub fn bind_mesh(mesh: &Mesh, hierarchy: &BoneHierarchy) -> Result<SkinnedGeometry> {
    if mesh.uvs.len() != mesh.vertices.len() {
        return Err(TsoError::InvalidData(format!(
            "{} uvs for {} primary vertices",
            mesh.uvs.len(),
            mesh.vertices.len()
        )));
    }

    let missing: Vec<&str> = mesh
        .bones
        .iter()
        .filter(|bone| !hierarchy.contains(bone))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(TsoError::BindingMismatch(format!(
            "mesh bones not in skeleton \"{}\": {}",
            hierarchy.name(),
            missing.join(", ")
        )));
    }

    let mut vertices: Vec<Option<SkinnedVertex>> = vec![None; mesh.vertices.len()];

    for binding in &mesh.bone_bindings {
        let bone_name = binding_bone(&mesh.bones, binding.bone_index)?;
        let world = hierarchy
            .world_matrix(bone_name)
            .ok_or_else(|| TsoError::BindingMismatch(format!("unknown bone \"{bone_name}\"")))?;

        let start = binding.vertex_index as usize;
        let end = start + binding.vertex_count as usize;
        if end > mesh.vertices.len() {
            return Err(TsoError::InvalidData(format!(
                "bone binding vertex range {start}..{end} exceeds {} vertices",
                mesh.vertices.len()
            )));
        }

        for i in start..end {
            let vertex = &mesh.vertices[i];
            let uv = mesh.uvs[i];
            vertices[i] = Some(SkinnedVertex {
                position: hierarchy.basis.skin_position(world, vertex.position),
                normal: hierarchy.basis.skin_normal(world, vertex.normal),
                uv: Vec2::new(uv.x, 1.0 - uv.y),
                primary_group: bone_name.to_owned(),
                secondary_group: None,
            });
        }
    }

    for binding in &mesh.bone_bindings {
        let blend_bone = binding_bone(&mesh.bones, binding.bone_index)?;

        let start = binding.blended_vertex_index as usize;
        let end = start + binding.blended_vertex_count as usize;
        if end > mesh.blends.len() {
            return Err(TsoError::InvalidData(format!(
                "bone binding blend range {start}..{end} exceeds {} blends",
                mesh.blends.len()
            )));
        }

        for blend in &mesh.blends[start..end] {
            let target = vertices
                .get_mut(blend.vertex_index as usize)
                .and_then(Option::as_mut)
                .ok_or_else(|| {
                    TsoError::InvalidData(format!(
                        "blend references unbound vertex {}",
                        blend.vertex_index
                    ))
                })?;
            target.secondary_group = Some((blend_bone.to_owned(), blend.weight_f32()));
        }
    }

    let vertices = vertices
        .into_iter()
        .enumerate()
        .map(|(i, vertex)| {
            vertex.ok_or_else(|| {
                TsoError::InvalidData(format!("vertex {i} not covered by any bone binding"))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let faces = mesh
        .faces
        .iter()
        .map(|face| {
            for &index in face {
                if index as usize >= vertices.len() {
                    return Err(TsoError::InvalidData(format!(
                        "face index {index} exceeds {} vertices",
                        vertices.len()
                    )));
                }
            }
            // file winding is reversed
            Ok([face[2], face[1], face[0]])
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SkinnedGeometry { vertices, faces })
}

/// One sampled frame of a bone's pose-space motion, 1-based frame number.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveSample {
    pub frame: u32,
    pub translation: Option<Vec3>,
    pub rotation: Option<Quat>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoneCurve {
    pub bone_name: String,
    pub samples: Vec<CurveSample>,
}

/// A named event on the animation timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEvent {
    pub bone_name: String,
    pub name: String,
    pub value: String,
    /// Milliseconds from the start of the animation.
    pub time: u32,
}

impl TimelineEvent {
    /// Marker text the original tooling uses: `"<bone> <name> <value>"`.
    pub fn label(&self) -> String {
        format!("{} {} {}", self.bone_name, self.name, self.value)
    }

    /// 1-based frame number at ~33.33 ms per frame.
    pub fn frame_number(&self) -> u32 {
        (self.time as f32 / FRAME_INTERVAL_MS).round() as u32 + 1
    }
}

/// An animation resolved into pose space against a hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationCurves {
    pub name: String,
    pub distance: f32,
    /// Animation-wide frame count, from the first motion.
    pub frame_count: u32,
    pub bone_curves: Vec<BoneCurve>,
    pub events: Vec<TimelineEvent>,
    /// Motions dropped because their bone is not in the hierarchy.
    pub skipped_motions: usize,
}

fn check_pool_range(
    bone_name: &str,
    channel: &str,
    offset: i32,
    frame_count: u32,
    pool_len: usize,
) -> Result<usize> {
    let offset = usize::try_from(offset).map_err(|_| {
        TsoError::InvalidData(format!(
            "motion for \"{bone_name}\" uses {channel}s with offset {offset}"
        ))
    })?;
    if offset + frame_count as usize > pool_len {
        return Err(TsoError::InvalidData(format!(
            "motion for \"{bone_name}\" reads {channel}s {offset}..{} from a pool of {pool_len}",
            offset + frame_count as usize
        )));
    }
    Ok(offset)
}

/// Resolve a decoded animation into per-bone pose curves and timeline
/// events. Motions naming bones the hierarchy lacks are skipped and
/// counted, matching the original importer.
pub fn resolve_animation(anim: &Anim, hierarchy: &BoneHierarchy) -> Result<AnimationCurves> {
    let frame_count = anim.motions.first().map_or(0, |m| m.frame_count);

    let mut bone_curves = Vec::new();
    let mut skipped_motions = 0;

    for motion in &anim.motions {
        // a motion with no animated channel has nothing to sample, and its
        // frame count must not drive any work
        if !motion.uses_positions && !motion.uses_rotations {
            continue;
        }

        let (Some(bone_rest), Some(parent_rest)) = (
            hierarchy.world_matrix(&motion.bone_name),
            hierarchy.parent_world_matrix(&motion.bone_name),
        ) else {
            log::warn!(
                "animation \"{}\": no bone \"{}\" in skeleton \"{}\", motion skipped",
                anim.name,
                motion.bone_name,
                hierarchy.name()
            );
            skipped_motions += 1;
            continue;
        };

        let position_offset = if motion.uses_positions {
            Some(check_pool_range(
                &motion.bone_name,
                "translation",
                motion.position_offset,
                motion.frame_count,
                anim.translations.len(),
            )?)
        } else {
            None
        };
        let rotation_offset = if motion.uses_rotations {
            Some(check_pool_range(
                &motion.bone_name,
                "rotation",
                motion.rotation_offset,
                motion.frame_count,
                anim.rotations.len(),
            )?)
        } else {
            None
        };

        let mut samples = Vec::with_capacity(motion.frame_count as usize);
        for frame in 0..motion.frame_count as usize {
            let translation = position_offset
                .map(|offset| vector_from_file(anim.translations[offset + frame]));
            let rotation =
                rotation_offset.map(|offset| quat_from_file(anim.rotations[offset + frame]));

            let (pose_translation, pose_rotation) = hierarchy.basis.frame_pose(
                bone_rest,
                parent_rest,
                translation.unwrap_or(Vec3::ZERO),
                rotation.unwrap_or(Quat::IDENTITY),
            );

            samples.push(CurveSample {
                frame: frame as u32 + 1,
                translation: translation.map(|_| pose_translation),
                rotation: rotation.map(|_| pose_rotation),
            });
        }

        bone_curves.push(BoneCurve {
            bone_name: motion.bone_name.clone(),
            samples,
        });
    }

    let mut events = Vec::new();
    for motion in &anim.motions {
        for list in &motion.time_property_lists {
            for time_property in &list.time_properties {
                for property_list in &time_property.property_lists {
                    for property in &property_list.properties {
                        events.push(TimelineEvent {
                            bone_name: motion.bone_name.clone(),
                            name: property.name.clone(),
                            value: property.value.clone(),
                            time: time_property.time,
                        });
                    }
                }
            }
        }
    }

    Ok(AnimationCurves {
        name: anim.name.clone(),
        distance: anim.distance,
        frame_count,
        bone_curves,
        events,
        skipped_motions,
    })
}

/// Recover a file-convention skeleton from a hierarchy.
pub fn extract_skeleton(hierarchy: &BoneHierarchy) -> Skeleton {
    let bones = hierarchy
        .bones
        .iter()
        .map(|bone| {
            let world = hierarchy.world_matrix(&bone.name).unwrap_or(Mat4::IDENTITY);
            let parent_world = hierarchy
                .parent_world_matrix(&bone.name)
                .unwrap_or(Mat4::IDENTITY);
            let (translation, rotation) = hierarchy.basis.decompose(parent_world, world);

            Bone {
                name: bone.name.clone(),
                parent: bone
                    .parent
                    .clone()
                    .unwrap_or_else(|| ROOT_PARENT.to_owned()),
                property_lists: bone.attributes.property_lists.clone(),
                translation,
                rotation,
                can_translate: bone.attributes.can_translate,
                can_rotate: bone.attributes.can_rotate,
                can_blend: bone.attributes.can_blend,
                wiggle_value: bone.attributes.wiggle_value,
                wiggle_power: bone.attributes.wiggle_power,
            }
        })
        .collect();

    Skeleton {
        name: hierarchy.name.clone(),
        bones,
    }
}

/// Turn scene geometry back into a file-convention mesh.
///
/// Vertices are de-duplicated, then partitioned into contiguous per-bone
/// runs in group order: primaries first, then the blend runs, with blend
/// weights quantised to the 2^15 fixed point.
pub fn extract_mesh(geometry: &SkinnedGeometry, hierarchy: &BoneHierarchy) -> Result<Mesh> {
    // de-duplicate identical vertices, remembering each original's slot
    let mut unique: Vec<&SkinnedVertex> = Vec::new();
    let mut dedup_of = Vec::with_capacity(geometry.vertices.len());
    for vertex in &geometry.vertices {
        let index = match unique.iter().position(|u| *u == vertex) {
            Some(index) => index,
            None => {
                unique.push(vertex);
                unique.len() - 1
            }
        };
        dedup_of.push(index);
    }

    // group order is first appearance, primaries before blend-only groups
    let mut groups: Vec<&str> = Vec::new();
    for vertex in &unique {
        if !groups.contains(&vertex.primary_group.as_str()) {
            groups.push(vertex.primary_group.as_str());
        }
    }
    for vertex in &unique {
        if let Some((name, _)) = &vertex.secondary_group {
            if !groups.contains(&name.as_str()) {
                groups.push(name.as_str());
            }
        }
    }

    let world_of = |group: &str| -> Result<Mat4> {
        hierarchy.world_matrix(group).ok_or_else(|| {
            TsoError::BindingMismatch(format!(
                "vertex group \"{group}\" is not a bone in skeleton \"{}\"",
                hierarchy.name()
            ))
        })
    };

    let mut bones = Vec::new();
    let mut bone_bindings = Vec::new();
    let mut uvs = Vec::new();
    let mut vertices = Vec::new();
    let mut vertex_index_map = Vec::new();

    for group in &groups {
        let world = world_of(group)?;
        let start = vertices.len();

        for (index, vertex) in unique.iter().enumerate() {
            if vertex.primary_group == *group {
                vertices.push(Vertex {
                    position: hierarchy.basis.unskin_position(world, vertex.position),
                    normal: hierarchy.basis.unskin_normal(world, vertex.normal),
                });
                uvs.push(Vec2::new(vertex.uv.x, -vertex.uv.y));
                vertex_index_map.push(index);
            }
        }

        bone_bindings.push(BoneBinding {
            bone_index: bones.len() as u32,
            vertex_index: start as u32,
            vertex_count: (vertices.len() - start) as u32,
            blended_vertex_index: 0,
            blended_vertex_count: 0,
        });
        bones.push((*group).to_owned());
    }

    // primary slot of each de-duplicated vertex
    let mut primary_of = vec![0_usize; unique.len()];
    for (primary, &index) in vertex_index_map.iter().enumerate() {
        primary_of[index] = primary;
    }

    let mut blends = Vec::new();
    let mut blend_vertices = Vec::new();

    for (group_index, group) in groups.iter().enumerate() {
        let world = world_of(group)?;
        let start = blend_vertices.len();

        for (index, vertex) in unique.iter().enumerate() {
            if let Some((name, weight)) = &vertex.secondary_group {
                if name.as_str() == *group {
                    blend_vertices.push(Vertex {
                        position: hierarchy.basis.unskin_position(world, vertex.position),
                        normal: hierarchy.basis.unskin_normal(world, vertex.normal),
                    });
                    blends.push(Blend {
                        weight: Blend::quantize_weight(*weight),
                        vertex_index: primary_of[index] as u32,
                    });
                }
            }
        }

        if blend_vertices.len() > start {
            bone_bindings[group_index].blended_vertex_index = start as u32;
            bone_bindings[group_index].blended_vertex_count =
                (blend_vertices.len() - start) as u32;
        }
    }

    let faces = geometry
        .faces
        .iter()
        .map(|face| {
            for &index in face {
                if index as usize >= geometry.vertices.len() {
                    return Err(TsoError::InvalidData(format!(
                        "face index {index} exceeds {} vertices",
                        geometry.vertices.len()
                    )));
                }
            }
            Ok([
                primary_of[dedup_of[face[2] as usize]] as u32,
                primary_of[dedup_of[face[1] as usize]] as u32,
                primary_of[dedup_of[face[0] as usize]] as u32,
            ])
        })
        .collect::<Result<Vec<_>>>()?;

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

fn events_to_time_property_lists(
    events: &[TimelineEvent],
    bone_name: &str,
) -> Vec<TimePropertyList> {
    let mut time_properties: Vec<TimeProperty> = Vec::new();

    for event in events.iter().filter(|e| e.bone_name == bone_name) {
        let property = Property {
            name: event.name.clone(),
            value: event.value.clone(),
        };
        match time_properties
            .iter_mut()
            .find(|tp| tp.time == event.time)
            .and_then(|tp| tp.property_lists.first_mut())
        {
            Some(list) => list.properties.push(property),
            None => time_properties.push(TimeProperty {
                time: event.time,
                property_lists: vec![PropertyList {
                    properties: vec![property],
                }],
            }),
        }
    }

    if time_properties.is_empty() {
        Vec::new()
    } else {
        vec![TimePropertyList { time_properties }]
    }
}

/// Turn resolved pose curves back into a file-convention animation.
///
/// Pool offsets are allocated walking the shared pools in curve order; a
/// curve that never touches a channel gets the -1 sentinel. Bones with no
/// animated channel at all produce no motion.
pub fn extract_anim(curves: &AnimationCurves, hierarchy: &BoneHierarchy) -> Result<Anim> {
    let duration = (curves.frame_count as f32 * FRAME_INTERVAL_MS).round();

    let mut translations = Vec::new();
    let mut rotations = Vec::new();
    let mut motions = Vec::new();

    let mut position_offset: i32 = 0;
    let mut rotation_offset: i32 = 0;

    for curve in &curves.bone_curves {
        let uses_positions = curve.samples.iter().any(|s| s.translation.is_some());
        let uses_rotations = curve.samples.iter().any(|s| s.rotation.is_some());
        if !uses_positions && !uses_rotations {
            continue;
        }

        let (Some(bone_rest), Some(parent_rest)) = (
            hierarchy.world_matrix(&curve.bone_name),
            hierarchy.parent_world_matrix(&curve.bone_name),
        ) else {
            return Err(TsoError::BindingMismatch(format!(
                "animated bone \"{}\" is not in skeleton \"{}\"",
                curve.bone_name,
                hierarchy.name()
            )));
        };

        for sample in &curve.samples {
            let (translation, rotation) = hierarchy.basis.frame_file_transform(
                bone_rest,
                parent_rest,
                sample.translation.unwrap_or(Vec3::ZERO),
                sample.rotation.unwrap_or(Quat::IDENTITY),
            );

            if uses_positions {
                translations.push(vector_to_file(translation));
            }
            if uses_rotations {
                rotations.push(quat_to_file(rotation));
            }
        }

        let frame_count = curve.samples.len() as u32;
        motions.push(Motion {
            bone_name: curve.bone_name.clone(),
            frame_count,
            duration,
            uses_positions,
            uses_rotations,
            position_offset: if uses_positions { position_offset } else { -1 },
            rotation_offset: if uses_rotations { rotation_offset } else { -1 },
            property_lists: Vec::new(),
            time_property_lists: events_to_time_property_lists(&curves.events, &curve.bone_name),
        });

        if uses_positions {
            position_offset += frame_count as i32;
        }
        if uses_rotations {
            rotation_offset += frame_count as i32;
        }
    }

    Ok(Anim {
        name: curves.name.clone(),
        duration,
        distance: curves.distance,
        moves: curves.distance != 0.0,
        translations,
        rotations,
        motions,
    })
}

/// Receiving side of an import: the host scene the decoded assets land in.
pub trait SceneBuilder {
    fn add_hierarchy(&mut self, hierarchy: BoneHierarchy) -> Result<()>;
    fn add_geometry(&mut self, name: &str, geometry: SkinnedGeometry) -> Result<()>;
    fn add_animation(&mut self, animation: AnimationCurves) -> Result<()>;
}

/// Providing side of an export: the scene content to encode.
pub trait SceneExtractor {
    fn hierarchy(&self) -> Option<&BoneHierarchy>;
    fn geometries(&self) -> &[(String, SkinnedGeometry)];
    fn animations(&self) -> &[AnimationCurves];
}

/// Plain in-memory scene, implementing both sides of the seam.
#[derive(Default)]
pub struct MemoryScene {
    pub hierarchy: Option<BoneHierarchy>,
    pub geometries: Vec<(String, SkinnedGeometry)>,
    pub animations: Vec<AnimationCurves>,
}

impl SceneBuilder for MemoryScene {
    fn add_hierarchy(&mut self, hierarchy: BoneHierarchy) -> Result<()> {
        self.hierarchy = Some(hierarchy);
        Ok(())
    }

    fn add_geometry(&mut self, name: &str, geometry: SkinnedGeometry) -> Result<()> {
        self.geometries.push((name.to_owned(), geometry));
        Ok(())
    }

    fn add_animation(&mut self, animation: AnimationCurves) -> Result<()> {
        self.animations.push(animation);
        Ok(())
    }
}

impl SceneExtractor for MemoryScene {
    fn hierarchy(&self) -> Option<&BoneHierarchy> {
        self.hierarchy.as_ref()
    }

    fn geometries(&self) -> &[(String, SkinnedGeometry)] {
        &self.geometries
    }

    fn animations(&self) -> &[AnimationCurves] {
        &self.animations
    }
}
