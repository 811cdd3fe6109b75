//! Coordinate transform layer.
//!
//! The file formats store bone-local data in a Z-up-ish space with the Y
//! and Z axes swapped relative to the engine convention, at one third of
//! the scene scale, and with a fixed -90 degree rotation about the
//! vertical axis folded into every bone boundary. This module owns those
//! constants and the matrix composition that bridges the two spaces, in
//! both directions.

use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Quat, Vec3};

use crate::error::{Result, TsoError};
use crate::types::Skeleton;

/// File units times this factor give scene units.
pub const BONE_SCALE: f32 = 3.0;

/// Fallback length for a root bone with no children.
pub const DEFAULT_BONE_LENGTH: f32 = 0.1;

/// Milliseconds per animation frame (30 fps).
pub const FRAME_INTERVAL_MS: f32 = 33.333_333;

/// Permute a file-order vector (x, y, z) into engine order (x, z, y).
///
/// The swap is its own inverse, [`vector_to_file`] exists for readability.
pub fn vector_from_file(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, v.y)
}

pub fn vector_to_file(v: Vec3) -> Vec3 {
    vector_from_file(v)
}

/// Remap file-order quaternion components (x, y, z, w) to the engine
/// convention: scalar first with the same Y/Z swap in the vector part.
pub fn quat_from_file(raw: [f32; 4]) -> Quat {
    Quat::from_xyzw(raw[0], raw[2], raw[1], raw[3])
}

pub fn quat_to_file(q: Quat) -> [f32; 4] {
    [q.x, q.z, q.y, q.w]
}

/// The fixed basis change applied at every bone boundary, plus the scale
/// conversion. Immutable; construct once and pass it explicitly.
#[derive(Debug, Clone)]
pub struct BoneBasis {
    offset: Mat4,
    offset_inverse: Mat4,
}

impl Default for BoneBasis {
    fn default() -> Self {
        Self::new()
    }
}

impl BoneBasis {
    pub fn new() -> BoneBasis {
        let offset = Mat4::from_rotation_z(-FRAC_PI_2);
        BoneBasis {
            offset,
            offset_inverse: offset.inverse(),
        }
    }

    /// Resolve a bone's world matrix from its parent's and its file-space
    /// local transform (engine axis order, file units):
    ///
    /// `world = parent * offset⁻¹ * T(translation / scale) * R * offset`
    pub fn compose(&self, parent_world: Mat4, translation: Vec3, rotation: Quat) -> Mat4 {
        parent_world
            * self.offset_inverse
            * Mat4::from_translation(translation / BONE_SCALE)
            * Mat4::from_quat(rotation)
            * self.offset
    }

    /// Algebraic inverse of [`compose`](Self::compose): recover the
    /// file-space local transform (engine axis order, file units) from a
    /// world matrix and its parent's.
    pub fn decompose(&self, parent_world: Mat4, world: Mat4) -> (Vec3, Quat) {
        let local = (parent_world * self.offset_inverse).inverse() * world * self.offset_inverse;
        let (_, rotation, translation) = local.to_scale_rotation_translation();
        (translation * BONE_SCALE, rotation)
    }

    /// Pose-space transform of one sampled animation frame, relative to
    /// the bone's rest pose. `translation`/`rotation` are the frame's
    /// file-space values (engine axis order); pass zero/identity when the
    /// motion does not use the corresponding channel.
    pub fn frame_pose(
        &self,
        bone_rest: Mat4,
        parent_rest: Mat4,
        translation: Vec3,
        rotation: Quat,
    ) -> (Vec3, Quat) {
        let pose = bone_rest.inverse() * self.compose(parent_rest, translation, rotation);
        let (_, rotation, translation) = pose.to_scale_rotation_translation();
        (translation, rotation)
    }

    /// Inverse of [`frame_pose`](Self::frame_pose): file-space frame
    /// values (engine axis order, file units) from a pose-space sample.
    pub fn frame_file_transform(
        &self,
        bone_rest: Mat4,
        parent_rest: Mat4,
        pose_translation: Vec3,
        pose_rotation: Quat,
    ) -> (Vec3, Quat) {
        let pose = Mat4::from_translation(pose_translation) * Mat4::from_quat(pose_rotation);
        self.decompose(parent_rest, bone_rest * pose)
    }

    fn skin_matrix(&self, bone_world: Mat4) -> Mat4 {
        bone_world * self.offset_inverse
    }

    fn rotation_only(matrix: Mat4) -> Quat {
        let (_, rotation, _) = matrix.to_scale_rotation_translation();
        rotation
    }

    /// Transform a file-space vertex position (file axis order) into
    /// scene space using the owning bone's world matrix.
    pub fn skin_position(&self, bone_world: Mat4, file_position: Vec3) -> Vec3 {
        self.skin_matrix(bone_world)
            .transform_point3(vector_from_file(file_position) / BONE_SCALE)
    }

    /// Transform a file-space normal; only the rotation part applies.
    pub fn skin_normal(&self, bone_world: Mat4, file_normal: Vec3) -> Vec3 {
        Self::rotation_only(self.skin_matrix(bone_world)) * vector_from_file(file_normal)
    }

    /// Inverse of [`skin_position`](Self::skin_position), back to file
    /// axis order and file units.
    pub fn unskin_position(&self, bone_world: Mat4, scene_position: Vec3) -> Vec3 {
        vector_to_file(
            self.skin_matrix(bone_world)
                .inverse()
                .transform_point3(scene_position)
                * BONE_SCALE,
        )
    }

    pub fn unskin_normal(&self, bone_world: Mat4, scene_normal: Vec3) -> Vec3 {
        vector_to_file(
            Self::rotation_only(self.skin_matrix(bone_world).inverse()) * scene_normal,
        )
    }
}

/// Resolved world matrices for every bone of a skeleton.
///
/// Resolution is memoised per bone and follows the `parent` links, so the
/// result is independent of the order bones were declared in.
#[derive(Debug, Clone)]
pub struct RestPose {
    names: Vec<String>,
    parents: Vec<Option<usize>>,
    matrices: Vec<Mat4>,
    index: HashMap<String, usize>,
}

enum ResolveState {
    Pending,
    InProgress,
    Done(Mat4),
}

impl RestPose {
    pub fn from_skeleton(skeleton: &Skeleton, basis: &BoneBasis) -> Result<RestPose> {
        let mut index = HashMap::new();
        for (i, bone) in skeleton.bones.iter().enumerate() {
            if index.insert(bone.name.clone(), i).is_some() {
                return Err(TsoError::InvalidData(format!(
                    "duplicate bone name \"{}\"",
                    bone.name
                )));
            }
        }

        let mut parents = Vec::with_capacity(skeleton.bones.len());
        for bone in &skeleton.bones {
            if bone.is_root() {
                parents.push(None);
            } else {
                let parent = *index.get(&bone.parent).ok_or_else(|| {
                    TsoError::InvalidData(format!(
                        "bone \"{}\" names unknown parent \"{}\"",
                        bone.name, bone.parent
                    ))
                })?;
                parents.push(Some(parent));
            }
        }

        let mut states: Vec<ResolveState> =
            skeleton.bones.iter().map(|_| ResolveState::Pending).collect();
        for i in 0..skeleton.bones.len() {
            Self::resolve(skeleton, basis, &parents, &mut states, i)?;
        }

        let matrices = states
            .into_iter()
            .map(|state| match state {
                ResolveState::Done(matrix) => matrix,
                _ => unreachable!("all bones resolved above"),
            })
            .collect();

        Ok(RestPose {
            names: skeleton.bones.iter().map(|b| b.name.clone()).collect(),
            parents,
            matrices,
            index,
        })
    }

    fn resolve(
        skeleton: &Skeleton,
        basis: &BoneBasis,
        parents: &[Option<usize>],
        states: &mut Vec<ResolveState>,
        i: usize,
    ) -> Result<Mat4> {
        match &states[i] {
            ResolveState::Done(matrix) => return Ok(*matrix),
            ResolveState::InProgress => {
                return Err(TsoError::InvalidData(format!(
                    "cyclic parent chain through bone \"{}\"",
                    skeleton.bones[i].name
                )));
            }
            ResolveState::Pending => {}
        }
        states[i] = ResolveState::InProgress;

        let parent_world = match parents[i] {
            Some(p) => Self::resolve(skeleton, basis, parents, states, p)?,
            None => Mat4::IDENTITY,
        };
        let bone = &skeleton.bones[i];
        let world = basis.compose(parent_world, bone.translation, bone.rotation);
        states[i] = ResolveState::Done(world);
        Ok(world)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn world_matrix(&self, name: &str) -> Option<Mat4> {
        self.index.get(name).map(|&i| self.matrices[i])
    }

    /// Parent's world matrix, identity for roots.
    pub fn parent_world_matrix(&self, name: &str) -> Option<Mat4> {
        let i = *self.index.get(name)?;
        Some(match self.parents[i] {
            Some(p) => self.matrices[p],
            None => Mat4::IDENTITY,
        })
    }

    pub fn parent_name(&self, name: &str) -> Option<&str> {
        let i = *self.index.get(name)?;
        self.parents[i].map(|p| self.names[p].as_str())
    }

    /// World-space head position of a bone.
    pub fn head(&self, name: &str) -> Option<Vec3> {
        self.world_matrix(name)
            .map(|m| m.w_axis.truncate())
    }

    /// Names of the bones whose parent is `name`, in declaration order.
    pub fn children(&self, name: &str) -> Vec<&str> {
        let Some(&i) = self.index.get(name) else {
            return Vec::new();
        };
        self.parents
            .iter()
            .enumerate()
            .filter(|(_, parent)| **parent == Some(i))
            .map(|(c, _)| self.names[c].as_str())
            .collect()
    }
}
