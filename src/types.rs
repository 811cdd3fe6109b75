//! Value types shared by the three codecs.
//!
//! Everything here is a plain value struct produced by a single decode pass
//! and consumed by a single encode pass; `PartialEq` is derived throughout
//! because the round-trip tests compare whole files structurally.
//!
//! Skeleton translations and rotations are stored in the engine convention
//! (the codec applies the Y/Z axis swap on decode). Mesh vertex data and the
//! animation pools stay in raw file space; the transform layer owns their
//! conversion.

use glam::{Quat, Vec2, Vec3};

/// Parent name marking a bone as a hierarchy root.
pub const ROOT_PARENT: &str = "NULL";

/// A name/value metadata pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub value: String,
}

/// A group of properties, as embedded in bones and motions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyList {
    pub properties: Vec<Property>,
}

/// A named event keyed by a millisecond timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeProperty {
    pub time: u32,
    pub property_lists: Vec<PropertyList>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimePropertyList {
    pub time_properties: Vec<TimeProperty>,
}

/// One bone of a skeleton.
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    pub name: String,
    /// Name of the parent bone, [`ROOT_PARENT`] for roots.
    pub parent: String,
    pub property_lists: Vec<PropertyList>,
    /// Bone-local translation, engine axis order, file units.
    pub translation: Vec3,
    /// Bone-local rotation, engine convention.
    pub rotation: Quat,
    pub can_translate: u32,
    pub can_rotate: u32,
    pub can_blend: u32,
    pub wiggle_value: f32,
    pub wiggle_power: f32,
}

impl Bone {
    pub fn is_root(&self) -> bool {
        self.parent == ROOT_PARENT
    }
}

/// A bone hierarchy decoded from a `.skel` file.
///
/// Bone order is significant: meshes and animations bind by name, but the
/// indices inside a single file are positional.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    pub name: String,
    pub bones: Vec<Bone>,
}

impl Skeleton {
    pub fn bone(&self, name: &str) -> Option<&Bone> {
        self.bones.iter().find(|bone| bone.name == name)
    }
}

/// Contiguous-range descriptor mapping a bone to slices of a mesh's
/// primary and blended vertex buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoneBinding {
    /// Index into the mesh's own bone name list. Consumers clamp this to
    /// the last valid index when it runs past the end.
    pub bone_index: u32,
    pub vertex_index: u32,
    pub vertex_count: u32,
    pub blended_vertex_index: u32,
    pub blended_vertex_count: u32,
}

/// Secondary bone influence paired with a primary vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blend {
    /// Fixed-point weight, scale 2^15.
    pub weight: u32,
    /// Index of the primary vertex this blend influences.
    pub vertex_index: u32,
}

impl Blend {
    pub const WEIGHT_ONE: f32 = 32768.0;

    pub fn weight_f32(&self) -> f32 {
        self.weight as f32 / Self::WEIGHT_ONE
    }

    pub fn quantize_weight(weight: f32) -> u32 {
        (weight * Self::WEIGHT_ONE) as u32
    }
}

/// Position and normal in raw file space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

/// Skinned geometry decoded from a `.mesh` file.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Per-mesh bone index space, independent of skeleton order.
    pub bones: Vec<String>,
    /// Triangles indexing the primary vertex space, file winding.
    pub faces: Vec<[u32; 3]>,
    pub bone_bindings: Vec<BoneBinding>,
    /// One UV pair per primary vertex, raw file V.
    pub uvs: Vec<Vec2>,
    pub blends: Vec<Blend>,
    /// Primary, single-bone-weighted vertices.
    pub vertices: Vec<Vertex>,
    /// Secondary vertices carrying a second bone's influence.
    pub blend_vertices: Vec<Vertex>,
}

/// One bone's animation curve data, referencing the shared pools by offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Motion {
    pub bone_name: String,
    pub frame_count: u32,
    /// Duration in milliseconds.
    pub duration: f32,
    pub uses_positions: bool,
    pub uses_rotations: bool,
    /// Index into the shared translation pool, -1 when unused.
    pub position_offset: i32,
    /// Index into the shared rotation pool, -1 when unused.
    pub rotation_offset: i32,
    pub property_lists: Vec<PropertyList>,
    pub time_property_lists: Vec<TimePropertyList>,
}

/// An animation decoded from an `.anim` file.
#[derive(Debug, Clone, PartialEq)]
pub struct Anim {
    pub name: String,
    /// Duration in milliseconds.
    pub duration: f32,
    /// Root motion magnitude.
    pub distance: f32,
    /// Whether the root translates.
    pub moves: bool,
    /// Shared translation pool, raw file axis order, file units.
    pub translations: Vec<Vec3>,
    /// Shared rotation pool, raw file component order (x, y, z, w).
    pub rotations: Vec<[f32; 4]>,
    pub motions: Vec<Motion>,
}
