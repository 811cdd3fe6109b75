//! Reader and writer for The Sims Online 3D asset files.
//!
//! Three formats are covered: `.skel` skeletons, `.mesh` skinned geometry
//! and `.anim` animations. Each gets a decode/encode pair over byte
//! buffers plus `_file` entry points, with the value-level round-trip law
//! that decoding a file and re-encoding it reproduces it byte for byte
//! (the one exception is a present-but-empty property block, which the
//! format cannot distinguish from an absent one).
//!
//! The [`transform`] module bridges the file conventions (swapped Y/Z
//! axes, one-third scale, a -90 degree basis rotation at every bone
//! boundary) and a conventional scene space; [`scene`] resolves decoded
//! assets against each other and back; [`batch`] drives whole file sets
//! with per-file error recovery.
//!
//! ```no_run
//! use tso_util::skel::read_skeleton_file;
//! use tso_util::scene::build_hierarchy;
//!
//! # fn main() -> tso_util::error::Result<()> {
//! let skeleton = read_skeleton_file("adult.skel")?;
//! let hierarchy = build_hierarchy(&skeleton)?;
//! for bone in hierarchy.bones() {
//!     println!("{} at {:?}", bone.name, bone.head);
//! }
//! # Ok(())
//! # }
//! ```

pub mod anim;
pub mod batch;
mod binary_reader;
mod binary_writer;
pub mod error;
pub mod mesh;
mod properties;
pub mod scene;
pub mod skel;
pub mod transform;
pub mod types;

pub use error::{Result, TsoError};
