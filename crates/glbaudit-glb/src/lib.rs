//! GLB container support for glbaudit.
//!
//! - [`container`]: the binary GLB codec (pack and read)
//! - [`files`]: turning a `.gltf` + `.bin` + images file set into a GLB
//! - [`scene`]: extracting primitive buffers from a GLB for the geometry engine

pub mod container;
pub mod error;
pub mod files;
pub mod scene;

pub use container::{aligned_length, pack, read_container, Blob, GlbChunks, GlbLayout};
pub use error::{GlbError, GlbResult};
pub use files::GltfFileSet;
pub use scene::{load_model, load_primitives};
