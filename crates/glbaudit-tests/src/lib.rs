//! glbaudit end-to-end test infrastructure.
//!
//! Shared fixtures for the integration tests in `tests/`:
//!
//! - [`fixtures`]: meshes and UV layouts with known topology (split-normal
//!   cube, octahedron, non-manifold fin, spaced and stacked UV islands)
//! - [`builder`]: turns primitive buffers into a glTF file set or GLB
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p glbaudit-tests
//! ```

pub mod builder;
pub mod fixtures;

pub use builder::GlbBuilder;
