//! Builds glTF file sets and GLB containers from primitive buffers.

use std::path::{Path, PathBuf};

use glbaudit_geometry::PrimitiveBuffers;
use glbaudit_glb::{pack, Blob, GlbResult};
use serde_json::{json, Value};

const FLOAT: u32 = 5126;
const UNSIGNED_INT: u32 = 5125;

/// Accumulates meshes (one primitive each) and images into a glTF.
#[derive(Debug, Clone, Default)]
pub struct GlbBuilder {
    primitives: Vec<PrimitiveBuffers>,
    images: Vec<Blob>,
}

fn min_max(values: &[f32]) -> (Vec<f32>, Vec<f32>) {
    let mut min = vec![f32::INFINITY; 3];
    let mut max = vec![f32::NEG_INFINITY; 3];
    for p in values.chunks_exact(3) {
        for axis in 0..3 {
            min[axis] = min[axis].min(p[axis]);
            max[axis] = max[axis].max(p[axis]);
        }
    }
    (min, max)
}

impl GlbBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mesh named after `buffers.name`.
    pub fn primitive(mut self, buffers: PrimitiveBuffers) -> Self {
        self.primitives.push(buffers);
        self
    }

    /// Adds an image referenced by file name.
    pub fn image(mut self, name: &str, bytes: Vec<u8>) -> Self {
        self.images.push(Blob::new(name, bytes));
        self
    }

    /// The `.gltf` JSON and `.bin` buffer of the file set.
    pub fn parts(&self) -> (Value, Vec<u8>) {
        let mut bin: Vec<u8> = Vec::new();
        let mut views = Vec::new();
        let mut accessors = Vec::new();
        let mut meshes = Vec::new();

        let mut push_view = |bin: &mut Vec<u8>, bytes: Vec<u8>| -> usize {
            views.push(json!({ "buffer": 0, "byteOffset": bin.len(), "byteLength": bytes.len() }));
            bin.extend_from_slice(&bytes);
            views.len() - 1
        };

        for prim in &self.primitives {
            let floats = |values: &[f32]| values.iter().flat_map(|v| v.to_le_bytes()).collect::<Vec<u8>>();

            let position_view = push_view(&mut bin, floats(&prim.positions));
            let (min, max) = min_max(&prim.positions);
            accessors.push(json!({
                "bufferView": position_view, "componentType": FLOAT,
                "count": prim.vertex_count(), "type": "VEC3", "min": min, "max": max
            }));
            let mut attributes = json!({ "POSITION": accessors.len() - 1 });

            if let Some(uvs) = &prim.uvs {
                let uv_view = push_view(&mut bin, floats(uvs));
                accessors.push(json!({
                    "bufferView": uv_view, "componentType": FLOAT,
                    "count": uvs.len() / 2, "type": "VEC2"
                }));
                attributes["TEXCOORD_0"] = json!(accessors.len() - 1);
            }

            let index_bytes = prim.indices.iter().flat_map(|i| i.to_le_bytes()).collect();
            let index_view = push_view(&mut bin, index_bytes);
            accessors.push(json!({
                "bufferView": index_view, "componentType": UNSIGNED_INT,
                "count": prim.indices.len(), "type": "SCALAR"
            }));

            meshes.push(json!({
                "name": prim.name,
                "primitives": [{ "attributes": attributes, "indices": accessors.len() - 1 }]
            }));
        }

        let images: Vec<Value> = self
            .images
            .iter()
            .map(|blob| json!({ "uri": blob.name, "mimeType": "image/png" }))
            .collect();

        let mut root = json!({
            "asset": { "version": "2.0" },
            "meshes": meshes,
            "accessors": accessors,
            "bufferViews": views,
            "buffers": [{ "uri": "model.bin", "byteLength": bin.len() }],
        });
        if !images.is_empty() {
            root["images"] = Value::Array(images);
        }
        (root, bin)
    }

    /// Packs everything into a GLB container.
    pub fn build(&self) -> GlbResult<Vec<u8>> {
        let (root, bin) = self.parts();
        let structure = serde_json::to_vec(&root)?;
        pack(&structure, &bin, &self.images)
    }

    /// Writes the file set (`model.gltf`, `model.bin`, images) into `dir`
    /// and returns the written paths.
    pub fn write_files(&self, dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        let (root, bin) = self.parts();
        let mut written = Vec::new();

        let gltf = dir.join("model.gltf");
        std::fs::write(&gltf, root.to_string())?;
        written.push(gltf);

        let buffer = dir.join("model.bin");
        std::fs::write(&buffer, bin)?;
        written.push(buffer);

        for blob in &self.images {
            let path = dir.join(&blob.name);
            std::fs::write(&path, &blob.bytes)?;
            written.push(path);
        }
        Ok(written)
    }
}
