//! Multi-file glTF input: one `.gltf`, one `.bin`, and any number of images.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::container::{pack, Blob};
use crate::error::{GlbError, GlbResult};

/// The files making up a multi-file glTF.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GltfFileSet {
    /// `.gltf` JSON text.
    pub structure: Vec<u8>,
    /// `.bin` buffer contents.
    pub buffer: Vec<u8>,
    /// Every other file, keyed by file name.
    pub blobs: Vec<Blob>,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

fn read(path: &Path) -> GlbResult<Vec<u8>> {
    fs::read(path).map_err(|source| GlbError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

impl GltfFileSet {
    /// Classifies in-memory files by name.
    ///
    /// The last `.gltf` and the last `.bin` win; everything else becomes a blob.
    pub fn from_named<I, S>(files: I) -> GlbResult<Self>
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: Into<String>,
    {
        let mut structure = None;
        let mut buffer = None;
        let mut blobs = Vec::new();
        for (name, bytes) in files {
            let name = name.into();
            let path = PathBuf::from(&name);
            if has_extension(&path, "gltf") {
                if structure.replace(bytes).is_some() {
                    warn!(file = %name, "multiple .gltf files provided, using the last");
                }
            } else if has_extension(&path, "bin") {
                if buffer.replace(bytes).is_some() {
                    warn!(file = %name, "multiple .bin files provided, using the last");
                }
            } else {
                blobs.push(Blob::new(name, bytes));
            }
        }

        let buffer = buffer.ok_or(GlbError::MissingFile { extension: "bin" })?;
        let structure = structure.ok_or(GlbError::MissingFile { extension: "gltf" })?;
        Ok(Self {
            structure,
            buffer,
            blobs,
        })
    }

    /// Reads and classifies files from disk. Blobs are keyed by file name
    /// only, matching relative image URIs next to the `.gltf`.
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> GlbResult<Self> {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            debug!(path = %path.display(), "reading glTF input");
            files.push((file_name(path), read(path)?));
        }
        Self::from_named(files)
    }

    /// Packs the set into a single GLB container.
    pub fn pack(&self) -> GlbResult<Vec<u8>> {
        pack(&self.structure, &self.buffer, &self.blobs)
    }
}
