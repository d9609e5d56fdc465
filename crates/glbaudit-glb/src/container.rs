//! GLB container codec.
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! header   magic "glTF" | version 2 | total length
//! chunk 0  length | "JSON" | glTF JSON, space padded to 4 bytes
//! chunk 1  length | "BIN\0" | buffer bytes then each blob, each zero padded to 4 bytes
//! ```

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::io::{Cursor, Write};
use tracing::debug;

use crate::error::{GlbError, GlbResult};

/// `glTF` in little-endian.
pub const GLB_MAGIC: u32 = 0x4654_6C67;
pub const GLB_VERSION: u32 = 2;
/// `JSON` in little-endian.
pub const CHUNK_TYPE_JSON: u32 = 0x4E4F_534A;
/// `BIN\0` in little-endian.
pub const CHUNK_TYPE_BIN: u32 = 0x004E_4942;
pub const HEADER_LENGTH: usize = 12;
pub const CHUNK_HEADER_LENGTH: usize = 8;

/// Rounds `length` up to the next multiple of 4.
pub fn aligned_length(length: usize) -> usize {
    (length + 3) & !3
}

/// A named auxiliary file (usually an image) to embed in the binary chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    /// File name as referenced by an image `uri`.
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Blob {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

fn write_padded<W: Write>(out: &mut W, data: &[u8], pad: u8) -> GlbResult<()> {
    out.write_all(data)?;
    for _ in data.len()..aligned_length(data.len()) {
        out.write_u8(pad)?;
    }
    Ok(())
}

fn object_mut<'a>(value: &'a mut Value, what: &str) -> GlbResult<&'a mut Map<String, Value>> {
    value
        .as_object_mut()
        .ok_or_else(|| GlbError::invalid_json(format!("{} must be an object", what)))
}

/// Rewrites `root` so that buffer 0 lives in the binary chunk and every image
/// whose `uri` names a blob reads from a new buffer view instead.
///
/// Returns the binary chunk length.
fn embed_blobs(root: &mut Value, buffer_len: usize, blobs: &[Blob]) -> GlbResult<usize> {
    let doc = object_mut(root, "glTF root")?;

    let buffer_count = doc.get("buffers").and_then(Value::as_array).map_or(0, Vec::len);
    match buffer_count {
        0 => return Err(GlbError::MissingBuffer),
        1 => {}
        count => return Err(GlbError::MultipleBuffers { count }),
    }

    let views = doc
        .entry("bufferViews")
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or_else(|| GlbError::invalid_json("bufferViews must be an array"))?;

    let mut bin_length = aligned_length(buffer_len);
    let mut view_by_name: HashMap<&str, usize> = HashMap::with_capacity(blobs.len());
    for blob in blobs {
        view_by_name.insert(blob.name.as_str(), views.len());
        views.push(json!({
            "buffer": 0,
            "byteOffset": bin_length,
            "byteLength": blob.bytes.len(),
        }));
        bin_length += aligned_length(blob.bytes.len());
    }

    if let Some(buffer) = doc
        .get_mut("buffers")
        .and_then(Value::as_array_mut)
        .and_then(|b| b.first_mut())
    {
        let buffer = object_mut(buffer, "buffers[0]")?;
        buffer.insert("byteLength".to_string(), json!(bin_length));
        buffer.remove("uri");
    }

    if let Some(images) = doc.get_mut("images").and_then(Value::as_array_mut) {
        for image in images.iter_mut().filter_map(Value::as_object_mut) {
            let view = image
                .get("uri")
                .and_then(Value::as_str)
                .and_then(|uri| view_by_name.get(uri).copied());
            if let Some(view) = view {
                image.remove("uri");
                image.insert("bufferView".to_string(), json!(view));
            }
        }
    }

    Ok(bin_length)
}

/// Packs a multi-file glTF into a single GLB container.
///
/// `structure` is the `.gltf` JSON text, `buffer` the contents of its single
/// `.bin` buffer, and `blobs` any auxiliary files to embed after it.
pub fn pack(structure: &[u8], buffer: &[u8], blobs: &[Blob]) -> GlbResult<Vec<u8>> {
    let mut root: Value = serde_json::from_slice(structure)?;
    let bin_length = embed_blobs(&mut root, buffer.len(), blobs)?;

    let json = serde_json::to_vec(&root)?;
    let json_length = aligned_length(json.len());
    let total = HEADER_LENGTH + CHUNK_HEADER_LENGTH + json_length + CHUNK_HEADER_LENGTH + bin_length;
    let total_u32 = u32::try_from(total).map_err(|_| GlbError::LengthOverflow { length: total })?;

    let mut out = Vec::with_capacity(total);
    out.write_u32::<LittleEndian>(GLB_MAGIC)?;
    out.write_u32::<LittleEndian>(GLB_VERSION)?;
    out.write_u32::<LittleEndian>(total_u32)?;

    out.write_u32::<LittleEndian>(json_length as u32)?;
    out.write_u32::<LittleEndian>(CHUNK_TYPE_JSON)?;
    write_padded(&mut out, &json, b' ')?;

    out.write_u32::<LittleEndian>(bin_length as u32)?;
    out.write_u32::<LittleEndian>(CHUNK_TYPE_BIN)?;
    write_padded(&mut out, buffer, 0)?;
    for blob in blobs {
        write_padded(&mut out, &blob.bytes, 0)?;
    }

    debug!(total, json_length, bin_length, blobs = blobs.len(), "packed GLB");
    Ok(out)
}

/// Lengths read from a GLB header and chunk headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlbLayout {
    pub version: u32,
    pub total_length: u32,
    pub json_length: u32,
    /// `None` when the container has no binary chunk.
    pub bin_length: Option<u32>,
}

/// Borrowed chunks of a GLB container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlbChunks<'a> {
    pub layout: GlbLayout,
    /// JSON chunk including trailing padding.
    pub json: &'a [u8],
    pub bin: Option<&'a [u8]>,
}

impl<'a> GlbChunks<'a> {
    /// JSON chunk without trailing space padding.
    pub fn json_text(&self) -> &'a [u8] {
        let end = self.json.iter().rposition(|b| *b != b' ').map_or(0, |i| i + 1);
        &self.json[..end]
    }
}

fn read_u32(cursor: &mut Cursor<&[u8]>) -> GlbResult<u32> {
    let needed = cursor.position() as usize + 4;
    let available = cursor.get_ref().len();
    cursor
        .read_u32::<LittleEndian>()
        .map_err(|_| GlbError::Truncated { needed, available })
}

fn take<'a>(bytes: &'a [u8], start: usize, len: usize) -> GlbResult<&'a [u8]> {
    bytes.get(start..start + len).ok_or(GlbError::Truncated {
        needed: start + len,
        available: bytes.len(),
    })
}

/// Splits a GLB container into its JSON and binary chunks.
pub fn read_container(bytes: &[u8]) -> GlbResult<GlbChunks<'_>> {
    let mut cursor = Cursor::new(bytes);
    let magic = read_u32(&mut cursor)?;
    if magic != GLB_MAGIC {
        return Err(GlbError::InvalidMagic { found: magic });
    }
    let version = read_u32(&mut cursor)?;
    if version != GLB_VERSION {
        return Err(GlbError::UnsupportedVersion { version });
    }
    let total_length = read_u32(&mut cursor)?;
    if total_length as usize > bytes.len() {
        return Err(GlbError::Truncated {
            needed: total_length as usize,
            available: bytes.len(),
        });
    }
    let bytes = &bytes[..total_length as usize];
    let mut cursor = Cursor::new(bytes);
    cursor.set_position(HEADER_LENGTH as u64);

    let json_length = read_u32(&mut cursor)?;
    let json_type = read_u32(&mut cursor)?;
    if json_type != CHUNK_TYPE_JSON {
        return Err(GlbError::UnexpectedChunk {
            expected: CHUNK_TYPE_JSON,
            found: json_type,
        });
    }
    let json_start = HEADER_LENGTH + CHUNK_HEADER_LENGTH;
    let json = take(bytes, json_start, json_length as usize)?;

    let bin_header = json_start + json_length as usize;
    let (bin, bin_length) = if bin_header + CHUNK_HEADER_LENGTH <= bytes.len() {
        cursor.set_position(bin_header as u64);
        let bin_length = read_u32(&mut cursor)?;
        let bin_type = read_u32(&mut cursor)?;
        if bin_type != CHUNK_TYPE_BIN {
            return Err(GlbError::UnexpectedChunk {
                expected: CHUNK_TYPE_BIN,
                found: bin_type,
            });
        }
        let data = take(bytes, bin_header + CHUNK_HEADER_LENGTH, bin_length as usize)?;
        (Some(data), Some(bin_length))
    } else {
        (None, None)
    };

    Ok(GlbChunks {
        layout: GlbLayout {
            version,
            total_length,
            json_length,
            bin_length,
        },
        json,
        bin,
    })
}
