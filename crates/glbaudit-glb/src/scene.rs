//! Primitive extraction from a GLB container.
//!
//! Reads POSITION, TEXCOORD_0 and the index list of every triangle-list
//! primitive. Node transforms are not applied: all checks work in each
//! mesh's local space.

use byteorder::{ByteOrder, LittleEndian};
use gltf::accessor::{DataType, Dimensions};
use gltf::buffer::Source;
use gltf::mesh::Mode;
use gltf::Semantic;
use tracing::{debug, warn};

use glbaudit_geometry::{IndexRequirements, ModelGeometry, PrimitiveBuffers};

use crate::container::read_container;
use crate::error::{GlbError, GlbResult};

/// Raw view of an accessor's elements inside the binary chunk.
struct AccessorData<'a> {
    data: &'a [u8],
    offset: usize,
    stride: usize,
    count: usize,
}

impl<'a> AccessorData<'a> {
    fn new(accessor: &gltf::Accessor<'_>, bin: Option<&'a [u8]>) -> GlbResult<Self> {
        let index = accessor.index();
        let view = accessor.view().ok_or_else(|| GlbError::UnsupportedAccessor {
            index,
            reason: "no buffer view".to_string(),
        })?;
        let buffer = view.buffer();
        if !matches!(buffer.source(), Source::Bin) {
            return Err(GlbError::ExternalBuffer {
                index: buffer.index(),
            });
        }
        let data = bin.ok_or(GlbError::MissingBuffer)?;

        let element = accessor.size();
        let stride = view.stride().unwrap_or(element);
        let offset = view.offset() + accessor.offset();
        let count = accessor.count();
        if count > 0 {
            let end = offset + (count - 1) * stride + element;
            if end > data.len() {
                return Err(GlbError::Truncated {
                    needed: end,
                    available: data.len(),
                });
            }
        }

        Ok(Self {
            data,
            offset,
            stride,
            count,
        })
    }

    fn element(&self, i: usize) -> &'a [u8] {
        &self.data[self.offset + i * self.stride..]
    }
}

fn expect_float(accessor: &gltf::Accessor<'_>, dimensions: Dimensions) -> GlbResult<()> {
    if accessor.data_type() != DataType::F32 || accessor.dimensions() != dimensions {
        return Err(GlbError::UnsupportedAccessor {
            index: accessor.index(),
            reason: format!(
                "expected {:?} of F32, found {:?} of {:?}",
                dimensions,
                accessor.dimensions(),
                accessor.data_type()
            ),
        });
    }
    Ok(())
}

/// Reads a float accessor into a flat buffer of `components` floats per element.
fn read_floats(
    accessor: &gltf::Accessor<'_>,
    bin: Option<&[u8]>,
    dimensions: Dimensions,
) -> GlbResult<Vec<f32>> {
    expect_float(accessor, dimensions)?;
    let components = dimensions.multiplicity();
    let raw = AccessorData::new(accessor, bin)?;

    let mut out = Vec::with_capacity(raw.count * components);
    for i in 0..raw.count {
        let element = raw.element(i);
        for c in 0..components {
            out.push(LittleEndian::read_f32(&element[c * 4..]));
        }
    }
    Ok(out)
}

fn read_indices(accessor: &gltf::Accessor<'_>, bin: Option<&[u8]>) -> GlbResult<Vec<u32>> {
    if accessor.dimensions() != Dimensions::Scalar {
        return Err(GlbError::UnsupportedAccessor {
            index: accessor.index(),
            reason: "indices must be scalar".to_string(),
        });
    }
    let raw = AccessorData::new(accessor, bin)?;

    let read: fn(&[u8]) -> u32 = match accessor.data_type() {
        DataType::U8 => |b| u32::from(b[0]),
        DataType::U16 => |b| u32::from(LittleEndian::read_u16(b)),
        DataType::U32 => LittleEndian::read_u32,
        other => {
            return Err(GlbError::UnsupportedAccessor {
                index: accessor.index(),
                reason: format!("unsupported index type {:?}", other),
            })
        }
    };
    Ok((0..raw.count).map(|i| read(raw.element(i))).collect())
}

fn primitive_name(mesh: &gltf::Mesh<'_>, primitive: usize) -> String {
    let base = mesh
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("mesh{}", mesh.index()));
    if primitive == 0 {
        base
    } else {
        format!("{}#{}", base, primitive)
    }
}

/// Extracts the buffers of every triangle-list primitive in a GLB.
///
/// Primitives are returned mesh by mesh, in document order.
pub fn load_primitives(glb: &[u8]) -> GlbResult<Vec<PrimitiveBuffers>> {
    let chunks = read_container(glb)?;
    let gltf = gltf::Gltf::from_slice(chunks.json_text())?;
    let bin = chunks.bin;

    let mut primitives = Vec::new();
    for mesh in gltf.document.meshes() {
        for primitive in mesh.primitives() {
            let name = primitive_name(&mesh, primitive.index());
            if primitive.mode() != Mode::Triangles {
                warn!(primitive = %name, mode = ?primitive.mode(), "skipping non-triangle primitive");
                continue;
            }

            let positions = match primitive.get(&Semantic::Positions) {
                Some(accessor) => read_floats(&accessor, bin, Dimensions::Vec3)?,
                None => Vec::new(),
            };
            let uvs = primitive
                .get(&Semantic::TexCoords(0))
                .map(|accessor| read_floats(&accessor, bin, Dimensions::Vec2))
                .transpose()?;
            let indices = match primitive.indices() {
                Some(accessor) => read_indices(&accessor, bin)?,
                None => (0..(positions.len() / 3) as u32).collect(),
            };

            debug!(
                primitive = %name,
                vertices = positions.len() / 3,
                indices = indices.len(),
                has_uvs = uvs.is_some(),
                "loaded primitive"
            );
            primitives.push(PrimitiveBuffers {
                name,
                positions,
                uvs,
                indices,
            });
        }
    }
    Ok(primitives)
}

/// Loads every primitive of a GLB and builds its geometry.
pub fn load_model(glb: &[u8], requirements: IndexRequirements) -> GlbResult<ModelGeometry> {
    let primitives = load_primitives(glb)?;
    Ok(ModelGeometry::build(&primitives, requirements)?)
}
