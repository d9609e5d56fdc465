//! Mesh and UV fixtures with known topology.

use glbaudit_geometry::PrimitiveBuffers;

/// Corners of each unit-cube face, wound counter-clockwise seen from outside.
const CUBE_FACES: [[[f32; 3]; 4]; 6] = [
    [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
    [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
    [[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0]],
    [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
    [[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]],
    [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
];

/// UV rectangle `(min, max)` of each cube face in a 3x2 atlas, inset by `inset`.
pub fn atlas_cell(face: usize, inset: f32) -> ([f32; 2], [f32; 2]) {
    let col = (face % 3) as f32;
    let row = (face / 3) as f32;
    let (w, h) = (1.0 / 3.0, 0.5);
    (
        [col * w + inset, row * h + inset],
        [(col + 1.0) * w - inset, (row + 1.0) * h - inset],
    )
}

/// Appends a quad whose corners map to the UV rectangle `min..max`, wound
/// clockwise in UV space.
fn push_quad(
    buffers: &mut PrimitiveBuffers,
    corners: [[f32; 3]; 4],
    (min, max): ([f32; 2], [f32; 2]),
) {
    let base = buffers.vertex_count() as u32;
    for c in corners {
        buffers.positions.extend_from_slice(&c);
    }
    if let Some(uvs) = buffers.uvs.as_mut() {
        uvs.extend_from_slice(&[min[0], min[1], min[0], max[1], max[0], max[1], max[0], min[1]]);
    }
    buffers
        .indices
        .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}

/// Unit cube with four vertices per face (split normals), 12 triangles.
///
/// After dedup: 8 vertices, 18 edges, 12 of them hard. Each face is its own
/// UV island in a 3x2 atlas, inset by `uv_inset`.
pub fn cube(uv_inset: f32) -> PrimitiveBuffers {
    let mut buffers = PrimitiveBuffers {
        name: "cube".to_string(),
        uvs: Some(Vec::new()),
        ..Default::default()
    };
    for (face, corners) in CUBE_FACES.iter().enumerate() {
        push_quad(&mut buffers, *corners, atlas_cell(face, uv_inset));
    }
    buffers
}

/// `buffers` rotated by `degrees` about Z, then by the same angle about X.
///
/// Right angles stay right angles, but face normals no longer line up with
/// the axes.
pub fn rotated(mut buffers: PrimitiveBuffers, degrees: f32) -> PrimitiveBuffers {
    let (sin, cos) = degrees.to_radians().sin_cos();
    for p in buffers.positions.chunks_exact_mut(3) {
        let (x, y) = (p[0] * cos - p[1] * sin, p[0] * sin + p[1] * cos);
        let (y, z) = (y * cos - p[2] * sin, y * sin + p[2] * cos);
        p.copy_from_slice(&[x, y, z]);
    }
    buffers
}

/// Appends a convex planar polygon as a triangle fan, wound so its normal
/// points away from the origin.
fn push_polygon(buffers: &mut PrimitiveBuffers, corners: &[[f32; 3]]) {
    let sub = |a: [f32; 3], b: [f32; 3]| [a[0] - b[0], a[1] - b[1], a[2] - b[2]];
    let (e1, e2) = (sub(corners[1], corners[0]), sub(corners[2], corners[0]));
    let normal = [
        e1[1] * e2[2] - e1[2] * e2[1],
        e1[2] * e2[0] - e1[0] * e2[2],
        e1[0] * e2[1] - e1[1] * e2[0],
    ];
    let outward = normal.iter().zip(corners[0]).map(|(n, c)| n * c).sum::<f32>() > 0.0;

    let base = buffers.vertex_count() as u32;
    let ordered: Vec<[f32; 3]> = if outward {
        corners.to_vec()
    } else {
        corners.iter().rev().copied().collect()
    };
    for c in &ordered {
        buffers.positions.extend_from_slice(c);
    }
    for i in 1..ordered.len() as u32 - 1 {
        buffers.indices.extend_from_slice(&[base, base + i, base + i + 1]);
    }
}

/// Cube of half-size 1 centered on the origin with every edge chamfered at
/// 45 degrees, `bevel` deep. No UVs.
///
/// Six square faces, twelve chamfer quads and eight corner triangles; the
/// largest turn between neighboring faces is about 55 degrees.
pub fn beveled_cube(bevel: f32) -> PrimitiveBuffers {
    let mut buffers = PrimitiveBuffers {
        name: "beveled".to_string(),
        ..Default::default()
    };
    let c = 1.0 - bevel;
    // point with `along` on `axis`, `a` and `b` on the two other axes in order
    let point = |axis: usize, along: f32, a: f32, b: f32| {
        let mut p = [0.0; 3];
        p[axis] = along;
        p[(axis + 1) % 3] = a;
        p[(axis + 2) % 3] = b;
        p
    };

    for axis in 0..3 {
        for s in [1.0f32, -1.0] {
            let face = [
                point(axis, s, c, c),
                point(axis, s, -c, c),
                point(axis, s, -c, -c),
                point(axis, s, c, -c),
            ];
            push_polygon(&mut buffers, &face);
        }
    }

    for axis in 0..3 {
        let (i, j) = ((axis + 1) % 3, (axis + 2) % 3);
        for si in [1.0f32, -1.0] {
            for sj in [1.0f32, -1.0] {
                let corner = |on_i: bool, k: f32| {
                    let mut p = [0.0; 3];
                    p[i] = if on_i { si } else { si * c };
                    p[j] = if on_i { sj * c } else { sj };
                    p[axis] = k;
                    p
                };
                let chamfer = [corner(true, c), corner(false, c), corner(false, -c), corner(true, -c)];
                push_polygon(&mut buffers, &chamfer);
            }
        }
    }

    for sx in [1.0f32, -1.0] {
        for sy in [1.0f32, -1.0] {
            for sz in [1.0f32, -1.0] {
                let tip = [[sx, sy * c, sz * c], [sx * c, sy, sz * c], [sx * c, sy * c, sz]];
                push_polygon(&mut buffers, &tip);
            }
        }
    }
    buffers
}

/// Regular octahedron: closed, every normal turn well under 90 degrees. No UVs.
pub fn octahedron() -> PrimitiveBuffers {
    let mut buffers = PrimitiveBuffers {
        name: "octahedron".to_string(),
        ..Default::default()
    };
    for sx in [1.0f32, -1.0] {
        for sy in [1.0f32, -1.0] {
            for sz in [1.0f32, -1.0] {
                let a = [sx, 0.0, 0.0];
                let mut b = [0.0, sy, 0.0];
                let mut c = [0.0, 0.0, sz];
                // mirroring an odd number of axes flips the winding
                if sx * sy * sz < 0.0 {
                    std::mem::swap(&mut b, &mut c);
                }
                let base = buffers.vertex_count() as u32;
                for p in [a, b, c] {
                    buffers.positions.extend_from_slice(&p);
                }
                buffers.indices.extend_from_slice(&[base, base + 1, base + 2]);
            }
        }
    }
    buffers
}

/// Three triangles hinged on one edge: a single non-manifold edge.
pub fn fin() -> PrimitiveBuffers {
    PrimitiveBuffers {
        name: "fin".to_string(),
        positions: vec![
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.5, 1.0, 0.0, //
            0.5, -1.0, 0.0, //
            0.5, 0.0, 1.0,
        ],
        uvs: None,
        indices: vec![0, 1, 2, 1, 0, 3, 0, 1, 4],
    }
}

/// Two fins: edge 0-1 and edge 1-2 are each shared by three triangles.
pub fn fins() -> PrimitiveBuffers {
    PrimitiveBuffers {
        name: "fins".to_string(),
        positions: vec![
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.5, 1.0, 0.0, //
            0.5, -1.0, 0.0, //
            0.5, 0.0, 1.0, //
            1.5, 1.0, 0.0, //
            1.0, 0.5, 1.0,
        ],
        uvs: None,
        indices: vec![0, 1, 2, 1, 0, 3, 0, 1, 4, 2, 1, 5, 1, 2, 6],
    }
}

/// Two flat quads side by side in UV space, `gap` apart along U.
///
/// Each quad is one island spanning V in `[0.1, 0.9]`; the gap is centered
/// on `center`.
pub fn two_islands(gap: f32, center: f32) -> PrimitiveBuffers {
    let mut buffers = PrimitiveBuffers {
        name: "islands".to_string(),
        uvs: Some(Vec::new()),
        ..Default::default()
    };
    let flat = |x0: f32, x1: f32| [[x0, 0.0, 0.0], [x0, 1.0, 0.0], [x1, 1.0, 0.0], [x1, 0.0, 0.0]];
    let left = ([0.1, 0.1], [center - gap / 2.0, 0.9]);
    let right = ([center + gap / 2.0, 0.1], [0.9, 0.9]);
    push_quad(&mut buffers, flat(0.0, 1.0), left);
    push_quad(&mut buffers, flat(2.0, 3.0), right);
    buffers
}

/// Two UV quads stacked on top of each other: every triangle overlaps.
pub fn stacked_islands() -> PrimitiveBuffers {
    let mut buffers = PrimitiveBuffers {
        name: "stacked".to_string(),
        uvs: Some(Vec::new()),
        ..Default::default()
    };
    let flat = |x0: f32, x1: f32| [[x0, 0.0, 0.0], [x0, 1.0, 0.0], [x1, 1.0, 0.0], [x1, 0.0, 0.0]];
    push_quad(&mut buffers, flat(0.0, 1.0), ([0.1, 0.1], [0.6, 0.6]));
    push_quad(&mut buffers, flat(2.0, 3.0), ([0.3, 0.3], [0.9, 0.9]));
    buffers
}
