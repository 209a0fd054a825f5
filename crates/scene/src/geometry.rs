use glam::Vec3;
use std::collections::HashSet;

/// Indexed triangle geometry with per-vertex normals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    /// Triangle list. Empty means the positions are consumed three at a time.
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        if self.indices.is_empty() {
            self.positions.len() / 3
        } else {
            self.indices.len() / 3
        }
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` when empty.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.positions.iter().map(|p| Vec3::from_array(*p));
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }

    fn triangle_indices(&self) -> Vec<u32> {
        if self.indices.is_empty() {
            (0..(self.positions.len() / 3 * 3) as u32).collect()
        } else {
            self.indices.clone()
        }
    }
}

/// Axis-aligned box centered on the origin, split into segments per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub depth_segments: u32,
}

impl BoxGeometry {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self::with_segments(width, height, depth, 1, 1, 1)
    }

    /// Segment counts below one are raised to one.
    pub fn with_segments(
        width: f32,
        height: f32,
        depth: f32,
        width_segments: u32,
        height_segments: u32,
        depth_segments: u32,
    ) -> Self {
        Self {
            width,
            height,
            depth,
            width_segments: width_segments.max(1),
            height_segments: height_segments.max(1),
            depth_segments: depth_segments.max(1),
        }
    }

    /// Build the six faces. Each face owns its vertices so normals stay flat.
    pub fn build(&self) -> Geometry {
        let (w, h, d) = (self.width, self.height, self.depth);
        let (ws, hs, ds) = (
            self.width_segments,
            self.height_segments,
            self.depth_segments,
        );
        let mut out = Geometry::default();
        // (u, v, w) axes, u/v directions, face extents, grid
        build_plane(&mut out, [2, 1, 0], -1.0, -1.0, d, h, w, ds, hs); // +X
        build_plane(&mut out, [2, 1, 0], 1.0, -1.0, d, h, -w, ds, hs); // -X
        build_plane(&mut out, [0, 2, 1], 1.0, 1.0, w, d, h, ws, ds); // +Y
        build_plane(&mut out, [0, 2, 1], 1.0, -1.0, w, d, -h, ws, ds); // -Y
        build_plane(&mut out, [0, 1, 2], 1.0, -1.0, w, h, d, ws, hs); // +Z
        build_plane(&mut out, [0, 1, 2], -1.0, -1.0, w, h, -d, ws, hs); // -Z
        out
    }
}

#[allow(clippy::too_many_arguments)]
fn build_plane(
    out: &mut Geometry,
    [u, v, w]: [usize; 3],
    udir: f32,
    vdir: f32,
    width: f32,
    height: f32,
    depth: f32,
    grid_x: u32,
    grid_y: u32,
) {
    let segment_width = width / grid_x as f32;
    let segment_height = height / grid_y as f32;
    let width_half = width / 2.0;
    let height_half = height / 2.0;
    let depth_half = depth / 2.0;
    let grid_x1 = grid_x + 1;
    let base = out.positions.len() as u32;

    let mut normal = [0.0; 3];
    normal[w] = if depth > 0.0 { 1.0 } else { -1.0 };

    for iy in 0..=grid_y {
        let y = iy as f32 * segment_height - height_half;
        for ix in 0..=grid_x {
            let x = ix as f32 * segment_width - width_half;
            let mut p = [0.0; 3];
            p[u] = x * udir;
            p[v] = y * vdir;
            p[w] = depth_half;
            out.positions.push(p);
            out.normals.push(normal);
        }
    }

    for iy in 0..grid_y {
        for ix in 0..grid_x {
            let a = base + ix + grid_x1 * iy;
            let b = base + ix + grid_x1 * (iy + 1);
            let c = base + (ix + 1) + grid_x1 * (iy + 1);
            let d = base + (ix + 1) + grid_x1 * iy;
            out.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
}

/// Line-list outline of a triangle geometry.
///
/// Every triangle edge appears once. Edges are matched by endpoint position,
/// so seams between faces that duplicate vertices are not drawn twice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireframeGeometry {
    /// Consecutive pairs form one segment.
    pub positions: Vec<[f32; 3]>,
}

impl WireframeGeometry {
    pub fn from_geometry(geometry: &Geometry) -> Self {
        let mut seen = HashSet::new();
        let mut positions = Vec::new();

        for tri in geometry.triangle_indices().chunks_exact(3) {
            for j in 0..3 {
                let a = geometry.positions[tri[j] as usize];
                let b = geometry.positions[tri[(j + 1) % 3] as usize];
                let (ka, kb) = (position_key(a), position_key(b));
                let key = if ka <= kb { (ka, kb) } else { (kb, ka) };
                if seen.insert(key) {
                    positions.push(a);
                    positions.push(b);
                }
            }
        }

        Self { positions }
    }

    pub fn edge_count(&self) -> usize {
        self.positions.len() / 2
    }
}

/// Quantized position; folds -0.0 into 0.0 and absorbs rounding noise.
fn position_key(p: [f32; 3]) -> [i64; 3] {
    p.map(|c| (c * 10_000.0).round() as i64)
}
