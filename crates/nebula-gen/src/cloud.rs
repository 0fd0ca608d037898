//! Flat position/color buffers for a set of points

/// An unordered set of points with index-aligned position and color buffers.
///
/// Both buffers are flat `f32` triples: point `i` occupies
/// `[3 * i, 3 * i + 3)` in each. The pairing is only ever extended through
/// [`PointCloud::push`], so the two buffers cannot drift out of alignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    positions: Vec<f32>,
    colors: Vec<f32>,
}

impl PointCloud {
    pub fn with_capacity(count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(count * 3),
            colors: Vec::with_capacity(count * 3),
        }
    }

    pub fn push(&mut self, position: [f32; 3], color: [f32; 3]) {
        self.positions.extend_from_slice(&position);
        self.colors.extend_from_slice(&color);
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn position(&self, i: usize) -> [f32; 3] {
        let p = &self.positions[i * 3..i * 3 + 3];
        [p[0], p[1], p[2]]
    }

    pub fn color(&self, i: usize) -> [f32; 3] {
        let c = &self.colors[i * 3..i * 3 + 3];
        [c[0], c[1], c[2]]
    }

    /// Iterate `(position, color)` pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = ([f32; 3], [f32; 3])> + '_ {
        self.positions
            .chunks_exact(3)
            .zip(self.colors.chunks_exact(3))
            .map(|(p, c)| ([p[0], p[1], p[2]], [c[0], c[1], c[2]]))
    }

    /// Heap bytes held by both buffers
    pub fn byte_size(&self) -> usize {
        (self.positions.capacity() + self.colors.capacity()) * std::mem::size_of::<f32>()
    }
}
