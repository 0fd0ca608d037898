//! CPU-side triangle mesh data

/// An indexed triangle mesh with per-vertex colors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 4]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Paint every vertex with one color
    pub fn fill_color(&mut self, color: [f32; 4]) {
        self.colors = vec![color; self.positions.len()];
    }

    /// Heap bytes held by vertex and index buffers
    pub fn byte_size(&self) -> usize {
        self.positions.capacity() * std::mem::size_of::<[f32; 3]>()
            + self.normals.capacity() * std::mem::size_of::<[f32; 3]>()
            + self.colors.capacity() * std::mem::size_of::<[f32; 4]>()
            + self.indices.capacity() * std::mem::size_of::<u32>()
    }
}
