use bevy::math::Vec3;

/// Append-only vertex storage that grows on demand.
///
/// An optional limit caps the number of vertices; pushes beyond it are refused.
#[derive(Debug, Clone, Default)]
pub struct VertexBuffer {
    vertices: Vec<Vec3>,
    limit: Option<usize>,
}

impl VertexBuffer {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            vertices: Vec::new(),
            limit,
        }
    }

    /// Appends `vertex`, returning `false` when the limit is reached.
    pub fn push(&mut self, vertex: Vec3) -> bool {
        if self.is_full() {
            return false;
        }
        self.vertices.push(vertex);
        true
    }

    pub fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.vertices.len() >= limit)
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn first(&self) -> Option<Vec3> {
        self.vertices.first().copied()
    }

    pub fn last(&self) -> Option<Vec3> {
        self.vertices.last().copied()
    }

    pub fn as_slice(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Copy of the stored vertices followed by `extra`.
    pub fn with_appended(&self, extra: Vec3) -> Vec<Vec3> {
        let mut out = Vec::with_capacity(self.vertices.len() + 1);
        out.extend_from_slice(&self.vertices);
        out.push(extra);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_past_old_fixed_capacity() {
        let mut buffer = VertexBuffer::new(None);
        for i in 0..250 {
            assert!(buffer.push(Vec3::splat(i as f32)));
        }
        assert_eq!(buffer.len(), 250);
        assert_eq!(buffer.first(), Some(Vec3::ZERO));
        assert_eq!(buffer.last(), Some(Vec3::splat(249.0)));
    }

    #[test]
    fn limit_refuses_extra_vertices() {
        let mut buffer = VertexBuffer::new(Some(2));
        assert!(buffer.push(Vec3::X));
        assert!(buffer.push(Vec3::Y));
        assert!(buffer.is_full());
        assert!(!buffer.push(Vec3::Z));
        assert_eq!(buffer.as_slice(), &[Vec3::X, Vec3::Y]);
    }

    #[test]
    fn appended_copy_leaves_buffer_untouched() {
        let mut buffer = VertexBuffer::new(None);
        buffer.push(Vec3::X);
        assert_eq!(buffer.with_appended(Vec3::Y), vec![Vec3::X, Vec3::Y]);
        assert_eq!(buffer.len(), 1);
        buffer.clear();
        assert!(buffer.is_empty());
    }
}
