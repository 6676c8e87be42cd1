use std::collections::HashMap;
use std::hash::Hash;

use super::FaceNumber;

/// Hands out sequential [`FaceNumber`]s for kernel face handles.
///
/// Numbers are stable for the lifetime of the allocator: asking twice for
/// the same handle returns the same number.
#[derive(Debug, Clone)]
pub struct IdAllocator<F> {
    numbers: HashMap<F, FaceNumber>,
    handles: Vec<F>,
}

impl<F> Default for IdAllocator<F> {
    fn default() -> Self {
        Self {
            numbers: HashMap::new(),
            handles: Vec::new(),
        }
    }
}

impl<F: Copy + Eq + Hash> IdAllocator<F> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `handle`, allocating the next one on first sight.
    pub fn id_for(&mut self, handle: F) -> FaceNumber {
        if let Some(&id) = self.numbers.get(&handle) {
            return id;
        }
        let id = FaceNumber(self.handles.len());
        self.handles.push(handle);
        self.numbers.insert(handle, id);
        id
    }

    /// Handle that was given `id`.
    #[must_use]
    pub fn get(&self, id: FaceNumber) -> Option<F> {
        self.handles.get(id.0).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_sequential_and_stable() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.id_for('a'), FaceNumber(0));
        assert_eq!(ids.id_for('b'), FaceNumber(1));
        assert_eq!(ids.id_for('a'), FaceNumber(0));
        assert_eq!(ids.get(FaceNumber(1)), Some('b'));
        assert_eq!(ids.get(FaceNumber(2)), None);
        assert_eq!(ids.len(), 2);
    }
}
