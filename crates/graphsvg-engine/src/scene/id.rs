use core::fmt;

/// A handle to an element in a [`Scene`](super::Scene).
///
/// Carries a slot index and a generation counter. Slots are recycled after
/// [`Scene::clear_children`](super::Scene::clear_children); the generation
/// makes handles into a freed slot stale instead of silently pointing at
/// whatever took its place.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    /// Raw slot index (diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}@gen{})", self.idx, self.generation)
    }
}
