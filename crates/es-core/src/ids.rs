use core::fmt;
use core::num::NonZeroU32;

/// Position of a node in an energy system, in insertion order.
///
/// Stored off by one so that `Option<NodeId>` costs no extra space.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    pub fn from_index(index: usize) -> Self {
        let raw = u32::try_from(index).unwrap_or(u32::MAX - 1);
        Self(NonZeroU32::MIN.saturating_add(raw))
    }

    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.index())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_survives_the_offset() {
        for i in [0, 1, 7, 8783, 1_000_000] {
            assert_eq!(NodeId::from_index(i).index(), i);
        }
        assert_eq!(NodeId::from_index(3).to_string(), "#3");
    }

    #[test]
    fn option_adds_no_space() {
        assert_eq!(
            core::mem::size_of::<NodeId>(),
            core::mem::size_of::<Option<NodeId>>()
        );
    }
}
