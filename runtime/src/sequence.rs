use fnv::FnvHashMap;

use message::{
    NodeAddress,
    SequenceNumber,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SeqError {
    #[error("replay from node {node}: seq {seq} not after last seen {last_seen}")]
    Replay {
        node:      NodeAddress,
        seq:       SequenceNumber,
        last_seen: SequenceNumber,
    },
}

/// Highest accepted sequence number per node.
///
/// Entries are created on first contact and never removed. Nothing is persisted:
/// a restarted station accepts any sequence number once per node.
#[derive(Debug, Default, Clone)]
pub struct SequenceState {
    last_seen: FnvHashMap<NodeAddress, SequenceNumber>,
}

impl SequenceState {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Would `seq` be accepted from `node` right now?
    pub fn check(&self, node: NodeAddress, seq: SequenceNumber) -> Result<(), SeqError> {
        match self.last_seen.get(&node) {
            Some(&last_seen) if seq <= last_seen => Err(SeqError::Replay {
                node,
                seq,
                last_seen,
            }),
            _ => Ok(()),
        }
    }

    /// Accept strictly increasing sequence numbers only. State is untouched on
    /// rejection.
    pub fn check_and_update(&mut self, node: NodeAddress, seq: SequenceNumber) -> Result<(), SeqError> {
        self.check(node, seq)?;
        self.last_seen.insert(node, seq);

        Ok(())
    }

    #[inline]
    pub fn last_seen(&self, node: NodeAddress) -> Option<SequenceNumber> {
        self.last_seen.get(&node).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.last_seen.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }
}
