use crate::chord_interface::{Identifier, PeerIndex};

/// A member of the ring
///
/// Links (predecessor and fingers) are indices into the owning `Ring`, so the
/// cyclic graph they form never owns anything. They stay empty until
/// `RingBuilder` has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerNode {
    id: Identifier,
    /// Display-only label (typically `ip:port`)
    address: String,
    predecessor: Option<PeerIndex>,
    finger_table: Vec<PeerIndex>,
}

impl PeerNode {
    pub fn new(id: Identifier, address: impl Into<String>) -> Self {
        Self {
            id,
            address: address.into(),
            predecessor: None,
            finger_table: Vec::new(),
        }
    }

    pub fn id(&self) -> Identifier {
        self.id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn predecessor(&self) -> Option<PeerIndex> {
        self.predecessor
    }

    /// Finger `i` approximates the successor of `id + 2^i`
    pub fn finger_table(&self) -> &[PeerIndex] {
        &self.finger_table
    }

    /// Immediate successor (finger 0)
    pub fn successor(&self) -> Option<PeerIndex> {
        self.finger_table.first().copied()
    }

    /// True once predecessor and all `bits` fingers are populated
    pub fn is_linked(&self, bits: u32) -> bool {
        self.predecessor.is_some() && self.finger_table.len() == bits as usize
    }

    pub(crate) fn set_links(&mut self, predecessor: PeerIndex, finger_table: Vec<PeerIndex>) {
        self.predecessor = Some(predecessor);
        self.finger_table = finger_table;
    }
}
