//! Ring construction
//!
//! The `Ring` owns every peer, stored in ascending identifier order next to a
//! `BTreeMap` index used for floor/ceiling queries. `RingBuilder` derives each
//! peer's predecessor and finger table from that static snapshot, so the
//! whole ring links in `O(N * bits * log N)`.

use std::collections::BTreeMap;

use log::debug;

use crate::chord_identifier::IdentifierSpace;
use crate::chord_interface::{ConfigurationError, Identifier, PeerIndex};
use crate::chord_peer::PeerNode;

/// Sorted snapshot of all peers in one identifier space
#[derive(Debug, Clone)]
pub struct Ring {
    space: IdentifierSpace,

    /// Sole owner of the peers, ascending by identifier
    peers: Vec<PeerNode>,

    /// Identifier -> position in `peers`
    index: BTreeMap<Identifier, PeerIndex>,
}

impl Ring {
    /// Take ownership of `peers`; links are left empty until a `RingBuilder` runs
    pub fn new(space: IdentifierSpace, mut peers: Vec<PeerNode>) -> Result<Self, ConfigurationError> {
        if peers.is_empty() {
            return Err(ConfigurationError::EmptyRing);
        }

        peers.sort_by_key(|peer| peer.id());

        let mut index = BTreeMap::new();
        for (position, peer) in peers.iter().enumerate() {
            if !space.contains(peer.id()) {
                return Err(ConfigurationError::ForeignIdentifier {
                    id: peer.id(),
                    bits: space.bits(),
                });
            }
            if index.insert(peer.id(), position).is_some() {
                return Err(ConfigurationError::DuplicateIdentifier(peer.id()));
            }
        }

        Ok(Self {
            space,
            peers,
            index,
        })
    }

    pub fn space(&self) -> IdentifierSpace {
        self.space
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    /// Never true: `Ring::new` rejects an empty peer set
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// All peers in ascending identifier order
    pub fn peers(&self) -> &[PeerNode] {
        &self.peers
    }

    pub fn get(&self, index: PeerIndex) -> Option<&PeerNode> {
        self.peers.get(index)
    }

    /// Peer at `index`
    ///
    /// # Panics
    /// Panics if `index` did not come from this ring.
    pub fn peer(&self, index: PeerIndex) -> &PeerNode {
        &self.peers[index]
    }

    pub fn index_of(&self, id: Identifier) -> Option<PeerIndex> {
        self.index.get(&id).copied()
    }

    pub fn find(&self, id: Identifier) -> Option<&PeerNode> {
        self.index_of(id).map(|index| &self.peers[index])
    }

    /// Peer with the smallest identifier `>= target`, wrapping to the minimum
    pub fn successor_of(&self, target: Identifier) -> PeerIndex {
        // peers are sorted, so the wrap target is position 0
        self.index
            .range(target..)
            .next()
            .map(|(_, &index)| index)
            .unwrap_or(0)
    }

    /// Peer with the largest identifier `< id`, wrapping to the maximum
    pub fn predecessor_position(&self, id: Identifier) -> PeerIndex {
        self.index
            .range(..id)
            .next_back()
            .map(|(_, &index)| index)
            .unwrap_or(self.peers.len() - 1)
    }

    /// Linked predecessor of the peer at `index`
    pub fn predecessor_of(&self, index: PeerIndex) -> Option<&PeerNode> {
        self.peers
            .get(index)
            .and_then(|peer| peer.predecessor())
            .map(|pred| &self.peers[pred])
    }

    /// Linked finger table of the peer at `index`, resolved to peers
    pub fn finger_table_of(&self, index: PeerIndex) -> Vec<&PeerNode> {
        self.peers
            .get(index)
            .map(|peer| peer.finger_table().iter().map(|&f| &self.peers[f]).collect())
            .unwrap_or_default()
    }

    /// True once every peer has its predecessor and full finger table
    pub fn is_linked(&self) -> bool {
        let bits = self.space.bits();
        self.peers.iter().all(|peer| peer.is_linked(bits))
    }
}

/// Populates predecessor and finger-table links of a `Ring`
#[derive(Debug, Clone, Copy)]
pub struct RingBuilder {
    space: IdentifierSpace,
}

impl RingBuilder {
    pub fn new(space: IdentifierSpace) -> Self {
        Self { space }
    }

    /// Create the ring from `peers` and link it in one step
    pub fn assemble(space: IdentifierSpace, peers: Vec<PeerNode>) -> Result<Ring, ConfigurationError> {
        let mut ring = Ring::new(space, peers)?;
        Self::new(space).build(&mut ring)?;
        Ok(ring)
    }

    /// Link every peer of `ring`
    ///
    /// Each peer's links depend only on the identifier index, never on
    /// another peer's links, so rebuilding an unchanged ring reproduces the
    /// same assignments.
    pub fn build(&self, ring: &mut Ring) -> Result<(), ConfigurationError> {
        if ring.space != self.space {
            return Err(ConfigurationError::SpaceMismatch {
                ring: ring.space.bits(),
                builder: self.space.bits(),
            });
        }

        debug!(
            "linking {} peers in a {}-bit ring",
            ring.len(),
            self.space.bits()
        );

        let links: Vec<(PeerIndex, Vec<PeerIndex>)> = ring
            .peers
            .iter()
            .map(|peer| self.links_for(ring, peer.id()))
            .collect();

        for (peer, (predecessor, finger_table)) in ring.peers.iter_mut().zip(links) {
            peer.set_links(predecessor, finger_table);
        }

        debug!("ring linked");
        Ok(())
    }

    fn links_for(&self, ring: &Ring, id: Identifier) -> (PeerIndex, Vec<PeerIndex>) {
        let predecessor = ring.predecessor_position(id);

        let finger_table = (0..self.space.bits())
            .map(|i| ring.successor_of(self.space.finger_start(id, i)))
            .collect();

        (predecessor, finger_table)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{random_ids, ring_of, unlinked_ring_of};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn ids(ring: &Ring, indices: &[PeerIndex]) -> Vec<Identifier> {
        indices.iter().map(|&i| ring.peer(i).id()).collect()
    }

    #[test]
    fn test_small_ring_links() {
        let ring = ring_of(3, &[0, 2, 5, 6]);

        let zero = ring.index_of(0).unwrap();
        assert_eq!(ring.predecessor_of(zero).unwrap().id(), 6);
        assert_eq!(ids(&ring, ring.peer(zero).finger_table()), vec![2, 2, 5]);
        let resolved: Vec<Identifier> = ring.finger_table_of(zero).iter().map(|p| p.id()).collect();
        assert_eq!(resolved, vec![2, 2, 5]);
        assert!(ring.finger_table_of(99).is_empty());

        let six = ring.index_of(6).unwrap();
        assert_eq!(ring.predecessor_of(six).unwrap().id(), 5);
        // targets 7, 0, 2
        assert_eq!(ids(&ring, ring.peer(six).finger_table()), vec![0, 0, 2]);

        let five = ring.index_of(5).unwrap();
        // targets 6, 7, 1
        assert_eq!(ids(&ring, ring.peer(five).finger_table()), vec![6, 0, 2]);
    }

    #[test]
    fn test_single_peer_links_to_itself() {
        let ring = ring_of(4, &[9]);
        let peer = ring.peer(0);

        assert_eq!(peer.predecessor(), Some(0));
        assert_eq!(peer.finger_table(), &[0, 0, 0, 0]);
        assert!(ring.is_linked());
    }

    #[test]
    fn test_peers_sorted_ascending() {
        let ring = ring_of(8, &[200, 3, 77, 150]);
        let sorted: Vec<Identifier> = ring.peers().iter().map(|p| p.id()).collect();

        assert_eq!(sorted, vec![3, 77, 150, 200]);
        assert_eq!(ring.find(77).unwrap().id(), 77);
        assert!(ring.find(78).is_none());
    }

    #[test]
    fn test_successor_of_wraps() {
        let ring = ring_of(3, &[0, 2, 5, 6]);

        assert_eq!(ring.peer(ring.successor_of(7)).id(), 0);
        assert_eq!(ring.peer(ring.successor_of(3)).id(), 5);
        assert_eq!(ring.peer(ring.successor_of(5)).id(), 5);

        let ring = ring_of(3, &[2, 5]);
        assert_eq!(ring.peer(ring.successor_of(6)).id(), 2);
    }

    #[test]
    fn test_empty_ring_rejected() {
        let space = IdentifierSpace::new(3).unwrap();
        assert_eq!(
            Ring::new(space, Vec::new()).unwrap_err(),
            ConfigurationError::EmptyRing
        );
    }

    #[test]
    fn test_duplicate_identifier_rejected() {
        let space = IdentifierSpace::new(3).unwrap();
        let peers = vec![
            PeerNode::new(1, "a"),
            PeerNode::new(4, "b"),
            PeerNode::new(1, "c"),
        ];

        assert_eq!(
            RingBuilder::assemble(space, peers).unwrap_err(),
            ConfigurationError::DuplicateIdentifier(1)
        );
    }

    #[test]
    fn test_foreign_identifier_rejected() {
        let space = IdentifierSpace::new(3).unwrap();
        let peers = vec![PeerNode::new(1, "a"), PeerNode::new(8, "b")];

        assert_eq!(
            Ring::new(space, peers).unwrap_err(),
            ConfigurationError::ForeignIdentifier { id: 8, bits: 3 }
        );
    }

    #[test]
    fn test_space_mismatch_rejected() {
        let mut ring = unlinked_ring_of(3, &[1, 4]);
        let builder = RingBuilder::new(IdentifierSpace::new(4).unwrap());

        assert_eq!(
            builder.build(&mut ring),
            Err(ConfigurationError::SpaceMismatch { ring: 3, builder: 4 })
        );
        assert!(!ring.is_linked());
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut ring = unlinked_ring_of(12, &random_ids(&mut rng, 12, 300));
        let builder = RingBuilder::new(ring.space());

        builder.build(&mut ring).unwrap();
        let first = ring.clone();
        builder.build(&mut ring).unwrap();

        assert_eq!(first.peers(), ring.peers());
    }

    #[test]
    fn test_finger_tables_match_brute_force() {
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..20 {
            let bits = rng.gen_range(1..=12);
            let count = rng.gen_range(1..=(1usize << bits).min(64));
            let ring = ring_of(bits, &random_ids(&mut rng, bits, count));
            let space = ring.space();
            let all: Vec<Identifier> = ring.peers().iter().map(|p| p.id()).collect();
            let min = all[0];

            for peer in ring.peers() {
                for (i, &finger) in peer.finger_table().iter().enumerate() {
                    let target = space.finger_start(peer.id(), i as u32);
                    let expected = all.iter().copied().find(|&id| id >= target).unwrap_or(min);
                    assert_eq!(ring.peer(finger).id(), expected);
                }
            }
        }
    }

    #[test]
    fn test_no_peer_between_predecessor_and_peer() {
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..20 {
            let bits = rng.gen_range(1..=16);
            let count = rng.gen_range(1..=(1usize << bits).min(100));
            let ring = ring_of(bits, &random_ids(&mut rng, bits, count));
            let space = ring.space();

            for (index, peer) in ring.peers().iter().enumerate() {
                let pred = ring.predecessor_of(index).unwrap().id();
                for other in ring.peers() {
                    if other.id() == peer.id() || other.id() == pred {
                        continue;
                    }
                    // strictly inside (pred, peer)
                    let inside = space.is_between(pred, peer.id(), other.id());
                    assert!(!inside, "{} lies between {} and {}", other.id(), pred, peer.id());
                }
            }
        }
    }
}
