//! Greedy finger-table lookup
//!
//! Computes the sequence of peers a Chord lookup would visit. Each hop is what
//! a remote `find_successor` call would be in a live deployment; here the chain
//! is walked in-process against an immutable, already-linked ring.

use log::warn;

use crate::chord_interface::{ConfigurationError, Identifier, PeerIndex};
use crate::chord_peer::PeerNode;
use crate::chord_ring::Ring;

/// Lookup engine borrowing a linked ring
///
/// The ring is only read, so any number of routers may share it across threads.
#[derive(Debug, Clone, Copy)]
pub struct Router<'a> {
    ring: &'a Ring,
}

impl<'a> Router<'a> {
    pub fn new(ring: &'a Ring) -> Self {
        Self { ring }
    }

    /// Peers visited when `start` looks up `target`
    ///
    /// The path always begins with `start`; its last element owns `target`
    /// (or is the successor boundary for it).
    ///
    /// # Example
    /// ```
    /// use chord_sim::{IdentifierSpace, PeerNode, RingBuilder, Router};
    ///
    /// let space = IdentifierSpace::new(3).unwrap();
    /// let peers = [0, 2, 5, 6].iter().map(|&id| PeerNode::new(id, "")).collect();
    /// let ring = RingBuilder::assemble(space, peers).unwrap();
    ///
    /// let path = Router::new(&ring).path_ids(0, 4).unwrap();
    /// assert_eq!(path, vec![0, 2, 5]);
    /// ```
    pub fn path_to(&self, start: Identifier, target: Identifier) -> Result<Vec<PeerIndex>, ConfigurationError> {
        let space = self.ring.space();
        if !space.contains(target) {
            return Err(ConfigurationError::ForeignIdentifier {
                id: target,
                bits: space.bits(),
            });
        }

        let mut current = self
            .ring
            .index_of(start)
            .ok_or(ConfigurationError::UnknownPeer(start))?;
        let mut path = vec![current];

        loop {
            let peer = self.ring.peer(current);
            let (predecessor, finger_table) = self.links(peer)?;

            // current peer owns the key
            if space.is_between(self.ring.peer(predecessor).id(), peer.id(), target) {
                return Ok(path);
            }

            // immediate successor owns the key
            let successor = finger_table[0];
            if space.is_between(peer.id(), self.ring.peer(successor).id(), target) {
                path.push(successor);
                return Ok(path);
            }

            let next = self.closest_preceding_node(current, target)?;
            if next == current {
                return Ok(path);
            }

            if path.len() > self.ring.len() {
                warn!(
                    "lookup for {} from {} exceeded {} hops, stopping",
                    target,
                    start,
                    self.ring.len()
                );
                return Ok(path);
            }

            path.push(next);
            current = next;
        }
    }

    /// `path_to`, mapped to peer identifiers
    pub fn path_ids(&self, start: Identifier, target: Identifier) -> Result<Vec<Identifier>, ConfigurationError> {
        Ok(self
            .path_to(start, target)?
            .into_iter()
            .map(|index| self.ring.peer(index).id())
            .collect())
    }

    /// Peer deemed responsible for `target` when looked up from `start`
    pub fn resolve(&self, start: Identifier, target: Identifier) -> Result<&'a PeerNode, ConfigurationError> {
        let path = self.path_to(start, target)?;
        // path is never empty
        let owner = path[path.len() - 1];
        Ok(self.ring.peer(owner))
    }

    /// Highest finger of `current` strictly between it and `target`
    ///
    /// Returns `current` itself when no finger qualifies, which ends the lookup.
    pub fn closest_preceding_node(&self, current: PeerIndex, target: Identifier) -> Result<PeerIndex, ConfigurationError> {
        let space = self.ring.space();
        let peer = self.ring.peer(current);
        let (_, finger_table) = self.links(peer)?;

        Ok(finger_table
            .iter()
            .rev()
            .copied()
            .find(|&finger| space.is_between(peer.id(), target, self.ring.peer(finger).id()))
            .unwrap_or(current))
    }

    fn links(&self, peer: &'a PeerNode) -> Result<(PeerIndex, &'a [PeerIndex]), ConfigurationError> {
        match peer.predecessor() {
            Some(predecessor) if peer.is_linked(self.ring.space().bits()) => {
                Ok((predecessor, peer.finger_table()))
            }
            _ => Err(ConfigurationError::Unlinked(peer.id())),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
