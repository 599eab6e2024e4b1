// Shared ring fixtures for unit tests

use std::collections::BTreeSet;

use rand::Rng;

use crate::chord_identifier::IdentifierSpace;
use crate::chord_interface::Identifier;
use crate::chord_peer::PeerNode;
use crate::chord_ring::{Ring, RingBuilder};

fn peers_for(ids: &[Identifier]) -> Vec<PeerNode> {
    ids.iter()
        .map(|&id| PeerNode::new(id, format!("peer-{}", id)))
        .collect()
}

/// Linked ring with the given identifiers
pub(crate) fn ring_of(bits: u32, ids: &[Identifier]) -> Ring {
    let space = IdentifierSpace::new(bits).unwrap();
    RingBuilder::assemble(space, peers_for(ids)).unwrap()
}

/// Ring that has not been through `RingBuilder`
pub(crate) fn unlinked_ring_of(bits: u32, ids: &[Identifier]) -> Ring {
    let space = IdentifierSpace::new(bits).unwrap();
    Ring::new(space, peers_for(ids)).unwrap()
}

/// Linked ring in which the peer `unlinked` has lost its links
pub(crate) fn ring_with_unlinked_peer(bits: u32, ids: &[Identifier], unlinked: Identifier) -> Ring {
    let linked = ring_of(bits, ids);
    let peers = linked
        .peers()
        .iter()
        .map(|peer| {
            if peer.id() == unlinked {
                PeerNode::new(peer.id(), peer.address())
            } else {
                peer.clone()
            }
        })
        .collect();

    // peers are already sorted, so the surviving links keep their positions
    Ring::new(linked.space(), peers).unwrap()
}

/// `count` distinct identifiers in a `bits`-bit space (`count <= 2^bits`)
pub(crate) fn random_ids<R: Rng>(rng: &mut R, bits: u32, count: usize) -> Vec<Identifier> {
    let space = IdentifierSpace::new(bits).unwrap();
    let mut ids = BTreeSet::new();

    while ids.len() < count {
        ids.insert(space.identifier(rng.gen::<u64>() as u128));
    }

    ids.into_iter().collect()
}
