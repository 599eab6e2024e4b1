//! Random peer placement
//!
//! Peers get a random IPv4 address and port; their identifier is the hash of
//! those bytes. Colliding identifiers are dropped and redrawn until the
//! requested number of distinct peers exists.

use std::collections::btree_map::{BTreeMap, Entry};
use std::net::{Ipv4Addr, SocketAddrV4};

use chord_sim::{ConfigurationError, Identifier, IdentifierSpace, PeerNode};
use log::{debug, info};
use rand::{Rng, RngCore};

/// Identifier of a peer at `address`: hash of the 4 address octets followed by
/// the port as a big-endian 32-bit integer
pub fn peer_identifier(space: &IdentifierSpace, address: &SocketAddrV4) -> Identifier {
    let mut bytes = [0u8; 8];
    bytes[0..4].copy_from_slice(&address.ip().octets());
    bytes[4..8].copy_from_slice(&(address.port() as u32).to_be_bytes());
    space.from_hash(&bytes)
}

/// Simulated external lookup key: hash of 32 random bytes
pub fn random_key<R: RngCore>(space: &IdentifierSpace, rng: &mut R) -> Identifier {
    let mut bytes = [0u8; 32];
    rng.fill_bytes(&mut bytes);
    space.from_hash(&bytes)
}

/// Generate `nodes` peers with pairwise-distinct identifiers
pub fn generate_peers<R: Rng>(
    space: &IdentifierSpace,
    nodes: usize,
    rng: &mut R,
) -> Result<Vec<PeerNode>, ConfigurationError> {
    if nodes == 0 {
        return Err(ConfigurationError::EmptyRing);
    }
    if nodes as u128 > space.size() {
        return Err(ConfigurationError::TooManyNodes {
            nodes,
            bits: space.bits(),
        });
    }

    let mut peers: BTreeMap<Identifier, PeerNode> = BTreeMap::new();
    let mut collisions = 0usize;
    let report_every = (nodes / 10).max(1);

    while peers.len() < nodes {
        let address = SocketAddrV4::new(Ipv4Addr::from(rng.gen::<[u8; 4]>()), rng.gen());
        let id = peer_identifier(space, &address);

        match peers.entry(id) {
            Entry::Vacant(slot) => {
                slot.insert(PeerNode::new(id, address.to_string()));
                if peers.len() % report_every == 0 {
                    debug!("Creating nodes: {} of {}", peers.len(), nodes);
                }
            }
            Entry::Occupied(_) => collisions += 1,
        }
    }

    info!(
        "created {} peers in a {}-bit ring ({} identifier collisions redrawn)",
        nodes,
        space.bits(),
        collisions
    );

    Ok(peers.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_generates_distinct_peers() {
        let space = IdentifierSpace::new(10).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let peers = generate_peers(&space, 300, &mut rng).unwrap();
        let ids: HashSet<Identifier> = peers.iter().map(|p| p.id()).collect();

        assert_eq!(peers.len(), 300);
        assert_eq!(ids.len(), 300);
        assert!(ids.iter().all(|&id| space.contains(id)));
    }

    #[test]
    fn test_fills_entire_small_ring() {
        let space = IdentifierSpace::new(3).unwrap();
        let mut rng = StdRng::seed_from_u64(4);

        let peers = generate_peers(&space, 8, &mut rng).unwrap();
        let ids: Vec<Identifier> = peers.iter().map(|p| p.id()).collect();

        assert_eq!(ids, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_identifier_matches_address() {
        let space = IdentifierSpace::new(16).unwrap();
        let mut rng = StdRng::seed_from_u64(9);

        for peer in generate_peers(&space, 20, &mut rng).unwrap() {
            let address: SocketAddrV4 = peer.address().parse().unwrap();
            assert_eq!(peer_identifier(&space, &address), peer.id());
        }
    }

    #[test]
    fn test_same_seed_same_peers() {
        let space = IdentifierSpace::new(16).unwrap();

        let a = generate_peers(&space, 50, &mut StdRng::seed_from_u64(5)).unwrap();
        let b = generate_peers(&space, 50, &mut StdRng::seed_from_u64(5)).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_impossible_counts() {
        let space = IdentifierSpace::new(2).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(
            generate_peers(&space, 5, &mut rng),
            Err(ConfigurationError::TooManyNodes { nodes: 5, bits: 2 })
        );
        assert_eq!(
            generate_peers(&space, 0, &mut rng),
            Err(ConfigurationError::EmptyRing)
        );
    }

    #[test]
    fn test_random_key_in_space() {
        let space = IdentifierSpace::new(5).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..100 {
            assert!(space.contains(random_key(&space, &mut rng)));
        }
    }
}
