//! # chord-sim - Chord Ring Topology Simulator
//!
//! A deterministic, single-snapshot model of the Chord distributed hash table:
//! an m-bit circular identifier space, per-peer finger tables derived from a
//! sorted view of the ring, and the greedy finger-table lookup that resolves a
//! key to the peer owning it.
//!
//! ## Core Components
//!
//! - **IdentifierSpace**: modular arithmetic and the circular `(left, right]` test
//! - **PeerNode**: ring member holding its predecessor and finger-table links
//! - **Ring / RingBuilder**: owning peer collection and the link computation
//! - **Router**: computes the path a lookup takes across the ring
//!
//! There is no transport here. Routing is computed in-process; the returned
//! path is the simulated message chain.
//!
//! ```
//! use chord_sim::{IdentifierSpace, PeerNode, RingBuilder, Router};
//!
//! let space = IdentifierSpace::new(32).unwrap();
//! let peers = ["10.0.0.1:4000", "10.0.0.2:4000", "10.0.0.3:4000"]
//!     .iter()
//!     .map(|addr| PeerNode::new(space.from_hash(addr.as_bytes()), *addr))
//!     .collect();
//! let ring = RingBuilder::assemble(space, peers).unwrap();
//!
//! let start = ring.peers()[0].id();
//! let key = space.from_hash(b"some key");
//! let owner = Router::new(&ring).resolve(start, key).unwrap();
//! assert_eq!(owner.id(), ring.peer(ring.successor_of(key)).id());
//! ```
//!
//! ## Simulation
//!
//! Node generation, lookup statistics and the JSON experiment log live in the
//! `chord_simulator` binary under `simulator/`.

pub mod chord_export;
pub mod chord_identifier;
pub mod chord_interface;
pub mod chord_peer;
pub mod chord_ring;
pub mod chord_router;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use chord_identifier::IdentifierSpace;
pub use chord_interface::{ConfigurationError, Identifier, PeerIndex};
pub use chord_peer::PeerNode;
pub use chord_ring::{Ring, RingBuilder};
pub use chord_router::Router;
