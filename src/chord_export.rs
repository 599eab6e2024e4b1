// Graph exports of a linked ring
//
// DOT (Graphviz) and SIF (Cytoscape) writers. Each peer contributes its
// outgoing finger-table edges; with `multigraph` set, repeated fingers are
// written once per table slot, otherwise each target appears once.

use std::io::{self, Write};

use crate::chord_interface::{Identifier, PeerIndex};
use crate::chord_peer::PeerNode;
use crate::chord_ring::Ring;

fn neighbours(ring: &Ring, peer: &PeerNode, multigraph: bool) -> Vec<Identifier> {
    let mut targets: Vec<PeerIndex> = peer.finger_table().to_vec();

    if !multigraph {
        let mut seen = hashbrown::HashSet::new();
        targets.retain(|&index| seen.insert(index));
    }

    targets.into_iter().map(|index| ring.peer(index).id()).collect()
}

/// Write `ring` as a Graphviz digraph
///
/// Predecessor links are emitted as dashed edges after the finger edges.
pub fn write_dot<W: Write>(writer: &mut W, ring: &Ring, multigraph: bool) -> io::Result<()> {
    writeln!(writer, "// BITS: {}", ring.space().bits())?;
    writeln!(writer, "// NODES: {}", ring.len())?;
    writeln!(writer)?;
    writeln!(writer, "digraph network {{")?;

    for peer in ring.peers() {
        write!(
            writer,
            "\t{} [label=\"{}\"]; {} -> {{",
            peer.id(),
            peer.address(),
            peer.id()
        )?;
        for id in neighbours(ring, peer, multigraph) {
            write!(writer, " {}", id)?;
        }
        writeln!(writer, " }}")?;
    }

    for peer in ring.peers() {
        if let Some(pred) = peer.predecessor() {
            writeln!(
                writer,
                "\t{} -> {} [style=dashed];",
                peer.id(),
                ring.peer(pred).id()
            )?;
        }
    }

    writeln!(writer, "}}")
}

/// Write `ring` in Simple Interaction Format, one `id link ...` line per peer
pub fn write_sif<W: Write>(writer: &mut W, ring: &Ring, multigraph: bool) -> io::Result<()> {
    for peer in ring.peers() {
        write!(writer, "{} link", peer.id())?;
        for id in neighbours(ring, peer, multigraph) {
            write!(writer, " {}", id)?;
        }
        writeln!(writer)?;
    }

    Ok(())
}
