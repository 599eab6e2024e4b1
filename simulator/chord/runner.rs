//! Chord lookup simulation runner

use std::collections::VecDeque;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chord_sim::chord_export::{write_dot, write_sif};
use chord_sim::{IdentifierSpace, PeerIndex, Ring, RingBuilder, Router};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::ChordSimConfig;
use super::error::SimError;
use super::generator::{generate_peers, random_key};
use super::stats::{LookupTally, SimResult};

/// Fewest finger-table hops from `from` to `to` (breadth-first over finger edges)
///
/// Every peer reaches every other through its successor chain, so a linked
/// ring always has an answer; `None` means `to` is cut off, as happens when
/// peers on the way carry no links.
pub fn finger_hops(ring: &Ring, from: PeerIndex, to: PeerIndex) -> Option<u64> {
    let mut depth: Vec<Option<u64>> = vec![None; ring.len()];
    let mut queue = VecDeque::new();
    depth[from] = Some(0);
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        let hops = depth[current].unwrap_or(0);
        if current == to {
            return Some(hops);
        }
        for &finger in ring.peer(current).finger_table() {
            if depth[finger].is_none() {
                depth[finger] = Some(hops + 1);
                queue.push_back(finger);
            }
        }
    }

    None
}

/// Chord lookup simulation runner
pub struct ChordRunner {
    config: ChordSimConfig,
    space: IdentifierSpace,
    rng: StdRng,
    seed: [u8; 32],
}

impl ChordRunner {
    /// Create a new runner, validating the configuration
    pub fn new(config: ChordSimConfig) -> Result<Self, SimError> {
        let space = config.validate()?;
        let seed = config.resolve_seed();
        let rng = StdRng::from_seed(seed);

        Ok(Self {
            config,
            space,
            rng,
            seed,
        })
    }

    /// Generate and link the ring
    pub fn build_ring(&mut self) -> Result<Ring, SimError> {
        let peers = generate_peers(&self.space, self.config.nodes, &mut self.rng)?;
        info!("Creating finger tables for {} peers", peers.len());
        Ok(RingBuilder::assemble(self.space, peers)?)
    }

    /// Main simulation loop
    ///
    /// Every iteration measures a freshly generated ring with one lookup per
    /// peer; only the first ring is exported.
    pub fn run(mut self) -> Result<SimResult, SimError> {
        info!(
            "Starting chord simulation: {} bits, {} nodes, {} iteration(s)",
            self.config.bits, self.config.nodes, self.config.iterations
        );

        let mut tally = LookupTally::new();
        let total = self.config.iterations * self.config.nodes;

        for iteration in 0..self.config.iterations {
            let ring = self.build_ring()?;
            if iteration == 0 {
                self.export(&ring)?;
            }

            let router = Router::new(&ring);
            for (index, peer) in ring.peers().iter().enumerate() {
                let key = random_key(&self.space, &mut self.rng);
                let path = router.path_to(peer.id(), key)?;

                let end = path[path.len() - 1];
                let shortest = finger_hops(&ring, index, end).ok_or(SimError::Unreachable {
                    from: peer.id(),
                    to: ring.peer(end).id(),
                })?;
                tally.record(&path, shortest);
            }
            tally.finish_ring(&ring);

            info!(
                "Running simulations: {} of {}",
                (iteration + 1) * ring.len(),
                total
            );
        }

        let result = SimResult {
            seed_used: self.seed,
            lookups: tally.lookups(),
            experiment: tally.into_experiment(self.space.bits(), self.config.nodes, self.config.iterations),
        };

        if let Some(ref path) = self.config.output.log {
            result.append_to_log(path)?;
        }

        Ok(result)
    }

    fn export(&self, ring: &Ring) -> Result<(), SimError> {
        let multigraph = self.config.output.multigraph;

        if let Some(ref path) = self.config.output.dot {
            let mut writer = create(path)?;
            write_dot(&mut writer, ring, multigraph)?;
            info!("DOT graph written to {}", path.display());
        }

        if let Some(ref path) = self.config.output.sif {
            let mut writer = create(path)?;
            write_sif(&mut writer, ring, multigraph)?;
            info!("SIF graph written to {}", path.display());
        }

        Ok(())
    }
}

fn create(path: &Path) -> Result<BufWriter<File>, SimError> {
    Ok(BufWriter::new(File::create(path)?))
}
