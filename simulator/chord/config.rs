//! Configuration for the Chord lookup simulator

use std::path::PathBuf;

use chord_sim::chord_interface::{DEFAULT_BITS, DEFAULT_NODES};
use chord_sim::{ConfigurationError, IdentifierSpace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::error::SimError;

/// Configuration for one simulation run
#[derive(Debug, Clone)]
pub struct ChordSimConfig {
    /// Identifier width; the ring holds `2^bits` positions
    pub bits: u32,

    /// Number of peers placed on the ring
    pub nodes: usize,

    /// Lookups issued per peer
    pub iterations: usize,

    /// Random seed (None = generate random)
    pub seed: Option<[u8; 32]>,

    /// Where to write exports and the experiment log
    pub output: OutputConfig,
}

impl Default for ChordSimConfig {
    fn default() -> Self {
        Self {
            bits: DEFAULT_BITS,
            nodes: DEFAULT_NODES,
            iterations: 1,
            seed: None,
            output: OutputConfig::default(),
        }
    }
}

impl ChordSimConfig {
    /// Get or generate seed
    pub fn resolve_seed(&self) -> [u8; 32] {
        self.seed.unwrap_or_else(|| {
            let mut temp_rng = StdRng::from_entropy();
            let mut seed = [0u8; 32];
            use rand::RngCore;
            temp_rng.fill_bytes(&mut seed);
            seed
        })
    }

    /// Check the parameters before any peer is generated
    pub fn validate(&self) -> Result<IdentifierSpace, SimError> {
        let space = IdentifierSpace::new(self.bits)?;

        if self.nodes == 0 {
            return Err(ConfigurationError::EmptyRing.into());
        }
        if self.nodes as u128 > space.size() {
            return Err(ConfigurationError::TooManyNodes {
                nodes: self.nodes,
                bits: self.bits,
            }
            .into());
        }
        if self.iterations == 0 {
            return Err(SimError::InvalidParameter(
                "iterations must be greater than 0".to_string(),
            ));
        }

        Ok(space)
    }
}

/// Output destinations
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Graphviz export of the finger-table graph
    pub dot: Option<PathBuf>,

    /// SIF export of the finger-table graph
    pub sif: Option<PathBuf>,

    /// JSON experiment log (appended to)
    pub log: Option<PathBuf>,

    /// Keep one edge per finger slot instead of collapsing repeats
    pub multigraph: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dot: None,
            sif: None,
            log: None,
            multigraph: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChordSimConfig::default();

        assert_eq!(config.bits, 16);
        assert_eq!(config.nodes, 1024);
        assert_eq!(config.iterations, 1);
        assert!(config.output.multigraph);
        assert!(config.output.dot.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_seed_keeps_fixed_seed() {
        let config = ChordSimConfig {
            seed: Some([7u8; 32]),
            ..Default::default()
        };

        assert_eq!(config.resolve_seed(), [7u8; 32]);
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        let zero_bits = ChordSimConfig {
            bits: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_bits.validate(),
            Err(SimError::Configuration(ConfigurationError::InvalidBitLength { .. }))
        ));

        let no_nodes = ChordSimConfig {
            nodes: 0,
            ..Default::default()
        };
        assert!(matches!(
            no_nodes.validate(),
            Err(SimError::Configuration(ConfigurationError::EmptyRing))
        ));

        let crowded = ChordSimConfig {
            bits: 3,
            nodes: 9,
            ..Default::default()
        };
        assert!(matches!(
            crowded.validate(),
            Err(SimError::Configuration(ConfigurationError::TooManyNodes { nodes: 9, bits: 3 }))
        ));

        let no_iterations = ChordSimConfig {
            iterations: 0,
            ..Default::default()
        };
        assert!(matches!(
            no_iterations.validate(),
            Err(SimError::InvalidParameter(_))
        ));

        let full = ChordSimConfig {
            bits: 3,
            nodes: 8,
            ..Default::default()
        };
        assert!(full.validate().is_ok());
    }
}
