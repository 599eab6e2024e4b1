// all identifiers share one numeric type - the ring modulus decides how many bits are used
pub type Identifier = u64;

// position of a peer inside its ring (non-owning reference)
pub type PeerIndex = usize;

/// Widest ring supported by the `u64` identifier type
pub const MAX_BITS: u32 = 64;

pub const DEFAULT_BITS: u32 = 16;
pub const DEFAULT_NODES: usize = 1024;

/// Precondition violations. Nothing in the core is transient, so none of
/// these are retried: the caller fixes the input and calls again.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("bit length must be in 1..={max}, got {bits}")]
    InvalidBitLength { bits: u32, max: u32 },

    #[error("ring has no peers")]
    EmptyRing,

    #[error("duplicate identifier {0} in ring")]
    DuplicateIdentifier(Identifier),

    #[error("{nodes} nodes do not fit in a {bits}-bit ring")]
    TooManyNodes { nodes: usize, bits: u32 },

    #[error("identifier {id} is outside the {bits}-bit identifier space")]
    ForeignIdentifier { id: Identifier, bits: u32 },

    #[error("builder uses a {builder}-bit space but the ring uses {ring} bits")]
    SpaceMismatch { ring: u32, builder: u32 },

    #[error("no peer with identifier {0} in ring")]
    UnknownPeer(Identifier),

    #[error("peer {0} has no predecessor or an incomplete finger table - build the ring first")]
    Unlinked(Identifier),
}
