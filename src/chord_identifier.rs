//! Identifier space
//!
//! Modular arithmetic over an m-bit ring. Every identifier, whether it names
//! a peer or a lookup key, lives in `[0, 2^bits)`. The space is a plain value
//! that gets passed to whatever needs it, so identifiers minted under one
//! modulus are never silently compared against another.

use crate::chord_interface::{ConfigurationError, Identifier, MAX_BITS};

/// An m-bit circular identifier space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentifierSpace {
    bits: u32,
    mask: u64,
}

impl IdentifierSpace {
    /// Create a space with modulus `2^bits`
    ///
    /// # Example
    /// ```
    /// use chord_sim::chord_identifier::IdentifierSpace;
    ///
    /// let space = IdentifierSpace::new(3).unwrap();
    /// assert_eq!(space.add(6, 3), 1);
    /// assert!(IdentifierSpace::new(0).is_err());
    /// ```
    pub fn new(bits: u32) -> Result<Self, ConfigurationError> {
        if bits == 0 || bits > MAX_BITS {
            return Err(ConfigurationError::InvalidBitLength {
                bits,
                max: MAX_BITS,
            });
        }

        let mask = if bits == MAX_BITS {
            u64::MAX
        } else {
            (1u64 << bits) - 1
        };

        Ok(Self { bits, mask })
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Number of identifiers in the ring (`2^bits`)
    pub fn size(&self) -> u128 {
        1u128 << self.bits
    }

    /// Largest identifier in the ring (`2^bits - 1`)
    pub fn max_identifier(&self) -> Identifier {
        self.mask
    }

    /// True if `id` was minted under this modulus
    pub fn contains(&self, id: Identifier) -> bool {
        id & !self.mask == 0
    }

    /// Reduce an arbitrary integer into the ring
    pub fn identifier(&self, value: u128) -> Identifier {
        (value & self.mask as u128) as Identifier
    }

    /// Derive an identifier by hashing arbitrary bytes
    ///
    /// First 8 bytes of the Blake3 digest, little-endian, truncated to `bits`.
    pub fn from_hash(&self, bytes: &[u8]) -> Identifier {
        let hash = blake3::hash(bytes);
        let mut low = [0u8; 8];
        low.copy_from_slice(&hash.as_bytes()[0..8]);
        u64::from_le_bytes(low) & self.mask
    }

    /// `a + b mod 2^bits`
    pub fn add(&self, a: Identifier, b: Identifier) -> Identifier {
        a.wrapping_add(b) & self.mask
    }

    /// `a - b mod 2^bits`
    pub fn subtract(&self, a: Identifier, b: Identifier) -> Identifier {
        a.wrapping_sub(b) & self.mask
    }

    /// `id + 2^i mod 2^bits`, the position finger `i` is responsible for
    pub fn finger_start(&self, id: Identifier, i: u32) -> Identifier {
        self.add(id, 1u64 << i)
    }

    /// Clockwise distance walking from `from` to `to`
    pub fn distance(&self, from: Identifier, to: Identifier) -> Identifier {
        self.subtract(to, from)
    }

    /// Circular half-open interval test: `x` in `(left, right]`
    ///
    /// Holds iff `0 < x - left <= right - left (mod 2^bits)`. An interval
    /// with `left == right` is empty.
    ///
    /// ```
    /// use chord_sim::chord_identifier::IdentifierSpace;
    ///
    /// let space = IdentifierSpace::new(3).unwrap();
    /// assert!(space.is_between(6, 1, 0)); // wraps through 7 -> 0
    /// assert!(!space.is_between(6, 1, 6));
    /// assert!(!space.is_between(4, 4, 5));
    /// ```
    pub fn is_between(&self, left: Identifier, right: Identifier, x: Identifier) -> bool {
        let gap = self.subtract(x, left);
        gap > 0 && gap <= self.subtract(right, left)
    }
}
