//! Address decomposition.
//!
//! Splits a 32-bit address into `tag | index | offset` for a given block size and
//! set count, and rebuilds block-aligned addresses from a stored `(tag, index)`
//! pair. The rebuild is what lets an evicting level tell the next level which
//! block it is writing back.
//!
//! ```text
//!  31                                            0
//! +----------------+----------------+--------------+
//! |      tag       |     index      |    offset    |
//! +----------------+----------------+--------------+
//!    tag_bits         index_bits       offset_bits
//! ```

/// Width of every simulated address, in bits.
pub const ADDRESS_WIDTH: u32 = 32;

/// Bit layout of an address for one cache level.
///
/// Pure integer arithmetic; holds no cache state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressLayout {
    offset_bits: u32,
    index_bits: u32,
    tag_bits: u32,
}

/// Mask covering the low `bits` bits of a `u32`.
#[inline(always)]
fn low_mask(bits: u32) -> u32 {
    if bits >= ADDRESS_WIDTH {
        u32::MAX
    } else {
        (1 << bits) - 1
    }
}

impl AddressLayout {
    /// Creates a layout from field widths.
    ///
    /// Returns `None` if `offset_bits + index_bits` exceeds [`ADDRESS_WIDTH`],
    /// or if the offset alone takes the whole address.
    pub fn new(offset_bits: u32, index_bits: u32) -> Option<Self> {
        if offset_bits >= ADDRESS_WIDTH {
            return None;
        }
        let used = offset_bits.checked_add(index_bits)?;
        let tag_bits = ADDRESS_WIDTH.checked_sub(used)?;
        Some(Self {
            offset_bits,
            index_bits,
            tag_bits,
        })
    }

    /// Creates a layout for `block_size`-byte blocks spread over `num_sets` sets.
    ///
    /// Both arguments must be powers of two; returns `None` otherwise, or if the
    /// combined width does not fit in an address.
    pub fn for_geometry(block_size: u32, num_sets: u32) -> Option<Self> {
        if !block_size.is_power_of_two() || !num_sets.is_power_of_two() {
            return None;
        }
        Self::new(block_size.trailing_zeros(), num_sets.trailing_zeros())
    }

    /// Number of block-offset bits.
    pub fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Number of set-index bits.
    pub fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Number of tag bits.
    pub fn tag_bits(&self) -> u32 {
        self.tag_bits
    }

    /// Extracts the set index of `addr`.
    #[inline(always)]
    pub fn index(&self, addr: u32) -> u32 {
        (addr >> self.offset_bits) & low_mask(self.index_bits)
    }

    /// Extracts the tag of `addr`.
    #[inline(always)]
    pub fn tag(&self, addr: u32) -> u32 {
        addr.checked_shr(self.offset_bits + self.index_bits)
            .unwrap_or(0)
            & low_mask(self.tag_bits)
    }

    /// Extracts the byte offset of `addr` within its block.
    #[inline(always)]
    pub fn offset(&self, addr: u32) -> u32 {
        addr & low_mask(self.offset_bits)
    }

    /// Rebuilds the block-aligned base address from a stored tag and its set index.
    #[inline(always)]
    pub fn block_address(&self, tag: u32, index: u32) -> u32 {
        let tag_part = tag
            .checked_shl(ADDRESS_WIDTH - self.tag_bits)
            .unwrap_or(0);
        tag_part | (index << self.offset_bits)
    }

    /// Clears the block-offset bits of `addr`.
    #[inline(always)]
    pub fn block_align(&self, addr: u32) -> u32 {
        addr & !low_mask(self.offset_bits)
    }
}
