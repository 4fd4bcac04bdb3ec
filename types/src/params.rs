//! Protocol constants consumed by the verification engine.

/// Per-block subsidy in base units — the block reward component of the
/// coinbase that is not derived from fees.
pub const BLOCK_SUBSIDY: u64 = 12_000_000_000;

/// Total value minted by the genesis block, in base units.
pub const GENESIS_ALLOTMENT: u64 = 6_524_293_004_366_634;

/// How many blocks must be stacked on top of a block before a producer
/// trusts its contents (reorg-safety margin).
pub const CONFIRMATION_DEPTH: u32 = 720;

/// Expected circulating supply after `blocks_verified` blocks: the genesis
/// allotment plus one subsidy per non-genesis block.
pub fn expected_supply(blocks_verified: u64) -> u64 {
    blocks_verified.saturating_sub(1) * BLOCK_SUBSIDY + GENESIS_ALLOTMENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_supply_counts_subsidy_per_non_genesis_block() {
        assert_eq!(expected_supply(1), GENESIS_ALLOTMENT);
        assert_eq!(expected_supply(3), 2 * BLOCK_SUBSIDY + GENESIS_ALLOTMENT);
    }

    #[test]
    fn expected_supply_of_zero_blocks_does_not_underflow() {
        assert_eq!(expected_supply(0), GENESIS_ALLOTMENT);
    }
}
