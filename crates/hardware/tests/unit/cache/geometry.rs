//! Geometry derivation tests.

use cachesim_core::cache::Geometry;
use cachesim_core::ConfigError;
use rstest::rstest;

#[rstest]
#[case::direct_mapped(1024, 32, 1, 32)]
#[case::two_way(8192, 32, 2, 128)]
#[case::fully_associative(512, 16, 32, 1)]
#[case::single_block(16, 16, 1, 1)]
fn derives_set_count(
    #[case] size: u32,
    #[case] block_size: u32,
    #[case] assoc: u32,
    #[case] sets: u32,
) {
    let geometry = Geometry::from_size(1, size, block_size, assoc).unwrap();
    assert_eq!(geometry.num_sets(), sets);
    assert_eq!(geometry.assoc(), assoc);
    assert_eq!(geometry.block_size(), block_size);
    assert_eq!(geometry.size(), u64::from(size));
    assert_eq!(
        geometry.layout().index_bits() + geometry.layout().offset_bits() + geometry.layout().tag_bits(),
        32
    );
}

#[rstest]
#[case::block_not_power_of_two(1024, 24, 1, "block size must be a non-zero power of two, got 24")]
#[case::zero_block(1024, 0, 1, "block size must be a non-zero power of two, got 0")]
#[case::zero_ways(1024, 32, 0, "L1: associativity must be at least 1")]
#[case::zero_size(0, 32, 1, "L1: size 0 is not a positive multiple")]
#[case::indivisible(1000, 32, 1, "L1: size 1000 is not a positive multiple")]
#[case::three_sets(96, 32, 1, "L1: number of sets (3) must be a power of two")]
fn rejects_bad_shapes(
    #[case] size: u32,
    #[case] block_size: u32,
    #[case] assoc: u32,
    #[case] message: &str,
) {
    let err = Geometry::from_size(1, size, block_size, assoc).unwrap_err();
    assert!(
        err.to_string().starts_with(message),
        "unexpected error: {err}"
    );
}

#[test]
fn rejects_index_and_offset_wider_than_the_address() {
    let err = Geometry::new(3, 1 << 20, 1, 1 << 16).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::AddressWidth {
            level: 3,
            index_bits: 20,
            offset_bits: 16
        }
    ));
}
