//! Cross-node consistency check.
//!
//! Pure comparison of the consensus attributes the two nodes report for
//! the same chain order. The first disagreement found is returned; the
//! attributes are checked in a fixed sequence (order, hash, validity,
//! color) so identical divergences always surface the same way.

use chaindiff_types::AnnotatedBlock;

use crate::ConsistencyError;

/// Compare the blocks both nodes report for one chain order.
///
/// Returns `Ok(())` when every compared attribute agrees. The blue/red
/// classification is compared as an opaque code; no meaning is attached
/// to individual values.
pub fn check_consistency(
    release: &AnnotatedBlock,
    test: &AnnotatedBlock,
) -> Result<(), ConsistencyError> {
    if release.order != test.order {
        return Err(ConsistencyError::OrderMismatch {
            release: release.order,
            test: test.order,
        });
    }
    if release.hash != test.hash {
        return Err(ConsistencyError::HashMismatch {
            order: release.order,
            release: release.hash.clone(),
            test: test.hash.clone(),
        });
    }
    if release.transactions_valid != test.transactions_valid {
        return Err(ConsistencyError::ValidityMismatch {
            order: release.order,
            release: release.transactions_valid,
            test: test.transactions_valid,
        });
    }
    if release.is_blue != test.is_blue {
        return Err(ConsistencyError::ColorMismatch {
            order: release.order,
            release: release.is_blue,
            test: test.is_blue,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(order: u64, hash: &str, valid: bool, is_blue: i32) -> AnnotatedBlock {
        AnnotatedBlock {
            id: order,
            order,
            hash: hash.into(),
            transactions_valid: valid,
            is_blue,
            confirmations: 1000,
            transactions: vec![],
        }
    }

    #[test]
    fn identical_blocks_agree() {
        let a = block(5, "h5", true, 1);
        assert_eq!(check_consistency(&a, &a.clone()), Ok(()));
    }

    #[test]
    fn order_mismatch_wins_over_later_attributes() {
        let release = block(5, "h5", true, 1);
        let test = block(6, "h6", false, 0);
        assert_eq!(
            check_consistency(&release, &test),
            Err(ConsistencyError::OrderMismatch {
                release: 5,
                test: 6
            })
        );
    }

    #[test]
    fn hash_mismatch_reported_with_both_hashes() {
        let release = block(5, "h5", true, 1);
        let test = block(5, "h5'", true, 1);
        assert_eq!(
            check_consistency(&release, &test),
            Err(ConsistencyError::HashMismatch {
                order: 5,
                release: "h5".into(),
                test: "h5'".into(),
            })
        );
    }

    #[test]
    fn validity_and_color_mismatches_detected() {
        let release = block(5, "h5", true, 1);

        let validity = block(5, "h5", false, 1);
        assert!(matches!(
            check_consistency(&release, &validity),
            Err(ConsistencyError::ValidityMismatch { order: 5, .. })
        ));

        let color = block(5, "h5", true, 2);
        assert_eq!(
            check_consistency(&release, &color),
            Err(ConsistencyError::ColorMismatch {
                order: 5,
                release: 1,
                test: 2,
            })
        );
    }

    #[test]
    fn comparison_ignores_node_local_fields() {
        let release = block(5, "h5", true, 1);
        let mut test = block(5, "h5", true, 1);
        test.id = 99;
        test.confirmations = 721;
        assert_eq!(check_consistency(&release, &test), Ok(()));
    }
}
