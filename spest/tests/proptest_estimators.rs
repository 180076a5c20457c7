//! Property tests for the sparsity estimators
//!
//! Closed-form bounds and the agreement of the boolean product kernel with a
//! brute-force reference, using proptest.

use proptest::prelude::*;
use spest::{
    BitsetMatrix, CsrMatrix, EstimError, EstimatorBasicAvg, EstimatorBasicWorst,
    EstimatorBitsetMM, EstimatorConfig, MMNode, MatrixCharacteristics, OpCode, SparsityEstimator,
};
use spest::estimator::CharacteristicsFormula;

const EPS: f64 = 1e-9;

/// Descriptor with the given shape and arbitrary valid non-zero count
fn arb_characteristics_with_dims(rows: u64, cols: u64) -> impl Strategy<Value = MatrixCharacteristics> {
    (0..=rows * cols).prop_map(move |nnz| MatrixCharacteristics::new(rows, cols, nnz))
}

/// Two descriptors of identical shape
fn arb_same_shape_pair() -> impl Strategy<Value = (MatrixCharacteristics, MatrixCharacteristics)> {
    (1u64..40, 1u64..40).prop_flat_map(|(rows, cols)| {
        (
            arb_characteristics_with_dims(rows, cols),
            arb_characteristics_with_dims(rows, cols),
        )
    })
}

/// Two descriptors forming a valid matrix product
fn arb_product_pair() -> impl Strategy<Value = (MatrixCharacteristics, MatrixCharacteristics)> {
    (1u64..50, 1u64..50, 1u64..50).prop_flat_map(|(m, k, n)| {
        (arb_characteristics_with_dims(m, k), arb_characteristics_with_dims(k, n))
    })
}

/// Random existence pattern of a matrix with the given shape
fn arb_pattern(rows: usize, cols: usize) -> impl Strategy<Value = CsrMatrix> {
    proptest::collection::vec((0..rows, 0..cols), 0..(rows * cols).min(120))
        .prop_map(move |positions| CsrMatrix::from_pattern(rows, cols, &positions))
}

/// Two patterns forming a valid matrix product
fn arb_pattern_pair() -> impl Strategy<Value = (CsrMatrix, CsrMatrix)> {
    (1usize..24, 1usize..140, 1usize..140)
        .prop_flat_map(|(m, k, n)| (arb_pattern(m, k), arb_pattern(k, n)))
}

fn forced_parallel() -> EstimatorConfig {
    EstimatorConfig::default()
        .with_build_parallel_threshold(0)
        .with_multiply_parallel_threshold(0)
        .with_block_sizes(3, 5, 64)
}

// ============================================================================
// Closed-form estimators
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Average-case output sparsity stays within [0, 1]
    #[test]
    fn avg_sparsity_in_unit_interval(
        (a, b) in arb_same_shape_pair(),
        (x, y) in arb_product_pair(),
    ) {
        let est = EstimatorBasicAvg::new();
        for op in [OpCode::Mult, OpCode::Plus] {
            let sp = est.estimate_intern(&a, Some(&b), op).unwrap().sparsity();
            prop_assert!((0.0..=1.0).contains(&sp));
        }
        let sp = est.estimate_intern(&x, Some(&y), OpCode::Mm).unwrap().sparsity();
        prop_assert!((0.0..=1.0).contains(&sp));
    }

    /// PLUS never estimates below either input, MULT never above
    #[test]
    fn avg_elementwise_bounds((a, b) in arb_same_shape_pair()) {
        let est = EstimatorBasicAvg::new();
        let plus = est.estimate_intern(&a, Some(&b), OpCode::Plus).unwrap().sparsity();
        let mult = est.estimate_intern(&a, Some(&b), OpCode::Mult).unwrap().sparsity();
        prop_assert!(plus + EPS >= a.sparsity().max(b.sparsity()));
        prop_assert!(mult <= a.sparsity().min(b.sparsity()) + EPS);
    }

    /// PLUS is non-decreasing in its right input
    #[test]
    fn avg_plus_monotone(
        (a, b) in arb_same_shape_pair(),
        extra in 0u64..100,
    ) {
        let est = EstimatorBasicAvg::new();
        let denser = MatrixCharacteristics::new(b.rows(), b.cols(), (b.nnz() + extra).min(b.cells()));
        let low = est.estimate_intern(&a, Some(&b), OpCode::Plus).unwrap();
        let high = est.estimate_intern(&a, Some(&denser), OpCode::Plus).unwrap();
        prop_assert!(low.sparsity() <= high.sparsity() + EPS);
    }

    /// Worst-case MM bounds the average case, and both agree on outer products
    #[test]
    fn worst_bounds_avg_mm((a, b) in arb_product_pair()) {
        let avg = EstimatorBasicAvg::new().estimate_intern(&a, Some(&b), OpCode::Mm).unwrap();
        let worst = EstimatorBasicWorst::new().estimate_intern(&a, Some(&b), OpCode::Mm).unwrap();
        prop_assert_eq!((avg.rows(), avg.cols()), (worst.rows(), worst.cols()));
        prop_assert!(worst.nnz() >= avg.nnz(), "worst {} < avg {}", worst, avg);
        if a.cols() == 1 {
            prop_assert_eq!(worst, avg);
        }
    }

    /// Worst-case elementwise results match their closed forms
    #[test]
    fn worst_elementwise((a, b) in arb_same_shape_pair()) {
        let est = EstimatorBasicWorst::new();
        let mult = est.estimate_intern(&a, Some(&b), OpCode::Mult).unwrap();
        prop_assert!(mult.nnz() <= a.nnz().max(b.nnz()));
        let plus = est.estimate_intern(&a, Some(&b), OpCode::Plus).unwrap();
        prop_assert!(plus.nnz() + 1 >= a.nnz().max(b.nnz()));
        prop_assert!(plus.nnz() <= plus.cells());
    }

    /// Exact metadata operations agree across both closed-form estimators
    #[test]
    fn exact_metadata_shared((a, b) in arb_same_shape_pair()) {
        let avg = EstimatorBasicAvg::new();
        let worst = EstimatorBasicWorst::new();
        for op in OpCode::ALL.into_iter().filter(OpCode::is_exact_metadata) {
            let right = op.is_binary().then_some(&b);
            prop_assert_eq!(
                avg.estimate_intern(&a, right, op),
                worst.estimate_intern(&a, right, op)
            );
        }
    }
}

// ============================================================================
// Boolean matrix kernel
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Every non-zero position is set, every other position clear
    #[test]
    fn build_round_trip(matrix in (1usize..30, 1usize..200).prop_flat_map(|(r, c)| arb_pattern(r, c))) {
        let bits = BitsetMatrix::from_block(&matrix, &EstimatorConfig::default());
        let expected: Vec<_> = matrix.iter().map(|(r, c, _)| (r, c)).collect();
        prop_assert_eq!(bits.iter_set().collect::<Vec<_>>(), expected.clone());
        prop_assert_eq!(bits.nnz(), expected.len() as u64);
        prop_assert_eq!(bits.count_ones(), bits.nnz());
    }

    /// Boolean product equals the brute-force triple loop
    #[test]
    fn multiply_matches_brute_force((a, b) in arb_pattern_pair()) {
        let config = EstimatorConfig::sequential().with_block_sizes(4, 7, 64);
        let a_bits = BitsetMatrix::from_block(&a, &config);
        let b_bits = BitsetMatrix::from_block(&b, &config);
        let c = a_bits.multiply(&b_bits, &config).unwrap();

        let mut expected = Vec::new();
        for i in 0..a_bits.nrows() {
            for j in 0..b_bits.ncols() {
                if (0..a_bits.ncols()).any(|t| a.get(i, t).is_some() && b.get(t, j).is_some()) {
                    expected.push((i, j));
                }
            }
        }
        prop_assert_eq!(c.iter_set().collect::<Vec<_>>(), expected.clone());
        prop_assert_eq!(c.nnz(), expected.len() as u64);
    }

    /// Sequential and parallel paths give bit-identical products
    #[test]
    fn parallel_matches_sequential((a, b) in arb_pattern_pair()) {
        let sequential = EstimatorConfig::sequential();
        let parallel = forced_parallel();

        let seq = BitsetMatrix::from_block(&a, &sequential)
            .multiply(&BitsetMatrix::from_block(&b, &sequential), &sequential)
            .unwrap();
        let par = BitsetMatrix::from_block(&a, &parallel)
            .multiply(&BitsetMatrix::from_block(&b, &parallel), &parallel)
            .unwrap();
        prop_assert_eq!(seq, par);
    }

    /// The exact estimator never exceeds the worst-case bound
    #[test]
    fn exact_within_worst_case((a, b) in arb_pattern_pair()) {
        let mut root = MMNode::mm(MMNode::leaf(&a), MMNode::leaf(&b));
        let exact = EstimatorBitsetMM::new().estimate(&mut root).unwrap();
        let worst = EstimatorBasicWorst::new().estimate(&mut root).unwrap();
        prop_assert!(root.synopsis().is_none());
        prop_assert!(exact.nnz() <= worst.nnz(), "exact {} > worst {}", exact, worst);
    }

    /// Non-MM operations are rejected by the exact estimator
    #[test]
    fn bitset_rejects_non_mm(
        op in proptest::sample::select(OpCode::ALL.to_vec()),
        (a, b) in arb_pattern_pair(),
    ) {
        let est = EstimatorBitsetMM::new();
        let mut root = MMNode::binary(op, MMNode::leaf(&a), MMNode::leaf(&b));
        let result = est.estimate(&mut root);
        if op == OpCode::Mm {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(result, Err(EstimError::UnsupportedOperation { op }));
            prop_assert!(root.characteristics().is_none());
            prop_assert!(root.synopsis().is_none());
        }
    }
}
