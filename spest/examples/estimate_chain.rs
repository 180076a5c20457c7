//! Compare the estimators on a random matrix product chain
//!
//! Builds `A x B x C` over random sparse matrices and prints the
//! average-case, worst-case and exact output sparsity of the chain.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spest::{
    CsrMatrix, Estimator, EstimatorConfig, MMNode, SparsityEstimator, Synopsis,
};
use std::time::Instant;

fn random_matrix(rng: &mut StdRng, nrows: usize, ncols: usize, sparsity: f64) -> CsrMatrix {
    let nnz = (nrows as f64 * ncols as f64 * sparsity) as usize;
    let positions: Vec<(usize, usize)> = (0..nnz)
        .map(|_| (rng.gen_range(0..nrows), rng.gen_range(0..ncols)))
        .collect();
    CsrMatrix::from_pattern(nrows, ncols, &positions)
}

fn chain<'a>(a: &'a CsrMatrix, b: &'a CsrMatrix, c: &'a CsrMatrix) -> MMNode<'a> {
    MMNode::mm(MMNode::mm(MMNode::leaf(a), MMNode::leaf(b)), MMNode::leaf(c))
}

fn main() -> spest::Result<()> {
    println!("Sparsity Estimation - Matrix Product Chain");

    let mut rng = StdRng::seed_from_u64(42);
    let a = random_matrix(&mut rng, 2_000, 1_500, 0.001);
    let b = random_matrix(&mut rng, 1_500, 3_000, 0.002);
    let c = random_matrix(&mut rng, 3_000, 500, 0.01);
    println!("A: 2000x1500, B: 1500x3000, C: 3000x500");

    let config = EstimatorConfig::default();
    let estimators = [
        Estimator::basic_avg(config.clone()),
        Estimator::basic_worst(config.clone()),
        Estimator::bitset_mm(config),
    ];

    for estimator in &estimators {
        let mut root = chain(&a, &b, &c);
        let start = Instant::now();
        let out = estimator.estimate(&mut root)?;
        let elapsed = start.elapsed();

        println!(
            "\n{:<12} {} sparsity={:.6} ({:.3} ms)",
            estimator.name(),
            out,
            out.sparsity(),
            elapsed.as_secs_f64() * 1000.0
        );
        if let Some(inner) = root.left().and_then(|n| n.characteristics()) {
            println!("  A x B: {inner} sparsity={:.6}", inner.sparsity());
        }
        if let Some(bits) = root.synopsis().and_then(Synopsis::as_bitset) {
            println!("  boolean product holds {} set bits", bits.count_ones());
        }
    }

    // Pairwise entry point, defaults to MM
    let sp = estimators[2].estimate_pair(&a, &b)?;
    println!("\nExact A x B sparsity via estimate_pair: {sp:.6}");

    Ok(())
}
