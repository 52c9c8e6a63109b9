use super::CandidateDistribution;

/// Shannon entropy of the distribution in bits. Empty and single-candidate
/// distributions both yield zero.
pub fn entropy(dist: &CandidateDistribution) -> f64 {
    entropy_of(dist.iter().map(|(_, weight)| weight))
}

/// Entropy in bits of the distribution obtained by normalizing `weights`.
/// Non-positive weights are ignored.
pub fn entropy_of<I>(weights: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let weights: Vec<f64> = weights.into_iter().filter(|w| *w > 0.0).collect();
    let total: f64 = weights.iter().sum();
    if weights.len() <= 1 || total <= 0.0 {
        return 0.0;
    }
    let bits: f64 = weights
        .iter()
        .map(|weight| {
            let p = weight / total;
            -p * p.log2()
        })
        .sum();
    bits.max(0.0)
}
