//! Relevance normalisation helpers.

/// Map a raw cross-encoder logit into (0, 1).
///
/// Fusion multiplies relevance by a confidence in (0, 1], which only
/// penalizes deep inference when relevance is positive.
pub fn logistic(score: f64) -> f64 {
    1.0 / (1.0 + (-score).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logistic_range() {
        assert!((logistic(0.0) - 0.5).abs() < 1e-12);
        assert!(logistic(-8.0) > 0.0);
        assert!(logistic(8.0) < 1.0);
        assert!(logistic(2.0) > logistic(1.0));
    }
}
