//! Similarity primitives shared by the filters and the evaluator.
//!
//! All functions are pure. Rating-map variants only look at the keys both
//! maps share, and iterate them in key order so that swapping the arguments
//! yields bit-identical results.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Fewest co-rated items for two raters to be comparable
pub const MIN_COMMON_ITEMS: usize = 2;

/// User-to-user similarity measure
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMetric {
    #[default]
    Pearson,
    Cosine,
}

impl SimilarityMetric {
    pub fn compute<K, V>(&self, a: &HashMap<K, V>, b: &HashMap<K, V>) -> f64
    where
        K: Eq + Hash + Ord,
        V: Copy + Into<f64>,
    {
        match self {
            SimilarityMetric::Pearson => pearson(a, b),
            SimilarityMetric::Cosine => cosine(a, b),
        }
    }
}

/// Pairs of values on the keys present in both maps, ordered by key
fn common_pairs<K, V>(a: &HashMap<K, V>, b: &HashMap<K, V>) -> Vec<(f64, f64)>
where
    K: Eq + Hash + Ord,
    V: Copy + Into<f64>,
{
    let mut keys: Vec<&K> = a.keys().filter(|k| b.contains_key(*k)).collect();
    keys.sort();

    keys.into_iter()
        .map(|k| (a[k].into(), b[k].into()))
        .collect()
}

/// Pearson correlation over co-rated items
///
/// Means are taken over the common items only. Returns 0.0 with fewer than
/// [`MIN_COMMON_ITEMS`] in common, or when either side has zero variance.
pub fn pearson<K, V>(a: &HashMap<K, V>, b: &HashMap<K, V>) -> f64
where
    K: Eq + Hash + Ord,
    V: Copy + Into<f64>,
{
    let pairs = common_pairs(a, b);
    if pairs.len() < MIN_COMMON_ITEMS {
        return 0.0;
    }

    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance_a = 0.0;
    let mut variance_b = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_a;
        let dy = y - mean_b;
        covariance += dx * dy;
        variance_a += dx * dx;
        variance_b += dy * dy;
    }

    if variance_a == 0.0 || variance_b == 0.0 {
        return 0.0;
    }

    (covariance / (variance_a.sqrt() * variance_b.sqrt())).clamp(-1.0, 1.0)
}

/// Cosine similarity over co-rated items
///
/// Same overlap rule as [`pearson`]; 0.0 when either vector has zero norm.
pub fn cosine<K, V>(a: &HashMap<K, V>, b: &HashMap<K, V>) -> f64
where
    K: Eq + Hash + Ord,
    V: Copy + Into<f64>,
{
    let pairs = common_pairs(a, b);
    if pairs.len() < MIN_COMMON_ITEMS {
        return 0.0;
    }

    let dot: f64 = pairs.iter().map(|(x, y)| x * y).sum();
    let norm_a = pairs.iter().map(|(x, _)| x * x).sum::<f64>().sqrt();
    let norm_b = pairs.iter().map(|(_, y)| y * y).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// `|A ∩ B| / |A ∪ B|`
///
/// Two empty sets give 0.0; callers that need a different convention check
/// for emptiness first.
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;

    if union == 0 {
        return 0.0;
    }

    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings(pairs: &[(u32, u8)]) -> HashMap<u32, u8> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_pearson_hand_computed() {
        // means over common items: a = 4, b = 11/3 -> r = sqrt(3) / 2
        let a = ratings(&[(1, 5), (2, 4), (3, 3)]);
        let b = ratings(&[(1, 5), (2, 5), (3, 1)]);

        let r = pearson(&a, &b);
        assert!((r - 3f64.sqrt() / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_is_symmetric() {
        let cases = [
            (
                ratings(&[(1, 5), (2, 4), (3, 3), (7, 1)]),
                ratings(&[(1, 5), (2, 5), (3, 1), (9, 2)]),
            ),
            (
                ratings(&[(4, 2), (5, 3), (6, 5), (8, 4)]),
                ratings(&[(4, 1), (5, 4), (6, 4), (8, 5)]),
            ),
        ];

        for (a, b) in &cases {
            assert_eq!(pearson(a, b), pearson(b, a));
            assert_eq!(cosine(a, b), cosine(b, a));
        }
    }

    #[test]
    fn test_pearson_uses_common_items_only() {
        // Extra ratings outside the overlap must not shift the means
        let a = ratings(&[(1, 1), (2, 3), (3, 5), (10, 5), (11, 5)]);
        let b = ratings(&[(1, 2), (2, 3), (3, 4), (20, 1)]);
        assert!((pearson(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fewer_than_two_common_items_is_zero() {
        let a = ratings(&[(1, 5), (2, 4)]);
        let b = ratings(&[(1, 5), (3, 1)]);
        assert_eq!(pearson(&a, &b), 0.0);
        assert_eq!(cosine(&a, &b), 0.0);

        let empty = ratings(&[]);
        assert_eq!(pearson(&a, &empty), 0.0);
    }

    #[test]
    fn test_pearson_zero_variance_is_zero() {
        let flat = ratings(&[(1, 3), (2, 3), (3, 3)]);
        let varied = ratings(&[(1, 1), (2, 3), (3, 5)]);
        assert_eq!(pearson(&flat, &varied), 0.0);
    }

    #[test]
    fn test_pearson_perfect_negative_correlation() {
        let a = ratings(&[(1, 1), (2, 2), (3, 3)]);
        let b = ratings(&[(1, 5), (2, 4), (3, 3)]);
        assert!((pearson(&a, &b) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_outputs_within_unit_band() {
        let a = ratings(&[(1, 5), (2, 1), (3, 4), (4, 2), (5, 5)]);
        let b = ratings(&[(1, 4), (2, 2), (3, 5), (4, 1), (5, 3)]);
        for value in [pearson(&a, &b), cosine(&a, &b)] {
            assert!((-1.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn test_cosine_identical_vectors() {
        let a = ratings(&[(1, 2), (2, 4), (3, 1)]);
        assert!((cosine(&a, &a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_metric_dispatch() {
        let a = ratings(&[(1, 5), (2, 4), (3, 3)]);
        let b = ratings(&[(1, 5), (2, 5), (3, 1)]);
        assert_eq!(SimilarityMetric::Pearson.compute(&a, &b), pearson(&a, &b));
        assert_eq!(SimilarityMetric::Cosine.compute(&a, &b), cosine(&a, &b));
    }

    #[test]
    fn test_jaccard() {
        let a: HashSet<&str> = ["drama", "crime"].into_iter().collect();
        let b: HashSet<&str> = ["crime", "thriller", "action"].into_iter().collect();
        assert!((jaccard(&a, &b) - 0.25).abs() < 1e-12);
        assert_eq!(jaccard(&a, &a), 1.0);

        let empty: HashSet<&str> = HashSet::new();
        assert_eq!(jaccard(&empty, &empty), 0.0);
    }
}
