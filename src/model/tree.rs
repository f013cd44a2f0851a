//! Single CART decision tree.
//!
//! Splits minimize weighted Gini impurity over a random subset of features.
//! Leaves store the normalized weighted class distribution of the samples
//! that reached them, so the forest can average probabilities rather than
//! hard votes.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Tree node: either an internal split or a leaf distribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    Leaf {
        /// Probability per class, indexed by the forest's label ordering
        distribution: Vec<f32>,
    },
    Split {
        feature: usize,
        threshold: f32,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A fitted decision tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    root: Node,
}

/// Everything a tree needs to fit itself on a bootstrap sample.
///
/// Rows are shared across all trees of a forest; each tree sees its own
/// index multiset.
pub(crate) struct FitContext<'a> {
    /// Feature rows
    pub x: &'a [&'a [f32]],
    /// Class index per row
    pub y: &'a [usize],
    /// Per-row sample weight (class-balanced)
    pub weights: &'a [f64],
    pub num_classes: usize,
    pub num_features: usize,
    /// Features considered per split (sqrt of the feature count)
    pub features_per_split: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
}

impl DecisionTree {
    /// Fit a tree on the given sample indices (a bootstrap multiset)
    pub(crate) fn fit(ctx: &FitContext<'_>, indices: Vec<usize>, rng: &mut StdRng) -> Self {
        let root = build_node(ctx, indices, 0, rng);
        DecisionTree { root }
    }

    /// Class probability distribution for one feature row
    pub fn predict_distribution(&self, x: &[f32]) -> &[f32] {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { distribution } => return distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if x[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

fn build_node(ctx: &FitContext<'_>, indices: Vec<usize>, depth: usize, rng: &mut StdRng) -> Node {
    let counts = weighted_class_counts(ctx, &indices);
    let present = counts.iter().filter(|&&c| c > 0.0).count();

    if present <= 1 || indices.len() < ctx.min_samples_split || depth >= ctx.max_depth {
        return leaf(&counts);
    }

    let split = match best_split(ctx, &indices, rng) {
        Some(split) => split,
        // All candidate features constant over this node
        None => return leaf(&counts),
    };

    let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
        .into_iter()
        .partition(|&i| ctx.x[i][split.feature] <= split.threshold);

    // A valid split always separates at least one sample to each side
    let left = build_node(ctx, left_idx, depth + 1, rng);
    let right = build_node(ctx, right_idx, depth + 1, rng);

    Node::Split {
        feature: split.feature,
        threshold: split.threshold,
        left: Box::new(left),
        right: Box::new(right),
    }
}

struct SplitCandidate {
    feature: usize,
    threshold: f32,
}

/// Find the split minimizing weighted Gini impurity over a random feature
/// subset. Returns None if every candidate feature is constant.
fn best_split(
    ctx: &FitContext<'_>,
    indices: &[usize],
    rng: &mut StdRng,
) -> Option<SplitCandidate> {
    let mut features: Vec<usize> = (0..ctx.num_features).collect();
    features.shuffle(rng);
    features.truncate(ctx.features_per_split);

    let mut best: Option<(f64, SplitCandidate)> = None;

    for &feature in &features {
        // Sort this node's samples by the candidate feature; index as a
        // tiebreak keeps the ordering fully deterministic
        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_by(|&a, &b| {
            ctx.x[a][feature]
                .partial_cmp(&ctx.x[b][feature])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });

        let total = weighted_class_counts(ctx, &sorted);
        let total_weight: f64 = total.iter().sum();

        let mut left = vec![0.0_f64; ctx.num_classes];
        let mut left_weight = 0.0_f64;

        for window in 0..sorted.len() - 1 {
            let i = sorted[window];
            left[ctx.y[i]] += ctx.weights[i];
            left_weight += ctx.weights[i];

            let value = ctx.x[i][feature];
            let next_value = ctx.x[sorted[window + 1]][feature];
            if next_value <= value {
                continue;
            }

            let right_weight = total_weight - left_weight;
            let right: Vec<f64> = total
                .iter()
                .zip(left.iter())
                .map(|(t, l)| t - l)
                .collect();

            let impurity = left_weight * gini(&left, left_weight)
                + right_weight * gini(&right, right_weight);

            let threshold = (value + next_value) / 2.0;
            let candidate = SplitCandidate { feature, threshold };

            match &best {
                Some((best_impurity, _)) if impurity >= *best_impurity => {}
                _ => best = Some((impurity, candidate)),
            }
        }
    }

    best.map(|(_, candidate)| candidate)
}

/// Gini impurity of a weighted class count vector
fn gini(counts: &[f64], total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    1.0 - counts
        .iter()
        .map(|c| {
            let p = c / total;
            p * p
        })
        .sum::<f64>()
}

fn weighted_class_counts(ctx: &FitContext<'_>, indices: &[usize]) -> Vec<f64> {
    let mut counts = vec![0.0_f64; ctx.num_classes];
    for &i in indices {
        counts[ctx.y[i]] += ctx.weights[i];
    }
    counts
}

fn leaf(counts: &[f64]) -> Node {
    let total: f64 = counts.iter().sum();
    let distribution = if total > 0.0 {
        counts.iter().map(|c| (c / total) as f32).collect()
    } else {
        vec![0.0; counts.len()]
    };
    Node::Leaf { distribution }
}

// ============================================================================
// Tests
// ============================================================================
