//! Isolation forest over {quantity, amount collected}
//!
//! Random axis-aligned splits isolate outliers in fewer steps than typical
//! points. The forest is rebuilt on every call from a fixed seed, so identical
//! ledgers always produce identical flags. Tree height is capped at
//! `ceil(log2(subsample))`, which bounds the work per call.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::AnomalyModel;
use crate::models::{AnomalyFlag, AnomalyOutcome, Order};

/// Reason attached to statistical outliers
pub const REASON_STATISTICAL_OUTLIER: &str = "Statistical outlier";

/// Fewest orders the forest will score
pub const MIN_SAMPLES: usize = 2;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

type Features = [f64; 2];

/// Multivariate outlier model with a configured contamination fraction.
///
/// The forest is fit on the detection window, so the window is the peer population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolationForest {
    pub n_trees: usize,
    /// Upper bound on the per-tree subsample size
    pub max_samples: usize,
    /// Expected fraction of anomalous orders, in (0, 0.5]
    pub contamination: f64,
    pub seed: u64,
}

impl Default for IsolationForest {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_samples: 256,
            contamination: 0.1,
            seed: 42,
        }
    }
}

#[derive(Debug)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// Average path length of an unsuccessful search in a binary tree of `n` points
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

fn build_tree(
    rng: &mut StdRng,
    data: &[Features],
    indices: Vec<usize>,
    depth: usize,
    height_limit: usize,
) -> Node {
    if depth >= height_limit || indices.len() <= 1 {
        return Node::Leaf {
            size: indices.len(),
        };
    }

    // Only features that still vary inside this node can split it
    let ranges: Vec<(usize, f64, f64)> = (0..2)
        .filter_map(|feature| {
            let (min, max) = indices.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &i| {
                (lo.min(data[i][feature]), hi.max(data[i][feature]))
            });
            (min < max).then_some((feature, min, max))
        })
        .collect();

    if ranges.is_empty() {
        return Node::Leaf {
            size: indices.len(),
        };
    }

    let (feature, min, max) = ranges[rng.gen_range(0..ranges.len())];
    let threshold = rng.gen_range(min..max);
    let (left, right): (Vec<usize>, Vec<usize>) =
        indices.into_iter().partition(|&i| data[i][feature] < threshold);

    Node::Split {
        feature,
        threshold,
        left: Box::new(build_tree(rng, data, left, depth + 1, height_limit)),
        right: Box::new(build_tree(rng, data, right, depth + 1, height_limit)),
    }
}

fn path_length(node: &Node, point: &Features, depth: f64) -> f64 {
    match node {
        Node::Leaf { size } => depth + average_path_length(*size),
        Node::Split {
            feature,
            threshold,
            left,
            right,
        } => {
            let next = if point[*feature] < *threshold { left } else { right };
            path_length(next, point, depth + 1.0)
        }
    }
}

/// Percentile of sorted values with linear interpolation, `q` in [0, 1]
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (rank - lower as f64)
}

impl IsolationForest {
    fn features(order: &Order) -> Features {
        [
            f64::from(order.quantity),
            order.amount_collected.to_f64().unwrap_or(0.0),
        ]
    }

    fn contamination(&self) -> f64 {
        if self.contamination.is_finite() {
            self.contamination.clamp(f64::EPSILON, 0.5)
        } else {
            0.1
        }
    }

    /// Anomaly score per point in (0, 1]; higher is more anomalous
    pub fn score(&self, data: &[Features]) -> Vec<f64> {
        if data.is_empty() {
            return Vec::new();
        }
        let sample_size = self.max_samples.clamp(1, data.len());
        let height_limit = (sample_size as f64).log2().ceil().max(1.0) as usize;
        let n_trees = self.n_trees.max(1);

        let mut rng = StdRng::seed_from_u64(self.seed);
        let trees: Vec<Node> = (0..n_trees)
            .map(|_| {
                let sample = index::sample(&mut rng, data.len(), sample_size).into_vec();
                build_tree(&mut rng, data, sample, 0, height_limit)
            })
            .collect();

        let normalizer = average_path_length(sample_size).max(f64::EPSILON);
        data.iter()
            .map(|point| {
                let mean_path = trees
                    .iter()
                    .map(|tree| path_length(tree, point, 0.0))
                    .sum::<f64>()
                    / n_trees as f64;
                2f64.powf(-mean_path / normalizer)
            })
            .collect()
    }
}

impl AnomalyModel for IsolationForest {
    fn name(&self) -> &'static str {
        "isolation_forest"
    }

    fn detect(&self, orders: &[&Order], _history: &[Order]) -> AnomalyOutcome {
        if orders.is_empty() {
            return AnomalyOutcome::EmptyLedger;
        }
        if orders.len() < MIN_SAMPLES {
            return AnomalyOutcome::InsufficientData {
                required: MIN_SAMPLES,
                available: orders.len(),
            };
        }

        let data: Vec<Features> = orders.iter().map(|o| Self::features(o)).collect();
        let scores = self.score(&data);

        let mut sorted = scores.clone();
        sorted.sort_by(f64::total_cmp);
        let cutoff = percentile(&sorted, 1.0 - self.contamination());

        let flags = orders
            .iter()
            .zip(&scores)
            .filter(|(_, score)| **score > cutoff)
            .map(|(order, score)| {
                AnomalyFlag::for_order(order, REASON_STATISTICAL_OUTLIER).with_score(*score)
            })
            .collect();

        AnomalyOutcome::Detected { flags }
    }
}
