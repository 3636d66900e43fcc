//! CART regression tree

use crate::error::{CropPriceError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use rand::seq::index::sample;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Decision tree node. Children are indices into the tree's node list, so
/// the stored tree stays flat however deep it grows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf node with prediction value
    Leaf {
        value: f64,
        n_samples: usize,
    },
    /// Internal node with split
    Split {
        feature_idx: usize,
        threshold: f64,
        left: usize,
        right: usize,
        n_samples: usize,
        impurity: f64,
    },
}

/// Node still to be grown: its slot in the node list and the rows reaching it
struct PendingNode {
    slot: usize,
    indices: Vec<usize>,
    depth: usize,
}

/// Regression tree grown on squared error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Flat node list, root at index 0; empty until fitted
    nodes: Vec<TreeNode>,
    /// Maximum depth
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Features drawn at each split, all when `None`
    pub max_features: Option<usize>,
    /// Seed for feature sampling
    pub random_state: u64,
    /// Number of features
    n_features: usize,
    /// Feature importances
    feature_importances: Option<Array1<f64>>,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTree {
    /// Create a new regressor tree
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            random_state: 0,
            n_features: 0,
            feature_importances: None,
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set minimum samples to split
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples.max(2);
        self
    }

    /// Set minimum samples in leaf
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples.max(1);
        self
    }

    /// Consider only `n` randomly drawn features at each split
    pub fn with_max_features(mut self, n: usize) -> Self {
        self.max_features = Some(n);
        self
    }

    /// Set the seed used for feature sampling
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// Fit the tree to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(CropPriceError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }

        if n_samples == 0 {
            return Err(CropPriceError::InsufficientData { required: 1, actual: 0 });
        }

        self.n_features = n_features;

        let mut importances = vec![0.0; n_features];
        let mut rng = ChaCha8Rng::seed_from_u64(self.random_state);

        let indices: Vec<usize> = (0..n_samples).collect();
        self.nodes = self.build_tree(x, y, indices, &mut importances, &mut rng);

        // Normalize feature importances
        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }
        self.feature_importances = Some(Array1::from_vec(importances));

        Ok(self)
    }

    /// Grow the tree depth first, left child before right, with an explicit
    /// work stack instead of recursion.
    fn build_tree(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: Vec<usize>,
        importances: &mut [f64],
        rng: &mut ChaCha8Rng,
    ) -> Vec<TreeNode> {
        let mut nodes = vec![TreeNode::Leaf { value: 0.0, n_samples: 0 }];
        let mut stack = vec![PendingNode { slot: 0, indices, depth: 0 }];

        while let Some(PendingNode { slot, indices, depth }) = stack.pop() {
            let n_samples = indices.len();
            let y_subset: Vec<f64> = indices.iter().map(|&i| y[i]).collect();
            let leaf_value = mean(&y_subset);

            let should_stop = n_samples < self.min_samples_split
                || n_samples < 2 * self.min_samples_leaf
                || self.max_depth.map_or(false, |d| depth >= d)
                || is_constant(&y_subset);

            let split = if should_stop {
                None
            } else {
                let candidates = self.candidate_features(rng);
                self.find_best_split(x, y, &indices, &candidates)
            };

            let Some((feature, threshold, gain)) = split else {
                nodes[slot] = TreeNode::Leaf { value: leaf_value, n_samples };
                continue;
            };

            let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .copied()
                .partition(|&i| x[[i, feature]] <= threshold);

            importances[feature] += n_samples as f64 * gain;

            let left = nodes.len();
            let right = left + 1;
            nodes.push(TreeNode::Leaf { value: 0.0, n_samples: 0 });
            nodes.push(TreeNode::Leaf { value: 0.0, n_samples: 0 });
            nodes[slot] = TreeNode::Split {
                feature_idx: feature,
                threshold,
                left,
                right,
                n_samples,
                impurity: variance(&y_subset),
            };

            // Right is pushed first so the left subtree is grown first
            stack.push(PendingNode { slot: right, indices: right_indices, depth: depth + 1 });
            stack.push(PendingNode { slot: left, indices: left_indices, depth: depth + 1 });
        }

        nodes
    }

    fn candidate_features(&self, rng: &mut ChaCha8Rng) -> Vec<usize> {
        match self.max_features {
            Some(k) if k < self.n_features => {
                let mut features = sample(rng, self.n_features, k.max(1)).into_vec();
                features.sort_unstable();
                features
            }
            _ => (0..self.n_features).collect(),
        }
    }

    /// Best (feature, threshold, impurity decrease) over the candidate features.
    ///
    /// Each feature is scanned independently: rows are sorted by the feature
    /// value and running sums give the squared error of every split point.
    fn find_best_split(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        features: &[usize],
    ) -> Option<(usize, f64, f64)> {
        let n = indices.len();
        let total_sum: f64 = indices.iter().map(|&i| y[i]).sum();
        let total_sq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();
        let parent_impurity = impurity(n, total_sum, total_sq);

        let feature_results: Vec<Option<(usize, f64, f64)>> = features
            .par_iter()
            .map(|&feature_idx| {
                let mut pairs: Vec<(f64, f64)> = indices
                    .iter()
                    .map(|&i| (x[[i, feature_idx]], y[i]))
                    .collect();
                pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

                let mut best_gain = 0.0f64;
                let mut best_threshold = None;
                let mut left_sum = 0.0f64;
                let mut left_sq = 0.0f64;

                for split in 1..n {
                    let (prev_x, prev_y) = pairs[split - 1];
                    left_sum += prev_y;
                    left_sq += prev_y * prev_y;

                    let next_x = pairs[split].0;
                    if next_x <= prev_x {
                        continue;
                    }

                    let left_count = split;
                    let right_count = n - split;
                    if left_count < self.min_samples_leaf || right_count < self.min_samples_leaf {
                        continue;
                    }

                    let left_impurity = impurity(left_count, left_sum, left_sq);
                    let right_impurity =
                        impurity(right_count, total_sum - left_sum, total_sq - left_sq);
                    let weighted = (left_count as f64 * left_impurity
                        + right_count as f64 * right_impurity)
                        / n as f64;

                    let gain = parent_impurity - weighted;
                    if gain > best_gain {
                        best_gain = gain;
                        best_threshold = Some((prev_x + next_x) / 2.0);
                    }
                }

                best_threshold.map(|threshold| (feature_idx, threshold, best_gain))
            })
            .collect();

        // Ties resolve to the lowest feature index
        feature_results
            .into_iter()
            .flatten()
            .fold(None, |best: Option<(usize, f64, f64)>, candidate| match best {
                Some(b) if b.2 >= candidate.2 => Some(b),
                _ => Some(candidate),
            })
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.ensure_fitted()?;
        self.check_width(x.ncols())?;

        Ok(x.outer_iter().map(|row| self.predict_sample(row)).collect())
    }

    /// Predict a single feature row
    pub fn predict_row(&self, row: ArrayView1<f64>) -> Result<f64> {
        self.ensure_fitted()?;
        self.check_width(row.len())?;
        Ok(self.predict_sample(row))
    }

    fn ensure_fitted(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(CropPriceError::ModelNotFitted);
        }
        Ok(())
    }

    fn predict_sample(&self, sample: ArrayView1<f64>) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { value, .. } => return *value,
                TreeNode::Split { feature_idx, threshold, left, right, .. } => {
                    idx = if sample[*feature_idx] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    fn check_width(&self, width: usize) -> Result<()> {
        if width != self.n_features {
            return Err(CropPriceError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", width),
            });
        }
        Ok(())
    }

    /// Get feature importances
    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }

    /// Get tree depth, counting the leaf level
    pub fn get_depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        let mut deepest = 0;
        let mut stack = vec![(0usize, 1usize)];
        while let Some((idx, depth)) = stack.pop() {
            match &self.nodes[idx] {
                TreeNode::Leaf { .. } => deepest = deepest.max(depth),
                TreeNode::Split { left, right, .. } => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
            }
        }
        deepest
    }

    /// Get number of leaves
    pub fn get_n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, TreeNode::Leaf { .. }))
            .count()
    }

    /// Flat node list, root at index 0
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }
}

// Var = E[X²] - E[X]², clamped against rounding below zero
fn impurity(count: usize, sum: f64, sq_sum: f64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let n = count as f64;
    (sq_sum / n - (sum / n).powi(2)).max(0.0)
}

fn variance(y: &[f64]) -> f64 {
    let sum: f64 = y.iter().sum();
    let sq: f64 = y.iter().map(|v| v * v).sum();
    impurity(y.len(), sum, sq)
}

fn mean(y: &[f64]) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    y.iter().sum::<f64>() / y.len() as f64
}

fn is_constant(y: &[f64]) -> bool {
    match y.first() {
        None => true,
        Some(first) => y.iter().all(|&v| (v - first).abs() < 1e-10),
    }
}
