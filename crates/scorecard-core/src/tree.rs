//! Least-squares regression trees used as boosting base learners.

use nalgebra::DMatrix;

/// Splits whose improvement does not exceed this are not taken.
const MIN_IMPROVEMENT: f64 = 1e-12;
/// Nodes with variance at or below this are leaves.
const MIN_IMPURITY: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// Training rows that ended up in one leaf.
#[derive(Debug, Clone)]
pub struct LeafSamples {
    pub node: usize,
    pub rows: Vec<usize>,
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    improvement: f64,
}

/// Binary regression tree over the columns of a dense matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Grow a tree on `rows` of `x` against `target`.
    ///
    /// Leaves initially hold the mean target of their rows. The returned
    /// leaf assignment lets the caller replace leaf values afterwards.
    pub fn fit(
        x: &DMatrix<f64>,
        target: &[f64],
        rows: Vec<usize>,
        params: TreeParams,
    ) -> (Self, Vec<LeafSamples>) {
        let mut tree = Self { nodes: Vec::new() };
        let mut leaves = Vec::new();
        tree.grow(x, target, rows, 0, params, &mut leaves);
        (tree, leaves)
    }

    fn grow(
        &mut self,
        x: &DMatrix<f64>,
        target: &[f64],
        rows: Vec<usize>,
        depth: usize,
        params: TreeParams,
        leaves: &mut Vec<LeafSamples>,
    ) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Node::Leaf {
            value: mean_of(target, &rows),
        });

        let can_split = depth < params.max_depth
            && rows.len() >= params.min_samples_split
            && rows.len() >= 2 * params.min_samples_leaf
            && impurity(target, &rows) > MIN_IMPURITY;
        let split = if can_split {
            best_split(x, target, &rows, params.min_samples_leaf)
        } else {
            None
        };

        match split {
            Some(split) => {
                let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
                    .into_iter()
                    .partition(|&row| x[(row, split.feature)] <= split.threshold);
                let left = self.grow(x, target, left_rows, depth + 1, params, leaves);
                let right = self.grow(x, target, right_rows, depth + 1, params, leaves);
                self.nodes[index] = Node::Split {
                    feature: split.feature,
                    threshold: split.threshold,
                    left,
                    right,
                };
            }
            None => leaves.push(LeafSamples { node: index, rows }),
        }
        index
    }

    /// Overwrite the value of a leaf node. Split nodes are left unchanged.
    pub fn set_leaf_value(&mut self, node: usize, value: f64) {
        if let Some(Node::Leaf { value: current }) = self.nodes.get_mut(node) {
            *current = value;
        }
    }

    pub fn predict_row(&self, x: &DMatrix<f64>, row: usize) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if x[(row, feature)] <= threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    pub fn predict(&self, x: &DMatrix<f64>) -> Vec<f64> {
        (0..x.nrows()).map(|row| self.predict_row(x, row)).collect()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    pub fn depth(&self) -> usize {
        self.depth_from(0)
    }

    fn depth_from(&self, index: usize) -> usize {
        match self.nodes[index] {
            Node::Leaf { .. } => 0,
            Node::Split { left, right, .. } => {
                1 + self.depth_from(left).max(self.depth_from(right))
            }
        }
    }
}

/// Exhaustive search over every feature and midpoint threshold.
///
/// Uses the Friedman improvement `n_l * n_r / n * (mean_l - mean_r)^2`.
/// Ties keep the earliest feature and lowest threshold.
fn best_split(
    x: &DMatrix<f64>,
    target: &[f64],
    rows: &[usize],
    min_samples_leaf: usize,
) -> Option<SplitCandidate> {
    let n = rows.len();
    if n < 2 {
        return None;
    }
    let total: f64 = rows.iter().map(|&row| target[row]).sum();
    let mut best: Option<SplitCandidate> = None;
    let mut sorted = rows.to_vec();

    for feature in 0..x.ncols() {
        sorted.sort_by(|&a, &b| x[(a, feature)].total_cmp(&x[(b, feature)]));
        let mut left_sum = 0.0;
        for position in 0..n - 1 {
            let row = sorted[position];
            left_sum += target[row];
            let n_left = position + 1;
            let n_right = n - n_left;
            let current = x[(row, feature)];
            let next = x[(sorted[position + 1], feature)];
            if current == next || n_left < min_samples_leaf || n_right < min_samples_leaf {
                continue;
            }
            let mean_left = left_sum / n_left as f64;
            let mean_right = (total - left_sum) / n_right as f64;
            let diff = mean_left - mean_right;
            let improvement = (n_left * n_right) as f64 / n as f64 * diff * diff;
            let better = best.is_none_or(|b| improvement > b.improvement);
            if improvement > MIN_IMPROVEMENT && better {
                best = Some(SplitCandidate {
                    feature,
                    threshold: current + (next - current) / 2.0,
                    improvement,
                });
            }
        }
    }
    best
}

fn mean_of(target: &[f64], rows: &[usize]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    rows.iter().map(|&row| target[row]).sum::<f64>() / rows.len() as f64
}

fn impurity(target: &[f64], rows: &[usize]) -> f64 {
    let mean = mean_of(target, rows);
    rows.iter()
        .map(|&row| (target[row] - mean).powi(2))
        .sum::<f64>()
        / rows.len().max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: TreeParams = TreeParams {
        max_depth: 3,
        min_samples_split: 2,
        min_samples_leaf: 1,
    };

    #[test]
    fn splits_on_informative_feature() {
        // Column 0 is noise, column 1 separates the targets.
        let x = DMatrix::from_column_slice(4, 2, &[1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 5.0, 5.0]);
        let target = [-1.0, -1.0, 2.0, 2.0];
        let (tree, leaves) = RegressionTree::fit(&x, &target, (0..4).collect(), PARAMS);

        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(leaves.len(), 2);
        assert_eq!(tree.predict(&x), vec![-1.0, -1.0, 2.0, 2.0]);
    }

    #[test]
    fn respects_max_depth() {
        let x = DMatrix::from_column_slice(8, 1, &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        let target = [0.0, 8.0, 1.0, 7.0, 2.0, 6.0, 3.0, 5.0];
        let params = TreeParams {
            max_depth: 2,
            ..PARAMS
        };
        let (tree, _) = RegressionTree::fit(&x, &target, (0..8).collect(), params);

        assert!(tree.depth() <= 2);
        assert!(tree.leaf_count() <= 4);
    }

    #[test]
    fn constant_target_is_a_single_leaf() {
        let x = DMatrix::from_column_slice(3, 1, &[0.0, 1.0, 2.0]);
        let (tree, leaves) = RegressionTree::fit(&x, &[0.5, 0.5, 0.5], vec![0, 1, 2], PARAMS);

        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(leaves[0].rows, vec![0, 1, 2]);
    }

    #[test]
    fn leaf_values_can_be_replaced() {
        let x = DMatrix::from_column_slice(2, 1, &[0.0, 1.0]);
        let (mut tree, leaves) = RegressionTree::fit(&x, &[1.0, 3.0], vec![0, 1], PARAMS);
        for leaf in &leaves {
            tree.set_leaf_value(leaf.node, 10.0);
        }

        assert_eq!(tree.predict(&x), vec![10.0, 10.0]);
    }
}
