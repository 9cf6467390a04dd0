//! Static k-d tree nearest-neighbor index
//!
//! Built once over a fixed set of P-dimensional points (the columns of a
//! `P x K` matrix). Supports a nearest-neighbor query primed with an
//! externally supplied candidate `(best_dist_sq, best_index)`, so a
//! caller can fold in a point it already knows about (e.g. the current
//! extrapolation origin) and receive the true global minimum over the
//! union of the tree and that candidate.
//!
//! The tree is deliberately static: the caching wrapper rebuilds it from
//! scratch rather than inserting points incrementally, to avoid the
//! balance degradation an online k-d tree would suffer.
use nalgebra::{DMatrix, DVector};

struct KdNode {
    /// Splitting axis, in `0..P`.
    dim: usize,
    /// Splitting value along `dim`.
    split: f64,
    left: Option<usize>,
    right: Option<usize>,
    /// Present only on leaves: index into the tree's original point set.
    point: Option<usize>,
}

/// Static nearest-neighbor index over a fixed `P x K` point matrix.
///
/// Columns are addressed by their original 0-based index into the matrix
/// passed to [`KdTree::build`]; that is also the index space returned by
/// [`KdTree::nearest`].
pub struct KdTree {
    points: DMatrix<f64>,
    nodes: Vec<KdNode>,
    root: Option<usize>,
}

const LEAF_BUCKET: usize = 1;

impl KdTree {
    /// Build a tree over the columns of `points` (`P x K`). `K == 0` is
    /// allowed and produces an empty tree.
    pub fn build(points: DMatrix<f64>) -> Self {
        let k = points.ncols();
        let p = points.nrows();
        let mut order: Vec<usize> = (0..k).collect();
        let mut nodes = Vec::new();

        let root = if k == 0 {
            None
        } else {
            Some(Self::build_recursive(&points, &mut order, 0, k, 0, p, &mut nodes))
        };

        KdTree { points, nodes, root }
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.points.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn build_recursive(
        points: &DMatrix<f64>,
        order: &mut [usize],
        start: usize,
        end: usize,
        depth: usize,
        p: usize,
        nodes: &mut Vec<KdNode>,
    ) -> usize {
        let span = end - start;
        if span <= LEAF_BUCKET {
            let node = KdNode {
                dim: 0,
                split: 0.0,
                left: None,
                right: None,
                point: Some(order[start]),
            };
            nodes.push(node);
            return nodes.len() - 1;
        }

        let dim = depth % p;
        order[start..end].sort_by(|&a, &b| {
            points[(dim, a)]
                .partial_cmp(&points[(dim, b)])
                .expect("coordinates must not be NaN")
        });
        let mid = start + span / 2;
        let split = points[(dim, order[mid])];

        // Reserve this node's slot before recursing so left/right indices
        // can be filled in after children are built.
        let node_idx = nodes.len();
        nodes.push(KdNode {
            dim,
            split,
            left: None,
            right: None,
            point: Some(order[mid]),
        });

        let left = if mid > start {
            Some(Self::build_recursive(points, order, start, mid, depth + 1, p, nodes))
        } else {
            None
        };
        let right = if end > mid + 1 {
            Some(Self::build_recursive(points, order, mid + 1, end, depth + 1, p, nodes))
        } else {
            None
        };

        nodes[node_idx].left = left;
        nodes[node_idx].right = right;
        node_idx
    }

    /// Return the minimum of `primed` and the tree-resident closest point
    /// to `query`, by squared Euclidean distance.
    ///
    /// `primed` is `(best_distance_squared, best_index)`; pass
    /// `(f64::INFINITY, None)` for an unprimed query. Ties are broken by
    /// "first encountered wins": the primed candidate, then whichever
    /// tree point is visited first.
    pub fn nearest(&self, query: &DVector<f64>, primed: (f64, Option<usize>)) -> (f64, Option<usize>) {
        let mut best = primed;
        if let Some(root) = self.root {
            self.search(root, query, &mut best);
        }
        best
    }

    fn search(&self, node_idx: usize, query: &DVector<f64>, best: &mut (f64, Option<usize>)) {
        let node = &self.nodes[node_idx];

        if let Some(point_idx) = node.point {
            let dist = self.squared_distance_to_column(point_idx, query);
            if dist < best.0 {
                *best = (dist, Some(point_idx));
            }
            if node.left.is_none() && node.right.is_none() {
                return;
            }
        }

        let diff = query[node.dim] - node.split;
        let (near, far) = if diff <= 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(near) = near {
            self.search(near, query, best);
        }
        if diff * diff < best.0 {
            if let Some(far) = far {
                self.search(far, query, best);
            }
        }
    }
}

impl KdTree {
    fn squared_distance_to_column(&self, col: usize, query: &DVector<f64>) -> f64 {
        let mut sum = 0.0;
        for i in 0..query.len() {
            let d = self.points[(i, col)] - query[i];
            sum += d * d;
        }
        sum
    }
}
