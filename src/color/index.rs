//! Exact nearest-color lookup over catalog representative colors
//!
//! The index is a balanced k-d tree whose splitting axis cycles through the
//! red, green and blue channels. Queries return exactly what a linear scan
//! returns: the color with the smallest Euclidean distance, and among
//! equidistant colors the one with the lowest catalog index.

use image::Rgb;

use crate::catalog::element::Catalog;
use crate::color::metric::squared_distance;

const AXES: usize = 3;

#[derive(Debug, Clone)]
struct KdNode {
    color: Rgb<u8>,
    index: usize,
    axis: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// Best candidate seen so far, ordered by (distance, catalog index)
#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: u32,
    index: usize,
}

impl Candidate {
    const fn beats(self, other: Self) -> bool {
        self.distance < other.distance
            || (self.distance == other.distance && self.index < other.index)
    }
}

/// Nearest-neighbour index over a list of representative colors
#[derive(Debug, Clone)]
pub struct ColorIndex {
    nodes: Vec<KdNode>,
    root: Option<usize>,
}

impl ColorIndex {
    /// Build an index where position `i` of `colors` is catalog index `i`
    pub fn new(colors: &[Rgb<u8>]) -> Self {
        let mut entries: Vec<(Rgb<u8>, usize)> = colors
            .iter()
            .copied()
            .enumerate()
            .map(|(index, color)| (color, index))
            .collect();

        let mut nodes = Vec::with_capacity(entries.len());
        let root = Self::build(&mut entries, 0, &mut nodes);

        Self { nodes, root }
    }

    /// Build an index over a catalog's representative colors
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self::new(&catalog.colors())
    }

    fn build(
        entries: &mut [(Rgb<u8>, usize)],
        depth: usize,
        nodes: &mut Vec<KdNode>,
    ) -> Option<usize> {
        if entries.is_empty() {
            return None;
        }

        let axis = depth % AXES;
        // Sorting on the catalog index as well keeps the tree shape deterministic
        entries.sort_unstable_by_key(|(color, index)| (color.0.get(axis).copied(), *index));

        let median = entries.len() / 2;
        let (lower, rest) = entries.split_at_mut(median);
        let ((color, index), upper) = rest.split_first_mut()?;

        let node_id = nodes.len();
        nodes.push(KdNode {
            color: *color,
            index: *index,
            axis,
            left: None,
            right: None,
        });

        let left = Self::build(lower, depth + 1, nodes);
        let right = Self::build(upper, depth + 1, nodes);
        if let Some(node) = nodes.get_mut(node_id) {
            node.left = left;
            node.right = right;
        }

        Some(node_id)
    }

    /// Number of colors in the index
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the index holds no colors
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Catalog index of the color closest to `query`
    ///
    /// Ties are broken towards the lowest catalog index. Returns `None` only
    /// for an empty index.
    pub fn nearest(&self, query: Rgb<u8>) -> Option<usize> {
        let mut best: Option<Candidate> = None;
        self.search(self.root, query, &mut best);
        best.map(|candidate| candidate.index)
    }

    fn search(&self, node_id: Option<usize>, query: Rgb<u8>, best: &mut Option<Candidate>) {
        let Some(node) = node_id.and_then(|id| self.nodes.get(id)) else {
            return;
        };

        let candidate = Candidate {
            distance: squared_distance(node.color, query),
            index: node.index,
        };
        if best.is_none_or(|current| candidate.beats(current)) {
            *best = Some(candidate);
        }

        let query_value = i32::from(query.0.get(node.axis).copied().unwrap_or(0));
        let split_value = i32::from(node.color.0.get(node.axis).copied().unwrap_or(0));
        let diff = query_value - split_value;

        let (near, far) = if diff < 0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        self.search(near, query, best);

        // Equal plane distance must still be explored: an equidistant color
        // on the far side may carry a lower catalog index
        let plane_distance = diff.unsigned_abs() * diff.unsigned_abs();
        if best.is_none_or(|current| plane_distance <= current.distance) {
            self.search(far, query, best);
        }
    }
}

/// Linear-scan reference for [`ColorIndex::nearest`]
///
/// Same metric and tie-break: smallest squared distance, then lowest index.
pub fn brute_force_nearest(colors: &[Rgb<u8>], query: Rgb<u8>) -> Option<usize> {
    colors
        .iter()
        .enumerate()
        .min_by_key(|(index, color)| (squared_distance(**color, query), *index))
        .map(|(index, _)| index)
}
