//! Dendrogram reconstruction from agglomerative-clustering output.
//!
//! Hierarchical-clustering engines report their result as a merge matrix
//! (`n-1` rows of two signed child references) plus a non-decreasing
//! height vector. A negative reference `-j` names original leaf `j`
//! (1-based); a positive reference `j` names the cluster formed at the
//! earlier step `j` (1-based). [`Dendrogram::build`] replays the merge
//! steps into an explicit labeled tree, and [`Dendrogram::reorder_columns`]
//! derives the heat-map-ready column ordering from it.

use std::collections::HashMap;
use std::collections::VecDeque;

use crate::error::{Result, TableError};
use crate::value::Table;

/// Distance subtracted from a merge step's height to place its leaf
/// children below it. A display heuristic; any constant preserving the
/// strict child-below-parent ordering would do.
pub const LEAF_HEIGHT_OFFSET: f64 = 0.02;

/// One agglomeration step of the clustering engine's merge matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRecord {
    pub left: i32,
    pub right: i32,
}

/// One vertex of the reconstructed tree: leaves carry the leaf name,
/// internal vertices an empty label.
#[derive(Debug, Clone, PartialEq)]
pub struct DendrogramNode {
    pub label: String,
    pub height: f64,
    pub children: Vec<usize>,
}

impl DendrogramNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A rooted labeled tree with per-vertex heights.
#[derive(Debug, Clone)]
pub struct Dendrogram {
    nodes: Vec<DendrogramNode>,
    root: usize,
}

impl Dendrogram {
    /// Replay `n-1` merge records over `n` leaf labels.
    ///
    /// Produces exactly `2n-1` vertices: one leaf per label and one
    /// internal vertex per merge step, the last step becoming the root.
    /// Leaf vertices sit at `step height - LEAF_HEIGHT_OFFSET`.
    pub fn build(records: &[MergeRecord], heights: &[f64], labels: &[String]) -> Result<Self> {
        let n = labels.len();
        if n == 0 {
            return Err(TableError::EmptyInput(
                "no leaf labels to cluster".to_string(),
            ));
        }
        if records.len() != n - 1 || heights.len() != n - 1 {
            return Err(TableError::DimensionMismatch(format!(
                "{} leaves require {} merge records and heights, got {} and {}",
                n,
                n - 1,
                records.len(),
                heights.len()
            )));
        }

        let mut nodes: Vec<DendrogramNode> = Vec::with_capacity(2 * n - 1);
        // Step index -> vertex created at that step.
        let mut step_map: HashMap<usize, usize> = HashMap::new();
        let mut leaf_seen = vec![false; n];

        for (step, record) in records.iter().enumerate() {
            let height = heights[step];
            let left = resolve_child(
                record.left,
                height,
                labels,
                &step_map,
                &mut nodes,
                &mut leaf_seen,
            )?;
            let right = resolve_child(
                record.right,
                height,
                labels,
                &step_map,
                &mut nodes,
                &mut leaf_seen,
            )?;

            let parent = nodes.len();
            nodes.push(DendrogramNode {
                label: String::new(),
                height,
                children: vec![left, right],
            });
            step_map.insert(step, parent);
        }

        if let Some(missing) = leaf_seen.iter().position(|&seen| !seen) {
            return Err(TableError::InvalidFormat(format!(
                "merge matrix never references leaf {}",
                missing + 1
            )));
        }

        let root = step_map[&(n - 2)];
        Ok(Dendrogram { nodes, root })
    }

    pub fn nodes(&self) -> &[DendrogramNode] {
        &self.nodes
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn vertex_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.children.len()).sum()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Leaf labels ordered for heat-map display: a breadth-first
    /// traversal from the root, each level's leaf labels prepended to the
    /// accumulator so that deeper, earlier-merged leaves end up leftmost.
    pub fn leaf_order(&self) -> Vec<String> {
        let mut ordered: Vec<String> = Vec::new();
        let mut frontier: VecDeque<usize> = VecDeque::from([self.root]);

        while !frontier.is_empty() {
            let mut level_labels: Vec<String> = Vec::new();
            let mut next: VecDeque<usize> = VecDeque::new();
            for &id in &frontier {
                let node = &self.nodes[id];
                if node.is_leaf() {
                    level_labels.push(node.label.clone());
                }
                next.extend(node.children.iter().copied());
            }
            level_labels.extend(ordered);
            ordered = level_labels;
            frontier = next;
        }

        ordered
    }

    /// Reorder `table`'s columns into leaf order for heat-map display.
    ///
    /// Leaf labels may carry a `"letter: "` display prefix (as produced by
    /// the grid views); it is stripped before the column-name lookup. A
    /// label that matches no column fails with [`TableError::OutOfRange`].
    pub fn reorder_columns(&self, table: &Table) -> Result<Table> {
        let mut reordered = Table::new();
        for label in self.leaf_order() {
            let name = strip_display_prefix(&label);
            let index = table.column_index(name).ok_or_else(|| {
                TableError::OutOfRange(format!("no column named '{name}' to reorder"))
            })?;
            reordered.push_column(table.column(index).unwrap().clone())?;
        }
        Ok(reordered)
    }
}

fn resolve_child(
    reference: i32,
    step_height: f64,
    labels: &[String],
    step_map: &HashMap<usize, usize>,
    nodes: &mut Vec<DendrogramNode>,
    leaf_seen: &mut [bool],
) -> Result<usize> {
    if reference < 0 {
        // Negative: original leaf, 1-based.
        let leaf = (-reference) as usize - 1;
        if leaf >= labels.len() {
            return Err(TableError::OutOfRange(format!(
                "merge record references leaf {} of {}",
                leaf + 1,
                labels.len()
            )));
        }
        if leaf_seen[leaf] {
            return Err(TableError::InvalidFormat(format!(
                "merge matrix references leaf {} twice",
                leaf + 1
            )));
        }
        leaf_seen[leaf] = true;
        let id = nodes.len();
        nodes.push(DendrogramNode {
            label: labels[leaf].clone(),
            height: step_height - LEAF_HEIGHT_OFFSET,
            children: Vec::new(),
        });
        Ok(id)
    } else if reference > 0 {
        // Positive: cluster formed at an earlier step, 1-based.
        step_map
            .get(&(reference as usize - 1))
            .copied()
            .ok_or_else(|| {
                TableError::OutOfRange(format!(
                    "merge record references step {reference} before it happened"
                ))
            })
    } else {
        Err(TableError::InvalidFormat(
            "merge reference 0 is neither a leaf nor a step".to_string(),
        ))
    }
}

fn strip_display_prefix(label: &str) -> &str {
    match label.split_once(": ") {
        Some((_, rest)) => rest,
        None => label,
    }
}
