//! The `ID`/`Parent` graph of a GFF3 file.
//!
//! Features with an `ID` are nodes (several features may share one `ID`, as
//! CDS segments often do). Features with a `Parent` but no `ID` are leaves
//! hung off every listed parent. Features with neither are orphans. Nodes
//! refer to features by their index in the source [`Features`].
use std::collections::{BTreeMap, BTreeSet};

use crate::consts::{ID_ATTR, PARENT_ATTR};
use crate::feature::Feature;
use crate::features::Features;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeNode {
    pub id: String,
    /// Features carrying this node's `ID`.
    pub features: Vec<usize>,
    /// Parent-only features attached directly to this node.
    pub child_leaves: Vec<usize>,
    pub parents: Vec<String>,
    pub children: Vec<String>,
}

impl TreeNode {
    /// Referenced as a parent but never defined by a feature.
    pub fn is_placeholder(&self) -> bool {
        self.features.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    nodes: BTreeMap<String, TreeNode>,
    orphans: Vec<usize>,
}

impl Tree {
    pub fn from_features(features: &Features) -> Self {
        let mut tree = Tree::default();

        for (idx, f) in features.iter().enumerate() {
            let parents = parent_ids(f);
            match f.attribute(ID_ATTR).filter(|id| !id.is_empty()) {
                Some(id) => {
                    tree.node_entry(id).features.push(idx);
                    for parent in parents {
                        tree.link(parent, id);
                    }
                }
                None if !parents.is_empty() => {
                    for parent in parents {
                        tree.node_entry(parent).child_leaves.push(idx);
                    }
                }
                None => tree.orphans.push(idx),
            }
        }

        tree
    }

    fn node_entry(&mut self, id: &str) -> &mut TreeNode {
        self.nodes
            .entry(id.to_string())
            .or_insert_with(|| TreeNode {
                id: id.to_string(),
                ..Default::default()
            })
    }

    fn link(&mut self, parent: &str, child: &str) {
        let p = self.node_entry(parent);
        if !p.children.iter().any(|c| c == child) {
            p.children.push(child.to_string());
        }
        let c = self.node_entry(child);
        if !c.parents.iter().any(|x| x == parent) {
            c.parents.push(parent.to_string());
        }
    }

    pub fn node(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.values()
    }

    pub fn orphans(&self) -> &[usize] {
        &self.orphans
    }

    /// Ids of nodes without parents, sorted.
    pub fn roots(&self) -> Vec<&str> {
        self.nodes
            .values()
            .filter(|n| n.parents.is_empty())
            .map(|n| n.id.as_str())
            .collect()
    }

    ///
    /// Every feature under `id`: its own features, its leaves, then each child
    /// node recursively. Nodes reachable along several paths are visited once.
    ///
    /// # Returns
    /// - indices into the source `Features`, or `None` if `id` is unknown
    pub fn feature_indices(&self, id: &str) -> Option<Vec<usize>> {
        self.nodes.get(id)?;
        let mut visited = BTreeSet::new();
        let mut out = Vec::new();
        self.collect(id, &mut visited, &mut out);
        Some(out)
    }

    fn collect(&self, id: &str, visited: &mut BTreeSet<String>, out: &mut Vec<usize>) {
        if !visited.insert(id.to_string()) {
            return;
        }
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        out.extend(&node.features);
        out.extend(&node.child_leaves);
        for child in &node.children {
            self.collect(child, visited, out);
        }
    }

    /// [`Tree::feature_indices`] resolved against the features the tree was built from.
    pub fn features<'a>(&self, id: &str, source: &'a Features) -> Vec<&'a Feature> {
        self.feature_indices(id)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|i| source.feature(i))
            .collect()
    }
}

fn parent_ids(f: &Feature) -> Vec<&str> {
    f.attribute(PARENT_ATTR)
        .map(|p| p.split(',').map(str::trim).filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn feature(start: u64, attrs: &str) -> Feature {
        format!("chr1\tsrc\tx\t{}\t{}\t.\t+\t.\t{}", start, start + 10, attrs)
            .parse()
            .unwrap()
    }

    #[fixture]
    fn model() -> Features {
        Features::from_features(
            "gff3",
            "model",
            vec![
                feature(1, "ID=gene1"),
                feature(2, "ID=tx1;Parent=gene1"),
                feature(3, "ID=tx2;Parent=gene1"),
                feature(4, "Parent=tx1,tx2"),
                feature(5, "ID=cds1;Parent=tx1"),
                feature(6, "ID=cds1;Parent=tx1"),
                feature(7, "Note=orphan"),
                feature(8, "Parent=ghost"),
            ],
        )
    }

    #[rstest]
    fn test_nodes_leaves_orphans(model: Features) {
        let tree = Tree::from_features(&model);

        assert_eq!(tree.orphans(), &[6]);
        assert_eq!(tree.roots(), vec!["gene1", "ghost"]);

        let gene = tree.node("gene1").unwrap();
        assert_eq!(gene.children, vec!["tx1", "tx2"]);
        assert!(!gene.is_placeholder());

        let tx1 = tree.node("tx1").unwrap();
        assert_eq!(tx1.parents, vec!["gene1"]);
        assert_eq!(tx1.child_leaves, vec![3]);
        assert_eq!(tx1.children, vec!["cds1"]);

        // two features share the cds1 ID, the link is recorded once
        let cds = tree.node("cds1").unwrap();
        assert_eq!(cds.features, vec![4, 5]);
        assert_eq!(cds.parents, vec!["tx1"]);

        assert!(tree.node("ghost").unwrap().is_placeholder());
    }

    #[rstest]
    fn test_feature_indices_recursive(model: Features) {
        let tree = Tree::from_features(&model);
        assert_eq!(tree.feature_indices("gene1"), Some(vec![0, 1, 3, 4, 5, 2, 3]));
        assert_eq!(tree.feature_indices("tx2"), Some(vec![2, 3]));
        assert_eq!(tree.feature_indices("nope"), None);

        let starts: Vec<u64> = tree.features("cds1", &model).iter().map(|f| f.start).collect();
        assert_eq!(starts, vec![5, 6]);
    }

    #[rstest]
    fn test_cycles_terminate() {
        let fs = Features::from_features(
            "gff3",
            "cycle",
            vec![feature(1, "ID=a;Parent=b"), feature(2, "ID=b;Parent=a")],
        );
        let tree = Tree::from_features(&fs);
        assert_eq!(tree.feature_indices("a"), Some(vec![0, 1]));
        assert!(tree.roots().is_empty());
    }
}
