//! Screen-space LOD selection over a [`PointOctree`].
//!
//! A breadth-first walk from the root expands every child that covers at
//! least the threshold area on screen. Leaves reached this way show their
//! items individually. A node with at least one child below the threshold is
//! also shown as a single aggregate proxy, once, alongside whatever siblings
//! were large enough to expand.
//!
//! The rule is coarse: an aggregate stands for its whole subtree, so items
//! under an expanded sibling are covered twice. Every item is covered at
//! least once.

use std::collections::VecDeque;

use glam::DMat4;

use super::projection::screen_area;
use super::{NodeId, PointOctree};

/// How a selected node is shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SelectedNode {
  /// A leaf whose items are shown individually.
  Items(NodeId),
  /// A subtree collapsed into one proxy.
  Aggregate(NodeId),
}

impl SelectedNode {
  #[inline]
  pub fn node(self) -> NodeId {
    match self {
      SelectedNode::Items(id) | SelectedNode::Aggregate(id) => id,
    }
  }

  #[inline]
  pub fn is_aggregate(self) -> bool {
    matches!(self, SelectedNode::Aggregate(_))
  }
}

/// Result of one selection pass, in breadth-first order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LodSelection {
  nodes: Vec<SelectedNode>,
}

impl LodSelection {
  #[inline]
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = SelectedNode> + '_ {
    self.nodes.iter().copied()
  }

  /// Leaves shown as individual items.
  pub fn item_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
    self.iter().filter_map(|selected| match selected {
      SelectedNode::Items(id) => Some(id),
      SelectedNode::Aggregate(_) => None,
    })
  }

  /// Nodes shown as aggregate proxies.
  pub fn aggregate_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
    self.iter().filter_map(|selected| match selected {
      SelectedNode::Aggregate(id) => Some(id),
      SelectedNode::Items(_) => None,
    })
  }
}

impl<T> PointOctree<T> {
  /// Select the nodes to show for one frame.
  ///
  /// Pure: the result depends only on the tree, `view_projection` and
  /// `screen_area_threshold`. An empty tree gives an empty selection.
  #[cfg_attr(
    feature = "tracing-spans",
    tracing::instrument(skip_all, name = "octree::select")
  )]
  pub fn select(&self, view_projection: &DMat4, screen_area_threshold: f64) -> LodSelection {
    let mut selection = LodSelection::default();
    let Some(root) = self.root() else {
      return selection;
    };

    let mut queue = VecDeque::from([root]);
    while let Some(id) = queue.pop_front() {
      let node = self.node(id);
      if node.is_leaf() {
        selection.nodes.push(SelectedNode::Items(id));
        continue;
      }

      let mut aggregated = false;
      for &child in node.children() {
        // Zero area never passes, even against a zero threshold
        let area = screen_area(self.node(child).bounds(), view_projection);
        if area > 0.0 && area >= screen_area_threshold {
          queue.push_back(child);
        } else if !aggregated {
          selection.nodes.push(SelectedNode::Aggregate(id));
          aggregated = true;
        }
      }
    }

    selection
  }
}

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;
