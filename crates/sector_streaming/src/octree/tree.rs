//! PointOctree - static octree over point-like items.
//!
//! Built once from a fixed item set, then read-only. Empty octants are never
//! materialized, so every leaf holds at least one item and every internal
//! node at least one child.
//!
//! Nodes live in a flat arena and are addressed by [`NodeId`]. Children are
//! stored before their parent; the root is always the last node.

use glam::DVec3;
use smallvec::SmallVec;

use super::config::MAX_OCTREE_DEPTH;
use super::{DAabb3, OctreeConfig};

/// Index of a node in its octree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
  #[inline]
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

/// One item stored in the octree.
#[derive(Clone, Debug, PartialEq)]
pub struct OctreeItem<T> {
  pub position: DVec3,
  pub payload: T,
}

#[derive(Clone, Debug)]
enum NodeKind {
  /// Indices into the item list.
  Leaf(SmallVec<[usize; 2]>),
  Internal(SmallVec<[NodeId; 8]>),
}

/// A node of a [`PointOctree`].
#[derive(Clone, Debug)]
pub struct PointOctant {
  bounds: DAabb3,
  center: DVec3,
  depth: u32,
  item_count: usize,
  kind: NodeKind,
}

impl PointOctant {
  /// Octant bounds (not tightened to the items).
  #[inline]
  pub fn bounds(&self) -> &DAabb3 {
    &self.bounds
  }

  /// Representative center: the centroid of the items for a leaf, the mean
  /// of the children's centers for an internal node.
  #[inline]
  pub fn center(&self) -> DVec3 {
    self.center
  }

  #[inline]
  pub fn depth(&self) -> u32 {
    self.depth
  }

  /// Items in this node's subtree.
  #[inline]
  pub fn item_count(&self) -> usize {
    self.item_count
  }

  #[inline]
  pub fn is_leaf(&self) -> bool {
    matches!(self.kind, NodeKind::Leaf(_))
  }

  /// Non-empty children. Empty for leaves.
  pub fn children(&self) -> &[NodeId] {
    match &self.kind {
      NodeKind::Internal(children) => children,
      NodeKind::Leaf(_) => &[],
    }
  }

  /// Items held directly by this node. Empty for internal nodes.
  pub fn item_indices(&self) -> &[usize] {
    match &self.kind {
      NodeKind::Leaf(items) => items,
      NodeKind::Internal(_) => &[],
    }
  }
}

/// Static point octree with cached representative centers.
#[derive(Clone, Debug)]
pub struct PointOctree<T> {
  items: Vec<OctreeItem<T>>,
  nodes: Vec<PointOctant>,
  root: Option<NodeId>,
}

impl<T> PointOctree<T> {
  /// Build an octree over `items`.
  ///
  /// Root bounds are the extents of all positions. A leaf splits into eight
  /// equal octants once it holds more than `max_points_per_leaf` items and
  /// sits above `max_depth`. Depths beyond [`MAX_OCTREE_DEPTH`] are clamped.
  #[cfg_attr(
    feature = "tracing-spans",
    tracing::instrument(skip_all, name = "octree::build")
  )]
  pub fn build(items: impl IntoIterator<Item = (DVec3, T)>, config: &OctreeConfig) -> Self {
    let items: Vec<OctreeItem<T>> = items
      .into_iter()
      .map(|(position, payload)| OctreeItem { position, payload })
      .collect();

    let mut tree = Self {
      items,
      nodes: Vec::new(),
      root: None,
    };

    let Some(bounds) = DAabb3::from_points(tree.items.iter().map(|item| item.position)) else {
      return tree;
    };

    let indices: Vec<usize> = (0..tree.items.len()).collect();
    let mut builder = Builder {
      items: &tree.items,
      nodes: Vec::new(),
      max_points_per_leaf: config.max_points_per_leaf.max(1),
      max_depth: config.max_depth.min(MAX_OCTREE_DEPTH),
    };
    let root = builder.build_node(bounds, indices, 0);
    tree.nodes = builder.nodes;
    tree.root = root;

    tracing::trace!(
      items = tree.items.len(),
      nodes = tree.nodes.len(),
      "built point octree"
    );
    tree
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.root.is_none()
  }

  /// Number of items.
  #[inline]
  pub fn len(&self) -> usize {
    self.items.len()
  }

  #[inline]
  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  #[inline]
  pub fn root(&self) -> Option<NodeId> {
    self.root
  }

  #[inline]
  pub fn node(&self, id: NodeId) -> &PointOctant {
    &self.nodes[id.index()]
  }

  pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &PointOctant)> {
    self
      .nodes
      .iter()
      .enumerate()
      .map(|(i, node)| (NodeId(i as u32), node))
  }

  #[inline]
  pub fn items(&self) -> &[OctreeItem<T>] {
    &self.items
  }

  #[inline]
  pub fn item(&self, index: usize) -> &OctreeItem<T> {
    &self.items[index]
  }

  /// Every item index under `id`, depth-first.
  pub fn subtree_item_indices(&self, id: NodeId) -> Vec<usize> {
    let mut out = Vec::with_capacity(self.node(id).item_count);
    let mut stack = vec![id];
    while let Some(id) = stack.pop() {
      let node = self.node(id);
      out.extend_from_slice(node.item_indices());
      stack.extend(node.children().iter().rev());
    }
    out
  }
}

struct Builder<'a, T> {
  items: &'a [OctreeItem<T>],
  nodes: Vec<PointOctant>,
  max_points_per_leaf: usize,
  max_depth: u32,
}

impl<T> Builder<'_, T> {
  /// Build the subtree for `indices`, returning `None` when it is empty.
  fn build_node(&mut self, bounds: DAabb3, indices: Vec<usize>, depth: u32) -> Option<NodeId> {
    if indices.is_empty() {
      return None;
    }

    if indices.len() <= self.max_points_per_leaf || depth >= self.max_depth {
      let sum: DVec3 = indices.iter().map(|&i| self.items[i].position).sum();
      let center = sum / indices.len() as f64;
      return Some(self.push(PointOctant {
        bounds,
        center,
        depth,
        item_count: indices.len(),
        kind: NodeKind::Leaf(SmallVec::from_vec(indices)),
      }));
    }

    let mut buckets: [Vec<usize>; 8] = Default::default();
    for i in indices {
      buckets[bounds.octant_index(self.items[i].position)].push(i);
    }

    let mut children = SmallVec::<[NodeId; 8]>::new();
    for (octant, bucket) in buckets.into_iter().enumerate() {
      if let Some(child) = self.build_node(bounds.octant(octant), bucket, depth + 1) {
        children.push(child);
      }
    }

    let center = children
      .iter()
      .map(|child| self.nodes[child.index()].center)
      .sum::<DVec3>()
      / children.len() as f64;
    let item_count = children
      .iter()
      .map(|child| self.nodes[child.index()].item_count)
      .sum();

    Some(self.push(PointOctant {
      bounds,
      center,
      depth,
      item_count,
      kind: NodeKind::Internal(children),
    }))
  }

  fn push(&mut self, node: PointOctant) -> NodeId {
    let id = NodeId(self.nodes.len() as u32);
    self.nodes.push(node);
    id
  }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
