//! IconVisibility - per-frame icon and aggregate proxy state.
//!
//! Rebuilt from scratch for every selection: all item flags cleared and all
//! proxies released before the new selection is applied, so nothing carries
//! over between frames.

use glam::DVec3;

use super::{LodSelection, NodeId, PointOctree, SelectedNode};

/// One collapsed subtree drawn as a single marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AggregateProxy {
  pub node: NodeId,
  /// Representative center of the collapsed node.
  pub position: DVec3,
  /// Items in the collapsed subtree.
  pub item_count: usize,
}

/// Visibility flags per item plus a fixed-capacity pool of proxies.
#[derive(Clone, Debug, PartialEq)]
pub struct IconVisibility {
  item_visible: Vec<bool>,
  visible_items: usize,
  proxies: Vec<AggregateProxy>,
  proxy_capacity: usize,
  dropped_proxies: usize,
}

impl IconVisibility {
  pub fn new(item_count: usize, proxy_capacity: usize) -> Self {
    Self {
      item_visible: vec![false; item_count],
      visible_items: 0,
      proxies: Vec::with_capacity(proxy_capacity),
      proxy_capacity,
      dropped_proxies: 0,
    }
  }

  /// Hide every item and release every proxy.
  pub fn reset(&mut self) {
    self.item_visible.fill(false);
    self.visible_items = 0;
    self.proxies.clear();
    self.dropped_proxies = 0;
  }

  /// Replace the current state with `selection`.
  pub fn apply<T>(&mut self, octree: &PointOctree<T>, selection: &LodSelection) {
    self.reset();

    for selected in selection.iter() {
      let node = octree.node(selected.node());
      match selected {
        SelectedNode::Items(_) => {
          for &index in node.item_indices() {
            if let Some(visible) = self.item_visible.get_mut(index) {
              if !*visible {
                *visible = true;
                self.visible_items += 1;
              }
            }
          }
        }
        SelectedNode::Aggregate(id) => {
          if self.proxies.len() >= self.proxy_capacity {
            self.dropped_proxies += 1;
            continue;
          }
          self.proxies.push(AggregateProxy {
            node: id,
            position: node.center(),
            item_count: node.item_count(),
          });
        }
      }
    }

    if self.dropped_proxies > 0 {
      tracing::warn!(
        dropped = self.dropped_proxies,
        capacity = self.proxy_capacity,
        "aggregate proxy pool exhausted"
      );
    }
  }

  #[inline]
  pub fn is_item_visible(&self, index: usize) -> bool {
    self.item_visible.get(index).copied().unwrap_or(false)
  }

  #[inline]
  pub fn visible_item_count(&self) -> usize {
    self.visible_items
  }

  /// Indices of the visible items, ascending.
  pub fn visible_items(&self) -> impl Iterator<Item = usize> + '_ {
    self
      .item_visible
      .iter()
      .enumerate()
      .filter_map(|(index, &visible)| visible.then_some(index))
  }

  #[inline]
  pub fn proxies(&self) -> &[AggregateProxy] {
    &self.proxies
  }

  #[inline]
  pub fn proxy_capacity(&self) -> usize {
    self.proxy_capacity
  }

  /// Aggregates left unshown in the last frame because the pool was full.
  #[inline]
  pub fn dropped_proxies(&self) -> usize {
    self.dropped_proxies
  }
}
