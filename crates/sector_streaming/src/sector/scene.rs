//! SectorScene - static sector hierarchy of one loaded model.
//!
//! Populated once per model load and read-only afterwards. The scheduler and
//! the visibility system consume it; neither fetches nor caches it.

use std::collections::HashMap;
use std::sync::Arc;

use glam::DVec3;

use super::{SectorId, SectorMetadata};
use crate::error::SceneError;
use crate::octree::DAabb3;

/// Static spatial hierarchy of sectors, indexed by id.
#[derive(Debug)]
pub struct SectorScene {
  pub version: u32,
  /// Length unit of the model ("Meters", "Feet", ...). Not interpreted here.
  pub unit: String,
  root: SectorId,
  sectors: HashMap<SectorId, Arc<SectorMetadata>>,
}

impl SectorScene {
  /// Build a scene from a flat list of sectors.
  ///
  /// Exactly one sector must lack a parent. Child lists and depths are
  /// recomputed from the parent links; children are ordered by id.
  pub fn from_sectors(
    version: u32,
    unit: impl Into<String>,
    sectors: Vec<SectorMetadata>,
  ) -> Result<Self, SceneError> {
    if sectors.is_empty() {
      return Err(SceneError::Empty);
    }

    let mut by_id: HashMap<SectorId, SectorMetadata> = HashMap::with_capacity(sectors.len());
    let mut root = None;
    for mut sector in sectors {
      sector.children.clear();
      if sector.parent_id.is_none() {
        if let Some(existing) = root {
          return Err(SceneError::MultipleRoots(existing, sector.id));
        }
        root = Some(sector.id);
      }
      let id = sector.id;
      if by_id.insert(id, sector).is_some() {
        return Err(SceneError::DuplicateSector(id));
      }
    }
    let root = root.ok_or(SceneError::NoRoot)?;

    // Link children
    let mut links: Vec<(SectorId, SectorId)> = by_id
      .values()
      .filter_map(|s| s.parent_id.map(|parent| (parent, s.id)))
      .collect();
    links.sort();
    for (parent, child) in links {
      match by_id.get_mut(&parent) {
        Some(p) => p.children.push(child),
        None => return Err(SceneError::MissingParent { child, parent }),
      }
    }

    // Depths, top-down. Sectors unreachable from the root form a cycle.
    let mut stack = vec![(root, 0u32)];
    let mut visited = 0usize;
    while let Some((id, depth)) = stack.pop() {
      visited += 1;
      if let Some(sector) = by_id.get_mut(&id) {
        sector.depth = depth;
        stack.extend(sector.children.iter().map(|&c| (c, depth + 1)));
      }
    }
    if visited != by_id.len() {
      return Err(SceneError::NoRoot);
    }

    let sectors = by_id
      .into_iter()
      .map(|(id, sector)| (id, Arc::new(sector)))
      .collect();

    Ok(Self {
      version,
      unit: unit.into(),
      root,
      sectors,
    })
  }

  pub fn sector_count(&self) -> usize {
    self.sectors.len()
  }

  pub fn root(&self) -> &Arc<SectorMetadata> {
    &self.sectors[&self.root]
  }

  pub fn get_sector_by_id(&self, id: SectorId) -> Option<&Arc<SectorMetadata>> {
    self.sectors.get(&id)
  }

  /// All sectors, ordered by id.
  pub fn all_sectors(&self) -> Vec<Arc<SectorMetadata>> {
    let mut all: Vec<_> = self.sectors.values().cloned().collect();
    all.sort_by_key(|s| s.id);
    all
  }

  /// Depth-first traversal from the root. Returning `false` from `visit`
  /// skips the sector's subtree.
  pub fn traverse_depth_first(&self, mut visit: impl FnMut(&Arc<SectorMetadata>) -> bool) {
    let mut stack = vec![self.root];
    while let Some(id) = stack.pop() {
      let Some(sector) = self.sectors.get(&id) else {
        continue;
      };
      if visit(sector) {
        // Reverse so children are visited in id order
        stack.extend(sector.children.iter().rev().copied());
      }
    }
  }

  /// Sectors whose bounds contain `point`, parents before children.
  pub fn sectors_containing_point(&self, point: DVec3) -> Vec<Arc<SectorMetadata>> {
    let mut accepted = Vec::new();
    self.traverse_depth_first(|sector| {
      if sector.bounds.contains_point(point) {
        accepted.push(Arc::clone(sector));
        true
      } else {
        false
      }
    });
    accepted
  }

  /// Sectors whose bounds overlap `bounds`, parents before children.
  pub fn sectors_intersecting_box(&self, bounds: &DAabb3) -> Vec<Arc<SectorMetadata>> {
    let mut accepted = Vec::new();
    self.traverse_depth_first(|sector| {
      if sector.bounds.overlaps(bounds) {
        accepted.push(Arc::clone(sector));
        true
      } else {
        false
      }
    });
    accepted
  }
}

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;
