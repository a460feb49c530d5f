//! Sector identity and request/result types.

use std::fmt;
use std::sync::Arc;

use crate::octree::DAabb3;

// =============================================================================
// Identity
// =============================================================================

/// Opaque handle scoping sectors to one loaded model.
///
/// Cloning is cheap (shared string).
#[derive(Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ModelIdentifier(Arc<str>);

impl ModelIdentifier {
  pub fn new(id: impl Into<Arc<str>>) -> Self {
    Self(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ModelIdentifier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for ModelIdentifier {
  fn from(id: &str) -> Self {
    Self::new(id)
  }
}

/// Sector id, unique within a model.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct SectorId(pub u32);

impl fmt::Display for SectorId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Download identity: `(model, sector)`.
///
/// Level of detail is deliberately not part of the key. Two requests for the
/// same key are the same unit of work regardless of the LOD they ask for.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct SectorKey {
  pub model_identifier: ModelIdentifier,
  pub sector_id: SectorId,
}

impl fmt::Display for SectorKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{}", self.sector_id, self.model_identifier)
  }
}

// =============================================================================
// Level of detail
// =============================================================================

/// Requested fidelity of a sector.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub enum LevelOfDetail {
  Discarded,
  Simple,
  Detailed,
}

// =============================================================================
// Static metadata
// =============================================================================

/// Static description of one node in a model's sector hierarchy.
#[derive(Clone, Debug, PartialEq)]
pub struct SectorMetadata {
  pub id: SectorId,
  /// `None` for the root sector.
  pub parent_id: Option<SectorId>,
  /// Depth below the root (root = 0).
  pub depth: u32,
  pub bounds: DAabb3,
  /// Size of the sector file in bytes. Zero means there is nothing to fetch.
  pub download_size: u64,
  /// File holding the sector geometry, if the sector has any.
  pub sector_file_name: Option<String>,
  /// Filled in by [`SectorScene`](super::SectorScene) when the hierarchy is linked.
  pub children: Vec<SectorId>,
}

impl SectorMetadata {
  pub fn new(id: SectorId, parent_id: Option<SectorId>, bounds: DAabb3) -> Self {
    Self {
      id,
      parent_id,
      depth: 0,
      bounds,
      download_size: 0,
      sector_file_name: None,
      children: Vec::new(),
    }
  }

  /// Attach a sector file of the given size.
  pub fn with_file(mut self, file_name: impl Into<String>, download_size: u64) -> Self {
    self.sector_file_name = Some(file_name.into());
    self.download_size = download_size;
    self
  }

  /// True when the sector has no geometry file to download.
  pub fn is_empty(&self) -> bool {
    self.sector_file_name.is_none() || self.download_size == 0
  }
}

// =============================================================================
// Requests and results
// =============================================================================

/// A sector the visibility system wants at a given level of detail.
#[derive(Clone, Debug)]
pub struct WantedSector {
  pub model_identifier: ModelIdentifier,
  /// Base location of the model's files (URL, directory, ...).
  pub model_base_url: String,
  pub level_of_detail: LevelOfDetail,
  pub metadata: Arc<SectorMetadata>,
}

impl WantedSector {
  pub fn new(
    model_identifier: ModelIdentifier,
    model_base_url: impl Into<String>,
    metadata: Arc<SectorMetadata>,
    level_of_detail: LevelOfDetail,
  ) -> Self {
    Self {
      model_identifier,
      model_base_url: model_base_url.into(),
      level_of_detail,
      metadata,
    }
  }

  #[inline]
  pub fn sector_id(&self) -> SectorId {
    self.metadata.id
  }

  /// Download identity of this request.
  pub fn key(&self) -> SectorKey {
    SectorKey {
      model_identifier: self.model_identifier.clone(),
      sector_id: self.metadata.id,
    }
  }

  /// Same sector, different level of detail.
  pub fn with_level_of_detail(&self, level_of_detail: LevelOfDetail) -> Self {
    Self {
      level_of_detail,
      ..self.clone()
    }
  }
}

/// Raw geometry bytes of a downloaded sector.
///
/// Interpreting the bytes is the job of the geometry parser collaborator.
#[derive(Clone, PartialEq, Eq)]
pub struct SectorGeometry {
  pub bytes: Vec<u8>,
}

impl fmt::Debug for SectorGeometry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "SectorGeometry([{} bytes])", self.bytes.len())
  }
}

/// Result of a sector download: geometry, or a "not available" marker.
///
/// Callers treat discarded and failed sectors identically.
#[derive(Clone, Debug, PartialEq)]
pub struct ConsumedSector {
  pub model_identifier: ModelIdentifier,
  pub metadata: Arc<SectorMetadata>,
  pub level_of_detail: LevelOfDetail,
  pub geometry: Option<SectorGeometry>,
}

impl ConsumedSector {
  /// Discarded marker for the given request.
  pub fn discarded(sector: &WantedSector) -> Self {
    Self {
      model_identifier: sector.model_identifier.clone(),
      metadata: Arc::clone(&sector.metadata),
      level_of_detail: LevelOfDetail::Discarded,
      geometry: None,
    }
  }

  /// Loaded sector at the requested level of detail.
  pub fn loaded(sector: &WantedSector, geometry: Option<SectorGeometry>) -> Self {
    Self {
      model_identifier: sector.model_identifier.clone(),
      metadata: Arc::clone(&sector.metadata),
      level_of_detail: sector.level_of_detail,
      geometry,
    }
  }

  #[inline]
  pub fn sector_id(&self) -> SectorId {
    self.metadata.id
  }

  pub fn is_discarded(&self) -> bool {
    self.level_of_detail == LevelOfDetail::Discarded
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
