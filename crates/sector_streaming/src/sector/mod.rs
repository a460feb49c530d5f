//! Sector model: identity, static metadata, and the file-backed downloader.

pub mod repository;
pub mod scene;
pub mod types;

pub use repository::{BinaryFileProvider, LocalFileProvider, SectorRepository};
pub use scene::SectorScene;
pub use types::{
  ConsumedSector, LevelOfDetail, ModelIdentifier, SectorGeometry, SectorId, SectorKey,
  SectorMetadata, WantedSector,
};
