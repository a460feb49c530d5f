//! sector_streaming - Engine independent sector streaming and icon LOD
//!
//! This crate provides the streaming core of a large-model viewer. Models
//! are split into spatially bounded sectors which are downloaded on demand
//! as the camera moves, and point-like scene icons are shown individually or
//! as aggregates depending on how large they appear on screen.
//!
//! # Features
//!
//! - **Download scheduling**: Bounded concurrency, per-sector deduplication,
//!   FIFO queueing, and cancellation of queued work that is no longer wanted
//! - **Shared handles**: One result per sector, awaitable as a future or by
//!   blocking
//! - **Sector scenes**: Static sector hierarchies with spatial queries
//! - **Icon LOD**: Point octree with screen-space area based aggregation
//!
//! # Example
//!
//! ```ignore
//! use sector_streaming::{DownloadScheduler, SchedulerConfig, SectorRequest};
//!
//! let scheduler = DownloadScheduler::new(SchedulerConfig::default())?;
//!
//! // Each frame: hand over the wanted sectors
//! let requests = wanted
//!     .into_iter()
//!     .map(|sector| SectorRequest::new(sector, repository.clone()))
//!     .collect();
//! let handles = scheduler.queue_batch(requests);
//!
//! // Later: upload whatever finished
//! for consumed in scheduler.drain_completions() {
//!     upload(&consumed);
//! }
//! ```

pub mod config;
pub mod error;
pub mod metrics;

// Sector identity, metadata and file access
pub mod sector;
pub use sector::{
  BinaryFileProvider, ConsumedSector, LevelOfDetail, LocalFileProvider, ModelIdentifier,
  SectorGeometry, SectorId, SectorKey, SectorMetadata, SectorRepository, SectorScene,
  WantedSector,
};

// Bounded-concurrency downloading
pub mod download;
pub use download::{
  AbortSignal, DownloadPool, DownloadScheduler, SectorDownloader, SectorHandle, SectorRequest,
};

// Screen-space LOD for point-like icons
pub mod octree;
pub use octree::{DAabb3, IconLodController, IconVisibility, LodSelection, OctreeConfig, PointOctree};

pub use config::{SchedulerConfig, StreamingConfig};
pub use error::{ConfigError, DownloadError, SceneError, SchedulerError};
pub use metrics::StreamingMetrics;
