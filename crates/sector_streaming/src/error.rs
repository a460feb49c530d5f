//! Error types shared across the crate.

use thiserror::Error;

use crate::sector::SectorId;

/// Failure of a single sector download.
///
/// Never escapes the scheduler: every variant is converted into a discarded
/// [`ConsumedSector`](crate::sector::ConsumedSector) for the affected sector.
#[derive(Debug, Error)]
pub enum DownloadError {
  /// The abort signal was observed before the fetch finished.
  #[error("download aborted")]
  Aborted,
  /// The provider has no file with the given name.
  #[error("sector file not found: {0}")]
  NotFound(String),
  /// Transport level failure.
  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),
  /// The payload was received but could not be interpreted.
  #[error("malformed sector payload: {0}")]
  Malformed(String),
  /// The downloader panicked.
  #[error("downloader panicked: {0}")]
  Panicked(String),
}

/// Failure while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config: {0}")]
  Io(#[from] std::io::Error),
  #[error("failed to parse config: {0}")]
  Parse(#[from] ron::error::SpannedError),
  #[error("invalid config: {0}")]
  Invalid(String),
}

/// Failure while assembling a [`SectorScene`](crate::sector::SectorScene).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
  #[error("scene has no sectors")]
  Empty,
  #[error("scene has more than one root (sectors {0} and {1})")]
  MultipleRoots(SectorId, SectorId),
  #[error("scene has no root sector")]
  NoRoot,
  #[error("sector {0} appears more than once")]
  DuplicateSector(SectorId),
  #[error("sector {child} references missing parent {parent}")]
  MissingParent { child: SectorId, parent: SectorId },
}

/// Failure while creating a [`DownloadScheduler`](crate::download::DownloadScheduler).
#[derive(Debug, Error)]
pub enum SchedulerError {
  #[error(transparent)]
  Config(#[from] ConfigError),
  #[error("failed to build download pool: {0}")]
  Pool(#[from] rayon::ThreadPoolBuildError),
}
