//! Sector repository - a [`SectorDownloader`] backed by a binary file provider.
//!
//! Geometry bytes are returned as-is; parsing belongs to the geometry parser
//! collaborator downstream of the scheduler.

use std::io::Read;
use std::path::PathBuf;

use super::{ConsumedSector, LevelOfDetail, SectorGeometry, WantedSector};
use crate::download::{AbortSignal, SectorDownloader};
use crate::error::DownloadError;

/// Source of raw sector files (HTTP, local disk, ...).
pub trait BinaryFileProvider: Send + Sync {
  /// Fetch `file_name` relative to `base_url`.
  ///
  /// Implementations should poll `abort` between chunks and return
  /// [`DownloadError::Aborted`] once it is set.
  fn fetch(
    &self,
    base_url: &str,
    file_name: &str,
    abort: &AbortSignal,
  ) -> Result<Vec<u8>, DownloadError>;
}

/// Reads sector files from the local filesystem.
///
/// `base_url` of the request is treated as a directory relative to `root`.
pub struct LocalFileProvider {
  root: PathBuf,
  chunk_size: usize,
}

impl LocalFileProvider {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      chunk_size: 64 * 1024,
    }
  }
}

impl BinaryFileProvider for LocalFileProvider {
  fn fetch(
    &self,
    base_url: &str,
    file_name: &str,
    abort: &AbortSignal,
  ) -> Result<Vec<u8>, DownloadError> {
    let path = self.root.join(base_url).join(file_name);
    let mut file = match std::fs::File::open(&path) {
      Ok(file) => file,
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
        return Err(DownloadError::NotFound(path.display().to_string()));
      }
      Err(err) => return Err(err.into()),
    };

    let mut bytes = Vec::new();
    let mut chunk = vec![0u8; self.chunk_size];
    loop {
      if abort.is_aborted() {
        return Err(DownloadError::Aborted);
      }
      let read = file.read(&mut chunk)?;
      if read == 0 {
        break;
      }
      bytes.extend_from_slice(&chunk[..read]);
    }
    Ok(bytes)
  }
}

/// Downloads sectors through a [`BinaryFileProvider`].
pub struct SectorRepository<P: BinaryFileProvider> {
  provider: P,
}

impl<P: BinaryFileProvider> SectorRepository<P> {
  pub fn new(provider: P) -> Self {
    Self { provider }
  }

  pub fn provider(&self) -> &P {
    &self.provider
  }
}

impl<P: BinaryFileProvider> SectorDownloader for SectorRepository<P> {
  fn download(
    &self,
    sector: &WantedSector,
    abort: &AbortSignal,
  ) -> Result<ConsumedSector, DownloadError> {
    let metadata = &sector.metadata;

    // Nothing to fetch: resolve as an empty, fully detailed sector
    let Some(file_name) = metadata.sector_file_name.as_deref().filter(|_| metadata.download_size > 0)
    else {
      return Ok(ConsumedSector {
        level_of_detail: LevelOfDetail::Detailed,
        ..ConsumedSector::loaded(sector, None)
      });
    };

    if sector.level_of_detail == LevelOfDetail::Discarded {
      return Ok(ConsumedSector::discarded(sector));
    }

    if abort.is_aborted() {
      return Err(DownloadError::Aborted);
    }
    let bytes = self.provider.fetch(&sector.model_base_url, file_name, abort)?;
    if abort.is_aborted() {
      return Err(DownloadError::Aborted);
    }

    Ok(ConsumedSector::loaded(sector, Some(SectorGeometry { bytes })))
  }
}

#[cfg(test)]
#[path = "repository_test.rs"]
mod repository_test;
