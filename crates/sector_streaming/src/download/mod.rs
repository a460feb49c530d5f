//! Sector downloading: bounded scheduler, shared result handles, worker pool.

pub mod downloader;
pub mod handle;
pub mod pool;
pub mod scheduler;

pub use downloader::{AbortSignal, SectorDownloader, SectorRequest};
pub use handle::SectorHandle;
pub use pool::DownloadPool;
pub use scheduler::DownloadScheduler;
