//! Point octree with screen-space level-of-detail selection.
//!
//! Icons (360 image markers and similar point-like scene elements) are
//! indexed once into a static octree. Each frame the view-projection matrix
//! decides which subtrees are large enough on screen to show their items
//! individually and which collapse into one aggregate proxy.
//!
//! # Module Structure
//!
//! - [`bounds`]: `DAabb3` - double-precision bounding box
//! - [`config`]: `OctreeConfig` - build limits and area threshold
//! - [`tree`]: `PointOctree` - arena-backed static octree
//! - [`projection`]: screen-space area of a box
//! - [`selection`]: `LodSelection` - per-frame node selection
//! - [`visibility`]: `IconVisibility` - item flags and proxy pool
//! - [`controller`]: `IconLodController` - per-frame hook tying it together

pub mod bounds;
pub mod config;
pub mod controller;
pub mod projection;
pub mod selection;
pub mod tree;
pub mod visibility;

// Re-exports
pub use bounds::DAabb3;
pub use config::OctreeConfig;
pub use controller::IconLodController;
pub use projection::screen_area;
pub use selection::{LodSelection, SelectedNode};
pub use tree::{NodeId, OctreeItem, PointOctant, PointOctree};
pub use visibility::{AggregateProxy, IconVisibility};
