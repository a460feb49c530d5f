//! Axis-aligned bounding box with double precision for large models.

use glam::DVec3;

/// Double-precision axis-aligned bounding box.
///
/// Bounds sectors in a scene and octants in the icon octree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DAabb3 {
	/// Minimum corner (inclusive).
	pub min: DVec3,
	/// Maximum corner (inclusive).
	pub max: DVec3,
}

impl DAabb3 {
	/// Create a new AABB from min and max corners.
	///
	/// # Panics
	/// Debug-asserts that min <= max on all axes.
	pub fn new(min: DVec3, max: DVec3) -> Self {
		debug_assert!(
			min.x <= max.x && min.y <= max.y && min.z <= max.z,
			"AABB min must be <= max on all axes"
		);
		Self { min, max }
	}

	/// Tightest box around a set of points, `None` when there are none.
	pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Option<Self> {
		let mut points = points.into_iter();
		let first = points.next()?;
		let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
		Some(Self { min, max })
	}

	/// Check if this AABB overlaps with another.
	///
	/// Two AABBs overlap if they share any interior or boundary points.
	#[inline]
	pub fn overlaps(&self, other: &DAabb3) -> bool {
		self.min.x <= other.max.x
			&& self.max.x >= other.min.x
			&& self.min.y <= other.max.y
			&& self.max.y >= other.min.y
			&& self.min.z <= other.max.z
			&& self.max.z >= other.min.z
	}

	/// Check if this AABB contains a point.
	#[inline]
	pub fn contains_point(&self, point: DVec3) -> bool {
		point.x >= self.min.x
			&& point.x <= self.max.x
			&& point.y >= self.min.y
			&& point.y <= self.max.y
			&& point.z >= self.min.z
			&& point.z <= self.max.z
	}

	/// Get the center of the AABB.
	#[inline]
	pub fn center(&self) -> DVec3 {
		(self.min + self.max) * 0.5
	}

	/// The eight corners. Bit 0 selects max x, bit 1 max y, bit 2 max z.
	pub fn corners(&self) -> [DVec3; 8] {
		std::array::from_fn(|i| {
			DVec3::new(
				if i & 1 != 0 { self.max.x } else { self.min.x },
				if i & 2 != 0 { self.max.y } else { self.min.y },
				if i & 4 != 0 { self.max.z } else { self.min.z },
			)
		})
	}

	/// Child octant `index` (0..8), using the same bit layout as [`corners`](Self::corners).
	pub fn octant(&self, index: usize) -> Self {
		debug_assert!(index < 8, "octant index out of range");
		let center = self.center();
		let corner = self.corners()[index];
		Self {
			min: center.min(corner),
			max: center.max(corner),
		}
	}

	/// Octant index of `point` relative to the center. Points on a split
	/// plane go to the upper octant.
	#[inline]
	pub fn octant_index(&self, point: DVec3) -> usize {
		let center = self.center();
		(point.x >= center.x) as usize
			| ((point.y >= center.y) as usize) << 1
			| ((point.z >= center.z) as usize) << 2
	}
}
