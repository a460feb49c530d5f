//! Screen-space footprint of a bounding box.

use glam::{DMat4, DVec2};

use super::DAabb3;

/// Projected area of `bounds` as a fraction of the viewport (0..=1).
///
/// All eight corners go through `view_projection` with a perspective divide;
/// the 2D extent of the results is mapped from NDC `[-1, 1]` to `[0, 1]` and
/// clamped to the viewport. A non-finite result counts as zero.
pub fn screen_area(bounds: &DAabb3, view_projection: &DMat4) -> f64 {
  let mut min = DVec2::splat(f64::INFINITY);
  let mut max = DVec2::splat(f64::NEG_INFINITY);

  for corner in bounds.corners() {
    let clip = *view_projection * corner.extend(1.0);
    let ndc = DVec2::new(clip.x, clip.y) / clip.w;
    min = min.min(ndc);
    max = max.max(ndc);
  }

  let min = (min * 0.5 + 0.5).clamp(DVec2::ZERO, DVec2::ONE);
  let max = (max * 0.5 + 0.5).clamp(DVec2::ZERO, DVec2::ONE);
  // Negative when no corner produced a finite position
  let extent = (max - min).max(DVec2::ZERO);
  let area = extent.x * extent.y;

  if area.is_finite() {
    area
  } else {
    0.0
  }
}

#[cfg(test)]
mod tests {
  use glam::DVec3;

  use super::*;

  fn camera(eye: DVec3) -> DMat4 {
    let projection = DMat4::perspective_rh(60f64.to_radians(), 1.0, 0.1, 1000.0);
    let view = DMat4::look_at_rh(eye, DVec3::ZERO, DVec3::Y);
    projection * view
  }

  #[test]
  fn test_identity_maps_ndc_cube_to_full_viewport() {
    let bounds = DAabb3::new(DVec3::splat(-1.0), DVec3::splat(1.0));
    assert_eq!(screen_area(&bounds, &DMat4::IDENTITY), 1.0);
  }

  #[test]
  fn test_identity_quarter_viewport() {
    let bounds = DAabb3::new(DVec3::new(0.0, 0.0, -1.0), DVec3::new(1.0, 1.0, 1.0));
    assert_eq!(screen_area(&bounds, &DMat4::IDENTITY), 0.25);
  }

  #[test]
  fn test_clamped_to_viewport() {
    let bounds = DAabb3::new(DVec3::splat(-10.0), DVec3::splat(10.0));
    assert_eq!(screen_area(&bounds, &DMat4::IDENTITY), 1.0);

    let offscreen = DAabb3::new(DVec3::new(2.0, 2.0, 0.0), DVec3::new(3.0, 3.0, 0.0));
    assert_eq!(screen_area(&offscreen, &DMat4::IDENTITY), 0.0);
  }

  #[test]
  fn test_shrinks_with_distance() {
    let bounds = DAabb3::new(DVec3::splat(-0.5), DVec3::splat(0.5));
    let mut previous = f64::INFINITY;
    for distance in [3.0, 6.0, 12.0, 24.0, 48.0] {
      let area = screen_area(&bounds, &camera(DVec3::new(0.0, 0.0, distance)));
      assert!(area > 0.0);
      assert!(area < previous, "area {area} at {distance} did not shrink");
      previous = area;
    }
  }

  #[test]
  fn test_degenerate_projection_is_zero() {
    let bounds = DAabb3::new(DVec3::ZERO, DVec3::ONE);
    assert_eq!(screen_area(&bounds, &DMat4::ZERO), 0.0);

    let point = DAabb3::new(DVec3::splat(0.2), DVec3::splat(0.2));
    assert_eq!(screen_area(&point, &DMat4::IDENTITY), 0.0);
  }
}
