use super::*;

#[test]
fn test_defaults_are_valid() {
  let config = OctreeConfig::default();
  assert_eq!(config.max_aggregate_proxies, 1000);
  assert!(config.validate().is_ok());
}

#[test]
fn test_zero_threshold_is_valid() {
  let config = OctreeConfig {
    screen_area_threshold: 0.0,
    ..OctreeConfig::default()
  };
  assert!(config.validate().is_ok());
}

#[test]
fn test_rejects_non_finite_threshold() {
  for threshold in [f64::NAN, f64::INFINITY, -0.5] {
    let config = OctreeConfig {
      screen_area_threshold: threshold,
      ..OctreeConfig::default()
    };
    assert!(
      matches!(config.validate(), Err(ConfigError::Invalid(_))),
      "threshold {threshold} should be rejected"
    );
  }
}

#[test]
fn test_rejects_empty_leaves() {
  let config = OctreeConfig {
    max_points_per_leaf: 0,
    ..OctreeConfig::default()
  };
  assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_rejects_excessive_depth() {
  let at_cap = OctreeConfig {
    max_depth: MAX_OCTREE_DEPTH,
    ..OctreeConfig::default()
  };
  assert!(at_cap.validate().is_ok());

  let config = OctreeConfig {
    max_depth: 2_000_000,
    ..OctreeConfig::default()
  };
  assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}
