use glam::DVec3;

use super::*;
use crate::octree::OctreeConfig;

const THRESHOLD: f64 = 0.025;

/// 4x4x4 grid of icons inside [-0.75, 0.75]^3.
fn icon_grid() -> PointOctree<usize> {
  let mut points = Vec::new();
  for z in 0..4 {
    for y in 0..4 {
      for x in 0..4 {
        let p = DVec3::new(x as f64, y as f64, z as f64) * 0.5 - DVec3::splat(0.75);
        points.push((p, points.len()));
      }
    }
  }
  PointOctree::build(points, &OctreeConfig::default())
}

fn camera_at(eye: DVec3) -> DMat4 {
  let projection = DMat4::perspective_rh(60f64.to_radians(), 1.0, 0.1, 1000.0);
  projection * DMat4::look_at_rh(eye, DVec3::ZERO, DVec3::Y)
}

/// Every item appears under at least one selected node.
fn assert_covers_all<T>(tree: &PointOctree<T>, selection: &LodSelection) {
  let mut covered = vec![0usize; tree.len()];
  for selected in selection.iter() {
    for index in tree.subtree_item_indices(selected.node()) {
      covered[index] += 1;
    }
  }
  assert!(covered.iter().all(|&count| count >= 1), "items left uncovered: {covered:?}");
}

/// Items shown individually through selected leaves.
fn individual_items<T>(tree: &PointOctree<T>, selection: &LodSelection) -> usize {
  selection
    .item_nodes()
    .map(|id| tree.node(id).item_indices().len())
    .sum()
}

#[test]
fn test_empty_tree_selects_nothing() {
  let tree = PointOctree::<u8>::build(Vec::new(), &OctreeConfig::default());
  assert!(tree.select(&camera_at(DVec3::Z * 5.0), THRESHOLD).is_empty());
}

#[test]
fn test_leaf_root_is_always_shown() {
  let tree = PointOctree::build([(DVec3::ZERO, 0), (DVec3::ONE, 1)], &OctreeConfig::default());
  let root = tree.root().unwrap();

  for distance in [2.0, 2000.0] {
    let selection = tree.select(&camera_at(DVec3::Z * distance), THRESHOLD);
    assert_eq!(selection.iter().collect::<Vec<_>>(), vec![SelectedNode::Items(root)]);
  }
}

#[test]
fn test_close_camera_shows_individual_items() {
  let tree = icon_grid();
  let selection = tree.select(&camera_at(DVec3::new(0.0, 0.0, 3.0)), THRESHOLD);

  assert!(selection.len() >= 8);
  assert!(selection.item_nodes().count() > 0);
  assert_covers_all(&tree, &selection);
}

#[test]
fn test_far_camera_collapses_to_root() {
  let tree = icon_grid();
  let root = tree.root().unwrap();
  let selection = tree.select(&camera_at(DVec3::new(0.0, 0.0, 500.0)), THRESHOLD);

  assert_eq!(selection.iter().collect::<Vec<_>>(), vec![SelectedNode::Aggregate(root)]);
}

#[test]
fn test_selection_coarsens_with_distance() {
  let tree = icon_grid();
  let mut previous = usize::MAX;

  for distance in [3.0, 6.0, 12.0, 24.0, 48.0, 96.0] {
    let selection = tree.select(&camera_at(DVec3::new(0.0, 0.0, distance)), THRESHOLD);
    assert_covers_all(&tree, &selection);
    let shown = individual_items(&tree, &selection);
    assert!(
      shown <= previous,
      "{shown} individual items at distance {distance}, {previous} closer in"
    );
    previous = shown;
  }
  assert_eq!(previous, 0);
  assert!(individual_items(&tree, &tree.select(&camera_at(DVec3::Z * 3.0), THRESHOLD)) > 0);
}

#[test]
fn test_higher_threshold_is_coarser() {
  let tree = icon_grid();
  let view_projection = camera_at(DVec3::new(1.0, 2.0, 4.0));

  let fine = tree.select(&view_projection, 0.001);
  let coarse = tree.select(&view_projection, 0.5);
  assert!(individual_items(&tree, &coarse) <= individual_items(&tree, &fine));
  assert_covers_all(&tree, &fine);
  assert_covers_all(&tree, &coarse);
}

#[test]
fn test_all_small_children_collapse_parent() {
  // A tight cluster and a lone point in opposite root octants
  let points = vec![
    (DVec3::new(0.0, 0.0, 0.0), 0),
    (DVec3::new(0.01, 0.0, 0.0), 1),
    (DVec3::new(0.02, 0.0, 0.0), 2),
    (DVec3::new(1.0, 1.0, 1.0), 3),
  ];
  let tree = PointOctree::build(points, &OctreeConfig::default());
  let root = tree.root().unwrap();

  // Threshold above every child's area: the root collapses as a whole
  let selection = tree.select(&DMat4::IDENTITY, 0.9);
  assert_eq!(selection.iter().collect::<Vec<_>>(), vec![SelectedNode::Aggregate(root)]);

  // Both root children are octants of [0,1]^3 covering 1/16 of the viewport
  let selection = tree.select(&DMat4::IDENTITY, 0.0625);
  assert!(!selection.iter().any(|s| s == SelectedNode::Aggregate(root)));
  assert_covers_all(&tree, &selection);
}

#[test]
fn test_mixed_children_expand_and_aggregate() {
  // Two icons in the lower-left octant, one pushed off the right edge
  let points = vec![
    (DVec3::new(-0.9, -0.9, 0.0), 0),
    (DVec3::new(-0.88, -0.9, 0.0), 1),
    (DVec3::new(2.9, 2.9, 0.5), 2),
  ];
  let tree = PointOctree::build(points, &OctreeConfig::default());
  let root = tree.root().unwrap();
  let children = tree.node(root).children().to_vec();
  assert_eq!(children.len(), 2);

  // Lower-left octant covers 0.95 x 0.95 of the viewport, the other one is
  // clamped away entirely
  let on_screen = children[0];
  assert!(tree.node(on_screen).is_leaf());
  assert!(screen_area(tree.node(on_screen).bounds(), &DMat4::IDENTITY) > 0.9);
  assert_eq!(screen_area(tree.node(children[1]).bounds(), &DMat4::IDENTITY), 0.0);

  let selection = tree.select(&DMat4::IDENTITY, 0.5);
  assert_eq!(
    selection.iter().collect::<Vec<_>>(),
    vec![SelectedNode::Aggregate(root), SelectedNode::Items(on_screen)]
  );
}

#[test]
fn test_parent_aggregated_once_for_many_small_children() {
  let tree = icon_grid();
  let root = tree.root().unwrap();
  let selection = tree.select(&camera_at(DVec3::Z * 500.0), THRESHOLD);

  let aggregates: Vec<_> = selection.aggregate_nodes().collect();
  assert_eq!(aggregates, vec![root]);
  assert_eq!(tree.node(root).children().len(), 8);
}

#[test]
fn test_selection_is_frame_independent() {
  let tree = icon_grid();
  let near = camera_at(DVec3::new(0.0, 0.0, 3.0));
  let far = camera_at(DVec3::new(40.0, 10.0, 40.0));

  let first = tree.select(&near, THRESHOLD);
  let _ = tree.select(&far, THRESHOLD);
  let again = tree.select(&near, THRESHOLD);

  assert_eq!(first, again);
}
