use glam::DVec3;

use super::*;

fn aabb(min: f64, max: f64) -> DAabb3 {
  DAabb3::new(DVec3::splat(min), DVec3::splat(max))
}

/// Root 0 covering [0, 8], children 1 = [0, 4] and 2 = [4, 8], grandchild 3 = [0, 2].
fn small_scene() -> SectorScene {
  let sectors = vec![
    SectorMetadata::new(SectorId(2), Some(SectorId(0)), aabb(4.0, 8.0)),
    SectorMetadata::new(SectorId(0), None, aabb(0.0, 8.0)),
    SectorMetadata::new(SectorId(3), Some(SectorId(1)), aabb(0.0, 2.0)),
    SectorMetadata::new(SectorId(1), Some(SectorId(0)), aabb(0.0, 4.0)),
  ];
  SectorScene::from_sectors(9, "Meters", sectors).unwrap()
}

#[test]
fn test_links_children_and_depths() {
  let scene = small_scene();

  assert_eq!(scene.sector_count(), 4);
  assert_eq!(scene.root().id, SectorId(0));
  assert_eq!(scene.root().children, vec![SectorId(1), SectorId(2)]);

  let grandchild = scene.get_sector_by_id(SectorId(3)).unwrap();
  assert_eq!(grandchild.depth, 2);
  assert_eq!(scene.get_sector_by_id(SectorId(2)).unwrap().depth, 1);
}

#[test]
fn test_all_sectors_sorted() {
  let ids: Vec<_> = small_scene().all_sectors().iter().map(|s| s.id.0).collect();
  assert_eq!(ids, vec![0, 1, 2, 3]);
}

#[test]
fn test_traverse_depth_first_order() {
  let scene = small_scene();
  let mut order = Vec::new();
  scene.traverse_depth_first(|s| {
    order.push(s.id.0);
    true
  });
  assert_eq!(order, vec![0, 1, 3, 2]);
}

#[test]
fn test_traverse_can_skip_subtrees() {
  let scene = small_scene();
  let mut order = Vec::new();
  scene.traverse_depth_first(|s| {
    order.push(s.id.0);
    s.id != SectorId(1)
  });
  assert_eq!(order, vec![0, 1, 2]);
}

#[test]
fn test_sectors_containing_point() {
  let scene = small_scene();
  let ids: Vec<_> = scene
    .sectors_containing_point(DVec3::splat(1.0))
    .iter()
    .map(|s| s.id.0)
    .collect();
  assert_eq!(ids, vec![0, 1, 3]);

  assert!(scene.sectors_containing_point(DVec3::splat(20.0)).is_empty());
}

#[test]
fn test_sectors_intersecting_box() {
  let scene = small_scene();
  let ids: Vec<_> = scene
    .sectors_intersecting_box(&aabb(5.0, 6.0))
    .iter()
    .map(|s| s.id.0)
    .collect();
  assert_eq!(ids, vec![0, 2]);
}

#[test]
fn test_rejects_empty() {
  assert_eq!(
    SectorScene::from_sectors(1, "Meters", Vec::new()).unwrap_err(),
    SceneError::Empty
  );
}

#[test]
fn test_rejects_multiple_roots() {
  let sectors = vec![
    SectorMetadata::new(SectorId(0), None, aabb(0.0, 1.0)),
    SectorMetadata::new(SectorId(1), None, aabb(0.0, 1.0)),
  ];
  assert_eq!(
    SectorScene::from_sectors(1, "Meters", sectors).unwrap_err(),
    SceneError::MultipleRoots(SectorId(0), SectorId(1))
  );
}

#[test]
fn test_rejects_missing_parent() {
  let sectors = vec![
    SectorMetadata::new(SectorId(0), None, aabb(0.0, 1.0)),
    SectorMetadata::new(SectorId(1), Some(SectorId(5)), aabb(0.0, 1.0)),
  ];
  assert_eq!(
    SectorScene::from_sectors(1, "Meters", sectors).unwrap_err(),
    SceneError::MissingParent {
      child: SectorId(1),
      parent: SectorId(5)
    }
  );
}

#[test]
fn test_rejects_duplicates() {
  let sectors = vec![
    SectorMetadata::new(SectorId(0), None, aabb(0.0, 1.0)),
    SectorMetadata::new(SectorId(1), Some(SectorId(0)), aabb(0.0, 1.0)),
    SectorMetadata::new(SectorId(1), Some(SectorId(0)), aabb(0.0, 1.0)),
  ];
  assert_eq!(
    SectorScene::from_sectors(1, "Meters", sectors).unwrap_err(),
    SceneError::DuplicateSector(SectorId(1))
  );
}
