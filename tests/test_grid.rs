use alien_assault::grid::SpatialGrid;

fn make_grid() -> SpatialGrid<u32> {
    // 4-cell buckets over an 80×40 field
    SpatialGrid::new(4.0, 80.0, 40.0)
}

#[test]
fn query_at_insert_point_returns_entity() {
    let mut grid = make_grid();
    grid.insert(1, 10.0, 10.0);
    let mut out = Vec::new();
    grid.query_into(10.0, 10.0, &mut out);
    assert_eq!(out, vec![1]);
}

#[test]
fn query_within_one_cell_returns_entity() {
    let mut grid = make_grid();
    grid.insert(1, 10.0, 10.0);
    let mut out = Vec::new();
    // Any point within one cell of the insert position sees it
    grid.query_into(6.0, 6.0, &mut out);
    assert_eq!(out, vec![1]);
    grid.query_into(13.9, 13.9, &mut out);
    assert_eq!(out, vec![1]);
}

#[test]
fn query_far_away_misses() {
    let mut grid = make_grid();
    grid.insert(1, 10.0, 10.0);
    let mut out = Vec::new();
    // Two whole cells away — outside the 3×3 neighborhood
    grid.query_into(30.0, 10.0, &mut out);
    assert!(out.is_empty());
}

#[test]
fn out_of_extent_inserts_are_dropped() {
    let mut grid = make_grid();
    grid.insert(1, -1.0, 10.0);
    grid.insert(2, 10.0, -0.5);
    grid.insert(3, 80.0, 10.0);
    grid.insert(4, 10.0, 41.0);
    let mut out = Vec::new();
    grid.query_into(10.0, 10.0, &mut out);
    grid.query_into(0.0, 0.0, &mut out);
    assert!(out.is_empty());
    grid.query_into(78.0, 38.0, &mut out);
    assert!(out.is_empty());
}

#[test]
fn same_cell_holds_multiple_entities() {
    let mut grid = make_grid();
    grid.insert(1, 10.0, 10.0);
    grid.insert(2, 11.0, 10.5);
    let mut out = Vec::new();
    grid.query_into(10.0, 10.0, &mut out);
    out.sort_unstable();
    assert_eq!(out, vec![1, 2]);
}

#[test]
fn each_entity_appears_once_per_query() {
    let mut grid = make_grid();
    grid.insert(1, 10.0, 10.0);
    let mut out = Vec::new();
    grid.query_into(10.0, 10.0, &mut out);
    assert_eq!(out.iter().filter(|&&e| e == 1).count(), 1);
}

#[test]
fn clear_empties_all_buckets() {
    let mut grid = make_grid();
    grid.insert(1, 10.0, 10.0);
    grid.insert(2, 50.0, 30.0);
    grid.clear();
    let mut out = Vec::new();
    grid.query_into(10.0, 10.0, &mut out);
    assert!(out.is_empty());
    grid.query_into(50.0, 30.0, &mut out);
    assert!(out.is_empty());
}
