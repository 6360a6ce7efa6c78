//! Ladder flood propagation from the river outward.
//!
//! Each row floods independently to the left and right of the river. A
//! barrier behind the walk position hard-stops a direction; two consecutive
//! vegetation tiles soft-stop it. Steps beyond the bank bleed vertically
//! into neighboring rows, widening the flood roughly triangularly away from
//! the point of overflow.

use std::collections::BTreeSet;

use flood_force_core::{InfraKind, TileCoord, TileKind};

use crate::grid::Grid;
use crate::infrastructure::InfrastructureRegistry;

/// Upper bound on how many rows a single walk step may bleed vertically.
const MAX_VERTICAL_SPREAD: u32 = 4;

/// Horizontal walk orientation relative to the river.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WalkDirection {
    /// Walking toward column zero.
    Left,
    /// Walking toward the last column.
    Right,
}

impl WalkDirection {
    /// Column one step back toward the river from the given walk column.
    fn toward_river(self, column: u32, columns: u32) -> Option<u32> {
        match self {
            Self::Right => column.checked_sub(1),
            Self::Left => {
                let back = column + 1;
                (back < columns).then_some(back)
            }
        }
    }
}

/// Runs the full propagation pass: reverts stale flood water, then floods
/// outward from the river bank of every row.
pub(crate) fn propagate(grid: &mut Grid, infrastructure: &InfrastructureRegistry) {
    reset_flooding(grid);
    for row in 0..grid.rows() {
        let Some(center) = grid.river_center(row) else {
            continue;
        };
        flood_direction(grid, infrastructure, row, center + 2, WalkDirection::Right);
        if let Some(left_bank) = center.checked_sub(1) {
            flood_direction(grid, infrastructure, row, left_bank, WalkDirection::Left);
        }
    }
}

/// Reverts flood-induced water to its recorded terrain. Permanent river
/// tiles carry no `was_land` marker and are never touched.
fn reset_flooding(grid: &mut Grid) {
    for tile in grid.tiles_mut() {
        if tile.kind == TileKind::Water && tile.was_land {
            if let Some(original) = tile.original_kind {
                tile.kind = original;
            }
            tile.water_level = 0.0;
            tile.was_land = false;
        }
    }
}

fn walk_columns(start: u32, columns: u32, direction: WalkDirection) -> Vec<u32> {
    match direction {
        WalkDirection::Right => (start..columns).collect(),
        WalkDirection::Left => (0..=start.min(columns.saturating_sub(1))).rev().collect(),
    }
}

fn flood_direction(
    grid: &mut Grid,
    infrastructure: &InfrastructureRegistry,
    row: u32,
    start: u32,
    direction: WalkDirection,
) {
    let columns = grid.columns();
    let mut steps_from_river: u32 = 0;
    let mut consecutive_vegetation: u32 = 0;
    let mut flooded: BTreeSet<TileCoord> = BTreeSet::new();

    for column in walk_columns(start, columns, direction) {
        if let Some(behind) = direction.toward_river(column, columns) {
            if infrastructure.kind_at(TileCoord::new(behind, row)) == Some(InfraKind::Barrier) {
                return;
            }
        }

        let coord = TileCoord::new(column, row);
        let Some(tile) = grid.tile(coord) else {
            return;
        };

        // Permanent river tiles are passed over, never re-marked.
        if tile.kind == TileKind::Water && !tile.was_land {
            continue;
        }

        if infrastructure.kind_at(coord) == Some(InfraKind::Vegetation) {
            consecutive_vegetation += 1;
            if consecutive_vegetation >= 2 {
                return;
            }
            // A lone tree is passed over without receiving floodwater.
            continue;
        }
        consecutive_vegetation = 0;

        if !matches!(tile.kind, TileKind::Land | TileKind::RiverBank) {
            continue;
        }

        flood_tile(grid, coord);
        let _ = flooded.insert(coord);

        if steps_from_river == 0 {
            // Water crosses the narrow gap behind the first flooded tile.
            if let Some(back) = direction.toward_river(column, columns) {
                let back_coord = TileCoord::new(back, row);
                if infrastructure.kind_at(back_coord) != Some(InfraKind::Vegetation) {
                    flood_tile(grid, back_coord);
                    let _ = flooded.insert(back_coord);
                }
            }
        } else {
            bleed_vertically(
                grid,
                infrastructure,
                coord,
                steps_from_river,
                direction,
                &mut flooded,
            );
        }

        steps_from_river += 1;
    }
}

/// Spreads flooding from a walk step into neighboring rows, symmetrically
/// up and down, up to `min(distance, MAX_VERTICAL_SPREAD)` rows away.
fn bleed_vertically(
    grid: &mut Grid,
    infrastructure: &InfrastructureRegistry,
    from: TileCoord,
    distance: u32,
    direction: WalkDirection,
    flooded: &mut BTreeSet<TileCoord>,
) {
    let reach = distance.min(MAX_VERTICAL_SPREAD);
    for step in 1..=reach {
        let Some(above) = from.row().checked_sub(step) else {
            break;
        };
        let target = TileCoord::new(from.column(), above);
        if !bleed_into(grid, infrastructure, target, direction, flooded) {
            break;
        }
    }
    for step in 1..=reach {
        let below = from.row() + step;
        if below >= grid.rows() {
            break;
        }
        let target = TileCoord::new(from.column(), below);
        if !bleed_into(grid, infrastructure, target, direction, flooded) {
            break;
        }
    }
}

/// Attempts to flood a vertical-bleed target. Returns `false` when the
/// bleed must stop in this vertical direction.
fn bleed_into(
    grid: &mut Grid,
    infrastructure: &InfrastructureRegistry,
    target: TileCoord,
    direction: WalkDirection,
    flooded: &mut BTreeSet<TileCoord>,
) -> bool {
    if infrastructure.kind_at(target) == Some(InfraKind::Vegetation) {
        return false;
    }
    if flooded.contains(&target) {
        return true;
    }
    // Never cross into a column already fed from the opposite direction:
    // a water tile between the target and the river means this column was
    // reached some other way, or is the river itself.
    if let Some(guard) = direction.toward_river(target.column(), grid.columns()) {
        let guard_coord = TileCoord::new(guard, target.row());
        let guarded = grid
            .tile(guard_coord)
            .map_or(false, |tile| tile.kind == TileKind::Water);
        if guarded {
            return true;
        }
    }
    flood_tile(grid, target);
    let _ = flooded.insert(target);
    true
}

/// Converts a land or river-bank tile to flood water, recording its
/// original terrain the first time it floods.
fn flood_tile(grid: &mut Grid, coord: TileCoord) {
    if let Some(tile) = grid.tile_mut(coord) {
        if matches!(tile.kind, TileKind::Land | TileKind::RiverBank) {
            if tile.original_kind.is_none() {
                tile.original_kind = Some(tile.kind);
            }
            tile.was_land = true;
            tile.kind = TileKind::Water;
            tile.water_level = 1.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: u32 = 3;

    fn grid(columns: u32, rows: u32) -> Grid {
        Grid::with_straight_river(columns, rows, CENTER).expect("grid")
    }

    fn kind_at(grid: &Grid, column: u32, row: u32) -> TileKind {
        grid.tile(TileCoord::new(column, row)).expect("tile").kind
    }

    fn is_flood_water(grid: &Grid, column: u32, row: u32) -> bool {
        let tile = grid.tile(TileCoord::new(column, row)).expect("tile");
        tile.kind == TileKind::Water && tile.was_land
    }

    #[test]
    fn open_row_floods_to_both_edges() {
        let mut grid = grid(10, 1);
        propagate(&mut grid, &InfrastructureRegistry::new());
        for column in 0..10 {
            assert_eq!(
                kind_at(&grid, column, 0),
                TileKind::Water,
                "column {column} should be under water",
            );
        }
        // The river itself keeps its permanence marker.
        assert!(!is_flood_water(&grid, CENTER, 0));
        assert!(!is_flood_water(&grid, CENTER + 1, 0));
        assert!(is_flood_water(&grid, 0, 0));
        assert!(is_flood_water(&grid, 9, 0));
    }

    #[test]
    fn barrier_shields_everything_behind_it() {
        let mut grid = grid(10, 1);
        let mut infrastructure = InfrastructureRegistry::new();
        infrastructure.insert(TileCoord::new(CENTER + 2, 0), InfraKind::Barrier);
        propagate(&mut grid, &infrastructure);
        // The barrier's own bank tile floods; nothing beyond it does.
        assert!(is_flood_water(&grid, CENTER + 2, 0));
        for column in CENTER + 3..10 {
            assert_eq!(kind_at(&grid, column, 0), TileKind::Land);
        }
        // The unprotected west side still floods fully.
        assert!(is_flood_water(&grid, 0, 0));
    }

    #[test]
    fn single_vegetation_is_passed_over_without_blocking() {
        let mut grid = grid(10, 1);
        let mut infrastructure = InfrastructureRegistry::new();
        infrastructure.insert(TileCoord::new(6, 0), InfraKind::Vegetation);
        propagate(&mut grid, &infrastructure);
        // The tree's tile stays dry while water continues past it.
        assert_eq!(kind_at(&grid, 6, 0), TileKind::Land);
        assert!(is_flood_water(&grid, 7, 0));
        assert!(is_flood_water(&grid, 9, 0));
    }

    #[test]
    fn two_consecutive_vegetation_tiles_block_the_walk() {
        let mut grid = grid(10, 1);
        let mut infrastructure = InfrastructureRegistry::new();
        infrastructure.insert(TileCoord::new(6, 0), InfraKind::Vegetation);
        infrastructure.insert(TileCoord::new(7, 0), InfraKind::Vegetation);
        propagate(&mut grid, &infrastructure);
        assert!(is_flood_water(&grid, CENTER + 2, 0));
        assert_eq!(kind_at(&grid, 6, 0), TileKind::Land);
        assert_eq!(kind_at(&grid, 7, 0), TileKind::Land);
        assert_eq!(kind_at(&grid, 8, 0), TileKind::Land);
        assert_eq!(kind_at(&grid, 9, 0), TileKind::Land);
    }

    #[test]
    fn separated_vegetation_tiles_do_not_pair() {
        let mut grid = grid(12, 1);
        let mut infrastructure = InfrastructureRegistry::new();
        infrastructure.insert(TileCoord::new(6, 0), InfraKind::Vegetation);
        infrastructure.insert(TileCoord::new(8, 0), InfraKind::Vegetation);
        propagate(&mut grid, &infrastructure);
        assert!(is_flood_water(&grid, 7, 0));
        assert!(is_flood_water(&grid, 9, 0));
        assert!(is_flood_water(&grid, 11, 0));
    }

    #[test]
    fn vertical_bleed_reaches_rows_shielded_from_their_own_bank() {
        let mut grid = grid(12, 4);
        let mut infrastructure = InfrastructureRegistry::new();
        for row in 1..4 {
            infrastructure.insert(TileCoord::new(CENTER + 2, row), InfraKind::Barrier);
        }
        propagate(&mut grid, &infrastructure);
        // Row 0 floods along its own walk.
        assert!(is_flood_water(&grid, 6, 0));
        // Its step at distance one bleeds a single row down.
        assert!(is_flood_water(&grid, 6, 1));
        assert_eq!(kind_at(&grid, 6, 2), TileKind::Land);
        assert_eq!(kind_at(&grid, 6, 3), TileKind::Land);
    }

    #[test]
    fn vertical_bleed_caps_at_four_rows() {
        let mut grid = grid(16, 8);
        let mut infrastructure = InfrastructureRegistry::new();
        for row in 1..8 {
            infrastructure.insert(TileCoord::new(CENTER + 2, row), InfraKind::Barrier);
        }
        propagate(&mut grid, &infrastructure);
        // Bleeds originate in row 0 only, so nothing beyond four rows away
        // floods east of the barriers.
        for row in 5..8 {
            for column in CENTER + 3..16 {
                assert_eq!(
                    kind_at(&grid, column, row),
                    TileKind::Land,
                    "tile ({column}, {row}) lies beyond the vertical reach",
                );
            }
        }
    }

    #[test]
    fn repeated_propagation_is_stable() {
        let mut grid = grid(10, 3);
        let mut infrastructure = InfrastructureRegistry::new();
        infrastructure.insert(TileCoord::new(CENTER + 2, 1), InfraKind::Barrier);
        propagate(&mut grid, &infrastructure);
        let first: Vec<_> = grid.tiles().map(|tile| tile.snapshot()).collect();
        propagate(&mut grid, &infrastructure);
        let second: Vec<_> = grid.tiles().map(|tile| tile.snapshot()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn reset_restores_recorded_terrain() {
        let mut grid = grid(10, 2);
        propagate(&mut grid, &InfrastructureRegistry::new());
        assert!(is_flood_water(&grid, CENTER + 2, 0));
        reset_flooding(&mut grid);
        assert_eq!(kind_at(&grid, CENTER + 2, 0), TileKind::RiverBank);
        assert_eq!(kind_at(&grid, CENTER + 3, 0), TileKind::Land);
        // Permanent river is untouched by the revert.
        assert_eq!(kind_at(&grid, CENTER, 0), TileKind::Water);
        let bank = grid.tile(TileCoord::new(CENTER + 2, 0)).expect("bank");
        assert_eq!(bank.water_level, 0.0);
        assert!(!bank.was_land);
    }
}
