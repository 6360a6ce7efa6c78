//! Outcome evaluation after a flood propagation pass.

use flood_force_core::{HouseReport, OutcomeSummary, TileKind, Verdict};

use crate::grid::Grid;

/// Frozen result of a weather phase, computed once on entry and served
/// unchanged to queries afterwards.
#[derive(Clone, Debug)]
pub(crate) struct Evaluation {
    pub(crate) summary: OutcomeSummary,
    pub(crate) houses: Vec<HouseReport>,
}

/// Scans the flooded grid once and derives the verdict.
///
/// The flood percentage relates flooded tiles to the original land
/// footprint, so the permanent river never dilutes the figure. The verdict
/// itself follows the houses alone: one wet house loses the session.
pub(crate) fn evaluate(grid: &Grid) -> Evaluation {
    let mut flooded: u32 = 0;
    let mut dry_land: u32 = 0;
    for tile in grid.tiles() {
        if tile.kind == TileKind::Water && tile.was_land {
            flooded += 1;
        } else if tile.kind == TileKind::Land {
            dry_land += 1;
        }
    }

    let footprint = flooded + dry_land;
    let flood_percentage = if footprint == 0 {
        0.0
    } else {
        flooded as f32 / footprint as f32 * 100.0
    };

    let houses: Vec<HouseReport> = grid
        .houses()
        .iter()
        .map(|house| HouseReport {
            tile: *house,
            flooded: grid
                .tile(*house)
                .map_or(false, |tile| tile.kind == TileKind::Water && tile.was_land),
        })
        .collect();

    let houses_flooded = houses.iter().any(|report| report.flooded);
    let verdict = if houses_flooded {
        Verdict::Defeat
    } else {
        Verdict::Victory
    };

    Evaluation {
        summary: OutcomeSummary {
            houses_flooded,
            flood_percentage,
            verdict: Some(verdict),
        },
        houses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flood;
    use crate::infrastructure::InfrastructureRegistry;
    use flood_force_core::{InfraKind, TileCoord};

    #[test]
    fn dry_grid_reports_victory_and_zero_percent() {
        let mut grid = Grid::with_straight_river(10, 4, 3).expect("grid");
        grid.add_house(TileCoord::new(8, 1));
        let evaluation = evaluate(&grid);
        assert_eq!(evaluation.summary.flood_percentage, 0.0);
        assert!(!evaluation.summary.houses_flooded);
        assert_eq!(evaluation.summary.verdict, Some(Verdict::Victory));
        assert_eq!(
            evaluation.houses,
            vec![HouseReport {
                tile: TileCoord::new(8, 1),
                flooded: false,
            }],
        );
    }

    #[test]
    fn flooded_house_turns_the_verdict() {
        let mut grid = Grid::with_straight_river(10, 1, 3).expect("grid");
        grid.add_house(TileCoord::new(8, 0));
        flood::propagate(&mut grid, &InfrastructureRegistry::new());
        let evaluation = evaluate(&grid);
        assert!(evaluation.summary.houses_flooded);
        assert_eq!(evaluation.summary.verdict, Some(Verdict::Defeat));
        assert!(evaluation.houses[0].flooded);
    }

    #[test]
    fn percentage_covers_the_original_land_footprint() {
        let mut grid = Grid::with_straight_river(10, 1, 3).expect("grid");
        let mut infrastructure = InfrastructureRegistry::new();
        infrastructure.insert(TileCoord::new(5, 0), InfraKind::Barrier);
        flood::propagate(&mut grid, &infrastructure);
        // West side floods fully (columns 0..=2), the east bank floods up to
        // the barrier tile (column 5); columns 6..=9 stay dry land.
        let evaluation = evaluate(&grid);
        let expected = 4.0 / 8.0 * 100.0;
        assert!(
            (evaluation.summary.flood_percentage - expected).abs() < f32::EPSILON,
            "got {}",
            evaluation.summary.flood_percentage,
        );
        assert_eq!(evaluation.summary.verdict, Some(Verdict::Victory));
    }

    #[test]
    fn footprint_of_zero_yields_zero_percent() {
        // Four columns hold nothing but river and banks once both banks
        // flood; with no land at all the ratio degrades to zero.
        let mut grid = Grid::with_straight_river(4, 1, 1).expect("grid");
        flood::propagate(&mut grid, &InfrastructureRegistry::new());
        let evaluation = evaluate(&grid);
        assert!(evaluation.summary.flood_percentage > 0.0);

        let dry = Grid::with_straight_river(4, 1, 1).expect("grid");
        let evaluation = evaluate(&dry);
        assert_eq!(evaluation.summary.flood_percentage, 0.0);
    }
}
