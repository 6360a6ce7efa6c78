#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs one flood session end to end.
//!
//! The adapter generates a level, routes the requested placements through
//! the planner system, triggers the weather phase, and prints the grid
//! before and after alongside the outcome.

use anyhow::{bail, Context};
use clap::Parser;
use flood_force_core::{Command, Event, InfraKind, LevelConfig, TileCoord, Verdict};
use flood_force_system_planner::{PlacementPreview, Planner, PlannerInput};
use flood_force_world::{apply, query, World};

#[derive(Debug, Parser)]
#[command(name = "flood-force", about = "Plan defenses, then let the river rise")]
struct Args {
    /// Number of tile columns in the generated grid.
    #[arg(long, default_value_t = 16)]
    columns: u32,
    /// Number of tile rows in the generated grid.
    #[arg(long, default_value_t = 10)]
    rows: u32,
    /// Seed driving river meander and house placement.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Number of houses the generator places on land tiles.
    #[arg(long, default_value_t = 3)]
    houses: u32,
    /// Resource budget available during the planning phase.
    #[arg(long, default_value_t = 1_000)]
    resources: u32,
    /// Bank tile to protect with a barrier, as `column,row`. Repeatable.
    #[arg(long, value_parser = parse_tile)]
    barrier: Vec<TileCoord>,
    /// Tile to plant vegetation on, as `column,row`. Repeatable.
    #[arg(long, value_parser = parse_tile)]
    vegetation: Vec<TileCoord>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut world = World::new();
    let mut planner = Planner::default();

    let mut events = Vec::new();
    apply(
        &mut world,
        Command::ConfigureLevel {
            columns: args.columns,
            rows: args.rows,
            config: LevelConfig {
                starting_resources: args.resources,
                house_count: args.houses,
                seed: args.seed,
            },
        },
        &mut events,
    );
    if let Some(Event::LevelGenerationFailed { reason }) = events.first() {
        bail!("level generation failed: {reason:?}");
    }

    let placements = args
        .barrier
        .iter()
        .map(|tile| (InfraKind::Barrier, *tile))
        .chain(
            args.vegetation
                .iter()
                .map(|tile| (InfraKind::Vegetation, *tile)),
        );
    for (kind, tile) in placements {
        plan(&mut planner, &mut world, &mut events, kind, tile);
    }

    println!("planning complete, {} resources left", query::resources(&world));
    print_grid(&world);

    let mut commands = Vec::new();
    planner.handle(
        &events,
        None,
        PlannerInput {
            start_weather: true,
            ..PlannerInput::default()
        },
        |tile| query::infrastructure_at(&world, tile).map(|snapshot| snapshot.kind),
        &mut commands,
    );
    events.clear();
    for command in commands {
        apply(&mut world, command, &mut events);
    }

    println!("\nthe river rises");
    print_grid(&world);

    let outcome = query::outcome(&world).context("weather phase left no outcome")?;
    println!(
        "\n{:.1}% of the land flooded",
        outcome.flood_percentage
    );
    match outcome.verdict {
        Some(Verdict::Victory) => println!("every house stayed dry: victory"),
        Some(Verdict::Defeat) => println!("floodwater reached a house: defeat"),
        None => bail!("weather phase left no verdict"),
    }
    Ok(())
}

/// Routes one placement through the planner and reports rejections.
fn plan(
    planner: &mut Planner,
    world: &mut World,
    events: &mut Vec<Event>,
    kind: InfraKind,
    tile: TileCoord,
) {
    let mut commands = Vec::new();
    planner.handle(
        events,
        Some(PlacementPreview::new(kind, tile, true)),
        PlannerInput {
            confirm_action: true,
            ..PlannerInput::default()
        },
        |hovered| query::infrastructure_at(world, hovered).map(|snapshot| snapshot.kind),
        &mut commands,
    );
    events.clear();
    for command in commands {
        apply(world, command, events);
    }
    for event in events.iter() {
        if let Event::PlacementRejected { tile, kind, reason } = event {
            println!("cannot place {kind:?} at {},{}: {reason:?}", tile.column(), tile.row());
        }
    }
}

fn parse_tile(raw: &str) -> Result<TileCoord, String> {
    let (column, row) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected `column,row`, got `{raw}`"))?;
    let column: u32 = column
        .trim()
        .parse()
        .map_err(|_| format!("invalid column in `{raw}`"))?;
    let row: u32 = row
        .trim()
        .parse()
        .map_err(|_| format!("invalid row in `{raw}`"))?;
    Ok(TileCoord::new(column, row))
}

fn print_grid(world: &World) {
    let (columns, rows) = query::dimensions(world);
    for row in 0..rows {
        let mut line = String::with_capacity(columns as usize);
        for column in 0..columns {
            line.push(glyph(world, TileCoord::new(column, row)));
        }
        println!("{line}");
    }
}

/// One character per tile: houses and infrastructure take precedence over
/// terrain, and flood water is distinguished from the permanent river.
fn glyph(world: &World, coord: TileCoord) -> char {
    use flood_force_core::TileKind;

    let Some(tile) = query::tile(world, coord) else {
        return ' ';
    };
    if tile.is_house {
        return if tile.was_land { 'X' } else { 'H' };
    }
    if let Some(infrastructure) = query::infrastructure_at(world, coord) {
        return match infrastructure.kind {
            InfraKind::Barrier => 'B',
            InfraKind::Vegetation => 'T',
        };
    }
    match tile.kind {
        TileKind::Water if tile.was_land => '*',
        TileKind::Water => '~',
        TileKind::RiverBank => '=',
        TileKind::Land => '.',
    }
}

#[cfg(test)]
mod tests {
    use super::{glyph, parse_tile};
    use flood_force_core::{Command, LevelConfig, TileCoord};
    use flood_force_world::{apply, World};

    #[test]
    fn tile_arguments_parse_as_column_row_pairs() {
        assert_eq!(parse_tile("5,2"), Ok(TileCoord::new(5, 2)));
        assert_eq!(parse_tile(" 7 , 0 "), Ok(TileCoord::new(7, 0)));
        assert!(parse_tile("5").is_err());
        assert!(parse_tile("a,b").is_err());
    }

    #[test]
    fn glyphs_distinguish_river_banks_and_land() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureLevel {
                columns: 12,
                rows: 6,
                config: LevelConfig {
                    starting_resources: 500,
                    house_count: 0,
                    seed: 1,
                },
            },
            &mut events,
        );
        let center = flood_force_world::query::river_center(&world, 0).expect("center");
        assert_eq!(glyph(&world, TileCoord::new(center, 0)), '~');
        assert_eq!(glyph(&world, TileCoord::new(center + 2, 0)), '=');
        assert_eq!(glyph(&world, TileCoord::new(40, 40)), ' ');
    }
}
