#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for the flood simulation.
//!
//! The [`World`] owns terrain, infrastructure, the resource budget, and the
//! phase machine. All mutation flows through [`apply`], which executes one
//! [`Command`] and pushes the resulting [`Event`]s for systems and adapters
//! to consume. Reads go through the [`query`] module, which only ever hands
//! out snapshots.

mod flood;
mod grid;
mod infrastructure;
mod outcome;

use flood_force_core::{
    Command, Event, GenerationError, InfraKind, LevelConfig, Phase, PlacementError, RemovalError,
    TileCoord,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::grid::Grid;
use crate::infrastructure::InfrastructureRegistry;
use crate::outcome::Evaluation;

/// Grid width used when a world is created without an explicit level.
const DEFAULT_COLUMNS: u32 = 10;
/// Grid height used when a world is created without an explicit level.
const DEFAULT_ROWS: u32 = 8;
/// Session tunables used when a world is created without an explicit level.
const DEFAULT_CONFIG: LevelConfig = LevelConfig {
    starting_resources: 1_000,
    house_count: 3,
    seed: 0,
};

/// Authoritative simulation state for one session.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    infrastructure: InfrastructureRegistry,
    config: LevelConfig,
    resources: u32,
    phase: Phase,
    evaluation: Option<Evaluation>,
}

impl World {
    /// Creates a world with the default level already generated.
    #[must_use]
    pub fn new() -> Self {
        let grid = build_level(DEFAULT_COLUMNS, DEFAULT_ROWS, DEFAULT_CONFIG)
            .expect("default level dimensions are statically valid");
        Self::with_grid(grid, DEFAULT_CONFIG)
    }

    /// Creates a world over a straight-river grid without houses, for
    /// deterministic scenarios in tests and tooling.
    #[cfg(any(test, feature = "terrain_scaffolding"))]
    pub fn with_straight_river(
        columns: u32,
        rows: u32,
        river_center: u32,
        config: LevelConfig,
    ) -> Result<Self, GenerationError> {
        let grid = Grid::with_straight_river(columns, rows, river_center)?;
        Ok(Self::with_grid(grid, config))
    }

    /// Marks a tile as a house without eligibility checks.
    #[cfg(any(test, feature = "terrain_scaffolding"))]
    pub fn add_house(&mut self, tile: TileCoord) {
        self.grid.add_house(tile);
    }

    fn with_grid(grid: Grid, config: LevelConfig) -> Self {
        Self {
            grid,
            infrastructure: InfrastructureRegistry::new(),
            config,
            resources: config.starting_resources,
            phase: Phase::Planning,
            evaluation: None,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Executes one command against the world and emits the resulting events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureLevel {
            columns,
            rows,
            config,
        } => configure_level(world, columns, rows, config, out_events),
        Command::PlaceInfrastructure { tile, kind } => {
            place_infrastructure(world, tile, kind, out_events);
        }
        Command::RemoveInfrastructure { tile } => remove_infrastructure(world, tile, out_events),
        Command::EnterWeatherPhase => enter_weather_phase(world, out_events),
    }
}

fn build_level(columns: u32, rows: u32, config: LevelConfig) -> Result<Grid, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut grid = Grid::generate(columns, rows, &mut rng)?;
    grid.place_houses(config.house_count, &mut rng)?;
    Ok(grid)
}

fn configure_level(
    world: &mut World,
    columns: u32,
    rows: u32,
    config: LevelConfig,
    out_events: &mut Vec<Event>,
) {
    // The new level is built in full before anything is committed, so a
    // failed generation leaves the running session untouched.
    match build_level(columns, rows, config) {
        Ok(grid) => {
            let houses = grid.houses().len() as u32;
            *world = World::with_grid(grid, config);
            out_events.push(Event::LevelConfigured {
                columns,
                rows,
                houses,
            });
        }
        Err(reason) => out_events.push(Event::LevelGenerationFailed { reason }),
    }
}

fn place_infrastructure(
    world: &mut World,
    tile: TileCoord,
    kind: InfraKind,
    out_events: &mut Vec<Event>,
) {
    if world.phase != Phase::Planning {
        out_events.push(Event::PlacementRejected {
            tile,
            kind,
            reason: PlacementError::InvalidPhase,
        });
        return;
    }
    if let Err(reason) =
        InfrastructureRegistry::validate_placement(&world.grid, tile, kind, world.resources)
    {
        out_events.push(Event::PlacementRejected { tile, kind, reason });
        return;
    }

    world.infrastructure.insert(tile, kind);
    if let Some(slot) = world.grid.tile_mut(tile) {
        slot.has_infrastructure = true;
    }
    let cost = kind.cost();
    world.resources -= cost;
    out_events.push(Event::InfrastructurePlaced {
        tile,
        kind,
        cost,
        remaining: world.resources,
    });
}

fn remove_infrastructure(world: &mut World, tile: TileCoord, out_events: &mut Vec<Event>) {
    if world.phase != Phase::Planning {
        out_events.push(Event::RemovalRejected {
            tile,
            reason: RemovalError::InvalidPhase,
        });
        return;
    }
    if world.grid.tile(tile).is_none() {
        out_events.push(Event::RemovalRejected {
            tile,
            reason: RemovalError::OutOfBounds,
        });
        return;
    }
    let Some(entry) = world.infrastructure.remove(tile) else {
        out_events.push(Event::RemovalRejected {
            tile,
            reason: RemovalError::Vacant,
        });
        return;
    };

    if let Some(slot) = world.grid.tile_mut(tile) {
        slot.has_infrastructure = false;
    }
    let refund = entry.kind.refund();
    world.resources += refund;
    out_events.push(Event::InfrastructureRemoved {
        tile,
        kind: entry.kind,
        refund,
        remaining: world.resources,
    });
}

fn enter_weather_phase(world: &mut World, out_events: &mut Vec<Event>) {
    // Re-entering the weather phase is a no-op; the frozen evaluation
    // keeps serving queries.
    if world.phase == Phase::Weather {
        return;
    }

    flood::propagate(&mut world.grid, &world.infrastructure);
    let evaluation = outcome::evaluate(&world.grid);
    let summary = evaluation.summary;
    world.evaluation = Some(evaluation);
    world.phase = Phase::Weather;

    out_events.push(Event::PhaseChanged {
        phase: Phase::Weather,
    });
    out_events.push(Event::WeatherResolved { outcome: summary });
}

/// Read-only accessors over the authoritative state. Everything returned is
/// a snapshot; callers never hold references into the world.
pub mod query {
    use flood_force_core::{
        HouseReport, InfraKind, LevelConfig, OutcomeSummary, Phase, TileCoord, TileSnapshot,
    };

    use super::World;

    /// Snapshot of one placed piece of infrastructure.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct InfraSnapshot {
        /// Kind of the placed infrastructure.
        pub kind: InfraKind,
        /// Remaining durability points.
        pub durability: u32,
        /// Protective effectiveness derived from remaining durability.
        pub efficiency: f32,
    }

    /// Currently active gameplay phase.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// Remaining resource budget.
    #[must_use]
    pub fn resources(world: &World) -> u32 {
        world.resources
    }

    /// Session tunables the current level was generated from.
    #[must_use]
    pub fn level_config(world: &World) -> LevelConfig {
        world.config
    }

    /// Grid dimensions as `(columns, rows)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.grid.columns(), world.grid.rows())
    }

    /// River center column for the given row, when the row exists.
    #[must_use]
    pub fn river_center(world: &World, row: u32) -> Option<u32> {
        world.grid.river_center(row)
    }

    /// Snapshot of a single tile, when the coordinate is on-grid.
    #[must_use]
    pub fn tile(world: &World, coord: TileCoord) -> Option<TileSnapshot> {
        world.grid.tile(coord).map(|tile| tile.snapshot())
    }

    /// Snapshots of every tile in row-major order.
    #[must_use]
    pub fn tiles(world: &World) -> Vec<TileSnapshot> {
        world.grid.tiles().map(|tile| tile.snapshot()).collect()
    }

    /// Orthogonal on-grid neighbors of a coordinate, in
    /// north-east-south-west order.
    #[must_use]
    pub fn neighbors(world: &World, coord: TileCoord) -> Vec<TileCoord> {
        world.grid.neighbors(coord)
    }

    /// Coordinates of every house placed by the generator.
    #[must_use]
    pub fn houses(world: &World) -> Vec<TileCoord> {
        world.grid.houses().to_vec()
    }

    /// Snapshot of the infrastructure standing on a tile, if any.
    #[must_use]
    pub fn infrastructure_at(world: &World, coord: TileCoord) -> Option<InfraSnapshot> {
        world.infrastructure.get(coord).map(|entry| InfraSnapshot {
            kind: entry.kind,
            durability: entry.durability,
            efficiency: entry.efficiency(),
        })
    }

    /// Outcome of the last weather phase, absent while planning.
    #[must_use]
    pub fn outcome(world: &World) -> Option<OutcomeSummary> {
        world
            .evaluation
            .as_ref()
            .map(|evaluation| evaluation.summary)
    }

    /// Per-house flooding reports from the last weather phase, absent while
    /// planning.
    #[must_use]
    pub fn house_reports(world: &World) -> Option<Vec<HouseReport>> {
        world
            .evaluation
            .as_ref()
            .map(|evaluation| evaluation.houses.clone())
    }
}
