#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Flood Force engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! adapters to react to deterministically. The surrounding presentation
//! layer never touches world internals; it reads snapshots and listens to
//! events.

use serde::{Deserialize, Serialize};

/// Side length of a square tile measured in pixels, used by the coordinate
/// conversions placement adapters rely on.
pub const TILE_SIZE: u32 = 64;

/// Describes the active gameplay phase for a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Planning phase where infrastructure may be placed and removed.
    Planning,
    /// Weather phase where floodwater has propagated and the verdict stands.
    Weather,
}

/// Terrain classification of a single grid tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Dry ground eligible for houses and vegetation.
    Land,
    /// Water, either permanent river or flood-induced.
    Water,
    /// Strip immediately adjacent to the river, eligible for barriers.
    RiverBank,
}

impl TileKind {
    /// Static elevation assigned to freshly generated tiles of this kind.
    #[must_use]
    pub const fn elevation(self) -> f32 {
        match self {
            Self::Land => 1.0,
            Self::Water => 0.0,
            Self::RiverBank => 0.5,
        }
    }

    /// Water level assigned to freshly generated tiles of this kind.
    #[must_use]
    pub const fn initial_water_level(self) -> f32 {
        match self {
            Self::Water => 1.0,
            Self::Land | Self::RiverBank => 0.0,
        }
    }
}

/// Types of protective infrastructure a player may construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InfraKind {
    /// Hard flood stop; placeable on river banks only.
    Barrier,
    /// Soft flood stop requiring two consecutive instances in the flood
    /// path; placeable on land and river banks.
    Vegetation,
}

impl InfraKind {
    /// Resource cost debited when placing this kind of infrastructure.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Barrier => 100,
            Self::Vegetation => 50,
        }
    }

    /// Resource refund credited when removing this kind of infrastructure.
    ///
    /// Half of the original cost, rounded down.
    #[must_use]
    pub const fn refund(self) -> u32 {
        self.cost() / 2
    }

    /// Water level above which this kind starts absorbing damage in the
    /// continuous-flow engine variant. The canonical ladder engine never
    /// consults it; the constant stays on the type so durability tuning has
    /// a single home.
    #[must_use]
    pub const fn protection_threshold(self) -> f32 {
        match self {
            Self::Barrier => 0.8,
            Self::Vegetation => 0.4,
        }
    }

    /// Reports whether this kind of infrastructure may stand on the given
    /// terrain. House occupancy and flooding are validated separately by
    /// the world.
    #[must_use]
    pub const fn placeable_on(self, terrain: TileKind) -> bool {
        match self {
            Self::Barrier => matches!(terrain, TileKind::RiverBank),
            Self::Vegetation => matches!(terrain, TileKind::Land | TileKind::RiverBank),
        }
    }
}

/// Terminal result of a weather phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Every house stayed dry.
    Victory,
    /// At least one house flooded.
    Defeat,
}

/// Location of a single grid tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: u32,
    row: u32,
}

impl TileCoord {
    /// Creates a new grid tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Converts the tile coordinate to the pixel position of its top-left
    /// corner.
    #[must_use]
    pub const fn to_pixel(self) -> (u32, u32) {
        (self.column * TILE_SIZE, self.row * TILE_SIZE)
    }

    /// Converts a pixel position to the coordinate of the tile containing
    /// it.
    #[must_use]
    pub const fn from_pixel(pixel_x: u32, pixel_y: u32) -> Self {
        Self::new(pixel_x / TILE_SIZE, pixel_y / TILE_SIZE)
    }
}

/// Per-session tunables supplied by the surrounding difficulty and menu
/// logic. Threaded explicitly through [`Command::ConfigureLevel`]; the
/// engine holds no global mutable settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Resource budget available at the start of the planning phase.
    pub starting_resources: u32,
    /// Number of houses the generator must place on land tiles.
    pub house_count: u32,
    /// Seed driving river meander and house placement. Equal seeds yield
    /// identical terrain.
    pub seed: u64,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Discards the current session and generates a fresh level.
    ConfigureLevel {
        /// Number of tile columns laid out in the grid.
        columns: u32,
        /// Number of tile rows laid out in the grid.
        rows: u32,
        /// Session tunables for the new level.
        config: LevelConfig,
    },
    /// Requests placement of infrastructure on the provided tile.
    PlaceInfrastructure {
        /// Tile targeted for construction.
        tile: TileCoord,
        /// Kind of infrastructure to construct.
        kind: InfraKind,
    },
    /// Requests removal of existing infrastructure from the provided tile.
    RemoveInfrastructure {
        /// Tile targeted for demolition.
        tile: TileCoord,
    },
    /// Ends the planning phase and runs the flood propagation pass.
    EnterWeatherPhase,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a fresh level was generated.
    LevelConfigured {
        /// Number of tile columns in the generated grid.
        columns: u32,
        /// Number of tile rows in the generated grid.
        rows: u32,
        /// Number of houses placed by the generator.
        houses: u32,
    },
    /// Reports that level generation failed and the previous session, if
    /// any, was left untouched.
    LevelGenerationFailed {
        /// Specific reason generation failed.
        reason: GenerationError,
    },
    /// Confirms that infrastructure was constructed.
    InfrastructurePlaced {
        /// Tile now carrying the infrastructure.
        tile: TileCoord,
        /// Kind of infrastructure constructed.
        kind: InfraKind,
        /// Resources debited for the construction.
        cost: u32,
        /// Budget remaining after the debit.
        remaining: u32,
    },
    /// Reports that a placement request was rejected.
    PlacementRejected {
        /// Tile provided in the placement request.
        tile: TileCoord,
        /// Kind of infrastructure requested.
        kind: InfraKind,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that infrastructure was demolished.
    InfrastructureRemoved {
        /// Tile the infrastructure previously occupied.
        tile: TileCoord,
        /// Kind of infrastructure demolished.
        kind: InfraKind,
        /// Resources credited back for the demolition.
        refund: u32,
        /// Budget remaining after the credit.
        remaining: u32,
    },
    /// Reports that a removal request was rejected.
    RemovalRejected {
        /// Tile provided in the removal request.
        tile: TileCoord,
        /// Specific reason the removal failed.
        reason: RemovalError,
    },
    /// Announces that the session entered a new phase.
    PhaseChanged {
        /// Phase that became active after processing commands.
        phase: Phase,
    },
    /// Reports the evaluated outcome after flood propagation completed.
    WeatherResolved {
        /// Summary of the flood damage and the terminal verdict.
        outcome: OutcomeSummary,
    },
}

/// Reasons an infrastructure placement request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The session is not in the planning phase.
    InvalidPhase,
    /// The requested tile lies beyond the grid bounds.
    OutOfBounds,
    /// The requested tile carries a house.
    HouseTile,
    /// The requested tile already carries infrastructure.
    Occupied,
    /// The terrain does not satisfy the kind's placement rule.
    TerrainMismatch,
    /// The remaining budget does not cover the construction cost.
    InsufficientResources,
}

/// Reasons an infrastructure removal request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalError {
    /// The session is not in the planning phase.
    InvalidPhase,
    /// The requested tile lies beyond the grid bounds.
    OutOfBounds,
    /// No infrastructure stands on the requested tile.
    Vacant,
}

/// Reasons level generation may fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenerationError {
    /// The requested dimensions cannot hold a river with banks on both
    /// sides.
    GridTooSmall {
        /// Columns requested by the caller.
        columns: u32,
        /// Rows requested by the caller.
        rows: u32,
    },
    /// Fewer eligible land tiles exist than houses requested.
    InsufficientHouseSites {
        /// Houses requested by the level configuration.
        required: u32,
        /// Eligible land tiles actually available.
        available: u32,
    },
}

/// Immutable representation of a single tile's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileSnapshot {
    /// Coordinate of the captured tile.
    pub tile: TileCoord,
    /// Terrain classification at capture time.
    pub kind: TileKind,
    /// Water level in `[0.0, 1.0]` at capture time.
    pub water_level: f32,
    /// Static elevation assigned at generation time.
    pub elevation: f32,
    /// Indicates whether infrastructure currently occupies the tile.
    pub has_infrastructure: bool,
    /// Indicates whether the tile carries a house.
    pub is_house: bool,
    /// Indicates whether the tile became water only through flooding.
    pub was_land: bool,
}

/// Per-house flooding report produced by the outcome evaluator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HouseReport {
    /// Tile the house stands on.
    pub tile: TileCoord,
    /// Indicates whether floodwater reached the house.
    pub flooded: bool,
}

/// Summary of the flood damage evaluated after a weather phase.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    /// Indicates whether at least one house flooded.
    pub houses_flooded: bool,
    /// Share of the original land footprint now under floodwater, in
    /// percent.
    pub flood_percentage: f32,
    /// Terminal verdict, absent until a weather phase has been evaluated.
    pub verdict: Option<Verdict>,
}
