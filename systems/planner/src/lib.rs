#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure planning-phase system responsible for emitting infrastructure
//! placement and removal commands.

use flood_force_core::{Command, Event, InfraKind, Phase, TileCoord};

/// Declarative placement preview describing a potential construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementPreview {
    /// Kind of infrastructure proposed for placement.
    pub kind: InfraKind,
    /// Tile the proposed infrastructure would occupy.
    pub tile: TileCoord,
    /// Indicates whether the preview represents a valid placement location.
    pub placeable: bool,
}

impl PlacementPreview {
    /// Creates a new placement preview descriptor.
    #[must_use]
    pub const fn new(kind: InfraKind, tile: TileCoord, placeable: bool) -> Self {
        Self {
            kind,
            tile,
            placeable,
        }
    }
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlannerInput {
    /// Indicates whether the player confirmed a placement on this frame.
    pub confirm_action: bool,
    /// Indicates whether the player requested removal on this frame.
    pub remove_action: bool,
    /// Indicates whether the player ended the planning phase on this frame.
    pub start_weather: bool,
    /// Tile currently hovered by the cursor.
    pub cursor_tile: Option<TileCoord>,
}

impl Default for PlannerInput {
    fn default() -> Self {
        Self {
            confirm_action: false,
            remove_action: false,
            start_weather: false,
            cursor_tile: None,
        }
    }
}

/// Planning-phase system that translates preview + input into commands.
#[derive(Debug, Clone)]
pub struct Planner {
    phase: Phase,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

impl Planner {
    /// Creates a new planner system instance. Sessions begin in the
    /// planning phase, so the planner starts active.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: Phase::Planning,
        }
    }

    /// Consumes world events and adapter-derived input to emit planning
    /// commands.
    ///
    /// The `infrastructure_at` closure should mirror the semantics of the
    /// world's `query::infrastructure_at` helper so the system can identify
    /// the hovered infrastructure.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        preview: Option<PlacementPreview>,
        input: PlannerInput,
        mut infrastructure_at: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(TileCoord) -> Option<InfraKind>,
    {
        for event in events {
            if let Event::PhaseChanged { phase } = event {
                self.phase = *phase;
            }
        }

        if self.phase != Phase::Planning {
            return;
        }

        if input.confirm_action {
            if let Some(preview) = preview {
                if preview.placeable {
                    out.push(Command::PlaceInfrastructure {
                        tile: preview.tile,
                        kind: preview.kind,
                    });
                }
            }
        }

        if input.remove_action {
            if let Some(tile) = input.cursor_tile {
                if infrastructure_at(tile).is_some() {
                    out.push(Command::RemoveInfrastructure { tile });
                }
            }
        }

        if input.start_weather {
            out.push(Command::EnterWeatherPhase);
        }
    }
}
