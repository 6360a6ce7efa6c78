//! Authoritative infrastructure state keyed by tile coordinate.

use std::collections::BTreeMap;

use flood_force_core::{InfraKind, PlacementError, TileCoord};

use crate::grid::Grid;

/// Initial durability assigned to freshly constructed infrastructure.
const FULL_DURABILITY: u32 = 100;

/// A placed barrier or vegetation entity bound to exactly one tile.
#[derive(Clone, Debug)]
pub(crate) struct Infrastructure {
    pub(crate) kind: InfraKind,
    pub(crate) durability: u32,
}

impl Infrastructure {
    fn new(kind: InfraKind) -> Self {
        Self {
            kind,
            durability: FULL_DURABILITY,
        }
    }

    /// Protective effectiveness scaling linearly with remaining durability.
    pub(crate) fn efficiency(&self) -> f32 {
        self.durability as f32 / FULL_DURABILITY as f32
    }
}

/// Registry that stores infrastructure in a direct coordinate-keyed map so
/// the flood engine resolves protection in O(1) per tile.
#[derive(Debug, Default)]
pub(crate) struct InfrastructureRegistry {
    entries: BTreeMap<TileCoord, Infrastructure>,
}

impl InfrastructureRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Validates a placement request against terrain, occupancy, and the
    /// remaining budget. Nothing mutates on failure.
    pub(crate) fn validate_placement(
        grid: &Grid,
        tile: TileCoord,
        kind: InfraKind,
        resources: u32,
    ) -> Result<(), PlacementError> {
        let Some(target) = grid.tile(tile) else {
            return Err(PlacementError::OutOfBounds);
        };
        if target.has_infrastructure {
            return Err(PlacementError::Occupied);
        }
        if target.is_house {
            return Err(PlacementError::HouseTile);
        }
        if !kind.placeable_on(target.kind) {
            return Err(PlacementError::TerrainMismatch);
        }
        if resources < kind.cost() {
            return Err(PlacementError::InsufficientResources);
        }
        Ok(())
    }

    pub(crate) fn insert(&mut self, tile: TileCoord, kind: InfraKind) {
        let _ = self.entries.insert(tile, Infrastructure::new(kind));
    }

    pub(crate) fn remove(&mut self, tile: TileCoord) -> Option<Infrastructure> {
        self.entries.remove(&tile)
    }

    pub(crate) fn get(&self, tile: TileCoord) -> Option<&Infrastructure> {
        self.entries.get(&tile)
    }

    pub(crate) fn kind_at(&self, tile: TileCoord) -> Option<InfraKind> {
        self.entries.get(&tile).map(|entry| entry.kind)
    }
}
