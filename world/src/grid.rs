//! Terrain storage, river generation, and house placement.

use flood_force_core::{GenerationError, TileCoord, TileKind, TileSnapshot};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Columns a house must keep between itself and the nearest river bank.
const HOUSE_BANK_CLEARANCE: u32 = 2;

/// Per-cell mutable simulation state.
#[derive(Clone, Debug)]
pub(crate) struct Tile {
    pub(crate) column: u32,
    pub(crate) row: u32,
    pub(crate) kind: TileKind,
    pub(crate) original_kind: Option<TileKind>,
    pub(crate) water_level: f32,
    pub(crate) elevation: f32,
    pub(crate) has_infrastructure: bool,
    pub(crate) is_house: bool,
    pub(crate) was_land: bool,
}

impl Tile {
    fn new(column: u32, row: u32, kind: TileKind) -> Self {
        Self {
            column,
            row,
            kind,
            original_kind: None,
            water_level: kind.initial_water_level(),
            elevation: kind.elevation(),
            has_infrastructure: false,
            is_house: false,
            was_land: false,
        }
    }

    pub(crate) fn coord(&self) -> TileCoord {
        TileCoord::new(self.column, self.row)
    }

    pub(crate) fn snapshot(&self) -> TileSnapshot {
        TileSnapshot {
            tile: self.coord(),
            kind: self.kind,
            water_level: self.water_level,
            elevation: self.elevation,
            has_infrastructure: self.has_infrastructure,
            is_house: self.is_house,
            was_land: self.was_land,
        }
    }
}

/// Fixed-size tile storage with the static river path threaded through it.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
    river_path: Vec<u32>,
    houses: Vec<TileCoord>,
}

impl Grid {
    /// Lays out terrain with a meandering two-tile-wide river.
    ///
    /// The river center starts near a third of the grid width, shifts by at
    /// most one column per row, and is smoothed with a three-row moving
    /// average. Centers are clamped so both banks always stay on-grid.
    pub(crate) fn generate(
        columns: u32,
        rows: u32,
        rng: &mut ChaCha8Rng,
    ) -> Result<Self, GenerationError> {
        if columns < 4 || rows == 0 {
            return Err(GenerationError::GridTooSmall { columns, rows });
        }

        let (lowest, highest) = meander_bounds(columns);
        let mut center = (columns / 3).clamp(lowest, highest);
        let mut river_path = Vec::with_capacity(rows as usize);
        for _ in 0..rows {
            let shift: i64 = rng.gen_range(-1..=1);
            center = shift_center(center, shift, lowest, highest);
            river_path.push(center);
        }
        smooth_path(&mut river_path, lowest, highest);

        let mut tiles = Vec::with_capacity(columns as usize * rows as usize);
        for row in 0..rows {
            let river_center = river_path[row as usize];
            for column in 0..columns {
                tiles.push(Tile::new(column, row, terrain_at(column, river_center)));
            }
        }

        Ok(Self {
            columns,
            rows,
            tiles,
            river_path,
            houses: Vec::new(),
        })
    }

    /// Builds a grid with a straight river at a fixed center column and no
    /// houses, for deterministic test scenarios.
    #[cfg(any(test, feature = "terrain_scaffolding"))]
    pub(crate) fn with_straight_river(
        columns: u32,
        rows: u32,
        river_center: u32,
    ) -> Result<Self, GenerationError> {
        if columns < 4 || rows == 0 {
            return Err(GenerationError::GridTooSmall { columns, rows });
        }
        let center = river_center.clamp(1, columns - 3);
        let mut tiles = Vec::with_capacity(columns as usize * rows as usize);
        for row in 0..rows {
            for column in 0..columns {
                tiles.push(Tile::new(column, row, terrain_at(column, center)));
            }
        }
        Ok(Self {
            columns,
            rows,
            tiles,
            river_path: vec![center; rows as usize],
            houses: Vec::new(),
        })
    }

    /// Marks a tile as a house without eligibility checks, for tests that
    /// need a house at an exact coordinate.
    #[cfg(any(test, feature = "terrain_scaffolding"))]
    pub(crate) fn add_house(&mut self, tile: TileCoord) {
        match self.tile_mut(tile) {
            Some(slot) => slot.is_house = true,
            None => return,
        }
        self.houses.push(tile);
    }

    pub(crate) const fn columns(&self) -> u32 {
        self.columns
    }

    pub(crate) const fn rows(&self) -> u32 {
        self.rows
    }

    pub(crate) fn river_center(&self, row: u32) -> Option<u32> {
        self.river_path.get(row as usize).copied()
    }

    pub(crate) fn houses(&self) -> &[TileCoord] {
        &self.houses
    }

    pub(crate) fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        self.index(coord).map(|index| &self.tiles[index])
    }

    pub(crate) fn tile_mut(&mut self, coord: TileCoord) -> Option<&mut Tile> {
        self.index(coord).map(move |index| &mut self.tiles[index])
    }

    pub(crate) fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub(crate) fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut()
    }

    /// Returns the orthogonal neighbors that exist on-grid, in
    /// north-east-south-west order.
    pub(crate) fn neighbors(&self, coord: TileCoord) -> Vec<TileCoord> {
        let column = coord.column();
        let row = coord.row();
        let candidates = [
            row.checked_sub(1).map(|north| TileCoord::new(column, north)),
            column
                .checked_add(1)
                .map(|east| TileCoord::new(east, row))
                .filter(|east| east.column() < self.columns),
            row.checked_add(1)
                .map(|south| TileCoord::new(column, south))
                .filter(|south| south.row() < self.rows),
            column.checked_sub(1).map(|west| TileCoord::new(west, row)),
        ];
        candidates.into_iter().flatten().collect()
    }

    /// Selects `count` house sites on land tiles at least two columns from
    /// the nearest bank, guaranteeing one house per river side whenever
    /// both sides have eligible tiles and the count allows it.
    pub(crate) fn place_houses(
        &mut self,
        count: u32,
        rng: &mut ChaCha8Rng,
    ) -> Result<(), GenerationError> {
        let mut left: Vec<TileCoord> = Vec::new();
        let mut right: Vec<TileCoord> = Vec::new();
        for row in 0..self.rows {
            let center = self.river_path[row as usize];
            let left_bank = center.saturating_sub(1);
            let right_bank = center + 2;
            for column in 0..self.columns {
                let coord = TileCoord::new(column, row);
                let eligible = match self.tile(coord) {
                    Some(tile) => tile.kind == TileKind::Land,
                    None => false,
                };
                if !eligible {
                    continue;
                }
                if column + HOUSE_BANK_CLEARANCE <= left_bank {
                    left.push(coord);
                } else if column >= right_bank + HOUSE_BANK_CLEARANCE {
                    right.push(coord);
                }
            }
        }

        let available = (left.len() + right.len()) as u32;
        if count > available {
            return Err(GenerationError::InsufficientHouseSites {
                required: count,
                available,
            });
        }

        left.shuffle(rng);
        right.shuffle(rng);

        let mut chosen: Vec<TileCoord> = Vec::with_capacity(count as usize);
        if count >= 2 && !left.is_empty() && !right.is_empty() {
            chosen.extend(left.pop());
            chosen.extend(right.pop());
        }
        let mut pool: Vec<TileCoord> = left;
        pool.append(&mut right);
        pool.shuffle(rng);
        while (chosen.len() as u32) < count {
            match pool.pop() {
                Some(site) => chosen.push(site),
                None => break,
            }
        }

        for site in &chosen {
            if let Some(tile) = self.tile_mut(*site) {
                tile.is_house = true;
            }
        }
        self.houses = chosen;
        Ok(())
    }

    fn index(&self, coord: TileCoord) -> Option<usize> {
        if coord.column() < self.columns && coord.row() < self.rows {
            let row = usize::try_from(coord.row()).ok()?;
            let column = usize::try_from(coord.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

fn terrain_at(column: u32, river_center: u32) -> TileKind {
    if column == river_center || column == river_center + 1 {
        TileKind::Water
    } else if column + 1 == river_center || column == river_center + 2 {
        TileKind::RiverBank
    } else {
        TileKind::Land
    }
}

/// Central band the meandering river center may occupy. The band never
/// leaves the interior columns that keep both banks on-grid.
fn meander_bounds(columns: u32) -> (u32, u32) {
    let interior_high = columns - 3;
    let lowest = (columns / 4).clamp(1, interior_high);
    let highest = (columns.saturating_mul(3) / 4).clamp(lowest, interior_high);
    (lowest, highest)
}

fn shift_center(center: u32, shift: i64, lowest: u32, highest: u32) -> u32 {
    let shifted = i64::from(center).saturating_add(shift);
    let clamped = shifted.clamp(i64::from(lowest), i64::from(highest));
    clamped as u32
}

/// Three-row moving average that removes sharp jags from the river path.
fn smooth_path(path: &mut [u32], lowest: u32, highest: u32) {
    let raw: Vec<u32> = path.to_vec();
    for (row, center) in path.iter_mut().enumerate() {
        let mut sum: u32 = raw[row];
        let mut samples: u32 = 1;
        if row > 0 {
            sum += raw[row - 1];
            samples += 1;
        }
        if row + 1 < raw.len() {
            sum += raw[row + 1];
            samples += 1;
        }
        *center = (sum / samples).clamp(lowest, highest);
    }
}
