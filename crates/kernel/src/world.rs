use glam::Vec2;
use serde::{Deserialize, Serialize};
use tileworld_common::{Rect, TileCoord};

use crate::config::{CustomWorld, TilePercentages, WorldConfig};
use crate::error::WorldError;
use crate::rng::SeededRng;
use crate::tile::{Tile, TileKind};

/// Edge length of a tile in world (pixel) units.
pub const TILE_SIZE: u32 = 16;

/// World extent in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Number of tiles of each kind in a grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileCounts {
    pub grass: usize,
    pub water: usize,
    pub wall: usize,
    pub cave: usize,
}

impl TileCounts {
    pub fn get(&self, kind: TileKind) -> usize {
        match kind {
            TileKind::Grass => self.grass,
            TileKind::Water => self.water,
            TileKind::Wall => self.wall,
            TileKind::Cave => self.cave,
        }
    }

    fn bump(&mut self, kind: TileKind) {
        match kind {
            TileKind::Grass => self.grass += 1,
            TileKind::Water => self.water += 1,
            TileKind::Wall => self.wall += 1,
            TileKind::Cave => self.cave += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.grass + self.water + self.wall + self.cave
    }

    /// Observed share of each kind, in percent.
    pub fn percentages(&self) -> TilePercentages {
        let total = self.total().max(1) as f64;
        let pct = |n: usize| n as f64 * 100.0 / total;
        TilePercentages {
            grass: pct(self.grass),
            water: pct(self.water),
            wall: pct(self.wall),
            cave: pct(self.cave),
        }
    }
}

/// The authoritative tile grid.
///
/// Tiles are stored dense and row-major (`index = y * tiles_x + x`), each at
/// its pixel-space origin. The grid is built whole, either generated from a
/// seed or ingested from an editor document, and is read-only afterwards
/// except for a full [`WorldGrid::load_custom`] reload.
///
/// Queries take world (pixel) coordinates. Anything outside the grid answers
/// `None` or a passable default.
#[derive(Debug, Clone)]
pub struct WorldGrid {
    width: u32,
    height: u32,
    tile_size: u32,
    tiles_x: u32,
    tiles_y: u32,
    tiles: Vec<Tile>,
    percentages: TilePercentages,
    rng: SeededRng,
}

impl WorldGrid {
    /// Generate a world from a config. The config is not validated here.
    pub fn generate(config: &WorldConfig) -> Self {
        let (width, height) = config.world_size.dimensions();
        Self::generate_sized(width, height, &config.seed, config.tile_percentages)
    }

    /// Generate a world of explicit pixel dimensions.
    pub fn generate_sized(
        width: u32,
        height: u32,
        seed: &str,
        percentages: TilePercentages,
    ) -> Self {
        let mut grid = Self {
            width,
            height,
            tile_size: TILE_SIZE,
            tiles_x: width / TILE_SIZE,
            tiles_y: height / TILE_SIZE,
            tiles: Vec::new(),
            percentages,
            rng: SeededRng::from_seed(seed),
        };
        let _span = tracing::info_span!("generate_world", seed, width, height).entered();
        grid.fill_from_rng();
        tracing::info!(
            tiles = grid.tiles.len(),
            walls = grid.kind_counts().wall,
            "world generated"
        );
        grid
    }

    /// Draw two samples per cell (kind, then texture variant), visiting
    /// columns outer and rows inner. The visit order is part of the
    /// determinism contract; storage stays row-major.
    fn fill_from_rng(&mut self) {
        let (tx, ty) = (self.tiles_x, self.tiles_y);
        let placeholder = Tile::new(TileKind::Grass, Vec2::ZERO, 0.0);
        self.tiles = vec![placeholder; (tx * ty) as usize];

        for x in 0..tx {
            for y in 0..ty {
                let kind = self.percentages.classify(self.rng.next_f64());
                let variant = self.rng.next_f64();
                let coord = TileCoord::new(x as i32, y as i32);
                self.tiles[(y * tx + x) as usize] =
                    Tile::new(kind, coord.origin(self.tile_size as f32), variant);
            }
        }
    }

    /// Build a grid from an editor document.
    pub fn from_custom(data: &CustomWorld) -> Result<Self, WorldError> {
        let mut grid = Self {
            width: 0,
            height: 0,
            tile_size: TILE_SIZE,
            tiles_x: 0,
            tiles_y: 0,
            tiles: Vec::new(),
            percentages: TilePercentages::default(),
            rng: SeededRng::from_seed(""),
        };
        grid.load_custom(data)?;
        Ok(grid)
    }

    /// Replace the whole grid with an editor document.
    ///
    /// Positions convert from tile units to pixels. Cells the document leaves
    /// out are grass; a later entry for the same cell wins. Texture variants
    /// are drawn fresh from a generator seeded with the world's name. On error
    /// the current grid is left untouched.
    pub fn load_custom(&mut self, data: &CustomWorld) -> Result<(), WorldError> {
        data.validate()?;
        let name = data.name().unwrap_or("");
        let _span = tracing::info_span!("load_custom_world", name).entered();

        let (tx, ty) = (data.world_width, data.world_height);
        let ts = self.tile_size as f32;
        let mut tiles: Vec<Tile> = (0..tx * ty)
            .map(|i| {
                let coord = TileCoord::new((i % tx) as i32, (i / tx) as i32);
                Tile::new(TileKind::Grass, coord.origin(ts), 0.0)
            })
            .collect();

        let mut placed = 0usize;
        for t in &data.tiles {
            let coord = TileCoord::new(t.x, t.y);
            let tile = &mut tiles[(t.y as u32 * tx + t.x as u32) as usize];
            tile.kind = t.kind;
            tile.color = t.color.unwrap_or_else(|| t.kind.default_color());
            tile.origin = coord.origin(ts);
            placed += 1;
        }

        let mut rng = SeededRng::from_seed(name);
        for tile in &mut tiles {
            tile.texture_variant = rng.next_f64();
        }

        let missing = tiles.len().saturating_sub(placed);
        if missing > 0 {
            tracing::debug!(missing, "cells absent from document filled with grass");
        }

        self.width = tx * self.tile_size;
        self.height = ty * self.tile_size;
        self.tiles_x = tx;
        self.tiles_y = ty;
        self.tiles = tiles;
        self.rng = rng;
        self.percentages = self.kind_counts().percentages();

        tracing::info!(
            width = self.width,
            height = self.height,
            tiles = self.tiles.len(),
            "custom world loaded"
        );
        Ok(())
    }

    /// World extent in pixels.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Grid size in tiles.
    pub fn tiles_x(&self) -> u32 {
        self.tiles_x
    }

    pub fn tiles_y(&self) -> u32 {
        self.tiles_y
    }

    /// All tiles, row-major.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Percentages the grid was generated with (observed shares for custom worlds).
    pub fn percentages(&self) -> TilePercentages {
        self.percentages
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as u32) < self.tiles_x
            && (coord.y as u32) < self.tiles_y
    }

    fn index(&self, coord: TileCoord) -> Option<usize> {
        self.contains(coord)
            .then(|| (coord.y as u32 * self.tiles_x + coord.x as u32) as usize)
    }

    /// Tile at a grid index, `None` outside the grid.
    pub fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        self.index(coord).and_then(|i| self.tiles.get(i))
    }

    /// Tile containing a world-space point, `None` outside the grid.
    pub fn tile_at(&self, x: f32, y: f32) -> Option<&Tile> {
        self.tile(TileCoord::from_world(
            Vec2::new(x, y),
            self.tile_size as f32,
        ))
    }

    /// Kind at a world-space point; grass when there is no tile.
    pub fn tile_kind_at(&self, x: f32, y: f32) -> TileKind {
        self.tile_at(x, y).map_or(TileKind::Grass, |t| t.kind)
    }

    pub fn is_on_water(&self, x: f32, y: f32) -> bool {
        self.tile_at(x, y).is_some_and(|t| t.kind == TileKind::Water)
    }

    /// Whether a `size` x `size` box at `(x, y)` fits without touching a wall.
    ///
    /// Boxes reaching outside the world are rejected. Otherwise the tiles
    /// around the box's top-left tile are tested for strict AABB overlap: the
    /// 3x3 neighborhood, widened on the right and bottom when the box is larger
    /// than a tile.
    pub fn can_move(&self, x: f32, y: f32, size: f32) -> bool {
        if x < 0.0
            || y < 0.0
            || x + size > self.width as f32
            || y + size > self.height as f32
        {
            return false;
        }

        let ts = self.tile_size as f32;
        let body = Rect::square(x, y, size);
        let first = TileCoord::from_world(Vec2::new(x, y), ts);
        let last = TileCoord::from_world(Vec2::new(x + size, y + size), ts);
        let end_x = last.x.max(first.x + 1);
        let end_y = last.y.max(first.y + 1);

        for cx in first.x - 1..=end_x {
            for cy in first.y - 1..=end_y {
                let coord = TileCoord::new(cx, cy);
                let Some(tile) = self.tile(coord) else {
                    continue;
                };
                if tile.is_solid() && coord.bounds(ts).overlaps(&body) {
                    return false;
                }
            }
        }
        true
    }

    pub fn kind_counts(&self) -> TileCounts {
        let mut counts = TileCounts::default();
        for t in &self.tiles {
            counts.bump(t.kind);
        }
        counts
    }

    /// FNV-1a hash of dimensions, kinds, colors and variants, in storage order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.width.to_le_bytes());
        mix(&mut h, &self.height.to_le_bytes());
        mix(&mut h, &self.tile_size.to_le_bytes());
        for t in &self.tiles {
            mix(&mut h, &[t.kind.code(), t.color.r, t.color.g, t.color.b]);
            mix(&mut h, &t.texture_variant.to_le_bytes());
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CustomTile, WorldSize};

    fn scenario_percentages() -> TilePercentages {
        TilePercentages {
            grass: 85.0,
            water: 10.0,
            wall: 3.0,
            cave: 2.0,
        }
    }

    /// 10x10 tile custom world with walls at the given tile positions.
    fn walled(walls: &[(i32, i32)]) -> WorldGrid {
        let mut doc = CustomWorld::blank(10, 10);
        doc.tiles = walls
            .iter()
            .map(|&(x, y)| CustomTile {
                x,
                y,
                kind: TileKind::Wall,
                color: None,
            })
            .collect();
        WorldGrid::from_custom(&doc).unwrap()
    }

    #[test]
    fn small_world_tile_count() {
        let w = WorldGrid::generate_sized(2500, 1500, "ABC", scenario_percentages());
        assert_eq!(w.tiles_x(), 156);
        assert_eq!(w.tiles_y(), 93);
        assert_eq!(w.tiles().len(), 14508);
    }

    #[test]
    fn generation_is_deterministic() {
        let a = WorldGrid::generate_sized(2500, 1500, "ABC", scenario_percentages());
        let b = WorldGrid::generate_sized(2500, 1500, "ABC", scenario_percentages());
        assert_eq!(a.tiles(), b.tiles());
        assert_eq!(a.state_hash(), b.state_hash());
        for (ta, tb) in a.tiles().iter().zip(b.tiles()) {
            assert_eq!(ta.texture_variant.to_bits(), tb.texture_variant.to_bits());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let a = WorldGrid::generate_sized(800, 800, "ABC", scenario_percentages());
        let b = WorldGrid::generate_sized(800, 800, "ABD", scenario_percentages());
        assert_ne!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn generation_visits_columns_first() {
        // The first two samples of the stream belong to tile (0, 0), the next
        // two to tile (0, 1).
        let p = scenario_percentages();
        let w = WorldGrid::generate_sized(64, 64, "ABC", p);
        let mut rng = SeededRng::from_seed("ABC");
        let k00 = p.classify(rng.next_f64());
        let v00 = rng.next_f64();
        let k01 = p.classify(rng.next_f64());
        let v01 = rng.next_f64();

        let t00 = w.tile(TileCoord::new(0, 0)).unwrap();
        let t01 = w.tile(TileCoord::new(0, 1)).unwrap();
        assert_eq!((t00.kind, t00.texture_variant), (k00, v00));
        assert_eq!((t01.kind, t01.texture_variant), (k01, v01));
        assert_eq!(t01.origin, Vec2::new(0.0, 16.0));
    }

    #[test]
    fn tiles_sit_at_pixel_origins() {
        let w = WorldGrid::generate_sized(160, 80, "x", scenario_percentages());
        for (i, t) in w.tiles().iter().enumerate() {
            let x = (i as u32 % w.tiles_x()) as f32 * 16.0;
            let y = (i as u32 / w.tiles_x()) as f32 * 16.0;
            assert_eq!(t.origin, Vec2::new(x, y));
            assert!((0.0..1.0).contains(&t.texture_variant));
        }
    }

    #[test]
    fn distribution_roughly_matches_percentages() {
        let w = WorldGrid::generate(&WorldConfig {
            world_size: WorldSize::Large,
            seed: "distribution".into(),
            tile_percentages: scenario_percentages(),
        });
        let pct = w.kind_counts().percentages();
        assert!((pct.grass - 85.0).abs() < 1.5, "grass {}", pct.grass);
        assert!((pct.water - 10.0).abs() < 1.5, "water {}", pct.water);
        assert!((pct.wall - 3.0).abs() < 1.0, "wall {}", pct.wall);
        assert!((pct.cave - 2.0).abs() < 1.0, "cave {}", pct.cave);
    }

    #[test]
    fn all_wall_percentages_fill_with_walls() {
        let p = TilePercentages {
            grass: 0.0,
            water: 0.0,
            wall: 100.0,
            cave: 0.0,
        };
        let w = WorldGrid::generate_sized(320, 320, "solid", p);
        assert_eq!(w.kind_counts().wall, w.tiles().len());
        assert!(!w.can_move(20.0, 20.0, 8.0));
    }

    #[test]
    fn wall_at_origin_blocks() {
        let w = walled(&[(0, 0)]);
        assert!(!w.can_move(0.0, 0.0, 16.0));
    }

    #[test]
    fn touching_a_wall_edge_is_allowed() {
        let w = walled(&[(1, 1)]);
        // Box spans exactly [0, 16) x [16, 32): shares the wall's left edge.
        assert!(w.can_move(0.0, 16.0, 16.0));
        assert!(!w.can_move(0.5, 16.0, 16.0));
        assert!(!w.can_move(17.0, 17.0, 4.0));
    }

    #[test]
    fn water_and_cave_never_block() {
        let mut doc = CustomWorld::blank(10, 10);
        doc.tiles = vec![
            CustomTile {
                x: 2,
                y: 2,
                kind: TileKind::Water,
                color: None,
            },
            CustomTile {
                x: 3,
                y: 2,
                kind: TileKind::Cave,
                color: None,
            },
        ];
        let w = WorldGrid::from_custom(&doc).unwrap();
        assert!(w.can_move(32.0, 32.0, 16.0));
        assert!(w.can_move(40.0, 36.0, 16.0));
        assert!(w.is_on_water(33.0, 33.0));
        assert!(!w.is_on_water(50.0, 33.0));
    }

    #[test]
    fn boxes_leaving_the_world_are_rejected() {
        let w = walled(&[]);
        assert!(w.can_move(0.0, 0.0, 16.0));
        assert!(!w.can_move(-0.1, 0.0, 16.0));
        assert!(!w.can_move(0.0, -1.0, 16.0));
        assert!(!w.can_move(145.0, 0.0, 16.0));
        assert!(w.can_move(144.0, 144.0, 16.0));
        assert!(!w.can_move(144.0, 144.5, 16.0));
    }

    #[test]
    fn large_boxes_see_walls_beyond_the_neighborhood() {
        let w = walled(&[(3, 0)]);
        // 40px box from tile 0 reaches into tile 2 only.
        assert!(w.can_move(0.0, 0.0, 40.0));
        // 50px box reaches tile 3.
        assert!(!w.can_move(0.0, 0.0, 50.0));
    }

    #[test]
    fn collision_agrees_with_brute_force() {
        let w = WorldGrid::generate_sized(
            320,
            320,
            "brute",
            TilePercentages {
                grass: 60.0,
                water: 10.0,
                wall: 25.0,
                cave: 5.0,
            },
        );
        let ts = w.tile_size() as f32;
        let mut y = 0.0;
        while y < 300.0 {
            let mut x = 0.0;
            while x < 300.0 {
                for size in [4.0, 12.0, 16.0] {
                    let body = Rect::square(x, y, size);
                    let expected = !w.tiles().iter().any(|t| {
                        t.is_solid() && Rect::square(t.origin.x, t.origin.y, ts).overlaps(&body)
                    });
                    assert_eq!(w.can_move(x, y, size), expected, "({x}, {y}) size {size}");
                }
                x += 7.0;
            }
            y += 7.0;
        }
    }

    #[test]
    fn out_of_range_queries_default() {
        let w = walled(&[(0, 0)]);
        assert!(w.tile_at(-1.0, 0.0).is_none());
        assert!(w.tile_at(0.0, 160.0).is_none());
        assert_eq!(w.tile_kind_at(-50.0, -50.0), TileKind::Grass);
        assert_eq!(w.tile_kind_at(1.0, 1.0), TileKind::Wall);
        assert!(!w.is_on_water(9999.0, 0.0));
    }

    #[test]
    fn past_the_last_full_tile_is_open_but_tileless() {
        // 2500 / 16 leaves a 4px strip with no tile.
        let w = WorldGrid::generate_sized(2500, 1500, "ABC", scenario_percentages());
        assert!(w.tile_at(2497.0, 10.0).is_none());
        assert_eq!(w.tile_kind_at(2497.0, 10.0), TileKind::Grass);
    }

    #[test]
    fn custom_load_converts_units_and_keeps_colors() {
        let mut doc = CustomWorld::blank(12, 10);
        doc.tiles.push(CustomTile {
            x: 11,
            y: 9,
            kind: TileKind::Cave,
            color: Some("#123456".parse().unwrap()),
        });
        let w = WorldGrid::from_custom(&doc).unwrap();
        assert_eq!(
            w.dimensions(),
            Dimensions {
                width: 192,
                height: 160
            }
        );
        let t = w.tile_at(11.0 * 16.0 + 1.0, 9.0 * 16.0 + 1.0).unwrap();
        assert_eq!(t.kind, TileKind::Cave);
        assert_eq!(t.color.to_hex(), "#123456");
        assert_eq!(t.origin, Vec2::new(176.0, 144.0));
        assert_eq!(w.tiles().len(), 120);
    }

    #[test]
    fn later_duplicate_wins() {
        let mut doc = CustomWorld::blank(10, 10);
        for kind in [TileKind::Wall, TileKind::Water] {
            doc.tiles.push(CustomTile {
                x: 4,
                y: 4,
                kind,
                color: None,
            });
        }
        let w = WorldGrid::from_custom(&doc).unwrap();
        assert_eq!(w.tile(TileCoord::new(4, 4)).unwrap().kind, TileKind::Water);
    }

    #[test]
    fn failed_reload_keeps_current_grid() {
        let mut w = walled(&[(0, 0)]);
        let before = w.state_hash();
        let bad = CustomWorld::blank(5, 5);
        assert!(w.load_custom(&bad).is_err());
        assert_eq!(w.state_hash(), before);
    }

    #[test]
    fn reload_replaces_generated_world() {
        let mut w = WorldGrid::generate_sized(800, 480, "ABC", scenario_percentages());
        w.load_custom(&CustomWorld::blank(10, 10)).unwrap();
        assert_eq!(w.tiles().len(), 100);
        assert_eq!(w.kind_counts().grass, 100);
        assert_eq!(w.percentages().grass, 100.0);
    }
}
