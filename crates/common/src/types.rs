use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An sRGB color with a fractional alpha channel.
///
/// Serialized as a `#rrggbb` hex string, which is how world documents and the
/// editor store tile colors. Alpha is not part of the serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `[0, 1]`.
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Black with the given opacity, clamped into `[0, 1]`.
    pub fn black(opacity: f32) -> Self {
        Self::BLACK.with_alpha(opacity)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// `#rrggbb`, ignoring alpha.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// CSS `rgba(...)` form, the way a 2D canvas fill style expects it.
    pub fn to_css(self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Errors from parsing a hex color string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("color must start with '#': {0:?}")]
    MissingHash(String),
    #[error("color must have 3 or 6 hex digits: {0:?}")]
    BadLength(String),
    #[error("invalid hex digit in color: {0:?}")]
    BadDigit(String),
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;
        // `from_str_radix` alone would take a sign, e.g. "#+f+f+f".
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::BadDigit(s.to_string()));
        }
        let channel = |hex: &str| {
            u8::from_str_radix(hex, 16).map_err(|_| ColorParseError::BadDigit(s.to_string()))
        };
        match digits.len() {
            6 => Ok(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            // #rgb shorthand: each digit is doubled.
            3 => {
                let short = |i: usize| channel(&digits[i..=i]).map(|v| v * 17);
                Ok(Self::rgb(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(ColorParseError::BadLength(s.to_string())),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Axis-aligned rectangle in world (pixel) units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A `size` x `size` square with its top-left corner at `(x, y)`.
    pub const fn square(x: f32, y: f32, size: f32) -> Self {
        Self::new(x, y, size, size)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Inclusive overlap: touching edges count.
    pub fn touches(&self, other: &Rect) -> bool {
        !(self.right() < other.x
            || self.x > other.right()
            || self.bottom() < other.y
            || self.y > other.bottom())
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn expand(&self, margin: f32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }
}

/// Grid index of a tile. Can be negative or past the world edge; bounds are
/// checked by whoever owns the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Tile containing the world-space point.
    pub fn from_world(pos: Vec2, tile_size: f32) -> Self {
        Self {
            x: (pos.x / tile_size).floor() as i32,
            y: (pos.y / tile_size).floor() as i32,
        }
    }

    /// World-space top-left corner of this tile.
    pub fn origin(self, tile_size: f32) -> Vec2 {
        Vec2::new(self.x as f32 * tile_size, self.y as f32 * tile_size)
    }

    pub fn bounds(self, tile_size: f32) -> Rect {
        let o = self.origin(tile_size);
        Rect::square(o.x, o.y, tile_size)
    }

    /// Euclidean distance in tile units.
    pub fn distance(self, other: TileCoord) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_long_and_short_hex() {
        let c: Color = "#4a7c59".parse().unwrap();
        assert_eq!((c.r, c.g, c.b), (0x4a, 0x7c, 0x59));
        assert_eq!(c.a, 1.0);

        let c: Color = "#fff".parse().unwrap();
        assert_eq!((c.r, c.g, c.b), (255, 255, 255));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            "4a7c59".parse::<Color>(),
            Err(ColorParseError::MissingHash(_))
        ));
        assert!(matches!(
            "#4a7c5".parse::<Color>(),
            Err(ColorParseError::BadLength(_))
        ));
        assert!(matches!(
            "#zz7c59".parse::<Color>(),
            Err(ColorParseError::BadDigit(_))
        ));
    }

    #[test]
    fn parse_rejects_signed_channels() {
        for s in ["#+f+f+f", "#+1+2+3", "#-1f", "#+ff"] {
            assert!(
                matches!(s.parse::<Color>(), Err(ColorParseError::BadDigit(_))),
                "{s} parsed"
            );
        }
    }

    #[test]
    fn color_serializes_as_hex_string() {
        let json = serde_json::to_string(&Color::rgb(0x41, 0x69, 0xe1)).unwrap();
        assert_eq!(json, "\"#4169e1\"");
        let back: Color = serde_json::from_str("\"#4169E1\"").unwrap();
        assert_eq!(back, Color::rgb(0x41, 0x69, 0xe1));
    }

    #[test]
    fn black_clamps_opacity() {
        assert_eq!(Color::black(1.5).a, 1.0);
        assert_eq!(Color::black(-0.2).a, 0.0);
        assert_eq!(Color::black(0.25).to_css(), "rgba(0, 0, 0, 0.25)");
    }

    #[test]
    fn strict_overlap_ignores_shared_edges() {
        let a = Rect::square(0.0, 0.0, 16.0);
        let b = Rect::square(16.0, 0.0, 16.0);
        assert!(!a.overlaps(&b));
        assert!(a.touches(&b));
        assert!(a.overlaps(&Rect::square(15.0, 15.0, 4.0)));
    }

    #[test]
    fn tile_coord_floors_negative_positions() {
        assert_eq!(
            TileCoord::from_world(Vec2::new(-1.0, 31.9), 16.0),
            TileCoord::new(-1, 1)
        );
        assert_eq!(TileCoord::new(2, 3).origin(16.0), Vec2::new(32.0, 48.0));
    }

    #[test]
    fn tile_distance_is_euclidean() {
        let d = TileCoord::new(0, 0).distance(TileCoord::new(3, 4));
        assert!((d - 5.0).abs() < 1e-6);
    }
}
