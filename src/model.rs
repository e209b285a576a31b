//! Core data models for the bead editor.
//! Cells, colors and the sparse grid store that holds placed beads.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Integer grid coordinate. The grid is unbounded in both directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// 24-bit bead color. Serialized as `#RRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[cfg(test)]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_u32(v: u32) -> Self {
        Self {
            r: ((v >> 16) & 0xff) as u8,
            g: ((v >> 8) & 0xff) as u8,
            b: (v & 0xff) as u8,
        }
    }

    /// Parses `#RRGGBB` (the leading `#` is optional). Returns `None` on anything else.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Self::from_u32)
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::parse_hex(&value).ok_or_else(|| format!("invalid color '{value}', expected #RRGGBB"))
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_hex()
    }
}

/// A named palette entry shown as a swatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Swatch {
    pub name: &'static str,
    pub color: Rgb,
}

/// The fixed 12-color bead palette, in display order.
pub const PALETTE: [Swatch; 12] = [
    Swatch { name: "Red", color: Rgb::from_u32(0xFF0000) },
    Swatch { name: "Blue", color: Rgb::from_u32(0x0000FF) },
    Swatch { name: "Green", color: Rgb::from_u32(0x00FF00) },
    Swatch { name: "Yellow", color: Rgb::from_u32(0xFFFF00) },
    Swatch { name: "Orange", color: Rgb::from_u32(0xFFA500) },
    Swatch { name: "Purple", color: Rgb::from_u32(0x800080) },
    Swatch { name: "Black", color: Rgb::from_u32(0x000000) },
    Swatch { name: "White", color: Rgb::from_u32(0xFFFFFF) },
    Swatch { name: "Brown", color: Rgb::from_u32(0xA52A2A) },
    Swatch { name: "Pink", color: Rgb::from_u32(0xFFC0CB) },
    Swatch { name: "Gray", color: Rgb::from_u32(0x808080) },
    Swatch { name: "Light Blue", color: Rgb::from_u32(0xADD8E6) },
];

pub const DEFAULT_COLOR: Rgb = PALETTE[0].color;

/// Optional fixed extent for the bounded-grid variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub width: u32,
    pub height: u32,
}

impl GridBounds {
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.width && (cell.y as u32) < self.height
    }
}

/// Inclusive cell-space rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BoundingBox {
    /// 10x10 box centered on the origin, used when the grid is empty.
    pub const DEFAULT: BoundingBox = BoundingBox { min_x: -5, min_y: -5, max_x: 4, max_y: 4 };

    pub fn width(&self) -> i32 {
        self.max_x.saturating_sub(self.min_x).saturating_add(1)
    }

    pub fn height(&self) -> i32 {
        self.max_y.saturating_sub(self.min_y).saturating_add(1)
    }

    /// Grows the box by `margin` cells on every side, saturating at the `i32` range.
    pub fn expand(&self, margin: i32) -> Self {
        Self {
            min_x: self.min_x.saturating_sub(margin),
            min_y: self.min_y.saturating_sub(margin),
            max_x: self.max_x.saturating_add(margin),
            max_y: self.max_y.saturating_add(margin),
        }
    }
}

/// Sparse bead storage. A cell is present only while it holds a color.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grid {
    beads: HashMap<Cell, Rgb>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, cell: Cell, color: Rgb) {
        self.beads.insert(cell, color);
    }

    pub fn clear(&mut self, cell: Cell) {
        self.beads.remove(&cell);
    }

    pub fn get(&self, cell: Cell) -> Option<Rgb> {
        self.beads.get(&cell).copied()
    }

    /// Eraser semantics: same color removes the bead, any other color (or empty) sets it.
    pub fn toggle(&mut self, cell: Cell, color: Rgb) {
        if self.get(cell) == Some(color) {
            self.clear(cell);
        } else {
            self.set(cell, color);
        }
    }

    pub fn clear_all(&mut self) {
        self.beads.clear();
    }

    pub fn len(&self) -> usize {
        self.beads.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.beads.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Cell, Rgb)> + '_ {
        self.beads.iter().map(|(c, rgb)| (*c, *rgb))
    }

    /// Bounds over every occupied cell, or [`BoundingBox::DEFAULT`] when empty.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut cells = self.beads.keys();
        let Some(first) = cells.next() else {
            return BoundingBox::DEFAULT;
        };
        cells.fold(
            BoundingBox { min_x: first.x, min_y: first.y, max_x: first.x, max_y: first.y },
            |b, c| BoundingBox {
                min_x: b.min_x.min(c.x),
                min_y: b.min_y.min(c.y),
                max_x: b.max_x.max(c.x),
                max_y: b.max_y.max(c.y),
            },
        )
    }
}
