use phf::{Map, phf_map};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Supported microplate formats, identified by their well count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PlateFormat {
    Six,
    Twelve,
    TwentyFour,
    FortyEight,
    #[default]
    NinetySix,
}

static FORMAT_KEYS: Map<&'static str, PlateFormat> = phf_map! {
    "6" => PlateFormat::Six,
    "12" => PlateFormat::Twelve,
    "24" => PlateFormat::TwentyFour,
    "48" => PlateFormat::FortyEight,
    "96" => PlateFormat::NinetySix,
};

const ROW_LABELS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Unknown plate format '{0}'. Expected one of: 6, 12, 24, 48, 96.")]
pub struct PlateFormatError(pub String);

/// Physical geometry of a plate format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlateGeometry {
    pub rows: usize,
    pub cols: usize,
    pub row_labels: &'static [char],
}

impl PlateFormat {
    pub const ALL: [PlateFormat; 5] = [
        PlateFormat::Six,
        PlateFormat::Twelve,
        PlateFormat::TwentyFour,
        PlateFormat::FortyEight,
        PlateFormat::NinetySix,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            PlateFormat::Six => "6",
            PlateFormat::Twelve => "12",
            PlateFormat::TwentyFour => "24",
            PlateFormat::FortyEight => "48",
            PlateFormat::NinetySix => "96",
        }
    }

    pub fn geometry(&self) -> PlateGeometry {
        let (rows, cols) = match self {
            PlateFormat::Six => (2, 3),
            PlateFormat::Twelve => (3, 4),
            PlateFormat::TwentyFour => (4, 6),
            PlateFormat::FortyEight => (6, 8),
            PlateFormat::NinetySix => (8, 12),
        };
        PlateGeometry {
            rows,
            cols,
            row_labels: &ROW_LABELS[..rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.geometry().rows
    }

    pub fn cols(&self) -> usize {
        self.geometry().cols
    }

    pub fn well_count(&self) -> usize {
        let geometry = self.geometry();
        geometry.rows * geometry.cols
    }

    /// Name of the well at a zero-based `(row, col)` position, e.g. `(0, 0)` is `A1`.
    pub fn well_name(&self, row: usize, col: usize) -> Option<String> {
        let geometry = self.geometry();
        if row >= geometry.rows || col >= geometry.cols {
            return None;
        }
        Some(format!("{}{}", geometry.row_labels[row], col + 1))
    }

    /// Splits a well name into its zero-based `(row, col)` position on this plate.
    ///
    /// Only canonical names are accepted: `A01` or `A+1` is not `A1`.
    pub fn position_of(&self, well: &str) -> Option<(usize, usize)> {
        let mut chars = well.chars();
        let label = chars.next()?;
        let row = self.geometry().row_labels.iter().position(|&l| l == label)?;
        let digits = chars.as_str();
        if digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let column: usize = digits.parse().ok()?;
        if column == 0 || column > self.cols() {
            return None;
        }
        Some((row, column - 1))
    }

    pub fn contains(&self, well: &str) -> bool {
        self.position_of(well).is_some()
    }

    /// Canonical row-major traversal: `A1, A2, …, A<cols>, B1, …`.
    pub fn well_order(&self) -> WellOrder {
        WellOrder::new(*self, Traversal::RowMajor)
    }

    /// Column-major traversal: `A1, B1, …, <last row>1, A2, …`.
    pub fn column_order(&self) -> WellOrder {
        WellOrder::new(*self, Traversal::ColumnMajor)
    }

    /// Index of a well within the canonical order.
    pub fn canonical_index(&self, well: &str) -> Option<usize> {
        self.position_of(well).map(|(row, col)| row * self.cols() + col)
    }
}

impl FromStr for PlateFormat {
    type Err = PlateFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FORMAT_KEYS
            .get(s.trim())
            .copied()
            .ok_or_else(|| PlateFormatError(s.to_string()))
    }
}

impl TryFrom<String> for PlateFormat {
    type Error = PlateFormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PlateFormat> for String {
    fn from(format: PlateFormat) -> Self {
        format.key().to_string()
    }
}

impl fmt::Display for PlateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-well", self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Traversal {
    RowMajor,
    ColumnMajor,
}

/// A finite iterator over the well names of a plate. Each call to
/// [`PlateFormat::well_order`] starts a fresh traversal.
#[derive(Debug, Clone)]
pub struct WellOrder {
    format: PlateFormat,
    traversal: Traversal,
    index: usize,
}

impl WellOrder {
    fn new(format: PlateFormat, traversal: Traversal) -> Self {
        Self {
            format,
            traversal,
            index: 0,
        }
    }
}

impl Iterator for WellOrder {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let geometry = self.format.geometry();
        if self.index >= geometry.rows * geometry.cols {
            return None;
        }
        let (row, col) = match self.traversal {
            Traversal::RowMajor => (self.index / geometry.cols, self.index % geometry.cols),
            Traversal::ColumnMajor => (self.index % geometry.rows, self.index / geometry.rows),
        };
        self.index += 1;
        self.format.well_name(row, col)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.format.well_count().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for WellOrder {}
