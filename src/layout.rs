use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A zero-based (row, col) coordinate. Whether it names a real seat depends on
/// the governing `Layout`.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Seat {
    pub row: usize,
    pub col: usize,
}

impl Seat {
    pub fn new(row: usize, col: usize) -> Seat {
        Seat { row, col }
    }
}

impl fmt::Debug for Seat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LayoutError {
    #[error("layout has no rows")]
    NoRows,
    #[error("row {0} has no seat groups")]
    EmptyRow(usize),
    #[error("row {0}: invalid group size {1:?}")]
    InvalidGroupSize(usize, String),
}

/// Seat topology of a chart. Exactly one layout governs a chart at a time;
/// paired and custom are mutually exclusive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layout {
    /// rows x cols, every in-bounds coordinate is a real seat.
    Uniform { rows: usize, cols: usize },
    /// Same grid, but seats are grouped into column pairs (0,1), (2,3), ...
    /// An odd-width row ends with an unpaired single.
    Paired { rows: usize, cols: usize },
    /// One group-size sequence per row. `cols` is the widest row's seat sum;
    /// narrower rows have trailing non-seat columns.
    Custom {
        row_groups: Vec<Vec<usize>>,
        cols: usize,
    },
}

/// A contiguous block of seats within one row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeatGroup {
    pub start_col: usize,
    pub size: usize,
}

impl Layout {
    pub fn custom(row_groups: Vec<Vec<usize>>) -> Layout {
        let cols = row_groups
            .iter()
            .map(|groups| groups.iter().sum::<usize>())
            .max()
            .unwrap_or(0);
        Layout::Custom { row_groups, cols }
    }

    /// Parses the free-text custom layout format: one row per non-empty line,
    /// group sizes separated by whitespace or hyphens ("2 3 3 2", "2-3-3-2").
    /// Any invalid token fails the whole parse; there are no partial results.
    pub fn parse_custom(text: &str) -> Result<Layout, LayoutError> {
        let mut row_groups: Vec<Vec<usize>> = vec![];
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            let row = row_groups.len();
            let mut groups = vec![];
            for token in line
                .split(|c: char| c.is_whitespace() || c == '-')
                .filter(|t| !t.is_empty())
            {
                match token.parse::<usize>() {
                    Ok(size) if size > 0 => groups.push(size),
                    _ => return Err(LayoutError::InvalidGroupSize(row, token.to_string())),
                }
            }
            if groups.is_empty() {
                return Err(LayoutError::EmptyRow(row));
            }
            row_groups.push(groups);
        }
        if row_groups.is_empty() {
            return Err(LayoutError::NoRows);
        }
        Ok(Layout::custom(row_groups))
    }

    pub fn rows(&self) -> usize {
        match self {
            Layout::Uniform { rows, .. } | Layout::Paired { rows, .. } => *rows,
            Layout::Custom { row_groups, .. } => row_groups.len(),
        }
    }

    pub fn cols(&self) -> usize {
        match self {
            Layout::Uniform { cols, .. }
            | Layout::Paired { cols, .. }
            | Layout::Custom { cols, .. } => *cols,
        }
    }

    pub fn is_paired(&self) -> bool {
        matches!(self, Layout::Paired { .. })
    }

    /// Number of real seats in the given row.
    pub fn row_seat_count(&self, row: usize) -> usize {
        if row >= self.rows() {
            return 0;
        }
        match self {
            Layout::Uniform { cols, .. } | Layout::Paired { cols, .. } => *cols,
            Layout::Custom { row_groups, .. } => row_groups[row].iter().sum(),
        }
    }

    pub fn seat_count(&self) -> usize {
        (0..self.rows()).map(|row| self.row_seat_count(row)).sum()
    }

    /// True iff the coordinate is in bounds and within the row's declared
    /// seats. Trailing columns of a short custom row are not seats.
    pub fn is_seat(&self, row: usize, col: usize) -> bool {
        row < self.rows() && col < self.cols() && col < self.row_seat_count(row)
    }

    /// The row's seat groups: declared groups for custom layouts, column
    /// pairs for paired layouts, one full-width group otherwise.
    pub fn row_groups(&self, row: usize) -> Vec<SeatGroup> {
        if row >= self.rows() {
            return vec![];
        }
        match self {
            Layout::Uniform { cols, .. } => {
                if *cols == 0 {
                    vec![]
                } else {
                    vec![SeatGroup {
                        start_col: 0,
                        size: *cols,
                    }]
                }
            }
            Layout::Paired { cols, .. } => (0..*cols)
                .step_by(2)
                .map(|start_col| SeatGroup {
                    start_col,
                    size: 2.min(*cols - start_col),
                })
                .collect(),
            Layout::Custom { row_groups, .. } => {
                let mut groups = vec![];
                let mut start_col = 0;
                for &size in &row_groups[row] {
                    groups.push(SeatGroup { start_col, size });
                    start_col += size;
                }
                groups
            }
        }
    }

    /// All real seats in row-major order.
    pub fn seats(&self) -> Vec<Seat> {
        let mut seats = vec![];
        for row in 0..self.rows() {
            for col in 0..self.row_seat_count(row) {
                seats.push(Seat::new(row, col));
            }
        }
        seats
    }
}
