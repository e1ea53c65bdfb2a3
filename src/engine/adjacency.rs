use crate::layout::Seat;

/// King-move adjacency: Chebyshev distance exactly 1, diagonals included.
/// Purely geometric; callers must check seat validity separately when it
/// matters.
pub fn adjacent(a: Seat, b: Seat) -> bool {
    let dr = a.row.abs_diff(b.row);
    let dc = a.col.abs_diff(b.col);
    dr <= 1 && dc <= 1 && (dr, dc) != (0, 0)
}

/// The up-to-eight in-bounds coordinates around `seat`.
pub(crate) fn surrounding(seat: Seat, rows: usize, cols: usize) -> Vec<Seat> {
    if rows == 0 || cols == 0 {
        return vec![];
    }
    let mut out = vec![];
    for row in seat.row.saturating_sub(1)..=(seat.row + 1).min(rows - 1) {
        for col in seat.col.saturating_sub(1)..=(seat.col + 1).min(cols - 1) {
            if (row, col) != (seat.row, seat.col) {
                out.push(Seat::new(row, col));
            }
        }
    }
    out
}
