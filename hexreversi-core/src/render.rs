//! Plain-text board view
//!
//! One line per row, glyphs separated by single spaces, each row indented so
//! the hexagon lines up in a monospace terminal.

use std::fmt;

use crate::board::Board;

/// Display adapter: `TextView(&board).to_string()`
pub struct TextView<'a>(pub &'a Board);

impl fmt::Display for TextView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = self.0.side_length();
        for (index, row) in self.0.rows().enumerate() {
            let indent = side.abs_diff(index + 1);
            write!(f, "{:indent$}", "", indent = indent)?;
            for cell in row {
                write!(f, "{} ", cell.status().glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Render the board as text
pub fn render(board: &Board) -> String {
    TextView(board).to_string()
}
