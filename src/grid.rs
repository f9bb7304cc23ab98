//! Level grid parsing and geometry.
//!
//! This module turns the rows of a level file into a validated [`Grid`] and provides the small
//! amount of geometry the engine needs: positions, directions and bounds-checked stepping.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::cell::Cell;

/// A grid coordinate with the origin at the top-left corner.
///
/// This structure is used both for the hero position kept by a level and for addressing single
/// cells when rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    /// Column, growing to the right.
    pub x: usize,
    /// Row, growing downwards.
    pub y: usize,
}

impl Position {
    /// Builds a position from a column and a row.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// One of the four directions the hero can be asked to move in.
///
/// This enumeration is produced by the key mapping and consumed by move resolution, which turns it
/// into a single step through [`Direction::delta`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards row zero.
    Up,
    /// Away from row zero.
    Down,
    /// Towards column zero.
    Left,
    /// Away from column zero.
    Right,
}

impl Direction {
    /// Every direction, in a fixed order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Returns the `(dx, dy)` offset of a single step in this direction.
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Reasons a level source cannot become a playable level.
///
/// This enumeration covers both the checks of the grid parser and the hero placement checks done
/// when a level is built. Every variant carries enough position information to point at the
/// offending part of the file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    /// The source has no rows, or its rows hold no cells.
    #[error("level source is empty")]
    Empty,
    /// A row differs in length from the first row.
    #[error("row {row} is {found} cells wide but the first row is {expected} cells wide")]
    InconsistentRowLength {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A character is not one of the cell digits `0` to `6`.
    #[error("invalid character {character:?} at row {row}, column {column}")]
    InvalidCharacter {
        /// Zero-based row of the character.
        row: usize,
        /// Zero-based column of the character.
        column: usize,
        /// The character itself.
        character: char,
    },
    /// No cell holds the hero.
    #[error("level has no hero")]
    MissingHero,
    /// More than one cell holds the hero.
    #[error("level has a second hero at row {row}, column {column}")]
    ExtraHero {
        /// Zero-based row of the second hero.
        row: usize,
        /// Zero-based column of the second hero.
        column: usize,
    },
}

/// A rectangular matrix of cells stored in row-major order.
///
/// This structure is built once per level by [`Grid::parse`] and afterwards only changes through
/// move resolution, which never alters walls or floor types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Number of columns.
    width: usize,
    /// Number of rows.
    height: usize,
    /// Cells, `width * height` of them, row by row.
    cells: Vec<Cell>,
}

impl Grid {
    /// Parses level rows into a grid.
    ///
    /// Every row must have the width of the first row and consist only of the digits `0` to `6`.
    /// All row widths are checked before any character is interpreted.
    ///
    /// # Errors
    ///
    /// - [`LoadError::Empty`] when there are no rows or the rows are zero cells wide.
    /// - [`LoadError::InconsistentRowLength`] for the first row whose width differs.
    /// - [`LoadError::InvalidCharacter`] for the first character that is not a cell digit.
    pub fn parse<I, S>(lines: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows: Vec<S> = lines.into_iter().collect();

        let width = rows
            .first()
            .map(|row| row.as_ref().chars().count())
            .ok_or(LoadError::Empty)?;
        if width == 0 {
            return Err(LoadError::Empty);
        }

        for (row, line) in rows.iter().enumerate() {
            let found = line.as_ref().chars().count();
            if found != width {
                return Err(LoadError::InconsistentRowLength {
                    row,
                    expected: width,
                    found,
                });
            }
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            for (column, character) in line.as_ref().chars().enumerate() {
                let cell = Cell::from_char(character).ok_or(LoadError::InvalidCharacter {
                    row,
                    column,
                    character,
                })?;
                cells.push(cell);
            }
        }

        Ok(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    /// Number of columns.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns the cell at `position`, or `None` outside the grid.
    pub fn get(&self, position: Position) -> Option<Cell> {
        self.index(position)
            .and_then(|index| self.cells.get(index))
            .copied()
    }

    /// Overwrites the cell at `position`. Positions outside the grid are ignored.
    pub(crate) fn set(&mut self, position: Position, cell: Cell) {
        if let Some(slot) = self
            .index(position)
            .and_then(|index| self.cells.get_mut(index))
        {
            *slot = cell;
        }
    }

    /// Returns the neighbour of `position` in `direction`.
    ///
    /// This function returns `None` when the step would leave the grid on any side, which move
    /// resolution treats the same as running into a wall.
    pub fn step(&self, position: Position, direction: Direction) -> Option<Position> {
        let (dx, dy) = direction.delta();
        let x = position.x.checked_add_signed(dx)?;
        let y = position.y.checked_add_signed(dy)?;

        (x < self.width && y < self.height).then_some(Position::new(x, y))
    }

    /// Iterates over the rows of the grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.width)
    }

    /// Iterates over every cell with its position, in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        self.cells.iter().enumerate().map(|(index, cell)| {
            (
                Position::new(index % self.width, index / self.width),
                *cell,
            )
        })
    }

    /// Converts a position into an index into the cell vector.
    const fn index(&self, position: Position) -> Option<usize> {
        if position.x < self.width && position.y < self.height {
            Some(position.y * self.width + position.x)
        } else {
            None
        }
    }
}

impl FromStr for Grid {
    type Err = LoadError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Self::parse(source.lines())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.rows().enumerate() {
            if index > 0 {
                writeln!(formatter)?;
            }
            for cell in row {
                write!(formatter, "{}", cell.to_char())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dimensions() {
        let grid: Grid = "1111\n1401\n1321\n1111".parse().expect("grid should parse");

        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.get(Position::new(1, 1)), Some(Cell::Hero));
        assert_eq!(grid.get(Position::new(2, 2)), Some(Cell::Box));
        assert_eq!(grid.get(Position::new(1, 2)), Some(Cell::Goal));
        assert_eq!(grid.get(Position::new(4, 0)), None);
        assert_eq!(grid.get(Position::new(0, 4)), None);
    }

    #[test]
    fn test_parse_accepts_crlf() {
        let grid: Grid = "141\r\n131\r\n".parse().expect("grid should parse");

        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
    }

    #[test]
    fn test_parse_display_round_trip() {
        let source = "11111\n14231\n15061\n11111";
        let grid: Grid = source.parse().expect("grid should parse");

        assert_eq!(grid.to_string(), source);
    }

    #[test]
    fn test_parse_empty_source() {
        assert_eq!("".parse::<Grid>(), Err(LoadError::Empty));
        assert_eq!(Grid::parse(Vec::<String>::new()), Err(LoadError::Empty));
        assert_eq!(Grid::parse(["", ""]), Err(LoadError::Empty));
    }

    #[test]
    fn test_parse_inconsistent_row_length() {
        assert_eq!(
            Grid::parse(["00", "0"]),
            Err(LoadError::InconsistentRowLength {
                row: 1,
                expected: 2,
                found: 1,
            })
        );
    }

    #[test]
    fn test_row_lengths_checked_before_characters() {
        assert_eq!(
            Grid::parse(["0x", "000"]),
            Err(LoadError::InconsistentRowLength {
                row: 1,
                expected: 2,
                found: 3,
            })
        );
    }

    #[test]
    fn test_parse_invalid_digit() {
        assert_eq!(
            Grid::parse(["1111", "1471", "1111"]),
            Err(LoadError::InvalidCharacter {
                row: 1,
                column: 2,
                character: '7',
            })
        );
    }

    #[test]
    fn test_parse_invalid_letter() {
        let err = "40\n0x".parse::<Grid>().expect_err("letters are not cells");

        assert_eq!(
            err,
            LoadError::InvalidCharacter {
                row: 1,
                column: 1,
                character: 'x',
            }
        );
        assert_eq!(err.to_string(), "invalid character 'x' at row 1, column 1");
    }

    #[test]
    fn test_step_stays_in_bounds() {
        let grid: Grid = "000\n040\n000".parse().expect("grid should parse");
        let corner = Position::new(0, 0);
        let far_corner = Position::new(2, 2);

        assert_eq!(grid.step(corner, Direction::Up), None);
        assert_eq!(grid.step(corner, Direction::Left), None);
        assert_eq!(
            grid.step(corner, Direction::Right),
            Some(Position::new(1, 0))
        );
        assert_eq!(grid.step(corner, Direction::Down), Some(Position::new(0, 1)));
        assert_eq!(grid.step(far_corner, Direction::Down), None);
        assert_eq!(grid.step(far_corner, Direction::Right), None);
    }

    #[test]
    fn test_cells_row_major() {
        let grid: Grid = "01\n23".parse().expect("grid should parse");
        let cells: Vec<(Position, Cell)> = grid.cells().collect();

        assert_eq!(
            cells,
            vec![
                (Position::new(0, 0), Cell::Floor),
                (Position::new(1, 0), Cell::Wall),
                (Position::new(0, 1), Cell::Box),
                (Position::new(1, 1), Cell::Goal),
            ]
        );
    }

    #[test]
    fn test_set_ignores_out_of_bounds() {
        let mut grid: Grid = "00".parse().expect("grid should parse");
        let before = grid.clone();
        grid.set(Position::new(5, 5), Cell::Wall);

        assert_eq!(grid, before);
    }
}
