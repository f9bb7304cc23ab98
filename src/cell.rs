//! Cell encoding for level grids.
//!
//! Level files store every grid position as a single digit. Each digit packs two independent
//! facts, what stands on the cell and what kind of floor lies beneath it, so this module exposes
//! both the packed [`Cell`] and its decomposition into [`Occupant`] and [`Floor`].

/// Whatever stands on a non-wall cell.
///
/// This enumeration represents the movable half of a cell. Move resolution only ever transfers an
/// occupant from one cell to another, so this is the part of the grid that changes during play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Occupant {
    /// Nothing stands on the cell.
    Vacant,
    /// A pushable box stands on the cell.
    Box,
    /// The player-controlled hero stands on the cell.
    Hero,
}

/// Floor type beneath a non-wall cell.
///
/// This enumeration represents the fixed half of a cell. The set of goal floors is decided when the
/// level loads and never changes afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Floor {
    /// Ordinary floor.
    Plain,
    /// Goal floor that must end up covered for the level to be solved.
    Goal,
}

/// One grid position as stored in a level file.
///
/// The discriminants match the digits used in level files. Walls carry neither an occupant nor a
/// floor type; every other variant is one combination of [`Occupant`] and [`Floor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cell {
    /// Empty plain floor (`0`).
    Floor = 0,
    /// Impassable wall (`1`).
    Wall = 1,
    /// Box on plain floor (`2`).
    Box = 2,
    /// Uncovered goal (`3`).
    Goal = 3,
    /// Hero on plain floor (`4`).
    Hero = 4,
    /// Box on a goal (`5`).
    BoxOnGoal = 5,
    /// Hero on a goal (`6`).
    HeroOnGoal = 6,
}

impl Cell {
    /// Maps a level-file digit value to its cell.
    ///
    /// This function returns `None` for values outside `0..=6`, which the loader reports as invalid
    /// characters.
    pub const fn from_digit(digit: u32) -> Option<Self> {
        match digit {
            0 => Some(Self::Floor),
            1 => Some(Self::Wall),
            2 => Some(Self::Box),
            3 => Some(Self::Goal),
            4 => Some(Self::Hero),
            5 => Some(Self::BoxOnGoal),
            6 => Some(Self::HeroOnGoal),
            _ => None,
        }
    }

    /// Maps a level-file character to its cell.
    pub fn from_char(character: char) -> Option<Self> {
        character.to_digit(10).and_then(Self::from_digit)
    }

    /// Returns the level-file digit for this cell.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns the level-file character for this cell.
    pub const fn to_char(self) -> char {
        match self {
            Self::Floor => '0',
            Self::Wall => '1',
            Self::Box => '2',
            Self::Goal => '3',
            Self::Hero => '4',
            Self::BoxOnGoal => '5',
            Self::HeroOnGoal => '6',
        }
    }

    /// Builds the cell holding `occupant` on `floor`.
    ///
    /// This function is the inverse of [`Cell::occupant`] and [`Cell::floor`] for every cell other
    /// than a wall.
    pub const fn compose(occupant: Occupant, floor: Floor) -> Self {
        match (occupant, floor) {
            (Occupant::Vacant, Floor::Plain) => Self::Floor,
            (Occupant::Vacant, Floor::Goal) => Self::Goal,
            (Occupant::Box, Floor::Plain) => Self::Box,
            (Occupant::Box, Floor::Goal) => Self::BoxOnGoal,
            (Occupant::Hero, Floor::Plain) => Self::Hero,
            (Occupant::Hero, Floor::Goal) => Self::HeroOnGoal,
        }
    }

    /// Returns the occupant of this cell, or `None` for a wall.
    pub const fn occupant(self) -> Option<Occupant> {
        match self {
            Self::Wall => None,
            Self::Floor | Self::Goal => Some(Occupant::Vacant),
            Self::Box | Self::BoxOnGoal => Some(Occupant::Box),
            Self::Hero | Self::HeroOnGoal => Some(Occupant::Hero),
        }
    }

    /// Returns the floor type of this cell, or `None` for a wall.
    pub const fn floor(self) -> Option<Floor> {
        match self {
            Self::Wall => None,
            Self::Floor | Self::Box | Self::Hero => Some(Floor::Plain),
            Self::Goal | Self::BoxOnGoal | Self::HeroOnGoal => Some(Floor::Goal),
        }
    }

    /// Replaces the occupant while keeping the floor type.
    ///
    /// This function is how occupants travel between cells during move resolution. Walls have no
    /// floor to keep and are returned unchanged.
    #[must_use]
    pub const fn with_occupant(self, occupant: Occupant) -> Self {
        match self.floor() {
            Some(floor) => Self::compose(occupant, floor),
            None => self,
        }
    }

    /// Whether this cell is a wall.
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }

    /// Whether a box stands on this cell.
    pub const fn has_box(self) -> bool {
        matches!(self, Self::Box | Self::BoxOnGoal)
    }

    /// Whether the hero stands on this cell.
    pub const fn has_hero(self) -> bool {
        matches!(self, Self::Hero | Self::HeroOnGoal)
    }

    /// Whether this cell is floor with nothing on it, goal or not.
    ///
    /// Only such cells may receive a pushed box.
    pub const fn is_vacant(self) -> bool {
        matches!(self, Self::Floor | Self::Goal)
    }

    /// Whether this cell is a goal that nothing covers.
    pub const fn is_bare_goal(self) -> bool {
        matches!(self, Self::Goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Cell; 7] = [
        Cell::Floor,
        Cell::Wall,
        Cell::Box,
        Cell::Goal,
        Cell::Hero,
        Cell::BoxOnGoal,
        Cell::HeroOnGoal,
    ];

    #[test]
    fn test_digits_match_codes() {
        for cell in ALL {
            assert_eq!(
                Cell::from_char(cell.to_char()),
                Some(cell),
                "character of {cell:?} should map back to it"
            );
            assert_eq!(
                cell.to_char().to_digit(10),
                Some(u32::from(cell.code())),
                "character and code of {cell:?} should agree"
            );
        }
    }

    #[test]
    fn test_undefined_digits_are_rejected() {
        for character in ['7', '8', '9', 'x', ' ', '-'] {
            assert_eq!(
                Cell::from_char(character),
                None,
                "{character:?} is not a cell"
            );
        }
    }

    #[test]
    fn test_decomposition_recomposes() {
        for cell in ALL {
            match (cell.occupant(), cell.floor()) {
                (Some(occupant), Some(floor)) => {
                    assert_eq!(Cell::compose(occupant, floor), cell, "{cell:?} round trip");
                }
                (None, None) => assert!(cell.is_wall(), "only walls lack both facts"),
                _ => panic!("{cell:?} has exactly one of occupant and floor"),
            }
        }
    }

    #[test]
    fn test_with_occupant_keeps_floor() {
        assert_eq!(Cell::HeroOnGoal.with_occupant(Occupant::Vacant), Cell::Goal);
        assert_eq!(Cell::Hero.with_occupant(Occupant::Vacant), Cell::Floor);
        assert_eq!(Cell::Goal.with_occupant(Occupant::Hero), Cell::HeroOnGoal);
        assert_eq!(Cell::Floor.with_occupant(Occupant::Box), Cell::Box);
        assert_eq!(Cell::BoxOnGoal.with_occupant(Occupant::Vacant), Cell::Goal);
        assert_eq!(Cell::Wall.with_occupant(Occupant::Hero), Cell::Wall);
    }

    #[test]
    fn test_predicates() {
        assert!(Cell::Goal.is_bare_goal());
        assert!(!Cell::BoxOnGoal.is_bare_goal());
        assert!(!Cell::HeroOnGoal.is_bare_goal());

        assert!(Cell::Floor.is_vacant());
        assert!(Cell::Goal.is_vacant());
        assert!(!Cell::Box.is_vacant());
        assert!(!Cell::Hero.is_vacant());
        assert!(!Cell::Wall.is_vacant());

        assert!(Cell::BoxOnGoal.has_box());
        assert!(Cell::HeroOnGoal.has_hero());
        assert!(!Cell::Wall.has_box());
    }
}
