//! Seats and partnerships: the stable coordinate system for turn-taking.

use std::fmt;

/// One of the four positions at the table. Partnerships are the fixed
/// pairs `{N,S}` and `{E,W}`; canonical ordering everywhere in this codebase
/// is `N, E, S, W`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Seat {
    N,
    E,
    S,
    W,
}

impl Seat {
    /// All four seats in canonical order.
    pub const ALL: [Seat; 4] = [Seat::N, Seat::E, Seat::S, Seat::W];

    /// The seat across the table, same partnership.
    pub fn partner(self) -> Seat {
        match self {
            Seat::N => Seat::S,
            Seat::S => Seat::N,
            Seat::E => Seat::W,
            Seat::W => Seat::E,
        }
    }

    /// The partnership this seat belongs to.
    pub fn team(self) -> Team {
        match self {
            Seat::N | Seat::S => Team::NorthSouth,
            Seat::E | Seat::W => Team::EastWest,
        }
    }

    fn index(self) -> usize {
        Seat::ALL.iter().position(|s| *s == self).expect("Seat::ALL is exhaustive")
    }

    /// Next seat clockwise, canonical order.
    pub fn next(self) -> Seat {
        Seat::ALL[(self.index() + 1) % 4]
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Seat::N => "N",
            Seat::E => "E",
            Seat::S => "S",
            Seat::W => "W",
        };
        write!(f, "{s}")
    }
}

/// A fixed partnership: the two seats across the table from each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Team {
    NorthSouth,
    EastWest,
}

impl Team {
    /// The two seats belonging to this team, canonical order.
    pub fn seats(self) -> [Seat; 2] {
        match self {
            Team::NorthSouth => [Seat::N, Seat::S],
            Team::EastWest => [Seat::E, Seat::W],
        }
    }
}
