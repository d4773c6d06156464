//! Core identity and seating types shared by every layer of the room/game
//! coordination stack.
//!
//! Nothing in this crate owns an actor or a channel — it is the vocabulary
//! the Room Manager, Game Coordinator, and Bot subsystem all speak so they
//! don't each invent their own `Seat`, `RoomCode`, or error taxonomy.

mod error;
mod room_code;
mod seat;

pub use error::ProtocolError;
pub use room_code::RoomCode;
pub use seat::{Seat, Team};

use std::fmt;

/// A player's identity, as handed to the core by whatever authenticates
/// connections upstream. Opaque here — persistent accounts and credential
/// verification live outside this crate entirely.
///
/// Bot occupants use this same type (see `PlayerId::bot`) so that
/// `Positions` and the room's player index never need a second identity
/// type for seats a bot happens to be sitting in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// The stable derived id for a bot occupying `seat` in `code`, e.g.
    /// `bot:ABCD:E`. Stable so that re-deriving it (after a crash, in a
    /// test, in a log line) always yields the same id for the same seat.
    pub fn bot(code: &RoomCode, seat: Seat) -> Self {
        Self(format!("bot:{code}:{seat}"))
    }

    /// Heuristic used only for display/stat purposes; the authoritative
    /// bot/human distinction is `Room::bot_seats`, not this.
    pub fn looks_like_bot(&self) -> bool {
        self.0.starts_with("bot:")
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Lifecycle state of a room.
///
/// Unlike a fixed-timestep game room's strictly linear state machine, a
/// Pidro room can reach `Closed` from any of the other four states (host
/// leaves, Game Coordinator crashes, an admin calls `close_room`) — there
/// is no single `next()` to walk. Each predicate below is what callers
/// actually need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    /// Fewer than four seats filled.
    Waiting,
    /// All four seats filled, Game Coordinator not started yet.
    Ready,
    /// Game Coordinator is running.
    Playing,
    /// Engine reported a terminal phase.
    Finished,
    /// Room destroyed; no further operations are valid.
    Closed,
}

impl RoomStatus {
    /// `true` for rooms a player may still `join_room` into.
    pub fn is_joinable(self) -> bool {
        matches!(self, Self::Waiting)
    }

    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Closed)
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Waiting => "waiting",
            Self::Ready => "ready",
            Self::Playing => "playing",
            Self::Finished => "finished",
            Self::Closed => "closed",
        };
        write!(f, "{s}")
    }
}

/// Whether a room is advertised in the public lobby listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Public,
    /// Pre-declared bot seats, excluded from `list_rooms(available)`.
    Practice,
}

/// A seat-assignment request passed to `join_room` / `Positions::assign`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatChoice {
    Seat(Seat),
    Team(Team),
    Auto,
}

/// Filter accepted by `list_rooms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomFilter {
    All,
    Waiting,
    Ready,
    Playing,
    Finished,
    /// Non-finished, non-closed, non-practice — what the public lobby shows.
    Available,
}
