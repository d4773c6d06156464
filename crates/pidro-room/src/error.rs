//! Error types for the room layer.

use pidro_protocol::{PlayerId, RoomCode, Seat};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomCode),

    /// The room is full — no more seats available.
    #[error("room {0} is full")]
    RoomFull(RoomCode),

    /// The player already occupies a seat in this room.
    #[error("player {0} is already in room {1}")]
    AlreadyInRoom(PlayerId, RoomCode),

    /// The player does not occupy a seat in this room.
    #[error("player {0} is not in room {1}")]
    NotInRoom(PlayerId, RoomCode),

    /// The room's status doesn't permit this operation — e.g. joining a
    /// room that is already `Playing`.
    #[error("room {0} cannot accept this action in its current status")]
    InvalidState(RoomCode),

    /// The requested seat is already occupied.
    #[error("seat {1} in room {0} is already taken")]
    SeatTaken(RoomCode, Seat),

    /// The requested team's two seats are both occupied.
    #[error("both seats of the requested team in room {0} are taken")]
    TeamFull(RoomCode),

    /// The seat choice itself was malformed (not applicable to this
    /// engine, or otherwise not a seat/team/auto value `Positions`
    /// recognises).
    #[error("the seat choice for room {0} is invalid")]
    InvalidChoice(RoomCode),

    /// The player already occupies a seat in a different room. A player
    /// may be seated in at most one room at a time (spec invariant 4).
    #[error("player {0} is already in room {1}")]
    AlreadyInOtherRoom(PlayerId, RoomCode),

    /// The caller isn't the room's host, and this operation requires it.
    #[error("player {0} is not the host of room {1}")]
    NotHost(PlayerId, RoomCode),

    /// The Game Coordinator failed to start; the room was rolled back to
    /// `Ready` rather than left half-started.
    #[error("room {0} failed to start its game")]
    GameStartFailed(RoomCode),

    /// The room's command channel is full or closed — its actor is gone.
    #[error("room {0} is unavailable")]
    Unavailable(RoomCode),

    /// The Room Manager actor itself is gone — returned only by
    /// operations (like `create_room`) that have no room code yet.
    #[error("the room manager is unavailable")]
    ManagerUnavailable,
}
