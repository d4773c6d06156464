//! Unified error type for the `pidro` facade.

use pidro_game::GameError;
use pidro_protocol::ProtocolError;
use pidro_room::RoomError;

/// Top-level error that wraps every sub-crate's error type.
///
/// Code against [`PidroServer`](crate::PidroServer) deals with this single
/// error instead of importing `pidro-room`/`pidro-game`/`pidro-protocol`
/// errors individually. The `#[from]` attribute on each variant generates
/// a `From` impl, so `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum PidroError {
    /// A protocol-level error (malformed room code, ...).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (full, not found, invalid state, ...).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// A game-coordinator-level error (no game running, coordinator gone).
    #[error(transparent)]
    Game(#[from] GameError),
}
