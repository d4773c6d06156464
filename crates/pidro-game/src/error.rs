//! Errors raised by the Game Coordinator and Game Supervisor.

use pidro_protocol::RoomCode;

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// `start_game` called twice for the same room code.
    #[error("game already started for room {0}")]
    AlreadyStarted(RoomCode),

    /// `stop_game`/`lookup` for a room with no running coordinator.
    #[error("no game running for room {0}")]
    NotFound(RoomCode),

    /// The coordinator's command channel is closed — it crashed or was
    /// already shut down. Per the failure design, a Coordinator crash is
    /// fatal to that room; it is not auto-restarted.
    #[error("game coordinator for room {0} is unavailable")]
    Unavailable(RoomCode),
}
