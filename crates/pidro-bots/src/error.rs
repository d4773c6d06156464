use pidro_protocol::{RoomCode, Seat};

#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("a bot is already seated at {1} in room {0}")]
    AlreadyExists(RoomCode, Seat),
    #[error("no bot seated at {1} in room {0}")]
    NotFound(RoomCode, Seat),
}
