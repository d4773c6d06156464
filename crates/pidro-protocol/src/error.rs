//! Error types shared by the protocol-level parsing helpers in this crate.
//!
//! Domain precondition failures (`room_not_found`, `seat_taken`, and the
//! rest of the taxonomy in §7) live closer to the actors that raise them —
//! see `pidro_room::RoomError`, `pidro_game::GameError`, and
//! `pidro_bots::BotError`.

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("'{0}' is not a valid room code (expected four [A-Z0-9] characters)")]
    InvalidRoomCode(String),
}
