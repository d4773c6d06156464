//! Events published on the `lobby:updates` and `room:<code>` topics.

use pidro_protocol::{PlayerId, RoomCode, RoomStatus, Seat};

use crate::room::RoomInfo;

/// Broadcast on the single, global `lobby:updates` topic.
#[derive(Debug, Clone)]
pub enum LobbyEvent {
    RoomCreated(RoomInfo),
    RoomUpdated(RoomInfo),
    RoomClosed(RoomCode),
}

/// Broadcast on a single room's `room:<code>` topic.
#[derive(Debug, Clone)]
pub enum RoomEvent {
    PlayerJoined { seat: Seat, player_id: PlayerId },
    PlayerLeft { seat: Seat, player_id: PlayerId },
    PlayerDisconnected { seat: Seat, player_id: PlayerId },
    PlayerReconnected { seat: Seat, player_id: PlayerId },
    BotSeated { seat: Seat },
    BotEvicted { seat: Seat },
    StatusChanged(RoomStatus),
    Closed,
}
