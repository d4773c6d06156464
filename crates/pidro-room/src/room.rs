//! The `Room` data model: everything the Room Manager tracks about one
//! table. A plain value type with no actor of its own — the owning
//! `RoomManagerActor` holds the single mutable copy, per the same
//! single-writer discipline `Positions` and `Coordinator` follow.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use pidro_positions::Positions;
use pidro_protocol::{PlayerId, RoomCode, RoomStatus, RoomType, Seat};

/// Bookkeeping for a seat whose occupant has dropped their connection but
/// hasn't been removed yet.
pub struct DisconnectInfo {
    pub since: Instant,
    /// Cancelled and re-armed whenever the timer schedule changes — e.g.
    /// the bot-replacement timer fires and a longer removal timer takes
    /// its place.
    pub timer: Option<pidro_tick::TimerHandle>,
}

pub struct Room {
    pub code: RoomCode,
    pub host_id: PlayerId,
    pub room_type: RoomType,
    pub created_at: Instant,
    pub last_activity: Instant,
    pub positions: Positions,
    pub status: RoomStatus,
    pub metadata: HashMap<String, String>,

    /// Players currently disconnected but not yet evicted from their seat.
    pub disconnected: HashMap<PlayerId, DisconnectInfo>,

    /// The human who originally sat each seat, kept even after a bot
    /// takes over — a reconnecting player is matched against this, and
    /// it's restored once the bot is evicted.
    pub original_occupants: HashMap<Seat, PlayerId>,

    /// Seats currently filled by a bot standing in for a human, or
    /// permanently for a practice room.
    pub bot_seats: HashSet<Seat>,
}

impl Room {
    pub fn new(code: RoomCode, host_id: PlayerId, room_type: RoomType) -> Self {
        let now = Instant::now();
        Self {
            code,
            host_id,
            room_type,
            created_at: now,
            last_activity: now,
            positions: Positions::empty(),
            status: RoomStatus::Waiting,
            metadata: HashMap::new(),
            disconnected: HashMap::new(),
            original_occupants: HashMap::new(),
            bot_seats: HashSet::new(),
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn is_full(&self) -> bool {
        self.positions.count() == 4
    }

    pub fn to_info(&self) -> RoomInfo {
        RoomInfo {
            code: self.code,
            host_id: self.host_id.clone(),
            room_type: self.room_type,
            status: self.status,
            seats: Seat::ALL.map(|s| self.positions.get(s).cloned()),
            bot_seats: Seat::ALL.into_iter().filter(|s| self.bot_seats.contains(s)).collect(),
            age_secs: self.created_at.elapsed().as_secs(),
        }
    }
}

/// A serialisable snapshot of a room, safe to hand to a transport layer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RoomInfo {
    pub code: RoomCode,
    pub host_id: PlayerId,
    pub room_type: RoomType,
    pub status: RoomStatus,
    pub seats: [Option<PlayerId>; 4],
    pub bot_seats: Vec<Seat>,
    pub age_secs: u64,
}
