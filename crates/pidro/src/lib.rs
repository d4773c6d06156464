//! # pidro
//!
//! The room/game-coordination core for a multiplayer Finnish Pidro
//! server: a Room Manager, a per-room Game Coordinator, a supervised
//! Bot Player pool, and the PubSub fabric tying them together.
//!
//! This crate has no transport of its own. A deployment implements
//! `pidro_engine::RulesEngine` for the actual card-game rules, then wires
//! an HTTP/WebSocket (or any other) transport layer on top of
//! [`PidroServer`], translating client requests into its methods and
//! forwarding its topic subscriptions back out to clients.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! # async fn run<E>() -> Result<(), pidro::PidroError>
//! # where E: pidro_engine::RulesEngine, E::Action: pidro_bots::BidAction {
//! let server: pidro::PidroServer<E> = pidro::PidroServer::builder().build();
//! let room = server.create_room("alice".into(), pidro_protocol::RoomType::Public, Default::default()).await?;
//! # let _ = room;
//! # Ok(())
//! # }
//! ```

mod error;
mod server;

pub use error::PidroError;
pub use server::{PidroServer, PidroServerBuilder};

pub mod prelude {
    pub use crate::{PidroError, PidroServer, PidroServerBuilder};
    pub use pidro_bots::BidAction;
    pub use pidro_engine::{Outcome, Phase, RulesEngine, Viewer};
    pub use pidro_game::GameEvent;
    pub use pidro_protocol::{PlayerId, RoomCode, RoomFilter, RoomStatus, RoomType, Seat, SeatChoice, Team};
    pub use pidro_room::{LobbyEvent, RoomEvent, RoomInfo, RoomManagerConfig};
}
