//! `PidroServer` — the embeddable core, with no transport of its own.
//!
//! This ties together the Room Manager (which already composes the Game
//! Supervisor and Bot Manager internally) into the single entry point an
//! embedding transport layer calls into. Accepting connections, framing
//! messages, and authenticating callers are someone else's job; this type
//! only ever sees `PlayerId`s and `RoomCode`s that have already been
//! resolved upstream.

use std::collections::HashMap;

use pidro_engine::{RulesEngine, Viewer};
use pidro_game::{GameCoordinatorHandle, GameEvent};
use pidro_protocol::{PlayerId, RoomCode, RoomFilter, RoomType, Seat, SeatChoice};
use pidro_room::{LobbyEvent, RoomInfo, RoomManagerConfig, RoomManagerHandle};
use tokio::sync::broadcast;

use crate::PidroError;

/// Builder for [`PidroServer`]. Only exists to give room for future
/// tunables without breaking callers — today it wraps a single
/// [`RoomManagerConfig`].
pub struct PidroServerBuilder {
    config: RoomManagerConfig,
}

impl PidroServerBuilder {
    pub fn new() -> Self {
        Self { config: RoomManagerConfig::default() }
    }

    /// Overrides the Room Manager's disconnect-grace and bot-delay
    /// tunables. See [`RoomManagerConfig`] for the spec defaults.
    pub fn config(mut self, config: RoomManagerConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds and starts the core. `E::Action` must implement `BidAction`
    /// so the bundled default bot strategy can recognise bids and passes;
    /// see [`pidro_room::spawn`] for why that bound lives here.
    pub fn build<E>(self) -> PidroServer<E>
    where
        E: RulesEngine,
        E::Action: pidro_bots::BidAction,
    {
        PidroServer { rooms: pidro_room::spawn::<E>(self.config) }
    }
}

impl Default for PidroServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The running core. Cheap to clone — every method delegates to the
/// Room Manager actor (and, for in-game operations, the per-room Game
/// Coordinator it supervises), so a clone is just a clone of their
/// channel handles.
pub struct PidroServer<E: RulesEngine> {
    rooms: RoomManagerHandle<E>,
}

impl<E: RulesEngine> Clone for PidroServer<E> {
    fn clone(&self) -> Self {
        Self { rooms: self.rooms.clone() }
    }
}

impl<E> PidroServer<E>
where
    E: RulesEngine,
    E::Action: pidro_bots::BidAction,
{
    pub fn builder() -> PidroServerBuilder {
        PidroServerBuilder::new()
    }

    /// Subscribes to the single global `lobby:updates` topic.
    pub fn subscribe_lobby(&self) -> broadcast::Receiver<LobbyEvent> {
        self.rooms.subscribe_lobby()
    }

    pub async fn create_room(
        &self,
        host: PlayerId,
        room_type: RoomType,
        metadata: HashMap<String, String>,
    ) -> Result<RoomInfo, PidroError> {
        Ok(self.rooms.create_room(host, room_type, metadata).await?)
    }

    pub async fn list_rooms(&self, filter: RoomFilter) -> Vec<RoomInfo> {
        self.rooms.list_rooms(filter).await
    }

    pub async fn get_room(&self, code: RoomCode) -> Result<RoomInfo, PidroError> {
        Ok(self.rooms.get_room(code).await?)
    }

    pub async fn join_room(
        &self,
        code: RoomCode,
        player: PlayerId,
        choice: SeatChoice,
    ) -> Result<(RoomInfo, Seat), PidroError> {
        Ok(self.rooms.join_room(code, player, choice).await?)
    }

    pub async fn leave_room(&self, code: RoomCode, player: PlayerId) -> Result<(), PidroError> {
        Ok(self.rooms.leave_room(code, player).await?)
    }

    pub async fn handle_disconnect(&self, code: RoomCode, player: PlayerId) -> Result<(), PidroError> {
        Ok(self.rooms.handle_disconnect(code, player).await?)
    }

    pub async fn handle_reconnect(&self, code: RoomCode, player: PlayerId) -> Result<RoomInfo, PidroError> {
        Ok(self.rooms.handle_reconnect(code, player).await?)
    }

    pub async fn close_room(&self, code: RoomCode) -> Result<(), PidroError> {
        Ok(self.rooms.close_room(code).await?)
    }

    /// Subscribes to `game:<code>` and fetches the state as `viewer` sees
    /// it, matching the spec's "subscribe then snapshot" ordering so a
    /// caller never misses the events published between the two calls —
    /// the subscription is taken out before the snapshot is read.
    pub async fn subscribe_game(
        &self,
        code: RoomCode,
        viewer: Viewer,
    ) -> Result<(broadcast::Receiver<GameEvent<E>>, E::State), PidroError> {
        let game = self.game_handle(code).await?;
        let sub = game.subscribe();
        let state = game.get_state(viewer).await.map_err(PidroError::from)?;
        Ok((sub, state))
    }

    pub async fn apply_action(
        &self,
        code: RoomCode,
        seat: Seat,
        action: E::Action,
    ) -> Result<Result<E::State, E::Rejection>, PidroError> {
        let game = self.game_handle(code).await?;
        Ok(game.apply_action(seat, action).await?)
    }

    pub async fn legal_actions(&self, code: RoomCode, seat: Seat) -> Result<Vec<E::Action>, PidroError> {
        let game = self.game_handle(code).await?;
        Ok(game.legal_actions(seat).await?)
    }

    async fn game_handle(&self, code: RoomCode) -> Result<GameCoordinatorHandle<E>, PidroError> {
        Ok(self.rooms.game_handle(code).await?)
    }
}
