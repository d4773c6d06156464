//! The Room Manager: the single authoritative actor over every room's
//! seating, status, host, and disconnect timers.
//!
//! Every mutation to a `Room` goes through this actor's command channel —
//! the same single-writer discipline the Game Coordinator applies to its
//! own state. Cross-actor signalling (detecting a game finishing) happens
//! only through the PubSub fabric, never by calling back into
//! `pidro-game`/`pidro-bots` — that keeps the crate dependency graph
//! acyclic: `pidro-room` depends on them, never the reverse.

use std::collections::HashMap;
use std::time::Instant;

use pidro_bots::BotManager;
use pidro_engine::{Outcome, RulesEngine};
use pidro_game::{GameEvent, GameSupervisor};
use pidro_positions::AssignError;
use pidro_protocol::{PlayerId, RoomCode, RoomFilter, RoomStatus, RoomType, Seat, SeatChoice};
use pidro_pubsub::Topic;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::config::RoomManagerConfig;
use crate::event::{LobbyEvent, RoomEvent};
use crate::room::{DisconnectInfo, Room, RoomInfo};
use crate::RoomError;

enum Command<E: RulesEngine> {
    CreateRoom {
        host_id: PlayerId,
        room_type: RoomType,
        metadata: HashMap<String, String>,
        reply: oneshot::Sender<Result<RoomInfo, RoomError>>,
    },
    JoinRoom {
        code: RoomCode,
        player_id: PlayerId,
        choice: SeatChoice,
        reply: oneshot::Sender<Result<(RoomInfo, Seat), RoomError>>,
    },
    LeaveRoom {
        code: RoomCode,
        player_id: PlayerId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    ListRooms {
        filter: RoomFilter,
        reply: oneshot::Sender<Vec<RoomInfo>>,
    },
    GetRoom {
        code: RoomCode,
        reply: oneshot::Sender<Result<RoomInfo, RoomError>>,
    },
    CloseRoom {
        code: RoomCode,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    HandleDisconnect {
        code: RoomCode,
        player_id: PlayerId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    HandleReconnect {
        code: RoomCode,
        player_id: PlayerId,
        reply: oneshot::Sender<Result<RoomInfo, RoomError>>,
    },
    DevSetSeat {
        code: RoomCode,
        seat: Seat,
        player_id: PlayerId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    GameHandle {
        code: RoomCode,
        reply: oneshot::Sender<Result<pidro_game::GameCoordinatorHandle<E>, RoomError>>,
    },
}

/// Messages the Room Manager delivers to itself: timer fires, and the
/// game-over notice forwarded by a per-room watcher task.
enum Internal {
    ReplaceTimerFired { code: RoomCode, seat: Seat, player_id: PlayerId },
    RemovalTimerFired { code: RoomCode, player_id: PlayerId },
    GameOverObserved { code: RoomCode, outcome: Outcome },
    /// The Game Coordinator's topic sender was dropped without ever
    /// publishing `GameOver` — the coordinator task crashed or panicked.
    CoordinatorCrashed { code: RoomCode },
}

/// Cheap-to-clone handle to the running Room Manager actor.
pub struct RoomManagerHandle<E: RulesEngine> {
    sender: mpsc::Sender<Command<E>>,
    lobby_topic: Topic<LobbyEvent>,
}

impl<E: RulesEngine> Clone for RoomManagerHandle<E> {
    fn clone(&self) -> Self {
        Self { sender: self.sender.clone(), lobby_topic: self.lobby_topic.clone() }
    }
}

impl<E: RulesEngine> RoomManagerHandle<E> {
    /// Subscribes to the single global `lobby:updates` topic.
    pub fn subscribe_lobby(&self) -> broadcast::Receiver<LobbyEvent> {
        self.lobby_topic.subscribe()
    }

    pub async fn create_room(
        &self,
        host_id: PlayerId,
        room_type: RoomType,
        metadata: HashMap<String, String>,
    ) -> Result<RoomInfo, RoomError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(Command::CreateRoom { host_id, room_type, metadata, reply: tx })
            .await
            .map_err(|_| RoomError::ManagerUnavailable)?;
        rx.await.map_err(|_| RoomError::ManagerUnavailable)?
    }

    pub async fn join_room(
        &self,
        code: RoomCode,
        player_id: PlayerId,
        choice: SeatChoice,
    ) -> Result<(RoomInfo, Seat), RoomError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(Command::JoinRoom { code, player_id, choice, reply: tx })
            .await
            .map_err(|_| RoomError::Unavailable(code))?;
        rx.await.map_err(|_| RoomError::Unavailable(code))?
    }

    pub async fn leave_room(&self, code: RoomCode, player_id: PlayerId) -> Result<(), RoomError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(Command::LeaveRoom { code, player_id, reply: tx })
            .await
            .map_err(|_| RoomError::Unavailable(code))?;
        rx.await.map_err(|_| RoomError::Unavailable(code))?
    }

    pub async fn list_rooms(&self, filter: RoomFilter) -> Vec<RoomInfo> {
        let (tx, rx) = oneshot::channel();
        if self.sender.send(Command::ListRooms { filter, reply: tx }).await.is_err() {
            return Vec::new();
        }
        rx.await.unwrap_or_default()
    }

    pub async fn get_room(&self, code: RoomCode) -> Result<RoomInfo, RoomError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(Command::GetRoom { code, reply: tx })
            .await
            .map_err(|_| RoomError::Unavailable(code))?;
        rx.await.map_err(|_| RoomError::Unavailable(code))?
    }

    pub async fn close_room(&self, code: RoomCode) -> Result<(), RoomError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(Command::CloseRoom { code, reply: tx })
            .await
            .map_err(|_| RoomError::Unavailable(code))?;
        rx.await.map_err(|_| RoomError::Unavailable(code))?
    }

    pub async fn handle_disconnect(&self, code: RoomCode, player_id: PlayerId) -> Result<(), RoomError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(Command::HandleDisconnect { code, player_id, reply: tx })
            .await
            .map_err(|_| RoomError::Unavailable(code))?;
        rx.await.map_err(|_| RoomError::Unavailable(code))?
    }

    pub async fn handle_reconnect(&self, code: RoomCode, player_id: PlayerId) -> Result<RoomInfo, RoomError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(Command::HandleReconnect { code, player_id, reply: tx })
            .await
            .map_err(|_| RoomError::Unavailable(code))?;
        rx.await.map_err(|_| RoomError::Unavailable(code))?
    }

    /// Test/dev-harness-only: force-seats `player_id` at `seat`, bypassing
    /// the normal join flow. Never exposed to a transport layer.
    pub async fn dev_set_seat(&self, code: RoomCode, seat: Seat, player_id: PlayerId) -> Result<(), RoomError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(Command::DevSetSeat { code, seat, player_id, reply: tx })
            .await
            .map_err(|_| RoomError::Unavailable(code))?;
        rx.await.map_err(|_| RoomError::Unavailable(code))?
    }

    /// Looks up the running Game Coordinator for `code`. Callers use the
    /// returned handle to subscribe to `game:<code>`, fetch state, and
    /// submit actions directly — those operations are already serialised
    /// by the Coordinator itself and don't need to pass back through this
    /// actor.
    pub async fn game_handle(&self, code: RoomCode) -> Result<pidro_game::GameCoordinatorHandle<E>, RoomError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(Command::GameHandle { code, reply: tx })
            .await
            .map_err(|_| RoomError::Unavailable(code))?;
        rx.await.map_err(|_| RoomError::Unavailable(code))?
    }
}

const INTERNAL_CHANNEL_SIZE: usize = 256;

/// Upper bound on the random jitter added to a disconnect's
/// replace/removal timer, so many seats dropping at once don't all fire
/// in the same tick.
const DISCONNECT_JITTER_MAX: std::time::Duration = std::time::Duration::from_millis(500);

/// Spawns the Room Manager actor. `E::Action: BidAction` is required so
/// the default bot strategy bundled here can recognise bids and passes;
/// a deployment wanting a different strategy type would need a second
/// constructor, not added here since nothing in this workspace needs one.
pub fn spawn<E>(config: RoomManagerConfig) -> RoomManagerHandle<E>
where
    E: RulesEngine,
    E::Action: pidro_bots::BidAction,
{
    let (tx, rx) = mpsc::channel(config.channel_size);
    let (internal_tx, internal_rx) = mpsc::channel(INTERNAL_CHANNEL_SIZE);
    let lobby_topic = Topic::new("lobby:updates");

    let actor = RoomManagerActor::<E> {
        rooms: HashMap::new(),
        player_rooms: HashMap::new(),
        games: GameSupervisor::new(),
        bots: BotManager::new(std::sync::Arc::new(pidro_bots::RandomStrategy), config.bot_action_delay),
        lobby_topic: lobby_topic.clone(),
        room_topics: HashMap::new(),
        config,
        receiver: rx,
        internal_tx,
        internal_rx,
    };

    tokio::spawn(actor.run());

    RoomManagerHandle { sender: tx, lobby_topic }
}

struct RoomManagerActor<E: RulesEngine> {
    rooms: HashMap<RoomCode, Room>,
    /// Global index enforcing that a player-id is seated in at most one
    /// room at a time. Carries humans only — synthetic bot ids are never
    /// inserted here.
    player_rooms: HashMap<PlayerId, RoomCode>,
    games: GameSupervisor<E>,
    bots: BotManager<E>,
    lobby_topic: Topic<LobbyEvent>,
    room_topics: HashMap<RoomCode, Topic<RoomEvent>>,
    config: RoomManagerConfig,
    receiver: mpsc::Receiver<Command<E>>,
    internal_tx: mpsc::Sender<Internal>,
    internal_rx: mpsc::Receiver<Internal>,
}

impl<E> RoomManagerActor<E>
where
    E: RulesEngine,
    E::Action: pidro_bots::BidAction,
{
    async fn run(mut self) {
        tracing::info!("room manager started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd).await,
                        None => break,
                    }
                }
                msg = self.internal_rx.recv() => {
                    match msg {
                        Some(msg) => self.handle_internal(msg).await,
                        None => {}
                    }
                }
            }
        }

        tracing::info!("room manager stopped");
    }

    async fn handle_command(&mut self, cmd: Command<E>) {
        match cmd {
            Command::CreateRoom { host_id, room_type, metadata, reply } => {
                let result = self.create_room(host_id, room_type, metadata).await;
                let _ = reply.send(result);
            }
            Command::JoinRoom { code, player_id, choice, reply } => {
                let result = self.join_room(code, player_id, choice).await;
                let _ = reply.send(result);
            }
            Command::LeaveRoom { code, player_id, reply } => {
                let result = self.leave_room(code, player_id).await;
                let _ = reply.send(result);
            }
            Command::ListRooms { filter, reply } => {
                let _ = reply.send(self.list_rooms(filter));
            }
            Command::GetRoom { code, reply } => {
                let result = self.rooms.get(&code).map(Room::to_info).ok_or(RoomError::NotFound(code));
                let _ = reply.send(result);
            }
            Command::CloseRoom { code, reply } => {
                let result = self.close_room(code).await;
                let _ = reply.send(result);
            }
            Command::HandleDisconnect { code, player_id, reply } => {
                let result = self.disconnect(code, player_id);
                let _ = reply.send(result);
            }
            Command::HandleReconnect { code, player_id, reply } => {
                let result = self.reconnect(code, player_id).await;
                let _ = reply.send(result);
            }
            Command::DevSetSeat { code, seat, player_id, reply } => {
                let result = self.dev_set_seat(code, seat, player_id);
                let _ = reply.send(result);
            }
            Command::GameHandle { code, reply } => {
                let result = self.games.lookup(code).ok_or(RoomError::NotFound(code));
                let _ = reply.send(result);
            }
        }
    }

    async fn handle_internal(&mut self, msg: Internal) {
        match msg {
            Internal::ReplaceTimerFired { code, seat, player_id } => self.replace_with_bot(code, seat, player_id),
            Internal::RemovalTimerFired { code, player_id } => self.remove_permanently(code, player_id).await,
            Internal::GameOverObserved { code, outcome } => self.on_game_over(code, outcome).await,
            Internal::CoordinatorCrashed { code } => self.on_coordinator_crashed(code).await,
        }
    }

    async fn create_room(
        &mut self,
        host_id: PlayerId,
        room_type: RoomType,
        metadata: HashMap<String, String>,
    ) -> Result<RoomInfo, RoomError> {
        if let Some(&existing) = self.player_rooms.get(&host_id) {
            return Err(RoomError::AlreadyInOtherRoom(host_id, existing));
        }

        let code = {
            let mut rng = rand::rng();
            loop {
                let candidate = RoomCode::generate(&mut rng);
                if !self.rooms.contains_key(&candidate) {
                    break candidate;
                }
            }
        };

        let mut room = Room::new(code, host_id.clone(), room_type);
        room.metadata = metadata;
        let (positions, seat) = room
            .positions
            .assign(host_id.clone(), SeatChoice::Auto)
            .expect("a freshly-created room always accepts its first seat");
        room.positions = positions;
        room.original_occupants.insert(seat, host_id.clone());
        self.player_rooms.insert(host_id.clone(), code);

        self.room_topics.insert(code, Topic::new(format!("room:{code}")));

        if room_type == RoomType::Practice {
            self.fill_with_bots(&mut room);
        }

        self.rooms.insert(code, room);
        tracing::info!(%code, %host_id, ?room_type, "room created");

        if self.rooms.get(&code).unwrap().is_full() {
            if let Err(err) = self.start_game_for_room(code).await {
                tracing::error!(%code, %err, "practice room failed to start its game");
            }
        }

        let info = self.rooms.get(&code).unwrap().to_info();
        let _ = self.lobby_topic.publish(LobbyEvent::RoomCreated(info.clone()));
        Ok(info)
    }

    fn fill_with_bots(&mut self, room: &mut Room) {
        for seat in room.positions.available() {
            let bot_id = PlayerId::bot(&room.code, seat);
            if let Ok((positions, _)) = room.positions.assign(bot_id, SeatChoice::Seat(seat)) {
                room.positions = positions;
                room.bot_seats.insert(seat);
            }
        }
    }

    async fn join_room(
        &mut self,
        code: RoomCode,
        player_id: PlayerId,
        choice: SeatChoice,
    ) -> Result<(RoomInfo, Seat), RoomError> {
        if let Some(&existing) = self.player_rooms.get(&player_id) {
            if existing != code {
                return Err(RoomError::AlreadyInOtherRoom(player_id, existing));
            }
        }

        let requested_seat = match choice {
            SeatChoice::Seat(seat) => Some(seat),
            _ => None,
        };

        let seat = {
            let room = self.rooms.get_mut(&code).ok_or(RoomError::NotFound(code))?;
            if !room.status.is_joinable() {
                return Err(RoomError::InvalidState(code));
            }

            let (positions, seat) = room.positions.assign(player_id.clone(), choice).map_err(|err| match err {
                AssignError::RoomFull => RoomError::RoomFull(code),
                AssignError::TeamFull => RoomError::TeamFull(code),
                AssignError::AlreadySeated => RoomError::AlreadyInRoom(player_id.clone(), code),
                AssignError::SeatTaken => RoomError::SeatTaken(
                    code,
                    requested_seat.expect("Positions::assign only returns SeatTaken for an explicit seat choice"),
                ),
                AssignError::InvalidChoice => RoomError::InvalidChoice(code),
            })?;
            room.positions = positions;
            room.original_occupants.insert(seat, player_id.clone());
            room.touch();
            seat
        };
        self.player_rooms.insert(player_id.clone(), code);

        self.publish_room_event(code, RoomEvent::PlayerJoined { seat, player_id: player_id.clone() });

        if self.rooms.get(&code).unwrap().is_full() {
            if let Err(err) = self.start_game_for_room(code).await {
                tracing::warn!(%code, %err, "game failed to start, rolling back seat assignment");
                let room = self.rooms.get_mut(&code).unwrap();
                room.positions = room.positions.remove(&player_id);
                room.original_occupants.remove(&seat);
                self.player_rooms.remove(&player_id);
                return Err(RoomError::GameStartFailed(code));
            }
        }

        let info = self.rooms.get(&code).unwrap().to_info();
        let _ = self.lobby_topic.publish(LobbyEvent::RoomUpdated(info.clone()));
        Ok((info, seat))
    }

    /// Starts the Game Coordinator for a room that just became full,
    /// synchronously, before the join that completed it gets a reply —
    /// the guarantee that a client never observes `status: playing`
    /// without a running game behind it.
    async fn start_game_for_room(&mut self, code: RoomCode) -> Result<(), pidro_game::GameError> {
        let players: [PlayerId; 4] = {
            let room = self.rooms.get(&code).expect("caller just confirmed the room exists");
            room.positions
                .player_ids()
                .try_into()
                .expect("room just became full, so all four seats are occupied")
        };

        let handle = self.games.start_game(code, players)?;

        if let Some(room) = self.rooms.get_mut(&code) {
            room.status = RoomStatus::Playing;
        }
        self.publish_room_event(code, RoomEvent::StatusChanged(RoomStatus::Playing));

        let mut sub = handle.subscribe();
        let tx = self.internal_tx.clone();
        tokio::spawn(async move {
            loop {
                match sub.recv().await {
                    Ok(GameEvent::GameOver(outcome)) => {
                        let _ = tx.send(Internal::GameOverObserved { code, outcome }).await;
                        break;
                    }
                    Ok(GameEvent::StateUpdate { .. }) => {}
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => {
                        let _ = tx.send(Internal::CoordinatorCrashed { code }).await;
                        break;
                    }
                }
            }
        });

        Ok(())
    }

    async fn leave_room(&mut self, code: RoomCode, player_id: PlayerId) -> Result<(), RoomError> {
        let (seat, is_host, non_playing) = {
            let room = self.rooms.get_mut(&code).ok_or(RoomError::NotFound(code))?;
            let seat = room.positions.get_seat(&player_id).ok_or_else(|| RoomError::NotInRoom(player_id.clone(), code))?;
            room.positions = room.positions.remove(&player_id);
            room.original_occupants.remove(&seat);
            room.touch();
            (seat, room.host_id == player_id, !room.status.is_playing())
        };
        self.player_rooms.remove(&player_id);

        self.publish_room_event(code, RoomEvent::PlayerLeft { seat, player_id: player_id.clone() });

        if is_host && non_playing {
            self.close_room(code).await?;
        } else {
            let info = self.rooms.get(&code).unwrap().to_info();
            let _ = self.lobby_topic.publish(LobbyEvent::RoomUpdated(info));
        }

        Ok(())
    }

    fn list_rooms(&self, filter: RoomFilter) -> Vec<RoomInfo> {
        self.rooms
            .values()
            .filter(|room| match filter {
                RoomFilter::All => true,
                RoomFilter::Waiting => room.status == RoomStatus::Waiting,
                RoomFilter::Ready => room.status == RoomStatus::Ready,
                RoomFilter::Playing => room.status == RoomStatus::Playing,
                RoomFilter::Finished => room.status == RoomStatus::Finished,
                RoomFilter::Available => !room.status.is_terminal() && room.room_type == RoomType::Public,
            })
            .map(Room::to_info)
            .collect()
    }

    async fn close_room(&mut self, code: RoomCode) -> Result<(), RoomError> {
        let room = self.rooms.remove(&code).ok_or(RoomError::NotFound(code))?;

        if room.status.is_playing() {
            let _ = self.games.stop_game(code).await;
        }
        self.bots.stop_all_bots(code).await;

        for (_, info) in room.disconnected {
            if let Some(timer) = info.timer {
                timer.cancel();
            }
        }

        for player_id in room.original_occupants.values() {
            self.player_rooms.remove(player_id);
        }

        self.publish_room_event(code, RoomEvent::Closed);
        self.room_topics.remove(&code);
        tracing::info!(%code, "room closed");
        let _ = self.lobby_topic.publish(LobbyEvent::RoomClosed(code));
        Ok(())
    }

    /// Handles a Game Coordinator that disappeared without ever publishing
    /// `GameOver` — a crash or panic rather than a clean finish. A room
    /// already closed or already finished normally is left alone; this
    /// only fires for a room still waiting on its game to end.
    async fn on_coordinator_crashed(&mut self, code: RoomCode) {
        let still_playing = self.rooms.get(&code).map(|room| room.status.is_playing()).unwrap_or(false);
        if !still_playing {
            return;
        }

        tracing::error!(%code, "game coordinator closed without a game-over event");
        let _ = self.close_room(code).await;
    }

    fn disconnect(&mut self, code: RoomCode, player_id: PlayerId) -> Result<(), RoomError> {
        let room = self.rooms.get_mut(&code).ok_or(RoomError::NotFound(code))?;
        let seat = room.positions.get_seat(&player_id).ok_or_else(|| RoomError::NotInRoom(player_id.clone(), code))?;

        if room.disconnected.contains_key(&player_id) {
            return Ok(());
        }

        let (delay, message) = if room.status.is_playing() {
            (
                self.config.bot_replace_grace,
                Internal::ReplaceTimerFired { code, seat, player_id: player_id.clone() },
            )
        } else {
            (self.config.removal_grace, Internal::RemovalTimerFired { code, player_id: player_id.clone() })
        };

        // Jittered so a whole room (or many rooms) dropping off the network
        // at once doesn't land every replacement/removal timer on this
        // actor's inbox in the same tick.
        let mut rng = rand::rng();
        let timer =
            pidro_tick::send_after_jittered(self.internal_tx.clone(), message, delay, DISCONNECT_JITTER_MAX, &mut rng);
        room.disconnected.insert(player_id.clone(), DisconnectInfo { since: Instant::now(), timer: Some(timer) });
        room.touch();

        self.publish_room_event(code, RoomEvent::PlayerDisconnected { seat, player_id });
        Ok(())
    }

    fn replace_with_bot(&mut self, code: RoomCode, seat: Seat, player_id: PlayerId) {
        let Some(room) = self.rooms.get_mut(&code) else { return };
        if !room.disconnected.contains_key(&player_id) || room.bot_seats.contains(&seat) {
            // reconnected already, or somehow already replaced.
            return;
        }

        let bot_id = PlayerId::bot(&code, seat);
        room.positions = room.positions.remove(&player_id);
        room.positions = room
            .positions
            .assign(bot_id, SeatChoice::Seat(seat))
            .expect("the seat was just vacated by the disconnected occupant")
            .0;
        room.bot_seats.insert(seat);

        if let Some(game) = self.games.lookup(code) {
            if let Err(err) = self.bots.start_bot(code, seat, game) {
                tracing::warn!(%code, %seat, %err, "failed to seat a replacement bot");
            }
        }

        let remaining = self.config.removal_grace.saturating_sub(self.config.bot_replace_grace);
        let timer = pidro_tick::send_after(
            self.internal_tx.clone(),
            Internal::RemovalTimerFired { code, player_id: player_id.clone() },
            remaining,
        );
        if let Some(info) = room.disconnected.get_mut(&player_id) {
            info.timer = Some(timer);
        }

        tracing::info!(%code, %seat, %player_id, "disconnected player replaced by a bot");
        self.publish_room_event(code, RoomEvent::BotSeated { seat });
    }

    async fn remove_permanently(&mut self, code: RoomCode, player_id: PlayerId) {
        let Some(seat) = self.rooms.get(&code).and_then(|room| room.positions.get_seat(&player_id)) else { return };
        let Some(room) = self.rooms.get_mut(&code) else { return };
        if room.disconnected.remove(&player_id).is_none() {
            return;
        }

        room.original_occupants.remove(&seat);
        if !room.bot_seats.contains(&seat) {
            room.positions = room.positions.remove(&player_id);
        }
        room.touch();
        self.player_rooms.remove(&player_id);

        tracing::info!(%code, %seat, %player_id, "disconnected player permanently removed");
        self.publish_room_event(code, RoomEvent::PlayerLeft { seat, player_id });

        let info = self.rooms.get(&code).unwrap().to_info();
        let _ = self.lobby_topic.publish(LobbyEvent::RoomUpdated(info));
    }

    async fn reconnect(&mut self, code: RoomCode, player_id: PlayerId) -> Result<RoomInfo, RoomError> {
        let seat = {
            let room = self.rooms.get(&code).ok_or(RoomError::NotFound(code))?;
            room.original_occupants
                .iter()
                .find(|(_, occupant)| **occupant == player_id)
                .map(|(seat, _)| *seat)
                .ok_or_else(|| RoomError::NotInRoom(player_id.clone(), code))?
        };

        if let Some(info) = self.rooms.get_mut(&code).and_then(|room| room.disconnected.remove(&player_id)) {
            if let Some(timer) = info.timer {
                timer.cancel();
            }
        }

        let was_bot_occupied = self.rooms.get(&code).map(|room| room.bot_seats.contains(&seat)).unwrap_or(false);
        if was_bot_occupied {
            let _ = self.bots.stop_bot(code, seat).await;

            if let Some(room) = self.rooms.get_mut(&code) {
                room.bot_seats.remove(&seat);
                let bot_id = PlayerId::bot(&code, seat);
                room.positions = room.positions.remove(&bot_id);
                room.positions = room
                    .positions
                    .assign(player_id.clone(), SeatChoice::Seat(seat))
                    .expect("the seat was just vacated by the evicted bot")
                    .0;
            }
            self.publish_room_event(code, RoomEvent::BotEvicted { seat });
        }

        if let Some(room) = self.rooms.get_mut(&code) {
            room.touch();
        }
        self.player_rooms.insert(player_id.clone(), code);
        self.publish_room_event(code, RoomEvent::PlayerReconnected { seat, player_id });

        let room = self.rooms.get(&code).ok_or(RoomError::NotFound(code))?;
        Ok(room.to_info())
    }

    async fn on_game_over(&mut self, code: RoomCode, outcome: Outcome) {
        if let Some(room) = self.rooms.get_mut(&code) {
            room.status = RoomStatus::Finished;
            tracing::info!(%code, winner = ?outcome.winner, "room finished");
        }
        self.publish_room_event(code, RoomEvent::StatusChanged(RoomStatus::Finished));

        self.bots.stop_all_bots(code).await;

        if let Some(room) = self.rooms.get_mut(&code) {
            for (_, info) in room.disconnected.drain() {
                if let Some(timer) = info.timer {
                    timer.cancel();
                }
            }
        }

        if let Some(info) = self.rooms.get(&code).map(Room::to_info) {
            let _ = self.lobby_topic.publish(LobbyEvent::RoomUpdated(info));
        }
    }

    fn dev_set_seat(&mut self, code: RoomCode, seat: Seat, player_id: PlayerId) -> Result<(), RoomError> {
        let room = self.rooms.get_mut(&code).ok_or(RoomError::NotFound(code))?;

        if let Some(existing) = room.positions.get(seat).cloned() {
            room.positions = room.positions.remove(&existing);
        }
        room.positions = room.positions.remove(&player_id);
        let (positions, _) =
            room.positions.assign(player_id.clone(), SeatChoice::Seat(seat)).map_err(|_| RoomError::InvalidState(code))?;
        room.positions = positions;
        room.original_occupants.insert(seat, player_id);
        room.touch();
        Ok(())
    }

    fn publish_room_event(&self, code: RoomCode, event: RoomEvent) {
        if let Some(topic) = self.room_topics.get(&code) {
            let _ = topic.publish(event);
        }
    }
}
