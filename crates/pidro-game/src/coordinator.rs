//! The per-room Game Coordinator actor.
//!
//! One of these runs per active room, in its own Tokio task, owning
//! exactly one `E::State`. Every operation goes through its command
//! channel, so all action application is serialised — the single-writer
//! discipline the spec requires.

use pidro_engine::{Outcome, Phase, RulesEngine, Viewer};
use pidro_protocol::{PlayerId, RoomCode, Seat};
use pidro_pubsub::Topic;
use tokio::sync::{mpsc, oneshot};

use crate::event::GameEvent;
use crate::GameError;

enum Command<E: RulesEngine> {
    GetState {
        viewer: Viewer,
        reply: oneshot::Sender<E::State>,
    },
    LegalActions {
        seat: Seat,
        reply: oneshot::Sender<Vec<E::Action>>,
    },
    ApplyAction {
        seat: Seat,
        action: E::Action,
        reply: oneshot::Sender<Result<E::State, E::Rejection>>,
    },
    Shutdown,
}

/// Cheap-to-clone handle to a running Game Coordinator.
pub struct GameCoordinatorHandle<E: RulesEngine> {
    code: RoomCode,
    sender: mpsc::Sender<Command<E>>,
    topic: Topic<GameEvent<E>>,
}

impl<E: RulesEngine> Clone for GameCoordinatorHandle<E> {
    fn clone(&self) -> Self {
        Self { code: self.code, sender: self.sender.clone(), topic: self.topic.clone() }
    }
}

impl<E: RulesEngine> std::fmt::Debug for GameCoordinatorHandle<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameCoordinatorHandle").field("code", &self.code).finish_non_exhaustive()
    }
}

impl<E: RulesEngine> GameCoordinatorHandle<E> {
    pub fn room_code(&self) -> RoomCode {
        self.code
    }

    /// Subscribes to this room's `game:<code>` topic. Public — any actor
    /// may subscribe, per the spec's C3 contract.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<GameEvent<E>> {
        self.topic.subscribe()
    }

    pub async fn get_state(&self, viewer: Viewer) -> Result<E::State, GameError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(Command::GetState { viewer, reply: tx })
            .await
            .map_err(|_| GameError::Unavailable(self.code))?;
        rx.await.map_err(|_| GameError::Unavailable(self.code))
    }

    pub async fn legal_actions(&self, seat: Seat) -> Result<Vec<E::Action>, GameError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(Command::LegalActions { seat, reply: tx })
            .await
            .map_err(|_| GameError::Unavailable(self.code))?;
        rx.await.map_err(|_| GameError::Unavailable(self.code))
    }

    /// Applies `action` as `seat`. `Ok(rejection-carrying Result)` on
    /// success (engine may itself still reject a specific action);
    /// `Err(GameError)` only for coordinator-level failures (the actor is
    /// gone).
    pub async fn apply_action(
        &self,
        seat: Seat,
        action: E::Action,
    ) -> Result<Result<E::State, E::Rejection>, GameError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(Command::ApplyAction { seat, action, reply: tx })
            .await
            .map_err(|_| GameError::Unavailable(self.code))?;
        rx.await.map_err(|_| GameError::Unavailable(self.code))
    }

    pub async fn shutdown(&self) {
        let _ = self.sender.send(Command::Shutdown).await;
    }
}

struct Coordinator<E: RulesEngine> {
    code: RoomCode,
    state: E::State,
    seq: u64,
    topic: Topic<GameEvent<E>>,
    receiver: mpsc::Receiver<Command<E>>,
}

const CHANNEL_SIZE: usize = 64;

/// Constructs and spawns a Game Coordinator for `code`, seeding it with
/// `E::initial_state(players)`. Publishes the opening state as sequence 0
/// before returning the handle, matching the guarantee that a
/// `state_update` with sequence 0 exists as soon as the coordinator does.
pub fn spawn<E: RulesEngine>(code: RoomCode, players: [PlayerId; 4]) -> GameCoordinatorHandle<E> {
    let (tx, rx) = mpsc::channel(CHANNEL_SIZE);
    let topic = Topic::with_capacity(format!("game:{code}"), CHANNEL_SIZE);
    let state = E::initial_state(players);

    let actor = Coordinator::<E> { code, state, seq: 0, topic: topic.clone(), receiver: rx };

    let masked = E::mask_state_for(&actor.state, Viewer::Spectator);
    let _ = topic.publish(GameEvent::StateUpdate { seq: 0, state: masked });

    tokio::spawn(actor.run());

    GameCoordinatorHandle { code, sender: tx, topic }
}

impl<E: RulesEngine> Coordinator<E> {
    async fn run(mut self) {
        tracing::info!(code = %self.code, "game coordinator started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                Command::GetState { viewer, reply } => {
                    let _ = reply.send(E::mask_state_for(&self.state, viewer));
                }
                Command::LegalActions { seat, reply } => {
                    let _ = reply.send(E::legal_actions(&self.state, seat));
                }
                Command::ApplyAction { seat, action, reply } => {
                    let result = self.handle_apply(seat, action);
                    let _ = reply.send(result);
                }
                Command::Shutdown => {
                    tracing::info!(code = %self.code, "game coordinator shutting down");
                    break;
                }
            }
        }

        tracing::info!(code = %self.code, "game coordinator stopped");
    }

    fn handle_apply(
        &mut self,
        seat: Seat,
        action: E::Action,
    ) -> Result<E::State, E::Rejection> {
        let new_state = E::apply_action(&self.state, seat, action)?;
        self.state = new_state;
        self.seq += 1;

        let broadcast_view = E::mask_state_for(&self.state, Viewer::Spectator);
        let _ = self.topic.publish(GameEvent::StateUpdate { seq: self.seq, state: broadcast_view });

        if E::phase(&self.state) == Phase::Terminal {
            let outcome: Outcome = E::winner(&self.state);
            tracing::info!(code = %self.code, winner = ?outcome.winner, "game finished");
            let _ = self.topic.publish(GameEvent::GameOver(outcome));
        }

        // The acting player sees their own seat's projection in the direct
        // reply, not the spectator view just broadcast — same masking
        // `get_state`/`legal_actions` give any other caller for this seat.
        Ok(E::mask_state_for(&self.state, Viewer::Seat(seat)))
    }
}
