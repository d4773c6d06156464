//! The per-bot actor: one Tokio task per occupied bot seat.

use std::sync::Arc;

use pidro_engine::{RulesEngine, Viewer};
use pidro_game::{GameCoordinatorHandle, GameEvent};
use pidro_protocol::{RoomCode, Seat};
use pidro_tick::TimerHandle;
use tokio::sync::{broadcast, mpsc};

use crate::strategy::Strategy;

enum Control {
    Pause,
    Resume,
    Shutdown,
}

/// Handle to a running Bot Player. Cloning is cheap.
#[derive(Clone)]
pub struct BotPlayerHandle {
    control: mpsc::Sender<Control>,
}

impl BotPlayerHandle {
    pub async fn pause(&self) {
        let _ = self.control.send(Control::Pause).await;
    }

    pub async fn resume(&self) {
        let _ = self.control.send(Control::Resume).await;
    }

    /// Stops the bot and waits for its task to actually exit. Callers
    /// that need the stronger "no pending action will ever be applied
    /// after this returns" guarantee (the reclaim path) must additionally
    /// `.await` the `JoinHandle` this was spawned with — see
    /// `BotManager::stop_bot`.
    pub async fn shutdown(&self) {
        let _ = self.control.send(Control::Shutdown).await;
    }
}

/// Configuration a Bot Player is started with.
pub struct BotConfig<E: RulesEngine> {
    pub room_code: RoomCode,
    pub seat: Seat,
    pub strategy: Arc<dyn Strategy<E>>,
    pub delay: std::time::Duration,
    pub game: GameCoordinatorHandle<E>,
}

const CONTROL_CHANNEL_SIZE: usize = 8;

/// Spawns a Bot Player task and returns a handle plus the task's
/// `JoinHandle` so a caller can await actual termination (needed for the
/// synchronous stop in the reclaim path).
pub fn spawn<E: RulesEngine>(config: BotConfig<E>) -> (BotPlayerHandle, tokio::task::JoinHandle<()>) {
    let (control_tx, control_rx) = mpsc::channel(CONTROL_CHANNEL_SIZE);
    let (timer_tx, timer_rx) = mpsc::channel(CONTROL_CHANNEL_SIZE);

    let subscription = config.game.subscribe();

    let actor = BotPlayer::<E> {
        room_code: config.room_code,
        seat: config.seat,
        strategy: config.strategy,
        delay: config.delay,
        paused: false,
        game: config.game,
        pending: None,
        control_rx,
        timer_tx,
        timer_rx,
        subscription,
    };

    let join = tokio::spawn(actor.run());

    (BotPlayerHandle { control: control_tx }, join)
}

struct BotPlayer<E: RulesEngine> {
    room_code: RoomCode,
    seat: Seat,
    strategy: Arc<dyn Strategy<E>>,
    delay: std::time::Duration,
    paused: bool,
    game: GameCoordinatorHandle<E>,
    /// The sequence number that triggered the currently-pending timer,
    /// and its cancellation handle. A timer fire whose sequence doesn't
    /// match this is stale and discarded — this is what prevents the
    /// "bot acts on an action made obsolete by a newer state" race.
    pending: Option<(u64, TimerHandle)>,
    control_rx: mpsc::Receiver<Control>,
    timer_tx: mpsc::Sender<u64>,
    timer_rx: mpsc::Receiver<u64>,
    subscription: broadcast::Receiver<GameEvent<E>>,
}

impl<E: RulesEngine> BotPlayer<E> {
    async fn run(mut self) {
        tracing::info!(code = %self.room_code, seat = %self.seat, "bot player started");

        // "fetches initial state, processes it as if just-received" — the
        // coordinator's own first publish is always sequence 0, so
        // bootstrapping against that same number means a real sequence-0
        // broadcast arriving moments later is a harmless re-schedule, not
        // a second, conflicting timer.
        if let Ok(state) = self.game.get_state(Viewer::Seat(self.seat)).await {
            self.on_state_update(0, state).await;
        }

        loop {
            tokio::select! {
                ctrl = self.control_rx.recv() => {
                    match ctrl {
                        Some(Control::Pause) => {
                            self.paused = true;
                            self.cancel_pending();
                        }
                        Some(Control::Resume) => {
                            self.paused = false;
                        }
                        Some(Control::Shutdown) | None => break,
                    }
                }
                event = self.subscription.recv() => {
                    match event {
                        Ok(GameEvent::StateUpdate { seq, state }) => {
                            self.on_state_update(seq, state).await;
                        }
                        Ok(GameEvent::GameOver(_)) => {
                            self.cancel_pending();
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(code = %self.room_code, seat = %self.seat, skipped, "bot lagged behind game topic, reconciling via get_state");
                            if let Ok(state) = self.game.get_state(Viewer::Seat(self.seat)).await {
                                self.on_state_update(u64::MAX, state).await;
                            }
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
                Some(fired_seq) = self.timer_rx.recv() => {
                    self.on_timer_fired(fired_seq).await;
                }
            }
        }

        self.cancel_pending();
        tracing::info!(code = %self.room_code, seat = %self.seat, "bot player stopped");
    }

    fn cancel_pending(&mut self) {
        if let Some((_, handle)) = self.pending.take() {
            handle.cancel();
        }
    }

    async fn on_state_update(&mut self, seq: u64, state: E::State) {
        if self.paused || E::phase(&state).is_terminal() {
            self.cancel_pending();
            return;
        }
        if E::current_turn(&state) != Some(self.seat) {
            return;
        }
        let legal = match self.game.legal_actions(self.seat).await {
            Ok(actions) => actions,
            Err(_) => return,
        };
        if legal.is_empty() {
            return;
        }

        self.cancel_pending();
        let handle = pidro_tick::send_after(self.timer_tx.clone(), seq, self.delay);
        self.pending = Some((seq, handle));
    }

    async fn on_timer_fired(&mut self, fired_seq: u64) {
        match &self.pending {
            Some((seq, _)) if *seq == fired_seq => {}
            _ => return,
        }
        self.pending = None;

        if self.paused {
            return;
        }

        let state = match self.game.get_state(Viewer::Seat(self.seat)).await {
            Ok(s) => s,
            Err(_) => return,
        };
        if E::phase(&state).is_terminal() || E::current_turn(&state) != Some(self.seat) {
            return;
        }
        let legal = match self.game.legal_actions(self.seat).await {
            Ok(actions) => actions,
            Err(_) => return,
        };
        if legal.is_empty() {
            return;
        }

        let (action, reasoning) = self.strategy.pick(&legal, &state);
        match self.game.apply_action(self.seat, action).await {
            Ok(Ok(_)) => {
                tracing::debug!(code = %self.room_code, seat = %self.seat, reasoning, "bot applied action");
            }
            Ok(Err(rejection)) => {
                tracing::warn!(code = %self.room_code, seat = %self.seat, %rejection, "bot action rejected, waiting for next state update");
            }
            Err(_) => {}
        }
    }
}
