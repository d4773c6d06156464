//! Supervision glue around a single Bot Player task.
//!
//! A Bot Player never exits on its own except via `Control::Shutdown`, so
//! any other exit is abnormal — a panic inside `Strategy::pick`, most
//! likely. `SupervisedBot` wraps the raw `JoinHandle` with a watchdog that
//! just logs that case; the `BotManager` is what actually restarts a seat
//! (by starting a fresh bot), since only it knows the room/seat it was
//! filling.

use pidro_protocol::{RoomCode, Seat};

use crate::player::{spawn, BotConfig, BotPlayerHandle};
use pidro_engine::RulesEngine;

pub struct SupervisedBot {
    pub handle: BotPlayerHandle,
    join: tokio::task::JoinHandle<()>,
}

impl SupervisedBot {
    pub fn start<E: RulesEngine>(room_code: RoomCode, seat: Seat, config: BotConfig<E>) -> Self {
        let (handle, join) = spawn(config);
        let watched = tokio::spawn(watch(room_code, seat, join));
        Self { handle, join: watched }
    }

    /// Signals shutdown and waits for the task to actually terminate —
    /// the strong guarantee the reclaim path needs before handing the
    /// seat back to a human.
    pub async fn stop(self) {
        self.handle.shutdown().await;
        let _ = self.join.await;
    }
}

async fn watch(room_code: RoomCode, seat: Seat, join: tokio::task::JoinHandle<()>) {
    if let Err(err) = join.await {
        if err.is_panic() {
            tracing::error!(code = %room_code, %seat, "bot player panicked");
        }
    }
}
