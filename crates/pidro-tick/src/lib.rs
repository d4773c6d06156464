//! Cancellable delayed-message timers.
//!
//! Every scheduled event in the room/game layer — a disconnect-grace
//! timer, a bot's human-paced action delay — boils down to the same
//! idiom: "deliver this message to that actor's inbox after `t`, unless
//! cancelled first." This crate is that idiom, isolated.
//!
//! A `TimerHandle` wraps the `tokio::task::JoinHandle` of a task that
//! sleeps then sends; dropping or calling `.cancel()` on the handle aborts
//! the sleep before it fires. Cancellation races are still possible (the
//! timer may already be mid-send when `cancel` is called) — callers that
//! need race-safety beyond "don't deliver after cancel" must re-check
//! their own precondition when the message arrives, exactly as the Room
//! Manager's timer handlers and the Bot Player's sequence-number check do.

use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A live or already-fired scheduled send. Dropping this without calling
/// `cancel` lets the timer run to completion — `TimerHandle` does not
/// cancel on drop, unlike a typical RAII guard, because the common case
/// (a bot-delay timer nobody ever cancels) would otherwise need every
/// caller to hold the handle alive for the whole delay.
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Cancels the pending send. A no-op if the timer already fired.
    pub fn cancel(self) {
        self.task.abort();
    }

    /// Whether the timer has already fired (or been cancelled).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Schedules `msg` to be sent on `tx` after `delay`. Returns a handle that
/// can cancel the pending send.
///
/// If the channel is closed by the time the timer fires, the send is
/// silently dropped — the receiving actor is gone, there's nothing to
/// notify.
pub fn send_after<M>(tx: mpsc::Sender<M>, msg: M, delay: Duration) -> TimerHandle
where
    M: Send + 'static,
{
    let task = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(msg).await;
    });
    TimerHandle { task }
}

/// Like `send_after`, but the delay is perturbed by up to `jitter_max`
/// (added, never subtracted). Use this when many timers are likely to be
/// scheduled for the same instant — e.g. every seat in a room disconnects
/// when a whole process drops off the network — so their fires don't all
/// land on the Room Manager's inbox in the same tick.
pub fn send_after_jittered<M>(
    tx: mpsc::Sender<M>,
    msg: M,
    delay: Duration,
    jitter_max: Duration,
    rng: &mut impl Rng,
) -> TimerHandle
where
    M: Send + 'static,
{
    let jitter = if jitter_max.is_zero() {
        Duration::ZERO
    } else {
        Duration::from_micros(rng.random_range(0..=jitter_max.as_micros() as u64))
    };
    send_after(tx, msg, delay + jitter)
}
