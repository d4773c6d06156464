//! Events published on a room's `game:<code>` topic.

use pidro_engine::{Outcome, RulesEngine};

/// What flows over `game:<code>`. Carries the engine's masked projection,
/// never the raw unmasked state — every subscriber, including the
/// Coordinator's own initial-publish-on-start, goes through
/// `mask_state_for` first.
pub enum GameEvent<E: RulesEngine> {
    /// A new state is available. `seq` is strictly increasing per
    /// Coordinator — the ordering guarantee subscribers rely on.
    StateUpdate { seq: u64, state: E::State },
    /// The engine reached a terminal phase.
    GameOver(Outcome),
}

impl<E: RulesEngine> Clone for GameEvent<E> {
    fn clone(&self) -> Self {
        match self {
            Self::StateUpdate { seq, state } => Self::StateUpdate { seq: *seq, state: state.clone() },
            Self::GameOver(outcome) => Self::GameOver(*outcome),
        }
    }
}
