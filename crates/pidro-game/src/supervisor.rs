//! The Game Supervisor: a dynamic registry of Game Coordinators keyed by
//! room code.
//!
//! This is plain, synchronously-owned state — like the teacher framework's
//! room registry, it is meant to live inside exactly one actor (the Room
//! Manager) rather than be shared behind a lock. `start_game`/`stop_game`
//! are `&mut self`; `lookup`/`list_games` are `&self`.

use std::collections::HashMap;

use pidro_engine::RulesEngine;
use pidro_protocol::{PlayerId, RoomCode};

use crate::coordinator::{spawn, GameCoordinatorHandle};
use crate::GameError;

pub struct GameSupervisor<E: RulesEngine> {
    games: HashMap<RoomCode, GameCoordinatorHandle<E>>,
}

impl<E: RulesEngine> GameSupervisor<E> {
    pub fn new() -> Self {
        Self { games: HashMap::new() }
    }

    /// Starts a Game Coordinator for `code`. Fails `AlreadyStarted` if one
    /// is already registered for that code — the unique-name registry
    /// guarantee from the spec.
    pub fn start_game(
        &mut self,
        code: RoomCode,
        initial_players: [PlayerId; 4],
    ) -> Result<GameCoordinatorHandle<E>, GameError> {
        if self.games.contains_key(&code) {
            return Err(GameError::AlreadyStarted(code));
        }
        let handle = spawn::<E>(code, initial_players);
        self.games.insert(code, handle.clone());
        tracing::info!(%code, "game started");
        Ok(handle)
    }

    /// Shuts down and de-registers the coordinator for `code`.
    pub async fn stop_game(&mut self, code: RoomCode) -> Result<(), GameError> {
        let handle = self.games.remove(&code).ok_or(GameError::NotFound(code))?;
        handle.shutdown().await;
        tracing::info!(%code, "game stopped");
        Ok(())
    }

    pub fn lookup(&self, code: RoomCode) -> Option<GameCoordinatorHandle<E>> {
        self.games.get(&code).cloned()
    }

    pub fn list_games(&self) -> Vec<RoomCode> {
        self.games.keys().copied().collect()
    }
}

impl<E: RulesEngine> Default for GameSupervisor<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pidro_engine::{Outcome, Phase, Viewer};
    use pidro_protocol::Seat;

    #[derive(Clone)]
    struct CounterEngine;

    impl RulesEngine for CounterEngine {
        type State = u32;
        type Action = ();
        type Rejection = String;

        fn initial_state(_players: [PlayerId; 4]) -> Self::State {
            0
        }
        fn legal_actions(_state: &Self::State, _seat: Seat) -> Vec<Self::Action> {
            vec![()]
        }
        fn apply_action(state: &Self::State, _seat: Seat, _action: Self::Action) -> Result<Self::State, Self::Rejection> {
            Ok(state + 1)
        }
        fn phase(state: &Self::State) -> Phase {
            if *state >= 3 { Phase::Terminal } else { Phase::InProgress }
        }
        fn current_turn(_state: &Self::State) -> Option<Seat> {
            Some(Seat::N)
        }
        fn winner(_state: &Self::State) -> Outcome {
            Outcome::default()
        }
        fn mask_state_for(state: &Self::State, _viewer: Viewer) -> Self::State {
            *state
        }
    }

    fn players() -> [PlayerId; 4] {
        [PlayerId::from("a"), PlayerId::from("b"), PlayerId::from("c"), PlayerId::from("d")]
    }

    #[tokio::test]
    async fn start_game_twice_fails_already_started() {
        let mut sup = GameSupervisor::<CounterEngine>::new();
        let code = RoomCode::parse("ABCD").unwrap();
        sup.start_game(code, players()).unwrap();
        let err = sup.start_game(code, players()).unwrap_err();
        assert!(matches!(err, GameError::AlreadyStarted(_)));
    }

    #[tokio::test]
    async fn lookup_finds_running_game() {
        let mut sup = GameSupervisor::<CounterEngine>::new();
        let code = RoomCode::parse("ABCD").unwrap();
        sup.start_game(code, players()).unwrap();
        assert!(sup.lookup(code).is_some());
        assert!(sup.lookup(RoomCode::parse("WXYZ").unwrap()).is_none());
    }

    #[tokio::test]
    async fn stop_game_deregisters_it() {
        let mut sup = GameSupervisor::<CounterEngine>::new();
        let code = RoomCode::parse("ABCD").unwrap();
        sup.start_game(code, players()).unwrap();
        sup.stop_game(code).await.unwrap();
        assert!(sup.lookup(code).is_none());
    }

    #[tokio::test]
    async fn apply_action_publishes_state_update_and_eventually_game_over() {
        let mut sup = GameSupervisor::<CounterEngine>::new();
        let code = RoomCode::parse("ABCD").unwrap();
        let handle = sup.start_game(code, players()).unwrap();
        let mut sub = handle.subscribe();

        // seq 0 is the initial publish.
        let first = sub.recv().await.unwrap();
        assert!(matches!(first, crate::event::GameEvent::StateUpdate { seq: 0, .. }));

        for _ in 0..3 {
            handle.apply_action(Seat::N, ()).await.unwrap().unwrap();
        }

        let mut saw_game_over = false;
        for _ in 0..3 {
            if matches!(sub.recv().await.unwrap(), crate::event::GameEvent::GameOver(_)) {
                saw_game_over = true;
            }
        }
        assert!(saw_game_over);
    }
}
