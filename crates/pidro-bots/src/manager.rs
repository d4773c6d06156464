//! The Bot Manager: the single index of which seats are currently filled
//! by a bot, and the only thing allowed to mutate that index.
//!
//! Like `GameSupervisor`, this is plain state meant to live inside exactly
//! one owning actor (the Room Manager) rather than behind a lock.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use pidro_engine::RulesEngine;
use pidro_game::GameCoordinatorHandle;
use pidro_protocol::{RoomCode, Seat};

use crate::player::BotConfig;
use crate::strategy::Strategy;
use crate::supervisor::SupervisedBot;
use crate::BotError;

pub struct BotManager<E: RulesEngine> {
    bots: HashMap<(RoomCode, Seat), SupervisedBot>,
    strategy: Arc<dyn Strategy<E>>,
    delay: Duration,
}

impl<E: RulesEngine> BotManager<E> {
    pub fn new(strategy: Arc<dyn Strategy<E>>, delay: Duration) -> Self {
        Self { bots: HashMap::new(), strategy, delay }
    }

    /// Starts a bot occupying `seat` in room `code`. `AlreadyExists` if
    /// that seat is already bot-occupied — callers must `stop_bot` first
    /// when replacing one bot's strategy with another.
    pub fn start_bot(
        &mut self,
        code: RoomCode,
        seat: Seat,
        game: GameCoordinatorHandle<E>,
    ) -> Result<(), BotError> {
        if self.bots.contains_key(&(code, seat)) {
            return Err(BotError::AlreadyExists(code, seat));
        }
        let config = BotConfig { room_code: code, seat, strategy: self.strategy.clone(), delay: self.delay, game };
        let bot = SupervisedBot::start(code, seat, config);
        self.bots.insert((code, seat), bot);
        tracing::info!(%code, %seat, "bot started");
        Ok(())
    }

    /// Stops the bot at `seat` and waits for its task to fully exit
    /// before returning. This synchronous guarantee is what defeats the
    /// stop-then-immediately-start-a-human race during reconnect: by the
    /// time this returns, the bot can no longer apply an action.
    pub async fn stop_bot(&mut self, code: RoomCode, seat: Seat) -> Result<(), BotError> {
        let bot = self.bots.remove(&(code, seat)).ok_or(BotError::NotFound(code, seat))?;
        bot.stop().await;
        tracing::info!(%code, %seat, "bot stopped");
        Ok(())
    }

    /// Stops every bot in `code`, ignoring seats with no bot. Used on
    /// room close and on game-over.
    pub async fn stop_all_bots(&mut self, code: RoomCode) {
        let seats: Vec<Seat> = self.bots.keys().filter(|(c, _)| *c == code).map(|(_, s)| *s).collect();
        for seat in seats {
            if let Some(bot) = self.bots.remove(&(code, seat)) {
                bot.stop().await;
            }
        }
        tracing::info!(%code, "all bots stopped");
    }

    pub async fn pause_bot(&self, code: RoomCode, seat: Seat) -> Result<(), BotError> {
        let bot = self.bots.get(&(code, seat)).ok_or(BotError::NotFound(code, seat))?;
        bot.handle.pause().await;
        Ok(())
    }

    pub async fn resume_bot(&self, code: RoomCode, seat: Seat) -> Result<(), BotError> {
        let bot = self.bots.get(&(code, seat)).ok_or(BotError::NotFound(code, seat))?;
        bot.handle.resume().await;
        Ok(())
    }

    pub fn is_bot(&self, code: RoomCode, seat: Seat) -> bool {
        self.bots.contains_key(&(code, seat))
    }

    pub fn list_bots(&self, code: RoomCode) -> Vec<Seat> {
        self.bots.keys().filter(|(c, _)| *c == code).map(|(_, s)| *s).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pidro_engine::{Outcome, Phase, Viewer};
    use pidro_game::GameSupervisor;
    use pidro_protocol::PlayerId;

    #[derive(Clone)]
    struct StubEngine;

    impl RulesEngine for StubEngine {
        type State = ();
        type Action = ();
        type Rejection = String;

        fn initial_state(_players: [PlayerId; 4]) -> Self::State {}
        fn legal_actions(_state: &Self::State, _seat: Seat) -> Vec<Self::Action> {
            vec![]
        }
        fn apply_action(_s: &Self::State, _seat: Seat, _a: Self::Action) -> Result<Self::State, Self::Rejection> {
            Ok(())
        }
        fn phase(_s: &Self::State) -> Phase {
            Phase::InProgress
        }
        fn current_turn(_s: &Self::State) -> Option<Seat> {
            None
        }
        fn winner(_s: &Self::State) -> Outcome {
            Outcome::default()
        }
        fn mask_state_for(s: &Self::State, _viewer: Viewer) -> Self::State {
            *s
        }
    }

    fn players() -> [PlayerId; 4] {
        [PlayerId::from("a"), PlayerId::from("b"), PlayerId::from("c"), PlayerId::from("d")]
    }

    #[tokio::test]
    async fn start_bot_twice_on_same_seat_fails() {
        let mut games = GameSupervisor::<StubEngine>::new();
        let code = RoomCode::parse("ABCD").unwrap();
        let game = games.start_game(code, players()).unwrap();

        let mut mgr = BotManager::<StubEngine>::new(Arc::new(crate::strategy::test_support::AlwaysFirst), Duration::from_millis(1));
        mgr.start_bot(code, Seat::N, game.clone()).unwrap();
        let err = mgr.start_bot(code, Seat::N, game).unwrap_err();
        assert!(matches!(err, BotError::AlreadyExists(_, Seat::N)));
    }

    #[tokio::test]
    async fn stop_bot_removes_it_and_is_idempotent_error() {
        let mut games = GameSupervisor::<StubEngine>::new();
        let code = RoomCode::parse("ABCD").unwrap();
        let game = games.start_game(code, players()).unwrap();

        let mut mgr = BotManager::<StubEngine>::new(Arc::new(crate::strategy::test_support::AlwaysFirst), Duration::from_millis(1));
        mgr.start_bot(code, Seat::E, game).unwrap();
        mgr.stop_bot(code, Seat::E).await.unwrap();
        assert!(!mgr.is_bot(code, Seat::E));
        let err = mgr.stop_bot(code, Seat::E).await.unwrap_err();
        assert!(matches!(err, BotError::NotFound(_, Seat::E)));
    }

    #[tokio::test]
    async fn list_bots_reflects_current_seats() {
        let mut games = GameSupervisor::<StubEngine>::new();
        let code = RoomCode::parse("ABCD").unwrap();
        let game = games.start_game(code, players()).unwrap();

        let mut mgr = BotManager::<StubEngine>::new(Arc::new(crate::strategy::test_support::AlwaysFirst), Duration::from_millis(1));
        mgr.start_bot(code, Seat::S, game.clone()).unwrap();
        mgr.start_bot(code, Seat::W, game).unwrap();
        let seats = mgr.list_bots(code);
        assert_eq!(seats.len(), 2);
        assert!(seats.contains(&Seat::S));
        assert!(seats.contains(&Seat::W));
    }
}
