//! A toy rules engine wired into the full Room Manager / Game Coordinator
//! / Bot Player stack, with no network transport — just a demonstration
//! (and integration-test fixture) of the core end to end.
//!
//! The actual Finnish Pidro rules (dealing, trump, trick-taking, scoring)
//! are out of scope for this workspace; `RaceToTwentyOne` below is a
//! stand-in `RulesEngine` with a bidding phase and a scoring phase,
//! enough to exercise bid/pass handling, turn order, and game-over.

use pidro::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Bid(i32),
    Pass,
    PlayCard(u8),
}

impl BidAction for Action {
    fn bid_amount(&self) -> Option<i32> {
        match self {
            Action::Bid(n) => Some(*n),
            _ => None,
        }
    }

    fn is_pass(&self) -> bool {
        matches!(self, Action::Pass)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RoundPhase {
    Bidding { turn: Seat, high_bid: Option<(Seat, i32)>, passes_in_row: u8 },
    Playing { turn: Seat, scores: [u32; 2] },
    Done { winner: Option<Team> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    pub players: [PlayerId; 4],
    pub phase: RoundPhase,
}

const TARGET_SCORE: u32 = 21;
const MAX_BID: i32 = 10;

pub struct RaceToTwentyOne;

impl RulesEngine for RaceToTwentyOne {
    type State = State;
    type Action = Action;
    type Rejection = String;

    fn initial_state(players: [PlayerId; 4]) -> Self::State {
        State { players, phase: RoundPhase::Bidding { turn: Seat::N, high_bid: None, passes_in_row: 0 } }
    }

    fn legal_actions(state: &Self::State, seat: Seat) -> Vec<Self::Action> {
        match &state.phase {
            RoundPhase::Bidding { turn, high_bid, .. } if *turn == seat => {
                let next_bid = high_bid.map(|(_, n)| n + 1).unwrap_or(1);
                let mut actions = Vec::new();
                if next_bid <= MAX_BID {
                    actions.push(Action::Bid(next_bid));
                }
                if high_bid.is_some() {
                    actions.push(Action::Pass);
                }
                actions
            }
            RoundPhase::Playing { turn, .. } if *turn == seat => {
                vec![Action::PlayCard(1), Action::PlayCard(2), Action::PlayCard(3)]
            }
            _ => Vec::new(),
        }
    }

    fn apply_action(state: &Self::State, seat: Seat, action: Self::Action) -> Result<Self::State, Self::Rejection> {
        let mut next = state.clone();
        match (&mut next.phase, action) {
            (RoundPhase::Bidding { turn, high_bid: _, .. }, _) if *turn != seat => {
                return Err(format!("it is not {seat}'s turn to bid"));
            }
            (RoundPhase::Bidding { turn, high_bid, passes_in_row }, Action::Bid(n)) => {
                let expected = high_bid.map(|(_, hi)| hi + 1).unwrap_or(1);
                if n != expected {
                    return Err(format!("bid must be exactly {expected}, got {n}"));
                }
                *high_bid = Some((seat, n));
                *passes_in_row = 0;
                *turn = turn.next();
            }
            (RoundPhase::Bidding { turn, high_bid, passes_in_row }, Action::Pass) => {
                if high_bid.is_none() {
                    return Err("cannot pass before anyone has opened the bidding".to_owned());
                }
                *passes_in_row += 1;
                if *passes_in_row >= 3 {
                    let (winner, _) = high_bid.expect("high_bid is Some once a bid has occurred");
                    next.phase = RoundPhase::Playing { turn: winner, scores: [0, 0] };
                } else {
                    *turn = turn.next();
                }
            }
            (RoundPhase::Bidding { .. }, Action::PlayCard(_)) => {
                return Err("cannot play a card during bidding".to_owned());
            }
            (RoundPhase::Playing { turn, .. }, _) if *turn != seat => {
                return Err(format!("it is not {seat}'s turn to play"));
            }
            (RoundPhase::Playing { turn, scores }, Action::PlayCard(n)) => {
                let team_idx = match turn.team() {
                    Team::NorthSouth => 0,
                    Team::EastWest => 1,
                };
                scores[team_idx] += n as u32;
                if scores[team_idx] >= TARGET_SCORE {
                    next.phase = RoundPhase::Done { winner: Some(turn.team()) };
                } else {
                    *turn = turn.next();
                }
            }
            (RoundPhase::Playing { .. }, _) => {
                return Err("only playing a card is legal here".to_owned());
            }
            (RoundPhase::Done { .. }, _) => {
                return Err("the round is already over".to_owned());
            }
        }
        Ok(next)
    }

    fn phase(state: &Self::State) -> Phase {
        match state.phase {
            RoundPhase::Done { .. } => Phase::Terminal,
            _ => Phase::InProgress,
        }
    }

    fn current_turn(state: &Self::State) -> Option<Seat> {
        match state.phase {
            RoundPhase::Bidding { turn, .. } => Some(turn),
            RoundPhase::Playing { turn, .. } => Some(turn),
            RoundPhase::Done { .. } => None,
        }
    }

    fn winner(state: &Self::State) -> Outcome {
        match state.phase {
            RoundPhase::Playing { scores, .. } => Outcome { winner: None, scores: (scores[0], scores[1]) },
            RoundPhase::Done { winner } => {
                let scores = match winner {
                    Some(Team::NorthSouth) => (TARGET_SCORE, 0),
                    Some(Team::EastWest) => (0, TARGET_SCORE),
                    None => (0, 0),
                };
                Outcome { winner, scores }
            }
            RoundPhase::Bidding { .. } => Outcome::default(),
        }
    }

    fn mask_state_for(state: &Self::State, _viewer: Viewer) -> Self::State {
        // No private information in this toy engine — every seat sees the
        // same projection. A real rules engine would redact opponents'
        // hands here.
        state.clone()
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let server = PidroServer::<RaceToTwentyOne>::builder().build::<RaceToTwentyOne>();

    let host = PlayerId::from("demo-host");
    let room = server
        .create_room(host.clone(), RoomType::Practice, std::collections::HashMap::new())
        .await
        .expect("demo host is not already seated anywhere else");
    tracing::info!(code = %room.code, "practice room created and filled with bots");

    let (mut sub, mut state) = server
        .subscribe_game(room.code, Viewer::Spectator)
        .await
        .expect("practice rooms start their game synchronously once full");

    if RaceToTwentyOne::phase(&state) == Phase::Terminal {
        tracing::info!(outcome = ?RaceToTwentyOne::winner(&state), "demo round finished before we even subscribed");
        return;
    }

    loop {
        match sub.recv().await {
            Ok(GameEvent::StateUpdate { state: new_state, .. }) => state = new_state,
            Ok(GameEvent::GameOver(outcome)) => {
                tracing::info!(?outcome, "demo round finished");
                break;
            }
            Err(_) => break,
        }
    }
}
