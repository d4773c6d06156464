//! The pluggable bot strategy contract, and the default `random` strategy.

use pidro_engine::RulesEngine;
use rand::Rng;

/// Turns legal actions + the current (masked) state into a chosen action
/// plus a short human-readable reason, for logging/dev-UI purposes.
///
/// Contract: implementations must always return an action drawn from
/// `legal_actions` when it is non-empty. Behaviour is undefined if called
/// with an empty slice — the Bot Player guarantees it never does.
pub trait Strategy<E: RulesEngine>: Send + Sync + 'static {
    fn pick(&self, legal_actions: &[E::Action], state: &E::State) -> (E::Action, String);
}

/// Capability an engine's `Action` type can implement to let the bundled
/// [`RandomStrategy`] recognise bids and passes without the core
/// `RulesEngine` contract itself having to know what a "bid" is.
///
/// Only the default strategy needs this; a custom `Strategy` is free to
/// pattern-match on a concrete `Action` type directly.
pub trait BidAction: Clone {
    /// `Some(n)` if this action is "bid `n`".
    fn bid_amount(&self) -> Option<i32>;
    fn is_pass(&self) -> bool;
}

/// The default strategy: uniform random over non-bidding choices, but a
/// biased 70%-pass rule during bidding.
///
/// Uniform randomness over bid/pass actions can make a bidding auction
/// non-terminate (every bot keeps out-bidding the others forever) — this
/// is the fix for that: passing is heavily favoured, and when a bot does
/// bid, it bids the smallest legal amount rather than escalating.
pub struct RandomStrategy;

impl<E> Strategy<E> for RandomStrategy
where
    E: RulesEngine,
    E::Action: BidAction,
{
    fn pick(&self, legal_actions: &[E::Action], _state: &E::State) -> (E::Action, String) {
        assert!(!legal_actions.is_empty(), "Strategy::pick called with no legal actions");

        let mut rng = rand::rng();
        let has_bid = legal_actions.iter().any(|a| a.bid_amount().is_some());

        if has_bid {
            if rng.random_bool(0.70) {
                if let Some(pass) = legal_actions.iter().find(|a| a.is_pass()) {
                    return (pass.clone(), "passed (default 70% pass rate)".to_owned());
                }
            }
            let min_bid = legal_actions
                .iter()
                .filter(|a| a.bid_amount().is_some())
                .min_by_key(|a| a.bid_amount().expect("filtered to Some above"))
                .cloned()
                .expect("has_bid is true, so at least one bid exists");
            return (min_bid, "minimum legal bid".to_owned());
        }

        let idx = rng.random_range(0..legal_actions.len());
        (legal_actions[idx].clone(), "uniform random choice".to_owned())
    }
}
