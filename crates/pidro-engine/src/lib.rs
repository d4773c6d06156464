//! The `RulesEngine` trait — the single extension point this core defers
//! to for everything about the card game itself.
//!
//! Dealing, bidding rules, trick resolution, and scoring are deliberately
//! out of scope for this crate: the Game Coordinator only ever calls
//! through this trait. An implementation of it is a pure, Send+Sync value
//! type with no actor of its own — the Coordinator supplies the
//! single-writer discipline, the engine just computes.
//!
//! All six operations mirror the spec's C2 table exactly:
//! `initial_state`, `legal_actions`, `apply_action`, `phase`, `winner`,
//! `mask_state_for`.

use pidro_protocol::{PlayerId, Seat, Team};

/// A single canonical terminal tag, shared by the engine and the
/// coordinator that reads it. A prior integration bug compared the wrong
/// terminal tag across the two sides and silently swallowed `game_over`
/// broadcasts; collapsing the engine's phase space to this one enum
/// instead of two parallel string constants removes that failure mode by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InProgress,
    Terminal,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Terminal)
    }
}

/// Who is asking for a state projection. `mask_state_for` uses this to
/// decide what to hide: an opponent's hand, an undeclared trump suit, the
/// shared card pool outside of pack-robbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Seat(Seat),
    Spectator,
}

/// Final score once `phase` reports `Terminal`. Meaningless (implementation
/// decides what to return, typically zeros) before then.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Outcome {
    pub winner: Option<Team>,
    /// `(north_south, east_west)`.
    pub scores: (u32, u32),
}

/// The pure rules-engine contract.
///
/// `apply_action` is a pure function from `(state, seat, action)` to a new
/// state or a rejection — it does not mutate `state` in place. The
/// Coordinator is the only thing that ever holds the authoritative copy;
/// everyone downstream of it only ever sees a `mask_state_for` projection.
pub trait RulesEngine: Send + Sync + 'static {
    /// The full, unmasked game state. Opaque to everything outside the
    /// engine and the Coordinator that owns one.
    type State: Clone + Send + Sync + 'static;

    /// A tagged action value: `Bid(i32)`, `Pass`, `DeclareTrump(suit)`,
    /// `PlayCard((rank, suit))`, or the internal `SelectHand(cards)` used
    /// during dealer pack-robbing. Passed through opaquely by everything
    /// above this trait.
    type Action: Clone + Send + Sync + 'static;

    /// Why `apply_action` refused an action (illegal bid, wrong turn,
    /// card not in hand, ...). Surfaced to the submitting caller only; no
    /// state change occurs.
    type Rejection: std::fmt::Display + Send + Sync + 'static;

    /// Builds the opening state for a freshly-seated table. `players` is
    /// in canonical seat order (N, E, S, W).
    fn initial_state(players: [PlayerId; 4]) -> Self::State;

    /// Actions `seat` may legally take right now. Empty for an
    /// eliminated or not-yet-turn seat; the Bot Player is required to
    /// treat an empty result as "do nothing", never as an error.
    fn legal_actions(state: &Self::State, seat: Seat) -> Vec<Self::Action>;

    /// Applies `action` as `seat`, returning the resulting state or a
    /// rejection. Does not mutate `state`.
    fn apply_action(
        state: &Self::State,
        seat: Seat,
        action: Self::Action,
    ) -> Result<Self::State, Self::Rejection>;

    /// Whether the game has reached a terminal phase. Masking never
    /// changes this, so it's safe to call on a projection returned by
    /// `mask_state_for` as well as on the Coordinator's own copy.
    fn phase(state: &Self::State) -> Phase;

    /// Whose turn it is, if the engine has a notion of turn order right
    /// now (e.g. none during a simultaneous sub-phase). Like `phase`,
    /// stable across masking — turn order is never itself hidden
    /// information.
    fn current_turn(state: &Self::State) -> Option<Seat>;

    /// Winner and scores. Only meaningful once `phase` is `Terminal`.
    fn winner(state: &Self::State) -> Outcome;

    /// Projects `state` for `viewer`, redacting information they
    /// shouldn't see, but preserving its shape — a masked projection is
    /// still a `Self::State`, just with hidden fields cleared, so
    /// `phase`/`current_turn` remain callable on whatever a subscriber
    /// receives over `game:<code>`.
    ///
    /// Must reveal the shared card pool to the dealer during the dealer's
    /// pack-robbing sub-phase — a prior masking bug hid from the dealer
    /// the very cards they were choosing from. Implementations must check
    /// for that sub-phase explicitly rather than applying a blanket
    /// "hide all pools" rule.
    fn mask_state_for(state: &Self::State, viewer: Viewer) -> Self::State;
}
