//! The per-room Game Coordinator and the Game Supervisor that creates and
//! destroys them by room code.
//!
//! A Game Coordinator owns exactly one `RulesEngine::State` and serialises
//! every action application through its command channel — the
//! single-writer discipline for game state the same way the Room Manager
//! is the single writer for seating. The Supervisor is the unique-name
//! registry that hands out and tears down coordinators; it does not
//! restart a crashed coordinator, by design (an engine crash indicates
//! corrupt state, not a transient fault).

mod coordinator;
mod error;
mod event;
mod supervisor;

pub use coordinator::GameCoordinatorHandle;
pub use error::GameError;
pub use event::GameEvent;
pub use supervisor::GameSupervisor;
