//! Turn-based duels between two teams.
//!
//! A battle is a [`BattleSession`] driven by [`BattleCommand`]s. Each round
//! the player deploys a living unit, the opponent answers with a random
//! living unit, both pick a move, and the faster unit acts first (ties go to
//! the player). The battle ends when one side has no living unit left.
//!
//! ## Module Structure
//!
//! - [`phase`] - Phase and command types
//! - [`session`] - The state machine
//! - [`mode`] - Battle modes, opponent generation and rewards
//! - [`autopilot`] - Automatic play for simulations

pub mod autopilot;
pub mod mode;
pub mod phase;
pub mod session;

pub use autopilot::{choose_command, play_out, DEFAULT_TURN_LIMIT};
pub use mode::{generate_opponent_team, start_battle, BattleMode};
pub use phase::{BattleCommand, BattlePhase};
pub use session::{BattleReport, BattleSession};
