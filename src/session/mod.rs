//! Game session state machine.
//!
//! The presentation layer turns user input into [`Intent`]s, applies them to
//! a [`SessionController`] and renders the resulting [`SessionSnapshot`].

pub mod controller;
pub mod phase;

pub use controller::{SessionController, SessionSnapshot};
pub use phase::{Direction, Intent, Phase, PhaseTransition};
