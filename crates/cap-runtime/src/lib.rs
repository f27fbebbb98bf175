#![deny(warnings)]

//! Session runtime around the pure cap engine.
//!
//! The engine holds no state. [`CapSession`] owns the loaded baseline, user
//! roster edits and the committed move list, replays them into a live roster,
//! and hands fresh [`SessionView`]s to subscribed observers after every change.

mod roster;
mod session;

pub use roster::{apply_move, replay};
pub use session::{CapSession, Observer, ObserverId, SessionView};
