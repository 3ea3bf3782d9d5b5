//! Game rules for morpion.
//!
//! Pure functions over a [`Grid`](super::Grid), kept apart from the match
//! state machine so they can be tested in isolation.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{Axis, is_winning_move, winning_axis};
