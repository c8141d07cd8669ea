//! Random selection for chatdraw.
//!
//! Three draws, all uniform and all pure:
//!
//! - [`pick_winner`]: one participant out of the registry
//! - [`pick_wheel_entry`]: one entry off a [`Wheel`] (duplicates weight it)
//! - [`flip_coin`]: [`CoinSide::Heads`] or [`CoinSide::Tails`]
//!
//! Each takes the random source as a parameter. Production code passes an
//! OS-seeded generator; tests pass a seeded `StdRng` so distributions are
//! reproducible.
//!
//! Drawing from an empty collection is a caller error
//! ([`SelectionError::Empty`]); the engine never silently picks nothing.

mod draw;
mod error;
mod result;
mod wheel;

pub use draw::{CoinSide, flip_coin, pick_wheel_entry, pick_winner};
pub use error::SelectionError;
pub use result::{LastResults, SelectionKind, SelectionResult};
pub use wheel::Wheel;
