//! The draws themselves.

use std::fmt;

use rand::Rng;
use serde::Serialize;

use crate::SelectionError;

/// Outcome of a coin flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinSide {
    Heads,
    Tails,
}

impl fmt::Display for CoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heads => write!(f, "heads"),
            Self::Tails => write!(f, "tails"),
        }
    }
}

/// Draws one participant with probability `1/n` each.
///
/// Fairness relies on `participants` having no duplicates, which the
/// registry guarantees.
///
/// # Errors
/// [`SelectionError::Empty`] if there are no participants.
pub fn pick_winner<'a, T, R>(
    rng: &mut R,
    participants: &'a [T],
) -> Result<&'a T, SelectionError>
where
    R: Rng + ?Sized,
{
    uniform(rng, participants).ok_or(SelectionError::Empty("participant list"))
}

/// Draws one wheel entry with probability `1/n` per slot.
///
/// Unlike participants, duplicate entries are intentional: an entry that
/// appears twice has twice the odds.
///
/// # Errors
/// [`SelectionError::Empty`] if the wheel has no entries.
pub fn pick_wheel_entry<'a, T, R>(
    rng: &mut R,
    entries: &'a [T],
) -> Result<&'a T, SelectionError>
where
    R: Rng + ?Sized,
{
    uniform(rng, entries).ok_or(SelectionError::Empty("wheel"))
}

/// Flips a fair coin.
pub fn flip_coin<R: Rng + ?Sized>(rng: &mut R) -> CoinSide {
    if rng.random_bool(0.5) {
        CoinSide::Heads
    } else {
        CoinSide::Tails
    }
}

fn uniform<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let index = rng.random_range(0..items.len());
    tracing::trace!(index, of = items.len(), "uniform draw");
    items.get(index)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_pick_winner_empty_is_rejected() {
        let empty: Vec<String> = Vec::new();
        assert_eq!(
            pick_winner(&mut rng(), &empty),
            Err(SelectionError::Empty("participant list"))
        );
    }

    #[test]
    fn test_pick_wheel_entry_empty_is_rejected() {
        let empty: [&str; 0] = [];
        assert_eq!(
            pick_wheel_entry(&mut rng(), &empty),
            Err(SelectionError::Empty("wheel"))
        );
    }

    #[test]
    fn test_pick_winner_single_participant_always_wins() {
        let only = vec!["bob".to_string()];
        let mut rng = rng();
        for _ in 0..20 {
            assert_eq!(pick_winner(&mut rng, &only).unwrap(), "bob");
        }
    }

    #[test]
    fn test_pick_winner_does_not_mutate_input() {
        let participants = vec!["bob".to_string(), "amy".to_string()];
        let before = participants.clone();
        let _ = pick_winner(&mut rng(), &participants).unwrap();
        assert_eq!(participants, before);
    }

    #[test]
    fn test_pick_wheel_entry_returns_an_entry() {
        let entries = ["pizza", "sushi", "tacos"];
        let picked = pick_wheel_entry(&mut rng(), &entries).unwrap();
        assert!(entries.contains(picked));
    }

    #[test]
    fn test_same_seed_same_draws() {
        let participants = ["bob", "amy", "cid", "dan"];
        let a: Vec<&str> = {
            let mut rng = rng();
            (0..10).map(|_| *pick_winner(&mut rng, &participants).unwrap()).collect()
        };
        let b: Vec<&str> = {
            let mut rng = rng();
            (0..10).map(|_| *pick_winner(&mut rng, &participants).unwrap()).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_coin_side_display() {
        assert_eq!(CoinSide::Heads.to_string(), "heads");
        assert_eq!(CoinSide::Tails.to_string(), "tails");
    }
}
