//! Subtraction game played on a finite subtraction set
//!
//! A pile of counters shrinks by one of the amounts in the subtraction set
//! each turn; whoever cannot move loses. The classic "four to one" puzzle is
//! `Sub::new(vec![1, 2], 4)`.

use crate::{display, game::Game, status::Status};
use std::fmt::Display;

/// Subtraction game on an arbitrary finite subtraction set, starting from a
/// given pile size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sub {
    // Invariant: sorted
    subtraction_set: Vec<u32>,
    starting_count: u32,
}

impl Display for Sub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub")?;
        display::parens(f, |f| display::commas(f, self.subtraction_set()))?;
        write!(f, " from {}", self.starting_count)
    }
}

impl Sub {
    /// Define a new subtraction game with a given subtraction set and
    /// starting pile size.
    ///
    /// The set is not validated here: a zero entry produces a move that
    /// leaves the pile unchanged, which the solver rejects as a contract
    /// violation.
    #[inline]
    pub fn new(mut subtraction_set: Vec<u32>, starting_count: u32) -> Self {
        subtraction_set.sort_unstable();
        Self {
            subtraction_set,
            starting_count,
        }
    }

    /// Get the subtraction set of the game
    #[inline]
    pub const fn subtraction_set(&self) -> &Vec<u32> {
        &self.subtraction_set
    }

    /// Get the starting pile size
    #[inline]
    pub const fn starting_count(&self) -> u32 {
        self.starting_count
    }
}

impl Game for Sub {
    type Position = u32;
    type Move = u32;

    fn initial_position(&self) -> u32 {
        self.starting_count
    }

    fn moves(&self, position: &u32) -> Vec<u32> {
        self.subtraction_set
            .iter()
            .copied()
            .take_while(|m| m <= position)
            .collect()
    }

    fn apply(&self, position: &u32, m: &u32) -> u32 {
        position - m
    }

    fn primitive(&self, position: &u32) -> Status {
        if *position == 0 {
            Status::Loss
        } else {
            Status::Undecided
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::solve;

    macro_rules! assert_statuses {
        ($subtraction_set:expr, $statuses:expr) => {
            for (start, expected) in $statuses.into_iter().enumerate() {
                let game = Sub::new($subtraction_set.into(), start as u32);
                assert_eq!(
                    solve(&game),
                    Ok(expected),
                    "Sub({:?}) from {}",
                    $subtraction_set,
                    start
                );
            }
        };
    }

    #[test]
    fn classifies_small_piles() {
        use Status::{Loss as L, Win as W};

        // {1, 2}: every multiple of three is lost for the player to move.
        assert_statuses!([1, 2], [L, W, W, L, W, W, L, W, W, L]);
        assert_statuses!([1], [L, W, L, W, L, W, L, W]);
        assert_statuses!([2], [L, L, W, W, L, L, W, W]);
        assert_statuses!([2, 3, 5], [L, L, W, W, W, W, W, L, L, W, W]);
    }

    #[test]
    fn moves_never_exceed_the_pile() {
        let game = Sub::new(vec![2, 5, 3], 10);
        assert_eq!(game.moves(&4), vec![2, 3]);
        assert_eq!(game.moves(&1), Vec::<u32>::new());
        assert_eq!(game.apply(&4, &3), 1);
    }

    #[test]
    fn displays_sorted_set_and_start() {
        let game = Sub::new(vec![2, 1], 4);
        assert_eq!(game.to_string(), "Sub(1, 2) from 4");
    }
}
