//! Classification of game positions and the rule combining child
//! classifications into their parent's.

use crate::parsing::{Parser, impl_from_str_via_parser};
use std::fmt::Display;

/// Outcome of a position, from the perspective of the player about to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The player to move can force a win.
    Win,

    /// The player to move loses against optimal play.
    Loss,

    /// Neither player can force a win.
    Tie,

    /// Not known without further search. Transient: a finished search never
    /// reports it.
    Undecided,
}

impl Status {
    /// Check if the status is a final answer rather than [`Status::Undecided`].
    #[inline]
    pub const fn is_decided(self) -> bool {
        !matches!(self, Self::Undecided)
    }

    /// Compute a position's status from the statuses of all positions one
    /// move away, each seen from the opponent's perspective.
    ///
    /// A reachable tie takes precedence, then a child lost for the opponent
    /// makes the position won (move there and the opponent loses), otherwise
    /// every move hands the opponent a win and the position is lost. An empty
    /// sequence reduces to [`Status::Loss`]: no legal move loses.
    ///
    /// All children must already be decided; [`Status::Undecided`] inputs are
    /// a caller error.
    pub fn reduce<I>(children: I) -> Status
    where
        I: IntoIterator<Item = Status>,
    {
        let mut has_loss = false;
        for child in children {
            debug_assert!(child.is_decided(), "reduce over an unresolved child");
            match child {
                Status::Tie => return Status::Tie,
                Status::Loss => has_loss = true,
                Status::Win | Status::Undecided => {}
            }
        }
        if has_loss { Status::Win } else { Status::Loss }
    }

    fn parse(p: Parser<'_>) -> Option<(Parser<'_>, Status)> {
        let p = p.trim_whitespace();
        let (p, status) = if let Some(p) = p.parse_keyword("WIN") {
            (p, Status::Win)
        } else if let Some(p) = p.parse_keyword("LOSS") {
            (p, Status::Loss)
        } else if let Some(p) = p.parse_keyword("TIE") {
            (p, Status::Tie)
        } else if let Some(p) = p.parse_keyword("UNDECIDED") {
            (p, Status::Undecided)
        } else {
            return None;
        };
        Some((p.trim_whitespace(), status))
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Win => write!(f, "WIN"),
            Status::Loss => write!(f, "LOSS"),
            Status::Tie => write!(f, "TIE"),
            Status::Undecided => write!(f, "UNDECIDED"),
        }
    }
}

impl_from_str_via_parser!(Status);

#[cfg(any(test, feature = "quickcheck"))]
impl quickcheck::Arbitrary for Status {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        *g.choose(&[Status::Win, Status::Loss, Status::Tie, Status::Undecided])
            .unwrap()
    }
}
