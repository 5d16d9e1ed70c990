//! Memoized exhaustive search over a game's position graph.
//!
//! Every position reachable from the start goes through three states:
//! unseen, expanded (children discovered but not yet classified), resolved.
//! The solver walks the graph depth first with an explicit frame stack and
//! keeps a table of resolved positions, so a position reached along several
//! move sequences is searched exactly once.

use crate::{game::Game, status::Status};
use std::{
    collections::HashMap,
    fmt::Display,
    sync::atomic::{AtomicBool, Ordering},
};

/// What the search knows about a fully resolved position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    /// Final classification, never [`Status::Undecided`].
    pub status: Status,

    /// Distance in plies to the end of the game under optimal play.
    ///
    /// Intended contract: a position resolved without looking at children
    /// has remoteness 0, and a reduced position has one more than the child
    /// selected by the precedence of [`Status::reduce`]. The metric is not
    /// computed yet and every record reports 0.
    pub remoteness: u32,
}

impl Record {
    fn reduced(children: &[Record]) -> Record {
        Record {
            status: Status::reduce(children.iter().map(|r| r.status)),
            remoteness: remoteness(children),
        }
    }
}

/// See [`Record::remoteness`] for the contract this is yet to implement.
const fn remoteness(_children: &[Record]) -> u32 {
    0
}

/// Failure of a solve.
///
/// There are no partial results: a solve either returns a definitive
/// [`Status`] or fails with one of these. [`Status::Undecided`] is never
/// handed to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    /// Applying a move returned its input position unchanged, breaking the
    /// progress guarantee of [`Game::apply`]. The search stops rather than
    /// continuing on a game that cannot terminate.
    ContractViolation,

    /// A position was reached again while its own children were still being
    /// resolved. The position graph has a cycle, so plain search would never
    /// finish; reported instead of hanging.
    CyclicGame,

    /// The caller's stop flag was raised before the search finished.
    Aborted,
}

impl Display for SolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveError::ContractViolation => {
                write!(f, "game contract violated: a move did not change the position")
            }
            SolveError::CyclicGame => {
                write!(f, "game position graph contains a cycle")
            }
            SolveError::Aborted => write!(f, "search aborted by the stop flag"),
        }
    }
}

impl std::error::Error for SolveError {}

#[derive(Debug, Clone, Copy)]
enum NodeState {
    /// Children discovered, waiting for them to resolve.
    Expanded,
    Resolved(Record),
}

struct Frame<P> {
    position: P,
    children: Vec<P>,
    /// Index of the first child not yet accounted for in `resolved`.
    next: usize,
    resolved: Vec<Record>,
}

enum Expansion<P> {
    Resolved(Record),
    Pending(Frame<P>),
}

/// Exhaustive search of one game, with its memo table.
///
/// The table is built for a single run and never shared or persisted: after
/// a failed solve it may hold partially expanded positions, so start a fresh
/// solver instead of reusing one that returned an error.
pub struct Solver<'a, G: Game> {
    game: &'a G,
    nodes: HashMap<G::Position, NodeState, ahash::RandomState>,
    stop: Option<&'a AtomicBool>,
}

impl<'a, G: Game> Solver<'a, G> {
    /// Create a solver for `game` with an empty memo table.
    pub fn new(game: &'a G) -> Self {
        Solver {
            game,
            nodes: HashMap::default(),
            stop: None,
        }
    }

    /// Like [`Solver::new`], but the search checks `stop` between position
    /// resolutions and gives up with [`SolveError::Aborted`] once it is set.
    pub fn with_stop_flag(game: &'a G, stop: &'a AtomicBool) -> Self {
        Solver {
            game,
            nodes: HashMap::default(),
            stop: Some(stop),
        }
    }

    /// Classify the game's starting position.
    pub fn solve(&mut self) -> Result<Status, SolveError> {
        let initial = self.game.initial_position();
        self.status_of(initial)
    }

    /// Classify an arbitrary position of the game.
    pub fn status_of(&mut self, position: G::Position) -> Result<Status, SolveError> {
        self.record_of(position).map(|record| record.status)
    }

    /// Resolve a position and every position needed to decide it.
    pub fn record_of(&mut self, position: G::Position) -> Result<Record, SolveError> {
        if let Some(NodeState::Resolved(record)) = self.nodes.get(&position) {
            return Ok(*record);
        }

        let mut stack = match self.expand(position)? {
            Expansion::Resolved(record) => return Ok(record),
            Expansion::Pending(frame) => vec![frame],
        };

        while let Some(mut frame) = stack.pop() {
            if let Some(stop) = self.stop
                && stop.load(Ordering::Relaxed)
            {
                return Err(SolveError::Aborted);
            }

            if frame.next == frame.children.len() {
                // Every child is resolved: reduce them, retire the frame,
                // and hand the result to the waiting parent.
                let record = Record::reduced(&frame.resolved);
                self.nodes.insert(frame.position, NodeState::Resolved(record));
                match stack.last_mut() {
                    Some(parent) => {
                        parent.resolved.push(record);
                        parent.next += 1;
                    }
                    None => return Ok(record),
                }
                continue;
            }

            let child = frame.children[frame.next].clone();
            match self.nodes.get(&child) {
                Some(NodeState::Resolved(record)) => {
                    // Transposition: reuse the memoized result.
                    frame.resolved.push(*record);
                    frame.next += 1;
                    stack.push(frame);
                }
                Some(NodeState::Expanded) => return Err(SolveError::CyclicGame),
                None => match self.expand(child)? {
                    Expansion::Resolved(record) => {
                        frame.resolved.push(record);
                        frame.next += 1;
                        stack.push(frame);
                    }
                    Expansion::Pending(pending) => {
                        stack.push(frame);
                        stack.push(pending);
                    }
                },
            }
        }

        unreachable!("search stack drained without retiring the root")
    }

    /// Number of positions the search has stored so far.
    #[inline]
    pub fn position_count(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the memo table is still empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look at a position for the first time. Either it resolves on the spot
    /// (primitive, or no legal moves) or its children are discovered and a
    /// pending frame is handed back.
    fn expand(&mut self, position: G::Position) -> Result<Expansion<G::Position>, SolveError> {
        let primitive = self.game.primitive(&position);
        if primitive.is_decided() {
            let record = Record {
                status: primitive,
                remoteness: 0,
            };
            self.nodes.insert(position, NodeState::Resolved(record));
            return Ok(Expansion::Resolved(record));
        }

        let moves = self.game.moves(&position);
        if moves.is_empty() {
            // Reduction over zero children: the stuck player loses.
            let record = Record {
                status: Status::Loss,
                remoteness: 0,
            };
            self.nodes.insert(position, NodeState::Resolved(record));
            return Ok(Expansion::Resolved(record));
        }

        let mut children = Vec::with_capacity(moves.len());
        for m in &moves {
            let child = self.game.apply(&position, m);
            if child == position {
                return Err(SolveError::ContractViolation);
            }
            children.push(child);
        }

        let resolved = Vec::with_capacity(children.len());
        self.nodes.insert(position.clone(), NodeState::Expanded);
        Ok(Expansion::Pending(Frame {
            position,
            children,
            next: 0,
            resolved,
        }))
    }
}

/// Classify the starting position of `game`.
///
/// Builds a fresh solver, resolves the start and every position needed to
/// decide it, and reports the start's status. Calls are independent: solving
/// the same game twice returns the same answer from scratch both times.
pub fn solve<G: Game>(game: &G) -> Result<Status, SolveError> {
    Solver::new(game).solve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::subtraction::Sub;

    #[test]
    fn four_to_one_is_a_first_player_win() {
        let game = Sub::new(vec![1, 2], 4);
        assert_eq!(solve(&game), Ok(Status::Win));
    }

    #[test]
    fn solver_visits_each_position_once() {
        let game = Sub::new(vec![1, 2], 4);
        let mut solver = Solver::new(&game);
        assert!(solver.is_empty());
        assert_eq!(solver.solve(), Ok(Status::Win));
        // Counts 4, 3, 2, 1, 0 and nothing else, despite the many move
        // sequences that reach the low counts.
        assert_eq!(solver.position_count(), 5);
    }

    #[test]
    fn remoteness_is_not_computed_yet() {
        let game = Sub::new(vec![1, 2], 4);
        let mut solver = Solver::new(&game);
        let record = solver.record_of(4).unwrap();
        assert_eq!(record.status, Status::Win);
        assert_eq!(record.remoteness, 0);
    }

    /// Single-position game whose only move flips a coin back and forth.
    struct Flip;

    impl Game for Flip {
        type Position = bool;
        type Move = ();

        fn initial_position(&self) -> bool {
            false
        }

        fn moves(&self, _position: &bool) -> Vec<()> {
            vec![()]
        }

        fn apply(&self, position: &bool, _m: &()) -> bool {
            !position
        }

        fn primitive(&self, _position: &bool) -> Status {
            Status::Undecided
        }
    }

    #[test]
    fn cycle_is_detected_not_looped() {
        assert_eq!(solve(&Flip), Err(SolveError::CyclicGame));
    }

    /// Game whose only move leaves the position unchanged.
    struct Stuck;

    impl Game for Stuck {
        type Position = u8;
        type Move = ();

        fn initial_position(&self) -> u8 {
            7
        }

        fn moves(&self, _position: &u8) -> Vec<()> {
            vec![()]
        }

        fn apply(&self, position: &u8, _m: &()) -> u8 {
            *position
        }

        fn primitive(&self, _position: &u8) -> Status {
            Status::Undecided
        }
    }

    #[test]
    fn null_move_is_a_contract_violation() {
        assert_eq!(solve(&Stuck), Err(SolveError::ContractViolation));
    }

    #[test]
    fn raised_stop_flag_aborts() {
        let game = Sub::new(vec![1, 2], 4);
        let stop = AtomicBool::new(true);
        let mut solver = Solver::with_stop_flag(&game, &stop);
        assert_eq!(solver.solve(), Err(SolveError::Aborted));
    }

    #[test]
    fn errors_format() {
        assert_eq!(
            SolveError::CyclicGame.to_string(),
            "game position graph contains a cycle"
        );
    }
}
