//! Turn sequencing, undo history and victory detection.

use tracing::{debug, info};

use crate::record::{BoardRecord, RecordError};
use crate::{Board, Phase, Player, Pos, Rejection, FLYING_THRESHOLD};

/// Check whether the board leaves a player with no way to continue.
///
/// Returns the losing player, or `None` while the game goes on. Nothing is
/// decided in the middle of a capture, since the capturing player has not
/// finished the turn yet.
pub fn check_victory(board: &Board) -> Option<Player> {
    if board.phase() == Phase::Capture {
        return None;
    }

    let active = board.active_player();
    for player in [active, active.opponent()] {
        if board.team(player).alive_tokens() < FLYING_THRESHOLD {
            return Some(player);
        }
    }

    // A lifted token always has somewhere to go, otherwise it could not
    // have been lifted.
    if board.pending_lift().is_some() || board.active_team().unplaced_tokens() > 0 {
        return None;
    }

    if board.can_move(active) {
        None
    } else {
        Some(active)
    }
}

/// A game in progress with its committed history.
///
/// `history` always holds at least the starting board, and its last entry
/// is always equal to `current`.
#[derive(Clone, Debug)]
pub struct Game {
    /// Display name, set once the game has been saved.
    name: Option<String>,
    /// Slot in the saved game list, `None` for an unsaved game.
    index: Option<usize>,
    history: Vec<Board>,
    current: Board,
}

impl Game {
    /// Start a new, unnamed game.
    pub fn new() -> Game {
        Game::from_history(Vec::new())
    }

    /// Resume from a list of committed boards, oldest first. An empty list
    /// starts from the initial board.
    pub fn from_history(mut history: Vec<Board>) -> Game {
        let current = match history.last() {
            Some(board) => *board,
            None => {
                let board = Board::new();
                history.push(board);
                board
            }
        };
        Game {
            name: None,
            index: None,
            history,
            current,
        }
    }

    /// Rebuild a saved game from its stored snapshots.
    pub fn from_records<I>(
        name: Option<String>,
        index: Option<usize>,
        records: I,
    ) -> Result<Game, RecordError>
    where
        I: IntoIterator<Item = BoardRecord>,
    {
        let history = records
            .into_iter()
            .map(Board::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let mut game = Game::from_history(history);
        game.name = name;
        game.index = index;
        Ok(game)
    }

    /// The whole history in stored form, oldest first.
    pub fn to_records(&self) -> Vec<BoardRecord> {
        self.history.iter().map(BoardRecord::from).collect()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Record where the game was saved.
    pub fn set_identity(&mut self, name: impl Into<String>, index: usize) {
        self.name = Some(name.into());
        self.index = Some(index);
    }

    #[inline]
    pub fn current(&self) -> &Board {
        &self.current
    }

    pub fn history(&self) -> &[Board] {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.len() > 1
    }

    /// Losing player on the current board, if any.
    pub fn check_victory(&self) -> Option<Player> {
        check_victory(&self.current)
    }

    /// Nodes that would accept an input now; none once the game is decided.
    pub fn legal_inputs(&self) -> Vec<Pos> {
        if self.check_victory().is_some() {
            return Vec::new();
        }
        self.current.legal_inputs()
    }

    /// Interpret a selected node according to the current phase and commit
    /// the result.
    ///
    /// Rejected inputs leave the game untouched.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is not a valid node index.
    pub fn apply_input(&mut self, pos: Pos) -> Result<&Board, Rejection> {
        assert!(pos.is_valid(), "node index {} out of range", pos.0);

        if let Some(loser) = self.check_victory() {
            debug!(?pos, %loser, "input after game over");
            return Err(Rejection::GameOver { loser });
        }

        let action = self.current.action_for(pos);
        let next = match self.current.apply(action) {
            Ok(next) => next,
            Err(rejection) => {
                debug!(?action, %rejection, "input rejected");
                return Err(rejection);
            }
        };

        self.history.push(next);
        self.current = next;
        debug!(
            ?action,
            phase = ?next.phase(),
            active = %next.active_player(),
            "input committed"
        );
        if let Some(loser) = check_victory(&next) {
            info!(%loser, turns = self.history.len() - 1, "game decided");
        }
        Ok(&self.current)
    }

    /// Step back one committed input. The starting board is never removed.
    pub fn undo(&mut self) -> &Board {
        if self.can_undo() {
            self.history.pop();
            if let Some(top) = self.history.last() {
                self.current = *top;
            }
            debug!(depth = self.history.len(), "undo");
        }
        &self.current
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
