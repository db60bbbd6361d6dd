//! The three turn actions and their legality rules.
//!
//! Each action reads a [`Board`] and returns a new one; the input board is
//! never touched, so a rejected action leaves no trace.

use derive_more::{Display, Error};
use tracing::trace;

use crate::{Board, Phase, Player, Pos};

/// An input interpreted in the context of the board's phase.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Action {
    /// Lift one of the active player's tokens to start a move.
    PickUp(Pos),
    /// Place a new token, or put down the lifted one.
    Place(Pos),
    /// Remove an opponent token after forming a mill.
    Capture(Pos),
}

impl Action {
    /// The action an input at `pos` stands for in `phase`.
    pub fn for_phase(phase: Phase, pos: Pos) -> Action {
        match phase {
            Phase::PickUp => Action::PickUp(pos),
            Phase::Place => Action::Place(pos),
            Phase::Capture => Action::Capture(pos),
        }
    }

    /// Get the node the action targets.
    #[inline]
    pub fn pos(&self) -> Pos {
        match *self {
            Action::PickUp(pos) | Action::Place(pos) | Action::Capture(pos) => pos,
        }
    }

    /// Phase in which this action is allowed.
    #[inline]
    pub fn phase(&self) -> Phase {
        match self {
            Action::PickUp(_) => Phase::PickUp,
            Action::Place(_) => Phase::Place,
            Action::Capture(_) => Phase::Capture,
        }
    }
}

/// Why an input was refused. Refusals are routine and change nothing.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Display, Error)]
pub enum Rejection {
    #[display("node is already occupied")]
    Occupied,
    #[display("node does not hold one of your tokens")]
    NotOwnToken,
    #[display("token has no free neighbour to move to")]
    TokenStuck,
    #[display("token can only move to a neighbouring node")]
    NotAdjacent,
    #[display("token must move to a different node")]
    SameNode,
    #[display("node does not hold an opponent token")]
    NotOpponentToken,
    #[display("token is protected by a mill")]
    ProtectedByMill,
    #[display("game is over, {loser} has lost")]
    GameOver { loser: Player },
}

impl Board {
    /// The action an input at `pos` performs on this board.
    pub fn action_for(&self, pos: Pos) -> Action {
        Action::for_phase(self.phase(), pos)
    }

    /// Apply `action`, returning the resulting board.
    ///
    /// # Panics
    ///
    /// Panics if the action does not belong to the board's current phase or
    /// targets a node index outside the board, and on a fresh placement by a
    /// team with no unplaced tokens left.
    pub fn apply(&self, action: Action) -> Result<Board, Rejection> {
        assert!(
            action.pos().is_valid(),
            "node index {} out of range",
            action.pos().0
        );
        assert_eq!(
            action.phase(),
            self.phase(),
            "{:?} attempted during {:?}",
            action,
            self.phase()
        );
        match action {
            Action::PickUp(pos) => self.pick_up(pos),
            Action::Place(pos) => self.place(pos),
            Action::Capture(pos) => self.capture(pos),
        }
    }

    /// Check if an input at `pos` would be accepted right now.
    pub fn accepts(&self, pos: Pos) -> bool {
        self.apply(self.action_for(pos)).is_ok()
    }

    /// Every node an input would currently be accepted at.
    pub fn legal_inputs(&self) -> Vec<Pos> {
        Pos::all().filter(|&pos| self.accepts(pos)).collect()
    }

    /// Lift the active player's token at `pos`, starting a move.
    fn pick_up(&self, pos: Pos) -> Result<Board, Rejection> {
        if self.occupant(pos) != Some(self.active_player()) {
            return Err(Rejection::NotOwnToken);
        }
        if self.is_locked(pos) {
            return Err(Rejection::TokenStuck);
        }

        let mut next = *self;
        next.vacate(pos);
        next.set_pending_lift(Some(pos));
        next.set_phase(Phase::Place);
        Ok(next)
    }

    /// Put a token on `pos`: a fresh one, or the lifted one when a move is
    /// pending. A completed mill moves on to capture; otherwise the turn
    /// passes.
    fn place(&self, pos: Pos) -> Result<Board, Rejection> {
        if !self.is_empty(pos) {
            return Err(Rejection::Occupied);
        }
        if let Some(lifted) = self.pending_lift() {
            if lifted == pos {
                return Err(Rejection::SameNode);
            }
            if !self.is_neighbor(lifted, pos) && !self.active_team().can_fly() {
                return Err(Rejection::NotAdjacent);
            }
        }

        let player = self.active_player();
        assert!(
            self.pending_lift().is_some() || self.active_team().unplaced_tokens() > 0,
            "{} has no token to place",
            player
        );
        let mut next = *self;
        if self.pending_lift().is_none() {
            next.team_mut(player).place_token();
        }
        next.set_pending_lift(None);

        match next.occupy(pos, player) {
            Some(_) if next.tokens_on_board(player.opponent()) > 0 => {
                next.set_phase(Phase::Capture);
            }
            Some(_) => {
                trace!(%player, "mill formed with nothing to capture");
                next.switch_turn();
            }
            None => next.switch_turn(),
        }
        Ok(next)
    }

    /// Remove the opponent token at `pos`. Tokens inside a mill may only be
    /// taken when every opponent token on the board is inside one.
    fn capture(&self, pos: Pos) -> Result<Board, Rejection> {
        let opponent = self.active_player().opponent();
        if self.occupant(pos) != Some(opponent) {
            return Err(Rejection::NotOpponentToken);
        }
        if self.is_milled(pos) && self.positions_of(opponent).any(|p| !self.is_milled(p)) {
            return Err(Rejection::ProtectedByMill);
        }

        let mut next = *self;
        next.vacate(pos);
        next.team_mut(opponent).lose_token();
        next.switch_turn();
        Ok(next)
    }
}
