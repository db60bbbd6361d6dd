//! Board state: node occupancy, mill membership and team ledgers.

use tracing::trace;

use crate::topology::{self, MILLS};
use crate::{
    Direction, Orientation, Phase, Player, Pos, FLYING_THRESHOLD, NODE_COUNT, TOKENS_PER_TEAM,
};

/// A single intersection on the board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct Node {
    occupant: Option<Player>,
    mill_membership: u8,
}

impl Node {
    #[inline]
    pub fn occupant(&self) -> Option<Player> {
        self.occupant
    }

    /// Number of mill lines currently running through this node (0-2).
    #[inline]
    pub fn mill_membership(&self) -> u8 {
        self.mill_membership
    }
}

/// Token ledger for one player.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Team {
    player: Player,
    unplaced_tokens: u8,
    alive_tokens: u8,
}

impl Team {
    /// A fresh team with every token unplaced and alive.
    pub fn new(player: Player) -> Team {
        Team::with_counts(player, TOKENS_PER_TEAM, TOKENS_PER_TEAM)
    }

    pub fn with_counts(player: Player, unplaced_tokens: u8, alive_tokens: u8) -> Team {
        Team {
            player,
            unplaced_tokens,
            alive_tokens,
        }
    }

    #[inline]
    pub fn player(&self) -> Player {
        self.player
    }

    #[inline]
    pub fn unplaced_tokens(&self) -> u8 {
        self.unplaced_tokens
    }

    #[inline]
    pub fn alive_tokens(&self) -> u8 {
        self.alive_tokens
    }

    /// Whether the team may move tokens to any empty node.
    #[inline]
    pub fn can_fly(&self) -> bool {
        self.alive_tokens <= FLYING_THRESHOLD
    }

    /// Use up one unplaced token. A no-op once all are placed.
    pub(crate) fn place_token(&mut self) {
        self.unplaced_tokens = self.unplaced_tokens.saturating_sub(1);
    }

    pub(crate) fn lose_token(&mut self) {
        self.alive_tokens = self.alive_tokens.saturating_sub(1);
    }
}

/// One snapshot of the game.
///
/// `Board` is a plain value: cloning it copies every node and both teams,
/// so a board kept in a history can never observe later changes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Board {
    teams: [Team; 2],
    active: Player,
    nodes: [Node; NODE_COUNT],
    phase: Phase,
    pending_lift: Option<Pos>,
}

impl Board {
    /// Create the starting board: empty, Cat to place.
    pub fn new() -> Board {
        Board {
            teams: [Team::new(Player::Cat), Team::new(Player::Dog)],
            active: Player::Cat,
            nodes: [Node::default(); NODE_COUNT],
            phase: Phase::Place,
            pending_lift: None,
        }
    }

    /// Assemble a board from its stored parts. Mill membership is derived
    /// from the occupants.
    pub fn from_parts(
        teams: [Team; 2],
        active: Player,
        occupants: [Option<Player>; NODE_COUNT],
        phase: Phase,
        pending_lift: Option<Pos>,
    ) -> Board {
        let mut nodes = [Node::default(); NODE_COUNT];
        for (node, occupant) in nodes.iter_mut().zip(occupants) {
            node.occupant = occupant;
        }
        let mut board = Board {
            teams,
            active,
            nodes,
            phase,
            pending_lift,
        };
        board.recount_mills();
        board
    }

    // ========== Accessors ==========

    #[inline]
    pub fn teams(&self) -> &[Team; 2] {
        &self.teams
    }

    #[inline]
    pub fn team(&self, player: Player) -> &Team {
        &self.teams[player.slot()]
    }

    pub(crate) fn team_mut(&mut self, player: Player) -> &mut Team {
        &mut self.teams[player.slot()]
    }

    /// The player whose input is expected next.
    #[inline]
    pub fn active_player(&self) -> Player {
        self.active
    }

    #[inline]
    pub fn active_team(&self) -> &Team {
        self.team(self.active)
    }

    #[inline]
    pub fn opponent_team(&self) -> &Team {
        self.team(self.active.opponent())
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Node a token was lifted from, while a move is half done.
    #[inline]
    pub fn pending_lift(&self) -> Option<Pos> {
        self.pending_lift
    }

    /// # Panics
    ///
    /// Panics if `pos` is not a valid node index.
    #[inline]
    pub fn node(&self, pos: Pos) -> &Node {
        assert!(pos.is_valid(), "node index {} out of range", pos.0);
        &self.nodes[pos.index()]
    }

    #[inline]
    pub fn nodes(&self) -> &[Node; NODE_COUNT] {
        &self.nodes
    }

    #[inline]
    pub fn occupant(&self, pos: Pos) -> Option<Player> {
        self.node(pos).occupant
    }

    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.occupant(pos).is_none()
    }

    /// Nodes currently held by `player`.
    pub fn positions_of(&self, player: Player) -> impl Iterator<Item = Pos> + '_ {
        Pos::all().filter(move |&pos| self.occupant(pos) == Some(player))
    }

    pub fn tokens_on_board(&self, player: Player) -> u8 {
        self.positions_of(player).count() as u8
    }

    // ========== Graph Queries ==========

    #[inline]
    pub fn neighbor(&self, pos: Pos, direction: Direction) -> Option<Pos> {
        topology::neighbor(pos, direction)
    }

    #[inline]
    pub fn is_neighbor(&self, pos: Pos, other: Pos) -> bool {
        topology::is_neighbor(pos, other)
    }

    /// Check if every existing neighbour of `pos` is occupied.
    pub fn is_stuck(&self, pos: Pos) -> bool {
        topology::neighbors(pos).all(|n| !self.is_empty(n))
    }

    /// A token that cannot be lifted: stuck, and its team is too large to
    /// fly. Empty nodes are never locked.
    pub fn is_locked(&self, pos: Pos) -> bool {
        match self.occupant(pos) {
            Some(owner) => self.is_stuck(pos) && !self.team(owner).can_fly(),
            None => false,
        }
    }

    /// Check if `player` has any legal move once all tokens are placed.
    pub fn can_move(&self, player: Player) -> bool {
        if self.team(player).can_fly() {
            return Pos::all().any(|pos| self.is_empty(pos));
        }
        self.positions_of(player).any(|pos| !self.is_stuck(pos))
    }

    // ========== Mill Detection ==========

    /// Count same-owner tokens walking away from `pos`, stopping at the
    /// first gap, foreign token or edge.
    fn run_length(&self, pos: Pos, direction: Direction, owner: Player) -> u8 {
        topology::walk(pos, direction)
            .take_while(|&n| self.occupant(n) == Some(owner))
            .count() as u8
    }

    /// Check which lines through `pos` are mills for its current owner.
    /// An empty node is never part of a mill.
    pub fn detect_mill(&self, pos: Pos) -> Option<Orientation> {
        let owner = self.occupant(pos)?;
        let run = |dir| self.run_length(pos, dir, owner);
        let horizontal = run(Direction::Left) + run(Direction::Right) == 2;
        let vertical = run(Direction::Up) + run(Direction::Down) == 2;
        Orientation::from_axes(horizontal, vertical)
    }

    /// Check if the token at `pos` is guarded by at least one mill.
    #[inline]
    pub fn is_milled(&self, pos: Pos) -> bool {
        self.node(pos).mill_membership > 0
    }

    /// Adjust the mill counter of every node on each axis of `orientation`
    /// through `pos`, including `pos` itself once per axis.
    pub fn update_mill_membership(&mut self, pos: Pos, orientation: Orientation, added: bool) {
        for axis in orientation.axes() {
            self.bump_membership(pos, added);
            for &dir in axis.directions() {
                for n in topology::walk(pos, dir) {
                    self.bump_membership(n, added);
                }
            }
        }
    }

    fn bump_membership(&mut self, pos: Pos, added: bool) {
        let node = &mut self.nodes[pos.index()];
        if added {
            node.mill_membership += 1;
        } else {
            debug_assert!(node.mill_membership > 0, "mill counter underflow at {:?}", pos);
            node.mill_membership = node.mill_membership.saturating_sub(1);
        }
    }

    /// Rebuild every mill counter from the occupants.
    pub fn recount_mills(&mut self) {
        for node in &mut self.nodes {
            node.mill_membership = 0;
        }
        for line in MILLS {
            let [a, b, c] = line;
            let owner = self.occupant(a);
            if owner.is_some() && self.occupant(b) == owner && self.occupant(c) == owner {
                for pos in line {
                    self.nodes[pos.index()].mill_membership += 1;
                }
            }
        }
    }

    // ========== Mutation (crate-internal) ==========

    /// Put a token of `player` on the empty node `pos` and register any
    /// mill it completes.
    pub(crate) fn occupy(&mut self, pos: Pos, player: Player) -> Option<Orientation> {
        debug_assert!(self.is_empty(pos));
        self.nodes[pos.index()].occupant = Some(player);
        let mill = self.detect_mill(pos);
        if let Some(orientation) = mill {
            trace!(?pos, ?orientation, %player, "mill formed");
            self.update_mill_membership(pos, orientation, true);
        }
        mill
    }

    /// Take the token off `pos`, dissolving any mill it was part of.
    pub(crate) fn vacate(&mut self, pos: Pos) -> Option<Player> {
        if let Some(orientation) = self.detect_mill(pos) {
            trace!(?pos, ?orientation, "mill broken");
            self.update_mill_membership(pos, orientation, false);
        }
        self.nodes[pos.index()].occupant.take()
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn set_pending_lift(&mut self, pos: Option<Pos>) {
        self.pending_lift = pos;
    }

    /// Hand the turn to the opponent, who places if they still hold
    /// unplaced tokens and moves otherwise.
    pub(crate) fn switch_turn(&mut self) {
        self.active = self.active.opponent();
        self.phase = if self.active_team().unplaced_tokens() > 0 {
            Phase::Place
        } else {
            Phase::PickUp
        };
        self.pending_lift = None;
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(cats: &[u8], dogs: &[u8]) -> Board {
        let mut board = Board::new();
        for &i in cats {
            board.occupy(Pos(i), Player::Cat);
        }
        for &i in dogs {
            board.occupy(Pos(i), Player::Dog);
        }
        board
    }

    fn recounted(board: &Board) -> Board {
        let mut copy = *board;
        copy.recount_mills();
        copy
    }

    #[test]
    fn test_board_new() {
        let board = Board::new();
        assert_eq!(board.active_player(), Player::Cat);
        assert_eq!(board.phase(), Phase::Place);
        assert_eq!(board.pending_lift(), None);
        assert!(Pos::all().all(|pos| board.is_empty(pos)));
        for team in board.teams() {
            assert_eq!(team.unplaced_tokens(), 9);
            assert_eq!(team.alive_tokens(), 9);
        }
    }

    #[test]
    fn test_team_place_token_saturates() {
        let mut team = Team::with_counts(Player::Dog, 1, 9);
        team.place_token();
        assert_eq!(team.unplaced_tokens(), 0);
        team.place_token();
        assert_eq!(team.unplaced_tokens(), 0);
    }

    #[test]
    fn test_team_can_fly() {
        assert!(!Team::with_counts(Player::Cat, 0, 4).can_fly());
        assert!(Team::with_counts(Player::Cat, 0, 3).can_fly());
    }

    #[test]
    fn test_horizontal_mill() {
        let board = board_with(&[0, 1, 2], &[]);
        assert_eq!(board.detect_mill(Pos(1)), Some(Orientation::Horizontal));
        assert_eq!(board.detect_mill(Pos(0)), Some(Orientation::Horizontal));
        assert_eq!(board.detect_mill(Pos(2)), Some(Orientation::Horizontal));
    }

    #[test]
    fn test_vertical_mill() {
        let board = board_with(&[3, 10, 18], &[]);
        assert_eq!(board.detect_mill(Pos(10)), Some(Orientation::Vertical));
        assert_eq!(board.detect_mill(Pos(18)), Some(Orientation::Vertical));
    }

    #[test]
    fn test_both_mill() {
        let board = board_with(&[0, 1, 2, 9, 21], &[]);
        assert_eq!(board.detect_mill(Pos(0)), Some(Orientation::Both));
        assert_eq!(board.node(Pos(0)).mill_membership(), 2);
        assert_eq!(board.node(Pos(1)).mill_membership(), 1);
        assert_eq!(board.node(Pos(21)).mill_membership(), 1);
    }

    #[test]
    fn test_mixed_owners_no_mill() {
        let board = board_with(&[0, 2], &[1]);
        assert_eq!(board.detect_mill(Pos(1)), None);
        assert_eq!(board.detect_mill(Pos(0)), None);
    }

    #[test]
    fn test_empty_node_no_mill() {
        let board = board_with(&[0, 2], &[]);
        assert_eq!(board.detect_mill(Pos(1)), None);
    }

    #[test]
    fn test_no_mill_across_gap_lines() {
        // 9-10-11 and 12-13-14 are separate lines
        let board = board_with(&[10, 11, 12], &[]);
        assert_eq!(board.detect_mill(Pos(11)), None);
        assert_eq!(board.detect_mill(Pos(12)), None);
    }

    #[test]
    fn test_mill_membership_on_formation() {
        let board = board_with(&[0, 1, 2], &[]);
        for i in [0, 1, 2] {
            assert_eq!(board.node(Pos(i)).mill_membership(), 1);
            assert!(board.is_milled(Pos(i)));
        }
        assert!(!board.is_milled(Pos(9)));
    }

    #[test]
    fn test_mill_membership_on_break() {
        let mut board = board_with(&[0, 1, 2, 9, 21], &[]);
        board.vacate(Pos(1));
        assert_eq!(board.node(Pos(0)).mill_membership(), 1);
        assert_eq!(board.node(Pos(1)).mill_membership(), 0);
        assert_eq!(board.node(Pos(2)).mill_membership(), 0);
        assert_eq!(board.node(Pos(9)).mill_membership(), 1);
        assert_eq!(board, recounted(&board));

        board.vacate(Pos(0));
        assert!(Pos::all().all(|pos| !board.is_milled(pos)));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "mill counter underflow")]
    fn test_membership_underflow_caught() {
        let mut board = board_with(&[0, 1], &[]);
        board.update_mill_membership(Pos(1), Orientation::Horizontal, false);
    }

    #[test]
    fn test_incremental_matches_recount() {
        let board = board_with(&[4, 1, 7, 3, 5, 19], &[16, 22, 0, 9, 21]);
        assert_eq!(board, recounted(&board));
        assert_eq!(board.node(Pos(4)).mill_membership(), 2);
        assert_eq!(board.node(Pos(0)).mill_membership(), 1);
    }

    #[test]
    fn test_is_stuck() {
        let board = board_with(&[0, 1], &[9]);
        assert!(board.is_stuck(Pos(0)));
        assert!(!board.is_stuck(Pos(1)));
        // Middle of the left side: 0 and 21 above/below, 10 to the right.
        let board = board_with(&[9, 0, 21], &[10]);
        assert!(board.is_stuck(Pos(9)));
    }

    #[test]
    fn test_is_locked_respects_flying() {
        let mut board = board_with(&[0], &[1, 9]);
        assert!(board.is_locked(Pos(0)));
        board.team_mut(Player::Cat).alive_tokens = 3;
        assert!(!board.is_locked(Pos(0)));
        assert!(!board.is_locked(Pos(5)));
    }

    #[test]
    fn test_can_move() {
        let mut board = board_with(&[0], &[1, 9]);
        board.team_mut(Player::Cat).unplaced_tokens = 0;
        assert!(!board.can_move(Player::Cat));
        board.team_mut(Player::Cat).alive_tokens = 3;
        assert!(board.can_move(Player::Cat));
    }

    #[test]
    fn test_switch_turn_sets_phase() {
        let mut board = Board::new();
        board.team_mut(Player::Dog).unplaced_tokens = 0;
        board.set_pending_lift(Some(Pos(3)));
        board.switch_turn();
        assert_eq!(board.active_player(), Player::Dog);
        assert_eq!(board.phase(), Phase::PickUp);
        assert_eq!(board.pending_lift(), None);
        board.switch_turn();
        assert_eq!(board.phase(), Phase::Place);
    }

    #[test]
    fn test_from_parts_recounts_mills() {
        let mut occupants = [None; NODE_COUNT];
        for i in [21, 22, 23] {
            occupants[i] = Some(Player::Dog);
        }
        let board = Board::from_parts(
            [Team::new(Player::Cat), Team::new(Player::Dog)],
            Player::Cat,
            occupants,
            Phase::Place,
            None,
        );
        assert!(board.is_milled(Pos(22)));
        assert!(!board.is_milled(Pos(19)));
    }

    #[test]
    fn test_copies_are_independent() {
        let original = board_with(&[0], &[]);
        let mut copy = original;
        copy.occupy(Pos(5), Player::Dog);
        copy.team_mut(Player::Dog).lose_token();
        assert!(original.is_empty(Pos(5)));
        assert_eq!(original.team(Player::Dog).alive_tokens(), 9);
    }
}
