//! Nine Men's Morris rules engine.
//!
//! # Board Layout
//!
//! ```text
//!  0-----------1-----------2
//!  |           |           |
//!  |   3-------4-------5   |
//!  |   |       |       |   |
//!  |   |   6---7---8   |   |
//!  |   |   |       |   |   |
//!  9---10--11      12--13--14
//!  |   |   |       |   |   |
//!  |   |   15--16--17  |   |
//!  |   |       |       |   |
//!  |   18------19------20  |
//!  |           |           |
//!  21----------22----------23
//! ```
//!
//! Every node has up to four neighbours (up, down, left, right). A mill is
//! any straight line of three nodes along those connections held by one
//! player; there are 16 of them.
//!
//! # Turn Structure
//!
//! ```text
//! placing:  Place ──(mill)──▶ Capture ──▶ opponent
//!             └──────────(no mill)──────▶ opponent
//! moving:   PickUp ──▶ Place ──(mill)──▶ Capture ──▶ opponent
//!                        └────(no mill)────────────▶ opponent
//! ```
//!
//! Every accepted input produces a new [`Board`] value; [`Game`] keeps the
//! committed boards as an undo history.

pub mod action;
pub mod board;
pub mod game;
pub mod record;
pub mod topology;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use action::{Action, Rejection};
pub use board::{Board, Node, Team};
pub use game::{check_victory, Game};
pub use record::{BoardRecord, PositionRecord, RecordError, TeamRecord};

/// Number of nodes on the board.
pub const NODE_COUNT: usize = 24;

/// Tokens each team starts with (all unplaced, all alive).
pub const TOKENS_PER_TEAM: u8 = 9;

/// A team with at most this many alive tokens may fly. A team with fewer
/// than this many has lost.
pub const FLYING_THRESHOLD: u8 = 3;

/// Player identifier.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, derive_more::Display)]
#[repr(u8)]
pub enum Player {
    Cat = 0,
    Dog = 1,
}

impl Player {
    /// Get the opponent player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::Cat => Player::Dog,
            Player::Dog => Player::Cat,
        }
    }

    /// Convert from the stored id (0 or 1) to Player.
    #[inline]
    pub fn from_id(id: u8) -> Option<Player> {
        match id {
            0 => Some(Player::Cat),
            1 => Some(Player::Dog),
            _ => None,
        }
    }

    /// The stored id, also the team's slot on the board.
    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    #[inline]
    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

/// Sub-state of a turn, gating which action the next input performs.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[repr(u8)]
pub enum Phase {
    /// Lift one of your tokens to start a move.
    PickUp = 0,
    /// Place a new token, or put down the lifted one.
    Place = 1,
    /// Remove an opponent token after forming a mill.
    Capture = 2,
}

impl Phase {
    /// Convert from the stored id (0, 1, 2) to Phase.
    #[inline]
    pub fn from_id(id: u8) -> Option<Phase> {
        match id {
            0 => Some(Phase::PickUp),
            1 => Some(Phase::Place),
            2 => Some(Phase::Capture),
            _ => None,
        }
    }

    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Prompt shown to the active player.
    pub fn prompt(self) -> &'static str {
        match self {
            Phase::PickUp => "Pick up one of your tokens.",
            Phase::Place => "Place your token.",
            Phase::Capture => "Remove an opponent's token!",
        }
    }
}

/// Node index on the board (0-23).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct Pos(pub u8);

impl Pos {
    /// Check if this is a valid node index (0-23).
    #[inline]
    pub fn is_valid(self) -> bool {
        (self.0 as usize) < NODE_COUNT
    }

    /// Index into per-node arrays.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all 24 nodes.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..NODE_COUNT as u8).map(Pos)
    }
}

/// Direction of a connection between two nodes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Which lines through a node form a mill.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
    Both,
}

impl Orientation {
    /// The walking directions covered by this orientation.
    pub fn directions(self) -> &'static [Direction] {
        match self {
            Orientation::Horizontal => &[Direction::Left, Direction::Right],
            Orientation::Vertical => &[Direction::Up, Direction::Down],
            Orientation::Both => &Direction::ALL,
        }
    }

    /// Split into the individual axes.
    pub fn axes(self) -> &'static [Orientation] {
        match self {
            Orientation::Horizontal => &[Orientation::Horizontal],
            Orientation::Vertical => &[Orientation::Vertical],
            Orientation::Both => &[Orientation::Horizontal, Orientation::Vertical],
        }
    }

    pub(crate) fn from_axes(horizontal: bool, vertical: bool) -> Option<Orientation> {
        match (horizontal, vertical) {
            (true, true) => Some(Orientation::Both),
            (true, false) => Some(Orientation::Horizontal),
            (false, true) => Some(Orientation::Vertical),
            (false, false) => None,
        }
    }
}
