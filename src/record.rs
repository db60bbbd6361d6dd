//! Stored snapshot shape exchanged with the persistence layer.
//!
//! A record holds only what cannot be derived: team counters, occupants,
//! phase and the pending lift. Neighbours come from the static topology
//! and mill counters are recomputed on load.
//!
//! ```json
//! {
//!   "teams": [{"player":0,"numUnplacedTokens":8,"numAliveTokens":9}, ...],
//!   "currentPlayer": 1,
//!   "positions": [{"player":0}, {}, ...],
//!   "gamePhase": 1,
//!   "pickUpPositionIndex": 4
//! }
//! ```

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use crate::{Board, Phase, Player, Pos, Team, NODE_COUNT, TOKENS_PER_TEAM};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRecord {
    pub player: u8,
    pub num_unplaced_tokens: u8,
    pub num_alive_tokens: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct PositionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<u8>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardRecord {
    pub teams: Vec<TeamRecord>,
    pub current_player: u8,
    pub positions: Vec<PositionRecord>,
    pub game_phase: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pick_up_position_index: Option<u8>,
}

/// A stored record that does not describe a valid board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Display, Error)]
pub enum RecordError {
    #[display("expected 2 teams, found {found}")]
    TeamCount { found: usize },
    #[display("expected 24 positions, found {found}")]
    PositionCount { found: usize },
    #[display("unknown player id {id}")]
    UnknownPlayer { id: u8 },
    #[display("team in slot {slot} belongs to player {id}")]
    MisplacedTeam { slot: usize, id: u8 },
    #[display("unknown game phase {id}")]
    UnknownPhase { id: u8 },
    #[display("position index {index} out of range")]
    PositionOutOfRange { index: u8 },
    #[display("team {player} has out of range token counts")]
    TokenCounts { player: Player },
    #[display("team {player} has {on_board} tokens on the board but only {alive} alive")]
    TooManyOnBoard { player: Player, on_board: u8, alive: u8 },
    #[display("team {player} has {on_board} tokens on the board but placed only {placed}")]
    MorePlacedThanUsed { player: Player, on_board: u8, placed: u8 },
    #[display("phase {phase:?} does not fit {unplaced} unplaced tokens and lift {lift:?}")]
    PhaseMismatch {
        phase: Phase,
        unplaced: u8,
        lift: Option<u8>,
    },
    #[display("lifted node {index} is still occupied")]
    LiftOccupied { index: u8 },
}

fn player(id: u8) -> Result<Player, RecordError> {
    Player::from_id(id).ok_or(RecordError::UnknownPlayer { id })
}

impl From<&Team> for TeamRecord {
    fn from(team: &Team) -> Self {
        TeamRecord {
            player: team.player().id(),
            num_unplaced_tokens: team.unplaced_tokens(),
            num_alive_tokens: team.alive_tokens(),
        }
    }
}

impl From<&Board> for BoardRecord {
    fn from(board: &Board) -> Self {
        BoardRecord {
            teams: board.teams().iter().map(TeamRecord::from).collect(),
            current_player: board.active_player().id(),
            positions: board
                .nodes()
                .iter()
                .map(|node| PositionRecord {
                    player: node.occupant().map(Player::id),
                })
                .collect(),
            game_phase: board.phase().id(),
            pick_up_position_index: board.pending_lift().map(|pos| pos.0),
        }
    }
}

impl TryFrom<BoardRecord> for Board {
    type Error = RecordError;

    fn try_from(record: BoardRecord) -> Result<Self, Self::Error> {
        let [cat, dog]: [TeamRecord; 2] = record
            .teams
            .as_slice()
            .try_into()
            .map_err(|_| RecordError::TeamCount {
                found: record.teams.len(),
            })?;
        if record.positions.len() != NODE_COUNT {
            return Err(RecordError::PositionCount {
                found: record.positions.len(),
            });
        }

        let mut teams = [Team::new(Player::Cat), Team::new(Player::Dog)];
        for (slot, stored) in [cat, dog].into_iter().enumerate() {
            let owner = player(stored.player)?;
            if owner.slot() != slot {
                return Err(RecordError::MisplacedTeam {
                    slot,
                    id: stored.player,
                });
            }
            if stored.num_unplaced_tokens > TOKENS_PER_TEAM
                || stored.num_alive_tokens > TOKENS_PER_TEAM
            {
                return Err(RecordError::TokenCounts { player: owner });
            }
            teams[slot] =
                Team::with_counts(owner, stored.num_unplaced_tokens, stored.num_alive_tokens);
        }

        let mut occupants = [None; NODE_COUNT];
        for (occupant, stored) in occupants.iter_mut().zip(&record.positions) {
            *occupant = stored.player.map(player).transpose()?;
        }

        for team in &teams {
            let on_board = occupants
                .iter()
                .filter(|&&o| o == Some(team.player()))
                .count() as u8;
            if on_board > team.alive_tokens() {
                return Err(RecordError::TooManyOnBoard {
                    player: team.player(),
                    on_board,
                    alive: team.alive_tokens(),
                });
            }
            let placed = TOKENS_PER_TEAM - team.unplaced_tokens();
            if on_board > placed {
                return Err(RecordError::MorePlacedThanUsed {
                    player: team.player(),
                    on_board,
                    placed,
                });
            }
        }

        let active = player(record.current_player)?;
        let phase = Phase::from_id(record.game_phase).ok_or(RecordError::UnknownPhase {
            id: record.game_phase,
        })?;
        let pending_lift = match record.pick_up_position_index {
            Some(index) if !Pos(index).is_valid() => {
                return Err(RecordError::PositionOutOfRange { index })
            }
            other => other.map(Pos),
        };
        if let Some(lifted) = pending_lift {
            if occupants[lifted.index()].is_some() {
                return Err(RecordError::LiftOccupied { index: lifted.0 });
            }
        }

        // A fresh placement needs an unplaced token; a move needs none left.
        let unplaced = teams[active.slot()].unplaced_tokens();
        let consistent = match (phase, pending_lift) {
            (Phase::PickUp, None) => unplaced == 0,
            (Phase::Place, None) => unplaced > 0,
            (Phase::Place, Some(_)) => unplaced == 0,
            (Phase::Capture, None) => true,
            (Phase::PickUp | Phase::Capture, Some(_)) => false,
        };
        if !consistent {
            return Err(RecordError::PhaseMismatch {
                phase,
                unplaced,
                lift: record.pick_up_position_index,
            });
        }

        Ok(Board::from_parts(teams, active, occupants, phase, pending_lift))
    }
}
