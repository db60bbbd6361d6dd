//! Static board graph.
//!
//! Adjacency never changes during play, so neighbours are plain index
//! lookups into a const table rather than links between nodes.

use crate::{Direction, Pos, NODE_COUNT};

const fn p(index: u8) -> Option<Pos> {
    Some(Pos(index))
}

/// Neighbours of every node, in `[up, down, left, right]` order.
const ADJACENCY: [[Option<Pos>; 4]; NODE_COUNT] = [
    [None, p(9), None, p(1)],      // 0
    [None, p(4), p(0), p(2)],      // 1
    [None, p(14), p(1), None],     // 2
    [None, p(10), None, p(4)],     // 3
    [p(1), p(7), p(3), p(5)],      // 4
    [None, p(13), p(4), None],     // 5
    [None, p(11), None, p(7)],     // 6
    [p(4), None, p(6), p(8)],      // 7
    [None, p(12), p(7), None],     // 8
    [p(0), p(21), None, p(10)],    // 9
    [p(3), p(18), p(9), p(11)],    // 10
    [p(6), p(15), p(10), None],    // 11
    [p(8), p(17), None, p(13)],    // 12
    [p(5), p(20), p(12), p(14)],   // 13
    [p(2), p(23), p(13), None],    // 14
    [p(11), None, None, p(16)],    // 15
    [None, p(19), p(15), p(17)],   // 16
    [p(12), None, p(16), None],    // 17
    [p(10), None, None, p(19)],    // 18
    [p(16), p(22), p(18), p(20)],  // 19
    [p(13), None, p(19), None],    // 20
    [p(9), None, None, p(22)],     // 21
    [p(19), None, p(21), p(23)],   // 22
    [p(14), None, p(22), None],    // 23
];

/// The 16 lines of three that form a mill: 8 horizontal, then 8 vertical.
pub const MILLS: [[Pos; 3]; 16] = [
    [Pos(0), Pos(1), Pos(2)],
    [Pos(3), Pos(4), Pos(5)],
    [Pos(6), Pos(7), Pos(8)],
    [Pos(9), Pos(10), Pos(11)],
    [Pos(12), Pos(13), Pos(14)],
    [Pos(15), Pos(16), Pos(17)],
    [Pos(18), Pos(19), Pos(20)],
    [Pos(21), Pos(22), Pos(23)],
    [Pos(0), Pos(9), Pos(21)],
    [Pos(3), Pos(10), Pos(18)],
    [Pos(6), Pos(11), Pos(15)],
    [Pos(1), Pos(4), Pos(7)],
    [Pos(16), Pos(19), Pos(22)],
    [Pos(8), Pos(12), Pos(17)],
    [Pos(5), Pos(13), Pos(20)],
    [Pos(2), Pos(14), Pos(23)],
];

/// Get the neighbour of `pos` in `direction`, if the board has one there.
///
/// # Panics
///
/// Panics if `pos` is not a valid node index.
#[inline]
pub fn neighbor(pos: Pos, direction: Direction) -> Option<Pos> {
    assert!(pos.is_valid(), "node index {} out of range", pos.0);
    ADJACENCY[pos.index()][direction as usize]
}

/// All existing neighbours of `pos`.
pub fn neighbors(pos: Pos) -> impl Iterator<Item = Pos> {
    Direction::ALL
        .into_iter()
        .filter_map(move |dir| neighbor(pos, dir))
}

/// Check if `other` is directly connected to `pos`.
pub fn is_neighbor(pos: Pos, other: Pos) -> bool {
    neighbors(pos).any(|n| n == other)
}

/// Nodes reached by walking from `pos` in `direction` until the edge of
/// the board (not including `pos` itself).
pub fn walk(pos: Pos, direction: Direction) -> impl Iterator<Item = Pos> {
    std::iter::successors(neighbor(pos, direction), move |&cur| {
        neighbor(cur, direction)
    })
}
