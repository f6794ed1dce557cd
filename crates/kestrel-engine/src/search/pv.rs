//! Triangular principal-variation table.

use kestrel_core::Move;

use crate::search::MAX_PLY;

/// Row `ply` holds the best line found from `ply` onward. Rows live on the
/// heap; the whole table is about 66 KB.
pub struct PvTable {
    moves: Vec<[Move; MAX_PLY + 1]>,
    len: Vec<usize>,
}

impl PvTable {
    pub fn new() -> Self {
        PvTable { moves: vec![[Move::NULL; MAX_PLY + 1]; MAX_PLY + 1], len: vec![0; MAX_PLY + 1] }
    }

    /// Empty the line at `ply`; called on entering a node.
    #[inline]
    pub fn clear_ply(&mut self, ply: usize) {
        if let Some(len) = self.len.get_mut(ply) {
            *len = 0;
        }
    }

    /// Make `mv` followed by the child's line the line at `ply`.
    pub fn update(&mut self, ply: usize, mv: Move) {
        if ply > MAX_PLY {
            return;
        }
        let child_len = if ply < MAX_PLY { self.len[ply + 1].min(MAX_PLY - ply) } else { 0 };
        let (head, tail) = self.moves.split_at_mut(ply + 1);
        let row = &mut head[ply];
        row[0] = mv;
        if child_len > 0 {
            row[1..=child_len].copy_from_slice(&tail[0][..child_len]);
        }
        self.len[ply] = 1 + child_len;
    }

    /// A one-move line at `ply`, for table hits that end the node.
    pub fn set_single(&mut self, ply: usize, mv: Move) {
        if ply <= MAX_PLY {
            self.moves[ply][0] = mv;
            self.len[ply] = 1;
        }
    }

    pub fn line(&self, ply: usize) -> &[Move] {
        match self.moves.get(ply) {
            Some(row) => &row[..self.len[ply]],
            None => &[],
        }
    }

    pub fn root(&self) -> &[Move] {
        self.line(0)
    }
}

impl Default for PvTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use kestrel_core::{Move, Piece, Square};

    use super::PvTable;
    use crate::search::MAX_PLY;

    fn mv(from: Square, to: Square) -> Move {
        Move::normal(from, to, Piece::WHITE_KNIGHT, None)
    }

    #[test]
    fn update_prepends_to_child_line() {
        let mut pv = PvTable::new();
        pv.clear_ply(2);
        pv.set_single(2, mv(Square::B1, Square::C3));
        pv.update(1, mv(Square::G1, Square::F3));
        pv.update(0, mv(Square::F3, Square::G5));
        assert_eq!(
            pv.root(),
            &[mv(Square::F3, Square::G5), mv(Square::G1, Square::F3), mv(Square::B1, Square::C3)]
        );
    }

    #[test]
    fn cleared_child_gives_single_move() {
        let mut pv = PvTable::new();
        pv.set_single(1, mv(Square::B1, Square::C3));
        pv.clear_ply(1);
        pv.update(0, mv(Square::G1, Square::F3));
        assert_eq!(pv.root(), &[mv(Square::G1, Square::F3)]);
    }

    #[test]
    fn deepest_ply_is_safe() {
        let mut pv = PvTable::new();
        pv.clear_ply(MAX_PLY);
        pv.update(MAX_PLY, mv(Square::G1, Square::F3));
        assert_eq!(pv.line(MAX_PLY).len(), 1);
        pv.update(MAX_PLY + 5, mv(Square::G1, Square::F3));
    }
}
