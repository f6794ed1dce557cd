//! FEN string parsing and serialization for [`Position`].

use std::fmt;
use std::str::FromStr;

use crate::attacks::pawn_attacks;
use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::error::{FenError, PositionError};
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::position::{MAX_PIECES_PER_KIND, Position};
use crate::square::Square;

/// The FEN string for the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl FromStr for Position {
    type Err = FenError;

    fn from_str(fen: &str) -> Result<Position, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::WrongFieldCount { found: fields.len() });
        }

        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }

        let mut pos = Position::empty();
        for (rank_index, rank_str) in ranks.iter().enumerate() {
            // FEN lists the eighth rank first
            let rank = 7 - rank_index as u8;
            let fen_rank = 8 - rank_index;
            let mut file: usize = 0;

            for c in rank_str.chars() {
                if let Some(digit) = c.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(FenError::InvalidPieceChar { character: c });
                    }
                    file += digit as usize;
                    continue;
                }
                let piece = Piece::from_fen_char(c).ok_or(FenError::InvalidPieceChar { character: c })?;
                if file >= 8 {
                    return Err(FenError::BadRankLength { rank: fen_rank, length: file + 1 });
                }
                let count = pos.count(piece.color(), piece.kind());
                if count >= MAX_PIECES_PER_KIND {
                    return Err(PositionError::TooManyPieces {
                        color: piece.color(),
                        kind: piece.kind(),
                        count: count + 1,
                    }
                    .into());
                }
                pos.add_piece(Square::new(rank, file as u8), piece);
                file += 1;
            }

            if file != 8 {
                return Err(FenError::BadRankLength { rank: fen_rank, length: file });
            }
        }

        pos.side_to_move =
            Color::from_fen(fields[1]).ok_or_else(|| FenError::InvalidColor { found: fields[1].to_string() })?;

        pos.castling = CastleRights::from_fen(fields[2])?;
        pos.sanitize_castling();

        pos.en_passant = parse_en_passant(fields[3], &pos)?;

        pos.halfmove_clock = fields[4].parse::<u16>().map_err(|_| FenError::InvalidMoveCounter {
            field: "halfmove clock",
            found: fields[4].to_string(),
        })?;

        pos.fullmove_number = fields[5]
            .parse::<u16>()
            .ok()
            .filter(|&n| n >= 1)
            .ok_or_else(|| FenError::InvalidMoveCounter {
                field: "fullmove number",
                found: fields[5].to_string(),
            })?;

        pos.hash = pos.compute_hash();
        pos.validate()?;
        Ok(pos)
    }
}

/// The target must sit on the third rank behind a Black pawn that just
/// advanced, or on the sixth rank behind a White one, with the target and
/// the pawn's origin square both empty. A target no pawn can capture on is
/// dropped so equal positions hash alike.
fn parse_en_passant(field: &str, pos: &Position) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    let invalid = || FenError::InvalidEnPassant { found: field.to_string() };
    let sq = Square::from_algebraic(field).ok_or_else(invalid)?;
    let us = pos.side_to_move;
    let (target_rank, pushed_rank, origin_rank) = match us {
        Color::White => (5, 4, 6),
        Color::Black => (2, 3, 1),
    };
    if sq.rank() != target_rank {
        return Err(invalid());
    }
    let pushed = Square::new(pushed_rank, sq.file());
    let origin = Square::new(origin_rank, sq.file());
    if !pos.is_empty(sq) || !pos.is_empty(origin) || !pos.pieces(!us, PieceKind::Pawn).contains(pushed) {
        return Err(invalid());
    }
    if (pos.pieces(us, PieceKind::Pawn) & pawn_attacks(!us, sq)).is_empty() {
        return Ok(None);
    }
    Ok(Some(sq))
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0u8..8).rev() {
            let mut empty_count = 0u8;
            for file in 0u8..8 {
                match self.piece_on(Square::new(rank, file)) {
                    Some(piece) => {
                        if empty_count > 0 {
                            write!(f, "{empty_count}")?;
                            empty_count = 0;
                        }
                        write!(f, "{}", piece.fen_char())?;
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                write!(f, "{empty_count}")?;
            }
            if rank > 0 {
                write!(f, "/")?;
            }
        }

        write!(f, " {} {}", self.side_to_move(), self.castling())?;
        match self.en_passant() {
            Some(sq) => write!(f, " {sq}")?,
            None => write!(f, " -")?,
        }
        write!(f, " {} {}", self.halfmove_clock(), self.fullmove_number())
    }
}

#[cfg(test)]
mod tests {
    use super::STARTING_FEN;
    use crate::castle_rights::CastleSide;
    use crate::color::Color;
    use crate::error::{FenError, PositionError};
    use crate::position::Position;
    use crate::square::Square;

    fn roundtrip(fen: &str) {
        let pos: Position = fen.parse().unwrap();
        assert_eq!(pos.to_string(), fen, "FEN roundtrip failed");
        let again: Position = pos.to_string().parse().unwrap();
        assert_eq!(pos, again);
    }

    #[test]
    fn roundtrip_known_positions() {
        roundtrip(STARTING_FEN);
        roundtrip("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
        roundtrip("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        roundtrip("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1");
        roundtrip("4k3/8/8/8/8/8/8/4K3 b - - 99 120");
    }

    #[test]
    fn parses_fields() {
        let pos: Position = "rnbqkbnr/pppp1ppp/8/8/3pP3/8/PPP2PPP/RNBQKBNR b Kq e3 0 3".parse().unwrap();
        assert_eq!(pos.side_to_move(), Color::Black);
        assert!(pos.castling().has(Color::White, CastleSide::KingSide));
        assert!(!pos.castling().has(Color::White, CastleSide::QueenSide));
        assert!(pos.castling().has(Color::Black, CastleSide::QueenSide));
        assert_eq!(pos.en_passant(), Some(Square::E3));
        assert_eq!(pos.fullmove_number(), 3);
        assert!(pos.is_consistent());
    }

    #[test]
    fn castling_without_rook_is_dropped() {
        let pos: Position = "4k3/8/8/8/8/8/8/4K2R w KQ - 0 1".parse().unwrap();
        assert!(pos.castling().has(Color::White, CastleSide::KingSide));
        assert!(!pos.castling().has(Color::White, CastleSide::QueenSide));
        assert_eq!(pos.to_string(), "4k3/8/8/8/8/8/8/4K2R w K - 0 1");
    }

    #[test]
    fn rejects_malformed_fields() {
        let cases: [(&str, fn(&FenError) -> bool); 9] = [
            ("8/8/8/8/8/8/8/8 w - -", |e| matches!(e, FenError::WrongFieldCount { found: 4 })),
            ("8/8/8/8/8/8/8 w - - 0 1", |e| matches!(e, FenError::WrongRankCount { found: 7 })),
            ("4k3/9/8/8/8/8/8/4K3 w - - 0 1", |e| matches!(e, FenError::InvalidPieceChar { .. })),
            ("4k3/7/8/8/8/8/8/4K3 w - - 0 1", |e| matches!(e, FenError::BadRankLength { rank: 7, length: 7 })),
            ("4k3/8/8/8/8/8/8/4K3 x - - 0 1", |e| matches!(e, FenError::InvalidColor { .. })),
            ("4k3/8/8/8/8/8/8/4K3 w X - 0 1", |e| matches!(e, FenError::InvalidCastlingChar { .. })),
            ("4k3/8/8/8/8/8/8/4K3 w - e4 0 1", |e| matches!(e, FenError::InvalidEnPassant { .. })),
            ("4k3/8/8/8/8/8/8/4K3 w - - x 1", |e| matches!(e, FenError::InvalidMoveCounter { .. })),
            ("4k3/8/8/8/8/8/8/4K3 w - - 0 0", |e| matches!(e, FenError::InvalidMoveCounter { .. })),
        ];
        for (fen, check) in cases {
            let err = fen.parse::<Position>().unwrap_err();
            assert!(check(&err), "{fen}: {err:?}");
        }
    }

    #[test]
    fn rejects_impossible_positions() {
        let err = "8/8/8/8/8/8/8/4K3 w - - 0 1".parse::<Position>().unwrap_err();
        assert!(matches!(err, FenError::InvalidPosition(PositionError::KingCount { color: Color::Black, count: 0 })));

        let err = "P3k3/8/8/8/8/8/8/4K3 w - - 0 1".parse::<Position>().unwrap_err();
        assert_eq!(err, FenError::InvalidPosition(PositionError::PawnOnBackRank));

        let err = "4k3/8/8/8/8/8/8/4K2R w - - 0 1".parse::<Position>();
        assert!(err.is_ok());
        let err = "4k2R/8/8/8/8/8/8/4K3 w - - 0 1".parse::<Position>().unwrap_err();
        assert_eq!(err, FenError::InvalidPosition(PositionError::OpponentInCheck));

        let err = "4k3/8/8/8/8/NNNNNNNN/NNN5/4K3 w - - 0 1".parse::<Position>().unwrap_err();
        assert!(matches!(err, FenError::InvalidPosition(PositionError::TooManyPieces { count: 11, .. })));
    }

    #[test]
    fn wrong_rank_en_passant_is_rejected() {
        assert!("4k3/8/8/8/4P3/8/8/4K3 w - e3 0 1".parse::<Position>().is_err());
        assert!("4k3/8/8/8/4P3/8/8/4K3 b - e3 0 1".parse::<Position>().is_ok());
    }

    #[test]
    fn en_passant_needs_the_pushed_pawn_and_an_empty_path() {
        // No black pawn on e5.
        let err = "4k3/8/8/3P4/8/8/8/4K3 w - e6 0 1".parse::<Position>().unwrap_err();
        assert!(matches!(err, FenError::InvalidEnPassant { .. }), "{err:?}");
        // Target occupied.
        let err = "4k3/8/4n3/3Pp3/8/8/8/4K3 w - e6 0 1".parse::<Position>().unwrap_err();
        assert!(matches!(err, FenError::InvalidEnPassant { .. }), "{err:?}");
        // Origin occupied.
        let err = "4k3/4n3/8/3Pp3/8/8/8/4K3 w - e6 0 1".parse::<Position>().unwrap_err();
        assert!(matches!(err, FenError::InvalidEnPassant { .. }), "{err:?}");

        let pos: Position = "4k3/8/8/3Pp3/8/8/8/4K3 w - e6 0 1".parse().unwrap();
        assert_eq!(pos.en_passant(), Some(Square::E6));
    }

    #[test]
    fn uncapturable_en_passant_is_dropped() {
        let pos: Position = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1".parse().unwrap();
        assert_eq!(pos.en_passant(), None);
        assert_eq!(pos.hash(), pos.compute_hash());
        let plain: Position = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1".parse().unwrap();
        assert_eq!(pos.hash(), plain.hash());
        assert_eq!(pos.to_string(), plain.to_string());
    }
}
