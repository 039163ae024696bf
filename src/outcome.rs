use crate::board::Position;
use cozy_chess::{Color, Piece};
use serde::{Deserialize, Serialize};

pub const WHITE_WINS: &str = "1-0";
pub const BLACK_WINS: &str = "0-1";
pub const DRAW: &str = "1/2-1/2";

/// Which termination rules end a self-play game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    pub fivefold: bool,
}

impl Default for Rules {
    fn default() -> Self { Self { fivefold: true } }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
    FiftyMoves,
    FivefoldRepetition,
}

pub fn is_checkmate(pos: &Position) -> bool { pos.in_check() && !pos.has_legal_moves() }

pub fn is_stalemate(pos: &Position) -> bool { !pos.in_check() && !pos.has_legal_moves() }

pub fn is_fifty_moves(pos: &Position) -> bool { pos.halfmove_clock() >= 100 && pos.has_legal_moves() }

pub fn is_seventyfive_moves(pos: &Position) -> bool { pos.halfmove_clock() >= 150 && pos.has_legal_moves() }

pub fn is_fivefold_repetition(pos: &Position) -> bool { pos.repetitions() >= 5 }

pub fn is_insufficient_material(pos: &Position) -> bool {
    has_insufficient_material(pos, Color::White) && has_insufficient_material(pos, Color::Black)
}

fn has_insufficient_material(pos: &Position, color: Color) -> bool {
    let b = pos.board();
    let ours = b.colors(color);
    let theirs = b.colors(!color);
    let heavy = b.pieces(Piece::Pawn) | b.pieces(Piece::Rook) | b.pieces(Piece::Queen);
    if !(ours & heavy).is_empty() { return false; }
    if !(ours & b.pieces(Piece::Knight)).is_empty() {
        // A lone knight mates only if the opponent has blockers other than queens.
        let blockers = theirs & !b.pieces(Piece::King) & !b.pieces(Piece::Queen);
        return ours.len() <= 2 && blockers.is_empty();
    }
    if !(ours & b.pieces(Piece::Bishop)).is_empty() {
        let bishops = b.pieces(Piece::Bishop);
        let (mut light, mut dark) = (false, false);
        for sq in bishops {
            if (sq.file() as usize + sq.rank() as usize) % 2 == 0 { dark = true; } else { light = true; }
        }
        let same_color = !(light && dark);
        return same_color && b.pieces(Piece::Pawn).is_empty() && b.pieces(Piece::Knight).is_empty();
    }
    true
}

/// Draws that stop the search, checked before checkmate.
pub fn is_search_draw(pos: &Position) -> bool {
    is_insufficient_material(pos) || is_stalemate(pos) || is_fifty_moves(pos) || is_fivefold_repetition(pos)
}

/// Winner if the side to move has been mated.
pub fn checkmate_winner(pos: &Position) -> Option<Color> {
    if is_checkmate(pos) { Some(!pos.side_to_move()) } else { None }
}

/// First rule that ends the game under `rules`, if any.
pub fn termination(pos: &Position, rules: Rules) -> Option<Termination> {
    if let Some(winner) = checkmate_winner(pos) { return Some(Termination::Checkmate { winner }); }
    if is_stalemate(pos) { return Some(Termination::Stalemate); }
    if is_insufficient_material(pos) { return Some(Termination::InsufficientMaterial); }
    if is_fifty_moves(pos) { return Some(Termination::FiftyMoves); }
    if rules.fivefold && is_fivefold_repetition(pos) { return Some(Termination::FivefoldRepetition); }
    None
}

pub fn is_over(pos: &Position, rules: Rules) -> bool { termination(pos, rules).is_some() }

/// Finished-game result string. The fifty-move rule alone leaves the game
/// without an outcome; seventy-five moves and fivefold repetition draw it.
pub fn outcome(pos: &Position) -> Option<&'static str> {
    if let Some(winner) = checkmate_winner(pos) {
        return Some(if winner == Color::White { WHITE_WINS } else { BLACK_WINS });
    }
    if is_insufficient_material(pos) || is_stalemate(pos) || is_seventyfive_moves(pos) || is_fivefold_repetition(pos) {
        return Some(DRAW);
    }
    None
}

/// Parse game result string to integer
/// Returns 1 for white win, 0 for draw, -1 for black win
pub fn parse_result(result: &str) -> Option<i8> {
    match result {
        WHITE_WINS => Some(1),
        DRAW => Some(0),
        BLACK_WINS => Some(-1),
        _ => None,
    }
}

pub fn result(pos: &Position) -> Option<i8> { outcome(pos).and_then(parse_result) }
