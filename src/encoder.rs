use crate::board::Position;
use cozy_chess::{File, Rank, Square};
use thiserror::Error;

/// 12 piece planes of 64 squares plus the side-to-move slot.
pub const FEATURE_LEN: usize = 12 * 64 + 1;
pub const SIDE_SLOT: usize = 12 * 64;
/// Bytes needed to store the 768 plane bits.
pub const PACKED_PLANES: usize = 96;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodingError {
    #[error("board text has {found} squares, expected 64")]
    WrongSquareCount { found: usize },
}

/// Dense input vector of the value network.
#[derive(Clone, PartialEq)]
pub struct FeatureVector(Box<[f32; FEATURE_LEN]>);

impl FeatureVector {
    pub fn zeros() -> Self { Self(Box::new([0.0; FEATURE_LEN])) }

    pub fn as_slice(&self) -> &[f32] { &self.0[..] }

    pub fn len(&self) -> usize { FEATURE_LEN }

    pub fn is_empty(&self) -> bool { false }

    pub fn white_to_move(&self) -> bool { self.0[SIDE_SLOT] != 0.0 }

    /// Plane bits packed LSB-first, plus the side byte.
    pub fn to_bits(&self) -> ([u8; PACKED_PLANES], u8) {
        let mut bits = [0u8; PACKED_PLANES];
        for (i, &v) in self.0[..SIDE_SLOT].iter().enumerate() {
            if v != 0.0 { bits[i / 8] |= 1 << (i % 8); }
        }
        (bits, self.white_to_move() as u8)
    }

    pub fn from_bits(bits: &[u8; PACKED_PLANES], side: u8) -> Self {
        let mut fv = Self::zeros();
        for i in 0..SIDE_SLOT {
            if bits[i / 8] & (1 << (i % 8)) != 0 { fv.0[i] = 1.0; }
        }
        fv.0[SIDE_SLOT] = if side != 0 { 1.0 } else { 0.0 };
        fv
    }
}

impl std::fmt::Debug for FeatureVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let set: Vec<usize> = (0..SIDE_SLOT).filter(|&i| self.0[i] != 0.0).collect();
        f.debug_struct("FeatureVector").field("planes_set", &set).field("side", &self.0[SIDE_SLOT]).finish()
    }
}

impl std::ops::Index<usize> for FeatureVector {
    type Output = f32;
    fn index(&self, i: usize) -> &f32 { &self.0[i] }
}

/// Identity code of a board character: white K,Q,R,B,N,P -> 1..6,
/// black k,q,r,b,n,p -> 7..12, anything else 0.
pub fn piece_code(c: char) -> u8 {
    match c {
        'K' => 1, 'Q' => 2, 'R' => 3, 'B' => 4, 'N' => 5, 'P' => 6,
        'k' => 7, 'q' => 8, 'r' => 9, 'b' => 10, 'n' => 11, 'p' => 12,
        _ => 0,
    }
}

/// Per-square identity codes in canonical text order (a8..h8, ..., a1..h1).
pub fn square_codes(pos: &Position) -> [u8; 64] {
    let mut codes = [0u8; 64];
    for row in 0..8 {
        let rank = Rank::index(7 - row);
        for file in 0..8 {
            let sq = Square::new(File::index(file), rank);
            codes[row * 8 + file] = pos.piece_char(sq).map_or(0, piece_code);
        }
    }
    codes
}

/// Codes parsed from canonical board text. Spaces and newlines separate squares;
/// every other character occupies one square.
pub fn square_codes_from_text(text: &str) -> Result<[u8; 64], EncodingError> {
    let mut codes = [0u8; 64];
    let mut found = 0usize;
    for c in text.chars().filter(|&c| c != ' ' && c != '\n') {
        if found < 64 { codes[found] = piece_code(c); }
        found += 1;
    }
    if found != 64 { return Err(EncodingError::WrongSquareCount { found }); }
    Ok(codes)
}

pub fn encode_codes(codes: &[u8; 64], white_to_move: bool) -> FeatureVector {
    let mut fv = FeatureVector::zeros();
    for (sq, &code) in codes.iter().enumerate() {
        if code != 0 { fv.0[(code as usize - 1) * 64 + sq] = 1.0; }
    }
    fv.0[SIDE_SLOT] = if white_to_move { 1.0 } else { 0.0 };
    fv
}

pub fn encode(pos: &Position, white_to_move: bool) -> FeatureVector {
    encode_codes(&square_codes(pos), white_to_move)
}

pub fn encode_text(text: &str, white_to_move: bool) -> Result<FeatureVector, EncodingError> {
    Ok(encode_codes(&square_codes_from_text(text)?, white_to_move))
}
