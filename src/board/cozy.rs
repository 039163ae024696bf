use cozy_chess::{Board as CozyBoard, Color, File, Move, Piece, Rank, Square};

/// Board state for self-play and search: a cozy-chess board plus the hashes of
/// every position reached so far, which repetition detection needs.
#[derive(Clone, Debug)]
pub struct Position {
    board: CozyBoard,
    history: Vec<u64>,
    // cozy-chess saturates its own clock at 100; the 75-move rule needs more.
    halfmoves: u32,
}

impl Position {
    pub fn startpos() -> Self { Self::from_board(CozyBoard::default()) }

    pub fn from_fen(fen: &str) -> Result<Self, String> {
        CozyBoard::from_fen(fen, false).map(Self::from_board).map_err(|e| format!("FEN error: {e:?}"))
    }

    pub fn from_board(board: CozyBoard) -> Self {
        let history = vec![board.hash()];
        let halfmoves = board.halfmove_clock() as u32;
        Self { board, history, halfmoves }
    }

    pub fn board(&self) -> &CozyBoard { &self.board }

    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        self.board.generate_moves(|ml| { moves.extend(ml); false });
        moves
    }

    pub fn has_legal_moves(&self) -> bool {
        let mut any = false;
        self.board.generate_moves(|ml| { any = !ml.is_empty(); any });
        any
    }

    /// Plays a move produced by `legal_moves`.
    pub fn play(&mut self, mv: Move) {
        let stm = self.board.side_to_move();
        let capture = self.board.color_on(mv.to) == Some(!stm);
        let pawn = self.board.piece_on(mv.from) == Some(Piece::Pawn);
        self.halfmoves = if capture || pawn { 0 } else { self.halfmoves + 1 };
        self.board.play_unchecked(mv);
        self.history.push(self.board.hash());
    }

    pub fn make_move_uci(&mut self, mv_uci: &str) -> Result<(), String> {
        let found = self.legal_moves().into_iter().find(|m| format!("{}", m) == mv_uci);
        if let Some(m) = found { self.play(m); Ok(()) } else { Err(format!("Illegal move: {}", mv_uci)) }
    }

    pub fn set_from_start_and_moves(moves: &[String]) -> Result<Self, String> {
        let mut pos = Self::startpos();
        for m in moves { pos.make_move_uci(m)?; }
        Ok(pos)
    }

    pub fn side_to_move(&self) -> Color { self.board.side_to_move() }

    pub fn white_to_move(&self) -> bool { self.board.side_to_move() == Color::White }

    pub fn in_check(&self) -> bool { !self.board.checkers().is_empty() }

    pub fn halfmove_clock(&self) -> u32 { self.halfmoves }

    /// Occurrences of the current position since the game started, this one included.
    pub fn repetitions(&self) -> usize {
        let current = self.board.hash();
        self.history.iter().filter(|&&h| h == current).count()
    }

    /// FEN-style piece letter on `sq`, uppercase for white.
    pub fn piece_char(&self, sq: Square) -> Option<char> {
        let piece = self.board.piece_on(sq)?;
        let color = self.board.color_on(sq)?;
        Some(piece_letter(piece, color))
    }

    /// Canonical board text: rank 8 first, squares separated by spaces, '.' for empty.
    pub fn text(&self) -> String {
        render_rows(|file, rank| self.piece_char(Square::new(File::index(file), Rank::index(rank))))
    }
}

pub fn piece_letter(piece: Piece, color: Color) -> char {
    let c = match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    };
    if color == Color::White { c.to_ascii_uppercase() } else { c }
}

/// Renders a board in canonical text order. `at(file, rank)` uses 0-based
/// indices with rank 0 being the first rank; rows are emitted rank 8 first.
pub fn render_rows<F: Fn(usize, usize) -> Option<char>>(at: F) -> String {
    let mut out = String::with_capacity(127);
    for rank in (0..8).rev() {
        for file in 0..8 {
            out.push(at(file, rank).unwrap_or('.'));
            if file < 7 { out.push(' '); }
        }
        if rank > 0 { out.push('\n'); }
    }
    out
}
