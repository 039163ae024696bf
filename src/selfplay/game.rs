use crate::board::Position;
use crate::encoder::encode;
use crate::outcome::{is_over, result, Rules};
use crate::samples::LabeledSample;
use cozy_chess::{Board, Move};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEnd {
    /// +1 white won, -1 black won.
    Decisive(i8),
    Drawn,
    /// Ply cap reached, or the game stopped without a recorded outcome.
    Abandoned,
}

/// Position reached by a random (exploration) ply.
#[derive(Clone, Debug)]
pub struct RecordedPosition {
    pub board: Board,
    pub white_to_move: bool,
}

#[derive(Clone, Debug)]
pub struct GameRecord {
    pub moves: Vec<String>,
    pub recorded: Vec<RecordedPosition>,
    pub plies: usize,
    pub end: GameEnd,
}

impl GameRecord {
    /// 1 white win, 0 draw, -1 black win; None when abandoned.
    pub fn result(&self) -> Option<i8> {
        match self.end {
            GameEnd::Decisive(r) => Some(r),
            GameEnd::Drawn => Some(0),
            GameEnd::Abandoned => None,
        }
    }

    pub fn is_decisive(&self) -> bool { matches!(self.end, GameEnd::Decisive(_)) }
}

/// One self-play game in progress. Searched plies advance the board only;
/// random plies also append the reached position to the record.
pub struct SelfPlayGame {
    pos: Position,
    white_to_move: bool,
    rules: Rules,
    moves: Vec<String>,
    recorded: Vec<RecordedPosition>,
}

impl SelfPlayGame {
    pub fn new(start: Position, rules: Rules) -> Self {
        let white_to_move = start.white_to_move();
        Self { pos: start, white_to_move, rules, moves: Vec::new(), recorded: Vec::new() }
    }

    pub fn position(&self) -> &Position { &self.pos }

    pub fn white_to_move(&self) -> bool { self.white_to_move }

    pub fn plies(&self) -> usize { self.moves.len() }

    pub fn recorded_len(&self) -> usize { self.recorded.len() }

    pub fn is_over(&self) -> bool { is_over(&self.pos, self.rules) }

    pub fn play_recorded(&mut self, mv: Move) {
        self.advance(mv);
        self.recorded.push(RecordedPosition { board: self.pos.board().clone(), white_to_move: self.white_to_move });
    }

    pub fn play_searched(&mut self, mv: Move) { self.advance(mv); }

    /// Plays a UCI move, recorded or not; used to replay scripted games.
    pub fn play_uci(&mut self, uci: &str, record: bool) -> Result<(), String> {
        let mv = self.pos.legal_moves().into_iter().find(|m| format!("{}", m) == uci)
            .ok_or_else(|| format!("Illegal move: {}", uci))?;
        if record { self.play_recorded(mv); } else { self.play_searched(mv); }
        Ok(())
    }

    pub fn finish(self) -> GameRecord {
        let end = if !self.is_over() {
            GameEnd::Abandoned
        } else {
            match result(&self.pos) {
                Some(0) => GameEnd::Drawn,
                Some(r) => GameEnd::Decisive(r),
                None => GameEnd::Abandoned,
            }
        };
        let plies = self.moves.len();
        GameRecord { moves: self.moves, recorded: self.recorded, plies, end }
    }

    fn advance(&mut self, mv: Move) {
        self.moves.push(format!("{}", mv));
        self.pos.play(mv);
        self.white_to_move = !self.white_to_move;
    }
}

/// Labels every recorded position of a decisive game with its result. Drawn
/// and abandoned games yield nothing.
pub fn label_game(record: &GameRecord, stamp_white_to_move: bool) -> Vec<LabeledSample> {
    let GameEnd::Decisive(r) = record.end else { return Vec::new() };
    record.recorded.iter().map(|rp| {
        let pos = Position::from_board(rp.board.clone());
        let side = stamp_white_to_move || rp.white_to_move;
        LabeledSample::new(r, encode(&pos, side))
    }).collect()
}
