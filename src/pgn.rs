use crate::board::cozy::render_rows;
use crate::encoder::encode_text;
use crate::outcome::parse_result;
use crate::samples::LabeledSample;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use pgn_reader::{BufferedReader, RawHeader, SanPlus, Skip, Visitor};
use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Position, Square};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Which games and positions of a PGN archive become samples.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PgnFilter {
    /// Both players need at least this rating.
    pub min_elo: u32,
    /// The Event header must contain one of these.
    pub events: Vec<String>,
    /// Sample the positions after the last N plies.
    pub last_plies: usize,
    /// Skip positions reached before this (0-based) ply.
    pub min_ply: usize,
}

impl Default for PgnFilter {
    fn default() -> Self {
        Self { min_elo: 1700, events: vec!["Classical".into(), "Blitz".into()], last_plies: 1, min_ply: 21 }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MineStats {
    pub games_read: usize,
    pub games_kept: usize,
    pub games_broken: usize,
    pub samples: usize,
}

pub struct MiningVisitor<'a> {
    filter: &'a PgnFilter,
    event: String,
    white_elo: Option<u32>,
    black_elo: Option<u32>,
    result: Option<i8>,
    accepted: bool,
    broken: bool,
    positions: Vec<Chess>,
}

impl<'a> MiningVisitor<'a> {
    pub fn new(filter: &'a PgnFilter) -> Self {
        Self {
            filter,
            event: String::new(),
            white_elo: None,
            black_elo: None,
            result: None,
            accepted: false,
            broken: false,
            positions: vec![Chess::default()],
        }
    }

    fn accepts_headers(&self) -> bool {
        let elo_ok = |e: Option<u32>| e.map_or(false, |e| e >= self.filter.min_elo);
        elo_ok(self.white_elo)
            && elo_ok(self.black_elo)
            && self.filter.events.iter().any(|ev| self.event.contains(ev.as_str()))
            && self.result.is_some()
    }
}

/// Outcome of one game: None when the game was filtered out or unreadable.
pub type MinedGame = Option<Vec<LabeledSample>>;

impl Visitor for MiningVisitor<'_> {
    type Result = MinedGame;

    fn begin_game(&mut self) {
        self.event.clear();
        self.white_elo = None;
        self.black_elo = None;
        self.result = None;
        self.accepted = false;
        self.broken = false;
        self.positions.truncate(1);
    }

    fn header(&mut self, key: &[u8], value: RawHeader<'_>) {
        let value = String::from_utf8_lossy(value.as_bytes());
        match key {
            b"Event" => self.event = value.to_string(),
            b"WhiteElo" => self.white_elo = value.trim().parse().ok(),
            b"BlackElo" => self.black_elo = value.trim().parse().ok(),
            b"Result" => self.result = parse_result(value.trim()),
            _ => {}
        }
    }

    fn end_headers(&mut self) -> Skip {
        self.accepted = self.accepts_headers();
        Skip(!self.accepted)
    }

    fn begin_variation(&mut self) -> Skip {
        Skip(true)
    }

    fn san(&mut self, san_plus: SanPlus) {
        if self.broken { return; }
        let Some(pos) = self.positions.last().cloned() else { return };
        let next = san_plus.san.to_move(&pos).ok().and_then(|m| pos.play(&m).ok());
        match next {
            Some(p) => self.positions.push(p),
            None => self.broken = true,
        }
    }

    fn end_game(&mut self) -> Self::Result {
        if !self.accepted || self.broken { return None; }
        let result = self.result?;
        let plies = self.positions.len() - 1;
        let first = plies.saturating_sub(self.filter.last_plies).max(self.filter.min_ply);
        let samples = (first..plies).filter_map(|i| {
            let pos = &self.positions[i + 1];
            encode_text(&board_text(pos), pos.turn().is_white()).ok()
        });
        Some(samples.map(|f| LabeledSample::new(result, f)).collect())
    }
}

/// Canonical board text of a shakmaty position.
pub fn board_text(pos: &Chess) -> String {
    let board = pos.board();
    render_rows(|file, rank| board.piece_at(Square::new((rank * 8 + file) as u32)).map(|p| p.char()))
}

pub fn mine_reader<R: Read>(reader: R, filter: &PgnFilter, max_samples: Option<usize>, progress: Option<&ProgressBar>) -> Result<(Vec<LabeledSample>, MineStats)> {
    let mut games = BufferedReader::new(reader);
    let mut visitor = MiningVisitor::new(filter);
    let mut samples = Vec::new();
    let mut stats = MineStats::default();
    while let Some(mined) = games.read_game(&mut visitor).context("read PGN game")? {
        stats.games_read += 1;
        match mined {
            Some(s) => { stats.games_kept += 1; samples.extend(s); }
            None if visitor.accepted => stats.games_broken += 1,
            None => {}
        }
        if let Some(pb) = progress { pb.set_position(stats.games_read as u64); }
        if let Some(max) = max_samples {
            if samples.len() >= max {
                samples.truncate(max);
                break;
            }
        }
    }
    stats.samples = samples.len();
    Ok((samples, stats))
}

pub fn mine_file<P: AsRef<Path>>(path: P, filter: &PgnFilter, max_samples: Option<usize>) -> Result<(Vec<LabeledSample>, MineStats)> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open PGN: {}", path.display()))?;
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {pos} games {elapsed}").unwrap_or_else(|_| ProgressStyle::default_spinner()));
    let out = mine_reader(f, filter, max_samples, Some(&pb));
    pb.finish_and_clear();
    let (samples, stats) = out?;
    info!("{}: read {} games, kept {}, {} unreadable, {} samples", path.display(), stats.games_read, stats.games_kept, stats.games_broken, stats.samples);
    Ok((samples, stats))
}

/// Downsamples every result class to the size of the rarest present class,
/// dropping the earliest samples of larger classes. Returns how many were removed.
pub fn balance_classes(samples: &mut Vec<LabeledSample>) -> usize {
    let mut counts = [0usize; 3];
    for s in samples.iter() { counts[class_index(s.result)] += 1; }
    let Some(min) = counts.iter().copied().filter(|&c| c > 0).min() else { return 0 };
    let mut excess = counts.map(|c| c.saturating_sub(min));
    let before = samples.len();
    samples.retain(|s| {
        let e = &mut excess[class_index(s.result)];
        if *e > 0 { *e -= 1; false } else { true }
    });
    before - samples.len()
}

fn class_index(result: i8) -> usize { (result.clamp(-1, 1) + 1) as usize }
