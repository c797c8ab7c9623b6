//! Chequer moves and their text notation.
//!
//! A [`Move`] holds up to four sub-moves. Indices are the mover's own:
//!
//! ```text
//! from: 0..=23 point, 24 bar
//! to:   0..=23 point, -1 off
//! ```
//!
//! In notation every index is shown one higher, so the bar is 25 and off
//! is 0, with `bar` and `off` as the usual spellings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Perspective, Side, BAR};
use crate::error::ParseMoveError;

pub const BAR_POINT: i8 = BAR as i8;
pub const OFF_POINT: i8 = -1;
pub const MAX_SUB_MOVES: usize = 4;

/// Most points a notation string may name, counting repeats.
const MAX_POINTS: usize = 8;

// ============================================================================
// SUB-MOVES AND MOVES
// ============================================================================

/// One chequer moving from one index to another.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct SubMove {
    pub from: i8,
    pub to: i8,
}

impl SubMove {
    #[inline]
    pub const fn new(from: i8, to: i8) -> SubMove {
        SubMove { from, to }
    }

    #[inline]
    pub const fn enters(self) -> bool {
        self.from == BAR_POINT
    }

    #[inline]
    pub const fn bears_off(self) -> bool {
        self.to < 0
    }
}

/// Up to four sub-moves, stored inline.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(into = "Vec<SubMove>", try_from = "Vec<SubMove>")]
pub struct Move {
    steps: [SubMove; MAX_SUB_MOVES],
    len: u8,
}

impl Move {
    #[inline]
    pub const fn new() -> Move {
        Move {
            steps: [SubMove::new(0, 0); MAX_SUB_MOVES],
            len: 0,
        }
    }

    /// # Panics
    ///
    /// If the move already has four sub-moves.
    #[inline]
    pub fn push(&mut self, step: SubMove) {
        assert!((self.len as usize) < MAX_SUB_MOVES, "a move has at most four sub-moves");
        self.steps[self.len as usize] = step;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[SubMove] {
        &self.steps[..self.len as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = SubMove> + '_ {
        self.as_slice().iter().copied()
    }

    /// Read the flat eight-integer form, stopping at the first negative
    /// source.
    pub fn from_raw(raw: &[i32; 8]) -> Move {
        let mut mv = Move::new();
        for pair in raw.chunks_exact(2) {
            if pair[0] < 0 {
                break;
            }
            mv.push(SubMove::new(pair[0] as i8, pair[1] as i8));
        }
        mv
    }

    /// Flat eight-integer form, padded with -1.
    pub fn to_raw(&self) -> [i32; 8] {
        let mut raw = [-1; 8];
        for (i, step) in self.iter().enumerate() {
            raw[2 * i] = step.from as i32;
            raw[2 * i + 1] = step.to as i32;
        }
        raw
    }

    /// Sort sub-moves by descending source, ties by descending destination,
    /// so that equal moves compare equal whatever order they were listed in.
    pub fn canonicalize(&mut self) {
        let n = self.len();
        self.steps[..n].sort_by(|a, b| (b.from, b.to).cmp(&(a.from, a.to)));
    }

    pub fn canonical(mut self) -> Move {
        self.canonicalize();
        self
    }
}

impl From<Move> for Vec<SubMove> {
    fn from(mv: Move) -> Vec<SubMove> {
        mv.as_slice().to_vec()
    }
}

impl TryFrom<Vec<SubMove>> for Move {
    type Error = ParseMoveError;

    fn try_from(steps: Vec<SubMove>) -> Result<Move, ParseMoveError> {
        if steps.len() > MAX_SUB_MOVES {
            return Err(ParseMoveError::TooManyMoves);
        }
        let mut mv = Move::new();
        steps.into_iter().for_each(|s| mv.push(s));
        Ok(mv)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_move_plain(None, self))
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Move, ParseMoveError> {
        parse_move(s)
    }
}

// ============================================================================
// FORMATTING
// ============================================================================

/// Index as shown to the user: bar 25, off 0.
#[inline]
fn display_point(index: i8) -> u8 {
    (index + 1) as u8
}

fn point_label(point: u8) -> String {
    match point {
        0 => "off".to_string(),
        25 => "bar".to_string(),
        n => n.to_string(),
    }
}

/// Whether the opponent has chequers on the mover's display point `point`.
#[inline]
fn opponent_on(board: &Board, point: u8) -> bool {
    (1..=24).contains(&point)
        && Perspective::for_side(Side::Mover).opposing(board, point as usize - 1) > 0
}

/// Notation such as `24/18 13/8` or `bar/22 6/off`, one `from/to` per
/// sub-move in the order given, with `*` after a sub-move that hits a blot.
///
/// Each hit is judged on the board as it stands before that sub-move, so
/// the sub-moves are replayed on a copy while formatting. `board` must be
/// the position before the move, seen by the side to move.
pub fn format_move(board: &Board, mv: &Move) -> String {
    let mut scratch = *board;
    let mover = Perspective::for_side(Side::Mover);
    let mut parts = Vec::with_capacity(mv.len());

    for step in mv.iter() {
        let hit = step.to >= 0 && mover.opposing(&scratch, step.to as usize) == 1;
        let mut text = format!(
            "{}/{}",
            point_label(display_point(step.from)),
            point_label(display_point(step.to))
        );
        if hit {
            text.push('*');
        }
        parts.push(text);
        match scratch.apply_step(step) {
            Ok(()) => {}
            // Formatting assumes a legal move; a failing step leaves the copy as is.
            Err(_) => continue,
        }
    }

    parts.join(" ")
}

/// Numeric notation (`25/22 6/0`) without aliases.
///
/// Without a board no hits are marked. With one, a destination holding an
/// opposing chequer gets `*` unless an earlier sub-move already landed there.
pub fn format_move_plain(board: Option<&Board>, mv: &Move) -> String {
    let steps = mv.as_slice();
    let mut parts = Vec::with_capacity(steps.len());

    for (i, step) in steps.iter().enumerate() {
        let mut text = format!("{}/{}", display_point(step.from), display_point(step.to));
        if let Some(board) = board {
            let first_landing = steps[..i].iter().all(|s| s.to != step.to);
            if step.to >= 0 && opponent_on(board, display_point(step.to)) && first_landing {
                text.push('*');
            }
        }
        parts.push(text);
    }

    parts.join(" ")
}

/// Compact notation: steps of one chequer are joined (`13/5`, or `13/8*/5`
/// when it hits on the way) and identical chequer moves are counted
/// (`8/5(2)`). Sub-moves are listed by descending source.
pub fn format_move_compact(board: &Board, mv: &Move) -> String {
    let mut steps: Vec<(u8, u8)> = mv
        .iter()
        .map(|s| (display_point(s.from), display_point(s.to)))
        .collect();
    steps.sort_by(|a, b| b.cmp(a));

    // Join consecutive steps of one chequer.
    let mut paths: Vec<Vec<u8>> = steps.iter().map(|&(from, to)| vec![from, to]).collect();
    let mut alive = vec![true; paths.len()];
    for i in 0..paths.len() {
        for j in i + 1..paths.len() {
            if !alive[i] || !alive[j] {
                continue;
            }
            let last = paths[i].len() - 1;
            let via = paths[i][last];
            if via != paths[j][0] {
                continue;
            }
            let next = paths[j][1];
            if opponent_on(board, via) {
                paths[i].push(next);
            } else {
                paths[i][last] = next;
            }
            alive[j] = false;
        }
    }

    // Count identical chequer moves.
    let mut groups: Vec<(Vec<u8>, usize)> = Vec::new();
    for (path, keep) in paths.into_iter().zip(alive) {
        if !keep {
            continue;
        }
        match groups.iter_mut().find(|(p, _)| *p == path) {
            Some((_, count)) => *count += 1,
            None => groups.push((path, 1)),
        }
    }

    let mut hit = [false; 26];
    let mut parts = Vec::with_capacity(groups.len());
    for (path, count) in &groups {
        let last = path.len() - 1;
        let mut text = point_label(path[0]);
        for &via in &path[1..last] {
            text.push('/');
            text.push_str(&point_label(via));
            text.push('*');
            hit[via as usize] = true;
        }
        let dest = path[last];
        text.push('/');
        text.push_str(&point_label(dest));
        if opponent_on(board, dest) && !hit[dest as usize] {
            text.push('*');
            hit[dest as usize] = true;
        }
        if *count > 1 {
            text.push_str(&format!("({})", count));
        }
        parts.push(text);
    }

    parts.join(" ")
}

// ============================================================================
// PARSING
// ============================================================================

/// Read a run of decimal digits starting at `pos`. Returns the value
/// (saturating) and the index after the last digit.
fn read_number(bytes: &[u8], mut pos: usize) -> (u32, usize) {
    let mut n: u32 = 0;
    while let Some(d) = bytes.get(pos).filter(|b| b.is_ascii_digit()) {
        n = n.saturating_mul(10).saturating_add((d - b'0') as u32);
        pos += 1;
    }
    (n, pos)
}

/// If the bytes after `pos` spell `rest` (case-insensitively, possibly only
/// partly), skip them. Returns the index of the last byte consumed.
fn skip_word(bytes: &[u8], mut pos: usize, rest: &[u8]) -> usize {
    for &expected in rest {
        match bytes.get(pos + 1) {
            Some(b) if b.to_ascii_lowercase() == expected => pos += 1,
            _ => break,
        }
    }
    pos
}

/// Parse move notation into a canonically ordered [`Move`].
///
/// Accepts `24/18 13/8`, `bar/22*`, `6/off`, chained points (`24/18/13`),
/// repeat counts (`8/5(2)`), `o`, `off` or `-` for off and `b` or `bar`
/// for the bar. `*`, `,` and `)` are ignored. Empty text is an empty move.
pub fn parse_move(text: &str) -> Result<Move, ParseMoveError> {
    let bytes = text.as_bytes();
    let mut points = [0u8; MAX_POINTS];
    let mut count = 0usize;
    // slash[c]: a '/' was read after the first c points.
    let mut slash = [false; MAX_POINTS + 1];
    let mut pos = 0;

    while pos < bytes.len() {
        let ch = bytes[pos];

        if ch.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        if ch.is_ascii_digit() {
            if count == MAX_POINTS {
                return Err(ParseMoveError::TooManyPoints);
            }
            let (n, next) = read_number(bytes, pos);
            if n > 25 {
                return Err(ParseMoveError::InvalidPoint(n));
            }
            points[count] = n as u8;
            count += 1;
            pos = next;
            continue;
        }

        match ch {
            b'o' | b'O' | b'-' => {
                if count == MAX_POINTS {
                    return Err(ParseMoveError::TooManyPoints);
                }
                points[count] = 0;
                count += 1;
                if ch != b'-' {
                    pos = skip_word(bytes, pos, b"ff");
                }
            }
            b'b' | b'B' => {
                if count == MAX_POINTS {
                    return Err(ParseMoveError::TooManyPoints);
                }
                points[count] = 25;
                count += 1;
                pos = skip_word(bytes, pos, b"ar");
            }
            b'/' => {
                if count == 0 || slash[count] {
                    return Err(ParseMoveError::MisplacedSlash);
                }
                slash[count] = true;
            }
            b'*' | b',' | b')' => {}
            b'(' => {
                let (n, next) = read_number(bytes, pos + 1);
                if next == pos + 1 || n < 2 || count < 2 || slash[count] {
                    return Err(ParseMoveError::InvalidRepeat);
                }
                let repeat = (n - 1) as usize;
                let begin = (0..count)
                    .rev()
                    .find(|&i| !slash[i])
                    .ok_or(ParseMoveError::InvalidRepeat)?;
                let end = count;
                let needed = (end - begin).saturating_mul(repeat).saturating_add(count);
                if needed > MAX_POINTS {
                    return Err(ParseMoveError::TooManyMoves);
                }
                for _ in 0..repeat {
                    for j in begin..end {
                        if slash[j] {
                            slash[count] = true;
                        }
                        points[count] = points[j];
                        count += 1;
                    }
                }
                pos = next;
                continue;
            }
            _ => {
                let c = text[pos..].chars().next().unwrap_or('?');
                return Err(ParseMoveError::UnexpectedChar(c));
            }
        }
        pos += 1;
    }

    if slash[count] {
        return Err(ParseMoveError::TrailingSlash);
    }

    // Expand chains: in a/b/c the middle point ends one sub-move and
    // starts the next.
    let mut flat = [0u8; MAX_POINTS];
    let mut i = 0usize;
    for j in 0..count {
        if i == MAX_POINTS {
            return Err(ParseMoveError::TooManyMoves);
        }
        let is_dest = i % 2 == 1;
        if (is_dest && points[j] == 25) || (!is_dest && points[j] == 0) {
            return Err(ParseMoveError::OffOrBar);
        }
        flat[i] = points[j];
        if is_dest && slash[j + 1] {
            if i == MAX_POINTS - 1 {
                return Err(ParseMoveError::TooManyMoves);
            }
            if points[j] == 0 || points[j] == 25 {
                return Err(ParseMoveError::OffOrBar);
            }
            i += 1;
            flat[i] = points[j];
        }
        i += 1;
    }

    if i % 2 == 1 {
        return Err(ParseMoveError::Incomplete);
    }

    let mut mv = Move::new();
    for pair in flat[..i].chunks_exact(2) {
        mv.push(SubMove::new(pair[0] as i8 - 1, pair[1] as i8 - 1));
    }
    Ok(mv.canonical())
}

// ============================================================================
// TESTS
// ============================================================================
