//! The `board:` text record.
//!
//! Fifty-two colon separated fields follow the tag:
//!
//! ```text
//! 0-1    player name, opponent name
//! 2-4    match length, player score, opponent score
//! 5-30   26 board values: a bar, points 1-24, the other bar
//! 31     turn
//! 32-35  player dice, opponent dice
//! 36-39  cube, player may double, opponent may double, doubled
//! 40-41  colour, direction
//! 42-43  home and bar indices (0, 25)
//! 44-45  chequers off for player and opponent
//! 46-49  unused here
//! 50     Crawford flag
//! 51     unused here
//! ```
//!
//! The record is written from player one's seat: "player" is
//! [`Player::One`], colour 1, direction -1, and player one's chequers are
//! positive. Records from servers that use the other direction decode too.
//!
//! Decoding parses the whole record into a [`WireRecord`] first. Nothing
//! the caller holds changes unless every field is valid.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Perspective, Player, Side, Variant, BAR, MAX_CHEQUERS, POINTS};
use crate::error::WireError;
use crate::match_state::{record_name, truncate_name, CubeOwner, MatchState};

pub const TAG: &str = "board:";
pub const FIELDS: usize = 52;

/// Match length some servers send for an unlimited match.
pub const UNLIMITED_MATCH: u32 = 9999;

const NAME: usize = 0;
const OPPONENT: usize = 1;
const MATCH_TO: usize = 2;
const SCORE: usize = 3;
const OPPONENT_SCORE: usize = 4;
const BOARD: usize = 5;
const TURN: usize = 31;
const DICE: usize = 32;
const OPPONENT_DICE: usize = 34;
const CUBE: usize = 36;
const MAY_DOUBLE: usize = 37;
const OPPONENT_MAY_DOUBLE: usize = 38;
const DOUBLED: usize = 39;
const COLOUR: usize = 40;
const DIRECTION: usize = 41;
const OFF: usize = 44;
const OPPONENT_OFF: usize = 45;
const CRAWFORD: usize = 50;

/// The fields of a `board:` record, parsed but not yet interpreted.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct WireRecord {
    pub name: String,
    pub opponent: String,
    pub match_to: u32,
    pub score: u32,
    pub opponent_score: u32,
    pub points: [i32; 26],
    pub turn: i32,
    pub dice: [u8; 2],
    pub opponent_dice: [u8; 2],
    pub cube: u32,
    pub may_double: bool,
    pub opponent_may_double: bool,
    /// Sign says who must answer: -1 the player, 1 the opponent.
    pub doubled: i32,
    pub colour: i32,
    pub direction: i32,
    pub off: u32,
    pub opponent_off: u32,
    pub crawford: bool,
}

struct Fields<'a>(Vec<&'a str>);

impl Fields<'_> {
    fn int(&self, field: usize) -> Result<i32, WireError> {
        let text = self.0[field];
        text.trim()
            .parse()
            .map_err(|_| WireError::InvalidNumber { field, text: text.to_string() })
    }

    fn unsigned(&self, field: usize) -> Result<u32, WireError> {
        let n = self.int(field)?;
        u32::try_from(n).map_err(|_| WireError::InvalidNumber { field, text: self.0[field].to_string() })
    }

    fn die(&self, field: usize) -> Result<u8, WireError> {
        match self.int(field)? {
            n @ 0..=6 => Ok(n as u8),
            _ => Err(WireError::InvalidNumber { field, text: self.0[field].to_string() }),
        }
    }

    fn flag(&self, field: usize) -> Result<bool, WireError> {
        Ok(self.int(field)? != 0)
    }
}

impl WireRecord {
    /// Parse the fields of `text`. Trailing line breaks and fields past
    /// the 52nd are ignored.
    pub fn parse(text: &str) -> Result<WireRecord, WireError> {
        let body = text
            .trim_end_matches(['\r', '\n'])
            .strip_prefix(TAG)
            .ok_or(WireError::MissingTag)?;
        let fields = Fields(body.split(':').collect());
        if fields.0.len() < FIELDS {
            return Err(WireError::MissingField { field: fields.0.len() });
        }

        let mut points = [0i32; 26];
        for (i, value) in points.iter_mut().enumerate() {
            *value = fields.int(BOARD + i)?;
        }

        Ok(WireRecord {
            name: truncate_name(fields.0[NAME]),
            opponent: truncate_name(fields.0[OPPONENT]),
            match_to: fields.unsigned(MATCH_TO)?,
            score: fields.unsigned(SCORE)?,
            opponent_score: fields.unsigned(OPPONENT_SCORE)?,
            points,
            turn: fields.int(TURN)?,
            dice: [fields.die(DICE)?, fields.die(DICE + 1)?],
            opponent_dice: [fields.die(OPPONENT_DICE)?, fields.die(OPPONENT_DICE + 1)?],
            cube: fields.unsigned(CUBE)?,
            may_double: fields.flag(MAY_DOUBLE)?,
            opponent_may_double: fields.flag(OPPONENT_MAY_DOUBLE)?,
            doubled: fields.int(DOUBLED)?,
            colour: fields.int(COLOUR)?,
            direction: fields.int(DIRECTION)?,
            off: fields.int(OFF)?.unsigned_abs(),
            opponent_off: fields.int(OPPONENT_OFF)?.unsigned_abs(),
            crawford: fields.flag(CRAWFORD)?,
        })
    }

    /// The record describing `board` (mover relative) and `ms`.
    pub fn from_position(board: &Board, ms: &MatchState) -> WireRecord {
        let by_player = board.seated(ms.mover);
        let player = Perspective::for_side(Side::Mover);

        let mut points = [0i32; 26];
        points[0] = -(by_player.0[0][BAR] as i32);
        for i in 0..POINTS {
            let theirs = player.opposing(&by_player, i);
            points[i + 1] = if theirs > 0 { -(theirs as i32) } else { player.own(&by_player, i) as i32 };
        }
        points[25] = by_player.0[1][BAR] as i32;

        let no_game = ms.turn.is_none();
        let doubled = match (ms.doubled, ms.turn) {
            (false, _) => 0,
            (true, Some(Player::One)) => -1,
            (true, _) => 1,
        };

        WireRecord {
            name: record_name(ms.name(Player::One), ':'),
            opponent: record_name(ms.name(Player::Zero), ':'),
            match_to: ms.match_to,
            score: ms.score_of(Player::One),
            opponent_score: ms.score_of(Player::Zero),
            points,
            turn: if ms.mover == Player::One { 1 } else { -1 },
            dice: ms.dice,
            opponent_dice: ms.dice,
            cube: if no_game { 1 } else { ms.cube },
            may_double: no_game || ms.cube_owner.allows(Player::One),
            opponent_may_double: no_game || ms.cube_owner.allows(Player::Zero),
            doubled,
            colour: 1,
            direction: -1,
            off: by_player.off(Side::Mover, ms.variant),
            opponent_off: by_player.off(Side::Opponent, ms.variant),
            crawford: ms.crawford,
        }
    }

    /// Interpret the record as a fresh position.
    pub fn position(&self) -> Result<(Board, MatchState), WireError> {
        let mut ms = MatchState::default();
        let board = self.interpret(&mut ms)?;
        Ok((board, ms))
    }

    /// Overwrite `board` and the fields of `ms` the record carries. Jacoby,
    /// beavers, cube use and post-Crawford are left as they are. On error
    /// neither argument changes.
    pub fn apply_to(&self, board: &mut Board, ms: &mut MatchState) -> Result<(), WireError> {
        let mut scratch = ms.clone();
        let decoded = self.interpret(&mut scratch)?;
        *board = decoded;
        *ms = scratch;
        Ok(())
    }

    fn interpret(&self, ms: &mut MatchState) -> Result<Board, WireError> {
        let match_to = if self.match_to == UNLIMITED_MATCH { 0 } else { self.match_to };
        if match_to > 0 && (match_to <= self.score || match_to <= self.opponent_score) {
            return Err(WireError::ScoreOutOfRange);
        }
        for (field, value) in [(TURN, self.turn), (COLOUR, self.colour), (DIRECTION, self.direction)] {
            if value == 0 {
                return Err(WireError::ZeroField { field });
            }
        }
        if self.cube == 0 {
            return Err(WireError::ZeroField { field: CUBE });
        }

        let by_player = self.chequers()?;
        let total = by_player.chequers(Side::Mover) + self.off;
        if total != by_player.chequers(Side::Opponent) + self.opponent_off {
            return Err(WireError::InconsistentBoard);
        }
        let variant = if ms.variant.chequers() as u32 == total {
            ms.variant
        } else {
            Variant::from_chequers(total).ok_or(WireError::InconsistentBoard)?
        };

        let mover = if self.turn * self.colour > 0 { Player::One } else { Player::Zero };
        let mut answering = match self.doubled.signum() {
            -1 => Some(Player::One),
            1 => Some(Player::Zero),
            _ => None,
        };
        let cube_owner = match (self.may_double, self.opponent_may_double) {
            (true, false) => CubeOwner::Owned(Player::One),
            (false, true) => CubeOwner::Owned(Player::Zero),
            (true, true) => CubeOwner::Centered,
            (false, false) => {
                // Neither may double: a double is pending.
                answering.get_or_insert(mover.opponent());
                CubeOwner::Centered
            }
        };

        ms.names = [self.opponent.clone(), self.name.clone()];
        ms.match_to = match_to;
        ms.score = [self.opponent_score, self.score];
        ms.cube = self.cube;
        ms.cube_owner = cube_owner;
        ms.mover = mover;
        ms.turn = Some(answering.unwrap_or(mover));
        ms.doubled = answering.is_some();
        ms.dice = if self.dice[0] == 0 { self.opponent_dice } else { self.dice };
        ms.crawford = self.crawford;
        ms.variant = variant;

        Ok(by_player.seated(mover))
    }

    /// Board with player one in array 1, honouring colour and direction.
    fn chequers(&self) -> Result<Board, WireError> {
        let count = |v: i32| -> Result<u8, WireError> {
            u8::try_from(v.unsigned_abs())
                .ok()
                .filter(|&n| n as u32 <= MAX_CHEQUERS)
                .ok_or(WireError::InconsistentBoard)
        };

        let (player_bar, opponent_bar) = if self.direction < 0 {
            (self.points[25], self.points[0])
        } else {
            (self.points[0], self.points[25])
        };

        let mut board = Board::empty();
        for i in 0..POINTS {
            let v = if self.direction < 0 { self.points[i + 1] } else { self.points[POINTS - i] };
            let n = count(v)?;
            if v * self.colour > 0 {
                board.0[1][i] = n;
            } else if v * self.colour < 0 {
                board.0[0][Perspective::mirror(i)] = n;
            }
        }
        board.0[1][BAR] = count(player_bar)?;
        board.0[0][BAR] = count(opponent_bar)?;
        Ok(board)
    }
}

impl fmt::Display for WireRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}:{}:{}:{}",
            TAG,
            self.name.replace(':', "_"),
            self.opponent.replace(':', "_"),
            self.match_to,
            self.score,
            self.opponent_score
        )?;
        for value in self.points {
            write!(f, ":{}", value)?;
        }
        write!(
            f,
            ":{}:{}:{}:{}:{}:{}:{}:{}:{}:{}:{}:0:25:{}:{}:0:0:0:0:{}:0",
            self.turn,
            self.dice[0],
            self.dice[1],
            self.opponent_dice[0],
            self.opponent_dice[1],
            self.cube,
            self.may_double as i32,
            self.opponent_may_double as i32,
            self.doubled,
            self.colour,
            self.direction,
            self.off,
            -(self.opponent_off as i64),
            self.crawford as i32
        )
    }
}

/// Encode a position as a `board:` record.
pub fn encode(board: &Board, ms: &MatchState) -> String {
    WireRecord::from_position(board, ms).to_string()
}

/// Decode a `board:` record into a fresh board and state.
pub fn decode(text: &str) -> Result<(Board, MatchState), WireError> {
    WireRecord::parse(text)?.position()
}

/// Decode a `board:` record over an existing board and state. On error
/// neither is touched.
pub fn decode_into(text: &str, board: &mut Board, ms: &mut MatchState) -> Result<(), WireError> {
    WireRecord::parse(text)?.apply_to(board, ms)
}
