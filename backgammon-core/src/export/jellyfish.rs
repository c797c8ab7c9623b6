//! Jellyfish position files (`.pos`).
//!
//! Layout, all integers i16 little-endian:
//! - Version (126), caution, unused
//! - Cube use, Jacoby, beavers (versions 125 and 126 only)
//! - Cube value, owner + 1 (0 centred, 1 player zero, 2 player one)
//! - On roll: 0 no game, player + 1 after rolling, player + 3 before
//! - Moves left, moves right, unused
//! - 1 for a match or 3 for money, opponent kind, level
//! - Match length, two scores
//! - Two names: length byte then bytes
//! - Swap dice, Crawford state (1 none, 2 Crawford, 3 post-Crawford),
//!   played-last flag, last move (length byte then bytes)
//! - Two dice
//! - 26 pairs (current, previous) each stored with 20 added: player one's
//!   bar, then the points from player one's 24-point down to point 1, then
//!   player zero's bar. Player one's chequers are positive.

use std::io::{self, Read, Write};

use crate::board::{Board, Perspective, Player, Side, Variant, BAR, MAX_CHEQUERS, POINTS};
use crate::error::{ExportError, ImportError};
use crate::match_state::{truncate_name, CubeOwner, MatchState};

pub const VERSION: i16 = 126;
const OLDEST_VERSION: i16 = 124;
const BOARD_OFFSET: i16 = 20;
const LEVEL: i16 = 7;
const MATCH: i16 = 1;
const MONEY: i16 = 3;
/// Opponent kind written on export: the second player is an engine.
const OPPONENT_ENGINE: i16 = 2;

#[inline]
fn int16(n: u32) -> i16 {
    n.min(i16::MAX as u32) as i16
}

fn write_i16<W: Write>(writer: &mut W, n: i16) -> io::Result<()> {
    writer.write_all(&n.to_le_bytes())
}

fn write_text<W: Write>(writer: &mut W, text: &str) -> io::Result<()> {
    let bytes = text.as_bytes();
    let len = bytes.len().min(u8::MAX as usize);
    writer.write_all(&[len as u8])?;
    writer.write_all(&bytes[..len])
}

fn read_i16<R: Read>(reader: &mut R) -> io::Result<i16> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(i16::from_le_bytes(buf))
}

fn read_text<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut len = [0u8; 1];
    reader.read_exact(&mut len)?;
    let mut bytes = vec![0u8; len[0] as usize];
    reader.read_exact(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// The 26 board values, player one positive.
fn board_values(by_player: &Board) -> [i16; 26] {
    let one = Perspective::for_side(Side::Mover);
    let mut values = [0i16; 26];
    values[0] = by_player.0[1][BAR] as i16;
    for k in 1..=POINTS {
        let point = POINTS - k;
        let theirs = one.opposing(by_player, point) as i16;
        values[k] = if theirs > 0 { -theirs } else { one.own(by_player, point) as i16 };
    }
    values[25] = -(by_player.0[0][BAR] as i16);
    values
}

/// Write `board` (seen by `ms.mover`) as a version 126 file.
///
/// A pending double is not recorded; the player on roll is written as
/// the one to act.
pub fn write_jellyfish<W: Write>(mut writer: W, board: &Board, ms: &MatchState) -> Result<(), ExportError> {
    let w = &mut writer;

    write_i16(w, VERSION)?;
    write_i16(w, 0)?;
    write_i16(w, 0)?;
    write_i16(w, ms.cube_use as i16)?;
    write_i16(w, ms.jacoby as i16)?;
    write_i16(w, ms.beavers as i16)?;

    write_i16(w, int16(ms.cube))?;
    let owner = match ms.cube_owner {
        CubeOwner::Centered => 0,
        CubeOwner::Owned(p) => p.index() as i16 + 1,
    };
    write_i16(w, owner)?;

    let on_roll = match ms.turn {
        None => 0,
        Some(p) if ms.rolled() => p.index() as i16 + 1,
        Some(p) => p.index() as i16 + 3,
    };
    write_i16(w, on_roll)?;
    write_i16(w, 0)?;
    write_i16(w, 0)?;
    write_i16(w, 0)?;

    write_i16(w, if ms.is_match() { MATCH } else { MONEY })?;
    write_i16(w, OPPONENT_ENGINE)?;
    write_i16(w, LEVEL)?;
    write_i16(w, int16(ms.match_to))?;
    if ms.is_match() {
        write_i16(w, int16(ms.score[0]))?;
        write_i16(w, int16(ms.score[1]))?;
    } else {
        write_i16(w, 0)?;
        write_i16(w, 0)?;
    }

    write_text(w, &truncate_name(ms.name(Player::Zero)))?;
    write_text(w, &truncate_name(ms.name(Player::One)))?;

    write_i16(w, 0)?;
    let crawford = match (ms.crawford, ms.post_crawford) {
        (true, false) => 2,
        (false, true) => 3,
        _ => 1,
    };
    write_i16(w, crawford)?;
    write_i16(w, 0)?;
    write_text(w, "")?;

    write_i16(w, ms.dice[0] as i16)?;
    write_i16(w, ms.dice[1] as i16)?;

    for value in board_values(&board.seated(ms.mover)) {
        write_i16(w, value + BOARD_OFFSET)?;
        write_i16(w, value + BOARD_OFFSET)?;
    }

    writer.flush()?;
    Ok(())
}

/// Read a Jellyfish file of version 124, 125 or 126.
///
/// The variant is taken to be standard backgammon. Older versions carry
/// no cube-use, Jacoby or beaver settings; those keep their defaults.
pub fn read_jellyfish<R: Read>(mut reader: R) -> Result<(Board, MatchState), ImportError> {
    let r = &mut reader;
    let mut ms = MatchState::default();

    let version = read_i16(r)?;
    if !(OLDEST_VERSION..=VERSION).contains(&version) {
        return Err(ImportError::UnsupportedVersion(version));
    }
    if version == 126 {
        read_i16(r)?;
        read_i16(r)?;
    }
    if version >= 125 {
        ms.cube_use = read_i16(r)? != 0;
        ms.jacoby = read_i16(r)? != 0;
        ms.beavers = read_i16(r)? != 0;
    }

    let cube = read_i16(r)?;
    ms.cube = u32::try_from(cube)
        .ok()
        .filter(|&c| c > 0)
        .ok_or(ImportError::InvalidField { field: 0, text: format!("cube {}", cube) })?;
    ms.cube_owner = match read_i16(r)? {
        1 => CubeOwner::Owned(Player::Zero),
        2 => CubeOwner::Owned(Player::One),
        _ => CubeOwner::Centered,
    };

    let on_roll = read_i16(r)?;
    ms.turn = match on_roll {
        1 | 3 => Some(Player::Zero),
        2 | 4 => Some(Player::One),
        _ => None,
    };
    ms.mover = ms.turn.unwrap_or(Player::One);

    read_i16(r)?;
    read_i16(r)?;
    read_i16(r)?;

    let game_or_match = read_i16(r)?;
    read_i16(r)?;
    read_i16(r)?;
    let match_to = read_i16(r)?;
    let scores = [read_i16(r)?, read_i16(r)?];
    if game_or_match != MONEY {
        ms.match_to = match_to.max(0) as u32;
        ms.score = [scores[0].max(0) as u32, scores[1].max(0) as u32];
    }

    ms.names = [truncate_name(&read_text(r)?), truncate_name(&read_text(r)?)];

    read_i16(r)?;
    match read_i16(r)? {
        2 => ms.crawford = true,
        3 => ms.post_crawford = true,
        _ => {}
    }
    if !ms.is_match() {
        ms.crawford = false;
        ms.post_crawford = false;
    }
    read_i16(r)?;
    read_text(r)?;

    let die = |n: i16| -> Result<u8, ImportError> {
        match n.unsigned_abs() {
            d @ 0..=6 => Ok(d as u8),
            _ => Err(ImportError::InvalidField { field: 0, text: format!("die {}", n) }),
        }
    };
    ms.dice = [die(read_i16(r)?)?, die(read_i16(r)?)?];

    let mut values = [0i16; 26];
    for value in values.iter_mut() {
        *value = read_i16(r)?.saturating_sub(BOARD_OFFSET);
        read_i16(r)?;
    }

    let count = |v: i16| -> Result<u8, ImportError> {
        let n = v.unsigned_abs() as u32;
        if n > MAX_CHEQUERS {
            return Err(ImportError::InvalidBoard);
        }
        Ok(n as u8)
    };
    let mut by_player = Board::empty();
    for i in 0..=BAR {
        let zero = values[i + 1];
        if zero < 0 {
            by_player.0[0][i] = count(zero)?;
        }
        let one = values[24 - i];
        if one > 0 {
            by_player.0[1][i] = count(one)?;
        }
    }
    if !by_player.check_position() {
        return Err(ImportError::InvalidBoard);
    }
    ms.variant = Variant::Standard;

    Ok((by_player.seated(ms.mover), ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jellyfish_layout() {
        let board = Board::initial(Variant::Standard);
        let ms = MatchState {
            names: ["ann".to_string(), "bo".to_string()],
            match_to: 3,
            score: [1, 2],
            ..MatchState::default()
        };
        let mut out = Vec::new();
        write_jellyfish(&mut out, &board, &ms).unwrap();

        // 18 header words, names (1 + 3, 1 + 2), 3 words, empty last move,
        // dice, 26 pairs.
        assert_eq!(out.len(), 18 * 2 + 4 + 3 + 3 * 2 + 1 + 2 * 2 + 26 * 4);
        assert_eq!(&out[0..2], &126i16.to_le_bytes());
        // Player one on roll, dice not rolled: 1 + 3.
        assert_eq!(&out[16..18], &4i16.to_le_bytes());
        assert_eq!(&out[36..40], b"\x03ann");

        // Player one's bar, then their 24-point holding 2.
        let board_start = out.len() - 26 * 4;
        assert_eq!(&out[board_start..board_start + 4], &[20, 0, 20, 0]);
        assert_eq!(&out[board_start + 4..board_start + 6], &22i16.to_le_bytes());
        // Player zero's bar is last.
        assert_eq!(&out[out.len() - 2..], &20i16.to_le_bytes());
    }

    #[test]
    fn test_jellyfish_roundtrip() {
        let mut board = Board::initial(Variant::Standard);
        board.apply_sub_move(7, 5, true).unwrap();
        board.0[0][BAR] = 1;
        board.0[0][12] -= 1;
        let ms = MatchState {
            names: ["alice".to_string(), "bob".to_string()],
            match_to: 7,
            score: [6, 3],
            cube: 2,
            cube_owner: CubeOwner::Owned(Player::One),
            mover: Player::Zero,
            turn: Some(Player::Zero),
            dice: [5, 2],
            post_crawford: true,
            ..MatchState::default()
        };

        let mut out = Vec::new();
        write_jellyfish(&mut out, &board, &ms).unwrap();
        let (decoded, decoded_ms) = read_jellyfish(out.as_slice()).unwrap();
        assert_eq!(decoded, board);
        assert_eq!(decoded_ms, ms);
    }

    #[test]
    fn test_jellyfish_money_game() {
        let ms = MatchState { score: [4, 4], jacoby: true, ..MatchState::default() };
        let mut out = Vec::new();
        write_jellyfish(&mut out, &Board::initial(Variant::Standard), &ms).unwrap();
        let (_, decoded) = read_jellyfish(out.as_slice()).unwrap();
        assert_eq!(decoded.match_to, 0);
        assert_eq!(decoded.score, [0, 0]);
        assert!(decoded.jacoby);
    }

    #[test]
    fn test_jellyfish_version_124() {
        let mut out = Vec::new();
        write_jellyfish(&mut out, &Board::initial(Variant::Standard), &MatchState::default()).unwrap();
        // Drop caution, unused and the three rule flags.
        let mut old = 124i16.to_le_bytes().to_vec();
        old.extend_from_slice(&out[12..]);
        let (board, ms) = read_jellyfish(old.as_slice()).unwrap();
        assert_eq!(board, Board::initial(Variant::Standard));
        assert!(ms.cube_use);
    }

    #[test]
    fn test_jellyfish_errors() {
        let bytes = 99i16.to_le_bytes();
        assert!(matches!(read_jellyfish(&bytes[..]), Err(ImportError::UnsupportedVersion(99))));

        let mut out = Vec::new();
        write_jellyfish(&mut out, &Board::initial(Variant::Standard), &MatchState::default()).unwrap();
        out.truncate(out.len() - 10);
        assert!(matches!(read_jellyfish(out.as_slice()), Err(ImportError::Io(_))));
    }
}
