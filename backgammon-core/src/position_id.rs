//! Compact position encodings.
//!
//! - [`PositionKey`]: seven 32-bit words of 4-bit counts, used as a lookup
//!   key. Equal keys mean equal boards.
//! - Position ID: the 14-character base64 string shown to users. Each of
//!   the 50 slots (array 0 first, then array 1) is written as one bit per
//!   chequer followed by a zero bit, least significant bit first, giving
//!   80 bits in all.
//! - XG position string: 26 letters, decode only.

use xxhash_rust::xxh64::xxh64;

use crate::board::{Board, BAR, POINTS};
use crate::error::PositionIdError;

pub const POSITION_ID_LEN: usize = 14;
pub const XG_POSITION_LEN: usize = 26;

const KEY_BYTES: usize = 10;
const KEY_BITS: usize = KEY_BYTES * 8;
const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

// ============================================================================
// POSITION KEY
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct PositionKey(pub [u32; 7]);

impl PositionKey {
    /// Words 0-2 hold the mover's points, 3-5 the opponent's, and word 6
    /// both bars.
    pub fn from_board(board: &Board) -> PositionKey {
        let mut words = [0u32; 7];
        for word in 0..3 {
            for k in 0..8 {
                let point = word * 8 + k;
                debug_assert!(board.0[1][point] < 16 && board.0[0][point] < 16);
                words[word] |= (board.0[1][point] as u32) << (4 * k);
                words[word + 3] |= (board.0[0][point] as u32) << (4 * k);
            }
        }
        words[6] = board.0[0][BAR] as u32 | (board.0[1][BAR] as u32) << 4;
        PositionKey(words)
    }

    pub fn to_board(&self) -> Board {
        let mut board = Board::empty();
        for word in 0..3 {
            for k in 0..8 {
                let point = word * 8 + k;
                board.0[1][point] = ((self.0[word] >> (4 * k)) & 0xf) as u8;
                board.0[0][point] = ((self.0[word + 3] >> (4 * k)) & 0xf) as u8;
            }
        }
        board.0[0][BAR] = (self.0[6] & 0xf) as u8;
        board.0[1][BAR] = ((self.0[6] >> 4) & 0xf) as u8;
        board
    }

    /// 64-bit hash of the key, for hash tables keyed by position.
    pub fn fingerprint(&self) -> u64 {
        let mut bytes = [0u8; 28];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(self.0) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        xxh64(&bytes, 0)
    }
}

impl From<&Board> for PositionKey {
    fn from(board: &Board) -> Self {
        PositionKey::from_board(board)
    }
}

// ============================================================================
// POSITION ID
// ============================================================================

fn packed_key(board: &Board) -> [u8; KEY_BYTES] {
    let mut key = [0u8; KEY_BYTES];
    let mut bit = 0;
    for &count in board.0.iter().flatten() {
        for _ in 0..count {
            if bit < KEY_BITS {
                key[bit / 8] |= 1 << (bit % 8);
            }
            bit += 1;
        }
        bit += 1;
    }
    debug_assert!(bit <= KEY_BITS, "too many chequers for a position id");
    key
}

fn unpack_key(key: &[u8; KEY_BYTES]) -> Result<Board, PositionIdError> {
    let mut board = Board::empty();
    let (mut side, mut slot) = (0, 0);

    for &byte in key {
        for k in 0..8 {
            if byte >> k & 1 == 1 {
                if side >= 2 {
                    return Err(PositionIdError::Overflow);
                }
                board.0[side][slot] += 1;
            } else {
                slot += 1;
                if slot == POINTS + 1 {
                    side += 1;
                    slot = 0;
                }
            }
        }
    }
    Ok(board)
}

/// The 14-character position ID of `board`.
pub fn position_id(board: &Board) -> String {
    let key = packed_key(board);
    let mut id = String::with_capacity(POSITION_ID_LEN);
    let push = |id: &mut String, v: u8| id.push(BASE64[(v & 0x3f) as usize] as char);

    for group in key[..9].chunks_exact(3) {
        push(&mut id, group[0] >> 2);
        push(&mut id, (group[0] & 0x03) << 4 | group[1] >> 4);
        push(&mut id, (group[1] & 0x0f) << 2 | group[2] >> 6);
        push(&mut id, group[2]);
    }
    push(&mut id, key[9] >> 2);
    push(&mut id, (key[9] & 0x03) << 4);
    id
}

fn base64_value(c: char) -> Option<u8> {
    match c {
        'A'..='Z' => Some(c as u8 - b'A'),
        'a'..='z' => Some(c as u8 - b'a' + 26),
        '0'..='9' => Some(c as u8 - b'0' + 52),
        '+' => Some(62),
        '/' => Some(63),
        _ => None,
    }
}

/// Decode a position ID. The result must pass [`Board::check_position`].
pub fn board_from_position_id(id: &str) -> Result<Board, PositionIdError> {
    let found = id.chars().count();
    if found != POSITION_ID_LEN {
        return Err(PositionIdError::Length { found, expected: POSITION_ID_LEN });
    }

    let mut values = [0u8; POSITION_ID_LEN];
    for (v, c) in values.iter_mut().zip(id.chars()) {
        *v = base64_value(c).ok_or(PositionIdError::InvalidChar(c))?;
    }

    let mut key = [0u8; KEY_BYTES];
    for (group, v) in key[..9].chunks_exact_mut(3).zip(values.chunks_exact(4)) {
        group[0] = v[0] << 2 | v[1] >> 4;
        group[1] = v[1] << 4 | v[2] >> 2;
        group[2] = v[2] << 6 | v[3];
    }
    key[9] = values[12] << 2 | values[13] >> 4;

    let board = unpack_key(&key)?;
    if !board.check_position() {
        return Err(PositionIdError::Illegal);
    }
    Ok(board)
}

// ============================================================================
// XG
// ============================================================================

/// Decode the 26-letter board part of an XGID.
///
/// Letter `i` describes point `i` seen by the mover, with 0 the
/// opponent's bar and 25 the mover's bar. `A`-`P` are 1-16 mover chequers,
/// `a`-`p` opponent chequers and `-` an empty point.
pub fn board_from_xg(text: &str) -> Result<Board, PositionIdError> {
    let found = text.chars().count();
    if found != XG_POSITION_LEN {
        return Err(PositionIdError::Length { found, expected: XG_POSITION_LEN });
    }

    let mut board = Board::empty();
    for (i, c) in text.chars().enumerate() {
        let (opponent, mover) = match i {
            0 => (Some(BAR), None),
            25 => (None, Some(BAR)),
            _ => (Some(POINTS - i), Some(i - 1)),
        };
        match (c, opponent, mover) {
            ('A'..='P', _, Some(p)) => board.0[1][p] = c as u8 - b'A' + 1,
            ('a'..='p', Some(p), _) => board.0[0][p] = c as u8 - b'a' + 1,
            ('-', _, _) => {}
            _ => return Err(PositionIdError::InvalidChar(c)),
        }
    }
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Variant;

    #[test]
    fn test_initial_position_id() {
        let board = Board::initial(Variant::Standard);
        assert_eq!(position_id(&board), "4HPwATDgc/ABMA");
        assert_eq!(board_from_position_id("4HPwATDgc/ABMA").unwrap(), board);
    }

    #[test]
    fn test_position_id_roundtrip_variants() {
        for variant in [Variant::Nackgammon, Variant::Hypergammon2] {
            let mut board = Board::initial(variant);
            board.0[1][BAR] = 1;
            board.0[1][23] -= 1;
            let id = position_id(&board);
            assert_eq!(id.len(), POSITION_ID_LEN);
            assert_eq!(board_from_position_id(&id).unwrap(), board);
        }
    }

    #[test]
    fn test_position_id_errors() {
        assert_eq!(
            board_from_position_id("4HPwATDgc/AB"),
            Err(PositionIdError::Length { found: 12, expected: 14 })
        );
        assert_eq!(board_from_position_id("4HPwATDgc/AB!A"), Err(PositionIdError::InvalidChar('!')));
        // A chequer bit after all 50 slots are closed.
        assert_eq!(board_from_position_id("AAAAAAAABAAAAA"), Err(PositionIdError::Overflow));
        // Eighty chequers on one point.
        assert_eq!(board_from_position_id("//////////////"), Err(PositionIdError::Illegal));
    }

    #[test]
    fn test_position_id_rejects_shared_point() {
        let mut board = Board::empty();
        board.0[1][0] = 1;
        board.0[0][23] = 1;
        let id = position_id(&board);
        assert_eq!(board_from_position_id(&id), Err(PositionIdError::Illegal));
    }

    #[test]
    fn test_position_key() {
        let board = Board::initial(Variant::Standard);
        let key = PositionKey::from_board(&board);
        assert_eq!(key.to_board(), board);
        assert_eq!(key.fingerprint(), PositionKey::from(&board).fingerprint());

        let moved = board.swapped();
        assert_eq!(PositionKey::from_board(&moved), key);

        let mut other = board;
        other.0[1][BAR] = 1;
        other.0[1][23] = 1;
        assert_ne!(PositionKey::from_board(&other), key);
        assert_ne!(PositionKey::from_board(&other).fingerprint(), key.fingerprint());
    }

    #[test]
    fn test_xg_initial() {
        let board = board_from_xg("-b----E-C---eE---c-e----B-").unwrap();
        assert_eq!(board, Board::initial(Variant::Standard));
    }

    #[test]
    fn test_xg_errors() {
        assert!(matches!(board_from_xg("-b--"), Err(PositionIdError::Length { found: 4, .. })));
        assert_eq!(
            board_from_xg("Ab----E-C---eE---c-e----B-"),
            Err(PositionIdError::InvalidChar('A'))
        );
        assert_eq!(
            board_from_xg("-b----E-C---eE---c-e----Bz"),
            Err(PositionIdError::InvalidChar('z'))
        );
    }
}
