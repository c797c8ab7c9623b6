//! Snowie text positions: one line of 40 `;`-terminated fields.
//!
//! ```text
//! 0      match length (0 for money)
//! 1      Jacoby (money play only)
//! 2      0
//! 3      1 for money play, 0 for a match
//! 4      player on roll (0 or 1)
//! 5-6    names: on roll, opponent
//! 7      Crawford game
//! 8-9    scores: on roll, opponent
//! 10     cube value
//! 11     cube owner: 1 on roll, 0 centred, -1 opponent
//! 12     chequers on the bar for the player on roll, negated
//! 13-36  points 1-24 of the player on roll: own chequers positive,
//!        opponent's negative
//! 37     chequers on the bar for the opponent
//! 38-39  dice, 0 if not rolled
//! ```

use std::io::{Read, Write};

use crate::board::{Board, Perspective, Player, Side, BAR, POINTS};
use crate::error::ImportError;
use crate::match_state::{default_name, record_name, truncate_name, CubeOwner, MatchState};

pub const FIELDS: usize = 40;

/// The Snowie line for `board` (seen by `ms.mover`), without a line break.
pub fn snowie_line(board: &Board, ms: &MatchState) -> String {
    let mover = ms.mover;
    let other = mover.opponent();
    let crawford_game = ms.is_match()
        && ms.score.iter().any(|&s| s + 1 == ms.match_to)
        && ms.crawford
        && !ms.post_crawford;
    let owner = match ms.cube_owner {
        CubeOwner::Centered => 0,
        CubeOwner::Owned(p) if p == mover => 1,
        CubeOwner::Owned(_) => -1,
    };

    let mut fields: Vec<String> = vec![
        ms.match_to.to_string(),
        if !ms.is_match() && ms.jacoby { "1" } else { "0" }.to_string(),
        "0".to_string(),
        if ms.is_match() { "0" } else { "1" }.to_string(),
        mover.index().to_string(),
        record_name(ms.name(mover), ';'),
        record_name(ms.name(other), ';'),
        (crawford_game as i32).to_string(),
        ms.score_of(mover).to_string(),
        ms.score_of(other).to_string(),
        ms.cube.to_string(),
        owner.to_string(),
        (-(board.0[Side::Mover.index()][BAR] as i32)).to_string(),
    ];

    let view = Perspective::for_side(Side::Mover);
    for i in 0..POINTS {
        let own = view.own(board, i) as i32;
        let value = if own != 0 { own } else { -(view.opposing(board, i) as i32) };
        fields.push(value.to_string());
    }

    fields.push(board.0[Side::Opponent.index()][BAR].to_string());
    fields.push(ms.dice[0].to_string());
    fields.push(ms.dice[1].to_string());

    let mut line = fields.join(";");
    line.push(';');
    line
}

/// Write the Snowie line and a line break.
pub fn write_snowie<W: Write>(mut writer: W, board: &Board, ms: &MatchState) -> std::io::Result<()> {
    writeln!(writer, "{}", snowie_line(board, ms))?;
    writer.flush()
}

/// Parse a Snowie line into a board seen by the player on roll.
pub fn parse_snowie(text: &str) -> Result<(Board, MatchState), ImportError> {
    let fields: Vec<&str> = text.trim_end().split(';').collect();
    if fields.len() < FIELDS {
        return Err(ImportError::FieldCount(fields.len()));
    }

    let int = |field: usize| -> Result<i32, ImportError> {
        fields[field]
            .trim()
            .parse()
            .map_err(|_| ImportError::InvalidField { field, text: fields[field].to_string() })
    };
    let invalid = |field: usize| ImportError::InvalidField { field, text: fields[field].to_string() };
    let unsigned = |field: usize| -> Result<u32, ImportError> {
        u32::try_from(int(field)?).map_err(|_| invalid(field))
    };
    let count = |field: usize| -> Result<u8, ImportError> {
        u8::try_from(int(field)?.unsigned_abs()).map_err(|_| invalid(field))
    };
    let die = |field: usize| -> Result<u8, ImportError> {
        match int(field)? {
            n @ 0..=6 => Ok(n as u8),
            _ => Err(invalid(field)),
        }
    };

    let mover = match int(4)? {
        0 => Player::Zero,
        1 => Player::One,
        _ => return Err(invalid(4)),
    };
    let other = mover.opponent();

    let mut ms = MatchState { mover, turn: Some(mover), ..MatchState::default() };
    ms.match_to = unsigned(0)?;
    ms.jacoby = int(1)? != 0;
    for (field, player) in [(5, mover), (6, other)] {
        let name = fields[field];
        ms.names[player.index()] =
            if name.is_empty() { default_name(player) } else { truncate_name(name) };
    }
    ms.crawford = int(7)? != 0;
    ms.score[mover.index()] = unsigned(8)?;
    ms.score[other.index()] = unsigned(9)?;
    ms.cube = unsigned(10)?;
    if ms.cube == 0 {
        return Err(invalid(10));
    }
    ms.cube_owner = match int(11)? {
        1 => CubeOwner::Owned(mover),
        -1 => CubeOwner::Owned(other),
        _ => CubeOwner::Centered,
    };
    ms.dice = [die(38)?, die(39)?];

    let mut board = Board::empty();
    board.0[Side::Mover.index()][BAR] = count(12)?;
    for i in 0..POINTS {
        let value = int(13 + i)?;
        let n = count(13 + i)?;
        if value > 0 {
            board.0[Side::Mover.index()][i] = n;
        } else if value < 0 {
            board.0[Side::Opponent.index()][Perspective::mirror(i)] = n;
        }
    }
    board.0[Side::Opponent.index()][BAR] = count(37)?;

    if !board.check_position() {
        return Err(ImportError::InvalidBoard);
    }
    Ok((board, ms))
}

/// Read a whole Snowie file.
pub fn read_snowie<R: Read>(mut reader: R) -> Result<(Board, MatchState), ImportError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_snowie(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Variant;
    use crate::match_state::MAX_NAME_LEN;

    const INITIAL: &str = "0;0;0;1;1;Player 1;Player 0;0;0;0;1;0;0;\
                           -2;0;0;0;0;5;0;3;0;0;0;-5;5;0;0;0;-3;0;-5;0;0;0;0;2;0;0;0;";

    #[test]
    fn test_snowie_initial() {
        let board = Board::initial(Variant::Standard);
        assert_eq!(snowie_line(&board, &MatchState::default()), INITIAL);
        assert_eq!(snowie_line(&board, &MatchState::default()).matches(';').count(), FIELDS);
    }

    #[test]
    fn test_snowie_roundtrip() {
        let mut board = Board::initial(Variant::Standard);
        board.apply_sub_move(23, 6, true).unwrap();
        board.swap_sides();
        board.apply_sub_move(12, 5, true).unwrap();
        board.0[1][BAR] = 1;
        board.0[1][5] -= 1;
        let ms = MatchState {
            names: ["alice".to_string(), "bob".to_string()],
            match_to: 5,
            score: [4, 2],
            cube: 1,
            mover: Player::Zero,
            turn: Some(Player::Zero),
            crawford: true,
            dice: [3, 1],
            ..MatchState::default()
        };

        let mut out = Vec::new();
        write_snowie(&mut out, &board, &ms).unwrap();
        assert!(out.ends_with(b";\n"));
        let (decoded, decoded_ms) = read_snowie(out.as_slice()).unwrap();
        assert_eq!(decoded, board);
        assert_eq!(decoded_ms, ms);
    }

    #[test]
    fn test_snowie_owner_and_bars() {
        let mut board = Board::initial(Variant::Standard);
        board.0[1][23] = 0;
        board.0[1][BAR] = 2;
        let ms = MatchState {
            cube: 4,
            cube_owner: CubeOwner::Owned(Player::Zero),
            ..MatchState::default()
        };
        let line = snowie_line(&board, &ms);
        let fields: Vec<&str> = line.split(';').collect();
        assert_eq!(fields[10], "4");
        assert_eq!(fields[11], "-1");
        assert_eq!(fields[12], "-2");
        assert_eq!(fields[37], "0");
    }

    #[test]
    fn test_snowie_empty_names() {
        let line = INITIAL.replace("Player 1;Player 0", ";");
        let (_, ms) = parse_snowie(&line).unwrap();
        assert_eq!(ms.names, ["Player 0".to_string(), "Player 1".to_string()]);
    }

    #[test]
    fn test_snowie_long_names() {
        let board = Board::initial(Variant::Standard);
        let ms = MatchState {
            names: ["ü".repeat(16), "x;y".repeat(12)],
            ..MatchState::default()
        };
        let (_, decoded) = parse_snowie(&snowie_line(&board, &ms)).unwrap();
        assert_eq!(decoded.names[0], "ü".repeat(15));
        assert_eq!(decoded.names[1], truncate_name(&"x_y".repeat(12)));
        assert_eq!(decoded.names[1].len(), MAX_NAME_LEN);
    }

    #[test]
    fn test_snowie_errors() {
        assert!(matches!(parse_snowie("0;0;0;1;"), Err(ImportError::FieldCount(5))));
        let bad = INITIAL.replacen("0;0;0;1;1;", "0;0;0;1;7;", 1);
        assert!(matches!(parse_snowie(&bad), Err(ImportError::InvalidField { field: 4, .. })));
        let overfull = INITIAL.replacen(";-2;", ";-9;", 1).replacen(";5;0;3;", ";5;0;9;", 1);
        assert!(matches!(parse_snowie(&overfull), Err(ImportError::InvalidBoard)));
    }
}
