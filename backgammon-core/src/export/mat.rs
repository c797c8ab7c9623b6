//! Game records as `.mat` / `.gam` text.
//!
//! Two plies per line: player zero's action in a 27-column field after the
//! move number, player one's after it. Moves are written in plain numeric
//! notation with hits marked.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Player, Variant};
use crate::error::ExportError;
use crate::moves::{format_move_plain, Move};

/// Shown before player one's first move when player zero has no move to
/// show on the first line.
const FIRST_LINE_SKIP: &str = "  1)                             ";
const DROP_PAD: &str = "                       ";
const RIGHT_COLUMN: usize = 34;

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum GameAction {
    Move { player: Player, dice: [u8; 2], mv: Move },
    Double,
    Take,
    Drop,
    /// Resignation of `points` (1 to 3) times the cube.
    Resign { player: Player, points: u32 },
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct GameRecord {
    /// Score before the game.
    pub score: [u32; 2],
    pub actions: Vec<GameAction>,
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct MatchRecord {
    pub names: [String; 2],
    pub match_to: u32,
    pub variant: Variant,
    pub games: Vec<GameRecord>,
}

fn points(n: u32) -> String {
    format!("{} point{}", n, if n == 1 { "" } else { "s" })
}

/// Write one game without a game number or scores.
pub fn write_game<W: Write>(
    mut writer: W,
    names: &[String; 2],
    variant: Variant,
    game: &GameRecord,
) -> Result<(), ExportError> {
    write_game_body(&mut writer, names, variant, game, None)?;
    writer.flush()?;
    Ok(())
}

/// Write a whole match: a variation tag for non-standard games, the match
/// length, then each game numbered from 1 with its starting score.
pub fn write_match<W: Write>(mut writer: W, record: &MatchRecord) -> Result<(), ExportError> {
    let w = &mut writer;
    if record.variant != Variant::Standard {
        writeln!(w, "; [Variation \"{}\"]", record.variant.name())?;
    }
    writeln!(w)?;
    writeln!(w, " {} point match", record.match_to)?;
    writeln!(w)?;

    for (i, game) in record.games.iter().enumerate() {
        write_game_body(w, &record.names, record.variant, game, Some(i))?;
    }
    writer.flush()?;
    Ok(())
}

fn write_game_body<W: Write>(
    w: &mut W,
    names: &[String; 2],
    variant: Variant,
    game: &GameRecord,
    number: Option<usize>,
) -> Result<(), ExportError> {
    match number {
        Some(n) => {
            writeln!(w, " Game {}", n + 1)?;
            let left = format!("{} : {}", names[0], game.score[0]);
            writeln!(w, " {:<31}{} : {}", left, names[1], game.score[1])?;
        }
        None => writeln!(w, " {:<31}{}", names[0], names[1])?,
    }

    let mut board = Board::initial(variant);
    let mut cube = 1u32;
    let mut ply = 0usize;

    for (index, action) in game.actions.iter().enumerate() {
        if ply == 0 && matches!(action, GameAction::Move { player: Player::One, .. }) {
            w.write_all(FIRST_LINE_SKIP.as_bytes())?;
            ply += 1;
        }
        let odd = ply % 2 == 1;
        let mut finished = None;

        let text = match action {
            GameAction::Move { dice, mv, .. } => {
                let text = format!("{}{}: {}", dice[0], dice[1], format_move_plain(Some(&board), mv));
                board
                    .apply_move(mv)
                    .map_err(|source| ExportError::IllegalMove { ply: index, source })?;
                board.swap_sides();
                finished = board.game_result(variant);
                text
            }
            GameAction::Double => {
                cube = cube.saturating_mul(2);
                format!(" Doubles => {}", cube)
            }
            GameAction::Take => " Takes".to_string(),
            GameAction::Drop => {
                let pad = if odd { "\n      " } else { DROP_PAD };
                format!(" Drops{}Wins {}", pad, points(cube / 2))
            }
            GameAction::Resign { player, points: n } => {
                let won = points(n.saturating_mul(cube));
                match player {
                    Player::One => format!("{}      Wins {}\n", if odd { "\n" } else { "" }, won),
                    Player::Zero if odd => format!(" Wins {}\n", won),
                    Player::Zero => format!("{}Wins {}\n", " ".repeat(RIGHT_COLUMN), won),
                }
            }
        };

        if odd || matches!(action, GameAction::Resign { .. }) {
            writeln!(w, "{}", text)?;
        } else {
            write!(w, "{:>3}) {:<27} ", ply / 2 + 1, text)?;
        }

        if matches!(action, GameAction::Drop) {
            writeln!(w)?;
            if !odd {
                writeln!(w)?;
            }
        }

        if let Some(result) = finished {
            let pad = if odd { " ".repeat(RIGHT_COLUMN) } else { "\n      ".to_string() };
            writeln!(w, "{}Wins {}\n", pad, points(result.kind.points().saturating_mul(cube)))?;
        }
        ply += 1;
    }
    Ok(())
}
