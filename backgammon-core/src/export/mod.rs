//! File formats for positions and game records.
//!
//! Writers take any [`std::io::Write`] and readers any [`std::io::Read`];
//! opening files is left to the caller.

pub mod jellyfish;
pub mod mat;
pub mod snowie;

pub use jellyfish::{read_jellyfish, write_jellyfish};
pub use mat::{write_game, write_match, GameAction, GameRecord, MatchRecord};
pub use snowie::{parse_snowie, read_snowie, snowie_line, write_snowie};

/// File name for game `game` (from 0) of a multi-game export.
///
/// The first game keeps `filename`. Later games get `_NNN` (the game
/// number from 1, three digits) before the extension, or at the end when
/// there is none.
pub fn filename_from_game(filename: &str, game: usize) -> String {
    if game == 0 {
        return filename.to_string();
    }

    let name_start = filename.rfind(['/', '\\']).map_or(0, |i| i + 1);
    match filename[name_start..].rfind('.') {
        Some(dot) => {
            let (stem, ext) = filename.split_at(name_start + dot);
            format!("{}_{:03}{}", stem, game + 1, ext)
        }
        None => format!("{}_{:03}", filename, game + 1),
    }
}
