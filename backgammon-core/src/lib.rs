//! Backgammon board model, board geometry and position interchange formats.
//!
//! # Board layout
//!
//! ```text
//! Board([[u8; 25]; 2])
//!   array 1: side to move        array 0: its opponent
//!   index 0..=23: that side's points 1..=24, index 24: that side's bar
//!
//! mover's point p  <->  opponent index 23 - p
//! ```
//!
//! Borne-off chequers are not stored. Swapping the two arrays hands the
//! move to the other side.
//!
//! # Move encoding
//!
//! ```text
//! SubMove { from, to }: 0..=23 points, 24 bar (from only), -1 off (to only)
//! Move: up to four sub-moves
//! ```
//!
//! # Modules
//!
//! - [`board`]: positions, move application, game results
//! - [`moves`]: move notation, formatting and parsing
//! - [`geometry`]: drawing coordinates for chequers, cube, dice and flags
//! - [`match_state`]: names, score, cube and dice around a board
//! - [`position_id`]: position ID, position key and XG strings
//! - [`fibs`]: the `board:` text record
//! - [`export`]: Snowie, Jellyfish and `.mat` files
//! - [`diagram`]: ASCII board diagrams

pub mod board;
pub mod diagram;
pub mod error;
pub mod export;
pub mod fibs;
pub mod geometry;
pub mod match_state;
pub mod moves;
pub mod position_id;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use board::{Board, GameResult, Perspective, Player, Side, Variant, WinKind, BAR, POINTS};
pub use diagram::{draw_board, Diagram};
pub use error::{ExportError, ImportError, MoveError, ParseMoveError, PositionIdError, WireError};
pub use fibs::WireRecord;
pub use geometry::{Layout, Orientation};
pub use match_state::{CubeOwner, MatchState};
pub use moves::{format_move, format_move_compact, format_move_plain, parse_move, Move, SubMove};
pub use position_id::{board_from_position_id, board_from_xg, position_id, PositionKey};
