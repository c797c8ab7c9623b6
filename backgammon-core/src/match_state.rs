//! Cube, dice and score state that travels with a board.

use serde::{Deserialize, Serialize};

use crate::board::{Player, Variant};

/// Longest player name the interchange formats carry.
pub const MAX_NAME_LEN: usize = 31;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum CubeOwner {
    #[default]
    Centered,
    Owned(Player),
}

impl CubeOwner {
    /// True if `player` may turn the cube, ignoring Crawford and cube use.
    #[inline]
    pub fn allows(self, player: Player) -> bool {
        match self {
            CubeOwner::Centered => true,
            CubeOwner::Owned(owner) => owner == player,
        }
    }
}

/// Everything about a game in progress other than the chequers.
///
/// `mover` is the player whose chequers occupy the mover array of the board
/// this state accompanies. `turn` is the player who must act next, which is
/// the opponent of `mover` while a double awaits an answer, and `None` when
/// no game is in progress.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchState {
    pub names: [String; 2],
    /// Match length, 0 for money play.
    pub match_to: u32,
    pub score: [u32; 2],
    pub cube: u32,
    pub cube_owner: CubeOwner,
    pub turn: Option<Player>,
    pub mover: Player,
    /// 0 when not yet rolled.
    pub dice: [u8; 2],
    pub doubled: bool,
    pub crawford: bool,
    pub post_crawford: bool,
    pub jacoby: bool,
    pub cube_use: bool,
    pub beavers: bool,
    pub variant: Variant,
}

impl Default for MatchState {
    fn default() -> Self {
        MatchState {
            names: [default_name(Player::Zero), default_name(Player::One)],
            match_to: 0,
            score: [0, 0],
            cube: 1,
            cube_owner: CubeOwner::Centered,
            turn: Some(Player::One),
            mover: Player::One,
            dice: [0, 0],
            doubled: false,
            crawford: false,
            post_crawford: false,
            jacoby: false,
            cube_use: true,
            beavers: false,
            variant: Variant::Standard,
        }
    }
}

/// Name used when a format leaves a player unnamed.
pub fn default_name(player: Player) -> String {
    format!("Player {}", player.index())
}

/// `name` cut to [`MAX_NAME_LEN`] bytes on a character boundary.
pub fn truncate_name(name: &str) -> String {
    let mut end = name.len().min(MAX_NAME_LEN);
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end].to_string()
}

/// `name` as written into a record delimited by `separator`: the separator
/// becomes `_` and the result is cut like [`truncate_name`], so that reading
/// the record back gives the same string.
pub fn record_name(name: &str, separator: char) -> String {
    truncate_name(&name.replace(separator, "_"))
}

impl MatchState {
    #[inline]
    pub fn is_match(&self) -> bool {
        self.match_to > 0
    }

    #[inline]
    pub fn rolled(&self) -> bool {
        self.dice[0] > 0
    }

    #[inline]
    pub fn name(&self, player: Player) -> &str {
        &self.names[player.index()]
    }

    #[inline]
    pub fn score_of(&self, player: Player) -> u32 {
        self.score[player.index()]
    }

    /// True while the Crawford game is being played.
    pub fn is_crawford_game(&self) -> bool {
        self.is_match() && self.crawford && !self.post_crawford
    }

    /// True if `player` may double now: the cube is in use, the owner
    /// allows it and this is not the Crawford game.
    pub fn can_double(&self, player: Player) -> bool {
        self.cube_use && !self.crawford && self.cube_owner.allows(player)
    }

    /// Who turned the cube, if a double is pending.
    pub fn doubler(&self) -> Option<Player> {
        if self.doubled {
            Some(self.mover)
        } else {
            None
        }
    }

    /// Cube owner as the signed flag renderers use: -1, 0 or 1.
    pub fn owner_flag(&self) -> i32 {
        match self.cube_owner {
            CubeOwner::Centered => 0,
            CubeOwner::Owned(Player::Zero) => -1,
            CubeOwner::Owned(Player::One) => 1,
        }
    }
}
