//! Board position model.
//!
//! A [`Board`] is two arrays of 25 chequer counts. Array 1 belongs to the
//! side to move and array 0 to its opponent. Each array is indexed from its
//! owner's point of view: indices 0..=23 are that player's points 1..=24 and
//! index 24 is that player's bar. Chequers borne off are not stored; they are
//! the variant's starting count minus everything still on the board.
//!
//! ```text
//! physical point seen by the mover as p  ==  opponent index 23 - p
//! ```

use serde::{Deserialize, Serialize};

use crate::error::MoveError;
use crate::moves::{Move, SubMove};

/// Number of playing points per side.
pub const POINTS: usize = 24;
/// Index of the bar within a side's array.
pub const BAR: usize = 24;
/// Most chequers a side may have in any variant.
pub const MAX_CHEQUERS: u32 = 15;

// ============================================================================
// PLAYERS AND SIDES
// ============================================================================

/// Absolute player identity, independent of whose turn it is.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Player {
    Zero = 0,
    One = 1,
}

impl Player {
    #[inline]
    pub const fn opponent(self) -> Player {
        match self {
            Player::Zero => Player::One,
            Player::One => Player::Zero,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Role of an array within a [`Board`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Side {
    /// Array 0.
    Opponent = 0,
    /// Array 1, the side on roll.
    Mover = 1,
}

impl Side {
    #[inline]
    pub const fn other(self) -> Side {
        match self {
            Side::Opponent => Side::Mover,
            Side::Mover => Side::Opponent,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A point of view on the board.
///
/// All `23 - i` arithmetic between the two arrays goes through
/// [`Perspective::mirror`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Perspective {
    side: Side,
}

impl Perspective {
    #[inline]
    pub const fn for_side(side: Side) -> Perspective {
        Perspective { side }
    }

    #[inline]
    pub const fn side(self) -> Side {
        self.side
    }

    /// Map a point index (0..=23) of one side to the index the other side
    /// uses for the same physical point. The bar has no mirror.
    #[inline]
    pub const fn mirror(point: usize) -> usize {
        debug_assert!(point < POINTS, "the bar has no mirror point");
        POINTS - 1 - point
    }

    /// Own chequers on `point`, numbered from this side.
    #[inline]
    pub fn own(self, board: &Board, point: usize) -> u8 {
        board.0[self.side.index()][point]
    }

    /// Chequers of the other side on the physical point this side calls
    /// `point` (0..=23).
    #[inline]
    pub fn opposing(self, board: &Board, point: usize) -> u8 {
        board.0[self.side.other().index()][Self::mirror(point)]
    }
}

// ============================================================================
// VARIANTS
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum Variant {
    #[default]
    Standard,
    Nackgammon,
    Hypergammon1,
    Hypergammon2,
    Hypergammon3,
}

impl Variant {
    /// Chequers each side starts with.
    #[inline]
    pub const fn chequers(self) -> u8 {
        match self {
            Variant::Standard | Variant::Nackgammon => 15,
            Variant::Hypergammon1 => 1,
            Variant::Hypergammon2 => 2,
            Variant::Hypergammon3 => 3,
        }
    }

    /// The variant with `n` chequers a side. Fifteen means standard
    /// backgammon, since nackgammon cannot be told apart by count.
    pub fn from_chequers(n: u32) -> Option<Variant> {
        match n {
            15 => Some(Variant::Standard),
            1 => Some(Variant::Hypergammon1),
            2 => Some(Variant::Hypergammon2),
            3 => Some(Variant::Hypergammon3),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Variant::Standard => "Standard",
            Variant::Nackgammon => "NackGammon",
            Variant::Hypergammon1 => "HyperGammon (1)",
            Variant::Hypergammon2 => "HyperGammon (2)",
            Variant::Hypergammon3 => "HyperGammon (3)",
        }
    }
}

// ============================================================================
// GAME RESULT
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum WinKind {
    Single = 1,
    Gammon = 2,
    Backgammon = 3,
}

impl WinKind {
    /// Points won at cube value 1.
    #[inline]
    pub const fn points(self) -> u32 {
        self as u32
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Side,
    pub kind: WinKind,
}

// ============================================================================
// BOARD
// ============================================================================

/// Chequer counts for both sides. See the module docs for the layout.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Board(pub [[u8; 25]; 2]);

impl Board {
    /// A board with no chequers on it.
    #[inline]
    pub const fn empty() -> Board {
        Board([[0; 25]; 2])
    }

    /// Starting position of `variant`, identical for both sides.
    pub fn initial(variant: Variant) -> Board {
        let mut side = [0u8; 25];
        match variant {
            Variant::Standard => {
                side[5] = 5;
                side[7] = 3;
                side[12] = 5;
                side[23] = 2;
            }
            Variant::Nackgammon => {
                side[5] = 4;
                side[7] = 3;
                side[12] = 4;
                side[22] = 2;
                side[23] = 2;
            }
            Variant::Hypergammon1 | Variant::Hypergammon2 | Variant::Hypergammon3 => {
                for j in 0..variant.chequers() as usize {
                    side[POINTS - 1 - j] = 1;
                }
            }
        }
        Board([side, side])
    }

    #[inline]
    pub fn side(&self, side: Side) -> &[u8; 25] {
        &self.0[side.index()]
    }

    #[inline]
    pub fn side_mut(&mut self, side: Side) -> &mut [u8; 25] {
        &mut self.0[side.index()]
    }

    /// Exchange the two arrays so the opponent becomes the side to move.
    ///
    /// Because each array is numbered from its owner's side, exchanging them
    /// is the whole mirror: the old mover's point `i` is now point `23 - i`
    /// as seen by the new mover. Applying it twice restores the board.
    #[inline]
    pub fn swap_sides(&mut self) {
        self.0.swap(0, 1);
    }

    #[inline]
    pub fn swapped(mut self) -> Board {
        self.swap_sides();
        self
    }

    /// Re-index a mover-relative board by absolute player, so that array 1
    /// holds player one's chequers. Applying it twice with the same `mover`
    /// gives back the original board.
    #[inline]
    pub fn seated(&self, mover: Player) -> Board {
        match mover {
            Player::One => *self,
            Player::Zero => self.swapped(),
        }
    }

    /// Chequers still in play (points and bar) for `side`.
    pub fn chequers(&self, side: Side) -> u32 {
        self.side(side).iter().map(|&n| n as u32).sum()
    }

    /// Chequers `side` has borne off.
    pub fn off(&self, side: Side, variant: Variant) -> u32 {
        (variant.chequers() as u32).saturating_sub(self.chequers(side))
    }

    /// Pips `side` needs to bear everything off; the bar counts 25.
    pub fn pip_count(&self, side: Side) -> u32 {
        self.side(side)
            .iter()
            .enumerate()
            .map(|(i, &n)| (i as u32 + 1) * n as u32)
            .sum()
    }

    /// True if both sides have at most `variant`'s chequers and no point is
    /// shared.
    pub fn is_valid(&self, variant: Variant) -> bool {
        let max = variant.chequers() as u32;
        self.chequers(Side::Mover) <= max
            && self.chequers(Side::Opponent) <= max
            && !self.shares_a_point()
    }

    fn shares_a_point(&self) -> bool {
        let mover = Perspective::for_side(Side::Mover);
        (0..POINTS).any(|i| mover.own(self, i) > 0 && mover.opposing(self, i) > 0)
    }

    fn both_closed_out(&self) -> bool {
        (0..6).all(|i| self.0[0][i] >= 2 && self.0[1][i] >= 2)
    }

    /// Position rules any board must satisfy: at most fifteen chequers a
    /// side, no shared points, and not both sides on the bar against closed
    /// home boards.
    pub fn check_position(&self) -> bool {
        if self.chequers(Side::Mover) > MAX_CHEQUERS || self.chequers(Side::Opponent) > MAX_CHEQUERS {
            return false;
        }
        if self.shares_a_point() {
            return false;
        }
        !(self.both_closed_out() && self.0[0][BAR] > 0 && self.0[1][BAR] > 0)
    }

    /// Adjust the board so that [`Board::check_position`] holds, removing
    /// as few chequers as the rules allow.
    pub fn closest_legal_position(&mut self) {
        for side in &mut self.0 {
            let mut left = MAX_CHEQUERS as u8;
            for n in side.iter_mut() {
                if *n <= left {
                    left -= *n;
                } else {
                    *n = left;
                    left = 0;
                }
            }
        }

        for i in 0..POINTS {
            if self.0[0][i] > 0 {
                self.0[1][Perspective::mirror(i)] = 0;
            }
        }

        if self.both_closed_out() && self.0[0][BAR] > 0 {
            self.0[1][BAR] = 0;
        }
    }

    // ========================================================================
    // MOVING
    // ========================================================================

    /// Move one chequer of the side to move `pips` points from `from`
    /// (0..=23, or [`BAR`]). Landing on a single opposing chequer sends it
    /// to its bar; moving past point 1 bears the chequer off.
    ///
    /// With `check_die` the distance must be a die value. Without it any
    /// positive distance is allowed, which is how whole recorded moves are
    /// replayed. On error the board is unchanged.
    ///
    /// # Panics
    ///
    /// If `from` is greater than [`BAR`].
    pub fn apply_sub_move(&mut self, from: usize, pips: u8, check_die: bool) -> Result<(), MoveError> {
        assert!(from <= BAR, "source index {} is off the board", from);

        if pips == 0 || (check_die && pips > 6) {
            return Err(MoveError::DieOutOfRange(pips));
        }
        if self.0[Side::Mover.index()][from] == 0 {
            return Err(MoveError::EmptySource(from));
        }

        let dest = from as isize - pips as isize;
        if dest < 0 {
            self.0[Side::Mover.index()][from] -= 1;
            return Ok(());
        }

        let dest = dest as usize;
        let target = Perspective::mirror(dest);
        match self.0[Side::Opponent.index()][target] {
            0 => {}
            1 => {
                self.0[Side::Opponent.index()][target] = 0;
                self.0[Side::Opponent.index()][BAR] += 1;
            }
            _ => return Err(MoveError::Blocked(dest)),
        }

        self.0[Side::Mover.index()][from] -= 1;
        self.0[Side::Mover.index()][dest] += 1;
        Ok(())
    }

    pub(crate) fn apply_step(&mut self, step: SubMove) -> Result<(), MoveError> {
        if step.to >= step.from {
            return Err(MoveError::WrongDirection { from: step.from, to: step.to });
        }
        self.apply_sub_move(step.from as usize, (step.from - step.to) as u8, false)
    }

    /// Apply every sub-move of `mv` in order. Either all of them succeed or
    /// the board is left untouched.
    pub fn apply_move(&mut self, mv: &Move) -> Result<(), MoveError> {
        let mut scratch = *self;
        for step in mv.iter() {
            scratch.apply_step(step)?;
        }
        *self = scratch;
        Ok(())
    }

    /// Best-effort application for previews: apply sub-moves until one
    /// fails and keep the ones that worked. Returns how many were applied.
    pub fn apply_move_partial(&mut self, mv: &Move) -> usize {
        mv.iter().take_while(|&step| self.apply_step(step).is_ok()).count()
    }

    /// The result if one side has borne off every chequer.
    ///
    /// The loser is gammoned if it has borne off none, and backgammoned if
    /// it also still has chequers on the bar or in the winner's home board.
    pub fn game_result(&self, variant: Variant) -> Option<GameResult> {
        let total = variant.chequers() as u32;
        [Side::Opponent, Side::Mover].into_iter().find_map(|winner| {
            if self.chequers(winner) != 0 {
                return None;
            }
            let loser = winner.other();
            let kind = if self.chequers(loser) < total {
                WinKind::Single
            } else if self.side(loser)[18..].iter().any(|&n| n > 0) {
                WinKind::Backgammon
            } else {
                WinKind::Gammon
            };
            Some(GameResult { winner, kind })
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
