//! Board geometry in board units.
//!
//! Every coordinate is derived from a handful of base sizes held in a
//! [`Layout`]. Renderers multiply by their own scale. The y axis points
//! down, so the stacks on the lower half grow toward smaller y.
//!
//! Slots used by the position functions:
//!
//! ```text
//! 0        bar stack near the lower edge
//! 1..=24   points, as numbered by player one
//! 25       bar stack near the upper edge
//! 26..=29  bearoff trays (upper/lower on the home side, then the far side)
//! ```

use serde::{Deserialize, Serialize};

use crate::board::{Board, Perspective, Player, Side, Variant, BAR, POINTS};
use crate::match_state::CubeOwner;

/// Coordinate returned for a cube or resignation flag that is not shown.
pub const NO_CUBE: i32 = -32768;

/// Number of slots in the position table.
pub const SLOTS: usize = 30;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Player one's home board on the right, point 1 in the lower right.
    #[default]
    Anticlockwise,
    /// Mirror image: home board on the left.
    Clockwise,
}

impl Orientation {
    #[inline]
    pub const fn from_clockwise(clockwise: bool) -> Orientation {
        if clockwise {
            Orientation::Clockwise
        } else {
            Orientation::Anticlockwise
        }
    }

    #[inline]
    pub const fn is_clockwise(self) -> bool {
        matches!(self, Orientation::Clockwise)
    }
}

/// Origin of a stack and the step between chequers in it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Slot {
    pub x: i32,
    pub y: i32,
    pub dy: i32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Where to draw the cube or the resignation flag. `orient` is -1, 0 or 1
/// and says which way the face is turned.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub orient: i32,
}

impl Placement {
    const HIDDEN: Placement = Placement { x: NO_CUBE, y: NO_CUBE, orient: -1 };

    #[inline]
    pub const fn is_hidden(self) -> bool {
        self.x == NO_CUBE
    }
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Base sizes. Heights equal widths for chequers, dice, cube and arrow.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub chequer_width: i32,
    pub die_width: i32,
    pub cube_width: i32,
    pub arrow_width: i32,
    pub hinge_height: i32,
    pub hinge_width: i32,
    /// Height added to the minimum board height.
    pub extra_height: i32,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            chequer_width: 6,
            die_width: 7,
            cube_width: 6,
            arrow_width: 3,
            hinge_height: 12,
            hinge_width: 2,
            extra_height: 10,
        }
    }
}

impl Layout {
    #[inline]
    pub const fn chequer_height(&self) -> i32 {
        self.chequer_width
    }

    #[inline]
    pub const fn die_height(&self) -> i32 {
        self.die_width
    }

    #[inline]
    pub const fn cube_height(&self) -> i32 {
        self.cube_width
    }

    #[inline]
    pub const fn arrow_height(&self) -> i32 {
        self.arrow_width
    }

    #[inline]
    pub const fn point_width(&self) -> i32 {
        self.chequer_width
    }

    #[inline]
    pub const fn border_width(&self) -> i32 {
        self.chequer_width / 2
    }

    #[inline]
    pub const fn border_height(&self) -> i32 {
        self.chequer_height() / 2
    }

    #[inline]
    pub const fn bar_width(&self) -> i32 {
        2 * self.chequer_width
    }

    #[inline]
    pub const fn bearoff_inside(&self) -> i32 {
        self.chequer_width
    }

    #[inline]
    pub const fn bearoff_width(&self) -> i32 {
        self.bearoff_inside() + 2 * self.border_width()
    }

    pub const fn board_width(&self) -> i32 {
        12 * self.chequer_width + 2 * self.bearoff_width() + self.bar_width()
    }

    pub const fn board_min_height(&self) -> i32 {
        11 * self.chequer_height() + 2 * self.border_height()
    }

    pub const fn board_height(&self) -> i32 {
        self.board_min_height() + self.extra_height
    }

    /// How far a point may reach past a stack of five chequers. A step
    /// function of the extra height with breakpoints at one to four units
    /// above a chequer height.
    pub const fn display_point_extra(&self) -> i32 {
        let ch = self.chequer_height();
        if self.extra_height >= ch + 4 {
            4
        } else if self.extra_height >= ch + 3 {
            3
        } else if self.extra_height >= ch + 2 {
            2
        } else if self.extra_height >= ch + 1 {
            1
        } else {
            0
        }
    }

    pub const fn display_point_height(&self) -> i32 {
        5 * self.chequer_height() + self.display_point_extra()
    }

    pub const fn point_height(&self) -> i32 {
        5 * self.chequer_height()
    }

    pub const fn bearoff_height(&self) -> i32 {
        5 * self.chequer_height()
    }

    pub const fn board_center_width(&self) -> i32 {
        6 * self.chequer_width
    }

    pub const fn board_center_height(&self) -> i32 {
        self.board_height() - 2 * (self.border_height() + self.point_height())
    }

    // ========================================================================
    // ORIGINS
    // ========================================================================

    pub const fn bar_x(&self) -> i32 {
        (self.board_width() - self.chequer_width) / 2
    }

    /// First chequer on the upper bar stack.
    pub const fn bar_y_upper(&self) -> i32 {
        self.board_height() / 2 - 16
    }

    /// First chequer on the lower bar stack.
    pub const fn bar_y_lower(&self) -> i32 {
        self.board_height() / 2 + 9
    }

    /// Left edge of point `n` (1..=24) in the anticlockwise layout.
    ///
    /// Points 1-6 and 19-24 share the right half, 7-18 the left half, and
    /// the halves are separated by the bar.
    pub const fn point_x(&self, n: i32) -> i32 {
        debug_assert!(n >= 1 && n <= 24, "point number out of range");
        let cw = self.chequer_width;
        let bw = self.board_width();
        if n < 7 {
            bw - self.bearoff_width() - n * cw
        } else if n < 13 {
            (bw - self.bar_width()) / 2 - (n - 6) * cw
        } else if n < 19 {
            self.bearoff_width() + (n - 13) * cw
        } else {
            (bw + self.bar_width()) / 2 + (n - 19) * cw
        }
    }

    pub const fn top_point_y(&self) -> i32 {
        self.board_height() - self.border_height() - self.chequer_height()
    }

    pub const fn bot_point_y(&self) -> i32 {
        self.border_height()
    }

    pub const fn bearoff_right_x(&self) -> i32 {
        self.board_width() - self.border_width() - self.chequer_width
    }

    pub const fn bearoff_left_x(&self) -> i32 {
        self.border_width()
    }

    /// Width between a tray and the bar.
    pub const fn play_width(&self) -> i32 {
        (self.board_width() - 2 * self.bearoff_width() - self.bar_width()) / 2
    }

    pub const fn play_height(&self) -> i32 {
        self.board_height() - 2 * self.border_height()
    }

    pub const fn cube_right_x(&self) -> i32 {
        self.bearoff_width() + (self.play_width() - self.cube_width) / 2
    }

    pub const fn cube_left_x(&self) -> i32 {
        self.board_width() - self.cube_right_x()
    }

    pub const fn cube_tray_x(&self) -> i32 {
        self.bearoff_left_x() + (self.bearoff_inside() - self.cube_width) / 2
    }

    pub const fn cube_centre_y(&self) -> i32 {
        self.border_height() + (self.play_height() - self.cube_height()) / 2
    }

    /// Cube y when owned by player zero.
    pub const fn cube_own_zero_y(&self) -> i32 {
        self.border_height()
    }

    /// Cube y when owned by player one.
    pub const fn cube_own_one_y(&self) -> i32 {
        self.board_height() - (self.cube_height() + self.border_height())
    }

    pub const fn cube_resign_left_x(&self) -> i32 {
        self.cube_left_x() - self.chequer_width
    }

    pub const fn cube_resign_right_x(&self) -> i32 {
        self.cube_right_x() + self.chequer_width
    }

    pub const fn hinge_bot_y(&self) -> i32 {
        (self.board_height() - self.cube_height()) / 2 - 2 * self.chequer_height() - self.hinge_height - 1
    }

    pub const fn hinge_top_y(&self) -> i32 {
        (self.board_height() + self.cube_height()) / 2 + 2 * self.chequer_height() + 1
    }

    // ========================================================================
    // POSITIONS
    // ========================================================================

    /// Most chequers drawn individually in `slot`; further chequers are
    /// drawn on the last one with a count label.
    #[inline]
    pub const fn stack_limit(slot: usize) -> i32 {
        if slot == 0 || slot == 25 {
            3
        } else {
            5
        }
    }

    /// Stack origin for `slot`.
    ///
    /// # Panics
    ///
    /// If `slot` is not below [`SLOTS`].
    pub fn slot(&self, orientation: Orientation, slot: usize) -> Slot {
        let ch = self.chequer_height();
        let cw = self.chequer_width;
        let top = self.top_point_y();
        let bot = self.bot_point_y();
        let (near_tray, far_tray) = match orientation {
            Orientation::Anticlockwise => (self.bearoff_right_x(), self.bearoff_left_x()),
            Orientation::Clockwise => (self.bearoff_left_x(), self.bearoff_right_x()),
        };
        let n = slot as i32;
        let point = |n: i32| match orientation {
            Orientation::Anticlockwise => n,
            Orientation::Clockwise if n <= 12 => 13 - n,
            Orientation::Clockwise => 37 - n,
        };

        match slot {
            0 => Slot { x: self.bar_x(), y: self.bar_y_lower(), dy: -ch },
            1..=12 => Slot { x: self.point_x(point(n)), y: top, dy: ch },
            13..=24 => Slot { x: self.point_x(point(n)), y: bot, dy: -ch },
            25 => Slot { x: self.bar_x(), y: self.bar_y_upper(), dy: ch },
            26 => Slot { x: near_tray, y: top, dy: cw },
            27 => Slot { x: near_tray, y: bot, dy: -cw },
            28 => Slot { x: far_tray, y: top, dy: cw },
            29 => Slot { x: far_tray, y: bot, dy: -cw },
            _ => panic!("slot {} is not on the board", slot),
        }
    }

    /// Top-left corner of the `chequer`-th chequer (from 1) in `slot`.
    pub fn chequer_position(&self, orientation: Orientation, slot: usize, chequer: u32) -> (i32, i32) {
        let s = self.slot(orientation, slot);
        let shown = (chequer as i32).min(Self::stack_limit(slot));
        (s.x, s.y - (shown - 1) * s.dy)
    }

    /// Clickable area of `slot` in pixels at `size` pixels per unit.
    pub fn point_area(&self, orientation: Orientation, size: i32, slot: usize) -> Rect {
        let s = self.slot(orientation, slot);
        let limit = Self::stack_limit(slot);
        let reach = (self.chequer_height() + self.display_point_extra()) * size;
        let mut y = s.y * size;
        let step = s.dy * size;

        let height = if step > 0 {
            let h = step * (limit - 1) + reach;
            y += self.chequer_height() * size - h;
            h
        } else {
            -step * (limit - 1) + reach
        };

        Rect { x: s.x * size, y, width: self.chequer_width * size, height }
    }

    /// Cube placement. Hidden in the Crawford game and when the cube is not
    /// in use; in the middle of the board while a double is pending;
    /// otherwise in the tray at the owner's end or the centre.
    pub fn cube_position(
        &self,
        crawford: bool,
        cube_use: bool,
        doubled: Option<Player>,
        owner: CubeOwner,
        orientation: Orientation,
    ) -> Placement {
        if crawford || !cube_use {
            return Placement::HIDDEN;
        }

        if let Some(doubler) = doubled {
            let orient = player_sign(doubler);
            let x = if orient > 0 { self.cube_right_x() } else { self.cube_left_x() };
            return Placement { x, y: self.cube_centre_y(), orient };
        }

        let x = match orientation {
            Orientation::Anticlockwise => self.cube_tray_x(),
            Orientation::Clockwise => self.board_width() - (self.bearoff_inside() + self.cube_tray_x()),
        };
        let (y, orient) = match owner {
            CubeOwner::Centered => (self.cube_centre_y(), 0),
            // An owned cube faces away from its owner, the opposite of a
            // pending double.
            CubeOwner::Owned(Player::Zero) => (self.cube_own_zero_y(), 1),
            CubeOwner::Owned(Player::One) => (self.cube_own_one_y(), -1),
        };
        Placement { x, y, orient }
    }

    /// Resignation flag. `resigned` is zero for no resignation, otherwise
    /// its sign says who resigned (positive for player one).
    pub fn resign_position(&self, resigned: i32) -> Placement {
        if resigned == 0 {
            return Placement::HIDDEN;
        }
        let x = if resigned < 0 { self.cube_resign_left_x() } else { self.cube_resign_right_x() };
        Placement { x, y: self.cube_centre_y(), orient: -resigned.signum() }
    }

    /// Pixel position of the arrow showing who is on roll, centred in the
    /// border next to that player's tray.
    pub fn arrow_position(&self, orientation: Orientation, turn: Player, size: i32) -> (i32, i32) {
        let tray = if turn == Player::One { 26 } else { 27 };
        let area = self.point_area(orientation, size, tray);
        let border = self.border_width();

        let mut x = if orientation.is_clockwise() {
            area.x + size * self.bearoff_inside()
        } else {
            area.x - size * border
        };
        x += size * (border - self.arrow_width) / 2;

        let mut y = if turn == Player::One {
            area.y + area.height
        } else {
            area.y - size * border
        };
        y += size * (border - self.arrow_height()) / 2;

        (x, y)
    }

    /// Top-left corners of the two dice, on the left half of the board or
    /// the right.
    pub fn dice_positions(&self, right_half: bool) -> [(i32, i32); 2] {
        let half = if right_half { 1 } else { 0 };
        let centre = self.bearoff_width()
            + 3 * self.point_width()
            + (6 * self.point_width() + self.bar_width()) * half;
        let x = centre - self.die_width / 2;
        let y = self.board_height() / 2 - self.die_height() / 2;
        [(x - self.die_width, y), (x + self.die_width, y)]
    }
}

/// Chequers to draw in each slot. `board` is seated by player, with
/// player one in array 1. Player zero's bar is slot 0, player one's slot
/// 25, and their borne-off chequers go to trays 27 and 26.
pub fn slot_counts(board: &Board, variant: Variant) -> [u32; SLOTS] {
    let mut counts = [0u32; SLOTS];
    let one = Perspective::for_side(Side::Mover);
    for i in 0..POINTS {
        counts[i + 1] = (one.own(board, i) + one.opposing(board, i)) as u32;
    }
    counts[0] = board.0[0][BAR] as u32;
    counts[25] = board.0[1][BAR] as u32;
    counts[26] = board.off(Side::Mover, variant);
    counts[27] = board.off(Side::Opponent, variant);
    counts
}

#[inline]
fn player_sign(player: Player) -> i32 {
    match player {
        Player::Zero => -1,
        Player::One => 1,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_counts() {
        let mut board = Board::initial(Variant::Standard);
        board.0[1][5] = 3;
        board.0[1][BAR] = 1;
        let counts = slot_counts(&board, Variant::Standard);
        assert_eq!(counts[6], 3);
        assert_eq!(counts[1], 2);
        assert_eq!(counts[24], 2);
        assert_eq!(counts[19], 5);
        assert_eq!((counts[0], counts[25]), (0, 1));
        assert_eq!((counts[26], counts[27]), (1, 0));
        assert_eq!(counts.iter().sum::<u32>(), 30);
    }

    #[test]
    fn test_default_dimensions() {
        let l = Layout::default();
        assert_eq!(l.board_width(), 108);
        assert_eq!(l.board_height(), 82);
        assert_eq!(l.bearoff_width(), 12);
        assert_eq!(l.play_width(), 36);
        assert_eq!(l.display_point_extra(), 4);
        assert_eq!(l.display_point_height(), 34);
        assert_eq!(l.bar_x(), 51);
        assert_eq!((l.bar_y_upper(), l.bar_y_lower()), (25, 50));
        assert_eq!((l.hinge_bot_y(), l.hinge_top_y()), (13, 57));
        assert_eq!(l.board_center_height(), 82 - 2 * (3 + 30));
    }

    #[test]
    fn test_display_point_extra_steps() {
        let mut l = Layout::default();
        for (extra, expected) in [(20, 4), (10, 4), (9, 3), (8, 2), (7, 1), (6, 0), (0, 0)] {
            l.extra_height = extra;
            assert_eq!(l.display_point_extra(), expected, "extra height {}", extra);
        }
    }

    #[test]
    fn test_point_x() {
        let l = Layout::default();
        assert_eq!(l.point_x(1), 90);
        assert_eq!(l.point_x(6), 60);
        assert_eq!(l.point_x(7), 42);
        assert_eq!(l.point_x(12), 12);
        assert_eq!(l.point_x(13), 12);
        assert_eq!(l.point_x(18), 42);
        assert_eq!(l.point_x(19), 60);
        assert_eq!(l.point_x(24), 90);
    }

    #[test]
    fn test_bar_gap_is_two_chequers() {
        let l = Layout::default();
        let left_edge_of_right_half = l.point_x(6);
        let right_edge_of_left_half = l.point_x(7) + l.chequer_width;
        assert_eq!(left_edge_of_right_half - right_edge_of_left_half, 2 * l.chequer_width);
    }

    #[test]
    fn test_slot_orientation() {
        let l = Layout::default();
        let a = l.slot(Orientation::Anticlockwise, 1);
        let c = l.slot(Orientation::Clockwise, 1);
        assert_eq!(a, Slot { x: 90, y: 73, dy: 6 });
        assert_eq!(c, Slot { x: 12, y: 73, dy: 6 });
        assert_eq!(l.slot(Orientation::Clockwise, 13).x, l.point_x(24));
        assert_eq!(l.slot(Orientation::Anticlockwise, 26).x, 99);
        assert_eq!(l.slot(Orientation::Clockwise, 26).x, 3);
        assert_eq!(l.slot(Orientation::Clockwise, 0), l.slot(Orientation::Anticlockwise, 0));
    }

    #[test]
    #[should_panic]
    fn test_slot_out_of_range() {
        Layout::default().slot(Orientation::Anticlockwise, 30);
    }

    #[test]
    fn test_chequer_position_caps_stack() {
        let l = Layout::default();
        assert_eq!(l.chequer_position(Orientation::Anticlockwise, 1, 1), (90, 73));
        assert_eq!(l.chequer_position(Orientation::Anticlockwise, 1, 5), (90, 49));
        assert_eq!(l.chequer_position(Orientation::Anticlockwise, 1, 9), (90, 49));
        // Bar stacks hold three.
        assert_eq!(l.chequer_position(Orientation::Anticlockwise, 0, 7), (51, 62));
        assert_eq!(l.chequer_position(Orientation::Anticlockwise, 13, 2), (12, 9));
    }

    #[test]
    fn test_point_area() {
        let l = Layout::default();
        // Upper stack: grows toward smaller y.
        let r = l.point_area(Orientation::Anticlockwise, 2, 1);
        assert_eq!(r, Rect { x: 180, y: 146 + 12 - 68, width: 12, height: 68 });
        // Lower stack.
        let r = l.point_area(Orientation::Anticlockwise, 2, 13);
        assert_eq!(r, Rect { x: 24, y: 6, width: 12, height: 68 });
    }

    #[test]
    fn test_cube_position() {
        let l = Layout::default();
        let hidden = l.cube_position(true, true, None, CubeOwner::Centered, Orientation::Anticlockwise);
        assert_eq!(hidden, Placement { x: NO_CUBE, y: NO_CUBE, orient: -1 });
        assert!(l.cube_position(false, false, None, CubeOwner::Centered, Orientation::Clockwise).is_hidden());

        let centred = l.cube_position(false, true, None, CubeOwner::Centered, Orientation::Anticlockwise);
        assert_eq!(centred, Placement { x: 3, y: 38, orient: 0 });
        let owned = l.cube_position(false, true, None, CubeOwner::Owned(Player::Zero), Orientation::Clockwise);
        assert_eq!(owned, Placement { x: 99, y: 3, orient: 1 });
        let owned = l.cube_position(false, true, None, CubeOwner::Owned(Player::One), Orientation::Anticlockwise);
        assert_eq!(owned, Placement { x: 3, y: 73, orient: -1 });
        let doubled = l.cube_position(false, true, Some(Player::One), CubeOwner::Centered, Orientation::Anticlockwise);
        assert_eq!(doubled, Placement { x: 27, y: 38, orient: 1 });
    }

    #[test]
    fn test_resign_position() {
        let l = Layout::default();
        assert!(l.resign_position(0).is_hidden());
        assert_eq!(l.resign_position(-2), Placement { x: 75, y: 38, orient: 1 });
        assert_eq!(l.resign_position(3), Placement { x: 33, y: 38, orient: -1 });
    }

    #[test]
    fn test_arrow_position() {
        let l = Layout::default();
        // Lower tray (27) for player zero: arrow above it in the border.
        let (x, y) = l.arrow_position(Orientation::Anticlockwise, Player::Zero, 1);
        assert_eq!((x, y), (99 - 3, 3 - 3));
        let (x, _) = l.arrow_position(Orientation::Clockwise, Player::One, 1);
        assert_eq!(x, 3 + 6);
    }

    #[test]
    fn test_dice_positions() {
        let l = Layout::default();
        assert_eq!(l.dice_positions(false), [(30 - 3 - 7, 38), (30 - 3 + 7, 38)]);
        assert_eq!(l.dice_positions(true)[0].0, 78 - 3 - 7);
    }
}
