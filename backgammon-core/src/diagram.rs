//! ASCII board diagram.
//!
//! ```text
//!  GNU Backgammon  Position ID: 4HPwATDgc/ABMA
//!  +13-14-15-16-17-18------19-20-21-22-23-24-+
//!  | X           O    |   | O              X |
//!  | X           O    |   | O              X |
//!  | X           O    |   | O                |
//!  | X                |   | O                |
//!  | X                |   | O                |
//! v|                  |BAR|                  |
//!  | O                |   | X                |
//!  | O                |   | X                |
//!  | O           X    |   | X                |
//!  | O           X    |   | X              O |
//!  | O           X    |   | X              O |
//!  +12-11-10--9--8--7-------6--5--4--3--2--1-+
//! ```
//!
//! Array 1 of the board is drawn as `X` on the lower half, array 0 as `O`.
//! Stacks taller than four show their count in the fifth row. Borne-off
//! chequers are drawn beside the home board. The clockwise layout mirrors
//! the board left to right and moves the trays to the left edge.

use crate::board::{Board, Perspective, Side, Variant, BAR};
use crate::geometry::Orientation;
use crate::position_id::position_id;

const OVERFLOW_X: &[u8; 16] = b"     X6789ABCDEF";
const OVERFLOW_O: &[u8; 16] = b"     O6789ABCDEF";

const TOP_LABEL_STD: &str = " +13-14-15-16-17-18------19-20-21-22-23-24-+     ";
const BOTTOM_LABEL_STD: &str = " +12-11-10--9--8--7-------6--5--4--3--2--1-+     ";
const TOP_LABEL_CLS: &str = "    +24-23-22-21-20-19------18-17-16-15-14-13-+  ";
const BOTTOM_LABEL_CLS: &str = "    +-1--2--3--4--5--6-------7--8--9-10-11-12-+  ";
const BAR_LINE: &str = "|                  |BAR|                  |";

/// Lines of right-hand text: 0 beside the top label, 1 and 2 beside the
/// first two rows, 3 beside the bar line, 4 and 5 beside the last two rows,
/// 6 beside the bottom label.
pub type Annotations<'a> = [Option<&'a str>; 7];

/// Everything about a diagram except the board itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct Diagram<'a> {
    pub orientation: Orientation,
    pub variant: Variant,
    pub match_id: Option<&'a str>,
    pub annotations: Annotations<'a>,
}

/// Draw `board` with no annotations. See [`Diagram::draw`].
pub fn draw_board(board: &Board, on_roll: bool, orientation: Orientation, variant: Variant) -> String {
    Diagram { orientation, variant, ..Diagram::default() }.draw(board, on_roll)
}

impl Diagram<'_> {
    /// Draw `board`. `on_roll` says whether `X` (array 1) is the side to
    /// move; it flips the point labels and the roll marker, and the header
    /// always shows the position ID of the side to move.
    pub fn draw(&self, board: &Board, on_roll: bool) -> String {
        let id = if on_roll { position_id(board) } else { position_id(&board.swapped()) };
        let mut out = String::with_capacity(1024);

        match self.orientation {
            Orientation::Anticlockwise => {
                out.push_str(&format!(" {:<15} {}: {}\n", "GNU Backgammon", "Position ID", id));
                if let Some(match_id) = self.match_id.filter(|m| !m.is_empty()) {
                    out.push_str(&format!("                 Match ID   : {}\n", match_id));
                }
                self.draw_std(&mut out, board, on_roll);
            }
            Orientation::Clockwise => {
                out.push_str(&format!("{:>18}  {}: {}\n", "GNU Backgammon", "Position ID", id));
                if let Some(match_id) = self.match_id.filter(|m| !m.is_empty()) {
                    out.push_str(&format!("                    Match ID   : {}\n", match_id));
                }
                self.draw_cls(&mut out, board, on_roll);
            }
        }
        out
    }

    fn annotate(&self, out: &mut String, line: usize) {
        if let Some(text) = self.annotations[line] {
            out.push_str(text);
        }
    }

    fn draw_std(&self, out: &mut String, board: &Board, on_roll: bool) {
        let off_o = board.off(Side::Opponent, self.variant);
        let off_x = board.off(Side::Mover, self.variant);
        let (top, bottom) =
            if on_roll { (TOP_LABEL_STD, BOTTOM_LABEL_STD) } else { (BOTTOM_LABEL_STD, TOP_LABEL_STD) };

        out.push_str(top);
        self.annotate(out, 0);
        out.push('\n');

        let (upper_left, upper_right) = (run(12, true), run(18, true));
        for y in 0..4u8 {
            out.push(' ');
            push_row(out, &upper_left, bar_o(board, y), &upper_right, |x| cell(board, x, y));
            out.push(' ');
            push_tray(out, off_o, [0, 1, 2], y as u32, 'O');
            out.push(' ');
            if y < 2 {
                self.annotate(out, y as usize + 1);
            }
            out.push('\n');
        }
        out.push(' ');
        push_row(out, &upper_left, overflow(OVERFLOW_O, board.0[0][BAR]), &upper_right, |x| {
            overflow_cell(board, x)
        });
        out.push(' ');
        push_tray(out, off_o, [0, 1, 2], 4, 'O');
        out.push('\n');

        out.push(if on_roll { 'v' } else { '^' });
        out.push_str(BAR_LINE);
        out.push_str("     ");
        self.annotate(out, 3);
        out.push('\n');

        let (lower_left, lower_right) = (run(11, false), run(5, false));
        out.push(' ');
        push_row(out, &lower_left, overflow(OVERFLOW_X, board.0[1][BAR]), &lower_right, |x| {
            overflow_cell(board, x)
        });
        out.push(' ');
        push_tray(out, off_x, [0, 1, 2], 4, 'X');
        out.push('\n');
        for y in (0..4u8).rev() {
            out.push(' ');
            push_row(out, &lower_left, bar_x(board, y), &lower_right, |x| cell(board, x, y));
            out.push(' ');
            push_tray(out, off_x, [0, 1, 2], y as u32, 'X');
            out.push(' ');
            if y < 2 {
                self.annotate(out, 5 - y as usize);
            }
            out.push('\n');
        }

        out.push_str(bottom);
        self.annotate(out, 6);
        out.push('\n');
    }

    fn draw_cls(&self, out: &mut String, board: &Board, on_roll: bool) {
        let off_o = board.off(Side::Opponent, self.variant);
        let off_x = board.off(Side::Mover, self.variant);
        let (top, bottom) =
            if on_roll { (TOP_LABEL_CLS, BOTTOM_LABEL_CLS) } else { (BOTTOM_LABEL_CLS, TOP_LABEL_CLS) };

        out.push_str(top);
        self.annotate(out, 0);
        out.push('\n');

        let (upper_left, upper_right) = (run(23, false), run(17, false));
        for y in 0..4u8 {
            push_tray(out, off_o, [2, 1, 0], y as u32, 'O');
            out.push(' ');
            push_row(out, &upper_left, bar_o(board, y), &upper_right, |x| cell(board, x, y));
            out.push_str("  ");
            if y < 2 {
                self.annotate(out, y as usize + 1);
            }
            out.push('\n');
        }
        push_tray(out, off_o, [2, 1, 0], 4, 'O');
        out.push(' ');
        push_row(out, &upper_left, overflow(OVERFLOW_O, board.0[0][BAR]), &upper_right, |x| {
            overflow_cell(board, x)
        });
        out.push_str("  \n");

        out.push_str("    ");
        out.push_str(BAR_LINE);
        out.push(if on_roll { 'v' } else { '^' });
        out.push(' ');
        self.annotate(out, 3);
        out.push('\n');

        let (lower_left, lower_right) = (run(0, true), run(6, true));
        push_tray(out, off_x, [2, 1, 0], 4, 'X');
        out.push(' ');
        push_row(out, &lower_left, overflow(OVERFLOW_X, board.0[1][BAR]), &lower_right, |x| {
            overflow_cell(board, x)
        });
        out.push_str("  \n");
        for y in (0..4u8).rev() {
            push_tray(out, off_x, [2, 1, 0], y as u32, 'X');
            out.push(' ');
            push_row(out, &lower_left, bar_x(board, y), &lower_right, |x| cell(board, x, y));
            out.push_str("  ");
            if y < 2 {
                self.annotate(out, 5 - y as usize);
            }
            out.push('\n');
        }

        out.push_str(bottom);
        self.annotate(out, 6);
        out.push('\n');
    }
}

/// Six consecutive array indices starting at `start`.
fn run(start: usize, ascending: bool) -> [usize; 6] {
    std::array::from_fn(|k| if ascending { start + k } else { start - k })
}

/// `X` or `O` if the stack on array index `x` reaches row `y`.
fn cell(board: &Board, x: usize, y: u8) -> char {
    if board.0[1][x] > y {
        'X'
    } else if board.0[0][Perspective::mirror(x)] > y {
        'O'
    } else {
        ' '
    }
}

fn overflow(chars: &[u8; 16], count: u8) -> char {
    chars.get(count as usize).map_or('?', |&c| c as char)
}

fn overflow_cell(board: &Board, x: usize) -> char {
    match board.0[1][x] {
        0 => overflow(OVERFLOW_O, board.0[0][Perspective::mirror(x)]),
        n => overflow(OVERFLOW_X, n),
    }
}

fn bar_o(board: &Board, y: u8) -> char {
    if board.0[0][BAR] > y { 'O' } else { ' ' }
}

fn bar_x(board: &Board, y: u8) -> char {
    if board.0[1][BAR] > y { 'X' } else { ' ' }
}

fn push_row(out: &mut String, left: &[usize; 6], bar: char, right: &[usize; 6], cell: impl Fn(usize) -> char) {
    out.push('|');
    for &x in left {
        out.push(' ');
        out.push(cell(x));
        out.push(' ');
    }
    out.push_str("| ");
    out.push(bar);
    out.push_str(" |");
    for &x in right {
        out.push(' ');
        out.push(cell(x));
        out.push(' ');
    }
    out.push('|');
}

/// Three columns of borne-off chequers, five to a column.
fn push_tray(out: &mut String, off: u32, columns: [u32; 3], y: u32, c: char) {
    for k in columns {
        out.push(if off > 5 * k + y { c } else { ' ' });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INITIAL_STD: [&str; 14] = [
        " GNU Backgammon  Position ID: 4HPwATDgc/ABMA",
        " +13-14-15-16-17-18------19-20-21-22-23-24-+     ",
        " | X           O    |   | O              X |     ",
        " | X           O    |   | O              X |     ",
        " | X           O    |   | O                |     ",
        " | X                |   | O                |     ",
        " | X                |   | O                |    ",
        "v|                  |BAR|                  |     ",
        " | O                |   | X                |    ",
        " | O                |   | X                |     ",
        " | O           X    |   | X                |     ",
        " | O           X    |   | X              O |     ",
        " | O           X    |   | X              O |     ",
        " +12-11-10--9--8--7-------6--5--4--3--2--1-+     ",
    ];

    fn bearing_off() -> Board {
        let mut board = Board::empty();
        board.0[1][0] = 8;
        board.0[0][BAR] = 2;
        board.0[0][5] = 7;
        board
    }

    fn annotations() -> Annotations<'static> {
        [Some("a0"), Some("a1"), Some("a2"), Some("a3"), Some("a4"), Some("a5"), Some("a6")]
    }

    #[test]
    fn test_initial_anticlockwise() {
        let text = draw_board(&Board::initial(Variant::Standard), true, Orientation::Anticlockwise, Variant::Standard);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 14);
        for (i, (got, want)) in lines.iter().zip(INITIAL_STD).enumerate() {
            assert_eq!(*got, want, "line {}", i);
        }
    }

    #[test]
    fn test_initial_clockwise() {
        let text = draw_board(&Board::initial(Variant::Standard), true, Orientation::Clockwise, Variant::Standard);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "    GNU Backgammon  Position ID: 4HPwATDgc/ABMA");
        assert_eq!(lines[1], "    +24-23-22-21-20-19------18-17-16-15-14-13-+  ");
        assert_eq!(lines[2], "    | X              O |   |    O           X |  ");
        assert_eq!(lines[7], "    |                  |BAR|                  |v ");
        assert_eq!(lines[12], "    | O              X |   |    X           O |  ");
        assert_eq!(lines[13], "    +-1--2--3--4--5--6-------7--8--9-10-11-12-+  ");
    }

    #[test]
    fn test_annotated_not_on_roll() {
        let board = bearing_off();
        let diagram = Diagram {
            match_id: Some("cAkAAAAAAAAA"),
            annotations: annotations(),
            ..Diagram::default()
        };
        let text = diagram.draw(&board, false);
        let lines: Vec<&str> = text.lines().collect();
        let expected = [
            "                 Match ID   : cAkAAAAAAAAA",
            " +12-11-10--9--8--7-------6--5--4--3--2--1-+     a0",
            " |                  | O | O                | OO  a1",
            " |                  | O | O                | O   a2",
            " |                  |   | O                | O   ",
            " |                  |   | O                | O   ",
            " |                  |   | 7                | O  ",
            "^|                  |BAR|                  |     a3",
            " |                  |   |                8 | X  ",
            " |                  |   |                X | X   ",
            " |                  |   |                X | X   ",
            " |                  |   |                X | XX  a4",
            " |                  |   |                X | XX  a5",
            " +13-14-15-16-17-18------19-20-21-22-23-24-+     a6",
        ];
        assert_eq!(&lines[1..], &expected);
        assert!(lines[0].ends_with(&position_id(&board.swapped())));
    }

    #[test]
    fn test_annotated_clockwise() {
        let diagram = Diagram {
            orientation: Orientation::Clockwise,
            match_id: Some("cAkAAAAAAAAA"),
            annotations: annotations(),
            ..Diagram::default()
        };
        let text = diagram.draw(&bearing_off(), false);
        let lines: Vec<&str> = text.lines().collect();
        let expected = [
            "                    Match ID   : cAkAAAAAAAAA",
            "    +-1--2--3--4--5--6-------7--8--9-10-11-12-+  a0",
            " OO |                O | O |                  |  a1",
            "  O |                O | O |                  |  a2",
            "  O |                O |   |                  |  ",
            "  O |                O |   |                  |  ",
            "  O |                7 |   |                  |  ",
            "    |                  |BAR|                  |^ a3",
            "  X | 8                |   |                  |  ",
            "  X | X                |   |                  |  ",
            "  X | X                |   |                  |  ",
            " XX | X                |   |                  |  a4",
            " XX | X                |   |                  |  a5",
            "    +24-23-22-21-20-19------18-17-16-15-14-13-+  a6",
        ];
        assert_eq!(&lines[1..], &expected);
    }

    #[test]
    fn test_empty_match_id_is_skipped() {
        let diagram = Diagram { match_id: Some(""), ..Diagram::default() };
        let text = diagram.draw(&Board::initial(Variant::Standard), true);
        assert_eq!(text.lines().count(), 14);
    }
}
