//! Render a backgammon position to SVG.
//!
//! Usage:
//!   render --record "board:..." -o board.svg
//!   render --record "board:..." -o board.svg --clockwise --size 10
//!   render --record "board:..." --config bgtool.toml

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use backgammon_core::geometry::{slot_counts, SLOTS};
use backgammon_core::{fibs, Board, Layout, MatchState, Orientation, Player, POINTS};
use backgammon_tools::config::{RenderConfig, ToolConfig};

// ============================================================================
// Colours
// ============================================================================

const BG_COLOR: &str = "#1a1a1a";
const BOARD_BG: &str = "#2d5a3d";
const BORDER_COLOR: &str = "#5b3a1e";
const LIGHT_POINT: &str = "#d9c39a";
const DARK_POINT: &str = "#8b2e2e";
const ZERO_COLOR: &str = "#f4f1ea";
const ONE_COLOR: &str = "#2a2a2a";
const CUBE_COLOR: &str = "#fafafa";
const ARROW_COLOR: &str = "#f39c12";
const LABEL_COLOR: &str = "#e74c3c";

#[derive(Parser)]
#[command(name = "render", about = "Render a backgammon position to SVG")]
struct Args {
    /// Position as a `board:` record.
    #[arg(long)]
    record: String,

    #[arg(short, long, default_value = "board.svg")]
    output: PathBuf,

    /// Draw the home board on the left.
    #[arg(long)]
    clockwise: bool,

    /// Pixels per board unit.
    #[arg(long)]
    size: Option<i32>,

    /// Path to a TOML config file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

// ============================================================================
// SVG generation
// ============================================================================

fn chequer_color(player: Player) -> &'static str {
    match player {
        Player::Zero => ZERO_COLOR,
        Player::One => ONE_COLOR,
    }
}

/// Whose chequers sit in `slot`. `seated` has player one in array 1.
fn slot_owner(seated: &Board, slot: usize) -> Player {
    match slot {
        1..=POINTS if seated.0[1][slot - 1] > 0 => Player::One,
        1..=POINTS => Player::Zero,
        0 | 27 => Player::Zero,
        _ => Player::One,
    }
}

fn render_points(svg: &mut String, layout: &Layout, orientation: Orientation, size: i32) {
    let cw = layout.chequer_width * size;
    let height = layout.point_height() * size;

    for n in 1..=POINTS {
        let s = layout.slot(orientation, n);
        let (x, base) = if n <= 12 {
            (s.x * size, (s.y + layout.chequer_height()) * size)
        } else {
            (s.x * size, s.y * size)
        };
        let apex = if n <= 12 { base - height } else { base + height };
        let fill = if n % 2 == 0 { DARK_POINT } else { LIGHT_POINT };
        svg.push_str(&format!(
            "  <polygon points=\"{},{} {},{} {},{}\" fill=\"{}\"/>\n",
            x,
            base,
            x + cw,
            base,
            x + cw / 2,
            apex,
            fill
        ));
    }
}

fn render_chequers(svg: &mut String, layout: &Layout, orientation: Orientation, size: i32, seated: &Board, counts: &[u32; SLOTS]) {
    let cw = layout.chequer_width * size;
    let r = cw / 2;

    for (slot, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let color = chequer_color(slot_owner(seated, slot));
        let shown = count.min(Layout::stack_limit(slot) as u32);

        for k in 1..=shown {
            let (x, y) = layout.chequer_position(orientation, slot, k);
            let (x, y) = (x * size, y * size);
            if slot >= 26 {
                // Borne-off chequers are drawn edge on.
                svg.push_str(&format!(
                    "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" stroke=\"#000\" stroke-width=\"1\"/>\n",
                    x,
                    y + cw / 3,
                    cw,
                    cw / 3,
                    color
                ));
            } else {
                svg.push_str(&format!(
                    "  <circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" stroke=\"#000\" stroke-width=\"1\"/>\n",
                    x + r,
                    y + r,
                    r - 1,
                    color
                ));
            }
        }

        if count > shown {
            let (x, y) = layout.chequer_position(orientation, slot, shown);
            svg.push_str(&format!(
                "  <text x=\"{}\" y=\"{}\" font-family=\"system-ui, sans-serif\" font-size=\"{}\" font-weight=\"bold\" fill=\"{}\" text-anchor=\"middle\" dominant-baseline=\"central\">{}</text>\n",
                x * size + r,
                y * size + r,
                cw / 2,
                LABEL_COLOR,
                count
            ));
        }
    }
}

fn render_cube(svg: &mut String, layout: &Layout, orientation: Orientation, size: i32, ms: &MatchState) {
    let doubled = ms.doubled.then_some(ms.mover);
    let p = layout.cube_position(ms.crawford, ms.cube_use, doubled, ms.cube_owner, orientation);
    if p.is_hidden() {
        return;
    }

    let w = layout.cube_width * size;
    let (x, y) = (p.x * size, p.y * size);
    // A centred cube shows its top face.
    let value = if ms.cube <= 1 { 64 } else { ms.cube };
    let rotate = p.orient * 90;
    svg.push_str(&format!(
        "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\" fill=\"{}\" stroke=\"#000\" stroke-width=\"1\"/>\n",
        x,
        y,
        w,
        w,
        size,
        CUBE_COLOR
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" transform=\"rotate({} {} {})\" font-family=\"system-ui, sans-serif\" font-size=\"{}\" font-weight=\"bold\" fill=\"#000\" text-anchor=\"middle\" dominant-baseline=\"central\">{}</text>\n",
        x + w / 2,
        y + w / 2,
        rotate,
        x + w / 2,
        y + w / 2,
        w / 2,
        value
    ));
}

fn render_dice(svg: &mut String, layout: &Layout, orientation: Orientation, size: i32, ms: &MatchState) {
    // Player one rolls on the right half in the anticlockwise layout.
    let right_half = (ms.mover == Player::One) != orientation.is_clockwise();
    let w = layout.die_width * size;
    let color = chequer_color(ms.mover);
    let pip = chequer_color(ms.mover.opponent());

    for (&(x, y), &die) in layout.dice_positions(right_half).iter().zip(ms.dice.iter()) {
        let (x, y) = (x * size, y * size);
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\" fill=\"{}\" stroke=\"#000\" stroke-width=\"1\"/>\n",
            x, y, w, w, size, color
        ));
        for (px, py) in die_pips(die) {
            svg.push_str(&format!(
                "  <circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"/>\n",
                x + px * w / 4,
                y + py * w / 4,
                (w / 10).max(1),
                pip
            ));
        }
    }
}

/// Pip centres on a 4x4 grid for a die face.
fn die_pips(die: u8) -> &'static [(i32, i32)] {
    match die {
        1 => &[(2, 2)],
        2 => &[(1, 1), (3, 3)],
        3 => &[(1, 1), (2, 2), (3, 3)],
        4 => &[(1, 1), (3, 1), (1, 3), (3, 3)],
        5 => &[(1, 1), (3, 1), (2, 2), (1, 3), (3, 3)],
        6 => &[(1, 1), (3, 1), (1, 2), (3, 2), (1, 3), (3, 3)],
        _ => &[],
    }
}

fn render_arrow(svg: &mut String, layout: &Layout, orientation: Orientation, size: i32, turn: Player) {
    let (x, y) = layout.arrow_position(orientation, turn, size);
    let w = layout.arrow_width * size;
    let h = layout.arrow_height() * size;
    // Points toward the bearoff tray of the player on roll.
    let (tip, base) = if turn == Player::One { (y + h, y) } else { (y, y + h) };
    svg.push_str(&format!(
        "  <polygon points=\"{},{} {},{} {},{}\" fill=\"{}\"/>\n",
        x,
        base,
        x + w,
        base,
        x + w / 2,
        tip,
        ARROW_COLOR
    ));
}

/// SVG for `board` (mover-relative) and its match state.
fn render_position_svg(board: &Board, ms: &MatchState, layout: &Layout, orientation: Orientation, opts: &RenderConfig) -> String {
    let size = opts.size.max(1);
    let width = layout.board_width() * size;
    let height = layout.board_height() * size;
    let seated = board.seated(ms.mover);
    let counts = slot_counts(&seated, ms.variant);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">\n",
        width, height, width, height
    ));
    svg.push_str(&format!("  <rect width=\"{}\" height=\"{}\" fill=\"{}\"/>\n", width, height, BG_COLOR));

    // Frame, trays and bar
    svg.push_str(&format!(
        "  <rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
        width, height, BORDER_COLOR
    ));
    let inner_y = layout.border_height() * size;
    let inner_h = layout.play_height() * size;
    let play_w = layout.play_width() * size;
    let left = layout.bearoff_width() * size;
    let right = (layout.board_width() + layout.bar_width()) / 2 * size;
    for x in [left, right] {
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
            x, inner_y, play_w, inner_h, BOARD_BG
        ));
    }
    for x in [layout.bearoff_left_x(), layout.bearoff_right_x()] {
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
            x * size,
            inner_y,
            layout.bearoff_inside() * size,
            inner_h,
            BOARD_BG
        ));
    }

    render_points(&mut svg, layout, orientation, size);
    render_chequers(&mut svg, layout, orientation, size, &seated, &counts);

    if opts.show_cube {
        render_cube(&mut svg, layout, orientation, size, ms);
    }
    if opts.show_dice && ms.rolled() {
        render_dice(&mut svg, layout, orientation, size, ms);
    }
    if let Some(turn) = ms.turn {
        render_arrow(&mut svg, layout, orientation, size, turn);
    }

    svg.push_str("</svg>\n");
    svg
}

// ============================================================================
// CLI
// ============================================================================

fn main() -> Result<()> {
    backgammon_tools::init_logger();

    let args = Args::parse();
    let config = ToolConfig::load(args.config.as_deref())?.with_overrides(args.clockwise, args.size);
    debug!("config: {:?}", config);

    let (board, ms) =
        fibs::decode(&args.record).with_context(|| format!("Invalid board record: {}", args.record))?;
    let svg = render_position_svg(&board, &ms, &config.layout, config.orientation, &config.render);

    fs::write(&args.output, &svg).with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!("Wrote {}", args.output.display());
    Ok(())
}
