//! Convert, export and inspect backgammon positions.
//!
//! Usage:
//!   bgtool show "board:..."
//!   bgtool export snowie "board:..." position.txt
//!   bgtool export jf "board:..." position.pos
//!   bgtool export id "board:..." -
//!   bgtool import snowie position.txt
//!   bgtool move "board:..." "24/18 13/8"
//!
//! Positions are given as `board:` records. `-` as an output file means
//! standard output.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};

use backgammon_core::diagram::Diagram;
use backgammon_core::geometry::{slot_counts, SLOTS};
use backgammon_core::export::{read_jellyfish, read_snowie, write_jellyfish, write_snowie};
use backgammon_core::{
    fibs, format_move, format_move_compact, parse_move, position_id, Board, MatchState, Side,
};
use backgammon_tools::config::ToolConfig;

#[derive(Parser)]
#[command(name = "bgtool", about = "Convert, export and inspect backgammon positions")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Draw diagrams with the home board on the left.
    #[arg(long, global = true)]
    clockwise: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the board diagram of a record.
    Show { record: String },
    /// Write a record in another format.
    Export {
        format: ExportFormat,
        record: String,
        /// Output file, or `-` for standard output.
        output: String,
    },
    /// Read a position file and print it as a record.
    Import { format: ImportFormat, file: PathBuf },
    /// Play a move and print the resulting record.
    Move { record: String, notation: String },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExportFormat {
    Snowie,
    Jf,
    Fibs,
    Id,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ImportFormat {
    Snowie,
    Jf,
}

#[derive(Serialize)]
struct JsonPosition<'a> {
    position_id: String,
    pips: [u32; 2],
    board: &'a Board,
    state: &'a MatchState,
    chequers: Vec<JsonChequer>,
}

/// Where a chequer is drawn, in board units of the configured layout.
#[derive(Serialize, Debug, PartialEq)]
struct JsonChequer {
    slot: usize,
    x: i32,
    y: i32,
}

fn chequer_positions(board: &Board, ms: &MatchState, config: &ToolConfig) -> Vec<JsonChequer> {
    let counts = slot_counts(&board.seated(ms.mover), ms.variant);
    let mut out = Vec::new();
    for slot in 0..SLOTS {
        for k in 1..=counts[slot] {
            let (x, y) = config.layout.chequer_position(config.orientation, slot, k);
            out.push(JsonChequer { slot, x, y });
        }
    }
    out
}

fn main() -> Result<()> {
    backgammon_tools::init_logger();

    let cli = Cli::parse();
    let config = ToolConfig::load(cli.config.as_deref())?.with_overrides(cli.clockwise, None);
    debug!("config: {:?}", config);

    match cli.command {
        Command::Show { record } => show(&record, &config),
        Command::Export { format, record, output } => export(format, &record, &output, &config),
        Command::Import { format, file } => import(format, &file),
        Command::Move { record, notation } => play(&record, &notation),
    }
}

fn decode(record: &str) -> Result<(Board, MatchState)> {
    fibs::decode(record).with_context(|| format!("Invalid board record: {}", record))
}

fn points(score: u32) -> String {
    format!("{} point{}", score, if score == 1 { "" } else { "s" })
}

fn show(record: &str, config: &ToolConfig) -> Result<()> {
    let (board, ms) = decode(record)?;
    let other = ms.mover.opponent();

    let top = format!("O: {}", ms.name(other));
    let top_score = points(ms.score_of(other));
    let cube = if ms.is_match() {
        format!("Cube: {} ({} point match)", ms.cube, ms.match_to)
    } else {
        format!("Cube: {}", ms.cube)
    };
    let rolled = format!("Rolled {}{}", ms.dice[0], ms.dice[1]);
    let bottom_score = points(ms.score_of(ms.mover));
    let bottom = format!("X: {}", ms.name(ms.mover));

    let diagram = Diagram {
        orientation: config.orientation,
        variant: ms.variant,
        match_id: None,
        annotations: [
            Some(top.as_str()),
            Some(top_score.as_str()),
            None,
            Some(cube.as_str()),
            ms.rolled().then_some(rolled.as_str()),
            Some(bottom_score.as_str()),
            Some(bottom.as_str()),
        ],
    };
    print!("{}", diagram.draw(&board, true));
    println!(
        "Pip counts: X {}, O {}",
        board.pip_count(Side::Mover),
        board.pip_count(Side::Opponent)
    );
    Ok(())
}

fn open_output(output: &str) -> Result<Box<dyn Write>> {
    if output == "-" {
        return Ok(Box::new(io::stdout().lock()));
    }
    let file = File::create(output).with_context(|| format!("Failed to create {}", output))?;
    Ok(Box::new(BufWriter::new(file)))
}

fn export(format: ExportFormat, record: &str, output: &str, config: &ToolConfig) -> Result<()> {
    let (board, ms) = decode(record)?;
    let mut writer = open_output(output)?;

    match format {
        ExportFormat::Snowie => write_snowie(&mut writer, &board, &ms)?,
        ExportFormat::Jf => write_jellyfish(&mut writer, &board, &ms)?,
        ExportFormat::Fibs => writeln!(writer, "{}", fibs::encode(&board, &ms))?,
        ExportFormat::Id => writeln!(writer, "{}", position_id(&board))?,
        ExportFormat::Json => {
            let position = JsonPosition {
                position_id: position_id(&board),
                pips: [board.pip_count(Side::Mover), board.pip_count(Side::Opponent)],
                board: &board,
                state: &ms,
                chequers: chequer_positions(&board, &ms, config),
            };
            serde_json::to_writer_pretty(&mut writer, &position)?;
            writeln!(writer)?;
        }
    }
    writer.flush().with_context(|| format!("Failed to write {}", output))?;

    if output != "-" {
        info!("Wrote {:?} position to {}", format, output);
    }
    Ok(())
}

fn import(format: ImportFormat, path: &Path) -> Result<()> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let (board, ms) = match format {
        ImportFormat::Snowie => read_snowie(reader),
        ImportFormat::Jf => read_jellyfish(reader),
    }
    .with_context(|| format!("Failed to import {}", path.display()))?;

    info!("Imported {} ({:?})", path.display(), format);
    println!("{}", fibs::encode(&board, &ms));
    Ok(())
}

fn play(record: &str, notation: &str) -> Result<()> {
    let (mut board, mut ms) = decode(record)?;
    let mv = parse_move(notation).with_context(|| format!("Invalid move: {}", notation))?;

    let text = format_move(&board, &mv);
    let compact = format_move_compact(&board, &mv);
    board.apply_move(&mv).with_context(|| format!("Illegal move: {}", text))?;

    if let Some(result) = board.game_result(ms.variant) {
        info!("{} wins {} point(s)", ms.name(ms.mover), result.kind.points() * ms.cube);
    }

    board.swap_sides();
    ms.mover = ms.mover.opponent();
    ms.turn = Some(ms.mover);
    ms.dice = [0, 0];

    println!("{}", text);
    if compact != text {
        println!("{}", compact);
    }
    println!("{}", fibs::encode(&board, &ms));
    Ok(())
}
