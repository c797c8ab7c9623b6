//! Interchange and invariant tests
//!
//! Loads reference positions from `tests/data/positions.json` and checks
//! position IDs, pip counts, move formatting and the position after each
//! move. The randomized tests cover the board and codec invariants over
//! seeded positions.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use backgammon_core::export::{parse_snowie, snowie_line};
use backgammon_core::fibs;
use backgammon_core::geometry::NO_CUBE;
use backgammon_core::match_state::truncate_name;
use backgammon_core::{
    board_from_position_id, format_move, parse_move, position_id, Board, CubeOwner, Layout, MatchState,
    Orientation, Player, PositionKey, Side, BAR, POINTS,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TestData {
    version: String,
    positions: Vec<Position>,
}

#[derive(Debug, Deserialize)]
struct Position {
    description: String,
    board: [[u8; 25]; 2],
    position_id: String,
    pips: [u32; 2],
    moves: Vec<MoveData>,
}

#[derive(Debug, Deserialize)]
struct MoveData {
    notation: String,
    formatted: String,
    after: String,
}

fn load_test_positions(path: &Path) -> TestData {
    let file = File::open(path).expect("Failed to open test positions file");
    serde_json::from_reader(BufReader::new(file)).expect("Failed to parse JSON")
}

#[test]
fn test_reference_positions() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/positions.json");
    if !path.exists() {
        println!("Skipping reference positions: {} not found", path.display());
        return;
    }

    let data = load_test_positions(&path);
    println!("Loaded {} positions (fixture version {})", data.positions.len(), data.version);
    let mut failures: Vec<String> = Vec::new();

    for pos in &data.positions {
        let board = Board(pos.board);
        let mut errors: Vec<String> = Vec::new();

        let id = position_id(&board);
        if id != pos.position_id {
            errors.push(format!("position id: expected {}, got {}", pos.position_id, id));
        }
        match board_from_position_id(&pos.position_id) {
            Ok(decoded) if decoded == board => {}
            other => errors.push(format!("decoding {}: {:?}", pos.position_id, other)),
        }

        let pips = [board.pip_count(Side::Mover), board.pip_count(Side::Opponent)];
        if pips != pos.pips {
            errors.push(format!("pips: expected {:?}, got {:?}", pos.pips, pips));
        }

        for m in &pos.moves {
            let mv = match parse_move(&m.notation) {
                Ok(mv) => mv,
                Err(e) => {
                    errors.push(format!("parsing {:?}: {}", m.notation, e));
                    continue;
                }
            };
            let text = format_move(&board, &mv);
            if text != m.formatted {
                errors.push(format!("{:?}: formatted as {:?}, expected {:?}", m.notation, text, m.formatted));
            }
            if parse_move(&text) != Ok(mv) {
                errors.push(format!("{:?} does not parse back", text));
            }

            let mut after = board;
            match after.apply_move(&mv) {
                Ok(()) => {
                    after.swap_sides();
                    let id = position_id(&after);
                    if id != m.after {
                        errors.push(format!("after {:?}: expected {}, got {}", m.notation, m.after, id));
                    }
                }
                Err(e) => errors.push(format!("applying {:?}: {}", m.notation, e)),
            }
        }

        if !errors.is_empty() {
            failures.push(format!("{}: {}", pos.description, errors.join("; ")));
        }
    }

    assert!(failures.is_empty(), "reference positions failed:\n{}", failures.join("\n"));
}

// ============================================================================
// RANDOMIZED INVARIANTS
// ============================================================================

/// A board with up to fifteen chequers a side and no shared points.
fn random_board(rng: &mut StdRng) -> Board {
    let mut board = Board::empty();
    for _ in 0..rng.random_range(0..=15) {
        let i = rng.random_range(0..=BAR);
        board.0[1][i] += 1;
    }
    let target = rng.random_range(0..=15);
    let mut placed = 0;
    while placed < target {
        let i = rng.random_range(0..=BAR);
        if i == BAR || board.0[1][POINTS - 1 - i] == 0 {
            board.0[0][i] += 1;
            placed += 1;
        }
    }
    board
}

fn random_legal_board(rng: &mut StdRng) -> Board {
    loop {
        let board = random_board(rng);
        if board.check_position() {
            return board;
        }
    }
}

/// A non-empty name of up to 40 characters, mixing one, two and three byte
/// characters, so that it often crosses the record length limit.
fn random_name(rng: &mut StdRng) -> String {
    const ALPHABET: [char; 8] = ['a', 'Z', '7', ' ', '_', 'é', 'ß', '字'];
    let len = rng.random_range(1..=40);
    let mut name: String = (0..len).map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())]).collect();
    if name.starts_with(' ') {
        name.replace_range(..1, "x");
    }
    name
}

/// `ms` with its names as they come back from a record.
fn with_record_names(ms: &MatchState) -> MatchState {
    MatchState { names: ms.names.clone().map(|n| truncate_name(&n)), ..ms.clone() }
}

fn random_state(rng: &mut StdRng) -> MatchState {
    let mover = if rng.random_bool(0.5) { Player::One } else { Player::Zero };
    let match_to = rng.random_range(0..=11u32);
    let score = if match_to > 0 {
        [rng.random_range(0..match_to), rng.random_range(0..match_to)]
    } else {
        [0, 0]
    };
    let cube_owner = match rng.random_range(0..3) {
        0 => CubeOwner::Centered,
        1 => CubeOwner::Owned(Player::Zero),
        _ => CubeOwner::Owned(Player::One),
    };
    MatchState {
        names: [random_name(rng), random_name(rng)],
        match_to,
        score,
        cube: 1 << rng.random_range(0..7),
        cube_owner,
        mover,
        turn: Some(mover),
        dice: [rng.random_range(1..=6), rng.random_range(1..=6)],
        ..MatchState::default()
    }
}

#[test]
fn test_double_swap_is_identity() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..500 {
        let board = random_board(&mut rng);
        assert_eq!(board.swapped().swapped(), board);
        assert_eq!(board.seated(Player::Zero).seated(Player::Zero), board);
    }
}

#[test]
fn test_sub_moves_conserve_chequers() {
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..200 {
        let mut board = random_board(&mut rng);
        for _ in 0..50 {
            let from = rng.random_range(0..=BAR);
            let die = rng.random_range(1..=6u8);
            let before = board;
            let (mover, opponent) = (board.chequers(Side::Mover), board.chequers(Side::Opponent));

            match board.apply_sub_move(from, die, true) {
                Ok(()) => {
                    let borne_off = (from as isize - die as isize) < 0;
                    assert_eq!(board.chequers(Side::Mover) + borne_off as u32, mover);
                    assert_eq!(board.chequers(Side::Opponent), opponent);
                }
                Err(_) => assert_eq!(board, before),
            }
            if rng.random_bool(0.3) {
                board.swap_sides();
            }
        }
    }
}

#[test]
fn test_wire_roundtrip() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..300 {
        let board = random_board(&mut rng);
        let mut ms = random_state(&mut rng);
        ms.crawford = ms.match_to > 0 && rng.random_bool(0.2);
        if rng.random_bool(0.2) {
            ms.doubled = true;
            ms.turn = Some(ms.mover.opponent());
        }

        let record = fibs::encode(&board, &ms);
        assert_eq!(fibs::decode(&record), Ok((board, with_record_names(&ms))), "record {}", record);
    }
}

#[test]
fn test_position_id_and_key_roundtrip() {
    let mut rng = StdRng::seed_from_u64(4);
    for _ in 0..300 {
        let board = random_legal_board(&mut rng);
        let id = position_id(&board);
        assert_eq!(board_from_position_id(&id), Ok(board), "id {}", id);
        assert_eq!(PositionKey::from_board(&board).to_board(), board);
    }
}

#[test]
fn test_snowie_roundtrip() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..300 {
        let board = random_legal_board(&mut rng);
        let mut ms = random_state(&mut rng);
        // The line flags only a Crawford game itself, and Jacoby only for money.
        ms.crawford = ms.match_to > 0 && ms.score.contains(&(ms.match_to - 1)) && rng.random_bool(0.5);
        ms.jacoby = ms.match_to == 0 && rng.random_bool(0.5);

        let line = snowie_line(&board, &ms);
        let (decoded, decoded_ms) = parse_snowie(&line).expect("snowie line parses");
        assert_eq!(decoded, board, "line {}", line);
        assert_eq!(decoded_ms, with_record_names(&ms), "line {}", line);
    }
}

#[test]
fn test_played_moves_format_and_parse() {
    let mut rng = StdRng::seed_from_u64(6);
    let mut checked = 0;
    while checked < 300 {
        let board = random_legal_board(&mut rng);
        let mut scratch = board;
        let mut mv = backgammon_core::Move::new();
        let die = rng.random_range(1..=6u8);
        let steps = if rng.random_bool(0.2) { 4 } else { 2 };

        for k in 0..steps {
            let die = if steps == 2 && k == 1 { rng.random_range(1..=6u8) } else { die };
            let sources: Vec<usize> = (0..=BAR).filter(|&i| scratch.0[1][i] > 0).collect();
            if sources.is_empty() {
                break;
            }
            let from = sources[rng.random_range(0..sources.len())];
            if scratch.apply_sub_move(from, die, true).is_ok() {
                let to = (from as i8 - die as i8).max(-1);
                mv.push(backgammon_core::SubMove::new(from as i8, to));
            }
        }
        if mv.is_empty() {
            continue;
        }

        let text = format_move(&board, &mv);
        assert_eq!(parse_move(&text), Ok(mv.canonical()), "{}", text);
        checked += 1;
    }
}

#[test]
fn test_point_origins_stay_off_the_bar() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..100 {
        let layout = Layout {
            chequer_width: rng.random_range(2..=20),
            extra_height: rng.random_range(0..=30),
            ..Layout::default()
        };
        let cw = layout.chequer_width;
        let bar_left = (layout.board_width() - layout.bar_width()) / 2;
        let bar_right = bar_left + layout.bar_width();
        assert_eq!(layout.bar_width(), 2 * cw);

        for n in 1..=24 {
            let x = layout.point_x(n);
            assert!(x + cw <= bar_left || x >= bar_right, "point {} overlaps the bar", n);
        }
        for run in [1..=6, 7..=12] {
            let xs: Vec<i32> = run.map(|n| layout.point_x(n)).collect();
            assert!(xs.windows(2).all(|w| w[0] - w[1] == cw));
        }
        for run in [13..=18, 19..=24] {
            let xs: Vec<i32> = run.map(|n| layout.point_x(n)).collect();
            assert!(xs.windows(2).all(|w| w[1] - w[0] == cw));
        }
    }
}

#[test]
fn test_hidden_cube_is_off_the_board() {
    let layout = Layout::default();
    for orientation in [Orientation::Anticlockwise, Orientation::Clockwise] {
        for (crawford, cube_use) in [(true, true), (false, false), (true, false)] {
            let p = layout.cube_position(crawford, cube_use, None, CubeOwner::Centered, orientation);
            assert_eq!((p.x, p.y), (NO_CUBE, NO_CUBE));
            assert!(p.x < 0 && p.y < 0);
        }
    }
}
