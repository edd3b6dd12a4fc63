use clap::{Parser, ValueEnum};
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use std::io::{self, BufRead, Write};
use sudoku_engine::{Difficulty, FillMode, Game, Generator, Strategy, ValidationOutcome};

#[derive(Parser)]
#[command(name = "sudoku", about = "Generate, edit, and validate Sudoku boards")]
struct Args {
    /// Start directly at this difficulty instead of prompting
    #[arg(short, long, value_enum)]
    difficulty: Option<DifficultyArg>,
    /// Seed the board generator for reproducible puzzles
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let difficulty = match args.difficulty {
        Some(arg) => arg.into(),
        None => choose_difficulty(&mut input)?,
    };
    let mut game = match args.seed {
        Some(seed) => Game::with_generator(Generator::with_seed(seed)),
        None => Game::new(),
    };
    game.new_puzzle(difficulty);
    log::info!("new {} puzzle (seed: {:?})", difficulty, args.seed);

    loop {
        clear_screen()?;
        println!("===== SUDOKU =====\n");
        print!("{}", game.board());

        println!("\nOptions:");
        println!("1. Insert value");
        println!("2. Check board");
        println!("3. Fill whole board");
        println!("4. Complete current board");
        println!("5. New game");
        println!("6. Quit");

        match read_number(&mut input, "\nYour choice (1-6): ")? {
            Some(1) => insert_value(&mut input, &mut game)?,
            Some(2) => check_board(&mut input, &mut game)?,
            Some(3) => fill_board(&mut input, &mut game, false)?,
            Some(4) => fill_board(&mut input, &mut game, true)?,
            Some(5) => {
                let difficulty = choose_difficulty(&mut input)?;
                game.new_puzzle(difficulty);
            }
            Some(6) => break,
            _ => pause(&mut input, "Invalid option.")?,
        }
    }

    println!("Thanks for playing!");
    Ok(())
}

fn choose_difficulty(input: &mut impl BufRead) -> io::Result<Difficulty> {
    loop {
        println!("Choose a difficulty:");
        println!("1. Easy   (40 givens)");
        println!("2. Medium (16 givens)");
        println!("3. Hard   (8 givens)");
        match read_number(input, "Your choice (1-3): ")? {
            Some(1) => return Ok(Difficulty::Easy),
            Some(2) => return Ok(Difficulty::Medium),
            Some(3) => return Ok(Difficulty::Hard),
            _ => println!("Invalid choice.\n"),
        }
    }
}

fn insert_value(input: &mut impl BufRead, game: &mut Game) -> io::Result<()> {
    let row = read_number(input, "Row (1-9): ")?;
    let col = read_number(input, "Column (1-9): ")?;
    let value = read_number(input, "Value (1-9, 0 clears): ")?;

    let (Some(row), Some(col), Some(value)) = (row, col, value) else {
        return pause(input, "Invalid input.");
    };
    if !(1..=9).contains(&row) || !(1..=9).contains(&col) || value > 9 {
        return pause(input, "Row and column must be 1-9, value 0-9.");
    }

    // Players use 1-based coordinates; the engine is 0-based
    match game.set_value(row as usize - 1, col as usize - 1, value as u8) {
        Ok(()) => Ok(()),
        Err(err) => pause(input, &format!("{}", err)),
    }
}

fn check_board(input: &mut impl BufRead, game: &mut Game) -> io::Result<()> {
    println!("How should the board be checked?");
    println!("1. Sequential (1 worker)");
    println!("2. Parallel, 11 tasks");
    println!("3. Parallel, 27 tasks");

    let strategy = match read_number(input, "Your choice (1-3): ")? {
        Some(2) => Strategy::Split11,
        Some(3) => Strategy::Split27,
        _ => Strategy::Sequential,
    };

    let outcome = game.validate(strategy);
    print_report(strategy, &outcome);
    pause(input, "")
}

fn print_report(strategy: Strategy, outcome: &ValidationOutcome) {
    let stats = &outcome.stats;
    println!("\n{} check: board is {}", strategy, verdict_text(outcome));
    println!(
        "  tasks: {}, cells checked: {}, conflicts: {}, incomplete units: {}",
        stats.tasks, stats.cells_checked, stats.conflicts, stats.incomplete_units
    );
    println!("  wall: {:?}, busy: {:?}", stats.elapsed, stats.busy);
}

fn verdict_text(outcome: &ValidationOutcome) -> &'static str {
    if outcome.valid {
        "VALID"
    } else if outcome.has_conflicts() {
        "INVALID (conflicting digits)"
    } else {
        "INVALID (incomplete)"
    }
}

fn fill_board(input: &mut impl BufRead, game: &mut Game, keep_givens: bool) -> io::Result<()> {
    println!("Fill with:");
    println!("1. Valid digits (backtracking)");
    println!("2. Random digits (may be invalid)");

    let mode = match read_number(input, "Your choice (1-2): ")? {
        Some(2) => FillMode::Random,
        _ => FillMode::Solved,
    };

    if keep_givens {
        if let Err(err) = game.complete_board(mode) {
            return pause(input, &format!("Could not complete the board: {}", err));
        }
    } else {
        game.fill_board(mode);
    }
    Ok(())
}

fn read_number(input: &mut impl BufRead, prompt: &str) -> io::Result<Option<u32>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
    }
    Ok(line.trim().parse().ok())
}

fn pause(input: &mut impl BufRead, message: &str) -> io::Result<()> {
    if !message.is_empty() {
        println!("{}", message);
    }
    print!("Press Enter to continue...");
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}

fn clear_screen() -> io::Result<()> {
    execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))
}
