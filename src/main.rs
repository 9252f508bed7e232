mod board;
mod levels;
mod save;
mod session;
mod ui;

use clap::Parser;
use levels::Levels;
use save::{FileStore, MemStore, ScoreStore};
use session::{Command, Outcome, Session};
use std::io;
use std::process;

#[derive(Parser)]
#[command(name = "crateshift")]
#[command(about = "A terminal Sokoban game", long_about = None)]
struct Args {
    /// Path to a custom levels file (XSB format); defaults to the built-in set
    #[arg(value_name = "FILE")]
    levels_file: Option<String>,

    /// Save file path
    #[arg(short, long, default_value = "crateshift_save.json")]
    save_file: String,

    /// Start at this level (1-indexed), overriding the saved position
    #[arg(short, long)]
    level: Option<usize>,

    /// Play without reading or writing the save file
    #[arg(long, default_value = "false")]
    no_save: bool,
}

/// The blocking event loop: draw, wait for a command, apply it.
/// Returns true if the player completed the final level.
fn run<S: ScoreStore>(mut session: Session<S>) -> io::Result<bool> {
    let mut tui = ui::Tui::new()?;
    let mut selected = session.current_level();

    loop {
        tui.draw(&session, selected)?;

        let Some(cmd) = tui.read_command(&session, &mut selected)? else {
            continue;
        };
        if cmd == Command::OpenLevelSelect {
            selected = session.current_level();
        }

        match session.apply(cmd) {
            Outcome::Quit => return Ok(false),
            Outcome::AllComplete => return Ok(true),
            Outcome::LevelComplete { .. } | Outcome::Continue => {}
        }
    }
}

fn start<S: ScoreStore>(levels: Levels, store: S, start_level: Option<usize>) -> io::Result<bool> {
    let session = match Session::new(levels, store, start_level) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error starting game: {}", e);
            process::exit(1);
        }
    };
    run(session)
}

fn main() {
    let args = Args::parse();

    // Load the level catalog
    let levels = match &args.levels_file {
        Some(path) => Levels::from_file(path),
        None => Levels::builtin(),
    };
    let levels = match levels {
        Ok(levels) => levels,
        Err(e) => {
            eprintln!("Error loading levels: {}", e);
            process::exit(1);
        }
    };

    // Validate the start level override
    if let Some(level) = args.level {
        if level == 0 || level > levels.len() {
            eprintln!(
                "Error: level {} not found (catalog contains {} levels)",
                level,
                levels.len()
            );
            process::exit(1);
        }
    }
    let start_level = args.level.map(|l| l - 1);

    let result = if args.no_save {
        start(levels, MemStore::default(), start_level)
    } else {
        start(levels, FileStore::new(&args.save_file), start_level)
    };

    match result {
        Ok(true) => println!("Congratulations! You've completed all levels!"),
        Ok(false) => {}
        Err(e) => {
            eprintln!("Terminal error: {}", e);
            process::exit(1);
        }
    }
}
