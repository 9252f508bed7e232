use std::io::{self, Stdout, Write};

use crossterm::cursor;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::Print;
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};

use crate::board::Direction;
use crate::save::ScoreStore;
use crate::session::{Command, Mode, Session};

/// Raw-mode terminal frontend. Draws read-only session snapshots and
/// translates key presses into commands; all game logic stays in the
/// session.
pub struct Tui {
    out: Stdout,
}

impl Tui {
    pub fn new() -> io::Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, cursor::Hide)?;
        Ok(Tui { out })
    }

    /// Redraw the whole screen for the session's current mode.
    pub fn draw<S: ScoreStore>(&mut self, session: &Session<S>, selected: usize) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All))?;
        match session.mode() {
            Mode::Playing => self.draw_board(session)?,
            Mode::LevelSelect => self.draw_level_select(session, selected)?,
        }
        self.out.flush()
    }

    fn draw_board<S: ScoreStore>(&mut self, session: &Session<S>) -> io::Result<()> {
        let level = session.current_level();
        let best = match session.best_score(level) {
            Some(best) => best.to_string(),
            None => "-".to_string(),
        };
        let hud = format!(
            "Level {}/{}   Moves: {}   Best: {}",
            level + 1,
            session.level_count(),
            session.board().moves(),
            best
        );

        queue!(self.out, cursor::MoveTo(0, 0), Print(&hud))?;

        let board = session.board().to_string();
        for (i, line) in board.lines().enumerate() {
            queue!(self.out, cursor::MoveTo(0, i as u16 + 2), Print(line))?;
        }

        let footer_row = session.board().height() as u16 + 3;
        queue!(
            self.out,
            cursor::MoveTo(0, footer_row),
            Print("arrows/wasd: move   r: reset   space: save   q: levels   esc: quit")
        )?;
        Ok(())
    }

    fn draw_level_select<S: ScoreStore>(
        &mut self,
        session: &Session<S>,
        selected: usize,
    ) -> io::Result<()> {
        queue!(self.out, cursor::MoveTo(0, 0), Print("Level Select"))?;

        for level in 0..session.level_count() {
            let marker = if level == selected { '>' } else { ' ' };
            let status = if !session.is_unlocked(level) {
                "locked".to_string()
            } else {
                match session.best_score(level) {
                    Some(best) => format!("best: {}", best),
                    None => String::new(),
                }
            };
            let line = format!("{} Level {:<3} {}", marker, level + 1, status);
            queue!(self.out, cursor::MoveTo(0, level as u16 + 2), Print(line))?;
        }

        let footer_row = session.level_count() as u16 + 3;
        queue!(
            self.out,
            cursor::MoveTo(0, footer_row),
            Print("up/down: choose   enter: play   esc: back")
        )?;
        Ok(())
    }

    /// Block until the next key press that means something.
    ///
    /// Returns None when the screen should simply be redrawn (selection
    /// cursor moved, terminal resized).
    pub fn read_command<S: ScoreStore>(
        &mut self,
        session: &Session<S>,
        selected: &mut usize,
    ) -> io::Result<Option<Command>> {
        loop {
            let Event::Key(key) = event::read()? else {
                return Ok(None);
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            let cmd = match session.mode() {
                Mode::Playing => match key.code {
                    KeyCode::Up | KeyCode::Char('w') => Some(Command::Move(Direction::Up)),
                    KeyCode::Down | KeyCode::Char('s') => Some(Command::Move(Direction::Down)),
                    KeyCode::Left | KeyCode::Char('a') => Some(Command::Move(Direction::Left)),
                    KeyCode::Right | KeyCode::Char('d') => Some(Command::Move(Direction::Right)),
                    KeyCode::Char('r') => Some(Command::Reset),
                    KeyCode::Char(' ') => Some(Command::Save),
                    KeyCode::Char('q') => Some(Command::OpenLevelSelect),
                    KeyCode::Esc => Some(Command::Quit),
                    _ => continue,
                },
                Mode::LevelSelect => match key.code {
                    KeyCode::Up | KeyCode::Char('w') => {
                        *selected = selected.saturating_sub(1);
                        return Ok(None);
                    }
                    KeyCode::Down | KeyCode::Char('s') => {
                        if *selected + 1 < session.level_count() {
                            *selected += 1;
                        }
                        return Ok(None);
                    }
                    KeyCode::Enter => Some(Command::SelectLevel(*selected)),
                    KeyCode::Esc => Some(Command::CloseLevelSelect),
                    _ => continue,
                },
            };
            return Ok(cmd);
        }
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = execute!(self.out, cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
