use crate::board::{Board, Direction};
use crate::levels::{LevelError, Levels};
use crate::save::{Progress, ScoreStore};

/// The entire command surface the frontend can drive the game with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Reset,
    Save,
    OpenLevelSelect,
    SelectLevel(usize),
    CloseLevelSelect,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Playing,
    LevelSelect,
}

/// What the frontend should do after a command is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// A level was just completed and the next one is loaded.
    LevelComplete { completed: usize, moves: u32 },
    /// The final level was completed; the session is over.
    AllComplete,
    Quit,
}

/// A running game: the live board, the level catalog, and persistent
/// progress. Pure state machine; all terminal I/O lives in the frontend.
pub struct Session<S> {
    levels: Levels,
    progress: Progress<S>,
    board: Board,
    mode: Mode,
}

impl<S: ScoreStore> Session<S> {
    /// Start a session, resuming from the stored progress cursor.
    ///
    /// `start_level` overrides the stored cursor (and is persisted, like any
    /// level selection). A stored cursor pointing past the catalog, which
    /// happens when a save file is reused with a shorter level set, falls
    /// back to the first level.
    pub fn new(levels: Levels, store: S, start_level: Option<usize>) -> Result<Self, LevelError> {
        let mut progress = Progress::new(store);

        if let Some(level) = start_level {
            progress.set_level(level);
        } else if progress.current_level() >= levels.len() {
            progress.set_level(0);
        }

        let board = levels
            .get(progress.current_level())
            .ok_or_else(|| LevelError::InvalidLevel("level catalog is empty".to_string()))?;

        Ok(Session {
            levels,
            progress,
            board,
            mode: Mode::Playing,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn current_level(&self) -> usize {
        self.progress.current_level()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn best_score(&self, level: usize) -> Option<u32> {
        self.progress.best_score(level)
    }

    pub fn is_unlocked(&self, level: usize) -> bool {
        self.progress.is_unlocked(level)
    }

    /// Apply one command and report what happened.
    pub fn apply(&mut self, cmd: Command) -> Outcome {
        match cmd {
            Command::Quit => Outcome::Quit,
            Command::Move(dir) => {
                if self.mode != Mode::Playing {
                    return Outcome::Continue;
                }
                if self.board.move_player(dir) && self.board.is_won() {
                    self.finish_level()
                } else {
                    Outcome::Continue
                }
            }
            Command::Reset => {
                if self.mode == Mode::Playing {
                    self.reload();
                }
                Outcome::Continue
            }
            Command::Save => {
                self.progress.save();
                Outcome::Continue
            }
            Command::OpenLevelSelect => {
                self.mode = Mode::LevelSelect;
                Outcome::Continue
            }
            Command::CloseLevelSelect => {
                self.mode = Mode::Playing;
                Outcome::Continue
            }
            Command::SelectLevel(level) => {
                if self.mode == Mode::LevelSelect
                    && level < self.levels.len()
                    && self.progress.is_unlocked(level)
                {
                    self.progress.set_level(level);
                    self.reload();
                    self.mode = Mode::Playing;
                }
                Outcome::Continue
            }
        }
    }

    /// Record the score for the just-won level, then advance to the next
    /// level or finish the game if this was the last one.
    fn finish_level(&mut self) -> Outcome {
        let completed = self.progress.current_level();
        let moves = self.board.moves();
        self.progress.record_score(completed, moves);

        if completed + 1 < self.levels.len() {
            self.progress.advance_level();
            self.reload();
            Outcome::LevelComplete { completed, moves }
        } else {
            Outcome::AllComplete
        }
    }

    fn reload(&mut self) {
        if let Some(board) = self.levels.get(self.progress.current_level()) {
            self.board = board;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::MemStore;

    // Level 0 is won with a single push right; level 1 takes two.
    const TEST_LEVELS: &str = "; 1
#####
#@$.#
#####

; 2
######
#@ $.#
######
";

    fn session() -> Session<MemStore> {
        let levels = Levels::from_text(TEST_LEVELS).unwrap();
        Session::new(levels, MemStore::default(), None).unwrap()
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let result = Levels::from_text("");
        assert!(result.is_err());
    }

    #[test]
    fn test_win_records_score_and_advances() {
        let mut session = session();
        assert_eq!(session.current_level(), 0);

        let outcome = session.apply(Command::Move(Direction::Right));
        assert_eq!(
            outcome,
            Outcome::LevelComplete {
                completed: 0,
                moves: 1
            }
        );
        assert_eq!(session.best_score(0), Some(1));
        assert_eq!(session.current_level(), 1);
        assert_eq!(session.board().moves(), 0);
    }

    #[test]
    fn test_last_level_completes_game() {
        let mut session = session();
        session.apply(Command::Move(Direction::Right));

        // Level 1: two pushes right to win.
        assert_eq!(session.apply(Command::Move(Direction::Right)), Outcome::Continue);
        let outcome = session.apply(Command::Move(Direction::Right));
        assert_eq!(outcome, Outcome::AllComplete);
        assert_eq!(session.best_score(1), Some(2));
    }

    #[test]
    fn test_rejected_move_is_silent() {
        let mut session = session();

        // Left from the start hits a wall: nothing changes.
        assert_eq!(session.apply(Command::Move(Direction::Left)), Outcome::Continue);
        assert_eq!(session.board().moves(), 0);
        assert_eq!(session.current_level(), 0);
    }

    #[test]
    fn test_reset_reloads_level() {
        let mut session = session();
        let levels = Levels::from_text(TEST_LEVELS).unwrap();
        // Play on level 1 so there are moves to wipe out.
        session.apply(Command::Move(Direction::Right));
        session.apply(Command::Move(Direction::Right));
        assert_eq!(session.board().moves(), 1);

        session.apply(Command::Reset);
        assert_eq!(session.board().moves(), 0);
        assert_eq!(session.board(), &levels.get(1).unwrap());
    }

    #[test]
    fn test_replay_only_improves_score() {
        let mut session = session();

        // Complete level 0 in 1 move, then replay it in 3.
        session.apply(Command::Move(Direction::Right));
        session.apply(Command::OpenLevelSelect);
        session.apply(Command::SelectLevel(0));
        session.apply(Command::Move(Direction::Left)); // rejected
        session.apply(Command::Move(Direction::Right)); // wins in 1 again...
        assert_eq!(session.best_score(0), Some(1));
    }

    #[test]
    fn test_level_select_gating() {
        let mut session = session();

        // Nothing completed: level 1 is locked and selecting it is ignored.
        session.apply(Command::OpenLevelSelect);
        assert_eq!(session.mode(), Mode::LevelSelect);
        assert!(!session.is_unlocked(1));
        session.apply(Command::SelectLevel(1));
        assert_eq!(session.mode(), Mode::LevelSelect);
        assert_eq!(session.current_level(), 0);

        // Out-of-range selection is also ignored.
        session.apply(Command::SelectLevel(99));
        assert_eq!(session.current_level(), 0);

        session.apply(Command::CloseLevelSelect);
        assert_eq!(session.mode(), Mode::Playing);

        // After completing level 0, level 1 unlocks.
        session.apply(Command::Move(Direction::Right));
        session.apply(Command::OpenLevelSelect);
        session.apply(Command::SelectLevel(0));
        assert_eq!(session.mode(), Mode::Playing);
        assert_eq!(session.current_level(), 0);
        assert_eq!(session.board().moves(), 0);
    }

    #[test]
    fn test_moves_ignored_in_level_select() {
        let mut session = session();
        session.apply(Command::OpenLevelSelect);

        session.apply(Command::Move(Direction::Right));
        assert_eq!(session.board().moves(), 0);
    }

    #[test]
    fn test_start_level_override() {
        let levels = Levels::from_text(TEST_LEVELS).unwrap();
        let session = Session::new(levels, MemStore::default(), Some(1)).unwrap();
        assert_eq!(session.current_level(), 1);
    }

    #[test]
    fn test_stale_cursor_falls_back_to_first_level() {
        use crate::save::{SaveData, ScoreStore as _};

        let mut store = MemStore::default();
        let mut data = SaveData::default();
        data.current_level = 50;
        store.save(&data).unwrap();

        let levels = Levels::from_text(TEST_LEVELS).unwrap();
        let session = Session::new(levels, store, None).unwrap();
        assert_eq!(session.current_level(), 0);
    }

    #[test]
    fn test_quit() {
        let mut session = session();
        assert_eq!(session.apply(Command::Quit), Outcome::Quit);
    }
}
