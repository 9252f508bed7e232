use crate::board::Board;
use std::fmt;
use std::fs;
use std::io;

/// Error type for level parsing operations.
#[derive(Debug)]
pub enum LevelError {
    /// IO error when reading from file
    Io(io::Error),
    /// Invalid level content
    InvalidLevel(String),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Io(err) => write!(f, "IO error: {}", err),
            LevelError::InvalidLevel(msg) => write!(f, "Invalid level: {}", msg),
        }
    }
}

impl From<io::Error> for LevelError {
    fn from(err: io::Error) -> Self {
        LevelError::Io(err)
    }
}

impl From<String> for LevelError {
    fn from(err: String) -> Self {
        LevelError::InvalidLevel(err)
    }
}

/// The built-in level set, in XSB format. The opening level is a one-push
/// warmup; the rest are from David Skinner's Microban collection.
const BUILTIN_LEVELS: &str = "\
; 1
#####
#@$.#
#####

; 2
####
# .#
#  ###
#*@  #
#  $ #
#  ###
####

; 3
######
#    #
# #@ #
# $* #
# .* #
#    #
######

; 4
  ####
###  ####
#     $ #
# #  #$ #
# . .#@ #
#########

; 5
########
#      #
# .**$@#
#      #
#####  #
    ####

; 6
 #######
 #     #
 # .$. #
## $@$ #
#  .$. #
#      #
########

; 7
#######
#     #
# .$. #
# $.$ #
# .$. #
# $.$ #
#  @  #
#######
";

/// An ordered catalog of Sokoban levels.
///
/// Levels are parsed and validated up front; `get` hands out a fresh board
/// for the requested level, so reloading a level always starts from the
/// authored layout with a zero move count.
#[derive(Debug)]
pub struct Levels {
    boards: Vec<Board>,
}

impl Levels {
    /// Parse XSB-formatted Sokoban levels from a string.
    ///
    /// The XSB format uses:
    /// - Lines starting with `;` as level separators/comments
    /// - Standard Sokoban characters (#, @, $, ., *, +, space)
    /// - Empty lines between levels (optional)
    pub fn from_text(contents: &str) -> Result<Self, LevelError> {
        let mut boards = Vec::new();
        let mut current = String::new();

        for line in contents.lines() {
            // Comment lines and blank lines both end the current level.
            if line.trim_start().starts_with(';') || line.is_empty() {
                if !current.is_empty() {
                    boards.push(Board::from_text(current.trim_end())?);
                    current.clear();
                }
                continue;
            }

            current.push_str(line);
            current.push('\n');
        }

        // The last level if the file doesn't end with a blank line.
        if !current.is_empty() {
            boards.push(Board::from_text(current.trim_end())?);
        }

        if boards.is_empty() {
            return Err(LevelError::InvalidLevel("no levels found".to_string()));
        }

        Ok(Levels { boards })
    }

    /// Parse XSB-formatted Sokoban levels from a text file.
    pub fn from_file(path: &str) -> Result<Self, LevelError> {
        let contents = fs::read_to_string(path)?;
        Self::from_text(&contents)
    }

    /// The compiled-in level set.
    pub fn builtin() -> Result<Self, LevelError> {
        Self::from_text(BUILTIN_LEVELS)
    }

    /// Get a fresh board for the nth level (0-indexed).
    pub fn get(&self, index: usize) -> Option<Board> {
        self.boards.get(index).cloned()
    }

    /// Get the number of levels.
    pub fn len(&self) -> usize {
        self.boards.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Direction;

    #[test]
    fn test_from_text_basic() {
        let level1 = "####
# .#
#  ###
#*@  #
#  $ #
#  ###
####";

        let level2 = "######
#    #
# #@ #
# $* #
# .* #
#    #
######";

        let level3 = "  ####
###  ####
#     $ #
# #  #$ #
# . .#@ #
#########";

        let xsb_content = format!(
            "; 1\n\n{}\n\n; 2\n\n{}\n\n; 3\n\n{}\n",
            level1, level2, level3
        );

        let levels = Levels::from_text(&xsb_content).unwrap();

        assert_eq!(levels.len(), 3);

        // Verify levels match the original strings when formatted back
        assert_eq!(levels.get(0).unwrap().to_string().trim_end(), level1);
        assert_eq!(levels.get(1).unwrap().to_string().trim_end(), level2);
        assert_eq!(levels.get(2).unwrap().to_string().trim_end(), level3);
    }

    #[test]
    fn test_from_text_invalid_level() {
        let xsb_content = "; 1

####
# .#
#@@  #
####
";

        let result = Levels::from_text(xsb_content);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), LevelError::InvalidLevel(_)));
    }

    #[test]
    fn test_from_text_empty() {
        let result = Levels::from_text("; nothing here\n");
        assert!(matches!(result.unwrap_err(), LevelError::InvalidLevel(_)));
    }

    #[test]
    fn test_from_file_no_file() {
        let result = Levels::from_file("nonexistent_file.xsb");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), LevelError::Io(_)));
    }

    #[test]
    fn test_builtin_catalog() {
        let levels = Levels::builtin().unwrap();
        assert_eq!(levels.len(), 7);
        assert!(levels.get(levels.len()).is_none());

        // Every built-in level starts unsolved with a zero move count.
        for i in 0..levels.len() {
            let board = levels.get(i).unwrap();
            assert_eq!(board.moves(), 0, "level {}", i);
            assert!(!board.is_won(), "level {}", i);
        }
    }

    #[test]
    fn test_get_returns_fresh_board() {
        let levels = Levels::builtin().unwrap();

        let mut board = levels.get(0).unwrap();
        assert!(board.move_player(Direction::Right));
        assert_eq!(board.moves(), 1);

        // A second lookup is unaffected by play on the first.
        let fresh = levels.get(0).unwrap();
        assert_eq!(fresh.moves(), 0);
        assert!(!fresh.is_won());
    }
}
