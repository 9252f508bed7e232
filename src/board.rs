use std::fmt;

const MAX_SIZE: usize = 64;

/// What a board cell holds once the level markers are stripped out.
///
/// Targets live in a separate grid and the player is a separate coordinate,
/// so the transition rules only ever deal with these three kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Wall,
    Box,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

impl Direction {
    fn delta(&self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; MAX_SIZE]; MAX_SIZE],
    targets: [[bool; MAX_SIZE]; MAX_SIZE],
    player: (u8, u8),
    moves: u32,
    width: u8,
    height: u8,
}

impl Board {
    /// Parse a Sokoban level from text format.
    ///
    /// Characters:
    /// - `#` = Wall
    /// - ` ` = Floor (empty space)
    /// - `.` = Target (where a box must end up)
    /// - `$` = Box
    /// - `@` = Player
    /// - `*` = Box on target
    /// - `+` = Player on target
    ///
    /// Any other character parses as floor. Rows may have different lengths;
    /// the board width is the longest row and short rows are implicitly
    /// floor-padded. Exactly one player marker must be present.
    pub fn from_text(text: &str) -> Result<Self, String> {
        let lines: Vec<&str> = text.lines().collect();

        if lines.is_empty() {
            return Err("Empty level".to_string());
        }

        let height = lines.len();
        let width = lines.iter().map(|line| line.len()).max().unwrap_or(0);

        if width > MAX_SIZE {
            return Err(format!(
                "Level width {} exceeds maximum size {}",
                width, MAX_SIZE
            ));
        }
        if height > MAX_SIZE {
            return Err(format!(
                "Level height {} exceeds maximum size {}",
                height, MAX_SIZE
            ));
        }

        let mut cells = [[Cell::Empty; MAX_SIZE]; MAX_SIZE];
        let mut targets = [[false; MAX_SIZE]; MAX_SIZE];
        let mut player = None;

        for (y, line) in lines.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                match ch {
                    '#' => cells[y][x] = Cell::Wall,
                    '$' => cells[y][x] = Cell::Box,
                    '.' => targets[y][x] = true,
                    '*' => {
                        cells[y][x] = Cell::Box;
                        targets[y][x] = true;
                    }
                    '@' | '+' => {
                        if player.is_some() {
                            return Err("Multiple players found".to_string());
                        }
                        player = Some((x as u8, y as u8));
                        if ch == '+' {
                            targets[y][x] = true;
                        }
                    }
                    _ => {}
                }
            }
        }

        let player = player.ok_or("No player found in level")?;

        Ok(Board {
            cells,
            targets,
            player,
            moves: 0,
            width: width as u8,
            height: height as u8,
        })
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    pub fn height(&self) -> usize {
        self.height as usize
    }

    pub fn player_pos(&self) -> (u8, u8) {
        self.player
    }

    /// Number of accepted moves since this board was loaded.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn cell(&self, x: u8, y: u8) -> Cell {
        self.cells[y as usize][x as usize]
    }

    pub fn is_target(&self, x: u8, y: u8) -> bool {
        self.targets[y as usize][x as usize]
    }

    /// Move from position (x, y) in the given direction.
    /// Returns Some((new_x, new_y)) if the new position is within bounds, None otherwise.
    fn step(&self, from: (u8, u8), dir: Direction) -> Option<(u8, u8)> {
        let (dx, dy) = dir.delta();
        let new_x = from.0 as i32 + dx as i32;
        let new_y = from.1 as i32 + dy as i32;

        if new_x >= 0 && new_y >= 0 && new_x < self.width as i32 && new_y < self.height as i32 {
            Some((new_x as u8, new_y as u8))
        } else {
            None
        }
    }

    /// Attempt to move the player one cell in the given direction.
    ///
    /// A box in the destination cell is pushed one cell further if the cell
    /// beyond it is in bounds and empty; a box never pushes another box.
    /// Returns true if the move was accepted. A rejected move leaves the
    /// board completely unchanged; validation happens before any mutation.
    pub fn move_player(&mut self, dir: Direction) -> bool {
        let Some((new_x, new_y)) = self.step(self.player, dir) else {
            return false;
        };

        match self.cell(new_x, new_y) {
            Cell::Wall => return false,
            Cell::Box => {
                let Some((box_x, box_y)) = self.step((new_x, new_y), dir) else {
                    return false;
                };
                if self.cell(box_x, box_y) != Cell::Empty {
                    return false;
                }
                self.cells[box_y as usize][box_x as usize] = Cell::Box;
                self.cells[new_y as usize][new_x as usize] = Cell::Empty;
            }
            Cell::Empty => {}
        }

        self.player = (new_x, new_y);
        self.moves += 1;
        true
    }

    /// Check if every target cell holds a box (win condition).
    ///
    /// A level with no targets is trivially won. Boxes sitting off-target
    /// are irrelevant.
    pub fn is_won(&self) -> bool {
        for y in 0..self.height as usize {
            for x in 0..self.width as usize {
                if self.targets[y][x] && self.cells[y][x] != Cell::Box {
                    return false;
                }
            }
        }
        true
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            let mut line = String::new();
            for x in 0..self.width {
                let cell = self.cells[y as usize][x as usize];
                let target = self.targets[y as usize][x as usize];

                let ch = if (x, y) == self.player {
                    if target { '+' } else { '@' }
                } else {
                    match (cell, target) {
                        (Cell::Wall, _) => '#',
                        (Cell::Box, true) => '*',
                        (Cell::Box, false) => '$',
                        (Cell::Empty, true) => '.',
                        (Cell::Empty, false) => ' ',
                    }
                };
                line.push(ch);
            }
            // Trim trailing spaces to match original input format
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
