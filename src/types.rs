use serde::{Deserialize, Serialize};

pub const BOARD_SIZE: u8 = 8;
pub const NUM_SQUARES: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

/// A board coordinate, 0-indexed from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Point {
    col: u8,
    row: u8,
}

impl Point {
    /// Creates a point. Panics when either coordinate is off the board.
    pub const fn new(col: u8, row: u8) -> Self {
        assert!(
            col < BOARD_SIZE && row < BOARD_SIZE,
            "point is outside the board"
        );
        Self { col, row }
    }

    pub fn col(self) -> u8 {
        self.col
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn from_index(idx: usize) -> Self {
        assert!(idx < NUM_SQUARES, "square index {idx} is outside the board");
        Self {
            col: (idx % BOARD_SIZE as usize) as u8,
            row: (idx / BOARD_SIZE as usize) as u8,
        }
    }

    /// Row-major square index in `0..64`.
    pub fn index(self) -> usize {
        self.row as usize * BOARD_SIZE as usize + self.col as usize
    }

    /// Returns the point shifted by `(dc, dr)`, or `None` if that leaves the board.
    pub fn offset(self, dc: i32, dr: i32) -> Option<Self> {
        let col = self.col as i32 + dc;
        let row = self.row as i32 + dr;
        let range = 0..BOARD_SIZE as i32;
        if range.contains(&col) && range.contains(&row) {
            Some(Self {
                col: col as u8,
                row: row as u8,
            })
        } else {
            None
        }
    }

    /// Moves one step in `direction`, wrapping around the board edges.
    pub fn step(self, direction: Direction) -> Self {
        let (dc, dr) = direction.delta();
        let size = BOARD_SIZE as i32;
        Self {
            col: (self.col as i32 + dc).rem_euclid(size) as u8,
            row: (self.row as i32 + dr).rem_euclid(size) as u8,
        }
    }
}

/// One of the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    First,
    Second,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::First => "Dark Player",
            Self::Second => "Light Player",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::First => "X",
            Self::Second => "O",
        }
    }
}

/// Occupancy of a single square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Cell {
    Empty,
    Occupied(Player),
}

impl Cell {
    /// Wire code used in snapshots: 0=empty, 1=first, 2=second.
    pub fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Occupied(Player::First) => 1,
            Self::Occupied(Player::Second) => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RuleVariant {
    /// Empty start; the first four disks go on the centre squares.
    Historical,
    /// Standard seeded 2x2 start with forced passes.
    #[default]
    Modern,
}

impl RuleVariant {
    pub fn toggled(self) -> Self {
        match self {
            Self::Historical => Self::Modern,
            Self::Modern => Self::Historical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayerMode {
    #[default]
    TwoPlayer,
    VersusComputer,
}

impl PlayerMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::TwoPlayer => Self::VersusComputer,
            Self::VersusComputer => Self::TwoPlayer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// `(column, row)` delta.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// A discrete input already mapped from raw keys by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Move(Direction),
    Select,
    Quit,
    ToggleRuleVariant,
    TogglePlayerMode,
    Acknowledge,
}

/// Disk counts per player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Score {
    pub first: u8,
    pub second: u8,
}

impl Score {
    pub fn of(&self, player: Player) -> u8 {
        match player {
            Player::First => self.first,
            Player::Second => self.second,
        }
    }

    pub fn total(&self) -> u8 {
        self.first + self.second
    }

    /// The player with more disks, `None` on a tie.
    pub fn leader(&self) -> Option<Player> {
        use std::cmp::Ordering;
        match self.first.cmp(&self.second) {
            Ordering::Greater => Some(Player::First),
            Ordering::Less => Some(Player::Second),
            Ordering::Equal => None,
        }
    }
}

/// Final result after game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// `None` on a draw.
    pub winner: Option<Player>,
    pub score: Score,
}

/// Phase discriminant exposed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PhaseTag {
    TitleScreen,
    AwaitingPlacement,
    ComputerTurn,
    PlacementConfirmed,
    ForcedPass,
    ConfirmingQuit,
    GameOver,
}

/// Read-only view of the session handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Row-major cell codes, see [`Cell::code`].
    pub board: Vec<u8>,
    pub phase: PhaseTag,
    pub current_player: Player,
    /// Cursor position while a human is choosing a point.
    pub selected: Option<Point>,
    /// Whether `selected` is a legal placement.
    pub selection_legal: bool,
    /// Legal points of the player to move, row-major.
    pub legal: Vec<Point>,
    /// Disks flipped by the placement being confirmed; empty otherwise.
    pub flipped: Vec<Point>,
    pub score: Score,
    pub variant: RuleVariant,
    pub mode: PlayerMode,
    pub result: Option<GameResult>,
}
