use crate::types::{Cell, NUM_SQUARES, Player, Point, RuleVariant, Score};

/// The four centre squares: (3,3), (4,3), (3,4), (4,4).
pub const CENTER: PointSet = PointSet(bit(27) | bit(28) | bit(35) | bit(36));

/// A set of board points backed by a 64-bit mask.
///
/// Iteration is always row-major, which gives callers a fixed enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PointSet(u64);

impl PointSet {
    pub const EMPTY: Self = Self(0);

    pub fn mask(self) -> u64 {
        self.0
    }

    pub fn insert(&mut self, point: Point) {
        self.0 |= bit(point.index());
    }

    pub fn contains(self, point: Point) -> bool {
        (self.0 & bit(point.index())) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub fn iter(self) -> impl Iterator<Item = Point> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let idx = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(Point::from_index(idx))
        })
    }

    pub fn to_vec(self) -> Vec<Point> {
        self.iter().collect()
    }
}

impl FromIterator<Point> for PointSet {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for point in iter {
            set.insert(point);
        }
        set
    }
}

/// Reversi board state represented by two bitboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    first: u64,
    second: u64,
}

impl Board {
    /// Creates the starting board for `variant`.
    ///
    /// Modern seeds the centre: (3,3) and (4,4) for the second player,
    /// (4,3) and (3,4) for the first. Historical starts empty.
    pub fn new(variant: RuleVariant) -> Self {
        match variant {
            RuleVariant::Modern => Self {
                first: bit(28) | bit(35),
                second: bit(27) | bit(36),
            },
            RuleVariant::Historical => Self::empty(),
        }
    }

    pub fn empty() -> Self {
        Self {
            first: 0,
            second: 0,
        }
    }

    /// Builds a board from raw masks. Panics when the masks overlap.
    pub fn from_bitboards(first: u64, second: u64) -> Self {
        assert_eq!(first & second, 0, "a square cannot hold two disks");
        Self { first, second }
    }

    pub fn occupant_at(&self, point: Point) -> Cell {
        let square = bit(point.index());
        if (self.first & square) != 0 {
            Cell::Occupied(Player::First)
        } else if (self.second & square) != 0 {
            Cell::Occupied(Player::Second)
        } else {
            Cell::Empty
        }
    }

    pub fn is_empty_at(&self, point: Point) -> bool {
        self.occupant_at(point) == Cell::Empty
    }

    /// Writes `player`'s disk on an empty square. No flips happen here.
    pub fn place(&mut self, point: Point, player: Player) {
        debug_assert!(
            self.is_empty_at(point),
            "place() called on occupied square {point:?}"
        );
        self.set(bit(point.index()), player);
    }

    /// Turns every disk in `points` to `player`'s colour.
    pub fn apply(&mut self, points: PointSet, player: Player) {
        self.set(points.mask(), player);
    }

    pub fn score_tally(&self) -> Score {
        Score {
            first: self.first.count_ones() as u8,
            second: self.second.count_ones() as u8,
        }
    }

    /// All non-empty squares.
    pub fn occupied(&self) -> PointSet {
        PointSet(self.first | self.second)
    }

    pub fn disk_count(&self) -> usize {
        self.occupied().len()
    }

    pub fn empty_count(&self) -> usize {
        NUM_SQUARES - self.disk_count()
    }

    /// Converts board to `[u8; 64]` row-major cell codes.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut board = [0u8; NUM_SQUARES];
        for (idx, cell) in board.iter_mut().enumerate() {
            *cell = self.occupant_at(Point::from_index(idx)).code();
        }
        board
    }

    fn set(&mut self, mask: u64, player: Player) {
        match player {
            Player::First => {
                self.first |= mask;
                self.second &= !mask;
            }
            Player::Second => {
                self.second |= mask;
                self.first &= !mask;
            }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(RuleVariant::default())
    }
}

const fn bit(idx: usize) -> u64 {
    1u64 << idx
}
