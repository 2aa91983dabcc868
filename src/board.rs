//! Hex board in offset coordinates.
//!
//! Tiles carry fish or are holes. Penguins move in uninterrupted straight
//! lines along the six hex directions; a ray stops at the first hole or at
//! the board edge. Rows are offset, so the column component of a diagonal
//! step depends on row parity, and there is no east/west movement.

use std::fmt;

/// A cell on the board, addressed as `(row, col)`.
///
/// Fields are signed so that a position received from an untrusted agent
/// (which may be nonsense like `(0, -1)`) is representable and can be
/// rejected by a bounds check. In-bounds means `0 <= row < height` and
/// `0 <= col < width`.
///
/// The derived ordering is lexicographic on `(row, col)`, which is the
/// ordering the scanning placer and the minimax tie-break rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Row index, increasing downward.
    pub row: i32,
    /// Column index, increasing rightward.
    pub col: i32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// The six movement directions of the hex grid.
///
/// `N`/`S` skip a row because adjacent rows are offset by half a cell; the
/// four diagonals step one row, with the column offset depending on the
/// source row's parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)] // the variants are the compass names
pub enum Direction {
    N,
    NE,
    SE,
    S,
    SW,
    NW,
}

impl Direction {
    /// All six directions, in clockwise order.
    #[must_use]
    pub fn all() -> &'static [Direction; 6] {
        &[
            Direction::N,
            Direction::NE,
            Direction::SE,
            Direction::S,
            Direction::SW,
            Direction::NW,
        ]
    }

    /// The neighboring position one step in this direction.
    #[must_use]
    pub fn step(self, from: Position) -> Position {
        let odd = from.row.rem_euclid(2) == 1;
        let (dr, dc) = match self {
            Direction::N => (-2, 0),
            Direction::S => (2, 0),
            Direction::NE => (-1, if odd { 1 } else { 0 }),
            Direction::SE => (1, if odd { 1 } else { 0 }),
            Direction::NW => (-1, if odd { 0 } else { -1 }),
            Direction::SW => (1, if odd { 0 } else { -1 }),
        };
        Position::new(from.row + dr, from.col + dc)
    }
}

/// A single tile: either a hole or a tile carrying fish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    /// An eaten tile. Impassable, cannot be landed on.
    Hole,
    /// A tile carrying `n >= 1` fish.
    Fish(u8),
}

impl Tile {
    /// True if this tile is a hole.
    #[must_use]
    pub const fn is_hole(self) -> bool {
        matches!(self, Tile::Hole)
    }

    /// Number of fish on the tile (zero for a hole).
    #[must_use]
    pub const fn fish(self) -> u32 {
        match self {
            Tile::Hole => 0,
            Tile::Fish(n) => n as u32,
        }
    }
}

/// How to build a board.
#[derive(Debug, Clone)]
pub enum BoardConfig {
    /// Every tile carries the same positive fish count.
    Uniform {
        /// Number of columns.
        width: usize,
        /// Number of rows.
        height: usize,
        /// Fish per tile, at least one.
        fish: u8,
    },
    /// Explicit per-cell contents; dimensions are taken from the array.
    Explicit {
        /// Rows of tiles, all of equal length.
        rows: Vec<Vec<Tile>>,
    },
    /// A board guaranteeing at least `min_one_fish_tiles` tiles that carry
    /// exactly one fish; remaining tiles carry `default_fish`. The one-fish
    /// tiles occupy the first positions in row-major order, which keeps
    /// construction deterministic.
    MinOneFish {
        /// Number of columns.
        width: usize,
        /// Number of rows.
        height: usize,
        /// Minimum count of single-fish tiles.
        min_one_fish_tiles: usize,
        /// Fish count for the remaining tiles, at least one.
        default_fish: u8,
    },
}

/// Error constructing a board from a [`BoardConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Width or height was zero.
    ZeroDimension,
    /// A fish tile was configured with zero fish.
    ZeroFish,
    /// An explicit row has a different length than the first row.
    Ragged {
        /// Index of the offending row.
        row: usize,
    },
    /// More one-fish tiles requested than the board has cells.
    TooManyOneFishTiles {
        /// Requested single-fish tile count.
        requested: usize,
        /// Total cells on the board.
        capacity: usize,
    },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "board width and height must be nonzero"),
            Self::ZeroFish => write!(f, "fish tiles must carry at least one fish"),
            Self::Ragged { row } => write!(f, "row {row} differs in length from row 0"),
            Self::TooManyOneFishTiles {
                requested,
                capacity,
            } => write!(
                f,
                "{requested} one-fish tiles requested but the board has only {capacity} cells"
            ),
        }
    }
}

impl std::error::Error for BoardError {}

/// A rectangular grid of tiles, stored row-major.
///
/// Boards are values: [`Board::remove_tile`] returns a new board and leaves
/// the receiver untouched, so a snapshot handed to an agent can never be
/// mutated behind the referee's back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Board {
    /// Build a board from a configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`BoardError`] for zero dimensions, zero fish counts,
    /// ragged explicit rows, or an unsatisfiable one-fish tile count.
    pub fn from_config(config: &BoardConfig) -> Result<Self, BoardError> {
        match config {
            BoardConfig::Uniform {
                width,
                height,
                fish,
            } => {
                if *width == 0 || *height == 0 {
                    return Err(BoardError::ZeroDimension);
                }
                if *fish == 0 {
                    return Err(BoardError::ZeroFish);
                }
                Ok(Self {
                    width: *width,
                    height: *height,
                    tiles: vec![Tile::Fish(*fish); width * height],
                })
            }
            BoardConfig::Explicit { rows } => {
                if rows.is_empty() || rows[0].is_empty() {
                    return Err(BoardError::ZeroDimension);
                }
                let width = rows[0].len();
                for (i, row) in rows.iter().enumerate() {
                    if row.len() != width {
                        return Err(BoardError::Ragged { row: i });
                    }
                    if row.iter().any(|t| matches!(t, Tile::Fish(0))) {
                        return Err(BoardError::ZeroFish);
                    }
                }
                Ok(Self {
                    width,
                    height: rows.len(),
                    tiles: rows.iter().flatten().copied().collect(),
                })
            }
            BoardConfig::MinOneFish {
                width,
                height,
                min_one_fish_tiles,
                default_fish,
            } => {
                if *width == 0 || *height == 0 {
                    return Err(BoardError::ZeroDimension);
                }
                if *default_fish == 0 {
                    return Err(BoardError::ZeroFish);
                }
                let capacity = width * height;
                if *min_one_fish_tiles > capacity {
                    return Err(BoardError::TooManyOneFishTiles {
                        requested: *min_one_fish_tiles,
                        capacity,
                    });
                }
                let tiles = (0..capacity)
                    .map(|i| {
                        if i < *min_one_fish_tiles {
                            Tile::Fish(1)
                        } else {
                            Tile::Fish(*default_fish)
                        }
                    })
                    .collect();
                Ok(Self {
                    width: *width,
                    height: *height,
                    tiles,
                })
            }
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// True if `pos` lies on the board.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= 0
            && pos.col >= 0
            && (pos.row as usize) < self.height
            && (pos.col as usize) < self.width
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.row as usize * self.width + pos.col as usize)
        } else {
            None
        }
    }

    /// The tile at `pos`, or `None` if out of bounds.
    #[must_use]
    pub fn tile(&self, pos: Position) -> Option<Tile> {
        self.index(pos).map(|i| self.tiles[i])
    }

    /// A new board with the tile at `pos` turned into a hole.
    ///
    /// Removing a hole (or an out-of-bounds position) returns an equal
    /// board, so removal is idempotent.
    #[must_use]
    pub fn remove_tile(&self, pos: Position) -> Board {
        let mut board = self.clone();
        if let Some(i) = board.index(pos) {
            board.tiles[i] = Tile::Hole;
        }
        board
    }

    /// Number of non-hole tiles remaining.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tiles.iter().filter(|t| !t.is_hole()).count()
    }

    /// All positions in row-major order (holes included).
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32)
            .flat_map(move |row| (0..self.width as i32).map(move |col| Position::new(row, col)))
    }

    /// The distinct non-hole positions reachable from `from` by
    /// uninterrupted straight-line movement, excluding `from` itself.
    ///
    /// Each of the six rays stops at the first hole or at the board edge.
    /// The tile at `from` itself is not examined, so the query also works on
    /// a board view where the moving penguin's own tile counts as a hole.
    #[must_use]
    pub fn reachable_from(&self, from: Position) -> Vec<Position> {
        let mut reachable = Vec::new();
        for dir in Direction::all() {
            let mut cur = dir.step(from);
            while matches!(self.tile(cur), Some(tile) if !tile.is_hole()) {
                reachable.push(cur);
                cur = dir.step(cur);
            }
        }
        reachable
    }
}
