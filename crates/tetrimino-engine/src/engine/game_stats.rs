use serde::Serialize;

/// Points awarded for clearing lines with a single lock.
///
/// Index is the number of lines cleared at once (0 to 4).
const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Number of cleared lines needed to advance one level.
pub const LINES_PER_LEVEL: usize = 10;

/// Running statistics of a game: score, cleared lines and locked pieces.
///
/// The score is the sum of the line clear points (100, 300, 500 and 800 for 1
/// to 4 lines) and the drop bonuses earned by soft and hard drops. There are
/// no combo, back-to-back or T-spin bonuses.
///
/// # Example
///
/// ```
/// use tetrimino_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.add_drop_bonus(20);
/// stats.complete_piece_drop(4);
///
/// assert_eq!(stats.score(), 820);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: usize,
    drop_bonus: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            drop_bonus: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    /// Returns the current score, drop bonuses included.
    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the part of the score earned by soft and hard drops.
    #[must_use]
    pub const fn drop_bonus(&self) -> usize {
        self.drop_bonus
    }

    /// Returns the current level, starting at 0.
    ///
    /// The level goes up by one every [`LINES_PER_LEVEL`] cleared lines.
    #[must_use]
    pub const fn level(&self) -> usize {
        self.total_cleared_lines / LINES_PER_LEVEL
    }

    /// Returns the level as shown to players, starting at 1.
    #[must_use]
    pub const fn display_level(&self) -> usize {
        self.level() + 1
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns how many locks cleared 0, 1, 2, 3 and 4 lines.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    pub const fn add_drop_bonus(&mut self, points: usize) {
        self.drop_bonus += points;
        self.score += points;
    }

    /// Records a locked piece that cleared `cleared_lines` lines.
    pub const fn complete_piece_drop(&mut self, cleared_lines: usize) {
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        if cleared_lines < SCORE_TABLE.len() {
            self.line_cleared_counter[cleared_lines] += 1;
            self.score += SCORE_TABLE[cleared_lines];
        }
    }
}
