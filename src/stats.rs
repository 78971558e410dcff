use serde::{Deserialize, Serialize};
use std::fmt;

/// Seat-order bucket used for positional statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionBucket {
    Early,
    Middle,
    Late,
}

impl PositionBucket {
    pub const ALL: [PositionBucket; 3] =
        [PositionBucket::Early, PositionBucket::Middle, PositionBucket::Late];

    /// Bucket for `seat` (0 = first to post) out of `players` seats,
    /// splitting the table into three roughly equal thirds.
    ///
    /// ```
    /// use holdem_sim::stats::PositionBucket;
    ///
    /// assert_eq!(PositionBucket::for_seat(0, 6), PositionBucket::Early);
    /// assert_eq!(PositionBucket::for_seat(3, 6), PositionBucket::Middle);
    /// assert_eq!(PositionBucket::for_seat(5, 6), PositionBucket::Late);
    /// ```
    pub fn for_seat(seat: usize, players: usize) -> PositionBucket {
        let idx = if players == 0 { 0 } else { (seat * 3) / players };
        match idx {
            0 => PositionBucket::Early,
            1 => PositionBucket::Middle,
            _ => PositionBucket::Late,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }

    pub const fn label(self) -> &'static str {
        match self {
            PositionBucket::Early => "early",
            PositionBucket::Middle => "middle",
            PositionBucket::Late => "late",
        }
    }
}

impl fmt::Display for PositionBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionStats {
    pub played: u64,
    pub won: u64,
}

/// Cumulative per-player record. All counters start at zero and only move
/// through the named update methods.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    hands_dealt: u64,
    hands_played: u64,
    hands_won: u64,
    total_profit: i64,
    bluffs_attempted: u64,
    bluffs_successful: u64,
    positions: [PositionStats; 3],
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_hand(&mut self, position: PositionBucket, won: bool, profit: i64) {
        self.hands_dealt += 1;
        self.hands_played += 1;
        self.total_profit += profit;
        let pos = &mut self.positions[position.index()];
        pos.played += 1;
        if won {
            self.hands_won += 1;
            pos.won += 1;
        }
    }

    pub(crate) fn record_bluff(&mut self, successful: bool) {
        self.bluffs_attempted += 1;
        if successful {
            self.bluffs_successful += 1;
        }
    }

    /// Fold another record into this one. Used as the reduction step when
    /// hands are played on several workers.
    pub fn merge(&mut self, other: &Stats) {
        self.hands_dealt += other.hands_dealt;
        self.hands_played += other.hands_played;
        self.hands_won += other.hands_won;
        self.total_profit += other.total_profit;
        self.bluffs_attempted += other.bluffs_attempted;
        self.bluffs_successful += other.bluffs_successful;
        for (mine, theirs) in self.positions.iter_mut().zip(other.positions.iter()) {
            mine.played += theirs.played;
            mine.won += theirs.won;
        }
    }

    pub fn hands_dealt(&self) -> u64 {
        self.hands_dealt
    }

    pub fn hands_played(&self) -> u64 {
        self.hands_played
    }

    pub fn hands_won(&self) -> u64 {
        self.hands_won
    }

    pub fn total_profit(&self) -> i64 {
        self.total_profit
    }

    pub fn bluffs_attempted(&self) -> u64 {
        self.bluffs_attempted
    }

    pub fn bluffs_successful(&self) -> u64 {
        self.bluffs_successful
    }

    pub fn position(&self, bucket: PositionBucket) -> PositionStats {
        self.positions[bucket.index()]
    }

    pub fn win_rate(&self) -> f64 {
        ratio(self.hands_won, self.hands_played)
    }

    pub fn position_win_rate(&self, bucket: PositionBucket) -> f64 {
        let p = self.position(bucket);
        ratio(p.won, p.played)
    }

    pub fn bluff_success_rate(&self) -> f64 {
        ratio(self.bluffs_successful, self.bluffs_attempted)
    }

    pub fn average_profit(&self) -> f64 {
        if self.hands_played == 0 {
            return 0.0;
        }
        self.total_profit as f64 / self.hands_played as f64
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
