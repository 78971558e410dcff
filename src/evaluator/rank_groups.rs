use crate::cards::{Card, Rank};

/// Ranks grouped by multiplicity, sorted by (count desc, rank desc).
///
/// Example: AAAKQ groups as [(Ace, 3), (King, 1), (Queen, 1)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankGroups {
    groups: Vec<(Rank, u8)>,
}

impl RankGroups {
    pub fn from_cards(cards: &[Card]) -> Self {
        let mut counts = [0u8; 15];
        for c in cards {
            counts[c.rank().value() as usize] += 1;
        }
        let mut groups: Vec<(Rank, u8)> = Rank::ALL
            .iter()
            .rev()
            .filter_map(|&r| match counts[r.value() as usize] {
                0 => None,
                n => Some((r, n)),
            })
            .collect();
        groups.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
        Self { groups }
    }

    /// Rank held four times, if any.
    pub fn quad(&self) -> Option<Rank> {
        self.groups.iter().find(|(_, n)| *n >= 4).map(|(r, _)| *r)
    }

    /// Highest rank held exactly three times.
    pub fn trips(&self) -> Option<Rank> {
        self.groups.iter().find(|(_, n)| *n == 3).map(|(r, _)| *r)
    }

    /// Pair ranks, high to low.
    pub fn pairs(&self) -> Vec<Rank> {
        self.groups.iter().filter(|(_, n)| *n == 2).map(|(r, _)| *r).collect()
    }

    /// Unpaired ranks, high to low.
    pub fn kickers(&self) -> Vec<Rank> {
        self.groups.iter().filter(|(_, n)| *n == 1).map(|(r, _)| *r).collect()
    }

    #[cfg(test)]
    pub fn distinct(&self) -> usize {
        self.groups.len()
    }

    #[cfg(test)]
    pub fn groups(&self) -> &[(Rank, u8)] {
        &self.groups
    }
}
