use super::rank_groups::RankGroups;
use crate::cards::{Card, Rank};

/// Pre-computed facts about exactly five cards, built once per combination
/// and read by the category classifier.
#[derive(Debug, Clone)]
pub struct HandAnalysis {
    /// Ranks sorted high to low.
    pub ranks: [Rank; 5],
    pub rank_groups: RankGroups,
    pub is_flush: bool,
    /// Top rank of a five-in-a-row run. Aces only play high.
    pub straight_top: Option<Rank>,
}

impl HandAnalysis {
    pub fn new(cards: &[Card; 5]) -> Self {
        let mut ranks = cards.map(|c| c.rank());
        ranks.sort_by(|a, b| b.cmp(a));

        let first_suit = cards[0].suit();
        let is_flush = cards.iter().all(|c| c.suit() == first_suit);

        let consecutive = ranks.windows(2).all(|w| w[0].value() == w[1].value() + 1);
        let straight_top = consecutive.then_some(ranks[0]);

        Self { ranks, rank_groups: RankGroups::from_cards(cards), is_flush, straight_top }
    }
}
