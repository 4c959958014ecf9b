//! Vote tallying shared by application review and meeting-minutes approval.
//!
//! Tallies are computed over rows that were already fetched; nothing here
//! touches the database or changes any status.

use serde::Serialize;
use std::collections::BTreeMap;

/// A closed set of ballot choices stored as snake_case text.
pub trait VoteChoice: Copy + Eq + 'static {
    fn all() -> &'static [Self];
    fn as_str(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteTally {
    pub counts: BTreeMap<&'static str, usize>,
    pub total: usize,
}

impl VoteTally {
    pub fn count<C: VoteChoice>(&self, choice: C) -> usize {
        self.counts.get(choice.as_str()).copied().unwrap_or(0)
    }
}

/// Count votes per choice. Every known choice appears in the result, even at zero.
pub fn tally<C, I>(votes: I) -> VoteTally
where
    C: VoteChoice,
    I: IntoIterator<Item = C>,
{
    let mut counts: BTreeMap<&'static str, usize> =
        C::all().iter().map(|c| (c.as_str(), 0)).collect();
    let mut total = 0;

    for vote in votes {
        *counts.entry(vote.as_str()).or_insert(0) += 1;
        total += 1;
    }

    VoteTally { counts, total }
}
