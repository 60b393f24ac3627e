//! Compound wrappers.

use wrapper_value_object_derive::wrapper_value_object;

use crate::ids::{LeagueId, MatchId};

/// Final score of a match.
#[wrapper_value_object("HomeGoals", u8, "AwayGoals", u8)]
#[derive(Clone, Copy)]
pub struct MatchResult;

impl MatchResult {
    pub fn is_draw(&self) -> bool {
        self.home_goals() == self.away_goals()
    }
}

/// A match within a league. Fields may be other wrappers.
#[wrapper_value_object("LeagueId", LeagueId, "MatchId", MatchId)]
#[derive(Clone, Copy)]
pub struct Fixture;
