//! Group matches, knockout matches, scores and round tags.

use crate::models::team::{GroupId, TeamId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a match (group stage or knockout).
pub type MatchId = Uuid;

/// Cups scored by each side.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub team_1: u32,
    pub team_2: u32,
}

impl Score {
    pub fn new(team_1: u32, team_2: u32) -> Self {
        Self { team_1, team_2 }
    }
}

/// Knockout round tag. Ordering follows the bracket: R16 < QF < SF < F.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Round {
    R16,
    QF,
    SF,
    F,
}

impl Round {
    /// Opening round for a bracket of `team_count` qualifiers.
    pub fn for_bracket_size(team_count: usize) -> Option<Self> {
        match team_count {
            4 => Some(Round::SF),
            8 => Some(Round::QF),
            16 => Some(Round::R16),
            _ => None,
        }
    }

    /// The round played after this one (`None` after the final).
    pub fn next(self) -> Option<Self> {
        match self {
            Round::R16 => Some(Round::QF),
            Round::QF => Some(Round::SF),
            Round::SF => Some(Round::F),
            Round::F => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Round::R16 => "R16",
            Round::QF => "QF",
            Round::SF => "SF",
            Round::F => "F",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Round::R16 => "Round of 16",
            Round::QF => "Quarter Final",
            Round::SF => "Semi Final",
            Round::F => "Grand Final",
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Round {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "R16" => Ok(Round::R16),
            "QF" => Ok(Round::QF),
            "SF" => Ok(Round::SF),
            "F" => Ok(Round::F),
            other => Err(other.to_string()),
        }
    }
}

/// A group stage match between two teams of the same group.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupMatch {
    pub id: MatchId,
    pub group_id: GroupId,
    pub team_1: TeamId,
    pub team_2: TeamId,
    /// None until a score is entered.
    pub score: Option<Score>,
    pub played: bool,
}

impl GroupMatch {
    pub fn new(group_id: GroupId, team_1: TeamId, team_2: TeamId) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id,
            team_1,
            team_2,
            score: None,
            played: false,
        }
    }

    /// Final score, only for matches marked played.
    pub fn result(&self) -> Option<Score> {
        self.score.filter(|_| self.played)
    }

    pub fn involves(&self, team_id: TeamId) -> bool {
        self.team_1 == team_id || self.team_2 == team_id
    }
}

/// A single-elimination match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct KnockoutMatch {
    pub id: MatchId,
    pub team_1: TeamId,
    pub team_2: TeamId,
    pub score: Option<Score>,
    pub played: bool,
    pub round: Round,
}

impl KnockoutMatch {
    pub fn new(team_1: TeamId, team_2: TeamId, round: Round) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_1,
            team_2,
            score: None,
            played: false,
            round,
        }
    }

    pub fn result(&self) -> Option<Score> {
        self.score.filter(|_| self.played)
    }

    pub fn involves(&self, team_id: TeamId) -> bool {
        self.team_1 == team_id || self.team_2 == team_id
    }
}
