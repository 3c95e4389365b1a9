//! Team and Group data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team (used in matches and lookups).
pub type TeamId = Uuid;

/// Unique identifier for a group.
pub type GroupId = Uuid;

/// A registered team of two members.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub member_one: String,
    pub member_two: String,
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Create a new team. Validation happens in `Tournament::register_team`.
    pub fn new(
        name: impl Into<String>,
        member_one: impl Into<String>,
        member_two: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            member_one: member_one.into(),
            member_two: member_two.into(),
            created_at: Utc::now(),
        }
    }

    /// Whether `person` plays for this team (case-insensitive).
    pub fn has_member(&self, person: &str) -> bool {
        same_name(&self.member_one, person) || same_name(&self.member_two, person)
    }
}

/// Case-insensitive name comparison, Unicode aware.
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// A group of teams playing a round robin.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub team_ids: Vec<TeamId>,
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn new(name: impl Into<String>, team_ids: Vec<TeamId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            team_ids,
            created_at: Utc::now(),
        }
    }

    pub fn contains(&self, team_id: TeamId) -> bool {
        self.team_ids.contains(&team_id)
    }
}
