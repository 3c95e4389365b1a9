//! Tournament aggregate and error types.

use crate::config::TournamentSettings;
use crate::models::game::{GroupMatch, KnockoutMatch, MatchId, Round};
use crate::models::team::{same_name, Group, GroupId, Team, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Errors that can occur during tournament operations.
///
/// Every variant is detected before the tournament is mutated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// A group does not hold exactly four teams (or too few teams to rank).
    InvalidGroupComposition { group: GroupId, team_count: usize },
    /// Knockout stage requested while group matches are still unplayed.
    TournamentNotReady { unplayed: usize },
    /// Number of groups has no qualification rule.
    UnsupportedGroupCount(usize),
    /// Qualifier count is not 4, 8 or 16.
    InvalidBracketSize(usize),
    /// The current round has unplayed matches, or no matches at all.
    IncompleteRound { round: Round, unplayed: usize },
    /// Winners of an odd number of matches cannot be paired.
    OddMatchCount { round: Round, count: usize },
    /// A knockout match ended level.
    TiedKnockoutMatch(MatchId),
    /// A group match for this pairing already exists.
    DuplicateMatch { group: GroupId, team_1: TeamId, team_2: TeamId },
    TeamNotFound(TeamId),
    GroupNotFound(GroupId),
    MatchNotFound(MatchId),
    /// Rejected registration, grouping or score input.
    Validation(ValidationError),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidGroupComposition { team_count, .. } => {
                write!(f, "A group must contain exactly four teams (found {})", team_count)
            }
            TournamentError::TournamentNotReady { unplayed } => {
                write!(f, "Not all group games have been played ({} remaining)", unplayed)
            }
            TournamentError::UnsupportedGroupCount(count) => {
                write!(f, "Unsupported number of groups: {}", count)
            }
            TournamentError::InvalidBracketSize(count) => {
                write!(f, "Invalid knockout stage team count: {}", count)
            }
            TournamentError::IncompleteRound { round, unplayed } => {
                write!(f, "Round {} is not complete ({} games unplayed)", round, unplayed)
            }
            TournamentError::OddMatchCount { round, count } => {
                write!(f, "Uneven number of games in round {}: {}", round, count)
            }
            TournamentError::TiedKnockoutMatch(id) => {
                write!(f, "Tied game in knockout stage: {}", id)
            }
            TournamentError::DuplicateMatch { .. } => {
                write!(f, "Games for this group have already been generated")
            }
            TournamentError::TeamNotFound(_) => write!(f, "Team not found"),
            TournamentError::GroupNotFound(_) => write!(f, "Group not found"),
            TournamentError::MatchNotFound(_) => write!(f, "Game not found"),
            TournamentError::Validation(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for TournamentError {}

impl From<ValidationError> for TournamentError {
    fn from(e: ValidationError) -> Self {
        TournamentError::Validation(e)
    }
}

/// Input rejected by the registration, grouping or scoring rules.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValidationError {
    /// Teams cannot register once group games exist.
    RegistrationClosed,
    TeamLimitReached { max: usize },
    NameLength { field: &'static str, min: usize, max: usize },
    DuplicateTeamName(String),
    MemberAlreadyInTeam(String),
    SameMembers,
    NoGroups,
    TeamInMultipleGroups(TeamId),
    TeamAlreadyGrouped(TeamId),
    GroupTotalNotMultiple { total: usize, group_size: usize },
    GroupTotalOutOfRange { total: usize, min: usize, max: usize },
    ExcludedGroupTotal(usize),
    ScoreOutOfRange { max: u32 },
    UnknownRound(String),
    InvalidCsvRow { line: usize, reason: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::RegistrationClosed => {
                write!(f, "Teams cannot be registered after the tournament has started")
            }
            ValidationError::TeamLimitReached { max } => {
                write!(f, "Maximum number of teams reached ({})", max)
            }
            ValidationError::NameLength { field, min, max } => {
                write!(f, "{} must be between {} and {} characters", field, min, max)
            }
            ValidationError::DuplicateTeamName(name) => {
                write!(f, "The team name {} is already in use", name)
            }
            ValidationError::MemberAlreadyInTeam(member) => {
                write!(f, "{} is already part of a team", member)
            }
            ValidationError::SameMembers => write!(f, "Use two different members for a team"),
            ValidationError::NoGroups => write!(f, "No groups provided"),
            ValidationError::TeamInMultipleGroups(_) => {
                write!(f, "A team cannot be in multiple groups")
            }
            ValidationError::TeamAlreadyGrouped(_) => write!(f, "Team is already in a group"),
            ValidationError::GroupTotalNotMultiple { group_size, .. } => {
                write!(f, "Teams must be grouped in multiples of {}", group_size)
            }
            ValidationError::GroupTotalOutOfRange { total, min, max } => write!(
                f,
                "Total number of teams must be between {} and {} (got {})",
                min, max, total
            ),
            ValidationError::ExcludedGroupTotal(total) => {
                write!(f, "Grouping exactly {} teams is not allowed", total)
            }
            ValidationError::ScoreOutOfRange { max } => {
                write!(f, "Scores must be between 0 and {}", max)
            }
            ValidationError::UnknownRound(code) => write!(f, "Unknown round: {}", code),
            ValidationError::InvalidCsvRow { line, reason } => {
                write!(f, "Invalid CSV at line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Full tournament state: teams, groups, group games and knockout games.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub settings: TournamentSettings,
    pub teams: Vec<Team>,
    pub groups: Vec<Group>,
    /// Group stage games, in creation order.
    pub matches: Vec<GroupMatch>,
    /// Knockout games, in creation order.
    pub knockout_matches: Vec<KnockoutMatch>,
}

impl Default for Tournament {
    fn default() -> Self {
        Self::new(TournamentSettings::default())
    }
}

impl Tournament {
    /// Create an empty tournament with the given rules.
    pub fn new(settings: TournamentSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            settings,
            teams: Vec::new(),
            groups: Vec::new(),
            matches: Vec::new(),
            knockout_matches: Vec::new(),
        }
    }

    pub fn team(&self, id: TeamId) -> Result<&Team, TournamentError> {
        self.teams
            .iter()
            .find(|t| t.id == id)
            .ok_or(TournamentError::TeamNotFound(id))
    }

    pub fn group(&self, id: GroupId) -> Result<&Group, TournamentError> {
        self.groups
            .iter()
            .find(|g| g.id == id)
            .ok_or(TournamentError::GroupNotFound(id))
    }

    /// Group the team is currently placed in, if any.
    pub fn group_of(&self, team_id: TeamId) -> Option<&Group> {
        self.groups.iter().find(|g| g.contains(team_id))
    }

    /// Register a team. Names are trimmed; team names and member names are unique
    /// tournament-wide (case-insensitive).
    pub fn register_team(
        &mut self,
        name: &str,
        member_one: &str,
        member_two: &str,
    ) -> Result<TeamId, TournamentError> {
        if !self.matches.is_empty() {
            return Err(ValidationError::RegistrationClosed.into());
        }
        if self.teams.len() >= self.settings.max_teams {
            return Err(ValidationError::TeamLimitReached {
                max: self.settings.max_teams,
            }
            .into());
        }
        let name = name.trim();
        let member_one = member_one.trim();
        let member_two = member_two.trim();
        self.check_name_length("name", name)?;
        self.check_name_length("member_one", member_one)?;
        self.check_name_length("member_two", member_two)?;

        if same_name(member_one, member_two) {
            return Err(ValidationError::SameMembers.into());
        }

        if self.teams.iter().any(|t| same_name(&t.name, name)) {
            return Err(ValidationError::DuplicateTeamName(name.to_string()).into());
        }
        for member in [member_one, member_two] {
            if self.teams.iter().any(|t| t.has_member(member)) {
                return Err(ValidationError::MemberAlreadyInTeam(member.to_string()).into());
            }
        }

        let team = Team::new(name, member_one, member_two);
        let id = team.id;
        log::info!("Registered team {} ({} & {})", team.name, team.member_one, team.member_two);
        self.teams.push(team);
        Ok(id)
    }

    fn check_name_length(&self, field: &'static str, value: &str) -> Result<(), ValidationError> {
        let (min, max) = (self.settings.min_name_len, self.settings.max_name_len);
        let len = value.chars().count();
        if len < min || len > max {
            return Err(ValidationError::NameLength { field, min, max });
        }
        Ok(())
    }

    /// Delete a team together with its group membership and every game it appears in.
    pub fn remove_team(&mut self, team_id: TeamId) -> Result<(), TournamentError> {
        let idx = self
            .teams
            .iter()
            .position(|t| t.id == team_id)
            .ok_or(TournamentError::TeamNotFound(team_id))?;
        let team = self.teams.remove(idx);
        for group in &mut self.groups {
            group.team_ids.retain(|&id| id != team_id);
        }
        self.matches.retain(|m| !m.involves(team_id));
        self.knockout_matches.retain(|m| !m.involves(team_id));
        log::info!("Removed team {}", team.name);
        Ok(())
    }

    /// Create one group without generating its games. A missing or blank name
    /// becomes "Group N" where N is the new group count.
    pub fn create_group(
        &mut self,
        name: Option<&str>,
        team_ids: &[TeamId],
    ) -> Result<GroupId, TournamentError> {
        let mut seen = HashSet::new();
        for &id in team_ids {
            self.team(id)?;
            if !seen.insert(id) {
                return Err(ValidationError::TeamInMultipleGroups(id).into());
            }
            if self.group_of(id).is_some() {
                return Err(ValidationError::TeamAlreadyGrouped(id).into());
            }
        }
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Group {}", self.groups.len() + 1));
        let group = Group::new(name, team_ids.to_vec());
        let id = group.id;
        self.groups.push(group);
        Ok(id)
    }

    /// Remove every group and every group stage game.
    pub fn delete_all_groups(&mut self) {
        log::info!(
            "Deleting {} group(s) and {} group game(s)",
            self.groups.len(),
            self.matches.len()
        );
        self.groups.clear();
        self.matches.clear();
    }

    /// Remove every knockout game. Returns how many were removed.
    pub fn delete_knockout_stage(&mut self) -> usize {
        let removed = self.knockout_matches.len();
        self.knockout_matches.clear();
        removed
    }

    /// Wipe the tournament: knockout games, group games, groups and teams.
    pub fn reset(&mut self) {
        self.knockout_matches.clear();
        self.matches.clear();
        self.groups.clear();
        self.teams.clear();
        log::info!("Tournament {} reset", self.id);
    }
}
