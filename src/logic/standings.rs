//! Group tables: standings accumulation and the ranking rule shared with
//! third-place selection.

use crate::models::{Group, GroupId, GroupMatch, Team, TeamId, Tournament, TournamentError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// One team's record inside its group. Never stored; rebuilt from the games on every query.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub team_id: TeamId,
    pub team_name: String,
    pub points: u32,
    /// Cup totals are widened so three maximum scores cannot overflow.
    pub cups_scored: u64,
    pub cups_conceded: u64,
    pub played: u32,
}

impl Standing {
    fn empty(team: &Team) -> Self {
        Self {
            team_id: team.id,
            team_name: team.name.clone(),
            ..Self::default()
        }
    }

    pub fn cup_difference(&self) -> i128 {
        i128::from(self.cups_scored) - i128::from(self.cups_conceded)
    }

    fn record(&mut self, scored: u32, conceded: u32) {
        self.cups_scored += u64::from(scored);
        self.cups_conceded += u64::from(conceded);
        self.played += 1;
        match scored.cmp(&conceded) {
            Ordering::Greater => self.points += 3,
            Ordering::Equal => self.points += 1,
            Ordering::Less => {}
        }
    }
}

/// Ranked table of one group.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupStandings {
    pub group_id: GroupId,
    pub group_name: String,
    pub standings: Vec<Standing>,
}

/// Ranking rule: points, then cup difference, then cups scored (all descending),
/// then team name ascending.
pub fn compare_standings(a: &Standing, b: &Standing) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.cup_difference().cmp(&a.cup_difference()))
        .then_with(|| b.cups_scored.cmp(&a.cups_scored))
        .then_with(|| a.team_name.cmp(&b.team_name))
}

pub fn rank_standings(standings: &mut [Standing]) {
    standings.sort_by(compare_standings);
}

/// Compute the ranked standings for `teams` from their games.
///
/// Every team gets a row, including teams with no played game. Unplayed games and
/// games involving teams outside `teams` are ignored.
pub fn compute_standings<'a>(
    teams: &[&Team],
    matches: impl IntoIterator<Item = &'a GroupMatch>,
) -> Vec<Standing> {
    let mut table: HashMap<TeamId, Standing> =
        teams.iter().map(|t| (t.id, Standing::empty(t))).collect();

    for m in matches {
        let Some(score) = m.result() else {
            continue;
        };
        if !table.contains_key(&m.team_1) || !table.contains_key(&m.team_2) {
            continue;
        }
        if let Some(s) = table.get_mut(&m.team_1) {
            s.record(score.team_1, score.team_2);
        }
        if let Some(s) = table.get_mut(&m.team_2) {
            s.record(score.team_2, score.team_1);
        }
    }

    let mut standings: Vec<Standing> = table.into_values().collect();
    rank_standings(&mut standings);
    standings
}

/// Standings of one group of the tournament.
pub fn standings_for_group(
    tournament: &Tournament,
    group: &Group,
) -> Result<GroupStandings, TournamentError> {
    let teams = group
        .team_ids
        .iter()
        .map(|&id| tournament.team(id))
        .collect::<Result<Vec<_>, _>>()?;
    let games = tournament.matches.iter().filter(|m| m.group_id == group.id);
    Ok(GroupStandings {
        group_id: group.id,
        group_name: group.name.clone(),
        standings: compute_standings(&teams, games),
    })
}

/// Standings of every group, in group order.
pub fn group_standings(tournament: &Tournament) -> Result<Vec<GroupStandings>, TournamentError> {
    tournament
        .groups
        .iter()
        .map(|g| standings_for_group(tournament, g))
        .collect()
}
