//! Group stage: fixture generation and result recording.

use crate::config::TournamentSettings;
use crate::models::{
    Group, GroupId, GroupMatch, MatchId, Score, Team, Tournament, TournamentError, ValidationError,
};

/// Teams per group required for fixture generation.
pub const GROUP_SIZE: usize = 4;

/// Build the six games of a four-team group.
///
/// Teams are sorted by name into a, b, c, d and scheduled as
/// (a,b), (c,d), (a,c), (b,d), (d,a), (b,c), so every team plays once per matchday.
pub fn schedule_group(
    group: &Group,
    mut teams: Vec<&Team>,
) -> Result<Vec<GroupMatch>, TournamentError> {
    if teams.len() != GROUP_SIZE {
        return Err(TournamentError::InvalidGroupComposition {
            group: group.id,
            team_count: teams.len(),
        });
    }
    teams.sort_by(|x, y| x.name.cmp(&y.name));
    let (a, b, c, d) = (teams[0].id, teams[1].id, teams[2].id, teams[3].id);

    Ok([(a, b), (c, d), (a, c), (b, d), (d, a), (b, c)]
        .into_iter()
        .map(|(home, away)| GroupMatch::new(group.id, home, away))
        .collect())
}

/// Generate and store the six games of a group.
///
/// Fails without creating anything if the group does not hold four teams or if any
/// of its pairings already has a game. Callers should only invoke this once per group.
pub fn generate_group_fixtures(
    tournament: &mut Tournament,
    group_id: GroupId,
) -> Result<(), TournamentError> {
    let group = tournament.group(group_id)?;
    let teams = group
        .team_ids
        .iter()
        .map(|&id| tournament.team(id))
        .collect::<Result<Vec<_>, _>>()?;
    let fixtures = schedule_group(group, teams)?;

    for f in &fixtures {
        let exists = tournament
            .matches
            .iter()
            .any(|m| m.group_id == f.group_id && m.team_1 == f.team_1 && m.team_2 == f.team_2);
        if exists {
            return Err(TournamentError::DuplicateMatch {
                group: f.group_id,
                team_1: f.team_1,
                team_2: f.team_2,
            });
        }
    }

    log::info!("Generated {} games for {}", fixtures.len(), group.name);
    tournament.matches.extend(fixtures);
    Ok(())
}

/// Number of group games still waiting for a result.
pub fn unplayed_group_matches(tournament: &Tournament) -> usize {
    tournament.matches.iter().filter(|m| !m.played).count()
}

pub(crate) fn check_score(
    settings: &TournamentSettings,
    score: Score,
) -> Result<(), ValidationError> {
    if score.team_1 > settings.max_score || score.team_2 > settings.max_score {
        return Err(ValidationError::ScoreOutOfRange {
            max: settings.max_score,
        });
    }
    Ok(())
}

/// Record (or correct) the score of a group game and mark it played.
pub fn record_group_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    score: Score,
) -> Result<(), TournamentError> {
    check_score(&tournament.settings, score)?;
    let m = tournament
        .matches
        .iter_mut()
        .find(|m| m.id == match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    m.score = Some(score);
    m.played = true;
    Ok(())
}

/// Clear a group game's score so it counts as unplayed again.
pub fn reopen_group_match(
    tournament: &mut Tournament,
    match_id: MatchId,
) -> Result<(), TournamentError> {
    let m = tournament
        .matches
        .iter_mut()
        .find(|m| m.id == match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    m.score = None;
    m.played = false;
    Ok(())
}
