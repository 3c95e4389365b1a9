//! Knockout qualification: pick the qualifiers from the group tables and seed the
//! opening knockout round.

use crate::logic::group_play::unplayed_group_matches;
use crate::logic::standings::{compare_standings, group_standings, GroupStandings, Standing};
use crate::models::{KnockoutMatch, Round, TeamId, Tournament, TournamentError};

/// How many third-placed teams join the knockout stage for a given group count.
pub fn third_place_quota(group_count: usize) -> Result<usize, TournamentError> {
    match group_count {
        1 | 2 | 4 | 8 => Ok(0),
        3 | 5 | 7 => Ok(2),
        6 => Ok(4),
        other => Err(TournamentError::UnsupportedGroupCount(other)),
    }
}

/// Qualifiers in seeding order: each group's winner then runner-up (in group order),
/// followed by the best third-placed teams.
pub fn select_qualifiers(tables: &[GroupStandings]) -> Result<Vec<TeamId>, TournamentError> {
    let quota = third_place_quota(tables.len())?;
    let needed_rows = if quota > 0 { 3 } else { 2 };

    let mut qualifiers = Vec::with_capacity(tables.len() * 2 + quota);
    let mut thirds: Vec<&Standing> = Vec::new();
    for table in tables {
        if table.standings.len() < needed_rows {
            return Err(TournamentError::InvalidGroupComposition {
                group: table.group_id,
                team_count: table.standings.len(),
            });
        }
        qualifiers.push(table.standings[0].team_id);
        qualifiers.push(table.standings[1].team_id);
        if quota > 0 {
            thirds.push(&table.standings[2]);
        }
    }

    thirds.sort_by(|a, b| compare_standings(a, b));
    qualifiers.extend(thirds.iter().take(quota).map(|s| s.team_id));
    Ok(qualifiers)
}

/// Seeded cross-pairing: first against last, second against second-to-last, and so on.
pub fn seed_pairings(qualifiers: &[TeamId]) -> Vec<(TeamId, TeamId)> {
    let n = qualifiers.len();
    (0..n / 2)
        .map(|i| (qualifiers[i], qualifiers[n - 1 - i]))
        .collect()
}

/// Build the opening knockout round from the group tables without touching the tournament.
pub fn build_knockout_stage(
    tables: &[GroupStandings],
) -> Result<Vec<KnockoutMatch>, TournamentError> {
    let qualifiers = select_qualifiers(tables)?;
    let round = Round::for_bracket_size(qualifiers.len())
        .ok_or(TournamentError::InvalidBracketSize(qualifiers.len()))?;
    Ok(seed_pairings(&qualifiers)
        .into_iter()
        .map(|(team_1, team_2)| KnockoutMatch::new(team_1, team_2, round))
        .collect())
}

/// Replace the whole knockout stage with a freshly seeded opening round.
///
/// Requires every group game to be played. Returns the opening round tag.
pub fn generate_knockout_stage(tournament: &mut Tournament) -> Result<Round, TournamentError> {
    let unplayed = unplayed_group_matches(tournament);
    if unplayed > 0 {
        return Err(TournamentError::TournamentNotReady { unplayed });
    }
    third_place_quota(tournament.groups.len())?;

    let tables = group_standings(tournament)?;
    let bracket = build_knockout_stage(&tables)?;
    let round = bracket
        .first()
        .map(|m| m.round)
        .ok_or(TournamentError::InvalidBracketSize(0))?;

    log::info!(
        "Knockout stage generated: {} games in round {}",
        bracket.len(),
        round
    );
    tournament.knockout_matches = bracket;
    Ok(round)
}
