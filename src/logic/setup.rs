//! Setup phase: team import, group draw, and bulk group creation with fixtures.

use crate::logic::group_play::{generate_group_fixtures, GROUP_SIZE};
use crate::models::{TeamId, Tournament, TournamentError, ValidationError};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;

/// Replace all groups with `partition` and generate every group's games.
///
/// Checks, in order: at least one group, no team listed twice, total a multiple of
/// four, total within the configured bounds (and not 20 when that policy is on),
/// every team registered, every group of exactly four. Nothing changes on error.
/// Groups are named "Group 1", "Group 2", ... in partition order.
pub fn create_groups(
    tournament: &mut Tournament,
    partition: &[Vec<TeamId>],
) -> Result<(), TournamentError> {
    if partition.iter().all(|g| g.is_empty()) {
        return Err(ValidationError::NoGroups.into());
    }

    let mut seen = HashSet::new();
    for &id in partition.iter().flatten() {
        if !seen.insert(id) {
            return Err(ValidationError::TeamInMultipleGroups(id).into());
        }
    }

    let total = seen.len();
    let settings = &tournament.settings;
    if total % GROUP_SIZE != 0 {
        return Err(ValidationError::GroupTotalNotMultiple {
            total,
            group_size: GROUP_SIZE,
        }
        .into());
    }
    if total < settings.min_grouped_teams || total > settings.max_grouped_teams {
        return Err(ValidationError::GroupTotalOutOfRange {
            total,
            min: settings.min_grouped_teams,
            max: settings.max_grouped_teams,
        }
        .into());
    }
    if settings.exclude_twenty_teams && total == 20 {
        return Err(ValidationError::ExcludedGroupTotal(total).into());
    }
    for &id in &seen {
        tournament.team(id)?;
    }

    let mut staged = tournament.clone();
    staged.delete_all_groups();
    for (index, team_ids) in partition.iter().enumerate() {
        let name = format!("Group {}", index + 1);
        let group_id = staged.create_group(Some(&name), team_ids)?;
        generate_group_fixtures(&mut staged, group_id)?;
    }

    log::info!("Created {} group(s) with {} teams", partition.len(), total);
    *tournament = staged;
    Ok(())
}

/// Randomly partition teams into groups of four. A remainder ends up in a smaller
/// last group, which `create_groups` rejects.
pub fn draw_groups<R: Rng + ?Sized>(team_ids: &[TeamId], rng: &mut R) -> Vec<Vec<TeamId>> {
    let mut pool = team_ids.to_vec();
    pool.shuffle(rng);
    pool.chunks(GROUP_SIZE).map(<[TeamId]>::to_vec).collect()
}

#[derive(Debug, Deserialize)]
struct TeamRow {
    name: String,
    member_one: String,
    member_two: String,
}

/// Register every team listed in a CSV with header `name,member_one,member_two`.
///
/// All rows are checked with the normal registration rules; if any row fails, no team
/// is added. Returns the number of teams registered.
pub fn import_teams_csv<R: Read>(
    tournament: &mut Tournament,
    reader: R,
) -> Result<usize, TournamentError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut staged = tournament.clone();
    let mut imported = 0;
    for (i, row) in csv_reader.deserialize::<TeamRow>().enumerate() {
        // Header is line 1.
        let line = i + 2;
        let row = row.map_err(|e| ValidationError::InvalidCsvRow {
            line: e.position().map(|p| p.line() as usize).unwrap_or(line),
            reason: e.to_string(),
        })?;
        staged
            .register_team(&row.name, &row.member_one, &row.member_two)
            .map_err(|e| ValidationError::InvalidCsvRow {
                line,
                reason: e.to_string(),
            })?;
        imported += 1;
    }

    log::info!("Imported {} team(s) from CSV", imported);
    *tournament = staged;
    Ok(imported)
}
