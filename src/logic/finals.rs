//! Knockout rounds: result recording, advancing winners, and the champion.

use crate::logic::group_play::check_score;
use crate::models::{KnockoutMatch, MatchId, Round, Score, TeamId, Tournament, TournamentError};
use std::cmp::Ordering;

/// Record (or correct) the score of a knockout game and mark it played.
///
/// Level scores are accepted here; they are rejected when the round is advanced.
pub fn record_knockout_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    score: Score,
) -> Result<(), TournamentError> {
    check_score(&tournament.settings, score)?;
    let m = tournament
        .knockout_matches
        .iter_mut()
        .find(|m| m.id == match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    m.score = Some(score);
    m.played = true;
    Ok(())
}

/// Winner of a played knockout game. A level score is an error.
pub fn knockout_winner(m: &KnockoutMatch) -> Result<Option<TeamId>, TournamentError> {
    let Some(score) = m.result() else {
        return Ok(None);
    };
    match score.team_1.cmp(&score.team_2) {
        Ordering::Greater => Ok(Some(m.team_1)),
        Ordering::Less => Ok(Some(m.team_2)),
        Ordering::Equal => Err(TournamentError::TiedKnockoutMatch(m.id)),
    }
}

/// Pair the winners of `current` into games tagged `next`.
///
/// Winners keep the order of their games and are paired consecutively (winner of
/// game 1 against winner of game 2, and so on). `next` is taken as given. Any games
/// already tagged `next` are replaced. Returns the number of games created.
pub fn advance_round(
    tournament: &mut Tournament,
    current: Round,
    next: Round,
) -> Result<usize, TournamentError> {
    let games: Vec<&KnockoutMatch> = tournament
        .knockout_matches
        .iter()
        .filter(|m| m.round == current)
        .collect();

    let unplayed = games.iter().filter(|m| m.result().is_none()).count();
    if games.is_empty() || unplayed > 0 {
        return Err(TournamentError::IncompleteRound {
            round: current,
            unplayed,
        });
    }
    if games.len() % 2 != 0 {
        return Err(TournamentError::OddMatchCount {
            round: current,
            count: games.len(),
        });
    }

    let mut winners = Vec::with_capacity(games.len());
    for m in &games {
        if let Some(w) = knockout_winner(m)? {
            winners.push(w);
        }
    }

    let next_games: Vec<KnockoutMatch> = winners
        .chunks_exact(2)
        .map(|pair| KnockoutMatch::new(pair[0], pair[1], next))
        .collect();
    let created = next_games.len();

    tournament.knockout_matches.retain(|m| m.round != next);
    tournament.knockout_matches.extend(next_games);
    log::info!("{} games created for round {}", created, next);
    Ok(created)
}

/// Knockout games ordered by round, then by creation.
pub fn knockout_bracket(tournament: &Tournament) -> Vec<&KnockoutMatch> {
    let mut bracket: Vec<&KnockoutMatch> = tournament.knockout_matches.iter().collect();
    bracket.sort_by_key(|m| m.round);
    bracket
}

/// Winner of the final, once it has been played.
pub fn champion(tournament: &Tournament) -> Result<Option<TeamId>, TournamentError> {
    let mut finals = tournament
        .knockout_matches
        .iter()
        .filter(|m| m.round == Round::F);
    match (finals.next(), finals.next()) {
        (Some(final_match), None) => knockout_winner(final_match),
        _ => Ok(None),
    }
}
