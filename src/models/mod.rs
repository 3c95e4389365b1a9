//! Data structures for the cup tournament: teams, groups, games, tournament state.

mod game;
mod team;
mod tournament;

pub use game::{GroupMatch, KnockoutMatch, MatchId, Round, Score};
pub use team::{Group, GroupId, Team, TeamId};
pub use tournament::{Tournament, TournamentError, TournamentId, ValidationError};
