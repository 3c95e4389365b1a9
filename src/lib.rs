//! Cup tournament web app: library with models, configuration and business logic.

pub mod config;
pub mod logic;
pub mod models;

pub use config::{ServerConfig, TournamentSettings};
pub use logic::{
    advance_round, build_knockout_stage, champion, compare_standings, compute_standings,
    create_groups, draw_groups, generate_group_fixtures, generate_knockout_stage,
    group_standings, import_teams_csv, knockout_bracket, knockout_winner, rank_standings,
    record_group_result, record_knockout_result, reopen_group_match, schedule_group,
    seed_pairings, select_qualifiers, standings_for_group, third_place_quota,
    unplayed_group_matches, GroupStandings, Standing, GROUP_SIZE,
};
pub use models::{
    Group, GroupId, GroupMatch, KnockoutMatch, MatchId, Round, Score, Team, TeamId, Tournament,
    TournamentError, TournamentId, ValidationError,
};
