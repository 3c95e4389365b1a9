//! Tournament business logic: setup, group play, standings, knockout stage.

mod final_selection;
mod finals;
mod group_play;
mod setup;
mod standings;

pub use final_selection::{
    build_knockout_stage, generate_knockout_stage, seed_pairings, select_qualifiers,
    third_place_quota,
};
pub use finals::{
    advance_round, champion, knockout_bracket, knockout_winner, record_knockout_result,
};
pub use group_play::{
    generate_group_fixtures, record_group_result, reopen_group_match, schedule_group,
    unplayed_group_matches, GROUP_SIZE,
};
pub use setup::{create_groups, draw_groups, import_teams_csv};
pub use standings::{
    compare_standings, compute_standings, group_standings, rank_standings, standings_for_group,
    GroupStandings, Standing,
};
