//! Integration tests for group play: fixture generation, result recording and standings.

use cup_tournament_web::{
    compute_standings, generate_group_fixtures, group_standings, rank_standings,
    record_group_result, reopen_group_match, GroupMatch, Score, Standing, Team, TeamId,
    Tournament, TournamentError, TournamentSettings, ValidationError,
};
use uuid::Uuid;

fn tournament_with_teams(names: &[&str]) -> (Tournament, Vec<TeamId>) {
    let mut t = Tournament::default();
    let ids = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            t.register_team(name, &format!("Alpha {i:02}"), &format!("Bravo {i:02}"))
                .unwrap()
        })
        .collect();
    (t, ids)
}

fn name_of(t: &Tournament, id: TeamId) -> &str {
    &t.team(id).unwrap().name
}

#[test]
fn fixtures_follow_fixed_schedule_sorted_by_name() {
    // Registered out of order on purpose.
    let (mut t, ids) = tournament_with_teams(&["Delta", "Alpha", "Charlie", "Bravo"]);
    let group = t.create_group(None, &ids).unwrap();
    generate_group_fixtures(&mut t, group).unwrap();

    let pairs: Vec<(&str, &str)> = t
        .matches
        .iter()
        .map(|m| (name_of(&t, m.team_1), name_of(&t, m.team_2)))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("Alpha", "Bravo"),
            ("Charlie", "Delta"),
            ("Alpha", "Charlie"),
            ("Bravo", "Delta"),
            ("Delta", "Alpha"),
            ("Bravo", "Charlie"),
        ]
    );
    assert!(t.matches.iter().all(|m| !m.played && m.score.is_none()));
    assert!(t.matches.iter().all(|m| m.group_id == group));
}

#[test]
fn fixtures_require_exactly_four_teams() {
    let (mut t, ids) = tournament_with_teams(&["Alpha", "Bravo", "Charlie", "Delta", "Echo1"]);

    let three = t.create_group(None, &ids[..3]).unwrap();
    assert!(matches!(
        generate_group_fixtures(&mut t, three),
        Err(TournamentError::InvalidGroupComposition { team_count: 3, .. })
    ));
    assert!(t.matches.is_empty());

    t.delete_all_groups();
    let five = t.create_group(None, &ids).unwrap();
    assert!(matches!(
        generate_group_fixtures(&mut t, five),
        Err(TournamentError::InvalidGroupComposition { team_count: 5, .. })
    ));
    assert!(t.matches.is_empty());
}

#[test]
fn generating_twice_is_rejected_without_new_games() {
    let (mut t, ids) = tournament_with_teams(&["Alpha", "Bravo", "Charlie", "Delta"]);
    let group = t.create_group(None, &ids).unwrap();
    generate_group_fixtures(&mut t, group).unwrap();

    assert!(matches!(
        generate_group_fixtures(&mut t, group),
        Err(TournamentError::DuplicateMatch { .. })
    ));
    assert_eq!(t.matches.len(), 6);
}

#[test]
fn unknown_group_is_reported() {
    let (mut t, _) = tournament_with_teams(&["Alpha"]);
    let missing = Uuid::new_v4();
    assert_eq!(
        generate_group_fixtures(&mut t, missing),
        Err(TournamentError::GroupNotFound(missing))
    );
}

#[test]
fn win_and_loss_are_scored() {
    let a = Team::new("Alpha", "Alice One", "Alice Two");
    let b = Team::new("Bravo", "Bobby One", "Bobby Two");
    let group = Uuid::new_v4();
    let mut m = GroupMatch::new(group, a.id, b.id);
    m.score = Some(Score::new(3, 1));
    m.played = true;

    let standings = compute_standings(&[&a, &b], [&m]);
    assert_eq!(standings.len(), 2);
    let (sa, sb) = (&standings[0], &standings[1]);
    assert_eq!(sa.team_id, a.id);
    assert_eq!((sa.points, sa.cups_scored, sa.cups_conceded, sa.played), (3, 3, 1, 1));
    assert_eq!(sb.team_id, b.id);
    assert_eq!((sb.points, sb.cups_scored, sb.cups_conceded, sb.played), (0, 1, 3, 1));
    assert_eq!(sa.cup_difference(), 2);
    assert_eq!(sb.cup_difference(), -2);
}

#[test]
fn draw_gives_one_point_each() {
    let a = Team::new("Alpha", "Alice One", "Alice Two");
    let b = Team::new("Bravo", "Bobby One", "Bobby Two");
    let mut m = GroupMatch::new(Uuid::new_v4(), a.id, b.id);
    m.score = Some(Score::new(2, 2));
    m.played = true;

    let standings = compute_standings(&[&a, &b], [&m]);
    assert!(standings.iter().all(|s| s.points == 1 && s.played == 1));
}

#[test]
fn unplayed_games_and_idle_teams() {
    let a = Team::new("Alpha", "Alice One", "Alice Two");
    let b = Team::new("Bravo", "Bobby One", "Bobby Two");
    let c = Team::new("Charlie", "Carol One", "Carol Two");
    let mut played = GroupMatch::new(Uuid::new_v4(), b.id, c.id);
    played.score = Some(Score::new(0, 1));
    played.played = true;
    // Score entered but not marked played: ignored.
    let mut pending = GroupMatch::new(Uuid::new_v4(), a.id, b.id);
    pending.score = Some(Score::new(5, 0));

    let standings = compute_standings(&[&a, &b, &c], [&played, &pending]);
    let names: Vec<&str> = standings.iter().map(|s| s.team_name.as_str()).collect();
    // Alpha and Bravo both have 0 points; Alpha's 0 difference beats Bravo's -1.
    assert_eq!(names, vec!["Charlie", "Alpha", "Bravo"]);
    let alpha = &standings[1];
    assert_eq!((alpha.points, alpha.cups_scored, alpha.cups_conceded, alpha.played), (0, 0, 0, 0));
}

#[test]
fn ranking_uses_points_then_difference_then_scored_then_name() {
    let standing = |name: &str, points: u32, scored: u64, conceded: u64| Standing {
        team_id: Uuid::new_v4(),
        team_name: name.to_string(),
        points,
        cups_scored: scored,
        cups_conceded: conceded,
        played: 3,
    };
    let mut table = vec![
        standing("Zulu", 3, 9, 9),
        standing("Bravo", 6, 4, 2),
        standing("Yankee", 6, 6, 5),
        standing("Alpha", 6, 5, 3),
        standing("Kilo", 3, 9, 9),
    ];
    rank_standings(&mut table);
    let order: Vec<&str> = table.iter().map(|s| s.team_name.as_str()).collect();
    assert_eq!(order, vec!["Alpha", "Bravo", "Yankee", "Kilo", "Zulu"]);
}

#[test]
fn recording_results_updates_group_table() {
    let (mut t, ids) = tournament_with_teams(&["Alpha", "Bravo", "Charlie", "Delta"]);
    let group = t.create_group(Some("Pool A"), &ids).unwrap();
    generate_group_fixtures(&mut t, group).unwrap();

    // Alpha vs Bravo
    let first = t.matches[0].id;
    record_group_result(&mut t, first, Score::new(10, 4)).unwrap();

    let tables = group_standings(&t).unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].group_name, "Pool A");
    assert_eq!(tables[0].standings.len(), 4);
    assert_eq!(tables[0].standings[0].team_name, "Alpha");
    assert_eq!(tables[0].standings[0].points, 3);
    assert_eq!(tables[0].standings[3].team_name, "Bravo");

    reopen_group_match(&mut t, first).unwrap();
    assert!(!t.matches[0].played);
    let tables = group_standings(&t).unwrap();
    assert!(tables[0].standings.iter().all(|s| s.played == 0));
}

#[test]
fn scores_are_bounded_and_games_must_exist() {
    let (mut t, ids) = tournament_with_teams(&["Alpha", "Bravo", "Charlie", "Delta"]);
    let group = t.create_group(None, &ids).unwrap();
    generate_group_fixtures(&mut t, group).unwrap();
    let first = t.matches[0].id;

    assert_eq!(
        record_group_result(&mut t, first, Score::new(11, 0)),
        Err(TournamentError::Validation(ValidationError::ScoreOutOfRange { max: 10 }))
    );
    assert!(!t.matches[0].played);

    let missing = Uuid::new_v4();
    assert_eq!(
        record_group_result(&mut t, missing, Score::new(1, 0)),
        Err(TournamentError::MatchNotFound(missing))
    );
}

#[test]
fn maximum_scores_do_not_overflow_standings() {
    let settings = TournamentSettings {
        max_score: u32::MAX,
        ..TournamentSettings::default()
    };
    let mut t = Tournament::new(settings);
    let ids: Vec<TeamId> = ["Alpha", "Bravo", "Charlie", "Delta"]
        .iter()
        .enumerate()
        .map(|(i, name)| {
            t.register_team(name, &format!("Alpha {i:02}"), &format!("Bravo {i:02}"))
                .unwrap()
        })
        .collect();
    let group = t.create_group(None, &ids).unwrap();
    generate_group_fixtures(&mut t, group).unwrap();
    let games: Vec<_> = t.matches.iter().map(|m| m.id).collect();
    for id in games {
        record_group_result(&mut t, id, Score::new(u32::MAX, u32::MAX)).unwrap();
    }

    let tables = group_standings(&t).unwrap();
    let most = 3 * u64::from(u32::MAX);
    for s in &tables[0].standings {
        assert_eq!((s.points, s.played), (3, 3));
        assert_eq!((s.cups_scored, s.cups_conceded), (most, most));
        assert_eq!(s.cup_difference(), 0);
    }
}
