//! Single binary web server: JSON API over one in-memory tournament.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Admin-only routes need a session created through POST /api/admin/login with ADMIN_TOKEN.

use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use cup_tournament_web::{
    advance_round, champion, create_groups, draw_groups, generate_knockout_stage,
    group_standings, import_teams_csv, knockout_bracket, record_group_result,
    record_knockout_result, reopen_group_match, Round, Score, ServerConfig, TeamId, Tournament,
    TournamentError, TournamentSettings, ValidationError,
};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use uuid::Uuid;

/// The single tournament. Every mutating handler holds the write guard for the whole operation.
type AppState = Data<RwLock<Tournament>>;

/// Token checked by the admin login.
struct AdminToken(String);

const ADMIN_SESSION_KEY: &str = "is_admin";

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct AdminLoginBody {
    token: String,
}

#[derive(Deserialize)]
struct RegisterTeamBody {
    name: String,
    member_one: String,
    member_two: String,
}

#[derive(Deserialize)]
struct CreateGroupBody {
    #[serde(default)]
    name: Option<String>,
    teams: Vec<TeamId>,
}

#[derive(Deserialize)]
struct BulkGroupsBody {
    #[serde(default)]
    groups: Vec<Vec<TeamId>>,
}

#[derive(Deserialize)]
struct ScoreBody {
    score_team1: u32,
    score_team2: u32,
}

#[derive(Deserialize)]
struct NextRoundBody {
    current_round: String,
    next_round: String,
}

/// Path segment: entity id (e.g. /api/teams/{id})
#[derive(Deserialize)]
struct IdPath {
    id: Uuid,
}

#[derive(Serialize)]
struct GameView {
    id: Uuid,
    group: String,
    team1: String,
    team2: String,
    score_team1: Option<u32>,
    score_team2: Option<u32>,
    played: bool,
}

#[derive(Serialize)]
struct KnockoutGameView {
    id: Uuid,
    round: Round,
    round_name: &'static str,
    team1: String,
    team2: String,
    score_team1: Option<u32>,
    score_team2: Option<u32>,
    played: bool,
}

#[derive(Serialize)]
struct StandingView {
    team: String,
    points: u32,
    cups_scored: u64,
    cups_conceded: u64,
    /// Signed, e.g. "+3".
    cup_difference: String,
    played: u32,
}

#[derive(Serialize)]
struct GroupStandingsView {
    group: String,
    standings: Vec<StandingView>,
}

fn success<T: Serialize>(message: impl Into<String>, data: T) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": message.into(),
        "data": data,
    }))
}

fn failure(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "success": false, "error": e.to_string() });
    match e {
        TournamentError::TeamNotFound(_)
        | TournamentError::GroupNotFound(_)
        | TournamentError::MatchNotFound(_) => HttpResponse::NotFound().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

fn forbidden() -> HttpResponse {
    HttpResponse::Forbidden().json(serde_json::json!({
        "success": false,
        "error": "Admin rights required",
    }))
}

fn is_admin(session: &Session) -> bool {
    session
        .get::<bool>(ADMIN_SESSION_KEY)
        .ok()
        .flatten()
        .unwrap_or(false)
}

fn team_name(t: &Tournament, id: TeamId) -> String {
    t.team(id).map(|team| team.name.clone()).unwrap_or_default()
}

fn game_views(t: &Tournament) -> Vec<GameView> {
    t.matches
        .iter()
        .map(|m| GameView {
            id: m.id,
            group: t.group(m.group_id).map(|g| g.name.clone()).unwrap_or_default(),
            team1: team_name(t, m.team_1),
            team2: team_name(t, m.team_2),
            score_team1: m.score.map(|s| s.team_1),
            score_team2: m.score.map(|s| s.team_2),
            played: m.played,
        })
        .collect()
}

fn knockout_views(t: &Tournament) -> Vec<KnockoutGameView> {
    knockout_bracket(t)
        .into_iter()
        .map(|m| KnockoutGameView {
            id: m.id,
            round: m.round,
            round_name: m.round.display_name(),
            team1: team_name(t, m.team_1),
            team2: team_name(t, m.team_2),
            score_team1: m.score.map(|s| s.team_1),
            score_team2: m.score.map(|s| s.team_2),
            played: m.played,
        })
        .collect()
}

fn signed(diff: i128) -> String {
    if diff > 0 {
        format!("+{}", diff)
    } else {
        diff.to_string()
    }
}

fn parse_round(code: &str) -> Result<Round, TournamentError> {
    code.parse::<Round>()
        .map_err(|c| TournamentError::from(ValidationError::UnknownRound(c)))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "cup-tournament-web",
    })
}

/// Whether the current session has admin rights.
#[get("/api/me")]
async fn api_me(session: Session) -> HttpResponse {
    success(
        "User info fetched successfully.",
        serde_json::json!({ "is_staff": is_admin(&session) }),
    )
}

#[post("/api/admin/login")]
async fn api_admin_login(
    session: Session,
    token: Data<AdminToken>,
    body: Json<AdminLoginBody>,
) -> HttpResponse {
    if body.token != token.0 {
        log::warn!("Rejected admin login");
        return forbidden();
    }
    if session.insert(ADMIN_SESSION_KEY, true).is_err() {
        return HttpResponse::InternalServerError().body("session error");
    }
    success("Logged in as admin.", serde_json::Value::Null)
}

#[post("/api/admin/logout")]
async fn api_admin_logout(session: Session) -> HttpResponse {
    session.purge();
    success("Logged out.", serde_json::Value::Null)
}

#[get("/api/teams")]
async fn api_list_teams(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    success("Teams fetched successfully.", &g.teams)
}

#[post("/api/teams")]
async fn api_register_team(state: AppState, body: Json<RegisterTeamBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.register_team(&body.name, &body.member_one, &body.member_two) {
        Ok(id) => match g.team(id) {
            Ok(team) => success("Team created successfully.", team),
            Err(e) => failure(&e),
        },
        Err(e) => failure(&e),
    }
}

/// Register teams from a CSV body with header `name,member_one,member_two`.
#[post("/api/teams/import")]
async fn api_import_teams(state: AppState, session: Session, body: String) -> HttpResponse {
    if !is_admin(&session) {
        return forbidden();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match import_teams_csv(&mut g, body.as_bytes()) {
        Ok(count) => success(format!("{} teams imported.", count), &g.teams),
        Err(e) => failure(&e),
    }
}

#[delete("/api/teams/{id}")]
async fn api_delete_team(state: AppState, session: Session, path: Path<IdPath>) -> HttpResponse {
    if !is_admin(&session) {
        return forbidden();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.remove_team(path.id) {
        Ok(()) => success("Team deleted successfully.", serde_json::Value::Null),
        Err(e) => failure(&e),
    }
}

#[get("/api/groups")]
async fn api_list_groups(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    success("Groups fetched successfully.", &g.groups)
}

/// Create one group without games.
#[post("/api/groups")]
async fn api_create_group(state: AppState, body: Json<CreateGroupBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.create_group(body.name.as_deref(), &body.teams) {
        Ok(id) => match g.group(id) {
            Ok(group) => success("Tournament group created successfully.", group),
            Err(e) => failure(&e),
        },
        Err(e) => failure(&e),
    }
}

/// Replace all groups with the posted partition and generate their games.
#[post("/api/groups/bulk")]
async fn api_bulk_groups(
    state: AppState,
    session: Session,
    body: Json<BulkGroupsBody>,
) -> HttpResponse {
    if !is_admin(&session) {
        return forbidden();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match create_groups(&mut g, &body.groups) {
        Ok(()) => success("Tournament groups created successfully.", &g.groups),
        Err(e) => failure(&e),
    }
}

/// Randomly draw all registered teams into groups of four and generate their games.
#[post("/api/groups/draw")]
async fn api_draw_groups(state: AppState, session: Session) -> HttpResponse {
    if !is_admin(&session) {
        return forbidden();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let team_ids: Vec<TeamId> = g.teams.iter().map(|t| t.id).collect();
    let partition = draw_groups(&team_ids, &mut rand::thread_rng());
    match create_groups(&mut g, &partition) {
        Ok(()) => success("Tournament groups drawn successfully.", &g.groups),
        Err(e) => failure(&e),
    }
}

#[delete("/api/groups")]
async fn api_delete_groups(state: AppState, session: Session) -> HttpResponse {
    if !is_admin(&session) {
        return forbidden();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    g.delete_all_groups();
    success("All tournament groups deleted.", serde_json::Value::Null)
}

#[get("/api/groups/standings")]
async fn api_group_standings(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let tables = match group_standings(&g) {
        Ok(tables) => tables,
        Err(e) => return failure(&e),
    };
    let views: Vec<GroupStandingsView> = tables
        .into_iter()
        .map(|table| GroupStandingsView {
            group: table.group_name,
            standings: table
                .standings
                .iter()
                .map(|s| StandingView {
                    team: s.team_name.clone(),
                    points: s.points,
                    cups_scored: s.cups_scored,
                    cups_conceded: s.cups_conceded,
                    cup_difference: signed(s.cup_difference()),
                    played: s.played,
                })
                .collect(),
        })
        .collect();
    success("Standings fetched successfully.", views)
}

#[get("/api/games")]
async fn api_list_games(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    success("Games fetched successfully.", game_views(&g))
}

#[put("/api/games/{id}/score")]
async fn api_set_game_score(
    state: AppState,
    path: Path<IdPath>,
    body: Json<ScoreBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let score = Score::new(body.score_team1, body.score_team2);
    match record_group_result(&mut g, path.id, score) {
        Ok(()) => success("Score updated successfully.", game_views(&g)),
        Err(e) => failure(&e),
    }
}

#[post("/api/games/{id}/reopen")]
async fn api_reopen_game(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match reopen_group_match(&mut g, path.id) {
        Ok(()) => success("Game reopened.", game_views(&g)),
        Err(e) => failure(&e),
    }
}

#[get("/api/ko-stage")]
async fn api_list_knockout(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    success("Knockout games fetched successfully.", knockout_views(&g))
}

#[post("/api/ko-stage/generate")]
async fn api_generate_knockout(state: AppState, session: Session) -> HttpResponse {
    if !is_admin(&session) {
        return forbidden();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match generate_knockout_stage(&mut g) {
        Ok(_) => success("Knockout stage generated successfully.", knockout_views(&g)),
        Err(e) => failure(&e),
    }
}

#[post("/api/ko-stage/next-round")]
async fn api_next_round(
    state: AppState,
    session: Session,
    body: Json<NextRoundBody>,
) -> HttpResponse {
    if !is_admin(&session) {
        return forbidden();
    }
    let (current, next) = match (parse_round(&body.current_round), parse_round(&body.next_round)) {
        (Ok(c), Ok(n)) => (c, n),
        (Err(e), _) | (_, Err(e)) => return failure(&e),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match advance_round(&mut g, current, next) {
        Ok(created) => success(
            format!("{} games created for round {}.", created, next),
            knockout_views(&g),
        ),
        Err(e) => failure(&e),
    }
}

#[put("/api/ko-stage/{id}/score")]
async fn api_set_knockout_score(
    state: AppState,
    path: Path<IdPath>,
    body: Json<ScoreBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let score = Score::new(body.score_team1, body.score_team2);
    match record_knockout_result(&mut g, path.id, score) {
        Ok(()) => success("Score updated successfully.", knockout_views(&g)),
        Err(e) => failure(&e),
    }
}

#[delete("/api/ko-stage")]
async fn api_delete_knockout(state: AppState, session: Session) -> HttpResponse {
    if !is_admin(&session) {
        return forbidden();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let removed = g.delete_knockout_stage();
    success(format!("{} knockout games deleted.", removed), serde_json::Value::Null)
}

#[get("/api/ko-stage/champion")]
async fn api_champion(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match champion(&g) {
        Ok(Some(id)) => match g.team(id) {
            Ok(team) => success("Champion decided.", team),
            Err(e) => failure(&e),
        },
        Ok(None) => success("No champion yet.", serde_json::Value::Null),
        Err(e) => failure(&e),
    }
}

#[post("/api/reset-tournament")]
async fn api_reset(state: AppState, session: Session) -> HttpResponse {
    if !is_admin(&session) {
        return forbidden();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    g.reset();
    success("Tournament reset successful.", serde_json::Value::Null)
}

/// Configured token, or a random one printed to the log for this run.
fn admin_token(config: &ServerConfig) -> String {
    match &config.admin_token {
        Some(token) => token.clone(),
        None => {
            let token: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(24)
                .map(char::from)
                .collect();
            log::warn!("ADMIN_TOKEN not set; admin token for this run: {}", token);
            token
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let settings = TournamentSettings::from_env();
    log::info!("Tournament settings: {:?}", settings);

    let token = Data::new(AdminToken(admin_token(&config)));
    let state = Data::new(RwLock::new(Tournament::new(settings)));
    // Sessions do not survive a restart.
    let session_key = Key::generate();

    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .app_data(state.clone())
            .app_data(token.clone())
            .service(api_health)
            .service(api_me)
            .service(api_admin_login)
            .service(api_admin_logout)
            .service(api_list_teams)
            .service(api_register_team)
            .service(api_import_teams)
            .service(api_delete_team)
            .service(api_list_groups)
            .service(api_create_group)
            .service(api_bulk_groups)
            .service(api_draw_groups)
            .service(api_delete_groups)
            .service(api_group_standings)
            .service(api_list_games)
            .service(api_set_game_score)
            .service(api_reopen_game)
            .service(api_list_knockout)
            .service(api_generate_knockout)
            .service(api_next_round)
            .service(api_set_knockout_score)
            .service(api_delete_knockout)
            .service(api_champion)
            .service(api_reset)
    })
    .bind(bind)?
    .run()
    .await
}
