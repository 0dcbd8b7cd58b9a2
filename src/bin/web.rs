//! JSON API over the tournament engine. One session per organiser: a roster
//! plus at most one active tournament, kept in memory.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use padel_match_center::logic::{
    add_match, add_second_round, assign_bracket_teams, create_tournament, delete_match,
    final_classification, record_score, reset_score, unassign_bracket_teams,
};
use padel_match_center::models::{
    Format, MatchId, MatchRef, PlayerId, Roster, ScoreEntry, Tournament, TournamentConfig,
    TournamentError,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

type SessionId = Uuid;

/// Per-session entry: roster, active tournament, last activity time (for auto-cleanup).
struct Session {
    roster: Roster,
    tournament: Option<Tournament>,
    last_activity: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            roster: Roster::new(),
            tournament: None,
            last_activity: Instant::now(),
        }
    }
}

/// In-memory state: sessions by id. Entries are removed after 12h inactivity.
type AppState = Data<RwLock<HashMap<SessionId, Session>>>;

const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);
const CLEANUP_EVERY: Duration = Duration::from_secs(30 * 60);

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Serialize)]
struct SessionView<'a> {
    id: SessionId,
    roster: &'a Roster,
    tournament: Option<&'a Tournament>,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
}

#[derive(Deserialize)]
struct ImportBody {
    text: String,
}

#[derive(Deserialize)]
struct HandicapBody {
    handicap: i32,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    format: Format,
    player_ids: Vec<PlayerId>,
    #[serde(default)]
    config: TournamentConfig,
}

#[derive(Deserialize)]
struct SidesBody {
    side_a: Vec<PlayerId>,
    side_b: Vec<PlayerId>,
}

#[derive(Deserialize)]
struct SessionPath {
    id: SessionId,
}

#[derive(Deserialize)]
struct PlayerPath {
    id: SessionId,
    player_id: PlayerId,
}

#[derive(Deserialize)]
struct MatchPath {
    id: SessionId,
    match_id: MatchId,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string(), "kind": e.kind() }))
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

fn no_session() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No session" }))
}

fn no_tournament() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No active tournament" }))
}

fn no_match() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No such match" }))
}

/// Run `f` on the session's active tournament and answer with the updated tournament.
fn with_tournament<F>(state: &AppState, id: SessionId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> Result<(), TournamentError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let Some(session) = g.get_mut(&id) else {
        return no_session();
    };
    session.last_activity = Instant::now();
    let Some(t) = session.tournament.as_mut() else {
        return no_tournament();
    };
    match f(t) {
        Ok(()) => HttpResponse::Ok().json(&*t),
        Err(e) => error_response(&e),
    }
}

/// Same as [`with_tournament`] for operations addressed to one match by id.
fn with_match<F>(state: &AppState, path: &MatchPath, f: F) -> Option<HttpResponse>
where
    F: FnOnce(&mut Tournament, MatchRef) -> Result<(), TournamentError>,
{
    let match_id = path.match_id;
    let mut found = true;
    let resp = with_tournament(state, path.id, |t| match t.locate(match_id) {
        Some(at) => f(t, at),
        None => {
            found = false;
            Ok(())
        }
    });
    found.then_some(resp)
}

/// Run `f` on the session's roster and answer with the session.
fn with_roster<F>(state: &AppState, id: SessionId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Roster) -> Result<(), TournamentError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let Some(session) = g.get_mut(&id) else {
        return no_session();
    };
    session.last_activity = Instant::now();
    match f(&mut session.roster) {
        Ok(()) => HttpResponse::Ok().json(view(id, session)),
        Err(e) => error_response(&e),
    }
}

fn view(id: SessionId, session: &Session) -> SessionView<'_> {
    SessionView {
        id,
        roster: &session.roster,
        tournament: session.tournament.as_ref(),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "padel-match-center",
    })
}

/// Open a new session (client stores the id for subsequent requests).
#[post("/api/sessions")]
async fn api_create_session(state: AppState) -> HttpResponse {
    let id = Uuid::new_v4();
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let session = g.entry(id).or_insert_with(Session::new);
    log::info!("Session {} opened", id);
    HttpResponse::Ok().json(view(id, session))
}

/// Get a session (404 if not found). Touching it refreshes last_activity.
#[get("/api/sessions/{id}")]
async fn api_get_session(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get_mut(&path.id) {
        Some(session) => {
            session.last_activity = Instant::now();
            HttpResponse::Ok().json(view(path.id, session))
        }
        None => no_session(),
    }
}

#[post("/api/sessions/{id}/players")]
async fn api_add_player(
    state: AppState,
    path: Path<SessionPath>,
    body: Json<AddPlayerBody>,
) -> HttpResponse {
    with_roster(&state, path.id, |roster| roster.add_player(body.name.as_str()).map(|_| ()))
}

/// Import a pasted list of names, one per line or comma separated.
#[post("/api/sessions/{id}/players/import")]
async fn api_import_players(
    state: AppState,
    path: Path<SessionPath>,
    body: Json<ImportBody>,
) -> HttpResponse {
    with_roster(&state, path.id, |roster| {
        let added = roster.import_list(&body.text);
        log::info!("Imported {} player(s)", added);
        Ok(())
    })
}

#[delete("/api/sessions/{id}/players/{player_id}")]
async fn api_remove_player(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    with_roster(&state, path.id, |roster| roster.remove_player(path.player_id))
}

#[put("/api/sessions/{id}/players/{player_id}/handicap")]
async fn api_set_handicap(
    state: AppState,
    path: Path<PlayerPath>,
    body: Json<HandicapBody>,
) -> HttpResponse {
    with_roster(&state, path.id, |roster| roster.set_handicap(path.player_id, body.handicap))
}

/// Create the active tournament from selected roster players. Replaces any previous one.
#[post("/api/sessions/{id}/tournament")]
async fn api_create_tournament(
    state: AppState,
    path: Path<SessionPath>,
    body: Json<CreateTournamentBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let Some(session) = g.get_mut(&path.id) else {
        return no_session();
    };
    session.last_activity = Instant::now();
    let created = session
        .roster
        .select(&body.player_ids)
        .and_then(|players| create_tournament(body.format, players, body.config));
    match created {
        Ok(t) => HttpResponse::Ok().json(session.tournament.insert(t)),
        Err(e) => error_response(&e),
    }
}

/// Discard the active tournament (back to configuration).
#[delete("/api/sessions/{id}/tournament")]
async fn api_discard_tournament(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let Some(session) = g.get_mut(&path.id) else {
        return no_session();
    };
    session.last_activity = Instant::now();
    if let Some(t) = session.tournament.take() {
        log::info!("Tournament {} discarded", t.id);
    }
    HttpResponse::Ok().json(view(path.id, session))
}

#[post("/api/sessions/{id}/tournament/second-round")]
async fn api_add_second_round(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    with_tournament(&state, path.id, add_second_round)
}

/// Latest standings; `null` when ranking failed for the current state.
#[get("/api/sessions/{id}/tournament/ranking")]
async fn api_ranking(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get(&path.id).map(|s| s.tournament.as_ref()) {
        None => no_session(),
        Some(None) => no_tournament(),
        Some(Some(t)) => HttpResponse::Ok().json(serde_json::json!({ "standings": t.standings })),
    }
}

#[get("/api/sessions/{id}/tournament/classification")]
async fn api_classification(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get(&path.id).map(|s| s.tournament.as_ref()) {
        None => no_session(),
        Some(None) => no_tournament(),
        Some(Some(t)) => match final_classification(t) {
            Ok(c) => HttpResponse::Ok().json(c),
            Err(e) => error_response(&e),
        },
    }
}

#[post("/api/sessions/{id}/tournament/matches")]
async fn api_add_match(
    state: AppState,
    path: Path<SessionPath>,
    body: Json<SidesBody>,
) -> HttpResponse {
    with_tournament(&state, path.id, |t| add_match(t, &body.side_a, &body.side_b).map(|_| ()))
}

#[delete("/api/sessions/{id}/tournament/matches/{match_id}")]
async fn api_delete_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    with_match(&state, &path, |t, at| delete_match(t, at).map(|_| ())).unwrap_or_else(no_match)
}

#[put("/api/sessions/{id}/tournament/matches/{match_id}/score")]
async fn api_record_score(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<ScoreEntry>,
) -> HttpResponse {
    let entry = body.into_inner();
    with_match(&state, &path, |t, at| record_score(t, at, entry)).unwrap_or_else(no_match)
}

#[delete("/api/sessions/{id}/tournament/matches/{match_id}/score")]
async fn api_reset_score(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    with_match(&state, &path, reset_score).unwrap_or_else(no_match)
}

/// Playoff: place two teams from the unassigned pool into a first-round match.
#[put("/api/sessions/{id}/tournament/matches/{match_id}/teams")]
async fn api_assign_teams(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<SidesBody>,
) -> HttpResponse {
    with_match(&state, &path, |t, at| {
        assign_bracket_teams(t, at, &body.side_a, &body.side_b).map(|_| ())
    })
    .unwrap_or_else(no_match)
}

#[delete("/api/sessions/{id}/tournament/matches/{match_id}/teams")]
async fn api_unassign_teams(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    with_match(&state, &path, unassign_bracket_teams).unwrap_or_else(no_match)
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<SessionId, Session>::new()));

    // Background task: every 30 minutes, remove sessions inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_EVERY);
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, session| session.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive session(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_session)
            .service(api_get_session)
            .service(api_add_player)
            .service(api_import_players)
            .service(api_remove_player)
            .service(api_set_handicap)
            .service(api_create_tournament)
            .service(api_discard_tournament)
            .service(api_add_second_round)
            .service(api_ranking)
            .service(api_classification)
            .service(api_add_match)
            .service(api_delete_match)
            .service(api_record_score)
            .service(api_reset_score)
            .service(api_assign_teams)
            .service(api_unassign_teams)
    })
    .bind(bind)?
    .run()
    .await
}
