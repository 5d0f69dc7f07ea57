//! Single binary web server: HTML from templates/, static from /static, game API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Env: HOST, PORT, DATA_FILE (JSON snapshot; unset = memory only), SESSION_TTL_HOURS,
//! DEFAULT_TOTAL_ROUNDS, SESSION_KEY (at least 64 bytes; random per start if unset).

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    delete, get, post,
    web::{self, Data, Json},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::Utc;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::Duration;
use tictactoe_match_web::{
    clear_history, complete_round, detect_terminal, leaderboard, next_round, place_mark,
    play_turn, reset_board, restart_match, session_stats, start_match, write_leaderboard_csv,
    GameState, Match, PersistedSession, PlayerId, SessionId, Snapshot, DEFAULT_TOTAL_ROUNDS,
};
use uuid::Uuid;

/// Cookie-session key holding the caller's session id.
const SESSION_KEY: &str = "session_id";

const DEFAULT_SESSION_TTL_HOURS: i64 = 12;

/// One year.
const MAX_SESSION_TTL_HOURS: i64 = 24 * 366;

/// How often inactive sessions are swept.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Server settings, read from the environment.
struct Config {
    host: String,
    port: u16,
    data_file: Option<PathBuf>,
    session_ttl: chrono::Duration,
    default_total_rounds: u32,
    session_key: Key,
}

impl Config {
    fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
        let port = env_parse("PORT").unwrap_or_else(default_port);
        let data_file = std::env::var_os("DATA_FILE").map(PathBuf::from);
        let session_ttl = session_ttl_from(std::env::var("SESSION_TTL_HOURS").ok().as_deref());
        let default_total_rounds = env_parse("DEFAULT_TOTAL_ROUNDS")
            .filter(|&n: &u32| n > 0)
            .unwrap_or(DEFAULT_TOTAL_ROUNDS);
        let session_key = match std::env::var("SESSION_KEY") {
            Ok(k) => Key::try_from(k.as_bytes()).unwrap_or_else(|_| {
                log::warn!("SESSION_KEY shorter than 64 bytes; using a random key");
                Key::generate()
            }),
            Err(_) => Key::generate(),
        };
        Self {
            host,
            port,
            data_file,
            session_ttl,
            default_total_rounds,
            session_key,
        }
    }
}

/// Session lifetime in hours: 1 to [`MAX_SESSION_TTL_HOURS`], default 12.
fn session_ttl_from(raw: Option<&str>) -> chrono::Duration {
    let hours = match raw.map(|v| v.trim().parse::<i64>()) {
        None => DEFAULT_SESSION_TTL_HOURS,
        Some(Ok(h)) if (1..=MAX_SESSION_TTL_HOURS).contains(&h) => h,
        Some(_) => {
            log::warn!(
                "SESSION_TTL_HOURS must be 1..={}; using {}",
                MAX_SESSION_TTL_HOURS,
                DEFAULT_SESSION_TTL_HOURS
            );
            DEFAULT_SESSION_TTL_HOURS
        }
    };
    chrono::Duration::try_hours(hours)
        .unwrap_or_else(|| chrono::Duration::hours(DEFAULT_SESSION_TTL_HOURS))
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// In-memory state: one GameState per browser session, plus where to snapshot it.
struct AppStore {
    sessions: RwLock<Snapshot>,
    data_file: Option<PathBuf>,
    default_total_rounds: u32,
    /// Serializes snapshot writes so they land in mutation order.
    persist_lock: tokio::sync::Mutex<()>,
}

impl AppStore {
    fn new(snapshot: Snapshot, data_file: Option<PathBuf>, default_total_rounds: u32) -> Self {
        Self {
            sessions: RwLock::new(snapshot),
            data_file,
            default_total_rounds,
            persist_lock: tokio::sync::Mutex::new(()),
        }
    }
}

type AppState = Data<AppStore>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct StartMatchBody {
    player1_name: String,
    player2_name: String,
    total_rounds: Option<u32>,
}

#[derive(Deserialize)]
struct MoveBody {
    row: usize,
    col: usize,
}

#[derive(Deserialize)]
struct PlaceMarkBody {
    row: usize,
    col: usize,
    player_id: PlayerId,
}

#[derive(Deserialize)]
struct CompleteRoundBody {
    winner_id: Option<PlayerId>,
    #[serde(default)]
    is_draw: bool,
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(serde_json::json!({ "error": "lock error" }))
}

/// The caller's session id, assigning a fresh one on first contact.
fn session_id(session: &Session) -> Result<SessionId, HttpResponse> {
    if let Ok(Some(id)) = session.get::<SessionId>(SESSION_KEY) {
        return Ok(id);
    }
    let id = Uuid::new_v4();
    session.insert(SESSION_KEY, id).map_err(|e| {
        log::error!("Failed to store session id: {}", e);
        HttpResponse::InternalServerError().json(serde_json::json!({ "error": "session error" }))
    })?;
    log::debug!("New session {}", id);
    Ok(id)
}

/// Run `f` on the caller's GameState (created on demand), refreshing its last activity.
fn with_game<R>(
    state: &AppStore,
    session: &Session,
    f: impl FnOnce(&mut GameState) -> R,
) -> Result<R, HttpResponse> {
    let sid = session_id(session)?;
    let mut g = state.sessions.write().map_err(|_| lock_error())?;
    let entry = g.root.entry(sid).or_insert_with(|| PersistedSession {
        game: GameState::new(),
        last_activity: Utc::now(),
    });
    entry.last_activity = Utc::now();
    Ok(f(&mut entry.game))
}

/// Apply an intent, answer with the updated GameState, then snapshot.
/// Ignored intents still answer 200 with the unchanged state.
async fn apply_intent(state: &AppStore, session: &Session, f: impl FnOnce(&mut GameState)) -> HttpResponse {
    let response = match with_game(state, session, |game| {
        f(game);
        HttpResponse::Ok().json(&*game)
    }) {
        Ok(r) => r,
        Err(r) => return r,
    };
    persist(state).await;
    response
}

/// Apply `f` to the current match; nothing happens when there is none.
fn on_current(game: &mut GameState, f: impl FnOnce(&mut Match)) {
    match game.current_match_mut() {
        Some(m) => f(m),
        None => log::debug!("No current match; intent ignored"),
    }
}

/// Write the whole store to DATA_FILE, if configured.
async fn persist(state: &AppStore) {
    let Some(path) = state.data_file.clone() else {
        return;
    };
    let _guard = state.persist_lock.lock().await;
    let snapshot = match state.sessions.read() {
        Ok(g) => g.clone(),
        Err(_) => {
            log::error!("Snapshot skipped: lock poisoned");
            return;
        }
    };
    let target = path.clone();
    match tokio::task::spawn_blocking(move || snapshot.save(&target)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => log::error!("Failed to write snapshot {}: {}", path.display(), e),
        Err(e) => log::error!("Snapshot task failed: {}", e),
    }
}

/// Startup state: the DATA_FILE snapshot if configured and readable, else empty.
fn load_snapshot(data_file: Option<&Path>) -> Snapshot {
    let Some(path) = data_file else {
        return Snapshot::default();
    };
    match Snapshot::load(path) {
        Ok(s) => {
            log::info!("Loaded {} session(s) from {}", s.root.len(), path.display());
            s
        }
        Err(e) => {
            log::warn!("Ignoring unreadable snapshot {}: {}", path.display(), e);
            Snapshot::default()
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tictactoe-match-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// The caller's GameState: history plus current match.
#[get("/api/game")]
async fn api_get_game(state: AppState, session: Session) -> HttpResponse {
    match with_game(&state, &session, |game| HttpResponse::Ok().json(&*game)) {
        Ok(r) | Err(r) => r,
    }
}

/// Start a new match and make it current.
#[post("/api/game/start")]
async fn api_start_match(state: AppState, session: Session, body: Json<StartMatchBody>) -> HttpResponse {
    let body = body.into_inner();
    let total_rounds = body.total_rounds.unwrap_or(state.default_total_rounds);
    apply_intent(&state, &session, |game| {
        start_match(game, body.player1_name, body.player2_name, total_rounds);
    })
    .await
}

/// Play for whoever's turn it is; finalizes the round when the board becomes terminal.
#[post("/api/game/move")]
async fn api_move(state: AppState, session: Session, body: Json<MoveBody>) -> HttpResponse {
    apply_intent(&state, &session, |game| {
        on_current(game, |m| {
            if let Some(terminal) = play_turn(m, body.row, body.col) {
                log::debug!("match {}: round {} ended: {:?}", m.id, m.running_round, terminal);
            }
        })
    })
    .await
}

/// Place a mark for an explicit player without finalizing the round.
#[post("/api/game/place")]
async fn api_place_mark(state: AppState, session: Session, body: Json<PlaceMarkBody>) -> HttpResponse {
    apply_intent(&state, &session, |game| {
        on_current(game, |m| {
            place_mark(m, body.row, body.col, body.player_id);
        })
    })
    .await
}

/// Finalize the running round with a precomputed result.
#[post("/api/game/complete")]
async fn api_complete_round(state: AppState, session: Session, body: Json<CompleteRoundBody>) -> HttpResponse {
    apply_intent(&state, &session, |game| {
        on_current(game, |m| {
            complete_round(m, body.winner_id, body.is_draw);
        })
    })
    .await
}

#[post("/api/game/next-round")]
async fn api_next_round(state: AppState, session: Session) -> HttpResponse {
    apply_intent(&state, &session, |game| {
        on_current(game, |m| {
            next_round(m);
        })
    })
    .await
}

/// Clear the board of an unfinished round.
#[post("/api/game/reset-board")]
async fn api_reset_board(state: AppState, session: Session) -> HttpResponse {
    apply_intent(&state, &session, |game| on_current(game, reset_board)).await
}

/// Restart the current match with the same players.
#[post("/api/game/restart")]
async fn api_restart_match(state: AppState, session: Session) -> HttpResponse {
    apply_intent(&state, &session, |game| on_current(game, restart_match)).await
}

/// Forget every match of this session.
#[delete("/api/game/history")]
async fn api_clear_history(state: AppState, session: Session) -> HttpResponse {
    apply_intent(&state, &session, clear_history).await
}

/// Terminal check of the current board (null while the round can continue).
#[get("/api/terminal")]
async fn api_terminal(state: AppState, session: Session) -> HttpResponse {
    match with_game(&state, &session, |game| {
        let terminal = game.current_match().and_then(|m| detect_terminal(&m.board));
        HttpResponse::Ok().json(serde_json::json!({ "terminal": terminal }))
    }) {
        Ok(r) | Err(r) => r,
    }
}

#[get("/api/leaderboard")]
async fn api_leaderboard(state: AppState, session: Session) -> HttpResponse {
    match with_game(&state, &session, |game| {
        HttpResponse::Ok().json(serde_json::json!({
            "entries": leaderboard(game),
            "stats": session_stats(game),
        }))
    }) {
        Ok(r) | Err(r) => r,
    }
}

#[get("/api/leaderboard.csv")]
async fn api_leaderboard_csv(state: AppState, session: Session) -> HttpResponse {
    let csv = match with_game(&state, &session, |game| {
        let mut out = Vec::new();
        write_leaderboard_csv(game, &mut out).map(|()| out)
    }) {
        Ok(csv) => csv,
        Err(r) => return r,
    };
    match csv {
        Ok(bytes) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(("Content-Disposition", "attachment; filename=\"leaderboard.csv\""))
            .body(bytes),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() })),
    }
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(serve_index_async))
        .service(api_health)
        .service(favicon)
        .service(api_get_game)
        .service(api_start_match)
        .service(api_move)
        .service(api_place_mark)
        .service(api_complete_round)
        .service(api_next_round)
        .service(api_reset_board)
        .service(api_restart_match)
        .service(api_clear_history)
        .service(api_terminal)
        .service(api_leaderboard)
        .service(api_leaderboard_csv);
}

fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("tictactoe_session".to_string())
        .cookie_secure(false)
        .build()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let snapshot = load_snapshot(config.data_file.as_deref());

    let bind = (config.host.as_str(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(AppStore::new(
        snapshot,
        config.data_file.clone(),
        config.default_total_rounds,
    ));

    // Background task: periodically drop sessions idle for longer than the TTL
    let state_cleanup = state.clone();
    let ttl = config.session_ttl;
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            let Some(cutoff) = Utc::now().checked_sub_signed(ttl) else {
                continue;
            };
            let removed = match state_cleanup.sessions.write() {
                Ok(mut g) => g.prune_inactive(cutoff),
                Err(_) => continue,
            };
            if removed > 0 {
                log::info!("Cleaned up {} inactive session(s)", removed);
                persist(&state_cleanup).await;
            }
        }
    });

    let key = config.session_key.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(session_middleware(key.clone()))
            .configure(routes)
            .service(Files::new("/static", "static"))
    })
    .bind(bind)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{cookie::Cookie, test};
    use tictactoe_match_web::Outcome;

    fn test_store() -> AppState {
        Data::new(AppStore::new(Snapshot::default(), None, DEFAULT_TOTAL_ROUNDS))
    }

    macro_rules! test_app {
        ($store:expr) => {
            test::init_service(
                App::new()
                    .app_data($store.clone())
                    .wrap(session_middleware(Key::generate()))
                    .configure(routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn health_reports_ok() {
        let store = test_store();
        let app = test_app!(store);
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["ok"], true);
    }

    #[actix_web::test]
    async fn intents_without_a_match_are_ignored() {
        let store = test_store();
        let app = test_app!(store);
        let req = test::TestRequest::post().uri("/api/game/next-round").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let game: GameState = test::read_body_json(resp).await;
        assert_eq!(game, GameState::new());
    }

    #[actix_web::test]
    async fn moves_play_a_round_through_the_session() {
        let store = test_store();
        let app = test_app!(store);

        let req = test::TestRequest::post()
            .uri("/api/game/start")
            .set_json(serde_json::json!({ "player1_name": "Ada", "player2_name": "Lin" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let cookie: Cookie<'static> = resp
            .response()
            .cookies()
            .next()
            .expect("session cookie")
            .into_owned();
        let game: GameState = test::read_body_json(resp).await;
        assert_eq!(game.total_matches, 1);

        let mut last = game;
        for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
            let req = test::TestRequest::post()
                .uri("/api/game/move")
                .cookie(cookie.clone())
                .set_json(serde_json::json!({ "row": row, "col": col }))
                .to_request();
            last = test::call_and_read_body_json(&app, req).await;
        }

        let m = last.current_match().unwrap();
        assert_eq!(m.completed_round, 1);
        assert_eq!(m.player_1.wins, 1);
        assert_eq!(m.player_1.score, 2);
        assert_eq!(m.player_2.losses, 1);
        assert_eq!(m.outcome, Outcome::Ongoing);

        let req = test::TestRequest::get()
            .uri("/api/terminal")
            .cookie(cookie.clone())
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["terminal"]["result"], "decisive");
        assert_eq!(body["terminal"]["line"]["kind"]["row"], 0);
    }

    #[::core::prelude::v1::test]
    fn session_ttl_falls_back_on_bad_values() {
        let default = chrono::Duration::hours(12);
        assert_eq!(session_ttl_from(None), default);
        assert_eq!(session_ttl_from(Some("48")), chrono::Duration::hours(48));
        for bad in ["0", "-3", "abc", "10000000000", "99999999999999999", ""] {
            assert_eq!(session_ttl_from(Some(bad)), default, "{bad:?}");
        }
        let ttl = session_ttl_from(Some(MAX_SESSION_TTL_HOURS.to_string().as_str()));
        assert!(Utc::now().checked_sub_signed(ttl).is_some());
    }

    #[actix_web::test]
    async fn intents_are_written_to_the_data_file_and_reloaded() {
        let path = std::env::temp_dir().join(format!("tictactoe-web-{}.json", Uuid::new_v4()));
        let store = Data::new(AppStore::new(
            Snapshot::default(),
            Some(path.clone()),
            DEFAULT_TOTAL_ROUNDS,
        ));
        let app = test_app!(store);

        let req = test::TestRequest::post()
            .uri("/api/game/start")
            .set_json(serde_json::json!({ "player1_name": "Ada", "player2_name": "Lin" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let cookie: Cookie<'static> = resp
            .response()
            .cookies()
            .next()
            .expect("session cookie")
            .into_owned();
        let _: GameState = test::read_body_json(resp).await;

        let req = test::TestRequest::post()
            .uri("/api/game/move")
            .cookie(cookie)
            .set_json(serde_json::json!({ "row": 1, "col": 1 }))
            .to_request();
        let game: GameState = test::call_and_read_body_json(&app, req).await;

        let saved = Snapshot::load(&path).unwrap();
        assert_eq!(saved.root.len(), 1);
        let session = saved.root.values().next().unwrap();
        assert_eq!(session.game, game);
        assert_eq!(
            session.game.current_match().unwrap().board.get(1, 1),
            Some(tictactoe_match_web::Cell::MarkA)
        );

        let reloaded = load_snapshot(Some(path.as_path()));
        std::fs::remove_file(&path).unwrap();
        assert_eq!(reloaded, saved);
    }

    #[::core::prelude::v1::test]
    fn startup_load_tolerates_missing_and_corrupt_files() {
        assert!(load_snapshot(None).root.is_empty());
        let path = std::env::temp_dir().join(format!("tictactoe-web-{}.json", Uuid::new_v4()));
        assert!(load_snapshot(Some(path.as_path())).root.is_empty());
        std::fs::write(&path, b"not json").unwrap();
        let loaded = load_snapshot(Some(path.as_path()));
        std::fs::remove_file(&path).unwrap();
        assert!(loaded.root.is_empty());
    }

    #[actix_web::test]
    async fn leaderboard_csv_has_header() {
        let store = test_store();
        let app = test_app!(store);
        let req = test::TestRequest::get().uri("/api/leaderboard.csv").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.starts_with("name,points,wins,losses,draws,matches_played,matches_won"));
    }
}
