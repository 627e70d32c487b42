//! Single binary web server exposing the tournament engine as a REST API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default; override with env: HOST, PORT.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use badminton_tournament_web::store::MemoryStore;
use badminton_tournament_web::{
    ServiceError, SetSlot, Side, TeamId, Tournament, TournamentError, TournamentService,
    ZoneAssignment,
};
use serde::Deserialize;

type AppState = Data<TournamentService<MemoryStore>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct TeamNameBody {
    name: String,
}

#[derive(Deserialize)]
struct ZonesBody {
    zones: ZoneAssignment,
}

#[derive(Deserialize)]
struct ScoreEditBody {
    set: u8,
    side: Side,
    value: u32,
}

/// Path segment: team id (e.g. /api/teams/{id})
#[derive(Deserialize)]
struct TeamPath {
    id: TeamId,
}

/// Path segment: match id (e.g. /api/matches/{id}/score)
#[derive(Deserialize)]
struct MatchPath {
    id: String,
}

/// Map a service outcome to a response: the full updated snapshot on
/// success, a JSON error body otherwise. Match-not-found is a 404 so the
/// client knows to refetch; store failures read as 503 (the snapshot has
/// already been resynced server-side).
fn respond(result: Result<Tournament, ServiceError>) -> HttpResponse {
    match result {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => {
            let body = serde_json::json!({ "error": e.to_string() });
            match e {
                ServiceError::Tournament(TournamentError::MatchNotFound(_)) => {
                    HttpResponse::NotFound().json(body)
                }
                ServiceError::Tournament(_) => HttpResponse::BadRequest().json(body),
                ServiceError::Store(_) => HttpResponse::ServiceUnavailable().json(body),
                ServiceError::Lock => HttpResponse::InternalServerError().json(body),
            }
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "badminton-tournament-web",
    })
}

/// The full tournament snapshot: teams, zones, matches, standings, phase.
#[get("/api/tournament")]
async fn api_get_tournament(state: AppState) -> HttpResponse {
    respond(state.snapshot())
}

/// Register a team.
#[post("/api/teams")]
async fn api_add_team(state: AppState, body: Json<TeamNameBody>) -> HttpResponse {
    respond(state.add_team(&body.name).await)
}

/// Rename a team.
#[put("/api/teams/{id}")]
async fn api_rename_team(
    state: AppState,
    path: Path<TeamPath>,
    body: Json<TeamNameBody>,
) -> HttpResponse {
    respond(state.rename_team(path.id, &body.name).await)
}

/// Remove a team. Do not remove a team that already appears in a match.
#[delete("/api/teams/{id}")]
async fn api_remove_team(state: AppState, path: Path<TeamPath>) -> HttpResponse {
    respond(state.remove_team(path.id).await)
}

/// Draw zones A/B from the registered teams (needs 12+).
#[post("/api/tournament/zones/generate")]
async fn api_generate_zones(state: AppState) -> HttpResponse {
    respond(state.generate_zones().await)
}

/// Replace the drafted zone assignment (operator reorder/move).
#[put("/api/tournament/zones")]
async fn api_update_zones(state: AppState, body: Json<ZonesBody>) -> HttpResponse {
    respond(state.update_zones(body.into_inner().zones).await)
}

/// Start the group stage: knockout pairings within each zone.
#[post("/api/tournament/group-stage/start")]
async fn api_start_group_stage(state: AppState) -> HttpResponse {
    respond(state.start_group_stage().await)
}

/// Start the ranking round: round robin among each group's winners.
#[post("/api/tournament/ranking-round/start")]
async fn api_start_ranking_round(state: AppState) -> HttpResponse {
    respond(state.start_ranking_round().await)
}

/// Build the knockout bracket from the ranking standings.
#[post("/api/tournament/knockout/generate")]
async fn api_generate_knockout(state: AppState) -> HttpResponse {
    respond(state.generate_knockout_bracket().await)
}

/// Reset to registration, keeping the roster. The operator confirmation
/// dialog belongs to the client.
#[post("/api/tournament/reset")]
async fn api_reset(state: AppState) -> HttpResponse {
    respond(state.reset().await)
}

/// Edit one side's points in one set of one match.
#[put("/api/matches/{id}/score")]
async fn api_update_score(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<ScoreEditBody>,
) -> HttpResponse {
    let Some(slot) = SetSlot::from_number(body.set) else {
        return respond(Err(TournamentError::InvalidSetNumber(body.set).into()));
    };
    respond(state.update_score(&path.id, slot, body.side, body.value).await)
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

    let service = Data::new(TournamentService::new(MemoryStore::new()));

    // An empty store is a fresh tournament, not an error.
    if let Err(e) = service.refresh().await {
        log::warn!("initial load from store failed: {}", e);
    }

    // Background task: converge on store changes pushed by other writers.
    let service_listener = service.clone();
    let mut events = service_listener.subscribe();
    actix_web::rt::spawn(async move {
        while events.recv().await.is_ok() {
            if let Err(e) = service_listener.refresh().await {
                log::warn!("refresh after store change failed: {}", e);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .service(api_health)
            .service(api_get_tournament)
            .service(api_add_team)
            .service(api_rename_team)
            .service(api_remove_team)
            .service(api_generate_zones)
            .service(api_update_zones)
            .service(api_start_group_stage)
            .service(api_start_ranking_round)
            .service(api_generate_knockout)
            .service(api_reset)
            .service(api_update_score)
    })
    .bind(bind)?
    .run()
    .await
}
