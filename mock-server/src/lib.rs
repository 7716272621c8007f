use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

const DEFAULT_PAGE_SIZE: u64 = 20;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: u64,
    pub name: String,
    pub released: Option<String>,
    pub rating: f64,
}

#[derive(Deserialize)]
pub struct CreateGame {
    pub name: String,
    #[serde(default)]
    pub released: Option<String>,
    #[serde(default)]
    pub rating: f64,
}

#[derive(Deserialize)]
pub struct UpdateGame {
    pub name: Option<String>,
    pub released: Option<String>,
    pub rating: Option<f64>,
}

/// Paginated list envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

/// What `/echo` saw of the incoming request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub query: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Default)]
pub struct Catalogue {
    games: RwLock<BTreeMap<u64, Game>>,
    next_id: AtomicU64,
}

pub type Db = Arc<Catalogue>;

/// A handful of well-known titles for seeding a demo server.
pub fn sample_games() -> Vec<Game> {
    [
        ("Grand Theft Auto V", "2013-09-17", 4.47),
        ("The Witcher 3: Wild Hunt", "2015-05-18", 4.65),
        ("Portal 2", "2011-04-18", 4.61),
        ("Counter-Strike: Global Offensive", "2012-08-21", 3.57),
        ("Tomb Raider", "2013-03-05", 4.05),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (name, released, rating))| Game {
        id: i as u64 + 1,
        name: name.to_string(),
        released: Some(released.to_string()),
        rating,
    })
    .collect()
}

pub fn app() -> Router {
    app_with(Vec::new())
}

pub fn app_with(games: Vec<Game>) -> Router {
    let next_id = games.iter().map(|g| g.id).max().unwrap_or(0) + 1;
    let db: Db = Arc::new(Catalogue {
        games: RwLock::new(games.into_iter().map(|g| (g.id, g)).collect()),
        next_id: AtomicU64::new(next_id),
    });
    Router::new()
        .route("/games", get(list_games).post(create_game))
        .route(
            "/games/{id}",
            get(get_game)
                .put(replace_game)
                .patch(update_game)
                .delete(delete_game),
        )
        .route("/echo", any(echo))
        .route("/status/{code}", any(status))
        .route("/empty", any(empty))
        .route("/slow/{millis}", any(slow))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, games: Vec<Game>) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(games)).await
}

async fn list_games(State(db): State<Db>, Query(query): Query<PageQuery>) -> Json<Page<Game>> {
    let games = db.games.read().await;
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
    let count = games.len() as u64;
    let skip = usize::try_from((page - 1).saturating_mul(page_size)).unwrap_or(usize::MAX);

    let results: Vec<Game> = games
        .values()
        .skip(skip)
        .take(page_size as usize)
        .cloned()
        .collect();
    let next = (page.saturating_mul(page_size) < count)
        .then(|| format!("/games?page={}&page_size={page_size}", page.saturating_add(1)));
    let previous =
        (page > 1).then(|| format!("/games?page={}&page_size={page_size}", page - 1));

    Json(Page {
        count,
        next,
        previous,
        results,
    })
}

async fn create_game(
    State(db): State<Db>,
    Json(input): Json<CreateGame>,
) -> (StatusCode, Json<Game>) {
    let game = Game {
        id: db.next_id.fetch_add(1, Ordering::Relaxed),
        name: input.name,
        released: input.released,
        rating: input.rating,
    };
    debug!(id = game.id, name = %game.name, "created game");
    db.games.write().await.insert(game.id, game.clone());
    (StatusCode::CREATED, Json(game))
}

async fn get_game(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Game>, StatusCode> {
    let games = db.games.read().await;
    games.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn replace_game(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<CreateGame>,
) -> Result<Json<Game>, StatusCode> {
    let mut games = db.games.write().await;
    let game = games.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    game.name = input.name;
    game.released = input.released;
    game.rating = input.rating;
    Ok(Json(game.clone()))
}

async fn update_game(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateGame>,
) -> Result<Json<Game>, StatusCode> {
    let mut games = db.games.write().await;
    let game = games.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = input.name {
        game.name = name;
    }
    if let Some(released) = input.released {
        game.released = Some(released);
    }
    if let Some(rating) = input.rating {
        game.rating = rating;
    }
    Ok(Json(game.clone()))
}

async fn delete_game(State(db): State<Db>, Path(id): Path<u64>) -> Result<StatusCode, StatusCode> {
    let mut games = db.games.write().await;
    debug!(id, "deleting game");
    games.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    let headers = headers
        .iter()
        .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
        .collect();
    Json(Echo {
        method: method.to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, Json<serde_json::Value>), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, Json(serde_json::json!({ "status": code }))))
}

async fn empty() -> StatusCode {
    StatusCode::OK
}

/// Answers after `millis`, for exercising client timeouts.
async fn slow(Path(millis): Path<u64>) -> Json<serde_json::Value> {
    tokio::time::sleep(Duration::from_millis(millis)).await;
    Json(serde_json::json!({ "slept_ms": millis }))
}
