use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use warp::Filter;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::{Json, WithStatus};

use crate::game_manager::GameManager;
use crate::identity::request_meta;
use game_core::RequestMeta;
use game_types::{ErrorResponse, GameError, GuessRequest, RegisterRequest};

pub mod config;
pub mod game_manager;
pub mod identity;

const MAX_BODY_BYTES: u64 = 4 * 1024;

pub fn create_routes(
    game_manager: Arc<GameManager>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let game_manager_filter = warp::any().map({
        let game_manager = game_manager.clone();
        move || game_manager.clone()
    });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let register = warp::path!("api" / "register")
        .and(warp::post())
        .and(request_meta())
        .and(lenient_json::<RegisterRequest>())
        .and(game_manager_filter.clone())
        .and_then(handle_register);

    let me = warp::path!("api" / "me")
        .and(warp::get())
        .and(request_meta())
        .and(game_manager_filter.clone())
        .and_then(handle_me);

    let new_game = warp::path!("api" / "game" / "new")
        .and(warp::post())
        .and(request_meta())
        .and(game_manager_filter.clone())
        .and_then(handle_new_game);

    let current_game = warp::path!("api" / "game" / "current")
        .and(warp::get())
        .and(request_meta())
        .and(game_manager_filter.clone())
        .and_then(handle_current_game);

    let guess = warp::path!("api" / "game" / "guess")
        .and(warp::post())
        .and(request_meta())
        .and(lenient_json::<GuessRequest>())
        .and(game_manager_filter.clone())
        .and_then(handle_guess);

    let leaderboard = warp::path!("api" / "leaderboard")
        .and(warp::get())
        .and(game_manager_filter.clone())
        .and_then(handle_leaderboard);

    let stats = warp::path!("api" / "stats")
        .and(warp::get())
        .and(request_meta())
        .and(game_manager_filter.clone())
        .and_then(handle_stats);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST"]);

    health
        .or(register)
        .or(me)
        .or(new_game)
        .or(current_game)
        .or(guess)
        .or(leaderboard)
        .or(stats)
        .with(cors)
        .with(warp::log("wordblitz"))
}

// A missing or malformed body reads as the request type's defaults, so
// field validation reports the problem instead of a bare 400
fn lenient_json<T>() -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone
where
    T: DeserializeOwned + Default + Send + 'static,
{
    let sized = warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::bytes());

    // No content-length means no body; an oversized one still gets 413
    let missing = warp::header::optional::<u64>("content-length").and_then(
        |length: Option<u64>| async move {
            match length {
                None => Ok(Bytes::new()),
                Some(_) => Err(warp::reject::reject()),
            }
        },
    );

    sized
        .or(missing)
        .unify()
        .map(|body: Bytes| serde_json::from_slice::<T>(&body).unwrap_or_default())
}

pub fn error_status(err: &GameError) -> StatusCode {
    match err {
        GameError::InvalidInput { .. }
        | GameError::InvalidGuess { .. }
        | GameError::UnknownWord { .. } => StatusCode::BAD_REQUEST,
        GameError::Conflict => StatusCode::CONFLICT,
        GameError::Unregistered => StatusCode::UNAUTHORIZED,
        GameError::NotFound | GameError::NoActiveGame => StatusCode::NOT_FOUND,
        GameError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_reply(err: &GameError) -> WithStatus<Json> {
    // Internal details stay in the logs
    let message = if err.is_client_fault() {
        err.to_string()
    } else {
        "Internal server error".to_string()
    };
    warp::reply::with_status(
        warp::reply::json(&ErrorResponse { error: message }),
        error_status(err),
    )
}

fn reply<T: Serialize>(result: Result<T, GameError>, success: StatusCode) -> WithStatus<Json> {
    match result {
        Ok(body) => warp::reply::with_status(warp::reply::json(&body), success),
        Err(err) => error_reply(&err),
    }
}

async fn handle_register(
    meta: RequestMeta,
    request: RegisterRequest,
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = game_manager.register(&meta, &request.name).await;
    Ok(reply(result, StatusCode::CREATED))
}

async fn handle_me(
    meta: RequestMeta,
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(reply(game_manager.current_player(&meta).await, StatusCode::OK))
}

async fn handle_new_game(
    meta: RequestMeta,
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match game_manager.start_or_resume(&meta).await {
        Ok(started) => {
            let status = if started.created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            Ok(warp::reply::with_status(
                warp::reply::json(&started.response),
                status,
            ))
        }
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_current_game(
    meta: RequestMeta,
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(reply(game_manager.current_game(&meta).await, StatusCode::OK))
}

async fn handle_guess(
    meta: RequestMeta,
    request: GuessRequest,
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = game_manager.submit_guess(&meta, &request.guess).await;
    Ok(reply(result, StatusCode::OK))
}

async fn handle_leaderboard(
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(reply(game_manager.leaderboard().await, StatusCode::OK))
}

async fn handle_stats(
    meta: RequestMeta,
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(reply(game_manager.player_stats(&meta).await, StatusCode::OK))
}
