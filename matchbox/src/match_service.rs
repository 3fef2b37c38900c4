//! Match service implementation
//!
//! JSON over HTTP front for the match engine:
//! - `GET /users/{userId}/albums/{albumId}/matches`
//! - `POST /matches` with `{userId, otherUserId, albumId}`
//! - `GET /health`

use hyper::body::HttpBody;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Body, Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::engine::matchengine::{MatchBook, MatchFinder};
use crate::error::MatchError;
use crate::metrics::record_metrics;

/// Largest `POST /matches` body accepted
const MAX_BODY_BYTES: usize = 16 * 1024;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordMatchRequest {
    user_id: i64,
    other_user_id: i64,
    album_id: i64,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, PartialEq, Eq)]
enum Route {
    FindMatches { user_id: i64, album_id: i64 },
    RecordMatch,
    Health,
    BadRequest(String),
    NotFound,
}

fn route(method: &Method, path: &str) -> Route {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match (method, segments.as_slice()) {
        (&Method::GET, ["users", user, "albums", album, "matches"]) => {
            match (user.parse::<i64>(), album.parse::<i64>()) {
                (Ok(user_id), Ok(album_id)) => Route::FindMatches { user_id, album_id },
                _ => Route::BadRequest(format!("invalid ids in {}", path)),
            }
        }
        (&Method::POST, ["matches"]) => Route::RecordMatch,
        (&Method::GET, ["health"]) => Route::Health,
        _ => Route::NotFound,
    }
}

/// Match service implementation
#[derive(Clone)]
pub struct MatchServiceSVC {
    finder: MatchFinder,
    book: MatchBook,
}

impl MatchServiceSVC {
    pub fn new(finder: MatchFinder, book: MatchBook) -> Self {
        Self { finder, book }
    }

    pub async fn handle(&self, request: Request<Body>) -> Response<Body> {
        log::debug!("{} {}", request.method(), request.uri().path());
        match route(request.method(), request.uri().path()) {
            Route::FindMatches { user_id, album_id } => {
                self.find_matches(user_id, album_id).await
            }
            Route::RecordMatch => self.record_match(request).await,
            Route::Health => text_response(StatusCode::OK, "ok"),
            Route::BadRequest(message) => error_response(StatusCode::BAD_REQUEST, message),
            Route::NotFound => text_response(StatusCode::NOT_FOUND, "not found"),
        }
    }

    /// Queries potential matches
    ///
    /// An empty array means nobody to trade with; a failed search is a 503
    /// so clients never confuse the two.
    async fn find_matches(&self, user_id: i64, album_id: i64) -> Response<Body> {
        let result = record_metrics("find_potential_matches", || {
            self.finder.find_potential_matches(user_id, album_id)
        })
        .await;
        match result {
            Ok(proposals) => json_response(StatusCode::OK, &proposals),
            Err(e) => match_error_response(e),
        }
    }

    /// Records a match the user acted on
    async fn record_match(&self, request: Request<Body>) -> Response<Body> {
        let body = match read_body(request.into_body(), MAX_BODY_BYTES).await {
            Ok(body) => body,
            Err(response) => return response,
        };
        let payload: RecordMatchRequest = match serde_json::from_slice(&body) {
            Ok(payload) => payload,
            Err(e) => {
                return error_response(StatusCode::BAD_REQUEST, format!("malformed payload: {}", e))
            }
        };
        log::info!("record match {:?}", payload);

        let result = record_metrics("record_match", || {
            self.book
                .record_match(payload.user_id, payload.other_user_id, payload.album_id)
        })
        .await;
        match result {
            Ok(record) => json_response(StatusCode::CREATED, &record),
            Err(e) => match_error_response(e),
        }
    }
}

/// Collects a request body, refusing anything over `limit` bytes
async fn read_body(mut body: Body, limit: usize) -> Result<Vec<u8>, Response<Body>> {
    let too_large = || {
        error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("body exceeds {} bytes", limit),
        )
    };
    // Content-Length is known up front for most clients
    if body.size_hint().lower() > limit as u64 {
        return Err(too_large());
    }
    let mut bytes = Vec::new();
    while let Some(chunk) = body.data().await {
        let chunk = chunk.map_err(|e| {
            error_response(StatusCode::BAD_REQUEST, format!("unreadable body: {}", e))
        })?;
        if bytes.len() + chunk.len() > limit {
            return Err(too_large());
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn match_error_response(err: MatchError) -> Response<Body> {
    let status = match &err {
        MatchError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        MatchError::NotFound(_) => StatusCode::NOT_FOUND,
        MatchError::Unavailable(_) | MatchError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    if status == StatusCode::SERVICE_UNAVAILABLE {
        log::warn!("request failed: {:?}", err);
    }
    error_response(status, err.to_string())
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response<Body> {
    json_response(
        status,
        &ErrorBody {
            error: message.into(),
        },
    )
}

fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response<Body> {
    match serde_json::to_vec(value) {
        Ok(bytes) => {
            let mut response = Response::new(Body::from(bytes));
            *response.status_mut() = status;
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            response
        }
        Err(e) => {
            log::error!("failed to serialize response: {}", e);
            text_response(StatusCode::INTERNAL_SERVER_ERROR, "serialize error")
        }
    }
}

fn text_response(status: StatusCode, text: &'static str) -> Response<Body> {
    let mut response = Response::new(Body::from(text));
    *response.status_mut() = status;
    response
}
