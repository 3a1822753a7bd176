#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

/// Stand-in for the remote mood API, served from its own thread so it
/// outlives any single test's runtime.
pub struct FakeApi {
    pub base_url: String,
    pub auth_headers: Arc<Mutex<Vec<String>>>,
    pub writes: Arc<Mutex<Vec<Value>>>,
}

#[derive(Clone)]
struct FakeState {
    moods: Arc<Vec<Value>>,
    auth_headers: Arc<Mutex<Vec<String>>>,
    writes: Arc<Mutex<Vec<Value>>>,
}

pub fn mood(id: &str, rating: i64, date: &str, tags: &[&str]) -> Value {
    let tags: Vec<Value> = tags
        .iter()
        .map(|tag| json!({ "id": tag, "name": tag, "icon": "heart" }))
        .collect();
    json!({
        "id": id,
        "rating": rating,
        "tags": tags,
        "date": date,
        "createdAt": date,
        "userId": "u1"
    })
}

pub fn spawn_fake_api(moods: Vec<Value>) -> FakeApi {
    let auth_headers = Arc::new(Mutex::new(Vec::new()));
    let writes = Arc::new(Mutex::new(Vec::new()));
    let state = FakeState {
        moods: Arc::new(moods),
        auth_headers: Arc::clone(&auth_headers),
        writes: Arc::clone(&writes),
    };

    let port = serve_on_thread(fake_router(state));
    FakeApi {
        base_url: format!("http://127.0.0.1:{port}/api"),
        auth_headers,
        writes,
    }
}

/// An upstream that answers every request with `status` and an HTML body.
pub fn spawn_failing_api(status: StatusCode, body: &'static str) -> String {
    let router = Router::new().fallback(move || async move {
        (status, [("content-type", "text/html")], body)
    });
    format!("http://127.0.0.1:{}/api", serve_on_thread(router))
}

fn serve_on_thread(router: Router) -> u16 {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("fake api runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind fake api");
            let port = listener.local_addr().expect("fake api addr").port();
            tx.send(port).expect("report fake api port");
            axum::serve(listener, router).await.expect("serve fake api");
        });
    });
    rx.recv().expect("fake api did not start")
}

fn fake_router(state: FakeState) -> Router {
    Router::new()
        .route("/api/moods", get(list_moods).post(create_mood))
        .route(
            "/api/moods/:id",
            get(get_mood).put(update_mood).delete(delete_mood),
        )
        .route("/api/tags", get(list_tags))
        .route("/api/auth/login", post(login))
        .with_state(state)
}

fn record_auth(state: &FakeState, headers: &HeaderMap) {
    let value = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    state.auth_headers.lock().unwrap().push(value);
}

fn find(state: &FakeState, id: &str) -> Option<Value> {
    state.moods.iter().find(|mood| mood["id"] == id).cloned()
}

fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Mood not found" })))
}

async fn list_moods(State(state): State<FakeState>, headers: HeaderMap) -> Json<Value> {
    record_auth(&state, &headers);
    Json(Value::Array(state.moods.to_vec()))
}

async fn get_mood(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    record_auth(&state, &headers);
    find(&state, &id).map(Json).ok_or_else(not_found)
}

async fn create_mood(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    record_auth(&state, &headers);
    if body.get("rating").and_then(Value::as_i64).is_none_or(|rating| rating > 5) {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message": "rating must be 1-5" })),
        ));
    }
    state.writes.lock().unwrap().push(body.clone());
    let created = json!({
        "id": "created-1",
        "rating": body["rating"],
        "tags": [],
        "date": body["date"],
        "createdAt": body["date"],
    });
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_mood(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    record_auth(&state, &headers);
    let mut existing = find(&state, &id).ok_or_else(not_found)?;
    state.writes.lock().unwrap().push(body.clone());
    existing["rating"] = body["rating"].clone();
    existing["date"] = body["date"].clone();
    Ok(Json(existing))
}

async fn delete_mood(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    record_auth(&state, &headers);
    find(&state, &id).ok_or_else(not_found)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_tags(State(state): State<FakeState>, headers: HeaderMap) -> Json<Value> {
    record_auth(&state, &headers);
    Json(json!([
        {
            "id": "g1",
            "groupName": "Life",
            "tags": [
                { "id": "work", "name": "Work", "icon": "briefcase" },
                { "id": "family", "name": "Family", "icon": "home" }
            ]
        }
    ]))
}

async fn login(Json(body): Json<Value>) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if body["password"] != "hunter2" {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "invalid credentials" })),
        ));
    }
    Ok(Json(json!({
        "token": "tok-from-login",
        "user": { "id": "u1", "name": "Ana", "email": body["email"] }
    })))
}
