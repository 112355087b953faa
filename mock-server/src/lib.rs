use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    pub moxi_works_agent_id: String,
    pub partner_event_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_reminder: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remind_minutes_before: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_meeting: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_end: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
}

#[derive(Deserialize)]
pub struct AgentQuery {
    pub moxi_works_agent_id: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub moxi_works_agent_id: Option<String>,
    pub date_start: Option<i64>,
    pub date_end: Option<i64>,
}

/// Events keyed by `(moxi_works_agent_id, partner_event_id)`.
pub type Db = Arc<RwLock<HashMap<(String, String), Event>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/api/events", get(search_events).post(create_event))
        .route(
            "/api/events/{partner_event_id}",
            get(find_event).put(update_event).delete(delete_event),
        )
        .layer(middleware::from_fn(require_authorization))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_authorization(request: Request, next: Next) -> Result<Response, StatusCode> {
    if !request.headers().contains_key(header::AUTHORIZATION) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(request).await)
}

/// Failure body in the platform's shape.
fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "status": "fail", "messages": [message] }))).into_response()
}

/// Search group label, `MM/DD/YY`.
pub fn day_label(day: NaiveDate) -> String {
    day.format("%m/%d/%y").to_string()
}

fn agent_id(query: AgentQuery) -> Result<String, Response> {
    match query.moxi_works_agent_id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            "moxi_works_agent_id is required",
        )),
    }
}

async fn create_event(State(db): State<Db>, Json(event): Json<Event>) -> Response {
    if event.moxi_works_agent_id.is_empty() || event.partner_event_id.is_empty() {
        return failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            "moxi_works_agent_id and partner_event_id are required",
        );
    }
    let key = (
        event.moxi_works_agent_id.clone(),
        event.partner_event_id.clone(),
    );
    let mut events = db.write().await;
    if events.contains_key(&key) {
        return failure(StatusCode::UNPROCESSABLE_ENTITY, "partner_event_id already exists");
    }
    debug!(agent = %key.0, event = %key.1, "created event");
    events.insert(key, event.clone());
    (StatusCode::OK, Json(event)).into_response()
}

async fn find_event(
    State(db): State<Db>,
    Path(partner_event_id): Path<String>,
    Query(query): Query<AgentQuery>,
) -> Response {
    let agent = match agent_id(query) {
        Ok(agent) => agent,
        Err(response) => return response,
    };
    let events = db.read().await;
    match events.get(&(agent, partner_event_id)) {
        Some(event) => Json(event.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn search_events(State(db): State<Db>, Query(query): Query<SearchQuery>) -> Response {
    let agent = query.moxi_works_agent_id.filter(|id| !id.is_empty());
    let (Some(agent), Some(start), Some(end)) = (agent, query.date_start, query.date_end) else {
        return failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            "moxi_works_agent_id, date_start and date_end are required",
        );
    };

    let events = db.read().await;
    let mut days: BTreeMap<NaiveDate, Vec<Event>> = BTreeMap::new();
    for event in events.values().filter(|e| e.moxi_works_agent_id == agent) {
        let Some(at) = event.event_start.filter(|at| (start..=end).contains(at)) else {
            continue;
        };
        if let Some(moment) = DateTime::from_timestamp(at, 0) {
            days.entry(moment.date_naive()).or_default().push(event.clone());
        }
    }

    let groups: Vec<Value> = days
        .into_iter()
        .map(|(day, mut events)| {
            events.sort_by(|a, b| {
                (a.event_start, &a.partner_event_id).cmp(&(b.event_start, &b.partner_event_id))
            });
            let mut group = Map::new();
            group.insert(day_label(day), json!(events));
            Value::Object(group)
        })
        .collect();
    Json(groups).into_response()
}

async fn update_event(
    State(db): State<Db>,
    Path(partner_event_id): Path<String>,
    Json(mut event): Json<Event>,
) -> Response {
    if event.moxi_works_agent_id.is_empty() {
        return failure(StatusCode::UNPROCESSABLE_ENTITY, "moxi_works_agent_id is required");
    }
    event.partner_event_id = partner_event_id;
    let key = (
        event.moxi_works_agent_id.clone(),
        event.partner_event_id.clone(),
    );
    let mut events = db.write().await;
    match events.get_mut(&key) {
        Some(stored) => {
            *stored = event.clone();
            Json(event).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_event(
    State(db): State<Db>,
    Path(partner_event_id): Path<String>,
    Query(query): Query<AgentQuery>,
) -> Response {
    let agent = match agent_id(query) {
        Ok(agent) => agent,
        Err(response) => return response,
    };
    let mut events = db.write().await;
    match events.remove(&(agent, partner_event_id)) {
        Some(_) => Json(json!({ "status": "success" })).into_response(),
        None => Json(json!({ "status": "error", "messages": ["no such event"] })).into_response(),
    }
}
