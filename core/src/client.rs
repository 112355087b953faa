//! Stateless HTTP request builder and response parser for the event API.
//!
//! # Design
//! `EventClient` holds the parsed base URL, the precomputed authorization
//! header and the debug toggle, and carries no mutable state between calls.
//! Each operation is split into a `build_*` method that validates its input
//! and produces an `HttpRequest`, and a `parse_*` method that consumes an
//! `HttpResponse`. The caller (or `EventService`) executes the round-trip.

use std::fmt;

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::PlatformConfig;
use crate::error::{require, ApiError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Event, EventGroup, EventSearch};

/// Media type the platform expects in `accept`.
pub const ACCEPT: &str = "application/vnd.moxi-platform+json;version=1";

/// Payload key that repeats `partner_event_id` for the platform's lookup.
pub const EVENT_ID_KEY: &str = "event_id";

/// Synchronous, stateless client for the event API.
#[derive(Clone)]
pub struct EventClient {
    base_url: Url,
    authorization: String,
    debug: bool,
}

impl EventClient {
    /// Fails if the base URL does not parse or credentials are missing.
    pub fn new(config: &PlatformConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| ApiError::Config(format!("invalid base url {}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "base url cannot carry a path: {}",
                config.base_url
            )));
        }
        Ok(Self {
            base_url,
            authorization: config.authorization_header()?,
            debug: config.debug,
        })
    }

    pub fn build_create_event(&self, event: &Event) -> Result<HttpRequest, ApiError> {
        validate_keys(&event.moxi_works_agent_id, &event.partner_event_id)?;
        let body = keyed_body(event)?;
        Ok(self.request(HttpMethod::Post, self.events_url(None)?, Some(body)))
    }

    pub fn build_find_event(
        &self,
        moxi_works_agent_id: &str,
        partner_event_id: &str,
    ) -> Result<HttpRequest, ApiError> {
        validate_keys(moxi_works_agent_id, partner_event_id)?;
        let url = keyed_query(
            self.events_url(Some(partner_event_id))?,
            moxi_works_agent_id,
            partner_event_id,
        );
        Ok(self.request(HttpMethod::Get, url, None))
    }

    pub fn build_search_events(&self, search: &EventSearch) -> Result<HttpRequest, ApiError> {
        require("moxi_works_agent_id", &search.moxi_works_agent_id)?;
        let date_start = search
            .date_start
            .ok_or(ApiError::Validation { field: "date_start" })?;
        let date_end = search
            .date_end
            .ok_or(ApiError::Validation { field: "date_end" })?;

        let mut url = self.events_url(None)?;
        url.query_pairs_mut()
            .append_pair("moxi_works_agent_id", &search.moxi_works_agent_id)
            .append_pair("date_start", &date_start.to_string())
            .append_pair("date_end", &date_end.to_string());
        Ok(self.request(HttpMethod::Get, url, None))
    }

    pub fn build_update_event(&self, event: &Event) -> Result<HttpRequest, ApiError> {
        validate_keys(&event.moxi_works_agent_id, &event.partner_event_id)?;
        let body = keyed_body(event)?;
        let url = self.events_url(Some(&event.partner_event_id))?;
        Ok(self.request(HttpMethod::Put, url, Some(body)))
    }

    pub fn build_delete_event(
        &self,
        moxi_works_agent_id: &str,
        partner_event_id: &str,
    ) -> Result<HttpRequest, ApiError> {
        validate_keys(moxi_works_agent_id, partner_event_id)?;
        let url = keyed_query(
            self.events_url(Some(partner_event_id))?,
            moxi_works_agent_id,
            partner_event_id,
        );
        Ok(self.request(HttpMethod::Delete, url, None))
    }

    pub fn parse_create_event(&self, response: HttpResponse) -> Result<Event, ApiError> {
        self.parse_event(response)
    }

    pub fn parse_find_event(&self, response: HttpResponse) -> Result<Event, ApiError> {
        self.parse_event(response)
    }

    pub fn parse_update_event(&self, response: HttpResponse) -> Result<Event, ApiError> {
        self.parse_event(response)
    }

    pub fn parse_search_events(&self, response: HttpResponse) -> Result<Vec<EventGroup>, ApiError> {
        self.check_response(&response)?;
        match from_body::<Value>(&response.body)? {
            Value::Array(groups) => {
                let mut flattened = Vec::with_capacity(groups.len());
                for group in groups {
                    flattened.extend(EventGroup::groups_from_value(group)?);
                }
                Ok(flattened)
            }
            other => Err(ApiError::DeserializationError(format!(
                "expected an array of date groups, got {other}"
            ))),
        }
    }

    /// `true` only when the platform reports `"status": "success"`.
    pub fn parse_delete_event(&self, response: HttpResponse) -> Result<bool, ApiError> {
        self.check_response(&response)?;
        if response.body.trim().is_empty() {
            return Ok(false);
        }
        let body: Value = from_body(&response.body)?;
        Ok(body.get("status").and_then(Value::as_str) == Some("success"))
    }

    fn parse_event(&self, response: HttpResponse) -> Result<Event, ApiError> {
        self.check_response(&response)?;
        from_body(&response.body)
    }

    fn events_url(&self, partner_event_id: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ApiError::Config(format!("base url cannot carry a path: {}", self.base_url))
            })?;
            segments.pop_if_empty().extend(["api", "events"]);
            if let Some(id) = partner_event_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    fn request(&self, method: HttpMethod, url: Url, body: Option<String>) -> HttpRequest {
        let mut headers = vec![
            ("authorization".to_string(), self.authorization.clone()),
            ("accept".to_string(), ACCEPT.to_string()),
        ];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method,
            path: url.into(),
            headers,
            body,
        }
    }

    /// Map failure bodies and non-success status codes to `ApiError`.
    fn check_response(&self, response: &HttpResponse) -> Result<(), ApiError> {
        if self.debug {
            debug!(status = response.status, body = %response.body, "raw platform response");
        }
        if let Some(message) = remote_failure(&response.body) {
            warn!(status = response.status, %message, "platform reported failure");
            return Err(ApiError::RemoteRequestFailure(message));
        }
        if (200..300).contains(&response.status) {
            return Ok(());
        }
        if response.status == 404 {
            return Err(ApiError::NotFound);
        }
        Err(ApiError::HttpError {
            status: response.status,
            body: response.body.clone(),
        })
    }
}

impl fmt::Debug for EventClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventClient")
            .field("base_url", &self.base_url.as_str())
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

fn validate_keys(moxi_works_agent_id: &str, partner_event_id: &str) -> Result<(), ApiError> {
    require("moxi_works_agent_id", moxi_works_agent_id)?;
    require("partner_event_id", partner_event_id)
}

fn keyed_body(event: &Event) -> Result<String, ApiError> {
    let mut payload = match serde_json::to_value(event) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            return Err(ApiError::SerializationError(format!(
                "event did not serialize to a JSON object: {other}"
            )))
        }
        Err(e) => return Err(ApiError::SerializationError(e.to_string())),
    };
    payload.insert(
        EVENT_ID_KEY.to_string(),
        Value::String(event.partner_event_id.clone()),
    );
    serde_json::to_string(&payload).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn keyed_query(mut url: Url, moxi_works_agent_id: &str, partner_event_id: &str) -> Url {
    url.query_pairs_mut()
        .append_pair("moxi_works_agent_id", moxi_works_agent_id)
        .append_pair("partner_event_id", partner_event_id)
        .append_pair(EVENT_ID_KEY, partner_event_id);
    url
}

fn from_body<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// The joined messages of a body reporting `"status": "fail"` or `"error"`.
fn remote_failure(body: &str) -> Option<String> {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
        return None;
    };
    if !matches!(map.get("status").and_then(Value::as_str), Some("fail" | "error")) {
        return None;
    }
    let mut messages: Vec<&str> = map
        .get("messages")
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    if messages.is_empty() {
        if let Some(message) = map.get("message").and_then(Value::as_str) {
            messages.push(message);
        }
    }
    if messages.is_empty() {
        return Some("no message reported".to_string());
    }
    Some(messages.join(", "))
}
