//! Domain DTOs for the event API.
//!
//! # Design
//! `Event` enumerates every field the platform recognizes. The two keys are
//! plain `String`s so a record built from a response always has them, while
//! everything else is optional and omitted from outgoing payloads when unset.
//! Required-ness is enforced per operation by `EventClient`, not by the type.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// A calendar entry owned by an agent, keyed by the partner's own id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Event {
    #[serde(deserialize_with = "null_as_empty")]
    pub moxi_works_agent_id: String,
    #[serde(deserialize_with = "null_as_empty")]
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
    /// Unix timestamp, seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_start: Option<i64>,
    /// Unix timestamp, seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_end: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
}

impl Event {
    pub fn new(moxi_works_agent_id: &str, partner_event_id: &str) -> Self {
        Self {
            moxi_works_agent_id: moxi_works_agent_id.to_string(),
            partner_event_id: partner_event_id.to_string(),
            ..Self::default()
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Query for events of one agent within a date range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventSearch {
    pub moxi_works_agent_id: String,
    /// Unix timestamp, seconds.
    pub date_start: Option<i64>,
    /// Unix timestamp, seconds.
    pub date_end: Option<i64>,
}

impl EventSearch {
    pub fn new(moxi_works_agent_id: &str, date_start: i64, date_end: i64) -> Self {
        Self {
            moxi_works_agent_id: moxi_works_agent_id.to_string(),
            date_start: Some(date_start),
            date_end: Some(date_end),
        }
    }
}

/// Events the platform recorded for a single calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventGroup {
    /// Date label exactly as reported, e.g. `"01/01/20"`.
    pub date: String,
    pub events: Vec<Event>,
}

impl EventGroup {
    /// Decode one element of a search response into its date groups.
    ///
    /// `{"date": "<date>", "events": [..]}` yields one group. Otherwise every
    /// key of the object is a date label, `{"<date>": [..], ..}`, and yields a
    /// group of its own in the order reported. Null, non-object and
    /// empty-object entries in an event list are dropped.
    pub(crate) fn groups_from_value(value: Value) -> Result<Vec<Self>, ApiError> {
        let Value::Object(map) = value else {
            return Err(ApiError::DeserializationError(
                "search group is not a JSON object".to_string(),
            ));
        };

        if map.len() == 2 {
            if let (Some(Value::String(date)), Some(events)) = (map.get("date"), map.get("events"))
            {
                return Ok(vec![Self::decode(date.clone(), events.clone())?]);
            }
        }

        if map.is_empty() {
            return Err(ApiError::DeserializationError(
                "search group has no date".to_string(),
            ));
        }
        map.into_iter()
            .map(|(date, events)| Self::decode(date, events))
            .collect()
    }

    fn decode(date: String, events: Value) -> Result<Self, ApiError> {
        let entries = match events {
            Value::Array(entries) => entries,
            Value::Null => Vec::new(),
            other => {
                return Err(ApiError::DeserializationError(format!(
                    "events for {date} is not an array: {other}"
                )))
            }
        };

        let events = entries
            .into_iter()
            .filter(|entry| matches!(entry, Value::Object(fields) if !fields.is_empty()))
            .map(|entry| {
                serde_json::from_value(entry)
                    .map_err(|e| ApiError::DeserializationError(e.to_string()))
            })
            .collect::<Result<Vec<Event>, _>>()?;

        Ok(Self { date, events })
    }
}
