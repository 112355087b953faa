//! Blocking facade that runs each `EventClient` operation through a transport.
//!
//! Every call is build, execute, parse. Validation lives in the build step,
//! so a request with a missing key never reaches the transport.

use crate::client::EventClient;
use crate::config::{self, PlatformConfig};
use crate::error::ApiError;
use crate::http::{Transport, UreqTransport};
use crate::types::{Event, EventGroup, EventSearch};

#[derive(Debug, Clone)]
pub struct EventService<T> {
    client: EventClient,
    transport: T,
}

impl EventService<UreqTransport> {
    pub fn from_config(config: &PlatformConfig) -> Result<Self, ApiError> {
        Ok(Self::new(EventClient::new(config)?, UreqTransport::new()))
    }

    /// Uses the process-wide configuration, see `config::default_config`.
    pub fn from_default_config() -> Result<Self, ApiError> {
        Self::from_config(config::default_config()?)
    }
}

impl<T: Transport> EventService<T> {
    pub fn new(client: EventClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &EventClient {
        &self.client
    }

    pub fn create(&self, event: &Event) -> Result<Event, ApiError> {
        let request = self.client.build_create_event(event)?;
        self.client.parse_create_event(self.transport.execute(request)?)
    }

    pub fn find(
        &self,
        moxi_works_agent_id: &str,
        partner_event_id: &str,
    ) -> Result<Event, ApiError> {
        let request = self.client.build_find_event(moxi_works_agent_id, partner_event_id)?;
        self.client.parse_find_event(self.transport.execute(request)?)
    }

    pub fn search(&self, search: &EventSearch) -> Result<Vec<EventGroup>, ApiError> {
        let request = self.client.build_search_events(search)?;
        self.client.parse_search_events(self.transport.execute(request)?)
    }

    pub fn update(&self, event: &Event) -> Result<Event, ApiError> {
        let request = self.client.build_update_event(event)?;
        self.client.parse_update_event(self.transport.execute(request)?)
    }

    pub fn delete(
        &self,
        moxi_works_agent_id: &str,
        partner_event_id: &str,
    ) -> Result<bool, ApiError> {
        let request = self.client.build_delete_event(moxi_works_agent_id, partner_event_id)?;
        self.client.parse_delete_event(self.transport.execute(request)?)
    }
}

impl Event {
    /// Push this record's current fields to the platform via `update`.
    pub fn save<T: Transport>(&self, service: &EventService<T>) -> Result<Event, ApiError> {
        service.update(self)
    }

    /// Remove this record from the platform via `delete`.
    pub fn delete<T: Transport>(&self, service: &EventService<T>) -> Result<bool, ApiError> {
        service.delete(&self.moxi_works_agent_id, &self.partner_event_id)
    }
}
