//! Synchronous client for the MoxiWorks platform event API.
//!
//! # Overview
//! `EventClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network (host-does-IO pattern).
//! `EventService` pairs it with a `Transport` to run create, find, search,
//! update and delete against the platform.
//!
//! # Design
//! - `EventClient` is stateless: base URL, authorization header, debug flag.
//! - Required keys are checked in `build_*`, before any request exists.
//! - Platform configuration is an explicit `PlatformConfig`; a process-wide
//!   default is available through `config::set_default` / `default_config`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod service;
pub mod types;

pub use client::EventClient;
pub use config::PlatformConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use service::EventService;
pub use types::{Event, EventGroup, EventSearch};
