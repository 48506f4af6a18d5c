//! Synchronous API client for the PetFriends service.
//!
//! # Overview
//! Builds `HttpRequest` values and decodes `HttpResponse` values without
//! touching the network (host-does-IO pattern); `PetFriends` runs them
//! through a `Transport` and returns a uniform `ApiResponse` of status code
//! and body for every call.
//!
//! # Design
//! - `PetFriendsClient` is stateless: it holds only `base_url`.
//! - No status code is an error. Validation belongs to the service and
//!   shows up only as status codes and body shapes.
//! - DTOs are defined independently from the mock-server crate; the
//!   acceptance suite catches schema drift.

pub mod client;
pub mod encoding;
pub mod error;
pub mod http;
pub mod logging;
pub mod session;
pub mod settings;
pub mod transport;
pub mod types;

pub use client::PetFriendsClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::PetFriends;
pub use settings::Settings;
pub use transport::{Transport, UreqTransport};
pub use types::{ApiResponse, Pet, PetForm, Photo, ResponseBody};
