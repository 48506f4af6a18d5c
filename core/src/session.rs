//! The PetFriends operations, executed end to end.
//!
//! # Design
//! `PetFriends` pairs the stateless `PetFriendsClient` with a `Transport`.
//! Each method is one request: build, execute, normalize. Callers get an
//! `ApiResponse` for every status the service returns; `Err` only means the
//! request could not be made at all.

use std::path::Path;

use tracing::debug;

use crate::client::PetFriendsClient;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::settings::Settings;
use crate::transport::{Transport, UreqTransport};
use crate::types::{ApiResponse, PetForm, Photo};

/// A client bound to a transport. Construct one per test fixture.
#[derive(Debug, Clone)]
pub struct PetFriends<T = UreqTransport> {
    client: PetFriendsClient,
    transport: T,
}

impl PetFriends<UreqTransport> {
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::new())
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_transport(
            &settings.base_url,
            UreqTransport::with_timeout(settings.timeout),
        )
    }
}

impl<T: Transport> PetFriends<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            client: PetFriendsClient::new(base_url),
            transport,
        }
    }

    pub fn client(&self) -> &PetFriendsClient {
        &self.client
    }

    /// 200 with a `key` field for known credentials, 403 otherwise.
    pub fn get_api_key(&self, email: &str, password: &str) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_get_api_key(email, password))
    }

    /// `filter` is `""` for every pet or `"my_pets"` for the caller's own.
    pub fn get_list_of_pets(&self, auth_key: &str, filter: &str) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_get_list_of_pets(auth_key, filter))
    }

    pub fn post_create_pet_simple(
        &self,
        auth_key: &str,
        form: &PetForm,
    ) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_create_pet_simple(auth_key, form))
    }

    /// Create a pet with a photo read from `pet_photo`. An empty path sends
    /// the form without any photo part.
    pub fn post_new_pet(
        &self,
        auth_key: &str,
        form: &PetForm,
        pet_photo: impl AsRef<Path>,
    ) -> Result<ApiResponse, ApiError> {
        let pet_photo = pet_photo.as_ref();
        let photo = if pet_photo.as_os_str().is_empty() {
            None
        } else {
            Some(Photo::from_path(pet_photo)?)
        };
        self.send(self.client.build_new_pet(auth_key, form, photo.as_ref()))
    }

    pub fn update_pet_info(
        &self,
        auth_key: &str,
        pet_id: &str,
        form: &PetForm,
    ) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_update_pet_info(auth_key, pet_id, form))
    }

    pub fn delete_pet(&self, auth_key: &str, pet_id: &str) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_delete_pet(auth_key, pet_id))
    }

    pub fn post_add_photo_of_pet(
        &self,
        auth_key: &str,
        pet_id: &str,
        pet_photo: impl AsRef<Path>,
    ) -> Result<ApiResponse, ApiError> {
        let photo = Photo::from_path(pet_photo)?;
        self.send(self.client.build_add_photo_of_pet(auth_key, pet_id, &photo))
    }

    fn send(&self, request: HttpRequest) -> Result<ApiResponse, ApiError> {
        let method = request.method;
        let path = request.path.clone();
        let response = self.transport.execute(request)?;
        debug!(method = method.as_str(), %path, status = response.status, "petfriends request");
        Ok(self.client.parse_response(response))
    }
}
