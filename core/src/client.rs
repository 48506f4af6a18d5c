//! Stateless HTTP request builder and response parser for the PetFriends API.
//!
//! # Design
//! `PetFriendsClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation has a `build_*` method that produces an
//! `HttpRequest`; every response goes through the single `parse_response`
//! because the service contract is the same for all endpoints: a status code
//! and a body, with no status treated as an error.

use url::form_urlencoded;

use crate::encoding::{encode_form, Multipart, FORM_CONTENT_TYPE};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ApiResponse, PetForm, Photo, ResponseBody};

/// Synchronous, stateless client for the PetFriends API.
#[derive(Debug, Clone)]
pub struct PetFriendsClient {
    base_url: String,
}

impl PetFriendsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_get_api_key(&self, email: &str, password: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/api/key", self.base_url),
            headers: vec![
                ("email".to_string(), email.to_string()),
                ("password".to_string(), password.to_string()),
            ],
            body: None,
        }
    }

    pub fn build_get_list_of_pets(&self, auth_key: &str, filter: &str) -> HttpRequest {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("filter", filter)
            .finish();
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/api/pets?{query}", self.base_url),
            headers: vec![auth_header(auth_key)],
            body: None,
        }
    }

    pub fn build_create_pet_simple(&self, auth_key: &str, form: &PetForm) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/api/create_pet_simple", self.base_url),
            headers: vec![auth_header(auth_key), content_type(FORM_CONTENT_TYPE)],
            body: Some(encode_form(form.fields()).into_bytes()),
        }
    }

    /// Build a multipart create request. `None` leaves out the `pet_photo`
    /// part entirely.
    pub fn build_new_pet(
        &self,
        auth_key: &str,
        form: &PetForm,
        pet_photo: Option<&Photo>,
    ) -> HttpRequest {
        let mut multipart = Multipart::new();
        for (name, value) in form.fields() {
            multipart = multipart.text(name, value);
        }
        if let Some(photo) = pet_photo {
            multipart = multipart.file("pet_photo", photo);
        }
        let (mime, body) = multipart.finish();
        HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/api/pets", self.base_url),
            headers: vec![auth_header(auth_key), content_type(&mime)],
            body: Some(body),
        }
    }

    pub fn build_update_pet_info(
        &self,
        auth_key: &str,
        pet_id: &str,
        form: &PetForm,
    ) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Put,
            path: format!("{}/api/pets/{pet_id}", self.base_url),
            headers: vec![auth_header(auth_key), content_type(FORM_CONTENT_TYPE)],
            body: Some(encode_form(form.fields()).into_bytes()),
        }
    }

    pub fn build_delete_pet(&self, auth_key: &str, pet_id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/api/pets/{pet_id}", self.base_url),
            headers: vec![auth_header(auth_key)],
            body: None,
        }
    }

    pub fn build_add_photo_of_pet(
        &self,
        auth_key: &str,
        pet_id: &str,
        pet_photo: &Photo,
    ) -> HttpRequest {
        let (mime, body) = Multipart::new().file("pet_photo", pet_photo).finish();
        HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/api/pets/set_photo/{pet_id}", self.base_url),
            headers: vec![auth_header(auth_key), content_type(&mime)],
            body: Some(body),
        }
    }

    /// Normalize any response into `(status, body)`.
    ///
    /// Bodies that decode as JSON become `ResponseBody::Json`; anything else,
    /// including an empty body, is kept verbatim as `ResponseBody::Text`.
    pub fn parse_response(&self, response: HttpResponse) -> ApiResponse {
        let body = match serde_json::from_str(&response.body) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(response.body),
        };
        ApiResponse {
            status: response.status,
            body,
        }
    }
}

fn auth_header(auth_key: &str) -> (String, String) {
    ("auth_key".to_string(), auth_key.to_string())
}

fn content_type(value: &str) -> (String, String) {
    ("content-type".to_string(), value.to_string())
}
