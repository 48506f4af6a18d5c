//! In-memory stand-in for the PetFriends REST service.
//!
//! Mirrors the public endpoints closely enough for the client's acceptance
//! suite: header-based auth, urlencoded and multipart pet creation, updates,
//! deletes and photo uploads, with the service's status codes.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Form, Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const DEFAULT_EMAIL: &str = "tester@petfriends.test";
pub const DEFAULT_PASSWORD: &str = "qwerty123";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    pub age: String,
    pub pet_photo: String,
    pub user_id: String,
    pub created_at: String,
}

/// A registered user. The key is fixed at registration, like the real
/// service which hands out the same key on every login.
#[derive(Clone, Debug)]
pub struct Account {
    pub email: String,
    pub password: String,
    user_id: String,
    key: String,
}

impl Account {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            user_id: Uuid::new_v4().simple().to_string(),
            key: format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[derive(Debug, Default)]
pub struct Store {
    accounts: Vec<Account>,
    /// Newest first.
    pets: Vec<Pet>,
}

impl Store {
    fn authorize(&self, headers: &HeaderMap) -> Result<&Account, Rejection> {
        let key = header(headers, "auth_key").ok_or_else(forbidden)?;
        self.accounts
            .iter()
            .find(|a| a.key == key)
            .ok_or_else(forbidden)
    }

    fn owned_pet_mut(&mut self, user_id: &str, pet_id: &str) -> Result<&mut Pet, Rejection> {
        self.pets
            .iter_mut()
            .find(|p| p.id == pet_id && p.user_id == user_id)
            .ok_or_else(|| pet_not_found(pet_id))
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Failure response: a status code with a plain-text explanation.
#[derive(Debug, PartialEq, Eq)]
pub struct Rejection(pub StatusCode, pub String);

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

fn forbidden() -> Rejection {
    Rejection(
        StatusCode::FORBIDDEN,
        "This user wasn't found in database".to_string(),
    )
}

fn bad_request(message: impl Into<String>) -> Rejection {
    Rejection(StatusCode::BAD_REQUEST, message.into())
}

fn pet_not_found(pet_id: &str) -> Rejection {
    Rejection(
        StatusCode::NOT_FOUND,
        format!("Pet with id {pet_id} wasn't found"),
    )
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    std::str::from_utf8(headers.get(name)?.as_bytes()).ok()
}

/// Photos are stored inline, so uploads may be far larger than axum's 2 MB default.
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

pub fn app() -> Router {
    app_with_accounts(vec![Account::new(DEFAULT_EMAIL, DEFAULT_PASSWORD)])
}

pub fn app_with_accounts(accounts: Vec<Account>) -> Router {
    let db: Db = Arc::new(RwLock::new(Store {
        accounts,
        pets: Vec::new(),
    }));
    Router::new()
        .route("/api/key", get(get_api_key))
        .route("/api/pets", get(list_pets).post(create_pet))
        .route("/api/create_pet_simple", post(create_pet_simple))
        .route("/api/pets/{id}", put(update_pet).delete(delete_pet))
        .route("/api/pets/set_photo/{id}", post(set_photo))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// --- validation ---

/// Pet fields accepted from a form, each already validated.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PetChanges {
    pub name: Option<String>,
    pub animal_type: Option<String>,
    pub age: Option<String>,
}

/// Validate submitted pet fields. Unknown fields are rejected; with
/// `require_all` every one of name, animal_type and age must be present.
pub fn validate_pet_fields(
    fields: &[(String, String)],
    require_all: bool,
) -> Result<PetChanges, Rejection> {
    let mut changes = PetChanges::default();
    for (key, value) in fields {
        match key.as_str() {
            "name" => changes.name = Some(validate_label("name", value)?),
            "animal_type" => changes.animal_type = Some(validate_label("animal_type", value)?),
            "age" => changes.age = Some(validate_age(value)?),
            other => return Err(bad_request(format!("Unexpected field: {other}"))),
        }
    }
    if require_all {
        let missing: Vec<&str> = [
            ("name", changes.name.is_none()),
            ("animal_type", changes.animal_type.is_none()),
            ("age", changes.age.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, absent)| absent.then_some(field))
        .collect();
        if !missing.is_empty() {
            return Err(bad_request(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }
    }
    Ok(changes)
}

fn validate_label(field: &str, value: &str) -> Result<String, Rejection> {
    let value = value.trim();
    if value.is_empty() {
        return Err(bad_request(format!("{field} must not be empty")));
    }
    if value.chars().all(|c| c.is_ascii_digit()) {
        return Err(bad_request(format!("{field} must be text, got {value}")));
    }
    Ok(value.to_string())
}

fn validate_age(value: &str) -> Result<String, Rejection> {
    value
        .trim()
        .parse::<u32>()
        .map(|age| age.to_string())
        .map_err(|_| bad_request(format!("age must be a number, got {value}")))
}

/// Encode PNG or JPEG bytes as a `data:` URL; anything else is rejected.
pub fn photo_data_url(bytes: &[u8]) -> Result<String, Rejection> {
    let mime = if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else {
        return Err(bad_request("pet_photo must be a PNG or JPEG image"));
    };
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

#[derive(Debug, Default)]
struct Upload {
    fields: Vec<(String, String)>,
    photo: Option<Vec<u8>>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, Rejection> {
    let mut upload = Upload::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "pet_photo" {
            let bytes = field.bytes().await.map_err(|e| bad_request(e.body_text()))?;
            upload.photo = Some(bytes.to_vec());
        } else {
            let text = field.text().await.map_err(|e| bad_request(e.body_text()))?;
            upload.fields.push((name, text));
        }
    }
    Ok(upload)
}

fn new_pet(user_id: &str, changes: PetChanges, pet_photo: String) -> Pet {
    Pet {
        id: Uuid::new_v4().to_string(),
        name: changes.name.unwrap_or_default(),
        animal_type: changes.animal_type.unwrap_or_default(),
        age: changes.age.unwrap_or_default(),
        pet_photo,
        user_id: user_id.to_string(),
        created_at: chrono::Utc::now().timestamp().to_string(),
    }
}

// --- handlers ---

async fn get_api_key(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Value>, Rejection> {
    let email = header(&headers, "email");
    let password = header(&headers, "password");
    let store = db.read().await;
    let account = store
        .accounts
        .iter()
        .find(|a| Some(a.email.as_str()) == email && Some(a.password.as_str()) == password)
        .ok_or_else(|| {
            debug!(email = email.unwrap_or_default(), "login rejected");
            forbidden()
        })?;
    Ok(Json(json!({ "key": account.key })))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub filter: String,
}

async fn list_pets(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, Rejection> {
    let store = db.read().await;
    let account = store.authorize(&headers)?;
    let pets: Vec<&Pet> = match query.filter.as_str() {
        "" => store.pets.iter().collect(),
        "my_pets" => store
            .pets
            .iter()
            .filter(|p| p.user_id == account.user_id)
            .collect(),
        other => return Err(bad_request(format!("Filter value is incorrect: {other}"))),
    };
    Ok(Json(json!({ "pets": pets })))
}

async fn create_pet_simple(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Json<Pet>, Rejection> {
    let mut store = db.write().await;
    let user_id = store.authorize(&headers)?.user_id.clone();
    let changes = validate_pet_fields(&fields, true)?;
    let pet = new_pet(&user_id, changes, String::new());
    info!(pet_id = %pet.id, "pet created");
    store.pets.insert(0, pet.clone());
    Ok(Json(pet))
}

async fn create_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<Pet>, Rejection> {
    let user_id = db.read().await.authorize(&headers)?.user_id.clone();
    let upload = read_upload(multipart).await?;
    let changes = validate_pet_fields(&upload.fields, true)?;
    let photo = upload
        .photo
        .ok_or_else(|| bad_request("pet_photo is required"))?;
    let pet = new_pet(&user_id, changes, photo_data_url(&photo)?);
    info!(pet_id = %pet.id, "pet created with photo");
    db.write().await.pets.insert(0, pet.clone());
    Ok(Json(pet))
}

async fn update_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Json<Pet>, Rejection> {
    let mut store = db.write().await;
    let user_id = store.authorize(&headers)?.user_id.clone();
    let changes = validate_pet_fields(&fields, false)?;
    let pet = store.owned_pet_mut(&user_id, &id)?;
    if let Some(name) = changes.name {
        pet.name = name;
    }
    if let Some(animal_type) = changes.animal_type {
        pet.animal_type = animal_type;
    }
    if let Some(age) = changes.age {
        pet.age = age;
    }
    info!(pet_id = %id, "pet updated");
    Ok(Json(pet.clone()))
}

async fn delete_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, Rejection> {
    let mut store = db.write().await;
    let user_id = store.authorize(&headers)?.user_id.clone();
    let index = store
        .pets
        .iter()
        .position(|p| p.id == id && p.user_id == user_id)
        .ok_or_else(|| pet_not_found(&id))?;
    store.pets.remove(index);
    info!(pet_id = %id, "pet deleted");
    Ok(StatusCode::OK)
}

async fn set_photo(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Pet>, Rejection> {
    let user_id = db.read().await.authorize(&headers)?.user_id.clone();
    let upload = read_upload(multipart).await?;
    if let Some((name, _)) = upload.fields.first() {
        return Err(bad_request(format!("Unexpected field: {name}")));
    }
    let photo = upload
        .photo
        .ok_or_else(|| bad_request("pet_photo is required"))?;
    let data_url = photo_data_url(&photo)?;
    let mut store = db.write().await;
    let pet = store.owned_pet_mut(&user_id, &id)?;
    pet.pet_photo = data_url;
    info!(pet_id = %id, "pet photo replaced");
    Ok(Json(pet.clone()))
}
