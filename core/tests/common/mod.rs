//! Fixture for the acceptance suite.
//!
//! By default every fixture starts its own mock server on a random port, so
//! tests never share pets. With `PETFRIENDS_LIVE=1` the fixture targets the
//! service described by `PETFRIENDS_*` settings instead.

use std::cell::RefCell;
use std::path::PathBuf;
use std::time::Duration;

use petfriends_core::logging::init_logging;
use petfriends_core::{ApiResponse, Pet, PetForm, PetFriends, Settings};

pub const MY_PETS: &str = "my_pets";
pub const ALL_PETS: &str = "";

pub struct Fixture {
    pub pf: PetFriends,
    pub settings: Settings,
    created: RefCell<Vec<(String, String)>>,
}

impl Fixture {
    pub fn new() -> Self {
        init_logging();
        let mut settings = if std::env::var("PETFRIENDS_LIVE").is_ok_and(|v| v == "1") {
            Settings::from_env().expect("live run needs PETFRIENDS_EMAIL and PETFRIENDS_PASSWORD")
        } else {
            Settings {
                base_url: spawn_mock_server(),
                email: mock_server::DEFAULT_EMAIL.to_string(),
                password: mock_server::DEFAULT_PASSWORD.to_string(),
                images_dir: PathBuf::new(),
                timeout: Some(Duration::from_secs(10)),
            }
        };
        if std::env::var_os("PETFRIENDS_IMAGES_DIR").is_none() {
            settings.images_dir = PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../images"));
        }

        Self {
            pf: PetFriends::from_settings(&settings),
            settings,
            created: RefCell::new(Vec::new()),
        }
    }

    pub fn image(&self, file_name: &str) -> PathBuf {
        self.settings.image(file_name)
    }

    /// A fresh key for the configured account.
    pub fn auth_key(&self) -> String {
        let response = self
            .pf
            .get_api_key(&self.settings.email, &self.settings.password)
            .unwrap();
        assert_eq!(response.status, 200, "login failed: {:?}", response.body);
        response.str_field("key").unwrap().to_string()
    }

    pub fn my_pets(&self, auth_key: &str) -> Vec<Pet> {
        let response = self.pf.get_list_of_pets(auth_key, MY_PETS).unwrap();
        assert_eq!(response.status, 200, "listing my pets failed");
        response.pets().unwrap()
    }

    /// Remember a pet created by `response` so it is deleted on drop.
    pub fn track(&self, auth_key: &str, response: &ApiResponse) {
        if let Some(id) = response.str_field("id") {
            self.created
                .borrow_mut()
                .push((auth_key.to_string(), id.to_string()));
        }
    }

    /// Make sure the account owns at least one pet, creating one if needed.
    pub fn ensure_own_pet(&self, auth_key: &str) {
        if !self.my_pets(auth_key).is_empty() {
            return;
        }
        let response = self
            .pf
            .post_new_pet(
                auth_key,
                &PetForm::new("Суперкот", "кот", "3"),
                self.image("cat1.jpg"),
            )
            .unwrap();
        assert_eq!(response.status, 200, "seeding a pet failed: {:?}", response.body);
        self.track(auth_key, &response);
    }

    /// First pet owned by the account; running out of pets is a test failure.
    pub fn first_own_pet(&self, auth_key: &str) -> Pet {
        self.my_pets(auth_key)
            .into_iter()
            .next()
            .unwrap_or_else(|| panic!("There is no my pets"))
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        for (auth_key, id) in self.created.borrow_mut().drain(..) {
            if let Err(e) = self.pf.delete_pet(&auth_key, &id) {
                tracing::warn!(pet_id = %id, error = %e, "cleanup failed");
            }
        }
    }
}

/// Start the mock server on a random port and return its base URL.
fn spawn_mock_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}
