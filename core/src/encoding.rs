//! Request body encoders: `application/x-www-form-urlencoded` and
//! `multipart/form-data`.

use url::form_urlencoded;
use uuid::Uuid;

use crate::types::Photo;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Encode `fields` as a urlencoded form body, preserving order.
pub fn encode_form(fields: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish()
}

/// A multipart/form-data body under construction.
///
/// Rendered to bytes up front so the result fits in a plain `HttpRequest`;
/// ureq's streaming multipart form can only be consumed by its own sender.
#[derive(Debug)]
pub struct Multipart {
    boundary: String,
    body: Vec<u8>,
}

impl Multipart {
    pub fn new() -> Self {
        Self::with_boundary(&format!("petfriends-{}", Uuid::new_v4().simple()))
    }

    pub fn with_boundary(boundary: &str) -> Self {
        Self {
            boundary: boundary.to_string(),
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.open_part();
        self.push_line(&format!(
            "Content-Disposition: form-data; name=\"{}\"",
            escape_quoted(name)
        ));
        self.push_line("");
        self.body.extend_from_slice(value.as_bytes());
        self.push_line("");
        self
    }

    pub fn file(mut self, name: &str, photo: &Photo) -> Self {
        self.open_part();
        self.push_line(&format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"",
            escape_quoted(name),
            escape_quoted(&photo.file_name)
        ));
        self.push_line(&format!("Content-Type: {}", photo.content_type));
        self.push_line("");
        self.body.extend_from_slice(&photo.bytes);
        self.push_line("");
        self
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Close the body and return `(content_type, bytes)`.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        let closing = format!("--{}--", self.boundary);
        self.push_line(&closing);
        (self.content_type(), self.body)
    }

    fn open_part(&mut self) {
        let delimiter = format!("--{}", self.boundary);
        self.push_line(&delimiter);
    }

    fn push_line(&mut self, line: &str) {
        self.body.extend_from_slice(line.as_bytes());
        self.body.extend_from_slice(b"\r\n");
    }
}

impl Default for Multipart {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
