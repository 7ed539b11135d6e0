use crate::error::EtlError;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api2.openreview.net";
pub const DEFAULT_VENUE: &str = "ICLR.cc/2024/Conference";
pub const DEFAULT_REVIEWS_PER_DOC: usize = 100;

pub const ENV_USERNAME: &str = "OPENREVIEW_USERNAME";
pub const ENV_PASSWORD: &str = "OPENREVIEW_PASSWORD";

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct ETLOptions {
    pub base_url: String,
    pub venue_id: Option<String>,   // e.g. "ICLR.cc/2024/Conference"
    pub reviews_per_doc: usize,     // records per batch document, >= 1
    pub progress: bool,             // show progress bar
    pub request_timeout: Option<Duration>, // None = wait indefinitely

    // IO tuning
    pub read_buffer_bytes: usize,
    pub write_buffer_bytes: usize,

    pub pretty_json: bool,          // pretty-print the batch document array
}

impl Default for ETLOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            venue_id: None,
            reviews_per_doc: DEFAULT_REVIEWS_PER_DOC,
            progress: true,
            request_timeout: None,
            read_buffer_bytes: 64 * 1024,
            write_buffer_bytes: 64 * 1024,
            pretty_json: false,
        }
    }
}

impl ETLOptions {
    pub fn with_base_url(mut self, url: impl AsRef<str>) -> Self {
        self.base_url = url.as_ref().trim().trim_end_matches('/').to_string();
        self
    }
    pub fn with_venue(mut self, venue_id: impl AsRef<str>) -> Self {
        // Venue ids are path-like; a trailing slash would break the invitation strings.
        self.venue_id = Some(venue_id.as_ref().trim().trim_end_matches('/').to_string());
        self
    }
    pub fn with_reviews_per_doc(mut self, n: usize) -> Self {
        self.reviews_per_doc = n.max(1);
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
    pub fn with_io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self {
        self.read_buffer_bytes = read_bytes.max(8 * 1024);
        self.write_buffer_bytes = write_bytes.max(8 * 1024);
        self
    }
    pub fn with_pretty_json(mut self, yes: bool) -> Self {
        self.pretty_json = yes;
        self
    }

    pub(crate) fn require_venue(&self) -> Result<&str, EtlError> {
        self.venue_id
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| EtlError::Config("venue id is required".into()))
    }
}

/// Username/password pair for the review service.
///
/// Built once at the entry point and passed down by reference; never read from
/// ambient state inside the library.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }

    /// Read `OPENREVIEW_USERNAME` / `OPENREVIEW_PASSWORD` from the process environment.
    /// Call `dotenvy::dotenv()` beforehand if a `.env` file should be honored.
    pub fn from_env() -> Result<Self, EtlError> {
        let read = |key: &str| -> Result<String, EtlError> {
            match std::env::var(key) {
                Ok(v) if !v.trim().is_empty() => Ok(v),
                _ => Err(EtlError::Auth(format!("{key} is not set"))),
            }
        };
        Ok(Self::new(read(ENV_USERNAME)?, read(ENV_PASSWORD)?))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
