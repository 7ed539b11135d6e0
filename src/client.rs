//! Review service boundary and the OpenReview API v2 client behind it.
//!
//! The fetcher only talks to `ReviewService` / `ReviewSession`, so any backend
//! (including an in-memory one in tests) can stand in for the HTTP client.

use crate::config::Credentials;
use crate::error::EtlError;
use crate::extract::content_value;
use crate::model::{Content, Submission, VenueMetadata};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Notes requested per page when listing submissions.
pub const PAGE_SIZE: usize = 1000;

/// Entry point to a review service: exchanges credentials for a session.
pub trait ReviewService {
    type Session: ReviewSession;

    fn authenticate(&self, creds: &Credentials) -> Result<Self::Session, EtlError>;
}

/// Authenticated capability handle.
pub trait ReviewSession {
    /// Submission and review names configured on the venue group.
    fn venue_metadata(&self, venue_id: &str) -> Result<VenueMetadata, EtlError>;

    /// Every submission posted under `invitation`, replies inline, in service order.
    fn submissions(&self, invitation: &str) -> Result<Vec<Submission>, EtlError>;
}

#[derive(Clone, Debug)]
pub struct OpenReviewClient {
    http: Client,
    base_url: String,
}

#[derive(Clone, Debug)]
pub struct OpenReviewSession {
    http: Client,
    base_url: String,
    token: String,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Deserialize)]
struct GroupsPage {
    #[serde(default)]
    groups: Vec<Group>,
}

#[derive(Deserialize)]
struct Group {
    id: String,
    #[serde(default)]
    content: Content,
}

#[derive(Deserialize)]
struct NotesPage {
    #[serde(default)]
    notes: Vec<Submission>,
    #[serde(default)]
    count: Option<usize>,
}

impl OpenReviewClient {
    /// Client without any request timeout: a slow page is waited for, not aborted.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, EtlError> {
        Self::with_timeout(base_url, None)
    }

    /// Client whose requests (including body reads) give up after `timeout`.
    pub fn with_timeout(base_url: impl AsRef<str>, timeout: Option<Duration>) -> Result<Self, EtlError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EtlError::Config(format!("build http client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
        })
    }
}

impl ReviewService for OpenReviewClient {
    type Session = OpenReviewSession;

    fn authenticate(&self, creds: &Credentials) -> Result<OpenReviewSession, EtlError> {
        let url = format!("{}/login", self.base_url);
        tracing::debug!("logging in to {} as {}", self.base_url, creds.username);

        let resp = self
            .http
            .post(&url)
            .json(&json!({ "id": creds.username, "password": creds.password }))
            .send()
            .map_err(|e| EtlError::Auth(format!("login request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(EtlError::Auth(format!("server returned {}: {}", status.as_u16(), body)));
        }
        let login: LoginResponse = resp
            .json()
            .map_err(|e| EtlError::Auth(format!("malformed login response: {e}")))?;

        Ok(OpenReviewSession {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token: login.token,
        })
    }
}

impl OpenReviewSession {
    fn get(&self, path: &str) -> RequestBuilder {
        self.http
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
    }
}

fn send_json<T: DeserializeOwned>(req: RequestBuilder, what: &str) -> Result<T, EtlError> {
    let resp = req
        .send()
        .map_err(|e| EtlError::RemoteQuery(format!("{what}: {e}")))?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        return Err(EtlError::RemoteQuery(format!(
            "{what}: server returned {}: {}",
            status.as_u16(),
            body
        )));
    }
    resp.json()
        .map_err(|e| EtlError::RemoteQuery(format!("{what}: malformed response: {e}")))
}

/// Pull submission/review names out of a venue group's content.
pub fn venue_metadata_from_content(venue_id: &str, content: &Content) -> Result<VenueMetadata, EtlError> {
    let name = |key: &str| {
        content_value(content, key)
            .ok_or_else(|| EtlError::RemoteQuery(format!("venue {venue_id} has no {key} configured")))
    };
    Ok(VenueMetadata {
        submission_name: name("submission_name")?,
        review_name: name("review_name")?,
    })
}

impl ReviewSession for OpenReviewSession {
    fn venue_metadata(&self, venue_id: &str) -> Result<VenueMetadata, EtlError> {
        let page: GroupsPage = send_json(self.get("/groups").query(&[("id", venue_id)]), "get venue group")?;
        let group = page
            .groups
            .into_iter()
            .find(|g| g.id == venue_id)
            .ok_or_else(|| EtlError::RemoteQuery(format!("venue group {venue_id} not found")))?;
        venue_metadata_from_content(venue_id, &group.content)
    }

    fn submissions(&self, invitation: &str) -> Result<Vec<Submission>, EtlError> {
        let mut all = Vec::new();
        let mut offset = 0usize;
        loop {
            let req = self
                .get("/notes")
                .query(&[("invitation", invitation), ("details", "replies")])
                .query(&[("offset", offset), ("limit", PAGE_SIZE)]);
            let page: NotesPage = send_json(req, "list submissions")?;
            let got = page.notes.len();
            all.extend(page.notes);
            offset += got;
            tracing::debug!("fetched {} notes for {} (offset {})", got, invitation, offset);

            let done = match page.count {
                Some(total) => offset >= total || got == 0,
                None => got < PAGE_SIZE,
            };
            if done {
                break;
            }
        }
        Ok(all)
    }
}
