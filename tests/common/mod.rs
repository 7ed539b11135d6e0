#![allow(dead_code)]

use revetl::{
    venue_metadata_from_content, Content, Credentials, EtlError, FlatReviewRecord, ReviewService, ReviewSession,
    Submission, VenueMetadata,
};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

pub const VENUE: &str = "ICLR.cc/2024/Conference";
pub const USER: &str = "reviewer@example.org";
pub const PASSWORD: &str = "hunter2";

pub fn creds() -> Credentials {
    Credentials::new(USER, PASSWORD)
}

/// Venue group content the way the API returns it: every entry wrapped in `{"value": ..}`.
pub fn group_content(submission_name: &str, review_name: &str) -> Content {
    match json!({
        "submission_name": { "value": submission_name },
        "review_name": { "value": review_name },
        "title": { "value": "Some Conference" }
    }) {
        Value::Object(m) => m,
        _ => unreachable!(),
    }
}

/// A fully populated review reply for `venue/{sub_name}{number}/-/{review_name}`.
pub fn review_reply(venue: &str, sub_name: &str, review_name: &str, number: u64, id: &str) -> Value {
    json!({
        "id": id,
        "invitations": [
            format!("{venue}/{sub_name}{number}/-/{review_name}"),
            format!("{venue}/-/Edit")
        ],
        "tcdate": 1_698_000_000_000i64 + number as i64,
        "content": {
            "rating": { "value": 6 },
            "confidence": { "value": 4 },
            "summary": { "value": format!("summary of {id}") },
            "soundness": { "value": 3 },
            "presentation": { "value": 2 },
            "contribution": { "value": 3 },
            "strengths": { "value": "clear writing" },
            "weaknesses": { "value": "limited baselines" },
            "questions": { "value": "why this dataset?" },
            "flag_for_ethics_review": { "value": ["No ethics review needed."] },
            "code_of_conduct": { "value": "Yes" }
        }
    })
}

/// A reply that is not a review (a public comment on the same submission).
pub fn comment_reply(venue: &str, sub_name: &str, number: u64, id: &str) -> Value {
    json!({
        "id": id,
        "invitations": [format!("{venue}/{sub_name}{number}/-/Official_Comment")],
        "tcdate": 1_698_000_000_500i64,
        "content": { "comment": { "value": "thanks for the review" } }
    })
}

pub fn submission(number: u64, title: &str, replies: Vec<Value>) -> Submission {
    serde_json::from_value(json!({
        "id": format!("note{number}"),
        "number": number,
        "content": { "title": { "value": title } },
        "details": { "replies": replies }
    }))
    .unwrap()
}

/// In-memory review service. Records the invitations it was queried with.
pub struct MockService {
    pub password: String,
    pub venue: String,
    pub group: Content,
    pub submissions: Vec<Submission>,
    pub fail_listing: bool,
    pub queried: Rc<RefCell<Vec<String>>>,
}

impl MockService {
    pub fn new(venue: &str, group: Content, submissions: Vec<Submission>) -> Self {
        Self {
            password: PASSWORD.to_string(),
            venue: venue.to_string(),
            group,
            submissions,
            fail_listing: false,
            queried: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

pub struct MockSession {
    venue: String,
    group: Content,
    submissions: Vec<Submission>,
    fail_listing: bool,
    queried: Rc<RefCell<Vec<String>>>,
}

impl ReviewService for MockService {
    type Session = MockSession;

    fn authenticate(&self, creds: &Credentials) -> Result<MockSession, EtlError> {
        if creds.username != USER || creds.password != self.password {
            return Err(EtlError::Auth("invalid username or password".into()));
        }
        Ok(MockSession {
            venue: self.venue.clone(),
            group: self.group.clone(),
            submissions: self.submissions.clone(),
            fail_listing: self.fail_listing,
            queried: Rc::clone(&self.queried),
        })
    }
}

impl ReviewSession for MockSession {
    fn venue_metadata(&self, venue_id: &str) -> Result<VenueMetadata, EtlError> {
        if venue_id != self.venue {
            return Err(EtlError::RemoteQuery(format!("group {venue_id} not found")));
        }
        venue_metadata_from_content(venue_id, &self.group)
    }

    fn submissions(&self, invitation: &str) -> Result<Vec<Submission>, EtlError> {
        self.queried.borrow_mut().push(invitation.to_string());
        if self.fail_listing {
            return Err(EtlError::RemoteQuery("503 Service Unavailable".into()));
        }
        Ok(self.submissions.clone())
    }
}

/// Fully populated record with predictable values.
pub fn sample_record(paper_id: u64, review_id: &str) -> FlatReviewRecord {
    FlatReviewRecord {
        paper_id,
        paper_title: format!("Paper title {paper_id}"),
        review_id: review_id.to_string(),
        rating: "6: marginally above the acceptance threshold".into(),
        confidence: "4".into(),
        summary: format!("Summary for {review_id}."),
        soundness: "3 good".into(),
        presentation: "2 fair".into(),
        contribution: "3 good".into(),
        strengths: "Strong results.".into(),
        weaknesses: "Few ablations.".into(),
        questions: "None.".into(),
        ethics_flag: "No ethics review needed.".into(),
        code_of_conduct: "Yes".into(),
        timestamp: "1698765432000".into(),
    }
}

pub fn sample_records(n: usize) -> Vec<FlatReviewRecord> {
    (0..n).map(|i| sample_record(i as u64 + 1, &format!("rev{}", i + 1))).collect()
}

/// Read a text file into a string.
pub fn read_text(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}
