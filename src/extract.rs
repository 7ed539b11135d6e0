//! Field extraction over note content and the review classification filter.

use crate::model::{Content, FlatReviewRecord, Reply, Review, Submission, VenueMetadata};
use serde_json::Value;

/// Render a JSON value as review text. `null` counts as absent.
pub fn value_text(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => Some(items.iter().filter_map(value_text).collect::<Vec<_>>().join(", ")),
        Value::Object(_) => Some(v.to_string()),
    }
}

/// Look up `key`, then its nested `"value"`. Anything missing along the way yields `None`.
pub fn content_value(content: &Content, key: &str) -> Option<String> {
    content.get(key).and_then(|f| f.get("value")).and_then(value_text)
}

/// The invitation a reply must carry to count as a review of submission `number`.
pub fn review_invitation(venue_id: &str, meta: &VenueMetadata, number: u64) -> String {
    format!("{venue_id}/{}{number}/-/{}", meta.submission_name, meta.review_name)
}

/// The invitation that lists every submission of the venue.
pub fn submission_invitation(venue_id: &str, meta: &VenueMetadata) -> String {
    format!("{venue_id}/-/{}", meta.submission_name)
}

impl Review {
    pub fn from_reply(reply: &Reply) -> Self {
        let field = |key: &str| content_value(&reply.content, key);
        Self {
            id: reply.id.clone(),
            rating: field("rating"),
            confidence: field("confidence"),
            summary: field("summary"),
            soundness: field("soundness"),
            presentation: field("presentation"),
            contribution: field("contribution"),
            strengths: field("strengths"),
            weaknesses: field("weaknesses"),
            questions: field("questions"),
            ethics_flag: field("flag_for_ethics_review"),
            code_of_conduct: field("code_of_conduct"),
            timestamp: reply.tcdate,
        }
    }
}

/// Reviews attached to one submission, in reply order.
pub fn reviews_of<'a>(
    venue_id: &str,
    meta: &VenueMetadata,
    submission: &'a Submission,
) -> impl Iterator<Item = &'a Reply> + 'a {
    let invitation = review_invitation(venue_id, meta, submission.number);
    submission
        .details
        .replies
        .iter()
        .filter(move |r| r.has_invitation(&invitation))
}

/// Flatten one submission into a record per review.
pub fn flatten_submission(venue_id: &str, meta: &VenueMetadata, submission: &Submission) -> Vec<FlatReviewRecord> {
    let title = content_value(&submission.content, "title");
    reviews_of(venue_id, meta, submission)
        .map(|reply| FlatReviewRecord::new(submission.number, title.clone(), Review::from_reply(reply)))
        .collect()
}
