//! Wire types returned by the review service, plus the flat record written to CSV.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Note content: `field -> {"value": ...}`.
pub type Content = Map<String, Value>;

/// Marker written in place of any absent field.
pub const NOT_AVAILABLE: &str = "N/A";

/// Column order of the interchange CSV.
pub const COLUMNS: [&str; 15] = [
    "paper_id",
    "paper_title",
    "review_id",
    "rating",
    "confidence",
    "summary",
    "soundness",
    "presentation",
    "contribution",
    "strengths",
    "weaknesses",
    "questions",
    "ethics_flag",
    "code_of_conduct",
    "timestamp",
];

/// Venue configuration names needed before any submission query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VenueMetadata {
    pub submission_name: String,
    pub review_name: String,
}

/// One paper under review, as listed with `details=replies`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Submission {
    pub id: String,
    pub number: u64,
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub details: SubmissionDetails,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SubmissionDetails {
    #[serde(default)]
    pub replies: Vec<Reply>,
}

/// Generic threaded response attached to a submission. Reviews are the subset
/// tagged with the submission's review invitation.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Reply {
    pub id: String,
    #[serde(default)]
    pub invitations: Vec<String>,
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub tcdate: Option<i64>,
}

impl Reply {
    pub fn has_invitation(&self, invitation: &str) -> bool {
        self.invitations.iter().any(|i| i == invitation)
    }
}

/// A reply classified as a review, with every tracked field explicitly optional.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Review {
    pub id: String,
    pub rating: Option<String>,
    pub confidence: Option<String>,
    pub summary: Option<String>,
    pub soundness: Option<String>,
    pub presentation: Option<String>,
    pub contribution: Option<String>,
    pub strengths: Option<String>,
    pub weaknesses: Option<String>,
    pub questions: Option<String>,
    pub ethics_flag: Option<String>,
    pub code_of_conduct: Option<String>,
    pub timestamp: Option<i64>,
}

/// One review flattened together with its paper's id and title.
/// Absent values hold `N/A`, never an empty string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatReviewRecord {
    pub paper_id: u64,
    pub paper_title: String,
    pub review_id: String,
    pub rating: String,
    pub confidence: String,
    pub summary: String,
    pub soundness: String,
    pub presentation: String,
    pub contribution: String,
    pub strengths: String,
    pub weaknesses: String,
    pub questions: String,
    pub ethics_flag: String,
    pub code_of_conduct: String,
    pub timestamp: String,
}

impl FlatReviewRecord {
    pub fn new(paper_id: u64, paper_title: Option<String>, review: Review) -> Self {
        let or_na = |v: Option<String>| v.unwrap_or_else(|| NOT_AVAILABLE.to_string());
        Self {
            paper_id,
            paper_title: or_na(paper_title),
            review_id: review.id,
            rating: or_na(review.rating),
            confidence: or_na(review.confidence),
            summary: or_na(review.summary),
            soundness: or_na(review.soundness),
            presentation: or_na(review.presentation),
            contribution: or_na(review.contribution),
            strengths: or_na(review.strengths),
            weaknesses: or_na(review.weaknesses),
            questions: or_na(review.questions),
            ethics_flag: or_na(review.ethics_flag),
            code_of_conduct: or_na(review.code_of_conduct),
            timestamp: or_na(review.timestamp.map(|t| t.to_string())),
        }
    }

    /// Field values in `COLUMNS` order.
    pub fn to_row(&self) -> [String; 15] {
        [
            self.paper_id.to_string(),
            self.paper_title.clone(),
            self.review_id.clone(),
            self.rating.clone(),
            self.confidence.clone(),
            self.summary.clone(),
            self.soundness.clone(),
            self.presentation.clone(),
            self.contribution.clone(),
            self.strengths.clone(),
            self.weaknesses.clone(),
            self.questions.clone(),
            self.ethics_flag.clone(),
            self.code_of_conduct.clone(),
            self.timestamp.clone(),
        ]
    }
}
