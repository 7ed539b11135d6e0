mod batch;
mod client;
mod config;
mod csv_io;
mod error;
mod extract;
mod fetch;
mod model;
mod pipeline;
mod progress;
mod util;

pub use crate::config::{Credentials, ETLOptions, DEFAULT_BASE_URL, DEFAULT_REVIEWS_PER_DOC, DEFAULT_VENUE, ENV_PASSWORD, ENV_USERNAME};
pub use crate::error::EtlError;
pub use crate::pipeline::ReviewETL;

// Wire types and the flat record.
pub use crate::model::{Content, FlatReviewRecord, Reply, Review, Submission, SubmissionDetails, VenueMetadata, COLUMNS, NOT_AVAILABLE};

// Service boundary (implement these to fetch from something other than OpenReview).
pub use crate::client::{venue_metadata_from_content, OpenReviewClient, OpenReviewSession, ReviewService, ReviewSession, PAGE_SIZE};

// Stage building blocks.
pub use crate::extract::{content_value, flatten_submission, review_invitation, reviews_of, submission_invitation, value_text};
pub use crate::fetch::fetch_reviews;
pub use crate::csv_io::{read_reviews_csv, write_reviews_csv, ReviewCsvWriter};
pub use crate::batch::{batch_count, build_batches, render_review, write_batches_json, Batch, RECORD_SEPARATOR};

pub use crate::progress::{make_count_progress, ProgressScope};
pub use crate::util::init_tracing_once;
