//! Walk a venue's submissions and flatten their reviews.

use crate::client::ReviewSession;
use crate::error::EtlError;
use crate::extract::{flatten_submission, submission_invitation};
use crate::model::FlatReviewRecord;
use crate::progress::ProgressScope;

/// Resolve venue names, list every submission with inline replies, and emit one
/// record per review. Order follows the service: submissions as returned, then
/// replies as returned within each submission.
pub fn fetch_reviews<S: ReviewSession>(
    session: &S,
    venue_id: &str,
    progress: bool,
) -> Result<Vec<FlatReviewRecord>, EtlError> {
    let meta = session.venue_metadata(venue_id)?;
    tracing::debug!(
        "venue {} uses submission name {:?}, review name {:?}",
        venue_id,
        meta.submission_name,
        meta.review_name
    );

    let submissions = session.submissions(&submission_invitation(venue_id, &meta))?;
    tracing::info!("Found {} submissions", submissions.len());

    let pb = ProgressScope::count(progress, "Processing submissions", submissions.len() as u64);
    let mut records = Vec::new();
    for submission in &submissions {
        records.extend(flatten_submission(venue_id, &meta, submission));
        pb.inc_items(1);
    }
    pb.finish("done");

    tracing::info!("Found {} total reviews", records.len());
    Ok(records)
}
