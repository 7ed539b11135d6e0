use crate::batch::{batch_count, build_batches, write_batches_json, Batch};
use crate::client::{OpenReviewClient, ReviewService};
use crate::config::{Credentials, ETLOptions};
use crate::csv_io::{read_reviews_csv, write_reviews_csv};
use crate::fetch::fetch_reviews;
use crate::model::FlatReviewRecord;
use crate::util::init_tracing_once;
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;

/// Builder facade over the two stages. They share nothing but the CSV file:
/// `fetch_to_csv` produces it, `batch_csv_to_json` consumes it in a later run.
#[derive(Clone, Debug)]
pub struct ReviewETL {
    pub(crate) opts: ETLOptions,
}

impl Default for ReviewETL {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewETL {
    pub fn new() -> Self {
        Self { opts: ETLOptions::default() }
    }

    pub fn with_options(opts: ETLOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &ETLOptions {
        &self.opts
    }

    // -------- Builder methods --------
    pub fn base_url(mut self, url: impl AsRef<str>) -> Self { self.opts = self.opts.with_base_url(url); self }
    pub fn venue(mut self, venue_id: impl AsRef<str>) -> Self { self.opts = self.opts.with_venue(venue_id); self }
    pub fn reviews_per_doc(mut self, n: usize) -> Self { self.opts = self.opts.with_reviews_per_doc(n); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn request_timeout(mut self, timeout: Option<Duration>) -> Self { self.opts = self.opts.with_request_timeout(timeout); self }
    pub fn io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self { self.opts = self.opts.with_io_buffers(read_bytes, write_bytes); self }
    pub fn pretty_json(mut self, yes: bool) -> Self { self.opts = self.opts.with_pretty_json(yes); self }

    // -------- Stage 1: fetch + serialize --------

    /// Fetch every review of the configured venue from the OpenReview API and
    /// write them to `out_csv`.
    pub fn download_reviews(&self, creds: &Credentials, out_csv: &Path) -> Result<Vec<FlatReviewRecord>> {
        let client = OpenReviewClient::with_timeout(&self.opts.base_url, self.opts.request_timeout)?;
        self.fetch_to_csv(&client, creds, out_csv)
    }

    /// Same as `download_reviews`, against any review service.
    /// Nothing is written unless the whole fetch succeeded.
    pub fn fetch_to_csv<S: ReviewService>(
        &self,
        service: &S,
        creds: &Credentials,
        out_csv: &Path,
    ) -> Result<Vec<FlatReviewRecord>> {
        init_tracing_once();
        let venue_id = self.opts.require_venue()?;

        let session = service.authenticate(creds)?;
        let records = fetch_reviews(&session, venue_id, self.opts.progress)
            .with_context(|| format!("fetch reviews for {venue_id}"))?;

        let rows = write_reviews_csv(&records, out_csv, self.opts.write_buffer_bytes)?;
        tracing::info!("Successfully saved {} reviews to {}", rows, out_csv.display());
        Ok(records)
    }

    // -------- Stage 2: read + batch --------

    /// Re-read `in_csv`, render and group its reviews, and write the documents to
    /// `out_json`. Batch count follows the file's row count.
    pub fn batch_csv_to_json(&self, in_csv: &Path, out_json: &Path) -> Result<Vec<Batch>> {
        init_tracing_once();
        let records = read_reviews_csv(in_csv, self.opts.read_buffer_bytes)
            .with_context(|| format!("read reviews from {}", in_csv.display()))?;

        let per_doc = self.opts.reviews_per_doc;
        tracing::debug!(
            "{} reviews -> {} docs of up to {}",
            records.len(),
            batch_count(records.len(), per_doc),
            per_doc
        );
        let batches = build_batches(&records, per_doc);

        write_batches_json(&batches, out_json, self.opts.pretty_json, self.opts.write_buffer_bytes)?;
        tracing::info!("Successfully saved {} docs to {}", batches.len(), out_json.display());
        Ok(batches)
    }
}
