//! Rendering reviews as text blocks and grouping them into batch documents.

use crate::error::EtlError;
use crate::model::FlatReviewRecord;
use crate::util::{remove_if_exists, replace_file_atomic, tmp_path_for};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Last line of every rendered review block.
pub const RECORD_SEPARATOR: &str = "-------------------------------------------";

/// One output document: the rendered text of up to N consecutive reviews.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub content: String,
}

pub fn render_review(r: &FlatReviewRecord) -> String {
    format!(
        "Paper {}: {}\n\n\
         Rating: {}\n\
         Confidence: {}\n\n\
         Summary:\n{}\n\n\
         Soundness: {}\n\
         Presentation: {}\n\
         Contribution: {}\n\n\
         Strengths:\n{}\n\n\
         Weaknesses:\n{}\n\n\
         Questions:\n{}\n\n\
         Ethics Flag: {}\n\
         {}\n",
        r.paper_id,
        r.paper_title,
        r.rating,
        r.confidence,
        r.summary,
        r.soundness,
        r.presentation,
        r.contribution,
        r.strengths,
        r.weaknesses,
        r.questions,
        r.ethics_flag,
        RECORD_SEPARATOR,
    )
}

/// Number of documents `total` records produce at `per_doc` each (ceiling division).
pub fn batch_count(total: usize, per_doc: usize) -> usize {
    let per_doc = per_doc.max(1);
    (total + per_doc - 1) / per_doc
}

/// Group rendered reviews into consecutive batches; blocks within a batch are
/// joined by a newline. `per_doc` below 1 is treated as 1.
pub fn build_batches(records: &[FlatReviewRecord], per_doc: usize) -> Vec<Batch> {
    records
        .chunks(per_doc.max(1))
        .map(|chunk| Batch {
            content: chunk.iter().map(render_review).collect::<Vec<_>>().join("\n"),
        })
        .collect()
}

/// Write the batches as a JSON array of `{"content": ...}` documents.
/// Goes through a temp file so a failure never leaves a truncated array behind.
pub fn write_batches_json(batches: &[Batch], out_path: &Path, pretty: bool, write_buf: usize) -> Result<()> {
    let tmp = tmp_path_for(out_path);
    let res = (|| -> Result<()> {
        let f = File::create(&tmp).map_err(|e| EtlError::io(&tmp, e))?;
        let mut w = BufWriter::with_capacity(write_buf.max(8 * 1024), f);
        if pretty {
            serde_json::to_writer_pretty(&mut w, batches).map_err(EtlError::from)?;
        } else {
            serde_json::to_writer(&mut w, batches).map_err(EtlError::from)?;
        }
        w.flush().map_err(|e| EtlError::io(&tmp, e))?;
        drop(w);
        replace_file_atomic(&tmp, out_path)
    })();
    if res.is_err() {
        let _ = remove_if_exists(&tmp);
    }
    res.with_context(|| format!("write batches to {}", out_path.display()))
}
