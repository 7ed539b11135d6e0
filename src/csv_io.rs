//! Interchange CSV: one header row, one row per review, backslash escaping.
//!
//! Every field is quoted. Inside a quoted field the writer emits `\"` for a quote
//! and we pre-double literal backslashes, so the reader (escape = `\`) hands back
//! the exact original bytes, embedded newlines and delimiters included.

use crate::error::EtlError;
use crate::model::{FlatReviewRecord, COLUMNS};
use crate::util::{remove_if_exists, replace_file_atomic, tmp_path_for};
use anyhow::{Context, Result};
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const ESCAPE: u8 = b'\\';

fn escape_backslashes(s: &str) -> Cow<'_, str> {
    if s.contains('\\') {
        Cow::Owned(s.replace('\\', "\\\\"))
    } else {
        Cow::Borrowed(s)
    }
}

/// Buffered review CSV writer on a temp location; `finish_atomic` promotes it.
pub struct ReviewCsvWriter {
    path: PathBuf,
    w: csv::Writer<BufWriter<File>>,
    rows: u64,
}

impl ReviewCsvWriter {
    /// Create the file and write the header row.
    pub fn create(path: &Path, buf_bytes: usize) -> Result<Self, EtlError> {
        let f = File::create(path).map_err(|e| EtlError::io(path, e))?;
        let mut w = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .double_quote(false)
            .escape(ESCAPE)
            .from_writer(BufWriter::with_capacity(buf_bytes.max(8 * 1024), f));
        w.write_record(COLUMNS)?;
        Ok(Self { path: path.to_path_buf(), w, rows: 0 })
    }

    pub fn write_review(&mut self, rec: &FlatReviewRecord) -> Result<(), EtlError> {
        let row = rec.to_row();
        self.w.write_record(row.iter().map(|f| escape_backslashes(f).into_owned()))?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flush and move the temp file onto `final_path`.
    pub fn finish_atomic(mut self, final_path: &Path) -> Result<()> {
        self.w.flush().map_err(|e| EtlError::io(&self.path, e))?;
        drop(self.w);
        replace_file_atomic(&self.path, final_path)
    }
}

/// Write all records to `out_path`. On any failure the temp file is removed and
/// whatever was at `out_path` before is left alone.
pub fn write_reviews_csv(records: &[FlatReviewRecord], out_path: &Path, write_buf: usize) -> Result<u64> {
    let tmp = tmp_path_for(out_path);
    let res = (|| -> Result<u64> {
        let mut w = ReviewCsvWriter::create(&tmp, write_buf)?;
        for rec in records {
            w.write_review(rec)?;
        }
        let rows = w.rows();
        w.finish_atomic(out_path)?;
        Ok(rows)
    })();
    if res.is_err() {
        let _ = remove_if_exists(&tmp);
    }
    res.with_context(|| format!("write reviews to {}", out_path.display()))
}

/// Read every record back in file order. Columns are matched by header name.
pub fn read_reviews_csv(path: &Path, read_buf: usize) -> Result<Vec<FlatReviewRecord>, EtlError> {
    let f = File::open(path).map_err(|e| EtlError::io(path, e))?;
    let mut rdr = ReaderBuilder::new()
        .double_quote(false)
        .escape(Some(ESCAPE))
        .from_reader(BufReader::with_capacity(read_buf.max(8 * 1024), f));

    let mut out = Vec::new();
    for rec in rdr.deserialize::<FlatReviewRecord>() {
        out.push(rec?);
    }
    Ok(out)
}
