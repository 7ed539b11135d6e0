#[path = "common/mod.rs"]
mod common;

use common::*;
use revetl::{
    batch_count, build_batches, read_reviews_csv, render_review, write_reviews_csv, Batch, EtlError, ReviewETL,
    RECORD_SEPARATOR,
};
use std::path::Path;

fn read_batches(path: &Path) -> Vec<Batch> {
    serde_json::from_str(&read_text(path)).unwrap()
}

/// Paper ids in the order their blocks appear across all batch contents.
fn paper_ids_in_order(batches: &[Batch]) -> Vec<u64> {
    let joined: String = batches.iter().map(|b| b.content.as_str()).collect::<Vec<_>>().join("\n");
    joined
        .split(RECORD_SEPARATOR)
        .filter_map(|block| {
            let rest = block.trim_start().strip_prefix("Paper ")?;
            rest.split(':').next()?.parse().ok()
        })
        .collect()
}

/// A fully populated record renders to exactly the fixed template.
#[test]
fn template_fidelity() {
    let rendered = render_review(&sample_record(42, "abc"));
    let expected = "Paper 42: Paper title 42\n\
\n\
Rating: 6: marginally above the acceptance threshold\n\
Confidence: 4\n\
\n\
Summary:\n\
Summary for abc.\n\
\n\
Soundness: 3 good\n\
Presentation: 2 fair\n\
Contribution: 3 good\n\
\n\
Strengths:\n\
Strong results.\n\
\n\
Weaknesses:\n\
Few ablations.\n\
\n\
Questions:\n\
None.\n\
\n\
Ethics Flag: No ethics review needed.\n\
-------------------------------------------\n";
    assert_eq!(rendered, expected);
}

/// Blocks inside one batch are joined with a single extra line break.
#[test]
fn blocks_are_joined_by_newline() {
    let records = sample_records(2);
    let batches = build_batches(&records, 100);
    assert_eq!(batches.len(), 1);
    assert_eq!(
        batches[0].content,
        format!("{}\n{}", render_review(&records[0]), render_review(&records[1]))
    );
}

/// 250 records at 100 per doc: 100 + 100 + 50, and file order survives.
#[test]
fn batches_cover_all_records_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("reviews.csv");
    let json = dir.path().join("reviews.json");
    write_reviews_csv(&sample_records(250), &csv, 8 * 1024).unwrap();

    let batches = ReviewETL::new()
        .reviews_per_doc(100)
        .progress(false)
        .batch_csv_to_json(&csv, &json)
        .unwrap();

    let on_disk = read_batches(&json);
    assert_eq!(on_disk, batches);
    assert_eq!(batches.len(), 3);

    let per_batch: Vec<usize> = batches.iter().map(|b| b.content.matches(RECORD_SEPARATOR).count()).collect();
    assert_eq!(per_batch, vec![100, 100, 50]);

    let expected: Vec<u64> = (1..=250).collect();
    assert_eq!(paper_ids_in_order(&batches), expected);
}

/// Evenly divisible totals produce no trailing empty batch.
#[test]
fn divisible_total_has_no_empty_tail() {
    let batches = build_batches(&sample_records(200), 100);
    assert_eq!(batches.len(), 2);
    assert!(batches.iter().all(|b| b.content.matches(RECORD_SEPARATOR).count() == 100));
    assert_eq!(batch_count(200, 100), 2);
    assert_eq!(batch_count(201, 100), 3);
    assert_eq!(batch_count(0, 100), 0);
}

/// A header-only CSV produces an empty JSON array, not an error.
#[test]
fn zero_records_give_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("reviews.csv");
    let json = dir.path().join("reviews.json");
    write_reviews_csv(&[], &csv, 8 * 1024).unwrap();

    let batches = ReviewETL::new().progress(false).batch_csv_to_json(&csv, &json).unwrap();
    assert!(batches.is_empty());
    assert_eq!(read_text(&json), "[]");
}

/// Absent values show up as the literal sentinel in the rendered text.
#[test]
fn sentinel_is_rendered_verbatim() {
    let mut r = sample_record(5, "x");
    r.summary = "N/A".into();
    r.ethics_flag = "N/A".into();
    let text = render_review(&r);
    assert!(text.contains("Summary:\nN/A\n\n"));
    assert!(text.contains("Ethics Flag: N/A\n"));
}

/// The batcher trusts the file: rows removed by hand change the batch count.
#[test]
fn batch_count_follows_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("reviews.csv");
    let json = dir.path().join("reviews.json");
    write_reviews_csv(&sample_records(12), &csv, 8 * 1024).unwrap();

    // drop the last two data rows
    let text = read_text(&csv);
    let kept: Vec<&str> = text.lines().take(1 + 10).collect();
    std::fs::write(&csv, kept.join("\n") + "\n").unwrap();
    assert_eq!(read_reviews_csv(&csv, 8 * 1024).unwrap().len(), 10);

    let batches = ReviewETL::new()
        .reviews_per_doc(5)
        .progress(false)
        .batch_csv_to_json(&csv, &json)
        .unwrap();
    assert_eq!(batches.len(), 2);
}

/// Malformed input surfaces as an error and no JSON file is written.
#[test]
fn malformed_csv_writes_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("broken.csv");
    let json = dir.path().join("reviews.json");
    std::fs::write(&csv, "paper_id,paper_title\nnot-a-number,Title\n").unwrap();

    let err = ReviewETL::new().progress(false).batch_csv_to_json(&csv, &json).unwrap_err();
    assert!(matches!(err.downcast_ref::<EtlError>(), Some(EtlError::Csv(_))), "got {err:#}");
    assert!(!json.exists());
}

#[test]
fn missing_input_writes_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let json = dir.path().join("reviews.json");
    let err = ReviewETL::new()
        .progress(false)
        .batch_csv_to_json(&dir.path().join("absent.csv"), &json)
        .unwrap_err();
    assert!(matches!(err.downcast_ref::<EtlError>(), Some(EtlError::Io { .. })));
    assert!(!json.exists());
}

/// A zero batch size is clamped to one review per document.
#[test]
fn zero_batch_size_is_clamped() {
    let etl = ReviewETL::new().reviews_per_doc(0);
    assert_eq!(etl.options().reviews_per_doc, 1);
    assert_eq!(build_batches(&sample_records(3), 0).len(), 3);
}

/// An output path that is a directory fails immediately, without retries, and
/// leaves neither the directory's contents nor a temp file behind.
#[test]
fn directory_output_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("reviews.csv");
    let out_dir = dir.path().join("outdir");
    std::fs::create_dir(&out_dir).unwrap();
    write_reviews_csv(&sample_records(3), &csv, 8 * 1024).unwrap();

    let started = std::time::Instant::now();
    let err = ReviewETL::new().progress(false).batch_csv_to_json(&csv, &out_dir);
    assert!(err.is_err());
    assert!(started.elapsed() < std::time::Duration::from_secs(2), "took {:?}", started.elapsed());

    assert!(out_dir.is_dir());
    assert_eq!(std::fs::read_dir(&out_dir).unwrap().count(), 0);
    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(!names.iter().any(|n| n.ends_with(".part")), "temp file left: {names:?}");
}
