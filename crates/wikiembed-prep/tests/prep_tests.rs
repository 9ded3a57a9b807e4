use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow_array::cast::AsArray;
use arrow_array::{Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use tempfile::TempDir;

use wikiembed_core::Error;
use wikiembed_pipeline::table::{read_parquet, write_parquet_atomic};
use wikiembed_pipeline::Dataset;
use wikiembed_prep::{concat_file, split_file, ConcatOptions, CONCAT_ABSTRACT_COLUMN};

fn write_articles(dir: &Path, n: usize) -> PathBuf {
    let path = dir.join("articles.parquet");
    let schema = Arc::new(Schema::new(vec![
        Field::new("Title", DataType::Utf8, true),
        Field::new("Abstract", DataType::Utf8, true),
        Field::new("URL", DataType::Utf8, false),
        Field::new("Version Control", DataType::Int64, true),
        Field::new("Extra", DataType::Utf8, true),
    ]));
    let titles: Vec<Option<String>> = (1..=n).map(|i| (i != 2).then(|| format!("Title {i}"))).collect();
    let abstracts: Vec<Option<String>> = (1..=n).map(|i| (i != 3).then(|| format!("Abstract {i}"))).collect();
    let urls: Vec<String> = (1..=n).map(|i| format!("https://en.wikipedia.org/wiki/{i}")).collect();
    let versions: Vec<Option<i64>> = (1..=n).map(|i| (i != 4).then_some(1000 + i as i64)).collect();
    let extra: Vec<Option<&str>> = vec![Some("dropped"); n];
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(titles)),
            Arc::new(StringArray::from(abstracts)),
            Arc::new(StringArray::from(urls)),
            Arc::new(Int64Array::from(versions)),
            Arc::new(StringArray::from(extra)),
        ],
    )
    .unwrap();
    write_parquet_atomic(&path, &batch, &[]).unwrap();
    path
}

fn column_names(batch: &RecordBatch) -> Vec<String> {
    batch.schema().fields().iter().map(|f| f.name().clone()).collect()
}

#[test]
fn concat_builds_expected_columns() {
    let tmp = TempDir::new().unwrap();
    let input = write_articles(tmp.path(), 5);
    let output = tmp.path().join("concat.parquet");

    let options = ConcatOptions { process_all: true, wiki_language: "dewiki".into() };
    let rows = concat_file(&input, &output, &options).expect("concat");
    assert_eq!(rows, 5);

    let batch = read_parquet(&output).unwrap();
    assert_eq!(column_names(&batch), vec!["Title", "Concat Abstract", "URL", "Version Control", "Wiki Language"]);
    let concat = batch.column_by_name(CONCAT_ABSTRACT_COLUMN).unwrap().as_string::<i32>();
    assert_eq!(concat.value(0), "Title 1 Abstract 1");
    assert_eq!(concat.value(1), "Abstract 2");
    assert_eq!(concat.value(2), "Title 3");
    let languages = batch.column_by_name("Wiki Language").unwrap().as_string::<i32>();
    assert!(languages.iter().all(|l| l == Some("dewiki")));
    assert_eq!(batch.column_by_name("Version Control").unwrap().data_type(), &DataType::Int64);
}

#[test]
fn concat_sample_keeps_first_ten_rows() {
    let tmp = TempDir::new().unwrap();
    let input = write_articles(tmp.path(), 25);
    let output = tmp.path().join("concat.parquet");

    let options = ConcatOptions { process_all: false, wiki_language: "enwiki".into() };
    assert_eq!(concat_file(&input, &output, &options).unwrap(), 10);
    assert_eq!(read_parquet(&output).unwrap().num_rows(), 10);
}

#[test]
fn concat_output_feeds_the_embedding_dataset() {
    let tmp = TempDir::new().unwrap();
    let input = write_articles(tmp.path(), 3);
    let output = tmp.path().join("concat.parquet");
    concat_file(&input, &output, &ConcatOptions { process_all: true, wiki_language: "enwiki".into() }).unwrap();

    let dataset = Dataset::open(&output, CONCAT_ABSTRACT_COLUMN).expect("dataset");
    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.text(0), Some("Title 1 Abstract 1"));
    assert_eq!(dataset.version_type(), &DataType::Int64);
}

#[test]
fn concat_rejects_missing_columns_and_bad_paths() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("titles.parquet");
    let schema = Arc::new(Schema::new(vec![Field::new("Title", DataType::Utf8, false)]));
    let batch = RecordBatch::try_new(schema, vec![Arc::new(StringArray::from(vec!["only"]))]).unwrap();
    write_parquet_atomic(&path, &batch, &[]).unwrap();
    let options = ConcatOptions { process_all: true, wiki_language: "enwiki".into() };

    let err = concat_file(&path, &tmp.path().join("out.parquet"), &options).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)), "{err}");
    assert!(err.to_string().contains("Abstract"));

    let err = concat_file(&path, &tmp.path().join("out.txt"), &options).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));

    let err = concat_file(&tmp.path().join("missing.parquet"), &tmp.path().join("out.parquet"), &options).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn split_writes_parts_and_info_file() {
    let tmp = TempDir::new().unwrap();
    let input = write_articles(tmp.path(), 25);
    let out_dir = tmp.path().join("parts");

    let parts = split_file(&input, &out_dir, 10).expect("split");
    let ranges: Vec<(usize, usize)> = parts.iter().map(|p| (p.first_row, p.last_row)).collect();
    assert_eq!(ranges, vec![(1, 10), (11, 20), (21, 25)]);

    let info = std::fs::read_to_string(out_dir.join("file_info.txt")).unwrap();
    assert_eq!(info, "1-10 in part1.parquet\n11-20 in part2.parquet\n21-25 in part3.parquet\n");

    let third = read_parquet(&out_dir.join("part3.parquet")).unwrap();
    assert_eq!(third.num_rows(), 5);
    assert_eq!(column_names(&third).len(), 5, "parts keep every input column");
    let urls = third.column_by_name("URL").unwrap().as_string::<i32>();
    assert_eq!(urls.value(0), "https://en.wikipedia.org/wiki/21");
}

#[test]
fn split_of_empty_input_writes_empty_info_file() {
    let tmp = TempDir::new().unwrap();
    let input = write_articles(tmp.path(), 0);
    let out_dir = tmp.path().join("parts");

    let parts = split_file(&input, &out_dir, 10).expect("split");
    assert!(parts.is_empty());
    assert_eq!(std::fs::read_to_string(out_dir.join("file_info.txt")).unwrap(), "");
    assert!(!out_dir.join("part1.parquet").exists());
}

#[test]
fn split_rejects_zero_rows_per_part() {
    let tmp = TempDir::new().unwrap();
    let input = write_articles(tmp.path(), 3);
    let err = split_file(&input, &tmp.path().join("parts"), 0).unwrap_err();
    assert!(err.is_setup());
}
