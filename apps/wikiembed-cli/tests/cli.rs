use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Arc;

use arrow_array::cast::AsArray;
use arrow_array::{RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use tempfile::TempDir;
use wikiembed_pipeline::table::{read_parquet, write_parquet_atomic};

fn write_articles(dir: &Path, abstracts: &[&str]) -> PathBuf {
    let path = dir.join("articles.parquet");
    let n = abstracts.len();
    let schema = Arc::new(Schema::new(vec![
        Field::new("Title", DataType::Utf8, false),
        Field::new("Abstract", DataType::Utf8, false),
        Field::new("URL", DataType::Utf8, false),
        Field::new("Version Control", DataType::Utf8, false),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from((1..=n).map(|i| format!("Title {i}")).collect::<Vec<_>>())),
            Arc::new(StringArray::from(abstracts.to_vec())),
            Arc::new(StringArray::from((1..=n).map(|i| format!("https://example.org/{i}")).collect::<Vec<_>>())),
            Arc::new(StringArray::from((1..=n).map(|i| format!("rev-{i}")).collect::<Vec<_>>())),
        ],
    )
    .unwrap();
    write_parquet_atomic(&path, &batch, &[]).unwrap();
    path
}

fn run(bin: &str, cwd: &Path, args: &[&str]) -> Output {
    Command::new(bin)
        .current_dir(cwd)
        .args(args)
        .env("APP_USE_FAKE_EMBEDDINGS", "1")
        .env("RUST_ENV", "test")
        .env_remove("RUST_LOG")
        .output()
        .expect("run CLI")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "cli exited with {}: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn embed_writes_output_and_skips_empty_rows() {
    let tmp = TempDir::new().unwrap();
    let input = write_articles(tmp.path(), &["first abstract", "", "third abstract"]);
    let output = tmp.path().join("embeddings.parquet");

    let result = run(
        env!("CARGO_BIN_EXE_wikiembed-embed"),
        tmp.path(),
        &["--input", input.to_str().unwrap(), "--output", output.to_str().unwrap(), "--all", "--no-progress"],
    );
    assert_success(&result);

    let batch = read_parquet(&output).unwrap();
    assert_eq!(batch.num_rows(), 2);
    let versions = batch.column_by_name("Version Control").unwrap().as_string::<i32>();
    assert_eq!(versions.value(1), "rev-3");
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("empty input"), "{stderr}");
}

#[test]
fn embed_with_checkpoints_reads_config_file() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("config.toml"), "[embed]\nwiki_language = \"frwiki\"\nshow_progress = false\n").unwrap();
    let input = write_articles(tmp.path(), &["a", "b", "c", "d"]);
    let output = tmp.path().join("out.parquet");
    let ckpt = tmp.path().join("ckpt");

    let result = run(
        env!("CARGO_BIN_EXE_wikiembed-embed"),
        tmp.path(),
        &[
            "-i", input.to_str().unwrap(),
            "-o", output.to_str().unwrap(),
            "--all",
            "--checkpoint-dir", ckpt.to_str().unwrap(),
            "--checkpoint-interval", "2",
        ],
    );
    assert_success(&result);

    let units = std::fs::read_dir(&ckpt).unwrap().count();
    assert_eq!(units, 2);
    let batch = read_parquet(&output).unwrap();
    assert_eq!(batch.num_rows(), 4);
    let languages = batch.column_by_name("Wiki Language").unwrap().as_string::<i32>();
    assert!(languages.iter().all(|l| l == Some("frwiki")));
}

#[test]
fn embed_setup_error_exits_with_status_one() {
    let tmp = TempDir::new().unwrap();
    let input = write_articles(tmp.path(), &["a"]);

    let result = run(
        env!("CARGO_BIN_EXE_wikiembed-embed"),
        tmp.path(),
        &["--input", input.to_str().unwrap(), "--output", "out.csv"],
    );
    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains(".parquet"));

    let result = run(
        env!("CARGO_BIN_EXE_wikiembed-embed"),
        tmp.path(),
        &["--input", input.to_str().unwrap(), "--output", "out.parquet", "--checkpoint-dir", "ck", "--checkpoint-interval", "0"],
    );
    assert_eq!(result.status.code(), Some(1));
    assert!(!tmp.path().join("out.parquet").exists());
}

#[test]
fn concat_then_embed_the_concatenated_column() {
    let tmp = TempDir::new().unwrap();
    let input = write_articles(tmp.path(), &["one", "two"]);
    let concat = tmp.path().join("concat.parquet");
    let output = tmp.path().join("out.parquet");

    let result = run(
        env!("CARGO_BIN_EXE_wikiembed-concat"),
        tmp.path(),
        &["-i", input.to_str().unwrap(), "-o", concat.to_str().unwrap(), "--all", "--wiki-language", "dewiki"],
    );
    assert_success(&result);

    let result = run(
        env!("CARGO_BIN_EXE_wikiembed-embed"),
        tmp.path(),
        &[
            "-i", concat.to_str().unwrap(),
            "-o", output.to_str().unwrap(),
            "--column", "Concat Abstract",
            "--wiki-language", "dewiki",
            "--no-progress",
        ],
    );
    assert_success(&result);
    assert_eq!(read_parquet(&output).unwrap().num_rows(), 2);
}

#[test]
fn split_uses_configured_part_size() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("config.toml"), "[split]\nrows_per_part = 2\n").unwrap();
    let input = write_articles(tmp.path(), &["a", "b", "c", "d", "e"]);

    let result = run(env!("CARGO_BIN_EXE_wikiembed-split"), tmp.path(), &["-i", input.to_str().unwrap(), "-o", "parts"]);
    assert_success(&result);

    let info = std::fs::read_to_string(tmp.path().join("parts/file_info.txt")).unwrap();
    assert_eq!(info, "1-2 in part1.parquet\n3-4 in part2.parquet\n5-5 in part3.parquet\n");
}
