use std::fs;
use std::path::Path;

use predicates::prelude::*;
use threadsheet::formats::SheetDocument;

const ARTICLE_JSON: &str = r#"{
  "url": "https://example.com/archives/501.html",
  "title": "猫が家に来た",
  "new_title": "猫が家に来た結果",
  "thumb_text": "猫かわいい",
  "text2": "猫あるある",
  "tokens": [
    "今日は晴れ。",
    "http://img.example.com/cat.jpg",
    "明日は雨。"
  ]
}"#;

const ARTICLE_MARKDOWN: &str = "---
id: cat-story
url: https://example.com/archives/502.html
title: 猫の話
---
猫が来ました。
https://img.example.com/cat2.png
とても元気です。
";

fn write(path: &Path, contents: &str) -> anyhow::Result<()> {
    fs::write(path, contents)?;
    Ok(())
}

#[test]
fn build_writes_one_json_sheet_per_article() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let input = tmp.path().join("501.json");
    write(&input, ARTICLE_JSON)?;
    let out = tmp.path().join("sheets");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("threadsheet");
    cmd.args(["build", "--input"])
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .args(["--classifier", "fixed", "--emotion", "joy", "--seed", "1"])
        .assert()
        .success();

    let sheet: SheetDocument = serde_json::from_str(&fs::read_to_string(out.join("501.json"))?)?;
    assert_eq!(sheet.article_id, "501");
    assert_eq!(sheet.url, "https://example.com/archives/501.html");
    assert_eq!(sheet.rows.len(), 20);
    assert_eq!(sheet.rows[0][0], "start");
    assert_eq!(sheet.rows[2][0], "番号");
    let width = sheet.rows[0].len();
    assert!(sheet.rows.iter().all(|row| row.len() == width));
    assert_eq!(sheet.rows[19][width - 1], "end");
    Ok(())
}

#[test]
fn build_reads_markdown_directories_as_tsv() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let input_dir = tmp.path().join("pages");
    fs::create_dir_all(&input_dir)?;
    write(&input_dir.join("cat.md"), ARTICLE_MARKDOWN)?;
    let out = tmp.path().join("sheets");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("threadsheet");
    cmd.args(["build", "--site", "markdown", "--format", "tsv", "--seed", "2"])
        .arg("--input")
        .arg(&input_dir)
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let tsv = fs::read_to_string(out.join("cat-story.tsv"))?;
    assert!(tsv.starts_with("start\t"));
    assert!(tsv.contains("猫が来ました。"));
    assert!(tsv.trim_end().ends_with("end"));
    Ok(())
}

#[test]
fn build_refuses_existing_output_dir() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let input = tmp.path().join("501.json");
    write(&input, ARTICLE_JSON)?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("threadsheet");
    cmd.args(["build", "--input"])
        .arg(&input)
        .arg("--out")
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    Ok(())
}

#[test]
fn failing_classifier_skips_article_and_fails_run() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let input = tmp.path().join("501.json");
    write(&input, ARTICLE_JSON)?;
    let out = tmp.path().join("sheets");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("threadsheet");
    cmd.args(["build", "--input"])
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .args(["--classifier", "command", "--classifier-command", "false"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("skip article"))
        .stderr(predicate::str::contains("no sheet was built"));

    assert!(!out.join("501.json").exists());
    Ok(())
}

#[test]
fn duplicate_article_id_skips_only_the_duplicate() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let input_dir = tmp.path().join("pages");
    fs::create_dir_all(&input_dir)?;
    write(&input_dir.join("a.json"), ARTICLE_JSON)?;
    write(&input_dir.join("b.json"), ARTICLE_JSON)?;
    write(
        &input_dir.join("c.json"),
        &ARTICLE_JSON.replace("501.html", "502.html"),
    )?;
    let out = tmp.path().join("sheets");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("threadsheet");
    cmd.args(["build", "--seed", "4", "--input"])
        .arg(&input_dir)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("skip article"));

    assert!(out.join("501.json").exists());
    assert!(out.join("502.json").exists());
    Ok(())
}

#[test]
fn unknown_site_parser_is_rejected() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let input = tmp.path().join("501.json");
    write(&input, ARTICLE_JSON)?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("threadsheet");
    cmd.args(["build", "--site", "nope", "--input"])
        .arg(&input)
        .arg("--out")
        .arg(tmp.path().join("sheets"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown site parser: nope"));
    Ok(())
}

#[test]
fn align_prints_alignment_json() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let input = tmp.path().join("501.json");
    write(&input, ARTICLE_JSON)?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("threadsheet");
    cmd.args(["align", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""今日は晴れ。""#))
        .stdout(predicate::str::contains(r#""cat.jpg""#));
    Ok(())
}

#[test]
fn rust_log_debug_emits_parsed_cli() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let input = tmp.path().join("501.json");
    write(&input, ARTICLE_JSON)?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("threadsheet");
    cmd.env("RUST_LOG", "debug")
        .args(["align", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stderr(predicate::str::contains("parsed cli"));
    Ok(())
}
