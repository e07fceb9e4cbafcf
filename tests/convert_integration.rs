//! Conversion property tests
//!
//! Generates manifests, converts them through the public library API and
//! checks the written JSON against the source attributes.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use atlasconv::atlas::DuplicatePolicy;
use atlasconv::convert::{convert_file, input_path, output_path, ConvertOptions};
use atlasconv::parser::parse_str;

// ============================================================================
// Test Utilities
// ============================================================================

/// (name, x, y, width, height)
type Row = (String, i64, i64, i64, i64);

fn manifest(rows: &[Row]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<TextureAtlas imagePath=\"sheet.png\">\n");
    for (name, x, y, w, h) in rows {
        xml.push_str(&format!(
            "    <SubTexture name=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/>\n",
            name, x, y, w, h
        ));
    }
    xml.push_str("</TextureAtlas>\n");
    xml
}

/// Rows with a mix of odd/even sizes and some repeated names
fn sample_rows() -> Vec<Row> {
    (0..40)
        .map(|i| {
            let name = format!("sprite_{}.png", i % 31);
            (name, i * 7, i * 3, 8 + i % 5, 16 - i % 3)
        })
        .collect()
}

fn convert(dir: &Path, rows: &[Row]) -> (PathBuf, serde_json::Value) {
    let base = dir.join("sheet");
    fs::write(input_path(&base), manifest(rows)).unwrap();
    convert_file(&base, &ConvertOptions::default()).unwrap();

    let json = serde_json::from_str(&fs::read_to_string(output_path(&base)).unwrap()).unwrap();
    (base, json)
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_fields_match_last_element_for_each_name() {
    let temp = TempDir::new().unwrap();
    let rows = sample_rows();
    let (_, json) = convert(temp.path(), &rows);

    let mut last: HashMap<&str, &Row> = HashMap::new();
    for row in &rows {
        last.insert(row.0.as_str(), row);
    }

    for (name, (_, x, y, w, h)) in last.iter().map(|(n, r)| (*n, *r)) {
        let record = &json[name];
        assert_eq!(record["name"], name);
        assert_eq!(record["pos"]["x"], *x);
        assert_eq!(record["pos"]["y"], *y);
        assert_eq!(record["width"], *w);
        assert_eq!(record["height"], *h);
    }
}

#[test]
fn test_origin_is_exactly_half_size() {
    let temp = TempDir::new().unwrap();
    let (_, json) = convert(temp.path(), &sample_rows());

    for record in json.as_object().unwrap().values() {
        let width = record["width"].as_i64().unwrap() as f64;
        let height = record["height"].as_i64().unwrap() as f64;
        assert_eq!(record["origin"]["x"].as_f64().unwrap(), width / 2.0);
        assert_eq!(record["origin"]["y"].as_f64().unwrap(), height / 2.0);
        // Always written as a float, even for even sizes
        assert!(record["origin"]["x"].is_f64());
    }
}

#[test]
fn test_key_count_equals_distinct_names() {
    let temp = TempDir::new().unwrap();
    let rows = sample_rows();
    let (_, json) = convert(temp.path(), &rows);

    let mut distinct: Vec<&str> = rows.iter().map(|r| r.0.as_str()).collect();
    distinct.sort_unstable();
    distinct.dedup();
    assert_eq!(json.as_object().unwrap().len(), distinct.len());
}

#[test]
fn test_keys_follow_first_appearance() {
    let rows = vec![
        ("b".to_string(), 0, 0, 1, 1),
        ("a".to_string(), 0, 0, 1, 1),
        ("b".to_string(), 5, 5, 1, 1),
    ];
    let atlas = parse_str(&manifest(&rows), DuplicatePolicy::Overwrite).unwrap();
    assert_eq!(atlas.names().collect::<Vec<_>>(), vec!["b", "a"]);
    assert_eq!(atlas.get("b").unwrap().position.x, 5);
}

#[test]
fn test_reference_example() {
    let atlas = parse_str(
        r#"<atlas><s name="hero" x="10" y="20" width="64" height="32"/></atlas>"#,
        DuplicatePolicy::Overwrite,
    )
    .unwrap();

    let actual = serde_json::to_value(&atlas).unwrap();
    let expected: serde_json::Value = serde_json::from_str(
        r#"{"hero": {"name":"hero","pos":{"x":10,"y":20},"width":64,"height":32,"origin":{"x":32.0,"y":16.0}}}"#,
    )
    .unwrap();
    assert_eq!(actual, expected);
}

#[test]
fn test_conversion_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let (base, _) = convert(temp.path(), &sample_rows());
    let first = fs::read(output_path(&base)).unwrap();

    convert_file(&base, &ConvertOptions::default()).unwrap();
    let second = fs::read(output_path(&base)).unwrap();
    assert_eq!(first, second);
}
