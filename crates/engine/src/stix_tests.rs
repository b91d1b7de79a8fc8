// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn classifies_dotted_quad_as_ipv4() {
    assert_eq!(IndicatorPattern::classify("203.0.113.7"), IndicatorPattern::IPv4("203.0.113.7".to_string()));
}

#[test]
fn classifies_32_char_hex_as_md5() {
    let hash = "d41d8cd98f00b204e9800998ecf8427e";
    assert_eq!(
        IndicatorPattern::classify(hash),
        IndicatorPattern::Hash {
            algo: "MD5",
            value: hash.to_string()
        }
    );
}

#[test]
fn classifies_64_char_hex_as_sha256() {
    let hash = "e".repeat(64);
    assert_eq!(
        IndicatorPattern::classify(&hash),
        IndicatorPattern::Hash {
            algo: "SHA-256",
            value: hash.clone()
        }
    );
}

#[test]
fn classifies_leading_slash_as_file_path() {
    assert_eq!(
        IndicatorPattern::classify("/tmp/.hidden/evil"),
        IndicatorPattern::FilePath("/tmp/.hidden/evil".to_string())
    );
}

#[test]
fn falls_back_to_domain_for_anything_else() {
    assert_eq!(
        IndicatorPattern::classify("malicious-c2.example"),
        IndicatorPattern::Domain("malicious-c2.example".to_string())
    );
}

#[test]
fn bundle_includes_one_indicator_one_technique_and_their_relationship() {
    let bundle = build_bundle(
        "Suspicious cron beacon",
        &["203.0.113.7".to_string()],
        &["T1053.003".to_string()],
    );
    let objects = bundle["objects"].as_array().expect("objects array");
    let types: Vec<&str> = objects.iter().map(|o| o["type"].as_str().unwrap()).collect();

    assert!(types.contains(&"indicator"));
    assert!(types.contains(&"attack-pattern"));
    assert!(types.contains(&"relationship"));
    assert!(types.contains(&"report"));
}

#[test]
fn two_builds_of_the_same_finding_share_shape_but_not_object_ids() {
    let first = build_bundle("Title", &["203.0.113.7".to_string()], &["T1053.003".to_string()]);
    let second = build_bundle("Title", &["203.0.113.7".to_string()], &["T1053.003".to_string()]);

    assert_eq!(first["objects"].as_array().unwrap().len(), second["objects"].as_array().unwrap().len());
    assert_ne!(first["id"], second["id"]);
}

#[test]
fn bundle_with_no_indicators_or_techniques_still_has_a_report() {
    let bundle = build_bundle("Title only", &[], &[]);
    let objects = bundle["objects"].as_array().unwrap();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0]["type"], "report");
}

/// Strips the non-deterministic `id`/`created`/`*_ref` fields so two builds
/// of the same finding can be diffed structurally.
fn strip_ids(bundle: &Value) -> Value {
    fn strip(v: &Value) -> Value {
        match v {
            Value::Object(map) => Value::Object(
                map.iter()
                    .filter(|(k, _)| !matches!(k.as_str(), "id" | "created" | "source_ref" | "target_ref"))
                    .map(|(k, v)| (k.clone(), strip(v)))
                    .collect(),
            ),
            Value::Array(items) => Value::Array(items.iter().map(strip).collect()),
            other => other.clone(),
        }
    }
    strip(bundle)
}

#[test]
fn two_builds_of_the_same_finding_are_structurally_identical_once_ids_are_stripped() {
    let first = build_bundle("Title", &["203.0.113.7".to_string()], &["T1053.003".to_string()]);
    let second = build_bundle("Title", &["203.0.113.7".to_string()], &["T1053.003".to_string()]);

    similar_asserts::assert_eq!(strip_ids(&first), strip_ids(&second));
}
