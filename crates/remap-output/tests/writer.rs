use std::fs;

use remap_model::{Bucket, Record, ResultStore, Value};
use remap_output::{write_results, write_rows};

fn record(pairs: &[(&str, Value)]) -> Record {
    pairs.iter().map(|(k, v)| (*k, v.clone())).collect()
}

#[test]
fn rows_render_with_sentinel_for_gaps() {
    let rows = vec![
        record(&[("Code", Value::from("A7")), ("Seq", Value::Number(1.0))]),
        record(&[
            ("Code", Value::from("A7.1")),
            ("Notes", Value::from("A7 renumbered to A7.1. dup;")),
        ]),
        record(&[("Code", Value::from("B, Ltd")), ("Seq", Value::Missing)]),
    ];
    let mut buffer = Vec::new();
    write_rows(&mut buffer, &rows).expect("write rows");
    let text = String::from_utf8(buffer).expect("utf8");
    insta::assert_snapshot!(text, @r#"
    Code,Seq,Notes
    A7,1,\N
    A7.1,\N,A7 renumbered to A7.1. dup;
    "B, Ltd",\N,\N
    "#);
}

#[test]
fn writes_three_files_per_table_and_replaces_old_ones() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("out");
    fs::create_dir_all(&out).expect("mkdir");
    fs::write(out.join("Person.csv"), "stale").expect("stale file");

    let mut store = ResultStore::new(["Person", "Address"]).expect("store");
    let person = store.get_mut("Person").expect("person");
    person.push(Bucket::Accepted, record(&[("Code", Value::from("A1"))]));
    person.push(
        Bucket::DuplicatesUnresolved,
        record(&[("Code", Value::from("A1")), ("output_Code", Value::from("A1"))]),
    );

    let outputs = write_results(&out, &store).expect("write results");
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0].accepted, out.join("Person.csv"));

    let accepted = fs::read_to_string(out.join("Person.csv")).expect("read");
    assert_eq!(accepted, "Code\nA1\n");
    let flagged = fs::read_to_string(out.join("Person_duplicates.csv")).expect("read");
    assert_eq!(flagged, "Code,output_Code\nA1,A1\n");
    let resolved = fs::read_to_string(out.join("Person_duplicates_resolved.csv")).expect("read");
    assert!(resolved.is_empty());
    for name in ["Address.csv", "Address_duplicates.csv", "Address_duplicates_resolved.csv"] {
        assert!(out.join(name).exists(), "{name} written");
    }
}
