use tempfile::tempdir;

use super::*;

fn parse(xml: &str) -> Descriptor {
    let mut ctx = ParseContext::new();
    parse_descriptor(xml, &mut ctx).unwrap();
    ctx.finish()
}

#[test]
fn test_idle_zero_confirms_channel() {
    let descriptor = parse(
        r#"
        <Cluster>
          <String><Name>name</Name><Val>DAPI</Val></String>
          <I32><Name>idle</Name><Val>0</Val></I32>
          <String><Name>name</Name><Val>GFP</Val></String>
          <I32><Name>idle</Name><Val>0</Val></I32>
        </Cluster>"#,
    );
    assert_eq!(descriptor.channel_count, 2);
    assert_eq!(descriptor.channel_names, vec!["DAPI", "GFP"]);
}

#[test]
fn test_idle_nonzero_retracts_channel_name() {
    let descriptor = parse(
        r#"
        <Cluster>
          <String><Name>name</Name><Val>DAPI</Val></String>
          <I32><Name>idle</Name><Val>0</Val></I32>
          <String><Name>name</Name><Val>Cy5</Val></String>
          <I32><Name>idle</Name><Val>1</Val></I32>
        </Cluster>"#,
    );
    assert_eq!(descriptor.channel_count, 1);
    assert_eq!(descriptor.channel_names, vec!["DAPI"]);
}

#[test]
fn test_autofocus_pass_is_not_a_channel() {
    let descriptor = parse(
        r#"
        <Cluster>
          <String><Name>name</Name><Val>Autofocus</Val></String>
          <I32><Name>idle</Name><Val>0</Val></I32>
          <String><Name>name</Name><Val>DAPI</Val></String>
          <I32><Name>idle</Name><Val>0</Val></I32>
        </Cluster>"#,
    );
    assert_eq!(descriptor.channel_count, 1);
    assert_eq!(descriptor.channel_names, vec!["DAPI"]);
}

#[test]
fn test_idle_without_name_is_ignored() {
    let descriptor = parse(
        r#"
        <Cluster>
          <I32><Name>idle</Name><Val>0</Val></I32>
          <String><Name>name</Name><Val>DAPI</Val></String>
          <I32><Name>idle</Name><Val>0</Val></I32>
        </Cluster>"#,
    );
    assert_eq!(descriptor.channel_count, 1);
    assert_eq!(descriptor.channel_names, vec!["DAPI"]);
}

#[test]
fn test_timeloop_count_excludes_starting_point() {
    let descriptor = parse(
        r#"<Cluster><I32><Name>timeloop count</Name><Val>5</Val></I32></Cluster>"#,
    );
    assert_eq!(descriptor.timepoints, 6);
}

#[test]
fn test_timeloop_real_is_absolute() {
    let descriptor = parse(
        r#"<Cluster><I32><Name>timeloop real</Name><Val>5</Val></I32></Cluster>"#,
    );
    assert_eq!(descriptor.timepoints, 5);
}

#[test]
fn test_later_timeloop_key_wins() {
    let descriptor = parse(
        r#"
        <Cluster>
          <I32><Name>timeloop count</Name><Val>5</Val></I32>
          <I32><Name>timeloop real</Name><Val>2</Val></I32>
        </Cluster>"#,
    );
    assert_eq!(descriptor.timepoints, 2);
}

#[test]
fn test_well_selection_alternates_numbers_and_labels() {
    let descriptor = parse(
        r#"
        <Array>
          <Name>well selection table + cDNA</Name>
          <String><Val>1</Val></String>
          <String><Val>A1</Val></String>
          <String><Val>2</Val></String>
          <String><Val>A2</Val></String>
          <String><Val>7</Val></String>
        </Array>"#,
    );
    assert_eq!(descriptor.well_count(), 3);
    assert_eq!(
        descriptor.wells,
        vec![
            DeclaredWell {
                number: 1,
                label: Some("A1".to_string())
            },
            DeclaredWell {
                number: 2,
                label: Some("A2".to_string())
            },
            DeclaredWell {
                number: 7,
                label: None
            },
        ]
    );
    assert_eq!(descriptor.labels().collect::<Vec<_>>(), vec!["A1", "A2"]);
}

#[test]
fn test_well_label_before_number_is_ignored() {
    let descriptor = parse(
        r#"
        <Array>
          <Name>well selection table + cDNA</Name>
          <String><Val>B4</Val></String>
          <String><Val>3</Val></String>
        </Array>"#,
    );
    assert_eq!(
        descriptor.wells,
        vec![DeclaredWell {
            number: 3,
            label: None
        }]
    );
}

#[test]
fn test_structural_counts() {
    let descriptor = parse(
        r#"
        <Cluster>
          <I32><Name>rows/well</Name><Val>2</Val></I32>
          <I32><Name>columns/well</Name><Val>3</Val></I32>
          <I32><Name># slices</Name><Val>4</Val></I32>
        </Cluster>"#,
    );
    assert_eq!(descriptor.field_rows, 2);
    assert_eq!(descriptor.field_columns, 3);
    assert_eq!(descriptor.field_count(), 6);
    assert_eq!(descriptor.slices, 4);
}

#[test]
fn test_plate_name_and_pixel_size() {
    let descriptor = parse(
        r#"
        <Cluster>
          <String><Name>plate name</Name><Val>Screen 12 &amp; 13</Val></String>
          <DBL><Name>conversion factor um/pixel</Name><Val>0.645</Val></DBL>
        </Cluster>"#,
    );
    assert_eq!(descriptor.plate_name.as_deref(), Some("Screen 12 & 13"));
    assert_eq!(descriptor.pixel_size, Some(0.645));
}

#[test]
fn test_non_numeric_count_is_fatal() {
    let mut ctx = ParseContext::new();
    let err = parse_descriptor(
        r#"<Cluster><I32><Name># slices</Name><Val>many</Val></I32></Cluster>"#,
        &mut ctx,
    )
    .unwrap_err();
    assert!(matches!(err, DescriptorError::InvalidNumber { .. }));
}

#[test]
fn test_negative_count_is_fatal() {
    let mut ctx = ParseContext::new();
    let err = parse_descriptor(
        r#"<Cluster><I32><Name>timeloop real</Name><Val>-2</Val></I32></Cluster>"#,
        &mut ctx,
    )
    .unwrap_err();
    assert!(matches!(err, DescriptorError::InvalidNumber { .. }));
}

#[test]
fn test_every_pair_reaches_pass_through_channel() {
    let descriptor = parse(
        r#"
        <Cluster>
          <String><Name>operator</Name><Val>jk</Val></String>
          <I32><Name># slices</Name><Val>2</Val></I32>
          <String><Name>comment</Name><Val>test run</Val></String>
        </Cluster>"#,
    );
    assert_eq!(
        descriptor.raw,
        vec![
            ("operator".to_string(), "jk".to_string()),
            ("# slices".to_string(), "2".to_string()),
            ("comment".to_string(), "test run".to_string()),
        ]
    );
}

#[test]
fn test_key_persists_across_values() {
    // array entries reuse the key declared once at the top of the array
    let descriptor = parse(
        r#"
        <Array>
          <Name>name</Name>
          <String><Val>DAPI</Val></String>
          <String><Val>GFP</Val></String>
        </Array>"#,
    );
    assert_eq!(descriptor.channel_names, vec!["DAPI", "GFP"]);
}

#[test]
fn test_value_without_key_is_ignored() {
    let descriptor = parse(r#"<Cluster><String><Val>orphan</Val></String></Cluster>"#);
    assert!(descriptor.raw.is_empty());
}

#[test]
fn test_latin1_descriptor_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("experiment_descriptor.xml");
    // 0xE9 is "é" in ISO-8859-1 and invalid UTF-8 on its own
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"<Cluster><String><Name>plate name</Name><Val>caf");
    bytes.push(0xe9);
    bytes.extend_from_slice(b"</Val></String></Cluster>");
    std::fs::write(&path, bytes).unwrap();

    let mut ctx = ParseContext::new();
    parse_descriptor_file(&path, &mut ctx).unwrap();
    let descriptor = ctx.finish();
    assert_eq!(descriptor.plate_name.as_deref(), Some("caf\u{e9}"));
}
