use std::path::PathBuf;

use etiketten::error::Error;
use etiketten::labels::{build_etiquette_specs, build_tray_labels};
use etiketten::records::load_records;
use etiketten::render::{render_etiquettes, EtiquetteStyle};

/// Write a CSV fixture to a unique path under the system temporary
/// directory and hand it to the test body; the file is removed afterwards.
fn with_csv_fixture<R>(name: &str, contents: &str, body: impl FnOnce(&PathBuf) -> R) -> R {
    let path = std::env::temp_dir().join(format!("etiketten-{}-{}.csv", std::process::id(), name));
    std::fs::write(&path, contents).unwrap();
    let result = body(&path);
    let _ = std::fs::remove_file(&path);
    result
}

#[test]
fn the_semicolon_flavor_with_a_byte_order_mark_loads() {
    let contents = "\u{feff}taxon;biogeographische_region\r\nCassida viridis;PA\r\n";
    with_csv_fixture("semicolon", contents, |path| {
        let records = load_records(path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get(&["taxon"]), Some("Cassida viridis"));
        assert_eq!(records[0].get(&["biogeographische_region"]), Some("PA"));

        let specs = build_etiquette_specs(&records).unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].main_text, "viridis");
        assert!(specs[0].underline);
    })
}

#[test]
fn the_comma_flavor_with_an_author_column_loads() {
    let contents = "taxon,biogeographische.region,Autor_Jahr\n\
                    Cassida nebulosa orientalis,AS,\"Weise, 1891\"\n";
    with_csv_fixture("comma", contents, |path| {
        let records = load_records(path).unwrap();
        assert_eq!(records.len(), 1);

        // Three-word taxa yield two etiquettes.
        let specs = build_etiquette_specs(&records).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[1].author_text, "Weise, 1891");

        // The tray builder reads the dotted region spelling too.
        let tray_labels = build_tray_labels(&records).unwrap();
        assert_eq!(tray_labels[0].genus, "Cassida");
        assert_eq!(tray_labels[0].epithet, "nebulosa orientalis");
        assert_eq!(tray_labels[0].region, "AS");
    })
}

#[test]
fn a_missing_taxon_column_aborts_without_leaving_an_output_file() {
    let contents = "name,region\nsomething,PA\n";
    with_csv_fixture("missing-column", contents, |path| {
        let output_path = std::env::temp_dir().join(format!(
            "etiketten-{}-missing-column-output.pdf",
            std::process::id()
        ));

        // The same pipeline the binary runs: load, build, render, save.
        let run = || -> Result<(), Error> {
            let records = load_records(path)?;
            let specs = build_etiquette_specs(&records)?;
            let canvas = render_etiquettes(&specs, &EtiquetteStyle::default())?;
            canvas.save(&output_path)
        };

        match run() {
            Err(Error::MissingField { field, record }) => {
                assert_eq!(field, "taxon");
                assert_eq!(record, 0);
            }
            other => panic!("expected a MissingField error, got {:?}", other),
        }
        assert!(!output_path.exists());
    })
}

#[test]
fn a_header_only_file_yields_no_records() {
    let contents = "taxon,biogeographische_region,Autor_Jahr\n";
    with_csv_fixture("header-only", contents, |path| {
        let records = load_records(path).unwrap();
        assert!(records.is_empty());
    })
}

#[test]
fn a_nonexistent_path_is_an_io_error_naming_the_path() {
    let path = std::env::temp_dir().join("etiketten-does-not-exist.csv");
    match load_records(&path) {
        Err(Error::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected an Io error, got {:?}", other),
    }
}
