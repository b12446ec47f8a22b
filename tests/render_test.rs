use etiketten::labels::{EtiquetteSpec, TrayLabel};
use etiketten::render::{render_etiquettes, render_tray_labels, EtiquetteStyle};
use lopdf::content::Content;
use time::OffsetDateTime;

/// Reload a rendered document and count its pages and `Tj` (draw text)
/// operations across all content streams.
fn pages_and_text_operations(bytes: &[u8]) -> (usize, usize) {
    let mut document = lopdf::Document::load_mem(bytes).unwrap();
    document.decompress();

    let pages = document.get_pages();
    let mut text_operations = 0;
    for page_id in pages.values() {
        let content_data = document.get_page_content(*page_id).unwrap();
        let content = Content::decode(&content_data).unwrap();
        text_operations += content
            .operations
            .iter()
            .filter(|operation| operation.operator == "Tj")
            .count();
    }
    (pages.len(), text_operations)
}

/// A spec that draws exactly one text: no underline, no author note.
fn single_text_spec(name: &str) -> EtiquetteSpec {
    EtiquetteSpec {
        region_code: String::new(),
        main_text: name.to_string(),
        underline: false,
        author_text: String::new(),
    }
}

#[test]
fn zero_records_produce_a_valid_pdf_with_no_label_draws() {
    let canvas = render_etiquettes(&[], &EtiquetteStyle::default()).unwrap();
    let bytes = canvas.save_to_bytes().unwrap();
    let (pages, text_operations) = pages_and_text_operations(&bytes);
    assert_eq!(pages, 1);
    assert_eq!(text_operations, 0);
}

#[test]
fn one_label_more_than_a_full_grid_starts_a_second_page() {
    let style = EtiquetteStyle::default();
    let per_page = style.layout().labels_per_page();

    let specs: Vec<EtiquetteSpec> = (0..per_page + 1)
        .map(|index| single_text_spec(&format!("species{}", index)))
        .collect();

    let canvas = render_etiquettes(&specs, &style).unwrap();
    let bytes = canvas.save_to_bytes().unwrap();
    let (pages, text_operations) = pages_and_text_operations(&bytes);
    assert_eq!(pages, 2);
    // One draw-text call per input record, exactly.
    assert_eq!(text_operations, per_page + 1);
}

#[test]
fn a_full_grid_stays_on_one_page() {
    let style = EtiquetteStyle::default();
    let per_page = style.layout().labels_per_page();

    let specs: Vec<EtiquetteSpec> = (0..per_page)
        .map(|index| single_text_spec(&format!("species{}", index)))
        .collect();

    let canvas = render_etiquettes(&specs, &style).unwrap();
    let bytes = canvas.save_to_bytes().unwrap();
    let (pages, text_operations) = pages_and_text_operations(&bytes);
    assert_eq!(pages, 1);
    assert_eq!(text_operations, per_page);
}

#[test]
fn underline_and_author_draw_on_top_of_the_main_text() {
    let specs = vec![EtiquetteSpec {
        region_code: "PA".into(),
        main_text: "viridis".into(),
        underline: true,
        author_text: "Linnaeus, 1758".into(),
    }];
    let canvas = render_etiquettes(&specs, &EtiquetteStyle::default()).unwrap();
    let bytes = canvas.save_to_bytes().unwrap();
    let (pages, text_operations) = pages_and_text_operations(&bytes);
    assert_eq!(pages, 1);
    // Main word plus author note.
    assert_eq!(text_operations, 2);
}

#[test]
fn seventeen_tray_labels_spill_onto_a_second_page() {
    // The tray grid holds 16 labels per page.
    let tray_labels: Vec<TrayLabel> = (0..17)
        .map(|index| TrayLabel {
            genus: format!("Genus{}", index),
            epithet: String::new(),
            author: String::new(),
            region: "PA".into(),
        })
        .collect();

    let canvas = render_tray_labels(&tray_labels).unwrap();
    let bytes = canvas.save_to_bytes().unwrap();
    let (pages, text_operations) = pages_and_text_operations(&bytes);
    assert_eq!(pages, 2);
    assert_eq!(text_operations, 17);
}

#[test]
fn rendering_is_reproducible_with_a_pinned_creation_date() {
    let specs = vec![
        single_text_spec("viridis"),
        single_text_spec("rubiginosa"),
        single_text_spec("vibex"),
    ];

    let render_once = || {
        let mut canvas = render_etiquettes(&specs, &EtiquetteStyle::default()).unwrap();
        canvas.set_creation_date(OffsetDateTime::UNIX_EPOCH);
        canvas.save_to_bytes().unwrap()
    };

    similar_asserts::assert_eq!(render_once(), render_once());
}
