use crate::canvas::Color;
use crate::error::Error;
use crate::records::Record;

/// The column names the builders read. The region column has two spellings
/// depending on which CSV flavor produced the file.
const TAXON_FIELD: &str = "taxon";
const REGION_FIELDS: [&str; 2] = ["biogeographische_region", "biogeographische.region"];
const AUTHOR_FIELD: &str = "Autor_Jahr";

/// Concrete drawing instructions for one etiquette. This is the
/// render-ready form after the word rules have been applied to a CSV row;
/// keeping it small and explicit keeps the rendering step simple.
#[derive(Debug, Clone, PartialEq)]
pub struct EtiquetteSpec {
    pub region_code: String,
    pub main_text: String,
    pub underline: bool,
    pub author_text: String,
}

/// The background color of an etiquette for a faunal region code. The CMYK
/// values come from the original museum templates; Europe (`PA`) and unknown
/// codes fall back to a white field.
pub fn etiquette_region_color(region_code: &str) -> Color {
    match region_code {
        "AF" => Color::Cmyk(0.0, 1.0, 1.0, 0.0),
        "AS" => Color::Cmyk(1.0, 0.0, 1.0, 0.0),
        "O" => Color::rgb8(0x21, 0x53, 0x94),
        "NW" => Color::Cmyk(0.0, 0.0, 1.0, 0.0),
        _ => Color::WHITE,
    }
}

/// Derive one or two etiquettes from a taxon string.
///
/// - Exactly two words (genus species): one label showing the epithet, bold
///   and underlined, with the author note.
/// - Exactly three words (genus species subspecies): two labels sharing the
///   region color; the species epithet underlined without the author, the
///   subspecies epithet plain with it.
/// - Anything else: one label with the whole normalized taxon, no underline,
///   so imperfect input degrades instead of failing.
pub fn specs_from_taxon(taxon: &str, region_code: &str, author: &str, out: &mut Vec<EtiquetteSpec>) {
    // Collapse runs of whitespace so word counting is reliable.
    let normalized: Vec<&str> = taxon.split_whitespace().collect();

    match normalized[..] {
        [_, species] => out.push(EtiquetteSpec {
            region_code: region_code.to_string(),
            main_text: species.to_string(),
            underline: true,
            author_text: author.to_string(),
        }),
        [_, species, subspecies] => {
            out.push(EtiquetteSpec {
                region_code: region_code.to_string(),
                main_text: species.to_string(),
                underline: true,
                author_text: String::new(),
            });
            out.push(EtiquetteSpec {
                region_code: region_code.to_string(),
                main_text: subspecies.to_string(),
                underline: false,
                author_text: author.to_string(),
            });
        }
        _ => out.push(EtiquetteSpec {
            region_code: region_code.to_string(),
            main_text: normalized.join(" "),
            underline: false,
            author_text: author.to_string(),
        }),
    }
}

/// Convert CSV rows into a flat list of etiquette specifications. Fails on
/// the first row without a `taxon` value.
pub fn build_etiquette_specs(records: &[Record]) -> Result<Vec<EtiquetteSpec>, Error> {
    let mut specs = Vec::with_capacity(records.len());
    for record in records {
        let taxon = record.require(TAXON_FIELD)?;
        let region_code = record.get(&REGION_FIELDS).unwrap_or_default();
        let author = record.get(&[AUTHOR_FIELD]).unwrap_or_default();
        specs_from_taxon(taxon, region_code, author, &mut specs);
    }
    log::info!(
        "Built {} etiquette specs from {} records",
        specs.len(),
        records.len()
    );
    Ok(specs)
}

/// The content of one unit-tray label.
#[derive(Debug, Clone, PartialEq)]
pub struct TrayLabel {
    pub genus: String,
    pub epithet: String,
    pub author: String,
    pub region: String,
}

/// The stripe order at the right edge of every unit-tray label. Only the
/// stripe matching the record's region is filled with its color.
pub const BAR_ORDER: [&str; 5] = ["PA", "AS", "NW", "AF", "O"];

/// The stripe color for a region code on the unit-tray template.
pub fn tray_region_color(region_code: &str) -> Option<Color> {
    match region_code {
        "AF" => Some(Color::rgb8(0xC8, 0x10, 0x2E)),
        "NW" => Some(Color::rgb8(0xFF, 0xCD, 0x00)),
        "AS" => Some(Color::rgb8(0x1B, 0x8A, 0x3F)),
        "O" => Some(Color::rgb8(0x1F, 0x5F, 0xAE)),
        "PA" => Some(Color::BLACK),
        _ => None,
    }
}

/// Split a taxon into the capitalized genus and the lowercased epithet part
/// (up to two words beyond the genus, joined).
pub fn parse_taxon(taxon: &str) -> (String, String) {
    let words: Vec<&str> = taxon.split_whitespace().collect();
    let Some((genus, rest)) = words.split_first() else {
        return (String::new(), String::new());
    };

    let mut genus_characters = genus.chars();
    let genus = match genus_characters.next() {
        Some(first) => first.to_uppercase().chain(genus_characters).collect(),
        None => String::new(),
    };

    let epithet = rest
        .iter()
        .take(2)
        .map(|word| word.to_lowercase())
        .collect::<Vec<String>>()
        .join(" ");

    (genus, epithet)
}

/// Convert CSV rows into unit-tray labels. Fails on the first row without a
/// `taxon` value; region codes are uppercased to match the stripe table.
pub fn build_tray_labels(records: &[Record]) -> Result<Vec<TrayLabel>, Error> {
    let mut labels = Vec::with_capacity(records.len());
    for record in records {
        let taxon = record.require(TAXON_FIELD)?;
        let (genus, epithet) = parse_taxon(taxon);
        let author = record.get(&[AUTHOR_FIELD]).unwrap_or_default().to_string();
        let region = record
            .get(&REGION_FIELDS)
            .unwrap_or_default()
            .to_uppercase();
        labels.push(TrayLabel {
            genus,
            epithet,
            author,
            region,
        });
    }
    log::info!("Built {} tray labels", labels.len());
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_word_taxa_yield_one_underlined_label() {
        let mut specs = Vec::new();
        specs_from_taxon("Cassida viridis", "PA", "Linnaeus, 1758", &mut specs);
        assert_eq!(
            specs,
            vec![EtiquetteSpec {
                region_code: "PA".into(),
                main_text: "viridis".into(),
                underline: true,
                author_text: "Linnaeus, 1758".into(),
            }]
        );
    }

    #[test]
    fn three_word_taxa_yield_two_labels_sharing_the_region() {
        let mut specs = Vec::new();
        specs_from_taxon("Cassida nebulosa orientalis", "AS", "Weise, 1891", &mut specs);
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].main_text, "nebulosa");
        assert!(specs[0].underline);
        assert_eq!(specs[0].author_text, "");
        assert_eq!(specs[1].main_text, "orientalis");
        assert!(!specs[1].underline);
        assert_eq!(specs[1].author_text, "Weise, 1891");
        assert_eq!(specs[0].region_code, specs[1].region_code);
    }

    #[test]
    fn other_word_counts_fall_back_to_the_normalized_taxon() {
        let mut specs = Vec::new();
        specs_from_taxon("  Cassida   viridis  extra words ", "", "", &mut specs);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].main_text, "Cassida viridis extra words");
        assert!(!specs[0].underline);
    }

    #[test]
    fn taxa_parse_into_capitalized_genus_and_lowercased_epithet() {
        assert_eq!(
            parse_taxon("cassida Nebulosa ORIENTALIS"),
            ("Cassida".to_string(), "nebulosa orientalis".to_string())
        );
        assert_eq!(parse_taxon("Cassida"), ("Cassida".to_string(), String::new()));
        assert_eq!(parse_taxon("   "), (String::new(), String::new()));
    }

    #[test]
    fn unknown_regions_get_a_white_field_and_no_stripe() {
        assert_eq!(etiquette_region_color("??"), Color::WHITE);
        assert_eq!(etiquette_region_color("PA"), Color::WHITE);
        assert_eq!(tray_region_color("??"), None);
    }
}
