use std::path::Path;

use crate::error::Error;

/// One data row of the input table: the zero-based row index plus the header
/// name / trimmed value pairs, in file order. Read-only to the renderer.
#[derive(Debug, Clone)]
pub struct Record {
    index: usize,
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn index(&self) -> usize {
        self.index
    }

    /// The first non-empty value among the given column names. The input
    /// tables have seen two spellings for some columns (underscore and dot
    /// separated), so lookups take alternates.
    pub fn get(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .filter_map(|name| {
                self.fields
                    .iter()
                    .find(|(field, _)| field == name)
                    .map(|(_, value)| value.as_str())
            })
            .find(|value| !value.is_empty())
    }

    /// Like [`Record::get`] for a single name, but a missing or empty value
    /// is an error naming the field and the record.
    pub fn require(&self, name: &str) -> Result<&str, Error> {
        self.get(&[name]).ok_or_else(|| Error::MissingField {
            field: name.to_string(),
            record: self.index,
        })
    }
}

/// Guess the field delimiter from the header line. The project has seen two
/// CSV flavors: the original semicolon-separated export and a cleaned
/// comma-separated one; a header like `taxon,biogeographische.region` must
/// not be mistaken for semicolon-separated just because a later field
/// contains one.
fn sniff_delimiter(first_line: &str) -> u8 {
    let before_first_semicolon = first_line.split(';').next().unwrap_or(first_line);
    if first_line.contains(';') && !before_first_semicolon.contains(',') {
        b';'
    } else {
        b','
    }
}

/// Read the table at `csv_path` into a list of [`Record`]s.
///
/// The file is expected to carry a header row. A UTF-8 byte order mark on
/// the first header is tolerated, values are trimmed, and the delimiter is
/// sniffed from the header line.
pub fn load_records(csv_path: &Path) -> Result<Vec<Record>, Error> {
    log::info!("Loading CSV data from {:?}", csv_path);

    let contents = std::fs::read_to_string(csv_path)
        .map_err(|error| Error::io("Failed to read the input table", csv_path, error))?;
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(&contents);

    let delimiter = sniff_delimiter(contents.lines().next().unwrap_or_default());

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(contents.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let fields = headers
            .iter()
            .cloned()
            .zip(row.iter().map(|value| value.trim().to_string()))
            .collect();
        records.push(Record { index, fields });
    }

    log::info!("Loaded {} rows from the CSV", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_delimiter_is_sniffed_from_the_header() {
        assert_eq!(sniff_delimiter("taxon;biogeographische_region"), b';');
        assert_eq!(
            sniff_delimiter("taxon,biogeographische.region,Autor_Jahr"),
            b','
        );
        // A comma before the first semicolon means the commas delimit.
        assert_eq!(sniff_delimiter("taxon,notes;extra"), b',');
        assert_eq!(sniff_delimiter("taxon"), b',');
    }

    fn record(fields: &[(&str, &str)]) -> Record {
        Record {
            index: 3,
            fields: fields
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }

    #[test]
    fn get_prefers_the_first_non_empty_alternate() {
        let row = record(&[
            ("biogeographische_region", ""),
            ("biogeographische.region", "PA"),
        ]);
        assert_eq!(
            row.get(&["biogeographische_region", "biogeographische.region"]),
            Some("PA")
        );
    }

    #[test]
    fn require_reports_the_field_and_the_record_index() {
        let row = record(&[("taxon", "")]);
        match row.require("taxon") {
            Err(Error::MissingField { field, record }) => {
                assert_eq!(field, "taxon");
                assert_eq!(record, 3);
            }
            other => panic!("expected a MissingField error, got {:?}", other),
        }
    }
}
