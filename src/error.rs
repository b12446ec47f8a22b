use std::path::PathBuf;

/// The error type used throughout this crate.
///
/// Only two conditions originate here: a layout whose grid can hold no labels
/// (`Configuration`) and a record which lacks a field the renderer needs
/// (`MissingField`). Everything else is a propagated failure from the
/// collaborating libraries, wrapped so that the binaries can report a single
/// readable message and exit nonzero.
#[derive(Debug)]
pub enum Error {
    /// The layout parameters describe a degenerate grid.
    Configuration { reason: String },
    /// A record is missing a field required for rendering. The record index
    /// is zero-based and counts data rows, not file lines.
    MissingField { field: String, record: usize },
    /// Reading or writing a file failed.
    Io {
        context: String,
        path: PathBuf,
        source: std::io::Error,
    },
    /// The input table could not be parsed.
    Csv(csv::Error),
    /// The underlying PDF library rejected an operation.
    Pdf(lopdf::Error),
}

impl Error {
    /// Create a `Configuration` error with the given reason.
    pub fn configuration<S: Into<String>>(reason: S) -> Error {
        Error::Configuration {
            reason: reason.into(),
        }
    }

    /// Wrap an I/O error together with the operation and the path it failed on.
    pub fn io<S: Into<String>, P: Into<PathBuf>>(
        context: S,
        path: P,
        source: std::io::Error,
    ) -> Error {
        Error::Io {
            context: context.into(),
            path: path.into(),
            source,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Configuration { reason } => {
                write!(formatter, "Invalid layout configuration: {}", reason)
            }
            Error::MissingField { field, record } => {
                write!(
                    formatter,
                    "Record {} is missing the required field {:?}",
                    record, field
                )
            }
            Error::Io {
                context,
                path,
                source,
            } => write!(
                formatter,
                "{} {:?}: {}",
                context,
                path,
                minimize_first_letter(source.to_string())
            ),
            Error::Csv(source) => write!(
                formatter,
                "Unable to parse the input table: {}",
                minimize_first_letter(source.to_string())
            ),
            Error::Pdf(source) => write!(
                formatter,
                "Unable to assemble the PDF document: {}",
                minimize_first_letter(source.to_string())
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            Error::Csv(source) => Some(source),
            Error::Pdf(source) => Some(source),
            _ => None,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Error {
        Error::Csv(error)
    }
}

impl From<lopdf::Error> for Error {
    fn from(error: lopdf::Error) -> Error {
        Error::Pdf(error)
    }
}

/// Minimizes the first letter of a string, it is used for standardizing the error message.
fn minimize_first_letter(string: String) -> String {
    let mut characters = string.chars();
    match characters.next() {
        None => String::new(),
        Some(character) => character.to_lowercase().chain(characters).collect(),
    }
}
