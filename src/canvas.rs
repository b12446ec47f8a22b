use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, Stream};
use time::OffsetDateTime;

use crate::error::Error;
use crate::fonts::{self, BuiltinFont};

/// A fill or stroke color in one of the color spaces the labels use. The
/// historic museum templates specify their region fields in CMYK, the more
/// recent ones in RGB, so both are kept as-is instead of converting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Rgb(f32, f32, f32),
    Cmyk(f32, f32, f32, f32),
    Gray(f32),
}

impl Color {
    pub const WHITE: Color = Color::Gray(1.0);
    pub const BLACK: Color = Color::Gray(0.0);

    /// An RGB color from the usual 8-bit-per-channel notation.
    pub fn rgb8(red: u8, green: u8, blue: u8) -> Color {
        Color::Rgb(
            red as f32 / 255.0,
            green as f32 / 255.0,
            blue as f32 / 255.0,
        )
    }

    fn operands(&self) -> Vec<Object> {
        match *self {
            Color::Rgb(red, green, blue) => vec![red.into(), green.into(), blue.into()],
            Color::Cmyk(cyan, magenta, yellow, key) => {
                vec![cyan.into(), magenta.into(), yellow.into(), key.into()]
            }
            Color::Gray(level) => vec![level.into()],
        }
    }

    fn fill_operator(&self) -> &'static str {
        match self {
            Color::Rgb(..) => "rg",
            Color::Cmyk(..) => "k",
            Color::Gray(..) => "g",
        }
    }

    fn stroke_operator(&self) -> &'static str {
        match self {
            Color::Rgb(..) => "RG",
            Color::Cmyk(..) => "K",
            Color::Gray(..) => "G",
        }
    }
}

/// One page worth of buffered content operations.
#[derive(Debug, Clone, Default)]
struct Page {
    operations: Vec<Operation>,
}

/// A drawing surface over `lopdf`: absolute x/y coordinates in points, the
/// origin at the bottom-left of the page, text and rectangles placed one
/// draw call at a time.
///
/// Pages are buffered as operation lists and only assembled into a
/// `lopdf::Document` when saving. All pages share one size and one resource
/// dictionary carrying the three built-in Helvetica faces.
pub struct Canvas {
    page_width: f32,
    page_height: f32,
    title: String,
    creation_date: OffsetDateTime,
    pages: Vec<Page>,
}

impl Canvas {
    pub fn new<S: Into<String>>(title: S, page_width: f32, page_height: f32) -> Canvas {
        Canvas {
            page_width,
            page_height,
            title: title.into(),
            creation_date: OffsetDateTime::now_utc(),
            pages: Vec::new(),
        }
    }

    /// Pin the document timestamps, which makes the output byte-for-byte
    /// reproducible. Used by the tests.
    pub fn set_creation_date(&mut self, creation_date: OffsetDateTime) {
        self.creation_date = creation_date;
    }

    /// Start a new, empty page. Subsequent draw calls land on it.
    pub fn begin_page(&mut self) {
        self.pages.push(Page::default());
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn operations_mut(&mut self) -> &mut Vec<Operation> {
        // Drawing on a canvas without a page starts the first one.
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last].operations
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.operations_mut()
            .push(Operation::new(color.fill_operator(), color.operands()));
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.operations_mut()
            .push(Operation::new(color.stroke_operator(), color.operands()));
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.operations_mut()
            .push(Operation::new("w", vec![width.into()]));
    }

    /// A rectangle with its bottom-left corner at `(x, y)`, painted with the
    /// current fill and/or stroke color.
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: bool, stroke: bool) {
        let paint = match (fill, stroke) {
            (true, true) => "B",
            (true, false) => "f",
            (false, true) => "S",
            (false, false) => "n",
        };
        let operations = self.operations_mut();
        operations.push(Operation::new(
            "re",
            vec![x.into(), y.into(), width.into(), height.into()],
        ));
        operations.push(Operation::new(paint, vec![]));
    }

    /// A straight line stroked with the current color and line width.
    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        let operations = self.operations_mut();
        operations.push(Operation::new("m", vec![x0.into(), y0.into()]));
        operations.push(Operation::new("l", vec![x1.into(), y1.into()]));
        operations.push(Operation::new("S", vec![]));
    }

    /// Draw text with its baseline starting at `(x, y)`, filled with the
    /// current fill color. The text is WinAnsi-encoded; see
    /// [`fonts::encode_win_ansi`] for how unmappable characters degrade.
    pub fn draw_text(&mut self, font: BuiltinFont, font_size: f32, x: f32, y: f32, text: &str) {
        let encoded = fonts::encode_win_ansi(text);
        let operations = self.operations_mut();
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![font.resource_name().into(), font_size.into()],
        ));
        operations.push(Operation::new("Td", vec![x.into(), y.into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encoded)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }

    /// Draw text so that its baseline ends at `(x_right, y)`.
    pub fn draw_text_right(
        &mut self,
        font: BuiltinFont,
        font_size: f32,
        x_right: f32,
        y: f32,
        text: &str,
    ) {
        let text_width = fonts::string_width(text, font, font_size);
        self.draw_text(font, font_size, x_right - text_width, y, text);
    }

    /// Draw text centered around `center_x`.
    pub fn draw_text_centered(
        &mut self,
        font: BuiltinFont,
        font_size: f32,
        center_x: f32,
        y: f32,
        text: &str,
    ) {
        let text_width = fonts::string_width(text, font, font_size);
        self.draw_text(font, font_size, center_x - text_width / 2.0, y, text);
    }

    /// Assemble the buffered pages into a finished PDF document in memory.
    /// A canvas that never began a page still yields one empty page, so the
    /// output is always a document a viewer can open.
    pub fn save_to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut document = lopdf::Document::with_version("1.5");
        let pages_id = document.new_object_id();

        // The three base-14 faces, registered once and shared by all pages.
        let mut font_dictionary = lopdf::Dictionary::new();
        for font in BuiltinFont::all() {
            let font_id = document.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.postscript_name(),
                "Encoding" => "WinAnsiEncoding",
            });
            font_dictionary.set(font.resource_name(), Object::Reference(font_id));
        }
        let resources_id = document.add_object(dictionary! {
            "Font" => Object::Dictionary(font_dictionary),
        });

        let empty_page = [Page::default()];
        let pages: &[Page] = if self.pages.is_empty() {
            &empty_page
        } else {
            &self.pages
        };

        let mut page_ids = Vec::<Object>::new();
        for page in pages {
            let content = Content {
                operations: page.operations.clone(),
            };
            let content_id = document.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = document.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "Contents" => Object::Reference(content_id),
            });
            page_ids.push(page_id.into());
        }

        let page_count = pages.len() as i64;
        let pages_dictionary = dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids,
            "Count" => page_count,
            "Resources" => Object::Reference(resources_id),
            "MediaBox" => vec![
                0.into(),
                0.into(),
                self.page_width.into(),
                self.page_height.into(),
            ],
        };
        document
            .objects
            .insert(pages_id, Object::Dictionary(pages_dictionary));

        let timestamp = pdf_timestamp(&self.creation_date);
        let info_id = document.add_object(dictionary! {
            "Title" => Object::string_literal(self.title.clone()),
            "Creator" => Object::string_literal("etiketten"),
            "Producer" => Object::string_literal("etiketten"),
            "CreationDate" => Object::string_literal(timestamp.clone()),
            "ModDate" => Object::string_literal(timestamp),
        });

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        document.trailer.set("Root", catalog_id);
        document.trailer.set("Info", info_id);
        document.compress();

        let mut buffer = Vec::new();
        document.save_to(&mut buffer).map_err(|error| {
            Error::io(
                "Failed to serialize the document",
                "<memory>",
                std::io::Error::new(std::io::ErrorKind::Other, error.to_string()),
            )
        })?;
        Ok(buffer)
    }

    /// Save the document to `path`. The bytes go to a sibling temporary file
    /// first and are renamed into place on success, so a failed run never
    /// leaves a truncated document at the target path.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let bytes = self.save_to_bytes()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|error| {
                    Error::io("Failed to create the output directory", parent, error)
                })?;
            }
        }

        let mut temporary = path.as_os_str().to_owned();
        temporary.push(".tmp");
        let temporary = PathBuf::from(temporary);
        std::fs::write(&temporary, &bytes)
            .map_err(|error| Error::io("Failed to write the output file", &temporary, error))?;
        std::fs::rename(&temporary, path).map_err(|error| {
            Error::io("Failed to move the output file into place", path, error)
        })?;

        log::info!("Saved {} bytes to {:?}", bytes.len(), path);
        Ok(())
    }
}

/// Render a date in the `D:YYYYMMDDHHmmSS` form the PDF `Info` dictionary
/// expects. The canvas only ever holds UTC dates, hence the fixed offset.
fn pdf_timestamp(date: &OffsetDateTime) -> String {
    format!(
        "D:{:04}{:02}{:02}{:02}{:02}{:02}+00'00'",
        date.year(),
        u8::from(date.month()),
        date.day(),
        date.hour(),
        date.minute(),
        date.second()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn an_empty_canvas_still_produces_a_one_page_document() {
        let canvas = Canvas::new("Empty", 595.0, 842.0);
        let bytes = canvas.save_to_bytes().unwrap();
        let document = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(document.get_pages().len(), 1);
    }

    #[test]
    fn pages_accumulate_in_order() {
        let mut canvas = Canvas::new("Pages", 595.0, 842.0);
        canvas.begin_page();
        canvas.begin_page();
        canvas.begin_page();
        let bytes = canvas.save_to_bytes().unwrap();
        let document = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(document.get_pages().len(), 3);
    }

    #[test]
    fn timestamps_follow_the_pdf_format() {
        assert_eq!(
            pdf_timestamp(&OffsetDateTime::UNIX_EPOCH),
            "D:19700101000000+00'00'"
        );
    }
}
