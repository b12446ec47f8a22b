use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, Color};
use crate::error::Error;
use crate::fonts::{self, BuiltinFont};
use crate::labels::{
    self, EtiquetteSpec, TrayLabel, BAR_ORDER,
};
use crate::layout::{GridPlanner, LayoutConfiguration, Margins, A4_HEIGHT, A4_WIDTH};

// Exact inner white box dimensions extracted from the template PDFs, in
// points. The white rectangle is centered within each cell to reproduce the
// look of the historic labels; adjust rows/columns or margins for larger
// labels, not these.
pub const EXACT_INNER_WIDTH: f32 = 80.787;
pub const EXACT_INNER_HEIGHT: f32 = 34.016;
/// Thickness of the black border on Europe (`PA`) etiquettes.
const EUROPE_STROKE_WIDTH: f32 = 3.0;
/// Hard floor for the per-label downscaled font size.
const MINIMUM_NAME_FONT_SIZE: f32 = 4.0;

/// The tunable layout parameters of the etiquette sheet, loadable from a
/// JSON file. The defaults reproduce the museum sheet: 17 rows by 6 columns
/// on A4 with 20 pt margins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EtiquetteStyle {
    pub rows: usize,
    pub columns: usize,
    pub margins: Margins,
    pub name_font_size: f32,
    pub author_font_size: f32,
    pub padding_x: f32,
    pub padding_y: f32,
    pub underline_offset: f32,
}

impl Default for EtiquetteStyle {
    fn default() -> EtiquetteStyle {
        EtiquetteStyle {
            rows: 17,
            columns: 6,
            margins: Margins::uniform(20.0),
            name_font_size: 12.0,
            author_font_size: 6.0,
            padding_x: 6.0,
            padding_y: 6.0,
            underline_offset: 2.0,
        }
    }
}

impl EtiquetteStyle {
    pub fn from_path(style_file_path: &PathBuf) -> Result<EtiquetteStyle, Error> {
        let style_file_contents = std::fs::read_to_string(style_file_path)
            .map_err(|error| Error::io("Failed to read the style file", style_file_path, error))?;
        let style: EtiquetteStyle = serde_json::from_str(&style_file_contents).map_err(|error| {
            Error::io(
                "Failed to parse the style file",
                style_file_path,
                std::io::Error::new(std::io::ErrorKind::InvalidData, error),
            )
        })?;
        Ok(style)
    }

    /// The grid this style tiles an A4 page with.
    pub fn layout(&self) -> LayoutConfiguration {
        LayoutConfiguration::with_cells(A4_WIDTH, A4_HEIGHT, self.margins, self.columns, self.rows)
    }
}

/// Reduce the font size if the text does not fit `max_width`, keeping a
/// sensible minimum.
fn fit_font_size(
    text: &str,
    font: BuiltinFont,
    base_size: f32,
    max_width: f32,
    min_size: f32,
) -> f32 {
    if text.is_empty() {
        return base_size;
    }
    let width = fonts::string_width(text, font, base_size);
    if width <= max_width || width <= 0.0 {
        return base_size;
    }
    (base_size * max_width / width).max(min_size)
}

/// Begin pages until `page` exists, so the placement's draw calls land on
/// the right one. Placements arrive in increasing page order.
fn begin_pages_through(canvas: &mut Canvas, page: usize) {
    while canvas.page_count() <= page {
        canvas.begin_page();
    }
}

/// Render all etiquettes onto as many A4 pages as needed.
///
/// For each spec, in order: paint the region-colored field over the whole
/// cell, center the template-exact white box (stroked black for Europe),
/// draw the bold main word left-aligned and shrunk only when it would
/// overflow, underline it when asked, and place the author note in the lower
/// right of the box.
pub fn render_etiquettes(
    specs: &[EtiquetteSpec],
    style: &EtiquetteStyle,
) -> Result<Canvas, Error> {
    let layout = style.layout();
    let planner = layout.planner()?;
    let mut canvas = Canvas::new("Etiketten", layout.page_width, layout.page_height);

    log::info!(
        "Rendering {} etiquettes, {} per page",
        specs.len(),
        layout.labels_per_page()
    );

    let cell_width = layout.label_width;
    let cell_height = layout.label_height;
    let max_text_width = (EXACT_INNER_WIDTH - 2.0 * style.padding_x) * 0.95;

    for (spec, placement) in specs.iter().zip(planner) {
        begin_pages_through(&mut canvas, placement.page);

        // The colored field fills the whole cell; Europe stays white.
        let field_color = labels::etiquette_region_color(&spec.region_code);
        canvas.set_fill_color(field_color);
        canvas.rect(placement.x, placement.y, cell_width, cell_height, true, false);

        // The inner white box is always the same size, centered in the cell.
        let box_x = placement.x + (cell_width - EXACT_INNER_WIDTH) / 2.0;
        let box_y = placement.y + (cell_height - EXACT_INNER_HEIGHT) / 2.0;
        canvas.set_fill_color(Color::WHITE);
        if spec.region_code == "PA" {
            canvas.set_stroke_color(Color::BLACK);
            canvas.set_line_width(EUROPE_STROKE_WIDTH);
            canvas.rect(box_x, box_y, EXACT_INNER_WIDTH, EXACT_INNER_HEIGHT, true, true);
        } else {
            canvas.rect(box_x, box_y, EXACT_INNER_WIDTH, EXACT_INNER_HEIGHT, true, false);
        }

        if !spec.main_text.is_empty() {
            let font_size = fit_font_size(
                &spec.main_text,
                BuiltinFont::HelveticaBold,
                style.name_font_size,
                max_text_width,
                MINIMUM_NAME_FONT_SIZE,
            );
            let text_width =
                fonts::string_width(&spec.main_text, BuiltinFont::HelveticaBold, font_size);

            let text_x = box_x + style.padding_x;
            // Slightly below the geometric center of the box.
            let text_y = box_y + EXACT_INNER_HEIGHT / 2.0 - font_size * 0.3;
            canvas.set_fill_color(Color::BLACK);
            canvas.draw_text(
                BuiltinFont::HelveticaBold,
                font_size,
                text_x,
                text_y,
                &spec.main_text,
            );

            if spec.underline {
                // The underline spans exactly the measured word width.
                let underline_y = text_y - style.underline_offset;
                canvas.set_stroke_color(Color::BLACK);
                canvas.set_line_width(0.5);
                canvas.line(text_x, underline_y, text_x + text_width, underline_y);
            }
        }

        if !spec.author_text.is_empty() {
            canvas.set_fill_color(Color::BLACK);
            canvas.draw_text_right(
                BuiltinFont::Helvetica,
                style.author_font_size,
                box_x + EXACT_INNER_WIDTH - style.padding_x,
                box_y + style.padding_y - 1.5,
                &spec.author_text,
            );
        }
    }

    Ok(canvas)
}

// Layout constants from the unit-tray template.
pub const TRAY_LABEL_WIDTH: f32 = 261.0;
pub const TRAY_LABEL_HEIGHT: f32 = 92.0;
pub const TRAY_COLUMNS: usize = 2;
pub const TRAY_ROWS: usize = 8;
const TRAY_LEFT_MARGIN: f32 = 41.0;
const TRAY_TOP_MARGIN: f32 = 50.0;
const TRAY_TEXT_PADDING_X: f32 = 12.0;
const BAR_STRIPE_WIDTH: f32 = 5.0;
const BAR_AREA_WIDTH: f32 = BAR_STRIPE_WIDTH * BAR_ORDER.len() as f32;
const TRAY_BORDER_WIDTH: f32 = 1.0;
const TRAY_VERTICAL_SPACING: f32 = 4.0;

// Faces and sizes for the three text lines, balancing readability with the
// label height.
const LINE1_FONT: (BuiltinFont, f32) = (BuiltinFont::Helvetica, 16.0);
const LINE2_FONT: (BuiltinFont, f32) = (BuiltinFont::HelveticaOblique, 12.0);
const LINE3_FONT: (BuiltinFont, f32) = (BuiltinFont::Helvetica, 9.0);

/// The fixed unit-tray grid: 2 x 8 labels of 261 x 92 pt on A4.
pub fn tray_layout() -> LayoutConfiguration {
    LayoutConfiguration {
        page_width: A4_WIDTH,
        page_height: A4_HEIGHT,
        left_margin: TRAY_LEFT_MARGIN,
        top_margin: TRAY_TOP_MARGIN,
        label_width: TRAY_LABEL_WIDTH,
        label_height: TRAY_LABEL_HEIGHT,
        columns: TRAY_COLUMNS,
        rows: TRAY_ROWS,
    }
}

/// The vertical gap used to equally space the three baselines.
fn tray_line_gap(sizes: (f32, f32, f32)) -> f32 {
    let (line1, line2, line3) = sizes;
    let max_visible = [line1, line2, line3]
        .into_iter()
        .filter(|size| *size > 0.0)
        .fold(0.0_f32, f32::max);
    let max_visible = if max_visible > 0.0 {
        max_visible
    } else {
        LINE2_FONT.1
    };
    let desired_gap = max_visible + TRAY_VERTICAL_SPACING * 2.0;
    let max_gap = (TRAY_LABEL_HEIGHT / 2.0 - 6.0).max(4.0);
    desired_gap.min(max_gap)
}

/// Draw the five vertical region stripes at the label's right edge. All
/// stripe positions are painted so the template stays aligned; only the
/// stripe matching the label's region gets its color.
fn draw_region_stripes(canvas: &mut Canvas, x: f32, y: f32, region: &str) {
    let stripes_start_x = x + TRAY_LABEL_WIDTH - BAR_AREA_WIDTH;
    for (index, code) in BAR_ORDER.iter().enumerate() {
        let stripe_x = stripes_start_x + index as f32 * BAR_STRIPE_WIDTH;
        let fill_color = if *code == region {
            labels::tray_region_color(code).unwrap_or(Color::WHITE)
        } else {
            Color::WHITE
        };
        canvas.set_fill_color(fill_color);
        canvas.rect(stripe_x, y, BAR_STRIPE_WIDTH, TRAY_LABEL_HEIGHT, true, false);
    }
}

/// Render all unit-tray labels onto as many A4 pages as needed: white
/// background, region stripes, black border, and the three centered lines
/// (genus, epithet, author), each shrunk independently to fit the text area.
pub fn render_tray_labels(tray_labels: &[TrayLabel]) -> Result<Canvas, Error> {
    let layout = tray_layout();
    let planner: GridPlanner = layout.planner()?;
    let mut canvas = Canvas::new("Unit Tray Labels", layout.page_width, layout.page_height);

    let labels_per_page = layout.labels_per_page();
    let pages = tray_labels.len().div_ceil(labels_per_page);
    log::info!(
        "Rendering {} pages for {} labels",
        pages,
        tray_labels.len()
    );

    for (label, placement) in tray_labels.iter().zip(planner) {
        begin_pages_through(&mut canvas, placement.page);
        let (x, y) = (placement.x, placement.y);

        canvas.set_fill_color(Color::WHITE);
        canvas.rect(x, y, TRAY_LABEL_WIDTH, TRAY_LABEL_HEIGHT, true, false);

        draw_region_stripes(&mut canvas, x, y, &label.region);

        canvas.set_line_width(TRAY_BORDER_WIDTH);
        canvas.set_stroke_color(Color::BLACK);
        canvas.rect(x, y, TRAY_LABEL_WIDTH, TRAY_LABEL_HEIGHT, false, true);

        let text_area_left = x + TRAY_TEXT_PADDING_X;
        let text_area_right = x + TRAY_LABEL_WIDTH - BAR_AREA_WIDTH - TRAY_TEXT_PADDING_X;
        let text_area_width = (text_area_right - text_area_left).max(1.0);
        let text_center_x = text_area_left + text_area_width / 2.0;
        let center_y = y + TRAY_LABEL_HEIGHT / 2.0;

        let line1_size = if label.genus.is_empty() {
            0.0
        } else {
            fit_font_size(&label.genus, LINE1_FONT.0, LINE1_FONT.1, text_area_width, 10.0)
        };
        let line2_size = if label.epithet.is_empty() {
            0.0
        } else {
            fit_font_size(&label.epithet, LINE2_FONT.0, LINE2_FONT.1, text_area_width, 8.0)
        };
        let line3_size = if label.author.is_empty() {
            0.0
        } else {
            fit_font_size(&label.author, LINE3_FONT.0, LINE3_FONT.1, text_area_width, 6.0)
        };

        let line_gap = tray_line_gap((line1_size, line2_size, line3_size));

        canvas.set_fill_color(Color::BLACK);
        if !label.genus.is_empty() {
            canvas.draw_text_centered(
                LINE1_FONT.0,
                line1_size,
                text_center_x,
                center_y + line_gap,
                &label.genus,
            );
        }
        if !label.epithet.is_empty() {
            canvas.draw_text_centered(
                LINE2_FONT.0,
                line2_size,
                text_center_x,
                center_y,
                &label.epithet,
            );
        }
        if !label.author.is_empty() {
            canvas.draw_text_centered(
                LINE3_FONT.0,
                line3_size,
                text_center_x,
                center_y - line_gap,
                &label.author,
            );
        }
    }

    Ok(canvas)
}
