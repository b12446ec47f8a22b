use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Width of an ISO A4 page in PostScript points (1 pt = 1/72 inch).
pub const A4_WIDTH: f32 = 210.0 * 72.0 / 25.4;
/// Height of an ISO A4 page in PostScript points.
pub const A4_HEIGHT: f32 = 297.0 * 72.0 / 25.4;

/// Page margins in points, measured from the physical page edges inwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Margins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Margins {
    /// The same margin on all four sides.
    pub fn uniform(value: f32) -> Margins {
        Margins {
            left: value,
            right: value,
            top: value,
            bottom: value,
        }
    }
}

/// All the parameters which determine where labels land on the page.
///
/// The configuration is immutable for the duration of a run and fully
/// determines the placement sequence produced by [`GridPlanner`]. Labels tile
/// the page in `columns` x `rows` cells of `label_width` x `label_height`
/// points, anchored at the top-left of the usable area.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfiguration {
    pub page_width: f32,
    pub page_height: f32,
    pub left_margin: f32,
    pub top_margin: f32,
    pub label_width: f32,
    pub label_height: f32,
    pub columns: usize,
    pub rows: usize,
}

impl LayoutConfiguration {
    /// Derive the label size by subdividing the usable page area (after
    /// subtracting the margins) into a `columns` x `rows` grid. Each grid
    /// cell hosts one label.
    pub fn with_cells(
        page_width: f32,
        page_height: f32,
        margins: Margins,
        columns: usize,
        rows: usize,
    ) -> LayoutConfiguration {
        let usable_width = page_width - margins.left - margins.right;
        let usable_height = page_height - margins.top - margins.bottom;
        LayoutConfiguration {
            page_width,
            page_height,
            left_margin: margins.left,
            top_margin: margins.top,
            label_width: usable_width / columns.max(1) as f32,
            label_height: usable_height / rows.max(1) as f32,
            columns,
            rows,
        }
    }

    /// How many labels fit on one page.
    pub fn labels_per_page(&self) -> usize {
        self.columns * self.rows
    }

    /// Reject configurations the planner cannot tile a page with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.columns * self.rows == 0 {
            return Err(Error::configuration(format!(
                "the grid of {} columns x {} rows can hold no labels",
                self.columns, self.rows
            )));
        }
        if !(self.label_width > 0.0 && self.label_height > 0.0) {
            return Err(Error::configuration(format!(
                "the label size {} x {} pt is not strictly positive",
                self.label_width, self.label_height
            )));
        }
        if !(self.page_width > 0.0 && self.page_height > 0.0) {
            return Err(Error::configuration(format!(
                "the page size {} x {} pt is not strictly positive",
                self.page_width, self.page_height
            )));
        }
        Ok(())
    }

    /// Create the planner for this configuration, failing on degenerate grids.
    pub fn planner(&self) -> Result<GridPlanner, Error> {
        self.validate()?;
        Ok(GridPlanner {
            configuration: self.clone(),
            next_index: 0,
        })
    }
}

/// One computed label position: the page it lands on, its grid cell, and the
/// bottom-left corner of the cell in page coordinates (the PDF origin is the
/// bottom-left of the page, y grows upwards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub page: usize,
    pub column: usize,
    pub row: usize,
    pub x: f32,
    pub y: f32,
}

/// Lazily produces [`Placement`]s in strict row-major order, left-to-right
/// and top-to-bottom within a page, advancing to the next page when the grid
/// is full. The sequence is unbounded; the renderer consumes exactly one
/// placement per label, so its effective length is the number of labels.
///
/// The planner is a pure arithmetic mapping from the running label index, so
/// iterating it has no side effects and the same configuration always yields
/// the same sequence.
#[derive(Debug, Clone)]
pub struct GridPlanner {
    configuration: LayoutConfiguration,
    next_index: usize,
}

impl GridPlanner {
    /// The placement of the n-th label (0-indexed), independent of the
    /// iterator position.
    pub fn placement_at(&self, index: usize) -> Placement {
        let configuration = &self.configuration;
        let per_page = configuration.labels_per_page();
        let page = index / per_page;
        let index_on_page = index % per_page;
        let column = index_on_page % configuration.columns;
        // Row 0 sits at the top of the usable area.
        let row = index_on_page / configuration.columns;

        Placement {
            page,
            column,
            row,
            x: configuration.left_margin + column as f32 * configuration.label_width,
            y: configuration.page_height
                - configuration.top_margin
                - (row + 1) as f32 * configuration.label_height,
        }
    }
}

impl Iterator for GridPlanner {
    type Item = Placement;

    fn next(&mut self) -> Option<Placement> {
        let placement = self.placement_at(self.next_index);
        self.next_index += 1;
        Some(placement)
    }
}
