//! Etiketten generates printable PDF labels for entomological collections
//! from tabular data: small colored species etiquettes laid out on a dense
//! A4 grid, and the larger unit-tray labels matching the museum's tray
//! template.
//!
//! The crate splits the work into three concerns: the *what* (turning CSV rows into render-ready label specifications, in
//! `labels`), the *where* (the grid planner in `layout`, a pure arithmetic
//! mapping from label index to page and cell), and the drawing itself
//! (`render`, which issues draw calls against the `Canvas` wrapper over the
//! `lopdf` library). Coordinates are PostScript points with the origin at
//! the bottom-left of the page, y growing upwards.

/// The module where the crate-wide error type lives.
///
/// All fallible functions of this library return a `Result` with this one
/// type, so the binaries can report a single readable message and exit
/// nonzero. Two conditions keep their own variants: a degenerate grid
/// (`Configuration`) and a record lacking a required field (`MissingField`,
/// naming the field and the record index).
pub mod error;

/// The module where the label grid planner lives.
///
/// A [`layout::LayoutConfiguration`] fixes the page size, margins, label
/// size and grid shape for a run; the [`layout::GridPlanner`] then lazily
/// produces one [`layout::Placement`] per label in strict row-major order,
/// left-to-right and top-to-bottom within a page, moving to a fresh page
/// when the grid is full. The planner is deterministic and side-effect
/// free, which is what makes the pagination behavior testable in isolation.
pub mod layout;

/// Metrics and text encoding for the built-in PDF faces.
///
/// The labels use the three standard Helvetica faces, which viewers ship
/// and the document therefore never embeds. Shrink-to-fit needs string
/// widths anyway, so this module carries the Adobe AFM advance widths and a
/// WinAnsi encoder for the `Tj` operands.
pub mod fonts;

/// The drawing surface over `lopdf`.
///
/// [`canvas::Canvas`] buffers pages of content operations (rectangles,
/// lines, text at absolute positions) and assembles the final PDF document
/// only when saving. Saving goes through a sibling temporary file which is
/// renamed into place on success, so an aborted run never leaves a
/// truncated document behind.
pub mod canvas;

/// CSV loading and the record type.
pub mod records;

/// The mapping from records to render-ready label content: the etiquette
/// word rules, the unit-tray taxon parsing, and the region color tables of
/// both templates.
pub mod labels;

/// The label renderers for both variants. Each pairs the label list with
/// the planner's placement sequence, begins pages as placements cross page
/// boundaries, and issues the per-label draw sequence of the corresponding
/// museum template.
pub mod render;
