//! Booklet imposition
//!
//! One folded print sheet yields exactly four pages. Every booklet gets one
//! cover sheet (four pages); whatever remains is inner pages, again four to
//! a sheet:
//!
//! ```text
//! 16-page booklet:
//!   cover  = 1 sheet  (pages 1, 2, 15, 16)
//!   inner  = 12 pages -> 3 sheets
//! ```
//!
//! Cover and inner run independently, possibly on different paper and press.

use super::{PressGeometry, SheetRun, plan_sheet_run};
use crate::constants::{COVER_PAGES_PER_BOOKLET, COVER_SHEETS_PER_BOOKLET, PAGES_PER_FOLDED_SHEET};
use crate::job::ItemMargins;
use crate::layout::{Fit, fit_pieces};
use crate::options::EngineOptions;
use crate::types::*;
use crate::units::Size;

/// Page and sheet counts of a booklet run, before any geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BookletPages {
    /// Booklets ordered
    pub quantity: u64,
    /// Pages per booklet as requested
    pub total_pages: u64,
    pub cover_sheets_per_booklet: u64,
    pub cover_pages_per_booklet: u64,
    pub inner_pages_per_booklet: u64,
    pub inner_sheets_per_booklet: u64,
    pub total_cover_sheets_needed: u64,
    pub total_inner_sheets_needed: u64,
    pub total_cover_pages: u64,
    pub total_inner_pages: u64,
}

impl BookletPages {
    /// Split `total_pages` per booklet into cover and inner for `quantity` booklets.
    ///
    /// Fewer than four pages is valid and simply leaves no inner pages.
    /// Totals saturate at `u64::MAX`; `PrintJob::validate` bounds real jobs.
    pub fn new(total_pages: u64, quantity: u64) -> Self {
        let inner_pages_per_booklet = total_pages.saturating_sub(COVER_PAGES_PER_BOOKLET);
        let inner_sheets_per_booklet = inner_pages_per_booklet.div_ceil(PAGES_PER_FOLDED_SHEET);

        Self {
            quantity,
            total_pages,
            cover_sheets_per_booklet: COVER_SHEETS_PER_BOOKLET,
            cover_pages_per_booklet: COVER_PAGES_PER_BOOKLET,
            inner_pages_per_booklet,
            inner_sheets_per_booklet,
            total_cover_sheets_needed: quantity.saturating_mul(COVER_SHEETS_PER_BOOKLET),
            total_inner_sheets_needed: quantity.saturating_mul(inner_sheets_per_booklet),
            total_cover_pages: quantity.saturating_mul(COVER_PAGES_PER_BOOKLET),
            total_inner_pages: quantity.saturating_mul(inner_pages_per_booklet),
        }
    }

    pub fn has_inner(&self) -> bool {
        self.total_inner_sheets_needed > 0
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BookletImposition {
    pub pages: BookletPages,
    /// How the open spread sits on the cover print sheet
    pub cover_spread_fit: Fit,
    pub cover: SheetRun,
    /// Absent when the booklet has no inner pages
    pub inner_spread_fit: Option<Fit>,
    pub inner: Option<SheetRun>,
}

/// Impose a booklet run onto its cover and inner sheets.
///
/// The open spread (two pages side by side, plus margins) must fit each
/// stage's print sheet at least once; print sheet counts come straight from
/// the page math.
pub fn impose_booklet(
    final_size: Size,
    margins: &ItemMargins,
    pages: BookletPages,
    cover: &PressGeometry,
    inner: &PressGeometry,
    options: &EngineOptions,
) -> Result<BookletImposition> {
    let spread = margins.around(Size::new(2.0 * final_size.width_mm, final_size.height_mm));

    let cover_spread_fit = spread_fit(Stage::Cover, spread, cover, options)?;
    let cover_run = plan_sheet_run(Stage::Cover, pages.total_cover_sheets_needed, cover, options)?;

    let (inner_spread_fit, inner_run) = if pages.has_inner() {
        let fit = spread_fit(Stage::Inner, spread, inner, options)?;
        let run = plan_sheet_run(Stage::Inner, pages.total_inner_sheets_needed, inner, options)?;
        (Some(fit), Some(run))
    } else {
        log::debug!(
            "Booklet of {} pages has no inner pages; skipping inner stage",
            pages.total_pages
        );
        (None, None)
    };

    Ok(BookletImposition {
        pages,
        cover_spread_fit,
        cover: cover_run,
        inner_spread_fit,
        inner: inner_run,
    })
}

fn spread_fit(
    stage: Stage,
    spread: Size,
    geometry: &PressGeometry,
    options: &EngineOptions,
) -> Result<Fit> {
    let fit = fit_pieces(spread, geometry.print_sheet, options.print_edge_margin_mm);
    if fit.is_empty() {
        return Err(CostError::NoFit {
            stage,
            piece: "open booklet spread".to_string(),
            piece_size: spread,
            container: format!("print sheet '{}'", geometry.print_sheet_name),
            container_size: geometry.print_sheet,
        });
    }
    Ok(fit)
}
