//! Flat (non-booklet) job imposition

use super::{PressGeometry, SheetRun, plan_sheet_run};
use crate::job::ItemMargins;
use crate::layout::{Fit, fit_pieces};
use crate::options::EngineOptions;
use crate::types::*;
use crate::units::Size;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FlatImposition {
    /// How final items (with margins) sit on the print sheet
    pub item_fit: Fit,
    pub items_per_print_sheet: u64,
    pub run: SheetRun,
    /// Share of the stock sheet area not ending up in final items
    pub waste_percentage: f64,
}

/// Impose `quantity` items of `final_size` onto the stage's sheets.
///
/// Steps:
/// 1. items per print sheet (final size grown by `margins`, both orientations)
/// 2. print sheets per stock sheet
/// 3. print sheets needed = ceil(quantity / items per print sheet)
/// 4. stock sheets needed = ceil(print sheets / print sheets per stock sheet)
pub fn impose_flat(
    final_size: Size,
    margins: &ItemMargins,
    quantity: u64,
    geometry: &PressGeometry,
    options: &EngineOptions,
) -> Result<FlatImposition> {
    let item = margins.around(final_size);
    let item_fit = fit_pieces(item, geometry.print_sheet, options.print_edge_margin_mm);
    if item_fit.is_empty() {
        return Err(CostError::NoFit {
            stage: Stage::Flat,
            piece: "final item with margins".to_string(),
            piece_size: item,
            container: format!("print sheet '{}'", geometry.print_sheet_name),
            container_size: geometry.print_sheet,
        });
    }

    let print_sheets_needed = quantity.div_ceil(item_fit.count);
    let run = plan_sheet_run(Stage::Flat, print_sheets_needed, geometry, options)?;

    let stock_area = geometry.stock_sheet.area_mm2();
    let used_area = final_size.area_mm2()
        * item_fit.count as f64
        * run.print_sheets_per_stock_sheet as f64;
    let waste_percentage = (stock_area - used_area) / stock_area * 100.0;

    log::debug!(
        "Flat imposition: {} items per print sheet{} -> {} print sheets",
        item_fit.count,
        if item_fit.rotated { " (rotated)" } else { "" },
        print_sheets_needed
    );

    Ok(FlatImposition {
        item_fit,
        items_per_print_sheet: item_fit.count,
        run,
        waste_percentage,
    })
}
