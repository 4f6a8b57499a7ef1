//! Imposition - turning quantities into sheet counts
//!
//! This module covers both job shapes:
//! 1. Flat jobs: items per print sheet, then print and stock sheets needed
//! 2. Booklets: fixed 4-page cover plus inner pages, each stage on its own sheets
//!
//! Both share the last step: cutting print sheets out of stock sheets,
//! always rounding partial sheets up.

mod booklet;
mod flat;

pub use booklet::*;
pub use flat::*;

use crate::layout::{Fit, fit_pieces};
use crate::options::EngineOptions;
use crate::types::*;
use crate::units::Size;

/// Print and stock sheet sizes for one stage, in millimeters
#[derive(Debug, Clone, PartialEq)]
pub struct PressGeometry {
    pub print_sheet_name: String,
    pub print_sheet: Size,
    pub stock_sheet_name: String,
    pub stock_sheet: Size,
}

/// Sheet counts for one production stage
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SheetRun {
    pub stage: Stage,
    /// How print sheets are cut from a stock sheet
    pub stock_fit: Fit,
    pub print_sheets_per_stock_sheet: u64,
    pub print_sheets_needed: u64,
    pub stock_sheets_needed: u64,
}

/// Imposition detail of a costed job
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "lowercase"))]
pub enum Imposition {
    Flat(FlatImposition),
    Booklet(BookletImposition),
}

impl Imposition {
    /// All sheet runs in production order
    pub fn runs(&self) -> Vec<&SheetRun> {
        match self {
            Imposition::Flat(flat) => vec![&flat.run],
            Imposition::Booklet(booklet) => {
                let mut runs = vec![&booklet.cover];
                runs.extend(booklet.inner.as_ref());
                runs
            }
        }
    }

    pub fn total_print_sheets(&self) -> u64 {
        self.runs().iter().map(|r| r.print_sheets_needed).sum()
    }

    pub fn total_stock_sheets(&self) -> u64 {
        self.runs().iter().map(|r| r.stock_sheets_needed).sum()
    }
}

/// Cut `print_sheets_needed` print sheets from stock sheets.
///
/// Fails with `NoFit` when the print sheet cannot be cut from the stock
/// sheet in either orientation.
pub fn plan_sheet_run(
    stage: Stage,
    print_sheets_needed: u64,
    geometry: &PressGeometry,
    options: &EngineOptions,
) -> Result<SheetRun> {
    let stock_fit = fit_pieces(
        geometry.print_sheet,
        geometry.stock_sheet,
        options.stock_edge_margin_mm,
    );
    if stock_fit.is_empty() {
        return Err(CostError::NoFit {
            stage,
            piece: format!("print sheet '{}'", geometry.print_sheet_name),
            piece_size: geometry.print_sheet,
            container: format!("stock sheet '{}'", geometry.stock_sheet_name),
            container_size: geometry.stock_sheet,
        });
    }

    let stock_sheets_needed = print_sheets_needed.div_ceil(stock_fit.count);

    log::debug!(
        "{}: {} print sheets, {} per stock sheet -> {} stock sheets",
        stage,
        print_sheets_needed,
        stock_fit.count,
        stock_sheets_needed
    );

    Ok(SheetRun {
        stage,
        stock_fit,
        print_sheets_per_stock_sheet: stock_fit.count,
        print_sheets_needed,
        stock_sheets_needed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(print: (f64, f64), stock: (f64, f64)) -> PressGeometry {
        PressGeometry {
            print_sheet_name: "print".to_string(),
            print_sheet: Size::new(print.0, print.1),
            stock_sheet_name: "stock".to_string(),
            stock_sheet: Size::new(stock.0, stock.1),
        }
    }

    #[test]
    fn test_sheet_run_rounds_up() {
        // SRA3 from B2 (500 x 707): rotated 450 x 320 gives 1 x 2
        let geo = geometry((320.0, 450.0), (500.0, 707.0));
        let run = plan_sheet_run(Stage::Flat, 63, &geo, &EngineOptions::default()).unwrap();

        assert_eq!(run.print_sheets_per_stock_sheet, 2);
        assert!(run.stock_fit.rotated);
        assert_eq!(run.stock_sheets_needed, 32);
    }

    #[test]
    fn test_sheet_run_same_size() {
        let geo = geometry((320.0, 450.0), (320.0, 450.0));
        let run = plan_sheet_run(Stage::Cover, 10, &geo, &EngineOptions::default()).unwrap();
        assert_eq!(run.print_sheets_per_stock_sheet, 1);
        assert_eq!(run.stock_sheets_needed, 10);
    }

    #[test]
    fn test_sheet_run_no_fit() {
        let geo = geometry((330.0, 483.0), (320.0, 450.0));
        match plan_sheet_run(Stage::Inner, 5, &geo, &EngineOptions::default()) {
            Err(CostError::NoFit {
                stage, container, ..
            }) => {
                assert_eq!(stage, Stage::Inner);
                assert!(container.contains("stock"));
            }
            other => panic!("Expected NoFit, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_print_sheets() {
        let geo = geometry((320.0, 450.0), (320.0, 450.0));
        let run = plan_sheet_run(Stage::Inner, 0, &geo, &EngineOptions::default()).unwrap();
        assert_eq!(run.stock_sheets_needed, 0);
    }
}
