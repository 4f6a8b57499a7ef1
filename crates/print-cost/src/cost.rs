//! Cost aggregation
//!
//! `calculate_cost` is the engine entry point. It is a pure function of its
//! inputs: normalize, impose, price each stage, price extras, then sum.

use crate::catalog::{Catalog, Snapshot};
use crate::constants::{GRAMS_PER_KG, KG_PER_TON};
use crate::currency::RateTable;
use crate::extras::{ExtraCost, ExtrasContext, ProductionSegment, price_extras};
use crate::imposition::{BookletPages, Imposition, SheetRun, impose_booklet, impose_flat};
use crate::job::{PrintJob, QuoteRequest};
use crate::normalize::{CurrencyNote, NormalizedPress, Normalizer};
use crate::options::EngineOptions;
use crate::types::*;

/// Paper and press cost of one production stage, in the reference currency
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct StageCost {
    pub stage: Stage,
    pub paper_type: String,
    pub machine: String,
    pub print_sheet: String,
    pub stock_sheet: String,
    pub print_sheets: u64,
    pub stock_sheets: u64,
    pub paper_weight_kg: f64,
    pub paper_cost: f64,
    pub press_setup_cost: f64,
    /// Press passes; double the print sheets when a two-sided job runs
    /// on a sheet without duplex support
    pub click_count: u64,
    pub press_click_cost: f64,
    pub duplex_fallback: bool,
}

impl StageCost {
    pub fn total(&self) -> f64 {
        self.paper_cost + self.press_setup_cost + self.press_click_cost
    }
}

/// Itemized cost of one job, everything in `reference_currency`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CostResult {
    pub product_name: String,
    pub quantity: u64,
    pub reference_currency: String,
    pub imposition: Imposition,
    /// Flat jobs only
    pub waste_percentage: Option<f64>,
    pub stages: Vec<StageCost>,
    pub extras: Vec<ExtraCost>,

    pub paper_cost: f64,
    pub press_setup_cost: f64,
    pub press_click_cost: f64,
    pub extras_cost: f64,
    pub raw_total: f64,
    pub price_multiplier: f64,
    pub final_total: f64,
    pub cost_per_unit: f64,

    pub duplex_fallback: bool,
    /// Some amount was converted with a last-known or static fallback rate
    pub approximate: bool,
    pub currency_notes: Vec<CurrencyNote>,
}

impl CostResult {
    pub fn stage(&self, stage: Stage) -> Option<&StageCost> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    /// Paper and press cost of `stage`, zero when the stage was not produced
    pub fn stage_total(&self, stage: Stage) -> f64 {
        self.stage(stage).map(StageCost::total).unwrap_or(0.0)
    }
}

/// Cost a job against already-resolved catalog entries.
///
/// For booklets `snapshot.press` prints the cover and `snapshot.inner_press`
/// (or the cover press when absent) the inner pages.
pub fn calculate_cost(
    job: &PrintJob,
    snapshot: &Snapshot<'_>,
    rates: &RateTable,
    options: &EngineOptions,
) -> Result<CostResult> {
    options.validate()?;
    job.validate()?;
    rates.validate()?;

    let mut normalizer = Normalizer::new(rates, options)?;
    let final_size = job.final_size.to_size("final item")?;
    let press = normalizer.press(&snapshot.press)?;

    let (imposition, waste_percentage, stages, segments) = match &job.booklet {
        None => {
            let flat = impose_flat(
                final_size,
                &job.margins,
                job.quantity,
                &press.geometry,
                options,
            )?;
            let stage = price_stage(&press, &flat.run, job.double_sided, job.setup_required);
            let segment = ProductionSegment {
                stage: Stage::Flat,
                pages: job.quantity,
                print_sheets: flat.run.print_sheets_needed,
                print_sheet: press.geometry.print_sheet,
            };
            let waste = flat.waste_percentage;
            (Imposition::Flat(flat), Some(waste), vec![stage], vec![segment])
        }
        Some(booklet_details) => {
            let inner_press = match &snapshot.inner_press {
                Some(inner) => normalizer.press(inner)?,
                None => press.clone(),
            };

            let pages = BookletPages::new(booklet_details.total_pages, job.quantity);
            let booklet = impose_booklet(
                final_size,
                &job.margins,
                pages,
                &press.geometry,
                &inner_press.geometry,
                options,
            )?;

            let mut stages = vec![price_stage(
                &press,
                &booklet.cover,
                job.double_sided,
                booklet_details.cover_setup_required,
            )];
            let mut segments = vec![ProductionSegment {
                stage: Stage::Cover,
                pages: pages.total_cover_pages,
                print_sheets: booklet.cover.print_sheets_needed,
                print_sheet: press.geometry.print_sheet,
            }];
            if let Some(inner) = &booklet.inner {
                stages.push(price_stage(
                    &inner_press,
                    inner,
                    job.double_sided,
                    job.setup_required,
                ));
                segments.push(ProductionSegment {
                    stage: Stage::Inner,
                    pages: pages.total_inner_pages,
                    print_sheets: inner.print_sheets_needed,
                    print_sheet: inner_press.geometry.print_sheet,
                });
            }

            (Imposition::Booklet(booklet), None, stages, segments)
        }
    };

    let pricings = snapshot
        .extras
        .iter()
        .map(|choice| normalizer.extra(choice, job.double_sided))
        .collect::<Result<Vec<_>>>()?;
    let context = ExtrasContext {
        quantity: job.quantity,
        booklet: job.is_booklet(),
        item: final_size,
        segments,
    };
    let extras = price_extras(&context, &pricings);

    let paper_cost: f64 = stages.iter().map(|s| s.paper_cost).sum();
    let press_setup_cost: f64 = stages.iter().map(|s| s.press_setup_cost).sum();
    let press_click_cost: f64 = stages.iter().map(|s| s.press_click_cost).sum();
    let extras_cost: f64 = extras.iter().map(|e| e.cost).sum();

    let raw_total = paper_cost + press_setup_cost + press_click_cost + extras_cost;
    let final_total = raw_total * job.price_multiplier;
    let cost_per_unit = final_total / job.quantity as f64;
    let duplex_fallback = stages.iter().any(|s| s.duplex_fallback);

    let reference_currency = normalizer.reference_currency().to_string();
    let currency = normalizer.finish();

    log::info!(
        "Costed '{}' x{}: {:.2} {} ({:.4} per unit){}",
        job.product_name,
        job.quantity,
        final_total,
        reference_currency,
        cost_per_unit,
        if currency.approximate { ", approximate" } else { "" }
    );

    Ok(CostResult {
        product_name: job.product_name.clone(),
        quantity: job.quantity,
        reference_currency,
        imposition,
        waste_percentage,
        stages,
        extras,
        paper_cost,
        press_setup_cost,
        press_click_cost,
        extras_cost,
        raw_total,
        price_multiplier: job.price_multiplier,
        final_total,
        cost_per_unit,
        duplex_fallback,
        approximate: currency.approximate,
        currency_notes: currency.notes,
    })
}

/// Resolve a quote request against a catalog and cost it
pub fn quote(
    request: &QuoteRequest,
    catalog: &Catalog,
    rates: &RateTable,
    options: &EngineOptions,
) -> Result<CostResult> {
    let snapshot = catalog.resolve(request)?;
    calculate_cost(&request.job, &snapshot, rates, options)
}

fn price_stage(
    press: &NormalizedPress,
    run: &SheetRun,
    double_sided: bool,
    setup_required: bool,
) -> StageCost {
    let paper_weight_kg = press.geometry.stock_sheet.area_m2()
        * press.gsm
        * run.stock_sheets_needed as f64
        / GRAMS_PER_KG;
    let paper_cost = paper_weight_kg / KG_PER_TON * press.price_per_ton;

    let duplex_fallback = double_sided && !press.duplex_support;
    let click_count = if duplex_fallback {
        log::info!(
            "{}: print sheet '{}' has no duplex support, printing both sides in two passes",
            run.stage,
            press.geometry.print_sheet_name
        );
        run.print_sheets_needed.saturating_mul(2)
    } else {
        run.print_sheets_needed
    };

    StageCost {
        stage: run.stage,
        paper_type: press.paper_name.clone(),
        machine: press.machine_name.clone(),
        print_sheet: press.geometry.print_sheet_name.clone(),
        stock_sheet: press.geometry.stock_sheet_name.clone(),
        print_sheets: run.print_sheets_needed,
        stock_sheets: run.stock_sheets_needed,
        paper_weight_kg,
        paper_cost,
        press_setup_cost: if setup_required { press.setup_cost } else { 0.0 },
        click_count,
        press_click_cost: click_count as f64 * press.click_cost,
        duplex_fallback,
    }
}
