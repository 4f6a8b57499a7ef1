//! Best production option search for flat jobs

use crate::catalog::{Catalog, PressSnapshot, Snapshot};
use crate::constants::COST_TIE_TOLERANCE;
use crate::cost::{CostResult, calculate_cost};
use crate::currency::RateTable;
use crate::job::{PressSelection, PrintJob};
use crate::options::EngineOptions;
use crate::types::*;

/// One producible press/paper combination with its cost
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RankedOption {
    pub press: PressSelection,
    pub result: CostResult,
}

/// Cost `job` on every machine, print sheet, paper type and stock sheet in
/// the catalog and rank the producible combinations.
///
/// Cheapest first; totals that round to the same cent are ordered by lower
/// waste. Grouping by rounded cent keeps the comparison a total order, at the
/// price of treating 0.004 and 0.006 as different cents although they are
/// less than a cent apart.
/// Combinations the job does not fit on are skipped; any other error aborts
/// the search.
pub fn find_best_options(
    job: &PrintJob,
    catalog: &Catalog,
    rates: &RateTable,
    options: &EngineOptions,
) -> Result<Vec<RankedOption>> {
    if job.is_booklet() {
        return Err(CostError::Config(
            "Best-option search only supports flat jobs".to_string(),
        ));
    }

    let extras = catalog.resolve_extras(&job.extras)?;
    let mut ranked = Vec::new();

    for machine in &catalog.machines {
        for print_sheet in &machine.print_sheet_sizes {
            for paper in &catalog.paper_types {
                for stock_sheet in &paper.stock_sheet_sizes {
                    let press = PressSnapshot {
                        paper,
                        stock_sheet,
                        machine,
                        print_sheet,
                    };
                    let snapshot = Snapshot {
                        press,
                        inner_press: None,
                        extras: extras.clone(),
                    };

                    match calculate_cost(job, &snapshot, rates, options) {
                        Ok(result) => ranked.push(RankedOption {
                            press: press.selection(),
                            result,
                        }),
                        Err(e @ CostError::NoFit { .. }) => {
                            log::debug!(
                                "Skipping {} / {} on {} / {}: {}",
                                machine.name,
                                print_sheet.name,
                                paper.name,
                                stock_sheet.name,
                                e
                            );
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
        }
    }

    ranked.sort_by(|a, b| {
        tie_bucket(a.result.final_total)
            .total_cmp(&tie_bucket(b.result.final_total))
            .then_with(|| waste(a).total_cmp(&waste(b)))
    });

    log::info!("Found {} producible options", ranked.len());
    Ok(ranked)
}

/// Cent bucket a total falls in; equal buckets count as a tie
fn tie_bucket(total: f64) -> f64 {
    (total / COST_TIE_TOLERANCE).round()
}

fn waste(option: &RankedOption) -> f64 {
    option.result.waste_percentage.unwrap_or(f64::INFINITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tie_bucket_groups_by_rounded_cent() {
        assert_eq!(tie_bucket(56.301), tie_bucket(56.304));
        assert_eq!(tie_bucket(56.296), tie_bucket(56.304));
        assert_ne!(tie_bucket(0.004), tie_bucket(0.006));
        assert!(tie_bucket(56.30) < tie_bucket(56.32));
    }
}
