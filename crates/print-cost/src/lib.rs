pub mod catalog;
pub mod constants;
mod cost;
pub mod currency;
pub mod extras;
pub mod imposition;
mod job;
pub mod layout;
mod normalize;
mod options;
mod search;
mod types;
pub mod units;

pub use catalog::{Catalog, Extra, ExtraVariant, Machine, PaperType, PrintSheetSize, Snapshot, StockSheetSize};
pub use cost::{CostResult, StageCost, calculate_cost, quote};
pub use currency::RateTable;
pub use extras::{ExtraCost, PricingRule};
pub use imposition::Imposition;
pub use job::*;
pub use normalize::CurrencyNote;
pub use options::*;
pub use search::{RankedOption, find_best_options};
pub use types::*;
pub use units::{Dimension, LengthUnit, Size};
