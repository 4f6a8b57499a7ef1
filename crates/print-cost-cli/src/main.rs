use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use print_cost::imposition::SheetRun;
use print_cost::{CostResult, EngineOptions, Imposition, RateTable};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pcost", about = "Print job costing CLI", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cost a job on the presses named in the request
    Quote {
        /// Catalog snapshot (paper types, machines, extras) as JSON
        #[arg(short, long)]
        catalog: PathBuf,

        /// Quote request (job plus press selection) as JSON
        #[arg(short, long)]
        request: PathBuf,

        /// Exchange rate table; the static fallback table is used when omitted
        #[arg(long)]
        rates: Option<PathBuf>,

        /// Engine options as JSON
        #[arg(long)]
        options: Option<PathBuf>,

        /// Reference currency, overriding the options file
        #[arg(long)]
        reference: Option<String>,

        /// Output format
        #[arg(long, default_value = "table", value_enum)]
        format: FormatArg,
    },

    /// Rank every press and paper combination for a flat job
    Best {
        #[arg(short, long)]
        catalog: PathBuf,

        /// Quote request; its press selection is ignored
        #[arg(short, long)]
        request: PathBuf,

        #[arg(long)]
        rates: Option<PathBuf>,

        #[arg(long)]
        options: Option<PathBuf>,

        #[arg(long)]
        reference: Option<String>,

        /// Number of options to show
        #[arg(long, default_value = "5")]
        limit: usize,

        #[arg(long, default_value = "table", value_enum)]
        format: FormatArg,
    },

    /// Show an exchange rate table
    Rates {
        /// Rate table as JSON; the static fallback table is shown when omitted
        #[arg(long)]
        rates: Option<PathBuf>,

        /// Re-express the table against this currency
        #[arg(long)]
        reference: Option<String>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Table,
    Json,
}

async fn load_rates(path: Option<&Path>) -> Result<RateTable> {
    match path {
        Some(path) => RateTable::load(path)
            .await
            .with_context(|| format!("Failed to load exchange rates: {}", path.display())),
        None => {
            log::warn!("No exchange rate file given, using static fallback rates");
            Ok(RateTable::static_fallback())
        }
    }
}

async fn load_options(path: Option<&Path>, reference: Option<String>) -> Result<EngineOptions> {
    let mut options = match path {
        Some(path) => EngineOptions::load(path)
            .await
            .with_context(|| format!("Failed to load options: {}", path.display()))?,
        None => EngineOptions::default(),
    };
    if let Some(reference) = reference {
        options.reference_currency = reference;
    }
    options.validate()?;
    Ok(options)
}

async fn load_catalog(path: &Path) -> Result<print_cost::Catalog> {
    print_cost::Catalog::load(path)
        .await
        .with_context(|| format!("Failed to load catalog: {}", path.display()))
}

async fn load_request(path: &Path) -> Result<print_cost::QuoteRequest> {
    print_cost::QuoteRequest::load(path)
        .await
        .with_context(|| format!("Failed to load quote request: {}", path.display()))
}

fn print_run(run: &SheetRun) {
    println!(
        "    {}: {} print sheets, {} per stock sheet{} -> {} stock sheets",
        run.stage,
        run.print_sheets_needed,
        run.print_sheets_per_stock_sheet,
        if run.stock_fit.rotated { " (rotated)" } else { "" },
        run.stock_sheets_needed
    );
}

fn print_result(result: &CostResult) {
    let currency = &result.reference_currency;
    let name = if result.product_name.is_empty() {
        "Job"
    } else {
        result.product_name.as_str()
    };
    println!("{} x{} (all amounts in {})", name, result.quantity, currency);

    println!("  Imposition:");
    match &result.imposition {
        Imposition::Flat(flat) => {
            println!(
                "    {} items per print sheet ({} x {}{})",
                flat.items_per_print_sheet,
                flat.item_fit.across,
                flat.item_fit.down,
                if flat.item_fit.rotated { ", rotated" } else { "" }
            );
            print_run(&flat.run);
            println!("    Waste: {:.1}%", flat.waste_percentage);
        }
        Imposition::Booklet(booklet) => {
            let pages = &booklet.pages;
            println!(
                "    {} pages per booklet: 4 cover + {} inner ({} inner sheets)",
                pages.total_pages, pages.inner_pages_per_booklet, pages.inner_sheets_per_booklet
            );
            print_run(&booklet.cover);
            if let Some(inner) = &booklet.inner {
                print_run(inner);
            }
        }
    }

    println!("  Stages:");
    for stage in &result.stages {
        println!(
            "    {}: {} on {} / {} {}",
            stage.stage, stage.paper_type, stage.stock_sheet, stage.machine, stage.print_sheet
        );
        println!(
            "      Paper:  {:>10.2}  ({:.2} kg)",
            stage.paper_cost, stage.paper_weight_kg
        );
        println!("      Setup:  {:>10.2}", stage.press_setup_cost);
        println!(
            "      Clicks: {:>10.2}  ({} clicks{})",
            stage.press_click_cost,
            stage.click_count,
            if stage.duplex_fallback {
                ", no duplex"
            } else {
                ""
            }
        );
    }

    if !result.extras.is_empty() {
        println!("  Extras:");
        for extra in &result.extras {
            println!(
                "    {} ({}): {:.2} x {:.4} {} + setup {:.2} = {:.2}",
                extra.extra_name,
                extra.variant_name,
                extra.units,
                extra.unit_price,
                extra.rule,
                extra.setup_cost,
                extra.cost
            );
        }
    }

    println!("  Totals:");
    println!("    Paper:        {:>10.2}", result.paper_cost);
    println!("    Press setup:  {:>10.2}", result.press_setup_cost);
    println!("    Press clicks: {:>10.2}", result.press_click_cost);
    println!("    Extras:       {:>10.2}", result.extras_cost);
    println!("    Raw total:    {:>10.2}", result.raw_total);
    println!(
        "    Final total:  {:>10.2}  (x{})",
        result.final_total, result.price_multiplier
    );
    println!("    Per unit:     {:>10.4}", result.cost_per_unit);

    if result.approximate {
        println!("  Note: approximate, fallback exchange rates were used");
        for note in &result.currency_notes {
            println!(
                "    {} at {} {} ({})",
                note.currency, note.rate, currency, note.context
            );
        }
    }
}

fn print_rates(table: &RateTable) {
    println!(
        "Exchange rates (1 unit = X {}){}",
        table.base_currency,
        if table.fallback { " [fallback]" } else { "" }
    );
    for (code, rate) in &table.rates {
        println!("  {:<5} {:>12.6}", code, rate);
    }
    if !table.last_known.is_empty() {
        println!("Last known:");
        for (code, rate) in &table.last_known {
            println!("  {:<5} {:>12.6}", code, rate);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Quote {
            catalog,
            request,
            rates,
            options,
            reference,
            format,
        } => {
            let catalog = load_catalog(&catalog).await?;
            let request = load_request(&request).await?;
            let rates = load_rates(rates.as_deref()).await?;
            let options = load_options(options.as_deref(), reference).await?;

            let result = print_cost::quote(&request, &catalog, &rates, &options)?;

            match format {
                FormatArg::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                FormatArg::Table => print_result(&result),
            }
        }

        Commands::Best {
            catalog,
            request,
            rates,
            options,
            reference,
            limit,
            format,
        } => {
            let catalog = load_catalog(&catalog).await?;
            let request = load_request(&request).await?;
            let rates = load_rates(rates.as_deref()).await?;
            let options = load_options(options.as_deref(), reference).await?;

            let mut ranked = print_cost::find_best_options(&request.job, &catalog, &rates, &options)?;
            if ranked.is_empty() {
                anyhow::bail!("The job does not fit any press and paper combination in the catalog");
            }
            ranked.truncate(limit);

            match format {
                FormatArg::Json => println!("{}", serde_json::to_string_pretty(&ranked)?),
                FormatArg::Table => {
                    for (rank, option) in ranked.iter().enumerate() {
                        let result = &option.result;
                        let Some(stage) = result.stages.first() else {
                            continue;
                        };
                        println!(
                            "{:>2}. {:>10.2} {}  {:>5.1}% waste  {} {} / {} {}",
                            rank + 1,
                            result.final_total,
                            result.reference_currency,
                            result.waste_percentage.unwrap_or_default(),
                            stage.machine,
                            stage.print_sheet,
                            stage.paper_type,
                            stage.stock_sheet
                        );
                    }
                }
            }
        }

        Commands::Rates { rates, reference } => {
            let mut table = load_rates(rates.as_deref()).await?;
            if let Some(reference) = reference {
                table = table.rebase(&reference, true)?;
            }
            print_rates(&table);
        }
    }

    Ok(())
}
