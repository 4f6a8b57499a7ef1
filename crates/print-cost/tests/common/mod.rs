#![allow(dead_code)]

use print_cost::*;

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {}, got {}",
        expected,
        actual
    );
}

fn print_sheet(id: u32, name: &str, width: f64, height: f64, click_cost: f64, duplex: bool) -> PrintSheetSize {
    PrintSheetSize {
        id,
        name: name.to_string(),
        width,
        height,
        click_cost,
        click_cost_currency: "EUR".to_string(),
        duplex_support: duplex,
        unit: LengthUnit::Mm,
    }
}

fn stock_sheet(id: u32, name: &str, width: f64, height: f64) -> StockSheetSize {
    StockSheetSize {
        id,
        name: name.to_string(),
        width,
        height,
        unit: LengthUnit::Mm,
    }
}

pub fn extra(id: u32, name: &str, pricing_type: &str, price: f64, currency: &str) -> Extra {
    Extra {
        id,
        name: name.to_string(),
        pricing_type: pricing_type.to_string(),
        setup_cost: 0.0,
        setup_cost_currency: currency.to_string(),
        inside_outside_same: false,
        supports_double_sided: false,
        apply_to_print_sheet: false,
        booklet_application_scope: print_cost::catalog::BookletScope::Both,
        variants: vec![ExtraVariant {
            id: 1,
            variant_name: "Standard".to_string(),
            price,
            currency: currency.to_string(),
        }],
    }
}

/// One 170 gsm paper on B2, one digital press with a duplex and a simplex SRA3
/// sheet (print sheet ids 1 and 2), everything priced in EUR.
pub fn create_test_catalog() -> Catalog {
    Catalog {
        paper_types: vec![PaperType {
            id: 1,
            name: "Coated 170".to_string(),
            gsm: 170.0,
            price_per_ton: 1200.0,
            currency: "EUR".to_string(),
            stock_sheet_sizes: vec![stock_sheet(1, "B2", 500.0, 707.0)],
        }],
        machines: vec![Machine {
            id: 1,
            name: "Digital Press".to_string(),
            setup_cost: 50.0,
            setup_cost_currency: "EUR".to_string(),
            print_sheet_sizes: vec![
                print_sheet(1, "SRA3", 320.0, 450.0, 0.10, true),
                print_sheet(2, "SRA3 simplex", 320.0, 450.0, 0.10, false),
            ],
        }],
        extras: Vec::new(),
    }
}

/// Catalog for best-option searches: zero paper price, SRA3 and A4 print
/// sheets, B2 and SRA3 stock, plus a print sheet too large for any stock.
pub fn create_search_catalog() -> Catalog {
    Catalog {
        paper_types: vec![PaperType {
            id: 1,
            name: "Uncoated 120".to_string(),
            gsm: 120.0,
            price_per_ton: 0.0,
            currency: "EUR".to_string(),
            stock_sheet_sizes: vec![
                stock_sheet(1, "B2", 500.0, 707.0),
                stock_sheet(2, "SRA3 stock", 320.0, 450.0),
            ],
        }],
        machines: vec![Machine {
            id: 1,
            name: "Digital Press".to_string(),
            setup_cost: 50.0,
            setup_cost_currency: "EUR".to_string(),
            print_sheet_sizes: vec![
                print_sheet(1, "SRA3", 320.0, 450.0, 0.10, true),
                print_sheet(2, "A4", 210.0, 297.0, 0.05, true),
                print_sheet(3, "B1", 707.0, 1000.0, 0.20, true),
            ],
        }],
        extras: Vec::new(),
    }
}

pub fn eur_rates() -> RateTable {
    RateTable::new("EUR").with_rate("USD", 0.95)
}

pub fn press(print_sheet_id: u32) -> PressSelection {
    PressSelection {
        paper_type_id: 1,
        stock_sheet_id: 1,
        machine_id: 1,
        print_sheet_id,
    }
}

/// 500 flyers, 100 x 150 mm, default 3 mm margins, single-sided
pub fn flyer_job() -> PrintJob {
    PrintJob {
        product_name: "Flyer".to_string(),
        ..PrintJob::flat(Dimension::mm(100.0, 150.0), 500)
    }
}

pub fn flyer_request() -> QuoteRequest {
    QuoteRequest {
        job: flyer_job(),
        press: press(1),
        inner_press: None,
    }
}
