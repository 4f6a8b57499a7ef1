mod common;

use common::*;
use print_cost::*;

// B2 at 170 gsm weighs 0.3535 m2 * 170 g = 60.095 g per stock sheet
const B2_SHEET_KG: f64 = 0.060095;

#[test]
fn test_flat_quote_breakdown() {
    let result = quote(
        &flyer_request(),
        &create_test_catalog(),
        &eur_rates(),
        &EngineOptions::default(),
    )
    .unwrap();

    assert_eq!(result.reference_currency, "EUR");
    let stage = result.stage(Stage::Flat).unwrap();
    assert_eq!(stage.print_sheets, 63);
    assert_eq!(stage.stock_sheets, 32);
    assert_eq!(stage.click_count, 63);
    assert!(!stage.duplex_fallback);

    assert_close(stage.paper_weight_kg, 32.0 * B2_SHEET_KG);
    assert_close(result.paper_cost, 32.0 * B2_SHEET_KG * 1.2);
    assert_close(result.press_setup_cost, 50.0);
    assert_close(result.press_click_cost, 6.3);
    assert_close(result.extras_cost, 0.0);
    assert_close(result.raw_total, 58.607648);
    assert_close(result.final_total, result.raw_total);
    assert_close(result.cost_per_unit, 58.607648 / 500.0);
    assert!(!result.approximate);
    assert!(result.waste_percentage.is_some());
}

#[test]
fn test_setup_not_required() {
    let mut request = flyer_request();
    request.job.setup_required = false;

    let result = quote(&request, &create_test_catalog(), &eur_rates(), &EngineOptions::default()).unwrap();
    assert_close(result.press_setup_cost, 0.0);
}

#[test]
fn test_double_sided_on_duplex_sheet() {
    let mut request = flyer_request();
    request.job.double_sided = true;

    let result = quote(&request, &create_test_catalog(), &eur_rates(), &EngineOptions::default()).unwrap();
    assert_eq!(result.stage(Stage::Flat).unwrap().click_count, 63);
    assert!(!result.duplex_fallback);
}

#[test]
fn test_double_sided_without_duplex_doubles_clicks() {
    let mut request = flyer_request();
    request.job.double_sided = true;
    request.press = press(2);

    let result = quote(&request, &create_test_catalog(), &eur_rates(), &EngineOptions::default()).unwrap();
    let stage = result.stage(Stage::Flat).unwrap();
    assert_eq!(stage.click_count, 126);
    assert_close(stage.press_click_cost, 12.6);
    assert!(stage.duplex_fallback);
    assert!(result.duplex_fallback);
}

#[test]
fn test_price_multiplier() {
    let mut request = flyer_request();
    request.job.price_multiplier = 1.5;

    let result = quote(&request, &create_test_catalog(), &eur_rates(), &EngineOptions::default()).unwrap();
    assert_close(result.raw_total, 58.607648);
    assert_close(result.final_total, 58.607648 * 1.5);
    assert_close(result.cost_per_unit, 58.607648 * 1.5 / 500.0);
}

#[test]
fn test_calculate_cost_is_idempotent() {
    let catalog = create_test_catalog();
    let request = flyer_request();
    let snapshot = catalog.resolve(&request).unwrap();
    let rates = eur_rates();
    let options = EngineOptions::default();

    let first = calculate_cost(&request.job, &snapshot, &rates, &options).unwrap();
    let second = calculate_cost(&request.job, &snapshot, &rates, &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_booklet_quote_stages() {
    let request = QuoteRequest {
        job: PrintJob {
            product_name: "A5 brochure".to_string(),
            ..PrintJob::booklet(Dimension::mm(148.0, 210.0), 10, 16)
        },
        press: press(1),
        inner_press: None,
    };

    let result = quote(&request, &create_test_catalog(), &eur_rates(), &EngineOptions::default()).unwrap();
    assert_eq!(result.stages.len(), 2);

    let cover = result.stage(Stage::Cover).unwrap();
    assert_eq!(cover.print_sheets, 10);
    assert_eq!(cover.stock_sheets, 5);
    assert_close(cover.paper_cost, 5.0 * B2_SHEET_KG * 1.2);
    assert_close(cover.press_click_cost, 1.0);
    assert_close(cover.press_setup_cost, 50.0);

    let inner = result.stage(Stage::Inner).unwrap();
    assert_eq!(inner.print_sheets, 30);
    assert_eq!(inner.stock_sheets, 15);
    assert_close(inner.paper_cost, 15.0 * B2_SHEET_KG * 1.2);
    assert_close(inner.press_click_cost, 3.0);

    assert_close(
        result.raw_total,
        result.stage_total(Stage::Cover) + result.stage_total(Stage::Inner),
    );
    assert_close(result.raw_total, 20.0 * B2_SHEET_KG * 1.2 + 4.0 + 100.0);
    assert!(result.waste_percentage.is_none());
}

#[test]
fn test_booklet_inner_on_other_press() {
    let mut job = PrintJob::booklet(Dimension::mm(148.0, 210.0), 10, 16);
    if let Some(booklet) = job.booklet.as_mut() {
        booklet.cover_setup_required = false;
    }
    let request = QuoteRequest {
        job,
        press: press(1),
        inner_press: Some(press(2)),
    };

    let result = quote(&request, &create_test_catalog(), &eur_rates(), &EngineOptions::default()).unwrap();

    let cover = result.stage(Stage::Cover).unwrap();
    assert_close(cover.press_setup_cost, 0.0);
    assert!(!cover.duplex_fallback);

    let inner = result.stage(Stage::Inner).unwrap();
    assert_eq!(inner.print_sheet, "SRA3 simplex");
    assert_eq!(inner.click_count, 60);
    assert!(inner.duplex_fallback);
    assert!(result.duplex_fallback);
}

#[test]
fn test_booklet_cover_only() {
    let request = QuoteRequest {
        job: PrintJob::booklet(Dimension::mm(148.0, 210.0), 25, 4),
        press: press(1),
        inner_press: None,
    };

    let result = quote(&request, &create_test_catalog(), &eur_rates(), &EngineOptions::default()).unwrap();
    assert!(result.stage(Stage::Inner).is_none());
    assert_eq!(result.stage_total(Stage::Inner), 0.0);
    assert_eq!(result.stages.len(), 1);
}

#[test]
fn test_extra_converted_before_aggregation() {
    // Everything priced in EUR, quoted in USD at 1 EUR = 1.05 USD
    let mut catalog = create_test_catalog();
    catalog.extras.push(extra(7, "Packaging", "per_booklet", 10.0, "EUR"));

    let mut request = flyer_request();
    request.job.extras.push(ExtraSelection::new(7, 1));

    let rates = RateTable::new("USD").with_rate("EUR", 1.05);
    let options = EngineOptions {
        reference_currency: "USD".to_string(),
        ..EngineOptions::default()
    };

    let result = quote(&request, &catalog, &rates, &options).unwrap();
    assert_eq!(result.reference_currency, "USD");
    assert_close(result.extras[0].unit_price, 10.5);
    assert_close(result.extras_cost, 10.5);
    assert_close(result.raw_total, (58.607648 + 10.0) * 1.05);
}

#[test]
fn test_reference_currency_rebases_table() {
    let options = EngineOptions {
        reference_currency: "usd".to_string(),
        ..EngineOptions::default()
    };
    let result = quote(&flyer_request(), &create_test_catalog(), &eur_rates(), &options).unwrap();

    assert_eq!(result.reference_currency, "USD");
    assert_close(result.final_total, 58.607648 / 0.95);
}

#[test]
fn test_static_fallback_marks_approximate() {
    let result = quote(
        &flyer_request(),
        &create_test_catalog(),
        &RateTable::static_fallback(),
        &EngineOptions::default(),
    )
    .unwrap();

    assert!(result.approximate);
    assert!(result.currency_notes.is_empty());
    assert_close(result.final_total, 58.607648);
}

#[test]
fn test_last_known_rate_noted() {
    let mut catalog = create_test_catalog();
    catalog.extras.push(extra(7, "Packaging", "per_booklet", 10.0, "GBP"));
    let mut request = flyer_request();
    request.job.extras.push(ExtraSelection::new(7, 1));
    let rates = eur_rates().with_last_known("GBP", 1.17);

    let result = quote(&request, &catalog, &rates, &EngineOptions::default()).unwrap();
    assert!(result.approximate);
    assert_eq!(result.currency_notes.len(), 1);
    assert_eq!(result.currency_notes[0].currency, "GBP");
    assert_close(result.extras_cost, 11.7);

    let strict = EngineOptions {
        allow_fallback_rates: false,
        ..EngineOptions::default()
    };
    match quote(&request, &catalog, &rates, &strict) {
        Err(CostError::UnsupportedCurrency { currency, context }) => {
            assert_eq!(currency, "GBP");
            assert!(context.contains("Packaging"));
        }
        other => panic!("Expected UnsupportedCurrency, got {:?}", other),
    }
}

#[test]
fn test_unknown_pricing_type() {
    let mut catalog = create_test_catalog();
    catalog.extras.push(extra(9, "Foil", "per_square_meter", 1.0, "EUR"));
    let mut request = flyer_request();
    request.job.extras.push(ExtraSelection::new(9, 1));

    match quote(&request, &catalog, &eur_rates(), &EngineOptions::default()) {
        Err(CostError::InvalidPricingConfiguration { extra, pricing_type }) => {
            assert_eq!(extra, "Foil");
            assert_eq!(pricing_type, "per_square_meter");
        }
        other => panic!("Expected InvalidPricingConfiguration, got {:?}", other),
    }
}

#[test]
fn test_extras_in_booklet_quote() {
    let mut catalog = create_test_catalog();
    let mut cellophane = extra(1, "Cellophane", "per_page", 0.05, "EUR");
    cellophane.supports_double_sided = true;
    cellophane.booklet_application_scope = print_cost::catalog::BookletScope::CoverOnly;
    cellophane.setup_cost = 20.0;
    catalog.extras.push(cellophane);
    catalog.extras.push(extra(2, "Staple", "per_booklet", 0.10, "EUR"));

    let mut job = PrintJob::booklet(Dimension::mm(148.0, 210.0), 10, 16);
    job.extras = vec![ExtraSelection::new(1, 1), ExtraSelection::new(2, 1)];
    let request = QuoteRequest {
        job,
        press: press(1),
        inner_press: None,
    };

    let result = quote(&request, &catalog, &eur_rates(), &EngineOptions::default()).unwrap();
    // 40 cover pages, both sides
    assert_close(result.extras[0].units, 80.0);
    assert_close(result.extras[0].cost, 20.0 + 80.0 * 0.05);
    assert_close(result.extras[1].units, 10.0);
    assert_close(result.extras_cost, 24.0 + 1.0);
}

#[test]
fn test_unknown_print_sheet() {
    let mut request = flyer_request();
    request.press = press(42);
    match quote(&request, &create_test_catalog(), &eur_rates(), &EngineOptions::default()) {
        Err(CostError::Config(msg)) => assert!(msg.contains("print sheet size 42")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_zero_quantity_rejected() {
    let mut request = flyer_request();
    request.job.quantity = 0;
    assert!(matches!(
        quote(&request, &create_test_catalog(), &eur_rates(), &EngineOptions::default()),
        Err(CostError::Config(_))
    ));
}

#[test]
fn test_invalid_final_size() {
    let mut request = flyer_request();
    request.job.final_size = Dimension::mm(0.0, 150.0);
    match quote(&request, &create_test_catalog(), &eur_rates(), &EngineOptions::default()) {
        Err(CostError::InvalidDimension { context, width, .. }) => {
            assert_eq!(context, "final item");
            assert_eq!(width, 0.0);
        }
        other => panic!("Expected InvalidDimension, got {:?}", other),
    }
}

#[test]
fn test_item_in_centimeters() {
    let mut request = flyer_request();
    request.job.final_size = Dimension::new(10.0, 15.0, LengthUnit::Cm);
    let result = quote(&request, &create_test_catalog(), &eur_rates(), &EngineOptions::default()).unwrap();
    assert_eq!(result.imposition.total_print_sheets(), 63);
}

#[test]
fn test_oversized_booklet_quantity_rejected() {
    let request = QuoteRequest {
        job: PrintJob::booklet(Dimension::mm(148.0, 210.0), u64::MAX / 2, 8),
        press: press(1),
        inner_press: None,
    };
    match quote(&request, &create_test_catalog(), &eur_rates(), &EngineOptions::default()) {
        Err(CostError::Config(msg)) => assert!(msg.contains("Quantity must not exceed")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_oversized_flat_quantity_with_per_page_extra_rejected() {
    let mut catalog = create_test_catalog();
    let mut varnish = extra(5, "Varnish", "per_page", 0.01, "EUR");
    varnish.supports_double_sided = true;
    catalog.extras.push(varnish);

    let mut request = flyer_request();
    request.job.quantity = u64::MAX;
    request.job.double_sided = true;
    request.job.extras.push(ExtraSelection::new(5, 1));

    assert!(matches!(
        quote(&request, &catalog, &eur_rates(), &EngineOptions::default()),
        Err(CostError::Config(_))
    ));
}

#[test]
fn test_too_many_booklet_pages_rejected() {
    let request = QuoteRequest {
        job: PrintJob::booklet(Dimension::mm(148.0, 210.0), 10, u64::MAX),
        press: press(1),
        inner_press: None,
    };
    match quote(&request, &create_test_catalog(), &eur_rates(), &EngineOptions::default()) {
        Err(CostError::Config(msg)) => assert!(msg.contains("pages")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_negative_click_cost_in_snapshot_rejected() {
    let mut catalog = create_test_catalog();
    catalog.machines[0].print_sheet_sizes[0].click_cost = -0.10;

    match quote(&flyer_request(), &catalog, &eur_rates(), &EngineOptions::default()) {
        Err(CostError::Config(msg)) => assert!(msg.contains("click cost")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_nan_gsm_in_snapshot_rejected() {
    let mut catalog = create_test_catalog();
    catalog.paper_types[0].gsm = f64::NAN;

    match quote(&flyer_request(), &catalog, &eur_rates(), &EngineOptions::default()) {
        Err(CostError::Config(msg)) => assert!(msg.contains("gsm")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}
