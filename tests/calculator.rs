//! 단가 계산 파이프라인 회귀 테스트.
use molding_cost_toolbox::costing::{
    compute_unit_cost, round_price, CalcOptions, CalculationInput, LogisticsInput, MarkupMode,
    ProcessKind, ProcessLineItem, SheetVariant, TransportMode,
};
use molding_cost_toolbox::master_data::{InjectionRate, MaterialRate};

fn assert_close(label: &str, actual: f64, expected: f64, rel_tol: f64) {
    let denom = expected.abs().max(1.0);
    let diff = (actual - expected).abs();
    assert!(
        diff <= rel_tol * denom,
        "{label} expected {expected:.6} got {actual:.6} (diff {diff:.6}, tol {rel_tol})"
    );
}

fn abs_rate() -> MaterialRate {
    MaterialRate {
        name: "ABS SD0170".to_string(),
        price_per_kg: 2000.0,
    }
}

fn t150_rate() -> InjectionRate {
    InjectionRate {
        tonnage: "150".to_string(),
        rate_per_hour: 500_000.0,
    }
}

fn reference_input() -> CalculationInput {
    CalculationInput {
        material_name: "ABS SD0170".to_string(),
        weight_grams: 50.0,
        cavity_count: 2.0,
        sprue_weight_grams: 10.0,
        cycle_time_seconds: 20.0,
        tonnage: "150".to_string(),
        processes: Vec::new(),
        logistics: LogisticsInput {
            packaging_cost: 0.0,
            transport_cost: 1000.0,
            overhead_rate_percent: 10.0,
            profit_rate_percent: None,
            quantity: None,
        },
    }
}

fn packaging_only(packaging: f64, overhead: f64, profit: Option<f64>) -> CalculationInput {
    CalculationInput {
        logistics: LogisticsInput {
            packaging_cost: packaging,
            overhead_rate_percent: overhead,
            profit_rate_percent: profit,
            ..LogisticsInput::default()
        },
        ..CalculationInput::default()
    }
}

#[test]
fn reference_quote_detail_scenario() {
    let r = compute_unit_cost(
        &reference_input(),
        Some(&abs_rate()),
        Some(&t150_rate()),
        SheetVariant::QuoteDetail.options(),
    );
    assert_close("material", r.material_cost, 117.7, 1e-12);
    assert_close("injection", r.injection_cost, 5_000_000.0, 1e-12);
    assert_eq!(r.process_cost, 0.0);
    assert_close("logistics", r.logistics_cost, 1000.0, 1e-12);
    assert_close("subtotal", r.sub_total, 5_001_117.7, 1e-12);
    assert_close("total", r.total_unit_price, 5_501_229.47, 1e-12);
    assert_eq!(r.profit_cost, 0.0);
    assert_eq!(r.applied_unit_price(), 5_501_229.47);
}

#[test]
fn repeated_calls_are_identical() {
    let input = reference_input();
    let opts = SheetVariant::DetailedCost.options();
    let a = compute_unit_cost(&input, Some(&abs_rate()), Some(&t150_rate()), opts);
    let b = compute_unit_cost(&input, Some(&abs_rate()), Some(&t150_rate()), opts);
    assert_eq!(a, b);
}

#[test]
fn subtotal_is_exact_sum_of_components() {
    let mut input = reference_input();
    input.weight_grams = 33.333;
    input.processes = vec![
        ProcessLineItem::new(ProcessKind::Coating, true, 12.34),
        ProcessLineItem::new(ProcessKind::Printing, true, 7.77),
    ];
    input.logistics.packaging_cost = 3.21;
    for variant in [SheetVariant::QuoteDetail, SheetVariant::DetailedCost] {
        let r = compute_unit_cost(&input, Some(&abs_rate()), Some(&t150_rate()), variant.options());
        assert_eq!(
            r.sub_total,
            r.material_cost + r.injection_cost + r.process_cost + r.logistics_cost
        );
    }
}

#[test]
fn zero_cavity_is_treated_as_one() {
    let mut zero = reference_input();
    zero.cavity_count = 0.0;
    let mut one = reference_input();
    one.cavity_count = 1.0;
    let opts = CalcOptions::default();
    let rz = compute_unit_cost(&zero, Some(&abs_rate()), Some(&t150_rate()), opts);
    let r1 = compute_unit_cost(&one, Some(&abs_rate()), Some(&t150_rate()), opts);
    assert!(rz.total_unit_price.is_finite());
    assert_eq!(rz, r1);
    assert_close("injection", rz.injection_cost, 10_000_000.0, 1e-12);
}

#[test]
fn inactive_process_contributes_nothing() {
    let mut input = packaging_only(0.0, 0.0, None);
    input.processes = vec![ProcessLineItem::new(ProcessKind::Deposition, true, 100.0)];
    let active = compute_unit_cost(&input, None, None, CalcOptions::default());
    assert_close("active", active.process_cost, 110.0, 1e-12);

    input.processes[0].active = false;
    let inactive = compute_unit_cost(&input, None, None, CalcOptions::default());
    assert_eq!(inactive.process_cost, 0.0);
    assert_eq!(inactive.total_unit_price, 0.0);
}

#[test]
fn loss_multipliers_are_applied_per_process() {
    let mut input = packaging_only(0.0, 0.0, None);
    input.processes = ProcessKind::ALL
        .iter()
        .map(|&kind| ProcessLineItem::new(kind, true, 100.0))
        .collect();
    let r = compute_unit_cost(&input, None, None, CalcOptions::default());
    // 110 + 105 + 103 + 103 + 100 + 110
    assert_close("process", r.process_cost, 631.0, 1e-12);
}

#[test]
fn negative_process_price_passes_through() {
    let mut input = packaging_only(0.0, 0.0, None);
    input.processes = vec![ProcessLineItem::new(ProcessKind::SubMaterial, true, -50.0)];
    let r = compute_unit_cost(&input, None, None, CalcOptions::default());
    assert_eq!(r.process_cost, -50.0);
}

#[test]
fn negative_half_cent_total_rounds_toward_positive() {
    let mut input = packaging_only(0.0, 0.0, None);
    input.processes = vec![ProcessLineItem::new(ProcessKind::SubMaterial, true, -0.125)];
    let r = compute_unit_cost(&input, None, None, CalcOptions::default());
    assert_eq!(r.total_unit_price, -0.125);
    assert_eq!(r.applied_unit_price(), -0.12);
    assert_eq!(round_price(r.total_unit_price), -0.12);
}

#[test]
fn detailed_markup_compounds_profit_on_overhead() {
    let detailed = compute_unit_cost(
        &packaging_only(1000.0, 20.0, Some(15.0)),
        None,
        None,
        SheetVariant::DetailedCost.options(),
    );
    let flat = compute_unit_cost(
        &packaging_only(1000.0, 35.0, None),
        None,
        None,
        SheetVariant::QuoteDetail.options(),
    );
    assert_eq!(detailed.sub_total, flat.sub_total);
    assert_close("overhead", detailed.overhead_cost, 200.0, 1e-12);
    assert_close("profit", detailed.profit_cost, 180.0, 1e-12);
    assert_close("detailed", detailed.total_unit_price, 1380.0, 1e-12);
    assert_close("flat", flat.total_unit_price, 1350.0, 1e-12);
    assert!(detailed.total_unit_price > flat.total_unit_price);
}

#[test]
fn flat_markup_ignores_profit_rate() {
    let r = compute_unit_cost(
        &packaging_only(1000.0, 10.0, Some(50.0)),
        None,
        None,
        CalcOptions {
            transport_mode: TransportMode::PerUnit,
            markup_mode: MarkupMode::Flat,
        },
    );
    assert_eq!(r.profit_cost, 0.0);
    assert_close("total", r.total_unit_price, 1100.0, 1e-12);
}

#[test]
fn lump_sum_transport_is_amortized_over_quantity() {
    let mut input = packaging_only(5.0, 0.0, None);
    input.logistics.transport_cost = 10_000.0;
    let lump = CalcOptions {
        transport_mode: TransportMode::LumpSum,
        markup_mode: MarkupMode::Flat,
    };

    input.logistics.quantity = Some(500.0);
    let r = compute_unit_cost(&input, None, None, lump);
    assert_close("amortized", r.logistics_cost, 25.0, 1e-12);

    for q in [None, Some(0.0), Some(0.5), Some(f64::NAN)] {
        input.logistics.quantity = q;
        let r = compute_unit_cost(&input, None, None, lump);
        assert_close("quantity floor", r.logistics_cost, 10_005.0, 1e-12);
    }

    input.logistics.quantity = Some(500.0);
    let per_unit = compute_unit_cost(&input, None, None, CalcOptions::default());
    assert_close("per unit", per_unit.logistics_cost, 10_005.0, 1e-12);
}

#[test]
fn missing_rates_cost_zero_without_failing() {
    let r = compute_unit_cost(&reference_input(), None, None, CalcOptions::default());
    assert_eq!(r.material_cost, 0.0);
    assert_eq!(r.injection_cost, 0.0);
    assert_close("total", r.total_unit_price, 1100.0, 1e-12);
}

#[test]
fn nan_fields_default_to_zero() {
    let mut input = reference_input();
    input.weight_grams = f64::NAN;
    input.sprue_weight_grams = f64::NAN;
    input.cycle_time_seconds = f64::NAN;
    input.logistics.overhead_rate_percent = f64::NAN;
    let r = compute_unit_cost(
        &input,
        Some(&abs_rate()),
        Some(&t150_rate()),
        CalcOptions::default(),
    );
    assert_eq!(r.material_cost, 0.0);
    assert_eq!(r.injection_cost, 0.0);
    assert_eq!(r.total_unit_price, 1000.0);
}

#[test]
fn non_negative_inputs_give_non_negative_outputs() {
    let mut input = reference_input();
    input.processes = vec![ProcessLineItem::new(ProcessKind::Ultrasonic, true, 40.0)];
    input.logistics.profit_rate_percent = Some(12.0);
    input.logistics.quantity = Some(3000.0);
    for variant in [SheetVariant::QuoteDetail, SheetVariant::DetailedCost] {
        let r = compute_unit_cost(&input, Some(&abs_rate()), Some(&t150_rate()), variant.options());
        for (label, v) in [
            ("material", r.material_cost),
            ("injection", r.injection_cost),
            ("process", r.process_cost),
            ("logistics", r.logistics_cost),
            ("subtotal", r.sub_total),
            ("overhead", r.overhead_cost),
            ("profit", r.profit_cost),
            ("total", r.total_unit_price),
        ] {
            assert!(v >= 0.0, "{label} was negative: {v}");
        }
    }
}

#[test]
fn breakdown_keeps_full_precision_until_applied() {
    let mut input = packaging_only(0.0, 0.0, None);
    input.material_name = "ABS SD0170".to_string();
    input.weight_grams = 1.0;
    let r = compute_unit_cost(&input, Some(&abs_rate()), None, CalcOptions::default());
    // 0.001 kg * 2000 * 1.07 = 2.14
    assert_close("material", r.material_cost, 2.14, 1e-12);

    input.weight_grams = 1.2345;
    let r = compute_unit_cost(&input, Some(&abs_rate()), None, CalcOptions::default());
    let expected = 0.0012345 * 2000.0 * 1.07;
    assert_close("material", r.material_cost, expected, 1e-12);
    assert_ne!(r.total_unit_price, round_price(r.total_unit_price));
    assert_eq!(r.applied_unit_price(), (r.total_unit_price * 100.0).round() / 100.0);
}

#[test]
fn calculation_input_reads_from_toml() {
    let src = r#"
material_name = "PP J-560S"
weight_grams = 12.5
sprue_weight_grams = 4
cycle_time_seconds = 18
tonnage = "110"

[[processes]]
kind = "subMaterial"
active = true
price = 30

[[processes]]
kind = "printing"
price = 10

[logistics]
packaging_cost = 2
transport_cost = 50000
overhead_rate_percent = 8
profit_rate_percent = 10
quantity = 10000
"#;
    let input: CalculationInput = toml::from_str(src).expect("parse input");
    assert_eq!(input.cavity_count, 1.0);
    assert_eq!(input.processes.len(), 2);
    assert_eq!(input.processes[0].kind, ProcessKind::SubMaterial);
    assert!(!input.processes[1].active);
    assert_eq!(input.logistics.quantity, Some(10_000.0));
}
