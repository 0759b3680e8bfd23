//! 견적 시트 입력 → 재계산 → 단가 반영 흐름 테스트.
use std::cell::RefCell;
use std::io;

use molding_cost_toolbox::activity_log::{
    ActivityEntry, ActivityLog, ActivityLogError, JsonlActivityLog,
};
use molding_cost_toolbox::costing::{ProcessKind, SheetVariant};
use molding_cost_toolbox::master_data::MasterData;
use molding_cost_toolbox::quote::apply::{APPLY_ACTION, APPLY_CATEGORY};
use molding_cost_toolbox::quote::{AppliedPrice, ApplyContext, ApplyError, QuoteSheet};

#[derive(Default)]
struct RecordingLog {
    entries: RefCell<Vec<ActivityEntry>>,
}

impl ActivityLog for RecordingLog {
    fn log_activity(&self, entry: &ActivityEntry) -> Result<(), ActivityLogError> {
        self.entries.borrow_mut().push(entry.clone());
        Ok(())
    }
}

struct FailingLog;

impl ActivityLog for FailingLog {
    fn log_activity(&self, _entry: &ActivityEntry) -> Result<(), ActivityLogError> {
        Err(io::Error::new(io::ErrorKind::Other, "disk full").into())
    }
}

fn reference_sheet() -> QuoteSheet {
    let mut sheet = QuoteSheet::new(SheetVariant::QuoteDetail);
    let form = &mut sheet.form;
    form.material_name = "ABS SD0170".to_string();
    form.weight = "50".to_string();
    form.cavity = "2".to_string();
    form.sprue_weight = "10".to_string();
    form.cycle_time = "20".to_string();
    form.tonnage = "150".to_string();
    form.packaging_cost = "0".to_string();
    form.transport_cost = "1000".to_string();
    form.overhead_rate = "10".to_string();
    sheet
}

#[test]
fn sheet_text_is_coerced_to_numbers() {
    let mut sheet = QuoteSheet::default();
    sheet.form.weight = "abc".to_string();
    sheet.form.cavity = String::new();
    sheet.form.cycle_time = " 15 ".to_string();
    sheet.form.profit_rate = String::new();
    let input = sheet.form.to_input();
    assert_eq!(input.weight_grams, 0.0);
    assert_eq!(input.cavity_count, 1.0);
    assert_eq!(input.cycle_time_seconds, 15.0);
    assert_eq!(input.logistics.profit_rate_percent, None);
    assert_eq!(input.processes.len(), ProcessKind::ALL.len());
}

#[test]
fn sheet_recalculates_reference_scenario_from_built_in_rates() {
    let data = MasterData::built_in();
    let result = reference_sheet().recalculate(&data);
    assert!((result.total_unit_price - 5_501_229.47).abs() < 1e-6);
    assert_eq!(result.applied_unit_price(), 5_501_229.47);
}

#[test]
fn toggling_a_process_changes_the_next_recalculation() {
    let data = MasterData::built_in();
    let mut sheet = reference_sheet();
    let before = sheet.recalculate(&data);
    let field = sheet.form.process_mut(ProcessKind::Coating).expect("coating field");
    field.active = true;
    field.price = "100".to_string();
    let after = sheet.recalculate(&data);
    assert!((after.process_cost - 105.0).abs() < 1e-9);
    assert!((after.sub_total - before.sub_total - 105.0).abs() < 1e-6);

    sheet.form.process_mut(ProcessKind::Coating).expect("coating field").active = false;
    assert_eq!(sheet.recalculate(&data), before);
}

#[test]
fn typo_in_material_name_costs_material_at_zero() {
    let data = MasterData::built_in();
    let mut sheet = reference_sheet();
    sheet.form.material_name = "ABS SD0171".to_string();
    let result = sheet.recalculate(&data);
    assert_eq!(result.material_cost, 0.0);
    assert!(result.injection_cost > 0.0);
}

#[test]
fn apply_rounds_price_and_truncates_material() {
    let data = MasterData::built_in();
    let sheet = reference_sheet();
    let result = sheet.recalculate(&data);
    let log = RecordingLog::default();
    let ctx = ApplyContext {
        actor: "kim",
        activity_log: &log,
    };
    let mut received: Vec<AppliedPrice> = Vec::new();
    let applied = sheet
        .apply(&result, &ctx, |p| received.push(p.clone()))
        .expect("apply");

    assert_eq!(applied.material, "ABS");
    assert_eq!(applied.unit_price, 5_501_229.47);
    assert_eq!(received, vec![applied.clone()]);

    let entries = log.entries.borrow();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].actor, "kim");
    assert_eq!(entries[0].action, APPLY_ACTION);
    assert_eq!(entries[0].category, APPLY_CATEGORY);
    assert_eq!(entries[0].metadata["material"], "ABS");
}

#[test]
fn only_apply_writes_an_audit_entry() {
    let data = MasterData::built_in();
    let log = RecordingLog::default();
    let ctx = ApplyContext {
        actor: "kim",
        activity_log: &log,
    };
    let mut sheet = reference_sheet();
    for cycle in ["20", "22", "20"] {
        sheet.form.cycle_time = cycle.to_string();
        sheet.recalculate(&data);
    }
    assert!(log.entries.borrow().is_empty());

    let result = sheet.recalculate(&data);
    sheet.apply(&result, &ctx, |_| {}).expect("apply");
    sheet.recalculate(&data);
    assert_eq!(log.entries.borrow().len(), 1);
}

#[test]
fn apply_requires_material_and_weight() {
    let data = MasterData::built_in();
    let log = RecordingLog::default();
    let ctx = ApplyContext {
        actor: "kim",
        activity_log: &log,
    };
    let mut called = false;

    for material in ["", "  "] {
        let mut sheet = reference_sheet();
        sheet.form.material_name = material.to_string();
        let result = sheet.recalculate(&data);
        let err = sheet.apply(&result, &ctx, |_| called = true).unwrap_err();
        assert_eq!(err, ApplyError::MissingMaterial, "material {material:?}");
    }

    for weight in ["", "0", "abc", "NaN"] {
        let mut sheet = reference_sheet();
        sheet.form.weight = weight.to_string();
        let result = sheet.recalculate(&data);
        let err = sheet.apply(&result, &ctx, |_| called = true).unwrap_err();
        assert_eq!(err, ApplyError::MissingWeight, "weight {weight:?}");
    }

    assert!(!called);
    assert!(log.entries.borrow().is_empty());
}

#[test]
fn small_nonzero_weight_counts_as_entered() {
    let data = MasterData::built_in();
    let mut sheet = reference_sheet();
    sheet.form.weight = "0.01".to_string();
    let result = sheet.recalculate(&data);
    let ctx = ApplyContext {
        actor: "kim",
        activity_log: &FailingLog,
    };
    assert!(sheet.apply(&result, &ctx, |_| {}).is_ok());
}

#[test]
fn audit_failure_does_not_block_apply() {
    let data = MasterData::built_in();
    let sheet = reference_sheet();
    let result = sheet.recalculate(&data);
    let ctx = ApplyContext {
        actor: "kim",
        activity_log: &FailingLog,
    };
    let applied = sheet.apply(&result, &ctx, |_| {}).expect("apply despite log failure");
    assert_eq!(applied.material, "ABS");
}

#[test]
fn jsonl_log_appends_one_line_per_apply() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("activity.jsonl");
    let log = JsonlActivityLog::new(&path);
    assert_eq!(log.path(), path.as_path());
    let ctx = ApplyContext {
        actor: "lee",
        activity_log: &log,
    };
    let data = MasterData::built_in();
    let sheet = reference_sheet();
    let result = sheet.recalculate(&data);
    sheet.apply(&result, &ctx, |_| {}).expect("first apply");
    sheet.apply(&result, &ctx, |_| {}).expect("second apply");

    let content = std::fs::read_to_string(&path).expect("read log");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    let entry: ActivityEntry = serde_json::from_str(lines[0]).expect("parse entry");
    assert_eq!(entry.actor, "lee");
    let unit_price = entry.metadata["unitPrice"].as_f64().expect("unitPrice");
    assert!((unit_price - 5_501_229.47).abs() < 1e-6);
}
