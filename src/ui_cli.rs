use std::io::{self, Write};

use crate::app::{AppError, Session};
use crate::config::Config;
use crate::costing::{CalculationResult, SheetVariant, TransportMode};
use crate::i18n::{keys, Translator};
use crate::master_data::{resolve_rates, MasterData};
use crate::quote::{ApplyContext, QuoteSheet};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Quote,
    MasterData,
    Settings,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    println!("{}", tr.t(keys::MAIN_MENU_TITLE));
    println!("{}", tr.t(keys::MAIN_MENU_QUOTE));
    println!("{}", tr.t(keys::MAIN_MENU_MASTER_DATA));
    println!("{}", tr.t(keys::MAIN_MENU_SETTINGS));
    println!("{}", tr.t(keys::MAIN_MENU_EXIT));
    loop {
        let sel = read_line(tr.t(keys::PROMPT_MENU_SELECT))?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::Quote),
            "2" => return Ok(MenuChoice::MasterData),
            "3" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 견적 단가 계산 메뉴를 처리한다.
pub fn handle_quote(tr: &Translator, session: &Session) -> Result<(), AppError> {
    println!("{}", tr.t(keys::QUOTE_HEADING));
    let variant = session.config.sheet_variant;
    println!("{} {}", tr.t(keys::QUOTE_VARIANT), tr.variant_name(variant));

    let mut sheet = QuoteSheet::new(variant);
    let form = &mut sheet.form;
    form.material_name = read_line(tr.t(keys::PROMPT_MATERIAL))?.trim().to_string();
    form.weight = read_line(tr.t(keys::PROMPT_WEIGHT))?;
    form.cavity = read_line(tr.t(keys::PROMPT_CAVITY))?;
    form.sprue_weight = read_line(tr.t(keys::PROMPT_SPRUE))?;
    form.cycle_time = read_line(tr.t(keys::PROMPT_CYCLE_TIME))?;
    form.tonnage = read_line(tr.t(keys::PROMPT_TONNAGE))?.trim().to_string();
    for field in form.processes.iter_mut() {
        let prompt = format!(
            "{} {}",
            tr.process_name(field.kind),
            tr.t(keys::PROMPT_PROCESS_PRICE)
        );
        let price = read_line(&prompt)?;
        field.active = !price.trim().is_empty();
        field.price = price;
    }
    form.packaging_cost = read_line(tr.t(keys::PROMPT_PACKAGING))?;
    match variant.options().transport_mode {
        TransportMode::PerUnit => {
            form.transport_cost = read_line(tr.t(keys::PROMPT_TRANSPORT_PER_UNIT))?;
        }
        TransportMode::LumpSum => {
            form.transport_cost = read_line(tr.t(keys::PROMPT_TRANSPORT_LUMP_SUM))?;
            form.quantity = read_line(tr.t(keys::PROMPT_QUANTITY))?;
        }
    }
    form.overhead_rate = read_line(tr.t(keys::PROMPT_OVERHEAD_RATE))?;
    if variant == SheetVariant::DetailedCost {
        form.profit_rate = read_line(tr.t(keys::PROMPT_PROFIT_RATE))?;
    }

    let rates = resolve_rates(&session.master_data, &sheet.form.material_name, &sheet.form.tonnage);
    if rates.missing(&sheet.form.material_name, &sheet.form.tonnage) {
        println!("{}", tr.t(keys::NOTICE_MISSING_RATE));
    }
    let result = sheet.recalculate(&session.master_data);
    print_result(tr, variant, &result);

    let answer = read_line(tr.t(keys::PROMPT_APPLY))?;
    if !answer.trim().eq_ignore_ascii_case("y") {
        return Ok(());
    }
    let ctx = ApplyContext {
        actor: &session.config.actor,
        activity_log: session.activity_log.as_ref(),
    };
    match sheet.apply(&result, &ctx, |_| {}) {
        Ok(applied) => println!(
            "{} {} / {:.2}",
            tr.t(keys::RESULT_APPLIED),
            applied.material,
            applied.unit_price
        ),
        Err(err) => println!("{}: {err}", tr.t(keys::ERROR_PREFIX)),
    }
    Ok(())
}

/// 단가표를 출력한다.
pub fn handle_master_data(tr: &Translator, data: &MasterData) {
    println!("{}", tr.t(keys::MASTER_DATA_HEADING));
    println!("{}", tr.t(keys::MASTER_DATA_MATERIALS));
    for m in &data.materials {
        println!("  {:<20} {:>12.2}", m.name, m.price_per_kg);
    }
    println!("{}", tr.t(keys::MASTER_DATA_TONNAGES));
    for r in &data.injection_rates {
        println!("  {:<20} {:>12.2}", r.tonnage, r.rate_per_hour);
    }
}

/// 설정 메뉴를 처리한다.
pub fn handle_settings(tr: &Translator, cfg: &mut Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::SETTINGS_HEADING));
    println!(
        "{} {}",
        tr.t(keys::SETTINGS_CURRENT_VARIANT),
        tr.variant_name(cfg.sheet_variant)
    );
    println!("{}", tr.t(keys::SETTINGS_OPTIONS));
    let sel = read_line(tr.t(keys::SETTINGS_PROMPT_CHANGE))?;
    if sel.trim().is_empty() {
        return Ok(());
    }
    cfg.sheet_variant = match sel.trim() {
        "1" => SheetVariant::QuoteDetail,
        "2" => SheetVariant::DetailedCost,
        _ => {
            println!("{}", tr.t(keys::SETTINGS_INVALID));
            return Ok(());
        }
    };
    println!(
        "{} {}",
        tr.t(keys::SETTINGS_SAVED),
        tr.variant_name(cfg.sheet_variant)
    );
    Ok(())
}

/// 계산 내역을 전체 정밀도로, 최종 단가는 반영 기준(소수 둘째 자리)으로 출력한다.
pub fn print_result(tr: &Translator, variant: SheetVariant, result: &CalculationResult) {
    println!("{} {}", tr.t(keys::RESULT_MATERIAL), result.material_cost);
    println!("{} {}", tr.t(keys::RESULT_INJECTION), result.injection_cost);
    println!("{} {}", tr.t(keys::RESULT_PROCESS), result.process_cost);
    println!("{} {}", tr.t(keys::RESULT_LOGISTICS), result.logistics_cost);
    println!("{} {}", tr.t(keys::RESULT_SUB_TOTAL), result.sub_total);
    println!("{} {}", tr.t(keys::RESULT_OVERHEAD), result.overhead_cost);
    if variant == SheetVariant::DetailedCost {
        println!("{} {}", tr.t(keys::RESULT_PROFIT), result.profit_cost);
    }
    println!(
        "{} {:.2} ({})",
        tr.t(keys::RESULT_TOTAL),
        result.applied_unit_price(),
        result.total_unit_price
    );
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush().map_err(AppError::Io)?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).map_err(AppError::Io)?;
    Ok(buf)
}
