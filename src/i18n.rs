use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

use crate::costing::{ProcessKind, SheetVariant};

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_QUOTE: &str = "main_menu.quote";
    pub const MAIN_MENU_MASTER_DATA: &str = "main_menu.master_data";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";

    pub const QUOTE_HEADING: &str = "quote.heading";
    pub const QUOTE_VARIANT: &str = "quote.variant";
    pub const PROMPT_MATERIAL: &str = "prompt.material";
    pub const PROMPT_WEIGHT: &str = "prompt.weight";
    pub const PROMPT_CAVITY: &str = "prompt.cavity";
    pub const PROMPT_SPRUE: &str = "prompt.sprue";
    pub const PROMPT_CYCLE_TIME: &str = "prompt.cycle_time";
    pub const PROMPT_TONNAGE: &str = "prompt.tonnage";
    pub const PROMPT_PROCESS_PRICE: &str = "prompt.process_price";
    pub const PROMPT_PACKAGING: &str = "prompt.packaging";
    pub const PROMPT_TRANSPORT_PER_UNIT: &str = "prompt.transport_per_unit";
    pub const PROMPT_TRANSPORT_LUMP_SUM: &str = "prompt.transport_lump_sum";
    pub const PROMPT_QUANTITY: &str = "prompt.quantity";
    pub const PROMPT_OVERHEAD_RATE: &str = "prompt.overhead_rate";
    pub const PROMPT_PROFIT_RATE: &str = "prompt.profit_rate";
    pub const PROMPT_APPLY: &str = "prompt.apply";

    pub const RESULT_MATERIAL: &str = "result.material";
    pub const RESULT_INJECTION: &str = "result.injection";
    pub const RESULT_PROCESS: &str = "result.process";
    pub const RESULT_LOGISTICS: &str = "result.logistics";
    pub const RESULT_SUB_TOTAL: &str = "result.sub_total";
    pub const RESULT_OVERHEAD: &str = "result.overhead";
    pub const RESULT_PROFIT: &str = "result.profit";
    pub const RESULT_TOTAL: &str = "result.total";
    pub const RESULT_APPLIED: &str = "result.applied";
    pub const NOTICE_MISSING_RATE: &str = "notice.missing_rate";

    pub const PROCESS_DEPOSITION: &str = "process.deposition";
    pub const PROCESS_COATING: &str = "process.coating";
    pub const PROCESS_PRINTING: &str = "process.printing";
    pub const PROCESS_ASSEMBLY: &str = "process.assembly";
    pub const PROCESS_SUB_MATERIAL: &str = "process.sub_material";
    pub const PROCESS_ULTRASONIC: &str = "process.ultrasonic";

    pub const VARIANT_QUOTE_DETAIL: &str = "variant.quote_detail";
    pub const VARIANT_DETAILED_COST: &str = "variant.detailed_cost";

    pub const MASTER_DATA_HEADING: &str = "master_data.heading";
    pub const MASTER_DATA_MATERIALS: &str = "master_data.materials";
    pub const MASTER_DATA_TONNAGES: &str = "master_data.tonnages";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_CURRENT_VARIANT: &str = "settings.current_variant";
    pub const SETTINGS_OPTIONS: &str = "settings.options";
    pub const SETTINGS_PROMPT_CHANGE: &str = "settings.prompt_change";
    pub const SETTINGS_INVALID: &str = "settings.invalid";
    pub const SETTINGS_SAVED: &str = "settings.saved";

    pub const GUI_TITLE: &str = "gui.title";
    pub const GUI_OPEN_MASTER_DATA: &str = "gui.open_master_data";
    pub const GUI_SECTION_MOLDING: &str = "gui.section_molding";
    pub const GUI_SECTION_PROCESS: &str = "gui.section_process";
    pub const GUI_SECTION_LOGISTICS: &str = "gui.section_logistics";
    pub const GUI_SECTION_RESULT: &str = "gui.section_result";
    pub const GUI_APPLY: &str = "gui.apply";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ko,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("en") {
            Language::En
        } else {
            Language::Ko
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(ko/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 ko로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    /// 번역을 가져온다. 영어 번역이 없으면 한국어 문자열을 폴백한다.
    pub fn t<'a>(&'a self, key: &str) -> &'a str {
        if let Some(v) = self.overrides.as_ref().and_then(|m| m.get(key)) {
            return v.as_str();
        }
        match self.lang {
            Language::En => en(key).unwrap_or_else(|| ko(key)),
            Language::Ko => ko(key),
        }
    }

    pub fn process_name(&self, kind: ProcessKind) -> &str {
        use keys::*;
        self.t(match kind {
            ProcessKind::Deposition => PROCESS_DEPOSITION,
            ProcessKind::Coating => PROCESS_COATING,
            ProcessKind::Printing => PROCESS_PRINTING,
            ProcessKind::Assembly => PROCESS_ASSEMBLY,
            ProcessKind::SubMaterial => PROCESS_SUB_MATERIAL,
            ProcessKind::Ultrasonic => PROCESS_ULTRASONIC,
        })
    }

    pub fn variant_name(&self, variant: SheetVariant) -> &str {
        self.t(match variant {
            SheetVariant::QuoteDetail => keys::VARIANT_QUOTE_DETAIL,
            SheetVariant::DetailedCost => keys::VARIANT_DETAILED_COST,
        })
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en-us".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "ko" | "ko-kr" => Some("ko".into()),
        "en" | "en-us" | "en-uk" => Some("en-us".into()),
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko".into()),
        other if other.starts_with("en") => Some("en-us".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko".into()),
        "en" => Some("en-us".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(code) = get_locale().and_then(|loc| normalize_locale_string(&loc)) {
        return Some(code);
    }
    ["LANG", "LC_ALL"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|v| normalize_locale_string(&v))
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 또는 [section] 아래 key = "value".
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let try_load = |code: &str| -> Option<HashMap<String, String>> {
        let path = Path::new(dir).join(format!("{code}.toml"));
        let content = fs::read_to_string(path).ok()?;
        parse_toml_to_map(&content)
    };

    if let Some(map) = try_load(lang) {
        return Some(map);
    }
    if let Some((base, _)) = lang.split_once(['-', '_']) {
        if let Some(map) = try_load(base) {
            return Some(map);
        }
    }
    None
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn ko(key: &str) -> &'static str {
    use keys::*;
    match key {
        ERROR_PREFIX => "오류",
        APP_EXIT => "프로그램을 종료합니다.",
        MAIN_MENU_TITLE => "\n=== 사출 견적 원가 계산기 ===",
        MAIN_MENU_QUOTE => "1) 견적 단가 계산",
        MAIN_MENU_MASTER_DATA => "2) 단가표 조회",
        MAIN_MENU_SETTINGS => "3) 설정",
        MAIN_MENU_EXIT => "0) 종료",
        PROMPT_MENU_SELECT => "메뉴 선택: ",
        INVALID_SELECTION_RETRY => "잘못된 입력입니다. 다시 선택하세요.",
        QUOTE_HEADING => "\n-- 견적 단가 계산 --",
        QUOTE_VARIANT => "계산 방식:",
        PROMPT_MATERIAL => "원료명(예: ABS SD0170): ",
        PROMPT_WEIGHT => "제품 중량 [g]: ",
        PROMPT_CAVITY => "캐비티 수 (엔터=1): ",
        PROMPT_SPRUE => "스프루 중량 [g]: ",
        PROMPT_CYCLE_TIME => "사이클 타임 [s]: ",
        PROMPT_TONNAGE => "사출기 톤수: ",
        PROMPT_PROCESS_PRICE => "단가 [원/개] (미사용 시 엔터): ",
        PROMPT_PACKAGING => "포장비 [원/개]: ",
        PROMPT_TRANSPORT_PER_UNIT => "운송비 [원/개]: ",
        PROMPT_TRANSPORT_LUMP_SUM => "운송비 총액 [원]: ",
        PROMPT_QUANTITY => "주문 수량(MOQ): ",
        PROMPT_OVERHEAD_RATE => "일반관리비율 [%]: ",
        PROMPT_PROFIT_RATE => "이익률 [%]: ",
        PROMPT_APPLY => "이 단가를 견적에 반영할까요? (y/N): ",
        RESULT_MATERIAL => "원료비:",
        RESULT_INJECTION => "사출비:",
        RESULT_PROCESS => "후가공비:",
        RESULT_LOGISTICS => "물류비:",
        RESULT_SUB_TOTAL => "소계:",
        RESULT_OVERHEAD => "일반관리비:",
        RESULT_PROFIT => "이익:",
        RESULT_TOTAL => "최종 단가:",
        RESULT_APPLIED => "견적 반영 완료:",
        NOTICE_MISSING_RATE => "주의: 단가표에 없는 원료/톤수는 0원으로 계산됩니다.",
        PROCESS_DEPOSITION => "증착",
        PROCESS_COATING => "코팅",
        PROCESS_PRINTING => "인쇄",
        PROCESS_ASSEMBLY => "조립",
        PROCESS_SUB_MATERIAL => "부자재",
        PROCESS_ULTRASONIC => "초음파",
        VARIANT_QUOTE_DETAIL => "견적 상세 (개당 운송비, 단일 관리비율)",
        VARIANT_DETAILED_COST => "상세 원가 (운송비 수량 배분, 관리비 후 이익)",
        MASTER_DATA_HEADING => "\n-- 단가표 --",
        MASTER_DATA_MATERIALS => "원료 [원/kg]",
        MASTER_DATA_TONNAGES => "톤수 임률 [원/h]",
        SETTINGS_HEADING => "\n-- 설정 --",
        SETTINGS_CURRENT_VARIANT => "현재 기본 계산 방식:",
        SETTINGS_OPTIONS => "1) 견적 상세  2) 상세 원가",
        SETTINGS_PROMPT_CHANGE => "변경할 번호(취소하려면 엔터): ",
        SETTINGS_INVALID => "잘못된 입력이므로 변경하지 않습니다.",
        SETTINGS_SAVED => "기본 계산 방식이 변경되었습니다:",
        GUI_TITLE => "사출 견적 원가 계산기",
        GUI_OPEN_MASTER_DATA => "단가표 열기…",
        GUI_SECTION_MOLDING => "원료 / 사출",
        GUI_SECTION_PROCESS => "후가공",
        GUI_SECTION_LOGISTICS => "물류 / 관리비",
        GUI_SECTION_RESULT => "계산 결과",
        GUI_APPLY => "견적에 반영",
        _ => "",
    }
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting.",
        MAIN_MENU_TITLE => "\n=== Molding Quote Cost Calculator ===",
        MAIN_MENU_QUOTE => "1) Unit cost calculation",
        MAIN_MENU_MASTER_DATA => "2) Rate tables",
        MAIN_MENU_SETTINGS => "3) Settings",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please try again.",
        QUOTE_HEADING => "\n-- Unit Cost Calculation --",
        QUOTE_VARIANT => "Calculation mode:",
        PROMPT_MATERIAL => "Material (ex: ABS SD0170): ",
        PROMPT_WEIGHT => "Part weight [g]: ",
        PROMPT_CAVITY => "Cavity count (enter=1): ",
        PROMPT_SPRUE => "Sprue weight [g]: ",
        PROMPT_CYCLE_TIME => "Cycle time [s]: ",
        PROMPT_TONNAGE => "Machine tonnage: ",
        PROMPT_PROCESS_PRICE => "price per unit (enter to skip): ",
        PROMPT_PACKAGING => "Packaging cost per unit: ",
        PROMPT_TRANSPORT_PER_UNIT => "Transport cost per unit: ",
        PROMPT_TRANSPORT_LUMP_SUM => "Transport cost, order total: ",
        PROMPT_QUANTITY => "Order quantity (MOQ): ",
        PROMPT_OVERHEAD_RATE => "Overhead rate [%]: ",
        PROMPT_PROFIT_RATE => "Profit rate [%]: ",
        PROMPT_APPLY => "Apply this price to the quote? (y/N): ",
        RESULT_MATERIAL => "Material:",
        RESULT_INJECTION => "Injection:",
        RESULT_PROCESS => "Post-processing:",
        RESULT_LOGISTICS => "Logistics:",
        RESULT_SUB_TOTAL => "Subtotal:",
        RESULT_OVERHEAD => "Overhead:",
        RESULT_PROFIT => "Profit:",
        RESULT_TOTAL => "Unit price:",
        RESULT_APPLIED => "Applied to quote:",
        NOTICE_MISSING_RATE => {
            "Note: materials/tonnages missing from the rate tables are costed at 0."
        }
        PROCESS_DEPOSITION => "Deposition",
        PROCESS_COATING => "Coating",
        PROCESS_PRINTING => "Printing",
        PROCESS_ASSEMBLY => "Assembly",
        PROCESS_SUB_MATERIAL => "Sub-material",
        PROCESS_ULTRASONIC => "Ultrasonic welding",
        VARIANT_QUOTE_DETAIL => "Quote detail (per-unit transport, flat overhead)",
        VARIANT_DETAILED_COST => "Detailed cost (lump-sum transport, overhead then profit)",
        MASTER_DATA_HEADING => "\n-- Rate Tables --",
        MASTER_DATA_MATERIALS => "Materials [per kg]",
        MASTER_DATA_TONNAGES => "Tonnage rates [per h]",
        SETTINGS_HEADING => "\n-- Settings --",
        SETTINGS_CURRENT_VARIANT => "Current default mode:",
        SETTINGS_OPTIONS => "1) Quote detail  2) Detailed cost",
        SETTINGS_PROMPT_CHANGE => "Enter number to change (enter to cancel): ",
        SETTINGS_INVALID => "Invalid input; mode unchanged.",
        SETTINGS_SAVED => "Default mode changed to:",
        GUI_TITLE => "Molding Quote Cost Calculator",
        GUI_OPEN_MASTER_DATA => "Open rate tables…",
        GUI_SECTION_MOLDING => "Material / Molding",
        GUI_SECTION_PROCESS => "Post-processing",
        GUI_SECTION_LOGISTICS => "Logistics / Markup",
        GUI_SECTION_RESULT => "Result",
        GUI_APPLY => "Apply to quote",
        _ => return None,
    })
}
