use serde::{Deserialize, Serialize};

use crate::costing::injection::injection_cost;
use crate::costing::logistics::{logistics_cost, LogisticsInput, TransportMode};
use crate::costing::markup::{apply_markup, MarkupMode};
use crate::costing::material::material_cost;
use crate::costing::process::{process_cost, ProcessLineItem};
use crate::costing::rounding::round_price;
use crate::master_data::{InjectionRate, MaterialRate};
use crate::numeric::finite_or_zero;

/// 계산 방식 스위치. 두 견적 시트가 각각 다른 조합을 쓴다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalcOptions {
    pub transport_mode: TransportMode,
    pub markup_mode: MarkupMode,
}

/// 견적 시트 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SheetVariant {
    /// 견적 상세 시트: 개당 운송비 + 단일 관리비율
    #[default]
    QuoteDetail,
    /// 상세 원가 계산 시트: 총액 운송비 배분 + 관리비 후 이익
    DetailedCost,
}

impl SheetVariant {
    pub fn options(self) -> CalcOptions {
        match self {
            SheetVariant::QuoteDetail => CalcOptions {
                transport_mode: TransportMode::PerUnit,
                markup_mode: MarkupMode::Flat,
            },
            SheetVariant::DetailedCost => CalcOptions {
                transport_mode: TransportMode::LumpSum,
                markup_mode: MarkupMode::OverheadThenProfit,
            },
        }
    }
}

impl From<SheetVariant> for CalcOptions {
    fn from(value: SheetVariant) -> Self {
        value.options()
    }
}

/// 단가 계산 입력.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationInput {
    /// 원료 전체 표기(예: "ABS SD0170")
    pub material_name: String,
    /// 제품 중량 [g]
    pub weight_grams: f64,
    /// 캐비티 수. 1 미만이면 1로 본다
    pub cavity_count: f64,
    /// 스프루 중량 [g/샷]
    pub sprue_weight_grams: f64,
    /// 사이클 타임 [s]
    pub cycle_time_seconds: f64,
    /// 사출기 톤수
    pub tonnage: String,
    pub processes: Vec<ProcessLineItem>,
    pub logistics: LogisticsInput,
}

impl Default for CalculationInput {
    fn default() -> Self {
        Self {
            material_name: String::new(),
            weight_grams: 0.0,
            cavity_count: 1.0,
            sprue_weight_grams: 0.0,
            cycle_time_seconds: 0.0,
            tonnage: String::new(),
            processes: Vec::new(),
            logistics: LogisticsInput::default(),
        }
    }
}

impl CalculationInput {
    /// 0으로 나누지 않도록 보정한 캐비티 수.
    pub fn effective_cavity_count(&self) -> f64 {
        let c = finite_or_zero(self.cavity_count);
        if c < 1.0 {
            1.0
        } else {
            c
        }
    }
}

/// 단가 계산 결과. 모든 금액은 입력 단가와 같은 통화 단위이며 반올림하지 않은 값이다.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CalculationResult {
    pub material_cost: f64,
    pub injection_cost: f64,
    pub process_cost: f64,
    pub logistics_cost: f64,
    pub sub_total: f64,
    pub overhead_cost: f64,
    pub profit_cost: f64,
    pub total_unit_price: f64,
}

impl CalculationResult {
    /// 견적에 반영할 최종 단가(소수 둘째 자리 반올림).
    pub fn applied_unit_price(&self) -> f64 {
        round_price(self.total_unit_price)
    }
}

/// 단가를 계산한다.
///
/// 단가 조회는 호출 측에서 끝내고 결과만 넘긴다. `None`이면 해당 단가를 0으로 본다.
/// 항상 값을 돌려주며 실패하지 않는다.
pub fn compute_unit_cost(
    input: &CalculationInput,
    material_rate: Option<&MaterialRate>,
    injection_rate: Option<&InjectionRate>,
    options: CalcOptions,
) -> CalculationResult {
    let cavity = input.effective_cavity_count();

    let material_cost = material_cost(
        input.weight_grams,
        input.sprue_weight_grams,
        cavity,
        material_rate,
    );
    let injection_cost = injection_cost(input.cycle_time_seconds, cavity, injection_rate);
    let process_cost = process_cost(&input.processes);
    let logistics_cost = logistics_cost(&input.logistics, options.transport_mode);

    let sub_total = material_cost + injection_cost + process_cost + logistics_cost;
    let markup = apply_markup(sub_total, &input.logistics, options.markup_mode);

    let result = CalculationResult {
        material_cost,
        injection_cost,
        process_cost,
        logistics_cost,
        sub_total,
        overhead_cost: markup.overhead_cost,
        profit_cost: markup.profit_cost,
        total_unit_price: markup.total_unit_price,
    };
    tracing::debug!(
        material = %input.material_name,
        ?options,
        ?result,
        "단가 재계산"
    );
    result
}
