use serde::{Deserialize, Serialize};

use crate::costing::{
    compute_unit_cost, CalculationInput, CalculationResult, LogisticsInput, ProcessKind,
    ProcessLineItem, SheetVariant,
};
use crate::master_data::{resolve_rates, RateLookup};
use crate::numeric::parse_number_or_zero;
use crate::quote::apply::{apply_to_quote, AppliedPrice, ApplyContext, ApplyError};

/// 후가공 입력 칸 하나.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessField {
    pub kind: ProcessKind,
    pub active: bool,
    pub price: String,
}

/// 견적 시트의 입력 칸을 사용자가 입력한 문자열 그대로 보관한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteSheetForm {
    pub material_name: String,
    pub weight: String,
    pub cavity: String,
    pub sprue_weight: String,
    pub cycle_time: String,
    pub tonnage: String,
    pub processes: Vec<ProcessField>,
    pub packaging_cost: String,
    pub transport_cost: String,
    pub overhead_rate: String,
    pub profit_rate: String,
    pub quantity: String,
}

impl Default for QuoteSheetForm {
    fn default() -> Self {
        Self {
            material_name: String::new(),
            weight: String::new(),
            cavity: "1".to_string(),
            sprue_weight: String::new(),
            cycle_time: String::new(),
            tonnage: String::new(),
            processes: ProcessKind::ALL
                .iter()
                .map(|&kind| ProcessField {
                    kind,
                    active: false,
                    price: String::new(),
                })
                .collect(),
            packaging_cost: String::new(),
            transport_cost: String::new(),
            overhead_rate: String::new(),
            profit_rate: String::new(),
            quantity: String::new(),
        }
    }
}

impl QuoteSheetForm {
    pub fn process_mut(&mut self, kind: ProcessKind) -> Option<&mut ProcessField> {
        self.processes.iter_mut().find(|p| p.kind == kind)
    }

    /// 입력된 중량 [g]. 비어 있거나 숫자가 아니면 0.
    pub fn weight_grams(&self) -> f64 {
        parse_number_or_zero(&self.weight)
    }

    /// 문자열 칸을 계산 입력으로 바꾼다. 숫자가 아닌 칸은 모두 0이 된다.
    pub fn to_input(&self) -> CalculationInput {
        let cavity = if self.cavity.trim().is_empty() {
            1.0
        } else {
            parse_number_or_zero(&self.cavity)
        };
        let optional = |text: &str| {
            if text.trim().is_empty() {
                None
            } else {
                Some(parse_number_or_zero(text))
            }
        };
        CalculationInput {
            material_name: self.material_name.clone(),
            weight_grams: self.weight_grams(),
            cavity_count: cavity,
            sprue_weight_grams: parse_number_or_zero(&self.sprue_weight),
            cycle_time_seconds: parse_number_or_zero(&self.cycle_time),
            tonnage: self.tonnage.clone(),
            processes: self
                .processes
                .iter()
                .map(|p| ProcessLineItem::new(p.kind, p.active, parse_number_or_zero(&p.price)))
                .collect(),
            logistics: LogisticsInput {
                packaging_cost: parse_number_or_zero(&self.packaging_cost),
                transport_cost: parse_number_or_zero(&self.transport_cost),
                overhead_rate_percent: parse_number_or_zero(&self.overhead_rate),
                profit_rate_percent: optional(&self.profit_rate),
                quantity: optional(&self.quantity),
            },
        }
    }
}

/// 계산기 패널 하나의 상태. 패널끼리 공유하는 상태는 없다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteSheet {
    pub form: QuoteSheetForm,
    pub variant: SheetVariant,
}

impl QuoteSheet {
    pub fn new(variant: SheetVariant) -> Self {
        Self {
            form: QuoteSheetForm::default(),
            variant,
        }
    }

    /// 입력이 바뀔 때마다 호출한다. 매번 전체 파이프라인을 다시 계산하며 캐시하지 않는다.
    pub fn recalculate(&self, lookup: &impl RateLookup) -> CalculationResult {
        let input = self.form.to_input();
        let rates = resolve_rates(lookup, &input.material_name, &input.tonnage);
        compute_unit_cost(
            &input,
            rates.material.as_ref(),
            rates.injection.as_ref(),
            self.variant.options(),
        )
    }

    /// 화면에 표시 중인 계산 결과를 견적에 반영한다.
    pub fn apply(
        &self,
        result: &CalculationResult,
        ctx: &ApplyContext<'_>,
        on_apply: impl FnOnce(&AppliedPrice),
    ) -> Result<AppliedPrice, ApplyError> {
        apply_to_quote(&self.form.to_input(), result, ctx, on_apply)
    }
}
