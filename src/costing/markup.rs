use serde::{Deserialize, Serialize};

use crate::costing::logistics::LogisticsInput;
use crate::numeric::finite_or_zero;

/// 관리비/이익 반영 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkupMode {
    /// 소계에 관리비율 하나만 곱한다. 이익률은 쓰지 않는다.
    #[default]
    Flat,
    /// 관리비를 더한 금액에 이익률을 다시 곱한다.
    OverheadThenProfit,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Markup {
    pub overhead_cost: f64,
    pub profit_cost: f64,
    pub total_unit_price: f64,
}

pub fn apply_markup(sub_total: f64, input: &LogisticsInput, mode: MarkupMode) -> Markup {
    let overhead_rate = finite_or_zero(input.overhead_rate_percent) / 100.0;
    match mode {
        MarkupMode::Flat => Markup {
            overhead_cost: sub_total * overhead_rate,
            profit_cost: 0.0,
            total_unit_price: sub_total * (1.0 + overhead_rate),
        },
        MarkupMode::OverheadThenProfit => {
            let overhead_cost = sub_total * overhead_rate;
            let profit_cost = (sub_total + overhead_cost) * (input.profit_rate() / 100.0);
            Markup {
                overhead_cost,
                profit_cost,
                total_unit_price: sub_total + overhead_cost + profit_cost,
            }
        }
    }
}
