use serde::{Deserialize, Serialize};

use crate::numeric::finite_or_zero;

/// 운송비를 개당 금액으로 볼지, 주문 전체 금액으로 볼지 정한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransportMode {
    /// 운송비가 이미 개당 금액이다.
    #[default]
    PerUnit,
    /// 운송비는 주문 총액이며 수량으로 나눠 배분한다.
    LumpSum,
}

/// 물류비와 관리비/이익률 입력.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticsInput {
    /// 포장비 [원/개]
    pub packaging_cost: f64,
    /// 운송비 [원/개] 또는 [원/주문], `TransportMode`에 따라 다르다
    pub transport_cost: f64,
    /// 일반관리비율 [%]
    pub overhead_rate_percent: f64,
    /// 이익률 [%]
    pub profit_rate_percent: Option<f64>,
    /// 주문 수량(MOQ). 총액 배분에만 쓴다
    pub quantity: Option<f64>,
}

impl LogisticsInput {
    /// 배분용 수량. 없거나 1 미만이면 1로 본다.
    pub fn effective_quantity(&self) -> f64 {
        self.quantity.map(finite_or_zero).unwrap_or(0.0).max(1.0)
    }

    pub fn profit_rate(&self) -> f64 {
        self.profit_rate_percent.map(finite_or_zero).unwrap_or(0.0)
    }
}

/// 물류비 [원/개].
pub fn logistics_cost(input: &LogisticsInput, mode: TransportMode) -> f64 {
    let packaging = finite_or_zero(input.packaging_cost);
    let transport = finite_or_zero(input.transport_cost);
    match mode {
        TransportMode::PerUnit => packaging + transport,
        TransportMode::LumpSum => packaging + transport / input.effective_quantity(),
    }
}
