use serde::{Deserialize, Serialize};

use crate::numeric::finite_or_zero;

/// 후가공 공정 종류. 공정별 손실 계수는 고정값이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProcessKind {
    /// 증착
    Deposition,
    /// 코팅
    Coating,
    /// 인쇄
    Printing,
    /// 조립
    Assembly,
    /// 부자재
    SubMaterial,
    /// 초음파 융착
    Ultrasonic,
}

impl ProcessKind {
    pub const ALL: [ProcessKind; 6] = [
        ProcessKind::Deposition,
        ProcessKind::Coating,
        ProcessKind::Printing,
        ProcessKind::Assembly,
        ProcessKind::SubMaterial,
        ProcessKind::Ultrasonic,
    ];

    /// 공정 수율 손실을 반영한 단가 배수.
    pub fn loss_multiplier(self) -> f64 {
        match self {
            ProcessKind::Deposition => 1.10,
            ProcessKind::Coating => 1.05,
            ProcessKind::Printing => 1.03,
            ProcessKind::Assembly => 1.03,
            ProcessKind::SubMaterial => 1.00,
            ProcessKind::Ultrasonic => 1.10,
        }
    }
}

/// 후가공 한 줄. 활성화된 항목만 비용에 들어간다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessLineItem {
    pub kind: ProcessKind,
    #[serde(default)]
    pub active: bool,
    /// 공정 단가 [원/개]. 음수 검증은 호출 측 책임이다.
    #[serde(default)]
    pub price: f64,
}

impl ProcessLineItem {
    pub fn new(kind: ProcessKind, active: bool, price: f64) -> Self {
        Self {
            kind,
            active,
            price,
        }
    }

    /// 손실 계수를 곱한 공정비. 비활성이면 0.
    pub fn cost(&self) -> f64 {
        if self.active {
            finite_or_zero(self.price) * self.kind.loss_multiplier()
        } else {
            0.0
        }
    }
}

/// 후가공비 합계 [원/개].
pub fn process_cost(items: &[ProcessLineItem]) -> f64 {
    items.iter().map(ProcessLineItem::cost).sum()
}
