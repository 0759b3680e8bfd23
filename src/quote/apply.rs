use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::activity_log::{ActivityEntry, ActivityLog};
use crate::costing::{round_price, CalculationInput, CalculationResult};
use crate::numeric::finite_or_zero;

pub const APPLY_ACTION: &str = "견적 단가 적용";
pub const APPLY_CATEGORY: &str = "quote";

/// 견적 품목에 넘기는 값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedPrice {
    /// 소수 둘째 자리로 반올림한 단가
    pub unit_price: f64,
    /// 원료 표기의 첫 토큰(예: "ABS")
    pub material: String,
}

/// 단가 반영 전제 조건 위반.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("원료를 선택하세요.")]
    MissingMaterial,
    #[error("제품 중량을 입력하세요.")]
    MissingWeight,
}

pub struct ApplyContext<'a> {
    pub actor: &'a str,
    pub activity_log: &'a dyn ActivityLog,
}

/// 견적 품목의 원료 칸에 들어갈 값. 공백 한 칸 기준으로 자른 첫 토큰이다.
pub fn material_token(label: &str) -> String {
    label.split(' ').next().unwrap_or_default().to_string()
}

/// 계산된 단가를 견적에 반영한다.
///
/// 원료와 중량이 없으면 반영하지 않고 오류를 돌려준다. 반영 후 감사 로그를 한 건 남기며,
/// 로그 기록 실패는 경고만 남기고 반영 결과에는 영향을 주지 않는다.
pub fn apply_to_quote(
    input: &CalculationInput,
    result: &CalculationResult,
    ctx: &ApplyContext<'_>,
    on_apply: impl FnOnce(&AppliedPrice),
) -> Result<AppliedPrice, ApplyError> {
    let material_name = input.material_name.as_str();
    if material_name.trim().is_empty() {
        return Err(ApplyError::MissingMaterial);
    }
    if finite_or_zero(input.weight_grams) == 0.0 {
        return Err(ApplyError::MissingWeight);
    }

    let applied = AppliedPrice {
        unit_price: round_price(result.total_unit_price),
        material: material_token(material_name),
    };
    on_apply(&applied);
    tracing::info!(
        material = %applied.material,
        unit_price = applied.unit_price,
        "견적 단가 반영"
    );

    let entry = ActivityEntry::new(
        ctx.actor,
        APPLY_ACTION,
        format!(
            "{material_name} 단가 {:.2}원을 견적에 반영",
            applied.unit_price
        ),
        APPLY_CATEGORY,
        json!({
            "materialName": material_name,
            "material": applied.material,
            "unitPrice": applied.unit_price,
            "subTotal": result.sub_total,
            "totalUnitPrice": result.total_unit_price,
        }),
    );
    if let Err(err) = ctx.activity_log.log_activity(&entry) {
        tracing::warn!(error = %err, "감사 로그 기록 실패, 단가 반영은 유지합니다");
    }
    Ok(applied)
}
