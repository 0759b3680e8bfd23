use crate::master_data::MaterialRate;
use crate::numeric::finite_or_zero;

/// 스프루/런너 스크랩을 반영한 원료 손실 계수(7%). 설정 대상이 아니다.
pub const MATERIAL_LOSS_FACTOR: f64 = 1.07;

/// 1개당 유효 원료 중량 [kg]. 스프루 중량은 캐비티 수로 나눠 배분한다.
pub fn effective_weight_kg(weight_g: f64, sprue_weight_g: f64, cavity_count: f64) -> f64 {
    (finite_or_zero(weight_g) + finite_or_zero(sprue_weight_g) / cavity_count) / 1000.0
}

/// 원료비 [원/개]. 단가를 못 찾았으면 kg 단가 0으로 본다.
pub fn material_cost(
    weight_g: f64,
    sprue_weight_g: f64,
    cavity_count: f64,
    rate: Option<&MaterialRate>,
) -> f64 {
    let price_per_kg = rate.map(|r| finite_or_zero(r.price_per_kg)).unwrap_or(0.0);
    effective_weight_kg(weight_g, sprue_weight_g, cavity_count)
        * price_per_kg
        * MATERIAL_LOSS_FACTOR
}
