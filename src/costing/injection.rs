use crate::master_data::InjectionRate;
use crate::numeric::finite_or_zero;

/// 사출(성형)비 [원/개].
///
/// 임률(시간당)에 사이클 타임(초)을 그대로 곱한다. 시간 단위 환산(/3600)은 하지 않으며
/// 기존 견적 단가가 이 식으로 맞춰져 있으므로 임의로 바꾸지 않는다.
pub fn injection_cost(cycle_time_s: f64, cavity_count: f64, rate: Option<&InjectionRate>) -> f64 {
    let rate_per_hour = rate.map(|r| finite_or_zero(r.rate_per_hour)).unwrap_or(0.0);
    (rate_per_hour * finite_or_zero(cycle_time_s)) / cavity_count
}
