/// 견적에 반영하는 최종 단가를 소수 둘째 자리로 반올림한다.
///
/// 정확히 반인 경우는 +∞ 쪽으로 올린다(-0.125 → -0.12, 0.125 → 0.13).
/// 중간 단계 값에는 쓰지 않는다. 화면 표시용 내역은 전체 정밀도를 유지한다.
pub fn round_price(value: f64) -> f64 {
    round_half_up(value * 100.0) / 100.0
}

/// `floor(x + 0.5)`와 같은 규칙이지만 0.5 미만 소수가 더하기에서 올림되는 경우를 피한다.
fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}
