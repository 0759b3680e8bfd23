//! 입력 문자열/실수값을 계산에 쓸 수 있는 값으로 정리한다.

/// 문자열을 숫자로 해석한다. 비어 있거나 숫자가 아니면 0을 돌려준다.
///
/// 명시적으로 입력된 `"0"`은 그대로 0이며, 음수도 그대로 통과한다.
/// `NaN`, `inf` 처럼 유한하지 않은 값은 0으로 취급한다.
pub fn parse_number_or_zero(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(v) => finite_or_zero(v),
        Err(_) => 0.0,
    }
}

/// 유한하지 않은 값(NaN, ±∞)을 0으로 바꾼다.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
