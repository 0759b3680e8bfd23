//! 사출 성형품 단가 계산 모듈 모음.
//!
//! 원료비 → 사출비 → 후가공비 → 물류비 → 관리비/이익 순서의 5단계 파이프라인이다.

pub mod calculator;
pub mod injection;
pub mod logistics;
pub mod markup;
pub mod material;
pub mod process;
pub mod rounding;

pub use calculator::*;
pub use logistics::{LogisticsInput, TransportMode};
pub use markup::{Markup, MarkupMode};
pub use process::{ProcessKind, ProcessLineItem};
pub use rounding::round_price;
