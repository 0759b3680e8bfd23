//! 견적 시트 상태와 단가 반영 흐름.

pub mod apply;
pub mod sheet;

pub use apply::{apply_to_quote, material_token, AppliedPrice, ApplyContext, ApplyError};
pub use sheet::{ProcessField, QuoteSheet, QuoteSheetForm};
