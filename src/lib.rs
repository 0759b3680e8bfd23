//! 단가 계산 로직을 라이브러리로 분리하여 CLI와 GUI가 같은 계산을 쓰도록 한다.

pub mod activity_log;
pub mod app;
pub mod config;
pub mod costing;
pub mod i18n;
pub mod master_data;
pub mod numeric;
pub mod quote;
pub mod ui_cli;
