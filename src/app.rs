use thiserror::Error;

use crate::activity_log::{ActivityLog, JsonlActivityLog, TracingActivityLog};
use crate::config::{Config, ConfigError};
use crate::i18n::{self, Translator};
use crate::master_data::{MasterData, MasterDataError};
use crate::quote::ApplyError;
use crate::ui_cli;
use crate::ui_cli::MenuChoice;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    #[error("단가표 오류: {0}")]
    MasterData(#[from] MasterDataError),
    #[error("견적 반영 오류: {0}")]
    Apply(#[from] ApplyError),
    #[error("입력 파일 파싱 오류: {0}")]
    Input(#[from] toml::de::Error),
    #[error("결과 직렬화 오류: {0}")]
    Output(#[from] serde_json::Error),
}

/// 설정에 따라 감사 로그 대상을 고른다.
pub fn activity_log_for(config: &Config) -> Box<dyn ActivityLog> {
    match config.activity_log_path.as_deref() {
        Some(path) if !path.trim().is_empty() => {
            let log = JsonlActivityLog::new(path);
            tracing::info!(path = %log.path().display(), "감사 로그 파일");
            Box::new(log)
        }
        _ => Box::new(TracingActivityLog),
    }
}

/// 실행 중 공유하는 자원 묶음.
pub struct Session {
    pub config: Config,
    pub master_data: MasterData,
    pub activity_log: Box<dyn ActivityLog>,
}

impl Session {
    pub fn open(config: Config) -> Result<Self, AppError> {
        let master_data = MasterData::load_or_built_in(config.master_data_path.as_deref())?;
        tracing::info!(
            materials = master_data.materials.len(),
            tonnages = master_data.injection_rates.len(),
            "단가표 로드"
        );
        let activity_log = activity_log_for(&config);
        Ok(Self {
            config,
            master_data,
            activity_log,
        })
    }
}

/// CLI 애플리케이션의 메인 루프를 실행한다.
pub fn run(session: &mut Session, tr: &Translator) -> Result<(), AppError> {
    loop {
        match ui_cli::main_menu(tr)? {
            MenuChoice::Quote => ui_cli::handle_quote(tr, session)?,
            MenuChoice::MasterData => ui_cli::handle_master_data(tr, &session.master_data),
            MenuChoice::Settings => {
                ui_cli::handle_settings(tr, &mut session.config)?;
                session.config.save()?;
            }
            MenuChoice::Exit => {
                session.config.save()?;
                println!("{}", tr.t(i18n::keys::APP_EXIT));
                break;
            }
        }
    }
    Ok(())
}
