use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use molding_cost_toolbox::app::{self, AppError, Session};
use molding_cost_toolbox::costing::{compute_unit_cost, CalculationInput, SheetVariant};
use molding_cost_toolbox::i18n::{self, Translator};
use molding_cost_toolbox::master_data::resolve_rates;
use molding_cost_toolbox::quote::{apply_to_quote, ApplyContext};
use molding_cost_toolbox::{config, ui_cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "molding_cost_toolbox_cli", version, about = "사출 견적 원가 계산기")]
struct Cli {
    /// 설정 파일 경로
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// UI 언어(auto/ko/en-us)
    #[arg(long, short = 'L', global = true)]
    lang: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 대화형 메뉴
    Interactive,
    /// TOML 입력 파일로 단가를 한 번 계산한다
    Calc {
        input: PathBuf,
        #[arg(long, value_enum)]
        variant: Option<VariantArg>,
        /// 결과를 JSON으로 출력
        #[arg(long)]
        json: bool,
        /// 계산한 단가를 견적에 반영하고 감사 로그를 남긴다
        #[arg(long)]
        apply: bool,
    },
    /// 단가표 출력
    Materials,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantArg {
    QuoteDetail,
    DetailedCost,
}

impl From<VariantArg> for SheetVariant {
    fn from(value: VariantArg) -> Self {
        match value {
            VariantArg::QuoteDetail => SheetVariant::QuoteDetail,
            VariantArg::DetailedCost => SheetVariant::DetailedCost,
        }
    }
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 CLI 애플리케이션을 실행한다.
fn main() {
    let cli = Cli::parse();
    if let Err(err) = try_run(cli) {
        eprintln!("오류: {err}");
        std::process::exit(1);
    }
}

fn try_run(cli: Cli) -> Result<(), AppError> {
    let cfg = match &cli.config {
        Some(path) => config::load_or_default_at(path)?,
        None => config::load_or_default()?,
    };
    init_tracing(&cfg.log_filter);

    let lang = i18n::resolve_language(cli.lang.as_deref().unwrap_or("auto"), Some(&cfg.language));
    let tr = Translator::new_with_pack(&lang, None);
    tracing::info!(
        config = %cfg.path().display(),
        lang = tr.language().as_code(),
        "설정 로드"
    );
    let mut session = Session::open(cfg)?;

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Interactive => app::run(&mut session, &tr)?,
        Command::Materials => ui_cli::handle_master_data(&tr, &session.master_data),
        Command::Calc {
            input,
            variant,
            json,
            apply,
        } => {
            let content = fs::read_to_string(&input)?;
            let calc_input: CalculationInput = toml::from_str(&content)?;
            let variant = variant.map(SheetVariant::from).unwrap_or(session.config.sheet_variant);
            let rates = resolve_rates(
                &session.master_data,
                &calc_input.material_name,
                &calc_input.tonnage,
            );
            if rates.missing(&calc_input.material_name, &calc_input.tonnage) {
                tracing::warn!(
                    material = %calc_input.material_name,
                    tonnage = %calc_input.tonnage,
                    "단가표에 없는 항목은 0원으로 계산됩니다"
                );
            }
            let result = compute_unit_cost(
                &calc_input,
                rates.material.as_ref(),
                rates.injection.as_ref(),
                variant.options(),
            );
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                ui_cli::print_result(&tr, variant, &result);
            }
            if apply {
                let ctx = ApplyContext {
                    actor: &session.config.actor,
                    activity_log: session.activity_log.as_ref(),
                };
                let applied = apply_to_quote(&calc_input, &result, &ctx, |_| {})?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&applied)?);
                } else {
                    println!(
                        "{} {} / {:.2}",
                        tr.t(i18n::keys::RESULT_APPLIED),
                        applied.material,
                        applied.unit_price
                    );
                }
            }
        }
    }
    Ok(())
}

fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
