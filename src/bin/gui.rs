#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 견적 원가 계산 시트.

use clap::Parser;
use eframe::{egui, App, Frame};
use image::GenericImageView;
use molding_cost_toolbox::{
    activity_log::ActivityLog,
    app::activity_log_for,
    config::{self, Config},
    costing::{CalculationResult, MarkupMode, SheetVariant, TransportMode},
    i18n::{self, keys, Translator},
    master_data::{resolve_rates, MasterData},
    quote::{AppliedPrice, ApplyContext, QuoteSheet},
};
use rfd::FileDialog;
use std::{fs, path::Path, path::PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "molding_cost_toolbox", version)]
struct GuiArgs {
    /// 설정 파일 경로
    #[arg(long)]
    config: Option<PathBuf>,
    /// UI 언어(auto/ko/en-us)
    #[arg(long, short = 'L')]
    lang: Option<String>,
}

fn main() -> Result<(), eframe::Error> {
    let args = GuiArgs::parse();
    let app_cfg = match &args.config {
        Some(path) => config::load_or_default_at(path),
        None => config::load_or_default(),
    }
    .unwrap_or_default();
    init_tracing(&app_cfg.log_filter);

    let lang = i18n::resolve_language(
        args.lang.as_deref().unwrap_or("auto"),
        Some(app_cfg.language.as_str()),
    );
    let tr = Translator::new_with_pack(&lang, None);
    tracing::info!(
        config = %app_cfg.path().display(),
        lang = tr.language().as_code(),
        "설정 로드"
    );

    let mut viewport = egui::ViewportBuilder::default().with_inner_size([980.0, 760.0]);
    if let Some(icon) = load_app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let title = tr.t(keys::GUI_TITLE).to_string();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            if let Err(e) = setup_fonts(&cc.egui_ctx) {
                tracing::warn!("폰트 설정 실패: {e}");
            }
            Box::new(GuiApp::new(app_cfg, tr))
        }),
    )
}

fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["icon.png", "assets/icon.png", "../assets/icon.png"];
    let path = search.iter().find(|p| Path::new(*p).exists())?;
    let bytes = fs::read(path).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = img.dimensions();
    Some(egui::IconData {
        rgba: rgba.into_raw(),
        width: w,
        height: h,
    })
}

fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    let font_name = name.to_string();
    fonts
        .font_data
        .insert(font_name.clone(), egui::FontData::from_owned(bytes));
    fonts
        .families
        .entry(egui::FontFamily::Proportional)
        .or_default()
        .insert(0, font_name.clone());
    fonts
        .families
        .entry(egui::FontFamily::Monospace)
        .or_default()
        .insert(0, font_name);
    ctx.set_fonts(fonts);
}

/// 한글 표시용 폰트를 찾는다. assets/ → Windows 시스템 폰트 → 리눅스/맥 CJK 폰트 순.
fn setup_fonts(ctx: &egui::Context) -> Result<(), String> {
    let mut candidates = vec![PathBuf::from("assets/fonts/malgun.ttf")];
    if let Some(windir) = std::env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        for cand in ["malgun.ttf", "gulim.ttc", "batang.ttc"] {
            candidates.push(fonts.join(cand));
        }
    }
    candidates.extend(
        [
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
            "/System/Library/Fonts/AppleSDGothicNeo.ttc",
        ]
        .into_iter()
        .map(PathBuf::from),
    );
    for p in candidates {
        if p.exists() {
            let bytes = fs::read(&p)
                .map_err(|e| format!("폰트 파일을 읽지 못했습니다 ({}): {e}", p.display()))?;
            apply_font_bytes(ctx, bytes, "korean_font");
            return Ok(());
        }
    }
    Err("한글 폰트를 찾지 못했습니다. assets/fonts/malgun.ttf 를 넣어 주세요.".into())
}

struct GuiApp {
    tr: Translator,
    config: Config,
    master_data: MasterData,
    activity_log: Box<dyn ActivityLog>,
    sheet: QuoteSheet,
    /// 견적에 반영된 품목. 견적 편집 화면 쪽 소비자 역할
    applied: Vec<AppliedPrice>,
    status: Option<String>,
}

impl GuiApp {
    fn new(config: Config, tr: Translator) -> Self {
        let (master_data, status) =
            match MasterData::load_or_built_in(config.master_data_path.as_deref()) {
                Ok(data) => (data, None),
                Err(e) => {
                    tracing::warn!("단가표 로드 실패, 내장 샘플 사용: {e}");
                    (MasterData::built_in(), Some(e.to_string()))
                }
            };
        Self {
            activity_log: activity_log_for(&config),
            sheet: QuoteSheet::new(config.sheet_variant),
            tr,
            config,
            master_data,
            applied: Vec::new(),
            status,
        }
    }

    fn open_master_data(&mut self) {
        let Some(path) = FileDialog::new().add_filter("TOML", &["toml"]).pick_file() else {
            return;
        };
        match MasterData::load(&path) {
            Ok(data) => {
                self.master_data = data;
                self.config.master_data_path = Some(path.display().to_string());
                if let Err(e) = self.config.save() {
                    tracing::warn!("설정 저장 실패: {e}");
                }
                self.status = None;
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn variant_selector(&mut self, ui: &mut egui::Ui) {
        let tr = &self.tr;
        ui.horizontal(|ui| {
            for variant in [SheetVariant::QuoteDetail, SheetVariant::DetailedCost] {
                ui.radio_value(&mut self.sheet.variant, variant, tr.variant_name(variant));
            }
        });
    }

    fn molding_section(&mut self, ui: &mut egui::Ui) {
        let tr = &self.tr;
        let master = &self.master_data;
        let form = &mut self.sheet.form;
        ui.heading(tr.t(keys::GUI_SECTION_MOLDING));
        egui::Grid::new("molding").num_columns(2).show(ui, |ui| {
            ui.label(tr.t(keys::PROMPT_MATERIAL));
            egui::ComboBox::from_id_source("material")
                .selected_text(form.material_name.clone())
                .width(220.0)
                .show_ui(ui, |ui| {
                    for name in master.material_names() {
                        ui.selectable_value(&mut form.material_name, name.to_string(), name);
                    }
                });
            ui.end_row();
            text_row(ui, tr.t(keys::PROMPT_WEIGHT), &mut form.weight);
            text_row(ui, tr.t(keys::PROMPT_CAVITY), &mut form.cavity);
            text_row(ui, tr.t(keys::PROMPT_SPRUE), &mut form.sprue_weight);
            text_row(ui, tr.t(keys::PROMPT_CYCLE_TIME), &mut form.cycle_time);
            ui.label(tr.t(keys::PROMPT_TONNAGE));
            egui::ComboBox::from_id_source("tonnage")
                .selected_text(form.tonnage.clone())
                .show_ui(ui, |ui| {
                    for tonnage in master.tonnages() {
                        ui.selectable_value(&mut form.tonnage, tonnage.to_string(), tonnage);
                    }
                });
            ui.end_row();
        });
    }

    fn process_section(&mut self, ui: &mut egui::Ui) {
        let tr = &self.tr;
        let form = &mut self.sheet.form;
        ui.heading(tr.t(keys::GUI_SECTION_PROCESS));
        egui::Grid::new("process").num_columns(3).show(ui, |ui| {
            for field in form.processes.iter_mut() {
                ui.checkbox(&mut field.active, tr.process_name(field.kind));
                ui.add_enabled(
                    field.active,
                    egui::TextEdit::singleline(&mut field.price).desired_width(140.0),
                );
                ui.label(format!("×{:.2}", field.kind.loss_multiplier()));
                ui.end_row();
            }
        });
    }

    fn logistics_section(&mut self, ui: &mut egui::Ui) {
        let tr = &self.tr;
        let options = self.sheet.variant.options();
        let form = &mut self.sheet.form;
        ui.heading(tr.t(keys::GUI_SECTION_LOGISTICS));
        egui::Grid::new("logistics").num_columns(2).show(ui, |ui| {
            text_row(ui, tr.t(keys::PROMPT_PACKAGING), &mut form.packaging_cost);
            match options.transport_mode {
                TransportMode::PerUnit => {
                    text_row(ui, tr.t(keys::PROMPT_TRANSPORT_PER_UNIT), &mut form.transport_cost);
                }
                TransportMode::LumpSum => {
                    text_row(ui, tr.t(keys::PROMPT_TRANSPORT_LUMP_SUM), &mut form.transport_cost);
                    text_row(ui, tr.t(keys::PROMPT_QUANTITY), &mut form.quantity);
                }
            }
            text_row(ui, tr.t(keys::PROMPT_OVERHEAD_RATE), &mut form.overhead_rate);
            if options.markup_mode == MarkupMode::OverheadThenProfit {
                text_row(ui, tr.t(keys::PROMPT_PROFIT_RATE), &mut form.profit_rate);
            }
        });
    }

    fn result_section(&mut self, ui: &mut egui::Ui, result: &CalculationResult) {
        let tr = &self.tr;
        ui.heading(tr.t(keys::GUI_SECTION_RESULT));
        let form = &self.sheet.form;
        if resolve_rates(&self.master_data, &form.material_name, &form.tonnage)
            .missing(&form.material_name, &form.tonnage)
        {
            ui.colored_label(
                egui::Color32::from_rgb(220, 140, 0),
                tr.t(keys::NOTICE_MISSING_RATE),
            );
        }
        egui::Grid::new("result").num_columns(2).striped(true).show(ui, |ui| {
            let mut row = |label: &str, value: f64| {
                ui.label(label);
                ui.monospace(format!("{value}"));
                ui.end_row();
            };
            row(tr.t(keys::RESULT_MATERIAL), result.material_cost);
            row(tr.t(keys::RESULT_INJECTION), result.injection_cost);
            row(tr.t(keys::RESULT_PROCESS), result.process_cost);
            row(tr.t(keys::RESULT_LOGISTICS), result.logistics_cost);
            row(tr.t(keys::RESULT_SUB_TOTAL), result.sub_total);
            row(tr.t(keys::RESULT_OVERHEAD), result.overhead_cost);
            if self.sheet.variant.options().markup_mode == MarkupMode::OverheadThenProfit {
                row(tr.t(keys::RESULT_PROFIT), result.profit_cost);
            }
            row(tr.t(keys::RESULT_TOTAL), result.total_unit_price);
        });
        ui.strong(format!(
            "{} {:.2}",
            tr.t(keys::RESULT_TOTAL),
            result.applied_unit_price()
        ));

        if ui.button(tr.t(keys::GUI_APPLY)).clicked() {
            let ctx = ApplyContext {
                actor: &self.config.actor,
                activity_log: self.activity_log.as_ref(),
            };
            let applied = &mut self.applied;
            self.status = match self.sheet.apply(result, &ctx, |p| applied.push(p.clone())) {
                Ok(p) => Some(format!(
                    "{} {} / {:.2}",
                    tr.t(keys::RESULT_APPLIED),
                    p.material,
                    p.unit_price
                )),
                Err(e) => Some(format!("{}: {e}", tr.t(keys::ERROR_PREFIX))),
            };
        }
        for (i, p) in self.applied.iter().enumerate() {
            ui.label(format!("#{} {} : {:.2}", i + 1, p.material, p.unit_price));
        }
    }
}

fn text_row(ui: &mut egui::Ui, label: &str, value: &mut String) {
    ui.label(label);
    ui.add(egui::TextEdit::singleline(value).desired_width(140.0));
    ui.end_row();
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // 입력이 바뀔 때마다 새로 계산되도록 매 프레임 전체를 다시 계산한다.
        let result = self.sheet.recalculate(&self.master_data);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(self.tr.t(keys::GUI_TITLE));
                if ui.button(self.tr.t(keys::GUI_OPEN_MASTER_DATA)).clicked() {
                    self.open_master_data();
                }
            });
            if let Some(status) = &self.status {
                ui.label(status);
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.variant_selector(ui);
                ui.separator();
                ui.columns(2, |cols| {
                    self.molding_section(&mut cols[0]);
                    cols[0].separator();
                    self.process_section(&mut cols[0]);
                    self.logistics_section(&mut cols[1]);
                    cols[1].separator();
                    self.result_section(&mut cols[1], &result);
                });
            });
        });
    }
}
