use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use eframe::egui;

use crate::chart::category::CategoryFilter;
use crate::config::ChartConfig;
use crate::data::dataset::DataPoint;
use crate::data::loader::{self, DataSource};
use crate::error::DatasetError;
use crate::plot3d::camera::OrbitalCamera;
use crate::plot3d::renderer as chart_renderer;
use crate::state::app_state::{AppState, ChartState, VERSION};
use crate::ui::chart_view::{self, ChartAction};
use crate::ui::controls::{self, ControlAction};

/// Pending background dataset load.
struct PendingLoad {
    source: DataSource,
    result: Arc<Mutex<Option<Result<Vec<DataPoint>, DatasetError>>>>,
}

/// The main Alloy Chart application.
pub struct AlloyChartApp {
    pub state: AppState,
    pub camera: OrbitalCamera,
    /// Where the current dataset comes from; reloaded on unit changes.
    source: DataSource,
    /// An error message shown in the footer until dismissed.
    pub error_message: Option<String>,
    /// Whether to show the About window (hidden menu).
    pub show_about: bool,
    pending_load: Option<PendingLoad>,
}

impl AlloyChartApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: ChartConfig) -> Self {
        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();
        style.text_styles.insert(egui::TextStyle::Body, egui::FontId::proportional(15.0));
        style.text_styles.insert(egui::TextStyle::Button, egui::FontId::proportional(14.5));
        style.text_styles.insert(egui::TextStyle::Heading, egui::FontId::proportional(20.0));
        style.text_styles.insert(egui::TextStyle::Small, egui::FontId::proportional(12.0));
        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        ctx.set_style(style);
        ctx.set_visuals(config.theme.visuals());

        if let Some(render_state) = cc.wgpu_render_state.as_ref() {
            chart_renderer::init_chart_resources(render_state);
        } else {
            tracing::error!("wgpu render state unavailable; the chart will not draw");
        }

        let chart = ChartState::new(config.unit_system, config.labels_visible);
        let mut camera = OrbitalCamera::overview();
        camera.allow_zoom = config.allow_zoom;

        let mut app = Self {
            state: AppState::new(chart, config.theme, config.brand_url.clone()),
            camera,
            source: config.data_source(),
            error_message: None,
            show_about: false,
            pending_load: None,
        };
        app.start_load(ctx, app.source.clone());
        app
    }

    fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    /// Fetch the dataset on a worker thread so the UI stays responsive.
    /// Ignored while another load is still running.
    fn start_load(&mut self, ctx: &egui::Context, source: DataSource) {
        if self.is_loading() {
            tracing::warn!("Load of {source} ignored, another load is in progress");
            return;
        }
        tracing::info!("Loading dataset from {source}");

        let result: Arc<Mutex<Option<Result<Vec<DataPoint>, DatasetError>>>> =
            Arc::new(Mutex::new(None));
        let result_clone = Arc::clone(&result);
        let thread_source = source.clone();
        let ctx = ctx.clone();

        std::thread::spawn(move || {
            let loaded = loader::load_dataset(&thread_source);
            if let Ok(mut slot) = result_clone.lock() {
                *slot = Some(loaded);
            }
            ctx.request_repaint();
        });

        self.pending_load = Some(PendingLoad { source, result });
    }

    fn open_file_dialog(&mut self, ctx: &egui::Context) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON Files", &["json"])
            .add_filter("All Files", &["*"])
            .pick_file()
        {
            self.open_path(ctx, &path);
        }
    }

    fn open_path(&mut self, ctx: &egui::Context, path: &Path) {
        let source = DataSource::File(path.to_path_buf());
        self.start_load(ctx, source);
    }

    fn poll_load(&mut self) {
        let Some(pending) = &self.pending_load else {
            return;
        };
        let finished = match pending.result.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => Some(Err(DatasetError::Io {
                origin: pending.source.to_string(),
                source: std::io::Error::other("loader thread panicked"),
            })),
        };
        let Some(result) = finished else {
            return;
        };

        let source = pending.source.clone();
        self.pending_load = None;
        match result {
            Ok(points) => {
                self.source = source;
                self.error_message = None;
                self.state.chart.replace_dataset(points);
            }
            Err(e) => {
                tracing::error!("Failed to load dataset: {e}");
                self.error_message = Some(format!("Failed to load dataset: {e}"));
            }
        }
    }

    fn apply_control(&mut self, ctx: &egui::Context, action: ControlAction) {
        let chart = &mut self.state.chart;
        match action {
            ControlAction::SelectCategory(category) => {
                if category != CategoryFilter::All {
                    self.camera.leave_overview_once();
                }
                chart.select_category(category);
            }
            ControlAction::SetSubProperty(property, on) => chart.set_sub_property(property, on),
            ControlAction::SetMinConductivity(v) => chart.set_min_conductivity(v),
            ControlAction::SetMinTensile(v) => chart.set_min_tensile(v),
            ControlAction::SetLabelsVisible(on) => chart.set_labels_visible(on),
            ControlAction::SetUnit(unit) => {
                if self.pending_load.is_some() {
                    return;
                }
                if chart.set_unit_system(unit) {
                    self.start_load(ctx, self.source.clone());
                }
            }
            ControlAction::Reset => {
                chart.reset();
                self.camera.reset();
            }
        }
    }

    fn apply_chart_action(&self, ctx: &egui::Context, action: ChartAction) {
        match action {
            ChartAction::OpenProduct(id) => {
                let Some(base) = self.state.chart.items().base(id) else {
                    return;
                };
                if base.url.trim().is_empty() {
                    tracing::warn!("{} has no product URL", base.name);
                    return;
                }
                tracing::info!("Opening {}", base.url);
                ctx.open_url(egui::OpenUrl::new_tab(&base.url));
            }
            ChartAction::OpenBrand => {
                tracing::info!("Opening {}", self.state.brand_url);
                ctx.open_url(egui::OpenUrl::same_tab(&self.state.brand_url));
            }
        }
    }
}

impl eframe::App for AlloyChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(self.state.theme.visuals());

        // ------------------------------------------------------------------
        // 1. Dropped dataset files
        // ------------------------------------------------------------------
        let mut dropped: Option<PathBuf> = None;
        ctx.input(|i| {
            for file in &i.raw.dropped_files {
                if let Some(path) = &file.path {
                    let ext = path
                        .extension()
                        .and_then(|e| e.to_str())
                        .map(|e| e.to_lowercase())
                        .unwrap_or_default();
                    if ext == "json" {
                        dropped = Some(path.clone());
                    }
                }
            }
        });
        if let Some(path) = dropped {
            self.open_path(ctx, &path);
        }

        // ------------------------------------------------------------------
        // 2. Finished background load
        // ------------------------------------------------------------------
        self.poll_load();
        let loading = self.is_loading();

        // --- Header panel ---
        let mut open_dialog = false;
        let mut reload = false;
        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 8)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let heading_response = ui.heading("Alloy Chart");
                    heading_response.context_menu(|ui| {
                        if ui.button("About Alloy Chart").clicked() {
                            self.show_about = true;
                            ui.close_menu();
                        }
                    });

                    ui.separator();
                    if ui.add_enabled(!loading, egui::Button::new("Open dataset…")).clicked() {
                        open_dialog = true;
                    }
                    if ui.add_enabled(!loading, egui::Button::new("Reload")).clicked() {
                        reload = true;
                    }
                    ui.label(egui::RichText::new(self.source.to_string()).weak().small());

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let theme_label = format!("{} Mode", self.state.theme.toggle().label());
                        if ui.button(theme_label).clicked() {
                            self.state.theme = self.state.theme.toggle();
                        }
                        ui.separator();
                        ui.small(format!("v{VERSION}"));
                    });
                });
            });

        if open_dialog {
            self.open_file_dialog(ctx);
        }
        if reload {
            self.start_load(ctx, self.source.clone());
        }

        // --- Footer panel ---
        egui::TopBottomPanel::bottom("footer")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 6)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let items = self.state.chart.items();
                    let shown = items.bases.iter().filter(|b| b.visible).count();
                    ui.label(
                        egui::RichText::new(format!("{shown} of {} products shown", items.bases.len())).weak(),
                    );
                    ui.separator();
                    let p = self.camera.position();
                    ui.label(egui::RichText::new(format!("Camera ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z)).weak());

                    if let Some(msg) = &self.error_message {
                        ui.separator();
                        ui.colored_label(egui::Color32::from_rgb(255, 80, 80), msg);
                        if ui.small_button("dismiss").clicked() {
                            self.error_message = None;
                        }
                    }
                });
            });

        // --- Filter controls ---
        let control_actions = egui::SidePanel::left("controls")
            .resizable(false)
            .default_width(190.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .show(ui, |ui| controls::show_controls(ui, &self.state.chart, loading))
                    .inner
            })
            .inner;
        for action in control_actions {
            self.apply_control(ctx, action);
        }

        // --- Chart ---
        let chart_action = egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                chart_view::show_chart(ui, &self.state.chart, &mut self.camera, &self.state.theme)
            })
            .inner;
        if let Some(action) = chart_action {
            self.apply_chart_action(ctx, action);
        }

        // Show loading indicator
        if self.is_loading() {
            egui::Window::new("Loading")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading dataset...");
                    });
                });
            ctx.request_repaint();
        }

        if self.show_about {
            egui::Window::new("About Alloy Chart")
                .open(&mut self.show_about)
                .collapsible(false)
                .resizable(false)
                .default_width(320.0)
                .show(ctx, |ui| {
                    ui.heading("Alloy Chart");
                    ui.label(format!("Version: {VERSION}"));
                    ui.add_space(4.0);
                    ui.label("Tensile strength against conductivity, one cube per product.");
                    ui.add_space(10.0);
                    ui.label("  \u{2022} Left-drag to orbit, right-drag to pan");
                    ui.label("  \u{2022} Click a cube for the product page");
                    ui.label("  \u{2022} Drop a .json dataset to load it");
                });
        }
    }
}
