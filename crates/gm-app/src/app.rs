//! The eframe application: loading, then the docked explorer

use std::sync::Arc;
use std::time::Duration;

use eframe::egui::{self, Context};
use parking_lot::Mutex;
use tracing::{error, info, warn};

use gm_core::events::{DatasetLoaded, PartitionFailed};
use gm_core::{DetailTracker, EventBus, ViewSynchronizer};
use gm_data::{load_dataset, open_sources, DetailFetcher, DetailSource, LoadProgress, LoadReport, SourceKind};
use gm_ui::{FilterToolbar, LoadingStatus, ShellAction, ShellConfig, StatusLevel, StatusLog, Theme};
use gm_views::{Viewport, ViewerContext};

use crate::bridge::EventBridge;
use crate::config::AppConfig;

const VIEW_CONFIG_KEY: &str = "gm_view_configs";

/// What a finished load task hands back to the UI thread
struct Loaded {
    kind: SourceKind,
    report: LoadReport,
    details: Arc<dyn DetailSource>,
}

type LoadSlot = Arc<Mutex<Option<Result<Loaded, String>>>>;

enum Phase {
    Loading { progress: Arc<LoadProgress>, slot: LoadSlot },
    Ready(Box<Explorer>),
    Failed(String),
}

/// Everything that lives as long as one loaded dataset
struct Explorer {
    viewer_context: ViewerContext,
    viewport: Viewport,
    toolbar: FilterToolbar,
    source_label: String,
    // Held so the synchronizer's weak subscriber refs stay alive
    _fetcher: Arc<DetailFetcher>,
    _bridge: Arc<EventBridge>,
}

pub struct ExplorerApp {
    config: AppConfig,
    runtime: tokio::runtime::Runtime,
    egui_ctx: Context,
    events: Arc<EventBus>,
    status: StatusLog,
    shell: ShellConfig,
    phase: Phase,
    /// View settings restored from the previous session
    saved_views: Option<serde_json::Value>,
}

impl ExplorerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, runtime: tokio::runtime::Runtime) -> Self {
        gm_ui::apply_theme(&cc.egui_ctx, &Theme::default());
        // Cover art in the detail panel is fetched by URL
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let events = Arc::new(EventBus::new());
        let status = StatusLog::new();
        status.attach(&events);

        let saved_views = cc
            .storage
            .and_then(|storage| storage.get_string(VIEW_CONFIG_KEY))
            .and_then(|text| serde_json::from_str(&text).ok());

        let mut app = Self {
            config,
            runtime,
            egui_ctx: cc.egui_ctx.clone(),
            events,
            status,
            shell: ShellConfig::default(),
            phase: Phase::Failed(String::new()),
            saved_views,
        };
        app.start_load();
        app
    }

    /// Spawn the partition load; the result is picked up in `update`
    fn start_load(&mut self) {
        let progress = Arc::new(LoadProgress::new());
        let slot: LoadSlot = Arc::new(Mutex::new(None));
        let config = self.config.data.clone();
        info!("Loading data ({:?}) from {}", config.source, config.data_dir.display());

        let task_progress = progress.clone();
        let task_slot = slot.clone();
        let egui_ctx = self.egui_ctx.clone();
        self.runtime.spawn(async move {
            let result = async {
                let opened = open_sources(&config).await?;
                let report = load_dataset(opened.games.as_ref(), &task_progress).await;
                Ok::<_, gm_data::DataError>(Loaded { kind: opened.kind, report, details: opened.details })
            }
            .await
            .map_err(|e| e.to_string());

            *task_slot.lock() = Some(result);
            egui_ctx.request_repaint();
        });

        self.phase = Phase::Loading { progress, slot };
    }

    fn poll_load(&mut self) {
        let Phase::Loading { slot, .. } = &self.phase else {
            return;
        };
        let Some(result) = slot.lock().take() else {
            return;
        };

        self.phase = match result {
            Ok(loaded) => match self.build_explorer(loaded) {
                Ok(explorer) => Phase::Ready(Box::new(explorer)),
                Err(message) => Phase::Failed(message),
            },
            Err(message) => {
                error!("Failed to open data source: {}", message);
                self.status.push(StatusLevel::Error, message.clone());
                Phase::Failed(message)
            }
        };
    }

    fn build_explorer(&mut self, loaded: Loaded) -> Result<Explorer, String> {
        let Loaded { kind, report, details } = loaded;

        for failure in &report.failures {
            self.events.publish(PartitionFailed { partition: failure.index, error: failure.error.clone() });
        }
        if report.loaded == 0 {
            return Err(format!("No partitions could be loaded from {}", report.source_name));
        }
        self.events.publish(DatasetLoaded {
            source_name: report.source_name.clone(),
            record_count: report.dataset.len(),
            partitions_loaded: report.loaded,
            partitions_failed: report.failures.len(),
        });

        let dataset = Arc::new(report.dataset);
        let total = dataset.len();
        let settings = self.config.explorer.clone();
        let sync = Arc::new(ViewSynchronizer::with_scale_mode(dataset, settings.default_scale));
        let tracker = Arc::new(DetailTracker::new());

        let repaint_ctx = self.egui_ctx.clone();
        let fetcher = Arc::new(
            DetailFetcher::new(details, tracker.clone(), self.runtime.handle().clone())
                .with_repaint(move || repaint_ctx.request_repaint())
                .with_events(self.events.clone()),
        );
        sync.add_subscriber(fetcher.clone());

        let bridge = Arc::new(EventBridge::new(self.events.clone(), total));
        sync.add_subscriber(bridge.clone());

        let (mut viewport, _layout) = Viewport::explorer();
        if let Some(saved) = &self.saved_views {
            viewport.load_configs(saved);
        }

        info!("Explorer ready with {} games ({:?} source)", total, kind);
        Ok(Explorer {
            viewer_context: ViewerContext::new(sync, tracker, settings),
            viewport,
            toolbar: FilterToolbar::new(),
            source_label: format!("{} ({:?})", report.source_name, kind),
            _fetcher: fetcher,
            _bridge: bridge,
        })
    }

    fn handle_action(&mut self, ctx: &Context, action: ShellAction) {
        match action {
            ShellAction::Reload => self.start_load(),
            ShellAction::OpenFolder => {
                if let Some(dir) = rfd::FileDialog::new().set_directory(&self.config.data.data_dir).pick_folder() {
                    self.config.data.data_dir = dir;
                    self.config.data.source = SourceKind::Json;
                    self.start_load();
                }
            }
            ShellAction::ResetFilters => {
                if let Phase::Ready(explorer) = &self.phase {
                    explorer.viewer_context.sync.reset_filters();
                }
            }
            ShellAction::ClearSelection => {
                if let Phase::Ready(explorer) = &self.phase {
                    explorer.viewer_context.sync.clear_selection();
                }
            }
            ShellAction::ToggleScale => {
                if let Phase::Ready(explorer) = &self.phase {
                    let sync = &explorer.viewer_context.sync;
                    sync.set_scale_mode(sync.filter().scale_mode.toggled());
                }
            }
            ShellAction::ToggleStatusBar => self.shell.show_status_bar = !self.shell.show_status_bar,
            ShellAction::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
        }
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_load();

        if let Phase::Ready(explorer) = &self.phase {
            if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                explorer.viewer_context.sync.clear_selection();
            }
        }

        let source = match &self.phase {
            Phase::Ready(explorer) => Some(explorer.source_label.clone()),
            _ => None,
        };
        if let Some(action) = gm_ui::menu_bar(ctx, &self.shell, source.as_deref()) {
            self.handle_action(ctx, action);
        }

        if self.shell.show_status_bar {
            match &self.phase {
                Phase::Ready(explorer) => {
                    let snapshot = explorer.viewer_context.snapshot();
                    let total = explorer.viewer_context.sync.dataset().len();
                    gm_ui::status_bar(ctx, &self.status, Some(&snapshot), total);
                }
                _ => gm_ui::status_bar(ctx, &self.status, None, 0),
            }
        }

        let mut retry = false;
        match &mut self.phase {
            Phase::Loading { progress, .. } => {
                let status = LoadingStatus {
                    source: self.config.data.data_dir.display().to_string(),
                    completed: progress.completed(),
                    total: progress.total(),
                    failed: progress.failed(),
                };
                egui::CentralPanel::default().show(ctx, |_ui| {});
                gm_ui::loading_overlay(ctx, &status);
                ctx.request_repaint_after(Duration::from_millis(100));
            }
            Phase::Failed(message) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    retry = gm_ui::error_screen(ui, "Could not load data", message);
                });
            }
            Phase::Ready(explorer) => {
                let Explorer { viewer_context, viewport, toolbar, .. } = explorer.as_mut();
                egui::TopBottomPanel::top("filter_toolbar").show(ctx, |ui| {
                    toolbar.ui(ui, viewer_context);
                });
                egui::CentralPanel::default().show(ctx, |ui| {
                    viewport.ui(ui, viewer_context);
                });
            }
        }

        if retry {
            warn!("Retrying load after failure");
            self.start_load();
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Phase::Ready(explorer) = &self.phase {
            let configs = explorer.viewport.save_configs();
            storage.set_string(VIEW_CONFIG_KEY, configs.to_string());
            self.saved_views = Some(configs);
        }
    }
}
