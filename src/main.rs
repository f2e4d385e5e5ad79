#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use iced::widget::{center, column, stack, text};
use iced::{Element, Subscription, Task};

use telescope::core::interfaces::ports::{DisplayMetricsProvider, ViewSurface};
use telescope::core::models::SurfaceRegion;
use telescope::global_constants::{APPLICATION_TITLE, ARTIFACT_FOLDER_NAME};
use telescope::ports::{
    LoggingTactileFeedback, XcapCaptureBroker, XcapDisplayMetrics, XcapWindowSurface,
};
use telescope::{CaptureController, Lens, RawImage, ScreenshotStore, TelescopeMessage, TelescopeSettings};

const FALLBACK_WINDOW_WIDTH: u32 = 1280;
const FALLBACK_WINDOW_HEIGHT: u32 = 800;

struct LoggingLens;

#[async_trait]
impl Lens for LoggingLens {
    async fn on_raw_capture(&self, image: RawImage) -> Option<RawImage> {
        log::info!("[DEMO] lens received {}x{} capture", image.width, image.height);
        Some(image)
    }

    fn on_artifact_saved(&self, artifact: Option<PathBuf>) {
        match artifact {
            Some(path) => log::info!("[DEMO] screenshot saved to {:?}", path),
            None => log::info!("[DEMO] capture finished without a screenshot"),
        }
    }
}

struct TelescopeDemo {
    controller: CaptureController,
}

impl TelescopeDemo {
    fn build() -> (Self, Task<TelescopeMessage>) {
        log::info!("[DEMO] starting {}", APPLICATION_TITLE);

        let settings = TelescopeSettings::load().unwrap_or_else(|e| {
            log::warn!("[DEMO] Failed to load settings: {}, using defaults", e);
            TelescopeSettings::default()
        });

        let store = ScreenshotStore::for_settings(&settings).unwrap_or_else(|e| {
            log::warn!("[DEMO] {}, saving into the temp directory", e);
            ScreenshotStore::at_folder(std::env::temp_dir().join(ARTIFACT_FOLDER_NAME))
        });

        let display_metrics = Arc::new(XcapDisplayMetrics::initialize());
        let (width, height) = match display_metrics.real_metrics() {
            Ok(metrics) => (
                (metrics.width_pixels as f32 / metrics.scale_factor).round() as u32,
                (metrics.height_pixels as f32 / metrics.scale_factor).round() as u32,
            ),
            Err(e) => {
                log::warn!("[DEMO] Failed to read display metrics: {:#}", e);
                (FALLBACK_WINDOW_WIDTH, FALLBACK_WINDOW_HEIGHT)
            }
        };
        let window_surface: Arc<dyn ViewSurface> = Arc::new(XcapWindowSurface::at_region(
            "demo-window",
            SurfaceRegion::at_coordinates(0, 0, width, height),
        ));

        let screenshot = settings.screenshot;

        let mut controller = CaptureController::build(
            settings,
            window_surface,
            display_metrics,
            Some(Arc::new(LoggingTactileFeedback)),
            store,
        );
        controller.set_lens(Some(Arc::new(LoggingLens)));

        controller.set_screenshot(screenshot, Some(Arc::new(XcapCaptureBroker::initialize())));

        (Self { controller }, Task::none())
    }

    fn handle_update(&mut self, message: TelescopeMessage) -> Task<TelescopeMessage> {
        self.controller.update(message)
    }

    fn render_view(&self) -> Element<'_, TelescopeMessage> {
        let required = self.controller.settings().pointer_count;
        let instructions = column![
            text(format!(
                "Hold {} fingers (or mouse buttons) on the window to capture",
                required
            ))
            .size(20),
            text(format!("State: {}", self.controller.state())).size(14),
        ]
        .spacing(8);

        stack![center(instructions), self.controller.render_overlay()].into()
    }

    fn handle_subscription(&self) -> Subscription<TelescopeMessage> {
        self.controller.subscription()
    }
}

fn main() -> iced::Result {
    env_logger::init();

    iced::application(
        TelescopeDemo::build,
        TelescopeDemo::handle_update,
        TelescopeDemo::render_view,
    )
    .subscription(TelescopeDemo::handle_subscription)
    .run()
}
