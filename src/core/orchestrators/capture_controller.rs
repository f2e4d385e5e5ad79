use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use iced::{Element, Subscription, Task};

use crate::core::interfaces::adapters::Lens;
use crate::core::interfaces::ports::{
    CapturePermissionBroker, DisplayMetricsProvider, TactileFeedback, ViewSurface,
};
use crate::core::models::{
    CaptureRequest, GestureState, ImageHandoff, PointerEvent, PointerSession, ProgressFractions,
    RawImage, TelescopeSettings,
};
use crate::core::services::{
    capture_strategy, persist_off_thread, CaptureCollaborators, CaptureStrategy, GestureIntent,
    GestureTracker, ProgressAnimator, ScreenshotStore,
};
use crate::global_constants::LOG_TAG_TELESCOPE;
use crate::presentation::ProgressOverlay;

#[derive(Clone)]
pub enum TelescopeMessage {
    Pointer(PointerEvent),
    AnimationFrame(Instant),
    TriggerElapsed { generation: u64 },
    RawImageReady { cycle: u64, image: ImageHandoff },
    RawImageProcessed { cycle: u64, image: ImageHandoff },
    PersistComplete { cycle: u64, artifact: Option<PathBuf> },
}

impl std::fmt::Debug for TelescopeMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TelescopeMessage::Pointer(event) => write!(f, "Pointer({:?})", event),
            TelescopeMessage::AnimationFrame(_) => write!(f, "AnimationFrame"),
            TelescopeMessage::TriggerElapsed { generation } => {
                write!(f, "TriggerElapsed({})", generation)
            }
            TelescopeMessage::RawImageReady { cycle, image } => {
                write!(f, "RawImageReady({}, {:?})", cycle, image)
            }
            TelescopeMessage::RawImageProcessed { cycle, image } => {
                write!(f, "RawImageProcessed({}, {:?})", cycle, image)
            }
            TelescopeMessage::PersistComplete { cycle, artifact } => {
                write!(f, "PersistComplete({}, {:?})", cycle, artifact)
            }
        }
    }
}

/// Asynchronous work requested by a transition. Each variant resolves to
/// exactly one follow-up message.
pub enum Effect {
    None,
    ArmTrigger {
        generation: u64,
        delay: Duration,
    },
    Capture {
        cycle: u64,
        strategy: CaptureStrategy,
        request: CaptureRequest,
        collaborators: CaptureCollaborators,
    },
    ProcessRawImage {
        cycle: u64,
        lens: Arc<dyn Lens>,
        image: RawImage,
    },
    Persist {
        cycle: u64,
        store: Arc<ScreenshotStore>,
        image: Option<RawImage>,
    },
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effect::None => write!(f, "None"),
            Effect::ArmTrigger { generation, delay } => {
                write!(f, "ArmTrigger({}, {:?})", generation, delay)
            }
            Effect::Capture {
                cycle, strategy, ..
            } => write!(f, "Capture({}, {:?})", cycle, strategy),
            Effect::ProcessRawImage { cycle, image, .. } => {
                write!(f, "ProcessRawImage({}, {:?})", cycle, image)
            }
            Effect::Persist { cycle, image, .. } => {
                write!(f, "Persist({}, {:?})", cycle, image)
            }
        }
    }
}

impl Effect {
    pub fn is_none(&self) -> bool {
        matches!(self, Effect::None)
    }

    pub async fn run(self) -> Option<TelescopeMessage> {
        match self {
            Effect::None => None,
            Effect::ArmTrigger { generation, delay } => {
                tokio::time::sleep(delay).await;
                Some(TelescopeMessage::TriggerElapsed { generation })
            }
            Effect::Capture {
                cycle,
                strategy,
                request,
                collaborators,
            } => {
                let image = capture_strategy::execute(strategy, request, collaborators).await;
                Some(TelescopeMessage::RawImageReady {
                    cycle,
                    image: ImageHandoff::holding(image),
                })
            }
            Effect::ProcessRawImage { cycle, lens, image } => {
                let processed = lens.on_raw_capture(image).await;
                Some(TelescopeMessage::RawImageProcessed {
                    cycle,
                    image: ImageHandoff::holding(processed),
                })
            }
            Effect::Persist {
                cycle,
                store,
                image,
            } => {
                let artifact = persist_off_thread(store, image).await;
                Some(TelescopeMessage::PersistComplete { cycle, artifact })
            }
        }
    }

    pub fn into_task(self) -> Task<TelescopeMessage> {
        if self.is_none() {
            return Task::none();
        }

        Task::future(self.run()).then(|message| match message {
            Some(message) => Task::done(message),
            None => Task::none(),
        })
    }
}

/// Press-and-hold capture state machine. All transitions happen inside
/// [`CaptureController::update`], so they never interleave.
pub struct CaptureController {
    settings: TelescopeSettings,
    tracker: GestureTracker,
    animator: ProgressAnimator,
    state: GestureState,
    pointer_session: Option<PointerSession>,
    enabled: bool,
    detached: bool,
    trigger_generation: u64,
    capture_cycle: u64,
    pending_capture: Option<CaptureRequest>,
    advance_at_trigger: Option<f32>,
    widget_surface: Arc<dyn ViewSurface>,
    screenshot_target: Option<Arc<dyn ViewSurface>>,
    capture_broker: Option<Arc<dyn CapturePermissionBroker>>,
    display_metrics: Arc<dyn DisplayMetricsProvider>,
    tactile_feedback: Option<Arc<dyn TactileFeedback>>,
    lens: Option<Arc<dyn Lens>>,
    store: Arc<ScreenshotStore>,
}

impl CaptureController {
    pub fn build(
        settings: TelescopeSettings,
        widget_surface: Arc<dyn ViewSurface>,
        display_metrics: Arc<dyn DisplayMetricsProvider>,
        tactile_feedback: Option<Arc<dyn TactileFeedback>>,
        store: ScreenshotStore,
    ) -> Self {
        log::info!(
            "{} building controller for {} ({} pointers)",
            LOG_TAG_TELESCOPE,
            widget_surface.describe(),
            settings.pointer_count
        );

        Self {
            tracker: GestureTracker::with_pointer_count(settings.pointer_count),
            animator: ProgressAnimator::build(
                settings.trigger_duration(),
                settings.cancel_duration(),
                settings.done_duration(),
            ),
            settings,
            state: GestureState::Idle,
            pointer_session: None,
            enabled: true,
            detached: false,
            trigger_generation: 0,
            capture_cycle: 0,
            pending_capture: None,
            advance_at_trigger: None,
            widget_surface,
            screenshot_target: None,
            capture_broker: None,
            display_metrics,
            tactile_feedback,
            lens: None,
            store: Arc::new(store),
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn settings(&self) -> &TelescopeSettings {
        &self.settings
    }

    pub fn pointer_session(&self) -> Option<PointerSession> {
        self.pointer_session
    }

    pub fn fractions(&self) -> ProgressFractions {
        self.animator.fractions()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// How far the advance got when the last trigger was honored.
    pub fn advance_at_trigger(&self) -> Option<f32> {
        self.advance_at_trigger
    }

    pub fn is_awaiting_capture_frame(&self) -> bool {
        self.pending_capture.is_some()
    }

    pub fn set_lens(&mut self, lens: Option<Arc<dyn Lens>>) {
        self.lens = lens;
    }

    /// Number of pointers required to start a capture. Default is 2.
    pub fn set_pointer_count(&mut self, pointer_count: usize) {
        self.settings.pointer_count = pointer_count;
        self.tracker = GestureTracker::with_pointer_count(pointer_count);
    }

    pub fn set_progress_color(&mut self, progress_color: [f32; 4]) {
        self.settings.progress_color = progress_color;
    }

    /// Whether a screenshot is taken on capture. A broker, when given, enables
    /// whole-window capture.
    pub fn set_screenshot(
        &mut self,
        screenshot: bool,
        capture_broker: Option<Arc<dyn CapturePermissionBroker>>,
    ) {
        self.settings.screenshot = screenshot;
        self.capture_broker = capture_broker;
    }

    pub fn set_screenshot_children_only(&mut self, children_only: bool) {
        self.settings.screenshot_children_only = children_only;
    }

    /// Surface to read back. `None` restores the widget itself.
    pub fn set_screenshot_target(&mut self, target: Option<Arc<dyn ViewSurface>>) {
        self.screenshot_target = target;
    }

    pub fn set_vibrate(&mut self, vibrate: bool) {
        self.settings.vibrate = vibrate;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Tears the controller away from its host. Outstanding timers, frame hops,
    /// captures and saves are ignored from now on and no Lens hook fires.
    pub fn detach(&mut self) {
        log::info!("{} detaching in state {}", LOG_TAG_TELESCOPE, self.state);
        self.detached = true;
        self.trigger_generation += 1;
        self.capture_cycle += 1;
        self.pending_capture = None;
        self.pointer_session = None;
        self.animator.cancel_all();
    }

    pub fn update(&mut self, message: TelescopeMessage) -> Task<TelescopeMessage> {
        self.handle(message).into_task()
    }

    pub fn handle(&mut self, message: TelescopeMessage) -> Effect {
        if self.detached {
            log::debug!("{} detached, dropping {:?}", LOG_TAG_TELESCOPE, message);
            return Effect::None;
        }

        match message {
            TelescopeMessage::Pointer(event) => self.handle_pointer_event(event),
            TelescopeMessage::AnimationFrame(now) => self.handle_animation_frame(now),
            TelescopeMessage::TriggerElapsed { generation } => self.on_trigger_fired(generation),
            TelescopeMessage::RawImageReady { cycle, image } => {
                self.on_raw_image_ready(cycle, image.take())
            }
            TelescopeMessage::RawImageProcessed { cycle, image } => {
                self.on_raw_image_processed(cycle, image.take())
            }
            TelescopeMessage::PersistComplete { cycle, artifact } => {
                self.on_persist_complete(cycle, artifact);
                Effect::None
            }
        }
    }

    pub fn subscription(&self) -> Subscription<TelescopeMessage> {
        if self.detached {
            return Subscription::none();
        }

        if self.animator.is_running() || self.pending_capture.is_some() {
            iced::window::frames().map(TelescopeMessage::AnimationFrame)
        } else {
            Subscription::none()
        }
    }

    pub fn progress_overlay(&self) -> ProgressOverlay {
        let bar_fraction = match self.state {
            GestureState::Saving => 1.0,
            _ => self.animator.bar_fraction(),
        };

        ProgressOverlay {
            bar_fraction,
            flash_fraction: self.animator.fractions().flash,
            hidden: self.state == GestureState::Capturing,
            color: self.settings.progress_color,
            stroke_width: self.settings.progress_stroke_width,
            tracker: self.tracker,
            state: self.state,
            enabled: self.enabled,
        }
    }

    pub fn render_overlay(&self) -> Element<'_, TelescopeMessage> {
        self.progress_overlay().render_ui()
    }

    fn handle_pointer_event(&mut self, event: PointerEvent) -> Effect {
        let verdict = self.tracker.interpret(&event, self.state, self.enabled);

        if let Some(session) = self.pointer_session.as_mut() {
            session.observe(&event);
        }

        match verdict.intent {
            Some(GestureIntent::Start) => {
                let effect = self.on_gesture_start();
                if self.state == GestureState::Pressing {
                    self.pointer_session = Some(PointerSession::begin(
                        self.tracker.required_pointer_count(),
                        event.pointer_count,
                    ));
                }
                effect
            }
            Some(GestureIntent::Cancel) => {
                self.on_gesture_cancel();
                Effect::None
            }
            None => Effect::None,
        }
    }

    fn handle_animation_frame(&mut self, now: Instant) -> Effect {
        self.animator.tick(now);

        match self.pending_capture.take() {
            Some(request) => self.dispatch_capture(request),
            None => Effect::None,
        }
    }

    pub fn on_gesture_start(&mut self) -> Effect {
        if self.state != GestureState::Idle {
            log::debug!(
                "{} ignoring start while {}",
                LOG_TAG_TELESCOPE,
                self.state
            );
            return Effect::None;
        }

        self.state = GestureState::Pressing;
        self.advance_at_trigger = None;
        self.animator.begin_advance();
        self.trigger_generation += 1;

        log::info!(
            "{} pressing, trigger #{} armed",
            LOG_TAG_TELESCOPE,
            self.trigger_generation
        );

        Effect::ArmTrigger {
            generation: self.trigger_generation,
            delay: self.settings.trigger_duration(),
        }
    }

    pub fn on_gesture_cancel(&mut self) {
        if self.state != GestureState::Pressing {
            return;
        }

        self.trigger_generation += 1;
        self.animator.begin_retreat();
        self.state = GestureState::Idle;
        self.pointer_session = None;

        log::info!("{} press cancelled", LOG_TAG_TELESCOPE);
    }

    pub fn on_trigger_fired(&mut self, generation: u64) -> Effect {
        if generation != self.trigger_generation || self.state != GestureState::Pressing {
            log::debug!(
                "{} ignoring stale trigger #{} (current #{}, {})",
                LOG_TAG_TELESCOPE,
                generation,
                self.trigger_generation,
                self.state
            );
            return Effect::None;
        }

        self.advance_at_trigger = Some(self.animator.snap_advance_complete());
        self.vibrate_if_permitted();

        self.capture_cycle += 1;
        self.state = GestureState::Capturing;

        if !self.settings.screenshot {
            log::info!(
                "{} capture #{} triggered without screenshot",
                LOG_TAG_TELESCOPE,
                self.capture_cycle
            );
            return self.begin_saving(None);
        }

        log::info!(
            "{} capture #{} triggered, waiting for a clean frame",
            LOG_TAG_TELESCOPE,
            self.capture_cycle
        );
        self.pending_capture = Some(self.build_capture_request());
        Effect::None
    }

    pub fn on_raw_image_ready(&mut self, cycle: u64, image: Option<RawImage>) -> Effect {
        if !self.is_current_cycle(cycle, GestureState::Capturing) {
            return Effect::None;
        }

        match (image, self.lens.clone()) {
            (Some(image), Some(lens)) => {
                log::debug!(
                    "{} handing {}x{} capture to lens",
                    LOG_TAG_TELESCOPE,
                    image.width,
                    image.height
                );
                Effect::ProcessRawImage { cycle, lens, image }
            }
            (image, _) => self.begin_saving(image),
        }
    }

    fn on_raw_image_processed(&mut self, cycle: u64, image: Option<RawImage>) -> Effect {
        if !self.is_current_cycle(cycle, GestureState::Capturing) {
            return Effect::None;
        }

        self.begin_saving(image)
    }

    pub fn on_persist_complete(&mut self, cycle: u64, artifact: Option<PathBuf>) {
        if !self.is_current_cycle(cycle, GestureState::Saving) {
            return;
        }

        self.state = GestureState::Idle;
        self.pointer_session = None;
        self.animator.begin_flash();

        log::info!(
            "{} capture #{} complete: {:?}",
            LOG_TAG_TELESCOPE,
            cycle,
            artifact
        );

        if let Some(lens) = self.lens.as_ref() {
            lens.on_artifact_saved(artifact);
        }
    }

    fn begin_saving(&mut self, image: Option<RawImage>) -> Effect {
        self.state = GestureState::Saving;

        Effect::Persist {
            cycle: self.capture_cycle,
            store: Arc::clone(&self.store),
            image,
        }
    }

    fn dispatch_capture(&mut self, request: CaptureRequest) -> Effect {
        let strategy = CaptureStrategy::select(&request, self.capture_broker.as_ref());
        log::info!(
            "{} capture #{} using {:?}",
            LOG_TAG_TELESCOPE,
            self.capture_cycle,
            strategy
        );

        Effect::Capture {
            cycle: self.capture_cycle,
            strategy,
            request,
            collaborators: CaptureCollaborators {
                broker: self.capture_broker.clone(),
                display_metrics: Arc::clone(&self.display_metrics),
                frame_timeout: self.settings.frame_timeout(),
            },
        }
    }

    fn build_capture_request(&self) -> CaptureRequest {
        let target = self
            .screenshot_target
            .clone()
            .unwrap_or_else(|| Arc::clone(&self.widget_surface));

        CaptureRequest {
            target,
            whole_window: !self.settings.screenshot_children_only,
            native_capture_opt_in: self.capture_broker.is_some(),
        }
    }

    fn vibrate_if_permitted(&self) {
        if !self.settings.vibrate {
            return;
        }

        let Some(device) = self.tactile_feedback.as_ref() else {
            return;
        };

        if !device.has_vibrate_permission() {
            log::debug!("{} no vibrate permission, skipping", LOG_TAG_TELESCOPE);
            return;
        }

        if let Err(e) = device.vibrate(self.settings.vibration_duration()) {
            log::debug!("{} vibration failed: {:#}", LOG_TAG_TELESCOPE, e);
        }
    }

    fn is_current_cycle(&self, cycle: u64, expected: GestureState) -> bool {
        let current = cycle == self.capture_cycle && self.state == expected;
        if !current {
            log::debug!(
                "{} dropping result of capture #{} (current #{}, {})",
                LOG_TAG_TELESCOPE,
                cycle,
                self.capture_cycle,
                self.state
            );
        }
        current
    }
}
