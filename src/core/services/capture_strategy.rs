use std::sync::Arc;
use std::time::Duration;

use crate::core::interfaces::ports::{CapturePermissionBroker, DisplayMetricsProvider, ViewSurface};
use crate::core::models::{CaptureRequest, RawImage};
use crate::global_constants::{LOG_TAG_CAPTURE, MESSAGE_NO_FRAME, VIRTUAL_DISPLAY_NAME};

/// How a trigger obtains its pixels. Chosen once per capture cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStrategy {
    /// Read back the rendered buffer of the target surface (or its root).
    SurfaceReadback,
    /// Mirror the whole display through a platform capture session.
    BufferComposite,
}

impl CaptureStrategy {
    /// Buffer composite needs both the caller's opt-in and a host that can mirror the display.
    pub fn select(
        request: &CaptureRequest,
        broker: Option<&Arc<dyn CapturePermissionBroker>>,
    ) -> Self {
        match broker {
            Some(broker) if request.native_capture_opt_in && broker.is_supported_on_host() => {
                CaptureStrategy::BufferComposite
            }
            _ => CaptureStrategy::SurfaceReadback,
        }
    }
}

/// Everything a strategy needs besides the request. Cheap to clone into a task.
#[derive(Clone)]
pub struct CaptureCollaborators {
    pub broker: Option<Arc<dyn CapturePermissionBroker>>,
    pub display_metrics: Arc<dyn DisplayMetricsProvider>,
    pub frame_timeout: Duration,
}

enum CompositeOutcome {
    Denied,
    Captured(Option<RawImage>),
}

/// Runs `strategy` for `request`. Never fails: every problem degrades to `None`.
pub async fn execute(
    strategy: CaptureStrategy,
    request: CaptureRequest,
    collaborators: CaptureCollaborators,
) -> Option<RawImage> {
    log::info!("{} executing {:?} for {:?}", LOG_TAG_CAPTURE, strategy, request);

    match (strategy, collaborators.broker.as_ref()) {
        (CaptureStrategy::BufferComposite, Some(broker)) => {
            let outcome = capture_whole_window(
                broker.as_ref(),
                collaborators.display_metrics.as_ref(),
                collaborators.frame_timeout,
            )
            .await;

            match outcome {
                CompositeOutcome::Captured(image) => image,
                CompositeOutcome::Denied => {
                    log::warn!(
                        "{} capture session denied, falling back to surface readback",
                        LOG_TAG_CAPTURE
                    );
                    read_back_surface(&request).await
                }
            }
        }
        _ => read_back_surface(&request).await,
    }
}

/// Unless only the target itself is wanted, walks up to the root surface.
pub fn resolve_target_surface(request: &CaptureRequest) -> Arc<dyn ViewSurface> {
    let mut surface = Arc::clone(&request.target);

    if request.whole_window {
        while let Some(parent) = surface.parent() {
            surface = parent;
        }
    }

    surface
}

async fn read_back_surface(request: &CaptureRequest) -> Option<RawImage> {
    let surface = resolve_target_surface(request);
    log::debug!("{} reading back {}", LOG_TAG_CAPTURE, surface.describe());

    match surface.read_back().await {
        Ok(image) => {
            log::info!(
                "{} read back {}x{} from {}",
                LOG_TAG_CAPTURE,
                image.width,
                image.height,
                surface.describe()
            );
            Some(image)
        }
        Err(e) => {
            log::error!("{} surface readback failed: {:#}", LOG_TAG_CAPTURE, e);
            None
        }
    }
}

async fn capture_whole_window(
    broker: &dyn CapturePermissionBroker,
    metrics_provider: &dyn DisplayMetricsProvider,
    frame_timeout: Duration,
) -> CompositeOutcome {
    let grant = broker.request_capture().await;
    log::debug!("{} capture grant: {:?}", LOG_TAG_CAPTURE, grant);

    let Some(mut session) = grant.session else {
        return CompositeOutcome::Denied;
    };

    if !grant.settle_delay.is_zero() {
        tokio::time::sleep(grant.settle_delay).await;
    }

    let metrics = match metrics_provider.real_metrics() {
        Ok(metrics) => metrics,
        Err(e) => {
            log::error!("{} unable to read display metrics: {:#}", LOG_TAG_CAPTURE, e);
            session.stop();
            return CompositeOutcome::Captured(None);
        }
    };

    let mut receiver = match session.open_frame_receiver(&metrics) {
        Ok(receiver) => receiver,
        Err(e) => {
            log::error!("{} unable to open frame receiver: {:#}", LOG_TAG_CAPTURE, e);
            session.stop();
            return CompositeOutcome::Captured(None);
        }
    };

    let display =
        match session.create_virtual_display(VIRTUAL_DISPLAY_NAME, &metrics, receiver.as_ref()) {
            Ok(display) => display,
            Err(e) => {
                log::error!("{} unable to create virtual display: {:#}", LOG_TAG_CAPTURE, e);
                receiver.close();
                session.stop();
                return CompositeOutcome::Captured(None);
            }
        };

    let image = match tokio::time::timeout(frame_timeout, receiver.acquire_next_frame()).await {
        Ok(Some(frame)) => {
            let copied = {
                let plane = frame.plane();
                RawImage::copy_from_strided_plane(
                    plane.bytes,
                    plane.pixel_stride,
                    plane.row_stride,
                    metrics.width_pixels,
                    metrics.height_pixels,
                )
            };
            frame.release();

            match copied {
                Ok(image) => Some(image),
                Err(e) => {
                    log::error!("{} unable to copy frame: {:#}", LOG_TAG_CAPTURE, e);
                    None
                }
            }
        }
        Ok(None) => {
            log::warn!("{} {}", LOG_TAG_CAPTURE, MESSAGE_NO_FRAME);
            None
        }
        Err(_) => {
            log::warn!(
                "{} no frame within {:?}, giving up",
                LOG_TAG_CAPTURE,
                frame_timeout
            );
            None
        }
    };

    receiver.close();
    display.release();
    session.stop();

    CompositeOutcome::Captured(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::core::interfaces::ports::{
        CaptureGrant, CaptureSession, CapturedFrame, FramePlane, FrameReceiver, VirtualDisplay,
    };
    use crate::core::models::DisplayMetrics;

    type EventLog = Arc<Mutex<Vec<&'static str>>>;

    struct MockSurface {
        name: &'static str,
        width: u32,
        height: u32,
        parent: Option<Arc<dyn ViewSurface>>,
    }

    #[async_trait]
    impl ViewSurface for MockSurface {
        fn describe(&self) -> String {
            self.name.to_string()
        }

        fn parent(&self) -> Option<Arc<dyn ViewSurface>> {
            self.parent.clone()
        }

        async fn read_back(&self) -> anyhow::Result<RawImage> {
            RawImage::build_from_raw_data(
                self.width,
                self.height,
                vec![128u8; (self.width * self.height * 4) as usize],
            )
        }
    }

    struct MockMetrics;
    impl DisplayMetricsProvider for MockMetrics {
        fn real_metrics(&self) -> anyhow::Result<DisplayMetrics> {
            Ok(DisplayMetrics::new(6, 4, 1.0))
        }
    }

    #[derive(Clone, Copy)]
    enum FrameBehavior {
        Deliver,
        Empty,
        Never,
    }

    struct MockFrame {
        bytes: Vec<u8>,
        events: EventLog,
    }

    impl CapturedFrame for MockFrame {
        fn plane(&self) -> FramePlane<'_> {
            FramePlane {
                bytes: &self.bytes,
                pixel_stride: 4,
                row_stride: 8 * 4,
            }
        }

        fn release(self: Box<Self>) {
            self.events.lock().unwrap().push("frame");
        }
    }

    struct MockReceiver {
        behavior: FrameBehavior,
        events: EventLog,
    }

    #[async_trait]
    impl FrameReceiver for MockReceiver {
        async fn acquire_next_frame(&mut self) -> Option<Box<dyn CapturedFrame>> {
            match self.behavior {
                FrameBehavior::Deliver => Some(Box::new(MockFrame {
                    bytes: vec![200u8; 8 * 4 * 4],
                    events: Arc::clone(&self.events),
                })),
                FrameBehavior::Empty => None,
                FrameBehavior::Never => futures::future::pending().await,
            }
        }

        fn close(self: Box<Self>) {
            self.events.lock().unwrap().push("receiver");
        }
    }

    struct MockDisplay {
        events: EventLog,
    }

    impl VirtualDisplay for MockDisplay {
        fn release(self: Box<Self>) {
            self.events.lock().unwrap().push("display");
        }
    }

    struct MockSession {
        behavior: FrameBehavior,
        events: EventLog,
    }

    impl CaptureSession for MockSession {
        fn open_frame_receiver(
            &mut self,
            _metrics: &DisplayMetrics,
        ) -> anyhow::Result<Box<dyn FrameReceiver>> {
            Ok(Box::new(MockReceiver {
                behavior: self.behavior,
                events: Arc::clone(&self.events),
            }))
        }

        fn create_virtual_display(
            &mut self,
            _name: &str,
            _metrics: &DisplayMetrics,
            _receiver: &dyn FrameReceiver,
        ) -> anyhow::Result<Box<dyn VirtualDisplay>> {
            Ok(Box::new(MockDisplay {
                events: Arc::clone(&self.events),
            }))
        }

        fn stop(self: Box<Self>) {
            self.events.lock().unwrap().push("session");
        }
    }

    struct MockBroker {
        grant: bool,
        supported: bool,
        behavior: FrameBehavior,
        events: EventLog,
    }

    #[async_trait]
    impl CapturePermissionBroker for MockBroker {
        fn is_supported_on_host(&self) -> bool {
            self.supported
        }

        async fn request_capture(&self) -> CaptureGrant {
            if !self.grant {
                return CaptureGrant::denied();
            }
            CaptureGrant::granted(
                Box::new(MockSession {
                    behavior: self.behavior,
                    events: Arc::clone(&self.events),
                }),
                Duration::from_millis(5),
            )
        }
    }

    fn create_test_request(whole_window: bool) -> CaptureRequest {
        let root: Arc<dyn ViewSurface> = Arc::new(MockSurface {
            name: "root",
            width: 20,
            height: 10,
            parent: None,
        });
        let target: Arc<dyn ViewSurface> = Arc::new(MockSurface {
            name: "target",
            width: 5,
            height: 3,
            parent: Some(root),
        });

        CaptureRequest {
            target,
            whole_window,
            native_capture_opt_in: false,
        }
    }

    fn create_test_collaborators(
        grant: bool,
        behavior: FrameBehavior,
    ) -> (CaptureCollaborators, EventLog) {
        let events: EventLog = Arc::new(Mutex::new(Vec::new()));
        let broker: Arc<dyn CapturePermissionBroker> = Arc::new(MockBroker {
            grant,
            supported: true,
            behavior,
            events: Arc::clone(&events),
        });

        (
            CaptureCollaborators {
                broker: Some(broker),
                display_metrics: Arc::new(MockMetrics),
                frame_timeout: Duration::from_millis(30),
            },
            events,
        )
    }

    #[test]
    fn test_select_without_broker_uses_surface_readback() {
        let mut request = create_test_request(false);
        request.native_capture_opt_in = true;

        assert_eq!(
            CaptureStrategy::select(&request, None),
            CaptureStrategy::SurfaceReadback
        );
    }

    #[test]
    fn test_select_with_supported_broker_uses_buffer_composite() {
        let (collaborators, _) = create_test_collaborators(true, FrameBehavior::Deliver);

        let mut request = create_test_request(false);
        request.native_capture_opt_in = true;

        let strategy = CaptureStrategy::select(&request, collaborators.broker.as_ref());

        assert_eq!(strategy, CaptureStrategy::BufferComposite);
    }

    #[test]
    fn test_select_without_opt_in_ignores_supported_broker() {
        let (collaborators, _) = create_test_collaborators(true, FrameBehavior::Deliver);

        let strategy =
            CaptureStrategy::select(&create_test_request(false), collaborators.broker.as_ref());

        assert_eq!(strategy, CaptureStrategy::SurfaceReadback);
    }

    #[test]
    fn test_select_with_unsupported_host_uses_surface_readback() {
        let broker: Arc<dyn CapturePermissionBroker> = Arc::new(MockBroker {
            grant: true,
            supported: false,
            behavior: FrameBehavior::Deliver,
            events: Arc::new(Mutex::new(Vec::new())),
        });

        let mut request = create_test_request(false);
        request.native_capture_opt_in = true;

        assert_eq!(
            CaptureStrategy::select(&request, Some(&broker)),
            CaptureStrategy::SurfaceReadback
        );
    }

    #[test]
    fn test_resolve_target_surface_respects_children_only() {
        assert_eq!(resolve_target_surface(&create_test_request(false)).describe(), "target");
        assert_eq!(resolve_target_surface(&create_test_request(true)).describe(), "root");
    }

    #[tokio::test]
    async fn test_surface_readback_returns_target_bounds() {
        let (collaborators, _) = create_test_collaborators(true, FrameBehavior::Deliver);

        let image = execute(
            CaptureStrategy::SurfaceReadback,
            create_test_request(false),
            collaborators,
        )
        .await
        .unwrap();

        assert_eq!((image.width, image.height), (5, 3));
    }

    #[tokio::test]
    async fn test_buffer_composite_crops_padding_and_releases_in_order() {
        let (collaborators, events) = create_test_collaborators(true, FrameBehavior::Deliver);

        let image = execute(
            CaptureStrategy::BufferComposite,
            create_test_request(true),
            collaborators,
        )
        .await
        .unwrap();

        assert_eq!((image.width, image.height), (6, 4));
        assert_eq!(
            *events.lock().unwrap(),
            vec!["frame", "receiver", "display", "session"]
        );
    }

    #[tokio::test]
    async fn test_buffer_composite_denied_falls_back_to_readback() {
        let (collaborators, events) = create_test_collaborators(false, FrameBehavior::Deliver);

        let image = execute(
            CaptureStrategy::BufferComposite,
            create_test_request(true),
            collaborators,
        )
        .await
        .unwrap();

        assert_eq!((image.width, image.height), (20, 10));
        assert!(events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_buffer_composite_without_frame_data_gives_up() {
        let (collaborators, events) = create_test_collaborators(true, FrameBehavior::Empty);

        let image = execute(
            CaptureStrategy::BufferComposite,
            create_test_request(true),
            collaborators,
        )
        .await;

        assert!(image.is_none());
        assert_eq!(*events.lock().unwrap(), vec!["receiver", "display", "session"]);
    }

    #[tokio::test]
    async fn test_buffer_composite_times_out_when_no_frame_arrives() {
        let (collaborators, events) = create_test_collaborators(true, FrameBehavior::Never);

        let image = execute(
            CaptureStrategy::BufferComposite,
            create_test_request(true),
            collaborators,
        )
        .await;

        assert!(image.is_none());
        assert_eq!(*events.lock().unwrap(), vec!["receiver", "display", "session"]);
    }
}
