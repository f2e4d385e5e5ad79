use iced::mouse;
use iced::touch;
use iced::widget::canvas::{self, Path, Stroke};
use iced::{Color, Element, Length, Point, Rectangle, Size};

use crate::core::models::{GestureState, PointerAction, PointerEvent};
use crate::core::orchestrators::TelescopeMessage;
use crate::core::services::GestureTracker;

/// Snapshot of everything the overlay needs for one frame. Built by the
/// controller on every view pass.
#[derive(Debug, Clone, Copy)]
pub struct ProgressOverlay {
    pub bar_fraction: f32,
    pub flash_fraction: f32,
    pub hidden: bool,
    pub color: [f32; 4],
    pub stroke_width: f32,
    pub tracker: GestureTracker,
    pub state: GestureState,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PointerId {
    Finger(touch::Finger),
    Mouse(mouse::Button),
}

/// Pointers currently down over the overlay, in press order.
#[derive(Debug, Default)]
pub struct PointerTracking {
    pointers: Vec<PointerId>,
}

impl PointerTracking {
    fn press(&mut self, id: PointerId) -> Option<PointerEvent> {
        if self.pointers.contains(&id) {
            return None;
        }

        self.pointers.push(id);
        let count = self.pointers.len();
        let action = if count == 1 {
            PointerAction::Down
        } else {
            PointerAction::PointerDown
        };
        Some(PointerEvent::new(action, count))
    }

    fn lift(&mut self, id: PointerId) -> Option<PointerEvent> {
        let index = self.pointers.iter().position(|pointer| *pointer == id)?;
        let count = self.pointers.len();
        self.pointers.remove(index);

        let action = if count == 1 {
            PointerAction::Up
        } else {
            PointerAction::PointerUp
        };
        Some(PointerEvent::new(action, count))
    }

    fn lose(&mut self, id: PointerId) -> Option<PointerEvent> {
        if !self.pointers.contains(&id) {
            return None;
        }

        let count = self.pointers.len();
        self.pointers.clear();
        Some(PointerEvent::new(PointerAction::Cancel, count))
    }

    fn movement(&self, id: Option<PointerId>) -> Option<PointerEvent> {
        let tracked = match id {
            Some(id) => self.pointers.contains(&id),
            None => self
                .pointers
                .iter()
                .any(|pointer| matches!(pointer, PointerId::Mouse(_))),
        };

        tracked.then(|| PointerEvent::new(PointerAction::Move, self.pointers.len()))
    }

    /// Translates an iced event into a pointer event for the gesture tracker.
    /// Presses outside `bounds` are ignored; lifts of tracked pointers are
    /// reported wherever they happen.
    pub fn translate(
        &mut self,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<PointerEvent> {
        match event {
            iced::Event::Touch(touch_event) => match touch_event {
                touch::Event::FingerPressed { id, position } => {
                    if bounds.contains(*position) {
                        self.press(PointerId::Finger(*id))
                    } else {
                        None
                    }
                }
                touch::Event::FingerMoved { id, .. } => self.movement(Some(PointerId::Finger(*id))),
                touch::Event::FingerLifted { id, .. } => self.lift(PointerId::Finger(*id)),
                touch::Event::FingerLost { id, .. } => self.lose(PointerId::Finger(*id)),
            },
            iced::Event::Mouse(mouse_event) => match mouse_event {
                mouse::Event::ButtonPressed(button @ (mouse::Button::Left | mouse::Button::Right)) => {
                    if cursor.is_over(bounds) {
                        self.press(PointerId::Mouse(*button))
                    } else {
                        None
                    }
                }
                mouse::Event::ButtonReleased(button) => self.lift(PointerId::Mouse(*button)),
                mouse::Event::CursorMoved { .. } => self.movement(None),
                _ => None,
            },
            _ => None,
        }
    }
}

/// The four border lines, each drawn along its edge from `start` to `end`
/// (fractions of the edge). Top runs left to right, right runs top to bottom,
/// bottom runs right to left and left runs bottom to top.
pub fn edge_segments(size: Size, half_stroke: f32, start: f32, end: f32) -> [(Point, Point); 4] {
    let width = size.width;
    let height = size.height;

    [
        (
            Point::new(width * start, half_stroke),
            Point::new(width * end, half_stroke),
        ),
        (
            Point::new(width - half_stroke, height * start),
            Point::new(width - half_stroke, height * end),
        ),
        (
            Point::new(width - width * start, height - half_stroke),
            Point::new(width - width * end, height - half_stroke),
        ),
        (
            Point::new(half_stroke, height - height * start),
            Point::new(half_stroke, height - height * end),
        ),
    ]
}

/// What the overlay does with one translated pointer event. Only captured
/// events are kept from the content underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayResponse {
    Ignore,
    Redraw,
    Publish { capture: bool },
}

impl ProgressOverlay {
    pub fn respond_to(&self, pointer_event: &PointerEvent) -> OverlayResponse {
        if !self.enabled {
            return OverlayResponse::Ignore;
        }

        let verdict = self.tracker.interpret(pointer_event, self.state, self.enabled);
        if verdict.needs_redraw && verdict.intent.is_none() {
            return OverlayResponse::Redraw;
        }

        OverlayResponse::Publish {
            capture: verdict.handled,
        }
    }

    /// Segments to stroke this frame: the progress sweep first, then whatever
    /// the completion flash has not yet undrawn.
    pub fn segments(&self, size: Size) -> Vec<(Point, Point)> {
        if self.hidden {
            return Vec::new();
        }

        let half_stroke = self.stroke_width / 2.0;
        let mut segments = Vec::with_capacity(8);

        if self.bar_fraction > 0.0 {
            segments.extend(edge_segments(size, half_stroke, 0.0, self.bar_fraction));
        }

        if self.flash_fraction < 1.0 {
            segments.extend(edge_segments(size, half_stroke, self.flash_fraction, 1.0));
        }

        segments
    }

    pub fn render_ui<'a>(self) -> Element<'a, TelescopeMessage> {
        iced::widget::canvas(self)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

impl canvas::Program<TelescopeMessage> for ProgressOverlay {
    type State = PointerTracking;

    fn update(
        &self,
        state: &mut Self::State,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<TelescopeMessage>> {
        let pointer_event = state.translate(event, bounds, cursor)?;

        match self.respond_to(&pointer_event) {
            OverlayResponse::Ignore => None,
            OverlayResponse::Redraw => Some(canvas::Action::request_redraw().and_capture()),
            OverlayResponse::Publish { capture } => {
                let action = canvas::Action::publish(TelescopeMessage::Pointer(pointer_event));
                if capture {
                    Some(action.and_capture())
                } else {
                    Some(action)
                }
            }
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry<iced::Renderer>> {
        let segments = self.segments(bounds.size());
        if segments.is_empty() {
            return vec![];
        }

        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let [red, green, blue, alpha] = self.color;
        let stroke = Stroke::default()
            .with_color(Color::from_rgba(red, green, blue, alpha))
            .with_width(self.stroke_width);

        for (from, to) in segments {
            frame.stroke(&Path::line(from, to), stroke);
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_overlay(bar_fraction: f32, flash_fraction: f32) -> ProgressOverlay {
        ProgressOverlay {
            bar_fraction,
            flash_fraction,
            hidden: false,
            color: [1.0, 0.0, 0.0, 1.0],
            stroke_width: 4.0,
            tracker: GestureTracker::default(),
            state: GestureState::Idle,
            enabled: true,
        }
    }

    fn bounds() -> Rectangle {
        Rectangle::new(Point::ORIGIN, Size::new(200.0, 100.0))
    }

    fn finger_pressed(id: u64, x: f32, y: f32) -> iced::Event {
        iced::Event::Touch(touch::Event::FingerPressed {
            id: touch::Finger(id),
            position: Point::new(x, y),
        })
    }

    fn finger_lifted(id: u64) -> iced::Event {
        iced::Event::Touch(touch::Event::FingerLifted {
            id: touch::Finger(id),
            position: Point::new(10.0, 10.0),
        })
    }

    #[test]
    fn test_edge_segments_follow_clockwise_sweep() {
        let [top, right, bottom, left] = edge_segments(Size::new(200.0, 100.0), 2.0, 0.0, 0.5);

        assert_eq!(top, (Point::new(0.0, 2.0), Point::new(100.0, 2.0)));
        assert_eq!(right, (Point::new(198.0, 0.0), Point::new(198.0, 50.0)));
        assert_eq!(bottom, (Point::new(200.0, 98.0), Point::new(100.0, 98.0)));
        assert_eq!(left, (Point::new(2.0, 100.0), Point::new(2.0, 50.0)));
    }

    #[test]
    fn test_idle_overlay_draws_nothing() {
        let overlay = create_test_overlay(0.0, 1.0);

        assert!(overlay.segments(Size::new(200.0, 100.0)).is_empty());
    }

    #[test]
    fn test_progress_and_flash_are_drawn_independently() {
        let progress_only = create_test_overlay(0.3, 1.0);
        let flash_only = create_test_overlay(0.0, 0.25);
        let both = create_test_overlay(0.3, 0.25);

        assert_eq!(progress_only.segments(Size::new(200.0, 100.0)).len(), 4);
        assert_eq!(flash_only.segments(Size::new(200.0, 100.0)).len(), 4);
        assert_eq!(both.segments(Size::new(200.0, 100.0)).len(), 8);
    }

    #[test]
    fn test_flash_undraws_from_each_edge_start() {
        let overlay = create_test_overlay(0.0, 0.25);

        let segments = overlay.segments(Size::new(200.0, 100.0));

        assert_eq!(segments[0], (Point::new(50.0, 2.0), Point::new(200.0, 2.0)));
        assert_eq!(segments[3], (Point::new(2.0, 75.0), Point::new(2.0, 0.0)));
    }

    #[test]
    fn test_hidden_overlay_draws_nothing_even_mid_flash() {
        let overlay = ProgressOverlay {
            hidden: true,
            ..create_test_overlay(1.0, 0.5)
        };

        assert!(overlay.segments(Size::new(200.0, 100.0)).is_empty());
    }

    #[test]
    fn test_single_press_while_idle_is_not_captured() {
        let overlay = create_test_overlay(0.0, 1.0);
        let mut tracking = PointerTracking::default();
        let pressed = tracking
            .translate(&finger_pressed(1, 10.0, 10.0), bounds(), mouse::Cursor::Unavailable)
            .unwrap();

        let response = overlay.respond_to(&pressed);

        assert_eq!(response, OverlayResponse::Publish { capture: false });
    }

    #[test]
    fn test_second_finger_at_threshold_is_captured() {
        let overlay = create_test_overlay(0.0, 1.0);

        let response = overlay.respond_to(&PointerEvent::new(PointerAction::PointerDown, 2));

        assert_eq!(response, OverlayResponse::Publish { capture: true });
    }

    #[test]
    fn test_busy_overlay_captures_everything() {
        let overlay = ProgressOverlay {
            state: GestureState::Saving,
            ..create_test_overlay(1.0, 1.0)
        };

        let response = overlay.respond_to(&PointerEvent::new(PointerAction::Down, 1));

        assert_eq!(response, OverlayResponse::Publish { capture: true });
    }

    #[test]
    fn test_disabled_overlay_ignores_pointers() {
        let overlay = ProgressOverlay {
            enabled: false,
            ..create_test_overlay(0.0, 1.0)
        };

        let response = overlay.respond_to(&PointerEvent::new(PointerAction::PointerDown, 2));

        assert_eq!(response, OverlayResponse::Ignore);
    }

    #[test]
    fn test_move_while_pressing_redraws() {
        let overlay = ProgressOverlay {
            state: GestureState::Pressing,
            ..create_test_overlay(0.5, 1.0)
        };

        let response = overlay.respond_to(&PointerEvent::new(PointerAction::Move, 2));

        assert_eq!(response, OverlayResponse::Redraw);
    }

    #[test]
    fn test_translate_counts_fingers_in_press_order() {
        let mut tracking = PointerTracking::default();
        let cursor = mouse::Cursor::Unavailable;

        let first = tracking.translate(&finger_pressed(1, 10.0, 10.0), bounds(), cursor);
        let second = tracking.translate(&finger_pressed(2, 20.0, 20.0), bounds(), cursor);
        let lifted = tracking.translate(&finger_lifted(2), bounds(), cursor);
        let last = tracking.translate(&finger_lifted(1), bounds(), cursor);

        assert_eq!(first, Some(PointerEvent::new(PointerAction::Down, 1)));
        assert_eq!(second, Some(PointerEvent::new(PointerAction::PointerDown, 2)));
        assert_eq!(lifted, Some(PointerEvent::new(PointerAction::PointerUp, 2)));
        assert_eq!(last, Some(PointerEvent::new(PointerAction::Up, 1)));
    }

    #[test]
    fn test_translate_ignores_presses_outside_bounds_and_unknown_lifts() {
        let mut tracking = PointerTracking::default();
        let cursor = mouse::Cursor::Unavailable;

        assert_eq!(
            tracking.translate(&finger_pressed(1, 500.0, 10.0), bounds(), cursor),
            None
        );
        assert_eq!(tracking.translate(&finger_lifted(1), bounds(), cursor), None);
    }

    #[test]
    fn test_translate_lost_finger_cancels_all_pointers() {
        let mut tracking = PointerTracking::default();
        let cursor = mouse::Cursor::Unavailable;
        tracking.translate(&finger_pressed(1, 10.0, 10.0), bounds(), cursor);
        tracking.translate(&finger_pressed(2, 20.0, 20.0), bounds(), cursor);

        let lost = tracking.translate(
            &iced::Event::Touch(touch::Event::FingerLost {
                id: touch::Finger(1),
                position: Point::new(10.0, 10.0),
            }),
            bounds(),
            cursor,
        );

        assert_eq!(lost, Some(PointerEvent::new(PointerAction::Cancel, 2)));
        assert_eq!(tracking.translate(&finger_lifted(2), bounds(), cursor), None);
    }

    #[test]
    fn test_translate_mouse_buttons_act_as_pointers() {
        let mut tracking = PointerTracking::default();
        let cursor = mouse::Cursor::Available(Point::new(50.0, 50.0));

        let left = tracking.translate(
            &iced::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)),
            bounds(),
            cursor,
        );
        let right = tracking.translate(
            &iced::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Right)),
            bounds(),
            cursor,
        );
        let moved = tracking.translate(
            &iced::Event::Mouse(mouse::Event::CursorMoved {
                position: Point::new(60.0, 60.0),
            }),
            bounds(),
            cursor,
        );

        assert_eq!(left, Some(PointerEvent::new(PointerAction::Down, 1)));
        assert_eq!(right, Some(PointerEvent::new(PointerAction::PointerDown, 2)));
        assert_eq!(moved, Some(PointerEvent::new(PointerAction::Move, 2)));
    }
}
