//! Headless pointer-event state machine for tracing measurements.
//!
//! The machine consumes abstract `pointer_down / pointer_move / pointer_up /
//! double_click` events in plan-image pixel coordinates, independent of any
//! UI toolkit. Gestures produce pure [`GestureOutcome`] data; mutation of the
//! store happens centrally in [`TakeoffSession`]. For double clicks the
//! embedding UI is expected to deliver `double_click` instead of a second
//! `pointer_down`.

use log::debug;

use crate::calibration::Calibration;
use crate::geometry::{distance, Point};
use crate::measurement::{MeasurementDraft, Shape};
use crate::store::MeasurementStore;

/// Pixel radius around the first polygon vertex that closes the ring.
pub const CLOSE_TOLERANCE: f64 = 10.0;

/// Pixel radius for hit-testing existing shapes during select/erase.
pub const HIT_TOLERANCE: f64 = 6.0;

/// Active drawing tool. Switching tools resets any in-progress accumulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Select,
    Line,
    Area,
    Count,
    Text,
    Erase,
}

#[derive(Debug, Clone, PartialEq)]
enum State {
    Idle,
    DrawingLine { points: Vec<Point> },
    DrawingPolygon { vertices: Vec<Point> },
}

/// What a pointer gesture produced.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// Nothing to report; the machine may still be mid-gesture.
    None,
    /// A finished shape ready to become a measurement.
    Completed(Shape),
    /// An existing measurement was hit with the erase tool.
    Erased(u64),
    /// Selection changed to the given measurement (`None` clears it).
    Selected(Option<u64>),
}

/// Tool-mode state machine over raw pointer events.
#[derive(Debug, Clone, Default)]
pub struct DrawingStateMachine {
    tool: Tool,
    state: State,
    pending_text: String,
}

impl Default for State {
    fn default() -> Self {
        State::Idle
    }
}

impl DrawingStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switches tools, discarding any in-progress line or polygon.
    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool != tool {
            debug!("tool switch {:?} -> {:?}", self.tool, tool);
        }
        self.tool = tool;
        self.state = State::Idle;
    }

    /// Text placed by the next `Text`-tool click.
    pub fn set_pending_text(&mut self, text: impl Into<String>) {
        self.pending_text = text.into();
    }

    /// Points accumulated by the gesture in progress (preview geometry).
    pub fn in_progress(&self) -> &[Point] {
        match &self.state {
            State::Idle => &[],
            State::DrawingLine { points } => points,
            State::DrawingPolygon { vertices } => vertices,
        }
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, store: &MeasurementStore) -> GestureOutcome {
        let p = Point::new(x, y);
        match self.tool {
            Tool::Select => GestureOutcome::Selected(store.hit_test(p, HIT_TOLERANCE)),
            Tool::Erase => match store.hit_test(p, HIT_TOLERANCE) {
                Some(id) => GestureOutcome::Erased(id),
                None => GestureOutcome::None,
            },
            Tool::Line => {
                self.state = State::DrawingLine { points: vec![p] };
                GestureOutcome::None
            }
            Tool::Area => self.polygon_click(p),
            Tool::Count => GestureOutcome::Completed(Shape::count(p)),
            Tool::Text => {
                GestureOutcome::Completed(Shape::text(p, std::mem::take(&mut self.pending_text)))
            }
        }
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> GestureOutcome {
        if let State::DrawingLine { points } = &mut self.state {
            let p = Point::new(x, y);
            if points.last() != Some(&p) {
                points.push(p);
            }
        }
        GestureOutcome::None
    }

    pub fn pointer_up(&mut self, _x: f64, _y: f64) -> GestureOutcome {
        if let State::DrawingLine { points } = std::mem::take(&mut self.state) {
            // A press with no movement collects a single point; discard it.
            if points.len() >= 2 {
                if let Ok(shape) = Shape::line(points) {
                    return GestureOutcome::Completed(shape);
                }
            }
        }
        GestureOutcome::None
    }

    pub fn double_click(&mut self, _x: f64, _y: f64) -> GestureOutcome {
        let ready = matches!(&self.state, State::DrawingPolygon { vertices } if vertices.len() >= 3);
        if ready {
            return self.close_polygon();
        }
        GestureOutcome::None
    }

    fn polygon_click(&mut self, p: Point) -> GestureOutcome {
        // A click near the first vertex closes the ring, but only once the
        // ring is actually a polygon; earlier it is a plain vertex.
        let closes = matches!(
            &self.state,
            State::DrawingPolygon { vertices }
                if vertices.len() >= 3 && distance(p, vertices[0]) <= CLOSE_TOLERANCE
        );
        if closes {
            return self.close_polygon();
        }
        match &mut self.state {
            State::DrawingPolygon { vertices } => vertices.push(p),
            _ => self.state = State::DrawingPolygon { vertices: vec![p] },
        }
        GestureOutcome::None
    }

    fn close_polygon(&mut self) -> GestureOutcome {
        if let State::DrawingPolygon { vertices } = std::mem::take(&mut self.state) {
            if let Ok(shape) = Shape::area(vertices) {
                return GestureOutcome::Completed(shape);
            }
        }
        GestureOutcome::None
    }
}

/// One measurement-producing gesture's effect on the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    None,
    /// A new measurement was stored under this id.
    Created(u64),
    /// The measurement with this id was erased.
    Erased(u64),
    /// Selection changed (`None` clears it).
    Selected(Option<u64>),
}

/// Couples the state machine with a [`MeasurementStore`] so completed
/// gestures become stored measurements carrying the session's active
/// classification defaults.
#[derive(Debug, Clone, Default)]
pub struct TakeoffSession {
    machine: DrawingStateMachine,
    store: MeasurementStore,
    selected: Option<u64>,
    pub active_division: String,
    pub active_subcategory: String,
    pub active_layer: String,
}

impl TakeoffSession {
    pub fn new(store: MeasurementStore) -> Self {
        Self {
            store,
            ..Self::default()
        }
    }

    pub fn store(&self) -> &MeasurementStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut MeasurementStore {
        &mut self.store
    }

    /// Consumes the session, handing the store back for persistence.
    pub fn into_store(self) -> MeasurementStore {
        self.store
    }

    pub fn calibration(&self) -> Option<&Calibration> {
        self.store.calibration()
    }

    pub fn selected(&self) -> Option<u64> {
        self.selected
    }

    pub fn tool(&self) -> Tool {
        self.machine.tool()
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.machine.set_tool(tool);
    }

    pub fn set_pending_text(&mut self, text: impl Into<String>) {
        self.machine.set_pending_text(text);
    }

    /// Preview points of the gesture in progress.
    pub fn in_progress(&self) -> &[Point] {
        self.machine.in_progress()
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> SessionEvent {
        let outcome = self.machine.pointer_down(x, y, &self.store);
        self.apply(outcome)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> SessionEvent {
        let outcome = self.machine.pointer_move(x, y);
        self.apply(outcome)
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) -> SessionEvent {
        let outcome = self.machine.pointer_up(x, y);
        self.apply(outcome)
    }

    pub fn double_click(&mut self, x: f64, y: f64) -> SessionEvent {
        let outcome = self.machine.double_click(x, y);
        self.apply(outcome)
    }

    fn apply(&mut self, outcome: GestureOutcome) -> SessionEvent {
        match outcome {
            GestureOutcome::None => SessionEvent::None,
            GestureOutcome::Completed(shape) => {
                let mut draft = MeasurementDraft::new(shape);
                draft.division = self.active_division.clone();
                draft.subcategory = self.active_subcategory.clone();
                draft.layer = self.active_layer.clone();
                let id = self.store.create(draft);
                SessionEvent::Created(id)
            }
            GestureOutcome::Erased(id) => {
                if self.selected == Some(id) {
                    self.selected = None;
                }
                match self.store.delete(id) {
                    Ok(_) => SessionEvent::Erased(id),
                    Err(_) => SessionEvent::None,
                }
            }
            GestureOutcome::Selected(sel) => {
                self.selected = sel;
                SessionEvent::Selected(sel)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> TakeoffSession {
        TakeoffSession::new(MeasurementStore::new())
    }

    #[test]
    fn line_gesture_emits_measurement() {
        let mut s = session();
        s.set_tool(Tool::Line);
        s.pointer_down(0.0, 0.0);
        s.pointer_move(3.0, 0.0);
        s.pointer_move(3.0, 4.0);
        let ev = s.pointer_up(3.0, 4.0);
        let SessionEvent::Created(id) = ev else {
            panic!("expected created, got {ev:?}");
        };
        let m = s.store().get(id).unwrap();
        assert!((m.value - 7.0).abs() < 1e-9);
    }

    #[test]
    fn click_without_drag_is_discarded() {
        let mut s = session();
        s.set_tool(Tool::Line);
        s.pointer_down(5.0, 5.0);
        assert_eq!(s.pointer_up(5.0, 5.0), SessionEvent::None);
        assert!(s.store().is_empty());
    }

    #[test]
    fn polygon_close_requires_three_vertices() {
        let mut s = session();
        s.set_tool(Tool::Area);
        s.pointer_down(0.0, 0.0);
        s.pointer_down(100.0, 0.0);
        // Near the first vertex, but only two collected: treated as a vertex.
        assert_eq!(s.pointer_down(4.0, 0.0), SessionEvent::None);
        assert_eq!(s.in_progress().len(), 3);
        assert!(s.store().is_empty());
    }

    #[test]
    fn polygon_closes_near_first_vertex() {
        let mut s = session();
        s.set_tool(Tool::Area);
        s.pointer_down(0.0, 0.0);
        s.pointer_down(100.0, 0.0);
        s.pointer_down(100.0, 100.0);
        s.pointer_down(0.0, 100.0);
        let ev = s.pointer_down(3.0, 4.0); // within 10px of (0,0)
        let SessionEvent::Created(id) = ev else {
            panic!("expected created, got {ev:?}");
        };
        let m = s.store().get(id).unwrap();
        // Closing click is excluded from the ring.
        assert_eq!(m.shape.points().len(), 4);
        assert!((m.value - 10000.0).abs() < 1e-9);
    }

    #[test]
    fn double_click_force_closes() {
        let mut s = session();
        s.set_tool(Tool::Area);
        s.pointer_down(0.0, 0.0);
        s.pointer_down(10.0, 0.0);
        assert_eq!(s.double_click(10.0, 0.0), SessionEvent::None);
        s.pointer_down(10.0, 10.0);
        assert!(matches!(s.double_click(10.0, 10.0), SessionEvent::Created(_)));
    }

    #[test]
    fn tool_switch_resets_accumulation() {
        let mut s = session();
        s.set_tool(Tool::Area);
        s.pointer_down(0.0, 0.0);
        s.pointer_down(10.0, 0.0);
        s.set_tool(Tool::Line);
        assert!(s.in_progress().is_empty());
    }

    #[test]
    fn erase_removes_hit_measurement() {
        let mut s = session();
        s.set_tool(Tool::Count);
        let SessionEvent::Created(id) = s.pointer_down(50.0, 50.0) else {
            panic!("count click should create");
        };
        s.set_tool(Tool::Erase);
        assert_eq!(s.pointer_down(52.0, 50.0), SessionEvent::Erased(id));
        assert!(s.store().is_empty());
        // Empty canvas: nothing to erase.
        assert_eq!(s.pointer_down(52.0, 50.0), SessionEvent::None);
    }

    #[test]
    fn select_changes_selection() {
        let mut s = session();
        s.set_tool(Tool::Count);
        let SessionEvent::Created(id) = s.pointer_down(10.0, 10.0) else {
            panic!("count click should create");
        };
        s.set_tool(Tool::Select);
        assert_eq!(s.pointer_down(11.0, 10.0), SessionEvent::Selected(Some(id)));
        assert_eq!(s.selected(), Some(id));
        assert_eq!(s.pointer_down(200.0, 200.0), SessionEvent::Selected(None));
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn text_click_places_note() {
        let mut s = session();
        s.set_tool(Tool::Text);
        s.set_pending_text("verify rebar spacing");
        let SessionEvent::Created(id) = s.pointer_down(5.0, 5.0) else {
            panic!("text click should create");
        };
        match &s.store().get(id).unwrap().shape {
            Shape::Text { text, .. } => assert_eq!(text, "verify rebar spacing"),
            other => panic!("expected text shape, got {other:?}"),
        }
    }
}
