use crate::canvas::{Color, Pixel, PixelBuffer, Point};
use crate::components::history::{History, Transaction};
use crate::ops::clipboard::{self, ClipboardError, ClipboardProvider};
use crate::ops::fill::flood_fill;
use crate::ops::selection::{
    move_area, CircleSelection, LassoSelection, RectangleSelection, Selection,
};
use crate::ops::shapes::{self, MAX_STROKE_WIDTH};
use crate::settings::Settings;

// ============================================================================
// TOOLS AND INPUT
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ToolType {
    #[default]
    Pencil,
    Line,
    DrawRect,
    DrawCircle,
    Eraser,
    Fill,
    SelectRectangle,
    SelectCircle,
    Lasso,
}

impl ToolType {
    pub fn all() -> &'static [ToolType] {
        &[
            ToolType::Pencil,
            ToolType::Line,
            ToolType::DrawRect,
            ToolType::DrawCircle,
            ToolType::Eraser,
            ToolType::Fill,
            ToolType::SelectRectangle,
            ToolType::SelectCircle,
            ToolType::Lasso,
        ]
    }

    /// Config / command-line name.
    pub fn name(&self) -> &'static str {
        match self {
            ToolType::Pencil => "pencil",
            ToolType::Line => "line",
            ToolType::DrawRect => "rect",
            ToolType::DrawCircle => "circle",
            ToolType::Eraser => "eraser",
            ToolType::Fill => "fill",
            ToolType::SelectRectangle => "select_rect",
            ToolType::SelectCircle => "select_circle",
            ToolType::Lasso => "lasso",
        }
    }

    pub fn from_name(name: &str) -> Option<ToolType> {
        let name = name.trim().to_ascii_lowercase();
        ToolType::all().iter().copied().find(|t| t.name() == name)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ToolType::Pencil => "Pencil",
            ToolType::Line => "Line",
            ToolType::DrawRect => "Rectangle",
            ToolType::DrawCircle => "Circle",
            ToolType::Eraser => "Eraser",
            ToolType::Fill => "Fill",
            ToolType::SelectRectangle => "Select Rectangle",
            ToolType::SelectCircle => "Select Circle",
            ToolType::Lasso => "Lasso",
        }
    }

    pub fn is_selection(&self) -> bool {
        matches!(
            self,
            ToolType::SelectRectangle | ToolType::SelectCircle | ToolType::Lasso
        )
    }

    /// Tools that preview a shape while dragging and commit it on release.
    pub fn is_stroke(&self) -> bool {
        matches!(
            self,
            ToolType::Pencil
                | ToolType::Line
                | ToolType::DrawRect
                | ToolType::DrawCircle
                | ToolType::Eraser
        )
    }

    fn is_freehand(&self) -> bool {
        matches!(self, ToolType::Pencil | ToolType::Eraser)
    }
}

/// Keys the engine binds actions to. Everything else is `Other`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCode {
    Z,
    C,
    V,
    Other,
}

/// Host input, in canvas-local pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    PointerDown { x: i32, y: i32 },
    PointerMove { x: i32, y: i32, button_held: bool },
    PointerUp { x: i32, y: i32 },
    KeyDown { code: KeyCode, ctrl: bool },
    KeyUp { code: KeyCode },
}

/// Named actions a host can bind to any shortcut or button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Undo,
    Copy,
    Paste,
}

impl Action {
    /// Default bindings: Ctrl+Z, Ctrl+C, Ctrl+V.
    pub fn from_key(code: KeyCode, ctrl: bool) -> Option<Action> {
        if !ctrl {
            return None;
        }
        match code {
            KeyCode::Z => Some(Action::Undo),
            KeyCode::C => Some(Action::Copy),
            KeyCode::V => Some(Action::Paste),
            KeyCode::Other => None,
        }
    }

    fn key(self) -> KeyCode {
        match self {
            Action::Undo => KeyCode::Z,
            Action::Copy => KeyCode::C,
            Action::Paste => KeyCode::V,
        }
    }

    fn index(self) -> usize {
        match self {
            Action::Undo => 0,
            Action::Copy => 1,
            Action::Paste => 2,
        }
    }
}

// ============================================================================
// EDIT SESSION: tool state machine
// ============================================================================

/// A finalized selection: its shape, the pixels it held when it was made,
/// and the dashed outline painted over the canvas (never part of history).
#[derive(Debug)]
struct ActiveSelection {
    shape: Selection,
    area: Vec<Pixel>,
    outline: Transaction,
}

/// What the primary button is doing. Every variant except `Idle` owns the
/// pending (speculative) transaction currently applied to the buffer.
#[derive(Debug, Default)]
enum DragState {
    #[default]
    Idle,
    /// Previewing a stroke or shape.
    Painting { pending: Transaction },
    /// Previewing the dashed outline of a new selection.
    Selecting { pending: Transaction },
    /// Dragging the pixels of a finalized selection. `pending` is `None`
    /// until the first move.
    Moving {
        selection: ActiveSelection,
        pending: Option<Transaction>,
    },
}

/// Owns the canvas, the undo history and all tool state for one document.
///
/// Every public event method returns `true` when the host should redraw.
#[derive(Debug)]
pub struct EditSession {
    buffer: PixelBuffer,
    history: History,
    tool: ToolType,
    color: Color,
    selection_color: Color,
    stroke_width: u32,

    /// Where the primary button went down.
    start_pos: Point,
    /// Last pointer position seen during the drag.
    prev_pos: Point,
    /// Raw samples since pointer-down, for freehand tools.
    freehand: Vec<Point>,

    drag: DragState,
    selection: Option<ActiveSelection>,

    /// Set on an action's key-down, cleared on its key-up, so a held key
    /// fires once.
    action_in_flight: [bool; 3],
}

impl EditSession {
    pub fn new(width: u32, height: u32) -> Self {
        let buffer = PixelBuffer::new(width, height);
        crate::log_info!(
            "Edit session created ({}x{})",
            buffer.width(),
            buffer.height()
        );
        Self {
            buffer,
            history: History::new(),
            tool: ToolType::default(),
            color: Color::BLACK,
            selection_color: Color::BLACK,
            stroke_width: 1,
            start_pos: Point::default(),
            prev_pos: Point::default(),
            freehand: Vec::new(),
            drag: DragState::Idle,
            selection: None,
            action_in_flight: [false; 3],
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut session = Self::new(settings.canvas_width, settings.canvas_height);
        session.tool = settings.default_tool;
        session.color = settings.primary_color;
        session.selection_color = settings.selection_color;
        session.set_stroke_width(settings.stroke_width);
        session
    }

    // ---- accessors ----------------------------------------------------------

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn tool(&self) -> ToolType {
        self.tool
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn stroke_width(&self) -> u32 {
        self.stroke_width
    }

    pub fn set_stroke_width(&mut self, width: u32) {
        self.stroke_width = width.clamp(1, MAX_STROKE_WIDTH);
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Description of the edit the next undo would revert.
    pub fn undo_description(&self) -> Option<&'static str> {
        self.history.undo_description()
    }

    /// Approximate bytes held by the undo history.
    pub fn history_memory(&self) -> usize {
        self.history.memory_usage()
    }

    pub fn is_dragging(&self) -> bool {
        !matches!(self.drag, DragState::Idle)
    }

    pub fn has_selection(&self) -> bool {
        self.selection.is_some()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref().map(|s| &s.shape)
    }

    /// Switch tools. An in-progress drag is committed first, and leaving the
    /// selection tools clears any selection.
    pub fn set_tool(&mut self, tool: ToolType) -> bool {
        if tool == self.tool {
            return false;
        }
        let mut redraw = self.finish_drag();
        if !tool.is_selection() {
            redraw |= self.clear_selection();
        }
        self.tool = tool;
        redraw
    }

    // ---- event dispatch -----------------------------------------------------

    pub fn handle_event(
        &mut self,
        event: InputEvent,
        clipboard: &mut dyn ClipboardProvider,
    ) -> bool {
        match event {
            InputEvent::PointerDown { x, y } => self.pointer_down(Point::new(x, y)),
            InputEvent::PointerMove { x, y, button_held } => {
                self.pointer_move(Point::new(x, y), button_held)
            }
            InputEvent::PointerUp { x, y } => self.pointer_up(Point::new(x, y)),
            InputEvent::KeyDown { code, ctrl } => self.key_down(code, ctrl, clipboard),
            InputEvent::KeyUp { code } => {
                self.key_up(code);
                false
            }
        }
    }

    pub fn pointer_down(&mut self, p: Point) -> bool {
        // A missed pointer-up must not leave a pending edit dangling.
        let mut redraw = self.finish_drag();

        self.start_pos = p;
        self.prev_pos = p;
        self.freehand.clear();
        self.freehand.push(p);

        match self.tool {
            ToolType::Fill => {
                redraw |= self.clear_selection();
                let txn = flood_fill(p, self.color, &mut self.buffer);
                self.commit(txn);
                true
            }
            tool if tool.is_stroke() => {
                redraw |= self.clear_selection();
                let pending = self.stroke_preview(p);
                self.drag = DragState::Painting { pending };
                true
            }
            ToolType::Lasso => {
                redraw |= self.clear_selection();
                if let Some(shape) = self.selection_shape(p, p)
                    && let Err(e) = shape.border()
                {
                    crate::log_warn!("{} selection not started: {}", shape.label(), e);
                }
                redraw
            }
            _ => self.selection_down(p) || redraw,
        }
    }

    pub fn pointer_move(&mut self, p: Point, button_held: bool) -> bool {
        if !button_held {
            return false;
        }
        let drag = std::mem::take(&mut self.drag);
        let (drag, redraw) = match drag {
            DragState::Idle => (DragState::Idle, false),
            DragState::Painting { pending } => {
                pending.revert(&mut self.buffer);
                if self.tool.is_freehand() && self.freehand.last() != Some(&p) {
                    self.freehand.push(p);
                }
                let pending = self.stroke_preview(p);
                (DragState::Painting { pending }, true)
            }
            DragState::Selecting { pending } => {
                pending.revert(&mut self.buffer);
                let pending = match self.selection_shape(self.start_pos, p) {
                    Some(shape) => self.paint_outline(&shape),
                    None => Transaction::new("Selection outline"),
                };
                (DragState::Selecting { pending }, true)
            }
            DragState::Moving { selection, pending } => {
                if let Some(prev) = pending {
                    prev.revert(&mut self.buffer);
                }
                let dx = p.x - self.start_pos.x;
                let dy = p.y - self.start_pos.y;
                let txn = move_area(&selection.area, dx, dy, &mut self.buffer);
                (
                    DragState::Moving {
                        selection,
                        pending: Some(txn),
                    },
                    true,
                )
            }
        };
        self.drag = drag;
        self.prev_pos = p;
        redraw
    }

    pub fn pointer_up(&mut self, p: Point) -> bool {
        match std::mem::take(&mut self.drag) {
            DragState::Idle => false,
            DragState::Painting { pending } => {
                self.commit(pending);
                true
            }
            DragState::Selecting { pending } => {
                pending.revert(&mut self.buffer);
                self.finalize_selection(p);
                true
            }
            DragState::Moving { selection, pending } => {
                match pending {
                    Some(txn) => {
                        crate::log_info!(
                            "Moved {} selection by ({}, {})",
                            selection.shape.label(),
                            p.x - self.start_pos.x,
                            p.y - self.start_pos.y
                        );
                        self.commit(txn);
                    }
                    None => {
                        // Released without moving: keep the selection.
                        let outline = self.paint_outline(&selection.shape);
                        self.selection = Some(ActiveSelection {
                            outline,
                            ..selection
                        });
                    }
                }
                true
            }
        }
    }

    pub fn key_down(
        &mut self,
        code: KeyCode,
        ctrl: bool,
        clipboard: &mut dyn ClipboardProvider,
    ) -> bool {
        let Some(action) = Action::from_key(code, ctrl) else {
            return false;
        };
        let in_flight = &mut self.action_in_flight[action.index()];
        if *in_flight {
            return false;
        }
        *in_flight = true;
        self.perform(action, clipboard)
    }

    pub fn key_up(&mut self, code: KeyCode) {
        for action in [Action::Undo, Action::Copy, Action::Paste] {
            if action.key() == code {
                self.action_in_flight[action.index()] = false;
            }
        }
    }

    /// Run a named action immediately (no key debouncing).
    pub fn perform(&mut self, action: Action, clipboard: &mut dyn ClipboardProvider) -> bool {
        match action {
            Action::Undo => self.undo(),
            Action::Copy => {
                if let Err(e) = self.copy_to(clipboard) {
                    crate::log_err!("Copy failed: {}", e);
                }
                false
            }
            Action::Paste => match self.paste_from(clipboard) {
                Ok(changed) => changed,
                Err(e) => {
                    crate::log_err!("Paste failed: {}", e);
                    false
                }
            },
        }
    }

    // ---- actions --------------------------------------------------------------

    /// Revert the most recent commit. Ignored mid-drag; an active selection
    /// is cleared first. Returns `true` if anything changed.
    pub fn undo(&mut self) -> bool {
        if self.is_dragging() {
            crate::log_warn!("Undo ignored while dragging");
            return false;
        }
        let cleared = self.clear_selection();
        match self.history.undo(&mut self.buffer) {
            Some(desc) => {
                crate::log_info!("Undo '{}' (history depth {})", desc, self.history.len());
                true
            }
            None => cleared,
        }
    }

    /// Export the selection's bounding box, or the whole canvas when nothing
    /// is selected.
    pub fn copy_to(&self, clipboard: &mut dyn ClipboardProvider) -> Result<(), ClipboardError> {
        let img = match &self.selection {
            Some(active) => {
                let (min, max) = active
                    .shape
                    .bounding_box()
                    .map_err(|e| ClipboardError::InvalidImage(e.to_string()))?;
                let min = Point::new(min.x.max(0), min.y.max(0));
                let max = Point::new(
                    max.x.min(self.buffer.width() as i32 - 1),
                    max.y.min(self.buffer.height() as i32 - 1),
                );
                clipboard::export_area(&active.area, min, max)
            }
            None => self.buffer.to_rgba_image(),
        };
        clipboard.write_image(&img)?;
        crate::log_info!("Copied {}x{} image", img.width(), img.height());
        Ok(())
    }

    /// Composite the clipboard image at the origin and commit it. On error
    /// the buffer is untouched. Returns `Ok(false)` when ignored mid-drag.
    pub fn paste_from(
        &mut self,
        clipboard: &mut dyn ClipboardProvider,
    ) -> Result<bool, ClipboardError> {
        if self.is_dragging() {
            crate::log_warn!("Paste ignored while dragging");
            return Ok(false);
        }
        let img = clipboard.read_image()?;
        self.clear_selection();
        let txn = clipboard::composite_at_origin(&img, &mut self.buffer);
        crate::log_info!("Pasted {}x{} image", img.width(), img.height());
        self.commit(txn);
        Ok(true)
    }

    /// Drop the selection, reverting its outline. Returns `true` if there was one.
    pub fn clear_selection(&mut self) -> bool {
        match self.selection.take() {
            Some(active) => {
                active.outline.revert(&mut self.buffer);
                crate::log_info!("Cleared {} selection", active.shape.label());
                true
            }
            None => false,
        }
    }

    // ---- internals ----------------------------------------------------------

    fn commit(&mut self, txn: Transaction) {
        crate::log_info!(
            "Commit '{}' ({} pixels, history depth {})",
            txn.description(),
            txn.len(),
            self.history.len() + 1
        );
        self.history.push(txn);
    }

    fn finish_drag(&mut self) -> bool {
        if self.is_dragging() {
            self.pointer_up(self.prev_pos)
        } else {
            false
        }
    }

    /// Paint the active stroke tool's shape from the anchor (or trail) to `p`.
    fn stroke_preview(&mut self, p: Point) -> Transaction {
        let width = self.stroke_width;
        let points = match self.tool {
            ToolType::Pencil | ToolType::Eraser => shapes::freehand(&self.freehand, width),
            ToolType::Line => shapes::line(self.start_pos, p, width),
            ToolType::DrawRect => shapes::rectangle(self.start_pos, p, width),
            ToolType::DrawCircle => shapes::circle(self.start_pos, p, width),
            _ => Vec::new(),
        };
        let color = if self.tool == ToolType::Eraser {
            Color::WHITE
        } else {
            self.color
        };
        Transaction::paint(self.tool.label(), &mut self.buffer, &points, color)
    }

    fn selection_down(&mut self, p: Point) -> bool {
        let mut redraw = false;
        if let Some(active) = self.selection.take() {
            active.outline.revert(&mut self.buffer);
            redraw = true;
            match active.shape.is_within_bounds(p) {
                Ok(true) => {
                    self.drag = DragState::Moving {
                        selection: active,
                        pending: None,
                    };
                    return true;
                }
                Ok(false) => {
                    crate::log_info!("Cleared {} selection", active.shape.label());
                }
                Err(e) => {
                    crate::log_warn!("Selection dropped: {}", e);
                }
            }
        }

        let pending = match self.selection_shape(p, p) {
            Some(shape) => self.paint_outline(&shape),
            None => return redraw,
        };
        self.drag = DragState::Selecting { pending };
        true
    }

    fn selection_shape(&self, p0: Point, p1: Point) -> Option<Selection> {
        match self.tool {
            ToolType::SelectRectangle => Some(Selection::Rectangle(RectangleSelection::new(p0, p1))),
            ToolType::SelectCircle => Some(Selection::Circle(CircleSelection::from_points(p0, p1))),
            ToolType::Lasso => Some(Selection::Lasso(LassoSelection {
                points: vec![p0, p1],
            })),
            _ => None,
        }
    }

    fn finalize_selection(&mut self, end: Point) {
        let Some(shape) = self.selection_shape(self.start_pos, end) else {
            return;
        };
        match shape.area(&self.buffer) {
            Ok(area) => {
                crate::log_info!(
                    "Created {} selection ({} pixels)",
                    shape.label(),
                    area.len()
                );
                let outline = self.paint_outline(&shape);
                self.selection = Some(ActiveSelection {
                    shape,
                    area,
                    outline,
                });
            }
            Err(e) => crate::log_warn!("Selection not created: {}", e),
        }
    }

    fn paint_outline(&mut self, shape: &Selection) -> Transaction {
        match shape.border() {
            Ok(border) => Transaction::paint(
                "Selection outline",
                &mut self.buffer,
                &shapes::dashed(&border),
                self.selection_color,
            ),
            Err(_) => Transaction::new("Selection outline"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::clipboard::AppClipboard;

    const RED: Color = Color::new(255, 0, 0);

    fn session(tool: ToolType) -> EditSession {
        let mut s = EditSession::new(20, 20);
        s.set_tool(tool);
        s
    }

    fn drag(s: &mut EditSession, path: &[(i32, i32)]) {
        let (x, y) = path[0];
        s.pointer_down(Point::new(x, y));
        for &(x, y) in &path[1..] {
            s.pointer_move(Point::new(x, y), true);
        }
        let (x, y) = *path.last().unwrap();
        s.pointer_up(Point::new(x, y));
    }

    #[test]
    fn tool_names_round_trip() {
        for &t in ToolType::all() {
            assert_eq!(ToolType::from_name(t.name()), Some(t));
        }
        assert_eq!(ToolType::from_name(" Select_Rect "), Some(ToolType::SelectRectangle));
        assert_eq!(ToolType::from_name("spray"), None);
    }

    #[test]
    fn line_preview_is_replaced_on_each_move() {
        let mut s = session(ToolType::Line);
        s.pointer_down(Point::new(2, 2));
        s.pointer_move(Point::new(10, 2), true);
        assert_eq!(s.buffer().get(10, 2), Color::BLACK);
        s.pointer_move(Point::new(2, 10), true);
        // The first preview is gone.
        assert_eq!(s.buffer().get(10, 2), Color::WHITE);
        assert_eq!(s.buffer().get(6, 2), Color::WHITE);
        assert_eq!(s.buffer().get(2, 10), Color::BLACK);
        assert_eq!(s.history_len(), 0);
        s.pointer_up(Point::new(2, 10));
        assert_eq!(s.history_len(), 1);
        assert!(!s.is_dragging());
    }

    #[test]
    fn moves_without_button_are_ignored() {
        let mut s = session(ToolType::Pencil);
        assert!(!s.pointer_move(Point::new(3, 3), true));
        s.pointer_down(Point::new(1, 1));
        assert!(!s.pointer_move(Point::new(8, 1), false));
        assert_eq!(s.buffer().get(5, 1), Color::WHITE);
        assert_eq!(s.buffer().get(1, 1), Color::BLACK);
    }

    #[test]
    fn pencil_follows_trail() {
        let mut s = session(ToolType::Pencil);
        drag(&mut s, &[(1, 1), (5, 1), (5, 5)]);
        assert_eq!(s.buffer().get(3, 1), Color::BLACK);
        assert_eq!(s.buffer().get(5, 3), Color::BLACK);
        assert_eq!(s.buffer().get(3, 3), Color::WHITE);
        assert_eq!(s.history_len(), 1);
    }

    #[test]
    fn eraser_paints_white_regardless_of_color() {
        let mut s = session(ToolType::Fill);
        s.set_color(RED);
        s.pointer_down(Point::new(0, 0));
        s.pointer_up(Point::new(0, 0));
        s.set_tool(ToolType::Eraser);
        s.set_color(Color::BLACK);
        drag(&mut s, &[(0, 5), (19, 5)]);
        assert_eq!(s.buffer().get(10, 5), Color::WHITE);
        assert_eq!(s.buffer().get(10, 6), RED);
    }

    #[test]
    fn fill_commits_on_pointer_down() {
        let mut s = session(ToolType::Fill);
        s.set_color(RED);
        assert!(s.pointer_down(Point::new(4, 4)));
        assert_eq!(s.history_len(), 1);
        assert!(!s.is_dragging());
        assert_eq!(s.buffer().get(19, 19), RED);
        // Same color again: empty commit, no visible change.
        s.pointer_down(Point::new(0, 0));
        assert_eq!(s.history_len(), 2);
        s.undo();
        assert_eq!(s.buffer().get(19, 19), RED);
        s.undo();
        assert_eq!(s.buffer().get(19, 19), Color::WHITE);
    }

    #[test]
    fn undo_is_edge_triggered() {
        let mut s = session(ToolType::Pencil);
        let mut clip = AppClipboard::new();
        drag(&mut s, &[(1, 1), (2, 1)]);
        drag(&mut s, &[(1, 3), (2, 3)]);
        assert_eq!(s.history_len(), 2);

        assert!(s.key_down(KeyCode::Z, true, &mut clip));
        // Key repeat while held does nothing.
        assert!(!s.key_down(KeyCode::Z, true, &mut clip));
        assert_eq!(s.history_len(), 1);
        s.key_up(KeyCode::Z);
        assert!(s.key_down(KeyCode::Z, true, &mut clip));
        assert_eq!(s.history_len(), 0);
        // Without the modifier there is no action.
        s.key_up(KeyCode::Z);
        assert!(!s.key_down(KeyCode::Z, false, &mut clip));
    }

    #[test]
    fn undo_ignored_mid_drag() {
        let mut s = session(ToolType::Line);
        drag(&mut s, &[(0, 0), (5, 0)]);
        s.pointer_down(Point::new(0, 9));
        s.pointer_move(Point::new(9, 9), true);
        assert!(!s.undo());
        assert_eq!(s.history_len(), 1);
        s.pointer_up(Point::new(9, 9));
        assert_eq!(s.history_len(), 2);
    }

    #[test]
    fn selection_created_on_release_with_outline() {
        let mut s = session(ToolType::SelectRectangle);
        drag(&mut s, &[(2, 2), (12, 12)]);
        assert!(s.has_selection());
        assert_eq!(s.history_len(), 0);
        // Dashed outline starts at the anchor corner.
        assert_eq!(s.buffer().get(2, 2), Color::BLACK);
        assert_eq!(s.buffer().get(7, 7), Color::WHITE);

        // Clicking outside clears the selection and its outline.
        s.pointer_down(Point::new(18, 18));
        assert!(!s.has_selection());
        assert_eq!(s.buffer().get(2, 2), Color::WHITE);
        s.pointer_up(Point::new(18, 18));
    }

    #[test]
    fn click_inside_without_motion_keeps_selection() {
        let mut s = session(ToolType::SelectRectangle);
        drag(&mut s, &[(2, 2), (8, 8)]);
        s.pointer_down(Point::new(5, 5));
        s.pointer_up(Point::new(5, 5));
        assert!(s.has_selection());
        assert_eq!(s.history_len(), 0);
        assert_eq!(s.buffer().get(2, 2), Color::BLACK);
    }

    #[test]
    fn switching_to_paint_tool_clears_selection() {
        let mut s = session(ToolType::SelectCircle);
        drag(&mut s, &[(2, 10), (14, 10)]);
        assert!(matches!(s.selection(), Some(Selection::Circle(_))));
        assert!(s.set_tool(ToolType::Pencil));
        assert!(!s.has_selection());
        assert_eq!(s.buffer(), &PixelBuffer::new(20, 20));
    }

    #[test]
    fn lasso_does_nothing() {
        let mut s = session(ToolType::Lasso);
        assert!(!s.pointer_down(Point::new(3, 3)));
        assert!(!s.pointer_move(Point::new(6, 6), true));
        assert!(!s.pointer_up(Point::new(6, 6)));
        assert!(!s.has_selection());
        assert_eq!(s.history_len(), 0);
    }

    #[test]
    fn lasso_click_clears_existing_selection() {
        let mut s = session(ToolType::SelectRectangle);
        drag(&mut s, &[(2, 2), (12, 12)]);
        assert!(s.has_selection());
        // Staying among the selection tools keeps it.
        assert!(!s.set_tool(ToolType::Lasso));
        assert!(s.has_selection());

        assert!(s.pointer_down(Point::new(5, 5)));
        assert!(!s.has_selection());
        assert!(!s.is_dragging());
        assert_eq!(s.buffer(), &PixelBuffer::new(20, 20));
        assert_eq!(s.history_len(), 0);
    }

    #[test]
    fn lasso_shape_reports_unsupported() {
        let s = session(ToolType::Lasso);
        let shape = s.selection_shape(Point::new(1, 1), Point::new(4, 4));
        let Some(shape @ Selection::Lasso(_)) = shape else {
            panic!("expected a lasso shape");
        };
        assert!(shape.border().is_err());
        assert!(shape.area(s.buffer()).is_err());
    }

    #[test]
    fn undo_description_tracks_last_commit() {
        let mut s = session(ToolType::Line);
        assert_eq!(s.undo_description(), None);
        assert_eq!(s.history_memory(), 0);
        drag(&mut s, &[(0, 0), (5, 0)]);
        s.set_tool(ToolType::Fill);
        s.pointer_down(Point::new(9, 9));
        assert_eq!(s.undo_description(), Some("Fill"));
        assert!(s.history_memory() > 0);
        s.undo();
        assert_eq!(s.undo_description(), Some("Line"));
    }

    #[test]
    fn stroke_width_is_clamped() {
        let mut s = EditSession::new(4, 4);
        s.set_stroke_width(0);
        assert_eq!(s.stroke_width(), 1);
        s.set_stroke_width(1000);
        assert_eq!(s.stroke_width(), MAX_STROKE_WIDTH);
    }

    #[test]
    fn from_settings_applies_defaults() {
        let settings = Settings {
            canvas_width: 30,
            canvas_height: 10,
            stroke_width: 3,
            primary_color: RED,
            selection_color: Color::new(9, 9, 9),
            default_tool: ToolType::DrawRect,
        };
        let s = EditSession::from_settings(&settings);
        assert_eq!((s.buffer().width(), s.buffer().height()), (30, 10));
        assert_eq!(s.tool(), ToolType::DrawRect);
        assert_eq!(s.color(), RED);
        assert_eq!(s.stroke_width(), 3);
    }
}
