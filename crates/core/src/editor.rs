//! Interactive box edit engine.
//!
//! A small state machine over pointer events in image-pixel space (the
//! caller has already removed zoom/pan). A drag holds its evolving box as
//! transient in-memory state; nothing is persisted until pointer release,
//! which yields at most one [`Commit`] for the caller to flush to the
//! store. Intermediate pointer-move frames never produce commits.

use crate::geometry::PixelBox;
use crate::types::DbId;

/// Side length of a resize-handle hit zone, centered on its anchor.
pub const HANDLE_SIZE: f64 = 8.0;

/// Minimum width and height of a committed box, in pixels. A drawn box at
/// or below this size in either dimension is discarded on release; resizes
/// floor each dimension here independently.
pub const MIN_BOX_DIMENSION: f64 = 10.0;

/// A pointer position in image-pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// The eight resize handles: four corners and four edge midpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Nw,
    Ne,
    Sw,
    Se,
    N,
    S,
    E,
    W,
}

impl Handle {
    /// Hit-test order. Corner handles first so they win over the edge
    /// handles they overlap at small box sizes.
    pub const ALL: [Handle; 8] = [
        Handle::Nw,
        Handle::Ne,
        Handle::Sw,
        Handle::Se,
        Handle::N,
        Handle::S,
        Handle::E,
        Handle::W,
    ];

    /// Anchor point of this handle on the given box.
    fn anchor(self, rect: &PixelBox) -> Point {
        let (x, y, w, h) = (rect.x, rect.y, rect.width, rect.height);
        match self {
            Handle::Nw => Point { x, y },
            Handle::Ne => Point { x: x + w, y },
            Handle::Sw => Point { x, y: y + h },
            Handle::Se => Point { x: x + w, y: y + h },
            Handle::N => Point { x: x + w / 2.0, y },
            Handle::S => Point {
                x: x + w / 2.0,
                y: y + h,
            },
            Handle::E => Point {
                x: x + w,
                y: y + h / 2.0,
            },
            Handle::W => Point { x, y: y + h / 2.0 },
        }
    }

    /// Whether a point falls inside this handle's hit zone on `rect`.
    fn hit(self, rect: &PixelBox, p: Point) -> bool {
        let anchor = self.anchor(rect);
        let half = HANDLE_SIZE / 2.0;
        p.x >= anchor.x - half
            && p.x <= anchor.x + half
            && p.y >= anchor.y - half
            && p.y <= anchor.y + half
    }
}

/// A box tracked by the editor, keyed by its annotation id.
#[derive(Debug, Clone)]
pub struct EditorBox {
    pub id: DbId,
    pub rect: PixelBox,
}

/// The single persistence action produced by a completed drag.
#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    /// A newly drawn box; the caller creates an annotation and feeds the
    /// assigned id back via [`BoxEditor::insert_created`].
    Create(PixelBox),
    /// An existing box moved or resized; the caller updates the annotation.
    Update(DbId, PixelBox),
}

#[derive(Debug, Clone)]
enum DragState {
    Idle,
    Drawing {
        origin: Point,
        current: PixelBox,
    },
    Moving {
        press: Point,
        original: PixelBox,
        current: PixelBox,
    },
    Resizing {
        handle: Handle,
        press: Point,
        original: PixelBox,
        current: PixelBox,
    },
}

/// Edit state for one image's boxes.
pub struct BoxEditor {
    image_w: f64,
    image_h: f64,
    boxes: Vec<EditorBox>,
    selected: Option<usize>,
    state: DragState,
}

impl BoxEditor {
    pub fn new(image_w: f64, image_h: f64) -> Self {
        Self::with_boxes(image_w, image_h, Vec::new())
    }

    /// Build an editor over existing boxes, in store listing order.
    pub fn with_boxes(image_w: f64, image_h: f64, boxes: Vec<EditorBox>) -> Self {
        Self {
            image_w,
            image_h,
            boxes,
            selected: None,
            state: DragState::Idle,
        }
    }

    pub fn boxes(&self) -> &[EditorBox] {
        &self.boxes
    }

    pub fn selected_id(&self) -> Option<DbId> {
        self.selected.map(|i| self.boxes[i].id)
    }

    /// The transient box being drawn or edited, if a drag is in progress.
    pub fn active_box(&self) -> Option<PixelBox> {
        match &self.state {
            DragState::Idle => None,
            DragState::Drawing { current, .. }
            | DragState::Moving { current, .. }
            | DragState::Resizing { current, .. } => Some(*current),
        }
    }

    /// Register the store-assigned id of a box committed via
    /// [`Commit::Create`], appending it to the tracked set.
    pub fn insert_created(&mut self, id: DbId, rect: PixelBox) {
        self.boxes.push(EditorBox { id, rect });
    }

    /// Pointer press. Hit-test precedence:
    /// 1. a resize handle of the currently selected box,
    /// 2. the interior of the selected box (move),
    /// 3. the interior of any other box in input order (select only),
    /// 4. empty canvas (start drawing).
    pub fn press(&mut self, p: Point) {
        if let Some(sel) = self.selected {
            let rect = self.boxes[sel].rect;
            if let Some(handle) = Handle::ALL.iter().copied().find(|h| h.hit(&rect, p)) {
                self.state = DragState::Resizing {
                    handle,
                    press: p,
                    original: rect,
                    current: rect,
                };
                return;
            }
            if rect.contains(p.x, p.y) {
                self.state = DragState::Moving {
                    press: p,
                    original: rect,
                    current: rect,
                };
                return;
            }
        }

        if let Some(idx) = self.boxes.iter().position(|b| b.rect.contains(p.x, p.y)) {
            // Select without starting a drag.
            self.selected = Some(idx);
            self.state = DragState::Idle;
            return;
        }

        self.selected = None;
        self.state = DragState::Drawing {
            origin: p,
            current: PixelBox {
                x: p.x,
                y: p.y,
                width: 0.0,
                height: 0.0,
            },
        };
    }

    /// Pointer move with the button held. Rebuilds the transient box from
    /// the press point each frame (press-to-current delta, not
    /// frame-to-frame accumulation); never persists.
    pub fn drag(&mut self, p: Point) {
        let (image_w, image_h) = (self.image_w, self.image_h);
        match &mut self.state {
            DragState::Idle => {}
            DragState::Drawing { origin, current } => {
                *current = PixelBox {
                    x: origin.x.min(p.x),
                    y: origin.y.min(p.y),
                    width: (p.x - origin.x).abs(),
                    height: (p.y - origin.y).abs(),
                };
            }
            DragState::Moving {
                press,
                original,
                current,
            } => {
                let dx = p.x - press.x;
                let dy = p.y - press.y;
                let (x, y) = clamp_origin(
                    original.x + dx,
                    original.y + dy,
                    original.width,
                    original.height,
                    image_w,
                    image_h,
                );
                *current = PixelBox {
                    x,
                    y,
                    width: original.width,
                    height: original.height,
                };
            }
            DragState::Resizing {
                handle,
                press,
                original,
                current,
            } => {
                let dx = p.x - press.x;
                let dy = p.y - press.y;
                *current = resized(*handle, original, dx, dy, image_w, image_h);
            }
        }
    }

    /// Pointer release. Returns the commit for this drag, if any, and
    /// resets to `Idle`.
    pub fn release(&mut self) -> Option<Commit> {
        let state = std::mem::replace(&mut self.state, DragState::Idle);
        match state {
            DragState::Idle => None,
            DragState::Drawing { current, .. } => {
                if current.width > MIN_BOX_DIMENSION && current.height > MIN_BOX_DIMENSION {
                    Some(Commit::Create(current))
                } else {
                    None
                }
            }
            DragState::Moving { current, .. } | DragState::Resizing { current, .. } => {
                let idx = self.selected?;
                self.boxes[idx].rect = current;
                Some(Commit::Update(self.boxes[idx].id, current))
            }
        }
    }
}

/// Clamp an origin so the box stays fully inside `[0, image_w]x[0, image_h]`.
fn clamp_origin(
    x: f64,
    y: f64,
    rect_w: f64,
    rect_h: f64,
    image_w: f64,
    image_h: f64,
) -> (f64, f64) {
    (
        x.min(image_w - rect_w).max(0.0),
        y.min(image_h - rect_h).max(0.0),
    )
}

/// Apply a resize delta for one handle. Each dimension is floored at
/// [`MIN_BOX_DIMENSION`] with the opposite edge held fixed, then the
/// origin is clamped like a move.
fn resized(
    handle: Handle,
    original: &PixelBox,
    dx: f64,
    dy: f64,
    image_w: f64,
    image_h: f64,
) -> PixelBox {
    let mut rect = *original;
    match handle {
        Handle::Nw => {
            rect.width = (original.width - dx).max(MIN_BOX_DIMENSION);
            rect.height = (original.height - dy).max(MIN_BOX_DIMENSION);
            rect.x = original.x + original.width - rect.width;
            rect.y = original.y + original.height - rect.height;
        }
        Handle::Ne => {
            rect.width = (original.width + dx).max(MIN_BOX_DIMENSION);
            rect.height = (original.height - dy).max(MIN_BOX_DIMENSION);
            rect.y = original.y + original.height - rect.height;
        }
        Handle::Sw => {
            rect.width = (original.width - dx).max(MIN_BOX_DIMENSION);
            rect.height = (original.height + dy).max(MIN_BOX_DIMENSION);
            rect.x = original.x + original.width - rect.width;
        }
        Handle::Se => {
            rect.width = (original.width + dx).max(MIN_BOX_DIMENSION);
            rect.height = (original.height + dy).max(MIN_BOX_DIMENSION);
        }
        Handle::N => {
            rect.height = (original.height - dy).max(MIN_BOX_DIMENSION);
            rect.y = original.y + original.height - rect.height;
        }
        Handle::S => {
            rect.height = (original.height + dy).max(MIN_BOX_DIMENSION);
        }
        Handle::E => {
            rect.width = (original.width + dx).max(MIN_BOX_DIMENSION);
        }
        Handle::W => {
            rect.width = (original.width - dx).max(MIN_BOX_DIMENSION);
            rect.x = original.x + original.width - rect.width;
        }
    }

    let (x, y) = clamp_origin(rect.x, rect.y, rect.width, rect.height, image_w, image_h);
    rect.x = x;
    rect.y = y;
    rect
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f64 = 800.0;
    const H: f64 = 600.0;

    fn editor_with(rect: PixelBox) -> BoxEditor {
        BoxEditor::with_boxes(W, H, vec![EditorBox { id: 1, rect }])
    }

    fn select(editor: &mut BoxEditor, rect: &PixelBox) {
        editor.press(Point {
            x: rect.x + rect.width / 2.0,
            y: rect.y + rect.height / 2.0,
        });
        assert_eq!(editor.selected_id(), Some(1));
        assert!(editor.release().is_none(), "selection must not commit");
    }

    // -- draw ---------------------------------------------------------------

    #[test]
    fn draw_commits_box_spanning_press_and_release() {
        let mut editor = BoxEditor::new(W, H);
        editor.press(Point { x: 100.0, y: 100.0 });
        editor.drag(Point { x: 40.0, y: 160.0 });
        match editor.release() {
            Some(Commit::Create(rect)) => {
                assert_eq!(rect.x, 40.0);
                assert_eq!(rect.y, 100.0);
                assert_eq!(rect.width, 60.0);
                assert_eq!(rect.height, 60.0);
            }
            other => panic!("expected Create, got {other:?}"),
        }
    }

    #[test]
    fn draw_below_minimum_is_discarded() {
        let mut editor = BoxEditor::new(W, H);
        editor.press(Point { x: 100.0, y: 100.0 });
        editor.drag(Point { x: 110.0, y: 109.0 });
        assert!(editor.release().is_none());
        assert!(editor.boxes().is_empty());
    }

    #[test]
    fn draw_exactly_minimum_is_discarded() {
        // The filter is strictly greater-than, so a 10x10 box is dropped.
        let mut editor = BoxEditor::new(W, H);
        editor.press(Point { x: 0.0, y: 0.0 });
        editor.drag(Point { x: 10.0, y: 10.0 });
        assert!(editor.release().is_none());
    }

    #[test]
    fn drag_frames_never_commit() {
        let mut editor = BoxEditor::new(W, H);
        editor.press(Point { x: 0.0, y: 0.0 });
        for i in 1..50 {
            editor.drag(Point {
                x: i as f64,
                y: i as f64,
            });
            assert!(editor.active_box().is_some());
        }
        assert!(matches!(editor.release(), Some(Commit::Create(_))));
        assert!(editor.active_box().is_none());
    }

    // -- move ---------------------------------------------------------------

    #[test]
    fn move_applies_press_to_current_delta() {
        let rect = PixelBox {
            x: 100.0,
            y: 100.0,
            width: 50.0,
            height: 40.0,
        };
        let mut editor = editor_with(rect);
        select(&mut editor, &rect);

        editor.press(Point { x: 120.0, y: 120.0 });
        editor.drag(Point { x: 150.0, y: 110.0 });
        match editor.release() {
            Some(Commit::Update(id, moved)) => {
                assert_eq!(id, 1);
                assert_eq!(moved.x, 130.0);
                assert_eq!(moved.y, 90.0);
                assert_eq!(moved.width, 50.0);
                assert_eq!(moved.height, 40.0);
            }
            other => panic!("expected Update, got {other:?}"),
        }
    }

    #[test]
    fn move_clamps_origin_to_image_bounds() {
        let rect = PixelBox {
            x: 100.0,
            y: 100.0,
            width: 50.0,
            height: 40.0,
        };
        let mut editor = editor_with(rect);
        select(&mut editor, &rect);

        // Drag far past the bottom-right corner.
        editor.press(Point { x: 120.0, y: 120.0 });
        editor.drag(Point { x: 5000.0, y: 5000.0 });
        let Some(Commit::Update(_, moved)) = editor.release() else {
            panic!("expected Update");
        };
        assert_eq!(moved.x, W - 50.0);
        assert_eq!(moved.y, H - 40.0);

        // And far past the top-left.
        editor.press(Point { x: moved.x + 10.0, y: moved.y + 10.0 });
        editor.drag(Point { x: -5000.0, y: -5000.0 });
        let Some(Commit::Update(_, moved)) = editor.release() else {
            panic!("expected Update");
        };
        assert_eq!(moved.x, 0.0);
        assert_eq!(moved.y, 0.0);
    }

    // -- resize -------------------------------------------------------------

    #[test]
    fn resize_se_grows_box() {
        let rect = PixelBox {
            x: 100.0,
            y: 100.0,
            width: 50.0,
            height: 40.0,
        };
        let mut editor = editor_with(rect);
        select(&mut editor, &rect);

        // Press on the south-east corner handle.
        editor.press(Point { x: 150.0, y: 140.0 });
        editor.drag(Point { x: 170.0, y: 165.0 });
        let Some(Commit::Update(_, resized)) = editor.release() else {
            panic!("expected Update");
        };
        assert_eq!(resized.x, 100.0);
        assert_eq!(resized.y, 100.0);
        assert_eq!(resized.width, 70.0);
        assert_eq!(resized.height, 65.0);
    }

    #[test]
    fn resize_nw_moves_origin_and_shrinks() {
        let rect = PixelBox {
            x: 100.0,
            y: 100.0,
            width: 50.0,
            height: 40.0,
        };
        let mut editor = editor_with(rect);
        select(&mut editor, &rect);

        editor.press(Point { x: 100.0, y: 100.0 });
        editor.drag(Point { x: 110.0, y: 105.0 });
        let Some(Commit::Update(_, resized)) = editor.release() else {
            panic!("expected Update");
        };
        assert_eq!(resized.width, 40.0);
        assert_eq!(resized.height, 35.0);
        assert_eq!(resized.x, 110.0);
        assert_eq!(resized.y, 105.0);
    }

    #[test]
    fn resize_never_drops_below_minimum_dimension() {
        let rect = PixelBox {
            x: 100.0,
            y: 100.0,
            width: 50.0,
            height: 40.0,
        };
        // Shrink hard from every handle; width/height must floor at 10 and
        // the far edge must stay fixed.
        for (handle_point, far_right, far_bottom) in [
            (Point { x: 100.0, y: 100.0 }, Some(150.0), Some(140.0)), // nw
            (Point { x: 150.0, y: 100.0 }, None, Some(140.0)),        // ne
            (Point { x: 100.0, y: 140.0 }, Some(150.0), None),        // sw
            (Point { x: 150.0, y: 140.0 }, None, None),               // se
        ] {
            let mut editor = editor_with(rect);
            select(&mut editor, &rect);
            editor.press(handle_point);
            editor.drag(Point {
                x: handle_point.x - 10_000.0 * (if far_right.is_some() { -1.0 } else { 1.0 }),
                y: handle_point.y - 10_000.0 * (if far_bottom.is_some() { -1.0 } else { 1.0 }),
            });
            let Some(Commit::Update(_, r)) = editor.release() else {
                panic!("expected Update");
            };
            assert_eq!(r.width, MIN_BOX_DIMENSION);
            assert_eq!(r.height, MIN_BOX_DIMENSION);
            if let Some(right) = far_right {
                assert_eq!(r.x + r.width, right, "far edge moved");
            }
            if let Some(bottom) = far_bottom {
                assert_eq!(r.y + r.height, bottom, "far edge moved");
            }
        }
    }

    #[test]
    fn resize_edge_handles_touch_one_dimension_only() {
        let rect = PixelBox {
            x: 100.0,
            y: 100.0,
            width: 50.0,
            height: 40.0,
        };
        let mut editor = editor_with(rect);
        select(&mut editor, &rect);

        // East edge midpoint: width only.
        editor.press(Point { x: 150.0, y: 120.0 });
        editor.drag(Point { x: 180.0, y: 400.0 });
        let Some(Commit::Update(_, r)) = editor.release() else {
            panic!("expected Update");
        };
        assert_eq!(r.width, 80.0);
        assert_eq!(r.height, 40.0);
        assert_eq!(r.y, 100.0);
    }

    #[test]
    fn resize_clamps_origin_like_move() {
        let rect = PixelBox {
            x: 4.0,
            y: 4.0,
            width: 50.0,
            height: 40.0,
        };
        let mut editor = editor_with(rect);
        select(&mut editor, &rect);

        // Dragging the west handle left would push the origin negative.
        editor.press(Point { x: 4.0, y: 24.0 });
        editor.drag(Point { x: -100.0, y: 24.0 });
        let Some(Commit::Update(_, r)) = editor.release() else {
            panic!("expected Update");
        };
        assert_eq!(r.x, 0.0);
    }

    // -- hit-test precedence ------------------------------------------------

    #[test]
    fn handle_hit_wins_over_interior() {
        let rect = PixelBox {
            x: 100.0,
            y: 100.0,
            width: 50.0,
            height: 40.0,
        };
        let mut editor = editor_with(rect);
        select(&mut editor, &rect);

        // The nw corner is both inside the 8x8 handle zone and on the box
        // boundary; resizing must win.
        editor.press(Point { x: 102.0, y: 102.0 });
        editor.drag(Point { x: 112.0, y: 102.0 });
        let Some(Commit::Update(_, r)) = editor.release() else {
            panic!("expected Update");
        };
        assert_eq!(r.width, 40.0, "nw resize expected, got a move");
    }

    #[test]
    fn press_on_other_box_selects_in_input_order() {
        let a = PixelBox {
            x: 10.0,
            y: 10.0,
            width: 100.0,
            height: 100.0,
        };
        let b = PixelBox {
            x: 50.0,
            y: 50.0,
            width: 100.0,
            height: 100.0,
        };
        let mut editor = BoxEditor::with_boxes(
            W,
            H,
            vec![EditorBox { id: 7, rect: a }, EditorBox { id: 8, rect: b }],
        );

        // Overlap region: first box in input order wins.
        editor.press(Point { x: 60.0, y: 60.0 });
        assert_eq!(editor.selected_id(), Some(7));
        assert!(editor.release().is_none());

        // Point only inside the second box.
        editor.press(Point { x: 140.0, y: 140.0 });
        assert_eq!(editor.selected_id(), Some(8));
        assert!(editor.release().is_none());
    }

    #[test]
    fn press_on_empty_canvas_deselects_and_draws() {
        let rect = PixelBox {
            x: 100.0,
            y: 100.0,
            width: 50.0,
            height: 40.0,
        };
        let mut editor = editor_with(rect);
        select(&mut editor, &rect);

        editor.press(Point { x: 500.0, y: 500.0 });
        assert_eq!(editor.selected_id(), None);
        editor.drag(Point { x: 520.0, y: 520.0 });
        assert!(matches!(editor.release(), Some(Commit::Create(_))));
    }

    #[test]
    fn insert_created_makes_box_selectable() {
        let mut editor = BoxEditor::new(W, H);
        editor.press(Point { x: 10.0, y: 10.0 });
        editor.drag(Point { x: 60.0, y: 60.0 });
        let Some(Commit::Create(rect)) = editor.release() else {
            panic!("expected Create");
        };
        editor.insert_created(42, rect);

        editor.press(Point { x: 30.0, y: 30.0 });
        assert_eq!(editor.selected_id(), Some(42));
    }
}
