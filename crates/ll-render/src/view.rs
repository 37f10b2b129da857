// SPDX-License-Identifier: MIT
//
// Viewport tree — rectangular regions that own pointer routing.
//
// Each node's coordinates are relative to its parent; events get an
// explicit translated copy as they descend, never a shared mutation.
// Hit-testing is depth-first with the earliest child winning overlaps.
//
// Drag lock: once a drag is delivered to a child, that child keeps
// receiving the gesture while the press origin stays inside its bounds,
// even when the pointer itself wanders out. Any non-drag transition or
// structural change to the tree clears the lock.

use ll_term::input::{MouseEvent, MouseState};

/// One rectangular, single-row region in the UI tree.
#[derive(Debug, Clone)]
pub struct ViewNode {
    /// Column offset in the parent's space.
    pub x: i32,
    /// Row offset in the parent's space.
    pub y: i32,
    /// Column extent; negative means unbounded to the right.
    pub width: i32,
    pub visible: bool,
    pub enabled: bool,
    needs_update: bool,
    children: Vec<ViewNode>,
    /// Index of the child that owns the current drag, if any. Valid only
    /// while the tree is not structurally mutated.
    last_drag_child: Option<usize>,
}

/// Where a routed event ended up: the chain of child indices from the
/// node `handle_mouse` was called on (empty when the node itself is the
/// target), plus the event translated into the target's local space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub path: Vec<usize>,
    pub event: MouseEvent,
}

impl Default for ViewNode {
    fn default() -> Self {
        Self::new(0, 0, -1)
    }
}

impl ViewNode {
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32) -> Self {
        Self {
            x,
            y,
            width,
            visible: true,
            enabled: true,
            needs_update: true,
            children: Vec::new(),
            last_drag_child: None,
        }
    }

    #[must_use]
    pub fn children(&self) -> &[ViewNode] {
        &self.children
    }

    /// Append a child. Structural mutation invalidates any drag lock.
    pub fn add_child(&mut self, child: ViewNode) {
        self.last_drag_child = None;
        self.children.push(child);
    }

    /// Remove all children. Clears the drag lock.
    pub fn clear_children(&mut self) {
        self.last_drag_child = None;
        self.children.clear();
    }

    // ── Redraw flag ────────────────────────────────────────────────────

    /// Mark this node and every descendant as needing a repaint.
    pub fn invalidate(&mut self) {
        self.needs_update = true;
        for child in &mut self.children {
            child.invalidate();
        }
    }

    #[must_use]
    pub const fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Read and clear the redraw flag for this node alone.
    pub fn take_needs_update(&mut self) -> bool {
        std::mem::replace(&mut self.needs_update, false)
    }

    // ── Hit-testing ────────────────────────────────────────────────────

    /// Whether `(x, y)` in the parent's space falls in this node or any
    /// descendant. Hidden and disabled nodes swallow nothing.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        if !self.visible || !self.enabled {
            return false;
        }
        let (lx, ly) = (x - self.x, y - self.y);
        if self.children.iter().any(|c| c.contains(lx, ly)) {
            return true;
        }
        self.hit(x, y)
    }

    /// This node's own extent only: its row, `[x, x+width)` columns,
    /// unbounded to the right when width is negative.
    fn hit(&self, x: i32, y: i32) -> bool {
        if y != self.y || x < self.x {
            return false;
        }
        self.width < 0 || x < self.x + self.width
    }

    /// Whether this node's horizontal bounds contain the event's press
    /// origin on this node's row. The anchor for drag-lock delivery.
    fn holds_press(&self, event: &MouseEvent) -> bool {
        self.visible && self.enabled && self.hit(event.press_x, event.press_y)
    }

    // ── Routing ────────────────────────────────────────────────────────

    /// Route `event` (in this node's local space) to the leaf-most region
    /// that owns it, marking the consumer for repaint. Returns `None` when
    /// the node is hidden or disabled.
    ///
    /// A `Dragged` event prefers the drag-locked child when its press
    /// origin is still in bounds; anything else clears the lock first and
    /// routes by position.
    pub fn handle_mouse(&mut self, event: MouseEvent) -> Option<Delivery> {
        if !self.visible || !self.enabled {
            return None;
        }

        if event.state == MouseState::Dragged {
            if let Some(idx) = self.last_drag_child {
                if self.children[idx].holds_press(&event) {
                    return self.deliver_to(idx, event);
                }
                self.last_drag_child = None;
            }
        } else {
            self.last_drag_child = None;
        }

        let target = self
            .children
            .iter()
            .position(|c| c.contains(event.x, event.y));
        match target {
            Some(idx) => {
                if event.state == MouseState::Dragged {
                    self.last_drag_child = Some(idx);
                }
                self.deliver_to(idx, event)
            }
            None => {
                self.needs_update = true;
                Some(Delivery {
                    path: Vec::new(),
                    event,
                })
            }
        }
    }

    fn deliver_to(&mut self, idx: usize, event: MouseEvent) -> Option<Delivery> {
        let child = &mut self.children[idx];
        let local = event.translated(-child.x, -child.y);
        let mut delivery = child.handle_mouse(local)?;
        delivery.path.insert(0, idx);
        Some(delivery)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
