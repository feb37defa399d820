use std::time::{Duration, Instant};

/// Net drag distance needed to commit a column change
pub const SWIPE_THRESHOLD: f32 = 60.0;
/// How long a commit or snap-back animation holds
pub const SETTLE_DURATION: Duration = Duration::from_millis(200);
/// Damping applied when dragging past the first or last column
pub const RUBBER_BAND: f32 = 0.35;
/// Horizontal pixels one terminal cell stands for
pub const CELL_PX: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipePhase {
    Idle,
    Dragging {
        start_x: f32,
        current_x: f32,
    },
    Animating {
        until: Instant,
        /// Column to land on when the animation ends; None snaps back
        target: Option<usize>,
    },
}

/// Single-column navigation for the narrow board layout.
///
/// Coordinates are in pixels. A positive delta (pointer moved left to right)
/// asks for the previous column.
#[derive(Debug, Clone)]
pub struct SwipeController {
    index: usize,
    column_count: usize,
    phase: SwipePhase,
    offset: f32,
    width: f32,
}

impl SwipeController {
    pub fn new(column_count: usize) -> Self {
        SwipeController {
            index: 0,
            column_count: column_count.max(1),
            phase: SwipePhase::Idle,
            offset: 0.0,
            width: 80.0 * CELL_PX,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn phase(&self) -> SwipePhase {
        self.phase
    }

    /// Current horizontal displacement of the column, in pixels
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, SwipePhase::Animating { .. })
    }

    /// Viewport width used for the off-screen commit animation
    pub fn set_width(&mut self, width: f32) {
        self.width = width.max(1.0);
    }

    /// Update the number of columns, clamping the index into range.
    pub fn set_column_count(&mut self, count: usize) {
        self.column_count = count.max(1);
        if self.index >= self.column_count {
            self.index = self.column_count - 1;
        }
        if let SwipePhase::Animating {
            target: Some(t), ..
        } = &mut self.phase
            && *t >= self.column_count
        {
            *t = self.column_count - 1;
        }
    }

    /// Jump straight to `index` without animating. Ignored mid-gesture.
    pub fn jump_to(&mut self, index: usize) {
        if self.phase == SwipePhase::Idle {
            self.index = index.min(self.column_count - 1);
        }
    }

    fn last(&self) -> usize {
        self.column_count - 1
    }

    pub fn touch_start(&mut self, x: f32) {
        if self.phase != SwipePhase::Idle {
            return;
        }
        self.phase = SwipePhase::Dragging {
            start_x: x,
            current_x: x,
        };
        self.offset = 0.0;
    }

    pub fn touch_move(&mut self, x: f32) {
        let SwipePhase::Dragging { start_x, .. } = self.phase else {
            return;
        };
        self.phase = SwipePhase::Dragging {
            start_x,
            current_x: x,
        };
        let delta = x - start_x;
        let at_edge = (delta > 0.0 && self.index == 0) || (delta < 0.0 && self.index == self.last());
        self.offset = if at_edge { delta * RUBBER_BAND } else { delta };
    }

    pub fn touch_end(&mut self, now: Instant) {
        let SwipePhase::Dragging { start_x, current_x } = self.phase else {
            return;
        };
        let delta = current_x - start_x;
        let target = if delta.abs() > SWIPE_THRESHOLD {
            if delta > 0.0 {
                self.index.checked_sub(1)
            } else if self.index < self.last() {
                Some(self.index + 1)
            } else {
                None
            }
        } else {
            None
        };
        self.offset = match target {
            Some(_) if delta > 0.0 => self.width,
            Some(_) => -self.width,
            None => 0.0,
        };
        self.phase = SwipePhase::Animating {
            until: now + SETTLE_DURATION,
            target,
        };
    }

    /// Drop a drag in progress without changing columns. Used when the
    /// release will never reach `touch_end`.
    pub fn cancel(&mut self) {
        if let SwipePhase::Dragging { .. } = self.phase {
            self.phase = SwipePhase::Idle;
            self.offset = 0.0;
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, SwipePhase::Dragging { .. })
    }

    /// Animate to the previous column. No-op while animating or at the start.
    pub fn prev(&mut self, now: Instant) -> bool {
        if self.phase != SwipePhase::Idle || self.index == 0 {
            return false;
        }
        self.offset = self.width;
        self.phase = SwipePhase::Animating {
            until: now + SETTLE_DURATION,
            target: Some(self.index - 1),
        };
        true
    }

    /// Animate to the next column. No-op while animating or at the end.
    pub fn next(&mut self, now: Instant) -> bool {
        if self.phase != SwipePhase::Idle || self.index >= self.last() {
            return false;
        }
        self.offset = -self.width;
        self.phase = SwipePhase::Animating {
            until: now + SETTLE_DURATION,
            target: Some(self.index + 1),
        };
        true
    }

    /// Finish an animation whose settle time has passed. Returns true when
    /// the machine went back to idle.
    pub fn tick(&mut self, now: Instant) -> bool {
        let SwipePhase::Animating { until, target } = self.phase else {
            return false;
        };
        if now < until {
            return false;
        }
        if let Some(t) = target {
            self.index = t.min(self.last());
        }
        self.offset = 0.0;
        self.phase = SwipePhase::Idle;
        true
    }
}
