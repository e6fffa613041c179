//! Gesture tracking
//!
//! Turns a press / move / release sequence in screen space into a completed
//! [`Gesture`]. A release that did not travel past the drag threshold is a
//! click under every tool. A drag becomes a box or lasso under the area
//! tools and is ignored under the click tool. Releasing outside the canvas
//! abandons the gesture: nothing is resolved and the store is untouched.

use serde::{Deserialize, Serialize};
use spectrascope_core::{error::validation, BoxBounds, Point2, Region, Viewport};
use tracing::trace;

use crate::error::SelectionResult;
use crate::input::{Modifiers, MouseButton, PointerEvent, SelectionModifiers};
use crate::state::ToolMode;

/// Gesture thresholds, in pixels
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Travel beyond which a press becomes a drag
    pub drag_threshold: f64,
    /// Minimum spacing between recorded lasso vertices
    pub lasso_spacing: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 3.0,
            lasso_spacing: 2.0,
        }
    }
}

/// A completed gesture in screen space
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Gesture {
    Click {
        position: Point2,
        modifiers: SelectionModifiers,
    },
    Box {
        bounds: BoxBounds,
        modifiers: SelectionModifiers,
    },
    Lasso {
        path: Vec<Point2>,
        modifiers: SelectionModifiers,
    },
}

impl Gesture {
    pub fn modifiers(&self) -> SelectionModifiers {
        match self {
            Gesture::Click { modifiers, .. }
            | Gesture::Box { modifiers, .. }
            | Gesture::Lasso { modifiers, .. } => *modifiers,
        }
    }

    /// Screen-space region of an area gesture
    pub fn region(&self) -> Option<Region> {
        match self {
            Gesture::Click { .. } => None,
            Gesture::Box { bounds, .. } => Some(Region::Box { bounds: *bounds }),
            Gesture::Lasso { path, .. } => Some(Region::polygon(path.clone())),
        }
    }
}

#[derive(Clone, Debug)]
struct Pending {
    start: Point2,
    last: Point2,
    path: Vec<Point2>,
    dragging: bool,
}

/// Press/move/release state machine for one chart
#[derive(Clone, Debug)]
pub struct GestureTracker {
    config: GestureConfig,
    viewport: Viewport,
    pending: Option<Pending>,
}

impl GestureTracker {
    pub fn new(viewport: Viewport, config: GestureConfig) -> SelectionResult<Self> {
        validation::validate_viewport(&viewport)?;
        Ok(Self {
            config,
            viewport,
            pending: None,
        })
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> SelectionResult<()> {
        validation::validate_viewport(&viewport)?;
        self.viewport = viewport;
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether the current press has turned into a drag
    pub fn is_dragging(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| p.dragging)
    }

    /// Feed one pointer event; returns a gesture when one completes
    pub fn handle(&mut self, event: &PointerEvent, tool: ToolMode) -> Option<Gesture> {
        match event {
            PointerEvent::Press {
                button: MouseButton::Left,
                position,
                ..
            } => {
                self.press(*position);
                None
            }
            PointerEvent::Move { position, .. } => {
                self.move_to(*position);
                None
            }
            PointerEvent::Release {
                button: MouseButton::Left,
                position,
                modifiers,
            } => self.release(*position, *modifiers, tool),
            _ => None,
        }
    }

    pub fn press(&mut self, position: Point2) {
        if !self.viewport.contains(position) {
            return;
        }
        self.pending = Some(Pending {
            start: position,
            last: position,
            path: vec![position],
            dragging: false,
        });
    }

    pub fn move_to(&mut self, position: Point2) {
        let config = self.config;
        let Some(p) = self.pending.as_mut() else {
            return;
        };
        if !p.dragging && p.start.distance_sq(&position) > config.drag_threshold.powi(2) {
            p.dragging = true;
        }
        if p.last.distance_sq(&position) >= config.lasso_spacing.powi(2) {
            p.path.push(position);
            p.last = position;
        }
    }

    pub fn release(
        &mut self,
        position: Point2,
        modifiers: Modifiers,
        tool: ToolMode,
    ) -> Option<Gesture> {
        let mut pending = self.pending.take()?;
        if !self.viewport.contains(position) {
            trace!(x = position.x, y = position.y, "gesture released outside canvas, abandoned");
            return None;
        }

        let modifiers = modifiers.selection();
        let within_threshold =
            pending.start.distance_sq(&position) <= self.config.drag_threshold.powi(2);
        if !pending.dragging && within_threshold {
            return Some(Gesture::Click {
                position: pending.start,
                modifiers,
            });
        }

        match tool {
            ToolMode::Click => None,
            ToolMode::Box => Some(Gesture::Box {
                bounds: BoxBounds::from_corners(pending.start, position),
                modifiers,
            }),
            ToolMode::Lasso => {
                if pending.last != position {
                    pending.path.push(position);
                }
                Some(Gesture::Lasso {
                    path: pending.path,
                    modifiers,
                })
            }
        }
    }

    /// Drop any gesture in progress
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Shape of the drag in progress, for drawing the rubber band
    pub fn preview(&self, tool: ToolMode) -> Option<Region> {
        let p = self.pending.as_ref().filter(|p| p.dragging)?;
        match tool {
            ToolMode::Click => None,
            ToolMode::Box => Some(Region::rect(p.start, p.last)),
            ToolMode::Lasso => Some(Region::polygon(p.path.clone())),
        }
    }
}
