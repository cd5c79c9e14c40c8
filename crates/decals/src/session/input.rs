//! Pointer, keyboard, and manipulator events

use glam::{Vec2, Vec3};
use tracing::{debug, warn};

use atelier_config::ClickConfig;
use atelier_ipc::{KeyAction, PointerButton, PointerInput};

use crate::host::Collaborators;
use crate::raycast::{cast_ray, Camera, Viewport};
use crate::validation::is_finite_vec3;

use super::SceneEditingSession;

/// Remembers the last primary press so a release can be classified.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerTracker {
    down: Option<PointerInput>,
}

impl PointerTracker {
    pub fn press(&mut self, input: PointerInput) {
        self.down = Some(input);
    }

    /// Consume the press and report whether press + release form a click.
    ///
    /// A click is shorter than the duration limit and travels less than the
    /// distance limit. Both limits are exclusive.
    pub fn release(&mut self, input: &PointerInput, limits: &ClickConfig) -> bool {
        let Some(down) = self.down.take() else {
            return false;
        };
        if down.button != input.button {
            return false;
        }
        let held_ms = input.timestamp_ms.saturating_sub(down.timestamp_ms);
        let travel = Vec2::new(input.x - down.x, input.y - down.y).length();
        held_ms < limits.max_duration_ms && travel < limits.max_distance_px
    }
}

impl<H: Collaborators> SceneEditingSession<H> {
    pub fn on_pointer_down(&mut self, input: PointerInput) {
        if input.button != PointerButton::Primary {
            return;
        }
        self.pointer.press(input);
    }

    /// Pointer release; a click places (when armed) or selects.
    pub fn on_pointer_up(&mut self, input: PointerInput, viewport: &Viewport, camera: &Camera) {
        if input.button != PointerButton::Primary {
            return;
        }
        if !self.pointer.release(&input, &self.config.click) {
            return;
        }
        self.on_click(Vec2::new(input.x, input.y), viewport, camera);
    }

    /// A confirmed click at `screen` (viewport pixels).
    pub fn on_click(&mut self, screen: Vec2, viewport: &Viewport, camera: &Camera) {
        if self.is_placing() {
            let hit = cast_ray(
                screen,
                viewport,
                camera,
                &self.model_candidates(),
                self.fallback_normal,
            );
            match hit {
                Some(hit) => self.begin_load(hit),
                None => debug!("Placement click missed the model"),
            }
            return;
        }

        let hit = cast_ray(
            screen,
            viewport,
            camera,
            &self.decal_candidates(),
            self.fallback_normal,
        );
        match hit {
            Some(hit) => {
                if let Err(err) = self.select(hit.target) {
                    self.report(&err);
                }
            }
            None => self.deselect(),
        }
    }

    /// Keyboard shortcut. Mode keys and delete act on the selection; escape
    /// cancels placement.
    pub fn on_key(&mut self, key: &str) {
        let Some(action) = KeyAction::from_key(key) else {
            return;
        };
        match (action, self.selected()) {
            (KeyAction::Mode(mode), Some(_)) => self.set_mode(mode),
            (KeyAction::RemoveSelected, Some(id)) => {
                if let Err(err) = self.remove(id) {
                    self.report(&err);
                }
            }
            (KeyAction::CancelPlacement, _) => self.cancel_placement(),
            _ => {}
        }
    }

    /// The manipulator moved the selected decal's proxy to `translation`.
    ///
    /// Non-finite positions are dropped without touching the decal.
    pub fn on_manipulator_change(&mut self, translation: Vec3) {
        let Some(id) = self.selected() else {
            return;
        };
        if !is_finite_vec3(translation) {
            warn!("Dropping non-finite drag position {:?} for decal {}", translation, id);
            return;
        }
        let Ok(index) = self.index_of(id) else {
            return;
        };
        self.decals[index].anchor_position = translation;
        if let Err(err) = self.recompute(id) {
            self.report(&err);
        }
    }

    /// Manipulator drag started or ended; orbit is suspended while dragging.
    pub fn on_manipulator_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
        self.sync_orbit();
    }
}
