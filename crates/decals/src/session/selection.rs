//! Selection, outline, and manipulator binding

use tracing::{debug, info, warn};

use atelier_ipc::CoreToUi;

use crate::error::DecalError;
use crate::host::Collaborators;
use crate::types::{DecalId, TransformMode};

use super::{ControllerState, SceneEditingSession};

impl<H: Collaborators> SceneEditingSession<H> {
    /// Select a decal: outline it and bind the manipulator to its proxy.
    ///
    /// Any previous selection is torn down first. The manipulator always
    /// starts in translate mode. Selecting the already-selected decal is a
    /// no-op. If the proxy or outline cannot be created nothing is selected.
    pub fn select(&mut self, id: DecalId) -> Result<(), DecalError> {
        let index = self.index_of(id)?;
        if self.selected() == Some(id) {
            return Ok(());
        }

        let previous = self.release_selection();

        let bound = self.ensure_proxy(index).and_then(|proxy| {
            self.sync_proxy(index);
            self.refresh_outline(index).map(|()| proxy)
        });
        let proxy = match bound {
            Ok(proxy) => proxy,
            Err(err) => {
                if previous.is_some() {
                    self.notify(CoreToUi::SelectionChanged { decal: None });
                }
                return Err(err.into());
            }
        };

        self.host.attach(proxy);
        self.host.set_mode(TransformMode::Translate);
        let was_placing = self.is_placing();
        self.state = ControllerState::Selected {
            decal: id,
            mode: TransformMode::Translate,
        };
        if was_placing {
            self.sync_orbit();
        }

        info!("Selected decal {}", id);
        let info = self.decals[index].info();
        self.notify(CoreToUi::SelectionChanged { decal: Some(info) });
        Ok(())
    }

    /// Clear the selection, if any, and tell the UI.
    pub fn deselect(&mut self) {
        if self.release_selection().is_some() {
            self.notify(CoreToUi::SelectionChanged { decal: None });
        }
    }

    /// Change the manipulator mode of the selected decal.
    ///
    /// Ignored when nothing is selected; never changes which decal is selected.
    pub fn set_mode(&mut self, mode: TransformMode) {
        let ControllerState::Selected { decal, mode: current } = &mut self.state else {
            debug!("Ignoring mode {} with no selection", mode);
            return;
        };
        if *current == mode {
            return;
        }
        *current = mode;
        debug!("Decal {} manipulator mode: {}", decal, mode);
        self.host.set_mode(mode);
    }

    /// Current manipulator mode, if a decal is selected
    pub fn mode(&self) -> Option<TransformMode> {
        match self.state {
            ControllerState::Selected { mode, .. } => Some(mode),
            _ => None,
        }
    }

    /// Drop outline and manipulator binding of the current selection without
    /// notifying. Returns the decal that was selected.
    fn release_selection(&mut self) -> Option<DecalId> {
        let ControllerState::Selected { decal, .. } = self.state else {
            return None;
        };
        self.state = ControllerState::Idle;
        self.host.detach();

        match self.index_of(decal) {
            Ok(index) => self.release_outline(index),
            Err(_) => warn!("Selected decal {} no longer exists", decal),
        }
        Some(decal)
    }
}
