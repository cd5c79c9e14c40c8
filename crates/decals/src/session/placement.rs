//! Placement mode and asynchronous image loads

use tracing::{debug, info};

use atelier_ipc::CoreToUi;

use crate::error::{DecalError, TextureError};
use crate::host::Collaborators;
use crate::texture::TextureData;
use crate::types::{ImageSource, LoadTicket};

use super::{ControllerState, ModelHit, SceneEditingSession};

/// A placement waiting for its image.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPlacement {
    pub ticket: LoadTicket,
    pub hit: ModelHit,
    pub image: ImageSource,
}

impl<H: Collaborators> SceneEditingSession<H> {
    /// Arm placement: the next surface click places `image`.
    ///
    /// Releases any selection, suspends orbit, and supersedes an image load
    /// that is still in flight.
    pub fn request_placement(&mut self, image: ImageSource) {
        self.deselect();
        if let Some(stale) = self.pending.take() {
            debug!(
                "Placement of {} superseded before its image loaded",
                stale.image.name
            );
        }
        info!("Placing {}", image.name);
        self.state = ControllerState::Placing(image);
        self.sync_orbit();
    }

    /// Leave placement mode without placing anything.
    pub fn cancel_placement(&mut self) {
        if !self.is_placing() {
            return;
        }
        debug!("Placement cancelled");
        self.state = ControllerState::Idle;
        self.sync_orbit();
    }

    /// The load waiting for completion, if any
    pub fn pending_placement(&self) -> Option<&PendingPlacement> {
        self.pending.as_ref()
    }

    /// Surface struck while placing: request the image and leave placement mode.
    pub(crate) fn begin_load(&mut self, hit: ModelHit) {
        let ControllerState::Placing(image) = &self.state else {
            return;
        };
        let image = image.clone();
        self.state = ControllerState::Idle;
        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;

        debug!("Requesting {} for placement at {:?}", image.url, hit.point);
        self.host.request_image(ticket, &image);
        self.pending = Some(PendingPlacement { ticket, hit, image });
        self.sync_orbit();
    }

    /// Completion of an image load started by a placement click.
    ///
    /// Completions for anything but the outstanding ticket are dropped. On
    /// success the decal is created and selected; on failure the UI gets an
    /// error and nothing is allocated.
    pub fn on_image_loaded(&mut self, ticket: LoadTicket, result: Result<TextureData, TextureError>) {
        let Some(pending) = self.pending.take_if(|p| p.ticket == ticket) else {
            debug!("Discarding stale image load {:?}", ticket);
            return;
        };

        let texture = match result {
            Ok(texture) => texture,
            Err(err) => {
                debug!("Image for {} did not load", pending.image.name);
                self.report(&DecalError::from(err));
                return;
            }
        };

        match self.create_decal(&pending.hit, pending.image, &texture) {
            Ok(id) => {
                if let Ok(index) = self.index_of(id) {
                    let info = self.decals[index].info();
                    self.notify(CoreToUi::DecalCreated(info));
                }
                if let Err(err) = self.select(id) {
                    self.report(&err);
                }
            }
            Err(err) => self.report(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use atelier_ipc::error_codes;

    use super::*;
    use crate::test_support::{click, flat_session, screen_point, test_texture, HostCall};
    use crate::types::DecalId;

    #[test]
    fn test_request_placement_disables_orbit() {
        let mut session = flat_session();
        session.request_placement(ImageSource::new("blob:a", "a.png"));
        assert!(session.is_placing());
        assert_eq!(session.host().orbit_enabled, Some(false));

        session.cancel_placement();
        assert_eq!(session.state(), &ControllerState::Idle);
        assert_eq!(session.host().orbit_enabled, Some(true));
    }

    #[test]
    fn test_click_requests_image_and_completion_places() {
        let mut session = flat_session();
        session.request_placement(ImageSource::new("blob:a", "a.png"));
        click(&mut session, screen_point(Vec3::new(0.1, 0.0, 0.05)));

        assert_eq!(session.state(), &ControllerState::Idle);
        let pending = session.pending_placement().cloned().unwrap();
        assert!(session
            .host()
            .calls
            .contains(&HostCall::RequestImage(pending.ticket, "blob:a".to_string())));
        assert_eq!(session.decal_count(), 0);

        session.on_image_loaded(pending.ticket, Ok(test_texture()));
        assert_eq!(session.decal_count(), 1);
        let id = session.decals().next().unwrap().id();
        assert_eq!(session.selected(), Some(id));

        let notes = session.take_notifications();
        assert!(matches!(&notes[0], CoreToUi::DecalCreated(info) if info.name == "a.png"));
        assert!(matches!(&notes[1], CoreToUi::SelectionChanged { decal: Some(info) } if info.id == id));
    }

    #[test]
    fn test_miss_keeps_placement_armed() {
        let mut session = flat_session();
        session.request_placement(ImageSource::new("blob:a", "a.png"));
        // Top-left corner of the viewport looks past the plane
        click(&mut session, Vec2::new(0.0, 0.0));
        assert!(session.is_placing());
        assert!(session.pending_placement().is_none());
    }

    #[test]
    fn test_superseded_load_is_discarded() {
        let mut session = flat_session();
        session.request_placement(ImageSource::new("blob:p1", "p1.png"));
        click(&mut session, screen_point(Vec3::new(0.1, 0.0, 0.05)));
        let p1 = session.pending_placement().unwrap().ticket;

        session.request_placement(ImageSource::new("blob:p2", "p2.png"));
        click(&mut session, screen_point(Vec3::new(0.6, 0.0, 0.7)));
        let p2 = session.pending_placement().unwrap().ticket;
        assert_ne!(p1, p2);

        session.on_image_loaded(p1, Ok(test_texture()));
        assert_eq!(session.decal_count(), 0);

        session.on_image_loaded(p2, Ok(test_texture()));
        assert_eq!(session.decal_count(), 1);
        let decal = session.decals().next().unwrap();
        assert_eq!(decal.image().name, "p2.png");
        assert!((decal.anchor_position() - Vec3::new(0.6, 0.0, 0.7)).length() < 1e-3);
    }

    #[test]
    fn test_load_failure_reports_error() {
        let mut session = flat_session();
        session.request_placement(ImageSource::new("blob:bad", "bad.png"));
        click(&mut session, screen_point(Vec3::new(0.1, 0.0, 0.05)));
        let ticket = session.pending_placement().unwrap().ticket;

        session.on_image_loaded(ticket, Err(TextureError::Unavailable("404".to_string())));
        assert_eq!(session.decal_count(), 0);
        assert_eq!(session.host().live_count(), 0);
        assert_eq!(session.state(), &ControllerState::Idle);
        let notes = session.take_notifications();
        assert!(matches!(
            &notes[..],
            [CoreToUi::Error { code, .. }] if code == error_codes::IMAGE_LOAD_FAILED
        ));
    }

    #[test]
    fn test_placing_releases_selection() {
        let mut session = flat_session();
        session.request_placement(ImageSource::new("blob:a", "a.png"));
        click(&mut session, screen_point(Vec3::new(0.1, 0.0, 0.05)));
        let ticket = session.pending_placement().unwrap().ticket;
        session.on_image_loaded(ticket, Ok(test_texture()));
        assert_eq!(session.selected(), Some(DecalId(1)));
        let _ = session.take_notifications();

        session.request_placement(ImageSource::new("blob:b", "b.png"));
        assert!(session.is_placing());
        assert_eq!(session.host().manipulator_target, None);
        assert_eq!(
            session.take_notifications(),
            vec![CoreToUi::SelectionChanged { decal: None }]
        );
    }
}
