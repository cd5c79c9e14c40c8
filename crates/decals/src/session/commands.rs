//! Dispatch of UI commands

use tracing::debug;

use atelier_ipc::{error_codes, AppearanceCommand, DecalCommand, UiToCore};

use crate::host::Collaborators;
use crate::types::ImageSource;

use super::SceneEditingSession;

impl<H: Collaborators> SceneEditingSession<H> {
    /// Route a message from the UI bridge
    pub fn handle_message(&mut self, message: UiToCore) {
        match message {
            UiToCore::Decal(command) => self.handle_command(command),
            UiToCore::Appearance(command) => self.handle_appearance(command),
        }
    }

    /// Apply one of the sticker commands. Failures become `Error` notifications.
    pub fn handle_command(&mut self, command: DecalCommand) {
        debug!("Decal command: {:?}", command);
        let result = match command {
            DecalCommand::PlaceWithImage { url, name } => {
                self.request_placement(ImageSource::new(url, name));
                Ok(())
            }
            DecalCommand::SetMode(mode) => {
                self.set_mode(mode);
                Ok(())
            }
            DecalCommand::SetRotation { id, degrees } => self.update_rotation(id, degrees.value()),
            DecalCommand::SetScale { id, factor } => self.update_scale(id, factor.value()),
            DecalCommand::Remove { id } => self.remove(id),
        };
        if let Err(err) = result {
            self.report(&err);
        }
    }

    pub fn handle_appearance(&mut self, command: AppearanceCommand) {
        match command {
            AppearanceCommand::SetBaseColor { color } => {
                if let Err(err) = self.set_model_color(&color) {
                    self.notify_error(error_codes::INVALID_COLOR, err.to_string());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use atelier_ipc::{CoreToUi, LooseNumber, TransformMode};

    use super::*;
    use crate::session::ControllerState;
    use crate::test_support::{flat_session, place_decal};
    use crate::types::DecalId;

    #[test]
    fn test_place_command_arms_placement() {
        let mut session = flat_session();
        session.handle_command(DecalCommand::PlaceWithImage {
            url: "blob:logo".to_string(),
            name: "logo.png".to_string(),
        });
        assert_eq!(
            session.state(),
            &ControllerState::Placing(ImageSource::new("blob:logo", "logo.png"))
        );
    }

    #[test]
    fn test_loose_numeric_commands() {
        let (mut session, id) = place_decal(Vec3::ZERO);
        session.handle_command(DecalCommand::SetRotation {
            id,
            degrees: LooseNumber::from("45"),
        });
        assert_eq!(session.decal(id).unwrap().rotation_degrees(), 45.0);

        session.handle_command(DecalCommand::SetRotation {
            id,
            degrees: LooseNumber::from("abc"),
        });
        assert_eq!(session.decal(id).unwrap().rotation_degrees(), 0.0);

        session.handle_command(DecalCommand::SetScale {
            id,
            factor: LooseNumber::Number(1.5),
        });
        assert_eq!(session.decal(id).unwrap().scale(), 1.5);

        session.handle_command(DecalCommand::SetScale {
            id,
            factor: LooseNumber::Missing,
        });
        assert_eq!(session.decal(id).unwrap().scale(), 1.0);
    }

    #[test]
    fn test_set_mode_command() {
        let (mut session, _) = place_decal(Vec3::ZERO);
        session.handle_command(DecalCommand::SetMode(TransformMode::Scale));
        assert_eq!(session.mode(), Some(TransformMode::Scale));
    }

    #[test]
    fn test_remove_unknown_reports_error() {
        let mut session = flat_session();
        session.handle_command(DecalCommand::Remove { id: DecalId(7) });
        let notes = session.take_notifications();
        assert!(matches!(
            &notes[..],
            [CoreToUi::Error { code, .. }] if code == error_codes::UNKNOWN_DECAL
        ));
    }

    #[test]
    fn test_recolor_message() {
        let mut session = flat_session();
        let message = UiToCore::from_json(
            r##"{"type":"Appearance","data":{"SetBaseColor":{"color":"#00f"}}}"##,
        )
        .unwrap();
        session.handle_message(message);
        assert_eq!(session.model_color(), [0.0, 0.0, 1.0, 1.0]);

        session.handle_appearance(AppearanceCommand::SetBaseColor {
            color: "blue".to_string(),
        });
        let notes = session.take_notifications();
        assert!(matches!(
            &notes[..],
            [CoreToUi::Error { code, .. }] if code == error_codes::INVALID_COLOR
        ));
    }
}
