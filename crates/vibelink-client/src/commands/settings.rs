use vibelink_shared::error::ApiError;
use vibelink_shared::models::Settings;

use crate::api;
use crate::state::settings::{SettingsEdit, SettingsSource};
use crate::state::{Action, SettingsAction};
use crate::Client;

fn settings_failed(message: String) -> Action {
    Action::Settings(SettingsAction::Failed(message))
}

impl Client {
    /// Server settings first; on failure the last local snapshot. Errors
    /// only when neither is available.
    pub async fn load_settings(&self) -> Result<SettingsSource, ApiError> {
        self.store
            .dispatch(Action::Settings(SettingsAction::Pending));

        let error = match api::settings::fetch(&self.session).await {
            Ok(settings) => {
                self.snapshot_settings(&settings);
                self.store.dispatch(Action::Settings(SettingsAction::Loaded {
                    settings,
                    source: SettingsSource::Server,
                }));
                return Ok(SettingsSource::Server);
            }
            Err(e) if e.is_session_fatal() => return Err(self.fail(e, settings_failed)),
            Err(e) => e,
        };

        match self.local.load_settings() {
            Ok(Some(settings)) => {
                tracing::warn!(error = %error, "settings fetch failed, using local snapshot");
                self.store.dispatch(Action::Settings(SettingsAction::Loaded {
                    settings,
                    source: SettingsSource::LocalSnapshot,
                }));
                Ok(SettingsSource::LocalSnapshot)
            }
            Ok(None) => Err(self.fail(error, settings_failed)),
            Err(store_error) => {
                tracing::warn!(error = %store_error, "could not read settings snapshot");
                Err(self.fail(error, settings_failed))
            }
        }
    }

    pub fn edit_settings(&self, edit: SettingsEdit) {
        self.store
            .dispatch(Action::Settings(SettingsAction::Edit(edit)));
    }

    /// PATCH the held settings, then keep a local snapshot of the result.
    pub async fn save_settings(&self) -> Result<Settings, ApiError> {
        let settings = self.store.read(|s| s.settings.settings.clone());
        self.store
            .dispatch(Action::Settings(SettingsAction::SavePending));
        let saved = api::settings::update(&self.session, &settings)
            .await
            .map_err(|e| self.fail(e, settings_failed))?;
        self.snapshot_settings(&saved);
        tracing::info!("settings saved");
        self.store
            .dispatch(Action::Settings(SettingsAction::Saved(saved.clone())));
        Ok(saved)
    }

    fn snapshot_settings(&self, settings: &Settings) {
        if let Err(e) = self.local.save_settings(settings) {
            tracing::warn!(error = %e, "could not snapshot settings");
        }
    }
}
