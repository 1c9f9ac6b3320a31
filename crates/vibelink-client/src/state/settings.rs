use vibelink_shared::models::{FontSize, MessagePolicy, ProfileVisibility, Settings, Theme};

/// Where the held settings came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SettingsSource {
    #[default]
    Defaults,
    Server,
    LocalSnapshot,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsState {
    pub settings: Settings,
    pub source: SettingsSource,
    /// Local edits not yet saved.
    pub dirty: bool,
    pub is_loading: bool,
    pub is_saving: bool,
    pub error: Option<String>,
}

/// A single typed field change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsEdit {
    LikesNotifications(bool),
    SharesNotifications(bool),
    MessagesNotifications(bool),
    ProfileVisibility(ProfileVisibility),
    ShowLocation(bool),
    AllowMessages(MessagePolicy),
    LocationRadius(u32),
    AgeRange { min: u32, max: u32 },
    ShowDistance(bool),
    Theme(Theme),
    FontSize(FontSize),
}

impl SettingsEdit {
    pub fn apply(self, s: &mut Settings) {
        match self {
            SettingsEdit::LikesNotifications(v) => s.notifications.likes = v,
            SettingsEdit::SharesNotifications(v) => s.notifications.shares = v,
            SettingsEdit::MessagesNotifications(v) => s.notifications.messages = v,
            SettingsEdit::ProfileVisibility(v) => s.privacy.profile_visibility = v,
            SettingsEdit::ShowLocation(v) => s.privacy.show_location = v,
            SettingsEdit::AllowMessages(v) => s.privacy.allow_messages = v,
            SettingsEdit::LocationRadius(v) => s.matchmaking.location_radius = v,
            SettingsEdit::AgeRange { min, max } => {
                s.matchmaking.age_range.min = min.min(max);
                s.matchmaking.age_range.max = min.max(max);
            }
            SettingsEdit::ShowDistance(v) => s.matchmaking.show_distance = v,
            SettingsEdit::Theme(v) => s.appearance.theme = v,
            SettingsEdit::FontSize(v) => s.appearance.font_size = v,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsAction {
    Pending,
    Loaded {
        settings: Settings,
        source: SettingsSource,
    },
    Edit(SettingsEdit),
    SavePending,
    Saved(Settings),
    Failed(String),
}

pub fn reduce(state: &mut SettingsState, action: SettingsAction) {
    match action {
        SettingsAction::Pending => {
            state.is_loading = true;
            state.error = None;
        }
        SettingsAction::Loaded { settings, source } => {
            state.is_loading = false;
            state.settings = settings;
            state.source = source;
            state.dirty = false;
        }
        SettingsAction::Edit(edit) => {
            edit.apply(&mut state.settings);
            state.dirty = true;
        }
        SettingsAction::SavePending => {
            state.is_saving = true;
            state.error = None;
        }
        SettingsAction::Saved(settings) => {
            state.is_saving = false;
            state.settings = settings;
            state.source = SettingsSource::Server;
            state.dirty = false;
        }
        SettingsAction::Failed(message) => {
            state.is_loading = false;
            state.is_saving = false;
            state.error = Some(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_mark_dirty_until_saved() {
        let mut s = SettingsState::default();
        reduce(&mut s, SettingsAction::Edit(SettingsEdit::Theme(Theme::Dark)));
        reduce(&mut s, SettingsAction::Edit(SettingsEdit::LocationRadius(80)));
        assert!(s.dirty);
        assert_eq!(s.settings.matchmaking.location_radius, 80);

        let saved = s.settings.clone();
        reduce(&mut s, SettingsAction::Saved(saved));
        assert!(!s.dirty);
        assert_eq!(s.source, SettingsSource::Server);
    }

    #[test]
    fn inverted_age_range_is_normalised() {
        let mut settings = Settings::default();
        SettingsEdit::AgeRange { min: 40, max: 25 }.apply(&mut settings);
        assert_eq!(settings.matchmaking.age_range.min, 25);
        assert_eq!(settings.matchmaking.age_range.max, 40);
    }
}
