use serde::{Deserialize, Serialize};

use crate::models::{merge, Singleton};
use crate::store::Document;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Pt,
    En,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccentColor {
    #[default]
    Pink,
    Purple,
    Blue,
    Green,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub bio: String,
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Notifications {
    pub email: bool,
    pub push: bool,
    pub reminders: bool,
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            email: true,
            push: false,
            reminders: true,
        }
    }
}

/// User preferences. Theme, language and accent color live here so they are
/// persisted with the rest of the document instead of per browser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub profile: Profile,
    pub notifications: Notifications,
    pub theme: Theme,
    pub language: Language,
    pub accent_color: AccentColor,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NotificationsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminders: Option<bool>,
}

/// Nested objects merge field by field, one level deeper than the top-level
/// keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfilePatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<NotificationsPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<AccentColor>,
}

impl Singleton for Settings {
    const KEY: &'static str = "settings";

    type Patch = SettingsPatch;

    fn apply(&mut self, patch: SettingsPatch) {
        if let Some(p) = patch.profile {
            merge(&mut self.profile.name, p.name);
            merge(&mut self.profile.email, p.email);
            merge(&mut self.profile.bio, p.bio);
            merge(&mut self.profile.avatar_url, p.avatar_url);
        }
        if let Some(n) = patch.notifications {
            merge(&mut self.notifications.email, n.email);
            merge(&mut self.notifications.push, n.push);
            merge(&mut self.notifications.reminders, n.reminders);
        }
        merge(&mut self.theme, patch.theme);
        merge(&mut self.language, patch.language);
        merge(&mut self.accent_color, patch.accent_color);
    }

    fn get(doc: &Document) -> &Self {
        &doc.settings
    }

    fn get_mut(doc: &mut Document) -> &mut Self {
        &mut doc.settings
    }
}
