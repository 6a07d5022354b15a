use serde::{Deserialize, Serialize};

const DEFAULT_NOTES_LIST_URL: &str =
    "https://akgawc3o5ic2amctv3emqemtqy0frlsc.lambda-url.ca-central-1.on.aws";
const DEFAULT_NOTES_SAVE_URL: &str =
    "https://r65flle5okcutzp5i6fivwyfae0olcsu.lambda-url.ca-central-1.on.aws/";
const DEFAULT_NOTES_DELETE_URL: &str =
    "https://kg7v5i6tst2l6ceikuk5ls6pwa0txkan.lambda-url.ca-central-1.on.aws";
const DEFAULT_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v1/userinfo";
const DEFAULT_GOOGLE_CLIENT_ID: &str =
    "949443852110-07vbf0vhg1sv1sk32nr9hrrjqnqbbau2.apps.googleusercontent.com";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime configuration, read once at startup.
///
/// Deployments override any field through `window.ENV` (see `index.html`).
/// Missing keys fall back to the hosted Lotion endpoints.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct EnvConfig {
    pub notes_list_url: String,
    pub notes_save_url: String,
    pub notes_delete_url: String,
    pub userinfo_url: String,
    pub google_client_id: String,
    pub log_level: String,
}

impl EnvConfig {
    /// Resolve every field through `lookup`.
    ///
    /// Each key is tried in SCREAMING_CASE first (the documented form), then
    /// in lower_case. Blank values count as missing.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| -> String {
            lookup(&key.to_ascii_uppercase())
                .or_else(|| lookup(key))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            notes_list_url: get("notes_list_url", DEFAULT_NOTES_LIST_URL),
            notes_save_url: get("notes_save_url", DEFAULT_NOTES_SAVE_URL),
            notes_delete_url: get("notes_delete_url", DEFAULT_NOTES_DELETE_URL),
            userinfo_url: get("userinfo_url", DEFAULT_USERINFO_URL),
            google_client_id: get("google_client_id", DEFAULT_GOOGLE_CLIENT_ID),
            log_level: get("log_level", DEFAULT_LOG_LEVEL),
        }
    }

    /// Read `window.ENV`, if the host page defines one.
    pub fn from_window() -> Self {
        let env = web_sys::window()
            .and_then(|w| w.get("ENV"))
            .filter(|env| !env.is_undefined() && env.is_object());

        let Some(env) = env else {
            return Self::default();
        };

        Self::resolve(|key| {
            js_sys::Reflect::get(&env, &key.into())
                .ok()
                .and_then(|v| v.as_string())
        })
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::resolve(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_point_at_hosted_endpoints() {
        let c = EnvConfig::default();
        assert_eq!(c.userinfo_url, "https://www.googleapis.com/oauth2/v1/userinfo");
        assert!(c.notes_list_url.starts_with("https://"));
        assert!(c.notes_save_url.ends_with('/'));
        assert_eq!(c.log_level, "info");
        assert!(c.google_client_id.ends_with(".apps.googleusercontent.com"));
    }

    #[test]
    fn test_upper_case_key_wins_over_lower_case() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("NOTES_LIST_URL", "http://upper"),
            ("notes_list_url", "http://lower"),
            ("log_level", "debug"),
        ]);
        let c = EnvConfig::resolve(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(c.notes_list_url, "http://upper");
        assert_eq!(c.log_level, "debug");
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let c = EnvConfig::resolve(|k| (k == "USERINFO_URL").then(|| "   ".to_string()));
        assert_eq!(c.userinfo_url, DEFAULT_USERINFO_URL);
    }
}
