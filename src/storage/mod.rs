use crate::models::OAuthToken;
use serde::{Deserialize, Serialize};

/// The only client-side persisted state: the serialized OAuth token object.
pub(crate) const TOKEN_KEY: &str = "lotion-v1";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let storage = local_storage()?;
    let json = storage.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(key, &json);
        }
    }
}

pub(crate) fn remove_from_storage(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}

pub(crate) fn save_token_to_storage(token: &OAuthToken) {
    save_json_to_storage(TOKEN_KEY, token);
}

/// A corrupt or foreign value under the key reads as "signed out".
pub(crate) fn load_token_from_storage() -> Option<OAuthToken> {
    load_json_from_storage::<OAuthToken>(TOKEN_KEY).filter(|t| !t.access_token.trim().is_empty())
}

pub(crate) fn clear_token_storage() {
    remove_from_storage(TOKEN_KEY);
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn token(access: &str) -> OAuthToken {
        OAuthToken {
            access_token: access.to_string(),
            token_type: Some("Bearer".to_string()),
            expires_in: Some("3599".to_string()),
            scope: None,
        }
    }

    #[wasm_bindgen_test]
    fn test_token_storage_roundtrip() {
        clear_token_storage();
        assert!(load_token_from_storage().is_none());

        save_token_to_storage(&token("t1"));
        assert_eq!(load_token_from_storage(), Some(token("t1")));

        clear_token_storage();
        assert!(load_token_from_storage().is_none());
    }

    #[wasm_bindgen_test]
    fn test_garbage_under_token_key_reads_as_signed_out() {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(TOKEN_KEY, "not json");
        }
        assert!(load_token_from_storage().is_none());

        save_json_to_storage(TOKEN_KEY, &serde_json::json!({"access_token": "  "}));
        assert!(load_token_from_storage().is_none());
        clear_token_storage();
    }
}
