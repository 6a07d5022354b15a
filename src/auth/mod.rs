//! Google sign-in: implicit-grant redirect, token capture, and profile lookup.

use crate::api::{send_json, with_auth_headers, with_query, ApiError, ApiResult};
use crate::models::{OAuthToken, Profile};
use log::{info, warn};

const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const SCOPES: &str = "openid email profile";

/// Authorization URL for the implicit grant; Google redirects back to
/// `redirect_uri` with the token in the URL fragment.
pub(crate) fn authorize_url(client_id: &str, redirect_uri: &str) -> String {
    with_query(
        GOOGLE_AUTHORIZE_URL,
        &[
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
            ("response_type", "token"),
            ("scope", SCOPES),
            ("include_granted_scopes", "true"),
        ],
    )
}

/// What came back in the redirect fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum RedirectResult {
    Token(OAuthToken),
    Denied(String),
}

/// Parse `#access_token=...&token_type=...` (leading `#` optional).
///
/// Returns `None` when the fragment is not an OAuth response at all.
pub(crate) fn parse_redirect_fragment(fragment: &str) -> Option<RedirectResult> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);

    let mut access_token = None;
    let mut token_type = None;
    let mut expires_in = None;
    let mut scope = None;
    let mut error = None;

    for pair in fragment.split('&') {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        let v = urlencoding::decode(&v.replace('+', " "))
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| v.to_string());
        match k {
            "access_token" => access_token = Some(v),
            "token_type" => token_type = Some(v),
            "expires_in" => expires_in = Some(v),
            "scope" => scope = Some(v),
            "error" => error = Some(v),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Some(RedirectResult::Denied(error));
    }

    let access_token = access_token.filter(|t| !t.trim().is_empty())?;
    Some(RedirectResult::Token(OAuthToken {
        access_token,
        token_type,
        expires_in,
        scope,
    }))
}

/// Send the browser to Google's consent screen.
pub(crate) fn begin_login(client_id: &str) {
    let window = leptos::prelude::window();
    let Ok(origin) = window.location().origin() else {
        warn!("login: cannot read window origin");
        return;
    };

    let _ = window.location().set_href(&authorize_url(client_id, &origin));
}

/// Consume an OAuth response left in the address bar by the login redirect.
///
/// The fragment is removed from the address bar so the token never lingers
/// in history. Consent errors are logged and otherwise ignored.
pub(crate) fn take_redirect_token() -> Option<OAuthToken> {
    let window = web_sys::window()?;
    let hash = window.location().hash().ok()?;
    let result = parse_redirect_fragment(&hash)?;

    if let Ok(history) = window.history() {
        let path = window.location().pathname().unwrap_or_else(|_| "/".to_string());
        let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&path));
    }

    match result {
        RedirectResult::Token(token) => {
            info!("login: received access token");
            Some(token)
        }
        RedirectResult::Denied(error) => {
            warn!("Login Failed: {error}");
            None
        }
    }
}

pub(crate) fn userinfo_request_url(userinfo_url: &str, access_token: &str) -> String {
    with_query(userinfo_url, &[("access_token", access_token)])
}

/// Exchange an access token for the signed-in user's profile.
pub(crate) async fn fetch_profile(userinfo_url: &str, access_token: &str) -> ApiResult<Profile> {
    let req = reqwest::Client::new()
        .get(userinfo_request_url(userinfo_url, access_token))
        .header("Accept", "application/json");
    let data = send_json(with_auth_headers(req, Some(access_token)), "Fetch profile").await?;
    serde_json::from_value(data).map_err(|e| ApiError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_url_requests_token_with_encoded_redirect() {
        let url = authorize_url("cid.apps.googleusercontent.com", "http://localhost:8080");
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?client_id=cid.apps.googleusercontent.com"));
        assert!(url.contains("&redirect_uri=http%3A%2F%2Flocalhost%3A8080"));
        assert!(url.contains("&response_type=token"));
        assert!(url.contains("&scope=openid%20email%20profile"));
    }

    #[test]
    fn test_parse_fragment_with_token() {
        let got = parse_redirect_fragment(
            "#access_token=ya29.a0Af&token_type=Bearer&expires_in=3599&scope=email%20profile+openid",
        );
        assert_eq!(
            got,
            Some(RedirectResult::Token(OAuthToken {
                access_token: "ya29.a0Af".to_string(),
                token_type: Some("Bearer".to_string()),
                expires_in: Some("3599".to_string()),
                scope: Some("email profile openid".to_string()),
            }))
        );
    }

    #[test]
    fn test_parse_fragment_with_error() {
        assert_eq!(
            parse_redirect_fragment("#error=access_denied&state=x"),
            Some(RedirectResult::Denied("access_denied".to_string()))
        );
    }

    #[test]
    fn test_parse_fragment_ignores_unrelated_hashes() {
        assert_eq!(parse_redirect_fragment(""), None);
        assert_eq!(parse_redirect_fragment("#section-2"), None);
        assert_eq!(parse_redirect_fragment("#access_token="), None);
    }

    #[test]
    fn test_userinfo_url_carries_token() {
        assert_eq!(
            userinfo_request_url("https://www.googleapis.com/oauth2/v1/userinfo", "ya29/x"),
            "https://www.googleapis.com/oauth2/v1/userinfo?access_token=ya29%2Fx"
        );
    }
}
