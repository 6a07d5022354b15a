use crate::config::EnvConfig;
use crate::models::{DeleteNoteRequest, Note, SaveNoteRequest};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("network error: {0}")]
    Network(String),
    #[error("{ctx} failed ({status}): {body}")]
    Http {
        ctx: &'static str,
        status: u16,
        body: String,
    },
    #[error("unexpected response: {0}")]
    Parse(String),
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self::Parse(e.to_string())
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// Append `key=value` pairs to `base`, percent-encoding the values.
pub(crate) fn with_query(base: &str, pairs: &[(&str, &str)]) -> String {
    let mut url = base.to_string();
    for (k, v) in pairs {
        let sep = if url.contains('?') { '&' } else { '?' };
        url.push(sep);
        url.push_str(k);
        url.push('=');
        url.push_str(&urlencoding::encode(v));
    }
    url
}

pub(crate) fn with_auth_headers(
    mut req: reqwest::RequestBuilder,
    token: Option<&str>,
) -> reqwest::RequestBuilder {
    if let Some(token) = token {
        req = req.header("Authorization", format!("Bearer {}", token));
    }
    req
}

/// Send `req` and decode the response body as JSON.
///
/// Non-JSON success bodies are returned as a JSON string so callers can still
/// log them.
pub(crate) async fn send_json(
    req: reqwest::RequestBuilder,
    ctx: &'static str,
) -> ApiResult<serde_json::Value> {
    let res = req.send().await.map_err(ApiError::network)?;
    let status = res.status();
    let text = res.text().await.map_err(ApiError::network)?;

    if status.as_u16() == 401 {
        return Err(ApiError::Unauthorized);
    }
    if !status.is_success() {
        return Err(ApiError::Http {
            ctx,
            status: status.as_u16(),
            body: text,
        });
    }

    if text.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    Ok(serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text)))
}

/// Client for the three notes functions. Each endpoint is an independent URL.
#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    pub(crate) list_url: String,
    pub(crate) save_url: String,
    pub(crate) delete_url: String,
    pub(crate) token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &EnvConfig, token: Option<String>) -> Self {
        Self {
            list_url: config.notes_list_url.clone(),
            save_url: config.notes_save_url.clone(),
            delete_url: config.notes_delete_url.clone(),
            token,
        }
    }

    pub(crate) fn notes_list_url(&self, email: &str) -> String {
        with_query(&self.list_url, &[("email", email)])
    }

    pub(crate) fn notes_delete_url(&self, email: &str, id: &str) -> String {
        with_query(&self.delete_url, &[("email", email), ("id", id)])
    }

    /// Decode the list endpoint's body. Anything other than a JSON array is an
    /// error; rows without an id, or repeating an earlier id, are dropped.
    pub(crate) fn parse_note_list_response(data: serde_json::Value) -> ApiResult<Vec<Note>> {
        let serde_json::Value::Array(list) = data else {
            return Err(ApiError::parse(format!("expected a note array, got {data}")));
        };

        let mut seen: HashSet<String> = HashSet::with_capacity(list.len());
        let mut out: Vec<Note> = Vec::with_capacity(list.len());
        for item in list {
            let get_s = |k: &str| match item.get(k) {
                Some(serde_json::Value::String(s)) => Some(s.clone()),
                Some(serde_json::Value::Number(n)) => Some(n.to_string()),
                _ => None,
            };

            let id = get_s("id").unwrap_or_default();
            if id.trim().is_empty() || !seen.insert(id.clone()) {
                continue;
            }

            out.push(Note {
                id,
                title: get_s("title").unwrap_or_default(),
                body: get_s("body").unwrap_or_default(),
                when: get_s("when").unwrap_or_default(),
            });
        }

        Ok(out)
    }

    pub async fn list_notes(&self, email: &str) -> ApiResult<Vec<Note>> {
        let req = reqwest::Client::new()
            .get(self.notes_list_url(email))
            .header("Content-Type", "application/json");
        let data = send_json(with_auth_headers(req, self.token.as_deref()), "List notes").await?;
        Self::parse_note_list_response(data)
    }

    pub async fn save_note(&self, body: &SaveNoteRequest) -> ApiResult<serde_json::Value> {
        let req = reqwest::Client::new().post(&self.save_url).json(body);
        send_json(with_auth_headers(req, self.token.as_deref()), "Save note").await
    }

    pub async fn delete_note(&self, body: &DeleteNoteRequest) -> ApiResult<serde_json::Value> {
        let req = reqwest::Client::new()
            .delete(self.notes_delete_url(&body.email, &body.id))
            .json(body);
        send_json(with_auth_headers(req, self.token.as_deref()), "Delete note").await
    }
}
