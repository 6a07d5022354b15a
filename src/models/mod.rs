use serde::{Deserialize, Serialize};

pub(crate) const UNTITLED: &str = "Untitled";

/// A single note as stored by the notes API.
///
/// `body` is HTML produced by the editor; `when` is the creation timestamp in
/// `datetime-local` form (`YYYY-MM-DDTHH:MM`).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Note {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub when: String,
}

impl Note {
    /// Placeholder note created by the "+" button. Never sent to the API
    /// until the user saves it.
    pub fn untitled(id: String, when: String) -> Self {
        Self {
            id,
            title: UNTITLED.to_string(),
            body: String::new(),
            when,
        }
    }
}

/// Token object returned by the Google implicit grant.
///
/// Persisted as-is under `storage::TOKEN_KEY`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct OAuthToken {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// Subset of the Google user-info response we care about.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Profile {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Upsert body: the note fields plus the owner's email (the table's
/// partition key).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct SaveNoteRequest {
    pub title: String,
    pub body: String,
    pub when: String,
    pub id: String,
    pub email: String,
}

impl SaveNoteRequest {
    pub fn new(note: &Note, email: &str) -> Self {
        Self {
            title: note.title.clone(),
            body: note.body.clone(),
            when: note.when.clone(),
            id: note.id.clone(),
            email: email.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct DeleteNoteRequest {
    pub email: String,
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_ignores_partition_key_and_defaults_missing_fields() {
        let json = r#"{"id": "n1", "email": "a@b.com", "title": "T"}"#;
        let n: Note = serde_json::from_str(json).expect("note should parse");
        assert_eq!(n.id, "n1");
        assert_eq!(n.title, "T");
        assert_eq!(n.body, "");
        assert_eq!(n.when, "");
    }

    #[test]
    fn test_save_request_carries_note_fields_and_email() {
        let note = Note {
            id: "n1".to_string(),
            title: "Groceries".to_string(),
            body: "<p>Milk</p>".to_string(),
            when: "2024-03-01T09:30".to_string(),
        };
        let v = serde_json::to_value(SaveNoteRequest::new(&note, "a@b.com")).expect("serialize");
        assert_eq!(
            v,
            serde_json::json!({
                "title": "Groceries",
                "body": "<p>Milk</p>",
                "when": "2024-03-01T09:30",
                "id": "n1",
                "email": "a@b.com",
            })
        );
    }

    #[test]
    fn test_profile_requires_email() {
        let ok: Result<Profile, _> =
            serde_json::from_str(r#"{"id": "1", "email": "a@b.com", "verified_email": true}"#);
        assert_eq!(ok.expect("profile").email, "a@b.com");

        let missing: Result<Profile, _> = serde_json::from_str(r#"{"id": "1"}"#);
        assert!(missing.is_err());
    }

    #[test]
    fn test_token_serialization_omits_missing_optional_fields() {
        let t = OAuthToken {
            access_token: "ya29.x".to_string(),
            token_type: None,
            expires_in: None,
            scope: None,
        };
        let s = serde_json::to_string(&t).expect("serialize");
        assert_eq!(s, r#"{"access_token":"ya29.x"}"#);
    }
}
