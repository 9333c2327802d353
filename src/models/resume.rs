// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Resume record: structured sections plus a stored embedding.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::null_as_default;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Education {
    #[serde(default, deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub degree: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Experience {
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

/// The structured, user-editable part of a resume.
///
/// This is also the payload sent to the embedding service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ResumeContent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience: Vec<Experience>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub languages: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub certifications: Vec<String>,
}

/// Stored resume row (`resumes` table, one per `user_id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub user_id: String,
    #[serde(flatten)]
    pub content: ResumeContent,
    /// Embedding bytes, standard base64
    #[serde(default, deserialize_with = "null_as_default")]
    pub embedding: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_with_null_sections_is_defaulted() {
        let row: Resume = serde_json::from_value(serde_json::json!({
            "user_id": "u1",
            "skills": ["Go"],
            "experience": [{ "company": "Acme" }]
        }))
        .unwrap();
        assert_eq!(row.content.skills, vec!["Go".to_string()]);
        assert_eq!(row.content.experience[0].company, "Acme");
        assert_eq!(row.content.experience[0].position, "");
        assert!(row.content.education.is_empty());
        assert_eq!(row.embedding, "");
    }

    #[test]
    fn test_null_columns_are_defaulted() {
        let row: Resume = serde_json::from_value(serde_json::json!({
            "user_id": "u1",
            "education": null,
            "experience": [{ "company": "Acme", "end_date": null }],
            "skills": null,
            "languages": null,
            "certifications": null,
            "embedding": null,
            "updated_at": null
        }))
        .unwrap();
        assert!(row.content.education.is_empty());
        assert!(row.content.skills.is_empty());
        assert!(row.content.certifications.is_empty());
        assert_eq!(row.content.experience[0].end_date, "");
        assert_eq!(row.embedding, "");
    }

    #[test]
    fn test_content_is_flattened_on_the_wire() {
        let resume = Resume {
            user_id: "u1".into(),
            content: ResumeContent {
                skills: vec!["Rust".into()],
                ..Default::default()
            },
            embedding: "AAAA".into(),
            updated_at: None,
        };
        let value = serde_json::to_value(&resume).unwrap();
        assert_eq!(value["skills"][0], "Rust");
        assert_eq!(value["user_id"], "u1");
        assert!(value.get("content").is_none());
    }
}
