//! Recommendation request and result models.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::null_as_default;

/// Default number of candidates requested.
pub const DEFAULT_TOP_N: u32 = 5;

fn default_top_n() -> u32 {
    DEFAULT_TOP_N
}

/// Search request sent to the matching API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, validator::Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RecommendRequest {
    #[validate(length(min = 1, message = "job description must not be empty"))]
    pub job_description: String,
    #[serde(default = "default_top_n")]
    pub top_n: u32,
}

impl RecommendRequest {
    pub fn new(job_description: impl Into<String>, top_n: u32) -> Self {
        Self {
            job_description: job_description.into(),
            top_n,
        }
    }
}

/// A ranked candidate summary returned by the matching API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CandidateMatch {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    pub score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown[]"))]
    pub experience: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub languages: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub age: Option<u32>,
}

/// Order by descending score and keep at most `top_n` entries.
pub fn rank(mut matches: Vec<CandidateMatch>, top_n: u32) -> Vec<CandidateMatch> {
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    matches.truncate(top_n as usize);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, score: f64) -> CandidateMatch {
        CandidateMatch {
            id: id.to_string(),
            name: id.to_string(),
            email: String::new(),
            phone: String::new(),
            score,
            skills: vec![],
            experience: vec![],
            education: String::new(),
            languages: vec![],
            certifications: vec![],
            age: None,
        }
    }

    #[test]
    fn test_rank_sorts_and_truncates() {
        let ranked = rank(
            vec![candidate("a", 0.2), candidate("b", 0.9), candidate("c", 0.5)],
            2,
        );
        let ids: Vec<_> = ranked.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_null_fields_are_defaulted() {
        let m: CandidateMatch = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "name": "Ada",
            "phone": null,
            "score": 0.7,
            "skills": null,
            "education": null,
            "age": null
        }))
        .unwrap();
        assert_eq!(m.phone, "");
        assert!(m.skills.is_empty());
        assert_eq!(m.education, "");
        assert_eq!(m.age, None);
    }

    #[test]
    fn test_top_n_defaults_when_absent() {
        let req: RecommendRequest =
            serde_json::from_value(serde_json::json!({ "job_description": "Go" })).unwrap();
        assert_eq!(req.top_n, DEFAULT_TOP_N);
    }
}
