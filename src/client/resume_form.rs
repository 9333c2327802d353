// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Resume builder state.
//!
//! [`ResumeDraft`] is immutable: every edit returns a new draft, so the
//! shell can keep history or compare versions freely. Education, experience
//! and certifications always hold at least the template entry they start
//! with; skills and languages start empty.

use std::sync::{Arc, Mutex, PoisonError};

use crate::client::session::Navigator;
use crate::error::{AppError, Result};
use crate::models::{Education, Experience, Resume, ResumeContent};
use crate::navigation::{Navigation, Route};
use crate::services::resumes::ResumeService;

/// Languages offered as suggestions in the picker.
pub const PREDEFINED_LANGUAGES: &[&str] = &[
    "English",
    "Spanish",
    "French",
    "German",
    "Mandarin",
    "Arabic",
    "Hindi",
    "Portuguese",
    "Russian",
    "Japanese",
];

/// Repeating text sections addressable by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSection {
    Skills,
    Languages,
    Certifications,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResumeDraft {
    content: ResumeContent,
}

impl Default for ResumeDraft {
    fn default() -> Self {
        Self {
            content: ResumeContent {
                education: vec![Education::default()],
                experience: vec![Experience::default()],
                skills: Vec::new(),
                languages: Vec::new(),
                certifications: vec![String::new()],
            },
        }
    }
}

impl ResumeDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft pre-filled from a stored resume. Empty sections fall back to their templates.
    pub fn from_resume(resume: &Resume) -> Self {
        let template = Self::default().content;
        let stored = &resume.content;

        Self {
            content: ResumeContent {
                education: or_template(&stored.education, template.education),
                experience: or_template(&stored.experience, template.experience),
                skills: stored.skills.clone(),
                languages: stored.languages.clone(),
                certifications: or_template(&stored.certifications, template.certifications),
            },
        }
    }

    pub fn content(&self) -> &ResumeContent {
        &self.content
    }

    fn with(&self, edit: impl FnOnce(&mut ResumeContent)) -> Self {
        let mut next = self.clone();
        edit(&mut next.content);
        next
    }

    pub fn add_education(&self) -> Self {
        self.with(|c| c.education.push(Education::default()))
    }

    /// Out of range indexes leave the draft unchanged.
    pub fn edit_education(&self, index: usize, edit: impl FnOnce(&mut Education)) -> Self {
        self.with(|c| {
            if let Some(entry) = c.education.get_mut(index) {
                edit(entry);
            }
        })
    }

    pub fn remove_education(&self, index: usize) -> Self {
        self.with(|c| remove_keeping_template(&mut c.education, index))
    }

    pub fn add_experience(&self) -> Self {
        self.with(|c| c.experience.push(Experience::default()))
    }

    pub fn edit_experience(&self, index: usize, edit: impl FnOnce(&mut Experience)) -> Self {
        self.with(|c| {
            if let Some(entry) = c.experience.get_mut(index) {
                edit(entry);
            }
        })
    }

    pub fn remove_experience(&self, index: usize) -> Self {
        self.with(|c| remove_keeping_template(&mut c.experience, index))
    }

    pub fn add_certification(&self) -> Self {
        self.with(|c| c.certifications.push(String::new()))
    }

    /// Append a skill. Input is trimmed; blank input is ignored.
    pub fn add_skill(&self, skill: &str) -> Self {
        let skill = skill.trim();
        if skill.is_empty() {
            return self.clone();
        }
        self.with(|c| c.skills.push(skill.to_string()))
    }

    /// Replace the language selection.
    pub fn set_languages<I, S>(&self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let languages = languages.into_iter().map(Into::into).collect();
        self.with(|c| c.languages = languages)
    }

    pub fn edit_item(&self, section: ListSection, index: usize, value: &str) -> Self {
        self.with(|c| {
            if let Some(item) = list_mut(c, section).get_mut(index) {
                *item = value.to_string();
            }
        })
    }

    /// Removing the last certification leaves a blank one in its place.
    pub fn remove_item(&self, section: ListSection, index: usize) -> Self {
        self.with(|c| match section {
            ListSection::Certifications => remove_keeping_template(&mut c.certifications, index),
            _ => remove_at(list_mut(c, section), index),
        })
    }
}

fn list_mut(content: &mut ResumeContent, section: ListSection) -> &mut Vec<String> {
    match section {
        ListSection::Skills => &mut content.skills,
        ListSection::Languages => &mut content.languages,
        ListSection::Certifications => &mut content.certifications,
    }
}

fn or_template<T: Clone>(stored: &[T], template: Vec<T>) -> Vec<T> {
    if stored.is_empty() {
        template
    } else {
        stored.to_vec()
    }
}

fn remove_at<T>(items: &mut Vec<T>, index: usize) {
    if index < items.len() {
        items.remove(index);
    }
}

/// Remove an entry from a section that always shows at least one row.
fn remove_keeping_template<T: Default>(items: &mut Vec<T>, index: usize) {
    remove_at(items, index);
    if items.is_empty() {
        items.push(T::default());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormStatus {
    Editing,
    Submitting,
    Saved,
    Failed(String),
}

struct FormState {
    draft: ResumeDraft,
    status: FormStatus,
}

/// Drives one resume form: holds the draft, submits it, reports status.
pub struct ResumeFormController {
    service: ResumeService,
    navigator: Arc<dyn Navigator>,
    user_id: String,
    state: Mutex<FormState>,
}

impl ResumeFormController {
    pub fn new(service: ResumeService, navigator: Arc<dyn Navigator>, user_id: &str) -> Self {
        Self {
            service,
            navigator,
            user_id: user_id.to_string(),
            state: Mutex::new(FormState {
                draft: ResumeDraft::new(),
                status: FormStatus::Editing,
            }),
        }
    }

    /// Load the user's stored resume into the draft, if there is one.
    pub async fn load(&self) -> Result<()> {
        let stored = self.service.get(&self.user_id).await?;
        if let Some(resume) = stored {
            self.lock().draft = ResumeDraft::from_resume(&resume);
        }
        Ok(())
    }

    pub fn draft(&self) -> ResumeDraft {
        self.lock().draft.clone()
    }

    pub fn status(&self) -> FormStatus {
        self.lock().status.clone()
    }

    /// Apply an edit to the current draft.
    pub fn update(&self, edit: impl FnOnce(&ResumeDraft) -> ResumeDraft) {
        let mut state = self.lock();
        state.draft = edit(&state.draft);
        if state.status != FormStatus::Submitting {
            state.status = FormStatus::Editing;
        }
    }

    /// Embed and save the draft. On failure the draft is kept and the status carries the notice.
    pub async fn submit(&self) -> Result<Resume> {
        let content = {
            let mut state = self.lock();
            if state.status == FormStatus::Submitting {
                return Err(AppError::BadRequest(
                    "A submission is already in progress".to_string(),
                ));
            }
            state.status = FormStatus::Submitting;
            state.draft.content().clone()
        };

        match self.service.submit(&self.user_id, &content).await {
            Ok(resume) => {
                self.lock().status = FormStatus::Saved;
                self.navigator.navigate(Navigation::to(Route::Profile.path()));
                Ok(resume)
            }
            Err(e) => {
                tracing::warn!(user_id = %self.user_id, error = %e, "Resume submission failed");
                self.lock().status = FormStatus::Failed(e.user_message());
                Err(e)
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_draft_has_templates() {
        let draft = ResumeDraft::new();
        let content = draft.content();
        assert_eq!(content.education, vec![Education::default()]);
        assert_eq!(content.experience, vec![Experience::default()]);
        assert_eq!(content.certifications, vec![String::new()]);
        assert!(content.skills.is_empty());
        assert!(content.languages.is_empty());
    }

    #[test]
    fn test_edits_return_new_draft() {
        let original = ResumeDraft::new();
        let edited = original
            .edit_education(0, |e| e.institution = "MIT".to_string())
            .add_experience();

        assert_eq!(original, ResumeDraft::new());
        assert_eq!(edited.content().education[0].institution, "MIT");
        assert_eq!(edited.content().experience.len(), 2);
    }

    #[test]
    fn test_skills_are_trimmed_and_blanks_ignored() {
        let draft = ResumeDraft::new().add_skill("  Rust ").add_skill("   ");
        assert_eq!(draft.content().skills, vec!["Rust".to_string()]);
    }

    #[test]
    fn test_list_items_are_independently_addressable() {
        let draft = ResumeDraft::new()
            .add_skill("Go")
            .add_skill("SQL")
            .edit_item(ListSection::Certifications, 0, "CKA")
            .remove_item(ListSection::Skills, 0)
            .remove_item(ListSection::Skills, 9);

        assert_eq!(draft.content().skills, vec!["SQL".to_string()]);
        assert_eq!(draft.content().certifications, vec!["CKA".to_string()]);
    }

    #[test]
    fn test_removing_last_entry_restores_template() {
        let draft = ResumeDraft::new()
            .edit_education(0, |e| e.institution = "MIT".to_string())
            .add_experience()
            .edit_item(ListSection::Certifications, 0, "CKA")
            .remove_education(0)
            .remove_experience(1)
            .remove_experience(0)
            .remove_item(ListSection::Certifications, 0);

        assert_eq!(draft.content().education, vec![Education::default()]);
        assert_eq!(draft.content().experience, vec![Experience::default()]);
        assert_eq!(draft.content().certifications, vec![String::new()]);

        let draft = draft.add_skill("Go").remove_item(ListSection::Skills, 0);
        assert!(draft.content().skills.is_empty());
    }

    #[test]
    fn test_stored_resume_missing_sections_get_templates() {
        let resume = Resume {
            user_id: "u1".to_string(),
            content: ResumeContent {
                skills: vec!["Go".to_string()],
                ..Default::default()
            },
            embedding: String::new(),
            updated_at: None,
        };

        let draft = ResumeDraft::from_resume(&resume);
        assert_eq!(draft.content().education.len(), 1);
        assert_eq!(draft.content().experience.len(), 1);
        assert_eq!(draft.content().certifications, vec![String::new()]);
        assert_eq!(draft.content().skills, vec!["Go".to_string()]);
    }

    #[test]
    fn test_languages_replace_selection() {
        let draft = ResumeDraft::new()
            .set_languages(["English", "French"])
            .set_languages(vec![PREDEFINED_LANGUAGES[1].to_string()]);
        assert_eq!(draft.content().languages, vec!["Spanish".to_string()]);
    }
}
