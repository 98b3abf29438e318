//! Host environment the controller reads preferences from and applies
//! locale attributes to.
//!
//! In a browser this is the navigator language list and the document root;
//! headless and server-side hosts use [`HeadlessEnvironment`] or
//! [`ProcessEnvironment`].

use crate::i18n::TextDirection;
use crate::lock;
use std::sync::Mutex;
use tracing::debug;

/// Injectable collaborator for environment reads and side effects.
pub trait Environment: Send + Sync {
    /// Preferred language tags, most preferred first.
    fn preferred_languages(&self) -> Vec<String>;

    /// Apply the text direction attribute to the root context.
    fn apply_direction(&self, direction: TextDirection);

    /// Apply the language tag attribute to the root context.
    fn apply_language_tag(&self, code: &str);
}

/// Attributes last applied to the root context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentAttributes {
    pub dir: Option<TextDirection>,
    pub lang: Option<String>,
}

/// Environment with fixed language preferences that records applied attributes.
#[derive(Debug, Default)]
pub struct HeadlessEnvironment {
    languages: Vec<String>,
    document: Mutex<DocumentAttributes>,
    applied: Mutex<Vec<String>>,
}

impl HeadlessEnvironment {
    pub fn new<S: Into<String>>(languages: impl IntoIterator<Item = S>) -> Self {
        Self {
            languages: languages.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn document(&self) -> DocumentAttributes {
        lock(&self.document).clone()
    }

    /// Every side effect in order, as `dir=..` / `lang=..` entries.
    pub fn applied(&self) -> Vec<String> {
        lock(&self.applied).clone()
    }
}

impl Environment for HeadlessEnvironment {
    fn preferred_languages(&self) -> Vec<String> {
        self.languages.clone()
    }

    fn apply_direction(&self, direction: TextDirection) {
        lock(&self.document).dir = Some(direction);
        lock(&self.applied).push(format!("dir={}", direction));
    }

    fn apply_language_tag(&self, code: &str) {
        lock(&self.document).lang = Some(code.to_string());
        lock(&self.applied).push(format!("lang={}", code));
    }
}

/// Environment backed by the operating system's locale preferences.
///
/// Tags come from `sys-locale` (the user's language list on Windows and
/// macOS, the locale variables on POSIX). The `C` and `POSIX` locales carry
/// no language preference and are skipped.
#[derive(Debug, Default)]
pub struct ProcessEnvironment {
    document: Mutex<DocumentAttributes>,
}

impl ProcessEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> DocumentAttributes {
        lock(&self.document).clone()
    }
}

impl Environment for ProcessEnvironment {
    fn preferred_languages(&self) -> Vec<String> {
        clean_language_tags(sys_locale::get_locales())
    }

    fn apply_direction(&self, direction: TextDirection) {
        debug!("Applying text direction {}", direction);
        lock(&self.document).dir = Some(direction);
    }

    fn apply_language_tag(&self, code: &str) {
        debug!("Applying language tag {}", code);
        lock(&self.document).lang = Some(code.to_string());
    }
}

/// Ordered, de-duplicated tags; colon-separated lists are expanded.
fn clean_language_tags<S: AsRef<str>>(tags: impl IntoIterator<Item = S>) -> Vec<String> {
    let mut languages: Vec<String> = Vec::new();
    for value in tags {
        for tag in value.as_ref().split(':') {
            let tag = tag.trim();
            let language = tag.split(['.', '@']).next().unwrap_or_default();
            if language.is_empty() || language == "C" || language == "POSIX" {
                continue;
            }
            if !languages.iter().any(|existing| existing == tag) {
                languages.push(tag.to_string());
            }
        }
    }
    languages
}
