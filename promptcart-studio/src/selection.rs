//! Selection store
//!
//! Owns the ordered, duplicate-free list of selected tags and the prompt text
//! shown to the user. The prompt text is either *derived* from the selection
//! (computed on read) or *detached* (a manual edit or an enrichment result).
//! Every selection mutation and every language change resets it to derived,
//! discarding the detached text.

use crate::language::DisplayLanguage;
use crate::taxonomy::Tag;
use std::borrow::Cow;
use std::sync::Arc;

/// Provenance of the prompt text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PromptText {
    /// Exactly the join of the selection under the current language
    #[default]
    Derived,
    /// Overwritten by the user or an enrichment call
    Detached(String),
}

/// Result of a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

/// Join tag labels in selection order with the language's delimiter
pub fn derive_prompt(tags: &[Arc<Tag>], language: DisplayLanguage) -> String {
    tags.iter()
        .map(|tag| language.label(tag))
        .collect::<Vec<_>>()
        .join(language.delimiter())
}

/// Selected tags plus their textual projection
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    tags: Vec<Arc<Tag>>,
    language: DisplayLanguage,
    prompt: PromptText,
}

impl SelectionStore {
    pub fn new(language: DisplayLanguage) -> Self {
        Self {
            tags: Vec::new(),
            language,
            prompt: PromptText::Derived,
        }
    }

    /// Remove the tag if selected, else append it
    pub fn toggle(&mut self, tag: Arc<Tag>) -> ToggleOutcome {
        let outcome = match self.tags.iter().position(|t| t.id == tag.id) {
            Some(index) => {
                self.tags.remove(index);
                ToggleOutcome::Removed
            }
            None => {
                self.tags.push(tag);
                ToggleOutcome::Added
            }
        };
        self.prompt = PromptText::Derived;
        outcome
    }

    /// Empty the selection; prompt text becomes empty
    ///
    /// Does not gate: callers sequence this after user consent.
    pub fn clear(&mut self) {
        self.tags.clear();
        self.prompt = PromptText::Derived;
    }

    /// Overwrite the prompt text without touching the selection
    pub fn set_prompt_text(&mut self, text: impl Into<String>) {
        self.prompt = PromptText::Detached(text.into());
    }

    /// Switch the display language, re-deriving the prompt text
    ///
    /// Returns false (and keeps any detached text) if unchanged.
    pub fn set_language(&mut self, language: DisplayLanguage) -> bool {
        if self.language == language {
            return false;
        }
        self.language = language;
        self.prompt = PromptText::Derived;
        true
    }

    pub fn prompt_text(&self) -> Cow<'_, str> {
        match &self.prompt {
            PromptText::Derived => Cow::Owned(derive_prompt(&self.tags, self.language)),
            PromptText::Detached(text) => Cow::Borrowed(text),
        }
    }

    pub fn provenance(&self) -> &PromptText {
        &self.prompt
    }

    pub fn is_detached(&self) -> bool {
        matches!(self.prompt, PromptText::Detached(_))
    }

    pub fn language(&self) -> DisplayLanguage {
        self.language
    }

    pub fn tags(&self) -> &[Arc<Tag>] {
        &self.tags
    }

    pub fn tag_ids(&self) -> Vec<String> {
        self.tags.iter().map(|t| t.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::tag;
    use std::collections::HashSet;

    fn cat() -> Arc<Tag> {
        tag("a", "猫", "cat")
    }

    fn dog() -> Arc<Tag> {
        tag("b", "狗", "dog")
    }

    #[test]
    fn test_primary_and_secondary_derivation() {
        let mut store = SelectionStore::new(DisplayLanguage::Primary);
        store.toggle(cat());
        store.toggle(dog());

        assert_eq!(store.prompt_text(), "猫，狗");

        store.set_language(DisplayLanguage::Secondary);
        assert_eq!(store.prompt_text(), "cat, dog");

        assert_eq!(store.toggle(dog()), ToggleOutcome::Removed);
        assert_eq!(store.tag_ids(), vec!["a"]);
        assert_eq!(store.prompt_text(), "cat");

        store.set_language(DisplayLanguage::Primary);
        assert_eq!(store.prompt_text(), "猫");
    }

    #[test]
    fn test_toggle_never_duplicates() {
        let mut store = SelectionStore::default();
        let sequence = ["a", "b", "a", "a", "c", "b", "c", "c", "a"];

        for id in sequence {
            store.toggle(tag(id, id, id));
            let unique: HashSet<_> = store.tags().iter().map(|t| t.id.as_str()).collect();
            assert_eq!(unique.len(), store.len());
        }
        assert_eq!(store.tag_ids(), vec!["c", "a"]);
    }

    #[test]
    fn test_toggle_involution_restores_order() {
        let mut store = SelectionStore::default();
        store.toggle(tag("x", "x", "x"));
        store.toggle(tag("y", "y", "y"));
        let before = store.tag_ids();

        assert_eq!(store.toggle(cat()), ToggleOutcome::Added);
        assert_eq!(store.toggle(cat()), ToggleOutcome::Removed);

        assert_eq!(store.tag_ids(), before);
    }

    #[test]
    fn test_toggle_matches_by_id_not_allocation() {
        let mut store = SelectionStore::default();
        store.toggle(cat());
        store.toggle(tag("a", "another", "label"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let tags = vec![cat(), dog(), tag("c", "狐狸", "fox")];
        for language in [DisplayLanguage::Primary, DisplayLanguage::Secondary] {
            assert_eq!(derive_prompt(&tags, language), derive_prompt(&tags, language));
        }
        assert_eq!(derive_prompt(&tags, DisplayLanguage::Secondary), "cat, dog, fox");
        assert_eq!(derive_prompt(&[], DisplayLanguage::Primary), "");
    }

    #[test]
    fn test_set_prompt_text_detaches_without_touching_selection() {
        let mut store = SelectionStore::default();
        store.toggle(cat());

        store.set_prompt_text("a cat sitting on a windowsill");

        assert!(store.is_detached());
        assert_eq!(store.prompt_text(), "a cat sitting on a windowsill");
        assert_eq!(store.tag_ids(), vec!["a"]);
    }

    #[test]
    fn test_toggle_discards_detached_text() {
        let mut store = SelectionStore::default();
        store.toggle(cat());
        store.set_prompt_text("edited");

        store.toggle(dog());

        assert_eq!(store.provenance(), &PromptText::Derived);
        assert_eq!(store.prompt_text(), "猫，狗");
    }

    #[test]
    fn test_clear_discards_detached_text() {
        let mut store = SelectionStore::default();
        store.toggle(cat());
        store.toggle(dog());
        store.set_prompt_text("edited");

        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.prompt_text(), "");
        assert!(!store.is_detached());
    }

    #[test]
    fn test_clear_on_empty_store() {
        let mut store = SelectionStore::default();
        store.set_prompt_text("typed by hand");
        store.clear();
        assert_eq!(store.prompt_text(), "");
    }

    #[test]
    fn test_language_change_discards_detached_text() {
        let mut store = SelectionStore::default();
        store.toggle(cat());
        store.set_prompt_text("edited");

        assert!(store.set_language(DisplayLanguage::Secondary));
        assert_eq!(store.prompt_text(), "cat");
    }

    #[test]
    fn test_same_language_keeps_detached_text() {
        let mut store = SelectionStore::new(DisplayLanguage::Secondary);
        store.set_prompt_text("edited");

        assert!(!store.set_language(DisplayLanguage::Secondary));
        assert_eq!(store.prompt_text(), "edited");
    }
}
