//! Persona table: named system prompts.

use std::collections::BTreeMap;

/// Persona selected when a manager is constructed.
pub const DEFAULT_PERSONA: &str = "sassy_assistant";

/// Reserved key holding the user-supplied persona. Never persisted.
pub const CUSTOM_PERSONA: &str = "custom";

const BUILTIN_PERSONAS: &[(&str, &str)] = &[
    (
        "sassy_assistant",
        "A sassy assistant who is fed up with answering questions.",
    ),
    (
        "angry_assistant",
        "An angry assistant that likes yelling in all caps.",
    ),
    (
        "thoughtful_assistant",
        "A thoughtful assistant, always ready to dig deeper. This assistant asks clarifying \
         questions to ensure understanding and approaches problems with a step-by-step \
         methodology.",
    ),
    (
        "expert_assistant",
        "An assistant that is an expert in the topic being discussed. This assistant provides \
         answers with academic language and indicates what sources information came from.",
    ),
];

/// Mapping from persona name to system-message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaTable {
    entries: BTreeMap<String, String>,
}

impl PersonaTable {
    /// Table seeded with the built-in personas.
    pub fn builtin() -> Self {
        let entries = BUILTIN_PERSONAS
            .iter()
            .map(|(name, text)| (name.to_string(), text.to_string()))
            .collect();
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Persona names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Store `text` under [`CUSTOM_PERSONA`], replacing any previous one.
    pub fn set_custom(&mut self, text: impl Into<String>) {
        self.entries.insert(CUSTOM_PERSONA.to_string(), text.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, text)| (name.as_str(), text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PersonaTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_personas() {
        let table = PersonaTable::builtin();
        assert_eq!(table.len(), 4);
        assert_eq!(
            table.names(),
            vec![
                "angry_assistant",
                "expert_assistant",
                "sassy_assistant",
                "thoughtful_assistant"
            ]
        );
        assert!(table.contains(DEFAULT_PERSONA));
        assert!(!table.contains(CUSTOM_PERSONA));
        assert!(
            table
                .get("thoughtful_assistant")
                .unwrap()
                .contains("asks clarifying questions to ensure")
        );
    }

    #[test]
    fn test_set_custom_overwrites() {
        let mut table = PersonaTable::builtin();
        table.set_custom("first");
        table.set_custom("second");
        assert_eq!(table.get(CUSTOM_PERSONA), Some("second"));
        assert_eq!(table.len(), 5);
    }
}
