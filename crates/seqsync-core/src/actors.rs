use crate::models::ActorSet;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Alias -> display name map built while parsing a single document.
#[derive(Debug, Clone, Default)]
pub struct ActorRegistry {
    aliases: FxHashMap<String, String>,
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a declaration. Without an alias the name is its own alias.
    pub fn declare(&mut self, name: &str, alias: Option<&str>) {
        let alias = alias.unwrap_or(name);
        self.aliases.insert(alias.to_string(), name.to_string());
    }

    pub fn display_name(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    /// Resolves a message endpoint. Unknown endpoints are registered as their own alias and
    /// added to `actors`, so hand-written text with undeclared names still yields a usable set.
    pub fn resolve(&mut self, endpoint: &str, actors: &mut ActorSet) -> String {
        if let Some(name) = self.aliases.get(endpoint) {
            return name.clone();
        }
        tracing::trace!(actor = endpoint, "auto-registering undeclared actor");
        self.aliases.insert(endpoint.to_string(), endpoint.to_string());
        actors.insert(endpoint);
        endpoint.to_string()
    }

    /// Every alias that resolves to `name`, sorted.
    pub fn aliases_of(&self, name: &str) -> Vec<&str> {
        let mut out: Vec<&str> = self
            .aliases
            .iter()
            .filter(|(_, v)| v.as_str() == name)
            .map(|(k, _)| k.as_str())
            .collect();
        out.sort_unstable();
        out
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Display classification derived from an actor's name; never stored on the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    Person,
    Participant,
    Store,
}

const PARTICIPANT_WORDS_CI: &[&str] = &["system", "site", "server", "service"];
const PARTICIPANT_WORDS_CS: &[&str] = &["API", "システム", "サイト", "サーバー", "サービス"];
const PARTICIPANT_EXCLUDED_CI: &[&str] = &["manager"];
const PARTICIPANT_EXCLUDED_CS: &[&str] = &["管理者"];
const STORE_WORDS_CI: &[&str] = &["database", "storage"];
const STORE_WORDS_CS: &[&str] = &["DB", "データベース", "ストレージ"];

impl ActorKind {
    pub fn classify(name: &str) -> Self {
        let lower = name.to_lowercase();
        let has = |ci: &[&str], cs: &[&str]| {
            ci.iter().any(|w| lower.contains(w)) || cs.iter().any(|w| name.contains(w))
        };

        if has(PARTICIPANT_WORDS_CI, PARTICIPANT_WORDS_CS)
            && !has(PARTICIPANT_EXCLUDED_CI, PARTICIPANT_EXCLUDED_CS)
        {
            ActorKind::Participant
        } else if has(STORE_WORDS_CI, STORE_WORDS_CS) {
            ActorKind::Store
        } else {
            ActorKind::Person
        }
    }

    /// Declaration keyword used by the generator.
    pub fn keyword(self) -> &'static str {
        match self {
            ActorKind::Person => "actor",
            ActorKind::Participant => "participant",
            ActorKind::Store => "database",
        }
    }
}
