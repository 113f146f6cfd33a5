use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::entities::{language::Language, translation::Translation};

const SL_TABLE: &str = include_str!("../../locales/sl.json");
const EN_TABLE: &str = include_str!("../../locales/en.json");

static TABLES: Lazy<HashMap<Language, Value>> = Lazy::new(|| {
    Language::ALL
        .iter()
        .map(|&language| (language, parse_table(language)))
        .collect()
});

fn parse_table(language: Language) -> Value {
    let raw = match language {
        Language::Sl => SL_TABLE,
        Language::En => EN_TABLE,
    };
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::error!("Invalid {} string table: {}", language, e);
        Value::Object(Default::default())
    })
}

/// The whole static table for `language`.
pub fn table(language: Language) -> &'static Value {
    static EMPTY: Lazy<Value> = Lazy::new(|| Value::Object(Default::default()));
    TABLES.get(&language).unwrap_or(&EMPTY)
}

/// Resolves a dotted key such as `contact.form.title`.
///
/// Returns the key unchanged when a segment is missing or the value is not
/// a non-empty string.
pub fn translate(key: &str, language: Language) -> String {
    lookup(table(language), key)
        .map(str::to_string)
        .unwrap_or_else(|| key.to_string())
}

fn lookup<'a>(root: &'a Value, key: &str) -> Option<&'a str> {
    key.split('.')
        .try_fold(root, |node, segment| node.get(segment))
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

/// String lookup bound to one request's language, with optional
/// store-backed overrides taking precedence over the static table.
#[derive(Debug, Clone)]
pub struct Localizer {
    language: Language,
    overrides: HashMap<String, String>,
}

impl Localizer {
    pub fn new(language: Language) -> Self {
        Localizer {
            language,
            overrides: HashMap::new(),
        }
    }

    /// Overrides in other languages are ignored.
    pub fn with_overrides(mut self, translations: &[Translation]) -> Self {
        self.overrides.extend(
            translations
                .iter()
                .filter(|t| t.language == self.language && !t.value.is_empty())
                .map(|t| (t.key.clone(), t.value.clone())),
        );
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn t(&self, key: &str) -> String {
        match self.overrides.get(key) {
            Some(value) => value.clone(),
            None => translate(key, self.language),
        }
    }

    /// Static table with overrides written into it at their dotted paths.
    pub fn strings(&self) -> Value {
        let mut strings = table(self.language).clone();
        for (key, value) in &self.overrides {
            insert_path(&mut strings, key, value);
        }
        strings
    }

    /// The named top-level sections of the table.
    pub fn sections(&self, names: &[&str]) -> Value {
        let strings = self.strings();
        let picked = names
            .iter()
            .filter_map(|name| strings.get(*name).map(|v| (name.to_string(), v.clone())))
            .collect();
        Value::Object(picked)
    }
}

fn insert_path(root: &mut Value, key: &str, value: &str) {
    let segments: Vec<&str> = key.split('.').collect();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut node = root;
    for segment in parents {
        if !node.is_object() {
            *node = Value::Object(Default::default());
        }
        node = match node {
            Value::Object(map) => map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Default::default())),
            _ => return,
        };
    }
    if !node.is_object() {
        *node = Value::Object(Default::default());
    }
    if let Value::Object(map) = node {
        map.insert(last.to_string(), Value::String(value.to_string()));
    }
}
