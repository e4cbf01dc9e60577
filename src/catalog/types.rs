//! String catalog (`.xcstrings`) data model.
//!
//! Only the members the merge touches are typed. Everything else
//! (`sourceLanguage`, `comment`, `variations`, ...) rides along in the
//! flattened `extra` maps so a rewrite never drops data.

use std::collections::BTreeMap;

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::{
    Map,
    Value,
};

/// `extractionState` written for keys added by this tool.
pub const EXTRACTION_STATE_MANUAL: &str = "manual";

/// `stringUnit.state` written for values supplied by this tool.
pub const STATE_TRANSLATED: &str = "translated";

/// Top-level catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct StringCatalog {
    pub strings: BTreeMap<String, CatalogEntry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One localizable key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localizations: Option<BTreeMap<String, Localization>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A key's translation for one language.
///
/// Plural or device variants carry `variations` instead of a `stringUnit`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Localization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_unit: Option<StringUnit>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A plain string value.
///
/// `state` is optional on read; an absent state stays absent on write.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StringUnit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    pub value: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StringUnit {
    #[must_use]
    pub fn translated(value: impl Into<String>) -> Self {
        Self { state: Some(STATE_TRANSLATED.to_string()), value: value.into(), extra: Map::new() }
    }
}

impl Localization {
    #[must_use]
    pub fn translated(value: impl Into<String>) -> Self {
        Self { string_unit: Some(StringUnit::translated(value)), extra: Map::new() }
    }

    /// `stringUnit.value`, if this localization is a plain string.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.string_unit.as_ref().map(|unit| unit.value.as_str())
    }
}

impl CatalogEntry {
    /// Entry for a key that did not exist in the catalog before.
    #[must_use]
    pub fn manual(localizations: BTreeMap<String, Localization>) -> Self {
        Self {
            extraction_state: Some(EXTRACTION_STATE_MANUAL.to_string()),
            localizations: Some(localizations),
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn localization(&self, language: &str) -> Option<&Localization> {
        self.localizations.as_ref()?.get(language)
    }
}

impl StringCatalog {
    #[must_use]
    pub fn entry(&self, key: &str) -> Option<&CatalogEntry> {
        self.strings.get(key)
    }

    /// `strings[key].localizations[language].stringUnit.value`
    #[must_use]
    pub fn value(&self, key: &str, language: &str) -> Option<&str> {
        self.entry(key)?.localization(language)?.value()
    }
}
