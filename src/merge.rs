//! Translation merge into an in-memory string catalog.
//!
//! Pure: no I/O. The caller decides whether to write based on
//! [`MergeReport::changed`].

use std::collections::BTreeMap;

use serde::{
    Deserialize,
    Serialize,
};

use crate::catalog::{
    CatalogEntry,
    Localization,
    StringCatalog,
};

/// One desired translation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationUpdate {
    pub key: String,

    /// Default-language text. Only used when the key is new.
    #[serde(rename = "value")]
    pub default_value: String,

    /// Secondary-language text.
    #[serde(rename = "translation")]
    pub secondary_value: String,
}

impl TranslationUpdate {
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        default_value: impl Into<String>,
        secondary_value: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            default_value: default_value.into(),
            secondary_value: secondary_value.into(),
        }
    }
}

/// Default and secondary language codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePair {
    pub default: String,
    pub secondary: String,
}

impl LanguagePair {
    #[must_use]
    pub fn new(default: &str, secondary: &str) -> Self {
        Self { default: default.to_string(), secondary: secondary.to_string() }
    }
}

impl Default for LanguagePair {
    fn default() -> Self {
        Self::new("en", "ru")
    }
}

/// What happened to one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeAction {
    /// Key was absent; added with both languages.
    Inserted,
    /// Key existed without a secondary localization.
    AddedSecondary,
    /// Secondary value differed and was overwritten.
    UpdatedSecondary { previous: String },
    /// Already up to date.
    Unchanged,
    /// Left untouched because the existing localization has no plain value.
    Skipped { reason: String },
}

impl MergeAction {
    /// カタログを変更したか
    #[must_use]
    pub const fn is_change(&self) -> bool {
        matches!(self, Self::Inserted | Self::AddedSecondary | Self::UpdatedSecondary { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyOutcome {
    pub key: String,
    pub action: MergeAction,
}

/// Result of [`merge_translations`], one outcome per update in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub outcomes: Vec<KeyOutcome>,
}

impl MergeReport {
    #[must_use]
    pub fn changed(&self) -> bool {
        self.outcomes.iter().any(|outcome| outcome.action.is_change())
    }

    /// Outcomes that modified the catalog.
    pub fn changes(&self) -> impl Iterator<Item = &KeyOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.action.is_change())
    }

    pub fn skipped(&self) -> impl Iterator<Item = &KeyOutcome> {
        self.outcomes.iter().filter(|outcome| matches!(outcome.action, MergeAction::Skipped { .. }))
    }

    #[must_use]
    pub fn action_for(&self, key: &str) -> Option<&MergeAction> {
        self.outcomes.iter().find(|outcome| outcome.key == key).map(|outcome| &outcome.action)
    }
}

/// Reconcile `updates` into `catalog`.
///
/// Existing default-language values are never touched; only brand-new keys
/// get one. Secondary values are compared by value alone and overwritten in
/// place, keeping whatever `state` they had.
pub fn merge_translations(
    catalog: &mut StringCatalog,
    updates: &[TranslationUpdate],
    languages: &LanguagePair,
) -> MergeReport {
    let outcomes = updates
        .iter()
        .map(|update| {
            let action = merge_one(catalog, update, languages);
            tracing::debug!(key = %update.key, ?action, "Merged translation");
            KeyOutcome { key: update.key.clone(), action }
        })
        .collect();

    MergeReport { outcomes }
}

/// 1 件の更新を適用する
fn merge_one(
    catalog: &mut StringCatalog,
    update: &TranslationUpdate,
    languages: &LanguagePair,
) -> MergeAction {
    let Some(entry) = catalog.strings.get_mut(&update.key) else {
        let localizations = BTreeMap::from([
            (languages.default.clone(), Localization::translated(&update.default_value)),
            (languages.secondary.clone(), Localization::translated(&update.secondary_value)),
        ]);
        catalog.strings.insert(update.key.clone(), CatalogEntry::manual(localizations));
        return MergeAction::Inserted;
    };

    let localizations = entry.localizations.get_or_insert_with(BTreeMap::new);

    let Some(secondary) = localizations.get_mut(&languages.secondary) else {
        localizations
            .insert(languages.secondary.clone(), Localization::translated(&update.secondary_value));
        return MergeAction::AddedSecondary;
    };

    let Some(unit) = secondary.string_unit.as_mut() else {
        return MergeAction::Skipped {
            reason: format!("'{}' localization has no stringUnit", languages.secondary),
        };
    };

    if unit.value == update.secondary_value {
        return MergeAction::Unchanged;
    }

    let previous = std::mem::replace(&mut unit.value, update.secondary_value.clone());
    MergeAction::UpdatedSecondary { previous }
}
