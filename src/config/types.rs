use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::merge::{
    LanguagePair,
    TranslationUpdate,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "translations.updates[0].key")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// 番号付きの一覧にする
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpsSettings {
    pub translations: TranslationSettings,
    pub migration: MigrationSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationSettings {
    /// String catalog path, relative to the workspace root.
    pub file_path: String,

    /// Language whose value is only written for brand-new keys.
    pub default_language: String,

    /// Language that is backfilled or refreshed on every run.
    pub secondary_language: String,

    /// Replaces the built-in update set when present.
    pub updates: Option<Vec<TranslationUpdate>>,
}

impl TranslationSettings {
    #[must_use]
    pub fn language_pair(&self) -> LanguagePair {
        LanguagePair::new(&self.default_language, &self.secondary_language)
    }
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            file_path: "Ezcar24Business/Localizable.xcstrings".to_string(),
            default_language: "en".to_string(),
            secondary_language: "ru".to_string(),
            updates: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MigrationSettings {
    /// Environment variable holding the project URL.
    pub url_env: String,

    /// Environment variable holding the service-role key.
    pub service_key_env: String,

    /// Postgres function exposed over PostgREST that executes raw SQL.
    pub rpc_function: String,

    /// Dashboard link shown in the manual instructions.
    /// Falls back to the project URL when unset.
    pub dashboard_url: Option<String>,
}

impl Default for MigrationSettings {
    fn default() -> Self {
        Self {
            url_env: "SUPABASE_URL".to_string(),
            service_key_env: "SUPABASE_SERVICE_ROLE_KEY".to_string(),
            rpc_function: "exec_sql".to_string(),
            dashboard_url: None,
        }
    }
}

impl OpsSettings {
    /// # Errors
    /// - Required field is empty
    /// - Default and secondary language are the same
    /// - Duplicate or empty update keys
    /// - Invalid dashboard URL
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        self.translations.validate_into(&mut errors);
        self.migration.validate_into(&mut errors);

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl TranslationSettings {
    /// `translations.*` の検証結果を `errors` に追加する
    fn validate_into(&self, errors: &mut Vec<ValidationError>) {
        if self.file_path.trim().is_empty() {
            errors.push(ValidationError::new(
                "translations.filePath",
                "The path cannot be empty. Example: \"Ezcar24Business/Localizable.xcstrings\"",
            ));
        }

        for (field, code) in [
            ("translations.defaultLanguage", &self.default_language),
            ("translations.secondaryLanguage", &self.secondary_language),
        ] {
            if code.trim().is_empty() {
                errors.push(ValidationError::new(
                    field,
                    "The language code cannot be empty. Example: \"en\"",
                ));
            }
        }

        if !self.default_language.is_empty() && self.default_language == self.secondary_language {
            errors.push(ValidationError::new(
                "translations.secondaryLanguage",
                format!(
                    "Must differ from 'defaultLanguage' (both are \"{}\")",
                    self.secondary_language
                ),
            ));
        }

        let Some(updates) = &self.updates else {
            return;
        };

        let mut seen = std::collections::HashSet::new();
        for (index, update) in updates.iter().enumerate() {
            if update.key.is_empty() {
                errors.push(ValidationError::new(
                    format!("translations.updates[{index}].key"),
                    "The key cannot be empty",
                ));
            } else if !seen.insert(update.key.as_str()) {
                errors.push(ValidationError::new(
                    format!("translations.updates[{index}].key"),
                    format!("Duplicate key '{}'", update.key),
                ));
            }
        }
    }
}

impl MigrationSettings {
    /// `migration.*` の検証結果を `errors` に追加する
    fn validate_into(&self, errors: &mut Vec<ValidationError>) {
        for (field, value) in [
            ("migration.urlEnv", &self.url_env),
            ("migration.serviceKeyEnv", &self.service_key_env),
            ("migration.rpcFunction", &self.rpc_function),
        ] {
            if value.trim().is_empty() {
                errors.push(ValidationError::new(field, "The value cannot be empty"));
            }
        }

        if let Some(dashboard_url) = &self.dashboard_url
            && let Err(e) = url::Url::parse(dashboard_url)
        {
            errors.push(ValidationError::new(
                "migration.dashboardUrl",
                format!("Invalid URL '{dashboard_url}': {e}"),
            ));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn validate_valid_settings() {
        let settings = OpsSettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{"translations": {"secondaryLanguage": "ar"}}"#;

        let settings: OpsSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.translations.default_language, eq("en"));
        assert_that!(settings.translations.secondary_language, eq("ar"));
        assert_that!(settings.migration.rpc_function, eq("exec_sql"));
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let settings: OpsSettings = serde_json::from_str("{}").unwrap();

        assert_that!(
            settings.translations.file_path,
            eq("Ezcar24Business/Localizable.xcstrings")
        );
        assert_that!(settings.translations.updates, none());
        assert_that!(settings.migration.url_env, eq("SUPABASE_URL"));
        assert_that!(settings.migration.service_key_env, eq("SUPABASE_SERVICE_ROLE_KEY"));
    }

    #[rstest]
    fn deserialize_custom_updates() {
        let json = r#"{"translations": {"updates": [
            {"key": "done", "value": "Done", "translation": "Готово"}
        ]}}"#;

        let settings: OpsSettings = serde_json::from_str(json).unwrap();
        let updates = settings.translations.updates.unwrap();

        assert_that!(
            updates,
            elements_are![all![
                field!(TranslationUpdate.key, eq("done")),
                field!(TranslationUpdate.default_value, eq("Done")),
                field!(TranslationUpdate.secondary_value, eq("Готово"))
            ]]
        );
    }

    #[rstest]
    fn validate_empty_file_path() {
        let settings = OpsSettings {
            translations: TranslationSettings {
                file_path: "  ".to_string(),
                ..TranslationSettings::default()
            },
            ..OpsSettings::default()
        };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("translations.filePath")),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    #[rstest]
    fn validate_same_languages() {
        let settings = OpsSettings {
            translations: TranslationSettings {
                secondary_language: "en".to_string(),
                ..TranslationSettings::default()
            },
            ..OpsSettings::default()
        };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("translations.secondaryLanguage")),
                field!(ValidationError.message, contains_substring("Must differ"))
            ]])
        );
    }

    #[rstest]
    fn validate_duplicate_update_keys() {
        let settings = OpsSettings {
            translations: TranslationSettings {
                updates: Some(vec![
                    TranslationUpdate::new("done", "Done", "Готово"),
                    TranslationUpdate::new("", "Empty", "Пусто"),
                    TranslationUpdate::new("done", "Done!", "Готово!"),
                ]),
                ..TranslationSettings::default()
            },
            ..OpsSettings::default()
        };

        assert_that!(
            settings.validate(),
            err(elements_are![
                all![
                    field!(ValidationError.field_path, eq("translations.updates[1].key")),
                    field!(ValidationError.message, contains_substring("cannot be empty"))
                ],
                all![
                    field!(ValidationError.field_path, eq("translations.updates[2].key")),
                    field!(ValidationError.message, contains_substring("Duplicate key 'done'"))
                ]
            ])
        );
    }

    #[rstest]
    fn validate_invalid_dashboard_url() {
        let settings = OpsSettings {
            migration: MigrationSettings {
                dashboard_url: Some("not a url".to_string()),
                ..MigrationSettings::default()
            },
            ..OpsSettings::default()
        };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("migration.dashboardUrl")),
                field!(ValidationError.message, contains_substring("Invalid URL"))
            ]])
        );
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = OpsSettings {
            translations: TranslationSettings {
                file_path: String::new(),
                ..TranslationSettings::default()
            },
            migration: MigrationSettings {
                rpc_function: String::new(),
                ..MigrationSettings::default()
            },
        };

        let errors = settings.validate().unwrap_err();
        let config_error = ConfigError::ValidationErrors(errors);

        let error_message = format!("{config_error}");
        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. translations.filePath"));
        assert_that!(error_message, contains_substring("2. migration.rpcFunction"));
    }
}
