use std::path::{Path, PathBuf};

use anyhow::Context;

use super::errors::CoreError;
use super::models::ExtractorSettings;

/// Overrides the settings file location.
pub const SETTINGS_PATH_ENV: &str = "CV_TAGGER_SETTINGS";

pub struct SettingsStore {
    file_path: PathBuf,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self {
            file_path: settings_path(),
        }
    }

    pub fn at(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Settings from disk, or the defaults when no file exists yet.
    pub async fn load(&self) -> anyhow::Result<ExtractorSettings> {
        if !tokio::fs::try_exists(&self.file_path)
            .await
            .unwrap_or(false)
        {
            tracing::debug!(path = %self.file_path.display(), "no settings file, using defaults");
            return Ok(ExtractorSettings::default());
        }

        let content = tokio::fs::read_to_string(&self.file_path)
            .await
            .with_context(|| {
                format!("failed to read settings file {}", self.file_path.display())
            })?;

        let parsed = serde_json::from_str::<ExtractorSettings>(&content).map_err(|err| {
            CoreError::InvalidSettings {
                path: self.file_path.display().to_string(),
                reason: err.to_string(),
            }
        })?;

        Ok(parsed.sanitized())
    }

    pub async fn save(&self, settings: &ExtractorSettings) -> anyhow::Result<()> {
        if let Some(parent) = self.file_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&settings.clone().sanitized())?;
        tokio::fs::write(&self.file_path, json)
            .await
            .with_context(|| format!("failed to write settings file {}", self.file_path.display()))?;
        Ok(())
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

fn settings_path() -> PathBuf {
    match std::env::var_os(SETTINGS_PATH_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => app_data_root().join("engine-settings.json"),
    }
}

pub fn app_data_root() -> PathBuf {
    if let Some(path) = dirs::data_dir() {
        return path.join("CvTagEngine");
    }

    PathBuf::from(".").join("CvTagEngine")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::at(dir.path().join("engine-settings.json"));
        assert_eq!(store.load().await.unwrap(), ExtractorSettings::default());
    }

    #[tokio::test]
    async fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::at(dir.path().join("nested").join("engine-settings.json"));
        let settings = ExtractorSettings {
            default_calling_code: "65".to_string(),
            max_concurrent_documents: 8,
            ..ExtractorSettings::default()
        };

        store.save(&settings).await.unwrap();
        assert_eq!(store.load().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn partial_files_are_filled_and_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine-settings.json");
        tokio::fs::write(&path, r#"{"skillsWindow": 0, "maxConcurrentDocuments": 0}"#)
            .await
            .unwrap();

        let loaded = SettingsStore::at(&path).load().await.unwrap();
        assert_eq!(loaded.skills_window, 1);
        assert_eq!(loaded.max_concurrent_documents, 1);
        assert_eq!(loaded.name_scan_lines, 5);
    }

    #[tokio::test]
    async fn invalid_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine-settings.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let err = SettingsStore::at(&path).load().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::InvalidSettings { .. })
        ));
        assert!(err.to_string().contains("engine-settings.json"));
    }
}
