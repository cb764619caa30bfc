//! TOML configuration for artifact locations and output format.

use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use crate::artifacts::ArtifactPaths;
use crate::error::CardioError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArtifactSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputSection {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CardioConfig {
    #[serde(default)]
    pub artifacts: ArtifactSection,
    #[serde(default)]
    pub output: OutputSection,
}

impl CardioConfig {
    pub fn parse(text: &str) -> Result<Self, CardioError> {
        Ok(toml::from_str::<CardioConfig>(text)?)
    }

    /// Read a config file; relative artifact paths are taken from its directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CardioError> {
        let path = path.as_ref();
        let text = read_to_string(path).map_err(|source| CardioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&text)?;
        if let Some(dir) = path.parent() {
            config.artifacts.model = config.artifacts.model.map(|p| rebase(dir, p));
            config.artifacts.scaler = config.artifacts.scaler.map(|p| rebase(dir, p));
        }
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Explicit overrides win over the file, the file over the defaults.
    pub fn artifact_paths(&self, model: Option<PathBuf>, scaler: Option<PathBuf>) -> ArtifactPaths {
        let defaults = ArtifactPaths::default();
        ArtifactPaths {
            model: model
                .or_else(|| self.artifacts.model.clone())
                .unwrap_or(defaults.model),
            scaler: scaler
                .or_else(|| self.artifacts.scaler.clone())
                .unwrap_or(defaults.scaler),
        }
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn rebase(dir: &Path, p: PathBuf) -> PathBuf {
    if p.is_relative() {
        dir.join(p)
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_config_uses_defaults() {
        let c = CardioConfig::parse("").unwrap();
        assert_eq!(c, CardioConfig::default());
        assert_eq!(c.artifact_paths(None, None), ArtifactPaths::default());
    }

    #[test]
    fn parses_full_config() {
        let c = CardioConfig::parse(
            r#"
[artifacts]
model = "m/ann.json"
scaler = "m/scaler.json"

[output]
format = "json"
"#,
        )
        .unwrap();
        assert_eq!(c.output.format, OutputFormat::Json);
        assert_eq!(
            c.artifact_paths(None, None),
            ArtifactPaths::new("m/ann.json", "m/scaler.json")
        );
    }

    #[test]
    fn overrides_take_precedence() {
        let c = CardioConfig::parse("[artifacts]\nmodel = \"a.json\"\nscaler = \"b.json\"\n").unwrap();
        let paths = c.artifact_paths(Some(PathBuf::from("x.json")), None);
        assert_eq!(paths, ArtifactPaths::new("x.json", "b.json"));
    }

    #[test]
    fn unknown_sections_are_rejected() {
        let err = CardioConfig::parse("[model]\npath = \"a\"\n").unwrap_err();
        assert!(matches!(err, CardioError::Toml(_)));
    }

    #[test]
    fn relative_paths_follow_the_config_file() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let path = dir.path().join("cardiorisk.toml");
        std::fs::write(&path, "[artifacts]\nmodel = \"ann.json\"\nscaler = \"/abs/scaler.json\"\n")
            .expect("write");
        let c = CardioConfig::load(&path).unwrap();
        assert_eq!(c.artifacts.model, Some(dir.path().join("ann.json")));
        assert_eq!(c.artifacts.scaler, Some(PathBuf::from("/abs/scaler.json")));
    }

    #[test]
    fn round_trips_through_toml() {
        let c = CardioConfig {
            artifacts: ArtifactSection {
                model: Some(PathBuf::from("model.json")),
                scaler: None,
            },
            output: OutputSection {
                format: OutputFormat::Json,
            },
        };
        let text = c.to_toml().unwrap();
        assert_eq!(CardioConfig::parse(&text).unwrap(), c);
    }
}
