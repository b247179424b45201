use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::seed::sampled_positions;

///
/// Settings for a seed build, read from TOML:
///
/// ```toml
/// genome = "hg38.Zx3.genome.bin"
/// masks = ["111", "11_1_1"]
/// output_dir = "seeds"
/// threads = 4
/// write_text = true
/// ```
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedConfig {
    pub genome: PathBuf,
    pub masks: Vec<String>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    pub threads: Option<usize>,
    pub write_text: Option<bool>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl SeedConfig {
    pub fn write_text(&self) -> bool {
        self.write_text.unwrap_or(false)
    }

    /// Masks that would fail to build a seed, with the reason.
    pub fn invalid_masks(&self) -> Vec<(String, String)> {
        self.masks
            .iter()
            .filter_map(|m| sampled_positions(m).err().map(|e| (m.clone(), e.to_string())))
            .collect()
    }
}

impl TryFrom<&Path> for SeedConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config: SeedConfig = toml::from_str(&toml_str)?;
        if config.masks.is_empty() {
            return Err(ConfigError::NoMasks);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[rstest]
    fn test_full_config() {
        let file = config_file(
            r#"
genome = "toy.genome.bin"
masks = ["111", "1_1"]
output_dir = "out"
threads = 2
write_text = true
"#,
        );
        let config = SeedConfig::try_from(file.path()).unwrap();

        assert_eq!(config.genome, PathBuf::from("toy.genome.bin"));
        assert_eq!(config.masks, vec!["111", "1_1"]);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.threads, Some(2));
        assert!(config.write_text());
        assert!(config.invalid_masks().is_empty());
    }

    #[rstest]
    fn test_defaults() {
        let file = config_file("genome = \"g.bin\"\nmasks = [\"11\", \"0_0\"]\n");
        let config = SeedConfig::try_from(file.path()).unwrap();

        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.threads, None);
        assert!(!config.write_text());
        assert_eq!(config.invalid_masks().len(), 1);
        assert_eq!(config.invalid_masks()[0].0, "0_0");
    }

    #[rstest]
    fn test_no_masks() {
        let file = config_file("genome = \"g.bin\"\nmasks = []\n");
        assert!(matches!(
            SeedConfig::try_from(file.path()),
            Err(ConfigError::NoMasks)
        ));
    }

    #[rstest]
    fn test_missing_genome() {
        let file = config_file("masks = [\"11\"]\n");
        assert!(matches!(
            SeedConfig::try_from(file.path()),
            Err(ConfigError::Toml(_))
        ));
    }
}
