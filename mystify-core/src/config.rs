use crate::error::ConfigError;
use crate::rules::RuleName;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_chapters_dir() -> PathBuf {
    PathBuf::from("chapters")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("sphinx").join("source")
}

fn default_readme_path() -> PathBuf {
    PathBuf::from("README.md")
}

fn default_chapter_extension() -> Option<String> {
    Some("md".to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MystifyConfig {
    /// Pipeline configuration - defines which rules to run and in what order
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Passthrough mode - bypasses every rule, only paragraph spacing is normalised
    #[serde(default)]
    pub passthrough: bool,
    /// Write the raw concatenation of all chapters to `paths.readme_path`
    #[serde(default = "default_true")]
    pub combine_readme: bool,
    /// Run the whole conversion but write nothing
    #[serde(default)]
    pub dry_run: bool,
    /// Directory layout, relative to the project root
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// List of rules to run in order
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Name of the rule
    pub name: String,
    /// Whether this rule is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl RuleConfig {
    pub fn new(name: RuleName) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rules: RuleName::ALL.iter().copied().map(RuleConfig::new).collect(),
        }
    }
}

impl PipelineConfig {
    /// Enabled rules in table order.
    ///
    /// Every entry is checked, disabled ones included, so a typo in a rule
    /// that is switched off still surfaces.
    pub fn enabled_rules(&self) -> Result<Vec<RuleName>, ConfigError> {
        let mut seen = HashSet::new();
        let mut enabled = Vec::new();

        for rule_config in &self.rules {
            let name: RuleName = rule_config.name.parse()?;
            if !seen.insert(name) {
                return Err(ConfigError::DuplicateRule(rule_config.name.clone()));
            }
            if rule_config.enabled {
                enabled.push(name);
            }
        }

        Ok(enabled)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the source chapters
    #[serde(default = "default_chapters_dir")]
    pub chapters_dir: PathBuf,
    /// Directory receiving the converted chapters (same file names)
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Destination of the combined, unconverted README
    #[serde(default = "default_readme_path")]
    pub readme_path: PathBuf,
    /// Only files with this extension are chapters; `null` accepts every file
    #[serde(default = "default_chapter_extension")]
    pub chapter_extension: Option<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            chapters_dir: default_chapters_dir(),
            output_dir: default_output_dir(),
            readme_path: default_readme_path(),
            chapter_extension: default_chapter_extension(),
        }
    }
}

/// Directory layout anchored at a concrete project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPaths {
    pub chapters_dir: PathBuf,
    pub output_dir: PathBuf,
    pub readme_path: PathBuf,
    pub chapter_extension: Option<String>,
}

impl PathsConfig {
    /// Anchor relative paths at `root`. Absolute paths are kept as they are.
    pub fn resolve(&self, root: &Path) -> ResolvedPaths {
        ResolvedPaths {
            chapters_dir: root.join(&self.chapters_dir),
            output_dir: root.join(&self.output_dir),
            readme_path: root.join(&self.readme_path),
            chapter_extension: self.chapter_extension.clone(),
        }
    }
}

impl ResolvedPaths {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chapters_dir == self.output_dir {
            return Err(ConfigError::OutputOverlapsInput(
                self.chapters_dir.display().to_string(),
            ));
        }
        // A README under the chapters directory would be listed as a chapter next run
        if self.readme_path.starts_with(&self.chapters_dir) {
            return Err(ConfigError::ReadmeInsideChapters(
                self.readme_path.display().to_string(),
            ));
        }
        Ok(())
    }
}

impl MystifyConfig {
    /// Load config from file path
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Check everything that can be checked without touching the file system.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pipeline.enabled_rules()?;
        Ok(())
    }
}

impl Default for MystifyConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            passthrough: false,
            combine_readme: true,
            dry_run: false,
            paths: PathsConfig::default(),
        }
    }
}
