//! User configuration via `~/.bibliophant.toml`.
//!
//! On first start a commented default file is written and `bib` stops, asking
//! the user to list a collection. To change settings, edit the file and
//! start again. `--root` names the collection directly and works without a
//! configuration file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, bail, Context as _, Result};
use serde::Deserialize;

use bibliophant_executor::{expand_tilde, Settings};

/// Default configuration file, relative to the home folder.
pub const CONFIG_FILE: &str = "~/.bibliophant.toml";

const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Contents of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Collection folders; the first is used unless `-c` names another.
    #[serde(default)]
    pub collections: Vec<String>,
    /// Program opening PDF files
    pub open_pdf: Option<String>,
    /// Program opening folders
    pub open_folder: Option<String>,
    /// Program deleting record folders
    pub delete_folder: Option<String>,
    /// Editor for record drafts
    pub editor: Option<String>,
    /// HTTP timeout of the importers in seconds
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// The default file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Bibliophant configuration
#
# Collection folders. The first one is opened unless `bib -c <name>` picks
# another by its folder name. Folders are created when missing.
collections = [
    # "~/papers",
]

# Programs the target path is appended to.
# open_pdf = "xdg-open"
# open_folder = "xdg-open"

# Program deleting record folders; by default they are removed directly.
# delete_folder = "rm -rf"

# Editor for record drafts; by default $EDITOR, then vi.
# editor = "vim"

# Timeout of Crossref and arXiv requests in seconds (default: 20).
# timeout_secs = 20
"#
    }

    /// Parse a configuration from TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read the configuration at `path`.
    ///
    /// A missing file is replaced by the default template, and an error
    /// telling the user to fill it in is returned.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).with_context(|| {
                format!("failed to write the default configuration '{}'", path.display())
            })?;
            bail!(
                "created the configuration file '{}'; add a collection folder to it and start again",
                path.display()
            );
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read the configuration '{}'", path.display()))?;
        Self::parse(&text)
            .with_context(|| format!("invalid configuration '{}'", path.display()))
    }

    /// The configuration and the collection folder to open.
    ///
    /// An explicit `root` wins over the configured collections, and then a
    /// missing file means the defaults instead of the template.
    pub fn locate(path: &Path, root: Option<&str>, name: Option<&str>) -> Result<(Self, PathBuf)> {
        match root {
            Some(root) => {
                let config = if path.exists() {
                    Self::load(path)?
                } else {
                    Self::default()
                };
                Ok((config, expand_tilde(root)))
            }
            None => {
                let config = Self::load(path)?;
                let root = config.collection(name)?;
                Ok((config, root))
            }
        }
    }

    /// The configured collection folders, with `~` expanded.
    pub fn collection_roots(&self) -> Vec<PathBuf> {
        self.collections.iter().map(|c| expand_tilde(c)).collect()
    }

    /// The collection named `name` (its folder name), or the first one.
    pub fn collection(&self, name: Option<&str>) -> Result<PathBuf> {
        let roots = self.collection_roots();
        match name {
            None => roots
                .into_iter()
                .next()
                .ok_or_else(|| anyhow!("no collection is configured")),
            Some(name) => roots
                .into_iter()
                .find(|root| root.file_name().and_then(|n| n.to_str()) == Some(name))
                .ok_or_else(|| anyhow!("there is no collection named '{}'", name)),
        }
    }

    /// External programs used by the commands.
    pub fn settings(&self) -> Settings {
        Settings {
            open_pdf: self.open_pdf.clone(),
            open_folder: self.open_folder.clone(),
            delete_folder: self.delete_folder.clone(),
        }
    }

    /// Editor for drafts: the configured one, then `$EDITOR`, then `vi`.
    pub fn editor(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok().filter(|e| !e.trim().is_empty()))
            .unwrap_or_else(|| "vi".to_string())
    }

    /// Timeout of importer requests.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
collections = ["/data/papers", "/data/other"]
open_pdf = "zathura"
open_folder = "xdg-open"
delete_folder = "rm -rf"
editor = "nano"
timeout_secs = 5
"#,
        )
        .unwrap();
        assert_eq!(config.collections.len(), 2);
        assert_eq!(config.editor(), "nano");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.settings().open_pdf.as_deref(), Some("zathura"));
        assert_eq!(config.settings().delete_folder.as_deref(), Some("rm -rf"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::parse("collections = [\"/data/papers\"]").unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(20));
        assert_eq!(config.settings(), Settings::default());
    }

    #[test]
    fn test_template_needs_a_collection() {
        // The template parses, but lists no collection yet
        let config = Config::parse(Config::default_toml()).unwrap();
        assert!(config.collections.is_empty());
        let err = config.collection(None).unwrap_err();
        assert_eq!(err.to_string(), "no collection is configured");
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(Config::parse("collections = [").is_err());
        assert!(Config::parse("collections = [\"/a\"]\ncolour = \"red\"").is_err());
    }

    #[test]
    fn test_collection_by_folder_name() {
        let config = Config::parse(r#"collections = ["/data/papers", "/data/other"]"#).unwrap();
        assert_eq!(config.collection(None).unwrap(), PathBuf::from("/data/papers"));
        assert_eq!(
            config.collection(Some("other")).unwrap(),
            PathBuf::from("/data/other")
        );
        assert_eq!(
            config.collection(Some("books")).unwrap_err().to_string(),
            "there is no collection named 'books'"
        );
    }

    #[test]
    fn test_missing_file_writes_template() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bibliophant.toml");

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("add a collection folder"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            Config::default_toml()
        );

        std::fs::write(&path, "collections = [\"/data/papers\"]").unwrap();
        assert_eq!(Config::load(&path).unwrap().collections, vec!["/data/papers"]);
    }

    #[test]
    fn test_root_without_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bibliophant.toml");

        let (config, root) = Config::locate(&path, Some("/data/papers"), None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(root, PathBuf::from("/data/papers"));
        assert!(!path.exists());
    }

    #[test]
    fn test_root_with_template_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bibliophant.toml");
        std::fs::write(&path, format!("{}open_pdf = \"zathura\"\n", Config::default_toml())).unwrap();

        let (config, root) = Config::locate(&path, Some("/data/papers"), None).unwrap();
        assert_eq!(config.settings().open_pdf.as_deref(), Some("zathura"));
        assert_eq!(root, PathBuf::from("/data/papers"));

        let err = Config::locate(&path, None, None).unwrap_err();
        assert_eq!(err.to_string(), "no collection is configured");
    }

    #[test]
    fn test_locate_picks_named_collection() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bibliophant.toml");
        std::fs::write(&path, r#"collections = ["/data/papers", "/data/other"]"#).unwrap();

        let (_, root) = Config::locate(&path, None, Some("other")).unwrap();
        assert_eq!(root, PathBuf::from("/data/other"));
        assert!(Config::locate(&dir.path().join("missing.toml"), None, None).is_err());
    }
}
