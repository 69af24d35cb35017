use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "bamsummary.toml";

/// Top-level configuration loaded from bamsummary.toml.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct SummaryConfig {
    pub tool: ToolConfig,
    pub run: RunConfig,
}

/// How the external statistics tool is invoked.
///
/// Each element of an argument template becomes exactly one argv entry after
/// `{threads}` and `{bam}` are substituted. Nothing goes through a shell.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub command: String,
    pub depth_args: Vec<String>,
    pub flagstat_args: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub threads: u32,
}

// --- Default implementations ---

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            command: "samtools".to_string(),
            depth_args: vec![
                "depth".to_string(),
                "-a".to_string(),
                "-@".to_string(),
                "{threads}".to_string(),
                "{bam}".to_string(),
            ],
            flagstat_args: vec![
                "flagstat".to_string(),
                "-@".to_string(),
                "{threads}".to_string(),
                "{bam}".to_string(),
            ],
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { threads: 2 }
    }
}

/// Errors from loading the config file.
#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "failed to read config {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse config {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

/// Load config from `path`.
///
/// When `explicit` is false a missing file yields the defaults; a file the
/// user named on the command line must exist.
pub fn load_config(path: &Path, explicit: bool) -> Result<SummaryConfig, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(SummaryConfig::default());
        }
        Err(e) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SummaryConfig::default();
        assert_eq!(config.tool.command, "samtools");
        assert_eq!(
            config.tool.depth_args,
            vec!["depth", "-a", "-@", "{threads}", "{bam}"]
        );
        assert_eq!(
            config.tool.flagstat_args,
            vec!["flagstat", "-@", "{threads}", "{bam}"]
        );
        assert_eq!(config.run.threads, 2);
    }

    #[test]
    fn test_missing_default_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join(DEFAULT_CONFIG_FILE), false).unwrap();
        assert_eq!(config.run.threads, 2);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("custom.toml"), true).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("custom.toml"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[tool]\ncommand = \"/opt/samtools/bin/samtools\"\n").unwrap();
        let config = load_config(&path, false).unwrap();
        assert_eq!(config.tool.command, "/opt/samtools/bin/samtools");
        assert_eq!(config.tool.flagstat_args[0], "flagstat");
        assert_eq!(config.run.threads, 2);
    }

    #[test]
    fn test_full_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(
            &path,
            r#"
[tool]
command = "samtools"
depth_args = ["depth", "-@", "{threads}", "{bam}"]
flagstat_args = ["flagstat", "{bam}"]

[run]
threads = 8
"#,
        )
        .unwrap();
        let config = load_config(&path, true).unwrap();
        assert_eq!(config.tool.depth_args.len(), 4);
        assert_eq!(config.tool.flagstat_args, vec!["flagstat", "{bam}"]);
        assert_eq!(config.run.threads, 8);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[run]\nthreads = \"many\"\n").unwrap();
        let err = load_config(&path, false).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("failed to parse config"));
    }
}
