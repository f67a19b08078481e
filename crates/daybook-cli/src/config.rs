//! CLI configuration: where notes, durable state, and the remote folder live.

use std::env;
use std::path::PathBuf;

const ENV_DATA_DIR: &str = "DAYBOOK_DIR";
const ENV_REMOTE_DIR: &str = "DAYBOOK_REMOTE_DIR";
const ENV_OWNER: &str = "DAYBOOK_OWNER";

/// Resolved CLI configuration.
#[derive(Clone, Debug)]
pub struct CliConfig {
    /// Directory of local `<id>.txt` note files
    pub notes_dir: PathBuf,
    /// JSON file carrying the tombstone set and last-sync time
    pub state_path: PathBuf,
    /// Remote folder (e.g. mounted drive directory); sync needs this
    pub remote_dir: Option<PathBuf>,
    /// Stable owner identifier keying the remote container
    pub owner_key: String,
}

impl CliConfig {
    /// Resolve configuration from flags, environment, and defaults.
    ///
    /// Precedence per value: flag, then environment variable, then default.
    #[must_use]
    pub fn resolve(data_dir: Option<PathBuf>, remote_dir: Option<PathBuf>) -> Self {
        let data_dir = data_dir
            .or_else(|| env::var_os(ENV_DATA_DIR).map(PathBuf::from))
            .unwrap_or_else(default_data_dir);
        let remote_dir = remote_dir.or_else(|| env::var_os(ENV_REMOTE_DIR).map(PathBuf::from));
        let owner_key = env::var(ENV_OWNER)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "default".to_string());

        Self {
            notes_dir: data_dir.join("notes"),
            state_path: data_dir.join("state.json"),
            remote_dir,
            owner_key,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(".daybook"), |dir| dir.join("daybook"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flag_overrides_default() {
        let config = CliConfig::resolve(Some(PathBuf::from("/tmp/db")), None);
        assert_eq!(config.notes_dir, PathBuf::from("/tmp/db/notes"));
        assert_eq!(config.state_path, PathBuf::from("/tmp/db/state.json"));
    }

    #[test]
    fn test_remote_dir_flag() {
        let config =
            CliConfig::resolve(Some(PathBuf::from("/tmp/db")), Some(PathBuf::from("/mnt/drive")));
        assert_eq!(config.remote_dir, Some(PathBuf::from("/mnt/drive")));
    }
}
