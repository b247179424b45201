use std::env;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One record of who ran what, where and when. Chains of these are kept
/// most-recent-first on every persisted artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunParameters {
    pub started: DateTime<Utc>,
    pub tool: String,
    pub version: String,
    pub command_line: Vec<String>,
    pub working_dir: String,
    pub user: String,
    pub host: String,
}

impl RunParameters {
    ///
    /// Capture the parameters of the current process.
    ///
    /// # Arguments
    /// - tool: name of the tool recording the run
    /// - version: version of that tool
    pub fn capture(tool: &str, version: &str) -> Self {
        let working_dir = env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| String::from("unknown"));

        RunParameters {
            started: Utc::now(),
            tool: tool.to_string(),
            version: version.to_string(),
            command_line: env::args().collect(),
            working_dir,
            user: env_or_unknown(&["USER", "USERNAME"]),
            host: env_or_unknown(&["HOSTNAME", "COMPUTERNAME"]),
        }
    }
}

fn env_or_unknown(keys: &[&str]) -> String {
    keys.iter()
        .find_map(|k| env::var(k).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| String::from("unknown"))
}

/// Put `record` at the head of a provenance chain.
pub fn prepend(chain: &mut Vec<RunParameters>, record: RunParameters) {
    chain.insert(0, record);
}
