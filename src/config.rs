// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Fallible;
use crate::parser::ParseMode;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = "flashset.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Port the drill server listens on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path to the SQLite file holding saved sets.
    #[serde(default = "default_database")]
    pub database: PathBuf,
    /// How long a missed card's answer stays up before moving on.
    #[serde(default = "default_auto_advance_ms")]
    pub auto_advance_ms: u64,
    /// Whether `drill` opens a browser tab.
    #[serde(default = "default_open_browser")]
    pub open_browser: bool,
    #[serde(default)]
    pub parser: ParserConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParserConfig {
    /// Skip malformed blocks instead of rejecting the whole input.
    #[serde(default)]
    pub skip_malformed: bool,
}

fn default_port() -> u16 {
    8000
}

fn default_database() -> PathBuf {
    PathBuf::from("flashset.db")
}

fn default_auto_advance_ms() -> u64 {
    2000
}

fn default_open_browser() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            database: default_database(),
            auto_advance_ms: default_auto_advance_ms(),
            open_browser: default_open_browser(),
            parser: ParserConfig::default(),
        }
    }
}

impl Config {
    /// Load the config from `path`, or from `flashset.toml` in the working
    /// directory. A missing default file is not an error; a missing
    /// explicit one is.
    pub fn load(path: Option<&Path>) -> Fallible<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    log::debug!("No config file, using defaults.");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Fallible<Self> {
        log::debug!("Reading config from {}", path.display());
        let content = read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Fallible<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn auto_advance_delay(&self) -> Duration {
        Duration::from_millis(self.auto_advance_ms)
    }

    pub fn parse_mode(&self) -> ParseMode {
        if self.parser.skip_malformed {
            ParseMode::Lenient
        } else {
            ParseMode::Strict
        }
    }
}
