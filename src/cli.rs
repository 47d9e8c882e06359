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
use std::path::PathBuf;

use clap::Parser;

use crate::cmd::check::check_path;
use crate::cmd::drill::server::start_server;
use crate::cmd::export::export_set;
use crate::cmd::import::import_file;
use crate::cmd::sets::list_sets;
use crate::config::Config;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Drill flashcards in the browser.
    Drill {
        /// Path to the config file. Defaults to `flashset.toml`.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Port to serve on. Overrides the config file.
        #[arg(long)]
        port: Option<u16>,
        /// Flashcard file to start with, instead of the last saved set.
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Check that flashcard files parse.
    Check {
        /// A flashcard file, or a directory of `.txt` files.
        path: PathBuf,
    },
    /// Parse a flashcard file and save it as a set.
    Import {
        file: PathBuf,
        /// Set name. Defaults to the start of the first question.
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List saved sets.
    Sets {
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Write a saved set's cards to `<NAME>.json`.
    Export {
        name: String,
        /// Directory to write to. Defaults to the working directory.
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Drill {
            config,
            port,
            input,
        } => {
            let mut config = Config::load(config.as_deref())?;
            if let Some(port) = port {
                config.port = port;
            }
            let preload = match input {
                Some(path) => Some(read_to_string(path)?),
                None => None,
            };
            start_server(config, preload).await
        }
        Command::Check { path } => {
            check_path(&path)?;
            Ok(())
        }
        Command::Import { file, name, config } => {
            let config = Config::load(config.as_deref())?;
            import_file(&config, &file, name.as_deref())?;
            Ok(())
        }
        Command::Sets { config } => {
            let config = Config::load(config.as_deref())?;
            list_sets(&config)?;
            Ok(())
        }
        Command::Export {
            name,
            output,
            config,
        } => {
            let config = Config::load(config.as_deref())?;
            export_set(&config, &name, output)?;
            Ok(())
        }
    }
}
