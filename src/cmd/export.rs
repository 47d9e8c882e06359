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

use std::env::current_dir;
use std::fs::write;
use std::path::PathBuf;

use crate::cmd::open_manager;
use crate::config::Config;
use crate::error::Fallible;
use crate::manager::Export;

/// Write a saved set's cards to `<name>.json` in `output` (default: the
/// working directory). Returns the path written.
pub fn export_set(config: &Config, name: &str, output: Option<PathBuf>) -> Fallible<PathBuf> {
    let mut manager = open_manager(config)?;
    manager.load_set(name)?;
    let Export { file_name, json } = manager.export_deck()?;
    let directory = match output {
        Some(dir) => dir,
        None => current_dir()?,
    };
    let path = directory.join(file_name);
    write(&path, json)?;
    println!("Wrote {}.", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::fs::read_to_string;

    use tempfile::tempdir;

    use super::*;
    use crate::error::ErrorKind;
    use crate::types::card::Card;

    #[test]
    fn test_export_set() -> Fallible<()> {
        let dir = tempdir()?;
        let config = Config {
            database: dir.path().join("sets.db"),
            ..Config::default()
        };
        {
            let mut manager = open_manager(&config)?;
            manager.add_flashcards("Flashcard 1\nQuestion: Q1\nAnswer: A1\nFlashcard 2\nQuestion: Q2\nAnswer: A2\n")?;
            manager.save()?;
        }
        let path = export_set(&config, "Q1", Some(dir.path().to_path_buf()))?;
        assert_eq!(path, dir.path().join("Q1.json"));
        let cards: Vec<Card> = serde_json::from_str(&read_to_string(&path)?)?;
        assert_eq!(cards.len(), 2);
        Ok(())
    }

    #[test]
    fn test_export_missing_set() -> Fallible<()> {
        let dir = tempdir()?;
        let config = Config {
            database: dir.path().join("sets.db"),
            ..Config::default()
        };
        let err = export_set(&config, "nope", Some(dir.path().to_path_buf())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        Ok(())
    }
}
