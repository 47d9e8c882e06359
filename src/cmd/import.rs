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

use crate::cmd::open_manager;
use crate::config::Config;
use crate::error::ErrorKind;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::set_name::SetName;

/// Parse a flashcard file, shuffle it into a fresh session, and save it.
pub fn import_file(config: &Config, file: &Path, name: Option<&str>) -> Fallible<SetName> {
    let text = read_to_string(file)?;
    let mut manager = open_manager(config)?;
    let count = manager.add_flashcards(&text)?;
    if count == 0 {
        return fail(ErrorKind::Parse, "no flashcards found.");
    }
    if let Some(name) = name {
        manager.rename(name)?;
    }
    let name = manager.save()?;
    println!("Imported {count} cards as \"{name}\".");
    Ok(name)
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    fn config(dir: &Path) -> Config {
        Config {
            database: dir.join("sets.db"),
            ..Config::default()
        }
    }

    #[test]
    fn test_import() -> Fallible<()> {
        let dir = tempdir()?;
        let config = config(dir.path());
        let file = dir.path().join("deck.txt");
        write(&file, "Flashcard 1\nQuestion: Who wrote Hamlet?\nAnswer: Shakespeare\n")?;
        let name = import_file(&config, &file, None)?;
        assert_eq!(name.as_str(), "Who_wrote_Hamlet_");
        let manager = open_manager(&config)?;
        assert_eq!(manager.saved_sets()?, vec![name]);
        Ok(())
    }

    #[test]
    fn test_import_with_name() -> Fallible<()> {
        let dir = tempdir()?;
        let config = config(dir.path());
        let file = dir.path().join("deck.txt");
        write(&file, "Flashcard 1\nQuestion: Q\nAnswer: A\n")?;
        let name = import_file(&config, &file, Some("my deck"))?;
        assert_eq!(name.as_str(), "my_deck");
        Ok(())
    }

    #[test]
    fn test_import_empty_file() -> Fallible<()> {
        let dir = tempdir()?;
        let config = config(dir.path());
        let file = dir.path().join("deck.txt");
        write(&file, "\n\n")?;
        let err = import_file(&config, &file, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        Ok(())
    }
}
