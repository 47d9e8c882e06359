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

use crate::cmd::open_manager;
use crate::config::Config;
use crate::error::Fallible;

/// Print every saved set with its save time, then the size of the latest
/// wrong list. Returns the lines printed.
pub fn list_sets(config: &Config) -> Fallible<Vec<String>> {
    let manager = open_manager(config)?;
    let sets = manager.saved_set_times()?;
    let mut lines = Vec::new();
    if sets.is_empty() {
        lines.push("No saved flashcard sets found.".to_string());
    } else {
        for (name, saved_at) in sets {
            lines.push(format!("{name}\t(saved {saved_at})"));
        }
    }
    let wrong = manager.stored_wrong_list()?;
    if !wrong.is_empty() {
        lines.push(format!("Latest wrong list: {} cards.", wrong.len()));
    }
    for line in &lines {
        println!("{line}");
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_list_empty_store() -> Fallible<()> {
        let dir = tempdir()?;
        let config = Config {
            database: dir.path().join("sets.db"),
            ..Config::default()
        };
        assert_eq!(list_sets(&config)?, vec!["No saved flashcard sets found."]);
        Ok(())
    }

    #[test]
    fn test_list_after_save() -> Fallible<()> {
        let dir = tempdir()?;
        let config = Config {
            database: dir.path().join("sets.db"),
            ..Config::default()
        };
        {
            let mut manager = open_manager(&config)?;
            manager.add_flashcards("Flashcard 1\nQuestion: First\nAnswer: A1\n")?;
            manager.save()?;
            manager.add_flashcards("Flashcard 1\nQuestion: Second\nAnswer: A2\n")?;
            manager.grade_wrong()?;
            manager.save()?;
        }
        let lines = list_sets(&config)?;
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("First\t(saved "));
        assert!(lines[1].starts_with("Second\t(saved "));
        assert_eq!(lines[2], "Latest wrong list: 1 cards.");
        Ok(())
    }
}
