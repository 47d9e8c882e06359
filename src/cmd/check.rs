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

use walkdir::WalkDir;

use crate::error::ErrorKind;
use crate::error::Fallible;
use crate::error::fail;
use crate::parser::ParseMode;
use crate::parser::parse_flashcards;

/// Flashcard files are plain text.
const EXTENSION: &str = "txt";

/// Parse a flashcard file, or every `.txt` file under a directory, and
/// report how many cards each holds. Fails if any file is malformed.
pub fn check_path(path: &Path) -> Fallible<usize> {
    if !path.exists() {
        return fail(ErrorKind::Io, "path does not exist.");
    }
    let files = collect_files(path)?;
    let mut total = 0;
    let mut failures = 0;
    for file in files {
        let content = read_to_string(&file)?;
        match parse_flashcards(&content, ParseMode::Strict) {
            Ok(cards) => {
                println!("{}: {} cards", file.display(), cards.len());
                total += cards.len();
            }
            Err(e) => {
                println!("{}: {}", file.display(), e.message());
                failures += 1;
            }
        }
    }
    if failures > 0 {
        return fail(
            ErrorKind::Parse,
            format!("{failures} file(s) failed to parse."),
        );
    }
    println!("ok");
    Ok(total)
}

fn collect_files(path: &Path) -> Fallible<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == EXTENSION) {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}
