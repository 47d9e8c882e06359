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

pub mod check;
pub mod drill;
pub mod export;
pub mod import;
pub mod sets;

use crate::config::Config;
use crate::db::Database;
use crate::error::Fallible;
use crate::manager::Manager;
use crate::observer::LogObserver;

/// Open the configured store behind a session manager.
pub fn open_manager(config: &Config) -> Fallible<Manager<LogObserver>> {
    let db = Database::new(&config.database)?;
    Ok(Manager::new(db, LogObserver, config.parse_mode()))
}
