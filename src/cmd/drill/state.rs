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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::time::Duration;

use tokio::task::AbortHandle;

use crate::manager::Manager;
use crate::observer::LogObserver;

#[derive(Clone)]
pub struct ServerState {
    pub port: u16,
    pub auto_advance: Duration,
    pub mutable: Arc<Mutex<MutableState>>,
}

pub struct MutableState {
    pub manager: Manager<LogObserver>,
    /// Whether the current card's answer is on screen.
    pub reveal: bool,
    /// Whether the saved-set picker is open.
    pub show_sets: bool,
    /// One-shot notice shown on the next render.
    pub message: Option<String>,
    /// The timer task for the pending auto-advance, if any.
    pub advance: Option<AbortHandle>,
}

impl ServerState {
    pub fn lock(&self) -> MutexGuard<'_, MutableState> {
        lock(&self.mutable)
    }
}

/// Lock the mutable state. A panic in another handler does not leave the
/// session half-updated, since every manager operation is atomic, so a
/// poisoned lock is still safe to use.
pub fn lock(mutable: &Mutex<MutableState>) -> MutexGuard<'_, MutableState> {
    mutable.lock().unwrap_or_else(PoisonError::into_inner)
}
