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
use std::time::Duration;

use tokio::time::sleep;

use crate::cmd::drill::state::MutableState;
use crate::cmd::drill::state::lock;
use crate::session::Ticket;

/// Start the timer that moves past a missed card. Replaces (and aborts) any
/// timer already running.
pub fn schedule_advance(
    mutable: &Arc<Mutex<MutableState>>,
    state: &mut MutableState,
    ticket: Ticket,
    delay: Duration,
) {
    let shared = Arc::clone(mutable);
    let handle = tokio::spawn(async move {
        sleep(delay).await;
        let mut state = lock(&shared);
        if state.manager.complete_advance(ticket) {
            state.reveal = false;
            state.advance = None;
        }
    });
    if let Some(previous) = state.advance.replace(handle.abort_handle()) {
        previous.abort();
    }
}

/// Abort the running timer, if any. The session has already invalidated its
/// ticket by the time this is called, so a timer that fires anyway is a
/// no-op.
pub fn cancel_advance(state: &mut MutableState) {
    if let Some(handle) = state.advance.take() {
        log::debug!("Cancelling pending advance.");
        handle.abort();
    }
}
