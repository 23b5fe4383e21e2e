// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
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

//! Session tests
//!
//! Organized by coordinator component: load transaction, activation
//! reconciler, host callbacks, and property tests over random operation
//! sequences.

mod callbacks;

use super::*;
use crate::core::headless::{HeadlessEngine, HeadlessHost, HeadlessMachine};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub(super) type TestSession = Session<HeadlessEngine, HeadlessHost, HeadlessMachine>;

/// Oric Atmos main memory size
pub(super) const TEST_MEMORY_SIZE: usize = 0x10000;

/// Create an initialized session with a headless machine attached
pub(super) fn new_session() -> TestSession {
    session_with_config(CoordinatorConfig::default())
}

pub(super) fn session_with_config(config: CoordinatorConfig) -> TestSession {
    let mut session = Session::new(HeadlessEngine::new(), HeadlessHost::new(), config);
    session.init_system();
    session.init_ui(HeadlessMachine::new(TEST_MEMORY_SIZE));
    session
}

/// Directory of media files that lives as long as the test
pub(super) struct MediaDir {
    dir: TempDir,
}

impl MediaDir {
    pub(super) fn new() -> Self {
        Self {
            dir: tempfile::Builder::new()
                .prefix("oricra_media_")
                .tempdir()
                .unwrap(),
        }
    }

    /// Write a media file and return its path
    pub(super) fn file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Path inside the directory that does not exist
    pub(super) fn missing(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a media file registered as `title_id` with the session's engine
    pub(super) fn title(
        &self,
        session: &mut TestSession,
        name: &str,
        contents: &[u8],
        title_id: TitleId,
    ) -> PathBuf {
        session.engine_mut().register_title(contents, title_id);
        self.file(name, contents)
    }
}

/// Prepare and commit in one step
pub(super) fn load(session: &mut TestSession, path: &Path, kind: MediaKind) {
    let staged = session.prepare(path, kind).unwrap();
    session.commit(staged).unwrap();
}
