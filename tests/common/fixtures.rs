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

//! Test fixtures for common test scenarios

use oricra::core::engine::TitleId;
use oricra::core::headless::{HeadlessEngine, HeadlessHost, HeadlessMachine};
use oricra::core::{CoordinatorConfig, Session};
use std::path::PathBuf;
use tempfile::TempDir;

pub type TestSession = Session<HeadlessEngine, HeadlessHost, HeadlessMachine>;

/// Create a session with the engine initialized and a 64KB machine attached
pub fn create_session() -> TestSession {
    let mut session = Session::new(
        HeadlessEngine::new(),
        HeadlessHost::new(),
        CoordinatorConfig::default(),
    );
    session.init_system();
    session.init_ui(HeadlessMachine::new(0x10000));
    session
}

/// Temporary directory of tape and disk images
pub struct MediaLibrary {
    dir: TempDir,
}

impl MediaLibrary {
    pub fn new() -> Self {
        Self {
            dir: tempfile::Builder::new()
                .prefix("oricra_it_")
                .tempdir()
                .unwrap(),
        }
    }

    /// Write an image and register it with the session's engine
    ///
    /// A title id of 0 leaves the image unrecognized.
    pub fn add(&self, session: &mut TestSession, name: &str, fill: u8, title_id: TitleId) -> PathBuf {
        let contents = vec![fill; 256];
        if title_id != 0 {
            session.engine_mut().register_title(&contents, title_id);
        }

        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Path that does not exist
    #[allow(dead_code)]
    pub fn missing(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
