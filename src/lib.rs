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

//! Oric media identity and achievement activation coordinator
//!
//! This library tracks which storage media (tape, disk) are attached to a
//! running Oric emulation, identifies them against the achievement title
//! database, and drives activation of the matching title in an external
//! achievement session.
//!
//! # Example
//!
//! ```
//! use oricra::core::headless::{HeadlessEngine, HeadlessHost, HeadlessMachine};
//! use oricra::core::{CoordinatorConfig, MediaKind, Session};
//!
//! let mut session = Session::new(
//!     HeadlessEngine::new(),
//!     HeadlessHost::new(),
//!     CoordinatorConfig::default(),
//! );
//! session.init_system();
//! session.init_ui(HeadlessMachine::new(48 * 1024));
//!
//! assert!(session.active_title().is_none());
//! assert!(session.slot(MediaKind::Tape).is_empty());
//! ```

pub mod core;
