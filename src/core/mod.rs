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

//! Coordinator components
//!
//! This module contains the media coordinator and its collaborator seams:
//! - Media records and the two fixed media slots
//! - Session context (load transaction, activation reconciler)
//! - Memory reader/writer bridge for the achievement engine
//! - Host event bridge (menu dispatch, overlay ticks, quit confirmation)
//! - Collaborator traits for the achievement engine, emulation core and host
//! - Headless collaborators for tooling and tests

pub mod config;
pub mod engine;
pub mod error;
pub mod headless;
pub mod host;
pub mod machine;
pub mod media;
pub mod memory_bridge;
pub mod session;

// Re-export commonly used types
pub use config::CoordinatorConfig;
pub use engine::{AchievementEngine, MenuHandle, OverlayFrame, TitleId};
pub use error::{ConfigError, CoordinatorError, Result};
pub use host::{Host, HostEventBridge, HostKey, OverlayInput};
pub use machine::{DriveType, ImageKind, Machine, RunMode};
pub use media::{MediaKind, MediaRecord, MediaSlots};
pub use memory_bridge::MemoryBridge;
pub use session::{Session, SessionStatus, StagedLoad};
