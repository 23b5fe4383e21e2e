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

//! Achievement engine interface
//!
//! The achievement engine is a black box: it owns networking, rule
//! evaluation, popups and scoring. The coordinator only calls into it
//! through the [`AchievementEngine`] trait.

use super::host::OverlayInput;
use super::memory_bridge::MemoryBridge;

/// Opaque title identifier returned by content identification (0 = unrecognized)
pub type TitleId = u32;

/// Opaque handle to a popup menu built by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuHandle(pub u64);

/// One overlay render request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayFrame {
    /// Buttons held at the time of the tick
    pub input: OverlayInput,
    /// Seconds since the previous tick
    pub delta_seconds: f32,
    /// Logical display width
    pub width: u32,
    /// Logical display height
    pub height: u32,
    /// Whether the host window is fullscreen
    pub fullscreen: bool,
    /// Whether emulation is paused
    pub paused: bool,
}

/// Achievement engine contract
///
/// Implementations are driven from the emulation thread only.
pub trait AchievementEngine {
    /// Initialize the engine with the client identity
    fn init(&mut self, client_name: &str, client_version: &str);

    /// Attempt to log in with stored credentials
    fn attempt_login(&mut self, blocking: bool);

    /// Identify media contents, returning 0 when unrecognized
    fn identify(&mut self, data: &[u8]) -> TitleId;

    /// Start tracking achievements for a title
    fn activate_game(&mut self, title_id: TitleId);

    /// Notify that new contents were loaded (empty = no ROM loaded)
    fn on_load_new_rom(&mut self, data: &[u8]);

    /// Notify that the emulated machine was reset
    fn on_reset(&mut self);

    /// Whether hardcore mode is currently active
    fn hardcore_mode_active(&self) -> bool;

    /// Warn that `activity` will disable hardcore mode
    ///
    /// Returns true when the user allows the activity.
    fn warn_disable_hardcore(&mut self, activity: &str) -> bool;

    /// Ask whether unsaved progress may be discarded
    ///
    /// Returns true when the user confirms.
    fn confirm_load_new_rom(&mut self, quitting: bool) -> bool;

    /// Remove all registered memory banks
    fn clear_memory_banks(&mut self);

    /// Register a memory bank of `size` bytes served by the memory bridge
    fn install_memory_bank(&mut self, bank: u8, size: usize);

    /// Evaluate achievements for one frame against emulated memory
    fn do_achievements_frame(&mut self, memory: &mut MemoryBridge<'_>);

    /// Build the engine's popup menu
    fn create_popup_menu(&mut self) -> MenuHandle;

    /// Open the dialog bound to a reserved menu identifier
    fn invoke_dialog(&mut self, id: u16);

    /// Draw the overlay
    fn render_overlay(&mut self, frame: &OverlayFrame);
}
