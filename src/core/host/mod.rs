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

//! Host windowing interface and event bridge
//!
//! The host (window, menu bar, keyboard) sits behind the [`Host`] trait so
//! the coordinator can run without a real window system. [`HostEventBridge`]
//! forwards menu commands, overlay render ticks and quit confirmation
//! between the host and the achievement engine.

use super::engine::{AchievementEngine, MenuHandle, OverlayFrame};
use std::time::Instant;


/// First menu identifier reserved for the achievement engine
pub const MENU_ID_START: u16 = 1700;

/// One past the last reserved menu identifier
pub const MENU_ID_END: u16 = 1740;

/// Label of the achievement menu in the host's menu bar
pub const ACHIEVEMENT_MENU_LABEL: &str = "&RetroAchievements";

/// Keys polled for overlay navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostKey {
    Return,
    Backspace,
    Escape,
    Left,
    Right,
    Up,
    Down,
}

bitflags::bitflags! {
    /// Overlay navigation buttons
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct OverlayInput: u8 {
        const CONFIRM = 0b0000_0001;
        const CANCEL  = 0b0000_0010;
        const QUIT    = 0b0000_0100;
        const LEFT    = 0b0000_1000;
        const RIGHT   = 0b0001_0000;
        const UP      = 0b0010_0000;
        const DOWN    = 0b0100_0000;
    }
}

/// Host key bound to each overlay button
const KEY_BINDINGS: [(HostKey, OverlayInput); 7] = [
    (HostKey::Return, OverlayInput::CONFIRM),
    (HostKey::Backspace, OverlayInput::CANCEL),
    (HostKey::Escape, OverlayInput::QUIT),
    (HostKey::Left, OverlayInput::LEFT),
    (HostKey::Right, OverlayInput::RIGHT),
    (HostKey::Up, OverlayInput::UP),
    (HostKey::Down, OverlayInput::DOWN),
];

/// Host windowing contract
pub trait Host {
    /// Update the window title with the current media name
    fn set_title(&mut self, title: &str);

    /// Whether `key` is currently held
    fn key_down(&self, key: HostKey) -> bool;

    /// Labels of the top-level menus, in order
    fn menu_labels(&self) -> Vec<String>;

    /// Remove the top-level menu at `index`
    fn remove_menu(&mut self, index: usize);

    /// Append a popup menu to the menu bar
    fn append_menu(&mut self, label: &str, menu: MenuHandle);

    /// Redraw the menu bar
    fn redraw_menu_bar(&mut self);
}

/// Gather the overlay buttons currently held on the host
pub fn poll_overlay_input<H: Host + ?Sized>(host: &H) -> OverlayInput {
    KEY_BINDINGS
        .iter()
        .filter(|(key, _)| host.key_down(*key))
        .fold(OverlayInput::empty(), |acc, (_, button)| acc | *button)
}

/// Host event bridge
///
/// Stateless apart from the last overlay tick and the quit-confirmed flag.
#[derive(Debug, Default)]
pub struct HostEventBridge {
    /// Time of the previous overlay tick
    last_tick: Option<Instant>,

    /// Set once the user has confirmed quitting
    quit_confirmed: bool,
}

impl HostEventBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch a host menu command
    ///
    /// Identifiers in the reserved range (compared on their low 16 bits) open
    /// the engine dialog bound to them.
    ///
    /// # Returns
    ///
    /// true if the command was handled, false if the host should process it
    pub fn handle_menu_command<E: AchievementEngine + ?Sized>(
        &self,
        engine: &mut E,
        id: u32,
    ) -> bool {
        let id = (id & 0xFFFF) as u16;
        if (MENU_ID_START..MENU_ID_END).contains(&id) {
            log::debug!("Menu command {} routed to achievement dialog", id);
            engine.invoke_dialog(id);
            true
        } else {
            false
        }
    }

    /// Forward one overlay render tick
    ///
    /// The first tick reports zero elapsed time.
    pub fn render_overlay<E, H>(&mut self, engine: &mut E, host: &H, frame: OverlayTick, now: Instant)
    where
        E: AchievementEngine + ?Sized,
        H: Host + ?Sized,
    {
        let delta_seconds = self
            .last_tick
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f32());

        let request = OverlayFrame {
            input: poll_overlay_input(host),
            delta_seconds,
            width: frame.width,
            height: frame.height,
            fullscreen: frame.fullscreen,
            paused: frame.paused,
        };

        log::trace!("Overlay tick: {:.4}s, input {:?}", delta_seconds, request.input);
        engine.render_overlay(&request);

        self.last_tick = Some(now);
    }

    /// Ask whether the application may quit
    ///
    /// The engine is asked once per quit attempt. A confirmation is remembered
    /// until [`reset_quit_confirmation`] is called; a refusal is not, so the
    /// next attempt asks again.
    ///
    /// [`reset_quit_confirmation`]: HostEventBridge::reset_quit_confirmation
    pub fn confirm_quit<E: AchievementEngine + ?Sized>(&mut self, engine: &mut E) -> bool {
        if !self.quit_confirmed {
            self.quit_confirmed = engine.confirm_load_new_rom(true);
        }
        self.quit_confirmed
    }

    /// Forget the memoized quit answer
    pub fn reset_quit_confirmation(&mut self) {
        self.quit_confirmed = false;
    }

    /// Time of the previous overlay tick
    pub fn last_tick(&self) -> Option<Instant> {
        self.last_tick
    }
}

/// Display parameters for one overlay tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayTick {
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub paused: bool,
}
