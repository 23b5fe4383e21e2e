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

//! Headless collaborators
//!
//! In-memory implementations of the engine, host and machine contracts.
//! They record every call they receive, which makes them usable both for
//! driving a session from the command line and for inspecting a session's
//! side effects in tests.

use super::engine::{AchievementEngine, MenuHandle, OverlayFrame, TitleId};
use super::error::{CoordinatorError, Result};
use super::host::{Host, HostKey};
use super::machine::{DriveType, ImageKind, Machine, RunMode};
use super::memory_bridge::MemoryBridge;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// FNV-1a 64-bit content fingerprint
pub fn fingerprint(data: &[u8]) -> u64 {
    const OFFSET: u64 = 0xCBF2_9CE4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    data.iter()
        .fold(OFFSET, |hash, &byte| (hash ^ byte as u64).wrapping_mul(PRIME))
}

/// Call recorded by [`HeadlessEngine`]
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Init {
        client_name: String,
        client_version: String,
    },
    Login,
    Identify(TitleId),
    Activate(TitleId),
    LoadNewRom(usize),
    Reset,
    WarnDisableHardcore(String),
    ConfirmLoadNewRom(bool),
    ClearMemoryBanks,
    InstallMemoryBank { bank: u8, size: usize },
    Frame { watched: Option<u8> },
    PopupMenu(MenuHandle),
    Dialog(u16),
    Overlay(OverlayFrame),
}

/// Achievement engine with a local title table
#[derive(Debug)]
pub struct HeadlessEngine {
    titles: HashMap<u64, TitleId>,
    hardcore: bool,
    warn_response: bool,
    confirm_response: bool,
    watch: Option<usize>,
    banks: Vec<(u8, usize)>,
    next_menu: u64,
    events: Vec<EngineEvent>,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self {
            titles: HashMap::new(),
            hardcore: false,
            warn_response: true,
            confirm_response: true,
            watch: None,
            banks: Vec::new(),
            next_menu: 1,
            events: Vec::new(),
        }
    }

    /// Register `data` as the contents of title `title_id`
    pub fn register_title(&mut self, data: &[u8], title_id: TitleId) {
        self.titles.insert(fingerprint(data), title_id);
    }

    /// Enable or disable hardcore mode
    pub fn set_hardcore(&mut self, enabled: bool) {
        self.hardcore = enabled;
    }

    /// Answer given to hardcore warnings
    pub fn set_warn_response(&mut self, allow: bool) {
        self.warn_response = allow;
    }

    /// Answer given to unsaved-progress confirmations
    pub fn set_confirm_response(&mut self, confirm: bool) {
        self.confirm_response = confirm;
    }

    /// Sample this address on every achievements frame
    pub fn watch_address(&mut self, address: usize) {
        self.watch = Some(address);
    }

    /// Registered memory banks
    pub fn memory_banks(&self) -> &[(u8, usize)] {
        &self.banks
    }

    /// Recorded calls
    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// Drain recorded calls
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Title ids passed to `activate_game`, in order
    pub fn activations(&self) -> Vec<TitleId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                EngineEvent::Activate(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Number of hardcore warnings shown
    pub fn warnings(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, EngineEvent::WarnDisableHardcore(_)))
            .count()
    }

    /// Number of recorded calls matching `predicate`
    pub fn count(&self, predicate: impl Fn(&EngineEvent) -> bool) -> usize {
        self.events.iter().filter(|&e| predicate(e)).count()
    }
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AchievementEngine for HeadlessEngine {
    fn init(&mut self, client_name: &str, client_version: &str) {
        log::info!("Achievement engine: {} {}", client_name, client_version);
        self.events.push(EngineEvent::Init {
            client_name: client_name.to_string(),
            client_version: client_version.to_string(),
        });
    }

    fn attempt_login(&mut self, _blocking: bool) {
        self.events.push(EngineEvent::Login);
    }

    fn identify(&mut self, data: &[u8]) -> TitleId {
        let id = self.titles.get(&fingerprint(data)).copied().unwrap_or(0);
        self.events.push(EngineEvent::Identify(id));
        id
    }

    fn activate_game(&mut self, title_id: TitleId) {
        log::info!("Achievement engine: activate title {}", title_id);
        self.events.push(EngineEvent::Activate(title_id));
    }

    fn on_load_new_rom(&mut self, data: &[u8]) {
        self.events.push(EngineEvent::LoadNewRom(data.len()));
    }

    fn on_reset(&mut self) {
        self.events.push(EngineEvent::Reset);
    }

    fn hardcore_mode_active(&self) -> bool {
        self.hardcore
    }

    fn warn_disable_hardcore(&mut self, activity: &str) -> bool {
        self.events
            .push(EngineEvent::WarnDisableHardcore(activity.to_string()));

        if !self.hardcore {
            return true;
        }

        if self.warn_response {
            log::info!("Achievement engine: hardcore mode disabled");
            self.hardcore = false;
        }
        self.warn_response
    }

    fn confirm_load_new_rom(&mut self, quitting: bool) -> bool {
        self.events.push(EngineEvent::ConfirmLoadNewRom(quitting));
        self.confirm_response
    }

    fn clear_memory_banks(&mut self) {
        self.banks.clear();
        self.events.push(EngineEvent::ClearMemoryBanks);
    }

    fn install_memory_bank(&mut self, bank: u8, size: usize) {
        self.banks.push((bank, size));
        self.events.push(EngineEvent::InstallMemoryBank { bank, size });
    }

    fn do_achievements_frame(&mut self, memory: &mut MemoryBridge<'_>) {
        let watched = self.watch.map(|address| memory.read(address));
        self.events.push(EngineEvent::Frame { watched });
    }

    fn create_popup_menu(&mut self) -> MenuHandle {
        let handle = MenuHandle(self.next_menu);
        self.next_menu += 1;
        self.events.push(EngineEvent::PopupMenu(handle));
        handle
    }

    fn invoke_dialog(&mut self, id: u16) {
        self.events.push(EngineEvent::Dialog(id));
    }

    fn render_overlay(&mut self, frame: &OverlayFrame) {
        self.events.push(EngineEvent::Overlay(*frame));
    }
}

/// Host with an in-memory menu bar and keyboard
#[derive(Debug)]
pub struct HeadlessHost {
    titles: Vec<String>,
    keys: HashSet<HostKey>,
    menus: Vec<(String, Option<MenuHandle>)>,
    menu_redraws: usize,
}

impl HeadlessHost {
    /// Create a host whose menu bar holds a single "&File" menu
    pub fn new() -> Self {
        Self {
            titles: Vec::new(),
            keys: HashSet::new(),
            menus: vec![("&File".to_string(), None)],
            menu_redraws: 0,
        }
    }

    /// Current window title
    pub fn title(&self) -> Option<&str> {
        self.titles.last().map(String::as_str)
    }

    /// Every title set so far, in order
    pub fn title_history(&self) -> &[String] {
        &self.titles
    }

    /// Press or release a key
    pub fn set_key(&mut self, key: HostKey, down: bool) {
        if down {
            self.keys.insert(key);
        } else {
            self.keys.remove(&key);
        }
    }

    /// Menu bar contents
    pub fn menus(&self) -> &[(String, Option<MenuHandle>)] {
        &self.menus
    }

    /// Number of menu bar redraws
    pub fn menu_redraws(&self) -> usize {
        self.menu_redraws
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for HeadlessHost {
    fn set_title(&mut self, title: &str) {
        log::debug!("Window title: {:?}", title);
        self.titles.push(title.to_string());
    }

    fn key_down(&self, key: HostKey) -> bool {
        self.keys.contains(&key)
    }

    fn menu_labels(&self) -> Vec<String> {
        self.menus.iter().map(|(label, _)| label.clone()).collect()
    }

    fn remove_menu(&mut self, index: usize) {
        if index < self.menus.len() {
            self.menus.remove(index);
        }
    }

    fn append_menu(&mut self, label: &str, menu: MenuHandle) {
        self.menus.push((label.to_string(), Some(menu)));
    }

    fn redraw_menu_bar(&mut self) {
        self.menu_redraws += 1;
    }
}

/// Number of disk drives on the headless machine
pub const HEADLESS_DRIVES: usize = 4;

/// Machine with flat memory and file-backed media slots
///
/// Image kinds are detected from the file extension: `.tap` is a tape and
/// `.dsk` a disk for the fitted controller.
#[derive(Debug)]
pub struct HeadlessMachine {
    memory: Vec<u8>,
    run_mode: RunMode,
    drive_type: DriveType,
    tape: Option<PathBuf>,
    disks: [Option<PathBuf>; HEADLESS_DRIVES],
    queued_keys: String,
    resets: usize,
    pravetz_boots: usize,
    jasmin_reset_pending: bool,
    reject_inserts: bool,
}

impl HeadlessMachine {
    /// Create a machine with `memory_size` bytes of zeroed RAM and a Microdisc
    pub fn new(memory_size: usize) -> Self {
        Self {
            memory: vec![0; memory_size],
            run_mode: RunMode::Running,
            drive_type: DriveType::Microdisc,
            tape: None,
            disks: Default::default(),
            queued_keys: String::new(),
            resets: 0,
            pravetz_boots: 0,
            jasmin_reset_pending: false,
            reject_inserts: false,
        }
    }

    /// Fit a different disk controller
    pub fn with_drive_type(mut self, drive_type: DriveType) -> Self {
        self.drive_type = drive_type;
        self
    }

    /// Make every subsequent insert fail
    pub fn set_reject_inserts(&mut self, reject: bool) {
        self.reject_inserts = reject;
    }

    /// Attached tape image
    pub fn tape(&self) -> Option<&Path> {
        self.tape.as_deref()
    }

    /// Disk image in `drive`
    pub fn disk(&self, drive: u8) -> Option<&Path> {
        self.disks.get(drive as usize).and_then(|d| d.as_deref())
    }

    /// Keystrokes queued so far
    pub fn queued_keys(&self) -> &str {
        &self.queued_keys
    }

    /// Number of soft resets
    pub fn resets(&self) -> usize {
        self.resets
    }

    /// Number of Pravetz boot sequences issued
    pub fn pravetz_boots(&self) -> usize {
        self.pravetz_boots
    }

    /// Whether a Jasmin reset is pending
    pub fn jasmin_reset_pending(&self) -> bool {
        self.jasmin_reset_pending
    }

    fn check_insert(&self, path: &Path) -> Result<()> {
        if self.reject_inserts {
            return Err(CoordinatorError::MachineLoad(format!(
                "{} rejected",
                path.display()
            )));
        }

        if !path.is_file() {
            return Err(CoordinatorError::MachineLoad(format!(
                "{} is not a file",
                path.display()
            )));
        }

        Ok(())
    }
}

impl Machine for HeadlessMachine {
    fn memory(&self) -> &[u8] {
        &self.memory
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    fn soft_reset(&mut self) {
        self.resets += 1;
        self.jasmin_reset_pending = false;
    }

    fn run_mode(&self) -> RunMode {
        self.run_mode
    }

    fn set_run_mode(&mut self, mode: RunMode) {
        self.run_mode = mode;
    }

    fn drive_type(&self) -> DriveType {
        self.drive_type
    }

    fn detect_image(&self, path: &Path) -> ImageKind {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());

        match extension.as_deref() {
            Some("tap") => ImageKind::Tape,
            Some("dsk") => match self.drive_type {
                DriveType::Microdisc => ImageKind::AtmosMicrodisc,
                DriveType::Jasmin => ImageKind::AtmosJasmin,
                DriveType::Pravetz => ImageKind::PravetzDisk,
                DriveType::None => ImageKind::GuessMicrodisc,
            },
            _ => ImageKind::Unknown,
        }
    }

    fn insert_disk(&mut self, path: &Path, drive: u8) -> Result<()> {
        self.check_insert(path)?;
        let slot = self
            .disks
            .get_mut(drive as usize)
            .ok_or_else(|| CoordinatorError::MachineLoad(format!("no drive {}", drive)))?;
        *slot = Some(path.to_path_buf());
        Ok(())
    }

    fn insert_tape(&mut self, path: &Path) -> Result<()> {
        self.check_insert(path)?;
        self.tape = Some(path.to_path_buf());
        Ok(())
    }

    fn eject_disk(&mut self, drive: u8) {
        if let Some(slot) = self.disks.get_mut(drive as usize) {
            *slot = None;
        }
    }

    fn eject_tape(&mut self) {
        self.tape = None;
    }

    fn boot_pravetz_disk(&mut self) {
        self.pravetz_boots += 1;
    }

    fn request_jasmin_reset(&mut self) {
        self.jasmin_reset_pending = true;
    }

    fn queue_keys(&mut self, keys: &str) {
        self.queued_keys.push_str(keys);
    }
}
