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

//! Host and engine callback tests

use super::*;
use crate::core::engine::MenuHandle;
use crate::core::headless::EngineEvent;
use crate::core::host::{HostKey, OverlayInput, MENU_ID_START};
use std::time::Duration;

fn overlay_frames(session: &TestSession) -> Vec<crate::core::engine::OverlayFrame> {
    session
        .engine()
        .events()
        .iter()
        .filter_map(|e| match e {
            EngineEvent::Overlay(frame) => Some(*frame),
            _ => None,
        })
        .collect()
}

#[test]
fn test_init_system_runs_once() {
    let mut session = new_session();
    session.init_system();
    session.init_system();

    let engine = session.engine();
    assert_eq!(engine.count(|e| matches!(e, EngineEvent::Init { .. })), 1);
    assert_eq!(engine.count(|e| matches!(e, EngineEvent::Login)), 1);
    assert_eq!(
        engine.events()[0],
        EngineEvent::Init {
            client_name: "RAOricutron".to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    );
}

#[test]
fn test_init_system_without_auto_login() {
    let session = session_with_config(CoordinatorConfig {
        auto_login: false,
        ..Default::default()
    });

    assert_eq!(
        session.engine().count(|e| matches!(e, EngineEvent::Login)),
        0
    );
}

#[test]
fn test_init_system_resets_quit_confirmation() {
    let mut session = new_session();
    session.engine_mut().set_confirm_response(true);
    assert!(session.confirm_quit());

    session.engine_mut().set_confirm_response(false);
    assert!(session.confirm_quit());

    session.init_system();
    assert!(!session.confirm_quit());
}

#[test]
fn test_init_ui_installs_single_menu() {
    let mut session = new_session();
    session.init_ui(HeadlessMachine::new(TEST_MEMORY_SIZE));

    let menus = session.host().menus();
    let achievement_menus: Vec<_> = menus
        .iter()
        .filter(|(label, _)| label == "&RetroAchievements")
        .collect();

    assert_eq!(menus.len(), 2);
    assert_eq!(menus[0].0, "&File");
    assert_eq!(achievement_menus.len(), 1);
    assert_eq!(achievement_menus[0].1, Some(MenuHandle(2)));
    assert_eq!(session.host().menu_redraws(), 2);
}

#[test]
fn test_init_ui_returns_previous_machine() {
    let mut session = new_session();
    let previous = session.init_ui(HeadlessMachine::new(0x4000));

    assert_eq!(previous.unwrap().memory_size(), TEST_MEMORY_SIZE);
    assert_eq!(session.engine().memory_banks(), &[(0, 0x4000)]);
}

#[test]
fn test_init_ui_registers_memory_bank() {
    let session = new_session();
    assert_eq!(session.engine().memory_banks(), &[(0, TEST_MEMORY_SIZE)]);
}

#[test]
fn test_process_frame_reads_machine_memory() {
    let mut session = new_session();
    session.engine_mut().watch_address(0x0300);
    session.machine_mut().unwrap().memory_mut()[0x0300] = 0x99;

    session.process_frame();

    assert_eq!(
        session.engine().events().last(),
        Some(&EngineEvent::Frame {
            watched: Some(0x99)
        })
    );
}

#[test]
fn test_process_frame_without_machine() {
    let mut session = new_session();
    session.engine_mut().watch_address(0x0300);
    session.machine_mut().unwrap().memory_mut()[0x0300] = 0x99;
    let detached = session.detach_machine();
    assert!(detached.is_some());
    assert!(session.engine().memory_banks().is_empty());

    session.process_frame();

    assert_eq!(
        session.engine().events().last(),
        Some(&EngineEvent::Frame { watched: Some(0) })
    );
}

#[test]
fn test_pause_and_unpause() {
    let mut session = new_session();
    let start = Instant::now();

    session.pause();
    session.render_overlay_at(start);
    session.unpause();
    session.render_overlay_at(start + Duration::from_millis(16));

    let frames = overlay_frames(&session);
    assert!(frames[0].paused);
    assert!(!frames[1].paused);
    assert_eq!(frames[0].delta_seconds, 0.0);
    assert!((frames[1].delta_seconds - 0.016).abs() < 1e-6);
}

#[test]
fn test_overlay_uses_config_display() {
    let mut session = session_with_config(CoordinatorConfig {
        fullscreen: true,
        ..Default::default()
    });
    session.host_mut().set_key(HostKey::Escape, true);

    session.render_overlay();

    let frames = overlay_frames(&session);
    assert_eq!(frames.len(), 1);
    assert_eq!((frames[0].width, frames[0].height), (640, 480));
    assert!(frames[0].fullscreen);
    assert_eq!(frames[0].input, OverlayInput::QUIT);
}

#[test]
fn test_handle_menu_command() {
    let mut session = new_session();

    assert!(session.handle_menu_command(MENU_ID_START as u32 + 1));
    assert!(!session.handle_menu_command(40001));
    assert_eq!(
        session.engine().events().last(),
        Some(&EngineEvent::Dialog(MENU_ID_START + 1))
    );
}

#[test]
fn test_estimated_title() {
    let media = MediaDir::new();
    let mut session = new_session();
    assert_eq!(session.estimated_title(), "");

    let disk = media.title(&mut session, "Xenon.dsk", &[0xD0; 512], 42);
    let staged = session.prepare(&disk, MediaKind::Disk).unwrap();
    assert_eq!(session.estimated_title(), "Xenon");
    assert!(!session.game_is_active());

    session.commit(staged).unwrap();
    assert_eq!(session.estimated_title(), "Xenon");
    assert!(session.game_is_active());

    session.eject(MediaKind::Disk);
    assert_eq!(session.estimated_title(), "");
    assert!(!session.game_is_active());
}

#[test]
fn test_estimated_title_is_bounded() {
    let media = MediaDir::new();
    let mut session = new_session();
    let long_name = format!("{}.tap", "N".repeat(120));
    let tape = media.file(&long_name, &[1; 8]);

    load(&mut session, &tape, MediaKind::Tape);

    assert_eq!(session.estimated_title().len(), 63);
}

#[test]
fn test_status_snapshot() {
    let media = MediaDir::new();
    let mut session = new_session();
    let disk = media.title(&mut session, "Xenon.dsk", &[0xD0; 512], 42);
    load(&mut session, &disk, MediaKind::Disk);

    let status = session.status();
    assert!(status.tape.is_none());
    assert_eq!(
        status.disk,
        Some(MediaSummary {
            name: "Xenon".to_string(),
            title_id: 42,
            size: 512,
        })
    );
    assert_eq!(status.active, Some(MediaKind::Disk));
    assert!(!status.hardcore);
    assert!(status.tape_hot_swap);
    assert!(!status.staging);

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["active"], "disk");
    assert_eq!(json["disk"]["title_id"], 42);
    assert!(json["tape"].is_null());
}
