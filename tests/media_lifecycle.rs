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

//! End-to-end media lifecycle tests
//!
//! Drive a session through the same entry points an emulator front end
//! uses: file loads, ejects, resets and per-frame processing.

mod common;

use common::fixtures::{create_session, MediaLibrary};
use oricra::core::headless::EngineEvent;
use oricra::core::{CoordinatorError, Machine, MediaKind};

#[test]
fn test_failed_tape_load_keeps_state() {
    let library = MediaLibrary::new();
    let mut session = create_session();
    let disk = library.add(&mut session, "Xenon.dsk", 0xD0, 42);
    session.load_rom(&disk).unwrap();
    let before = session.slots().clone();

    let result = session.prepare(library.missing("Lost.tap"), MediaKind::Tape);

    assert!(matches!(result, Err(CoordinatorError::Io { .. })));
    assert_eq!(session.slots(), &before);
    assert!(!session.is_staging());
}

#[test]
fn test_disk_load_activates_title() {
    let library = MediaLibrary::new();
    let mut session = create_session();
    let disk = library.add(&mut session, "Xenon.dsk", 0xD0, 42);

    session.load_rom(&disk).unwrap();

    assert_eq!(session.active_kind(), Some(MediaKind::Disk));
    assert_eq!(session.engine().activations(), vec![42]);
    assert_eq!(session.host().title(), Some("Xenon"));
}

#[test]
fn test_hardcore_declined_swap() {
    let library = MediaLibrary::new();
    let mut session = create_session();
    let disk = library.add(&mut session, "Xenon.dsk", 0xD0, 42);
    let other = library.add(&mut session, "Zorgons.dsk", 0x2A, 7);
    session.load_rom(&disk).unwrap();
    session.engine_mut().set_hardcore(true);
    session.engine_mut().set_warn_response(false);

    let result = session.load_rom(&other);

    assert!(matches!(result, Err(CoordinatorError::UserDeclined(_))));
    assert_eq!(session.engine().warnings(), 1);
    assert_eq!(session.active_title().unwrap().title_id(), 42);
    assert_eq!(session.machine().unwrap().disk(0), Some(disk.as_path()));
}

#[test]
fn test_eject_disk_falls_back_to_tape() {
    let library = MediaLibrary::new();
    let mut session = create_session();
    let tape = library.add(&mut session, "Hopper.tap", 0x7A, 9);
    let disk = library.add(&mut session, "Xenon.dsk", 0xD0, 42);
    session.load_rom(&tape).unwrap();
    session.load_rom(&disk).unwrap();

    session.eject(MediaKind::Disk);

    assert_eq!(session.active_kind(), Some(MediaKind::Tape));
    assert_eq!(session.engine().activations().last(), Some(&9));
}

#[test]
fn test_hardcore_reset_leaves_one_slot() {
    let library = MediaLibrary::new();
    let mut session = create_session();
    let tape = library.add(&mut session, "Hopper.tap", 0x7A, 9);
    let disk = library.add(&mut session, "Xenon.dsk", 0xD0, 42);
    session.load_rom(&tape).unwrap();
    session.load_rom(&disk).unwrap();
    session.engine_mut().set_hardcore(true);

    session.reset_emulation().unwrap();

    assert!(!session.slots().all_occupied());
    assert_eq!(session.active_kind(), Some(MediaKind::Disk));
    assert!(session.machine().unwrap().tape().is_none());
}

#[test]
fn test_full_session_flow() {
    let library = MediaLibrary::new();
    let mut session = create_session();
    let tape = library.add(&mut session, "Hopper.tap", 0x7A, 9);
    session.engine_mut().watch_address(0x26A);

    session.load_rom(&tape).unwrap();
    session.machine_mut().unwrap().memory_mut()[0x26A] = 3;
    session.process_frame();
    session.eject(MediaKind::Tape);

    let events = session.engine_mut().take_events();
    let tail: Vec<_> = events
        .iter()
        .filter(|e| {
            matches!(
                e,
                EngineEvent::Activate(_) | EngineEvent::Frame { .. } | EngineEvent::LoadNewRom(_)
            )
        })
        .cloned()
        .collect();

    assert_eq!(
        tail,
        vec![
            EngineEvent::Activate(9),
            EngineEvent::Frame { watched: Some(3) },
            EngineEvent::LoadNewRom(0),
        ]
    );
    assert_eq!(session.host().title(), Some(""));
    assert_eq!(session.machine().unwrap().queued_keys(), "CLOAD\"\"\r");
}
