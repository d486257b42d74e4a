//! End-to-end session scenarios over synthetic frames.

use std::path::Path;

use image::{Rgb, RgbImage};

use crate::constants::SAVE_CONFIRMATION;
use crate::format::MarkerFile;
use crate::message::PointerState;
use crate::model::{Dimensions, Hsv, Point, Region};
use crate::state::{MarkerSession, SaveOutcome, SessionMode, SessionOptions};

/// RGB that converts to HSV (20, 200, 200).
const AMBER: Rgb<u8> = Rgb([200, 148, 43]);
const RED: Rgb<u8> = Rgb([255, 0, 0]);
const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
const GRAY: Rgb<u8> = Rgb([128, 128, 128]);

fn options(output: &Path) -> SessionOptions {
    SessionOptions::default()
        .output_path(output)
        .region_selection(false)
        .background_step(false)
        .max_preview(Dimensions::new(100, 100))
}

fn uniform_session(color: Rgb<u8>, output: &Path) -> MarkerSession {
    MarkerSession::new(RgbImage::from_pixel(100, 100, color), options(output))
}

fn type_text(session: &mut MarkerSession, text: &str) {
    for c in text.chars() {
        session.on_type_char(c);
    }
}

fn click(session: &mut MarkerSession, x: i32, y: i32) {
    session.on_pointer(PointerState::Pressed, Point::new(x, y));
    session.on_pointer(PointerState::Released, Point::new(x, y));
}

#[test]
fn test_initial_mode_follows_options() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let out = dir.path().join("markers.csv");
    let frame = RgbImage::from_pixel(10, 10, GRAY);

    let all = MarkerSession::new(
        frame.clone(),
        options(&out).region_selection(true).background_step(true),
    );
    assert_eq!(all.mode(), SessionMode::SelectingRegion);

    let bg = MarkerSession::new(frame.clone(), options(&out).background_step(true));
    assert_eq!(bg.mode(), SessionMode::SelectingBackground);

    let markers = MarkerSession::new(frame, options(&out));
    assert_eq!(markers.mode(), SessionMode::DefiningMarkers);
}

#[test]
fn test_save_drops_uncolored_open_marker() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let out = dir.path().join("markers.csv");
    let mut session = uniform_session(AMBER, &out);

    click(&mut session, 40, 40);
    type_text(&mut session, "Left_Ear");
    assert!(session.on_commit_marker());

    type_text(&mut session, "Right Ear");
    assert_eq!(session.committable_count(), 1);
    assert_eq!(session.on_save_request(), SaveOutcome::Saved { markers: 1 });

    let text = std::fs::read_to_string(&out).expect("read output");
    assert_eq!(text, "Left_Ear;20;200;200\n");
    assert_eq!(session.status().save_message(), Some(SAVE_CONFIRMATION));
    assert_eq!(session.status().error(), None);
}

#[test]
fn test_save_includes_complete_open_marker() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let out = dir.path().join("markers.csv");
    let mut session = uniform_session(RED, &out);

    click(&mut session, 1, 1);
    type_text(&mut session, "Red");

    assert_eq!(session.on_save_request(), SaveOutcome::Saved { markers: 1 });
    let file = MarkerFile::read(&out).expect("read output");
    assert_eq!(file.markers.len(), 1);
    assert_eq!(file.markers[0].name, "Red");
    assert_eq!(file.markers[0].color, Hsv::new(0, 255, 255));

    // Saving does not commit the open marker
    assert!(session.markers().is_empty());
    assert_eq!(session.open_name(), "Red");
}

#[test]
fn test_commit_without_color_fails() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let out = dir.path().join("markers.csv");
    let mut session = uniform_session(AMBER, &out);

    type_text(&mut session, "Nose");
    assert!(!session.on_commit_marker());

    assert_eq!(session.status().error(), Some("color not set"));
    assert_eq!(session.marker_count(), 1);
    assert!(session.markers().is_empty());
    assert_eq!(session.open_name(), "Nose");
}

#[test]
fn test_color_is_checked_before_name() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let out = dir.path().join("markers.csv");
    let mut session = uniform_session(AMBER, &out);

    assert!(!session.on_commit_marker());
    assert_eq!(session.status().error(), Some("color not set"));

    click(&mut session, 5, 5);
    assert_eq!(session.status().error(), None);
    assert!(!session.on_commit_marker());
    assert_eq!(session.status().error(), Some("name not set"));
    assert!(session.color_set());
}

#[test]
fn test_commit_resets_open_marker() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let out = dir.path().join("markers.csv");
    let mut session = uniform_session(AMBER, &out);

    click(&mut session, 5, 5);
    type_text(&mut session, "A");
    assert!(session.on_commit_marker());

    assert_eq!(session.marker_count(), 2);
    assert_eq!(session.open_name(), "");
    assert!(!session.color_set());
    assert_eq!(session.last_swatch(), None);
    assert_eq!(session.name_buffer(), "A,");
}

#[test]
fn test_reserved_name_is_rejected() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let out = dir.path().join("markers.csv");
    let mut session = uniform_session(AMBER, &out);

    click(&mut session, 5, 5);
    type_text(&mut session, "Background");
    assert!(!session.on_commit_marker());
    assert!(session.markers().is_empty());
    assert!(session.status().error().is_some());

    // The open marker is not complete either
    assert_eq!(session.on_save_request(), SaveOutcome::NothingToSave);
    assert!(!out.exists());
}

#[test]
fn test_save_is_idempotent() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let out = dir.path().join("markers.csv");
    let mut session = uniform_session(AMBER, &out);

    click(&mut session, 5, 5);
    type_text(&mut session, "Tip");
    assert!(session.on_commit_marker());

    session.on_save_request();
    let first = std::fs::read(&out).expect("read first save");
    session.on_save_request();
    let second = std::fs::read(&out).expect("read second save");

    assert_eq!(first, second);
}

#[test]
fn test_save_with_nothing_complete_writes_nothing() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let out = dir.path().join("markers.csv");
    let mut session = uniform_session(AMBER, &out);

    type_text(&mut session, "Unsampled");
    assert_eq!(session.on_save_request(), SaveOutcome::NothingToSave);

    assert!(!out.exists());
    assert_eq!(session.status().error(), None);
    assert_eq!(session.status().save_message(), None);
}

#[test]
fn test_save_failure_is_reported_not_fatal() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let out = dir.path().join("no-such-dir").join("markers.csv");
    let mut session = uniform_session(AMBER, &out);

    click(&mut session, 5, 5);
    type_text(&mut session, "Tip");
    assert_eq!(session.on_save_request(), SaveOutcome::Failed);

    let error = session.status().error().expect("error should be shown");
    assert!(error.starts_with("Save failed"), "{error}");
    assert_eq!(session.mode(), SessionMode::DefiningMarkers);
}

#[test]
fn test_sample_clears_save_message() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let out = dir.path().join("markers.csv");
    let mut session = uniform_session(AMBER, &out);

    click(&mut session, 5, 5);
    type_text(&mut session, "Tip");
    session.on_save_request();
    assert!(session.status().save_message().is_some());

    click(&mut session, 6, 6);
    assert_eq!(session.status().save_message(), None);
}

#[test]
fn test_backspace_edits_open_name_only() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let out = dir.path().join("markers.csv");
    let mut session = uniform_session(AMBER, &out);

    click(&mut session, 5, 5);
    type_text(&mut session, "Ab");
    assert!(session.on_commit_marker());

    assert!(!session.on_backspace());
    assert_eq!(session.name_buffer(), "Ab,");

    type_text(&mut session, "Cd");
    assert!(session.on_backspace());
    assert_eq!(session.open_name(), "C");
}

#[test]
fn test_invalid_characters_are_ignored() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let out = dir.path().join("markers.csv");
    let mut session = uniform_session(AMBER, &out);

    type_text(&mut session, "a;b,c");
    assert_eq!(session.open_name(), "abc");
    assert_eq!(session.status().error(), None);
}

#[test]
fn test_click_on_control_panel_is_not_sampled() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let out = dir.path().join("markers.csv");
    let mut session = uniform_session(AMBER, &out);

    // The panel sits below the 100 px preview
    assert!(!session.on_color_sample(Point::new(10, 150)));
    assert!(!session.color_set());
    assert_eq!(session.last_swatch(), None);
}

#[test]
fn test_held_pointer_resamples() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let out = dir.path().join("markers.csv");
    let frame = RgbImage::from_fn(100, 100, |x, _| if x < 50 { RED } else { BLUE });
    let mut session = MarkerSession::new(frame, options(&out));

    session.on_pointer(PointerState::Pressed, Point::new(10, 10));
    session.on_pointer(PointerState::Held, Point::new(90, 10));
    session.on_pointer(PointerState::Released, Point::new(90, 10));

    let color = session.open_color().expect("color sampled");
    assert_eq!(color.hsv, Hsv::new(120, 255, 255));
    assert_eq!(session.last_swatch(), Some(Point::new(90, 10)));
}

#[test]
fn test_background_step_requires_sample() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let out = dir.path().join("markers.csv");
    let frame = RgbImage::from_fn(100, 100, |x, _| if x < 50 { GRAY } else { AMBER });
    let mut session = MarkerSession::new(frame, options(&out).background_step(true));

    assert!(!session.on_confirm());
    assert_eq!(session.mode(), SessionMode::SelectingBackground);
    assert_eq!(session.status().error(), Some("background color not set"));

    click(&mut session, 10, 10);
    assert!(session.on_confirm());
    assert_eq!(session.mode(), SessionMode::DefiningMarkers);

    click(&mut session, 80, 10);
    type_text(&mut session, "Tip");
    assert!(session.on_commit_marker());
    session.on_save_request();

    let text = std::fs::read_to_string(&out).expect("read output");
    assert_eq!(text, "Background;0;0;128\nTip;20;200;200\n");
}

#[test]
fn test_region_crop_maps_clicks_into_region() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let out = dir.path().join("markers.csv");
    let frame = RgbImage::from_fn(200, 100, |x, _| if x < 100 { RED } else { BLUE });
    let mut session = MarkerSession::new(
        frame,
        options(&out)
            .region_selection(true)
            .max_preview(Dimensions::new(100, 50)),
    );
    assert_eq!(session.display_frame().dimensions(), (100, 50));

    session.on_pointer(PointerState::Pressed, Point::new(100, 50));
    session.on_pointer(PointerState::Held, Point::new(70, 20));
    assert!(session.region_preview().is_some());
    session.on_pointer(PointerState::Released, Point::new(50, 0));
    assert!(session.on_confirm());

    assert_eq!(session.mode(), SessionMode::DefiningMarkers);
    assert_eq!(
        session.crop(),
        Some(Region {
            x: 100,
            y: 0,
            width: 100,
            height: 100
        })
    );
    assert_eq!(session.display_frame().dimensions(), (50, 50));
    assert_eq!(session.region_preview(), None);

    // The left edge of the new preview is the middle of the frame
    click(&mut session, 0, 0);
    assert_eq!(
        session.open_color().map(|c| c.hsv),
        Some(Hsv::new(120, 255, 255))
    );
}

#[test]
fn test_confirm_without_region_keeps_whole_frame() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let out = dir.path().join("markers.csv");
    let mut session = MarkerSession::new(
        RgbImage::from_pixel(100, 100, GRAY),
        options(&out).region_selection(true),
    );

    // A click without a drag is a degenerate rectangle
    click(&mut session, 30, 30);
    assert!(session.on_confirm());

    assert_eq!(session.crop(), None);
    assert_eq!(session.display_frame().dimensions(), (100, 100));
}

#[test]
fn test_events_after_cancel_are_ignored() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let out = dir.path().join("markers.csv");
    let mut session = uniform_session(AMBER, &out);

    click(&mut session, 5, 5);
    type_text(&mut session, "Tip");
    session.cancel();
    assert!(session.is_terminated());

    click(&mut session, 5, 5);
    assert!(!session.on_type_char('x'));
    assert!(!session.on_commit_marker());
    assert!(!session.on_confirm());
    assert_eq!(session.on_save_request(), SaveOutcome::NotAvailable);

    assert!(!out.exists());
    assert!(session.markers().is_empty());
    assert_eq!(session.open_name(), "");
    assert!(!session.color_set());
}

#[test]
fn test_save_not_available_before_marker_step() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let out = dir.path().join("markers.csv");
    let mut session = MarkerSession::new(
        RgbImage::from_pixel(10, 10, GRAY),
        options(&out).background_step(true),
    );

    assert_eq!(session.on_save_request(), SaveOutcome::NotAvailable);
    assert!(!out.exists());
}
