// Host-side tests for the per-placement sound controller.

mod common;

use common::catalog::{Catalog, ModelId};
use common::sound::*;
use common::MockAudio;

fn controller() -> SoundController<MockAudio> {
    SoundController::new(MockAudio::default())
}

fn expect_load(action: SoundAction) -> SoundRequest {
    match action {
        SoundAction::Load(req) => req,
        other => panic!("expected a load, got {:?}", other),
    }
}

#[test]
fn first_placement_requests_mapped_file() {
    let catalog = Catalog::default();
    let mut s = controller();
    let req = expect_load(s.on_placed(ModelId(2), &catalog));
    assert_eq!(req.file, "b.mp3");
    assert_eq!(req.url, "./assets/audio/b.mp3");
    assert!(s.is_loading());
    assert_eq!(s.current_file(), Some("b.mp3"));

    assert!(s.on_buffer_ready(req.ticket, Ok("b")));
    assert!(!s.is_loading());
    assert_eq!(s.backend().installed, Some("b"));
    assert!(s.backend().playing);
    assert_eq!(s.backend().calls(), vec!["install b", "play"]);
}

#[test]
fn same_file_restarts_without_reload() {
    let catalog = Catalog::default();
    let mut s = controller();
    let req = expect_load(s.on_placed(ModelId(1), &catalog));
    s.on_buffer_ready(req.ticket, Ok("a"));
    s.backend().clear_calls();

    assert_eq!(s.on_placed(ModelId(1), &catalog), SoundAction::Restarted);
    assert_eq!(s.backend().calls(), vec!["stop", "play"]);
    assert_eq!(s.backend().installed, Some("a"));
}

#[test]
fn same_file_while_loading_is_pending() {
    let catalog = Catalog::default();
    let mut s = controller();
    let req = expect_load(s.on_placed(ModelId(3), &catalog));
    assert_eq!(s.on_placed(ModelId(3), &catalog), SoundAction::Pending);
    assert!(s.on_buffer_ready(req.ticket, Ok("c")));
}

#[test]
fn switching_files_releases_old_source_first() {
    let catalog = Catalog::default();
    let mut s = controller();
    let first = expect_load(s.on_placed(ModelId(1), &catalog));
    s.on_buffer_ready(first.ticket, Ok("a"));
    s.backend().clear_calls();

    let second = expect_load(s.on_placed(ModelId(4), &catalog));
    assert_eq!(second.file, "d.mp3");
    assert_eq!(s.backend().calls(), vec!["release"]);
    assert_ne!(first.ticket, second.ticket);
}

#[test]
fn stale_buffer_is_dropped() {
    let catalog = Catalog::default();
    let mut s = controller();
    let first = expect_load(s.on_placed(ModelId(1), &catalog));
    let second = expect_load(s.on_placed(ModelId(2), &catalog));

    assert!(!s.on_buffer_ready(first.ticket, Ok("a")));
    assert_eq!(s.backend().installed, None);
    assert!(s.on_buffer_ready(second.ticket, Ok("b")));
    assert_eq!(s.backend().installed, Some("b"));
}

#[test]
fn unmapped_model_releases_and_stays_silent() {
    let catalog = Catalog::default();
    let mut s = controller();
    let req = expect_load(s.on_placed(ModelId(1), &catalog));
    s.on_buffer_ready(req.ticket, Ok("a"));
    s.backend().clear_calls();

    assert_eq!(s.on_placed(ModelId(5), &catalog), SoundAction::Silent);
    assert_eq!(s.backend().calls(), vec!["release"]);
    assert_eq!(s.current_file(), None);
    assert!(!s.backend().playing);
}

#[test]
fn decode_failure_clears_state() {
    let catalog = Catalog::default();
    let mut s = controller();
    let req = expect_load(s.on_placed(ModelId(2), &catalog));
    assert!(!s.on_buffer_ready(req.ticket, Err("bad mp3".to_string())));
    assert_eq!(s.current_file(), None);
    assert!(!s.is_loading());

    // Placing the same model again retries the load.
    let retry = expect_load(s.on_placed(ModelId(2), &catalog));
    assert_eq!(retry.file, "b.mp3");
}

#[test]
fn shutdown_releases_everything() {
    let catalog = Catalog::default();
    let mut s = controller();
    let req = expect_load(s.on_placed(ModelId(1), &catalog));
    s.on_buffer_ready(req.ticket, Ok("a"));
    s.shutdown();
    assert_eq!(s.current_file(), None);
    assert_eq!(s.backend().installed, None);
    assert!(!s.backend().playing);
}
