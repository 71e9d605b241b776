//! Browser binding tests
//!
//! Run with `wasm-pack test --headless --firefox -- --features wasm`.

#![cfg(all(target_arch = "wasm32", feature = "wasm"))]

use cadence_playback::wasm::WasmPlayer;
use js_sys::Function;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;
use web_sys::HtmlAudioElement;

wasm_bindgen_test_configure!(run_in_browser);

fn create_player() -> JsValue {
    let element = HtmlAudioElement::new().unwrap();
    WasmPlayer::new(element, JsValue::UNDEFINED).unwrap().into()
}

/// Runs `body` as a JS function of `player` and returns its result
fn run_js(player: &JsValue, body: &str) -> JsValue {
    Function::new_with_args("player", body)
        .call1(&JsValue::NULL, player)
        .unwrap()
}

const TRACKS: &str = r#"[
    { id: "a", title: "First", artist: "Band", sourceUrl: "data:audio/wav;base64," },
    { id: "b", title: "Second", artist: "Band", sourceUrl: "data:audio/wav;base64," }
]"#;

#[wasm_bindgen_test]
fn callbacks_can_read_player_during_command() {
    let player = create_player();

    let seen = run_js(
        &player,
        &format!(
            r#"
            const seen = {{}};
            player.onTrackChange((track, index) => {{
                seen.index = player.currentIndex();
                seen.snapshot = player.getSnapshot();
            }});
            player.onStateChange((state) => {{
                seen.state = player.getState();
            }});
            player.loadTracks({TRACKS});
            player.playTrackAt(1);
            return seen;
            "#
        ),
    );

    let index = js_sys::Reflect::get(&seen, &"index".into()).unwrap();
    assert_eq!(index.as_f64(), Some(1.0));

    let snapshot = js_sys::Reflect::get(&seen, &"snapshot".into()).unwrap();
    assert!(snapshot.is_object());

    let state = js_sys::Reflect::get(&seen, &"state".into()).unwrap();
    assert_eq!(state.as_string().as_deref(), Some("loading"));
}

#[wasm_bindgen_test]
fn callbacks_can_issue_commands() {
    let player = create_player();

    let shuffled = run_js(
        &player,
        &format!(
            r#"
            player.onQueueChange((event) => {{
                if (event.type === "queueLoaded") {{
                    player.toggleShuffle();
                }}
            }});
            player.loadTracks({TRACKS});
            return player.getSnapshot().isShuffle;
            "#
        ),
    );

    assert_eq!(shuffled.as_bool(), Some(true));
}

#[wasm_bindgen_test]
fn repeated_ids_are_rejected() {
    let player = create_player();

    let error = run_js(
        &player,
        r#"
        try {
            player.loadTracks([
                { id: "a", title: "First", artist: "Band", sourceUrl: "a.mp3" },
                { id: "a", title: "Second", artist: "Band", sourceUrl: "b.mp3" }
            ]);
            return null;
        } catch (e) {
            return String(e);
        }
        "#,
    );

    assert!(error.as_string().unwrap().contains("Duplicate track id: a"));
    assert_eq!(
        run_js(&player, "return player.queueLength();").as_f64(),
        Some(0.0)
    );
}
