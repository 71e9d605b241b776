//! WASM-compatible player wrapper

use super::device::{AudioElementDevice, IssuedPlay};
use crate::{Direction, Player, PlayerConfig, PlayerEvent, PlayRequest, Track};
use js_sys::Function;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlAudioElement;

type PromiseHandler = Closure<dyn FnMut(JsValue)>;

#[derive(Default, Clone)]
struct Callbacks {
    on_track_change: Option<Function>,
    on_state_change: Option<Function>,
    on_progress: Option<Function>,
    on_queue_change: Option<Function>,
    on_repeat_change: Option<Function>,
    on_shuffle_change: Option<Function>,
    on_volume_change: Option<Function>,
    on_error: Option<Function>,
}

struct Inner {
    player: Player<AudioElementDevice>,
    callbacks: Callbacks,

    // Resolution handlers per play request, kept alive until the promise
    // settles and freed on a later turn
    in_flight: HashMap<u64, (PromiseHandler, PromiseHandler)>,
    settled: Vec<u64>,
}

/// Browser playlist player
///
/// Wraps the core [`Player`] around an `<audio>` element with a
/// JavaScript-friendly API. Every exported method takes `&self`; state
/// lives behind `Rc<RefCell<_>>`, so callbacks fired during a call may call
/// back into the same player object.
#[wasm_bindgen]
pub struct WasmPlayer {
    inner: Rc<RefCell<Inner>>,
    _listeners: Vec<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Create a player driving `element`
    ///
    /// `config` is an optional `{ initial_volume, repeat, shuffle }` object.
    #[wasm_bindgen(constructor)]
    pub fn new(element: HtmlAudioElement, config: JsValue) -> Result<WasmPlayer, JsValue> {
        console_error_panic_hook::set_once();

        let config: PlayerConfig = if config.is_undefined() || config.is_null() {
            PlayerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };
        config.validate().map_err(|e| JsValue::from_str(&e))?;

        let inner = Rc::new(RefCell::new(Inner {
            player: Player::new(AudioElementDevice::new(element.clone()), config),
            callbacks: Callbacks::default(),
            in_flight: HashMap::new(),
            settled: Vec::new(),
        }));

        let on_ended = listener(&inner, |player| {
            player.on_playback_finished().ok();
        });
        let on_error = listener(&inner, |player| {
            let reason = player
                .device()
                .element()
                .error()
                .map(|e| format!("Media error code {}", e.code()))
                .unwrap_or_else(|| "Media error".to_string());
            player.on_device_error(&reason);
        });
        let on_time_update = listener(&inner, |player| player.on_time_update());

        element.set_onended(Some(on_ended.as_ref().unchecked_ref()));
        element.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        element.set_ontimeupdate(Some(on_time_update.as_ref().unchecked_ref()));

        Ok(Self {
            inner,
            _listeners: vec![on_ended, on_error, on_time_update],
        })
    }

    // ===== Queue =====

    /// Load the track list (array of track objects)
    #[wasm_bindgen(js_name = loadTracks)]
    pub fn load_tracks(&self, tracks: JsValue) -> Result<(), JsValue> {
        let tracks: Vec<Track> = serde_wasm_bindgen::from_value(tracks)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse tracks: {}", e)))?;

        let result = self.with_player(|player| player.load(tracks));
        result.map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Number of tracks in the queue
    #[wasm_bindgen(js_name = queueLength)]
    pub fn queue_length(&self) -> usize {
        self.inner.borrow().player.queue().len()
    }

    /// Tracks in playback order
    #[wasm_bindgen(js_name = getQueue)]
    pub fn get_queue(&self) -> JsValue {
        let inner = self.inner.borrow();
        serde_wasm_bindgen::to_value(inner.player.queue().tracks()).unwrap_or(JsValue::NULL)
    }

    // ===== Playback Control =====

    /// Play the track at `index`; out-of-range indices are ignored
    #[wasm_bindgen(js_name = playTrackAt)]
    pub fn play_track_at(&self, index: usize) {
        self.with_player(|player| player.play_track_at(index).ok());
    }

    #[wasm_bindgen(js_name = togglePlayPause)]
    pub fn toggle_play_pause(&self) {
        self.with_player(|player| player.toggle_play_pause().ok());
    }

    pub fn next(&self) {
        self.with_player(|player| player.advance(Direction::Next).ok());
    }

    pub fn previous(&self) {
        self.with_player(|player| player.advance(Direction::Previous).ok());
    }

    /// Seek by ratio (0.0 - 1.0)
    #[wasm_bindgen(js_name = seekTo)]
    pub fn seek_to(&self, fraction: f64) {
        self.with_player(|player| player.seek_to(fraction));
    }

    /// Set volume by ratio (0.0 - 1.0)
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&self, fraction: f32) {
        self.with_player(|player| player.set_volume(fraction));
    }

    // ===== Shuffle & Repeat =====

    #[wasm_bindgen(js_name = toggleShuffle)]
    pub fn toggle_shuffle(&self) -> bool {
        self.with_player(|player| player.toggle_shuffle())
    }

    /// Advance repeat mode and return it ("off" | "all" | "one")
    #[wasm_bindgen(js_name = cycleRepeat)]
    pub fn cycle_repeat(&self) -> String {
        self.with_player(|player| player.cycle_repeat()).as_str().to_string()
    }

    // ===== State Queries =====

    /// "idle" | "loading" | "playing" | "paused"
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        self.inner.borrow().player.state().as_str().to_string()
    }

    #[wasm_bindgen(js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.inner.borrow().player.is_playing()
    }

    /// Index of the selected track, or -1
    #[wasm_bindgen(js_name = currentIndex)]
    pub fn current_index(&self) -> i32 {
        self.inner
            .borrow()
            .player
            .queue()
            .current_index()
            .and_then(|i| i32::try_from(i).ok())
            .unwrap_or(-1)
    }

    /// Full state snapshot
    #[wasm_bindgen(js_name = getSnapshot)]
    pub fn get_snapshot(&self) -> JsValue {
        let snapshot = self.inner.borrow().player.snapshot();
        serde_wasm_bindgen::to_value(&snapshot).unwrap_or(JsValue::NULL)
    }

    // ===== Event Listeners =====

    /// `(track, index)`
    #[wasm_bindgen(js_name = onTrackChange)]
    pub fn on_track_change(&self, callback: Function) {
        self.inner.borrow_mut().callbacks.on_track_change = Some(callback);
    }

    /// `(state, isPlaying)`
    #[wasm_bindgen(js_name = onStateChange)]
    pub fn on_state_change(&self, callback: Function) {
        self.inner.borrow_mut().callbacks.on_state_change = Some(callback);
    }

    /// `(currentTime, duration)`
    #[wasm_bindgen(js_name = onProgress)]
    pub fn on_progress(&self, callback: Function) {
        self.inner.borrow_mut().callbacks.on_progress = Some(callback);
    }

    /// `(event)` for queue loads and reorders
    #[wasm_bindgen(js_name = onQueueChange)]
    pub fn on_queue_change(&self, callback: Function) {
        self.inner.borrow_mut().callbacks.on_queue_change = Some(callback);
    }

    #[wasm_bindgen(js_name = onRepeatChange)]
    pub fn on_repeat_change(&self, callback: Function) {
        self.inner.borrow_mut().callbacks.on_repeat_change = Some(callback);
    }

    #[wasm_bindgen(js_name = onShuffleChange)]
    pub fn on_shuffle_change(&self, callback: Function) {
        self.inner.borrow_mut().callbacks.on_shuffle_change = Some(callback);
    }

    #[wasm_bindgen(js_name = onVolumeChange)]
    pub fn on_volume_change(&self, callback: Function) {
        self.inner.borrow_mut().callbacks.on_volume_change = Some(callback);
    }

    /// `(message)` when playback is rejected
    #[wasm_bindgen(js_name = onError)]
    pub fn on_error(&self, callback: Function) {
        self.inner.borrow_mut().callbacks.on_error = Some(callback);
    }
}

impl WasmPlayer {
    fn with_player<T>(&self, f: impl FnOnce(&mut Player<AudioElementDevice>) -> T) -> T {
        let result = {
            let mut inner = self.inner.borrow_mut();
            inner.release_settled();
            f(&mut inner.player)
        };
        flush(&self.inner);
        result
    }
}

impl Inner {
    fn release_settled(&mut self) {
        for id in self.settled.drain(..) {
            self.in_flight.remove(&id);
        }
    }
}

/// Media element listener that runs `f` on the player and flushes
fn listener(
    inner: &Rc<RefCell<Inner>>,
    f: impl Fn(&mut Player<AudioElementDevice>) + 'static,
) -> Closure<dyn FnMut()> {
    let inner = Rc::clone(inner);
    Closure::<dyn FnMut()>::new(move || {
        {
            let mut guard = inner.borrow_mut();
            guard.release_settled();
            f(&mut guard.player);
        }
        flush(&inner);
    })
}

/// Attach handlers to new play promises and deliver queued events
///
/// JS callbacks run without the `Inner` borrow. Together with the shared
/// `&self` receivers this lets a callback re-enter the player.
fn flush(inner: &Rc<RefCell<Inner>>) {
    let (issued, events, callbacks) = {
        let mut guard = inner.borrow_mut();
        let issued = guard.player.device_mut().take_issued();
        let events = guard.player.drain_events();
        (issued, events, guard.callbacks.clone())
    };

    for IssuedPlay { request, promise } in issued {
        match promise {
            Ok(promise) => watch_promise(inner, request, &promise),
            Err(error) => {
                inner
                    .borrow_mut()
                    .player
                    .on_play_resolved(request, Err(describe(&error)));
            }
        }
    }

    for event in &events {
        dispatch(&callbacks, event);
    }

    // Synchronous rejections above may have queued more events
    if inner.borrow().player.has_pending_events() {
        flush(inner);
    }
}

fn watch_promise(inner: &Rc<RefCell<Inner>>, request: PlayRequest, promise: &js_sys::Promise) {
    let on_ok = resolution_handler(inner, request, true);
    let on_err = resolution_handler(inner, request, false);
    // The chained promise is not needed
    let _ = promise.then2(&on_ok, &on_err);
    inner
        .borrow_mut()
        .in_flight
        .insert(request.id(), (on_ok, on_err));
}

fn resolution_handler(inner: &Rc<RefCell<Inner>>, request: PlayRequest, ok: bool) -> PromiseHandler {
    let inner = Rc::clone(inner);
    Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
        {
            let mut guard = inner.borrow_mut();
            let outcome = if ok { Ok(()) } else { Err(describe(&value)) };
            guard.player.on_play_resolved(request, outcome);
            guard.settled.push(request.id());
        }
        flush(&inner);
    })
}

fn describe(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value
        .as_string()
        .unwrap_or_else(|| "Playback failed".to_string())
}

fn dispatch(callbacks: &Callbacks, event: &PlayerEvent) {
    let this = JsValue::NULL;
    match event {
        PlayerEvent::TrackChanged { index, track } => {
            if let Some(ref cb) = callbacks.on_track_change {
                if let Ok(js_track) = serde_wasm_bindgen::to_value(track) {
                    cb.call2(&this, &js_track, &JsValue::from(*index as u32)).ok();
                }
            }
        }
        PlayerEvent::PlaybackStateChanged { state, is_playing } => {
            if let Some(ref cb) = callbacks.on_state_change {
                cb.call2(&this, &JsValue::from_str(state.as_str()), &JsValue::from_bool(*is_playing))
                    .ok();
            }
        }
        PlayerEvent::Progress {
            current_time,
            duration,
        } => {
            if let Some(ref cb) = callbacks.on_progress {
                cb.call2(&this, &JsValue::from_f64(*current_time), &JsValue::from_f64(*duration))
                    .ok();
            }
        }
        PlayerEvent::QueueLoaded { .. } | PlayerEvent::QueueReordered { .. } => {
            if let Some(ref cb) = callbacks.on_queue_change {
                if let Ok(js_event) = serde_wasm_bindgen::to_value(event) {
                    cb.call1(&this, &js_event).ok();
                }
            }
        }
        PlayerEvent::RepeatModeChanged { mode } => {
            if let Some(ref cb) = callbacks.on_repeat_change {
                cb.call1(&this, &JsValue::from_str(mode.as_str())).ok();
            }
        }
        PlayerEvent::ShuffleChanged { enabled } => {
            if let Some(ref cb) = callbacks.on_shuffle_change {
                cb.call1(&this, &JsValue::from_bool(*enabled)).ok();
            }
        }
        PlayerEvent::VolumeChanged { volume } => {
            if let Some(ref cb) = callbacks.on_volume_change {
                cb.call1(&this, &JsValue::from_f64(f64::from(*volume))).ok();
            }
        }
        PlayerEvent::PlaybackRejected { reason, .. } => match callbacks.on_error {
            Some(ref cb) => {
                cb.call1(&this, &JsValue::from_str(reason)).ok();
            }
            None => web_sys::console::warn_1(&JsValue::from_str(reason)),
        },
    }
}
