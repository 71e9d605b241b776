//! `HTMLAudioElement` playback device

use crate::device::{PlayRequest, PlaybackDevice};
use js_sys::Promise;
use wasm_bindgen::JsValue;
use web_sys::HtmlAudioElement;

/// Play request handed to the browser, waiting to be observed
pub(crate) struct IssuedPlay {
    pub request: PlayRequest,
    pub promise: Result<Promise, JsValue>,
}

/// Device backed by a page's audio element
///
/// `play()` returns a promise; the device only records it; the bindings
/// attach the resolution handlers once the player borrow is released.
pub struct AudioElementDevice {
    element: HtmlAudioElement,
    issued: Vec<IssuedPlay>,
}

impl AudioElementDevice {
    pub fn new(element: HtmlAudioElement) -> Self {
        Self {
            element,
            issued: Vec::new(),
        }
    }

    pub fn element(&self) -> &HtmlAudioElement {
        &self.element
    }

    pub(crate) fn take_issued(&mut self) -> Vec<IssuedPlay> {
        std::mem::take(&mut self.issued)
    }
}

impl PlaybackDevice for AudioElementDevice {
    fn load(&mut self, url: &str) {
        self.element.set_src(url);
        self.element.load();
    }

    fn request_play(&mut self, request: PlayRequest) {
        let promise = self.element.play();
        self.issued.push(IssuedPlay { request, promise });
    }

    fn pause(&mut self) {
        // Only throws on a detached element
        self.element.pause().ok();
    }

    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn set_current_time(&mut self, secs: f64) {
        self.element.set_current_time(secs);
    }

    fn duration(&self) -> Option<f64> {
        let duration = self.element.duration();
        (!duration.is_nan()).then_some(duration)
    }

    fn set_volume(&mut self, volume: f32) {
        self.element.set_volume(f64::from(volume));
    }
}
