use core::fmt;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::JsValue;
use web_sys::HtmlAudioElement;

/// The two gameplay cues. Playback is fire-and-forget: element creation or
/// `play()` can fail (autoplay policy, missing asset) and the game must not
/// care, so every error is swallowed here.
pub(crate) struct CueDeck {
    correct: Option<HtmlAudioElement>,
    wrong: Option<HtmlAudioElement>,
    rejected: Closure<dyn FnMut(JsValue)>,
}

impl CueDeck {
    pub(crate) fn new() -> Self {
        Self {
            correct: Self::load("assets/correct.ogg"),
            wrong: Self::load("assets/wrong.ogg"),
            rejected: Closure::new(|err: JsValue| {
                log::debug!("audio cue rejected: {:?}", err);
            }),
        }
    }

    pub(crate) fn play_correct(&self) {
        self.play(&self.correct);
    }

    pub(crate) fn play_wrong(&self) {
        self.play(&self.wrong);
    }

    fn load(src: &str) -> Option<HtmlAudioElement> {
        match HtmlAudioElement::new_with_src(src) {
            Ok(element) => Some(element),
            Err(err) => {
                log::debug!("audio cue {} unavailable: {:?}", src, err);
                None
            }
        }
    }

    fn play(&self, element: &Option<HtmlAudioElement>) {
        let Some(element) = element else {
            return;
        };
        element.set_current_time(0.0);
        // `play()` can fail twice: synchronously, and through the returned
        // promise (autoplay policy). Both paths land in a debug log.
        match element.play() {
            Ok(promise) => {
                let _ = promise.catch(&self.rejected);
            }
            Err(err) => log::debug!("audio cue failed to play: {:?}", err),
        }
    }
}

impl fmt::Debug for CueDeck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CueDeck")
            .field("correct", &self.correct)
            .field("wrong", &self.wrong)
            .finish_non_exhaustive()
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn cues_never_panic_without_user_activation() {
        let cues = CueDeck::new();
        // No user gesture has happened, so autoplay rejection is the common
        // case; both cues must still be safe to fire.
        cues.play_correct();
        cues.play_wrong();
    }
}
