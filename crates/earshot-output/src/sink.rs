//! Output sinks: speech, tactile display, audio cues and focus highlight

use earshot_core::{EarconId, Rect, SelectionSpan};
use indexmap::IndexMap;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Render-wide speech flags set by `!flag` tokens (e.g. `doNotInterrupt`)
pub type SpeechProperties = IndexMap<String, bool>;

/// Callback run when an utterance starts or finishes playing
pub type SpeechCallback = Box<dyn FnOnce() + Send>;

/// How an utterance interacts with speech already playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueMode {
    /// Cancel current speech
    Flush,
    /// Play after current speech
    Queue,
}

/// One entry of the speech queue
pub struct Utterance {
    pub text: String,
    pub mode: QueueMode,
    pub properties: SpeechProperties,
    pub on_start: Option<SpeechCallback>,
    pub on_end: Option<SpeechCallback>,
}

impl Utterance {
    /// Create an utterance without callbacks
    pub fn new(text: impl Into<String>, mode: QueueMode) -> Self {
        Self {
            text: text.into(),
            mode,
            properties: SpeechProperties::new(),
            on_start: None,
            on_end: None,
        }
    }

    /// Notify that playback started; runs the start callback once
    pub fn started(&mut self) {
        if let Some(callback) = self.on_start.take() {
            callback();
        }
    }

    /// Notify that playback finished; runs the end callback once
    pub fn finished(&mut self) {
        if let Some(callback) = self.on_end.take() {
            callback();
        }
    }
}

impl fmt::Debug for Utterance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Utterance")
            .field("text", &self.text)
            .field("mode", &self.mode)
            .field("properties", &self.properties)
            .field("on_start", &self.on_start.is_some())
            .field("on_end", &self.on_end.is_some())
            .finish()
    }
}

/// Joined tactile text with the selection re-based to absolute offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TactileOutput {
    pub text: String,
    /// Selected characters of `text`
    pub selection: Option<SelectionSpan>,
    /// Extent of the fragment carrying the selection
    pub value_span: Option<SelectionSpan>,
}

/// Speech synthesizer
pub trait SpeechSink {
    fn speak(&mut self, utterance: Utterance);
}

/// Tactile (braille) display
pub trait TactileSink {
    fn write(&mut self, output: TactileOutput);
}

/// Audio cue player
///
/// Called from utterance start callbacks, possibly on the synthesizer's
/// thread.
pub trait EarconSink: Send + Sync {
    fn play(&self, earcon: &EarconId);
}

/// Focus ring / highlight display
pub trait HighlightSink {
    fn set_highlight_regions(&mut self, regions: &[Rect]);
}

/// The collaborators a [`Rendered`](crate::Rendered) output is executed against
pub struct Sinks<'a> {
    pub speech: &'a mut dyn SpeechSink,
    pub tactile: &'a mut dyn TactileSink,
    pub earcons: Arc<dyn EarconSink>,
    pub highlight: &'a mut dyn HighlightSink,
}

/// Records speech, tactile and highlight output
#[derive(Debug, Default)]
pub struct Recorder {
    pub utterances: Vec<Utterance>,
    pub tactile: Vec<TactileOutput>,
    pub highlights: Vec<Vec<Rect>>,
}

impl Recorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of every recorded utterance
    pub fn spoken(&self) -> Vec<&str> {
        self.utterances.iter().map(|u| u.text.as_str()).collect()
    }

    /// Start and finish every recorded utterance in order, as a synthesizer would
    pub fn play_all(&mut self) {
        for utterance in &mut self.utterances {
            utterance.started();
            utterance.finished();
        }
    }
}

impl SpeechSink for Recorder {
    fn speak(&mut self, utterance: Utterance) {
        tracing::debug!(text = %utterance.text, mode = ?utterance.mode, "speak");
        self.utterances.push(utterance);
    }
}

impl TactileSink for Recorder {
    fn write(&mut self, output: TactileOutput) {
        tracing::debug!(text = %output.text, selection = ?output.selection, "tactile");
        self.tactile.push(output);
    }
}

impl HighlightSink for Recorder {
    fn set_highlight_regions(&mut self, regions: &[Rect]) {
        self.highlights.push(regions.to_vec());
    }
}

/// Records every earcon played
#[derive(Debug, Default)]
pub struct EarconLog {
    played: Mutex<Vec<EarconId>>,
}

impl EarconLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Earcons played so far, in order
    pub fn played(&self) -> Vec<EarconId> {
        match self.played.lock() {
            Ok(played) => played.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl EarconSink for EarconLog {
    fn play(&self, earcon: &EarconId) {
        tracing::debug!(%earcon, "earcon");
        match self.played.lock() {
            Ok(mut played) => played.push(earcon.clone()),
            Err(poisoned) => poisoned.into_inner().push(earcon.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_callbacks_run_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let on_start = Arc::clone(&count);
        let mut utterance = Utterance::new("OK", QueueMode::Flush);
        utterance.on_start = Some(Box::new(move || {
            on_start.fetch_add(1, Ordering::SeqCst);
        }));

        utterance.started();
        utterance.started();
        utterance.finished();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_earcon_log() {
        let log = EarconLog::new();
        log.play(&EarconId::new("DING"));
        log.play(&EarconId::new("BUTTON"));
        assert_eq!(log.played(), vec![EarconId::new("DING"), EarconId::new("BUTTON")]);
    }
}
