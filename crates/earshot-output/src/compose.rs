//! Output composer
//!
//! Turns rendered buffers into a speech queue and a tactile buffer. This is
//! the only place where fragment effects become side effects.

use crate::sink::{EarconSink, QueueMode, SpeechCallback, SpeechProperties, TactileOutput, Utterance};
use earshot_core::{Buffer, Effect, SelectionSpan};
use std::sync::Arc;

/// One utterance per non-empty fragment, the first flushing current speech
///
/// Each utterance plays its fragment's earcons when it starts. `on_end` is
/// attached to the last utterance.
pub fn speech_queue(
    speech: &Buffer,
    properties: &SpeechProperties,
    earcons: &Arc<dyn EarconSink>,
    on_end: Option<SpeechCallback>,
) -> Vec<Utterance> {
    let mut queue: Vec<Utterance> = speech
        .iter()
        .filter(|fragment| !fragment.text.is_empty())
        .enumerate()
        .map(|(i, fragment)| {
            let mode = if i == 0 { QueueMode::Flush } else { QueueMode::Queue };
            let mut utterance = Utterance::new(fragment.text.clone(), mode);
            utterance.properties = properties.clone();
            let effects: Vec<Effect> = fragment.effects().cloned().collect();
            if !effects.is_empty() {
                let sink = Arc::clone(earcons);
                utterance.on_start = Some(Box::new(move || {
                    for effect in &effects {
                        match effect {
                            Effect::PlayEarcon(earcon) => sink.play(earcon),
                        }
                    }
                }));
            }
            utterance
        })
        .collect();

    if let Some(last) = queue.last_mut() {
        last.on_end = on_end;
    }
    queue
}

/// Join tactile fragments and re-base the first selection to absolute offsets
///
/// Empty fragments add no separator. Returns `None` for an empty buffer.
pub fn tactile_output(tactile: &Buffer, separator: &str) -> Option<TactileOutput> {
    if tactile.is_empty() {
        return None;
    }
    let mut text = String::new();
    let mut length = 0;
    let mut selection = None;
    let mut value_span = None;

    for fragment in tactile {
        if length > 0 && !fragment.text.is_empty() {
            text.push_str(separator);
            length += separator.chars().count();
        }
        let start = length;
        text.push_str(&fragment.text);
        length += fragment.char_len();

        if selection.is_none() {
            if let Some(span) = fragment.selection() {
                selection = Some(SelectionSpan::new(start + span.start, start + span.end));
                value_span = Some(SelectionSpan::new(start, length));
            }
        }
    }

    Some(TactileOutput {
        text,
        selection,
        value_span,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::EarconLog;
    use earshot_core::{Annotation, EarconId, Fragment};
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_tactile_selection_offset() {
        let mut tactile = Buffer::new();
        tactile.append(Fragment::new("Hello"), false);
        tactile.append(
            Fragment::new("World").with(Annotation::Selection(SelectionSpan::new(0, 5))),
            false,
        );

        let output = tactile_output(&tactile, " ").unwrap();
        assert_eq!(output.text, "Hello World");
        assert_eq!(output.selection, Some(SelectionSpan::new(6, 11)));
        assert_eq!(output.value_span, Some(SelectionSpan::new(6, 11)));
    }

    #[test]
    fn test_tactile_skips_empty_fragments() {
        let mut tactile = Buffer::new();
        tactile.append(Fragment::new("").with(Annotation::Attribute("value".into())), false);
        tactile.append(Fragment::new("btn"), false);
        tactile.append(Fragment::new("").with(Annotation::Attribute("name".into())), false);
        tactile.append(Fragment::new("OK"), false);

        let output = tactile_output(&tactile, " ").unwrap();
        assert_eq!(output.text, "btn OK");
        assert!(output.selection.is_none());
        assert!(tactile_output(&Buffer::new(), " ").is_none());
    }

    #[test]
    fn test_speech_queue_modes_and_effects() {
        let mut speech = Buffer::new();
        speech.append(
            Fragment::new("OK").with(Annotation::Action(Effect::PlayEarcon(EarconId::new("DING")))),
            false,
        );
        speech.append(Fragment::new("").with(Annotation::Attribute("value".into())), false);
        speech.append(Fragment::new("Button"), false);

        let log = Arc::new(EarconLog::new());
        let earcons: Arc<dyn EarconSink> = log.clone();
        let ended = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ended);
        let mut properties = SpeechProperties::new();
        properties.insert("doNotInterrupt".into(), true);

        let mut queue = speech_queue(
            &speech,
            &properties,
            &earcons,
            Some(Box::new(move || flag.store(true, Ordering::SeqCst))),
        );
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0].mode, QueueMode::Flush);
        assert_eq!(queue[1].mode, QueueMode::Queue);
        assert_eq!(queue[1].properties.get("doNotInterrupt"), Some(&true));
        assert!(queue[0].on_end.is_none());
        assert!(queue[1].on_start.is_none());

        queue[0].started();
        assert_eq!(log.played(), vec![EarconId::new("DING")]);

        queue[1].finished();
        assert!(ended.load(Ordering::SeqCst));
    }
}
