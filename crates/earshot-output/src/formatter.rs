//! Formatter entry points and rendered output

use crate::compose::{speech_queue, tactile_output};
use crate::config::FormatterConfig;
use crate::context::{Channel, RenderContext};
use crate::sink::{SpeechCallback, SpeechProperties, Sinks, TactileOutput};
use earshot_core::{AccessTree, Buffer, EventKind, Range, Rect};
use earshot_rules::{MessageResolver, RuleSet};

/// Output of one render, ready to execute
///
/// Plain data: a caller that has since rendered something newer can simply
/// drop it.
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    pub speech: Buffer,
    pub tactile: Buffer,
    /// Screen locations of the rendered nodes
    pub locations: Vec<Rect>,
    /// Flags set by `!flag` tokens
    pub properties: SpeechProperties,
    tactile_separator: String,
}

impl Rendered {
    /// Speech fragments joined with `separator`, skipping empty ones
    pub fn speech_text(&self, separator: &str) -> String {
        self.speech
            .iter()
            .map(|f| f.text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// The tactile buffer as it would be written to the display
    pub fn tactile_output(&self) -> Option<TactileOutput> {
        tactile_output(&self.tactile, &self.tactile_separator)
    }

    /// Joined tactile text
    pub fn tactile_text(&self) -> String {
        self.tactile_output().map(|o| o.text).unwrap_or_default()
    }

    /// Send the output to its sinks
    ///
    /// Queues one utterance per non-empty speech fragment, writes the
    /// tactile buffer when there is one, and reports the locations.
    /// `on_speech_end` runs when the last utterance finishes.
    pub fn execute(&self, sinks: &mut Sinks<'_>, on_speech_end: Option<SpeechCallback>) {
        for utterance in speech_queue(&self.speech, &self.properties, &sinks.earcons, on_speech_end) {
            sinks.speech.speak(utterance);
        }
        if let Some(output) = self.tactile_output() {
            sinks.tactile.write(output);
        }
        sinks.highlight.set_highlight_regions(&self.locations);
    }
}

/// Renders tree positions into speech and tactile output
pub struct Formatter<'a> {
    tree: &'a dyn AccessTree,
    rules: &'a RuleSet,
    messages: &'a dyn MessageResolver,
    config: FormatterConfig,
}

impl<'a> Formatter<'a> {
    /// Create a formatter with the default configuration
    pub fn new(tree: &'a dyn AccessTree, rules: &'a RuleSet, messages: &'a dyn MessageResolver) -> Self {
        Self {
            tree,
            rules,
            messages,
            config: FormatterConfig::default(),
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: FormatterConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    fn context(&self, channel: Channel) -> RenderContext<'_> {
        RenderContext::new(self.tree, self.rules, self.messages, &self.config, channel)
    }

    fn empty(&self) -> Rendered {
        Rendered {
            tactile_separator: self.config.tactile_separator.clone(),
            ..Rendered::default()
        }
    }

    fn render_channel(
        &self,
        channel: Channel,
        range: &Range,
        previous: Option<&Range>,
        event: &EventKind,
        out: &mut Rendered,
    ) {
        let mut ctx = self.context(channel);
        let mut buff = Buffer::new();
        ctx.render_range(range, previous, event.as_str(), &mut buff);
        out.properties.extend(ctx.properties);
        match channel {
            Channel::Speech => {
                out.speech = buff;
                out.locations = ctx.locations;
            }
            Channel::Tactile => out.tactile = buff,
        }
    }

    /// Render `range` for speech and tactile output
    ///
    /// `previous` is the range announced before; container transitions are
    /// computed against it (against the tree root when absent).
    pub fn render(&self, range: &Range, previous: Option<&Range>, event: &EventKind) -> Rendered {
        tracing::debug!(?range, %event, "render");
        let mut out = self.empty();
        self.render_channel(Channel::Speech, range, previous, event, &mut out);
        self.render_channel(Channel::Tactile, range, previous, event, &mut out);
        out
    }

    /// Render speech output only
    pub fn render_speech(&self, range: &Range, previous: Option<&Range>, event: &EventKind) -> Rendered {
        let mut out = self.empty();
        self.render_channel(Channel::Speech, range, previous, event, &mut out);
        out
    }

    /// Render tactile output only
    pub fn render_tactile(&self, range: &Range, previous: Option<&Range>, event: &EventKind) -> Rendered {
        let mut out = self.empty();
        self.render_channel(Channel::Tactile, range, previous, event, &mut out);
        out
    }

    /// Apply a template without a node, e.g. `@chrome_menu_closed $earcon(OBJECT_CLOSE)`
    ///
    /// Messages, flags and `$earcon` work; attribute tokens produce nothing.
    pub fn apply_template(&self, template: &str) -> Rendered {
        let mut out = self.empty();
        for channel in [Channel::Speech, Channel::Tactile] {
            let mut ctx = self.context(channel);
            let mut buff = Buffer::new();
            ctx.format(None, template, &mut buff, &[]);
            out.properties.extend(ctx.properties);
            match channel {
                Channel::Speech => out.speech = buff,
                Channel::Tactile => out.tactile = buff,
            }
        }
        out
    }
}
