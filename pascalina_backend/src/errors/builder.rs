use annotate_snippets::{
    display_list::{DisplayList, FormatOptions},
    snippet::{Annotation, AnnotationType, Slice, Snippet, SourceAnnotation},
};

use super::{span::Span, DiagnosticsContext, Level};

impl From<Level> for AnnotationType {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => AnnotationType::Error,
            Level::Help => AnnotationType::Help,
            Level::Note => AnnotationType::Note,
        }
    }
}

/// A highlighted piece of source, optionally with a message.
struct Highlight {
    span: Span,
    level: Level,
    message: String,
}

/// Collects the parts of a diagnostic until it is rendered.
/// Highlights are drawn under the quoted source, footers
/// (`help: ...`, `note: ...`) below it.
#[must_use = "must emit the diagnostic for it to be seen"]
pub struct DiagnosticBuilder<'ctx, 'src> {
    title: String,
    level: Level,
    highlights: Vec<Highlight>,
    footers: Vec<(Level, String)>,
    context: &'ctx DiagnosticsContext<'src>,
}

impl<'ctx, 'src> DiagnosticBuilder<'ctx, 'src> {
    pub(super) fn new(
        title: String,
        level: Level,
        context: &'ctx DiagnosticsContext<'src>,
    ) -> Self {
        Self {
            title,
            level,
            highlights: Vec::new(),
            footers: Vec::new(),
            context,
        }
    }

    fn highlight(mut self, span: Span, level: Level, message: String) -> Self {
        self.highlights.push(Highlight {
            span,
            level,
            message,
        });
        self
    }

    /// Labels `span` at the diagnostic's own level.
    pub fn span_label(self, span: Span, message: impl ToString) -> Self {
        let level = self.level;
        self.highlight(span, level, message.to_string())
    }

    /// Labels `span` as a note, e.g. where a variable was declared.
    pub fn note_label(self, span: Span, message: impl ToString) -> Self {
        self.highlight(span, Level::Note, message.to_string())
    }

    pub fn with_span(self, span: Span) -> Self {
        let level = self.level;
        self.highlight(span, level, String::new())
    }

    /// Points at the last character of the source, for errors
    /// found after running out of tokens.
    pub fn with_eof_span(self) -> Self {
        match self.context.source.chars().count() {
            0 => self,

            len => {
                let level = self.level;
                self.highlight(Span::new(len - 1, 1, 0, 0), level, String::new())
            },
        }
    }

    pub fn help(mut self, message: impl ToString) -> Self {
        self.footers.push((Level::Help, message.to_string()));
        self
    }

    pub fn note(mut self, message: impl ToString) -> Self {
        self.footers.push((Level::Note, message.to_string()));
        self
    }

    pub fn render(self) -> String {
        let annotations = self
            .highlights
            .iter()
            .map(|highlight| SourceAnnotation {
                label: &highlight.message,
                range: (highlight.span.start, highlight.span.end()),
                annotation_type: highlight.level.into(),
            })
            .collect::<Vec<_>>();

        // Without a highlight there is nothing worth quoting
        let slices = if annotations.is_empty() {
            Vec::new()
        } else {
            vec![Slice {
                source: self.context.source,
                line_start: 1,
                origin: self.context.origin.as_deref(),
                fold: true,
                annotations,
            }]
        };

        let footer = self
            .footers
            .iter()
            .map(|(level, message)| Annotation {
                label: Some(message.as_str()),
                id: None,
                annotation_type: (*level).into(),
            })
            .collect();

        let snippet = Snippet {
            title: Some(Annotation {
                label: Some(&self.title),
                id: None,
                annotation_type: self.level.into(),
            }),
            footer,
            slices,
            opt: FormatOptions {
                color: self.context.color,
                ..Default::default()
            },
        };

        DisplayList::from(snippet).to_string()
    }

    pub fn emit(self) {
        eprintln!("{}", self.render());
    }
}
