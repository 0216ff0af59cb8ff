mod builder;
mod span;

pub use self::builder::DiagnosticBuilder;
pub use self::span::Span;

#[derive(Clone, Copy, Debug)]
enum Level {
    Error,
    Help,
    Note,
}

/// Source text that diagnostics are rendered against.
pub struct DiagnosticsContext<'src> {
    source: &'src str,
    origin: Option<String>,
    color: bool,
}

impl<'src> DiagnosticsContext<'src> {
    pub fn new(source: &'src str, origin: Option<String>) -> Self {
        Self {
            source,
            origin,
            color: true,
        }
    }

    /// Turns off ANSI colours in rendered diagnostics.
    pub fn without_color(mut self) -> Self {
        self.color = false;
        self
    }

    pub fn build_error(&self, message: impl ToString) -> DiagnosticBuilder {
        DiagnosticBuilder::new(message.to_string(), Level::Error, self)
    }

    pub fn build_error_span(&self, span: Span, message: impl ToString) -> DiagnosticBuilder {
        self.build_error(message).with_span(span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_title_label_and_notes() {
        let source = "program p;\nvar x: integer;\nbegin\n  x := 'a';\nend.";
        let ctx = DiagnosticsContext::new(source, Some("p.pas".into())).without_color();

        let rendered = ctx
            .build_error("mismatched types")
            .span_label(Span::new(40, 3, 4, 8), "this is a string")
            .note("`x` is declared as an integer")
            .render();

        assert!(rendered.contains("error: mismatched types"));
        assert!(rendered.contains("p.pas"));
        assert!(rendered.contains("x := 'a';"));
        assert!(rendered.contains("this is a string"));
        assert!(rendered.contains("note: `x` is declared as an integer"));
    }

    #[test]
    fn eof_span_on_empty_source() {
        let ctx = DiagnosticsContext::new("", None).without_color();
        let rendered = ctx
            .build_error("unexpected end of file")
            .with_eof_span()
            .render();

        assert!(rendered.contains("unexpected end of file"));
    }

    #[test]
    fn footers_without_a_span() {
        let ctx = DiagnosticsContext::new("x", None).without_color();
        let rendered = ctx.build_error("no program").help("remove it").render();

        assert!(rendered.contains("error: no program"));
        assert!(rendered.contains("help: remove it"));
    }
}
