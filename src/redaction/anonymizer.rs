//! Placeholder substitution.
//!
//! Walks the accepted spans left to right, copying original characters
//! outside spans and substituting the per-type placeholder at each span.
//! Substitution is length-changing; output offsets do not track input
//! offsets. The original text is kept unaltered in the result.

use crate::catalog::PatternCatalog;
use crate::domain::Span;

/// Produce the redacted text for `text` and a non-overlapping span set
/// sorted ascending by start.
pub fn apply_placeholders(text: &str, spans: &[Span], catalog: &PatternCatalog) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;

    for span in spans {
        let start = span.start.min(chars.len());
        let end = span.end.min(chars.len());
        if start < cursor {
            continue;
        }
        out.extend(chars[cursor..start].iter());
        out.push_str(catalog.placeholder(span.entity_type));
        cursor = end;
    }

    out.extend(chars[cursor..].iter());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntityType;

    fn catalog() -> &'static PatternCatalog {
        PatternCatalog::global().unwrap()
    }

    #[test]
    fn test_single_substitution() {
        let text = "Call 416-555-1234 now.";
        let spans = vec![Span::new(EntityType::Phone, 5, 17, 0.8, "phone")];
        assert_eq!(
            apply_placeholders(text, &spans, catalog()),
            "Call <PHONE> now."
        );
    }

    #[test]
    fn test_multiple_substitutions_left_to_right() {
        let text = "A: john@x.ca B: 416-555-1234";
        let spans = vec![
            Span::new(EntityType::Email, 3, 12, 0.9, "email"),
            Span::new(EntityType::Phone, 16, 28, 0.8, "phone"),
        ];
        assert_eq!(
            apply_placeholders(text, &spans, catalog()),
            "A: <EMAIL> B: <PHONE>"
        );
    }

    #[test]
    fn test_no_spans_returns_original() {
        let text = "Nothing sensitive here.";
        assert_eq!(apply_placeholders(text, &[], catalog()), text);
    }

    #[test]
    fn test_char_offsets_with_multibyte_text() {
        let text = "Hélène: 416-555-1234";
        // phone starts at char 8, byte offset differs
        let spans = vec![Span::new(EntityType::Phone, 8, 20, 0.8, "phone")];
        assert_eq!(
            apply_placeholders(text, &spans, catalog()),
            "Hélène: <PHONE>"
        );
    }

    #[test]
    fn test_span_at_text_end() {
        let text = "HCN 1234567897";
        let spans = vec![Span::new(EntityType::OnHcn, 4, 14, 0.85, "on")];
        assert_eq!(apply_placeholders(text, &spans, catalog()), "HCN <ON_HCN>");
    }
}
