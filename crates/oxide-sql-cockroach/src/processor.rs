//! CockroachDB result processor.

use oxide_sql_core::processor::Processor;

/// Words that continue a multi-word type name after a cast.
const TYPE_CONTINUATIONS: &[&str] = &["varying", "precision", "with", "without", "time", "zone"];

/// Normalises CockroachDB catalog rows.
///
/// CockroachDB reports defaults with explicit casts (`'x':::STRING`,
/// `now():::TIMESTAMPTZ`); they are stripped so defaults read like the
/// expressions that were declared.
#[derive(Debug, Default, Clone, Copy)]
pub struct CockroachProcessor;

impl CockroachProcessor {
    /// Creates a new processor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Processor for CockroachProcessor {
    fn normalize_default(&self, raw: &str) -> String {
        strip_casts(raw.trim())
    }
}

/// Removes `::TYPE` and `:::TYPE` casts outside string literals.
#[must_use]
pub fn strip_casts(expr: &str) -> String {
    let mut out = String::with_capacity(expr.len());
    let mut rest = expr;
    let mut in_literal = false;
    while let Some(c) = rest.chars().next() {
        if c == '\'' {
            in_literal = !in_literal;
        } else if !in_literal && rest.starts_with("::") {
            rest = skip_type(rest.trim_start_matches(':'));
            continue;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// Skips a type name: a word, optional `(..)` arguments, `[]` suffixes and
/// known continuation words (`character varying`, `time with time zone`).
fn skip_type(s: &str) -> &str {
    let mut rest = skip_word(s);
    loop {
        if rest.starts_with('(') {
            match rest.find(')') {
                Some(end) => rest = &rest[end + 1..],
                None => return "",
            }
        } else if let Some(after) = rest.strip_prefix("[]") {
            rest = after;
        } else {
            let trimmed = rest.trim_start();
            let word_end = trimmed
                .find(|c: char| !c.is_ascii_alphabetic())
                .unwrap_or(trimmed.len());
            let word = &trimmed[..word_end];
            if trimmed.len() < rest.len()
                && TYPE_CONTINUATIONS
                    .iter()
                    .any(|w| w.eq_ignore_ascii_case(word))
            {
                rest = &trimmed[word_end..];
            } else {
                return rest;
            }
        }
    }
}

fn skip_word(s: &str) -> &str {
    let end = s
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '.'))
        .unwrap_or(s.len());
    &s[end..]
}
