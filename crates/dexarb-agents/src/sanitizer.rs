//! Best-effort repair of near-JSON generator output.
//!
//! [`sanitize`] runs an ordered list of named text transforms ([`STAGES`]).
//! Each stage is pure, idempotent on clean input and never fails. The parse
//! that follows is the real pass/fail gate.
//!
//! Every stage that looks at structure is string-aware: braces, comment
//! markers and parentheses inside a double-quoted string are content, not syntax.

use std::collections::HashSet;

use tracing::trace;

/// One named transform of the sanitizer pipeline.
#[derive(Clone, Copy)]
pub struct Stage {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage").field("name", &self.name).finish()
    }
}

/// The sanitizer pipeline, in application order.
pub const STAGES: [Stage; 6] = [
    Stage {
        name: "trim_to_object",
        apply: trim_to_object,
    },
    Stage {
        name: "strip_comments",
        apply: strip_comments,
    },
    Stage {
        name: "strip_parentheticals",
        apply: strip_parentheticals,
    },
    Stage {
        name: "dedupe_lines",
        apply: dedupe_lines,
    },
    Stage {
        name: "repair_syntax",
        apply: repair_syntax,
    },
    Stage {
        name: "balance_braces",
        apply: balance_braces,
    },
];

/// Repair raw generator text into candidate JSON. Never fails.
pub fn sanitize(raw: &str) -> String {
    STAGES.iter().fold(raw.to_string(), |text, stage| {
        let out = (stage.apply)(&text);
        trace!(stage = stage.name, before = text.len(), after = out.len(), "Sanitizer stage");
        out
    })
}

/// Tracks whether a left-to-right scan is inside a double-quoted string.
#[derive(Debug, Default, Clone, Copy)]
struct Quotes {
    in_string: bool,
    escaped: bool,
}

impl Quotes {
    /// Feed one char. Returns true if the char belongs to a string literal,
    /// including its delimiting quotes.
    fn step(&mut self, ch: char) -> bool {
        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if ch == '\\' {
                self.escaped = true;
            } else if ch == '"' {
                self.in_string = false;
            }
            true
        } else if ch == '"' {
            self.in_string = true;
            true
        } else {
            false
        }
    }
}

/// Copy the string literal starting at `chars[start] == '"'` into `out`.
/// Returns the index just past the closing quote (or the end of input).
fn copy_string(chars: &[char], start: usize, out: &mut String) -> usize {
    let mut quotes = Quotes::default();
    let mut i = start;
    while i < chars.len() {
        let ch = chars[i];
        quotes.step(ch);
        out.push(ch);
        i += 1;
        if !quotes.in_string {
            break;
        }
    }
    i
}

/// Index of the `close` matching the `open` at `chars[start]`, string-aware.
fn find_matching(chars: &[char], start: usize, open: char, close: char) -> Option<usize> {
    let mut quotes = Quotes::default();
    let mut depth = 0usize;
    for (i, &ch) in chars.iter().enumerate().skip(start) {
        if quotes.step(ch) {
            continue;
        }
        if ch == open {
            depth += 1;
        } else if ch == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Stage 1
// ---------------------------------------------------------------------------

/// Drop everything before the first `{` and after the last `}`.
/// Takes care of markdown fences and chatty preambles.
pub fn trim_to_object(text: &str) -> String {
    let trimmed = text.trim();
    let start = trimmed.find('{').unwrap_or(0);
    let rest = &trimmed[start..];
    let end = rest.rfind('}').map(|i| i + 1).unwrap_or(rest.len());
    rest[..end].trim().to_string()
}

// ---------------------------------------------------------------------------
// Stage 2
// ---------------------------------------------------------------------------

/// Remove `// line` and `/* block */` comments outside string literals.
pub fn strip_comments(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut quotes = Quotes::default();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if !quotes.in_string && ch == '/' {
            match chars.get(i + 1) {
                Some('/') => {
                    while i < chars.len() && chars[i] != '\n' {
                        i += 1;
                    }
                    continue;
                }
                Some('*') => {
                    i += 2;
                    while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                        i += 1;
                    }
                    i = (i + 2).min(chars.len());
                    continue;
                }
                _ => {}
            }
        }
        quotes.step(ch);
        out.push(ch);
        i += 1;
    }

    out
}

// ---------------------------------------------------------------------------
// Stage 3
// ---------------------------------------------------------------------------

/// Remove balanced `( ... )` asides inside every string literal, keeping the
/// surrounding text: `"Spread 0.9% (after fees) is fine"` becomes
/// `"Spread 0.9% is fine"`.
pub fn strip_parentheticals(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '"' {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        let mut literal = String::new();
        let end = copy_string(&chars, i, &mut literal);
        let closed = literal.len() >= 2 && {
            let mut q = Quotes::default();
            literal.chars().for_each(|c| {
                q.step(c);
            });
            !q.in_string
        };

        if closed {
            let content = &literal[1..literal.len() - 1];
            out.push('"');
            out.push_str(&drop_parentheticals(content));
            out.push('"');
        } else {
            out.push_str(&literal);
        }
        i = end;
    }

    out
}

/// Remove balanced parenthetical groups from plain text. Unbalanced parens are kept.
pub(crate) fn drop_parentheticals(content: &str) -> String {
    let chars: Vec<char> = content.chars().collect();
    let mut out = String::with_capacity(content.len());
    let mut removed = false;
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '(' {
            if let Some(close) = matching_paren(&chars, i) {
                removed = true;
                i = close + 1;
                if out.ends_with(char::is_whitespace) {
                    while i < chars.len() && chars[i].is_whitespace() {
                        i += 1;
                    }
                }
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }

    if removed {
        out.trim().to_string()
    } else {
        out
    }
}

fn matching_paren(chars: &[char], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &ch) in chars.iter().enumerate().skip(start) {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Stage 4
// ---------------------------------------------------------------------------

/// Comparison key for a line: alphanumerics only, lowercased.
fn line_key(line: &str) -> String {
    line.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Drop repeated lines and anything after the top-level object closes.
///
/// Lines are compared ignoring whitespace, punctuation and case. Lines that
/// start or end inside a string literal are kept verbatim, so multi-line
/// string values survive untouched. Lines without alphanumerics (`{`, `},`)
/// are never treated as duplicates.
pub fn dedupe_lines(text: &str) -> String {
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept: Vec<&str> = Vec::new();
    let mut quotes = Quotes::default();
    let mut depth: i64 = 0;
    let mut opened = false;

    for line in text.lines() {
        let starts_in_string = quotes.in_string;
        let mut scan = quotes;
        let mut delta = 0i64;
        for ch in line.chars() {
            if !scan.step(ch) {
                match ch {
                    '{' => delta += 1,
                    '}' => delta -= 1,
                    _ => {}
                }
            }
        }

        let kept_line = if starts_in_string || scan.in_string {
            line
        } else {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let key = line_key(trimmed);
            if !key.is_empty() && !seen.insert(key) {
                continue;
            }
            trimmed
        };

        quotes = scan;
        depth += delta;
        opened |= depth > 0;
        kept.push(kept_line);

        if opened && depth <= 0 && !quotes.in_string {
            break;
        }
    }

    kept.join("\n")
}

// ---------------------------------------------------------------------------
// Stage 5
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjState {
    ExpectKey,
    AfterKey,
    ExpectValue,
    AfterValue,
}

fn is_json_literal(word: &str) -> bool {
    matches!(word, "true" | "false" | "null") || serde_json::from_str::<serde_json::Number>(word).is_ok()
}

fn quote_text(text: &str) -> String {
    // Serializing a str to JSON cannot fail.
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{text}\""))
}

/// Strip one pair of surrounding single quotes, if present.
fn unquote_single(word: &str) -> &str {
    word.strip_prefix('\'')
        .and_then(|w| w.strip_suffix('\''))
        .unwrap_or(word)
}

/// Whether the comma at `chars[i]` ends a bare value, i.e. is followed by
/// another key, a closing brace or the end of input.
fn comma_ends_value(chars: &[char], i: usize) -> bool {
    let mut j = i + 1;
    while j < chars.len() && chars[j].is_whitespace() {
        j += 1;
    }
    let Some(&next) = chars.get(j) else {
        return true;
    };
    if matches!(next, '"' | '}' | '\'') {
        return true;
    }
    if !(next.is_alphanumeric() || next == '_') {
        return false;
    }
    while j < chars.len() && (chars[j].is_alphanumeric() || chars[j] == '_') {
        j += 1;
    }
    while j < chars.len() && (chars[j] == ' ' || chars[j] == '\t') {
        j += 1;
    }
    matches!(chars.get(j), Some(':' | '='))
}

/// Insert a comma right after the last non-whitespace output char.
fn insert_missing_comma(out: &mut String) {
    let pos = out.trim_end().len();
    out.insert(pos, ',');
}

/// Remove a comma that is the last non-whitespace output char.
fn remove_trailing_comma(out: &mut String) {
    let len = out.trim_end().len();
    if out[..len].ends_with(',') {
        out.remove(len - 1);
    }
}

/// Copy a string literal, escaping raw control characters so it parses.
fn copy_string_escaped(chars: &[char], start: usize, out: &mut String) -> usize {
    let mut literal = String::new();
    let end = copy_string(chars, start, &mut literal);
    for ch in literal.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => {}
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    end
}

/// Read a single-quoted or bare token starting at `start`, stopping at the
/// first char for which `stop` returns true. Returns (token, next index).
fn read_token(chars: &[char], start: usize, stop: impl Fn(usize) -> bool) -> (String, usize) {
    let mut i = start;
    if chars[i] == '\'' {
        if let Some(rel) = chars[i + 1..].iter().position(|&c| c == '\'') {
            let end = i + 1 + rel;
            return (chars[i + 1..end].iter().collect(), end + 1);
        }
    }
    while i < chars.len() && !stop(i) {
        i += 1;
    }
    (chars[start..i].iter().collect(), i)
}

/// Fix object syntax: quote bare keys and bare scalar values, drop trailing
/// and stray commas, insert missing commas between members, and escape raw
/// newlines inside strings.
///
/// JSON literals (`true`, `false`, `null`, numbers) are left unquoted.
/// Everything after the first top-level object closes is dropped.
pub fn repair_syntax(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 16);
    let mut stack: Vec<ObjState> = Vec::new();
    let mut opened = false;
    let mut i = 0;

    while i < chars.len() {
        if opened && stack.is_empty() {
            break;
        }
        let ch = chars[i];

        let Some(&state) = stack.last() else {
            // Top level: copy through until an object opens.
            match ch {
                '"' => i = copy_string(&chars, i, &mut out),
                '{' => {
                    out.push(ch);
                    stack.push(ObjState::ExpectKey);
                    opened = true;
                    i += 1;
                }
                _ => {
                    out.push(ch);
                    i += 1;
                }
            }
            continue;
        };

        if ch.is_whitespace() {
            out.push(ch);
            i += 1;
            continue;
        }

        let set = |stack: &mut Vec<ObjState>, s: ObjState| {
            if let Some(top) = stack.last_mut() {
                *top = s;
            }
        };

        match state {
            ObjState::ExpectKey => match ch {
                '"' => {
                    i = copy_string_escaped(&chars, i, &mut out);
                    set(&mut stack, ObjState::AfterKey);
                }
                '}' => {
                    remove_trailing_comma(&mut out);
                    out.push('}');
                    stack.pop();
                    set(&mut stack, ObjState::AfterValue);
                    i += 1;
                }
                // stray comma or doubled opening brace
                ',' | '{' => i += 1,
                c if c.is_alphanumeric() || c == '_' || c == '\'' => {
                    let (key, next) = read_token(&chars, i, |j| {
                        matches!(chars[j], ':' | '=' | '\n' | '}' | ',' | '"')
                    });
                    out.push_str(&quote_text(&drop_parentheticals(unquote_single(key.trim()))));
                    set(&mut stack, ObjState::AfterKey);
                    i = next;
                }
                _ => {
                    out.push(ch);
                    i += 1;
                }
            },
            ObjState::AfterKey => match ch {
                ':' | '=' => {
                    out.push(':');
                    set(&mut stack, ObjState::ExpectValue);
                    i += 1;
                }
                '}' => {
                    out.push('}');
                    stack.pop();
                    set(&mut stack, ObjState::AfterValue);
                    i += 1;
                }
                _ => {
                    // missing colon; reprocess this char as a value
                    out.push(':');
                    set(&mut stack, ObjState::ExpectValue);
                }
            },
            ObjState::ExpectValue => match ch {
                '"' => {
                    i = copy_string_escaped(&chars, i, &mut out);
                    set(&mut stack, ObjState::AfterValue);
                }
                '{' => {
                    out.push('{');
                    set(&mut stack, ObjState::AfterValue);
                    stack.push(ObjState::ExpectKey);
                    i += 1;
                }
                '[' => {
                    let end = find_matching(&chars, i, '[', ']').unwrap_or(chars.len() - 1);
                    out.extend(&chars[i..=end]);
                    set(&mut stack, ObjState::AfterValue);
                    i = end + 1;
                }
                '}' | ',' => {
                    // missing value; let the parse reject it
                    set(&mut stack, ObjState::AfterValue);
                }
                _ => {
                    let (raw, next) = read_token(&chars, i, |j| match chars[j] {
                        '\n' | '}' => true,
                        ',' => comma_ends_value(&chars, j),
                        _ => false,
                    });
                    let was_single_quoted = chars[i] == '\'';
                    let word = raw.trim();
                    if !was_single_quoted && is_json_literal(word) {
                        out.push_str(word);
                    } else {
                        out.push_str(&quote_text(&drop_parentheticals(word)));
                    }
                    set(&mut stack, ObjState::AfterValue);
                    i = next;
                }
            },
            ObjState::AfterValue => match ch {
                ',' => {
                    out.push(',');
                    set(&mut stack, ObjState::ExpectKey);
                    i += 1;
                }
                '}' => {
                    out.push('}');
                    stack.pop();
                    set(&mut stack, ObjState::AfterValue);
                    i += 1;
                }
                c if c == '"' || c == '\'' || c.is_alphabetic() || c == '_' => {
                    insert_missing_comma(&mut out);
                    set(&mut stack, ObjState::ExpectKey);
                }
                _ => {
                    out.push(ch);
                    i += 1;
                }
            },
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Stage 6
// ---------------------------------------------------------------------------

/// Close an unterminated string, append missing closing braces and trim
/// dangling trailing ones.
pub fn balance_braces(text: &str) -> String {
    let mut quotes = Quotes::default();
    let mut depth: i64 = 0;
    for ch in text.chars() {
        if !quotes.step(ch) {
            match ch {
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
        }
    }

    let mut out = text.trim_end().to_string();
    if quotes.in_string {
        if quotes.escaped {
            out.pop();
        }
        out.push('"');
    }

    if depth > 0 {
        out.extend(std::iter::repeat('}').take(depth as usize));
    } else {
        let mut extra = -depth;
        while extra > 0 && out.ends_with('}') {
            out.pop();
            let len = out.trim_end().len();
            out.truncate(len);
            extra -= 1;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::validate;

    fn parse(text: &str) -> serde_json::Value {
        serde_json::from_str(&sanitize(text))
            .unwrap_or_else(|e| panic!("{e}\n---\n{}\n---", sanitize(text)))
    }

    const MALFORMED: &[&str] = &[
        "Sure! Here you go:\n```json\n{\"decision\": \"Hold\", \"reason\": \"flat\", \"recommendation\": \"Wait\", \"riskAnalysis\": \"low\",}\n```\nHope this helps.",
        "{\n  decision: No Trade,\n  reason: Spread too small,\n  recommendation: Wait,\n  riskAnalysis: None\n",
        "{\"decision\": \"Buy\" // strong\n, \"reason\": \"x (see above) y\" /* note */, \"recommendation\": \"go\", \"riskAnalysis\": \"gas\"}}",
        "{\n\"decision\": \"Buy\",\n\"decision\": \"Buy\",\n\"reason\": \"r\"\n\"recommendation\": \"rec\"\n\"riskAnalysis\": \"risk\"\n}\n{\n\"decision\": \"Buy\"\n}",
        "{'decision': 'Hold (for now)', 'reason': 'flat', 'recommendation': 'Wait', 'riskAnalysis': 'low'}",
        "{{\"decision\": \"Buy\", \"reason\": \"multi\nline\", \"recommendation\": \"go\", \"riskAnalysis\": \"unterminated",
        "no json here at all",
        "",
        "{\"decision\": \"Buy\", \"reason\": 42, \"recommendation\": true, \"riskAnalysis\": null}",
        "{\"decision\": \"Buy\", \"nested\": {\"a\": \"b\",}, \"list\": [1, 2,], \"riskAnalysis\": \"x\"}",
        "{ decision = Buy on Sushiswap, sell on Uniswap, reason = spread (0.9%) }",
    ];

    #[test]
    fn stages_are_in_documented_order() {
        let names: Vec<&str> = STAGES.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "trim_to_object",
                "strip_comments",
                "strip_parentheticals",
                "dedupe_lines",
                "repair_syntax",
                "balance_braces",
            ]
        );
    }

    #[test]
    fn sanitize_is_idempotent() {
        for input in MALFORMED {
            let once = sanitize(input);
            let twice = sanitize(&once);
            assert_eq!(once, twice, "input: {input:?}");
        }
    }

    #[test]
    fn every_stage_is_idempotent_on_clean_json() {
        let clean = "{\"decision\": \"Buy\", \"reason\": \"r\", \"recommendation\": \"go\", \"riskAnalysis\": \"gas\"}";
        for stage in STAGES {
            assert_eq!((stage.apply)(clean), clean, "stage {}", stage.name);
        }
    }

    #[test]
    fn fenced_duplicated_trailing_comma_reply_validates() {
        let raw = "Sure! Here is the analysis:\n\
                   ```json\n\
                   {\n\
                     \"decision\": \"Buy on Sushiswap, sell on Uniswap\",\n\
                     \"reason\": \"Spread of 0.9% (above the 0.5% threshold) covers fees\",\n\
                     \"reason\": \"Spread of 0.9% (above the 0.5% threshold) covers fees\",\n\
                     \"recommendation\": \"Execute arbitrage\", // act fast\n\
                     \"riskAnalysis\": \"Slippage and gas may erode profit\",\n\
                   }\n\
                   ```";
        let result = validate(&parse(raw)).unwrap();
        assert_eq!(result.decision, "Buy on Sushiswap, sell on Uniswap");
        assert_eq!(result.reason, "Spread of 0.9% covers fees");
        assert_eq!(result.recommendation, "Execute arbitrage");
    }

    #[test]
    fn trim_to_object_drops_preamble_and_fence() {
        assert_eq!(
            trim_to_object("Here:\n```json\n{\"a\": \"b\"}\n```"),
            "{\"a\": \"b\"}"
        );
        assert_eq!(trim_to_object("  nothing  "), "nothing");
    }

    #[test]
    fn comments_inside_strings_survive() {
        let text = "{\"url\": \"https://example.org\" // trailing\n}";
        assert_eq!(strip_comments(text), "{\"url\": \"https://example.org\" \n}");
        let text = "{/* lead */\"a\": \"b /* not a comment */\"}";
        assert_eq!(strip_comments(text), "{\"a\": \"b /* not a comment */\"}");
    }

    #[test]
    fn parentheticals_removed_only_inside_strings() {
        assert_eq!(
            strip_parentheticals("{\"reason\": \"Spread (net) is 0.9% (gross 1.2%)\"}"),
            "{\"reason\": \"Spread is 0.9%\"}"
        );
        assert_eq!(strip_parentheticals("(outside) {\"a\": \"b\"}"), "(outside) {\"a\": \"b\"}");
        assert_eq!(drop_parentheticals("(lead) text"), "text");
        assert_eq!(drop_parentheticals("open (paren"), "open (paren");
        assert_eq!(drop_parentheticals("((nested)) ok"), "ok");
    }

    #[test]
    fn dedupe_ignores_whitespace_and_punctuation() {
        let text = "{\n\"decision\": \"Buy\",\n  \"decision\" : \"Buy\"\n\"reason\": \"r\"\n}";
        assert_eq!(dedupe_lines(text), "{\n\"decision\": \"Buy\",\n\"reason\": \"r\"\n}");
    }

    #[test]
    fn dedupe_keeps_multiline_string_content() {
        let text = "{\n\"reason\": \"first\n  same\n  same\nend\",\n\"decision\": \"x\"\n}";
        let out = dedupe_lines(text);
        assert!(out.contains("  same\n  same"), "{out}");
    }

    #[test]
    fn dedupe_stops_after_object_closes() {
        let text = "{\n\"a\": \"1\"\n}\n{\n\"b\": \"2\"\n}";
        assert_eq!(dedupe_lines(text), "{\n\"a\": \"1\"\n}");
    }

    #[test]
    fn bare_keys_and_values_are_quoted() {
        let value = parse("{decision: No Trade, reason: Spread 0.2%, recommendation: Wait, riskAnalysis: low}");
        assert_eq!(value["decision"], "No Trade");
        assert_eq!(value["reason"], "Spread 0.2%");
        assert_eq!(value["riskAnalysis"], "low");
    }

    #[test]
    fn bare_value_with_inner_comma_stays_whole() {
        let value = parse("{decision: Buy on Sushiswap, sell on Uniswap, reason: ok}");
        assert_eq!(value["decision"], "Buy on Sushiswap, sell on Uniswap");
        assert_eq!(value["reason"], "ok");
    }

    #[test]
    fn json_literals_are_not_quoted() {
        let value = parse("{\"a\": 42, \"b\": true, \"c\": null, \"d\": -1.5e3}");
        assert_eq!(value["a"], 42);
        assert_eq!(value["b"], true);
        assert!(value["c"].is_null());
    }

    #[test]
    fn single_quotes_become_double_quotes() {
        let value = parse("{'decision': 'Hold (for now)', 'reason': 'flat'}");
        assert_eq!(value["decision"], "Hold");
        assert_eq!(value["reason"], "flat");
    }

    #[test]
    fn missing_commas_are_inserted() {
        let value = parse("{\n\"a\": \"1\"\n\"b\": \"2\"\n}");
        assert_eq!(value["a"], "1");
        assert_eq!(value["b"], "2");
    }

    #[test]
    fn text_after_first_object_is_dropped() {
        let object = "{\"decision\": \"Hold\", \"reason\": \"flat\", \"recommendation\": \"Wait\", \"riskAnalysis\": \"low\"}";
        let replies = [
            format!("{object}}} Note: fees apply}}"),
            format!("Answer: {object} or, if gas is high, {{\"decision\": \"Wait\"}}"),
        ];
        for raw in &replies {
            let once = sanitize(raw);
            assert_eq!(once, object, "input: {raw:?}");
            assert_eq!(sanitize(&once), once);
            assert_eq!(validate(&parse(raw)).unwrap().decision, "Hold");
        }
    }

    #[test]
    fn braces_are_balanced() {
        assert_eq!(balance_braces("{\"a\": \"b\""), "{\"a\": \"b\"}");
        assert_eq!(balance_braces("{\"a\": \"b\"}}"), "{\"a\": \"b\"}");
        assert_eq!(balance_braces("{\"a\": \"b"), "{\"a\": \"b\"}");
        assert_eq!(balance_braces("{\"a\": \"}\"}"), "{\"a\": \"}\"}");
    }

    #[test]
    fn doubled_braces_are_collapsed() {
        let value = parse("{{\"decision\": \"Buy\"}}");
        assert_eq!(value["decision"], "Buy");
    }

    #[test]
    fn raw_newlines_in_strings_are_escaped() {
        let value = parse("{\"reason\": \"line one\nline two\"}");
        assert_eq!(value["reason"], "line one\nline two");
    }

    #[test]
    fn hopeless_input_is_returned_not_rejected() {
        assert_eq!(sanitize("no json here at all"), "no json here at all");
        assert_eq!(sanitize(""), "");
    }
}
