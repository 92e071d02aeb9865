//! Decoding of string-literal payloads embedded in HTML script tags.
//!
//! Pages rendered by Next.js stream their content through inline scripts of
//! the form `<script>self.__next_f.push([1, "..."])</script>`. The string
//! argument is an escaped JavaScript literal; once decoded it is ordinary
//! Markdown that may contain fenced Mermaid blocks.
//!
//! Decoding never fails. It degrades through three tiers:
//!
//! 1. [`DecodeTier::Json`] - the payload is decoded as a JSON string literal.
//! 2. [`DecodeTier::Lenient`] - a permissive escape decoder that keeps unknown
//!    escapes verbatim and tolerates raw control characters.
//! 3. [`DecodeTier::Passthrough`] - the payload is returned unmodified.
//!
//! Each step down is reported as a warning diagnostic.

use std::sync::OnceLock;

use log::{debug, trace};
use regex::Regex;
use thiserror::Error;
use winnow::{
    Parser as _,
    combinator::{alt, opt, preceded, repeat},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{any, take_while},
};

use crate::diagnostic::Diagnostic;

/// Errors from the lenient escape decoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("truncated \\{escape} escape at byte {offset}")]
    Truncated { escape: char, offset: usize },

    #[error("invalid hex digits in \\{escape} escape at byte {offset}")]
    InvalidHex { escape: char, offset: usize },

    #[error("invalid code point U+{code:X} at byte {offset}")]
    InvalidCodePoint { code: u32, offset: usize },

    #[error("named unicode escapes are not supported (byte {offset})")]
    NamedEscape { offset: usize },

    #[error("trailing backslash at end of payload")]
    TrailingBackslash,

    #[error("unexpected input at byte {offset}")]
    Unexpected { offset: usize },
}

/// Which decoding tier produced the text of a [`DecodedPayload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeTier {
    Json,
    Lenient,
    Passthrough,
}

/// The decoded form of an embedded payload.
#[derive(Debug, Clone)]
pub struct DecodedPayload {
    text: String,
    tier: DecodeTier,
    diagnostics: Vec<Diagnostic>,
}

impl DecodedPayload {
    pub fn tier(&self) -> DecodeTier {
        self.tier
    }

    pub fn into_parts(self) -> (String, Vec<Diagnostic>) {
        (self.text, self.diagnostics)
    }
}

/// Find the first `self.__next_f.push([1, "..."])` script payload.
///
/// Only the first occurrence is returned; the payload is still escaped.
///
/// # Examples
///
/// ```
/// # use mermex::decode::find_payload;
/// let html = r#"<p>x</p><script>self.__next_f.push([1, "a\nb"])</script>"#;
/// assert_eq!(find_payload(html), Some(r"a\nb"));
/// assert_eq!(find_payload("<html></html>"), None);
/// ```
pub fn find_payload(html: &str) -> Option<&str> {
    static PAYLOAD: OnceLock<Regex> = OnceLock::new();
    let re = PAYLOAD.get_or_init(|| {
        Regex::new(r#"(?s)<script>self\.__next_f\.push\(\[\s*1,\s*"(.*?)"\s*\]\)</script>"#)
            .expect("payload pattern is valid")
    });

    let payload = re.captures(html)?.get(1)?.as_str();
    debug!(length = payload.len(); "Embedded payload located");
    Some(payload)
}

/// Decode an escaped payload, falling back through the decoding tiers.
pub fn decode_payload(payload: &str) -> DecodedPayload {
    let mut diagnostics = Vec::new();

    match serde_json::from_str::<String>(&format!("\"{payload}\"")) {
        Ok(text) => {
            trace!("Payload decoded as JSON string");
            return DecodedPayload {
                text,
                tier: DecodeTier::Json,
                diagnostics,
            };
        }
        Err(err) => {
            diagnostics.push(Diagnostic::warning(format!(
                "JSON string decoding failed: {err}"
            )));
        }
    }

    match unescape_lenient(payload) {
        Ok((text, replaced)) => {
            diagnostics.extend(replaced);
            DecodedPayload {
                text,
                tier: DecodeTier::Lenient,
                diagnostics,
            }
        }
        Err(err) => {
            diagnostics.push(Diagnostic::warning(format!(
                "fallback escape decoding failed, using payload as-is: {err}"
            )));
            DecodedPayload {
                text: payload.to_string(),
                tier: DecodeTier::Passthrough,
                diagnostics,
            }
        }
    }
}

type Input<'a> = LocatingSlice<&'a str>;
type PResult<O> = ModalResult<O, ContextError<DecodeError>>;

/// One step of the lenient decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece<'a> {
    Text(&'a str),
    Char(char),
    /// Unrecognized escape, kept with its backslash.
    Kept(char),
    /// Escaped line break.
    Continuation,
    /// Surrogate escape without a partner.
    Unpaired { code: u32, offset: usize },
}

/// Decode backslash escapes permissively.
///
/// Recognized escapes are decoded, unknown ones such as `\q` are kept as
/// written, and raw control characters pass through untouched. A `\u` high
/// surrogate immediately followed by a `\u` low surrogate is combined into
/// one character. An unpaired surrogate becomes U+FFFD and is reported in
/// the returned warnings.
///
/// # Errors
///
/// Returns a [`DecodeError`] for truncated or non-hex `\x`, `\u` and `\U`
/// escapes, code points above U+10FFFF, `\N{...}` escapes and a trailing
/// backslash.
///
/// # Examples
///
/// ```
/// # use mermex::decode::unescape_lenient;
/// let (text, warnings) = unescape_lenient(r"it\'s \x41\q").unwrap();
/// assert_eq!(text, r"it's A\q");
/// assert!(warnings.is_empty());
/// ```
pub fn unescape_lenient(input: &str) -> Result<(String, Vec<Diagnostic>), DecodeError> {
    let mut stream = LocatingSlice::new(input);

    let decoded = repeat(0.., alt((text_run, escape)))
        .fold(
            || (String::with_capacity(input.len()), Vec::new()),
            |(mut out, mut diagnostics): (String, Vec<Diagnostic>), piece| {
                match piece {
                    Piece::Text(text) => out.push_str(text),
                    Piece::Char(c) => out.push(c),
                    Piece::Kept(c) => {
                        out.push('\\');
                        out.push(c);
                    }
                    Piece::Continuation => {}
                    Piece::Unpaired { code, offset } => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        diagnostics.push(Diagnostic::warning(format!(
                            "unpaired surrogate U+{code:X} at byte {offset} replaced with U+FFFD"
                        )));
                    }
                }
                (out, diagnostics)
            },
        )
        .parse_next(&mut stream);

    let offset = stream.current_token_start();
    match decoded {
        Ok(decoded) if stream.eof_offset() == 0 => Ok(decoded),
        Ok(_) => Err(DecodeError::Unexpected { offset }),
        Err(err) => Err(err
            .into_inner()
            .ok()
            .and_then(|inner| inner.context().next().cloned())
            .unwrap_or(DecodeError::Unexpected { offset })),
    }
}

fn fail<O>(error: DecodeError) -> PResult<O> {
    let mut err = ContextError::new();
    err.push(error);
    Err(ErrMode::Cut(err))
}

fn text_run<'a>(input: &mut Input<'a>) -> PResult<Piece<'a>> {
    take_while(1.., |c: char| c != '\\')
        .map(Piece::Text)
        .parse_next(input)
}

fn escape<'a>(input: &mut Input<'a>) -> PResult<Piece<'a>> {
    let offset = input.current_token_start();
    '\\'.parse_next(input)?;

    let Some(escape) = opt(any).parse_next(input)? else {
        return fail(DecodeError::TrailingBackslash);
    };

    match escape {
        '\n' => Ok(Piece::Continuation),
        '\\' | '\'' | '"' => Ok(Piece::Char(escape)),
        'a' => Ok(Piece::Char('\u{07}')),
        'b' => Ok(Piece::Char('\u{08}')),
        'f' => Ok(Piece::Char('\u{0C}')),
        'n' => Ok(Piece::Char('\n')),
        'r' => Ok(Piece::Char('\r')),
        't' => Ok(Piece::Char('\t')),
        'v' => Ok(Piece::Char('\u{0B}')),
        '0'..='7' => {
            let rest = octal_digits(input)?;
            let code = std::iter::once(escape)
                .chain(rest.chars())
                .filter_map(|digit| digit.to_digit(8))
                .fold(0, |code, digit| code * 8 + digit);
            code_point(code, offset)
        }
        'x' => code_point(hex(input, 'x', 2, offset)?, offset),
        'u' => unicode_escape(input, offset),
        'U' => code_point(hex(input, 'U', 8, offset)?, offset),
        'N' => fail(DecodeError::NamedEscape { offset }),
        other => Ok(Piece::Kept(other)),
    }
}

/// Up to two octal digits following the first one.
fn octal_digits<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    take_while(0..=2, |c: char| c.is_digit(8)).parse_next(input)
}

/// Exactly `digits` hex digits.
fn hex(input: &mut Input<'_>, escape: char, digits: usize, offset: usize) -> PResult<u32> {
    let run = take_while(0..=digits, |c: char| c.is_ascii_hexdigit()).parse_next(input)?;
    if run.len() < digits {
        return if input.eof_offset() == 0 {
            fail(DecodeError::Truncated { escape, offset })
        } else {
            fail(DecodeError::InvalidHex { escape, offset })
        };
    }

    match u32::from_str_radix(run, 16) {
        Ok(code) => Ok(code),
        Err(_) => fail(DecodeError::InvalidHex { escape, offset }),
    }
}

fn unicode_escape<'a>(input: &mut Input<'a>, offset: usize) -> PResult<Piece<'a>> {
    let code = hex(input, 'u', 4, offset)?;
    if !(0xD800..0xDC00).contains(&code) {
        return code_point(code, offset);
    }

    match opt(low_surrogate).parse_next(input)? {
        Some(low) => {
            trace!(offset; "Combining surrogate pair");
            code_point(0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00), offset)
        }
        None => code_point(code, offset),
    }
}

/// A `\uDC00`..`\uDFFF` escape. Backtracks on anything else.
fn low_surrogate(input: &mut Input<'_>) -> PResult<u32> {
    preceded("\\u", take_while(4, |c: char| c.is_ascii_hexdigit()))
        .verify_map(|hex: &str| {
            u32::from_str_radix(hex, 16)
                .ok()
                .filter(|low| (0xDC00..0xE000).contains(low))
        })
        .parse_next(input)
}

fn code_point<'a>(code: u32, offset: usize) -> PResult<Piece<'a>> {
    match char::from_u32(code) {
        Some(c) => Ok(Piece::Char(c)),
        None if (0xD800..0xE000).contains(&code) => Ok(Piece::Unpaired { code, offset }),
        None => fail(DecodeError::InvalidCodePoint { code, offset }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Severity;

    fn lenient_text(input: &str) -> Result<String, DecodeError> {
        unescape_lenient(input).map(|(text, _)| text)
    }

    #[test]
    fn test_json_tier_decodes_escaped_newline() {
        let decoded = decode_payload(r"Hello\nWorld");
        assert_eq!(decoded.tier(), DecodeTier::Json);
        let (text, diagnostics) = decoded.into_parts();
        assert_eq!(text, "Hello\nWorld");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_json_tier_decodes_quotes_and_unicode() {
        let decoded = decode_payload(r#"say \"hi\" \u00e9 \ud83d\ude00 C:\\tmp"#);
        assert_eq!(decoded.tier(), DecodeTier::Json);
        assert_eq!(decoded.into_parts().0, "say \"hi\" é 😀 C:\\tmp");
    }

    #[test]
    fn test_invalid_json_escape_falls_back_to_lenient() {
        let decoded = decode_payload(r"it\'s\x41\nnext");
        assert_eq!(decoded.tier(), DecodeTier::Lenient);
        let (text, diagnostics) = decoded.into_parts();
        assert_eq!(text, "it'sA\nnext");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity(), Severity::Warning);
    }

    #[test]
    fn test_raw_newline_falls_back_to_lenient() {
        let decoded = decode_payload("line one\nline \\\"two\\\"");
        assert_eq!(decoded.tier(), DecodeTier::Lenient);
        assert_eq!(decoded.into_parts().0, "line one\nline \"two\"");
    }

    #[test]
    fn test_undecodable_payload_passes_through() {
        let payload = r"broken \u12 escape";
        let decoded = decode_payload(payload);
        assert_eq!(decoded.tier(), DecodeTier::Passthrough);
        let (text, diagnostics) = decoded.into_parts();
        assert_eq!(text, payload);
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_lone_surrogate_keeps_rest_of_payload() {
        let payload = r"```mermaid\ngraph TD\n  A[\ud83d] --> B\n```";
        let decoded = decode_payload(payload);
        assert_eq!(decoded.tier(), DecodeTier::Lenient);

        let (text, diagnostics) = decoded.into_parts();
        assert_eq!(text, "```mermaid\ngraph TD\n  A[\u{FFFD}] --> B\n```");
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[1].message().contains("U+D83D"));
    }

    #[test]
    fn test_lenient_keeps_unknown_escapes() {
        assert_eq!(lenient_text(r"a\qb\d").as_deref(), Ok(r"a\qb\d"));
    }

    #[test]
    fn test_lenient_octal_and_line_continuation() {
        assert_eq!(lenient_text("\\101\\0x\\\ny").as_deref(), Ok("A\0xy"));
        assert_eq!(lenient_text(r"\1234").as_deref(), Ok("S4"));
    }

    #[test]
    fn test_lenient_surrogate_pair() {
        assert_eq!(lenient_text(r"\ud83d\ude00!").as_deref(), Ok("😀!"));
    }

    #[test]
    fn test_lenient_unpaired_surrogates_are_replaced() {
        let (text, warnings) = unescape_lenient(r"\ud83d x \ude00").expect("decodes");
        assert_eq!(text, "\u{FFFD} x \u{FFFD}");
        assert_eq!(warnings.len(), 2);
        assert_eq!(
            warnings[0].message(),
            "unpaired surrogate U+D83D at byte 0 replaced with U+FFFD"
        );
        assert!(warnings[1].message().contains("at byte 9"));
    }

    #[test]
    fn test_lenient_high_surrogate_before_non_low_escape() {
        let (text, warnings) = unescape_lenient(r"\ud83d\u0041").expect("decodes");
        assert_eq!(text, "\u{FFFD}A");
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_lenient_errors() {
        assert_eq!(lenient_text("abc\\"), Err(DecodeError::TrailingBackslash));
        assert_eq!(
            lenient_text(r"\xZZ"),
            Err(DecodeError::InvalidHex {
                escape: 'x',
                offset: 0
            })
        );
        assert_eq!(
            lenient_text(r"ab\u00"),
            Err(DecodeError::Truncated {
                escape: 'u',
                offset: 2
            })
        );
        assert_eq!(
            lenient_text(r"\U00110000"),
            Err(DecodeError::InvalidCodePoint {
                code: 0x110000,
                offset: 0
            })
        );
        assert_eq!(
            lenient_text(r"\N{BULLET}"),
            Err(DecodeError::NamedEscape { offset: 0 })
        );
    }

    #[test]
    fn test_find_payload_uses_first_match() {
        let html = concat!(
            "<script>self.__next_f.push([1, \"first\"])</script>\n",
            "<script>self.__next_f.push([1, \"second\"])</script>",
        );
        assert_eq!(find_payload(html), Some("first"));
    }

    #[test]
    fn test_find_payload_spans_newlines() {
        let html = "<script>self.__next_f.push([\n  1,\n  \"multi\nline\"\n])</script>";
        assert_eq!(find_payload(html), Some("multi\nline"));
    }

    #[test]
    fn test_find_payload_ignores_other_chunks() {
        let html = r#"<script>self.__next_f.push([0])</script><script>self.__next_f.push([2, "x"])</script>"#;
        assert_eq!(find_payload(html), None);
    }
}
