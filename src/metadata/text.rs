//! Text chunks <-> ordered key/value entries.

use crate::codec::{TextChunk, TextChunkKind};
use crate::error::{Diagnostics, Warning};
use crate::image::{TaggedString, TextEncoding, TextEntry};

/// International entries first, then Latin-1 ones, each in source order.
pub(crate) fn decode_text(chunks: &[TextChunk]) -> Vec<TextEntry> {
    let international = chunks
        .iter()
        .filter(|c| c.kind == TextChunkKind::International);
    let latin = chunks
        .iter()
        .filter(|c| c.kind != TextChunkKind::International);
    international
        .chain(latin)
        .map(|c| {
            let encoding = match c.kind {
                TextChunkKind::International => TextEncoding::Utf8,
                TextChunkKind::Latin | TextChunkKind::CompressedLatin => TextEncoding::Native,
            };
            TextEntry {
                key: TaggedString::new(c.keyword.clone(), encoding),
                value: TaggedString::new(c.text.clone(), encoding),
            }
        })
        .collect()
}

/// Latin-1 entries become tEXt, anything else iTXt. Entries with an
/// undeclared encoding, or a keyword PNG cannot carry, are dropped behind a
/// single warning.
pub(crate) fn encode_text(entries: &[TextEntry], diag: &mut Diagnostics) -> Vec<TextChunk> {
    let mut skipped = 0;
    let mut chunks = Vec::with_capacity(entries.len());
    for entry in entries {
        let encodings = [entry.key.encoding, entry.value.encoding];
        if encodings.contains(&TextEncoding::Bytes) || !valid_keyword(&entry.key.text) {
            skipped += 1;
            continue;
        }
        let latin = !encodings.contains(&TextEncoding::Utf8) && is_latin1(&entry.value.text);
        let chunk = if latin {
            TextChunk {
                kind: TextChunkKind::Latin,
                keyword: entry.key.text.clone(),
                translated_keyword: String::new(),
                text: entry.value.text.clone(),
            }
        } else {
            TextChunk {
                kind: TextChunkKind::International,
                keyword: entry.key.text.clone(),
                translated_keyword: entry.key.text.clone(),
                text: entry.value.text.clone(),
            }
        };
        chunks.push(chunk);
    }
    if skipped > 0 {
        diag.warn(Warning::TextEncodingSkipped { skipped });
    }
    chunks
}

fn is_latin1(s: &str) -> bool {
    s.chars().all(|c| u32::from(c) <= 0xFF)
}

/// 1-79 Latin-1 bytes, no NUL, for both tEXt and iTXt.
fn valid_keyword(key: &str) -> bool {
    is_latin1(key) && (1..=79).contains(&key.chars().count()) && !key.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(kind: TextChunkKind, key: &str, text: &str) -> TextChunk {
        TextChunk {
            kind,
            keyword: key.into(),
            translated_keyword: String::new(),
            text: text.into(),
        }
    }

    #[test]
    fn international_first() {
        let chunks = [
            chunk(TextChunkKind::Latin, "Title", "a"),
            chunk(TextChunkKind::International, "Author", "b"),
            chunk(TextChunkKind::CompressedLatin, "Comment", "c"),
            chunk(TextChunkKind::International, "Software", "d"),
        ];
        let entries = decode_text(&chunks);
        let keys: Vec<_> = entries.iter().map(|e| e.key.text.as_str()).collect();
        assert_eq!(keys, ["Author", "Software", "Title", "Comment"]);
        assert_eq!(entries[0].value.encoding, TextEncoding::Utf8);
        assert_eq!(entries[3].value.encoding, TextEncoding::Native);
    }

    #[test]
    fn chunk_kind_follows_encoding() {
        let mut diag = Diagnostics::default();
        let mixed = TextEntry {
            key: TaggedString::new("Title", TextEncoding::Native),
            value: TaggedString::new("caf\u{e9}", TextEncoding::Utf8),
        };
        let chunks = encode_text(&[TextEntry::native("Comment", "plain"), mixed], &mut diag);
        assert_eq!(chunks[0].kind, TextChunkKind::Latin);
        assert_eq!(chunks[1].kind, TextChunkKind::International);
        assert_eq!(chunks[1].translated_keyword, "Title");
        assert!(diag.into_warnings().is_empty());
    }

    #[test]
    fn native_outside_latin1_is_promoted() {
        let mut diag = Diagnostics::default();
        let chunks = encode_text(&[TextEntry::native("Title", "\u{3b1}")], &mut diag);
        assert_eq!(chunks[0].kind, TextChunkKind::International);
        assert!(diag.into_warnings().is_empty());
    }

    #[test]
    fn unwritable_keywords_are_skipped() {
        let mut diag = Diagnostics::default();
        let long = "k".repeat(80);
        let chunks = encode_text(
            &[
                TextEntry::native("", "empty"),
                TextEntry::utf8("\u{3b1}", "greek key"),
                TextEntry::native(long, "too long"),
                TextEntry::native("Kept", "x"),
            ],
            &mut diag,
        );
        assert_eq!(chunks.len(), 1);
        assert_eq!(
            diag.into_warnings(),
            vec![Warning::TextEncodingSkipped { skipped: 3 }]
        );
    }

    #[test]
    fn unknown_encodings_warn_once() {
        let mut diag = Diagnostics::default();
        let raw = |k: &str| TextEntry {
            key: TaggedString::new(k, TextEncoding::Native),
            value: TaggedString::new("\u{1}", TextEncoding::Bytes),
        };
        let chunks = encode_text(
            &[raw("a"), TextEntry::utf8("b", "ok"), raw("c")],
            &mut diag,
        );
        assert_eq!(chunks.len(), 1);
        assert_eq!(
            diag.into_warnings(),
            vec![Warning::TextEncodingSkipped { skipped: 2 }]
        );
    }
}
