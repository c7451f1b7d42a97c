//! Pandoc JSON stream codec.
//!
//! The whole input is buffered before decoding: the walk needs the complete tree,
//! and nothing is written until the output has been fully encoded.
//!
//! Decoding has no nesting limit. Pandoc documents nest blocks several JSON levels
//! deep per quote or list, so serde_json's default of 128 rejects valid input.

use std::io::{Read, Write};

use serde::Deserialize;

use crate::ast::Pandoc;
use crate::error::FilterError;

/// Decode a pandoc JSON document.
pub fn decode(bytes: &[u8]) -> Result<Pandoc, FilterError> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    deserializer.disable_recursion_limit();

    let doc = Pandoc::deserialize(&mut deserializer).map_err(FilterError::MalformedInput)?;
    deserializer.end().map_err(FilterError::MalformedInput)?;
    Ok(doc)
}

/// Encode a document as compact pandoc JSON.
pub fn encode(doc: &Pandoc) -> Result<Vec<u8>, FilterError> {
    serde_json::to_vec(doc).map_err(FilterError::Encode)
}

/// Read `reader` to the end and decode it, returning the document and the input size.
pub fn read_from<R: Read>(mut reader: R) -> Result<(Pandoc, usize), FilterError> {
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;
    let doc = decode(&buffer)?;
    Ok((doc, buffer.len()))
}

/// Write already-encoded output and flush.
pub fn write_to<W: Write>(mut writer: W, bytes: &[u8]) -> Result<(), FilterError> {
    writer.write_all(bytes)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    // Compact, in pandoc's own field order, so it must come back byte for byte.
    const NO_CODE: &str = concat!(
        r#"{"pandoc-api-version":[1,23,1],"meta":{"title":{"t":"MetaInlines","c":[{"t":"Str","c":"Doc"}]},"#,
        r#""author":{"t":"MetaList","c":[]}},"blocks":["#,
        r#"{"t":"Header","c":[1,["intro",["unnumbered"],[["lang","en"]]],[{"t":"Str","c":"Intro"}]]},"#,
        r#"{"t":"Para","c":[{"t":"Emph","c":[{"t":"Str","c":"héllo"}]},{"t":"Space"},"#,
        r#"{"t":"Link","c":[["",[],[]],[{"t":"Str","c":"x"}],["https://example.com","t"]]},"#,
        r#"{"t":"Note","c":[{"t":"Para","c":[{"t":"Str","c":"n"}]}]}]},"#,
        r#"{"t":"RawBlock","c":["html","<hr/>"]},"#,
        r#"{"t":"HorizontalRule"}]}"#
    );

    #[test]
    fn test_round_trip_is_byte_identical() {
        let doc = decode(NO_CODE.as_bytes()).unwrap();
        let bytes = encode(&doc).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), NO_CODE);
    }

    #[test]
    fn test_column_widths_are_kept_exactly() {
        let input = concat!(
            r#"{"pandoc-api-version":[1,23,1],"meta":{},"blocks":[{"t":"Table","c":[["",[],[]],[null,[]],"#,
            r#"[[{"t":"AlignLeft"},{"t":"ColWidth","c":0.20833333333333334}],"#,
            r#"[{"t":"AlignRight"},{"t":"ColWidthDefault"}]],"#,
            r#"[["",[],[]],[]],[],[["",[],[]],[]]]}]}"#
        );

        let doc = decode(input.as_bytes()).unwrap();
        assert_eq!(String::from_utf8(encode(&doc).unwrap()).unwrap(), input);
    }

    #[test]
    fn test_deeply_nested_quotes_decode() {
        // Two JSON levels per quote, well past serde_json's default limit.
        let depth = 70;
        let mut blocks = r#"{"t":"Para","c":[{"t":"Str","c":"deep"}]}"#.to_string();
        for _ in 0..depth {
            blocks = format!(r#"{{"t":"BlockQuote","c":[{blocks}]}}"#);
        }
        let input = format!(r#"{{"pandoc-api-version":[1,23,1],"meta":{{}},"blocks":[{blocks}]}}"#);

        let doc = decode(input.as_bytes()).unwrap();
        assert_eq!(String::from_utf8(encode(&doc).unwrap()).unwrap(), input);
    }

    #[test]
    fn test_trailing_garbage_is_malformed() {
        let input = format!("{NO_CODE} {{}}");
        assert!(matches!(decode(input.as_bytes()), Err(FilterError::MalformedInput(_))));
    }

    #[test]
    fn test_metadata_key_order_is_kept() {
        let doc = decode(NO_CODE.as_bytes()).unwrap();
        let keys: Vec<_> = doc.meta.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["title", "author"]);
    }

    #[test]
    fn test_pretty_input_is_accepted() {
        let input = indoc! {r#"
            {
              "pandoc-api-version": [1, 23, 1],
              "meta": {},
              "blocks": [
                {"t": "Plain", "c": [{"t": "Str", "c": "hi"}]}
              ]
            }
        "#};

        let doc = decode(input.as_bytes()).unwrap();
        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(
            encode(&doc).unwrap(),
            br#"{"pandoc-api-version":[1,23,1],"meta":{},"blocks":[{"t":"Plain","c":[{"t":"Str","c":"hi"}]}]}"#
        );
    }

    #[test]
    fn test_truncated_input_is_malformed() {
        let truncated = &NO_CODE.as_bytes()[..NO_CODE.len() / 2];
        assert!(matches!(decode(truncated), Err(FilterError::MalformedInput(_))));
    }

    #[test]
    fn test_missing_envelope_fields_are_malformed() {
        for input in [
            r#"{"pandoc-api-version":[1,23,1],"meta":{}}"#,
            r#"{"pandoc-api-version":[1,23,1],"blocks":[]}"#,
            r#"{"meta":{},"blocks":[]}"#,
            r#"[]"#,
            "",
        ] {
            assert!(
                matches!(decode(input.as_bytes()), Err(FilterError::MalformedInput(_))),
                "should reject {input:?}"
            );
        }
    }

    #[test]
    fn test_unknown_block_is_malformed() {
        let input = r#"{"pandoc-api-version":[1,23,1],"meta":{},"blocks":[{"t":"Marquee","c":[]}]}"#;
        assert!(matches!(decode(input.as_bytes()), Err(FilterError::MalformedInput(_))));
    }

    #[test]
    fn test_read_and_write() {
        let (doc, size) = read_from(NO_CODE.as_bytes()).unwrap();
        assert_eq!(size, NO_CODE.len());

        let mut out = Vec::new();
        write_to(&mut out, &encode(&doc).unwrap()).unwrap();
        assert_eq!(out, NO_CODE.as_bytes());
    }
}
