// cyfreeze: Source-hiding Python freezer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{Encoding, LineDecoder, bytes_to_utf8};

#[test]
fn test_utf8_passthrough() {
    let input = "Building extension 'bot' ✓";
    assert_eq!(bytes_to_utf8(Encoding::Utf8, input.as_bytes()), input);
}

#[test]
fn test_windows_1252_conversion() {
    insta::assert_snapshot!(bytes_to_utf8(Encoding::Acp, b"caf\xe9"), @"café");
}

#[test]
fn test_invalid_utf8_is_replaced() {
    assert_eq!(bytes_to_utf8(Encoding::Unknown, b"ok\xff"), "ok\u{fffd}");
}

#[test]
fn test_line_decoder_splits_mixed_terminators() {
    let mut decoder = LineDecoder::new(Encoding::Utf8);
    let lines = decoder.push(b"one\r\ntwo\nthr");
    assert_eq!(lines, vec!["one", "two"]);

    let lines = decoder.push(b"ee\rfour");
    assert_eq!(lines, vec!["three"]);

    assert_eq!(decoder.finish().as_deref(), Some("four"));
    assert_eq!(decoder.finish(), None);
}

#[test]
fn test_line_decoder_skips_empty_lines() {
    let mut decoder = LineDecoder::new(Encoding::Utf8);
    let lines = decoder.push(b"\n\nalpha\n\n\nbeta\n");
    assert_eq!(lines, vec!["alpha", "beta"]);
    assert_eq!(decoder.finish(), None);
}

#[test]
fn test_encoding_serde() {
    let enc: Encoding = serde_json::from_str("\"oem\"").unwrap();
    assert_eq!(enc, Encoding::Oem);
    assert_eq!(enc.to_string(), "oem");
}
