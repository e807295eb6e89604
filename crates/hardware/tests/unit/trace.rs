//! Trace parsing tests.

use cachesim_core::trace::parse_line;
use cachesim_core::{TraceError, TraceReader, TraceRecord};
use rstest::rstest;

use crate::common::harness::temp_file;

#[rstest]
#[case::plain("r ffe04540", TraceRecord::read(0xffe0_4540))]
#[case::upper_op("W 10", TraceRecord::write(0x10))]
#[case::prefixed("w 0x7ff0a8", TraceRecord::write(0x7f_f0a8))]
#[case::upper_prefix("r 0XAB", TraceRecord::read(0xab))]
#[case::tabs_and_crlf("\tr\t1f\r", TraceRecord::read(0x1f))]
#[case::max("r ffffffff", TraceRecord::read(u32::MAX))]
fn parses_records(#[case] line: &str, #[case] expected: TraceRecord) {
    assert_eq!(parse_line(1, line).unwrap(), Some(expected));
}

#[rstest]
#[case::empty("")]
#[case::spaces("   ")]
#[case::cr("\r")]
fn blank_lines_are_skipped(#[case] line: &str) {
    assert_eq!(parse_line(1, line).unwrap(), None);
}

#[test]
fn unknown_request_type() {
    let err = parse_line(4, "x 10").unwrap_err();
    assert!(matches!(err, TraceError::UnknownOp { line: 4, ref op } if op == "x"));

    let err = parse_line(5, "rw 10").unwrap_err();
    assert!(matches!(err, TraceError::UnknownOp { line: 5, ref op } if op == "rw"));
}

#[rstest]
#[case::missing_address("r")]
#[case::extra_token("r 10 20")]
fn malformed_records(#[case] line: &str) {
    let err = parse_line(2, line).unwrap_err();
    assert!(matches!(err, TraceError::Malformed { line: 2, .. }), "{err}");
}

#[rstest]
#[case::not_hex("r zz")]
#[case::too_wide("r 1ffffffff")]
#[case::bare_prefix("r 0x")]
#[case::negative("w -10")]
#[case::plus_sign("r +10")]
#[case::prefixed_plus_sign("r 0x+10")]
fn bad_addresses(#[case] line: &str) {
    let err = parse_line(9, line).unwrap_err();
    assert!(matches!(err, TraceError::BadAddress { line: 9, .. }), "{err}");
}

#[test]
fn reader_numbers_lines_from_one_and_skips_blanks() {
    let input = "r 0\n\nw 10\n   \nq 20\nr 30\n";
    let mut reader = TraceReader::new(input.as_bytes());

    assert_eq!(reader.next().unwrap().unwrap(), TraceRecord::read(0));
    assert_eq!(reader.next().unwrap().unwrap(), TraceRecord::write(0x10));
    let err = reader.next().unwrap().unwrap_err();
    assert_eq!(err.line(), Some(5));
    assert!(reader.next().is_none(), "the first error ends the trace");
}

#[test]
fn reader_opens_files() {
    let file = temp_file("r 0\nw 40\n");
    let records: Vec<TraceRecord> = TraceReader::open(file.path())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(records, vec![TraceRecord::read(0), TraceRecord::write(0x40)]);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = TraceReader::open(dir.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err, TraceError::Io(_)));
    assert_eq!(err.line(), None);
}
