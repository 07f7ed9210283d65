//! Byte-level tests for the filter file codec.
//!
//! These pin the exact on-disk layout independently of the rule store.

use std::io::{Cursor, Seek, SeekFrom};

use super::*;
use crate::{Action, Column, Error, Relation, Rule};

/// Helper to write with a FieldWriter and return the bytes.
fn written(f: impl FnOnce(&mut FieldWriter<'_, Cursor<Vec<u8>>>)) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = FieldWriter::new(&mut cursor);
        f(&mut writer);
    }
    cursor.into_inner()
}

// ============================================================================
// Primitive Fields
// ============================================================================

#[test]
fn test_write_integers_little_endian() {
    let bytes = written(|w| {
        w.write_u8(0xAB).unwrap();
        w.write_u32_le(0x0102_0304).unwrap();
    });
    assert_eq!(bytes, vec![0xAB, 0x04, 0x03, 0x02, 0x01]);
}

#[test]
fn test_write_utf16le_text_layout() {
    let bytes = written(|w| w.write_utf16le_text("Hi\0").unwrap());
    assert_eq!(bytes, vec![6, 0, 0, 0, b'H', 0, b'i', 0, 0, 0]);
}

#[test]
fn test_write_zeros() {
    let bytes = written(|w| w.write_zeros(RESERVED_LEN).unwrap());
    assert_eq!(bytes, vec![0u8; 8]);
}

#[test]
fn test_read_integers() {
    let mut cursor = Cursor::new(vec![0x01, 0x78, 0x56, 0x34, 0x12]);
    let mut reader = FieldReader::new(&mut cursor);
    assert_eq!(reader.read_u8().unwrap(), 1);
    assert_eq!(reader.read_u32_le().unwrap(), 0x1234_5678);
    assert_eq!(reader.position().unwrap(), 5);
}

#[test]
fn test_read_u32_truncated() {
    let mut cursor = Cursor::new(vec![0x01, 0x02]);
    let mut reader = FieldReader::new(&mut cursor);
    match reader.read_u32_le() {
        Err(Error::TruncatedInput { offset, needed }) => {
            assert_eq!(offset, 0);
            assert_eq!(needed, 4);
        }
        other => panic!("expected TruncatedInput, got {:?}", other),
    }
}

#[test]
fn test_read_u8_at_end() {
    let mut cursor = Cursor::new(Vec::new());
    let mut reader = FieldReader::new(&mut cursor);
    assert!(matches!(reader.read_u8(), Err(Error::TruncatedInput { .. })));
}

#[test]
fn test_read_length_prefixed_bytes() {
    let mut cursor = Cursor::new(vec![3, 0, 0, 0, b'a', b'b', b'c', b'z']);
    let mut reader = FieldReader::new(&mut cursor);
    assert_eq!(reader.read_length_prefixed_bytes().unwrap(), b"abc".to_vec());
    assert_eq!(reader.read_u8().unwrap(), b'z');
}

#[test]
fn test_read_length_prefixed_bytes_short() {
    let mut cursor = Cursor::new(vec![10, 0, 0, 0, b'a', b'b']);
    let mut reader = FieldReader::new(&mut cursor);
    match reader.read_length_prefixed_bytes() {
        Err(Error::TruncatedInput { offset, needed }) => {
            assert_eq!(offset, 4);
            assert_eq!(needed, 10);
        }
        other => panic!("expected TruncatedInput, got {:?}", other),
    }
}

#[test]
fn test_huge_length_prefix_does_not_allocate_up_front() {
    let mut cursor = Cursor::new(vec![0xFF, 0xFF, 0xFF, 0xFF, 1, 2]);
    let mut reader = FieldReader::new(&mut cursor);
    assert!(matches!(
        reader.read_length_prefixed_bytes(),
        Err(Error::TruncatedInput { .. })
    ));
}

#[test]
fn test_skip_reports_available_bytes() {
    let mut cursor = Cursor::new(vec![0u8; 5]);
    let mut reader = FieldReader::new(&mut cursor);
    assert_eq!(reader.skip(3).unwrap(), 3);
    assert_eq!(reader.skip(8).unwrap(), 2);
    assert_eq!(reader.skip(8).unwrap(), 0);
}

// ============================================================================
// Header and Records
// ============================================================================

#[test]
fn test_read_header() {
    let mut cursor = Cursor::new(vec![5, 0, 0, 0, 1, 0, 0, 0, 0]);
    let header = FieldReader::new(&mut cursor).read_header().unwrap();
    assert_eq!(
        header,
        FileHeader {
            total_size: 5,
            version: 1,
            rule_count: 0,
        }
    );
}

#[test]
fn test_record_layout() {
    let rule = Rule::new(
        1,
        Column::from_code(0x9c77),
        Relation::Contains,
        Action::Include,
        "Reg\0",
    );
    let bytes = written(|w| w.write_rule(&rule).unwrap());

    let mut expected = vec![
        0x77, 0x9c, 0x00, 0x00, // column
        0x06, 0x00, 0x00, 0x00, // relation: contains
        0x01, // action: INCLUDE
        0x08, 0x00, 0x00, 0x00, // value length
        b'R', 0, b'e', 0, b'g', 0, 0, 0,
    ];
    expected.extend_from_slice(&[0u8; RESERVED_LEN]);
    assert_eq!(bytes, expected);
}

#[test]
fn test_record_read_back() {
    let rule = Rule::new(
        1,
        Column::from_code(0x9c75),
        Relation::IsNot,
        Action::Exclude,
        "svchost.exe\0",
    );
    let mut cursor = Cursor::new(written(|w| w.write_rule(&rule).unwrap()));
    let read = FieldReader::new(&mut cursor).read_rule(9).unwrap();

    assert_eq!(read.id, 9);
    assert_eq!(read.key(), rule.key());
    assert_eq!(cursor.stream_position().unwrap(), cursor.get_ref().len() as u64);
}

#[test]
fn test_record_with_bad_action() {
    let rule = Rule::new(1, Column::from_code(0x9c75), Relation::Is, Action::Include, "a\0");
    let mut bytes = written(|w| w.write_rule(&rule).unwrap());
    bytes[8] = 5;

    let mut cursor = Cursor::new(bytes);
    assert!(matches!(
        FieldReader::new(&mut cursor).read_rule(1),
        Err(Error::InvalidActionIndex(5))
    ));
}

#[test]
fn test_record_with_odd_value_length() {
    let mut bytes = vec![0x75, 0x9c, 0, 0, 0, 0, 0, 0, 1, 3, 0, 0, 0, b'a', 0, b'b'];
    bytes.extend_from_slice(&[0u8; RESERVED_LEN]);

    let mut cursor = Cursor::new(bytes);
    assert!(matches!(
        FieldReader::new(&mut cursor).read_rule(1),
        Err(Error::InvalidText)
    ));
}

#[test]
fn test_writer_respects_cursor_position() {
    let mut cursor = Cursor::new(vec![0xEE; 6]);
    cursor.seek(SeekFrom::Start(2)).unwrap();
    FieldWriter::new(&mut cursor).write_u8(7).unwrap();
    assert_eq!(cursor.get_ref(), &vec![0xEE, 0xEE, 7, 0xEE, 0xEE, 0xEE]);
}
