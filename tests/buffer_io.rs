use lined::editor::{BufferError, Direction, MAX_LINE_SIZE, TextBuffer};
use proptest::prelude::*;

#[test]
fn test_open_missing_file_creates_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.txt");

    let buffer = TextBuffer::load(&path).unwrap();
    assert!(path.exists());
    assert_eq!(buffer.line_count(), 1);
    assert_eq!(buffer.line_len(0), 0);
    assert_eq!(buffer.path(), Some(path.as_path()));
}

#[test]
fn test_load_edit_save_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.txt");
    std::fs::write(&path, "ab\ncd\n").unwrap();

    let mut buffer = TextBuffer::load(&path).unwrap();
    assert_eq!(buffer.line_count(), 2);

    buffer.move_cursor(Direction::Down, 10);
    buffer.move_past_end();
    assert!(buffer.insert_char('é'));
    assert!(buffer.insert_line_at_cursor(10));
    assert!(buffer.insert_char('z'));
    buffer.validate().unwrap();

    buffer.save().unwrap();
    assert!(!buffer.is_dirty());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "ab\ncdé\nz\n");

    let reloaded = TextBuffer::load(&path).unwrap();
    assert_eq!(reloaded.text(), buffer.text());
}

#[test]
fn test_crlf_and_unterminated_last_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dos.txt");
    std::fs::write(&path, "one\r\ntwo").unwrap();

    let buffer = TextBuffer::load(&path).unwrap();
    assert_eq!(buffer.line_text(0).as_deref(), Some("one"));
    assert_eq!(buffer.line_text(1).as_deref(), Some("two"));
}

#[test]
fn test_overlong_line_is_split_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("long.txt");
    std::fs::write(&path, "x".repeat(MAX_LINE_SIZE + 10)).unwrap();

    let buffer = TextBuffer::load(&path).unwrap();
    assert_eq!(buffer.line_count(), 2);
    assert_eq!(buffer.line_len(0), MAX_LINE_SIZE);
    assert_eq!(buffer.line_len(1), 10);
    buffer.validate().unwrap();
}

#[test]
fn test_load_from_unreachable_path_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("file.txt");
    let err = TextBuffer::load(&path).unwrap_err();
    assert!(matches!(err, BufferError::Open { .. }));
    assert!(err.to_string().contains("file.txt"));
}

#[test]
fn test_free_reports_released_nodes() {
    let buffer = TextBuffer::from_text("ab\ncde\n").unwrap();
    let stats = buffer.free();
    assert_eq!(stats.lines, 2);
    assert_eq!(stats.chars, 5);
}

proptest! {
    #[test]
    fn find_char_matches_file_contents(
        lines in prop::collection::vec("[a-z中é ]{0,20}", 1..12),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prop.txt");
        std::fs::write(&path, lines.join("\n") + "\n").unwrap();

        let buffer = TextBuffer::load(&path).unwrap();
        prop_assert_eq!(buffer.line_count(), lines.len());
        for (y, expected) in lines.iter().enumerate() {
            let line = buffer.find_line(y).unwrap();
            for (x, ch) in expected.chars().enumerate() {
                prop_assert_eq!(line.find_char(x).map(|cp| cp.value()), Some(ch));
            }
            prop_assert!(line.find_char(expected.chars().count()).is_none());
        }
    }
}
