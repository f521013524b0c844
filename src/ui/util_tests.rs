#![allow(clippy::unwrap_used)]

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("cement", 10), "cement");
}

#[test]
fn test_truncate_exact_length() {
    assert_eq!(truncate("cement", 6), "cement");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("cement bags", 5), "ceme…");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("cement", 0), "");
}

#[test]
fn test_truncate_accents() {
    assert_eq!(truncate("Serviço elétrico", 8), "Serviço…");
}

// ── scrolling ─────────────────────────────────────────────────

#[test]
fn test_scroll_down_moves_window() {
    let (mut index, mut scroll) = (0, 0);
    for _ in 0..5 {
        scroll_down(&mut index, &mut scroll, 10, 3);
    }
    assert_eq!(index, 5);
    assert_eq!(scroll, 3);
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (2, 0);
    scroll_down(&mut index, &mut scroll, 3, 5);
    assert_eq!(index, 2);
    assert_eq!(scroll, 0);
}

#[test]
fn test_scroll_up_pulls_window() {
    let (mut index, mut scroll) = (3, 3);
    scroll_up(&mut index, &mut scroll);
    assert_eq!(index, 2);
    assert_eq!(scroll, 2);
    let (mut index, mut scroll) = (0, 0);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_max_scroll() {
    assert_eq!(max_scroll(20, 5), 15);
    assert_eq!(max_scroll(3, 5), 0);
}

// ── wrap_lines ────────────────────────────────────────────────

#[test]
fn test_wrap_lines_short_lines_untouched() {
    assert_eq!(wrap_lines("ab\ncd\n", 10), vec!["ab", "cd"]);
}

#[test]
fn test_wrap_lines_splits_long_line() {
    assert_eq!(wrap_lines("abcdefg", 3), vec!["abc", "def", "g"]);
}

#[test]
fn test_wrap_lines_keeps_blank_lines() {
    assert_eq!(wrap_lines("a\n\nb", 5), vec!["a", "", "b"]);
}

#[test]
fn test_wrap_lines_counts_chars_not_bytes() {
    assert_eq!(wrap_lines("çãé", 2), vec!["çã", "é"]);
}

#[test]
fn test_wrap_lines_zero_width() {
    assert_eq!(wrap_lines("ab", 0), vec!["a", "b"]);
}
