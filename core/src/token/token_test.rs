use super::*;

#[test]
fn identifiers_with_spans() {
    let line = "  p1.individuals[0] = x_2;";
    let toks: Vec<_> = identifiers(line).collect();
    let texts: Vec<&str> = toks.iter().map(|t| t.text).collect();
    assert_eq!(texts, vec!["p1", "individuals", "x_2"]);
    assert_eq!(toks[0].span, Span::new(2, 4));
    assert_eq!(toks[1].span, Span::new(5, 16));
}

#[test]
fn identifiers_need_word_boundary() {
    // A digit-led run is not an identifier and does not yield its tail.
    let texts: Vec<&str> = identifiers("1e7 + 2abc + ok").map(|t| t.text).collect();
    assert_eq!(texts, vec!["ok"]);
}

#[test]
fn member_access_with_and_without_member() {
    let accesses: Vec<_> = member_accesses("sim . addSubpop(p1.);").collect();
    assert_eq!(accesses.len(), 2);
    assert_eq!(accesses[0].object.text, "sim");
    assert_eq!(accesses[0].member_text(), "addSubpop");
    assert_eq!(accesses[0].span, Span::new(0, 15));
    assert_eq!(accesses[1].object.text, "p1");
    assert!(accesses[1].member.is_none());
    assert_eq!(accesses[1].member_text(), "");
}

#[test]
fn trailing_member_object_only_at_end() {
    assert_eq!(trailing_member_object("  x = sim.").map(|t| t.text), Some("sim"));
    assert_eq!(trailing_member_object("a.b .  ").map(|t| t.text), Some("b"));
    assert!(trailing_member_object("sim.ad").is_none());
    assert!(trailing_member_object("3.").is_none());
}

#[test]
fn span_touches_is_inclusive() {
    let span = Span::new(3, 6);
    assert!(!span.touches(2));
    assert!(span.touches(3));
    assert!(span.touches(6));
    assert!(!span.touches(7));
    assert_eq!(span.len(), 3);
    assert_eq!(span.to_string(), "3..6");
}

#[test]
fn line_at_splits_on_newline() {
    let text = "a\r\nb\n\nc";
    assert_eq!(line_at(text, 0), Some("a\r"));
    assert_eq!(line_at(text, 2), Some(""));
    assert_eq!(line_at(text, 3), Some("c"));
    assert_eq!(line_at(text, 4), None);
}

#[test]
fn utf16_offsets_round_trip_through_non_ascii() {
    let line = "é😀x = 1";
    // é is 1 UTF-16 unit, the emoji 2.
    assert_eq!(utf16_to_byte(line, 0), 0);
    assert_eq!(utf16_to_byte(line, 1), 2);
    assert_eq!(utf16_to_byte(line, 2), 2);
    assert_eq!(utf16_to_byte(line, 3), 6);
    assert_eq!(utf16_to_byte(line, 100), line.len());
    assert_eq!(byte_to_utf16(line, 6), 3);
    assert_eq!(utf16_to_byte("abc", 10), 3);
}
