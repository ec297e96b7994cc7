use super::*;

fn table_for(text: &str) -> BindingTable {
    let mut table = BindingTable::new();
    table.update_from_text(text);
    table
}

fn member(word: &str, class_name: &str, instance_name: &str) -> ResolvedContext {
    ResolvedContext::Member {
        word: word.to_string(),
        class_name: class_name.to_string(),
        instance_name: instance_name.to_string(),
    }
}

fn bare(word: &str, instance_class: Option<&str>) -> ResolvedContext {
    ResolvedContext::Bare {
        word: word.to_string(),
        instance_class: instance_class.map(str::to_string),
    }
}

#[test]
fn hover_member_of_constructed_instance() {
    let text = "p1 = new Subpopulation;\ninds = p1.individuals;";
    let table = table_for(text);
    let ctx = resolve_at_cursor(text, 1, 12, &table);
    assert_eq!(ctx, Some(member("individuals", "Subpopulation", "p1")));
}

#[test]
fn hover_member_of_added_subpopulation() {
    let text = "1 early() {\n    sim.addSubpop(\"p2\", 100);\n    g = p2.genomes;\n}";
    let table = table_for(text);
    let ctx = resolve_at_cursor(text, 2, 13, &table);
    assert_eq!(ctx, Some(member("genomes", "Subpopulation", "p2")));
}

#[test]
fn hover_member_of_registered_block() {
    let text = "community.registerEarlyEvent(\"e1\", \"{}\");\ne1.active = 0;";
    let table = table_for(text);
    let ctx = resolve_at_cursor(text, 1, 4, &table);
    assert_eq!(ctx, Some(member("active", "SLiMEidosBlock", "e1")));
}

#[test]
fn member_class_falls_back_to_alias_then_literal() {
    let table = BindingTable::new();
    assert_eq!(
        resolve_at_cursor("sim.cycle", 0, 6, &table),
        Some(member("cycle", "Species", "sim"))
    );
    assert_eq!(
        resolve_at_cursor("Mutation.id", 0, 10, &table),
        Some(member("id", "Mutation", "Mutation"))
    );
}

#[test]
fn member_access_wins_on_left_hand_side_too() {
    let table = BindingTable::new();
    assert_eq!(
        resolve_at_cursor("x = sim.cycle;", 0, 5, &table),
        Some(member("cycle", "Species", "sim"))
    );
}

#[test]
fn trailing_dot_hover_yields_empty_member() {
    let table = BindingTable::new();
    let resolution = resolve("sim.", 0, 4, ResolveMode::Enclosing, &table).unwrap();
    assert_eq!(resolution.context, member("", "Species", "sim"));
    assert!(resolution.span.is_empty());
}

#[test]
fn hover_bare_word_resolves_instance_class() {
    let text = "x = new Foo;\nx = new Bar;\ncall(x);";
    let table = table_for(text);
    assert_eq!(resolve_at_cursor(text, 2, 5, &table), Some(bare("x", Some("Bar"))));
    assert_eq!(resolve_at_cursor(text, 2, 1, &table), Some(bare("call", None)));
    assert_eq!(resolve_at_cursor("sim", 0, 3, &table), Some(bare("sim", Some("Species"))));
}

#[test]
fn bare_word_without_binding_has_no_instance_class() {
    let table = BindingTable::new();
    match resolve_at_cursor("initializeMutationRate(1e-7);", 0, 4, &table) {
        Some(ResolvedContext::Bare { word, instance_class }) => {
            assert_eq!(word, "initializeMutationRate");
            assert!(instance_class.is_none());
        }
        other => panic!("unexpected context: {other:?}"),
    }
}

#[test]
fn hover_span_touches_both_token_edges() {
    let table = BindingTable::new();
    let line = "  foo + bar";
    assert_eq!(resolve_at_cursor(line, 0, 2, &table).map(|c| c.word().to_string()), Some("foo".into()));
    assert_eq!(resolve_at_cursor(line, 0, 5, &table).map(|c| c.word().to_string()), Some("foo".into()));
    assert_eq!(resolve_at_cursor(line, 0, 11, &table).map(|c| c.word().to_string()), Some("bar".into()));
}

#[test]
fn no_identifier_under_cursor_is_none() {
    let table = BindingTable::new();
    assert_eq!(resolve_at_cursor("a  +  b", 0, 4, &table), None);
    assert_eq!(resolve_at_cursor("   ", 0, 1, &table), None);
    assert_eq!(resolve_at_cursor("123 456", 0, 2, &table), None);
    assert_eq!(resolve_at_cursor("", 0, 0, &table), None);
    assert_eq!(resolve_at_cursor("abc", 5, 0, &table), None);
}

#[test]
fn completion_after_bare_dot_resolves_class() {
    let table = BindingTable::new();
    assert_eq!(
        resolve_for_completion("    sim.", 0, 8, &table),
        Some(member("", "Species", "sim"))
    );
    assert_eq!(
        resolve_for_completion("    sim .  ", 0, 11, &table),
        Some(member("", "Species", "sim"))
    );
}

#[test]
fn completion_uses_bindings_for_dot_object() {
    let text = "sim.addSubpop(\"p1\", 10);\np1.";
    let table = table_for(text);
    assert_eq!(
        resolve_for_completion(text, 1, 3, &table),
        Some(member("", "Subpopulation", "p1"))
    );
}

#[test]
fn completion_ignores_text_after_cursor() {
    let table = BindingTable::new();
    // Hover sees the whole dotted expression; completion only sees "sim".
    assert_eq!(
        resolve_at_cursor("sim.cycle", 0, 3, &table),
        Some(member("cycle", "Species", "sim"))
    );
    assert_eq!(resolve_for_completion("sim.cycle", 0, 3, &table), Some(bare("sim", None)));
}

#[test]
fn completion_bare_word_has_no_instance_class() {
    let text = "p1 = new Subpopulation;\np1";
    let table = table_for(text);
    assert_eq!(resolve_for_completion(text, 1, 2, &table), Some(bare("p1", None)));
}

#[test]
fn completion_after_partial_member_is_bare() {
    let table = BindingTable::new();
    assert_eq!(resolve_for_completion("sim.ad", 0, 6, &table), Some(bare("ad", None)));
}

#[test]
fn completion_is_left_biased() {
    let table = BindingTable::new();
    // Cursor at the start of a word: nothing has been typed yet.
    assert_eq!(resolve_for_completion("x = foo", 0, 4, &table), None);
    assert_eq!(resolve_at_cursor("x = foo", 0, 4, &table), Some(bare("foo", None)));
    // Cursor after a space.
    assert_eq!(resolve_for_completion("foo ", 0, 4, &table), None);
}

#[test]
fn resolution_reports_word_span() {
    let table = BindingTable::new();
    let r = resolve("  p1.individuals", 0, 8, ResolveMode::Enclosing, &table).unwrap();
    assert_eq!(r.span, Span::new(5, 16));
    assert_eq!(r.line, 0);
    let r = resolve("let abc", 0, 7, ResolveMode::Preceding, &table).unwrap();
    assert_eq!(r.span, Span::new(4, 7));
}

#[test]
fn non_ascii_lines_convert_utf16_cursor() {
    let table = BindingTable::new();
    // "é" takes one UTF-16 unit but two bytes.
    assert_eq!(resolve_at_cursor("é = sim.cycle", 0, 9, &table), Some(member("cycle", "Species", "sim")));
    assert_eq!(resolve_for_completion("// é\nsim.", 1, 4, &table), Some(member("", "Species", "sim")));
}

#[test]
fn context_serializes_with_kind_tag() {
    let json = serde_json::to_value(member("cycle", "Species", "sim")).unwrap();
    assert_eq!(json["kind"], "member");
    assert_eq!(json["className"], "Species");
    let json = serde_json::to_value(bare("x", None)).unwrap();
    assert_eq!(json["kind"], "bare");
    assert!(json["instanceClass"].is_null());
}

#[test]
fn cursor_past_line_end_resolves_nothing() {
    let table = BindingTable::new();
    assert_eq!(resolve_at_cursor("abc", 0, 10, &table), None);
    assert_eq!(resolve_at_cursor("sim.", 0, 9, &table), None);
    assert_eq!(resolve_for_completion("abc", 0, 10, &table), None);
    assert_eq!(resolve_for_completion("sim.\nx", 0, 5, &table), None);
    // The end of the line itself still touches the last word.
    assert_eq!(resolve_at_cursor("abc", 0, 3, &table), Some(bare("abc", None)));
}
