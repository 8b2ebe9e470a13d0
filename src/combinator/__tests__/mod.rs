use super::*;

#[test]
fn sequence_of_chars_is_regular_and_cf() {
    let g = sequence(vec![ch(b'a'), ch(b'b'), ch(b'c')]);
    assert!(g.caps.is_valid_regular);
    assert!(g.caps.is_valid_cf);
    assert!(g.caps.is_higher_order);
}

#[test]
fn primitive_is_not_higher_order() {
    let g = ch(b'x');
    assert!(!g.caps.is_higher_order);
    assert!(g.caps.is_valid_regular);
}

#[test]
fn action_breaks_validity_but_parent_inherits_the_break() {
    let g = ch(b'a').action(|tok, _arena| tok);
    assert!(!g.caps.is_valid_regular);
    let wrapped = optional(g);
    assert!(!wrapped.caps.is_valid_regular);
}

#[test]
fn each_combinator_gets_a_distinct_id() {
    let a = ch(b'a');
    let b = ch(b'a');
    assert_ne!(a.id, b.id);
}

#[test]
fn indirect_binds_exactly_once() {
    let (placeholder, slot) = indirect();
    bind_indirect(&slot, ch(b'a')).unwrap();
    assert!(slot.get().is_some());
    assert!(bind_indirect(&slot, ch(b'b')).is_err());
    drop(placeholder);
}

#[test]
fn fluent_ext_matches_free_function_shape() {
    let a = ch(b'a').many1().sep_by(ch(b','));
    match &a.kind {
        CombKind::SepBy(item, _sep) => {
            assert!(matches!(item.kind, CombKind::Many1(_)));
        }
        _ => panic!("expected sep_by"),
    }
}
