//! The concrete worked examples from SPEC_FULL.md §8, one test per
//! scenario. Scenario 1 (plain sequence) and scenario 6 (chunked input)
//! already live next to the code they exercise — in `lib.rs`'s
//! `smoke_tests` and in `chunked.rs` respectively — so they aren't
//! repeated here.

use crate::*;

/// Scenario 2: a directly left-recursive arithmetic grammar.
///
/// `E -> E '+' D | D`, `D -> [0-9]`. Parsing `"1+2+3"` against `E` must
/// left-associate: `((1 + 2) + 3)`, which is exactly what Warth's
/// seed-growing algorithm is for.
#[test]
fn left_recursive_sum_left_associates() {
    let digit = ch_range(b'0', b'9');
    let (e, e_slot) = indirect();
    let e_plus_d = sequence(vec![e.clone(), ch(b'+'), digit.clone()]);
    let body = choice(vec![e_plus_d, digit]);
    bind_indirect(&e_slot, body).unwrap();

    let arena = Arena::new();
    let state = ParseState::new(&arena);
    let result = parse(&state, &e, b"1+2+3").unwrap();
    assert!(result.is_success());
    assert_eq!(
        unamb::write_result_unamb(&result.token.unwrap()),
        "((u0x31 u0x2b u0x32) u0x2b u0x33)"
    );
}

/// Scenario 3: `many(choice(...))` over a run of mixed digits and letters,
/// stopping cleanly at the first byte neither alternative accepts.
#[test]
fn many_of_choice_stops_at_first_non_match() {
    let digit = ch_range(b'0', b'9');
    let letter = ch_range(b'a', b'z');
    let grammar = many(choice(vec![digit, letter]));

    let arena = Arena::new();
    let state = ParseState::new(&arena);
    let result = parse(&state, &grammar, b"a1b2!").unwrap();
    assert!(result.is_success());
    let tok = result.token.unwrap();
    assert_eq!(
        unamb::write_result_unamb(&tok),
        "(u0x61 u0x31 u0x62 u0x32)"
    );
}

/// Scenario 4: `permutation` accepts its arguments in any order at the
/// input, but reports each child at its *original* argument index.
#[test]
fn permutation_preserves_original_argument_order() {
    let grammar = permutation(vec![ch(b'a'), ch(b'b'), ch(b'c')]);

    let arena = Arena::new();
    let state = ParseState::new(&arena);
    // Input presents c, a, b -- argument order was a, b, c.
    let result = parse(&state, &grammar, b"cab").unwrap();
    assert!(result.is_success());
    assert_eq!(
        unamb::write_result_unamb(&result.token.unwrap()),
        "(u0x61 u0x62 u0x63)"
    );
}

/// Scenario 5: `with_endianness` changes how a fixed-width integer's bytes
/// are assembled, without changing what bytes are consumed.
#[test]
fn with_endianness_swaps_byte_order_not_consumption() {
    let grammar = with_endianness(Endianness::BYTE_LITTLE_BIT_BIG, uint32());

    let arena = Arena::new();
    let state = ParseState::new(&arena);
    let result = parse(&state, &grammar, &[0x01, 0x00, 0x00, 0x00]).unwrap();
    assert!(result.is_success());
    match result.token.unwrap().kind {
        TokenKind::UInt(v) => assert_eq!(v, 1),
        other => panic!("expected UInt, got {:?}", other),
    }

    let arena = Arena::new();
    let state = ParseState::new(&arena);
    let big_endian = uint32();
    let result = parse(&state, &big_endian, &[0x01, 0x00, 0x00, 0x00]).unwrap();
    assert!(result.is_success());
    match result.token.unwrap().kind {
        TokenKind::UInt(v) => assert_eq!(v, 0x0100_0000),
        other => panic!("expected UInt, got {:?}", other),
    }
}

/// Plain two-rule indirect left recursion: `A -> B 'x' | 'a'`,
/// `B -> A 'y' | 'b'`. Growing `A`'s seed requires recalling `B`, which in
/// turn recalls `A` at the same position -- the case `setup_lr` must walk
/// the LR stack correctly for, stopping exactly at the frame whose rule is
/// the combinator being recalled rather than at whichever frame happens to
/// already carry the same `Head` by pointer identity.
#[test]
fn two_rule_indirect_left_recursion_grows_through_both_heads() {
    let (a, a_slot) = indirect();
    let (b, b_slot) = indirect();

    let a_body = choice(vec![sequence(vec![b.clone(), ch(b'x')]), ch(b'a')]);
    let b_body = choice(vec![sequence(vec![a.clone(), ch(b'y')]), ch(b'b')]);
    bind_indirect(&a_slot, a_body).unwrap();
    bind_indirect(&b_slot, b_body).unwrap();

    let arena = Arena::new();
    let state = ParseState::new(&arena);
    let result = parse(&state, &a, b"ayx").unwrap();
    assert!(result.is_success());
    assert_eq!(
        unamb::write_result_unamb(&result.token.unwrap()),
        "((u0x61 u0x79) u0x78)"
    );
}

/// A known completeness gap in this packrat/Warth implementation:
/// three-way *interleaved* mutual left recursion, where growing the
/// innermost rule's head requires re-growing a second rule's head while
/// that second rule's own growth is still in progress. The reference
/// algorithm (and this port of it) tracks one `head` per input position,
/// not a stack of heads per position, so the inner growth can finish
/// against a stale seed for the outer rule instead of re-running it.
///
/// Fixing this needs a `Vec<Head>` (or similar) per position in
/// `ParseState` instead of a single `Option<Head>`, with `grow_lr`
/// re-entering every head still open at a position, not just the most
/// recent one. Left ignored until a grammar that actually needs it shows
/// up; tracked here so the gap doesn't get lost.
#[test]
#[ignore = "known gap: nested left-recursion heads aren't re-grown independently, see comment above"]
fn interleaved_mutual_left_recursion_grows_all_three_heads() {
    let (a, a_slot) = indirect();
    let (b, b_slot) = indirect();
    let (c, c_slot) = indirect();

    let a_body = choice(vec![
        sequence(vec![b.clone(), ch(b'x')]),
        ch(b'a'),
    ]);
    let b_body = choice(vec![
        sequence(vec![a.clone(), ch(b'y')]),
        c.clone(),
    ]);
    let c_body = choice(vec![
        sequence(vec![b.clone(), ch(b'z')]),
        ch(b'c'),
    ]);
    bind_indirect(&a_slot, a_body).unwrap();
    bind_indirect(&b_slot, b_body).unwrap();
    bind_indirect(&c_slot, c_body).unwrap();

    let arena = Arena::new();
    let state = ParseState::new(&arena);
    let result = parse(&state, &a, b"czxyx").unwrap();
    assert!(result.is_success());
    assert_eq!(
        unamb::write_result_unamb(&result.token.unwrap()),
        "((((u0x63 u0x7a) u0x78) u0x79) u0x78)"
    );
}
