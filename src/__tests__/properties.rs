//! Property-based tests for the "Universal invariants" and "Additional
//! properties" called out in SPEC_FULL.md §8. Each property is checked
//! against many generated inputs via `proptest` rather than a handful of
//! fixed examples, the way `examples/winnow-rs-winnow` tests its own
//! combinators.

use crate::*;
use proptest::prelude::*;

fn run(grammar: &P, input: &[u8]) -> (bool, Option<String>, u64) {
    let arena = Arena::new();
    let state = ParseState::new(&arena);
    let result = parse(&state, grammar, input).unwrap();
    let ok = result.is_success();
    let rendered = result.token.as_ref().map(unamb::write_result_unamb);
    (ok, rendered, result.stream.position_bits())
}

proptest! {
    /// `optional(p)` never fails, on any input, matching or not.
    #[test]
    fn optional_never_fails(bytes in proptest::collection::vec(any::<u8>(), 0..8)) {
        let grammar = optional(ch(b'z'));
        let (ok, _, _) = run(&grammar, &bytes);
        prop_assert!(ok);
    }

    /// `and(p)` is a zero-width lookahead: on success it reports `p`'s
    /// token but leaves the cursor exactly where it started.
    #[test]
    fn and_consumes_nothing_on_success(suffix in proptest::collection::vec(any::<u8>(), 0..6)) {
        let mut input = vec![b'a'];
        input.extend(suffix);
        let grammar = and(ch(b'a'));
        let (ok, _, end_pos) = run(&grammar, &input);
        prop_assert!(ok);
        prop_assert_eq!(end_pos, 0);
    }

    /// `choice(p, q)` and `choice(q, p)` agree on any single byte when `p`
    /// and `q` recognize disjoint sets: exactly one of them can match, so
    /// trying them in either order reaches the same token.
    #[test]
    fn choice_is_commutative_over_disjoint_alternatives(b in b'a'..=b'z') {
        let lower_half = in_set(CharSet::from_range(b'a', b'm'));
        let upper_half = in_set(CharSet::from_range(b'n', b'z'));
        let forward = choice(vec![lower_half.clone(), upper_half.clone()]);
        let backward = choice(vec![upper_half, lower_half]);
        let input = [b];
        let (ok_fwd, tok_fwd, _) = run(&forward, &input);
        let (ok_bwd, tok_bwd, _) = run(&backward, &input);
        prop_assert_eq!(ok_fwd, ok_bwd);
        prop_assert_eq!(tok_fwd, tok_bwd);
    }

    /// `sep_by(item, sep)` on input that doesn't start with `item` at all
    /// succeeds with an empty sequence rather than failing.
    #[test]
    fn sep_by_on_non_matching_input_succeeds_empty(bytes in proptest::collection::vec(1u8..=9u8, 0..4)) {
        // Digits 1-9 never match `item` below (which only accepts '0'),
        // so sep_by must report a zero-length match, not a failure.
        let item = ch(b'0');
        let sep = ch(b',');
        let grammar = sep_by(item, sep);
        let (ok, tok, end_pos) = run(&grammar, &bytes);
        prop_assert!(ok);
        prop_assert_eq!(tok.unwrap(), "()");
        prop_assert_eq!(end_pos, 0);
    }

    /// `repeat_n(p, 0)` always succeeds with an empty sequence and
    /// consumes nothing, regardless of what `p` is or what the input is.
    #[test]
    fn repeat_n_zero_always_succeeds_empty(bytes in proptest::collection::vec(any::<u8>(), 0..6)) {
        let grammar = repeat_n(ch(b'Q'), 0);
        let (ok, tok, end_pos) = run(&grammar, &bytes);
        prop_assert!(ok);
        prop_assert_eq!(tok.unwrap(), "()");
        prop_assert_eq!(end_pos, 0);
    }

    /// `ignore(p)` reports `None` on success but must still consume
    /// exactly as much input as `p` would on its own.
    #[test]
    fn ignore_reports_none_but_advances_like_inner(b in b'a'..=b'z') {
        let input = [b];
        let (plain_ok, _, plain_end) = run(&ch_range(b'a', b'z'), &input);
        let (ignored_ok, ignored_tok, ignored_end) = run(&ignore(ch_range(b'a', b'z')), &input);
        prop_assert_eq!(plain_ok, ignored_ok);
        prop_assert_eq!(plain_end, ignored_end);
        prop_assert_eq!(ignored_tok.unwrap(), "null");
    }

    /// Running the same grammar over the same input twice (fresh arena,
    /// fresh packrat cache each time) must reach the same verdict and
    /// render the same token tree. The memo table is a pure cache: it
    /// must never change what a parse answers, only how fast it answers.
    #[test]
    fn packrat_parsing_is_deterministic(bytes in proptest::collection::vec(any::<u8>(), 0..16)) {
        let grammar = many(choice(vec![ch_range(b'0', b'9'), ch_range(b'a', b'z')]));
        let (ok1, tok1, end1) = run(&grammar, &bytes);
        let (ok2, tok2, end2) = run(&grammar, &bytes);
        prop_assert_eq!(ok1, ok2);
        prop_assert_eq!(tok1, tok2);
        prop_assert_eq!(end1, end2);
    }

    /// A failed parse never partially consumes input: the fact of a
    /// match is all-or-nothing at the attempted starting position.
    #[test]
    fn failed_sequence_reports_failure_not_partial_success(bytes in proptest::collection::vec(any::<u8>(), 3..6)) {
        prop_assume!(bytes[0] != b'a' || bytes[1] != b'b' || bytes[2] != b'c');
        let grammar = sequence(vec![ch(b'a'), ch(b'b'), ch(b'c')]);
        let (ok, tok, _) = run(&grammar, &bytes);
        prop_assert!(!ok);
        prop_assert!(tok.is_none());
    }
}

/// The user token-type registry hands out the same id for the same name
/// on every call, never a fresh one -- registration is idempotent.
#[test]
fn token_type_registry_is_idempotent() {
    let a = allocate_token_type("spec_full_property_registry_example");
    let b = allocate_token_type("spec_full_property_registry_example");
    let c = allocate_token_type("spec_full_property_registry_example");
    assert_eq!(a, b);
    assert_eq!(b, c);
    assert!(a >= TT_USER);
}

/// Every id the registry hands out is, and stays, resolvable back to its
/// name -- registering more types afterward doesn't disturb earlier ones.
#[test]
fn token_type_registry_names_stay_resolvable_after_further_registration() {
    let first = allocate_token_type("spec_full_property_registry_first");
    let _second = allocate_token_type("spec_full_property_registry_second");
    assert_eq!(
        get_token_type_name(first),
        Some("spec_full_property_registry_first")
    );
    assert_eq!(get_token_type_number("spec_full_property_registry_first"), Some(first));
}
