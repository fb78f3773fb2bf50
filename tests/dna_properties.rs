//! Property-based tests for the packed nucleotide codec

use fast_dna::core::dna::{
    apply_case, apply_repeat_mask, complement_base, decode_nibble, encode_base, pack_bases,
    reverse_complement_in_place, revcomp, unpack_bases, CaseMode, RepeatMask, ABSENT,
};
use proptest::prelude::*;

const SYMBOLS: &[u8] = b"ACGTacgtNn";

/// Generate a random sequence over the ten packable symbols
fn packable_sequence_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(SYMBOLS.to_vec()), 1..200)
}

proptest! {
    /// Decoding a full packed sequence recovers every symbol
    #[test]
    fn prop_pack_unpack_recovers_symbols(seq in packable_sequence_strategy()) {
        let packed = pack_bases(&seq);
        prop_assert_eq!(packed.len(), seq.len().div_ceil(2));
        prop_assert_eq!(unpack_bases(&packed, 0, seq.len()), seq);
    }

    /// Any sub-window decodes to the matching slice, whatever its parity
    #[test]
    fn prop_unpack_any_window(
        seq in packable_sequence_strategy(),
        a in 0usize..200,
        b in 0usize..200,
    ) {
        let s = a % seq.len();
        let e = s + b % (seq.len() - s);
        let packed = pack_bases(&seq);
        let window = &packed[s / 2..=e / 2];

        prop_assert_eq!(unpack_bases(window, s as u64, e - s + 1), seq[s..=e].to_vec());
    }

    /// Known codes encode back to the nibble they decode from
    #[test]
    fn prop_nibble_round_trip(code in 1u8..=10) {
        prop_assert_eq!(encode_base(decode_nibble(code)), code);
    }

    /// Reverse complement is its own inverse
    #[test]
    fn prop_revcomp_involution(seq in packable_sequence_strategy()) {
        let mut twice = seq.clone();
        reverse_complement_in_place(&mut twice);
        reverse_complement_in_place(&mut twice);
        prop_assert_eq!(twice, seq);
    }

    /// Complement never changes case
    #[test]
    fn prop_complement_preserves_case(base in prop::sample::select(SYMBOLS.to_vec())) {
        let c = complement_base(base);
        prop_assert_eq!(c.is_ascii_lowercase(), base.is_ascii_lowercase());
        prop_assert_eq!(complement_base(c), base);
    }

    /// The N mask leaves no lowercase base behind
    #[test]
    fn prop_mask_removes_soft_masked(seq in packable_sequence_strategy()) {
        let mut masked = seq.clone();
        apply_repeat_mask(&mut masked, RepeatMask::N);
        prop_assert!(masked.iter().all(|b| !matches!(b, b'a' | b'c' | b'g' | b't')));
        prop_assert_eq!(masked.len(), seq.len());
    }

    /// Upper case output contains only the five upper case symbols
    #[test]
    fn prop_upper_case_output(seq in packable_sequence_strategy()) {
        let mut upper = seq.clone();
        apply_case(&mut upper, CaseMode::Upper, RepeatMask::None);
        prop_assert!(upper.iter().all(|b| b"ACGTN".contains(b)));
        prop_assert_eq!(String::from_utf8(upper).unwrap(), String::from_utf8(seq).unwrap().to_uppercase());
    }
}

#[cfg(test)]
mod edge_cases {
    use super::*;

    #[test]
    fn test_reserved_nibbles_decode_absent() {
        assert_eq!(decode_nibble(0), ABSENT);
        for code in 11u8..16 {
            assert_eq!(decode_nibble(code), ABSENT);
        }
    }

    #[test]
    fn test_mask_then_case_precedence() {
        let mut seq = b"AcGtN".to_vec();
        apply_repeat_mask(&mut seq, RepeatMask::N);
        apply_case(&mut seq, CaseMode::Lower, RepeatMask::N);
        assert_eq!(seq, b"ANGNN");
    }

    #[test]
    fn test_revcomp_known_sequences() {
        assert_eq!(revcomp("ATG"), "CAT");
        assert_eq!(revcomp("GAATTC"), "GAATTC");
        assert_eq!(revcomp("acgtN"), "NacgT");
    }
}
