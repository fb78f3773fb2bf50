//! DNA sequence codec
//!
//! Pure functions over byte buffers: 4-bit nucleotide decode, reverse,
//! complement, and the case and repeat-mask passes applied after decoding.
//!
//! Packed files store two bases per byte, high nibble first, with the codes
//! `1=A 2=C 3=G 4=T 5=a 6=c 7=g 8=t 9=N 10=n`. Codes 0 and 11-15 are
//! reserved. Decoding is lenient: a reserved code becomes the 0 byte rather
//! than an error, and so does any unknown symbol passed through complement
//! or the case pass.

/// Symbol for reserved codes and unknown input
pub const ABSENT: u8 = 0;

/// Nibble code -> ASCII base
pub const DECODE_TABLE: [u8; 16] = [
    ABSENT, b'A', b'C', b'G', b'T', b'a', b'c', b'g', b't', b'N', b'n', ABSENT, ABSENT, ABSENT,
    ABSENT, ABSENT,
];

const fn build_complement_table() -> [u8; 256] {
    let mut table = [ABSENT; 256];
    table[b'A' as usize] = b'T';
    table[b'C' as usize] = b'G';
    table[b'G' as usize] = b'C';
    table[b'T' as usize] = b'A';
    table[b'a' as usize] = b't';
    table[b'c' as usize] = b'g';
    table[b'g' as usize] = b'c';
    table[b't' as usize] = b'a';
    table[b'N' as usize] = b'N';
    table[b'n' as usize] = b'n';
    table
}

const fn build_case_table(upper: bool) -> [u8; 256] {
    let mut table = [ABSENT; 256];
    let bases = b"ACGTNacgtn";
    let mut i = 0;
    while i < bases.len() {
        let b = bases[i];
        table[b as usize] = if upper {
            b.to_ascii_uppercase()
        } else {
            b.to_ascii_lowercase()
        };
        i += 1;
    }
    table
}

/// ASCII base -> Watson-Crick complement, case preserved
pub static COMPLEMENT_TABLE: [u8; 256] = build_complement_table();

static UPPER_TABLE: [u8; 256] = build_case_table(true);
static LOWER_TABLE: [u8; 256] = build_case_table(false);

/// Case normalization requested for a fetched sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum CaseMode {
    /// Leave soft-masked (lowercase) bases as stored
    #[default]
    AsIs,
    Upper,
    Lower,
}

impl CaseMode {
    /// Parse from the textual form used by callers
    ///
    /// Empty means as-is, exactly `upper` means upper, and any other value
    /// means lower.
    ///
    /// # Examples
    /// ```
    /// use fast_dna::core::dna::CaseMode;
    /// assert_eq!(CaseMode::parse(""), CaseMode::AsIs);
    /// assert_eq!(CaseMode::parse("upper"), CaseMode::Upper);
    /// assert_eq!(CaseMode::parse("lower"), CaseMode::Lower);
    /// assert_eq!(CaseMode::parse("mixed"), CaseMode::Lower);
    /// assert_eq!(CaseMode::parse("UPPER"), CaseMode::Lower);
    /// ```
    pub fn parse(s: &str) -> Self {
        if s.is_empty() {
            CaseMode::AsIs
        } else if s == "upper" {
            CaseMode::Upper
        } else {
            if s != "lower" {
                log::debug!("unrecognized case mode '{}', using lower", s);
            }
            CaseMode::Lower
        }
    }
}

/// Repeat-mask strategy applied to soft-masked bases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum RepeatMask {
    #[default]
    None,
    /// Replace every lowercase base with `N`
    N,
    /// A mode that was requested but is not known; masks nothing
    Other,
}

impl RepeatMask {
    /// Parse from the textual form used by callers
    ///
    /// # Examples
    /// ```
    /// use fast_dna::core::dna::RepeatMask;
    /// assert_eq!(RepeatMask::parse(""), RepeatMask::None);
    /// assert_eq!(RepeatMask::parse("N"), RepeatMask::N);
    /// assert_eq!(RepeatMask::parse("hardmask"), RepeatMask::Other);
    /// assert_eq!(RepeatMask::parse("n"), RepeatMask::Other);
    /// ```
    pub fn parse(s: &str) -> Self {
        if s.is_empty() {
            RepeatMask::None
        } else if s == "N" {
            RepeatMask::N
        } else {
            log::debug!("unrecognized repeat mask '{}', ignoring", s);
            RepeatMask::Other
        }
    }

    /// True when any mask mode was requested, recognized or not
    pub fn is_requested(&self) -> bool {
        !matches!(self, RepeatMask::None)
    }
}

/// Decode a 4-bit code to its ASCII base
#[inline]
pub fn decode_nibble(code: u8) -> u8 {
    DECODE_TABLE[(code & 0x0f) as usize]
}

/// Encode an ASCII base to its 4-bit code, 0 for anything unknown
#[inline]
pub fn encode_base(base: u8) -> u8 {
    match base {
        b'A' => 1,
        b'C' => 2,
        b'G' => 3,
        b'T' => 4,
        b'a' => 5,
        b'c' => 6,
        b'g' => 7,
        b't' => 8,
        b'N' => 9,
        b'n' => 10,
        _ => 0,
    }
}

/// Pack bases two per byte, high nibble first
///
/// An odd trailing base leaves the low nibble of the last byte as 0.
/// The result has no header byte.
pub fn pack_bases(bases: &[u8]) -> Vec<u8> {
    bases
        .chunks(2)
        .map(|pair| {
            let hi = encode_base(pair[0]);
            let lo = pair.get(1).map_or(0, |&b| encode_base(b));
            (hi << 4) | lo
        })
        .collect()
}

/// Decode `len` bases from a packed window
///
/// `start` is the 0-based position of the first wanted base; its parity
/// selects the nibble of `packed[0]` to begin with. Even positions live in
/// the high nibble and odd positions in the low nibble, and the window
/// advances a byte after every low nibble. `packed` must hold at least
/// `(start + len - 1) / 2 - start / 2 + 1` bytes; decoding stops early if
/// it does not.
pub fn unpack_bases(packed: &[u8], start: u64, len: usize) -> Vec<u8> {
    let mut bases = Vec::with_capacity(len);
    let mut byte_index = 0;
    let mut pos = start;

    for _ in 0..len {
        let Some(&byte) = packed.get(byte_index) else {
            break;
        };

        let code = if pos % 2 == 0 {
            byte >> 4
        } else {
            byte_index += 1;
            byte & 0x0f
        };

        bases.push(decode_nibble(code));
        pos += 1;
    }

    bases
}

/// Complement a single base
#[inline]
pub fn complement_base(base: u8) -> u8 {
    COMPLEMENT_TABLE[base as usize]
}

/// Reverse a sequence in place
pub fn reverse_in_place(seq: &mut [u8]) {
    seq.reverse();
}

/// Complement a sequence in place
pub fn complement_in_place(seq: &mut [u8]) {
    for base in seq.iter_mut() {
        *base = complement_base(*base);
    }
}

/// Reverse, then complement, in place
pub fn reverse_complement_in_place(seq: &mut [u8]) {
    reverse_in_place(seq);
    complement_in_place(seq);
}

/// Compute the reverse complement of a DNA sequence
///
/// # Examples
/// ```
/// use fast_dna::core::dna::revcomp;
///
/// assert_eq!(revcomp("AACGT"), "ACGTT");
/// assert_eq!(revcomp("AcgN"), "NcgT");
/// assert_eq!(revcomp(""), "");
/// ```
pub fn revcomp(seq: &str) -> String {
    let mut bytes = seq.as_bytes().to_vec();
    reverse_complement_in_place(&mut bytes);
    bytes.into_iter().map(char::from).collect()
}

/// Apply a repeat mask in place
pub fn apply_repeat_mask(seq: &mut [u8], mask: RepeatMask) {
    if mask != RepeatMask::N {
        return;
    }

    for base in seq.iter_mut() {
        if matches!(*base, b'a' | b'c' | b'g' | b't') {
            *base = b'N';
        }
    }
}

/// Apply a case transform in place
///
/// Does nothing when a repeat mask was requested; masking and case
/// normalization are mutually exclusive passes.
pub fn apply_case(seq: &mut [u8], case: CaseMode, mask: RepeatMask) {
    if mask.is_requested() {
        return;
    }

    let table = match case {
        CaseMode::AsIs => return,
        CaseMode::Upper => &UPPER_TABLE,
        CaseMode::Lower => &LOWER_TABLE,
    };

    for base in seq.iter_mut() {
        *base = table[*base as usize];
    }
}
