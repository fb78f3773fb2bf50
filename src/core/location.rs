//! Genomic coordinate model
//!
//! Locations are 1-based and inclusive on both ends. Chromosome names are
//! canonicalized to a lowercase `chr` prefix followed by the uppercased label,
//! so `1`, `chr1` and `CHR1` all become `chr1`, and `x` becomes `chrX`.
//!
//! Two construction paths exist on purpose:
//! - [`parse_location`] is the text boundary and rejects `end < start`
//! - [`Location::new`] is the internal path and reorders/clamps instead

use crate::core::error::{LocationError, LocationResult};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Canonical chromosome prefix
pub const CHR_PREFIX: &str = "chr";

/// Sort key of chrX
pub const CHR_X_KEY: u64 = 1023;
/// Sort key of chrY
pub const CHR_Y_KEY: u64 = 1024;
/// Sort key of chrM / chrMT
pub const CHR_M_KEY: u64 = 1025;
/// Sort key of any label that is neither numeric nor X/Y/M
pub const UNKNOWN_CHR_KEY: u64 = 9999;

/// Strand orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Strand {
    Positive,
    Negative,
    #[default]
    Unspecified,
}

impl Strand {
    /// Parse strand from text; anything but exactly `+` or `-` is unspecified
    ///
    /// # Examples
    /// ```
    /// use fast_dna::core::Strand;
    /// assert_eq!(Strand::parse("+"), Strand::Positive);
    /// assert_eq!(Strand::parse("-"), Strand::Negative);
    /// assert_eq!(Strand::parse("."), Strand::Unspecified);
    /// assert_eq!(Strand::parse("++"), Strand::Unspecified);
    /// ```
    pub fn parse(s: &str) -> Self {
        match s {
            "+" => Strand::Positive,
            "-" => Strand::Negative,
            _ => Strand::Unspecified,
        }
    }

    /// Parse strand from char
    pub fn from_char(c: char) -> Self {
        match c {
            '+' => Strand::Positive,
            '-' => Strand::Negative,
            _ => Strand::Unspecified,
        }
    }

    /// Convert to char
    pub fn to_char(&self) -> char {
        match self {
            Strand::Positive => '+',
            Strand::Negative => '-',
            Strand::Unspecified => '.',
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Upstream/downstream extent of a promoter around a TSS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromoterRegion {
    upstream: u64,
    downstream: u64,
}

/// Default promoter window: 2kb upstream, 1kb downstream
pub const DEFAULT_PROMOTER_REGION: PromoterRegion = PromoterRegion {
    upstream: 2000,
    downstream: 1000,
};

impl PromoterRegion {
    /// Negative offsets are taken as magnitudes
    pub fn new(upstream: i64, downstream: i64) -> Self {
        Self {
            upstream: upstream.unsigned_abs(),
            downstream: downstream.unsigned_abs(),
        }
    }

    pub fn upstream(&self) -> u64 {
        self.upstream
    }

    pub fn downstream(&self) -> u64 {
        self.downstream
    }
}

impl Default for PromoterRegion {
    fn default() -> Self {
        DEFAULT_PROMOTER_REGION
    }
}

/// 5'/3' offsets around a transcription start site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TssRegion {
    offset_5p: u64,
    offset_3p: u64,
}

impl TssRegion {
    pub fn new(offset_5p: i64, offset_3p: i64) -> Self {
        Self {
            offset_5p: offset_5p.unsigned_abs(),
            offset_3p: offset_3p.unsigned_abs(),
        }
    }

    pub fn offset_5p(&self) -> u64 {
        self.offset_5p
    }

    pub fn offset_3p(&self) -> u64 {
        self.offset_3p
    }
}

impl From<TssRegion> for PromoterRegion {
    fn from(tss: TssRegion) -> Self {
        PromoterRegion {
            upstream: tss.offset_5p,
            downstream: tss.offset_3p,
        }
    }
}

/// A 1-based, inclusive range on a named chromosome
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    chromosome: String,
    start: u64,
    end: u64,
    strand: Strand,
}

impl Location {
    /// Create an unstranded location
    ///
    /// Coordinates are taken as magnitudes, reordered so that the smaller
    /// becomes `start`, and clamped to be at least 1.
    ///
    /// # Examples
    /// ```
    /// use fast_dna::core::Location;
    ///
    /// let loc = Location::new("1", 100, 50).unwrap();
    /// assert_eq!(loc.chromosome(), "chr1");
    /// assert_eq!((loc.start(), loc.end()), (50, 100));
    /// ```
    pub fn new(chromosome: &str, start: i64, end: i64) -> LocationResult<Self> {
        Self::with_strand(chromosome, start, end, Strand::Unspecified)
    }

    /// Create a stranded location, see [`Location::new`]
    pub fn with_strand(
        chromosome: &str,
        start: i64,
        end: i64,
        strand: Strand,
    ) -> LocationResult<Self> {
        Self::from_bounds(chromosome, start.unsigned_abs(), end.unsigned_abs(), strand)
    }

    fn from_bounds(chromosome: &str, a: u64, b: u64, strand: Strand) -> LocationResult<Self> {
        let chromosome = normalize_chromosome(chromosome);
        if chromosome.len() == CHR_PREFIX.len() {
            return Err(LocationError::EmptyChromosome(chromosome));
        }

        let start = a.min(b).max(1);
        let end = a.max(b).max(start);

        Ok(Self {
            chromosome,
            start,
            end,
            strand,
        })
    }

    /// Canonical chromosome name, e.g. `chr1`
    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    /// Chromosome label without the `chr` prefix, e.g. `1`
    pub fn base_chromosome(&self) -> &str {
        &self.chromosome[CHR_PREFIX.len()..]
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Number of bases covered, always at least 1
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Midpoint, rounded down
    pub fn midpoint(&self) -> u64 {
        self.start + (self.end - self.start) / 2
    }

    /// Promoter window around this location's TSS
    ///
    /// The TSS is `start` on the positive or unspecified strand and `end` on
    /// the negative strand. Upstream follows the strand direction.
    ///
    /// # Examples
    /// ```
    /// use fast_dna::core::{Location, PromoterRegion, Strand};
    ///
    /// let gene = Location::with_strand("chr1", 10000, 20000, Strand::Negative).unwrap();
    /// let promoter = gene.promoter(&PromoterRegion::default());
    /// assert_eq!((promoter.start(), promoter.end()), (19000, 22000));
    /// ```
    pub fn promoter(&self, region: &PromoterRegion) -> Location {
        let (start, end) = match self.strand {
            Strand::Negative => (
                self.end.saturating_sub(region.downstream),
                self.end.saturating_add(region.upstream),
            ),
            Strand::Positive | Strand::Unspecified => (
                self.start.saturating_sub(region.upstream),
                self.start.saturating_add(region.downstream),
            ),
        };

        Location {
            chromosome: self.chromosome.clone(),
            start: start.max(1),
            end: end.max(1),
            strand: self.strand,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chromosome, self.start, self.end)
    }
}

impl FromStr for Location {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_location(s)
    }
}

/// Remove a `chr` prefix if present (case-insensitive)
fn strip_chr_prefix(chrom: &str) -> &str {
    match chrom.get(..CHR_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(CHR_PREFIX) => &chrom[CHR_PREFIX.len()..],
        _ => chrom,
    }
}

/// Canonicalize a chromosome name
///
/// # Examples
/// ```
/// use fast_dna::core::normalize_chromosome;
///
/// assert_eq!(normalize_chromosome("1"), "chr1");
/// assert_eq!(normalize_chromosome("CHR1"), "chr1");
/// assert_eq!(normalize_chromosome("chrx"), "chrX");
/// assert_eq!(normalize_chromosome("Un_gl000220"), "chrUN_GL000220");
/// ```
pub fn normalize_chromosome(chrom: &str) -> String {
    let label = strip_chr_prefix(chrom.trim());
    format!("{}{}", CHR_PREFIX, label.to_ascii_uppercase())
}

/// Map a chromosome name to a number suitable for sorting
///
/// Numbered chromosomes map to their number. X, Y and M sort after any
/// plausible numbered chromosome, and anything else sorts last.
///
/// # Examples
/// ```
/// use fast_dna::core::chromosome_sort_key;
///
/// assert_eq!(chromosome_sort_key("chr7"), 7);
/// assert!(chromosome_sort_key("chrX") < chromosome_sort_key("chrY"));
/// assert!(chromosome_sort_key("chrY") < chromosome_sort_key("chrM"));
/// assert!(chromosome_sort_key("chrM") < chromosome_sort_key("chrUn"));
/// ```
pub fn chromosome_sort_key(chrom: &str) -> u64 {
    let label = strip_chr_prefix(chrom.trim());

    if label.eq_ignore_ascii_case("x") {
        CHR_X_KEY
    } else if label.eq_ignore_ascii_case("y") {
        CHR_Y_KEY
    } else if label.eq_ignore_ascii_case("m") || label.eq_ignore_ascii_case("mt") {
        CHR_M_KEY
    } else if !label.is_empty() && label.bytes().all(|b| b.is_ascii_digit()) {
        label.parse().unwrap_or(UNKNOWN_CHR_KEY)
    } else {
        UNKNOWN_CHR_KEY
    }
}

/// Order two locations by chromosome, then start, then end
pub fn compare_locations(a: &Location, b: &Location) -> Ordering {
    chromosome_sort_key(&a.chromosome)
        .cmp(&chromosome_sort_key(&b.chromosome))
        .then(a.start.cmp(&b.start))
        .then(a.end.cmp(&b.end))
}

/// Strict less-than form of [`compare_locations`]
pub fn location_less(a: &Location, b: &Location) -> bool {
    compare_locations(a, b) == Ordering::Less
}

/// Sort locations in place by chromosome, start, end
pub fn sort_locations(locations: &mut [Location]) {
    locations.sort_by(compare_locations);
}

/// Parse one coordinate, allowing comma digit grouping (`1,000,000`)
fn parse_coordinate(value: &str) -> LocationResult<u64> {
    let digits: String = value.chars().filter(|&c| c != ',').collect();

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LocationError::InvalidCoordinate {
            value: value.to_string(),
            message: "not a positive integer".to_string(),
        });
    }

    let n: u64 = digits.parse().map_err(|e: std::num::ParseIntError| {
        LocationError::InvalidCoordinate {
            value: value.to_string(),
            message: e.to_string(),
        }
    })?;

    if n < 1 {
        return Err(LocationError::CoordinateBelowOne(n));
    }

    Ok(n)
}

/// Parse `chr<label>:<start>-<end>`
///
/// The `chr` prefix is optional and matched case-insensitively. The label
/// may contain letters, digits and underscores.
///
/// # Examples
/// ```
/// use fast_dna::core::parse_location;
///
/// let loc = parse_location("chr1:1,000-2,000").unwrap();
/// assert_eq!(loc.to_string(), "chr1:1000-2000");
///
/// assert!(parse_location("chr1:100-50").is_err());
/// assert!(parse_location("chr1:0-50").is_err());
/// assert!(parse_location("chr1-100-200").is_err());
/// ```
pub fn parse_location(text: &str) -> LocationResult<Location> {
    let trimmed = text.trim();
    let invalid = || LocationError::InvalidFormat(text.to_string());

    let (chrom, range) = trimmed.split_once(':').ok_or_else(invalid)?;
    let (start, end) = range.split_once('-').ok_or_else(invalid)?;

    let label = strip_chr_prefix(chrom);
    if label.is_empty()
        || !label
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
    {
        return Err(invalid());
    }

    let start = parse_coordinate(start)?;
    let end = parse_coordinate(end)?;

    if end < start {
        return Err(LocationError::EndBeforeStart { start, end });
    }

    Location::from_bounds(label, start, end, Strand::Unspecified)
}

/// Parse a list of locations, failing on the first invalid entry
pub fn parse_locations<S: AsRef<str>>(texts: &[S]) -> LocationResult<Vec<Location>> {
    texts.iter().map(|t| parse_location(t.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_reorders_and_clamps() {
        let loc = Location::new("chr1", 100, 50).unwrap();
        assert_eq!((loc.start(), loc.end()), (50, 100));

        let loc = Location::new("chr1", -100, -50).unwrap();
        assert_eq!((loc.start(), loc.end()), (50, 100));

        let loc = Location::new("chr1", 0, 0).unwrap();
        assert_eq!((loc.start(), loc.end()), (1, 1));
    }

    #[test]
    fn test_new_rejects_empty_chromosome() {
        assert!(matches!(
            Location::new("chr", 1, 2),
            Err(LocationError::EmptyChromosome(_))
        ));
        assert!(Location::new("  ", 1, 2).is_err());
    }

    #[test]
    fn test_derived_values() {
        let loc = Location::new("chr2", 10, 13).unwrap();
        assert_eq!(loc.length(), 4);
        assert_eq!(loc.midpoint(), 11);
        assert_eq!(loc.base_chromosome(), "2");
        assert_eq!(loc.strand(), Strand::Unspecified);
    }

    #[test]
    fn test_derived_values_at_extremes() {
        let loc = parse_location("chr1:18446744073709551615-18446744073709551615").unwrap();
        assert_eq!(loc.midpoint(), u64::MAX);
        assert_eq!(loc.length(), 1);

        let loc = parse_location("chr1:1-18446744073709551615").unwrap();
        assert_eq!(loc.midpoint(), 1u64 << 63);
        assert_eq!(loc.length(), u64::MAX);

        let loc = Location::with_strand("chr1", i64::MIN, i64::MIN, Strand::Positive).unwrap();
        assert_eq!(loc.start(), 1u64 << 63);
        assert_eq!(loc.midpoint(), 1u64 << 63);
    }

    #[test]
    fn test_parse_location_basic() {
        let loc = parse_location("chr1:100000-100100").unwrap();
        assert_eq!(loc.chromosome(), "chr1");
        assert_eq!(loc.start(), 100000);
        assert_eq!(loc.end(), 100100);
    }

    #[test]
    fn test_parse_location_case_and_prefix() {
        assert_eq!(parse_location("CHRx:1-2").unwrap().chromosome(), "chrX");
        assert_eq!(parse_location("Chr10:1-2").unwrap().chromosome(), "chr10");
        assert_eq!(parse_location("7:1-2").unwrap().chromosome(), "chr7");
    }

    #[test]
    fn test_parse_location_errors() {
        assert!(matches!(
            parse_location("chr1:100-50"),
            Err(LocationError::EndBeforeStart { start: 100, end: 50 })
        ));
        assert!(matches!(
            parse_location("chr1:0-50"),
            Err(LocationError::CoordinateBelowOne(0))
        ));
        assert!(matches!(
            parse_location("chr1:abc-50"),
            Err(LocationError::InvalidCoordinate { .. })
        ));
        assert!(matches!(
            parse_location("chr1:-5-50"),
            Err(LocationError::InvalidCoordinate { .. })
        ));
        assert!(matches!(parse_location("chr1"), Err(LocationError::InvalidFormat(_))));
        assert!(matches!(parse_location(":1-2"), Err(LocationError::InvalidFormat(_))));
        assert!(matches!(parse_location("chr1.5:1-2"), Err(LocationError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_locations_atomic() {
        let ok = parse_locations(&["chr1:1-10", "chr2:5-6"]).unwrap();
        assert_eq!(ok.len(), 2);

        assert!(parse_locations(&["chr1:1-10", "bogus", "chr2:5-6"]).is_err());
    }

    #[test]
    fn test_sort_key_values() {
        assert_eq!(chromosome_sort_key("chr1"), 1);
        assert_eq!(chromosome_sort_key("chr22"), 22);
        assert_eq!(chromosome_sort_key("chrX"), CHR_X_KEY);
        assert_eq!(chromosome_sort_key("chrY"), CHR_Y_KEY);
        assert_eq!(chromosome_sort_key("chrM"), CHR_M_KEY);
        assert_eq!(chromosome_sort_key("chrMT"), CHR_M_KEY);
        assert_eq!(chromosome_sort_key("chrUn"), UNKNOWN_CHR_KEY);
        assert_eq!(chromosome_sort_key("chr"), UNKNOWN_CHR_KEY);
    }

    #[test]
    fn test_compare_and_less() {
        let a = parse_location("chr2:1-10").unwrap();
        let b = parse_location("chr2:1-20").unwrap();
        let c = parse_location("chr10:1-5").unwrap();

        assert_eq!(compare_locations(&a, &b), Ordering::Less);
        assert!(location_less(&b, &c));
        assert!(!location_less(&a, &a));
    }

    #[test]
    fn test_promoter_window() {
        let gene = Location::with_strand("chr1", 10000, 20000, Strand::Positive).unwrap();
        let p = gene.promoter(&PromoterRegion::default());
        assert_eq!((p.start(), p.end()), (8000, 11000));

        let near_start = Location::new("chr1", 500, 900).unwrap();
        let p = near_start.promoter(&PromoterRegion::new(2000, 100));
        assert_eq!((p.start(), p.end()), (1, 600));
    }

    #[test]
    fn test_tss_region_conversion() {
        let tss = TssRegion::new(-500, 250);
        let region: PromoterRegion = tss.into();
        assert_eq!(region.upstream(), 500);
        assert_eq!(region.downstream(), 250);
    }
}
