use std::fmt::{self, Display, Formatter};

/// The number of segments in a display.
pub const SEGMENT_COUNT: usize = 7;

/// Number of distinct values a 7-bit mask can take.
pub const MASK_VALUES: usize = 1 << SEGMENT_COUNT;

/// One of the seven segments, `a` to `g`, stored as bit position 0
/// to 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Segment(u8);

impl Segment {
    pub const A: Segment = Segment(0);

    pub fn from_letter(ch: char) -> Option<Segment> {
        match ch.to_ascii_lowercase() {
            ch @ 'a'..='g' => Some(Segment(ch as u8 - b'a')),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn letter(self) -> char {
        (b'a' + self.0) as char
    }

    pub fn all() -> impl Iterator<Item = Segment> {
        (0..SEGMENT_COUNT as u8).map(Segment)
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A set of lit segments.  Bit `n` is segment `n` (so `a` is bit 0).
/// Bits above bit 6 are never set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentMask(u8);

impl SegmentMask {
    pub const EMPTY: SegmentMask = SegmentMask(0);
    pub const ALL: SegmentMask = SegmentMask((MASK_VALUES - 1) as u8);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn contains(self, segment: Segment) -> bool {
        self.0 & (1 << segment.0) != 0
    }

    pub fn is_superset_of(self, other: SegmentMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn with(self, segment: Segment) -> SegmentMask {
        SegmentMask(self.0 | (1 << segment.0))
    }

    pub fn symmetric_difference(self, other: SegmentMask) -> SegmentMask {
        SegmentMask(self.0 ^ other.0)
    }

    pub fn segments(self) -> impl Iterator<Item = Segment> {
        Segment::all().filter(move |s| self.contains(*s))
    }

    /// Build a mask from pattern text such as "cagedb".  Letters are
    /// case-insensitive.  Anything outside a-g yields `Err` with the
    /// offending character.  Repeated letters are accepted here; the
    /// tokenizer rejects them since they change the segment count.
    pub fn from_letters(s: &str) -> Result<SegmentMask, char> {
        s.chars().try_fold(SegmentMask::EMPTY, |mask, ch| {
            Segment::from_letter(ch).map(|seg| mask.with(seg)).ok_or(ch)
        })
    }
}

impl Display for SegmentMask {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for segment in self.segments() {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// Canonical (unscrambled) shape of each digit.
///
/// ```text
///  aaaa
/// b    c
/// b    c
///  dddd
/// e    f
/// e    f
///  gggg
/// ```
///
/// | digit | segments  | count |
/// | ----- | --------- | ----- |
/// | 0     | `abcefg`  | 6     |
/// | 1     | `cf`      | 2     |
/// | 2     | `acdeg`   | 5     |
/// | 3     | `acdfg`   | 5     |
/// | 4     | `bcdf`    | 4     |
/// | 5     | `abdfg`   | 5     |
/// | 6     | `abdefg`  | 6     |
/// | 7     | `acf`     | 3     |
/// | 8     | `abcdefg` | 7     |
/// | 9     | `abcdfg`  | 6     |
pub const DIGIT_GLYPHS: [SegmentMask; 10] = [
    SegmentMask(0b111_0111), // 0 abcefg
    SegmentMask(0b010_0100), // 1 cf
    SegmentMask(0b101_1101), // 2 acdeg
    SegmentMask(0b110_1101), // 3 acdfg
    SegmentMask(0b010_1110), // 4 bcdf
    SegmentMask(0b110_1011), // 5 abdfg
    SegmentMask(0b111_1011), // 6 abdefg
    SegmentMask(0b010_0101), // 7 acf
    SegmentMask(0b111_1111), // 8 abcdefg
    SegmentMask(0b110_1111), // 9 abcdfg
];

/// Digits whose segment count no other digit shares.
pub const UNIQUE_COUNT_DIGITS: [u8; 4] = [1, 4, 7, 8];

pub fn is_unique_count_digit(digit: u8) -> bool {
    UNIQUE_COUNT_DIGITS.contains(&digit)
}

/// True for the segment counts of 1, 7, 4 and 8.
pub fn is_unique_segment_count(count: usize) -> bool {
    matches!(
        count,
        2|	 // it's a 1.
	3|	 // it's a 7.
	4|	 // it's a 4.
	7 // it's an 8.
    )
}

#[test]
fn test_glyphs_match_letters() {
    let letters = "abcefg cf acdeg acdfg bcdf abdfg abdefg acf abcdefg abcdfg";
    for (digit, pattern) in letters.split(' ').enumerate() {
        assert_eq!(
            SegmentMask::from_letters(pattern),
            Ok(DIGIT_GLYPHS[digit]),
            "digit {}",
            digit
        );
        assert_eq!(DIGIT_GLYPHS[digit].to_string(), pattern);
    }
}

#[test]
fn test_unique_counts_agree_with_glyphs() {
    for (digit, glyph) in DIGIT_GLYPHS.iter().enumerate() {
        assert_eq!(
            is_unique_count_digit(digit as u8),
            is_unique_segment_count(glyph.count()),
            "digit {}",
            digit
        );
    }
}

#[test]
fn test_from_letters() {
    assert_eq!(SegmentMask::from_letters("ba").map(SegmentMask::bits), Ok(0b11));
    assert_eq!(SegmentMask::from_letters("BA").map(SegmentMask::bits), Ok(0b11));
    assert_eq!(SegmentMask::from_letters("gfedcba"), Ok(SegmentMask::ALL));
    assert_eq!(SegmentMask::from_letters("abh"), Err('h'));
    assert_eq!(SegmentMask::from_letters(""), Ok(SegmentMask::EMPTY));
}

#[test]
fn test_mask_operations() {
    let seven = DIGIT_GLYPHS[7];
    let one = DIGIT_GLYPHS[1];
    assert!(seven.is_superset_of(one));
    assert!(!one.is_superset_of(seven));
    assert_eq!(
        seven.symmetric_difference(one),
        SegmentMask::from_letters("a").unwrap()
    );
    assert_eq!(SegmentMask::ALL.bits(), 0x7f);
}
