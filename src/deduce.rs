use tracing::{event, Level};

use crate::error::MalformedTrainingSetError;
use crate::segment::{Segment, SegmentMask, DIGIT_GLYPHS, MASK_VALUES, SEGMENT_COUNT};

/// Number of patterns with each segment count (index is the count)
/// across the ten digits.
const EXPECTED_HISTOGRAM: [usize; 8] = [0, 0, 1, 1, 1, 3, 3, 1];

/// The ten distinct scrambled patterns of one display.  Their order
/// carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingSet {
    patterns: [SegmentMask; 10],
}

impl TrainingSet {
    /// Fails with the first pattern that occurs more than once.
    pub fn new(patterns: [SegmentMask; 10]) -> Result<TrainingSet, SegmentMask> {
        for (i, pattern) in patterns.iter().enumerate() {
            if patterns[..i].contains(pattern) {
                return Err(*pattern);
            }
        }
        Ok(TrainingSet { patterns })
    }

    pub fn patterns(&self) -> &[SegmentMask; 10] {
        &self.patterns
    }

    /// `histogram()[n]` is the number of patterns with `n` lit
    /// segments.
    pub fn histogram(&self) -> [usize; 8] {
        let mut histogram = [0; 8];
        for pattern in self.patterns.iter() {
            histogram[pattern.count()] += 1;
        }
        histogram
    }

    fn with_count(&self, count: usize) -> impl Iterator<Item = SegmentMask> + '_ {
        self.patterns
            .iter()
            .copied()
            .filter(move |pattern| pattern.count() == count)
    }
}

/// Which digit each of one display's scrambled patterns shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitMapping {
    /// Indexed by mask bits.
    digit_of: [Option<u8>; MASK_VALUES],
    mask_of: [SegmentMask; 10],
}

impl DigitMapping {
    fn from_digit_masks(mask_of: [SegmentMask; 10]) -> DigitMapping {
        let mut digit_of = [None; MASK_VALUES];
        for (digit, mask) in mask_of.iter().enumerate() {
            digit_of[mask.bits() as usize] = Some(digit as u8);
        }
        DigitMapping { digit_of, mask_of }
    }

    pub fn digit(&self, mask: SegmentMask) -> Option<u8> {
        self.digit_of[mask.bits() as usize]
    }

    pub fn mask(&self, digit: u8) -> Option<SegmentMask> {
        self.mask_of.get(digit as usize).copied()
    }

    /// (digit, scrambled pattern) pairs in digit order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, SegmentMask)> + '_ {
        self.mask_of
            .iter()
            .enumerate()
            .map(|(digit, mask)| (digit as u8, *mask))
    }

    /// Recover which true segment each scrambled wire drives.
    ///
    /// Each segment is lit by a different subset of the ten digits
    /// (for example `e` is lit only in 0, 2, 6 and 8), so a wire is
    /// identified by the set of digits whose pattern contains it.  Once
    /// every wire has its own segment, each pattern necessarily
    /// unscrambles to its digit's glyph.
    pub fn wiring(&self) -> Result<Wiring, MalformedTrainingSetError> {
        fn digits_lighting(patterns: &[SegmentMask; 10], segment: Segment) -> u16 {
            patterns
                .iter()
                .enumerate()
                .filter(|(_, pattern)| pattern.contains(segment))
                .fold(0, |acc, (digit, _)| acc | (1 << digit))
        }

        let mut to_true = [Segment::A; SEGMENT_COUNT];
        let mut to_wire = [Segment::A; SEGMENT_COUNT];
        let mut used = SegmentMask::EMPTY;
        for wire in Segment::all() {
            let lit_in = digits_lighting(&self.mask_of, wire);
            let segment = Segment::all()
                .filter(|segment| !used.contains(*segment))
                .find(|segment| digits_lighting(&DIGIT_GLYPHS, *segment) == lit_in)
                .ok_or(MalformedTrainingSetError::UnmatchedWire {
                    wire: wire.letter(),
                })?;
            used = used.with(segment);
            to_true[wire.index()] = segment;
            to_wire[segment.index()] = wire;
        }
        Ok(Wiring { to_true, to_wire })
    }
}

/// A correspondence between scrambled wires and the true segments
/// they drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wiring {
    /// Indexed by wire.
    to_true: [Segment; SEGMENT_COUNT],
    /// Indexed by true segment.
    to_wire: [Segment; SEGMENT_COUNT],
}

impl Wiring {
    /// `to_true[w]` is the segment driven by wire `w`.  Returns `None`
    /// unless that is a permutation.
    pub fn from_wire_map(to_true: [Segment; SEGMENT_COUNT]) -> Option<Wiring> {
        let mut to_wire = [Segment::A; SEGMENT_COUNT];
        let mut seen = SegmentMask::EMPTY;
        for (wire, segment) in Segment::all().zip(to_true.iter()) {
            if seen.contains(*segment) {
                return None;
            }
            seen = seen.with(*segment);
            to_wire[segment.index()] = wire;
        }
        Some(Wiring { to_true, to_wire })
    }

    pub fn true_segment(&self, wire: Segment) -> Segment {
        self.to_true[wire.index()]
    }

    pub fn wire(&self, segment: Segment) -> Segment {
        self.to_wire[segment.index()]
    }

    /// Map a pattern of scrambled wires to the segments it really
    /// lights.
    pub fn unscramble(&self, scrambled: SegmentMask) -> SegmentMask {
        scrambled
            .segments()
            .fold(SegmentMask::EMPTY, |mask, wire| mask.with(self.true_segment(wire)))
    }

    /// Map true segments to the wires which drive them.
    pub fn scramble(&self, unscrambled: SegmentMask) -> SegmentMask {
        unscrambled
            .segments()
            .fold(SegmentMask::EMPTY, |mask, seg| mask.with(self.wire(seg)))
    }
}

fn exactly_one<I>(digit: u8, mut candidates: I) -> Result<SegmentMask, MalformedTrainingSetError>
where
    I: Iterator<Item = SegmentMask>,
{
    match (candidates.next(), candidates.count()) {
        (Some(mask), 0) => {
            event!(Level::TRACE, "identified {} as digit {}", mask, digit);
            Ok(mask)
        }
        (None, _) => Err(MalformedTrainingSetError::NotExactlyOne { digit, found: 0 }),
        (Some(_), others) => Err(MalformedTrainingSetError::NotExactlyOne {
            digit,
            found: others + 1,
        }),
    }
}

/// Work out which digit each training pattern represents.
///
/// # Digits 1, 4, 7 and 8
///
/// | Segment count | Digit | Segments  |
/// | ------------- | ----- | --------- |
/// | 2             | 1     | `  c  f`  |
/// | 3             | 7     | `a c  f`  |
/// | 4             | 4     | ` bcd f`  |
/// | 7             | 8     | `abcdefg` |
///
/// # Six-segment digits
///
/// | Digit | Segments  | Contains 7? | Contains 4? |
/// | ----- | --------- | ----------- | ----------- |
/// | 0     | `abc efg` | yes         | no          |
/// | 6     | `ab defg` | no          | no          |
/// | 9     | `abcd fg` | yes         | yes         |
///
/// Once 6 and 9 are known, 8 XOR 6 is segment c and 8 XOR 9 is
/// segment e.
///
/// # Five-segment digits
///
/// | Digit | Segments  | Contains 7? | Contains c? | Contains e? |
/// | ----- | --------- | ----------- | ----------- | ----------- |
/// | 2     | `a cde g` | no          | yes         | yes         |
/// | 3     | `a cd fg` | yes         | yes         | no          |
/// | 5     | `ab d fg` | no          | no          | no          |
///
/// Every step must find exactly one pattern; anything else means the
/// patterns are not the ten digits.  Finally every wire must match
/// exactly one segment (see [`DigitMapping::wiring`]), which rejects
/// the remaining sets that are not a relabelling of the ten glyphs.
pub fn deduce(training: &TrainingSet) -> Result<DigitMapping, MalformedTrainingSetError> {
    let histogram = training.histogram();
    if histogram != EXPECTED_HISTOGRAM {
        return Err(MalformedTrainingSetError::SegmentCounts {
            histogram,
            expected: EXPECTED_HISTOGRAM,
        });
    }

    let one = exactly_one(1, training.with_count(2))?;
    let seven = exactly_one(7, training.with_count(3))?;
    let four = exactly_one(4, training.with_count(4))?;
    let eight = exactly_one(8, training.with_count(7))?;

    let six = exactly_one(6, training.with_count(6).filter(|m| !m.is_superset_of(seven)))?;
    let nine = exactly_one(
        9,
        training
            .with_count(6)
            .filter(|m| m.is_superset_of(seven) && m.is_superset_of(four)),
    )?;
    let zero = exactly_one(
        0,
        training
            .with_count(6)
            .filter(|m| m.is_superset_of(seven) && !m.is_superset_of(four)),
    )?;

    // 8 has all seven segments and 6 and 9 have six, so these are
    // single segments.
    let segment_c = six.symmetric_difference(eight);
    let segment_e = eight.symmetric_difference(nine);
    event!(
        Level::TRACE,
        "segment c is wire {}, segment e is wire {}",
        segment_c,
        segment_e
    );
    if !one.is_superset_of(segment_c) {
        return Err(MalformedTrainingSetError::Inconsistent {
            digit: 1,
            mask: one,
        });
    }

    let three = exactly_one(3, training.with_count(5).filter(|m| m.is_superset_of(seven)))?;
    let five = exactly_one(
        5,
        training
            .with_count(5)
            .filter(|m| !m.is_superset_of(seven) && !m.is_superset_of(segment_c)),
    )?;
    let two = exactly_one(
        2,
        training
            .with_count(5)
            .filter(|m| !m.is_superset_of(seven) && m.is_superset_of(segment_c)),
    )?;
    for (digit, mask, lights_e) in [(2, two, true), (3, three, false), (5, five, false)] {
        if mask.is_superset_of(segment_e) != lights_e {
            return Err(MalformedTrainingSetError::Inconsistent { digit, mask });
        }
    }

    let mapping = DigitMapping::from_digit_masks([
        zero, one, two, three, four, five, six, seven, eight, nine,
    ]);
    let wiring = mapping.wiring()?;
    event!(Level::DEBUG, "deduced {:?} with {:?}", mapping.mask_of, wiring);
    Ok(mapping)
}

#[cfg(test)]
fn masks(patterns: &str) -> Vec<SegmentMask> {
    patterns
        .split(' ')
        .map(|p| SegmentMask::from_letters(p).expect("valid test pattern"))
        .collect()
}

#[cfg(test)]
fn training_set(patterns: &str) -> TrainingSet {
    let masks = masks(patterns);
    let array: [SegmentMask; 10] = masks.try_into().expect("ten test patterns");
    TrainingSet::new(array).expect("distinct test patterns")
}

#[test]
fn test_deduce_example() {
    let training =
        training_set("acedgfb cdfbe gcdfa fbcad dab cefabd cdfgeb eafb cagedb ab");
    let mapping = deduce(&training).expect("example should deduce");
    let expected: [(&str, u8); 10] = [
        ("cagedb", 0),
        ("ab", 1),
        ("gcdfa", 2),
        ("fbcad", 3),
        ("eafb", 4),
        ("cdfbe", 5),
        ("cdfgeb", 6),
        ("dab", 7),
        ("acedgfb", 8),
        ("cefabd", 9),
    ];
    for (pattern, digit) in expected {
        let mask = SegmentMask::from_letters(pattern).unwrap();
        assert_eq!(mapping.digit(mask), Some(digit), "pattern {}", pattern);
        assert_eq!(mapping.mask(digit), Some(mask));
    }
    assert_eq!(mapping.mask(10), None);
    assert_eq!(mapping.digit(SegmentMask::from_letters("abc").unwrap()), None);
}

#[test]
fn test_deduce_every_relabelling() {
    use itertools::Itertools;

    let segments: Vec<Segment> = Segment::all().collect();
    for perm in segments.iter().copied().permutations(SEGMENT_COUNT) {
        let to_true: [Segment; SEGMENT_COUNT] = perm.try_into().unwrap();
        let wiring = Wiring::from_wire_map(to_true).unwrap();
        let scrambled: Vec<SegmentMask> =
            DIGIT_GLYPHS.iter().map(|g| wiring.scramble(*g)).collect();
        let training = TrainingSet::new(scrambled.clone().try_into().unwrap()).unwrap();
        let mapping = deduce(&training).unwrap();
        for (digit, mask) in scrambled.iter().enumerate() {
            assert_eq!(mapping.digit(*mask), Some(digit as u8));
        }
        assert_eq!(mapping.wiring(), Ok(wiring));
        for (digit, mask) in mapping.iter() {
            assert_eq!(wiring.unscramble(mask), DIGIT_GLYPHS[digit as usize]);
        }
    }
}

#[test]
fn test_deduce_ignores_order() {
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    let mut rng = StdRng::seed_from_u64(8);
    let patterns = masks("be cfbegad cbdgef fgaecd cgeb fdcge agebfd fecdb fabcd edb");
    let first: TrainingSet = TrainingSet::new(patterns.clone().try_into().unwrap()).unwrap();
    let reference = deduce(&first).unwrap();
    assert_eq!(deduce(&first).unwrap(), reference);
    for _ in 0..100 {
        let mut shuffled = patterns.clone();
        shuffled.shuffle(&mut rng);
        let training = TrainingSet::new(shuffled.try_into().unwrap()).unwrap();
        assert_eq!(deduce(&training).unwrap(), reference);
    }
}

#[test]
fn test_duplicate_training_pattern() {
    let mut array: [SegmentMask; 10] =
        masks("acedgfb cdfbe gcdfa fbcad dab cefabd cdfgeb eafb cagedb ab")
            .try_into()
            .unwrap();
    array[3] = array[1];
    assert_eq!(TrainingSet::new(array), Err(array[1]));
}

#[test]
fn test_wrong_segment_counts() {
    // The 6-segment "cdfgeb" replaced by a fourth 5-segment pattern.
    let training = training_set("acedgfb cdfbe gcdfa fbcad dab cefabd cdgeb eafb cagedb ab");
    match deduce(&training) {
        Err(MalformedTrainingSetError::SegmentCounts { histogram, .. }) => {
            assert_eq!(histogram, [0, 0, 1, 1, 1, 4, 2, 1]);
        }
        other => panic!("expected a segment count error, got {:?}", other),
    }
}

#[test]
fn test_no_candidate_for_six() {
    // Canonical shapes, except 6 is replaced by abcdef, which contains
    // all of 7's segments.
    let training = training_set("abcefg cf acdeg acdfg bcdf abdfg abcdef acf abcdefg abcdfg");
    assert_eq!(
        deduce(&training),
        Err(MalformedTrainingSetError::NotExactlyOne { digit: 6, found: 0 })
    );
}

#[test]
fn test_two_candidates_for_three() {
    // Canonical shapes, except 5 is replaced by acefg, which contains
    // all of 7's segments.
    let training = training_set("abcefg cf acdeg acdfg bcdf acefg abdefg acf abcdefg abcdfg");
    assert_eq!(
        deduce(&training),
        Err(MalformedTrainingSetError::NotExactlyOne { digit: 3, found: 2 })
    );
}

#[test]
fn test_segment_c_and_e_contradictions() {
    // Each set has the right segment counts and one candidate per
    // digit, but segment c (8 XOR 6) or segment e (8 XOR 9) is not
    // where the remaining digits need it.
    let cases = [
        ("ae bce aefg abcdefg abcde abdfg acdfg abdefg abcdef abcefg", 1, "ae"),
        ("ad acd acdf abcdefg bcefg acefg acdeg bcdefg abcdeg acdefg", 2, "acefg"),
        ("ae aeg cdef abcdefg bdefg abcdf abceg acdefg abcdeg bcdefg", 3, "abceg"),
        ("bc bcd bcdf abcdefg abcdf acefg abefg abdefg abcdfg abcdeg", 5, "abefg"),
    ];
    for (patterns, digit, mask) in cases {
        assert_eq!(
            deduce(&training_set(patterns)),
            Err(MalformedTrainingSetError::Inconsistent {
                digit,
                mask: SegmentMask::from_letters(mask).unwrap(),
            }),
            "{}",
            patterns
        );
    }
}

#[test]
fn test_rejects_set_that_is_not_a_relabelling() {
    // Passes every candidate check, yet 4 (acfg) does not contain
    // 1 (dg).  Wire a is lit in 0, 2, 4, 5, 6, 8 and 9, which is no
    // segment's set of digits.
    let training = training_set("abdefg dg abefg cdefg acfg acdef abcdef dfg abcdefg acdefg");
    assert_eq!(
        deduce(&training),
        Err(MalformedTrainingSetError::UnmatchedWire { wire: 'a' })
    );
}

#[test]
fn test_canonical_wiring_is_identity() {
    let training = TrainingSet::new(DIGIT_GLYPHS).unwrap();
    let wiring = deduce(&training).unwrap().wiring().unwrap();
    for segment in Segment::all() {
        assert_eq!(wiring.true_segment(segment), segment);
    }
}

#[test]
fn test_wiring_from_example() {
    // In the worked example, wire d drives segment a, wire e drives b,
    // and so on.
    let training =
        training_set("acedgfb cdfbe gcdfa fbcad dab cefabd cdfgeb eafb cagedb ab");
    let wiring = deduce(&training).unwrap().wiring().unwrap();
    let letter = |ch| Segment::from_letter(ch).unwrap();
    for (wire, segment) in ['d', 'e', 'a', 'f', 'g', 'b', 'c'].iter().zip("abcdefg".chars()) {
        assert_eq!(wiring.true_segment(letter(*wire)), letter(segment));
        assert_eq!(wiring.wire(letter(segment)), letter(*wire));
    }
}

#[test]
fn test_from_wire_map_rejects_non_permutation() {
    assert_eq!(Wiring::from_wire_map([Segment::A; SEGMENT_COUNT]), None);
}
