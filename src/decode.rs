use std::fmt::{self, Display, Formatter};

use crate::deduce::DigitMapping;
use crate::error::UnknownPatternError;
use crate::segment::{is_unique_count_digit, is_unique_segment_count, SegmentMask};

/// The four decoded digits of a display's readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    digits: [u8; 4],
}

impl Reading {
    pub fn digits(&self) -> [u8; 4] {
        self.digits
    }

    /// The readout as a number, 0 to 9999.
    pub fn value(&self) -> u32 {
        self.digits
            .iter()
            .fold(0, |number, digit| number * 10 + u32::from(*digit))
    }

    /// How many of the digits are a 1, 4, 7 or 8.
    pub fn unique_count(&self) -> usize {
        self.digits
            .iter()
            .filter(|d| is_unique_count_digit(**d))
            .count()
    }
}

impl Display for Reading {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for digit in self.digits.iter() {
            write!(f, "{}", digit)?;
        }
        Ok(())
    }
}

/// Look up each readout pattern in `mapping`.  A readout pattern must
/// be identical to one of the training patterns.
pub fn decode(
    mapping: &DigitMapping,
    readout: &[SegmentMask; 4],
) -> Result<Reading, UnknownPatternError> {
    let mut digits = [0; 4];
    for (position, (slot, mask)) in digits.iter_mut().zip(readout.iter()).enumerate() {
        match mapping.digit(*mask) {
            Some(digit) => {
                *slot = digit;
            }
            None => {
                return Err(UnknownPatternError {
                    position,
                    mask: *mask,
                });
            }
        }
    }
    Ok(Reading { digits })
}

/// Number of readout patterns whose length alone says they are a 1,
/// 4, 7 or 8.  Needs no deduction at all.
pub fn count_unique_by_length(readout: &[SegmentMask]) -> usize {
    readout
        .iter()
        .filter(|mask| is_unique_segment_count(mask.count()))
        .count()
}

#[cfg(test)]
use crate::aggregate::decode_line;

#[test]
fn test_decode_example() {
    let reading = decode_line(
        "acedgfb cdfbe gcdfa fbcad dab cefabd cdfgeb eafb cagedb ab | cdfeb fcadb cdfeb cdbaf",
    )
    .unwrap();
    assert_eq!(reading.digits(), [5, 3, 5, 3]);
    assert_eq!(reading.value(), 5353);
    assert_eq!(reading.unique_count(), 0);
    assert_eq!(reading.to_string(), "5353");
}

#[test]
fn test_decode_unique_digits() {
    let reading = decode_line(
        "be cfbegad cbdgef fgaecd cgeb fdcge agebfd fecdb fabcd edb | fdgacbe cefdb cefbgd gcbe",
    )
    .unwrap();
    assert_eq!(reading.value(), 8394);
    assert_eq!(reading.unique_count(), 2);
}

#[test]
fn test_leading_zero() {
    let reading = decode_line(
        "acedgfb cdfbe gcdfa fbcad dab cefabd cdfgeb eafb cagedb ab | cagedb ab cagedb eafb",
    )
    .unwrap();
    assert_eq!(reading.value(), 104);
    assert_eq!(reading.to_string(), "0104");
    assert_eq!(reading.unique_count(), 2);
}

#[test]
fn test_unknown_readout_pattern() {
    // "abc" has the segment count of a 7 but is not the 7 pattern ("abd").
    match decode_line(
        "acedgfb cdfbe gcdfa fbcad dab cefabd cdfgeb eafb cagedb ab | cdfeb abc cdfeb cdbaf",
    ) {
        Err(crate::error::Error::UnknownPattern(e)) => {
            assert_eq!(e.position, 1);
            assert_eq!(e.mask, SegmentMask::from_letters("abc").unwrap());
        }
        other => panic!("expected an unknown pattern error, got {:?}", other),
    }
}

#[test]
fn test_unique_count_matches_length_oracle() {
    use crate::segment::DIGIT_GLYPHS;

    let training = crate::deduce::TrainingSet::new(DIGIT_GLYPHS).unwrap();
    let mapping = crate::deduce::deduce(&training).unwrap();
    for n in 0..10_000u32 {
        let digits = [n / 1000, n / 100 % 10, n / 10 % 10, n % 10];
        let readout = digits.map(|d| DIGIT_GLYPHS[d as usize]);
        let reading = decode(&mapping, &readout).unwrap();
        assert_eq!(reading.value(), n);
        assert_eq!(reading.unique_count(), count_unique_by_length(&readout));
    }
}
