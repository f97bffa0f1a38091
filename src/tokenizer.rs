use nom::{
    bytes::complete::take_till1,
    character::complete::{char, multispace0, multispace1},
    combinator::all_consuming,
    multi::separated_list0,
    sequence::{delimited, separated_pair},
    IResult,
};

use crate::deduce::TrainingSet;
use crate::error::TokenizeError;
use crate::segment::SegmentMask;

const TRAINING_PATTERNS: usize = 10;
const READOUT_PATTERNS: usize = 4;

/// One line of input: the ten training patterns and the four-digit
/// readout, most significant digit first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRecord {
    pub training: TrainingSet,
    pub readout: [SegmentMask; READOUT_PATTERNS],
}

fn token(input: &str) -> IResult<&str, &str> {
    take_till1(|ch: char| ch.is_whitespace() || ch == '|')(input)
}

fn token_list(input: &str) -> IResult<&str, Vec<&str>> {
    delimited(
        multispace0,
        separated_list0(multispace1, token),
        multispace0,
    )(input)
}

fn parse_record(input: &str) -> IResult<&str, (Vec<&str>, Vec<&str>)> {
    all_consuming(separated_pair(token_list, char('|'), token_list))(input)
}

fn pattern(text: &str) -> Result<SegmentMask, TokenizeError> {
    let mask = SegmentMask::from_letters(text).map_err(TokenizeError::InvalidCharacter)?;
    let letters = text.chars().count();
    if !(2..=7).contains(&letters) {
        return Err(TokenizeError::PatternLength(text.to_string()));
    }
    if mask.count() != letters {
        return Err(TokenizeError::RepeatedSegment(text.to_string()));
    }
    Ok(mask)
}

fn patterns<const N: usize>(
    section: &'static str,
    tokens: &[&str],
) -> Result<[SegmentMask; N], TokenizeError> {
    if tokens.len() != N {
        return Err(TokenizeError::WrongPatternCount {
            section,
            expected: N,
            found: tokens.len(),
        });
    }
    let mut result = [SegmentMask::EMPTY; N];
    for (slot, text) in result.iter_mut().zip(tokens.iter()) {
        *slot = pattern(text)?;
    }
    Ok(result)
}

/// Split a record such as `ab cdf ... | fdc ab cb dfe` into its
/// patterns.
pub fn tokenize(line: &str) -> Result<DisplayRecord, TokenizeError> {
    match line.matches('|').count() {
        0 => return Err(TokenizeError::MissingDelimiter),
        1 => (),
        _ => return Err(TokenizeError::TooManyDelimiters),
    }
    let (training, readout) = match parse_record(line) {
        Ok((_, fields)) => fields,
        Err(e) => {
            return Err(TokenizeError::Syntax(e.to_string()));
        }
    };
    let training = patterns::<TRAINING_PATTERNS>("training", &training)?;
    let readout = patterns::<READOUT_PATTERNS>("readout", &readout)?;
    let training = TrainingSet::new(training).map_err(TokenizeError::DuplicatePattern)?;
    Ok(DisplayRecord { training, readout })
}

impl TryFrom<&str> for DisplayRecord {
    type Error = TokenizeError;
    fn try_from(s: &str) -> Result<DisplayRecord, TokenizeError> {
        tokenize(s)
    }
}

#[cfg(test)]
const TRAINING: &str = "acedgfb cdfbe gcdfa fbcad dab cefabd cdfgeb eafb cagedb ab";

#[test]
fn test_tokenize() {
    let record = tokenize(&format!("{} | cdfeb fcadb cdfeb cdbaf", TRAINING))
        .expect("example should tokenize");
    let mask = |s| SegmentMask::from_letters(s).unwrap();
    assert_eq!(record.training.patterns()[0], mask("abcdefg"));
    assert_eq!(record.training.patterns()[9], mask("ab"));
    assert_eq!(
        record.readout,
        [mask("bcdef"), mask("abcdf"), mask("bcdef"), mask("abcdf")]
    );
}

#[test]
fn test_tokenize_is_case_insensitive() {
    let lower = tokenize(&format!("{} | cdfeb fcadb cdfeb cdbaf", TRAINING));
    let upper = tokenize(&format!(
        "{} | cdfeb FCADB cdfeb cdbaf",
        TRAINING.to_uppercase()
    ));
    assert_eq!(lower, upper);
}

#[test]
fn test_tokenize_tolerates_extra_whitespace() {
    let record = tokenize(&format!("  {}|cdfeb  fcadb cdfeb cdbaf\r", TRAINING));
    assert!(record.is_ok(), "{:?}", record);
}

#[test]
fn test_tokenize_errors() {
    let with_readout = |readout: &str| format!("{} | {}", TRAINING, readout);
    assert_eq!(
        tokenize(&format!("{} cdfeb fcadb cdfeb cdbaf", TRAINING)),
        Err(TokenizeError::MissingDelimiter)
    );
    assert_eq!(
        tokenize("acedgfb cdfbe gcdfa fbcad dab | cefabd cdfgeb eafb cagedb ab | cdfeb"),
        Err(TokenizeError::TooManyDelimiters)
    );
    assert_eq!(
        tokenize("dab eafb ab | cdfeb fcadb cdfeb cdbaf"),
        Err(TokenizeError::WrongPatternCount {
            section: "training",
            expected: 10,
            found: 3
        })
    );
    assert_eq!(
        tokenize(&format!("{} |", TRAINING)),
        Err(TokenizeError::WrongPatternCount {
            section: "readout",
            expected: 4,
            found: 0
        })
    );
    assert_eq!(
        tokenize(&with_readout("cdfeb fcadb cdfeb cdbax")),
        Err(TokenizeError::InvalidCharacter('x'))
    );
    assert_eq!(
        tokenize(&format!("{} | cdfeb", TRAINING.replace(" ab", " a"))),
        Err(TokenizeError::PatternLength("a".to_string()))
    );
    assert_eq!(
        tokenize(&with_readout("cdfeb fcadb cdfeb cdbaa")),
        Err(TokenizeError::RepeatedSegment("cdbaa".to_string()))
    );
    assert_eq!(
        tokenize(&format!(
            "{} | cdfeb fcadb cdfeb cdbaf",
            TRAINING.replace(" ab", " cbdaf")
        )),
        Err(TokenizeError::DuplicatePattern(
            SegmentMask::from_letters("abcdf").unwrap()
        ))
    );
}

#[test]
fn test_display_record_try_from() {
    let line = format!("{} | cdfeb fcadb cdfeb cdbaf", TRAINING);
    assert_eq!(DisplayRecord::try_from(line.as_str()), tokenize(&line));
    assert_eq!(
        DisplayRecord::try_from("ab cd | ef"),
        Err(TokenizeError::WrongPatternCount {
            section: "training",
            expected: 10,
            found: 2
        })
    );
}
