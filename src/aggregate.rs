use tracing::{event, span, Level};

use crate::decode::{decode, Reading};
use crate::deduce::deduce;
use crate::error::Result;
use crate::tokenizer::DisplayRecord;

/// What to do when one record cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first bad record and return its error.
    #[default]
    Abort,
    /// Log the bad record and carry on with the next one.
    Skip,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    /// Readout digits which are a 1, 4, 7 or 8.
    pub unique_digits: usize,
    /// Sum of all the four-digit readouts.
    pub readout_sum: u64,
    /// Records decoded successfully.
    pub records: usize,
    /// Records ignored under `FailurePolicy::Skip`.
    pub skipped: usize,
}

impl Totals {
    pub fn add(&mut self, reading: &Reading) {
        self.unique_digits += reading.unique_count();
        self.readout_sum += u64::from(reading.value());
        self.records += 1;
    }
}

pub fn decode_record(record: &DisplayRecord) -> Result<Reading> {
    let mapping = deduce(&record.training)?;
    Ok(decode(&mapping, &record.readout)?)
}

pub fn decode_line(line: &str) -> Result<Reading> {
    let record = DisplayRecord::try_from(line)?;
    decode_record(&record)
}

/// Decode every record (one per line) in `input`.  Blank lines are
/// ignored.  Errors carry the 1-based line number.
pub fn aggregate(input: &str, policy: FailurePolicy) -> Result<Totals> {
    let mut totals = Totals::default();
    for (index, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_number = index + 1;
        let span = span!(Level::DEBUG, "record", line = line_number);
        let _enter = span.enter();
        match decode_line(line) {
            Ok(reading) => {
                event!(Level::DEBUG, "readout is {}", reading);
                totals.add(&reading);
            }
            Err(e) => match policy {
                FailurePolicy::Abort => {
                    return Err(e.at_line(line_number));
                }
                FailurePolicy::Skip => {
                    event!(Level::WARN, "skipping line {}: {}", line_number, e);
                    totals.skipped += 1;
                }
            },
        }
    }
    event!(
        Level::INFO,
        "decoded {} records, skipped {}",
        totals.records,
        totals.skipped
    );
    Ok(totals)
}

#[cfg(test)]
const EXAMPLE: &str = "\
be cfbegad cbdgef fgaecd cgeb fdcge agebfd fecdb fabcd edb | fdgacbe cefdb cefbgd gcbe
edbfga begcd cbg gc gcadebf fbgde acbgfd abcde gfcbed gfec | fcgedb cgb dgebacf gc
fgaebd cg bdaec gdafb agbcfd gdcbef bgcad gfac gcb cdgabef | cg cg fdcagb cbg
fbegcd cbd adcefb dageb afcb bc aefdc ecdab fgdeca fcdbega | efabcd cedba gadfec cb
aecbfdg fbg gf bafeg dbefa fcge gcbea fcaegb dgceab fcbdga | gecf egdcabf bgf bfgea
fgeab ca afcebg bdacfeg cfaedg gcfdb baec bfadeg bafgc acf | gebdcfa ecba ca fadegcb
dbcfg fgd bdegcaf fgec aegbdf ecdfab fbedc dacgb gdcebf gf | cefg dcbef fcge gbcadfe
bdfegc cbegaf gecbf dfcage bdacg ed bedf ced adcbefg gebcd | ed bcgafe cdgba cbgef
egadfb cdbfeg cegd fecab cgb gbdefca cg fgcdab egfdb bfceg | gbdfcae bgc cg cgb
gcafb gcf dcaebfg ecagb gf abcdeg gaef cafbge fdbac fegbdc | fgae cfgab fg bagce
";

#[test]
fn test_aggregate_example() {
    let totals = aggregate(EXAMPLE, FailurePolicy::Abort).unwrap();
    assert_eq!(totals.unique_digits, 26);
    assert_eq!(totals.readout_sum, 61229);
    assert_eq!(totals.records, 10);
    assert_eq!(totals.skipped, 0);
}

#[test]
fn test_example_readouts() {
    let expected = [
        8394, 9781, 1197, 9361, 4873, 8418, 4548, 1625, 8717, 4315,
    ];
    for (line, value) in EXAMPLE.lines().zip(expected) {
        assert_eq!(decode_line(line).unwrap().value(), value, "{}", line);
    }
}

#[test]
fn test_unique_digits_match_length_count() {
    for line in EXAMPLE.lines() {
        let record = DisplayRecord::try_from(line).unwrap();
        let reading = decode_record(&record).unwrap();
        assert_eq!(
            reading.unique_count(),
            crate::decode::count_unique_by_length(&record.readout)
        );
    }
}

#[cfg(test)]
fn with_bad_line() -> String {
    let mut lines: Vec<&str> = EXAMPLE.lines().collect();
    lines.insert(2, "be cfbegad | fdgacbe");
    lines.insert(0, "");
    lines.join("\n")
}

#[test]
fn test_aggregate_abort() {
    match aggregate(&with_bad_line(), FailurePolicy::Abort) {
        Err(crate::error::Error::AtLine { line, source }) => {
            assert_eq!(line, 4);
            assert!(
                matches!(*source, crate::error::Error::Tokenize(_)),
                "{:?}",
                source
            );
        }
        other => panic!("expected an error on line 4, got {:?}", other),
    }
}

#[test]
fn test_aggregate_skip() {
    let totals = aggregate(&with_bad_line(), FailurePolicy::Skip).unwrap();
    assert_eq!(totals.unique_digits, 26);
    assert_eq!(totals.readout_sum, 61229);
    assert_eq!(totals.records, 10);
    assert_eq!(totals.skipped, 1);
}

#[test]
fn test_default_policy_aborts() {
    assert_eq!(FailurePolicy::default(), FailurePolicy::Abort);
}

#[test]
fn test_aggregate_rejects_set_that_is_not_a_relabelling() {
    let input = "abdefg dg abefg cdefg acfg acdef abcdef dfg abcdefg acdefg | dg dg dg dg\n";
    match aggregate(input, FailurePolicy::Abort) {
        Err(crate::error::Error::AtLine { line, source }) => {
            assert_eq!(line, 1);
            assert!(
                matches!(*source, crate::error::Error::MalformedTrainingSet(_)),
                "{:?}",
                source
            );
        }
        other => panic!("expected a malformed training set error, got {:?}", other),
    }
}

#[test]
fn test_aggregate_empty() {
    assert_eq!(aggregate("", FailurePolicy::Abort).unwrap(), Totals::default());
}

#[test]
fn test_error_root() {
    use crate::error::{Error, TokenizeError};

    let e = Error::from(TokenizeError::MissingDelimiter).at_line(3);
    assert_eq!(e.to_string(), "line 3: expected two fields separated by '|'");
    assert!(matches!(e.root(), Error::Tokenize(_)));
}
