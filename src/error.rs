use crate::segment::SegmentMask;

/// A record's text could not be turned into patterns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenizeError {
    #[error("expected two fields separated by '|'")]
    MissingDelimiter,
    #[error("too many '|' in input line")]
    TooManyDelimiters,
    #[error("expected {expected} {section} patterns, got {found}")]
    WrongPatternCount {
        section: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("unexpected character '{0}' in pattern")]
    InvalidCharacter(char),
    #[error("pattern '{0}' should have between 2 and 7 segments")]
    PatternLength(String),
    #[error("pattern '{0}' names the same segment more than once")]
    RepeatedSegment(String),
    #[error("training pattern {0} occurs more than once")]
    DuplicatePattern(SegmentMask),
    #[error("failed to parse record: {0}")]
    Syntax(String),
}

/// The ten training patterns are not the ten digit shapes under some
/// relabelling of the wires.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedTrainingSetError {
    /// `histogram[n]` is the number of patterns with `n` segments lit.
    #[error("training patterns have segment counts {histogram:?}, expected {expected:?}")]
    SegmentCounts {
        histogram: [usize; 8],
        expected: [usize; 8],
    },
    #[error("expected exactly one candidate for digit {digit}, found {found}")]
    NotExactlyOne { digit: u8, found: usize },
    #[error("pattern '{mask}' for digit {digit} contradicts the other patterns")]
    Inconsistent { digit: u8, mask: SegmentMask },
    #[error("wire {wire} does not correspond to exactly one segment")]
    UnmatchedWire { wire: char },
}

/// A readout pattern is not among the record's training patterns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("readout pattern {position} ('{mask}') does not match any training pattern")]
pub struct UnknownPatternError {
    /// Zero-based, most significant digit first.
    pub position: usize,
    pub mask: SegmentMask,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    #[error(transparent)]
    MalformedTrainingSet(#[from] MalformedTrainingSetError),
    #[error(transparent)]
    UnknownPattern(#[from] UnknownPatternError),
    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn at_line(self, line: usize) -> Error {
        Error::AtLine {
            line,
            source: Box::new(self),
        }
    }

    /// The error without any line annotation.
    pub fn root(&self) -> &Error {
        match self {
            Error::AtLine { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
