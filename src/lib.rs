//! Decoding of scrambled seven-segment displays.
//!
//! Each display record lists the ten digit patterns in an unknown
//! wire order, then a four-digit readout.  [`deduce::deduce`] works
//! out which pattern is which digit using only set relations between
//! the patterns, and [`decode::decode`] reads the readout with the
//! result.

pub mod aggregate;
pub mod decode;
pub mod deduce;
pub mod error;
pub mod segment;
pub mod tokenizer;

pub use aggregate::{aggregate, FailurePolicy, Totals};
pub use decode::{decode, Reading};
pub use deduce::{deduce, DigitMapping, TrainingSet, Wiring};
pub use error::{Error, MalformedTrainingSetError, Result, TokenizeError, UnknownPatternError};
pub use segment::{Segment, SegmentMask};
pub use tokenizer::{tokenize, DisplayRecord};
