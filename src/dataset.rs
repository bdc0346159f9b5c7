//! Labelled training data.
//!
//! Delimited text is read with the `csv` crate, one record per sample. The
//! last field of a record is an integer class label and every earlier field is
//! a numeric feature:
//!
//! ```text
//! 5.1,3.5,1.4,0.2,0
//! 6.3,3.3,6.0,2.5,2
//! ```
//!
//! Features are min-max scaled per column into `[0, 1]` across the whole
//! file, and labels are one-hot encoded.

use crate::error::{Error, Result};

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::slice;

/// A single `(input, target)` training pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub input: Vec<f32>,
    pub target: Vec<f32>,
}

impl Sample {
    pub fn new(input: Vec<f32>, target: Vec<f32>) -> Self {
        Sample { input, target }
    }
}

/// Encodes `label` as a vector of `classes` zeros with a one at `label`.
///
/// Panics if `label >= classes`.
pub fn one_hot(label: usize, classes: usize) -> Vec<f32> {
    assert!(label < classes);
    let mut target = vec![0.0; classes];
    target[label] = 1.0;
    target
}

/// How delimited text should be read.
#[derive(Clone, Debug)]
pub struct DatasetOptions {
    /// Field separator, a single ASCII byte.
    pub delimiter: u8,
    /// Treat the first record as a header.
    pub has_header: bool,
    /// Number of classes, and so the width of every target vector.
    pub classes: usize,
}

impl DatasetOptions {
    pub fn new(classes: usize) -> Self {
        DatasetOptions {
            delimiter: b',',
            has_header: false,
            classes,
        }
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn has_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }
}

/// An ordered collection of samples with consistent widths.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    /// Builds a dataset from in-memory pairs.
    ///
    /// Returns an error if the pairs do not all share the widths of the first.
    pub fn from_pairs<I, O>(pairs: &[(I, O)]) -> Result<Self>
    where
        I: AsRef<[f32]>,
        O: AsRef<[f32]>,
    {
        let samples = pairs
            .iter()
            .map(|(input, target)| Sample::new(input.as_ref().to_vec(), target.as_ref().to_vec()))
            .collect::<Vec<_>>();
        if let Some(first) = samples.first() {
            check_widths(&samples, first.input.len(), first.target.len())?;
        }
        Ok(Dataset { samples })
    }

    /// Opens and parses a delimited text file.
    pub fn from_path<P: AsRef<Path>>(path: P, options: &DatasetOptions) -> Result<Self> {
        let file = File::open(path)?;
        Dataset::from_reader(file, options)
    }

    /// Parses delimited text from `reader`.
    ///
    /// Fields may be quoted and surrounding whitespace is ignored. Rows must
    /// all have the same number of features, every feature must be a finite
    /// number and every label must be below `options.classes`.
    pub fn from_reader<R: Read>(reader: R, options: &DatasetOptions) -> Result<Self> {
        if options.classes == 0 {
            return Err(Error::Parse {
                line: 0,
                message: "at least one class is required".into(),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(options.has_header)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut features: Vec<Vec<f32>> = Vec::new();
        let mut labels = Vec::new();
        for record in reader.records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line() as usize);
            let row = parse_features(&record, line)?;
            if let Some(first) = features.first() {
                if row.len() != first.len() {
                    return Err(Error::Parse {
                        line,
                        message: format!("expected {} features, found {}", first.len(), row.len()),
                    });
                }
            }
            features.push(row);
            labels.push(parse_label(&record, line, options.classes)?);
        }
        if features.is_empty() {
            return Err(Error::NoSamples);
        }

        normalize(&mut features);
        let samples = features
            .into_iter()
            .zip(labels)
            .map(|(input, label)| Sample::new(input, one_hot(label, options.classes)))
            .collect();
        Ok(Dataset { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Width of every input vector, or `None` if the dataset is empty.
    pub fn input_len(&self) -> Option<usize> {
        self.samples.first().map(|s| s.input.len())
    }

    /// Width of every target vector, or `None` if the dataset is empty.
    pub fn target_len(&self) -> Option<usize> {
        self.samples.first().map(|s| s.target.len())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Sample;
    type IntoIter = slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<Vec<Sample>> for Dataset {
    fn from(samples: Vec<Sample>) -> Self {
        Dataset { samples }
    }
}

/// Verifies every sample has the given input and target widths.
pub fn check_widths(samples: &[Sample], input_len: usize, target_len: usize) -> Result<()> {
    for (i, sample) in samples.iter().enumerate() {
        if sample.input.len() != input_len {
            return Err(Error::DimensionMismatch {
                sample: i,
                what: "input",
                expected: input_len,
                actual: sample.input.len(),
            });
        }
        if sample.target.len() != target_len {
            return Err(Error::DimensionMismatch {
                sample: i,
                what: "target",
                expected: target_len,
                actual: sample.target.len(),
            });
        }
    }
    Ok(())
}

/// Parses every field but the last of `record` as a finite feature.
fn parse_features(record: &csv::StringRecord, line: usize) -> Result<Vec<f32>> {
    if record.len() < 2 {
        return Err(Error::Parse {
            line,
            message: "expected at least one feature and a label".into(),
        });
    }
    record
        .iter()
        .take(record.len() - 1)
        .map(|field| {
            let x = field.parse::<f32>().map_err(|e| Error::Parse {
                line,
                message: format!("invalid feature {:?}: {}", field, e),
            })?;
            if !x.is_finite() {
                return Err(Error::Parse {
                    line,
                    message: format!("non-finite feature {:?}", field),
                });
            }
            Ok(x)
        })
        .collect()
}

/// Parses the last field of `record` as a class label below `classes`.
fn parse_label(record: &csv::StringRecord, line: usize, classes: usize) -> Result<usize> {
    let field = record.get(record.len() - 1).unwrap_or_default();
    let label = field.parse::<usize>().map_err(|e| Error::Parse {
        line,
        message: format!("invalid label {:?}: {}", field, e),
    })?;
    if label >= classes {
        return Err(Error::LabelOutOfRange {
            line,
            label,
            classes,
        });
    }
    Ok(label)
}

/// Scales each column of `rows` into `[0, 1]`. Constant columns become zero.
fn normalize(rows: &mut [Vec<f32>]) {
    let width = match rows.first() {
        Some(row) => row.len(),
        None => return,
    };
    for col in 0..width {
        let (min, max) = rows
            .iter()
            .map(|row| row[col])
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), x| {
                (lo.min(x), hi.max(x))
            });
        let range = max - min;
        for row in rows.iter_mut() {
            row[col] = if range > 0.0 {
                (row[col] - min) / range
            } else {
                0.0
            };
        }
    }
}
