use alloc::vec::Vec;

use quickcheck::QuickCheck;

use super::{
    arbitrary::{Noise, RootDoc},
    utils::{quickcheck_tests, run_with, split_chars},
};
use crate::{Status, ValidationError, Validator, ValidatorOptions};

type Outcome = (Status, Option<ValidationError>, usize);

fn by_chars(options: ValidatorOptions, input: &str) -> Outcome {
    let (validator, err) = run_with(options, input);
    (validator.status(), err, validator.depth())
}

fn by_chunks(options: ValidatorOptions, input: &str, splits: &[usize]) -> Outcome {
    let mut validator = Validator::with_options(options);
    let mut first_error = None;
    for chunk in split_chars(input, splits) {
        if let Err(err) = validator.feed(chunk) {
            first_error.get_or_insert(err);
        }
    }
    (validator.status(), first_error, validator.depth())
}

fn by_byte_chunks(options: ValidatorOptions, input: &str, splits: &[usize]) -> Outcome {
    let mut validator = Validator::with_options(options);
    let mut first_error = None;
    let mut bytes = input.as_bytes();
    let mut splits = splits.iter();
    while !bytes.is_empty() {
        let size = splits.next().map_or(bytes.len(), |s| 1 + s % bytes.len());
        let (chunk, rest) = bytes.split_at(size);
        if let Err(err) = validator.feed_bytes(chunk) {
            first_error.get_or_insert(err);
        }
        bytes = rest;
    }
    (validator.status(), first_error, validator.depth())
}

fn partition_agrees(options: ValidatorOptions, input: &str, splits: &[usize]) -> bool {
    let expected = by_chars(options, input);
    by_chunks(options, input, splits) == expected && by_byte_chunks(options, input, splits) == expected
}

/// Property: feeding text in arbitrarily sized chunks, as characters or as
/// raw bytes split anywhere, yields the same status, first error and depth as
/// feeding it one character at a time.
#[test]
fn partition_independence_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(noise: Noise, splits: Vec<usize>, relaxed: bool) -> bool {
        let options = if relaxed {
            ValidatorOptions::relaxed()
        } else {
            ValidatorOptions::default()
        };
        partition_agrees(options, &noise.0, &splits)
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Noise, Vec<usize>, bool) -> bool);
}

/// Property: well-formed documents are valid however they are partitioned.
#[test]
fn partition_of_documents_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: RootDoc, splits: Vec<usize>) -> bool {
        let src = doc.0.render();
        let options = ValidatorOptions::default();
        let (status, err, depth) = by_chunks(options, &src, &splits);
        status == Status::Valid
            && err.is_none()
            && depth == 0
            && by_byte_chunks(options, &src, &splits) == (status, err, depth)
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(RootDoc, Vec<usize>) -> bool);
}
