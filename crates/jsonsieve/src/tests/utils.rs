use alloc::vec::Vec;

use crate::{Status, ValidationError, Validator, ValidatorOptions};

/// Feeds `input` one character at a time and returns the validator together
/// with the first error, if any.
pub(crate) fn run_with(options: ValidatorOptions, input: &str) -> (Validator, Option<ValidationError>) {
    let mut validator = Validator::with_options(options);
    let mut first_error = None;
    for c in input.chars() {
        if let Err(err) = validator.accept(c) {
            first_error.get_or_insert(err);
        }
    }
    (validator, first_error)
}

pub(crate) fn run(input: &str) -> (Validator, Option<ValidationError>) {
    run_with(ValidatorOptions::default(), input)
}

/// The status after each character of `input`.
pub(crate) fn status_trace(options: ValidatorOptions, input: &str) -> Vec<Status> {
    let mut validator = Validator::with_options(options);
    input
        .chars()
        .map(|c| {
            let _ = validator.accept(c);
            validator.status()
        })
        .collect()
}

/// How many cases each quickcheck property runs.
pub(crate) fn quickcheck_tests() -> u64 {
    #[cfg(not(miri))]
    let tests = if cfg!(feature = "test-fast") {
        100
    } else if is_ci::cached() {
        10_000
    } else {
        1_000
    };
    #[cfg(miri)]
    let tests = 10;
    tests
}

/// Splits `input` into chunks whose character counts are derived from
/// `splits`; whatever remains forms the last chunk.
pub(crate) fn split_chars<'a>(input: &'a str, splits: &[usize]) -> Vec<&'a str> {
    let boundaries: Vec<usize> = input
        .char_indices()
        .map(|(i, _)| i)
        .chain(core::iter::once(input.len()))
        .collect();
    let total = boundaries.len() - 1;

    let mut chunks = Vec::new();
    let mut start = 0;
    for split in splits {
        if start == total {
            break;
        }
        let end = start + 1 + split % (total - start);
        chunks.push(&input[boundaries[start]..boundaries[end]]);
        start = end;
    }
    if start < total {
        chunks.push(&input[boundaries[start]..]);
    }
    chunks
}

#[test]
fn split_chars_keeps_multibyte_characters_whole() {
    let chunks = split_chars("{\"é\u{1F680}\"}", &[1, 0, 1]);
    assert_eq!(chunks, ["{\"", "é", "\u{1F680}\"", "}"]);
}

#[quickcheck_macros::quickcheck]
fn split_chars_covers_the_input(noise: super::arbitrary::Noise, splits: Vec<usize>) -> bool {
    let chunks = split_chars(&noise.0, &splits);
    chunks.iter().all(|chunk| !chunk.is_empty()) && chunks.concat() == noise.0
}
