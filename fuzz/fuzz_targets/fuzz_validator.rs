#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use jsonsieve::{KeyFormat, Status, ValidationError, Validator, ValidatorOptions};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};

const HEADER: usize = 5; // 1 flag + 4-byte seed

thread_local! {
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

static WS_TABLE: &[&[u8]] = &[
    b" ",
    b"\t",
    b"\n",
    b"\r",
    "\u{00A0}".as_bytes(),
    "\u{1680}".as_bytes(),
    "\u{2003}".as_bytes(),
    "\u{2028}".as_bytes(),
    "\u{3000}".as_bytes(),
];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8);
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let mut prefix = HEADER;
        while prefix < size {
            let limit = max_size - prefix;

            prefix += append_whitespace(&mut data[prefix..], limit);
            prefix += append_document(&mut data[prefix..], size, max_size - prefix);
            prefix += append_whitespace(&mut data[prefix..], max_size - prefix);
        }

        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Append a few whitespace code points, never exceeding `limit` bytes.
fn append_whitespace(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        if limit == 0 {
            return 0;
        }

        let mut written = 0;
        for _ in 0..rng.random_range(1..=limit.min(4)) {
            let w = WS_TABLE[rng.random_range(0..WS_TABLE.len())];
            if written + w.len() > limit {
                break;
            }
            buf[written..written + w.len()].copy_from_slice(w);
            written += w.len();
        }
        written
    })
}

/// Append a serialized object, truncated to `limit` bytes.
fn append_document(data: &mut [u8], size: usize, limit: usize) -> usize {
    if limit == 0 {
        return 0;
    }
    let value = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..=size * 2).min(limit));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        if let Ok(value) = ArbitraryDoc::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            break value;
        }
    };

    let root = match value.0 {
        root @ Value::Object(_) => root,
        other => Value::Object(Map::from_iter([(String::from("root"), other)])),
    };
    let serialized = serde_json::to_vec(&root).expect("values always serialize");

    let len = serialized.len().min(limit);
    data[..len].copy_from_slice(&serialized[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

/// A value in the validator's grammar: strings, arrays and objects, with a
/// bias towards identifier keys.
#[derive(Debug)]
struct ArbitraryDoc(Value);

impl<'a> Arbitrary<'a> for ArbitraryDoc {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let value = match u.choose_index(16)? {
            0..=7 => Value::String(u.arbitrary()?),
            8..=10 => {
                let elems: Vec<ArbitraryDoc> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            11..=15 => {
                let members: Vec<(ArbitraryKey, ArbitraryDoc)> = u.arbitrary()?;
                Value::Object(Map::from_iter(members.into_iter().map(|(k, v)| (k.0, v.0))))
            }
            _ => Err(arbitrary::Error::IncorrectFormat)?,
        };
        Ok(ArbitraryDoc(value))
    }
}

#[derive(Debug)]
struct ArbitraryKey(String);

impl<'a> Arbitrary<'a> for ArbitraryKey {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        if u.ratio(1, 8)? {
            return Ok(ArbitraryKey(u.arbitrary()?));
        }
        let mut key = String::from(char::from(b'a' + u.int_in_range(0..=25)?));
        for _ in 0..u.int_in_range(0..=6)? {
            key.push(char::from(*u.choose(b"abcxyzAZ0129")?));
        }
        Ok(ArbitraryKey(key))
    }
}

fn options(flags: u8) -> ValidatorOptions {
    ValidatorOptions {
        allow_empty_containers: flags & 1 != 0,
        key_format: if flags & 2 != 0 {
            KeyFormat::AnyString
        } else {
            KeyFormat::Identifier
        },
        allow_bare_array_elements: flags & 4 != 0,
        allow_array_root: flags & 8 != 0,
        allow_multiple_documents: flags & 16 != 0,
        allow_unicode_whitespace: flags & 32 != 0,
        max_depth: if flags & 64 != 0 { 4 } else { 100 },
        panic_on_error: false,
    }
}

type Outcome = (Status, Option<ValidationError>, usize, Result<(), ValidationError>);

/// Feeds one character at a time, checking that invalidity is sticky.
fn by_chars(options: ValidatorOptions, text: &str) -> Outcome {
    let mut validator = Validator::with_options(options);
    let mut first_error = None;
    for c in text.chars() {
        let was_invalid = validator.is_invalid();
        match validator.accept(c) {
            Ok(()) => assert!(!was_invalid || validator.status() == Status::Invalid),
            Err(err) => {
                assert!(!was_invalid, "error reported twice");
                assert_eq!(validator.status(), Status::Invalid);
                first_error = Some(err);
            }
        }
        assert_eq!(validator.is_invalid(), validator.status() == Status::Invalid);
    }
    let status = validator.status();
    let depth = validator.depth();
    (status, first_error, depth, validator.finalize())
}

fn by_byte_chunks(options: ValidatorOptions, bytes: &[u8], split_seed: u64) -> Outcome {
    let mut validator = Validator::with_options(options);
    let mut first_error = None;
    let mut start = 0;
    while start < bytes.len() {
        let size = (split_seed as usize % (bytes.len() - start)) + 1;
        if let Err(err) = validator.feed_bytes(&bytes[start..start + size]) {
            first_error.get_or_insert(err);
        }
        start += size;
    }
    let status = validator.status();
    let depth = validator.depth();
    (status, first_error, depth, validator.finalize())
}

/// Lone surrogate escapes are accepted here but rejected by `serde_json`.
fn has_surrogate_escape(text: &str) -> bool {
    text.to_ascii_lowercase().contains("\\ud")
}

fn validator(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let split_seed = u64::from(u32::from_le_bytes([data[1], data[2], data[3], data[4]]));
    let data = &data[HEADER..];
    let options = options(flags);

    let bytes_outcome = by_byte_chunks(options, data, split_seed);
    let Ok(text) = std::str::from_utf8(data) else {
        assert!(bytes_outcome.0 == Status::Invalid || bytes_outcome.3.is_err());
        return;
    };

    let chars_outcome = by_chars(options, text);
    assert_eq!(chars_outcome, bytes_outcome, "partitioning changed the verdict");

    // Under the strict grammar, everything accepted is JSON.
    if flags & 0x3F == 0
        && chars_outcome.0 == Status::Valid
        && chars_outcome.3.is_ok()
        && !has_surrogate_escape(text)
    {
        serde_json::from_str::<Value>(text).expect("accepted input must be JSON");
    }
}

fuzz_target!(|data: &[u8]| validator(data));
