//! Example input generation.
//!
//! Examples are illustrative: values are random, but every block has one
//! line per requirement and every value is valid for its type, so a
//! generated block always passes [`crate::validate_input`].

use rand::seq::SliceRandom;
use rand::Rng;

use crate::analysis::{InputFormat, InputRequirement, InputType};

/// Number of examples attached to an analysis by default.
pub const DEFAULT_EXAMPLE_COUNT: usize = 3;

const WORDS: &[&str] = &[
    "hello", "world", "test", "input", "sample", "data", "value", "alpha", "beta", "gamma",
];

const PHRASES: &[&str] = &[
    "Hello World",
    "The quick brown fox",
    "sample input line",
    "lorem ipsum dolor",
    "one two three",
];

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generate `count` example input blocks for `requirements`.
///
/// With no requirements there is nothing to type, so a single empty block
/// is returned regardless of `count`.
pub fn generate_examples<R: Rng>(
    requirements: &[InputRequirement],
    count: usize,
    rng: &mut R,
) -> Vec<String> {
    if requirements.is_empty() {
        return vec![String::new()];
    }

    (0..count)
        .map(|_| {
            requirements
                .iter()
                .map(|req| example_line(req, rng))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect()
}

/// Pick one of the format's examples at random, or `""` when it has none.
pub fn generate_sample_input(format: &InputFormat) -> String {
    format
        .examples
        .choose(&mut rand::thread_rng())
        .cloned()
        .unwrap_or_default()
}

fn example_line<R: Rng>(req: &InputRequirement, rng: &mut R) -> String {
    if req.is_array {
        let values: Vec<String> = match req.input_type {
            InputType::Int => (0..5).map(|_| rng.gen_range(1..=100).to_string()).collect(),
            InputType::Float => (0..5).map(|_| decimal(rng)).collect(),
            _ => (0..3).map(|_| word(rng).to_string()).collect(),
        };
        return values.join(" ");
    }

    match req.input_type {
        InputType::Int => rng.gen_range(1..=100).to_string(),
        InputType::Float => decimal(rng),
        InputType::Char => {
            let idx = rng.gen_range(0..LETTERS.len());
            char::from(LETTERS[idx]).to_string()
        }
        InputType::Line => PHRASES.choose(rng).copied().unwrap_or("Hello World").to_string(),
        InputType::String => word(rng).to_string(),
    }
}

fn decimal<R: Rng>(rng: &mut R) -> String {
    format!("{:.2}", rng.gen_range(0.0..100.0))
}

fn word<R: Rng>(rng: &mut R) -> &'static str {
    WORDS.choose(rng).copied().unwrap_or("word")
}
