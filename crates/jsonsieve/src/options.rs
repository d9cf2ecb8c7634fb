#![allow(clippy::struct_excessive_bools)]

/// Nesting depth used by [`ValidatorOptions::default`].
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Which object keys are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeyFormat {
    /// Keys must be non-empty, start with an ASCII letter and continue with
    /// ASCII letters or digits only (`ab1`, not `1ab` or `a-b`).
    #[default]
    Identifier,
    /// Any well-formed string is a key, including the empty string.
    AnyString,
}

/// Configuration options for the [`Validator`](crate::Validator).
///
/// The defaults describe the strict grammar: the document is a single object,
/// every value is a string or a non-empty nested object or array, and keys are
/// identifiers. Each relaxation is opt-in.
///
/// # Examples
///
/// ```rust
/// use jsonsieve::{KeyFormat, Validator, ValidatorOptions};
///
/// let mut validator = Validator::with_options(ValidatorOptions {
///     allow_empty_containers: true,
///     key_format: KeyFormat::AnyString,
///     ..Default::default()
/// });
/// validator.feed(r#"{"":{}}"#).unwrap();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ValidatorOptions {
    /// The maximum number of simultaneously open containers.
    ///
    /// # Default
    ///
    /// [`DEFAULT_MAX_DEPTH`]
    pub max_depth: usize,

    /// Whether `{}` and `[]` are accepted.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_empty_containers: bool,

    /// Which object keys are accepted.
    ///
    /// # Default
    ///
    /// [`KeyFormat::Identifier`]
    pub key_format: KeyFormat,

    /// Whether array elements may be bare, unquoted tokens such as `1` or
    /// `true`.
    ///
    /// Bare tokens are not checked beyond being free of whitespace, quotes and
    /// structural characters; they only need to be followed by `,` or the
    /// closing bracket.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_bare_array_elements: bool,

    /// Whether the document root may be an array.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_array_root: bool,

    /// Whether more documents may follow a completed one in the same stream.
    ///
    /// This supports formats such as JSON Lines, where several root values
    /// are separated by whitespace:
    ///
    /// ```json
    /// {"a":"b"}
    /// {"c":"d"}
    /// ```
    ///
    /// # Default
    ///
    /// `false`
    pub allow_multiple_documents: bool,

    /// Whether to allow any Unicode whitespace between tokens.
    ///
    /// By default only the four whitespace characters JSON defines are
    /// skipped: space (U+0020), line feed (U+000A), carriage return (U+000D),
    /// and horizontal tab (U+0009).
    ///
    /// # Default
    ///
    /// `false`
    pub allow_unicode_whitespace: bool,

    #[cfg(any(test, feature = "fuzzing"))]
    #[cfg_attr(feature = "serde", serde(skip))]
    /// Panic on syntax errors instead of returning them.
    ///
    /// Enabled only in test and fuzzing builds to produce backtraces.
    pub panic_on_error: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_empty_containers: false,
            key_format: KeyFormat::Identifier,
            allow_bare_array_elements: false,
            allow_array_root: false,
            allow_multiple_documents: false,
            allow_unicode_whitespace: false,
            #[cfg(any(test, feature = "fuzzing"))]
            panic_on_error: false,
        }
    }
}

impl ValidatorOptions {
    /// The most permissive grammar: every policy point relaxed.
    #[must_use]
    pub fn relaxed() -> Self {
        Self {
            allow_empty_containers: true,
            key_format: KeyFormat::AnyString,
            allow_bare_array_elements: true,
            allow_array_root: true,
            ..Self::default()
        }
    }

    pub(crate) fn is_whitespace(&self, c: char) -> bool {
        matches!(c, ' ' | '\n' | '\r' | '\t') || (self.allow_unicode_whitespace && c.is_whitespace())
    }
}
