//! Closed validation-code enums shared by the auth and todo domains.
//!
//! Validation functions return the standard [`Result`], so the success and
//! failure branches can never both be populated. The failure branch is always
//! one of a small, closed set of codes. Each code has a stable wire form
//! (`SCREAMING_SNAKE_CASE`, as submitted back by forms and serialised to
//! clients) and a display-message key for the presentation layer. Both tables
//! are compiled into `match` arms by [`validation_codes!`]; nothing here is
//! mutable at runtime.

/// Error returned when a string is not one of the known codes of an enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown validation code: {code}")]
pub struct UnknownValidationCode {
    code: String,
}

impl UnknownValidationCode {
    /// Record the rejected raw value.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    /// The raw value that failed to match.
    #[must_use]
    pub fn code(&self) -> &str {
        self.code.as_str()
    }
}

/// Strip leading and trailing whitespace from a form field, including the
/// byte-order mark some clients prepend.
pub(crate) fn trim_input(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Field length in UTF-16 code units, the unit form `maxlength` counts.
pub(crate) fn input_length(value: &str) -> usize {
    value.encode_utf16().count()
}

/// Behaviour shared by every closed validation-code enum.
///
/// # Examples
/// ```
/// use backend::domain::todos::TodoValidationError;
/// use backend::domain::validation::ValidationCode;
///
/// assert_eq!(TodoValidationError::TitleEmpty.code(), "TITLE_EMPTY");
/// assert!(TodoValidationError::is_known_code("TITLE_TOO_LONG"));
/// assert!(!TodoValidationError::is_known_code("title_empty"));
/// ```
pub trait ValidationCode: Copy + Sized + 'static {
    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    /// Stable wire code, for example `EMAIL_EMPTY`.
    fn code(self) -> &'static str;

    /// Display-message key resolved by the presentation layer.
    fn i18n_key(self) -> &'static str;

    /// Parse an exact wire code. Anything else yields `None`.
    fn from_code(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|candidate| candidate.code() == value)
    }

    /// Membership test over the known wire codes.
    fn is_known_code(value: &str) -> bool {
        Self::from_code(value).is_some()
    }
}

/// Declare a closed validation-code enum.
///
/// Each variant names its wire code, its display-message key and the
/// human-readable message used by `Display`.
macro_rules! validation_codes {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => ($code:literal, $key:literal, $message:literal)
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize,
        )]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $crate::domain::validation::ValidationCode for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            fn i18n_key(self) -> &'static str {
                match self {
                    $(Self::$variant => $key,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($message),)+
                }
            }
        }

        impl ::std::error::Error for $name {}

        impl ::std::str::FromStr for $name {
            type Err = $crate::domain::validation::UnknownValidationCode;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                <Self as $crate::domain::validation::ValidationCode>::from_code(value)
                    .ok_or_else(|| $crate::domain::validation::UnknownValidationCode::new(value))
            }
        }
    };
}

pub(crate) use validation_codes;

#[cfg(test)]
mod tests {
    //! Regression coverage for the code-table macro.

    use super::*;
    use rstest::rstest;

    validation_codes! {
        /// Codes used only by these tests.
        pub enum SampleError {
            /// First sample code.
            First => ("FIRST", "validation.first", "first failed"),
            /// Second sample code.
            Second => ("SECOND_CODE", "validation.second", "second failed"),
        }
    }

    #[rstest]
    #[case("FIRST", Some(SampleError::First))]
    #[case("SECOND_CODE", Some(SampleError::Second))]
    #[case("first", None)]
    #[case(" FIRST", None)]
    #[case("", None)]
    fn from_code_matches_exact_wire_codes(
        #[case] raw: &str,
        #[case] expected: Option<SampleError>,
    ) {
        assert_eq!(SampleError::from_code(raw), expected);
        assert_eq!(SampleError::is_known_code(raw), expected.is_some());
    }

    #[rstest]
    fn all_lists_variants_in_declaration_order() {
        assert_eq!(SampleError::ALL, &[SampleError::First, SampleError::Second]);
    }

    #[rstest]
    fn serde_uses_wire_codes() {
        let json = serde_json::to_string(&SampleError::Second).expect("serialise code");
        assert_eq!(json, "\"SECOND_CODE\"");
    }

    #[rstest]
    fn from_str_reports_rejected_value() {
        let err = "NOPE".parse::<SampleError>().expect_err("unknown code");
        assert_eq!(err.code(), "NOPE");
        assert_eq!(err.to_string(), "unknown validation code: NOPE");
    }

    #[rstest]
    fn display_uses_human_message() {
        assert_eq!(SampleError::First.to_string(), "first failed");
        assert_eq!(SampleError::First.i18n_key(), "validation.first");
    }
}
