//! Macros to reduce boilerplate in the codebase

/// Macro to generate Display and FromStr implementations for enums
///
/// # Usage
///
/// ```rust,ignore
/// enum_display_fromstr!(
///     Direction,
///     {
///         Left => "left",
///         Right => "right",
///     }
/// );
/// ```
#[macro_export]
macro_rules! enum_display_fromstr {
    (
        $enum_name:ident,
        { $($variant:ident => $str:expr),+ $(,)? }
    ) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $($enum_name::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::error::BoardError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok($enum_name::$variant),)+
                    _ => Err($crate::error::BoardError::Validation(format!(
                        "invalid {} '{}'",
                        stringify!($enum_name).to_lowercase(),
                        s
                    ))),
                }
            }
        }
    };
}

/// Macro to declare a string-backed identifier newtype
///
/// The generated type is transparent for serde, orders and hashes like its
/// inner string, and converts from `&str`/`String`.
#[macro_export]
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Default,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

#[cfg(test)]
mod test {
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum TestEnum {
        First,
        SecondVariant,
    }

    enum_display_fromstr!(
        TestEnum,
        {
            First => "first",
            SecondVariant => "second_variant",
        }
    );

    string_id!(
        /// Identifier used only by these tests
        TestId
    );

    #[test]
    fn test_display() {
        assert_eq!(TestEnum::First.to_string(), "first");
        assert_eq!(TestEnum::SecondVariant.to_string(), "second_variant");
    }

    #[test]
    fn test_fromstr_is_case_insensitive() {
        assert_eq!("FIRST".parse::<TestEnum>().unwrap(), TestEnum::First);
        assert_eq!(
            "second_variant".parse::<TestEnum>().unwrap(),
            TestEnum::SecondVariant
        );
    }

    #[test]
    fn test_fromstr_rejects_unknown() {
        let err = "third".parse::<TestEnum>().unwrap_err();
        assert_eq!(err.to_string(), "invalid testenum 'third'");
    }

    #[test]
    fn test_string_id_roundtrip() {
        let id = TestId::from("col-1");
        assert_eq!(id.as_str(), "col-1");
        assert_eq!(id.to_string(), "col-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"col-1\"");
    }
}
