//! Macros for defining kind enums.

/// Macro for defining a kind enum.
///
/// Defined enum is displayed and parsed in `SCREAMING_SNAKE_CASE`, which is
/// the form it takes in logs and error messages.
///
/// # Example
///
/// ```rust
/// # use common::define_kind;
/// define_kind! {
///     #[doc = "Origin of a signing key."]
///     enum Origin {
///         #[doc = "Generated locally."]
///         Generated,
///
///         #[doc = "Imported from a secret."]
///         Imported,
///     }
/// }
///
/// assert_eq!(Origin::Imported.to_string(), "IMPORTED");
/// assert_eq!("GENERATED".parse::<Origin>(), Ok(Origin::Generated));
/// ```
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_kind {
    (
        #[doc = $doc:literal]
        enum $name:ident {
            $(
                #[doc = $variant_doc:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            $crate::private::strum::Display,
            $crate::private::strum::EnumString,
            Eq,
            Hash,
            PartialEq,
        )]
        #[doc = $doc]
        #[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $(
                 #[doc = $variant_doc]
                 $variant,
            )*
        }
    };
}
