//! Defines helper macros for generating domain port error enums.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
            #[must_use]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
            #[must_use]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( {
                    $( $(#[$field_meta:meta])* $field:ident : $ty:ty ),* $(,)?
                } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $( $(#[$field_meta])* $field : $ty ),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        /// Errors used only by these tests.
        pub enum StoragePortError {
            /// Unit variant.
            Closed => "storage closed",
            /// String field.
            Connection {
                /// Adapter message.
                message: String,
            } => "connection failed: {message}",
            /// Numeric field.
            Busy { retries: u32 } => "busy after {retries} retries",
            /// Mixed fields.
            Query { message: String, rows: u64 } => "query failed: {message} ({rows} rows)",
        }
    }

    #[test]
    fn unit_variants_get_a_constructor() {
        assert_eq!(StoragePortError::closed(), StoragePortError::Closed);
        assert_eq!(StoragePortError::closed().to_string(), "storage closed");
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = StoragePortError::connection("refused");
        assert_eq!(err.to_string(), "connection failed: refused");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = StoragePortError::busy(3_u32);
        assert_eq!(err.to_string(), "busy after 3 retries");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = StoragePortError::query("timeout", 7_u64);
        assert_eq!(err.to_string(), "query failed: timeout (7 rows)");
    }
}
