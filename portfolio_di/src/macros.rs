/// Declares a provider.
///
/// Each `field: Type` entry makes `Type` available by cloning the field. An
/// entry of the form `..field: Base { A, B, }` embeds the provider `Base` and
/// forwards the listed types to it.
///
/// The generated struct has an additional `_cache` field which must be
/// initialized with `Default::default()`.
#[macro_export]
macro_rules! provider {
    (@field $name:ident, $field:ident, $ty:ty) => {
        impl $crate::Build<$name> for $ty {
            fn build(provider: &mut $name) -> Self {
                ::core::clone::Clone::clone(&provider.$field)
            }
        }
    };

    (@forward $name:ident, $inner:ident, $ty:ty) => {
        impl $crate::Build<$name> for $ty {
            fn build(provider: &mut $name) -> Self {
                $crate::Build::build(&mut provider.$inner)
            }
        }
    };

    (
        $(#[$attr:meta])*
        $vis:vis $name:ident {
            $( $field:ident: $ty:ty, )*
            $( ..$inner:ident: $inner_ty:ty { $( $forward:ty ),* $(,)? } )*
        }
    ) => {
        $(#[$attr])*
        $vis struct $name {
            _cache: $crate::TypeMap,
            $( $field: $ty, )*
            $( $inner: $inner_ty, )*
        }

        impl $crate::Provider for $name {
            fn cache(&mut self) -> &mut $crate::TypeMap {
                &mut self._cache
            }
        }

        $( $crate::provider!(@field $name, $field, $ty); )*
        $( $( $crate::provider!(@forward $name, $inner, $forward); )* )*
    };
}
