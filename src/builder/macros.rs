//! Macros for declaring state and event identifiers as enums.

/// Declare a fieldless enum whose variants are state ids.
///
/// Variants are numbered from 0 in declaration order, so the first variant
/// is always the root state.
///
/// # Example
///
/// ```
/// use statechart::core::StateId;
/// use statechart::state_ids;
///
/// state_ids! {
///     pub enum Turnstile {
///         Root,
///         Locked,
///         Unlocked,
///     }
/// }
///
/// assert_eq!(StateId::from(Turnstile::Root), StateId::ROOT);
/// assert_eq!(Turnstile::try_from(StateId::new(2)), Ok(Turnstile::Unlocked));
/// assert_eq!(Turnstile::Locked.name(), "Locked");
/// ```
#[macro_export]
macro_rules! state_ids {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        #[repr(usize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant in id order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            pub const fn id(self) -> $crate::core::StateId {
                $crate::core::StateId::new(self as usize)
            }
        }

        impl ::std::convert::From<$name> for $crate::core::StateId {
            fn from(value: $name) -> Self {
                value.id()
            }
        }

        impl ::std::convert::TryFrom<$crate::core::StateId> for $name {
            type Error = $crate::core::StateId;

            fn try_from(id: $crate::core::StateId) -> ::std::result::Result<Self, Self::Error> {
                Self::ALL.get(id.index()).copied().ok_or(id)
            }
        }
    };
}

/// Declare a fieldless enum whose variants are event ids.
///
/// # Example
///
/// ```
/// use statechart::core::EventId;
/// use statechart::event_ids;
///
/// event_ids! {
///     pub enum Input {
///         Coin,
///         Push,
///     }
/// }
///
/// assert_eq!(EventId::from(Input::Push), EventId::new(1));
/// ```
#[macro_export]
macro_rules! event_ids {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        #[repr(u32)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant in id order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            pub const fn id(self) -> $crate::core::EventId {
                $crate::core::EventId::new(self as u32)
            }
        }

        impl ::std::convert::From<$name> for $crate::core::EventId {
            fn from(value: $name) -> Self {
                value.id()
            }
        }

        impl ::std::convert::TryFrom<$crate::core::EventId> for $name {
            type Error = $crate::core::EventId;

            fn try_from(id: $crate::core::EventId) -> ::std::result::Result<Self, Self::Error> {
                Self::ALL.get(id.get() as usize).copied().ok_or(id)
            }
        }
    };
}
