//! Logging shims used throughout the library.
//!
//! With the `defmt` feature enabled each macro forwards to the matching
//! `defmt` macro. Without it (host unit tests) the arguments are evaluated
//! and discarded, so tests never need a defmt global logger.

#[cfg(feature = "defmt")]
#[macro_use]
mod with_defmt {
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {
            defmt::debug!($($arg)*)
        };
    }

    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {
            defmt::info!($($arg)*)
        };
    }

    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {
            defmt::warn!($($arg)*)
        };
    }

    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => {
            defmt::error!($($arg)*)
        };
    }
}

#[allow(unused)]
#[cfg(not(feature = "defmt"))]
#[macro_use]
mod without_defmt {
    #[macro_export]
    macro_rules! debug {
        ($($arg:expr),* $(,)?) => {{ $( let _ = &$arg; )* }};
    }

    #[macro_export]
    macro_rules! info {
        ($($arg:expr),* $(,)?) => {{ $( let _ = &$arg; )* }};
    }

    #[macro_export]
    macro_rules! warn {
        ($($arg:expr),* $(,)?) => {{ $( let _ = &$arg; )* }};
    }

    #[macro_export]
    macro_rules! error {
        ($($arg:expr),* $(,)?) => {{ $( let _ = &$arg; )* }};
    }
}
