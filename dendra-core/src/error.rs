//! Error types for the dendra core library.
//!
//! The partition, replay, layout and hit-testing algorithms never fail; they
//! repair malformed input locally. Errors only arise at the boundary where
//! caller-supplied configuration or wire payloads are validated.

use std::fmt;

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Coordinate axis named in validation errors.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Axis {
    /// Horizontal domain axis.
    X,
    /// Vertical domain axis.
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
        })
    }
}

/// Error type produced when configuring an [`crate::Explorer`] or a
/// [`crate::CoordinateTransform`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DendraError {
    /// A domain range had to be derived from the data but no points were
    /// supplied.
    #[error("cannot derive a domain range for the {axis} axis from an empty point set")]
    EmptyPointSet {
        /// Axis whose range could not be derived.
        axis: Axis,
    },
    /// A point carried a NaN or infinite coordinate.
    #[error("point {index} has a non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate {
        /// Position of the offending point in the input order.
        index: usize,
        /// Horizontal coordinate as supplied.
        x: f64,
        /// Vertical coordinate as supplied.
        y: f64,
    },
    /// A caller-provided axis range was non-finite or inverted.
    #[error("invalid {axis} range [{min}, {max}]")]
    InvalidRange {
        /// Axis the range was supplied for.
        axis: Axis,
        /// Lower bound as supplied.
        min: f64,
        /// Upper bound as supplied.
        max: f64,
    },
    /// The padded plot area of a viewport has no positive extent.
    #[error("viewport {width}x{height} leaves no drawable area inside its padding")]
    InvalidViewport {
        /// Viewport width in pixels.
        width: f64,
        /// Viewport height in pixels.
        height: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`DendraError`] variants.
    enum DendraErrorCode for DendraError {
        /// No points were available to derive a domain range from.
        EmptyPointSet => EmptyPointSet { .. } => "DENDRA_EMPTY_POINT_SET",
        /// A point carried a non-finite coordinate.
        NonFiniteCoordinate => NonFiniteCoordinate { .. } => "DENDRA_NON_FINITE_COORDINATE",
        /// A caller-provided axis range was unusable.
        InvalidRange => InvalidRange { .. } => "DENDRA_INVALID_RANGE",
        /// The viewport had no drawable area.
        InvalidViewport => InvalidViewport { .. } => "DENDRA_INVALID_VIEWPORT",
    }
}

/// Error produced when converting clustering-service payloads into the
/// strongly typed tree and step model.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum WireError {
    /// A node without children carried no point index.
    #[error("leaf `{label}` carries no point index")]
    LeafWithoutIndex {
        /// Label attached to the leaf, or an empty string.
        label: String,
    },
    /// An internal node height was NaN or infinite.
    #[error("merge node height {height} is not finite")]
    NonFiniteHeight {
        /// Height as supplied.
        height: f64,
    },
    /// A merge step distance was NaN or infinite.
    #[error("merge step {position} has non-finite distance {distance}")]
    NonFiniteDistance {
        /// Position of the step in the log.
        position: usize,
        /// Distance as supplied.
        distance: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`WireError`] variants.
    enum WireErrorCode for WireError {
        /// A leaf node had no point index.
        LeafWithoutIndex => LeafWithoutIndex { .. } => "WIRE_LEAF_WITHOUT_INDEX",
        /// A merge height was not finite.
        NonFiniteHeight => NonFiniteHeight { .. } => "WIRE_NON_FINITE_HEIGHT",
        /// A step distance was not finite.
        NonFiniteDistance => NonFiniteDistance { .. } => "WIRE_NON_FINITE_DISTANCE",
    }
}

/// Convenient result alias for fallible dendra operations.
pub type Result<T, E = DendraError> = core::result::Result<T, E>;
