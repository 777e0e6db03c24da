//! Shared helpers for projecting SDK output into payload records.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// A UTC instant rendered as RFC 3339 with millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    pub fn from_smithy(value: &aws_smithy_types::DateTime) -> Option<Self> {
        DateTime::from_timestamp(value.secs(), value.subsec_nanos()).map(Timestamp)
    }

    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Timestamp)
    }

    pub fn to_smithy(self) -> aws_smithy_types::DateTime {
        aws_smithy_types::DateTime::from_millis(self.0.timestamp_millis())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Timestamp(value)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Converts an optional SDK timestamp accessor result.
pub fn timestamp<'a>(value: impl IntoOption<&'a aws_smithy_types::DateTime>) -> Option<Timestamp> {
    value.into_option().and_then(Timestamp::from_smithy)
}

/// Uniform access to SDK accessors that return either `T` or `Option<T>`.
///
/// Members the service model marks as required come back unwrapped, the rest
/// as options.
pub trait IntoOption<T> {
    fn into_option(self) -> Option<T>;
}

impl<T> IntoOption<T> for Option<T> {
    fn into_option(self) -> Option<T> {
        self
    }
}

impl<'a, T: ?Sized> IntoOption<&'a T> for &'a T {
    fn into_option(self) -> Option<&'a T> {
        Some(self)
    }
}

macro_rules! into_option_for_copy {
    ($($ty:ty),*) => {
        $(
            impl IntoOption<$ty> for $ty {
                fn into_option(self) -> Option<$ty> {
                    Some(self)
                }
            }
        )*
    };
}

into_option_for_copy!(bool, i32, i64, f64);

/// Uniform handling of model builders, which return `Result` only when the
/// shape has required members.
pub trait Built<T> {
    fn built(self) -> Result<T, fleet_core::ProviderError>;
}

impl<T> Built<T> for Result<T, aws_smithy_types::error::operation::BuildError> {
    fn built(self) -> Result<T, fleet_core::ProviderError> {
        self.map_err(crate::error::build_error)
    }
}

/// Implements [`Built`] for shapes whose builders cannot fail.
macro_rules! infallible_build {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::convert::Built<$ty> for $ty {
                fn built(self) -> Result<$ty, fleet_core::ProviderError> {
                    Ok(self)
                }
            }
        )*
    };
}

pub(crate) use infallible_build;

/// Owned string from an optional or required string accessor.
pub fn text<'a>(value: impl IntoOption<&'a str>) -> Option<String> {
    value.into_option().map(str::to_string)
}

/// Like [`text`], treating the empty string as absent.
pub fn non_empty<'a>(value: impl IntoOption<&'a str>) -> Option<String> {
    value
        .into_option()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
