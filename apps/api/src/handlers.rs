use std::str::FromStr;

use folio_core::AppError;

pub mod access;
pub mod assignments;
pub mod health;
pub mod permissions;
pub mod roles;

/// Parses a transport identifier into its typed form.
pub(crate) fn parse_id<T>(value: &str) -> Result<T, AppError>
where
    T: FromStr<Err = AppError>,
{
    T::from_str(value.trim())
}

/// Parses an optional transport identifier.
pub(crate) fn parse_optional_id<T>(value: Option<&str>) -> Result<Option<T>, AppError>
where
    T: FromStr<Err = AppError>,
{
    value.map(parse_id::<T>).transpose()
}
