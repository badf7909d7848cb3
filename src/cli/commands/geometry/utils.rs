use std::str::FromStr;

use crate::cli::CliError;

/// Parses a positional argument, naming it in the error.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` if `value` does not parse as `T`.
pub fn parse_arg<T: FromStr>(arg: &str, value: &str) -> Result<T, CliError> {
    value.parse::<T>().map_err(|_| CliError::InvalidArgument {
        arg: arg.to_string(),
        reason: format!("'{value}' is not a valid number"),
    })
}

/// Parses an optional positional argument.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` if the argument is present but does
/// not parse as `T`.
pub fn parse_optional<T: FromStr>(args: &[String], index: usize, arg: &str) -> Result<Option<T>, CliError> {
    args.get(index).map(|value| parse_arg(arg, value)).transpose()
}

/// Parses an aspect ratio given as a number (`1.5`) or as `W:H` / `WxH`.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for anything that is not a positive
/// finite ratio.
pub fn parse_ratio(value: &str) -> Result<f64, CliError> {
    let invalid = || CliError::InvalidArgument {
        arg: "ratio".to_string(),
        reason: format!("'{value}' is not a ratio. Use 1.78, 16:9 or 1920x1080"),
    };

    let ratio = match value.split_once([':', 'x']) {
        Some((width, height)) => {
            let width: f64 = width.trim().parse().map_err(|_| invalid())?;
            let height: f64 = height.trim().parse().map_err(|_| invalid())?;
            width / height
        }
        None => value.parse::<f64>().map_err(|_| invalid())?,
    };

    if ratio.is_finite() && ratio > 0.0 {
        Ok(ratio)
    } else {
        Err(invalid())
    }
}
