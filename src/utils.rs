use std::env::var;
use std::str::FromStr;

use anyhow::Context;
use anyhow::Result;

/// Get the value of ENV var
///
/// Only when:
/// - It is set
/// - It is not empty
pub fn env_var(var_name: &'static str) -> Option<String> {
    var(var_name).ok().filter(|value| !value.is_empty())
}

/// Get the value of ENV var, or a default
pub fn env_var_or_else(var_name: &'static str, or_else: fn() -> String) -> String {
    env_var(var_name).unwrap_or_else(or_else)
}

/// Parse the value of ENV var, or use a default when it is not set
///
/// # Errors
///
/// Will return `Err` when the value is set but can not be parsed
pub fn parse_env_var<T>(var_name: &'static str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env_var(var_name).map_or(Ok(default), |value| {
        value
            .parse::<T>()
            .with_context(|| format!("Invalid value for `{var_name}`: {value}"))
    })
}
