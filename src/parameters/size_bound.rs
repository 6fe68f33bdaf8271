use crate::{RollingError, MINIMUM_SIZE_BOUND};

/// Parses a size bound like `"10M"`.
///
/// The text is a decimal number with an optional binary unit suffix
/// `K` (KiB), `M` (MiB), `G` (GiB), or `T` (TiB), case-insensitive.
/// Values below [`MINIMUM_SIZE_BOUND`] are raised to it.
///
/// ```rust
/// # use rolling_logger::parse_size_bound;
/// assert_eq!(parse_size_bound("2K").unwrap(), 2048);
/// assert_eq!(parse_size_bound(" 10m ").unwrap(), 10 * 1024 * 1024);
/// ```
///
/// # Errors
///
/// [`RollingError::InvalidSizeBound`] if the text is not a number with an optional
/// known suffix, or if the value does not fit into a `u64`.
pub fn parse_size_bound(text: &str) -> Result<u64, RollingError> {
    let invalid = || RollingError::InvalidSizeBound(text.to_string());
    let trimmed = text.trim();
    let (digits, factor) = match trimmed.chars().last().map(|c| c.to_ascii_uppercase()) {
        Some('K') => (&trimmed[..trimmed.len() - 1], 1_u64 << 10),
        Some('M') => (&trimmed[..trimmed.len() - 1], 1_u64 << 20),
        Some('G') => (&trimmed[..trimmed.len() - 1], 1_u64 << 30),
        Some('T') => (&trimmed[..trimmed.len() - 1], 1_u64 << 40),
        Some(_) => (trimmed, 1),
        None => return Err(invalid()),
    };
    let value = digits.trim().parse::<u64>().map_err(|_| invalid())?;
    let bytes = value.checked_mul(factor).ok_or_else(invalid)?;
    Ok(clamp_size_bound(bytes))
}

pub(crate) fn clamp_size_bound(bound: u64) -> u64 {
    bound.max(MINIMUM_SIZE_BOUND)
}
