/// Decimal places of the invested-capital history points (whole currency units).
pub const HISTORY_DECIMAL_PRECISION: u32 = 0;

/// Default chart label for a month, e.g. `Aug/25`.
pub const DEFAULT_MONTH_LABEL_FORMAT: &str = "%b/%y";

/// Default time zone used to derive "today" when the caller does not inject a date.
pub const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";

/// Number of years before the current one covered by the trailing window.
pub const TRAILING_WINDOW_YEARS: i32 = 2;
