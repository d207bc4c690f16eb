/// Paid hours in a standard work day.
pub const WORK_DAY_HOURS: u32 = 8;

/// Unpaid lunch break folded into the scheduled span.
pub const LUNCH_BREAK_MINUTES: u32 = 60;

/// Cap on the per-item error list returned by bulk endpoints.
pub const MAX_BATCH_ERRORS: usize = 20;

// Hardcoded rate defaults, the last tier of the employee -> organization ->
// default fallback chain. Stored as decimal multipliers.
pub const DEFAULT_REGULAR_HOLIDAY_RATE: f64 = 1.0;
pub const DEFAULT_SPECIAL_HOLIDAY_RATE: f64 = 0.3;
pub const DEFAULT_NIGHT_DIFF_PERCENT: f64 = 0.1;
pub const DEFAULT_OVERTIME_REGULAR_RATE: f64 = 1.25;
pub const DEFAULT_OVERTIME_REST_DAY_RATE: f64 = 1.69;
pub const DEFAULT_REGULAR_HOLIDAY_OT_RATE: f64 = 2.0;
pub const DEFAULT_SPECIAL_HOLIDAY_OT_RATE: f64 = 1.69;
