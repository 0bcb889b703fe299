/// Percentage thresholds created for every new goal.
pub const DEFAULT_MILESTONE_PERCENTAGES: [i32; 4] = [25, 50, 75, 100];

/// Thresholds whose achievement awards a streak shield.
pub const SHIELD_AWARD_PERCENTAGES: [i32; 2] = [50, 100];

/// Maximum number of shields an account can hold.
pub const SHIELD_INVENTORY_CAP: i32 = 2;

/// Shields usable (and awardable through journaling) per Monday-Sunday week.
pub const SHIELD_WEEKLY_QUOTA: i64 = 1;

/// How far back the streak replay walks, in days.
pub const STREAK_LOOKBACK_DAYS: i64 = 365;

/// Active-goal allowance when no entitlement record exists.
pub const FREE_TIER_MAX_ACTIVE_GOALS: i32 = 3;

/// Decimal precision for displayed percentages.
pub const PERCENTAGE_DECIMAL_PRECISION: u32 = 2;
