// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Minutes of the simulated day.
//!
//! The day starts at 3:00 AM: minute 1 is 3:00 AM and minute 1440 is 2:59 AM the next day.

/// A minute of the simulated day, between 1 and 1440.
pub type Minute = i32;

/// Number of minutes between midnight and the start of the simulated day.
pub const MINUTES_BEFORE_DAY_START: i32 = 180;

pub const THREE_AM: Minute = 1;
pub const FIVE_AM: Minute = 121;
pub const SIX_AM: Minute = 181;
pub const SEVEN_AM: Minute = 241;
pub const EIGHT_AM: Minute = 301;
pub const NINE_AM: Minute = 361;
pub const THREE_PM: Minute = 721;
pub const FOUR_PM: Minute = 781;
pub const FIVE_PM: Minute = 841;
pub const SIX_PM: Minute = 901;
pub const NINE_PM: Minute = 1081;
pub const ELEVEN_PM: Minute = 1201;
pub const MINUTES_IN_A_DAY: Minute = 1440;

/// Returns the minute of the simulated day corresponding to the start of the given hour (between
/// 0 and 23).
///
/// ```
/// use pathtype_core::time::{minute_of_hour, EIGHT_AM, THREE_AM};
/// assert_eq!(minute_of_hour(3), THREE_AM);
/// assert_eq!(minute_of_hour(8), EIGHT_AM);
/// assert_eq!(minute_of_hour(2), 1381);
/// ```
pub const fn minute_of_hour(hour: i32) -> Minute {
    (hour - 3).rem_euclid(24) * 60 + 1
}

/// Returns `true` if `start < minute <= end`.
pub const fn is_left_exclusive_between(minute: Minute, start: Minute, end: Minute) -> bool {
    minute > start && minute <= end
}

/// Converts a minute of the simulated day to a number of minutes after midnight.
///
/// The result can exceed 1440 for minutes after midnight of the simulated day.
pub const fn minutes_after_midnight(minute: Minute) -> i32 {
    minute + MINUTES_BEFORE_DAY_START
}
