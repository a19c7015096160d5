//! Alarm boundary arithmetic
//!
//! Pure functions mapping elapsed-minute counts to alarm boundaries. The
//! live tick path only ever asks about a single minute; reconciliation
//! after a suspend gap asks about an arbitrary minute range.

/// True iff `minute_count` lands exactly on an alarm boundary
///
/// A boundary is a positive multiple of the configured interval. An
/// interval of zero is a configuration error and never signals.
pub fn crosses_boundary(minute_count: u64, interval_minutes: u32) -> bool {
    if interval_minutes == 0 {
        return false;
    }
    minute_count > 0 && minute_count % u64::from(interval_minutes) == 0
}

/// First alarm boundary in `(old_minutes, new_minutes]`, if any
///
/// Constant-time arithmetic, so a multi-day gap costs the same as a
/// one-minute gap.
pub fn first_boundary_crossed(
    old_minutes: u64,
    new_minutes: u64,
    interval_minutes: u32,
) -> Option<u64> {
    if interval_minutes == 0 || new_minutes <= old_minutes {
        return None;
    }
    let interval = u64::from(interval_minutes);
    let candidate = (old_minutes / interval + 1) * interval;
    if candidate <= new_minutes {
        Some(candidate)
    } else {
        None
    }
}

/// All alarm boundaries in `(old_minutes, new_minutes]`, ascending
///
/// Derived from the multiple indices rather than scanning every minute
/// of the range.
pub fn boundaries_crossed(old_minutes: u64, new_minutes: u64, interval_minutes: u32) -> Vec<u64> {
    if interval_minutes == 0 || new_minutes <= old_minutes {
        return Vec::new();
    }
    let interval = u64::from(interval_minutes);
    let first_multiple = old_minutes / interval + 1;
    let last_multiple = new_minutes / interval;
    (first_multiple..=last_multiple)
        .map(|index| index * interval)
        .collect()
}
