//! Daemon schedule validation
//!
//! The scheduler takes six whitespace-separated fields:
//! `second minute hour day-of-month month day-of-week`. Each field is a
//! comma-separated list of items, and each item is `*`, `?`, a value, or an
//! inclusive `low-high` range, optionally followed by `/step`. Months and
//! weekdays also accept three-letter names (`JAN`, `MON`).

use crate::errors::ConfigError;

struct Field {
    name: &'static str,
    min: u32,
    max: u32,
    // Names for min, min + 1, ...
    names: &'static [&'static str],
}

const MONTHS: &[&str] = &[
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];
const WEEKDAYS: &[&str] = &["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

const FIELDS: [Field; 6] = [
    Field { name: "second", min: 0, max: 59, names: &[] },
    Field { name: "minute", min: 0, max: 59, names: &[] },
    Field { name: "hour", min: 0, max: 23, names: &[] },
    Field { name: "day-of-month", min: 1, max: 31, names: &[] },
    Field { name: "month", min: 1, max: 12, names: MONTHS },
    Field { name: "day-of-week", min: 0, max: 7, names: WEEKDAYS },
];

/// Checks `expr` is a schedule the daemon can run.
pub fn validate_schedule(expr: &str) -> Result<(), ConfigError> {
    let parts: Vec<&str> = expr.split_whitespace().collect();
    if parts.len() != FIELDS.len() {
        return Err(schedule_error(format!(
            "expected 6 fields (second minute hour day-of-month month day-of-week), got {} in '{}'",
            parts.len(),
            expr
        )));
    }

    for (part, field) in parts.iter().zip(FIELDS.iter()) {
        for item in part.split(',') {
            field.check_item(item).map_err(schedule_error)?;
        }
    }

    Ok(())
}

impl Field {
    fn check_item(&self, item: &str) -> Result<(), String> {
        let (base, step) = match item.split_once('/') {
            Some((base, step)) => (base, Some(step)),
            None => (item, None),
        };

        if let Some(step) = step {
            let span = self.max - self.min + 1;
            match step.parse::<u32>() {
                Ok(step) if step >= 1 && step <= span => {}
                _ => {
                    return Err(format!(
                        "{} step '{}' must be between 1 and {}",
                        self.name, step, span
                    ))
                }
            }
        }

        if base == "*" || base == "?" {
            return Ok(());
        }

        match base.split_once('-') {
            Some((low, high)) => {
                let low = self.value(low)?;
                let high = self.value(high)?;
                if low > high {
                    return Err(format!("{} range '{}' runs backwards", self.name, base));
                }
                Ok(())
            }
            None => self.value(base).map(|_| ()),
        }
    }

    fn value(&self, raw: &str) -> Result<u32, String> {
        if raw.is_empty() {
            return Err(format!("{} has an empty value", self.name));
        }

        let value = match raw.parse::<u32>() {
            Ok(value) => value,
            Err(_) => self
                .names
                .iter()
                .position(|name| name.eq_ignore_ascii_case(raw))
                .map(|index| index as u32 + self.min)
                .ok_or_else(|| format!("{} value '{}' is not a number", self.name, raw))?,
        };

        if value < self.min || value > self.max {
            return Err(format!(
                "{} value {} is outside {}-{}",
                self.name, value, self.min, self.max
            ));
        }
        Ok(value)
    }
}

fn schedule_error(reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        field: "schedule".to_string(),
        reason,
    }
}
