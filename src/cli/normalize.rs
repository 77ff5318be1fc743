use chrono::NaiveDate;
use std::fmt::Display;

use crate::common::Milestone;

/// A value that can appear in the attribute table
pub trait FieldValue: Display {
    /// Whether the value should be replaced by the row's default
    fn is_blank(&self) -> bool;
}

impl FieldValue for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

// `false` is an answer in its own right and is rendered as such.
impl FieldValue for bool {
    fn is_blank(&self) -> bool {
        false
    }
}

impl FieldValue for i64 {
    fn is_blank(&self) -> bool {
        false
    }
}

impl FieldValue for NaiveDate {
    fn is_blank(&self) -> bool {
        false
    }
}

impl FieldValue for Milestone {
    fn is_blank(&self) -> bool {
        self.title.is_empty()
    }
}

impl<T: FieldValue> FieldValue for &T {
    fn is_blank(&self) -> bool {
        (**self).is_blank()
    }
}

/// Render `value`, or `default` when it is absent or blank
pub fn or_default<T: FieldValue>(value: Option<T>, default: &str) -> String {
    match value {
        Some(value) if !value.is_blank() => value.to_string(),
        _ => default.to_string(),
    }
}
