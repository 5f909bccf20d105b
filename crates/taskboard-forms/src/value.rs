// File: src/value.rs
// Purpose: Display-string coercion used by required-field checks

use std::borrow::Cow;

/// Display string form of a field value
///
/// `None` means the value is absent, which validation treats like an empty
/// string. Numbers and booleans always display, so `0` and `false` count as
/// present.
pub trait FieldValue {
    fn field_text(&self) -> Option<Cow<'_, str>>;
}

impl FieldValue for str {
    fn field_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self))
    }
}

impl FieldValue for String {
    fn field_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.as_str()))
    }
}

impl FieldValue for Cow<'_, str> {
    fn field_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.as_ref()))
    }
}

impl<T: FieldValue + ?Sized> FieldValue for &T {
    fn field_text(&self) -> Option<Cow<'_, str>> {
        (**self).field_text()
    }
}

impl<T: FieldValue + ?Sized> FieldValue for Box<T> {
    fn field_text(&self) -> Option<Cow<'_, str>> {
        (**self).field_text()
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn field_text(&self) -> Option<Cow<'_, str>> {
        self.as_ref().and_then(FieldValue::field_text)
    }
}

macro_rules! display_field_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn field_text(&self) -> Option<Cow<'_, str>> {
                    Some(Cow::Owned(self.to_string()))
                }
            }
        )*
    };
}

display_field_value!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char,
);

#[cfg(test)]
mod tests {
    use super::*;

    fn text<T: FieldValue + ?Sized>(value: &T) -> Option<String> {
        value.field_text().map(Cow::into_owned)
    }

    #[test]
    fn test_strings_borrow() {
        assert_eq!(text("abc"), Some("abc".to_string()));
        assert_eq!(text(&String::from("  ")), Some("  ".to_string()));
    }

    #[test]
    fn test_option_none_is_absent() {
        let none: Option<String> = None;
        assert_eq!(text(&none), None);
        assert_eq!(text(&Some(3_i64)), Some("3".to_string()));
    }

    #[test]
    fn test_zero_and_false_display() {
        assert_eq!(text(&0_u32), Some("0".to_string()));
        assert_eq!(text(&false), Some("false".to_string()));
    }
}
