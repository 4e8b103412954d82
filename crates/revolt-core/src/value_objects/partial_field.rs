//! Three-state field used by every partial update
//!
//! A field in an update is either absent (leave the cached value alone),
//! present with a value (overwrite), or named in the clear list (reset to
//! the type's zero value).

/// One field of a partial update
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PartialField<T> {
    /// Field was not mentioned; the cached value is kept
    #[default]
    Untouched,
    /// Field carries a replacement value
    Set(T),
    /// Field was explicitly cleared
    Cleared,
}

impl<T> PartialField<T> {
    /// Combine a payload value and a clear flag
    ///
    /// Payload values are applied before the clear list, so a field that is
    /// both set and cleared ends up cleared.
    #[must_use]
    pub fn from_parts(value: Option<T>, cleared: bool) -> Self {
        if cleared {
            Self::Cleared
        } else {
            value.map_or(Self::Untouched, Self::Set)
        }
    }

    /// Check whether the field leaves the cached value alone
    #[must_use]
    pub fn is_untouched(&self) -> bool {
        matches!(self, Self::Untouched)
    }

    /// Write the field into `target`
    pub fn apply_to(self, target: &mut T)
    where
        T: Default,
    {
        match self {
            Self::Untouched => {}
            Self::Set(value) => *target = value,
            Self::Cleared => *target = T::default(),
        }
    }
}

impl<T> PartialField<Option<T>> {
    /// Combine a payload value and a clear flag for an optional field
    #[must_use]
    pub fn from_optional(value: Option<T>, cleared: bool) -> Self {
        Self::from_parts(value.map(Some), cleared)
    }
}

impl<T> From<Option<T>> for PartialField<T> {
    fn from(value: Option<T>) -> Self {
        Self::from_parts(value, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untouched_keeps_value() {
        let mut name = String::from("general");
        PartialField::<String>::Untouched.apply_to(&mut name);
        assert_eq!(name, "general");
    }

    #[test]
    fn test_set_overwrites() {
        let mut name = String::from("general");
        PartialField::Set("random".to_string()).apply_to(&mut name);
        assert_eq!(name, "random");
    }

    #[test]
    fn test_cleared_resets_to_default() {
        let mut topic = Some("hello".to_string());
        PartialField::<Option<String>>::Cleared.apply_to(&mut topic);
        assert_eq!(topic, None);

        let mut nsfw = true;
        PartialField::<bool>::Cleared.apply_to(&mut nsfw);
        assert!(!nsfw);
    }

    #[test]
    fn test_clear_wins_over_value() {
        let field = PartialField::from_parts(Some(5u32), true);
        assert_eq!(field, PartialField::Cleared);

        let field = PartialField::from_parts(Some(5u32), false);
        assert_eq!(field, PartialField::Set(5));

        let field = PartialField::<u32>::from_parts(None, false);
        assert!(field.is_untouched());
    }

    #[test]
    fn test_optional_field() {
        let mut icon = Some("old".to_string());
        PartialField::from_optional(Some("new".to_string()), false).apply_to(&mut icon);
        assert_eq!(icon.as_deref(), Some("new"));

        PartialField::from_optional(None::<String>, true).apply_to(&mut icon);
        assert!(icon.is_none());
    }
}
