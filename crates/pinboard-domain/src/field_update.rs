/// Partial update of an optional field.
///
/// Commands store one of these per optional column so that an update can
/// leave a field alone, set it, or empty it, and so that its inverse can be
/// computed before it is applied.
///
/// ```
/// use pinboard_domain::FieldUpdate;
///
/// let mut label = Some("by train".to_string());
/// FieldUpdate::<String>::NoChange.apply_to(&mut label);
/// assert_eq!(label.as_deref(), Some("by train"));
/// FieldUpdate::<String>::Clear.apply_to(&mut label);
/// assert_eq!(label, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldUpdate<T> {
    #[default]
    NoChange,
    Set(T),
    Clear,
}

impl<T> FieldUpdate<T> {
    pub fn apply_to(self, field: &mut Option<T>) {
        match self {
            FieldUpdate::NoChange => {}
            FieldUpdate::Set(value) => *field = Some(value),
            FieldUpdate::Clear => *field = None,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, FieldUpdate::NoChange)
    }
}

impl<T: Clone> FieldUpdate<T> {
    /// The update that puts `current` back after `self` has been applied.
    ///
    /// `NoChange` stays `NoChange` so that undoing a partial update never
    /// touches fields the update did not touch.
    pub fn inverse(&self, current: &Option<T>) -> FieldUpdate<T> {
        if self.is_change() {
            FieldUpdate::from(current.clone())
        } else {
            FieldUpdate::NoChange
        }
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    /// `None` clears the field.
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(value) => FieldUpdate::Set(value),
            None => FieldUpdate::Clear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_of_set_restores_previous() {
        let mut field = Some("before".to_string());
        let update = FieldUpdate::Set("after".to_string());
        let undo = update.inverse(&field);

        update.apply_to(&mut field);
        assert_eq!(field.as_deref(), Some("after"));

        undo.apply_to(&mut field);
        assert_eq!(field.as_deref(), Some("before"));
    }

    #[test]
    fn test_inverse_of_set_on_empty_is_clear() {
        let field: Option<String> = None;
        let undo = FieldUpdate::Set("x".to_string()).inverse(&field);
        assert_eq!(undo, FieldUpdate::Clear);
    }

    #[test]
    fn test_inverse_of_no_change_is_no_change() {
        let field = Some(1);
        assert_eq!(FieldUpdate::NoChange.inverse(&field), FieldUpdate::NoChange);
    }
}
