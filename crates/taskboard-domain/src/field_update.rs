/// Three-state update for an optional field.
///
/// ```
/// use taskboard_domain::FieldUpdate;
///
/// let mut due = Some(3);
/// FieldUpdate::Set(7).apply_to(&mut due);
/// assert_eq!(due, Some(7));
///
/// FieldUpdate::<i32>::Clear.apply_to(&mut due);
/// assert_eq!(due, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldUpdate<T> {
    /// Keep the existing value
    #[default]
    NoChange,
    Set(T),
    /// Reset to `None`
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

impl<T> From<Option<T>> for FieldUpdate<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(value) => FieldUpdate::Set(value),
            None => FieldUpdate::Clear,
        }
    }
}
