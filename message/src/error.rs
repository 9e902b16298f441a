#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("wrong frame length (expected {expected}, got {got})")]
    WrongLength { expected: usize, got: usize },

    #[error("field {field} out of range: {value}")]
    FieldOutOfRange { field: &'static str, value: i64 },
}

impl DecodeError {
    #[inline]
    pub fn out_of_range(field: &'static str, value: impl Into<i64>) -> Self {
        Self::FieldOutOfRange {
            field,
            value: value.into(),
        }
    }
}
