use rusqlite::types::Value;

use crate::types::{ParamType, RowValues};

/// Convert a [`RowValues`] to the rusqlite value it is bound as.
///
/// The bind type decides the representation: floats arrive with [`ParamType::Text`] and are
/// bound as their decimal text, booleans become `0`/`1`.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues, ty: ParamType) -> Value {
    match (ty, value) {
        (ParamType::Null, _) | (_, RowValues::Null) => Value::Null,
        (ParamType::Int | ParamType::Bool, RowValues::Bool(b)) => Value::Integer(i64::from(*b)),
        (ParamType::Int | ParamType::Bool, RowValues::Int(i)) => Value::Integer(*i),
        (ParamType::Text, RowValues::Text(s)) => Value::Text(s.clone()),
        (ParamType::Text, RowValues::Float(f)) => Value::Text(f.to_string()),
        (ParamType::Text, RowValues::Int(i)) => Value::Text(i.to_string()),
        (ParamType::Text, RowValues::Bool(b)) => Value::Text(i64::from(*b).to_string()),
        (ParamType::Int | ParamType::Bool, RowValues::Float(f)) => Value::Real(*f),
        (ParamType::Int | ParamType::Bool, RowValues::Text(s)) => Value::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_bound_as_text_keeps_its_digits() {
        let v = RowValues::Float(5.29);
        assert_eq!(
            row_value_to_sqlite_value(&v, ParamType::infer(&v)),
            Value::Text("5.29".into())
        );
    }

    #[test]
    fn bools_and_nulls() {
        assert_eq!(
            row_value_to_sqlite_value(&RowValues::Bool(true), ParamType::Bool),
            Value::Integer(1)
        );
        assert_eq!(
            row_value_to_sqlite_value(&RowValues::Int(3), ParamType::Null),
            Value::Null
        );
    }
}
