use serde::Serialize;

/// Scalar values that can be stored in a record field or bound as a statement parameter.
///
/// ```rust
/// use sql_record::RowValues;
///
/// let params: Vec<RowValues> = vec![1.into(), "alice".into(), true.into(), None::<i64>.into()];
/// assert!(params[3].is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// NULL value
    Null,
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    /// Booleans come back from most drivers as `0`/`1` integers.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RowValues::Bool(value) => Some(*value),
            RowValues::Int(1) => Some(true),
            RowValues::Int(0) => Some(false),
            _ => None,
        }
    }

    /// Floats bound as text (see [`ParamType::infer`]) are parsed back here.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            RowValues::Float(value) => Some(*value),
            RowValues::Text(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for RowValues {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for RowValues {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for RowValues {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Driver-level type a parameter is bound with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Int,
    Bool,
    Text,
    Null,
}

impl ParamType {
    /// Infer the bind type from a value's runtime type.
    ///
    /// Floating point values are bound as text so the driver never rounds them through its own
    /// numeric conversion; the database applies column affinity on store.
    #[must_use]
    pub fn infer(value: &RowValues) -> Self {
        match value {
            RowValues::Int(_) => Self::Int,
            RowValues::Bool(_) => Self::Bool,
            RowValues::Float(_) | RowValues::Text(_) => Self::Text,
            RowValues::Null => Self::Null,
        }
    }
}

/// One `(placeholder, value, type)` entry of a statement's bind list.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParam {
    /// Placeholder including its `:` prefix, e.g. `:p1`.
    pub name: String,
    pub value: RowValues,
    pub ty: ParamType,
}

impl BoundParam {
    #[must_use]
    pub fn new(name: impl Into<String>, value: RowValues) -> Self {
        let ty = ParamType::infer(&value);
        Self {
            name: name.into(),
            value,
            ty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_are_bound_as_text() {
        assert_eq!(ParamType::infer(&RowValues::Float(5.29)), ParamType::Text);
        assert_eq!(ParamType::infer(&RowValues::Int(5)), ParamType::Int);
        assert_eq!(ParamType::infer(&RowValues::Bool(false)), ParamType::Bool);
        assert_eq!(ParamType::infer(&RowValues::Null), ParamType::Null);
        assert_eq!(ParamType::infer(&"x".into()), ParamType::Text);
    }

    #[test]
    fn option_conversion_maps_none_to_null() {
        assert_eq!(RowValues::from(None::<&str>), RowValues::Null);
        assert_eq!(RowValues::from(Some(3)), RowValues::Int(3));
    }

    #[test]
    fn accessors_tolerate_driver_representations() {
        assert_eq!(RowValues::Int(1).as_bool(), Some(true));
        assert_eq!(RowValues::Int(7).as_bool(), None);
        assert_eq!(RowValues::Text("5.29".into()).as_float(), Some(5.29));
        assert_eq!(RowValues::Text("abc".into()).as_float(), None);
    }

    #[test]
    fn values_serialize_untagged() {
        let json = serde_json::to_string(&vec![
            RowValues::Int(1),
            RowValues::Text("a".into()),
            RowValues::Bool(true),
            RowValues::Null,
        ])
        .unwrap();
        assert_eq!(json, r#"[1,"a",true,null]"#);
    }
}
