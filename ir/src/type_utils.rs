// Type name resolution and storage widths

use crate::types::Type;

impl Type {
    /// Map a declared type onto the IR type. `int` and `bool` are accepted
    /// as short spellings.
    pub fn from_cst(declared: &model::Type) -> Type {
        let base = match declared.base_name.as_str() {
            "integer" | "int" => Type::Integer,
            "real" => Type::Real,
            "string" => Type::String,
            "boolean" | "bool" => Type::Boolean,
            "void" if !declared.is_array => Type::Void,
            other => Type::Unknown(other.to_string()),
        };
        if declared.is_array { Type::Array(Box::new(base)) } else { base }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_))
    }

    pub fn element(&self) -> Option<&Type> {
        match self {
            Type::Array(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Integer | Type::Real)
    }

    /// Types a variable or array element may hold.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Type::Integer | Type::Real | Type::String | Type::Boolean)
    }

    /// Whether a variable can be declared with this type.
    pub fn is_storable(&self) -> bool {
        match self {
            Type::Array(element) => element.is_scalar(),
            other => other.is_scalar(),
        }
    }

    /// Bytes one value occupies inside an array or memory slot.
    pub fn byte_width(&self) -> u32 {
        match self {
            Type::Real => 8,
            _ => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_aliases() {
        assert_eq!(Type::from_cst(&model::Type::scalar("int")), Type::Integer);
        assert_eq!(Type::from_cst(&model::Type::scalar("bool")), Type::Boolean);
        assert_eq!(Type::from_cst(&model::Type::void()), Type::Void);
    }

    #[test]
    fn array_types_are_suffixed() {
        let declared = model::Type { base_name: "integer".into(), is_array: true, size_expr: None };
        let ty = Type::from_cst(&declared);
        assert_eq!(ty, Type::Array(Box::new(Type::Integer)));
        assert_eq!(ty.to_string(), "integer_arr");
        assert_ne!(ty, Type::Integer);
    }

    #[test]
    fn unknown_names_are_kept() {
        let ty = Type::from_cst(&model::Type::scalar("char"));
        assert_eq!(ty, Type::Unknown("char".into()));
        assert!(!ty.is_storable());
    }

    #[test]
    fn widths() {
        assert_eq!(Type::Real.byte_width(), 8);
        assert_eq!(Type::Boolean.byte_width(), 4);
    }
}
