use crate::wasm::WasmType;
use ir::Type;

/// WASM value type holding a value of `ty`; `None` for `void`.
pub fn wasm_type(ty: &Type) -> Option<WasmType> {
    match ty {
        Type::Void => None,
        Type::Real => Some(WasmType::F64),
        Type::Integer | Type::Boolean | Type::String | Type::Array(_) | Type::Unknown(_) => Some(WasmType::I32),
    }
}

/// Like [`wasm_type`] for values known to exist.
pub fn value_type(ty: &Type) -> WasmType {
    wasm_type(ty).unwrap_or(WasmType::I32)
}

/// Suffix of the runtime's per-type I/O helpers, e.g. `$write_real`.
pub fn runtime_suffix(ty: &Type) -> &'static str {
    match ty {
        Type::Real => "real",
        Type::String => "string",
        Type::Boolean => "boolean",
        _ => "integer",
    }
}

/// Bytes before the first element of an array: the element count.
pub const ARRAY_HEADER: u32 = 4;

/// Bytes of the length prefix of a string.
pub const STRING_HEADER: u32 = 4;
