//! Element types and the unification rules between them.
//!
//! Numeric literals in a query carry no declared type. They start out as one
//! of the three literal-constant kinds and adopt the concrete kind of the
//! operand they meet. Two different concrete kinds never unify: a `float32`
//! compared with an `int64` is an error, not an implicit cast.

use std::{fmt::Display, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Real,
    F16,
    F32,
    F64,
    BF16,
    F8E4M3FN,
    F8E5M2,
    F8E4M3FNUZ,
    F8E5M2FNUZ,
    F4E2M1,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    C64,
    C128,
    Bool,
    String,
    Unknown,
    FloatConstant,
    NegativeIntConstant,
    PositiveIntConstant,
}

impl DType {
    /// Every kind a declaration can name.
    pub const CONCRETE: [DType; 22] = [
        DType::Real,
        DType::F16,
        DType::F32,
        DType::F64,
        DType::BF16,
        DType::F8E4M3FN,
        DType::F8E5M2,
        DType::F8E4M3FNUZ,
        DType::F8E5M2FNUZ,
        DType::F4E2M1,
        DType::I8,
        DType::I16,
        DType::I32,
        DType::I64,
        DType::U8,
        DType::U16,
        DType::U32,
        DType::U64,
        DType::C64,
        DType::C128,
        DType::Bool,
        DType::String,
    ];

    pub const CONSTANTS: [DType; 3] = [
        DType::FloatConstant,
        DType::NegativeIntConstant,
        DType::PositiveIntConstant,
    ];

    pub fn is_constant(self) -> bool {
        matches!(
            self,
            DType::FloatConstant | DType::NegativeIntConstant | DType::PositiveIntConstant
        )
    }

    /// Floating-point kinds, including the abstract `Real`.
    pub fn is_float(self) -> bool {
        matches!(
            self,
            DType::Real
                | DType::F16
                | DType::F32
                | DType::F64
                | DType::BF16
                | DType::F8E4M3FN
                | DType::F8E5M2
                | DType::F8E4M3FNUZ
                | DType::F8E5M2FNUZ
                | DType::F4E2M1
        )
    }

    pub fn is_signed_int(self) -> bool {
        matches!(self, DType::I8 | DType::I16 | DType::I32 | DType::I64)
    }

    pub fn is_unsigned_int(self) -> bool {
        matches!(self, DType::U8 | DType::U16 | DType::U32 | DType::U64)
    }

    pub fn is_integer(self) -> bool {
        self.is_signed_int() || self.is_unsigned_int()
    }

    pub fn is_complex(self) -> bool {
        matches!(self, DType::C64 | DType::C128)
    }

    pub fn is_numeric(self) -> bool {
        self.is_float() || self.is_integer() || self.is_complex() || self.is_constant()
    }

    /// Neither a literal-constant kind nor `Unknown`.
    pub fn is_concrete(self) -> bool {
        !self.is_constant() && self != DType::Unknown
    }

    /// How restrictive a literal kind is; higher wins when two literals meet.
    fn constant_rank(self) -> u8 {
        match self {
            DType::PositiveIntConstant => 1,
            DType::NegativeIntConstant => 2,
            DType::FloatConstant => 3,
            _ => 0,
        }
    }
}

/// Whether the literal kind `const_dt` may adopt the concrete kind `var_dt`.
pub fn same_family(var_dt: DType, const_dt: DType) -> bool {
    match const_dt {
        DType::FloatConstant => var_dt.is_float(),
        DType::PositiveIntConstant => var_dt.is_integer() || var_dt.is_float(),
        DType::NegativeIntConstant => var_dt.is_signed_int() || var_dt.is_float(),
        _ => false,
    }
}

/// Strict equality of two concrete kinds.
pub fn same_type(a: DType, b: DType) -> bool {
    a.is_concrete() && a == b
}

pub fn is_constant(dt: DType) -> bool {
    dt.is_constant()
}

/// The kind two operands settle on, or `None` when they are incompatible.
///
/// `Unknown` absorbs into the other side so that an error already reported
/// for a sub-expression does not cascade into its parents.
pub fn unify(a: DType, b: DType) -> Option<DType> {
    if a == b {
        return Some(a);
    }

    match (a, b) {
        (DType::Unknown, other) | (other, DType::Unknown) => Some(other),
        (a, b) if a.is_constant() && b.is_constant() => {
            if a.constant_rank() >= b.constant_rank() {
                Some(a)
            } else {
                Some(b)
            }
        }
        (concrete, constant) | (constant, concrete) if constant.is_constant() => {
            if same_family(concrete, constant) {
                Some(concrete)
            } else {
                None
            }
        }
        _ => None,
    }
}

impl Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DType::Real => "Real",
            DType::F16 => "float16",
            DType::F32 => "float32",
            DType::F64 => "float64",
            DType::BF16 => "bfloat16",
            DType::F8E4M3FN => "float8e4m3fn",
            DType::F8E5M2 => "float8e5m2",
            DType::F8E4M3FNUZ => "float8e4m3fnuz",
            DType::F8E5M2FNUZ => "float8e5m2fnuz",
            DType::F4E2M1 => "float4e2m1",
            DType::I8 => "int8",
            DType::I16 => "int16",
            DType::I32 => "int32",
            DType::I64 => "int64",
            DType::U8 => "uint8",
            DType::U16 => "uint16",
            DType::U32 => "uint32",
            DType::U64 => "uint64",
            DType::C64 => "complex64",
            DType::C128 => "complex128",
            DType::Bool => "bool",
            DType::String => "string",
            DType::Unknown => "unknown",
            DType::FloatConstant => "float-constant",
            DType::NegativeIntConstant => "negative-int-constant",
            DType::PositiveIntConstant => "positive-int-constant",
        };
        write!(f, "{}", name)
    }
}

/// Parses the element type names a declaration may use.
impl FromStr for DType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DType::CONCRETE
            .iter()
            .copied()
            .find(|dtype| dtype.to_string() == s)
            .ok_or_else(|| s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_constant_family() {
        assert!(same_family(DType::F32, DType::FloatConstant));
        assert!(same_family(DType::Real, DType::FloatConstant));
        assert!(same_family(DType::BF16, DType::FloatConstant));
        assert!(!same_family(DType::I32, DType::FloatConstant));
        assert!(!same_family(DType::U8, DType::FloatConstant));
    }

    #[test]
    fn test_positive_int_constant_family() {
        for dtype in [DType::I8, DType::U8, DType::U64, DType::F16, DType::Real] {
            assert!(same_family(dtype, DType::PositiveIntConstant), "{}", dtype);
        }
        assert!(!same_family(DType::Bool, DType::PositiveIntConstant));
        assert!(!same_family(DType::C64, DType::PositiveIntConstant));
    }

    #[test]
    fn test_negative_int_constant_family() {
        assert!(same_family(DType::I64, DType::NegativeIntConstant));
        assert!(same_family(DType::F64, DType::NegativeIntConstant));
        for dtype in [DType::U8, DType::U16, DType::U32, DType::U64] {
            assert!(!same_family(dtype, DType::NegativeIntConstant), "{}", dtype);
        }
    }

    #[test]
    fn test_same_type_is_strict() {
        assert!(same_type(DType::F32, DType::F32));
        assert!(!same_type(DType::F32, DType::F64));
        assert!(!same_type(DType::Unknown, DType::Unknown));
        assert!(!same_type(DType::FloatConstant, DType::FloatConstant));
    }

    #[test]
    fn test_unify_constants_pick_most_restrictive() {
        assert_eq!(
            unify(DType::PositiveIntConstant, DType::NegativeIntConstant),
            Some(DType::NegativeIntConstant)
        );
        assert_eq!(
            unify(DType::NegativeIntConstant, DType::FloatConstant),
            Some(DType::FloatConstant)
        );
        assert_eq!(
            unify(DType::PositiveIntConstant, DType::PositiveIntConstant),
            Some(DType::PositiveIntConstant)
        );
    }

    #[test]
    fn test_unify_pins_constants_to_concrete() {
        assert_eq!(unify(DType::FloatConstant, DType::F32), Some(DType::F32));
        assert_eq!(unify(DType::U8, DType::PositiveIntConstant), Some(DType::U8));
        assert_eq!(unify(DType::U8, DType::NegativeIntConstant), None);
        assert_eq!(unify(DType::I32, DType::FloatConstant), None);
    }

    #[test]
    fn test_unify_concrete_requires_equality() {
        assert_eq!(unify(DType::F32, DType::F32), Some(DType::F32));
        assert_eq!(unify(DType::F32, DType::I64), None);
        assert_eq!(unify(DType::F32, DType::F64), None);
    }

    #[test]
    fn test_unknown_absorbs() {
        assert_eq!(unify(DType::Unknown, DType::I8), Some(DType::I8));
        assert_eq!(unify(DType::FloatConstant, DType::Unknown), Some(DType::FloatConstant));
    }

    #[test]
    fn test_dtype_names_round_trip() {
        for dtype in DType::CONCRETE {
            assert_eq!(dtype.to_string().parse::<DType>(), Ok(dtype));
        }
        assert!("float-constant".parse::<DType>().is_err());
        assert!("unknown".parse::<DType>().is_err());
    }
}
