/* Type descriptors as they appear in a dex string table, e.g. Ljava/lang/Object; */

use nom::branch::alt;
use nom::bytes::complete::take_while1;
use nom::character::complete::{char, one_of};
use nom::combinator::{all_consuming, map};
use nom::multi::many0;
use nom::sequence::{delimited, preceded};
use nom::IResult;
use serde::Serialize;
use std::fmt;

use crate::dex::error::{DexError, DexResult};

/// Primitive kind of a descriptor, `NotPrimitive` for references and arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    NotPrimitive,
    Void,
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

/// A parsed field or return type descriptor.
///
/// # Examples
///
/// ```
///  use dexview::types::TypeSignature;
///
///  let t = TypeSignature::from_descriptor("[Ljava/lang/String;").unwrap();
///  assert_eq!(t.to_java(), "java.lang.String[]");
///  assert_eq!(t.to_descriptor(), "[Ljava/lang/String;");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TypeSignature {
    Void,
    Bool,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    /// Binary class name without the `L` and `;`, e.g. `java/lang/Object`
    Object(String),
    Array(Box<TypeSignature>),
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_descriptor())
    }
}

fn parse_primitive(s: &str) -> IResult<&str, TypeSignature> {
    map(one_of("VZBSCIJFD"), |c| match c {
        'V' => TypeSignature::Void,
        'Z' => TypeSignature::Bool,
        'B' => TypeSignature::Byte,
        'S' => TypeSignature::Short,
        'C' => TypeSignature::Char,
        'I' => TypeSignature::Int,
        'J' => TypeSignature::Long,
        'F' => TypeSignature::Float,
        _ => TypeSignature::Double,
    })(s)
}

fn parse_object(s: &str) -> IResult<&str, TypeSignature> {
    map(delimited(char('L'), take_while1(|c: char| c != ';'), char(';')), |name: &str| {
        TypeSignature::Object(name.to_string())
    })(s)
}

fn parse_array(s: &str) -> IResult<&str, TypeSignature> {
    map(preceded(char('['), parse_typesignature), |t| TypeSignature::Array(Box::new(t)))(s)
}

pub(crate) fn parse_typesignature(s: &str) -> IResult<&str, TypeSignature> {
    alt((parse_primitive, parse_object, parse_array))(s)
}

/// Parse a method descriptor such as `(I[J)V` into parameters and return type.
pub(crate) fn parse_methodsignature(s: &str) -> IResult<&str, (Vec<TypeSignature>, TypeSignature)> {
    let (s, args) = delimited(char('('), many0(parse_typesignature), char(')'))(s)?;
    let (s, result) = parse_typesignature(s)?;
    Ok((s, (args, result)))
}

impl TypeSignature {
    pub fn from_descriptor(s: &str) -> DexResult<TypeSignature> {
        all_consuming(parse_typesignature)(s)
            .map(|(_, t)| t)
            .map_err(|_| DexError::MalformedDescriptor(s.to_string()))
    }

    pub fn to_descriptor(&self) -> String {
        match self {
            TypeSignature::Void => "V".to_string(),
            TypeSignature::Bool => "Z".to_string(),
            TypeSignature::Byte => "B".to_string(),
            TypeSignature::Short => "S".to_string(),
            TypeSignature::Char => "C".to_string(),
            TypeSignature::Int => "I".to_string(),
            TypeSignature::Long => "J".to_string(),
            TypeSignature::Float => "F".to_string(),
            TypeSignature::Double => "D".to_string(),
            TypeSignature::Object(o) => format!("L{};", o),
            TypeSignature::Array(a) => "[".to_string() + &a.to_descriptor(),
        }
    }

    pub fn to_java(&self) -> String {
        match self {
            TypeSignature::Void => "void".to_string(),
            TypeSignature::Bool => "boolean".to_string(),
            TypeSignature::Byte => "byte".to_string(),
            TypeSignature::Short => "short".to_string(),
            TypeSignature::Char => "char".to_string(),
            TypeSignature::Int => "int".to_string(),
            TypeSignature::Long => "long".to_string(),
            TypeSignature::Float => "float".to_string(),
            TypeSignature::Double => "double".to_string(),
            TypeSignature::Object(o) => o.replace('/', "."),
            TypeSignature::Array(a) => format!("{}[]", a.to_java()),
        }
    }

    pub fn primitive_type(&self) -> PrimitiveType {
        match self {
            TypeSignature::Void => PrimitiveType::Void,
            TypeSignature::Bool => PrimitiveType::Boolean,
            TypeSignature::Byte => PrimitiveType::Byte,
            TypeSignature::Short => PrimitiveType::Short,
            TypeSignature::Char => PrimitiveType::Char,
            TypeSignature::Int => PrimitiveType::Int,
            TypeSignature::Long => PrimitiveType::Long,
            TypeSignature::Float => PrimitiveType::Float,
            TypeSignature::Double => PrimitiveType::Double,
            TypeSignature::Object(_) | TypeSignature::Array(_) => PrimitiveType::NotPrimitive,
        }
    }

    /// The shorty character: the descriptor for primitives, `L` for any reference.
    pub fn shorty(&self) -> char {
        match self {
            TypeSignature::Object(_) | TypeSignature::Array(_) => 'L',
            other => other.to_descriptor().chars().next().unwrap_or('V'),
        }
    }
}

/// Parse a full `(params)ret` method descriptor.
pub fn parse_method_descriptor(s: &str) -> DexResult<(Vec<TypeSignature>, TypeSignature)> {
    all_consuming(parse_methodsignature)(s)
        .map(|(_, m)| m)
        .map_err(|_| DexError::MalformedDescriptor(s.to_string()))
}
