use std::fmt::Display;

use crate::Span;

use super::ast::Expr;

/// Argument Convention
/// How a parameter receives its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Convention {
    Mut,
    Owned,
    Ref,
    Out,
    Read,
    /// Older spelling of `mut`.
    Inout,
}

impl Convention {
    pub fn from_word(word: &str) -> Option<Convention> {
        match word {
            "mut" => Some(Convention::Mut),
            "owned" => Some(Convention::Owned),
            "ref" => Some(Convention::Ref),
            "out" => Some(Convention::Out),
            "read" => Some(Convention::Read),
            "inout" => Some(Convention::Inout),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Convention::Mut => "mut",
            Convention::Owned => "owned",
            Convention::Ref => "ref",
            Convention::Out => "out",
            Convention::Read => "read",
            Convention::Inout => "inout",
        }
    }
}

impl Display for Convention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Symbol Type
/// A plain named type such as `Int`.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolType {
    pub name: String,
    pub span: Span,
}

/// Qualified Type
/// A member of a module or type, such as `DType.float32`.
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedType {
    pub base: Box<TypeExpr>,
    pub member: String,
    pub span: Span,
}

/// Generic Type
/// A parameterized type such as `List[Int]` or `SIMD[DType.uint8, 4]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericType {
    pub base: Box<TypeExpr>,
    pub arguments: Vec<TypeArgument>,
    pub span: Span,
}

/// A type annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Symbol(SymbolType),
    Qualified(QualifiedType),
    Generic(GenericType),
}

impl TypeExpr {
    pub fn get_span(&self) -> Span {
        match self {
            TypeExpr::Symbol(symbol) => symbol.span,
            TypeExpr::Qualified(qualified) => qualified.span,
            TypeExpr::Generic(generic) => generic.span,
        }
    }
}

/// `name = value` inside a type argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordTypeArgument {
    pub name: String,
    pub value: Box<TypeArgument>,
    pub span: Span,
}

/// One entry of a `[...]` list in type position.
///
/// Parameters may be values as well as types, so anything that is not
/// type-shaped is kept as an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeArgument {
    Type(TypeExpr),
    Expr(Expr),
    Keyword(KeywordTypeArgument),
}

impl TypeArgument {
    pub fn get_span(&self) -> Span {
        match self {
            TypeArgument::Type(ty) => ty.get_span(),
            TypeArgument::Expr(expr) => expr.get_span(),
            TypeArgument::Keyword(keyword) => keyword.span,
        }
    }
}

impl From<Expr> for TypeArgument {
    fn from(expr: Expr) -> Self {
        match TypeExpr::try_from(&expr) {
            Ok(ty) => TypeArgument::Type(ty),
            Err(()) => TypeArgument::Expr(expr),
        }
    }
}

/// Names, attribute chains and subscripted names are type-shaped.
impl TryFrom<&Expr> for TypeExpr {
    type Error = ();

    fn try_from(expr: &Expr) -> Result<Self, Self::Error> {
        match expr {
            Expr::Symbol(symbol) => Ok(TypeExpr::Symbol(SymbolType {
                name: symbol.value.clone(),
                span: symbol.span,
            })),
            Expr::NoneLiteral(none) => Ok(TypeExpr::Symbol(SymbolType {
                name: String::from("None"),
                span: none.span,
            })),
            Expr::Attribute(attribute) => Ok(TypeExpr::Qualified(QualifiedType {
                base: Box::new(TypeExpr::try_from(attribute.object.as_ref())?),
                member: attribute.attribute.clone(),
                span: attribute.span,
            })),
            Expr::Subscript(subscript) => {
                let base = TypeExpr::try_from(subscript.object.as_ref())?;
                if subscript
                    .indices
                    .iter()
                    .any(|index| matches!(index, Expr::Slice(_)))
                {
                    return Err(());
                }

                Ok(TypeExpr::Generic(GenericType {
                    base: Box::new(base),
                    arguments: subscript
                        .indices
                        .iter()
                        .cloned()
                        .map(TypeArgument::from)
                        .collect(),
                    span: subscript.span,
                }))
            }
            _ => Err(()),
        }
    }
}
