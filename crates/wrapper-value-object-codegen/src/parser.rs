//! Field specification parser.
//!
//! The attribute argument list is a small positional grammar:
//!
//! ```text
//! args   := (arg ("," arg)*)? ","?
//! arg    := name | type | option
//! name   := string literal, names the next type
//! option := ident "=" expr
//! ```
//!
//! A type argument takes the pending name (`"Value"` when none is pending).
//! Options may appear anywhere except between a name and its type.

use heck::{ToSnakeCase, ToUpperCamelCase};
use proc_macro2::{Span, TokenStream};
use syn::parse::{Parse, ParseStream, Parser};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Expr, Ident, Lit, LitStr, Token, Type};

use crate::error::{MalformedSpecError, MalformedSpecKind};
use crate::host::DeclarationHost;
use crate::types::{
    DEFAULT_FIELD_NAME, FieldSpec, GenerationOptions, MAX_FIELDS, RESERVED_MEMBER_NAMES, TriBool,
    TypeRef,
};

/// One argument of `#[wrapper_value_object(..)]`.
#[derive(Debug, Clone)]
pub enum AttributeArg {
    Name(LitStr),
    Type(Type),
    Option { name: Ident, value: Expr },
}

impl Parse for AttributeArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(LitStr) {
            return Ok(Self::Name(input.parse()?));
        }
        if input.peek(Ident) && input.peek2(Token![=]) && !input.peek2(Token![==]) {
            let name: Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            let value: Expr = input.parse()?;
            return Ok(Self::Option { name, value });
        }
        Ok(Self::Type(input.parse()?))
    }
}

impl AttributeArg {
    fn span(&self) -> Span {
        match self {
            Self::Name(lit) => lit.span(),
            Self::Type(ty) => ty.span(),
            Self::Option { name, .. } => name.span(),
        }
    }
}

/// Split an attribute's token stream into arguments.
pub fn parse_args(tokens: TokenStream) -> syn::Result<Vec<AttributeArg>> {
    let args = Punctuated::<AttributeArg, Token![,]>::parse_terminated.parse2(tokens)?;
    Ok(args.into_iter().collect())
}

/// Parse the arguments of one attribute invocation.
pub fn parse(
    args: &[AttributeArg],
    host: &impl DeclarationHost,
) -> Result<(Vec<FieldSpec>, GenerationOptions), MalformedSpecError> {
    let mut fields: Vec<FieldSpec> = Vec::new();
    let mut options = GenerationOptions::default();
    let mut pending: Option<(String, Span)> = None;

    for arg in args {
        match arg {
            AttributeArg::Name(lit) => {
                let name = lit.value();
                if let Some((first, _)) = pending.take() {
                    return Err(MalformedSpecError::new(
                        MalformedSpecKind::ConsecutiveNames {
                            first,
                            second: name,
                        },
                        lit.span(),
                    ));
                }
                validate_name(&name, lit.span())?;
                pending = Some((name, lit.span()));
            }
            AttributeArg::Type(ty) => {
                let (name, span) = pending
                    .take()
                    .unwrap_or_else(|| (DEFAULT_FIELD_NAME.to_string(), ty.span()));
                let accessor = name.to_snake_case();
                if fields.iter().any(|f| f.accessor_name() == accessor) {
                    return Err(MalformedSpecError::new(
                        MalformedSpecKind::DuplicateField { name },
                        span,
                    ));
                }
                if fields.len() == MAX_FIELDS {
                    return Err(MalformedSpecError::new(
                        MalformedSpecKind::TooManyFields {
                            count: MAX_FIELDS + 1,
                            max: MAX_FIELDS,
                        },
                        ty.span(),
                    ));
                }
                fields.push(FieldSpec::new(name, host.resolve_type(ty)));
            }
            AttributeArg::Option { name, value } => {
                if let Some((field, _)) = &pending {
                    return Err(MalformedSpecError::new(
                        MalformedSpecKind::OptionInsidePair {
                            name: field.clone(),
                            option: name.to_string(),
                        },
                        arg.span(),
                    ));
                }
                apply_option(&mut options, name, value)?;
            }
        }
    }

    if let Some((name, span)) = pending {
        return Err(MalformedSpecError::new(
            MalformedSpecKind::DanglingName { name },
            span,
        ));
    }

    if fields.is_empty() {
        fields.push(FieldSpec::new(DEFAULT_FIELD_NAME, TypeRef::default_id()));
    }

    Ok((fields, options))
}

/// Tokenize and parse in one step. Syntax errors are reported as malformed specs.
pub fn parse_tokens(
    tokens: TokenStream,
    host: &impl DeclarationHost,
) -> Result<(Vec<FieldSpec>, GenerationOptions), MalformedSpecError> {
    let args = parse_args(tokens)?;
    parse(&args, host)
}

fn validate_name(name: &str, span: Span) -> Result<(), MalformedSpecError> {
    let well_formed = !name.is_empty()
        && name.chars().all(|c| c.is_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());
    let accessor = name.to_snake_case();
    if !well_formed || syn::parse_str::<Ident>(&accessor).is_err() {
        return Err(MalformedSpecError::new(
            MalformedSpecKind::InvalidName {
                name: name.to_string(),
            },
            span,
        ));
    }
    if RESERVED_MEMBER_NAMES.contains(&accessor.as_str()) {
        return Err(MalformedSpecError::new(
            MalformedSpecKind::ReservedName {
                name: name.to_string(),
            },
            span,
        ));
    }
    Ok(())
}

fn apply_option(
    options: &mut GenerationOptions,
    name: &Ident,
    value: &Expr,
) -> Result<(), MalformedSpecError> {
    let option = name.to_string().to_upper_camel_case();
    match option.as_str() {
        "GenerateImplicitConversionToPrimitive" => {
            options.generate_implicit_conversion_to_primitive = bool_value(&option, value)?;
        }
        "GenerateComparisonOperators" => {
            options.generate_comparison_operators = tri_bool_value(&option, value)?;
        }
        "GenerateMathOperators" => {
            options.generate_math_operators = tri_bool_value(&option, value)?;
        }
        _ => tracing::trace!(option = %name, "ignoring unknown wrapper_value_object option"),
    }
    Ok(())
}

fn bool_value(option: &str, value: &Expr) -> Result<bool, MalformedSpecError> {
    match bool_literal(value) {
        Some(value) => Ok(value),
        None => Err(MalformedSpecError::new(
            MalformedSpecKind::InvalidOptionValue {
                option: option.to_string(),
                expected: "`true` or `false`",
            },
            value.span(),
        )),
    }
}

fn bool_literal(value: &Expr) -> Option<bool> {
    match value {
        Expr::Lit(expr) => match &expr.lit {
            Lit::Bool(lit) => Some(lit.value),
            _ => None,
        },
        _ => None,
    }
}

fn tri_bool_value(option: &str, value: &Expr) -> Result<TriBool, MalformedSpecError> {
    let resolved = match value {
        Expr::Lit(_) => bool_literal(value).map(TriBool::from),
        Expr::Path(expr) if expr.qself.is_none() => {
            match expr.path.segments.last().map(|s| s.ident.to_string()).as_deref() {
                Some("Unset") => Some(TriBool::Unset),
                Some("True") => Some(TriBool::True),
                Some("False") => Some(TriBool::False),
                _ => None,
            }
        }
        _ => None,
    };
    resolved.ok_or_else(|| {
        MalformedSpecError::new(
            MalformedSpecKind::InvalidOptionValue {
                option: option.to_string(),
                expected: "`Unset`, `True` or `False`",
            },
            value.span(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RegistryHost;
    use crate::registry::TypeRegistry;
    use crate::types::{Primitive, TypeKind};
    use quote::quote;

    fn run(tokens: TokenStream) -> Result<(Vec<FieldSpec>, GenerationOptions), MalformedSpecError> {
        let registry = TypeRegistry::with_builtins();
        parse_tokens(tokens, &RegistryHost::new(&registry))
    }

    fn kind_of(err: MalformedSpecError) -> MalformedSpecKind {
        err.kind().clone()
    }

    #[test]
    fn test_no_arguments_is_single_id_field() {
        let (fields, options) = run(quote!()).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name(), "Value");
        assert_eq!(fields[0].declared_type().kind(), &TypeKind::Uuid);
        assert_eq!(options, GenerationOptions::default());
    }

    #[test]
    fn test_bare_type() {
        let (fields, _) = run(quote!(i32)).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name(), "Value");
        assert_eq!(
            fields[0].declared_type().kind(),
            &TypeKind::Primitive(Primitive::I32)
        );
    }

    #[test]
    fn test_named_pairs_keep_order() {
        let (fields, _) = run(quote!("MatchId", MatchId, "HomeGoals", u8, "AwayGoals", u8)).unwrap();
        let names: Vec<_> = fields.iter().map(FieldSpec::name).collect();
        assert_eq!(names, ["MatchId", "HomeGoals", "AwayGoals"]);
    }

    #[test]
    fn test_options_anywhere_outside_pairs() {
        let (fields, options) = run(quote!(
            GenerateMathOperators = True,
            "Min", i32,
            generate_comparison_operators = TriBool::False,
            "Max", i32,
            GenerateImplicitConversionToPrimitive = true,
        ))
        .unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(options.generate_math_operators, TriBool::True);
        assert_eq!(options.generate_comparison_operators, TriBool::False);
        assert!(options.generate_implicit_conversion_to_primitive);
    }

    #[test]
    fn test_tri_bool_accepts_bool_literals() {
        let (_, options) = run(quote!(i32, GenerateMathOperators = false)).unwrap();
        assert_eq!(options.generate_math_operators, TriBool::False);
    }

    #[test]
    fn test_unknown_option_is_ignored() {
        let (fields, options) = run(quote!(i32, GenerateJsonConverter = true)).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(options, GenerationOptions::default());
    }

    #[test]
    fn test_dangling_name() {
        let err = run(quote!(i32, "Extra")).unwrap_err();
        assert_eq!(
            kind_of(err),
            MalformedSpecKind::DanglingName {
                name: "Extra".to_string()
            }
        );
    }

    #[test]
    fn test_consecutive_names() {
        let err = run(quote!("A", "B", i32)).unwrap_err();
        assert!(matches!(kind_of(err), MalformedSpecKind::ConsecutiveNames { .. }));
    }

    #[test]
    fn test_option_inside_pair() {
        let err = run(quote!("A", GenerateMathOperators = True, i32)).unwrap_err();
        assert!(matches!(kind_of(err), MalformedSpecKind::OptionInsidePair { .. }));
    }

    #[test]
    fn test_two_unnamed_types_collide() {
        let err = run(quote!(i32, i32)).unwrap_err();
        assert_eq!(
            kind_of(err),
            MalformedSpecKind::DuplicateField {
                name: "Value".to_string()
            }
        );
    }

    #[test]
    fn test_names_colliding_after_snake_case() {
        let err = run(quote!("HomeGoals", u8, "home_goals", u8)).unwrap_err();
        assert!(matches!(kind_of(err), MalformedSpecKind::DuplicateField { .. }));
    }

    #[test]
    fn test_invalid_and_reserved_names() {
        let err = run(quote!("", i32)).unwrap_err();
        assert!(matches!(kind_of(err), MalformedSpecKind::InvalidName { .. }));
        let err = run(quote!("Home Goals", u8)).unwrap_err();
        assert!(matches!(kind_of(err), MalformedSpecKind::InvalidName { .. }));
        let err = run(quote!("Type", u8)).unwrap_err();
        assert!(matches!(kind_of(err), MalformedSpecKind::InvalidName { .. }));
        let err = run(quote!("IntoInner", u8)).unwrap_err();
        assert!(matches!(kind_of(err), MalformedSpecKind::ReservedName { .. }));
    }

    #[test]
    fn test_field_limit() {
        assert!(run(quote!("A", u8, "B", u8, "C", u8, "D", u8)).is_ok());
        let err = run(quote!("A", u8, "B", u8, "C", u8, "D", u8, "E", u8)).unwrap_err();
        assert_eq!(
            kind_of(err),
            MalformedSpecKind::TooManyFields { count: 5, max: 4 }
        );
    }

    #[test]
    fn test_bad_option_values() {
        let err = run(quote!(i32, GenerateImplicitConversionToPrimitive = True)).unwrap_err();
        assert!(matches!(kind_of(err), MalformedSpecKind::InvalidOptionValue { .. }));
        let err = run(quote!(i32, GenerateMathOperators = 1)).unwrap_err();
        assert!(matches!(kind_of(err), MalformedSpecKind::InvalidOptionValue { .. }));
    }

    #[test]
    fn test_syntax_error() {
        let err = run(quote!(i32 i32)).unwrap_err();
        assert!(matches!(kind_of(err), MalformedSpecKind::Syntax { .. }));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let first = run(quote!("HomeGoals", u8, "AwayGoals", u8)).unwrap();
        let second = run(quote!("HomeGoals", u8, "AwayGoals", u8)).unwrap();
        assert_eq!(first, second);
    }
}
