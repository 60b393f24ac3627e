//! Artifact serializer: renders a [`MemberIr`] as Rust source text.
//!
//! The text is meant to be `include!`d right next to the annotated struct, so
//! it contains items only and every std path is fully qualified.

use crate::diagnostics::Diagnostic;
use crate::members::{
    ArithmeticOutput, BinaryOp, ConstructorCheck, FormatTrait, Member, MemberIr, Storage,
};

/// File name of the fixed artifact shared by every wrapper in a crate.
pub const SHARED_ARTIFACT_NAME: &str = "wrapper_value_object_options.rs";

/// Line-oriented writer that tracks indentation.
#[derive(Debug, Default)]
struct SourceWriter {
    out: String,
    indent: usize,
}

impl SourceWriter {
    fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.indent {
                self.out.push_str("    ");
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    fn open(&mut self, text: impl AsRef<str>) {
        self.line(format!("{} {{", text.as_ref()));
        self.indent += 1;
    }

    fn close(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.line("}");
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Render one wrapper's members.
///
/// Inherent members are grouped in a single `impl` block, followed by one
/// block per trait implementation, both in IR order.
pub fn serialize(ir: &MemberIr) -> String {
    let renderer = Renderer { ir };
    let mut inherent = SourceWriter::default();
    let mut traits = SourceWriter::default();

    inherent.open(format!("impl {}", ir.type_name));
    let mut first = true;
    for member in &ir.members {
        if renderer.is_inherent(member) {
            if !first {
                inherent.blank();
            }
            first = false;
            renderer.inherent_member(&mut inherent, member);
        } else {
            renderer.trait_impl(&mut traits, member);
        }
    }
    inherent.close();

    let mut out = inherent.finish();
    let traits = traits.finish();
    if !traits.is_empty() {
        out.push('\n');
        out.push_str(traits.trim_end());
        out.push('\n');
    }
    out
}

/// The fixed text shared by all wrappers: the tri-state option type and the
/// recognized option names.
pub fn shared_artifact() -> String {
    let mut w = SourceWriter::default();
    w.line("/// Value of the `GenerateComparisonOperators` and `GenerateMathOperators` options.");
    w.line("#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]");
    w.open("pub enum TriBool");
    w.line("#[default]");
    w.line("Unset,");
    w.line("True,");
    w.line("False,");
    w.close();
    w.blank();
    w.line("/// Option names understood by `#[wrapper_value_object(..)]`.");
    w.line("pub const WRAPPER_VALUE_OBJECT_OPTIONS: [&str; 3] = [");
    w.indent += 1;
    w.line("\"GenerateImplicitConversionToPrimitive\",");
    w.line("\"GenerateComparisonOperators\",");
    w.line("\"GenerateMathOperators\",");
    w.indent -= 1;
    w.line("];");
    w.finish()
}

/// Text written in place of a rejected wrapper's members.
pub fn rejection_artifact(diagnostic: &Diagnostic) -> String {
    let message = format!("{}: {}", diagnostic.code, diagnostic.message);
    format!("::core::compile_error!({message:?});\n")
}

struct Renderer<'a> {
    ir: &'a MemberIr,
}

impl Renderer<'_> {
    fn name(&self) -> &str {
        &self.ir.type_name
    }

    fn storage(&self) -> &Storage {
        &self.ir.storage
    }

    fn storage_type(&self) -> String {
        self.ir.storage.rust_type()
    }

    /// Return type of `new`, which every re-wrapping path shares.
    fn constructor_output(&self) -> String {
        match self.ir.constructor.error_type() {
            Some(error_type) => format!("::core::result::Result<Self, {error_type}>"),
            None => "Self".to_string(),
        }
    }

    fn is_inherent(&self, member: &Member) -> bool {
        matches!(
            member,
            Member::Constructor { .. }
                | Member::Accessor { .. }
                | Member::CompareTo { .. }
                | Member::IntoInner
                | Member::TryFormat
                | Member::Generate
        )
    }

    fn inherent_member(&self, w: &mut SourceWriter, member: &Member) {
        match member {
            Member::Constructor { check } => self.constructor(w, check),
            Member::Accessor { slot } => self.accessor(w, *slot),
            Member::CompareTo { total } => {
                w.line("/// Three-way comparison of the wrapped values.");
                if *total {
                    w.open("pub fn compare_to(&self, other: &Self) -> ::core::cmp::Ordering");
                    w.line("::core::cmp::Ord::cmp(&self.value, &other.value)");
                } else {
                    w.open(
                        "pub fn compare_to(&self, other: &Self) -> ::core::option::Option<::core::cmp::Ordering>",
                    );
                    w.line("::core::cmp::PartialOrd::partial_cmp(&self.value, &other.value)");
                }
                w.close();
            }
            Member::IntoInner => {
                w.line("/// Unwraps the stored value.");
                w.line("#[inline]");
                w.open(format!("pub fn into_inner(self) -> {}", self.storage_type()));
                w.line("self.value");
                w.close();
            }
            Member::TryFormat => self.try_format(w),
            Member::Generate => {
                w.line("/// Creates a wrapper around a new random identifier.");
                w.open(format!("pub fn generate() -> {}", self.constructor_output()));
                w.line(format!("Self::new(<{}>::new_v4())", self.storage_type()));
                w.close();
            }
            _ => {}
        }
    }

    fn constructor(&self, w: &mut SourceWriter, check: &ConstructorCheck) {
        let storage = self.storage();
        let params = storage
            .slots
            .iter()
            .map(|slot| format!("{}: {}", slot.accessor, slot.ty))
            .collect::<Vec<_>>()
            .join(", ");
        let value = match storage.slots.as_slice() {
            [slot] if slot.accessor == "value" => "Self { value }".to_string(),
            [slot] => format!("Self {{ value: {} }}", slot.accessor),
            slots => format!(
                "Self {{ value: ({}) }}",
                slots
                    .iter()
                    .map(|slot| slot.accessor.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        };

        w.line(format!("/// Creates a new `{}`.", self.name()));
        if *check == ConstructorCheck::None {
            w.line("#[inline]");
        }
        w.open(format!("pub fn new({params}) -> {}", self.constructor_output()));
        match check {
            ConstructorCheck::None => w.line(value),
            ConstructorCheck::Fallible { .. } => {
                w.line(format!("let this = {value};"));
                w.line(format!("Self::validate({})?;", self.validate_args()));
                w.line("::core::result::Result::Ok(this)");
            }
            ConstructorCheck::Panicking => {
                w.line(format!("let this = {value};"));
                w.line(format!("Self::validate({});", self.validate_args()));
                w.line("this");
            }
        }
        w.close();
    }

    fn validate_args(&self) -> String {
        let storage = self.storage();
        (0..storage.slots.len())
            .map(|index| format!("&{}", storage.slot_expr("this", index)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn accessor(&self, w: &mut SourceWriter, index: usize) {
        let storage = self.storage();
        let Some(slot) = storage.slots.get(index) else {
            return;
        };
        let expr = storage.slot_expr("self", index);
        w.line("#[inline]");
        if slot.copy {
            w.open(format!("pub fn {}(&self) -> {}", slot.accessor, slot.ty));
            w.line(expr);
        } else {
            w.open(format!("pub fn {}(&self) -> &{}", slot.accessor, slot.ty));
            w.line(format!("&{expr}"));
        }
        w.close();
    }

    fn try_format(&self, w: &mut SourceWriter) {
        w.line("/// Writes the value's `Display` form into `buffer`, returning the number of bytes written.");
        w.line("///");
        w.line("/// Fails without a partial guarantee when `buffer` is too small.");
        w.open("pub fn try_format(&self, buffer: &mut [u8]) -> ::core::result::Result<usize, ::core::fmt::Error>");
        w.open("struct Cursor<'a>");
        w.line("buffer: &'a mut [u8],");
        w.line("written: usize,");
        w.close();
        w.blank();
        w.open("impl ::core::fmt::Write for Cursor<'_>");
        w.open("fn write_str(&mut self, s: &str) -> ::core::fmt::Result");
        w.line("let end = self.written.checked_add(s.len()).ok_or(::core::fmt::Error)?;");
        w.line("let target = self.buffer.get_mut(self.written..end).ok_or(::core::fmt::Error)?;");
        w.line("target.copy_from_slice(s.as_bytes());");
        w.line("self.written = end;");
        w.line("::core::result::Result::Ok(())");
        w.close();
        w.close();
        w.blank();
        w.line("let mut cursor = Cursor { buffer, written: 0 };");
        w.line("::core::fmt::Write::write_fmt(&mut cursor, ::core::format_args!(\"{}\", self.value))?;");
        w.line("::core::result::Result::Ok(cursor.written)");
        w.close();
    }

    fn trait_impl(&self, w: &mut SourceWriter, member: &Member) {
        let name = self.name();
        let storage_type = self.storage_type();
        w.line("#[automatically_derived]");
        match member {
            Member::CopyConstructor { bitwise } => {
                w.open(format!("impl ::core::convert::From<&{name}> for {name}"));
                w.line("#[inline]");
                w.open(format!("fn from(other: &{name}) -> Self"));
                if *bitwise {
                    w.line("*other");
                } else {
                    w.line("Self { value: ::core::clone::Clone::clone(&other.value) }");
                }
                w.close();
            }
            Member::Equality => {
                w.open(format!("impl ::core::cmp::PartialEq for {name}"));
                w.line("#[inline]");
                w.open("fn eq(&self, other: &Self) -> bool");
                w.line("self.value == other.value");
                w.close();
            }
            Member::TotalEquality => {
                w.line(format!("impl ::core::cmp::Eq for {name} {{}}"));
                w.blank();
                return;
            }
            Member::Hash => {
                w.open(format!("impl ::core::hash::Hash for {name}"));
                w.open("fn hash<H: ::core::hash::Hasher>(&self, state: &mut H)");
                w.line("::core::hash::Hash::hash(&self.value, state);");
                w.close();
            }
            Member::StorageEquality => {
                w.open(format!("impl ::core::cmp::PartialEq<{storage_type}> for {name}"));
                w.line("#[inline]");
                w.open(format!("fn eq(&self, other: &{storage_type}) -> bool"));
                w.line("self.value == *other");
                w.close();
            }
            Member::ByRefEquality => {
                w.open(format!("impl ::core::cmp::PartialEq<&{name}> for {name}"));
                w.line("#[inline]");
                w.open(format!("fn eq(&self, other: &&{name}) -> bool"));
                w.line("self.value == other.value");
                w.close();
            }
            Member::RelationalOperators { total } => self.partial_ord(w, *total),
            Member::TotalOrder => {
                w.open(format!("impl ::core::cmp::Ord for {name}"));
                w.line("#[inline]");
                w.open("fn cmp(&self, other: &Self) -> ::core::cmp::Ordering");
                w.line("::core::cmp::Ord::cmp(&self.value, &other.value)");
                w.close();
            }
            Member::Arithmetic { op, output } => self.arithmetic(w, *op, *output),
            Member::FromStorage => self.from_storage(w),
            Member::IntoStorage => {
                w.open(format!("impl ::core::convert::From<{name}> for {storage_type}"));
                w.line("#[inline]");
                w.open(format!("fn from(value: {name}) -> Self"));
                w.line("value.value");
                w.close();
            }
            Member::Display => self.display(w),
            Member::Debug => self.debug(w),
            Member::NumericFormat(format) => self.numeric_format(w, *format),
            _ => {}
        }
        w.close();
        w.blank();
    }

    fn partial_ord(&self, w: &mut SourceWriter, total: bool) {
        w.open(format!("impl ::core::cmp::PartialOrd for {}", self.name()));
        w.line("#[inline]");
        w.open(
            "fn partial_cmp(&self, other: &Self) -> ::core::option::Option<::core::cmp::Ordering>",
        );
        if total {
            w.line("::core::option::Option::Some(::core::cmp::Ord::cmp(self, other))");
        } else {
            w.line("::core::cmp::PartialOrd::partial_cmp(&self.value, &other.value)");
        }
        w.close();

        // Only numeric storage gets operators, so the relations forward directly.
        for (method, symbol) in [("lt", "<"), ("le", "<="), ("gt", ">"), ("ge", ">=")] {
            w.blank();
            w.line("#[inline]");
            w.open(format!("fn {method}(&self, other: &Self) -> bool"));
            w.line(format!("self.value {symbol} other.value"));
            w.close();
        }
    }

    fn arithmetic(&self, w: &mut SourceWriter, op: BinaryOp, output: ArithmeticOutput) {
        let symbol = op.symbol();
        w.open(format!("impl ::core::ops::{} for {}", op.trait_name(), self.name()));
        match output {
            ArithmeticOutput::Widened => {
                w.line("type Output = i32;");
                w.blank();
                w.line("#[inline]");
                w.open(format!("fn {}(self, rhs: Self) -> i32", op.method()));
                w.line(format!(
                    "::core::primitive::i32::from(self.value) {symbol} ::core::primitive::i32::from(rhs.value)"
                ));
            }
            ArithmeticOutput::Wrapper => {
                w.line(format!("type Output = {};", self.constructor_output()));
                w.blank();
                w.line("#[inline]");
                w.open(format!("fn {}(self, rhs: Self) -> Self::Output", op.method()));
                w.line(format!("Self::new(self.value {symbol} rhs.value)"));
            }
        }
        w.close();
    }

    fn from_storage(&self, w: &mut SourceWriter) {
        let name = self.name();
        let storage = self.storage();
        let storage_type = self.storage_type();
        let names = storage
            .slots
            .iter()
            .map(|slot| slot.accessor.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        match self.ir.constructor.error_type() {
            Some(error_type) => {
                w.open(format!("impl ::core::convert::TryFrom<{storage_type}> for {name}"));
                w.line(format!("type Error = {error_type};"));
                w.blank();
                w.open(format!(
                    "fn try_from(value: {storage_type}) -> ::core::result::Result<Self, {error_type}>"
                ));
            }
            None => {
                w.open(format!("impl ::core::convert::From<{storage_type}> for {name}"));
                w.line("#[inline]");
                w.open(format!("fn from(value: {storage_type}) -> Self"));
            }
        }
        if storage.is_compound() {
            w.line(format!("let ({names}) = value;"));
            w.line(format!("Self::new({names})"));
        } else {
            w.line("Self::new(value)");
        }
        w.close();
    }

    fn display(&self, w: &mut SourceWriter) {
        w.open(format!("impl ::core::fmt::Display for {}", self.name()));
        w.open("fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result");
        let storage = self.storage();
        if storage.is_compound() {
            w.line("f.write_str(\"(\")?;");
            for index in 0..storage.slots.len() {
                if index > 0 {
                    w.line("f.write_str(\", \")?;");
                }
                w.line(format!(
                    "::core::fmt::Display::fmt(&{}, f)?;",
                    storage.slot_expr("self", index)
                ));
            }
            w.line("f.write_str(\")\")");
        } else {
            w.line("::core::fmt::Display::fmt(&self.value, f)");
        }
        w.close();
    }

    fn debug(&self, w: &mut SourceWriter) {
        let name = self.name();
        w.open(format!("impl ::core::fmt::Debug for {name}"));
        w.open("fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result");
        let storage = self.storage();
        if storage.is_compound() {
            w.line(format!("f.debug_struct(\"{name}\")"));
            w.indent += 1;
            for (index, slot) in storage.slots.iter().enumerate() {
                w.line(format!(
                    ".field(\"{}\", &{})",
                    slot.accessor,
                    storage.slot_expr("self", index)
                ));
            }
            w.line(".finish()");
            w.indent -= 1;
        } else {
            w.line(format!("f.debug_tuple(\"{name}\").field(&self.value).finish()"));
        }
        w.close();
    }

    fn numeric_format(&self, w: &mut SourceWriter, format: FormatTrait) {
        let trait_name = format.trait_name();
        w.open(format!("impl ::core::fmt::{trait_name} for {}", self.name()));
        w.open("fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result");
        w.line(format!("::core::fmt::{trait_name}::fmt(&self.value, f)"));
        w.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::members::emit;
    use crate::policy;
    use crate::types::{
        FieldSpec, GenerationOptions, MemberDescriptor, Primitive, TargetTypeDescriptor, TriBool,
        TypeKind, TypeRef, ValidationHook,
    };

    fn field(name: &str, ty: &str, kind: TypeKind) -> FieldSpec {
        FieldSpec::new(name, TypeRef::new(syn::parse_str(ty).unwrap(), kind))
    }

    fn render(fields: &[FieldSpec], options: GenerationOptions, target: &TargetTypeDescriptor) -> String {
        let policy = policy::resolve(fields, &options, target);
        serialize(&emit(fields, target, &policy))
    }

    fn int_field() -> FieldSpec {
        field("Value", "i32", TypeKind::Primitive(Primitive::I32))
    }

    #[test]
    fn test_output_parses_as_rust() {
        let cases: Vec<(Vec<FieldSpec>, TargetTypeDescriptor)> = vec![
            (vec![int_field()], TargetTypeDescriptor::new("Score")),
            (vec![FieldSpec::new("Value", TypeRef::default_id())], TargetTypeDescriptor::new("ProductId")),
            (
                vec![field("Value", "f64", TypeKind::Primitive(Primitive::F64))],
                TargetTypeDescriptor::new("Probability").read_only(true),
            ),
            (
                vec![
                    field("HomeGoals", "u8", TypeKind::Primitive(Primitive::U8)),
                    field("AwayGoals", "u8", TypeKind::Primitive(Primitive::U8)),
                ],
                TargetTypeDescriptor::new("MatchResult").read_only(true),
            ),
            (
                vec![field("Value", "i64", TypeKind::Primitive(Primitive::I64))],
                TargetTypeDescriptor::new("PositiveAmount").with_members(&[
                    MemberDescriptor::Validate(ValidationHook {
                        error_type: Some("AmountError".to_string()),
                    }),
                ]),
            ),
        ];
        for (fields, target) in cases {
            let code = render(&fields, GenerationOptions::default(), &target);
            if let Err(err) = syn::parse_file(&code) {
                panic!("generated code for {} does not parse: {err}\n{code}", target.name);
            }
        }
    }

    #[test]
    fn test_single_numeric_field() {
        let code = render(&[int_field()], GenerationOptions::default(), &TargetTypeDescriptor::new("Score"));
        assert!(code.contains("impl Score {"));
        assert!(code.contains("pub fn new(value: i32) -> Self {"));
        assert!(code.contains("Self { value }"));
        assert!(code.contains("pub fn value(&self) -> i32 {"));
        assert!(code.contains("impl ::core::ops::Add for Score {"));
        assert!(code.contains("type Output = Self;"));
        assert!(code.contains("Self::new(self.value + rhs.value)"));
        assert!(code.contains("impl ::core::cmp::PartialOrd for Score {"));
        assert!(code.contains("self.value < other.value"));
        assert!(code.contains("impl ::core::cmp::Ord for Score {"));
        assert!(code.contains("impl ::core::fmt::LowerHex for Score {"));
        assert!(code.contains("pub fn try_format(&self, buffer: &mut [u8])"));
        assert!(code.contains("impl ::core::convert::From<i32> for Score {"));
        assert!(!code.contains("impl ::core::convert::From<Score> for i32"));
    }

    #[test]
    fn test_byte_width_widens() {
        let fields = [field("Value", "u8", TypeKind::Primitive(Primitive::U8))];
        let code = render(&fields, GenerationOptions::default(), &TargetTypeDescriptor::new("Goals"));
        assert!(code.contains("type Output = i32;"));
        assert!(code.contains(
            "::core::primitive::i32::from(self.value) + ::core::primitive::i32::from(rhs.value)"
        ));
    }

    #[test]
    fn test_implicit_conversion_to_primitive() {
        let options = GenerationOptions {
            generate_implicit_conversion_to_primitive: true,
            ..GenerationOptions::default()
        };
        let code = render(&[int_field()], options, &TargetTypeDescriptor::new("MatchId"));
        assert!(code.contains("impl ::core::convert::From<MatchId> for i32 {"));
        assert!(!code.contains("impl ::core::ops::Add"));
    }

    #[test]
    fn test_identifier_generate() {
        let code = render(
            &[FieldSpec::new("Value", TypeRef::default_id())],
            GenerationOptions {
                generate_comparison_operators: TriBool::True,
                generate_math_operators: TriBool::True,
                ..GenerationOptions::default()
            },
            &TargetTypeDescriptor::new("ProductId"),
        );
        assert!(code.contains("pub fn generate() -> Self {"));
        assert!(code.contains("Self::new(<::uuid::Uuid>::new_v4())"));
        assert!(!code.contains("PartialOrd for"));
        assert!(!code.contains("::core::ops::"));
    }

    #[test]
    fn test_compound_rendering() {
        let fields = [
            field("HomeGoals", "u8", TypeKind::Primitive(Primitive::U8)),
            field("AwayGoals", "u8", TypeKind::Primitive(Primitive::U8)),
        ];
        let target = TargetTypeDescriptor::new("MatchResult").read_only(true);
        let code = render(&fields, GenerationOptions::default(), &target);
        assert!(code.contains("pub fn new(home_goals: u8, away_goals: u8) -> Self {"));
        assert!(code.contains("Self { value: (home_goals, away_goals) }"));
        assert!(code.contains("pub fn away_goals(&self) -> u8 {"));
        assert!(code.contains("self.value.1"));
        assert!(code.contains("impl ::core::convert::From<(u8, u8)> for MatchResult {"));
        assert!(code.contains("let (home_goals, away_goals) = value;"));
        assert!(code.contains("impl ::core::cmp::PartialEq<&MatchResult> for MatchResult {"));
        assert!(code.contains(".field(\"home_goals\", &self.value.0)"));
        assert!(code.contains("f.write_str(\", \")?;"));
        assert!(code.contains("*other"));
        assert!(!code.contains("PartialOrd for"));
    }

    #[test]
    fn test_owned_storage_accessor_borrows() {
        let fields = [field("Value", "String", TypeKind::String)];
        let code = render(&fields, GenerationOptions::default(), &TargetTypeDescriptor::new("Label"));
        assert!(code.contains("pub fn value(&self) -> &String {"));
        assert!(code.contains("&self.value"));
        assert!(code.contains("::core::clone::Clone::clone(&other.value)"));
    }

    #[test]
    fn test_fallible_validation() {
        let fields = [field("Value", "i64", TypeKind::Primitive(Primitive::I64))];
        let target = TargetTypeDescriptor::new("PositiveAmount").with_members(&[
            MemberDescriptor::Validate(ValidationHook {
                error_type: Some("AmountError".to_string()),
            }),
        ]);
        let code = render(&fields, GenerationOptions::default(), &target);
        assert!(code.contains("pub fn new(value: i64) -> ::core::result::Result<Self, AmountError> {"));
        assert!(code.contains("Self::validate(&this.value)?;"));
        assert!(code.contains("impl ::core::convert::TryFrom<i64> for PositiveAmount {"));
        assert!(code.contains("type Output = ::core::result::Result<Self, AmountError>;"));
    }

    #[test]
    fn test_compound_validation_passes_every_slot() {
        let fields = [
            field("Lowest", "i32", TypeKind::Primitive(Primitive::I32)),
            field("Highest", "i32", TypeKind::Primitive(Primitive::I32)),
        ];
        let target = TargetTypeDescriptor::new("ScoreRange").with_members(&[
            MemberDescriptor::Validate(ValidationHook {
                error_type: Some("RangeError".to_string()),
            }),
        ]);
        let code = render(&fields, GenerationOptions::default(), &target);
        assert!(code.contains(
            "pub fn new(lowest: i32, highest: i32) -> ::core::result::Result<Self, RangeError> {"
        ));
        assert!(code.contains("let this = Self { value: (lowest, highest) };"));
        assert!(code.contains("Self::validate(&this.value.0, &this.value.1)?;"));
        assert!(code.contains("impl ::core::convert::TryFrom<(i32, i32)> for ScoreRange {"));
        assert!(syn::parse_file(&code).is_ok());
    }

    #[test]
    fn test_float_relations_forward_to_storage() {
        let fields = [field("Value", "f64", TypeKind::Primitive(Primitive::F64))];
        let code = render(&fields, GenerationOptions::default(), &TargetTypeDescriptor::new("Ratio"));
        assert!(code.contains("impl ::core::cmp::PartialOrd for Ratio {"));
        assert!(code.contains("::core::cmp::PartialOrd::partial_cmp(&self.value, &other.value)"));
        assert!(code.contains("self.value <= other.value"));
        assert!(!code.contains("impl ::core::cmp::Ord for Ratio"));
    }

    #[test]
    fn test_rejection_artifact() {
        let diagnostic = Diagnostic::error(
            crate::diagnostics::DiagnosticCode::NestedTypeNotSupported,
            "`Score` is declared inside a function",
            crate::diagnostics::SourceLocation::default(),
        );
        let code = rejection_artifact(&diagnostic);
        assert_eq!(
            code,
            "::core::compile_error!(\"WVO001: `Score` is declared inside a function\");\n"
        );
        assert!(syn::parse_file(&code).is_ok());
    }

    #[test]
    fn test_user_display_is_not_duplicated() {
        let target = TargetTypeDescriptor::new("Score").with_members(&[MemberDescriptor::Display]);
        let code = render(&[int_field()], GenerationOptions::default(), &target);
        assert!(!code.contains("impl ::core::fmt::Display for Score"));
        assert!(code.contains("impl ::core::fmt::Debug for Score"));
    }

    #[test]
    fn test_shared_artifact() {
        let code = shared_artifact();
        assert!(code.contains("pub enum TriBool {"));
        assert!(code.contains("pub const WRAPPER_VALUE_OBJECT_OPTIONS: [&str; 3] = ["));
        assert!(syn::parse_file(&code).is_ok());
    }
}
