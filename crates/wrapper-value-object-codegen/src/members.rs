//! Member emitter: decides the full member set of one wrapper.
//!
//! The output is a [`MemberIr`], a flat list of members in emission order.
//! Nothing here produces text; see [`crate::render`].

use crate::policy::EffectivePolicy;
use crate::types::{BaseTypeCategory, FieldSpec, TargetTypeDescriptor, TypeTraits};

/// One slot of the internal storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageSlot {
    /// snake_case accessor, constructor parameter and `Debug` label.
    pub accessor: String,
    pub ty: String,
    pub copy: bool,
}

/// The `value` field of a wrapper: one slot, or a tuple of all slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Storage {
    pub slots: Vec<StorageSlot>,
    pub traits: TypeTraits,
}

impl Storage {
    pub fn from_fields(fields: &[FieldSpec]) -> Self {
        let slots = fields
            .iter()
            .map(|field| StorageSlot {
                accessor: field.accessor_name(),
                ty: field.declared_type().rust_type(),
                copy: field.declared_type().traits().copy,
            })
            .collect::<Vec<_>>();
        let traits = fields
            .iter()
            .map(|field| field.declared_type().traits())
            .reduce(TypeTraits::intersect)
            .unwrap_or(TypeTraits::VALUE);
        Self { slots, traits }
    }

    pub fn is_compound(&self) -> bool {
        self.slots.len() > 1
    }

    /// The storage type as written in generated source.
    pub fn rust_type(&self) -> String {
        match self.slots.as_slice() {
            [slot] => slot.ty.clone(),
            slots => format!(
                "({})",
                slots
                    .iter()
                    .map(|slot| slot.ty.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }

    /// Expression reading slot `index` from `receiver`, e.g. `self.value.1`.
    pub fn slot_expr(&self, receiver: &str, index: usize) -> String {
        if self.is_compound() {
            format!("{receiver}.value.{index}")
        } else {
            format!("{receiver}.value")
        }
    }
}

/// How the primary constructor treats the validation hook.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstructorCheck {
    None,
    /// `validate` returns `Result<(), E>`; `new` returns `Result<Self, E>`.
    Fallible { error_type: String },
    /// `validate` returns `()` and panics on invalid input.
    Panicking,
}

impl ConstructorCheck {
    pub fn error_type(&self) -> Option<&str> {
        match self {
            Self::Fallible { error_type } => Some(error_type),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub const ALL: [Self; 5] = [Self::Add, Self::Sub, Self::Mul, Self::Div, Self::Rem];

    pub fn trait_name(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Sub => "Sub",
            Self::Mul => "Mul",
            Self::Div => "Div",
            Self::Rem => "Rem",
        }
    }

    pub fn method(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Rem => "rem",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
        }
    }
}

/// Result type of an arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOutput {
    /// A plain `i32`, computed after widening both operands.
    Widened,
    /// Whatever `Self::new` returns.
    Wrapper,
}

/// Formatting traits forwarded to a numeric storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTrait {
    LowerHex,
    UpperHex,
    Octal,
    Binary,
    LowerExp,
    UpperExp,
}

impl FormatTrait {
    pub const INTEGRAL: [Self; 6] = [
        Self::LowerHex,
        Self::UpperHex,
        Self::Octal,
        Self::Binary,
        Self::LowerExp,
        Self::UpperExp,
    ];

    pub const FLOATING: [Self; 2] = [Self::LowerExp, Self::UpperExp];

    pub fn trait_name(self) -> &'static str {
        match self {
            Self::LowerHex => "LowerHex",
            Self::UpperHex => "UpperHex",
            Self::Octal => "Octal",
            Self::Binary => "Binary",
            Self::LowerExp => "LowerExp",
            Self::UpperExp => "UpperExp",
        }
    }
}

/// A generated member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Member {
    Constructor { check: ConstructorCheck },
    /// `impl From<&X> for X`; `bitwise` when the type is `Copy`.
    CopyConstructor { bitwise: bool },
    Accessor { slot: usize },
    Equality,
    TotalEquality,
    Hash,
    /// `impl PartialEq<Storage> for X`.
    StorageEquality,
    /// `impl PartialEq<&X> for X`.
    ByRefEquality,
    CompareTo { total: bool },
    /// `impl PartialOrd` with `lt`/`le`/`gt`/`ge` forwarded to the storage.
    RelationalOperators { total: bool },
    TotalOrder,
    Arithmetic { op: BinaryOp, output: ArithmeticOutput },
    /// `From<Storage>`, or `TryFrom<Storage>` for a fallible hook.
    FromStorage,
    IntoInner,
    /// `impl From<X> for Storage`.
    IntoStorage,
    Display,
    Debug,
    NumericFormat(FormatTrait),
    TryFormat,
    Generate,
}

/// Stable tag for each [`Member`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MemberKind {
    Constructor,
    CopyConstructor,
    Accessor,
    Equality,
    TotalEquality,
    Hash,
    StorageEquality,
    ByRefEquality,
    CompareTo,
    RelationalOperators,
    TotalOrder,
    Arithmetic,
    FromStorage,
    IntoInner,
    IntoStorage,
    Display,
    Debug,
    NumericFormat,
    TryFormat,
    Generate,
}

impl Member {
    pub fn kind(&self) -> MemberKind {
        match self {
            Self::Constructor { .. } => MemberKind::Constructor,
            Self::CopyConstructor { .. } => MemberKind::CopyConstructor,
            Self::Accessor { .. } => MemberKind::Accessor,
            Self::Equality => MemberKind::Equality,
            Self::TotalEquality => MemberKind::TotalEquality,
            Self::Hash => MemberKind::Hash,
            Self::StorageEquality => MemberKind::StorageEquality,
            Self::ByRefEquality => MemberKind::ByRefEquality,
            Self::CompareTo { .. } => MemberKind::CompareTo,
            Self::RelationalOperators { .. } => MemberKind::RelationalOperators,
            Self::TotalOrder => MemberKind::TotalOrder,
            Self::Arithmetic { .. } => MemberKind::Arithmetic,
            Self::FromStorage => MemberKind::FromStorage,
            Self::IntoInner => MemberKind::IntoInner,
            Self::IntoStorage => MemberKind::IntoStorage,
            Self::Display => MemberKind::Display,
            Self::Debug => MemberKind::Debug,
            Self::NumericFormat(_) => MemberKind::NumericFormat,
            Self::TryFormat => MemberKind::TryFormat,
            Self::Generate => MemberKind::Generate,
        }
    }
}

/// The member set of one wrapper, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberIr {
    pub type_name: String,
    pub storage: Storage,
    pub constructor: ConstructorCheck,
    pub category: BaseTypeCategory,
    pub members: Vec<Member>,
}

impl MemberIr {
    pub fn has(&self, kind: MemberKind) -> bool {
        self.members.iter().any(|m| m.kind() == kind)
    }

    /// Traits a value of this wrapper type implements, as seen by other wrappers.
    pub fn wrapper_traits(&self, target: &TargetTypeDescriptor) -> TypeTraits {
        TypeTraits {
            copy: target.is_read_only,
            eq: self.has(MemberKind::TotalEquality),
            hash: self.has(MemberKind::Hash),
            ord: self.has(MemberKind::TotalOrder),
            partial_ord: self.has(MemberKind::RelationalOperators),
            display: self.has(MemberKind::Display) || target.has_user_defined_display,
        }
    }
}

/// Build the member set. Pure: the same inputs always give the same IR.
pub fn emit(
    fields: &[FieldSpec],
    target: &TargetTypeDescriptor,
    policy: &EffectivePolicy,
) -> MemberIr {
    let storage = Storage::from_fields(fields);
    let traits = storage.traits;
    let category = policy.base_type_category;

    let constructor = match (&target.validation_hook, policy.emit_validation_hook) {
        (Some(hook), true) => match &hook.error_type {
            Some(error_type) => ConstructorCheck::Fallible {
                error_type: error_type.clone(),
            },
            None => ConstructorCheck::Panicking,
        },
        _ => ConstructorCheck::None,
    };

    let mut members = vec![
        Member::Constructor {
            check: constructor.clone(),
        },
        Member::CopyConstructor {
            bitwise: target.is_read_only,
        },
    ];
    members.extend((0..storage.slots.len()).map(|slot| Member::Accessor { slot }));

    members.push(Member::Equality);
    if traits.eq {
        members.push(Member::TotalEquality);
    }
    if traits.hash {
        members.push(Member::Hash);
    }
    members.push(Member::StorageEquality);
    if target.is_read_only {
        members.push(Member::ByRefEquality);
    }

    if traits.partial_ord {
        members.push(Member::CompareTo { total: traits.ord });
    }
    if policy.emit_comparison && traits.partial_ord {
        members.push(Member::RelationalOperators { total: traits.ord });
        if traits.ord {
            members.push(Member::TotalOrder);
        }
    }

    if policy.emit_math {
        let output = if category == BaseTypeCategory::ByteWidth {
            ArithmeticOutput::Widened
        } else {
            ArithmeticOutput::Wrapper
        };
        members.extend(BinaryOp::ALL.map(|op| Member::Arithmetic { op, output }));
    }

    members.push(Member::FromStorage);
    members.push(Member::IntoInner);
    if policy.emit_implicit_conversion {
        members.push(Member::IntoStorage);
    }

    if !target.has_user_defined_display && traits.display {
        members.push(Member::Display);
    }
    if !target.has_user_defined_debug {
        members.push(Member::Debug);
    }

    if policy.is_single_field && category.is_numeric() {
        let formats: &[FormatTrait] = if category.is_integral() {
            &FormatTrait::INTEGRAL
        } else {
            &FormatTrait::FLOATING
        };
        members.extend(formats.iter().copied().map(Member::NumericFormat));
        members.push(Member::TryFormat);
    }

    if policy.is_single_field && category == BaseTypeCategory::IdentifierLike {
        members.push(Member::Generate);
    }

    MemberIr {
        type_name: target.name.clone(),
        storage,
        constructor,
        category,
        members,
    }
}
