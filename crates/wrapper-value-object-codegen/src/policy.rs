//! Resolve which optional member groups a wrapper gets.

use crate::types::{BaseTypeCategory, FieldSpec, GenerationOptions, ID_SUFFIX, TargetTypeDescriptor};

/// Decisions derived from one declaration, consumed by the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectivePolicy {
    pub is_single_field: bool,
    pub base_type_category: BaseTypeCategory,
    pub emit_comparison: bool,
    pub emit_math: bool,
    pub emit_implicit_conversion: bool,
    pub emit_validation_hook: bool,
}

/// Never fails: unset options fall back to the name heuristic.
pub fn resolve(
    fields: &[FieldSpec],
    options: &GenerationOptions,
    target: &TargetTypeDescriptor,
) -> EffectivePolicy {
    let is_single_field = fields.len() == 1;
    let base_type_category = match fields {
        [field] => BaseTypeCategory::classify(field.declared_type()),
        _ => BaseTypeCategory::Other,
    };

    let operators_allowed = is_single_field && base_type_category.is_numeric();
    let looks_like_id = target.name.ends_with(ID_SUFFIX);

    EffectivePolicy {
        is_single_field,
        base_type_category,
        emit_comparison: operators_allowed
            && options.generate_comparison_operators.resolve(!looks_like_id),
        emit_math: operators_allowed && options.generate_math_operators.resolve(!looks_like_id),
        emit_implicit_conversion: is_single_field
            && options.generate_implicit_conversion_to_primitive,
        emit_validation_hook: true,
    }
}
