//! Attribute resolution against the static schemas of `typesys_core::lang::attributes`.

use typesys_core::lang::attributes::{AttrDefault, AttributeSpec};

use crate::database::Registry;
use crate::diagnostics::{TypesystemError, Warning, WarningKind};

/// Document-dependent inputs of dynamic defaults.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DefaultContext<'a> {
    pub package: &'a str,
    pub superclass: &'a str,
    /// Qualified name of the enclosing entity, if any.
    pub entity_name: Option<&'a str>,
}

/// Resolved attributes of one tag: every schema key with its value or default.
#[derive(Debug, Clone, Default)]
pub(crate) struct Attributes {
    values: Vec<(&'static str, String)>,
}

impl Attributes {
    /// Value of `key`; keys outside the schema read as empty.
    pub fn get(&self, key: &str) -> &str {
        self.values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    pub fn has_value(&self, key: &str) -> bool {
        !self.get(key).is_empty()
    }
}

/// Resolve `raw` against `specs`.
///
/// ## Errors
/// - [`TypesystemError::Attribute`] when a required key is missing or empty.
///
/// ## Notes
/// - Raw keys are matched case-insensitively; unknown keys are reported as warnings.
/// - When a key is given twice the last value wins.
pub(crate) fn resolve<'s>(
    tag_name: &str,
    specs: impl Iterator<Item = &'s AttributeSpec> + Clone,
    raw: &[(String, String)],
    defaults: DefaultContext<'_>,
    registry: &dyn Registry,
) -> Result<Attributes, TypesystemError> {
    let mut values: Vec<(&'static str, String)> = specs
        .clone()
        .map(|spec| (spec.key, default_value(spec.default, defaults)))
        .collect();

    for (key, value) in raw {
        let key = key.to_ascii_lowercase();
        match values.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value.clone(),
            None => registry.report_warning(Warning::new(
                WarningKind::UnknownAttribute,
                format!("Unknown attribute for '{tag_name}': '{key}'"),
            )),
        }
    }

    for spec in specs.filter(|s| s.required) {
        let present = values.iter().any(|(k, v)| *k == spec.key && !v.is_empty());
        if !present {
            return Err(TypesystemError::attribute(format!(
                "Required attribute '{}' missing for '{tag_name}'",
                spec.key
            )));
        }
    }

    Ok(Attributes { values })
}

fn default_value(default: AttrDefault, ctx: DefaultContext<'_>) -> String {
    match default {
        AttrDefault::Empty => String::new(),
        AttrDefault::Literal(v) => v.to_string(),
        AttrDefault::DocumentPackage => ctx.package.to_string(),
        AttrDefault::DocumentSuperclass => ctx.superclass.to_string(),
        AttrDefault::EntitySuffix(suffix) => {
            format!("{}{suffix}", ctx.entity_name.unwrap_or("").to_lowercase())
        }
    }
}

/// Interpret `value` as a boolean.
///
/// Accepts `yes|true|no|false` in any case; anything else warns and yields `default`.
pub(crate) fn convert_boolean(value: &str, attribute: &str, default: bool, registry: &dyn Registry) -> bool {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "true" => true,
        "no" | "false" => false,
        _ => {
            registry.report_warning(Warning::new(
                WarningKind::InvalidBoolean,
                format!(
                    "Boolean value '{value}' not supported in attribute '{attribute}'. Use 'yes' or 'no'. Defaulting to '{}'.",
                    if default { "yes" } else { "no" }
                ),
            ));
            default
        }
    }
}

/// Interpret a `since` attribute; empty reads as `0`, anything unparsable warns and reads as `0`.
pub(crate) fn parse_since(value: &str, registry: &dyn Registry) -> f64 {
    let value = value.trim();
    if value.is_empty() {
        return 0.0;
    }
    value.parse().unwrap_or_else(|_| {
        registry.report_warning(Warning::new(
            WarningKind::InvalidVersion,
            format!("Invalid 'since' version '{value}', using 0"),
        ));
        0.0
    })
}
