use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use bizfin_core::validation::{FieldValidator, ValidationRule};

use crate::input;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Currency,
    Percentage,
    Integer,
    Real,
}

/// Arguments for field validation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ValidateArgs {
    /// Field name used in error messages
    #[arg(long, default_value = "value")]
    pub name: String,

    /// Raw value as typed into a form, e.g. "$1,250.00" or "12%"
    #[arg(long)]
    pub value: Option<String>,

    /// Rule preset
    #[arg(long, value_enum, default_value = "real")]
    pub rule: RuleKind,

    /// Allow an empty value (treated as 0)
    #[arg(long)]
    pub optional: bool,

    /// Inclusive lower bound
    #[arg(long)]
    pub min: Option<Decimal>,

    /// Inclusive upper bound
    #[arg(long)]
    pub max: Option<Decimal>,

    /// JSON file with {"fields": [{"name", "value", "rule", ...}]}
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FieldSpec {
    name: String,
    #[serde(default)]
    value: String,
    rule: RuleKind,
    #[serde(default)]
    optional: bool,
    #[serde(default)]
    min: Option<Decimal>,
    #[serde(default)]
    max: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct ValidateDocument {
    fields: Vec<FieldSpec>,
}

impl FieldSpec {
    fn rule(&self) -> ValidationRule {
        let mut rule = match self.rule {
            RuleKind::Currency => ValidationRule::currency(),
            RuleKind::Percentage => ValidationRule::percentage(),
            RuleKind::Integer => ValidationRule::non_negative_integer(),
            RuleKind::Real => ValidationRule::real(),
        };
        if self.optional {
            rule = rule.optional();
        }
        if let Some(min) = self.min {
            rule = rule.min(min);
        }
        if let Some(max) = self.max {
            rule = rule.max(max);
        }
        rule
    }
}

pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let fields = match args.value {
        Some(value) => vec![FieldSpec {
            name: args.name,
            value,
            rule: args.rule,
            optional: args.optional,
            min: args.min,
            max: args.max,
        }],
        None => {
            let doc: ValidateDocument = input::require_document(
                args.input.as_deref(),
                "--value or a fields document",
            )?;
            doc.fields
        }
    };

    Ok(check_fields(&fields))
}

fn check_fields(fields: &[FieldSpec]) -> Value {
    let mut validator = FieldValidator::new();
    for spec in fields {
        validator.field(&spec.name, &spec.value, &spec.rule());
    }

    match validator.finish() {
        Ok(values) => json!({
            "result": { "valid": true, "values": values },
            "warnings": [],
        }),
        Err(errors) => {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            json!({
                "result": { "valid": false, "errors": errors },
                "warnings": messages,
            })
        }
    }
}
