use dexarb_models::advisory::{AdvisoryResult, ADVISORY_FIELDS};
use serde_json::Value;

use crate::error::ValidationError;

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Check a parsed reply against the advisory contract.
///
/// The value must be an object holding all four fields as strings, checked in
/// [`ADVISORY_FIELDS`] order; the first problem is reported. Extra fields are
/// ignored. Nothing is coerced: `42` or `{"text": ".."}` is not a string.
pub fn validate(value: &Value) -> Result<AdvisoryResult, ValidationError> {
    let obj = value
        .as_object()
        .ok_or(ValidationError::NotAnObject(type_name(value)))?;

    let mut fields: [String; 4] = Default::default();
    for (slot, field) in fields.iter_mut().zip(ADVISORY_FIELDS) {
        match obj.get(field) {
            None => return Err(ValidationError::MissingField(field)),
            Some(Value::String(s)) => *slot = s.clone(),
            Some(other) => {
                return Err(ValidationError::NotAString {
                    field,
                    found: type_name(other),
                })
            }
        }
    }

    let [decision, reason, recommendation, risk_analysis] = fields;
    Ok(AdvisoryResult {
        decision,
        reason,
        recommendation,
        risk_analysis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete() -> Value {
        json!({
            "decision": "Execute Arbitrage",
            "reason": "Spread above fees",
            "recommendation": "Buy on Sushiswap, sell on Uniswap",
            "riskAnalysis": "Gas and slippage"
        })
    }

    #[test]
    fn accepts_complete_object() {
        let result = validate(&complete()).unwrap();
        assert_eq!(result.decision, "Execute Arbitrage");
        assert_eq!(result.risk_analysis, "Gas and slippage");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let mut value = complete();
        value["confidence"] = json!(0.9);
        assert!(validate(&value).is_ok());
    }

    #[test]
    fn nested_object_is_not_a_string() {
        let mut value = complete();
        value["reason"] = json!({"text": "Spread above fees"});
        assert_eq!(
            validate(&value),
            Err(ValidationError::NotAString {
                field: "reason",
                found: "object"
            })
        );
    }

    #[test]
    fn missing_risk_analysis_is_rejected() {
        let mut value = complete();
        value.as_object_mut().unwrap().remove("riskAnalysis");
        assert_eq!(
            validate(&value),
            Err(ValidationError::MissingField("riskAnalysis"))
        );
    }

    #[test]
    fn first_problem_wins() {
        let value = json!({"reason": 1});
        assert_eq!(validate(&value), Err(ValidationError::MissingField("decision")));
    }

    #[test]
    fn numbers_are_not_coerced() {
        let mut value = complete();
        value["decision"] = json!(42);
        assert_eq!(
            validate(&value),
            Err(ValidationError::NotAString {
                field: "decision",
                found: "number"
            })
        );
    }

    #[test]
    fn non_object_is_rejected() {
        assert_eq!(
            validate(&json!(["decision"])),
            Err(ValidationError::NotAnObject("array"))
        );
        assert_eq!(
            validate(&json!("text")),
            Err(ValidationError::NotAnObject("string"))
        );
    }
}
