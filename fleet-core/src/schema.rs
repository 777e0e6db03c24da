//! Argument schemas and the validation applied before a handler runs.
//!
//! A tool's JSON Schema is generated from its `Input` type with `schemars`.
//! At registration the schema is read back into an [`ArgumentSchema`], the
//! flat list of named, typed arguments the dispatcher validates against, so
//! the input struct is the only place an argument is declared.

use std::collections::HashSet;
use std::fmt;

use schemars::generate::SchemaSettings;
use schemars::JsonSchema;
use serde_json::{Map, Number, Value};

/// JSON Schema for a tool input type, with subschemas inlined.
pub fn input_schema_for<T: JsonSchema>() -> Value {
    SchemaSettings::draft2020_12()
        .with(|settings| settings.inline_subschemas = true)
        .into_generator()
        .into_root_schema_for::<T>()
        .to_value()
}

/// Semantic type of a single argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentKind {
    String,
    /// A whole number within the inclusive bounds.
    Integer { min: i64, max: i64 },
    Number,
    Boolean,
    /// A string restricted to the listed values (case-sensitive).
    Enum(Vec<String>),
    /// An ordered sequence of strings.
    StringList,
}

/// One declared argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    pub kind: ArgumentKind,
    pub required: bool,
}

/// A validation failure that names the offending argument.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{argument}: {message}")]
pub struct ArgumentError {
    pub argument: String,
    pub message: String,
}

impl ArgumentError {
    pub fn new(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            argument: argument.into(),
            message: message.into(),
        }
    }

    fn missing(argument: &str) -> Self {
        Self::new(argument, "required argument is missing")
    }

    fn wrong_type(argument: &str, expected: &str, got: &Value) -> Self {
        Self::new(
            argument,
            format!("expected {}, got {}", expected, json_type_name(got)),
        )
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Ordered list of arguments a tool accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentSchema {
    arguments: Vec<Argument>,
}

impl ArgumentSchema {
    /// Read the arguments out of an object JSON Schema.
    ///
    /// Properties keep their declared order. Fails when the schema describes
    /// something other than a flat object of strings, numbers, booleans,
    /// string enums and string lists.
    pub fn from_json_schema(schema: &Value) -> Result<Self, String> {
        let root = schema
            .as_object()
            .ok_or_else(|| "input schema must be a JSON object".to_string())?;

        if let Some(types) = root.get("type") {
            if !type_names(types).contains(&"object") {
                return Err("input schema must describe an object".to_string());
            }
        }

        let required: HashSet<&str> = root
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let empty = Map::new();
        let properties = match root.get("properties") {
            None => &empty,
            Some(Value::Object(properties)) => properties,
            Some(_) => return Err("'properties' must be an object".to_string()),
        };

        for name in &required {
            if !properties.contains_key(*name) {
                return Err(format!("required argument '{}' is not declared", name));
            }
        }

        let mut arguments = Vec::with_capacity(properties.len());
        for (name, property) in properties {
            if name.is_empty() {
                return Err("argument name must not be empty".to_string());
            }
            let kind = kind_of(root, property, 0)
                .map_err(|reason| format!("argument '{}': {}", name, reason))?;
            arguments.push(Argument {
                name: name.clone(),
                kind,
                required: required.contains(name.as_str()),
            });
        }
        Ok(Self { arguments })
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn get(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|a| a.name == name)
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Validate raw arguments and return the coerced argument map.
    ///
    /// `null` counts as absent, numeric and boolean strings are coerced,
    /// integral numbers are normalized to integers, and undeclared arguments
    /// are dropped.
    pub fn validate(&self, raw: &Value) -> Result<Map<String, Value>, ArgumentError> {
        let empty = Map::new();
        let provided = match raw {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => return Err(ArgumentError::wrong_type("arguments", "object", other)),
        };

        let mut validated = Map::new();
        for arg in &self.arguments {
            match provided.get(&arg.name) {
                None | Some(Value::Null) => {
                    if arg.required {
                        return Err(ArgumentError::missing(&arg.name));
                    }
                }
                Some(value) => {
                    let coerced = coerce(arg, value)?;
                    validated.insert(arg.name.clone(), coerced);
                }
            }
        }
        Ok(validated)
    }
}

// ===== Reading schemas =====

const MAX_REFERENCE_DEPTH: usize = 16;

fn type_names(types: &Value) -> Vec<&str> {
    match types {
        Value::String(t) => vec![t.as_str()],
        Value::Array(ts) => ts.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

fn lookup_reference<'a>(root: &'a Map<String, Value>, reference: &str) -> Option<&'a Value> {
    let mut parts = reference.strip_prefix("#/")?.split('/');
    let mut current = root.get(parts.next()?)?;
    for part in parts {
        current = current.get(part)?;
    }
    Some(current)
}

fn is_null_schema(schema: &Value) -> bool {
    match schema.get("type") {
        Some(types) => type_names(types) == ["null"],
        None => schema.get("const").is_some_and(Value::is_null),
    }
}

fn kind_of(root: &Map<String, Value>, schema: &Value, depth: usize) -> Result<ArgumentKind, String> {
    if depth > MAX_REFERENCE_DEPTH {
        return Err("schema nesting is too deep".to_string());
    }
    let obj = schema
        .as_object()
        .ok_or_else(|| "unconstrained arguments are not supported".to_string())?;

    if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
        let target = lookup_reference(root, reference)
            .ok_or_else(|| format!("unresolved reference '{}'", reference))?;
        return kind_of(root, target, depth + 1);
    }

    if let Some(values) = obj.get("enum").and_then(Value::as_array) {
        return enum_kind(values.iter());
    }
    if let Some(value) = obj.get("const") {
        return enum_kind(std::iter::once(value));
    }

    if let Some(branches) = obj
        .get("anyOf")
        .or_else(|| obj.get("oneOf"))
        .and_then(Value::as_array)
    {
        let branches: Vec<&Value> = branches.iter().filter(|b| !is_null_schema(b)).collect();
        if let [single] = branches.as_slice() {
            return kind_of(root, single, depth + 1);
        }
        let mut values = Vec::new();
        for branch in branches {
            match kind_of(root, branch, depth + 1)? {
                ArgumentKind::Enum(branch_values) => values.extend(branch_values),
                _ => return Err("unions other than string enums are not supported".to_string()),
            }
        }
        if values.is_empty() {
            return Err("empty union".to_string());
        }
        return Ok(ArgumentKind::Enum(values));
    }

    let types: Vec<&str> = obj
        .get("type")
        .map(type_names)
        .unwrap_or_default()
        .into_iter()
        .filter(|t| *t != "null")
        .collect();

    match types.as_slice() {
        ["string"] => Ok(ArgumentKind::String),
        ["boolean"] => Ok(ArgumentKind::Boolean),
        ["number"] => Ok(ArgumentKind::Number),
        ["integer"] => Ok(integer_kind(obj)),
        ["array"] => {
            let items = match obj.get("items") {
                Some(items) => kind_of(root, items, depth + 1)?,
                None => return Err("array items must be declared".to_string()),
            };
            if items != ArgumentKind::String {
                return Err("only arrays of strings are supported".to_string());
            }
            Ok(ArgumentKind::StringList)
        }
        [] => Err("missing type".to_string()),
        other => Err(format!("unsupported type {:?}", other)),
    }
}

fn enum_kind<'a>(values: impl Iterator<Item = &'a Value>) -> Result<ArgumentKind, String> {
    let mut allowed = Vec::new();
    for value in values {
        match value {
            Value::String(s) => allowed.push(s.clone()),
            Value::Null => {}
            other => return Err(format!("enum value {} is not a string", other)),
        }
    }
    if allowed.is_empty() {
        return Err("empty enum".to_string());
    }
    Ok(ArgumentKind::Enum(allowed))
}

fn integer_kind(obj: &Map<String, Value>) -> ArgumentKind {
    let (mut min, mut max) = match obj.get("format").and_then(Value::as_str) {
        Some("int8") => (i64::from(i8::MIN), i64::from(i8::MAX)),
        Some("int16") => (i64::from(i16::MIN), i64::from(i16::MAX)),
        Some("int32") => (i64::from(i32::MIN), i64::from(i32::MAX)),
        Some("uint8") => (0, i64::from(u8::MAX)),
        Some("uint16") => (0, i64::from(u16::MAX)),
        Some("uint32") => (0, i64::from(u32::MAX)),
        Some("uint64") | Some("uint") => (0, i64::MAX),
        _ => (i64::MIN, i64::MAX),
    };
    // float to int casts saturate
    if let Some(minimum) = obj.get("minimum").and_then(Value::as_f64) {
        min = min.max(minimum.ceil() as i64);
    }
    if let Some(maximum) = obj.get("maximum").and_then(Value::as_f64) {
        max = max.min(maximum.floor() as i64);
    }
    ArgumentKind::Integer { min, max }
}

// ===== Coercion =====

fn coerce(arg: &Argument, value: &Value) -> Result<Value, ArgumentError> {
    let name = arg.name.as_str();
    match &arg.kind {
        ArgumentKind::String => match value {
            Value::String(_) => Ok(value.clone()),
            other => Err(ArgumentError::wrong_type(name, "string", other)),
        },
        ArgumentKind::Integer { min, max } => coerce_integer(name, value, *min, *max),
        ArgumentKind::Number => coerce_number(name, value),
        ArgumentKind::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) if s == "true" => Ok(Value::Bool(true)),
            Value::String(s) if s == "false" => Ok(Value::Bool(false)),
            other => Err(ArgumentError::wrong_type(name, "boolean", other)),
        },
        ArgumentKind::Enum(allowed) => match value {
            Value::String(s) if allowed.contains(s) => Ok(value.clone()),
            Value::String(s) => Err(ArgumentError::new(
                name,
                format!("'{}' is not one of {}", s, OneOf(allowed)),
            )),
            other => Err(ArgumentError::wrong_type(name, "string", other)),
        },
        ArgumentKind::StringList => match value {
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        return Err(ArgumentError::new(
                            name,
                            format!("element {} expected string, got {}", i, json_type_name(item)),
                        ));
                    }
                }
                Ok(value.clone())
            }
            other => Err(ArgumentError::wrong_type(name, "array of strings", other)),
        },
    }
}

fn parse_number(name: &str, s: &str) -> Result<Number, ArgumentError> {
    let trimmed = s.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Ok(i.into());
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| ArgumentError::new(name, format!("expected number, got string '{}'", s)))
}

fn coerce_number(name: &str, value: &Value) -> Result<Value, ArgumentError> {
    let number = match value {
        Value::Number(n) => n.clone(),
        Value::String(s) => parse_number(name, s)?,
        other => return Err(ArgumentError::wrong_type(name, "number", other)),
    };
    if number.is_i64() || number.is_u64() {
        return Ok(Value::Number(number));
    }

    let f = number
        .as_f64()
        .filter(|f| f.is_finite())
        .ok_or_else(|| ArgumentError::new(name, "expected a finite number"))?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        return Ok(Value::Number((f as i64).into()));
    }
    Ok(Value::Number(number))
}

fn coerce_integer(name: &str, value: &Value, min: i64, max: i64) -> Result<Value, ArgumentError> {
    let number = match value {
        Value::Number(n) => n.clone(),
        Value::String(s) => parse_number(name, s)?,
        other => return Err(ArgumentError::wrong_type(name, "integer", other)),
    };
    let out_of_range =
        || ArgumentError::new(name, format!("{} is out of range [{}, {}]", number, min, max));

    let integer = match number.as_i64() {
        Some(i) => i,
        None if number.is_u64() => return Err(out_of_range()),
        None => {
            let f = number.as_f64().unwrap_or(f64::NAN);
            if !f.is_finite() || f.fract() != 0.0 {
                return Err(ArgumentError::new(
                    name,
                    format!("expected an integer, got {}", number),
                ));
            }
            if f < i64::MIN as f64 || f >= i64::MAX as f64 {
                return Err(out_of_range());
            }
            f as i64
        }
    };

    if integer < min || integer > max {
        return Err(out_of_range());
    }
    Ok(Value::Number(integer.into()))
}

struct OneOf<'a>(&'a [String]);

impl fmt::Display for OneOf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    #[serde(rename_all = "lowercase")]
    enum Action {
        Start,
        Stop,
        Reboot,
    }

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    #[serde(rename_all = "camelCase")]
    struct ManageInput {
        /// Instance ID
        instance_id: String,
        /// Action to perform
        action: Action,
        #[serde(default)]
        fallback: Option<Action>,
        #[serde(default)]
        max_results: Option<i32>,
        #[serde(default)]
        hours_back: Option<f64>,
        #[serde(default)]
        start_from_head: Option<bool>,
        #[serde(default)]
        status_filter: Option<Vec<String>>,
    }

    fn schema() -> ArgumentSchema {
        ArgumentSchema::from_json_schema(&input_schema_for::<ManageInput>()).unwrap()
    }

    // ===== Reading schemas =====

    #[test]
    fn test_from_json_schema_reads_derived_input() {
        let schema = schema();
        let names: Vec<&str> = schema.arguments().iter().map(|a| a.name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "instanceId",
                "action",
                "fallback",
                "maxResults",
                "hoursBack",
                "startFromHead",
                "statusFilter"
            ]
        );
        assert!(schema.get("instanceId").unwrap().required);
        assert!(!schema.get("maxResults").unwrap().required);

        let actions = ArgumentKind::Enum(vec!["start".into(), "stop".into(), "reboot".into()]);
        assert_eq!(schema.get("action").unwrap().kind, actions);
        assert_eq!(schema.get("fallback").unwrap().kind, actions);
        assert_eq!(
            schema.get("maxResults").unwrap().kind,
            ArgumentKind::Integer {
                min: i64::from(i32::MIN),
                max: i64::from(i32::MAX)
            }
        );
        assert_eq!(schema.get("hoursBack").unwrap().kind, ArgumentKind::Number);
        assert_eq!(schema.get("startFromHead").unwrap().kind, ArgumentKind::Boolean);
        assert_eq!(schema.get("statusFilter").unwrap().kind, ArgumentKind::StringList);
    }

    #[test]
    fn test_derived_schema_carries_descriptions() {
        let rendered = input_schema_for::<ManageInput>();
        assert_eq!(rendered["properties"]["instanceId"]["description"], "Instance ID");
        assert_eq!(rendered["required"], json!(["instanceId", "action"]));
    }

    #[test]
    fn test_from_json_schema_resolves_references_and_const_unions() {
        let schema = ArgumentSchema::from_json_schema(&json!({
            "type": "object",
            "properties": {
                "state": {"$ref": "#/$defs/State"},
                "limit": {"type": ["integer", "null"], "format": "uint32", "minimum": 1}
            },
            "$defs": {
                "State": {"oneOf": [
                    {"const": "OK", "description": "Fine"},
                    {"const": "ALARM", "description": "Not fine"}
                ]}
            }
        }))
        .unwrap();

        assert_eq!(
            schema.get("state").unwrap().kind,
            ArgumentKind::Enum(vec!["OK".into(), "ALARM".into()])
        );
        assert_eq!(
            schema.get("limit").unwrap().kind,
            ArgumentKind::Integer {
                min: 1,
                max: i64::from(u32::MAX)
            }
        );
    }

    #[test]
    fn test_from_json_schema_rejects_unsupported_shapes() {
        let nested = json!({
            "type": "object",
            "properties": {"filter": {"type": "object"}}
        });
        let err = ArgumentSchema::from_json_schema(&nested).unwrap_err();
        assert!(err.contains("filter"), "{err}");

        let undeclared = json!({"type": "object", "required": ["bucket"]});
        let err = ArgumentSchema::from_json_schema(&undeclared).unwrap_err();
        assert!(err.contains("bucket"), "{err}");

        let empty_enum = json!({
            "type": "object",
            "properties": {"action": {"type": "string", "enum": []}}
        });
        assert!(ArgumentSchema::from_json_schema(&empty_enum).is_err());
    }

    #[test]
    fn test_from_json_schema_without_properties_is_empty() {
        let schema = ArgumentSchema::from_json_schema(&json!({"type": "object"})).unwrap();
        assert!(schema.is_empty());
    }

    // ===== Validation =====

    #[test]
    fn test_validate_accepts_minimal_arguments() {
        let args = schema()
            .validate(&json!({"instanceId": "i-1", "action": "stop"}))
            .unwrap();

        assert_eq!(args.len(), 2);
        assert_eq!(args["action"], "stop");
    }

    #[test]
    fn test_validate_missing_required() {
        let err = schema().validate(&json!({"action": "stop"})).unwrap_err();
        assert_eq!(err.argument, "instanceId");
        assert!(err.message.contains("missing"));
    }

    #[test]
    fn test_validate_null_required_is_missing() {
        let err = schema()
            .validate(&json!({"instanceId": null, "action": "stop"}))
            .unwrap_err();
        assert_eq!(err.argument, "instanceId");
    }

    #[test]
    fn test_validate_null_optional_is_absent() {
        let args = schema()
            .validate(&json!({"instanceId": "i-1", "action": "stop", "maxResults": null}))
            .unwrap();
        assert!(!args.contains_key("maxResults"));
    }

    #[test]
    fn test_validate_enum_outside_set() {
        let err = schema()
            .validate(&json!({"instanceId": "i-1", "action": "terminate"}))
            .unwrap_err();
        assert_eq!(err.argument, "action");
        assert_eq!(err.message, "'terminate' is not one of [start, stop, reboot]");
    }

    #[test]
    fn test_validate_enum_is_case_sensitive() {
        let err = schema()
            .validate(&json!({"instanceId": "i-1", "action": "Stop"}))
            .unwrap_err();
        assert_eq!(err.argument, "action");
    }

    #[test]
    fn test_validate_wrong_type_for_string() {
        let err = schema()
            .validate(&json!({"instanceId": 42, "action": "stop"}))
            .unwrap_err();
        assert_eq!(err.argument, "instanceId");
        assert_eq!(err.message, "expected string, got number");
    }

    #[test]
    fn test_validate_drops_undeclared_arguments() {
        let args = schema()
            .validate(&json!({"instanceId": "i-1", "action": "start", "extra": true}))
            .unwrap();
        assert!(!args.contains_key("extra"));
    }

    #[test]
    fn test_validate_rejects_non_object_payload() {
        let err = schema().validate(&json!(["i-1"])).unwrap_err();
        assert_eq!(err.argument, "arguments");
    }

    #[test]
    fn test_validate_null_payload_is_empty_object() {
        let empty = ArgumentSchema::default();
        assert!(empty.validate(&Value::Null).unwrap().is_empty());
    }

    // ===== Coercion =====

    #[test]
    fn test_integer_accepts_numeric_string() {
        let args = schema()
            .validate(&json!({"instanceId": "i", "action": "stop", "maxResults": "25"}))
            .unwrap();
        assert_eq!(args["maxResults"], json!(25));
    }

    #[test]
    fn test_integer_normalizes_integral_float() {
        let args = schema()
            .validate(&json!({"instanceId": "i", "action": "stop", "maxResults": 50.0}))
            .unwrap();
        assert!(args["maxResults"].is_i64());
        assert_eq!(args["maxResults"], json!(50));
    }

    #[test]
    fn test_integer_rejects_fraction() {
        let err = schema()
            .validate(&json!({"instanceId": "i", "action": "stop", "maxResults": 2.5}))
            .unwrap_err();
        assert_eq!(err.argument, "maxResults");
        assert_eq!(err.message, "expected an integer, got 2.5");

        let err = schema()
            .validate(&json!({"instanceId": "i", "action": "stop", "maxResults": "1.5"}))
            .unwrap_err();
        assert_eq!(err.argument, "maxResults");
    }

    #[test]
    fn test_integer_rejects_out_of_range() {
        let err = schema()
            .validate(&json!({"instanceId": "i", "action": "stop", "maxResults": 10_000_000_000i64}))
            .unwrap_err();
        assert_eq!(err.argument, "maxResults");
        assert_eq!(
            err.message,
            "10000000000 is out of range [-2147483648, 2147483647]"
        );

        let err = schema()
            .validate(&json!({"instanceId": "i", "action": "stop", "maxResults": 1e300}))
            .unwrap_err();
        assert_eq!(err.argument, "maxResults");
    }

    #[test]
    fn test_number_keeps_fractional_value() {
        let args = schema()
            .validate(&json!({"instanceId": "i", "action": "stop", "hoursBack": "1.5"}))
            .unwrap();
        assert_eq!(args["hoursBack"], json!(1.5));
    }

    #[test]
    fn test_number_rejects_text() {
        let err = schema()
            .validate(&json!({"instanceId": "i", "action": "stop", "hoursBack": "lots"}))
            .unwrap_err();
        assert_eq!(err.argument, "hoursBack");
    }

    #[test]
    fn test_boolean_accepts_string_forms() {
        let args = schema()
            .validate(&json!({"instanceId": "i", "action": "stop", "startFromHead": "true"}))
            .unwrap();
        assert_eq!(args["startFromHead"], json!(true));

        let err = schema()
            .validate(&json!({"instanceId": "i", "action": "stop", "startFromHead": "yes"}))
            .unwrap_err();
        assert_eq!(err.argument, "startFromHead");
    }

    #[test]
    fn test_string_list_rejects_mixed_elements() {
        let err = schema()
            .validate(&json!({"instanceId": "i", "action": "stop", "statusFilter": ["A", 1]}))
            .unwrap_err();
        assert_eq!(err.argument, "statusFilter");
        assert!(err.message.contains("element 1"));
    }
}
