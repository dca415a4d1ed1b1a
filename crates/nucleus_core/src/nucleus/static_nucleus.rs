//! Built-in declarative nucleus.
//!
//! # Responsibility
//! - Turn a JSON declaration into a ready nucleus without any interpreter.
//! - Serve constant, echo, or failing functions.
//! - Enforce declared per-entry-type validation rules.
//!
//! # Invariants
//! - Functions are exposed in declaration order and sealed after load.
//! - Every regex is compiled at load time; `call`/`validate_entry` never fail
//!   because of malformed source.
//! - Entry types without declared rules are always valid.
//! - A rule set is either string rules (`pattern`, `max_length`) or object
//!   rules (`required`, `fields`); an entry of the other shape always fails.

use super::{InterfaceTable, Nucleus, NucleusBuilder, NucleusError, NucleusResult};
use crate::model::entry::EntryDef;
use crate::model::interface::{Interface, InterfaceSchemaType};
use crate::model::value::CallValue;
use log::debug;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Registered type name of the built-in declarative nucleus.
pub const STATIC_NUCLEUS_TYPE: &str = "static";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StaticSource {
    #[serde(default)]
    functions: Vec<FunctionDecl>,
    #[serde(default)]
    entries: BTreeMap<String, EntryRulesDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FunctionDecl {
    name: String,
    schema: InterfaceSchemaType,
    #[serde(default)]
    returns: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntryRulesDecl {
    #[serde(default)]
    required: Vec<String>,
    #[serde(default)]
    fields: BTreeMap<String, String>,
    #[serde(default)]
    pattern: Option<String>,
    #[serde(default)]
    max_length: Option<usize>,
}

#[derive(Debug, Clone)]
enum Behavior {
    Constant(CallValue),
    Echo,
    Fail(String),
}

#[derive(Debug)]
struct FunctionImpl {
    schema: InterfaceSchemaType,
    behavior: Behavior,
}

#[derive(Debug)]
struct EntryRules {
    required: Vec<String>,
    fields: Vec<(String, Regex)>,
    pattern: Option<Regex>,
    max_length: Option<usize>,
}

/// Declarative nucleus built from a JSON source document.
#[derive(Debug)]
pub struct StaticNucleus {
    interfaces: InterfaceTable,
    functions: BTreeMap<String, FunctionImpl>,
    entries: BTreeMap<String, EntryRules>,
}

impl StaticNucleus {
    /// Parses `code`, exposes every declared function and seals the result.
    ///
    /// # Errors
    /// - `NucleusError::Load` for malformed JSON, bad regexes, a `returns`
    ///   constant that does not fit the function schema, or an entry rule set
    ///   mixing string and object rules.
    /// - `NucleusError::DuplicateInterface` when a name is declared twice.
    pub fn load(code: &str) -> NucleusResult<Self> {
        let source: StaticSource =
            serde_json::from_str(code).map_err(|err| NucleusError::Load(err.to_string()))?;

        let mut nucleus = Self {
            interfaces: InterfaceTable::new(),
            functions: BTreeMap::new(),
            entries: BTreeMap::new(),
        };

        for decl in source.functions {
            let behavior = compile_behavior(&decl)?;
            nucleus.expose(Interface::new(decl.name.clone(), decl.schema))?;
            nucleus.functions.insert(
                decl.name,
                FunctionImpl {
                    schema: decl.schema,
                    behavior,
                },
            );
        }

        for (entry_type, decl) in source.entries {
            let rules = compile_rules(&entry_type, decl)?;
            nucleus.entries.insert(entry_type, rules);
        }

        nucleus.interfaces.seal();
        debug!(
            "event=nucleus_load module=static status=ok functions={} entry_rules={}",
            nucleus.interfaces.len(),
            nucleus.entries.len()
        );
        Ok(nucleus)
    }

    pub fn state(&self) -> super::NucleusState {
        self.interfaces.state()
    }
}

impl NucleusBuilder for StaticNucleus {
    fn expose(&mut self, interface: Interface) -> NucleusResult<()> {
        self.interfaces.expose(interface)
    }
}

impl Nucleus for StaticNucleus {
    fn nucleus_type(&self) -> &str {
        STATIC_NUCLEUS_TYPE
    }

    fn validate_entry(&self, def: &EntryDef, entry: &CallValue) -> NucleusResult<()> {
        ensure_schema(&def.name, def.format, entry)?;
        let Some(rules) = self.entries.get(def.name.as_str()) else {
            return Ok(());
        };

        match entry {
            CallValue::Str(value) => rules.check_string(&def.name, value),
            CallValue::Json(value) => rules.check_json(&def.name, value),
        }
    }

    fn interfaces(&self) -> &[Interface] {
        self.interfaces.as_slice()
    }

    fn call(&mut self, name: &str, params: CallValue) -> NucleusResult<CallValue> {
        let function = self
            .functions
            .get(name)
            .ok_or_else(|| NucleusError::FunctionNotFound(name.to_string()))?;
        ensure_schema(name, function.schema, &params)?;

        match &function.behavior {
            Behavior::Constant(value) => Ok(value.clone()),
            Behavior::Echo => Ok(params),
            Behavior::Fail(message) => Err(NucleusError::Execution(message.clone())),
        }
    }
}

/// Factory registered under [`STATIC_NUCLEUS_TYPE`]. The host is not consulted.
pub fn new_static_nucleus<H: ?Sized>(_host: &H, code: &str) -> NucleusResult<Box<dyn Nucleus>> {
    Ok(Box::new(StaticNucleus::load(code)?))
}

impl EntryRules {
    fn has_string_rules(&self) -> bool {
        self.pattern.is_some() || self.max_length.is_some()
    }

    fn has_object_rules(&self) -> bool {
        !self.required.is_empty() || !self.fields.is_empty()
    }

    fn check_string(&self, entry: &str, value: &str) -> NucleusResult<()> {
        if self.has_object_rules() {
            return Err(violation(entry, "object"));
        }
        if let Some(max_length) = self.max_length {
            if value.chars().count() > max_length {
                return Err(violation(entry, "max_length"));
            }
        }
        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(value) {
                return Err(violation(entry, "pattern"));
            }
        }
        Ok(())
    }

    fn check_json(&self, entry: &str, value: &serde_json::Value) -> NucleusResult<()> {
        if self.has_string_rules() {
            return Err(violation(entry, "string"));
        }
        if !self.has_object_rules() {
            return Ok(());
        }
        let Some(object) = value.as_object() else {
            return Err(violation(entry, "object"));
        };

        for field in &self.required {
            match object.get(field) {
                Some(value) if !value.is_null() => {}
                _ => return Err(violation(entry, &format!("required:{field}"))),
            }
        }

        for (field, pattern) in &self.fields {
            let Some(value) = object.get(field) else {
                continue;
            };
            let matched = value.as_str().is_some_and(|text| pattern.is_match(text));
            if !matched {
                return Err(violation(entry, &format!("pattern:{field}")));
            }
        }
        Ok(())
    }
}

fn compile_behavior(decl: &FunctionDecl) -> NucleusResult<Behavior> {
    if let Some(message) = &decl.error {
        return Ok(Behavior::Fail(message.clone()));
    }
    let Some(returns) = &decl.returns else {
        return Ok(Behavior::Echo);
    };

    match (decl.schema, returns) {
        (InterfaceSchemaType::String, serde_json::Value::String(value)) => {
            Ok(Behavior::Constant(CallValue::Str(value.clone())))
        }
        (InterfaceSchemaType::String, _) => Err(NucleusError::Load(format!(
            "function `{}` declares string schema but returns a non-string constant",
            decl.name
        ))),
        (InterfaceSchemaType::Json, value) => Ok(Behavior::Constant(CallValue::Json(value.clone()))),
    }
}

fn compile_rules(entry_type: &str, decl: EntryRulesDecl) -> NucleusResult<EntryRules> {
    let compile = |pattern: &str| {
        Regex::new(pattern).map_err(|err| {
            NucleusError::Load(format!("invalid pattern for entry `{entry_type}`: {err}"))
        })
    };

    let fields = decl
        .fields
        .iter()
        .map(|(field, pattern)| Ok((field.clone(), compile(pattern.as_str())?)))
        .collect::<NucleusResult<Vec<_>>>()?;
    let pattern = decl.pattern.as_deref().map(compile).transpose()?;

    let rules = EntryRules {
        required: decl.required,
        fields,
        pattern,
        max_length: decl.max_length,
    };
    if rules.has_string_rules() && rules.has_object_rules() {
        return Err(NucleusError::Load(format!(
            "entry `{entry_type}` mixes string rules with object rules"
        )));
    }
    Ok(rules)
}

fn ensure_schema(
    target: &str,
    expected: InterfaceSchemaType,
    value: &CallValue,
) -> NucleusResult<()> {
    let actual = value.schema();
    if actual != expected {
        return Err(NucleusError::SchemaMismatch {
            target: target.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

fn violation(entry: &str, rule: &str) -> NucleusError {
    NucleusError::Validation {
        entry: entry.to_string(),
        rule: rule.to_string(),
    }
}
