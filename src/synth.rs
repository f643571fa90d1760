//! Turning extracted bodies into callables.
//!
//! The crate never evaluates text on its own. A [`ScriptEngine`] is injected
//! by the caller and decides what a body means and what it may touch; the
//! bundled [`crate::lua_engine::LuaEngine`] is one such engine.

use serde_json::Value;

use crate::error::{SfcError, SfcResult};
use crate::hook::LifecycleHook;
use crate::methods::MethodRecord;

/// How a unit's body should be wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// Braceless function body taking the unit's parameters.
    Function,
    /// Brace-delimited block run with no arguments.
    Block,
}

/// Everything an engine needs to build one callable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptUnit {
    pub name: String,
    pub parameters: Vec<String>,
    pub body: String,
    pub kind: UnitKind,
}

impl From<&MethodRecord> for ScriptUnit {
    fn from(record: &MethodRecord) -> Self {
        ScriptUnit {
            name: record.name.clone(),
            parameters: record.parameters.clone(),
            body: record.body.clone(),
            kind: UnitKind::Function,
        }
    }
}

impl From<&LifecycleHook> for ScriptUnit {
    fn from(hook: &LifecycleHook) -> Self {
        ScriptUnit {
            name: hook.name().to_string(),
            parameters: Vec::new(),
            body: hook.body.clone(),
            kind: UnitKind::Block,
        }
    }
}

/// A synthesized method or hook.
pub trait Callable: Send {
    fn name(&self) -> &str;

    fn parameters(&self) -> &[String];

    /// Run the body with `args` bound positionally to [`Callable::parameters`].
    fn call(&self, args: &[Value]) -> SfcResult<Value>;

    /// Fails with [`SfcError::ArityMismatch`] unless `args` matches the parameter list.
    fn check_arity(&self, args: &[Value]) -> SfcResult<()> {
        let expected = self.parameters().len();
        if args.len() != expected {
            return Err(SfcError::ArityMismatch {
                method: self.name().to_string(),
                expected,
                got: args.len(),
            });
        }
        Ok(())
    }
}

/// Execution facility for extracted bodies.
///
/// Implementations must report rejected bodies as
/// [`SfcError::SynthesisError`] naming the unit.
pub trait ScriptEngine {
    fn synthesize(&self, unit: &ScriptUnit) -> SfcResult<Box<dyn Callable>>;
}

pub fn synthesize_method(
    engine: &dyn ScriptEngine,
    record: &MethodRecord,
) -> SfcResult<Box<dyn Callable>> {
    engine.synthesize(&ScriptUnit::from(record))
}

/// The hook always becomes a zero-argument callable.
pub fn synthesize_hook(
    engine: &dyn ScriptEngine,
    hook: &LifecycleHook,
) -> SfcResult<Box<dyn Callable>> {
    engine.synthesize(&ScriptUnit::from(hook))
}

/// Synthesize every record, stopping at the first rejected body.
pub fn synthesize_methods(
    engine: &dyn ScriptEngine,
    records: &[MethodRecord],
) -> SfcResult<MethodSet> {
    let mut methods = Vec::with_capacity(records.len());
    for record in records {
        let callable = synthesize_method(engine, record).inspect_err(|e| {
            log::warn!("synthesis of '{}' failed: {}", record.name, e);
        })?;
        methods.push(callable);
    }
    Ok(MethodSet { methods })
}

/// Synthesized methods in extraction order.
pub struct MethodSet {
    methods: Vec<Box<dyn Callable>>,
}

impl MethodSet {
    /// First method with this name. Later duplicates are shadowed.
    pub fn get(&self, name: &str) -> Option<&dyn Callable> {
        self.methods
            .iter()
            .find(|m| m.name() == name)
            .map(|m| m.as_ref())
    }

    pub fn call(&self, name: &str, args: &[Value]) -> Option<SfcResult<Value>> {
        self.get(name).map(|m| m.call(args))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(|m| m.name())
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl std::fmt::Debug for MethodSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Engine that echoes its arguments and rejects bodies containing "@@".
    struct EchoEngine;

    struct Echo {
        name: String,
        parameters: Vec<String>,
    }

    impl Callable for Echo {
        fn name(&self) -> &str {
            &self.name
        }

        fn parameters(&self) -> &[String] {
            &self.parameters
        }

        fn call(&self, args: &[Value]) -> SfcResult<Value> {
            self.check_arity(args)?;
            Ok(Value::Array(args.to_vec()))
        }
    }

    impl ScriptEngine for EchoEngine {
        fn synthesize(&self, unit: &ScriptUnit) -> SfcResult<Box<dyn Callable>> {
            if unit.body.contains("@@") {
                return Err(SfcError::SynthesisError {
                    method: unit.name.clone(),
                    message: "bad token".to_string(),
                });
            }
            Ok(Box::new(Echo {
                name: unit.name.clone(),
                parameters: unit.parameters.clone(),
            }))
        }
    }

    fn record(name: &str, params: &[&str], body: &str) -> MethodRecord {
        MethodRecord {
            name: name.to_string(),
            parameters: params.iter().map(|p| p.to_string()).collect(),
            body: body.to_string(),
            span: 0..0,
        }
    }

    #[test]
    fn method_units_keep_parameters() {
        let unit = ScriptUnit::from(&record("add", &["a", "b"], "return a + b"));
        assert_eq!(unit.kind, UnitKind::Function);
        assert_eq!(unit.parameters, vec!["a", "b"]);
    }

    #[test]
    fn hook_units_take_no_arguments() {
        let hook = LifecycleHook {
            body: "{ x = 1; }".to_string(),
            span: 0..0,
        };
        let unit = ScriptUnit::from(&hook);
        assert_eq!(unit.kind, UnitKind::Block);
        assert_eq!(unit.name, "mounted");
        assert!(unit.parameters.is_empty());
        assert_eq!(unit.body, "{ x = 1; }");
    }

    #[test]
    fn method_set_lookup_and_call() {
        let set = synthesize_methods(
            &EchoEngine,
            &[record("one", &["a"], ""), record("two", &[], "")],
        )
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["one", "two"]);
        assert_eq!(set.call("one", &[json!(5)]).unwrap().unwrap(), json!([5]));
        assert!(set.call("three", &[]).is_none());
    }

    #[test]
    fn arity_is_checked() {
        let set = synthesize_methods(&EchoEngine, &[record("one", &["a"], "")]).unwrap();
        let err = set.call("one", &[]).unwrap().unwrap_err();
        assert_eq!(
            err,
            SfcError::ArityMismatch {
                method: "one".to_string(),
                expected: 1,
                got: 0
            }
        );
    }

    #[test]
    fn rejected_body_names_the_method() {
        let err = synthesize_methods(
            &EchoEngine,
            &[record("fine", &[], ""), record("bad", &[], "@@")],
        )
        .unwrap_err();
        assert!(matches!(err, SfcError::SynthesisError { ref method, .. } if method == "bad"));
    }
}
