//! Luau-backed [`ScriptEngine`].
//!
//! Every synthesized callable owns a private, sandboxed Lua state with a heap
//! limit, so callables never share globals. Method bodies are Luau function
//! bodies; a block unit's outer braces become `do ... end`.

use mlua::{Function, Lua, LuaSerdeExt, MultiValue, SerializeOptions, Value as LuaValue, VmState};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::EngineConfig;
use crate::error::{SfcError, SfcResult};
use crate::synth::{Callable, ScriptEngine, ScriptUnit, UnitKind};

/// Globals that script bodies may not use.
const BLOCKED_GLOBALS: &[&str] = &[
    "io", "os", "file", "require", "loadfile", "dofile", "loadstring", "getfenv", "setfenv",
    "coroutine", "debug",
];

/// Log target for `print(...)` inside script bodies.
pub const SCRIPT_LOG_TARGET: &str = "sfc_extract::script";

#[derive(Debug, Clone, Default)]
pub struct LuaEngine {
    config: EngineConfig,
}

impl LuaEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

impl ScriptEngine for LuaEngine {
    fn synthesize(&self, unit: &ScriptUnit) -> SfcResult<Box<dyn Callable>> {
        let rejected = |e: mlua::Error| SfcError::SynthesisError {
            method: unit.name.clone(),
            message: e.to_string(),
        };

        let lua = create_unit_lua(&unit.name, self.config.memory_limit_bytes).map_err(rejected)?;
        let function = lua
            .load(render_source(unit))
            .set_name(format!("={}", unit.name))
            .eval::<Function>()
            .map_err(rejected)?;

        log::debug!(
            "synthesized '{}' ({} parameter(s))",
            unit.name,
            unit.parameters.len()
        );

        Ok(Box::new(LuaCallable {
            name: unit.name.clone(),
            parameters: unit.parameters.clone(),
            function,
            lua,
            timeout: Duration::from_millis(self.config.call_timeout_ms),
        }))
    }
}

/// Sandboxed state for one unit: blocked globals, `print` routed to the log,
/// heap limit.
fn create_unit_lua(unit_name: &str, memory_limit_bytes: usize) -> mlua::Result<Lua> {
    let lua = Lua::new();
    lua.sandbox(true)?;

    for name in BLOCKED_GLOBALS {
        let msg = format!("{} is not available in component scripts", name);
        lua.globals().set(
            *name,
            lua.create_function(move |_, _: mlua::Value| {
                Err::<(), _>(mlua::Error::RuntimeError(msg.clone()))
            })?,
        )?;
    }

    let owner = unit_name.to_string();
    lua.globals().set(
        "print",
        lua.create_function(move |_, args: mlua::Variadic<String>| {
            log::info!(target: SCRIPT_LOG_TARGET, "[{}] {}", owner, args.join(" "));
            Ok(())
        })?,
    )?;

    lua.set_memory_limit(memory_limit_bytes)?;
    Ok(lua)
}

/// Wrap the unit body in a Luau chunk that returns the function.
fn render_source(unit: &ScriptUnit) -> String {
    let params = unit.parameters.join(", ");
    match unit.kind {
        UnitKind::Function => format!("return function({})\n{}\nend", params, unit.body),
        UnitKind::Block => {
            let trimmed = unit.body.trim();
            let inner = trimmed
                .strip_prefix('{')
                .and_then(|b| b.strip_suffix('}'))
                .unwrap_or(trimmed);
            format!("return function({})\ndo\n{}\nend\nend", params, inner)
        }
    }
}

/// JSON null must arrive as nil, not as the mlua null sentinel.
fn argument_options() -> SerializeOptions {
    SerializeOptions::new()
        .serialize_none_to_null(false)
        .serialize_unit_to_null(false)
}

struct LuaCallable {
    name: String,
    parameters: Vec<String>,
    function: Function,
    lua: Lua,
    timeout: Duration,
}

impl LuaCallable {
    fn runtime_error(&self, e: mlua::Error) -> SfcError {
        SfcError::ScriptRuntimeError {
            method: self.name.clone(),
            message: e.to_string(),
        }
    }
}

impl Callable for LuaCallable {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> &[String] {
        &self.parameters
    }

    fn call(&self, args: &[Value]) -> SfcResult<Value> {
        self.check_arity(args)?;

        let lua_args = args
            .iter()
            .map(|arg| self.lua.to_value_with(arg, argument_options()))
            .collect::<mlua::Result<MultiValue>>()
            .map_err(|e| self.runtime_error(e))?;

        let timed_out = Arc::new(AtomicBool::new(false));
        let flag = timed_out.clone();
        let deadline = Instant::now() + self.timeout;
        self.lua.set_interrupt(move |_| {
            if Instant::now() >= deadline {
                flag.store(true, Ordering::Relaxed);
                return Err(mlua::Error::RuntimeError("call timed out".to_string()));
            }
            Ok(VmState::Continue)
        });

        let result = self.function.call::<LuaValue>(lua_args);
        self.lua.remove_interrupt();

        let value = match result {
            Ok(value) => value,
            Err(_) if timed_out.load(Ordering::Relaxed) => {
                log::warn!("'{}' exceeded {}ms", self.name, self.timeout.as_millis());
                return Err(SfcError::CallTimeout {
                    method: self.name.clone(),
                    timeout_ms: self.timeout.as_millis() as u64,
                });
            }
            Err(e) => return Err(self.runtime_error(e)),
        };

        self.lua
            .from_value::<Value>(value)
            .map_err(|e| self.runtime_error(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn unit(name: &str, params: &[&str], body: &str, kind: UnitKind) -> ScriptUnit {
        ScriptUnit {
            name: name.to_string(),
            parameters: params.iter().map(|p| p.to_string()).collect(),
            body: body.to_string(),
            kind,
        }
    }

    #[test]
    fn renders_function_source() {
        let src = render_source(&unit("add", &["a", "b"], " return a + b ", UnitKind::Function));
        assert_eq!(src, "return function(a, b)\n return a + b \nend");
    }

    #[test]
    fn renders_block_source() {
        let src = render_source(&unit("mounted", &[], "{ x = 1; }", UnitKind::Block));
        assert_eq!(src, "return function()\ndo\n x = 1; \nend\nend");
    }

    #[test]
    fn calls_method_with_arguments() {
        let engine = LuaEngine::default();
        let add = engine
            .synthesize(&unit("add", &["a", "b"], "return a + b", UnitKind::Function))
            .unwrap();
        let result = add.call(&[json!(2), json!(3)]).unwrap();
        assert_eq!(result.as_f64(), Some(5.0));
    }

    #[test]
    fn null_argument_arrives_as_nil() {
        let engine = LuaEngine::default();
        let f = engine
            .synthesize(&unit("isNil", &["v"], "return v == nil", UnitKind::Function))
            .unwrap();
        assert_eq!(f.call(&[Value::Null]).unwrap(), json!(true));
    }

    #[test]
    fn runs_hook_block() {
        let engine = LuaEngine::default();
        let hook = engine
            .synthesize(&unit("mounted", &[], "{ x = 1; return x + 1 }", UnitKind::Block))
            .unwrap();
        assert!(hook.parameters().is_empty());
        assert_eq!(hook.call(&[]).unwrap().as_f64(), Some(2.0));
    }

    #[test]
    fn invalid_body_is_synthesis_error() {
        let engine = LuaEngine::default();
        let err = engine
            .synthesize(&unit("broken", &[], "return +", UnitKind::Function))
            .err()
            .unwrap();
        assert!(matches!(err, SfcError::SynthesisError { ref method, .. } if method == "broken"));
    }

    #[test]
    fn wrong_arity_is_rejected() {
        let engine = LuaEngine::default();
        let f = engine
            .synthesize(&unit("one", &["a"], "return a", UnitKind::Function))
            .unwrap();
        assert!(matches!(
            f.call(&[]),
            Err(SfcError::ArityMismatch { expected: 1, got: 0, .. })
        ));
    }

    #[test]
    fn blocked_globals_fail_at_runtime() {
        let engine = LuaEngine::default();
        let f = engine
            .synthesize(&unit("load", &[], "return require('fs')", UnitKind::Function))
            .unwrap();
        match f.call(&[]) {
            Err(SfcError::ScriptRuntimeError { message, .. }) => {
                assert!(message.contains("not available"), "{}", message)
            }
            other => panic!("expected runtime error, got {:?}", other),
        }
    }

    #[test]
    fn runaway_call_times_out() {
        let engine = LuaEngine::new(EngineConfig {
            call_timeout_ms: 20,
            ..EngineConfig::default()
        });
        let f = engine
            .synthesize(&unit("spin", &[], "while true do end", UnitKind::Function))
            .unwrap();
        assert!(matches!(
            f.call(&[]),
            Err(SfcError::CallTimeout { timeout_ms: 20, .. })
        ));
    }

    #[test]
    fn callables_do_not_share_globals() {
        let engine = LuaEngine::default();
        let body = "n = (n or 0) + 1\nreturn n";
        let a = engine
            .synthesize(&unit("count", &[], body, UnitKind::Function))
            .unwrap();
        let b = engine
            .synthesize(&unit("count", &[], body, UnitKind::Function))
            .unwrap();
        assert_eq!(a.call(&[]).unwrap().as_f64(), Some(1.0));
        assert_eq!(a.call(&[]).unwrap().as_f64(), Some(2.0));
        assert_eq!(b.call(&[]).unwrap().as_f64(), Some(1.0));
    }

    #[test]
    fn print_is_routed_to_log() {
        let engine = LuaEngine::default();
        let f = engine
            .synthesize(&unit("say", &["m"], "print('said', m)", UnitKind::Function))
            .unwrap();
        assert_eq!(f.call(&[json!("hi")]).unwrap(), Value::Null);
    }
}
