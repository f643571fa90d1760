//! # Single-file component extractor
//!
//! Splits a component document (`<template>`, `<script>`, `<style>`) into its
//! parts, pulls method bodies and the `mounted` hook out of the script, turns
//! them into callables through an injected script engine, and rewrites
//! `@font-face` rules for print output.
//!
//! ## Features
//! - Section splitting that never fails on missing sections
//! - Lazy, single-pass method table over the script section
//! - Brace-balanced body extraction with precise error offsets
//! - Pluggable [`ScriptEngine`]; a sandboxed Luau engine is bundled
//! - Font-face classification (italic / bold / classic) and substitution
//!
//! ## Example
//! ```ignore
//! use sfc_extract::{extract_component, LuaEngine};
//!
//! fn main() -> Result<(), sfc_extract::SfcError> {
//!     let src = r#"
//! <template><p>{{ total }}</p></template>
//! <script>
//! export default {
//!   methods: {
//!     add(a, b) { return a + b }
//!   },
//!   mounted() { print("ready") }
//! }
//! </script>
//! "#;
//!
//!     let component = extract_component(src)?;
//!     let methods = component.synthesize_methods(&LuaEngine::default())?;
//!     let sum = methods.call("add", &[2.into(), 3.into()]);
//!     println!("{:?}", sum);
//!     Ok(())
//! }
//! ```

pub mod block;
pub mod component;
pub mod config;
pub mod error;
pub mod font_face;
pub mod hook;
pub mod lua_engine;
pub mod methods;
pub mod sections;
pub mod synth;

// --- Core types ---
pub use block::{find_balanced_block, Block};
pub use component::{ComponentSource, ExtractedComponent};
pub use error::{SfcError, SfcResult};
pub use sections::ExtractedSections;

// --- Script types ---
pub use hook::LifecycleHook;
pub use methods::{MethodRecord, MethodTable, PartialMethods};
pub use synth::{Callable, MethodSet, ScriptEngine, ScriptUnit, UnitKind};
pub use lua_engine::LuaEngine;

// --- Style and configuration ---
pub use config::{EngineConfig, PrintConfig};
pub use font_face::{FontClass, FontFaceBlock, FontFaceReplacements};

/// Split a document into markup, behavior and style.
pub fn split_sections(source: &str) -> ExtractedSections {
    sections::split_sections(source)
}

/// Extract sections, methods, the `mounted` hook and font-face rules.
pub fn extract_component(source: &str) -> SfcResult<ExtractedComponent> {
    ComponentSource::new(source).extract()
}

/// Rewrite the `@font-face` rules of a style sheet for print.
pub fn replace_font_faces_for_print(style: &str, replacements: &FontFaceReplacements) -> String {
    font_face::rewrite_font_faces(style, replacements)
}
