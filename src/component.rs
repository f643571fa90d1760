use serde::Serialize;

use crate::error::SfcResult;
use crate::font_face::{rewrite_font_faces, scan_font_faces, FontFaceBlock, FontFaceReplacements};
use crate::hook::{extract_mounted, LifecycleHook};
use crate::methods::{MethodRecord, MethodTable, PartialMethods};
use crate::sections::{behavior_span, split_sections, ExtractedSections};
use crate::synth::{synthesize_hook, synthesize_methods, Callable, MethodSet, ScriptEngine};

/// One component document. Extraction borrows the text and never changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentSource<'a> {
    text: &'a str,
}

/// Everything extracted from one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedComponent {
    pub sections: ExtractedSections,
    pub methods: Vec<MethodRecord>,
    pub mounted: Option<LifecycleHook>,
    pub font_faces: Vec<FontFaceBlock>,
}

impl<'a> ComponentSource<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn sections(&self) -> ExtractedSections {
        split_sections(self.text)
    }

    /// Lazy method table over the behavior section.
    pub fn methods(&self) -> MethodTable<'a> {
        MethodTable::new(self.behavior())
    }

    /// All methods up to the first malformed one.
    pub fn collect_methods(&self) -> PartialMethods {
        self.methods().collect_partial()
    }

    pub fn mounted(&self) -> SfcResult<Option<LifecycleHook>> {
        extract_mounted(self.behavior())
    }

    /// Run the whole pipeline. Any malformed method or hook fails the call.
    pub fn extract(&self) -> SfcResult<ExtractedComponent> {
        let sections = self.sections();
        let methods = self.collect_methods().into_result()?;
        let mounted = self.mounted()?;
        let font_faces = scan_font_faces(&sections.style);

        Ok(ExtractedComponent {
            sections,
            methods,
            mounted,
            font_faces,
        })
    }

    /// Style section with its `@font-face` rules swapped for print.
    pub fn print_style(&self, replacements: &FontFaceReplacements) -> String {
        rewrite_font_faces(&self.sections().style, replacements)
    }

    /// Behavior slice of the source, borrowed so the method table can keep
    /// offsets into it.
    fn behavior(&self) -> &'a str {
        behavior_span(self.text)
            .map(|span| &self.text[span])
            .unwrap_or("")
    }
}

impl ExtractedComponent {
    pub fn synthesize_methods(&self, engine: &dyn ScriptEngine) -> SfcResult<MethodSet> {
        synthesize_methods(engine, &self.methods)
    }

    pub fn synthesize_mounted(
        &self,
        engine: &dyn ScriptEngine,
    ) -> SfcResult<Option<Box<dyn Callable>>> {
        self.mounted
            .as_ref()
            .map(|hook| synthesize_hook(engine, hook))
            .transpose()
    }
}
