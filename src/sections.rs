//! Splits a component document into its markup, behavior and style sections.

use serde::Serialize;
use std::ops::Range;

pub const TEMPLATE_START: &str = "<template>";
pub const TEMPLATE_END: &str = "</template>";
pub const SCRIPT_START: &str = "<script>";
pub const SCRIPT_END: &str = "</script>";
pub const STYLE_START: &str = "<style>";
pub const STYLE_END: &str = "</style>";

/// The three raw regions of a component document.
///
/// A section whose markers are missing or out of order is the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedSections {
    /// Text between `<template>` and the last `</template>`.
    pub markup: String,
    /// Text from `<script>` (marker included) up to the first `</script>` after it.
    pub behavior_raw: String,
    /// Text between `<style>` and the first `</style>` after it.
    pub style: String,
    /// Byte range of `behavior_raw` inside the source document.
    #[serde(skip)]
    pub behavior_span: Option<Range<usize>>,
}

impl ExtractedSections {
    /// Behavior text without the leading `<script>` marker.
    pub fn behavior_body(&self) -> &str {
        self.behavior_raw
            .strip_prefix(SCRIPT_START)
            .unwrap_or(&self.behavior_raw)
    }
}

/// Locate the markup, behavior and style sections of `source`.
///
/// Markup runs to the *last* `</template>` so nested templates stay inside it.
/// Behavior and style stop at the first end marker after their start marker.
/// Never fails: missing sections come back empty.
pub fn split_sections(source: &str) -> ExtractedSections {
    let markup = outer_span(source, TEMPLATE_START, TEMPLATE_END)
        .map(|r| source[r].to_string())
        .unwrap_or_default();

    let behavior_span = behavior_span(source);
    let behavior_raw = behavior_span
        .clone()
        .map(|r| source[r].to_string())
        .unwrap_or_default();

    let style = first_span(source, STYLE_START, STYLE_END)
        .map(|r| source[r].to_string())
        .unwrap_or_default();

    log::debug!(
        "split sections: markup={}B behavior={}B style={}B",
        markup.len(),
        behavior_raw.len(),
        style.len()
    );

    ExtractedSections {
        markup,
        behavior_raw,
        style,
        behavior_span,
    }
}

/// Byte range of the behavior section, `<script>` marker included.
pub fn behavior_span(source: &str) -> Option<Range<usize>> {
    first_span(source, SCRIPT_START, SCRIPT_END).map(|r| r.start - SCRIPT_START.len()..r.end)
}

/// Content range between the first `start` and the last `end`.
fn outer_span(source: &str, start: &str, end: &str) -> Option<Range<usize>> {
    let content_start = source.find(start)? + start.len();
    let content_end = source.rfind(end)?;
    (content_end >= content_start).then_some(content_start..content_end)
}

/// Content range between the first `start` and the first `end` after it.
fn first_span(source: &str, start: &str, end: &str) -> Option<Range<usize>> {
    let content_start = source.find(start)? + start.len();
    let content_end = content_start + source[content_start..].find(end)?;
    Some(content_start..content_end)
}
