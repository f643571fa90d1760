//! Method table extraction from the behavior section.
//!
//! After the `methods:` marker, every `name(params)` signature is followed by a
//! balanced `{ ... }` body. The table is a single-pass cursor over the
//! behavior text: each signature is searched for in what remains after the
//! previous body, so calls made inside a body are never mistaken for methods.

use regex::Regex;
use serde::Serialize;
use std::iter::FusedIterator;
use std::ops::Range;
use std::sync::OnceLock;

use crate::block::find_balanced_block;
use crate::error::{SfcError, SfcResult};

pub const METHODS_MARKER: &str = "methods:";

/// `name(params)` where params is anything up to the first `)`.
pub(crate) fn signature_regex() -> &'static Regex {
    static SIGNATURE_REGEX: OnceLock<Regex> = OnceLock::new();
    SIGNATURE_REGEX.get_or_init(|| {
        Regex::new(r"([A-Za-z_$][A-Za-z0-9_$]*)\(([^)]*)\)").expect("signature regex is valid")
    })
}

/// Split a raw parameter list on commas, trimming and dropping empty entries.
pub(crate) fn parse_parameters(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// One method found in the behavior section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodRecord {
    pub name: String,
    pub parameters: Vec<String>,
    /// Body text without the outer braces.
    pub body: String,
    /// Byte range of signature + block within the behavior text.
    #[serde(skip)]
    pub span: Range<usize>,
}

impl MethodRecord {
    /// Rebuild `name(a,b){body}` from the record.
    pub fn reconstruct(&self) -> String {
        format!(
            "{}({}){{{}}}",
            self.name,
            self.parameters.join(","),
            self.body
        )
    }
}

/// Lazy, non-restartable sequence of [`MethodRecord`]s.
///
/// Built from the behavior text; the cursor only moves forward. After an
/// error the table is exhausted, since no safe resume point exists.
#[derive(Debug)]
pub struct MethodTable<'a> {
    text: &'a str,
    cursor: usize,
    done: bool,
}

impl<'a> MethodTable<'a> {
    /// Start a table over `behavior`. If there is no `methods:` marker the
    /// table is empty.
    pub fn new(behavior: &'a str) -> Self {
        match behavior.find(METHODS_MARKER) {
            Some(pos) => MethodTable {
                text: behavior,
                cursor: pos + METHODS_MARKER.len(),
                done: false,
            },
            None => {
                log::trace!("no '{}' marker in behavior section", METHODS_MARKER);
                MethodTable {
                    text: behavior,
                    cursor: behavior.len(),
                    done: true,
                }
            }
        }
    }

    /// Drain the table, keeping every record found before a failure.
    pub fn collect_partial(self) -> PartialMethods {
        let mut methods = Vec::new();
        for item in self {
            match item {
                Ok(record) => methods.push(record),
                Err(error) => {
                    return PartialMethods {
                        methods,
                        error: Some(error),
                    }
                }
            }
        }
        PartialMethods {
            methods,
            error: None,
        }
    }

    fn next_record(&mut self) -> Option<SfcResult<MethodRecord>> {
        let caps = signature_regex().captures_at(self.text, self.cursor)?;
        let (Some(whole), Some(name), Some(params)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            return None;
        };

        let block = match find_balanced_block(self.text, whole.end()) {
            Ok(block) => block,
            Err(SfcError::MalformedInput { offset, message }) => {
                return Some(Err(SfcError::MalformedInput {
                    offset,
                    message: format!("method '{}': {}", name.as_str(), message),
                }))
            }
            Err(e) => return Some(Err(e)),
        };

        self.cursor = block.end;

        let record = MethodRecord {
            name: name.as_str().to_string(),
            parameters: parse_parameters(params.as_str()),
            body: block.inner().to_string(),
            span: whole.start()..block.end,
        };
        log::debug!(
            "found method '{}' with {} parameter(s)",
            record.name,
            record.parameters.len()
        );
        Some(Ok(record))
    }
}

impl Iterator for MethodTable<'_> {
    type Item = SfcResult<MethodRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.next_record();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
            self.cursor = self.text.len();
        }
        item
    }
}

impl FusedIterator for MethodTable<'_> {}

/// Records collected before the table stopped, plus the error that stopped it.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialMethods {
    pub methods: Vec<MethodRecord>,
    pub error: Option<SfcError>,
}

impl PartialMethods {
    pub fn into_result(self) -> SfcResult<Vec<MethodRecord>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.methods),
        }
    }
}
