//! The `mounted` lifecycle hook.

use regex::Regex;
use serde::Serialize;
use std::ops::Range;
use std::sync::OnceLock;

use crate::block::find_balanced_block;
use crate::error::SfcResult;

pub const MOUNTED_HOOK: &str = "mounted";

fn mounted_regex() -> &'static Regex {
    static MOUNTED_REGEX: OnceLock<Regex> = OnceLock::new();
    MOUNTED_REGEX.get_or_init(|| {
        Regex::new(r"(?:^|[^A-Za-z0-9_$])(mounted)\([^)]*\)").expect("mounted regex is valid")
    })
}

/// Body of the `mounted` hook, braces included. It runs as a zero-argument
/// block when synthesized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LifecycleHook {
    pub body: String,
    /// Byte range of signature + block within the behavior text.
    #[serde(skip)]
    pub span: Range<usize>,
}

impl LifecycleHook {
    pub fn name(&self) -> &'static str {
        MOUNTED_HOOK
    }

    /// Body without its outer braces.
    pub fn inner(&self) -> &str {
        &self.body[1..self.body.len() - 1]
    }
}

/// Find the first `mounted(...)` signature in `behavior` and cut out its block.
///
/// Returns `Ok(None)` when the component has no hook. Later `mounted`
/// signatures are ignored.
pub fn extract_mounted(behavior: &str) -> SfcResult<Option<LifecycleHook>> {
    let Some(caps) = mounted_regex().captures(behavior) else {
        log::trace!("no '{}' hook in behavior section", MOUNTED_HOOK);
        return Ok(None);
    };
    let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
        return Ok(None);
    };

    let block = find_balanced_block(behavior, whole.end())?;
    log::debug!("found '{}' hook at byte {}", MOUNTED_HOOK, name.start());

    Ok(Some(LifecycleHook {
        body: block.text.to_string(),
        span: name.start()..block.end,
    }))
}
