//! JSON cleanup for model responses.
//!
//! Models often wrap JSON in markdown code fences even when told not to.
//! Only the fence markers are removed; anything else wrong with the text is
//! left for the JSON parser to reject.

use std::sync::LazyLock;

use regex_lite::Regex;

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json|JSON)?").expect("Invalid regex"));

/// Remove every ```` ```json ```` / ```` ``` ```` marker and trim.
pub fn strip_code_fences(response: &str) -> String {
    FENCE.replace_all(response.trim(), "").trim().to_string()
}
