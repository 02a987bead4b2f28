// src/gps/tokenizer.rs
//! Fixed-arity comma tokenizing of a sentence payload

/// Body of a sentence: everything after the first `$`, cut at the first `*`.
///
/// Returns `None` when there is no `$`. A payload without `*` is returned whole.
pub fn payload_of(sentence: &str) -> Option<&str> {
    let start = sentence.find('$')? + 1;
    let body = &sentence[start..];
    Some(match body.find('*') {
        Some(star) => &body[..star],
        None => body,
    })
}

/// Split `payload` on commas into at most `max_fields` tokens.
///
/// Empty fields stay in place as `""` so positions are stable. Once
/// `max_fields` tokens exist, the last one keeps the unsplit remainder.
pub fn tokenize(payload: &str, max_fields: usize) -> Vec<&str> {
    if max_fields == 0 {
        return Vec::new();
    }
    payload.splitn(max_fields, ',').collect()
}
