/// Strip the leading `!` that marks a template file (or partial key
/// segment) as optional. Returns whether it was there.
pub fn strip_optional(s: &str) -> (bool, &str) {
    match s.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, s),
    }
}

/// Cache keys are derived from partial keys; those may contain path
/// separators and optional markers.
pub fn sanitize_cache_key(key: &str) -> String {
    key.replace('!', "").replace('/', "_")
}
