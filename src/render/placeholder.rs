//! Placeholder substitution for panel templates.
//!
//! Recognized tokens: `%player%` `%online%` `%max%` `%world%` `%health%`
//! `%food%` `%level%` `%x%` `%y%` `%z%`.
//!
//! Substitution is a single left-to-right pass: substituted values are never
//! re-scanned, and unknown tokens pass through unchanged.

use super::context::ClientContext;

/// Substitute all recognized placeholders in `input`.
///
/// `online` is the current number of connected viewers, `max` the configured
/// capacity. Numeric context fields render as truncated integers.
pub fn substitute(input: &str, ctx: &ClientContext, online: usize, max: u32) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        match after.find('%') {
            Some(end) => {
                let token = &after[..end];
                if let Some(value) = lookup(token, ctx, online, max) {
                    out.push_str(&value);
                    rest = &after[end + 1..];
                } else {
                    // Unknown token: keep the opening '%' literal, rescan
                    // from the next character so the closing '%' may still
                    // open a valid token
                    out.push('%');
                    rest = after;
                }
            }
            None => {
                // Unpaired '%': literal
                out.push('%');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Resolve a token name to its value, or None if unrecognized.
fn lookup(token: &str, ctx: &ClientContext, online: usize, max: u32) -> Option<String> {
    let value = match token {
        "player" => ctx.name.clone(),
        "online" => online.to_string(),
        "max" => max.to_string(),
        "world" => ctx.world.clone(),
        "health" => (ctx.health as i64).to_string(),
        "food" => ctx.food.to_string(),
        "level" => ctx.level.to_string(),
        "x" => (ctx.x as i64).to_string(),
        "y" => (ctx.y as i64).to_string(),
        "z" => (ctx.z as i64).to_string(),
        _ => return None,
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ClientContext {
        ClientContext {
            name: "Steve".to_string(),
            world: "nether".to_string(),
            health: 19.7,
            food: 18,
            level: 42,
            x: 10.9,
            y: -3.2,
            z: 0.0,
        }
    }

    #[test]
    fn test_substitute_all_tokens() {
        let input = "%player% %online%/%max% %world% %health% %food% %level% %x% %y% %z%";
        let out = substitute(input, &ctx(), 7, 100);
        assert_eq!(out, "Steve 7/100 nether 19 18 42 10 -3 0");
    }

    #[test]
    fn test_unknown_token_passes_through() {
        let out = substitute("hi %unknown% there", &ctx(), 1, 10);
        assert_eq!(out, "hi %unknown% there");
    }

    #[test]
    fn test_unknown_then_known_token() {
        // The closing '%' of an unknown token can open a valid one
        let out = substitute("%foo%online%", &ctx(), 3, 10);
        assert_eq!(out, "%foo3");
    }

    #[test]
    fn test_no_resubstitution_of_values() {
        let mut c = ctx();
        c.name = "%online%".to_string();
        let out = substitute("%player%", &c, 5, 10);
        assert_eq!(out, "%online%");
    }

    #[test]
    fn test_unpaired_percent_is_literal() {
        let out = substitute("100% done", &ctx(), 1, 10);
        assert_eq!(out, "100% done");
    }

    #[test]
    fn test_health_truncates_not_rounds() {
        let out = substitute("%health%", &ctx(), 1, 10);
        assert_eq!(out, "19");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(substitute("", &ctx(), 0, 0), "");
    }
}
