//! Range-expression interpreter for raw register bounds.
//!
//! The register table writes bounds as free text like `20~65`, `-30~60℃`
//! or `0.5~2bar`. Unresolvable expressions are not errors: the result is
//! simply "no bound known".

use regex::Regex;
use std::sync::OnceLock;

/// Unit tokens stripped before matching. Longer tokens first so that e.g.
/// `days` is removed whole before the bare `s` strip can break it.
const UNIT_TOKENS: &[&str] = &[
    "℃", "°C", "days", "bar", "Bar", "rpm", "min", "kW", "Hz", "W", "N", "%", "r", "s", "h",
];

fn range_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(-?\d+(?:\.\d+)?)\s*[~-]\s*(-?\d+(?:\.\d+)?)$").ok())
        .as_ref()
}

/// Parse a raw bound expression into `(min, max)`, in textual order.
///
/// Returns `None` for empty input, the `-`/`--` placeholders, reference
/// expressions (a `$`-wrapped value pointing at another register's bound,
/// e.g. `$1053$~10`), and anything that does not match
/// `<number><separator><number>`.
///
/// Sign-vs-separator rule: a leading `-` binds to the first number, the
/// first `~` or `-` after it separates, and a `-` immediately after the
/// separator binds to the second number. So `-30~60` and `-30-60` both
/// yield `(-30, 60)`, and `-30--10` yields `(-30, -10)`.
pub fn interpret(raw: &str) -> Option<(f64, f64)> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed == "--" {
        return None;
    }
    if trimmed.contains('$') {
        return None;
    }

    let mut cleaned = trimmed.to_string();
    for token in UNIT_TOKENS {
        cleaned = cleaned.replace(token, "");
    }
    let cleaned = cleaned.trim();

    let caps = range_re()?.captures(cleaned)?;
    let min = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let max = caps.get(2)?.as_str().parse::<f64>().ok()?;
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ranges() {
        assert_eq!(interpret("0~100"), Some((0.0, 100.0)));
        assert_eq!(interpret("20~65"), Some((20.0, 65.0)));
        assert_eq!(interpret("0.0~20.0"), Some((0.0, 20.0)));
        assert_eq!(interpret("0~1"), Some((0.0, 1.0)));
    }

    #[test]
    fn negative_bounds_disambiguation() {
        // Leading minus is a sign, the glyph after the first number splits.
        assert_eq!(interpret("-30~60"), Some((-30.0, 60.0)));
        assert_eq!(interpret("-30-60"), Some((-30.0, 60.0)));
        assert_eq!(interpret("-30--10"), Some((-30.0, -10.0)));
        assert_eq!(interpret("-40~10"), Some((-40.0, 10.0)));
    }

    #[test]
    fn unit_glyphs_are_stripped() {
        assert_eq!(interpret("-30~60℃"), Some((-30.0, 60.0)));
        assert_eq!(interpret("20~65°C"), Some((20.0, 65.0)));
        assert_eq!(interpret("0.5~2bar"), Some((0.5, 2.0)));
        assert_eq!(interpret("0~120Hz"), Some((0.0, 120.0)));
        assert_eq!(interpret("0~100%"), Some((0.0, 100.0)));
        assert_eq!(interpret("10~1300r"), Some((10.0, 1300.0)));
        assert_eq!(interpret("5~60min"), Some((5.0, 60.0)));
        assert_eq!(interpret("1~30days"), Some((1.0, 30.0)));
        assert_eq!(interpret("0~2000s"), Some((0.0, 2000.0)));
    }

    #[test]
    fn placeholders_and_references() {
        assert_eq!(interpret(""), None);
        assert_eq!(interpret("-"), None);
        assert_eq!(interpret("--"), None);
        assert_eq!(interpret("$1053$~10"), None);
        assert_eq!(interpret("0~$1054$"), None);
    }

    #[test]
    fn garbage_is_no_bound() {
        assert_eq!(interpret("see manual"), None);
        assert_eq!(interpret("42"), None);
        assert_eq!(interpret("a~b"), None);
    }

    #[test]
    fn textual_order_is_preserved() {
        // The interpreter does not reorder an inverted range.
        assert_eq!(interpret("60~-30"), Some((60.0, -30.0)));
    }
}
