// Color rules: raw metric value → optional style class.
//
// Each column has at most one rule, one of three forms. Numeric parsing
// follows two distinct conventions on purpose: range rules read the leading
// numeric prefix of the text (`" 30.5kg"` → 30.5), function rules coerce the
// whole string (`""` → 0, `"30kg"` → NaN).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Classifier used by [`ColorRule::Function`].
pub type ClassFn = Arc<dyn Fn(f64) -> Option<String> + Send + Sync>;

/// One exact-text arm of a match rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchArm {
    pub text: String,
    pub class: String,
}

/// Inclusive numeric range mapped to a class.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeRule {
    pub min: f64,
    pub max: f64,
    pub class: String,
}

/// Strict lower bound used to build a function rule from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Threshold {
    pub above: f64,
    pub class: String,
}

#[derive(Clone)]
pub enum ColorRule {
    /// Case-insensitive exact match; first arm in configuration order wins.
    Match(Vec<MatchArm>),
    /// First range containing the parsed value wins.
    Ranges(Vec<RangeRule>),
    Function(ClassFn),
}

impl fmt::Debug for ColorRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Match(arms) => f.debug_tuple("Match").field(arms).finish(),
            Self::Ranges(ranges) => f.debug_tuple("Ranges").field(ranges).finish(),
            Self::Function(_) => f.write_str("Function(<fn>)"),
        }
    }
}

impl ColorRule {
    pub fn matching<I, T, C>(arms: I) -> Self
    where
        I: IntoIterator<Item = (T, C)>,
        T: Into<String>,
        C: Into<String>,
    {
        Self::Match(
            arms.into_iter()
                .map(|(text, class)| MatchArm {
                    text: text.into(),
                    class: class.into(),
                })
                .collect(),
        )
    }

    pub fn function(f: impl Fn(f64) -> Option<String> + Send + Sync + 'static) -> Self {
        Self::Function(Arc::new(f))
    }

    /// Function rule that returns the class of the first threshold the value
    /// exceeds, else `otherwise`. Thresholds are tested in the given order.
    pub fn thresholds(steps: Vec<Threshold>, otherwise: Option<String>) -> Self {
        Self::function(move |v| {
            steps
                .iter()
                .find(|t| v > t.above)
                .map(|t| t.class.clone())
                .or_else(|| otherwise.clone())
        })
    }

    /// Evaluate against a present raw value.
    pub fn evaluate(&self, raw: &str) -> Option<String> {
        match self {
            Self::Match(arms) => {
                let needle = raw.to_lowercase();
                arms.iter()
                    .find(|arm| arm.text.to_lowercase() == needle)
                    .map(|arm| arm.class.clone())
            }
            Self::Ranges(ranges) => {
                let n = parse_float_prefix(raw)?;
                ranges
                    .iter()
                    .find(|r| n >= r.min && n <= r.max)
                    .map(|r| r.class.clone())
            }
            Self::Function(f) => f(to_number(raw)).filter(|class| !class.is_empty()),
        }
    }
}

/// Per-column rule table.
#[derive(Debug, Clone, Default)]
pub struct ColorRules(HashMap<String, ColorRule>);

impl ColorRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, rule: ColorRule) {
        self.0.insert(key.into(), rule);
    }

    pub fn get(&self, key: &str) -> Option<&ColorRule> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Style class for a cell. `raw` is `None` when the device did not
    /// report the metric.
    pub fn cell_class(&self, key: &str, raw: Option<&str>) -> Option<String> {
        let rule = self.0.get(key)?;
        let raw = raw?;
        rule.evaluate(raw)
    }
}

// ── Numeric coercion ────────────────────────────────────────────────

/// Parse the longest leading decimal literal, skipping leading whitespace.
///
/// Accepts an optional sign, digits with an optional fraction, an optional
/// exponent, and `Infinity`. Returns `None` when no digits lead the text.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        let inf = f64::INFINITY;
        return Some(if s.starts_with('-') { -inf } else { inf });
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Whole-string numeric coercion: surrounding whitespace is ignored, blank
/// text is 0, and anything that is not entirely a number is NaN.
pub fn to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(n) = parse_radix_literal(s) {
        return n;
    }
    let numeric_chars = s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !numeric_chars {
        return f64::NAN;
    }
    s.parse().unwrap_or(f64::NAN)
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn parse_radix_literal(s: &str) -> Option<f64> {
    let (radix, digits) = match s.get(..2)? {
        "0x" | "0X" => (16, &s[2..]),
        "0o" | "0O" => (8, &s[2..]),
        "0b" | "0B" => (2, &s[2..]),
        _ => return None,
    };
    Some(u64::from_str_radix(digits, radix).map_or(f64::NAN, |n| n as f64))
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ranges() -> ColorRule {
        ColorRule::Ranges(vec![
            RangeRule { min: 0.0, max: 50.0, class: "c-ok".into() },
            RangeRule { min: 51.0, max: 80.0, class: "c-warn".into() },
        ])
    }

    // ── parse_float_prefix ──

    #[test]
    fn prefix_parse_reads_leading_number() {
        assert_eq!(parse_float_prefix("30"), Some(30.0));
        assert_eq!(parse_float_prefix(" 30.5kg"), Some(30.5));
        assert_eq!(parse_float_prefix("-2e3x"), Some(-2000.0));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
        assert_eq!(parse_float_prefix("1e"), Some(1.0));
        assert_eq!(parse_float_prefix("Infinity and beyond"), Some(f64::INFINITY));
    }

    #[test]
    fn prefix_parse_rejects_non_numeric() {
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("-"), None);
        assert_eq!(parse_float_prefix("."), None);
    }

    // ── to_number ──

    #[test]
    fn whole_string_coercion() {
        assert_eq!(to_number("42"), 42.0);
        assert_eq!(to_number("  7.5 "), 7.5);
        assert_eq!(to_number(""), 0.0);
        assert_eq!(to_number("   "), 0.0);
        assert_eq!(to_number("0x10"), 16.0);
        assert!(to_number("30kg").is_nan());
        assert!(to_number("inf").is_nan());
        assert!(to_number("nan").is_nan());
    }

    // ── Rule evaluation ──

    #[test]
    fn match_rule_is_case_insensitive_first_wins() {
        let rule = ColorRule::matching([("Disconnect", "c-bad"), ("disconnect", "c-warn")]);
        assert_eq!(rule.evaluate("DISCONNECT").as_deref(), Some("c-bad"));
        assert_eq!(rule.evaluate("printing"), None);
    }

    #[test]
    fn range_rule_inclusive_bounds() {
        let rule = ranges();
        assert_eq!(rule.evaluate("30").as_deref(), Some("c-ok"));
        assert_eq!(rule.evaluate("50").as_deref(), Some("c-ok"));
        assert_eq!(rule.evaluate("51").as_deref(), Some("c-warn"));
        assert_eq!(rule.evaluate("50.5"), None);
        assert_eq!(rule.evaluate("abc"), None);
    }

    #[test]
    fn single_range_excludes_values_above_max() {
        let rule = ColorRule::Ranges(vec![RangeRule { min: 0.0, max: 50.0, class: "c-ok".into() }]);
        assert_eq!(rule.evaluate("30").as_deref(), Some("c-ok"));
        assert_eq!(rule.evaluate("51"), None);
    }

    #[test]
    fn threshold_function_rule() {
        let rule = ColorRule::thresholds(
            vec![
                Threshold { above: 200.0, class: "c-bad".into() },
                Threshold { above: 100.0, class: "c-warn".into() },
            ],
            Some("c-ok".into()),
        );
        assert_eq!(rule.evaluate("250").as_deref(), Some("c-bad"));
        assert_eq!(rule.evaluate("150").as_deref(), Some("c-warn"));
        assert_eq!(rule.evaluate("").as_deref(), Some("c-ok"));
    }

    #[test]
    fn function_rule_without_class_yields_none() {
        let rule = ColorRule::function(|v| (v > 10.0).then(|| "c-info".to_string()));
        assert_eq!(rule.evaluate("11").as_deref(), Some("c-info"));
        assert_eq!(rule.evaluate("5"), None);
        assert_eq!(rule.evaluate("12kg"), None);
    }

    #[test]
    fn cell_class_requires_rule_and_value() {
        let mut rules = ColorRules::new();
        rules.insert("_p", ranges());
        assert_eq!(rules.cell_class("_p", Some("30")).as_deref(), Some("c-ok"));
        assert_eq!(rules.cell_class("_p", None), None);
        assert_eq!(rules.cell_class("_z1", Some("30")), None);
    }
}
