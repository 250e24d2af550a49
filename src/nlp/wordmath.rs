//! Rewrites spoken arithmetic ("two plus three") into the evaluator's closed
//! grammar. Both tables are closed; anything outside them is dropped.

const NUMBER_WORDS: &[(&str, &str)] = &[
    ("zero", "0"),
    ("one", "1"),
    ("two", "2"),
    ("three", "3"),
    ("four", "4"),
    ("five", "5"),
    ("six", "6"),
    ("seven", "7"),
    ("eight", "8"),
    ("nine", "9"),
    ("ten", "10"),
    ("eleven", "11"),
    ("twelve", "12"),
    ("thirteen", "13"),
    ("fourteen", "14"),
    ("fifteen", "15"),
    ("sixteen", "16"),
    ("seventeen", "17"),
    ("eighteen", "18"),
    ("nineteen", "19"),
    ("twenty", "20"),
    ("thirty", "30"),
    ("forty", "40"),
    ("fifty", "50"),
    ("sixty", "60"),
    ("seventy", "70"),
    ("eighty", "80"),
    ("ninety", "90"),
];

const MAGNITUDE_WORDS: &[(&str, f64)] = &[("hundred", 100.0), ("thousand", 1000.0)];

const OPERATOR_WORDS: &[(&str, &str)] = &[
    ("plus", "+"),
    ("add", "+"),
    ("added", "+"),
    ("and", "+"),
    ("minus", "-"),
    ("subtract", "-"),
    ("less", "-"),
    ("times", "*"),
    ("multiply", "*"),
    ("multiplied", "*"),
    ("into", "*"),
    ("divided", "/"),
    ("divide", "/"),
    ("over", "/"),
    ("power", "^"),
    ("raised", "^"),
];

const FILLER_WORDS: &[&str] = &[
    "what", "whats", "what's", "is", "calculate", "equals", "equal", "the", "of", "by", "please",
];

fn lookup(table: &'static [(&'static str, &'static str)], word: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(name, _)| *name == word)
        .map(|(_, value)| *value)
}

/// Rewrite `text` into a candidate arithmetic expression.
///
/// Requires at least one number token (word or digit) and at least one
/// operator word, otherwise the text is not word math at all.
pub fn rewrite(text: &str) -> Option<String> {
    // "to the" is a two-word exponent connector; fold it before tokenizing so
    // the lone "the" filler rule cannot split it.
    let lowered = text.to_lowercase().replace("to the", " power ");

    let mut out: Vec<String> = Vec::new();
    let mut saw_number = false;
    let mut saw_operator = false;

    for raw in lowered.split_whitespace() {
        let word = raw.trim_matches(|c: char| !c.is_ascii_alphanumeric() && c != '.');

        if let Some(digits) = lookup(NUMBER_WORDS, word) {
            saw_number = true;
            out.push(digits.to_string());
            continue;
        }
        if let Some((_, factor)) = MAGNITUDE_WORDS.iter().find(|(name, _)| *name == word) {
            saw_number = true;
            // "two hundred" combines multiplicatively; a bare magnitude stands alone.
            match out.last().and_then(|prev| prev.parse::<f64>().ok()) {
                Some(prev) => {
                    out.pop();
                    out.push(super::mathexpr::format_result(prev * factor));
                }
                None => out.push(super::mathexpr::format_result(*factor)),
            }
            continue;
        }
        if let Some(symbol) = lookup(OPERATOR_WORDS, word) {
            saw_operator = true;
            // Stacked connectors ("raised to the power of") collapse to one.
            if out.last().map(String::as_str) != Some(symbol) {
                out.push(symbol.to_string());
            }
            continue;
        }
        if word == "squared" || word == "square" {
            saw_operator = true;
            out.push("^".into());
            out.push("2".into());
            continue;
        }
        if word == "cubed" || word == "cube" {
            saw_operator = true;
            out.push("^".into());
            out.push("3".into());
            continue;
        }
        if FILLER_WORDS.contains(&word) {
            continue;
        }

        // Residual token: keep only arithmetic characters, drop the rest.
        let cleaned: String = word
            .chars()
            .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '.' | '^'))
            .collect();
        if cleaned.chars().any(|c| c.is_ascii_digit()) {
            saw_number = true;
        }
        if !cleaned.is_empty() {
            out.push(cleaned);
        }
    }

    if !saw_number || !saw_operator || out.is_empty() {
        return None;
    }
    Some(out.join(" "))
}
