use once_cell::sync::Lazy;
use regex::Regex;

static YEARS: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"([0-9]+)\+?\s*(?:year|yr)").ok());

/// Seniority keywords checked in order when no explicit year count appears.
const SENIORITY_KEYWORDS: &[(&str, u32)] = &[("entry", 0), ("junior", 0), ("mid", 3), ("senior", 5)];

/// Years of experience implied by free text. Explicit counts ("5+ years",
/// "3 yrs") win over seniority words and saturate at `u32::MAX`; anything
/// unrecognized is 0.
pub fn extract_years(text: &str) -> u32 {
    let lower = text.to_lowercase();
    if lower.trim().is_empty() {
        return 0;
    }
    let explicit = YEARS
        .as_ref()
        .and_then(|re| re.captures(&lower))
        .and_then(|caps| caps.get(1))
        // digits only, so parsing fails on overflow alone
        .map(|m| m.as_str().parse::<u32>().unwrap_or(u32::MAX));
    if let Some(years) = explicit {
        return years;
    }
    SENIORITY_KEYWORDS
        .iter()
        .find(|(word, _)| lower.contains(word))
        .map(|&(_, years)| years)
        .unwrap_or(0)
}
