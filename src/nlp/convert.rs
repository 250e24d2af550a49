//! Fixed-pair unit conversions: °C↔°F, km↔miles, kg↔lbs, USD→INR.
//!
//! Both sides of the `to`/`in` connector must name an explicit unit;
//! anything else falls through to later cascade stages.

use once_cell::sync::Lazy;
use regex::Regex;

/// Supplies the USD→INR rate. The default is a hardcoded approximation; a
/// live quote belongs in an injected implementation, not in this module.
pub trait RateSource: Send + Sync {
    fn usd_to_inr(&self) -> f64;
}

pub struct FixedRate(pub f64);

impl Default for FixedRate {
    fn default() -> Self {
        // Reference constant; stale by construction. See DESIGN.md.
        Self(83.0)
    }
}

impl RateSource for FixedRate {
    fn usd_to_inr(&self) -> f64 {
        self.0
    }
}

static TEMPERATURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(-?\d+(?:\.\d+)?)\s*°?\s*(c|celsius|f|fahrenheit)\b\s*(?:to|in)\s*°?\s*(c|celsius|f|fahrenheit)\b")
        .expect("temperature regex")
});

static KM_TO_MILES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(-?\d+(?:\.\d+)?)\s*(?:km|kms|kilometers?|kilometres?)\b\s*(?:to|in)\s*(?:miles?|mi)\b")
        .expect("km regex")
});

static MILES_TO_KM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(-?\d+(?:\.\d+)?)\s*(?:miles?|mi)\b\s*(?:to|in)\s*(?:km|kms|kilometers?|kilometres?)\b")
        .expect("miles regex")
});

static KG_TO_LBS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(-?\d+(?:\.\d+)?)\s*(?:kg|kgs|kilograms?)\b\s*(?:to|in)\s*(?:lbs?|pounds?)\b")
        .expect("kg regex")
});

static LBS_TO_KG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(-?\d+(?:\.\d+)?)\s*(?:lbs?|pounds?)\b\s*(?:to|in)\s*(?:kg|kgs|kilograms?)\b")
        .expect("lbs regex")
});

static USD_TO_INR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:usd|dollars?|\$)\s*(?:to|in)\s*(?:inr|rupees?)\b")
        .expect("currency regex")
});

/// Try every conversion pattern against the message; first hit wins.
pub fn convert(text: &str, rates: &dyn RateSource) -> Option<String> {
    if let Some(caps) = TEMPERATURE.captures(text) {
        let value: f64 = caps[1].parse().ok()?;
        let from = caps[2].to_lowercase();
        let to = caps[3].to_lowercase();
        return match (from.starts_with('c'), to.starts_with('f')) {
            (true, true) => {
                let f = value * 9.0 / 5.0 + 32.0;
                Some(format!("{value}°C is {f:.1}°F"))
            }
            (false, false) => {
                let c = (value - 32.0) * 5.0 / 9.0;
                Some(format!("{value}°F is {c:.1}°C"))
            }
            // Same unit on both sides is not a conversion.
            _ => None,
        };
    }
    if let Some(caps) = KM_TO_MILES.captures(text) {
        let value: f64 = caps[1].parse().ok()?;
        let miles = value * 0.621_371;
        return Some(format!("{value} km is {miles:.2} miles"));
    }
    if let Some(caps) = MILES_TO_KM.captures(text) {
        let value: f64 = caps[1].parse().ok()?;
        let km = value * 1.609_34;
        return Some(format!("{value} miles is {km:.2} km"));
    }
    if let Some(caps) = KG_TO_LBS.captures(text) {
        let value: f64 = caps[1].parse().ok()?;
        let lbs = value * 2.204_62;
        return Some(format!("{value} kg is {lbs:.2} lbs"));
    }
    if let Some(caps) = LBS_TO_KG.captures(text) {
        let value: f64 = caps[1].parse().ok()?;
        let kg = value / 2.204_62;
        return Some(format!("{value} lbs is {kg:.2} kg"));
    }
    if let Some(caps) = USD_TO_INR.captures(text) {
        let value: f64 = caps[1].parse().ok()?;
        let inr = value * rates.usd_to_inr();
        return Some(format!("${value} is about ₹{inr:.2}"));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{convert, FixedRate, RateSource};

    fn fixed() -> FixedRate {
        FixedRate::default()
    }

    #[test]
    fn celsius_to_fahrenheit() {
        let out = convert("30c to f", &fixed()).unwrap();
        assert!(out.contains("86.0°F"), "got: {out}");
        let out = convert("what is 100 celsius in fahrenheit", &fixed()).unwrap();
        assert!(out.contains("212.0°F"));
    }

    #[test]
    fn fahrenheit_to_celsius() {
        let out = convert("32f to c", &fixed()).unwrap();
        assert!(out.contains("0.0°C"));
    }

    #[test]
    fn same_unit_is_not_a_conversion() {
        assert!(convert("30c to c", &fixed()).is_none());
        assert!(convert("90f in fahrenheit", &fixed()).is_none());
    }

    #[test]
    fn distance_both_directions() {
        let out = convert("10 km to miles", &fixed()).unwrap();
        assert!(out.contains("6.21 miles"));
        let out = convert("5 miles in km", &fixed()).unwrap();
        assert!(out.contains("8.05 km"));
    }

    #[test]
    fn weight_both_directions() {
        let out = convert("70 kg to lbs", &fixed()).unwrap();
        assert!(out.contains("154.32 lbs"));
        let out = convert("154 lbs to kg", &fixed()).unwrap();
        assert!(out.contains("69.85 kg"));
    }

    #[test]
    fn currency_uses_injected_rate() {
        struct Live;
        impl RateSource for Live {
            fn usd_to_inr(&self) -> f64 {
                90.0
            }
        }
        let out = convert("100 usd to inr", &fixed()).unwrap();
        assert!(out.contains("8300.00"));
        let out = convert("100 dollars to rupees", &Live).unwrap();
        assert!(out.contains("9000.00"));
    }

    #[test]
    fn malformed_conversions_fall_through() {
        assert!(convert("convert 30 to f", &fixed()).is_none());
        assert!(convert("30 km", &fixed()).is_none());
        assert!(convert("km to miles", &fixed()).is_none());
    }
}
