use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static OTE_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bote\b").expect("Invalid OTE pattern regex"));
static FIB_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bfib\b").expect("Invalid fib pattern regex"));

const DIVERGENCE_TERMS: &[&str] = &["smt", "divergence"];
const FIBONACCI_TERMS: &[&str] = &["fibonacci", "optimal trade entry"];
const PREMIUM_DISCOUNT_TERMS: &[&str] = &["premium", "discount", "equilibrium"];
const FVG_TERMS: &[&str] = &["fair value gap", "fvg", "imbalance"];

/// Which ICT concepts a response talks about. Each flag is independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConceptFlags {
    pub smt_divergence: bool,
    pub fibonacci_ote: bool,
    pub premium_discount: bool,
    pub fair_value_gap: bool,
}

impl ConceptFlags {
    pub fn scan(text: &str) -> Self {
        let lower = text.to_lowercase();
        let any = |terms: &[&str]| terms.iter().any(|t| lower.contains(t));

        Self {
            smt_divergence: any(DIVERGENCE_TERMS),
            fibonacci_ote: any(FIBONACCI_TERMS)
                || FIB_WORD.is_match(text)
                || OTE_WORD.is_match(text),
            premium_discount: any(PREMIUM_DISCOUNT_TERMS),
            fair_value_gap: any(FVG_TERMS),
        }
    }

    pub fn labels(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.smt_divergence {
            out.push("SMT DIVERGENCE");
        }
        if self.fibonacci_ote {
            out.push("FIB / OTE");
        }
        if self.premium_discount {
            out.push("PREMIUM / DISCOUNT");
        }
        if self.fair_value_gap {
            out.push("FVG / IMBALANCE");
        }
        out
    }
}
