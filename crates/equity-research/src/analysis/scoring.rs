//! Heuristic company score

use super::ratios::number;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Overall verdict from [`score_company`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Score {
    Strong,
    Mixed,
    Weak,
}

impl Score {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strong => "Strong",
            Self::Mixed => "Mixed",
            Self::Weak => "Weak",
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One point each for P/E under 20, revenue growth over 10%, net margin
/// over 10% and debt/equity under 1. Missing or zero values score nothing.
/// Three or more points is Strong, two is Mixed, anything else Weak.
pub fn score_company(ratios: &Value) -> Score {
    let metric = |key: &str| {
        ratios
            .get(key)
            .and_then(number)
            .filter(|value| *value != 0.0)
    };

    let checks = [
        metric("PE_ratio").is_some_and(|pe| pe < 20.0),
        metric("Revenue_YoY_Growth").is_some_and(|growth| growth > 0.10),
        metric("Net_Margin").is_some_and(|margin| margin > 0.10),
        metric("Debt_to_Equity").is_some_and(|de| de < 1.0),
    ];

    match checks.iter().filter(|passed| **passed).count() {
        3.. => Score::Strong,
        2 => Score::Mixed,
        _ => Score::Weak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strong() {
        let ratios = json!({
            "PE_ratio": 15.0,
            "Revenue_YoY_Growth": 0.2,
            "Net_Margin": 0.25,
            "Debt_to_Equity": 2.0
        });
        assert_eq!(score_company(&ratios), Score::Strong);
    }

    #[test]
    fn test_mixed() {
        let ratios = json!({"PE_ratio": 35.0, "Net_Margin": 0.3, "Debt_to_Equity": 0.4});
        assert_eq!(score_company(&ratios), Score::Mixed);
    }

    #[test]
    fn test_weak_and_boundaries() {
        let ratios = json!({"PE_ratio": 20.0, "Revenue_YoY_Growth": 0.10, "Net_Margin": 0.10});
        assert_eq!(score_company(&ratios), Score::Weak);
        assert_eq!(score_company(&json!({})), Score::Weak);
        assert_eq!(score_company(&json!("not ratios")), Score::Weak);
    }

    #[test]
    fn test_zero_and_null_do_not_count() {
        let ratios = json!({"PE_ratio": null, "Debt_to_Equity": 0.0, "Net_Margin": "0.5", "Revenue_YoY_Growth": 0.5});
        assert_eq!(score_company(&ratios), Score::Mixed);
    }

    #[test]
    fn test_display() {
        assert_eq!(Score::Strong.to_string(), "Strong");
        assert_eq!(serde_json::to_value(Score::Mixed).unwrap(), json!("Mixed"));
    }
}
