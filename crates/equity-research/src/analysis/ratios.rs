//! Valuation, profitability and balance-sheet ratios
//!
//! Inputs are the `summary` and `financials` objects produced by the
//! `finance_data` tool. Numbers may arrive as JSON numbers or as numeric
//! strings (Alpha Vantage reports everything as strings), and either
//! Alpha Vantage or Yahoo-style field names are accepted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ratio set for one company; absent values serialize as `null`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ratios {
    #[serde(rename = "PE_ratio")]
    pub pe_ratio: Option<f64>,
    #[serde(rename = "PEG_ratio")]
    pub peg_ratio: Option<f64>,
    #[serde(rename = "Price_to_Book")]
    pub price_to_book: Option<f64>,
    #[serde(rename = "Price_to_Sales")]
    pub price_to_sales: Option<f64>,
    #[serde(rename = "EV_to_Revenue")]
    pub ev_to_revenue: Option<f64>,
    #[serde(rename = "EV_to_EBITDA")]
    pub ev_to_ebitda: Option<f64>,
    #[serde(rename = "Gross_Margin")]
    pub gross_margin: Option<f64>,
    #[serde(rename = "Net_Margin")]
    pub net_margin: Option<f64>,
    #[serde(rename = "Revenue_YoY_Growth")]
    pub revenue_yoy_growth: Option<f64>,
    #[serde(rename = "Debt_to_Equity")]
    pub debt_to_equity: Option<f64>,
    #[serde(rename = "Free_Cash_Flow")]
    pub free_cash_flow: Option<f64>,

    /// Why computation stopped early, if it did
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Ratios {
    /// Compute every ratio the inputs allow
    ///
    /// Malformed statement data stops the computation; the ratios computed
    /// up to that point are kept and `error` says what went wrong.
    pub fn compute(summary: &Value, financials: &Value) -> Self {
        let mut ratios = Self::default();
        if let Err(reason) = ratios.fill(summary, financials) {
            ratios.error = Some(reason);
        }
        ratios
    }

    fn fill(&mut self, summary: &Value, financials: &Value) -> Result<(), String> {
        let summary = summary
            .as_object()
            .ok_or_else(|| "summary must be an object".to_string())?;

        self.pe_ratio = field(summary, &["PERatio", "trailingPE"]);
        self.peg_ratio = field(summary, &["PEGRatio", "pegRatio"]);
        self.price_to_book = field(summary, &["PriceToBookRatio", "priceToBook"]);
        self.price_to_sales = field(
            summary,
            &["PriceToSalesRatioTTM", "priceToSalesTrailing12Months"],
        );

        let revenue_ttm = field(summary, &["RevenueTTM", "totalRevenue"]);
        let ebitda = field(summary, &["EBITDA", "ebitda"]);
        let enterprise_value = field(summary, &["enterpriseValue"]).or_else(|| {
            field(summary, &["EVToRevenue"])
                .zip(revenue_ttm)
                .map(|(multiple, revenue)| multiple * revenue)
        });

        self.ev_to_revenue = ratio(enterprise_value, revenue_ttm);
        self.ev_to_ebitda = ratio(enterprise_value, ebitda);

        let financials = financials
            .as_object()
            .ok_or_else(|| "financials must be an object".to_string())?;

        let income = statement(financials, "income_statement")?;
        let latest_revenue = income.first().and_then(|r| report_field(r, &["totalRevenue"]));
        let gross_profit = income.first().and_then(|r| report_field(r, &["grossProfit"]));
        let net_income = income.first().and_then(|r| report_field(r, &["netIncome"]));

        self.gross_margin = ratio(gross_profit, latest_revenue);
        self.net_margin = ratio(net_income, latest_revenue);

        if let (Some(current), Some(previous)) = (
            latest_revenue,
            income.get(1).and_then(|r| report_field(r, &["totalRevenue"])),
        ) {
            self.revenue_yoy_growth = (previous != 0.0).then(|| (current - previous) / previous);
        }

        let balance = statement(financials, "balance_sheet")?;
        if let Some(latest) = balance.first() {
            let debt = report_field(latest, &["shortLongTermDebtTotal", "totalDebt"]);
            let equity = report_field(latest, &["totalShareholderEquity", "totalStockholderEquity"]);
            if let (Some(debt), Some(equity)) = (debt, equity) {
                self.debt_to_equity = (equity != 0.0).then(|| debt / equity);
            }
        }

        let cashflow = statement(financials, "cashflow")?;
        if let Some(latest) = cashflow.first() {
            self.free_cash_flow = report_field(latest, &["freeCashFlow"]).or_else(|| {
                let operating = report_field(latest, &["operatingCashflow"])?;
                let capex = report_field(latest, &["capitalExpenditures"]).unwrap_or(0.0);
                Some(operating - capex.abs())
            });
        }

        Ok(())
    }
}

/// Parse a JSON number or numeric string; `"None"`, `"-"` and the like are absent
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn field(map: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| map.get(*key).and_then(number))
}

fn report_field(report: &Value, keys: &[&str]) -> Option<f64> {
    report.as_object().and_then(|map| field(map, keys))
}

/// `numerator / denominator` when both are present and non-zero
fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if n != 0.0 && d != 0.0 => Some(n / d),
        _ => None,
    }
}

/// Annual reports of one statement, most recent first
fn statement<'a>(financials: &'a Map<String, Value>, key: &str) -> Result<&'a [Value], String> {
    match financials.get(key) {
        Some(Value::Array(reports)) => Ok(reports),
        Some(Value::Null) | None => Err(format!("missing {key}")),
        Some(_) => Err(format!("{key} must be a list of reports")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn summary() -> Value {
        json!({
            "PERatio": "18.5",
            "PEGRatio": "1.2",
            "PriceToBookRatio": "6.0",
            "PriceToSalesRatioTTM": "4.0",
            "EVToRevenue": "5.0",
            "RevenueTTM": "1000",
            "EBITDA": "250"
        })
    }

    fn financials() -> Value {
        json!({
            "income_statement": [
                {"totalRevenue": "1000", "grossProfit": "400", "netIncome": "150"},
                {"totalRevenue": "800", "grossProfit": "300", "netIncome": "100"}
            ],
            "balance_sheet": [
                {"shortLongTermDebtTotal": "300", "totalShareholderEquity": "600"}
            ],
            "cashflow": [
                {"operatingCashflow": "200", "capitalExpenditures": "50"}
            ]
        })
    }

    fn close(actual: Option<f64>, expected: f64) -> bool {
        actual.is_some_and(|a| (a - expected).abs() < 1e-9)
    }

    #[test]
    fn test_full_computation() {
        let ratios = Ratios::compute(&summary(), &financials());

        assert!(close(ratios.pe_ratio, 18.5));
        assert!(close(ratios.peg_ratio, 1.2));
        assert!(close(ratios.price_to_book, 6.0));
        assert!(close(ratios.price_to_sales, 4.0));
        assert!(close(ratios.ev_to_revenue, 5.0));
        assert!(close(ratios.ev_to_ebitda, 20.0));
        assert!(close(ratios.gross_margin, 0.4));
        assert!(close(ratios.net_margin, 0.15));
        assert!(close(ratios.revenue_yoy_growth, 0.25));
        assert!(close(ratios.debt_to_equity, 0.5));
        assert!(close(ratios.free_cash_flow, 150.0));
        assert!(ratios.error.is_none());
    }

    #[test]
    fn test_serialized_names() {
        let json = serde_json::to_value(Ratios::compute(&summary(), &financials())).unwrap();
        for key in [
            "PE_ratio",
            "PEG_ratio",
            "Price_to_Book",
            "Price_to_Sales",
            "EV_to_Revenue",
            "EV_to_EBITDA",
            "Gross_Margin",
            "Net_Margin",
            "Revenue_YoY_Growth",
            "Debt_to_Equity",
            "Free_Cash_Flow",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_yahoo_style_names_and_numbers() {
        let summary = json!({"trailingPE": 30.0, "enterpriseValue": 500.0, "totalRevenue": 100.0});
        let ratios = Ratios::compute(&summary, &json!({
            "income_statement": [], "balance_sheet": [], "cashflow": [{"freeCashFlow": 42}]
        }));

        assert!(close(ratios.pe_ratio, 30.0));
        assert!(close(ratios.ev_to_revenue, 5.0));
        assert!(ratios.ev_to_ebitda.is_none());
        assert!(close(ratios.free_cash_flow, 42.0));
        assert!(ratios.error.is_none());
    }

    #[test]
    fn test_partial_result_on_malformed_financials() {
        let ratios = Ratios::compute(&summary(), &json!({"income_statement": "oops"}));

        assert!(close(ratios.pe_ratio, 18.5));
        assert!(ratios.gross_margin.is_none());
        assert_eq!(
            ratios.error.as_deref(),
            Some("income_statement must be a list of reports")
        );

        let ratios = Ratios::compute(&summary(), &json!({}));
        assert_eq!(ratios.error.as_deref(), Some("missing income_statement"));
    }

    #[test]
    fn test_placeholder_inputs() {
        let ratios = Ratios::compute(&json!({}), &json!({}));
        assert!(ratios.pe_ratio.is_none());
        assert!(ratios.error.is_some());

        let ratios = Ratios::compute(&json!("AAPL"), &json!({}));
        assert_eq!(ratios.error.as_deref(), Some("summary must be an object"));
    }

    #[test]
    fn test_zero_previous_revenue() {
        let financials = json!({
            "income_statement": [{"totalRevenue": "10"}, {"totalRevenue": "0"}],
            "balance_sheet": [{"totalDebt": 5, "totalShareholderEquity": 0}],
            "cashflow": []
        });
        let ratios = Ratios::compute(&json!({}), &financials);
        assert!(ratios.revenue_yoy_growth.is_none());
        assert!(ratios.debt_to_equity.is_none());
        assert!(ratios.error.is_none());
    }

    #[test]
    fn test_number_parsing() {
        assert_eq!(number(&json!("12.5")), Some(12.5));
        assert_eq!(number(&json!(3)), Some(3.0));
        assert_eq!(number(&json!("None")), None);
        assert_eq!(number(&json!("-")), None);
        assert_eq!(number(&json!(null)), None);
    }
}
