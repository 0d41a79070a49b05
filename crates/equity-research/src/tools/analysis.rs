//! Tools over already-fetched data: ratios, scoring, sentiment

use super::parse_params;
use crate::analysis::{Ratios, analyze_sentiment, score_company};
use async_trait::async_trait;
use equity_core::{Error, Result};
use equity_tools::{Tool, ToolInput, schema};
use serde::Deserialize;
use serde_json::{Value, json};

/// `financial_ratios(summary, financials) -> {ratio: number|null}`
pub struct FinancialRatiosTool;

#[derive(Debug, Deserialize)]
struct RatiosParams {
    summary: Value,
    financials: Value,
}

#[async_trait]
impl Tool for FinancialRatiosTool {
    async fn execute(&self, input: ToolInput) -> Result<Value> {
        let params: RatiosParams = parse_params(self.name(), input)?;
        let ratios = Ratios::compute(&params.summary, &params.financials);
        serde_json::to_value(ratios).map_err(|e| Error::tool_failed(self.name(), e))
    }

    fn name(&self) -> &str {
        "financial_ratios"
    }

    fn description(&self) -> &str {
        "Valuation, margin, growth and leverage ratios from the summary and financials \
         returned by finance_data."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({
                "summary": schema::any_object("The `summary` object from finance_data"),
                "financials": schema::any_object("The `financials` object from finance_data"),
            }),
            vec!["summary", "financials"],
        )
    }
}

/// `score_company(ratios) -> "Strong" | "Mixed" | "Weak"`
pub struct ScoreCompanyTool;

#[derive(Debug, Deserialize)]
struct ScoreParams {
    ratios: Value,
}

#[async_trait]
impl Tool for ScoreCompanyTool {
    async fn execute(&self, input: ToolInput) -> Result<Value> {
        let params: ScoreParams = parse_params(self.name(), input)?;
        if !params.ratios.is_object() {
            return Err(Error::invalid_parameters(self.name(), "ratios must be an object"));
        }
        Ok(json!(score_company(&params.ratios).as_str()))
    }

    fn name(&self) -> &str {
        "score_company"
    }

    fn description(&self) -> &str {
        "Rate a company Strong, Mixed or Weak from the output of financial_ratios."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({ "ratios": schema::any_object("Output of financial_ratios") }),
            vec!["ratios"],
        )
    }
}

/// `news_sentiment(news_items) -> {overall_sentiment, average_polarity, articles}`
pub struct NewsSentimentTool;

#[derive(Debug, Deserialize)]
struct SentimentParams {
    news_items: Vec<Value>,
}

#[async_trait]
impl Tool for NewsSentimentTool {
    async fn execute(&self, input: ToolInput) -> Result<Value> {
        let params: SentimentParams = parse_params(self.name(), input)?;
        let report = analyze_sentiment(&params.news_items);
        serde_json::to_value(report).map_err(|e| Error::tool_failed(self.name(), e))
    }

    fn name(&self) -> &str {
        "news_sentiment"
    }

    fn description(&self) -> &str {
        "Score the sentiment of news items (objects with title and snippet), \
         per article and overall."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({
                "news_items": schema::array("Items returned by the news tool", json!({"type": "object"})),
            }),
            vec!["news_items"],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(value: Value) -> ToolInput {
        match value {
            Value::Object(map) => map,
            _ => panic!("test input must be an object"),
        }
    }

    #[tokio::test]
    async fn test_ratios_then_score() {
        let summary = json!({"PERatio": "12", "EVToRevenue": "3", "RevenueTTM": "100", "EBITDA": "30"});
        let financials = json!({
            "income_statement": [
                {"totalRevenue": "100", "grossProfit": "60", "netIncome": "20"},
                {"totalRevenue": "80"}
            ],
            "balance_sheet": [{"totalDebt": "50", "totalShareholderEquity": "100"}],
            "cashflow": [{"operatingCashflow": "40", "capitalExpenditures": "-10"}]
        });

        let ratios = FinancialRatiosTool
            .execute(input(json!({"summary": summary, "financials": financials})))
            .await
            .unwrap();
        assert_eq!(ratios["PE_ratio"], 12.0);
        assert_eq!(ratios["Free_Cash_Flow"], 30.0);
        assert!(ratios.get("error").is_none());

        let score = ScoreCompanyTool
            .execute(input(json!({"ratios": ratios})))
            .await
            .unwrap();
        assert_eq!(score, json!("Strong"));
    }

    #[tokio::test]
    async fn test_ratios_with_placeholder_inputs() {
        let ratios = FinancialRatiosTool
            .execute(input(json!({"summary": {}, "financials": {}})))
            .await
            .unwrap();

        assert!(ratios["PE_ratio"].is_null());
        assert_eq!(ratios["error"], "missing income_statement");
        assert_eq!(
            ScoreCompanyTool.execute(input(json!({"ratios": ratios}))).await.unwrap(),
            json!("Weak")
        );
    }

    #[tokio::test]
    async fn test_score_rejects_non_object() {
        let err = ScoreCompanyTool
            .execute(input(json!({"ratios": "great"})))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameters { .. }));
    }

    #[tokio::test]
    async fn test_news_sentiment() {
        let report = NewsSentimentTool
            .execute(input(json!({"news_items": [
                {"title": "NVDA shares surge", "snippet": "Record revenue", "url": "u", "date": "d"},
                {"title": "Analysts upbeat", "snippet": "Strong demand"}
            ]})))
            .await
            .unwrap();

        assert_eq!(report["overall_sentiment"], "positive");
        assert_eq!(report["articles"].as_array().unwrap().len(), 2);

        let err = NewsSentimentTool
            .execute(input(json!({"news_items": "NVDA"})))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameters { .. }));
    }

    #[test]
    fn test_examples() {
        assert_eq!(
            FinancialRatiosTool.example_input(),
            "{\"summary\": {...}, \"financials\": {...}}"
        );
        assert_eq!(ScoreCompanyTool.example_input(), "{\"ratios\": {...}}");
        assert_eq!(NewsSentimentTool.example_input(), "{\"news_items\": [...]}");
    }
}
