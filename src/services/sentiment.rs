// src/services/sentiment.rs

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{common::error::AppError, models::review::SentimentLabel};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Resultado validado da IA. `key_themes` não tem destino no banco.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentAnalysis {
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    pub key_themes: Vec<String>,
}

/// Serviço de geração de texto: recebe o texto da review, devolve a resposta crua.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    async fn complete(&self, review_text: &str) -> Result<String, AppError>;
}

pub fn build_prompt(review_text: &str) -> String {
    format!(
        "Analyze this customer review and return ONLY a JSON object with: \
         {{sentiment_score: 0-1, sentiment_label: 'positive'|'neutral'|'negative', \
         key_themes: [array of 3 themes]}}. Review: {review_text}"
    )
}

/// Recorta do primeiro `{` ao último `}` e valida o formato. Nada de valores padrão.
pub fn parse_analysis(raw: &str) -> Result<SentimentAnalysis, AppError> {
    let start = raw.find('{');
    let end = raw.rfind('}');
    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => return Err(AppError::AnalysisFailed("nenhum JSON na resposta".into())),
    };

    let value: Value = serde_json::from_str(json)
        .map_err(|e| AppError::AnalysisFailed(format!("JSON inválido: {e}")))?;

    let sentiment_score = value
        .get("sentiment_score")
        .and_then(Value::as_f64)
        .ok_or_else(|| AppError::AnalysisFailed("sentiment_score ausente ou não numérico".into()))?;

    if !(0.0..=1.0).contains(&sentiment_score) {
        return Err(AppError::AnalysisFailed(format!(
            "sentiment_score fora de [0,1]: {sentiment_score}"
        )));
    }

    let sentiment_label = value
        .get("sentiment_label")
        .and_then(Value::as_str)
        .and_then(SentimentLabel::parse)
        .ok_or_else(|| AppError::AnalysisFailed("sentiment_label inválido".into()))?;

    let key_themes = value
        .get("key_themes")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::AnalysisFailed("key_themes não é uma lista".into()))?
        .iter()
        .map(|theme| theme.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| AppError::AnalysisFailed("key_themes deve conter apenas textos".into()))?;

    Ok(SentimentAnalysis {
        sentiment_score,
        sentiment_label,
        key_themes,
    })
}

// --- Cliente da Messages API ---

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    pub fn new(base_url: &str, api_key: Option<String>, model: &str, max_tokens: u32) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
            max_tokens,
        }
    }
}

#[async_trait]
impl SentimentAnalyzer for AnthropicClient {
    async fn complete(&self, review_text: &str) -> Result<String, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::AnalysisFailed("ANTHROPIC_API_KEY não configurada".into()))?;

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: build_prompt(review_text),
            }],
        };

        let response = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::AnalysisFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::AnalysisFailed(e.to_string()))?;

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AppError::AnalysisFailed(e.to_string()))?;

        // Só aceitamos resposta em texto no primeiro bloco
        match body.content.into_iter().next() {
            Some(ContentBlock { kind, text: Some(text) }) if kind == "text" => Ok(text),
            _ => Err(AppError::AnalysisFailed("resposta inesperada do modelo".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_json_surrounded_by_prose() {
        let raw = r#"Here is the analysis:
        {"sentiment_score": 0.92, "sentiment_label": "positive", "key_themes": ["service", "speed", "price"]}
        Let me know if you need more."#;

        let analysis = parse_analysis(raw).unwrap();
        assert_eq!(analysis.sentiment_score, 0.92);
        assert_eq!(analysis.sentiment_label, SentimentLabel::Positive);
        assert_eq!(analysis.key_themes, vec!["service", "speed", "price"]);
    }

    #[test]
    fn accepts_integer_scores() {
        let analysis =
            parse_analysis(r#"{"sentiment_score": 1, "sentiment_label": "neutral", "key_themes": []}"#)
                .unwrap();
        assert_eq!(analysis.sentiment_score, 1.0);
    }

    #[test]
    fn rejects_missing_json() {
        assert!(matches!(parse_analysis("no json here"), Err(AppError::AnalysisFailed(_))));
        assert!(matches!(parse_analysis("} backwards {"), Err(AppError::AnalysisFailed(_))));
    }

    #[test]
    fn rejects_non_numeric_score() {
        let raw = r#"{"sentiment_score": "high", "sentiment_label": "positive", "key_themes": []}"#;
        assert!(matches!(parse_analysis(raw), Err(AppError::AnalysisFailed(_))));
    }

    #[test]
    fn rejects_unknown_label() {
        let raw = r#"{"sentiment_score": 0.4, "sentiment_label": "mixed", "key_themes": []}"#;
        assert!(matches!(parse_analysis(raw), Err(AppError::AnalysisFailed(_))));
    }

    #[test]
    fn rejects_themes_that_are_not_a_list() {
        let raw = r#"{"sentiment_score": 0.4, "sentiment_label": "neutral", "key_themes": "food"}"#;
        assert!(matches!(parse_analysis(raw), Err(AppError::AnalysisFailed(_))));
    }

    #[test]
    fn rejects_score_out_of_range() {
        let raw = r#"{"sentiment_score": 1.5, "sentiment_label": "positive", "key_themes": []}"#;
        assert!(matches!(parse_analysis(raw), Err(AppError::AnalysisFailed(_))));
    }

    #[test]
    fn two_objects_make_the_slice_invalid() {
        // Do primeiro '{' ao último '}' pega os dois objetos: não é JSON válido
        let raw = r#"{"a": 1} and {"b": 2}"#;
        assert!(matches!(parse_analysis(raw), Err(AppError::AnalysisFailed(_))));
    }

    #[test]
    fn prompt_embeds_review_and_fixed_shape() {
        let prompt = build_prompt("Great coffee");
        assert!(prompt.ends_with("Review: Great coffee"));
        assert!(prompt.contains("{sentiment_score: 0-1"));
        assert!(prompt.contains("key_themes"));
    }
}
