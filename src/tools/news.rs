use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::handler::{required_param, Params, Tool, ToolOutcome};
use crate::error::ToolError;

pub const NEWSAPI_URL: &str = "https://newsapi.org/v2/top-headlines";

/// Most headlines a single call will list.
pub const MAX_HEADLINES: usize = 5;

/// Top headlines on a topic from NewsAPI.
pub struct NewsTool {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    language: String,
}

#[derive(Debug, Deserialize)]
struct Headlines {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
}

impl NewsTool {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: NEWSAPI_URL.into(),
            language: "zh".into(),
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    async fn fetch(&self, topic: &str) -> Result<Headlines, ToolError> {
        let upstream = |message: String| ToolError::Upstream {
            service: "news API".into(),
            message,
        };
        // The request URL carries `apiKey`; keep it out of the message.
        let http = |e: reqwest::Error| upstream(e.without_url().to_string());

        let page_size = MAX_HEADLINES.to_string();
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", topic),
                ("apiKey", self.api_key.as_str()),
                ("language", self.language.as_str()),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await
            .map_err(http)?
            .error_for_status()
            .map_err(http)?;

        let text = resp.text().await.map_err(http)?;
        serde_json::from_str(&text).map_err(|e| upstream(format!("invalid JSON body: {e}")))
    }
}

#[async_trait]
impl Tool for NewsTool {
    fn name(&self) -> &str {
        "get_news"
    }

    fn description(&self) -> &str {
        "Get the latest news headlines about a topic. Params: {\"topic\": \"topic keywords\"}"
    }

    async fn execute(&self, params: &Params) -> ToolOutcome {
        let topic = required_param(params, "topic")?;
        debug!(topic = %topic, "fetching headlines");

        let headlines = self.fetch(&topic).await?;
        if headlines.articles.is_empty() {
            return Ok(format!("No news found for '{topic}'."));
        }

        let mut lines = Vec::with_capacity(MAX_HEADLINES + 1);
        lines.push(format!("Latest headlines for '{topic}':"));
        for (i, article) in headlines.articles.iter().take(MAX_HEADLINES).enumerate() {
            let title = article.title.as_deref().ok_or_else(|| {
                ToolError::MissingData(format!("headline {} for '{topic}' has no title", i + 1))
            })?;
            lines.push(format!("{}. {}", i + 1, title));
        }

        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::MockUpstream;
    use serde_json::json;

    fn topic(t: &str) -> Params {
        json!({ "topic": t }).as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn missing_topic_makes_no_request() {
        let upstream = MockUpstream::serve(200, "{}").await;
        let tool = NewsTool::new("k").with_base_url(&upstream.base_url);

        let out = tool.execute(&topic("")).await;
        assert_eq!(out, Err(ToolError::MissingParameter("topic".into())));
        assert_eq!(upstream.hits(), 0);
    }

    #[tokio::test]
    async fn zero_articles_reports_no_news() {
        let upstream = MockUpstream::serve(200, r#"{"status":"ok","totalResults":0,"articles":[]}"#).await;
        let tool = NewsTool::new("k").with_base_url(&upstream.base_url);

        let out = tool.execute(&topic("AI")).await.unwrap();
        assert_eq!(out, "No news found for 'AI'.");
        assert!(!out.contains("1."));
    }

    #[tokio::test]
    async fn absent_articles_key_reports_no_news() {
        let upstream = MockUpstream::serve(200, r#"{"status":"ok"}"#).await;
        let tool = NewsTool::new("k").with_base_url(&upstream.base_url);

        let out = tool.execute(&topic("AI")).await.unwrap();
        assert!(out.starts_with("No news found"));
    }

    #[tokio::test]
    async fn lists_at_most_five_headlines() {
        let articles: Vec<_> = (1..=7)
            .map(|i| json!({ "title": format!("Story {i}"), "url": "https://example.com" }))
            .collect();
        let upstream = MockUpstream::serve(200, json!({ "articles": articles }).to_string()).await;
        let tool = NewsTool::new("news-key").with_base_url(&upstream.base_url);

        let out = tool.execute(&topic("AI")).await.unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Latest headlines for 'AI':");
        assert_eq!(lines[1], "1. Story 1");
        assert_eq!(lines[5], "5. Story 5");
        assert!(!out.contains("Story 6"));

        let q = upstream.last_query();
        assert_eq!(q["q"], "AI");
        assert_eq!(q["apiKey"], "news-key");
        assert_eq!(q["language"], "zh");
        assert_eq!(q["pageSize"], "5");
    }

    #[tokio::test]
    async fn untitled_article_is_missing_data() {
        let upstream = MockUpstream::serve(200, r#"{"articles":[{"title":"ok"},{"url":"x"}]}"#).await;
        let tool = NewsTool::new("k").with_base_url(&upstream.base_url);

        let err = tool.execute(&topic("AI")).await.unwrap_err();
        assert!(matches!(err, ToolError::MissingData(_)));
    }

    #[tokio::test]
    async fn http_error_is_upstream_failure() {
        let upstream = MockUpstream::serve(401, r#"{"status":"error","code":"apiKeyInvalid"}"#).await;
        let tool = NewsTool::new("bad").with_base_url(&upstream.base_url);

        let err = tool.execute(&topic("AI")).await.unwrap_err();
        assert!(err.to_string().starts_with("Error: news API request failed"));
    }

    #[tokio::test]
    async fn upstream_error_does_not_leak_api_key() {
        let upstream = MockUpstream::serve(401, r#"{"status":"error","code":"apiKeyInvalid"}"#).await;
        let tool = NewsTool::new("TOPSECRETKEY").with_base_url(&upstream.base_url);

        let err = tool.execute(&topic("AI")).await.unwrap_err();
        let text = err.to_string();
        assert!(text.contains("401"), "{text}");
        assert!(!text.contains("TOPSECRETKEY"), "{text}");
        assert!(!text.contains("apiKey"), "{text}");
    }
}
