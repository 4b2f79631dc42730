// Graphite render API repository
use crate::application::repository::{RenderWindow, SeriesRepository};
use crate::domain::datasource::Datasource;
use crate::domain::series::Series;
use anyhow::{Context, Result};
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct GraphiteRepository {
    client: reqwest::Client,
}

impl GraphiteRepository {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn build_render_url(datasource: &Datasource, expression: &str, window: &RenderWindow) -> String {
        format!(
            "{}/render?format=json&target={}&from={}&until={}",
            datasource.url.trim_end_matches('/'),
            urlencoding::encode(expression),
            urlencoding::encode(&window.from),
            window
                .until
                .as_deref()
                .map(urlencoding::encode)
                .unwrap_or_default()
        )
    }
}

#[async_trait]
impl SeriesRepository for GraphiteRepository {
    async fn render(
        &self,
        datasource: &Datasource,
        expression: &str,
        window: &RenderWindow,
    ) -> Result<Vec<Series>> {
        let url = Self::build_render_url(datasource, expression, window);
        tracing::debug!(datasource = %datasource.name, "rendering {}", expression);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to Graphite")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Graphite render failed with status {}: {}", status, body);
        }

        response
            .json::<Vec<Series>>()
            .await
            .context("Failed to parse Graphite response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datasource() -> Datasource {
        Datasource {
            name: "graphite".to_string(),
            url: "http://graphite:8080/".to_string(),
            is_default: true,
        }
    }

    #[test]
    fn test_render_url_default_window() {
        let url = GraphiteRepository::build_render_url(
            &datasource(),
            "sumSeries(servers.*.cpu)",
            &RenderWindow::default(),
        );

        assert_eq!(
            url,
            "http://graphite:8080/render?format=json&target=sumSeries%28servers.%2A.cpu%29&from=-1h&until="
        );
    }

    #[test]
    fn test_render_url_with_until() {
        let window = RenderWindow {
            from: "-2h".to_string(),
            until: Some("now-5min".to_string()),
        };
        let url = GraphiteRepository::build_render_url(&datasource(), "a.b", &window);

        assert!(url.ends_with("target=a.b&from=-2h&until=now-5min"));
    }
}
