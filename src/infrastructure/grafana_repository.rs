// Grafana HTTP API repository
use crate::application::repository::DashboardRepository;
use crate::domain::board::{Board, Panel, QueryTarget};
use crate::domain::datasource::Datasource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct GrafanaRepository {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BoardResponse {
    dashboard: DashboardModel,
}

#[derive(Debug, Deserialize)]
struct DashboardModel {
    #[serde(default)]
    rows: Vec<RowModel>,
    #[serde(default)]
    panels: Vec<PanelModel>,
}

#[derive(Debug, Deserialize)]
struct RowModel {
    #[serde(default)]
    panels: Vec<PanelModel>,
}

#[derive(Debug, Deserialize)]
struct PanelModel {
    #[serde(default)]
    title: String,
    #[serde(default)]
    datasource: Option<serde_json::Value>,
    #[serde(default)]
    targets: Vec<QueryTarget>,
    /// Collapsed rows keep their panels nested
    #[serde(default)]
    panels: Vec<PanelModel>,
}

impl GrafanaRepository {
    /// `endpoint` is the Grafana base URL ending with `/`.
    pub fn new(client: reqwest::Client, endpoint: String, token: String) -> Self {
        Self {
            client,
            endpoint,
            token,
        }
    }

    async fn call<T: DeserializeOwned>(&self, command: &str) -> Result<T> {
        let url = format!("{}api/{}", self.endpoint, command);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to Grafana")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Grafana call {} failed with status {}: {}", command, status, body);
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse Grafana response for {}", command))
    }
}

#[async_trait]
impl DashboardRepository for GrafanaRepository {
    async fn search_boards(&self, tag: &str) -> Result<Vec<String>> {
        let hits: Vec<SearchHit> = self
            .call(&format!("search?tag={}", urlencoding::encode(tag)))
            .await?;
        Ok(hits.iter().filter_map(board_slug).collect())
    }

    async fn get_board(&self, slug: &str) -> Result<Board> {
        let response: BoardResponse = self.call(&format!("dashboards/db/{}", slug)).await?;
        Ok(to_board(slug, response.dashboard))
    }

    async fn list_datasources(&self) -> Result<Vec<Datasource>> {
        self.call("datasources").await
    }
}

/// `db/my-board` → `my-board`
fn board_slug(hit: &SearchHit) -> Option<String> {
    let path = hit.uri.as_deref().or(hit.url.as_deref())?;
    let slug = path.rsplit('/').next()?;
    (!slug.is_empty()).then(|| slug.to_string())
}

fn to_board(slug: &str, dashboard: DashboardModel) -> Board {
    let mut panels = Vec::new();
    let row_panels = dashboard.rows.into_iter().flat_map(|r| r.panels);
    for model in row_panels.chain(dashboard.panels) {
        collect_panels(model, &mut panels);
    }
    Board::new(slug.to_string(), panels)
}

fn collect_panels(model: PanelModel, out: &mut Vec<Panel>) {
    // Newer Grafana versions describe the data source as an object; only
    // named sources are understood here, anything else means "default".
    let datasource = model
        .datasource
        .as_ref()
        .and_then(|d| d.as_str())
        .map(str::to_string);

    if !model.targets.is_empty() {
        out.push(Panel::new(model.title, datasource, model.targets));
    }
    for nested in model.panels {
        collect_panels(nested, out);
    }
}
