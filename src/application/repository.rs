// Ports to Grafana, the series backend and the event queue
use crate::domain::board::Board;
use crate::domain::datasource::Datasource;
use crate::domain::event::Event;
use crate::domain::series::Series;
use async_trait::async_trait;

/// Time range passed to the render call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderWindow {
    pub from: String,
    pub until: Option<String>,
}

impl Default for RenderWindow {
    fn default() -> Self {
        Self {
            from: "-1h".to_string(),
            until: None,
        }
    }
}

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// Slugs of the boards carrying the given tag
    async fn search_boards(&self, tag: &str) -> anyhow::Result<Vec<String>>;

    /// Full board definition with all of its panels
    async fn get_board(&self, slug: &str) -> anyhow::Result<Board>;

    async fn list_datasources(&self) -> anyhow::Result<Vec<Datasource>>;
}

#[async_trait]
pub trait SeriesRepository: Send + Sync {
    /// Evaluate a query expression. Wildcards may expand into several series.
    async fn render(
        &self,
        datasource: &Datasource,
        expression: &str,
        window: &RenderWindow,
    ) -> anyhow::Result<Vec<Series>>;
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn push(&self, events: &[Event]) -> anyhow::Result<()>;
}
