// Evaluation service - Walks alert boards and classifies every threshold check
use crate::application::accumulator::EvaluationAccumulator;
use crate::application::errors::EvaluationError;
use crate::application::repository::{DashboardRepository, RenderWindow, SeriesRepository};
use crate::domain::board::Panel;
use crate::domain::check::{Check, ThresholdExtractor};
use crate::domain::classifier::{classify, Bound, STALENESS_WINDOW_SECS};
use crate::domain::datasource::{self, Datasource};
use crate::domain::event::Event;
use crate::domain::interpolation::interpolate;
use crate::domain::series::{Sample, Series};
use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::OnceCell;

#[derive(Debug, Clone)]
pub struct EvaluationSettings {
    /// Base URL of Grafana, ending with `/`. Used for the event details link.
    pub grafana_endpoint: String,
    pub alert_tag: String,
    pub window: RenderWindow,
}

/// Where the events of one panel point to.
#[derive(Debug, Clone)]
struct PanelContext {
    entity: String,
    details: String,
}

pub struct EvaluationService {
    dashboards: Arc<dyn DashboardRepository>,
    series: Arc<dyn SeriesRepository>,
    extractor: ThresholdExtractor,
    settings: EvaluationSettings,
    datasources: OnceCell<Vec<Datasource>>,
}

impl EvaluationService {
    pub fn new(
        dashboards: Arc<dyn DashboardRepository>,
        series: Arc<dyn SeriesRepository>,
        extractor: ThresholdExtractor,
        settings: EvaluationSettings,
    ) -> Self {
        Self {
            dashboards,
            series,
            extractor,
            settings,
            datasources: OnceCell::new(),
        }
    }

    /// One full pass over every tagged board.
    ///
    /// Only a failed board search aborts the cycle. Failing boards, panels and
    /// checks are logged and left out of the result.
    pub async fn run_cycle(&self) -> Result<EvaluationAccumulator, EvaluationError> {
        let boards = self
            .dashboards
            .search_boards(&self.settings.alert_tag)
            .await
            .map_err(EvaluationError::Discovery)?;

        tracing::info!("found {} tagged board(s)", boards.len());

        let results = join_all(boards.iter().map(|slug| self.evaluate_board(slug))).await;

        let mut cycle = EvaluationAccumulator::new();
        for (slug, result) in boards.iter().zip(results) {
            match result {
                Ok(acc) => cycle.merge(acc),
                Err(e) => tracing::error!(board = %slug, "{:#}", anyhow::Error::from(e)),
            }
        }

        Ok(cycle)
    }

    async fn evaluate_board(&self, slug: &str) -> Result<EvaluationAccumulator, EvaluationError> {
        tracing::info!("processing board: {}", slug);

        let board = self
            .dashboards
            .get_board(slug)
            .await
            .map_err(|source| EvaluationError::BoardDetail {
                board: slug.to_string(),
                source,
            })?;

        let results = join_all(board.panels.iter().map(|panel| self.evaluate_panel(slug, panel))).await;

        let mut acc = EvaluationAccumulator::new();
        for (panel, result) in board.panels.iter().zip(results) {
            match result {
                Ok(panel_acc) => acc.merge(panel_acc),
                Err(e) => tracing::warn!(
                    board = %slug,
                    panel = %panel.title,
                    "skipping panel: {:#}",
                    anyhow::Error::from(e)
                ),
            }
        }

        Ok(acc)
    }

    async fn evaluate_panel(
        &self,
        board: &str,
        panel: &Panel,
    ) -> Result<EvaluationAccumulator, EvaluationError> {
        let checks: Vec<(Check, &str)> = self
            .extractor
            .extract(&panel.targets)
            .into_iter()
            .filter_map(|check| match panel.target_expression(&check.target_ref) {
                Some(primary) => Some((check, primary)),
                None => {
                    tracing::debug!(
                        board = %board,
                        panel = %panel.title,
                        "no target with refId {}, dropping check",
                        check.target_ref
                    );
                    None
                }
            })
            .collect();
        if checks.is_empty() {
            return Ok(EvaluationAccumulator::new());
        }

        let datasource = self.datasource(panel.datasource.as_deref()).await?;
        let ctx = PanelContext {
            entity: format!("grafana.{}.{}", board, panel.entity_name()),
            details: format!(
                "check grafana board for detail: {}dashboard/db/{}",
                self.settings.grafana_endpoint, board
            ),
        };

        let pending = checks
            .iter()
            .map(|(check, primary)| self.evaluate_check(&ctx, &datasource, check, primary));
        let results = join_all(pending).await;

        let mut acc = EvaluationAccumulator::new();
        for result in results {
            match result {
                Ok(check_acc) => acc.merge(check_acc),
                Err(e) => tracing::warn!(
                    board = %board,
                    panel = %panel.title,
                    "check aborted: {:#}",
                    anyhow::Error::from(e)
                ),
            }
        }

        Ok(acc)
    }

    /// Fetches the metric and its bounds together, then classifies every
    /// series the metric expands into. A failed fetch aborts this check only.
    async fn evaluate_check(
        &self,
        ctx: &PanelContext,
        datasource: &Datasource,
        check: &Check,
        primary: &str,
    ) -> Result<EvaluationAccumulator, EvaluationError> {
        let (data, lower, upper) = futures::try_join!(
            self.fetch(datasource, primary),
            self.fetch_optional(datasource, check.lower.as_deref()),
            self.fetch_optional(datasource, check.upper.as_deref()),
        )?;

        let reference = Utc::now().timestamp() - STALENESS_WINDOW_SECS;
        Ok(evaluate_series(
            ctx,
            &data,
            lower.as_deref(),
            upper.as_deref(),
            reference,
        ))
    }

    async fn fetch(&self, datasource: &Datasource, expression: &str) -> Result<Vec<Series>, EvaluationError> {
        self.series
            .render(datasource, expression, &self.settings.window)
            .await
            .map_err(|source| EvaluationError::Fetch {
                target: expression.to_string(),
                source,
            })
    }

    async fn fetch_optional(
        &self,
        datasource: &Datasource,
        expression: Option<&str>,
    ) -> Result<Option<Vec<Series>>, EvaluationError> {
        match expression {
            Some(expression) => self.fetch(datasource, expression).await.map(Some),
            None => Ok(None),
        }
    }

    /// The data source list is loaded once and kept for the process lifetime.
    /// A failed load leaves the cache empty so the next panel retries it.
    async fn datasource(&self, name: Option<&str>) -> Result<Datasource, EvaluationError> {
        let all = self
            .datasources
            .get_or_try_init(|| async {
                self.dashboards
                    .list_datasources()
                    .await
                    .map_err(EvaluationError::DatasourceList)
            })
            .await?;

        match datasource::resolve(all, name) {
            Some(ds) => Ok(ds.clone()),
            None => Err(match name {
                Some(name) => EvaluationError::UnknownDatasource(name.to_string()),
                None => EvaluationError::NoDefaultDatasource,
            }),
        }
    }
}

/// Bound value at the timestamp of the latest sample. Only the first series
/// of a bound query is considered.
fn bound_at(bound: Option<&[Series]>, last: Option<Sample>) -> Bound {
    let Some(bound) = bound else {
        return Bound::Undefined;
    };

    let value = last
        .zip(bound.first())
        .and_then(|(sample, series)| interpolate(&series.datapoints, sample.timestamp));

    match value {
        Some(v) => Bound::At(v),
        None => Bound::Uncomputable,
    }
}

fn evaluate_series(
    ctx: &PanelContext,
    data: &[Series],
    lower: Option<&[Series]>,
    upper: Option<&[Series]>,
    reference: i64,
) -> EvaluationAccumulator {
    let mut acc = EvaluationAccumulator::new();

    for series in data {
        let last = series.last_valid();
        let classification = classify(
            &series.name,
            last,
            bound_at(lower, last),
            bound_at(upper, last),
            reference,
        );

        tracing::debug!(
            entity = %ctx.entity,
            check = %series.name,
            state = %classification.state,
            "{}",
            classification.summary
        );

        acc.record(Event {
            entity: ctx.entity.clone(),
            check: series.name.clone(),
            kind: "service".to_string(),
            details: ctx.details.clone(),
            time: reference,
            state: classification.state,
            summary: classification.summary,
        });
    }

    acc
}
