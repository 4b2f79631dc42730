use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("board discovery failed")]
    Discovery(#[source] anyhow::Error),

    #[error("failed to load board {board}")]
    BoardDetail {
        board: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to list data sources")]
    DatasourceList(#[source] anyhow::Error),

    #[error("data source {0} is not configured")]
    UnknownDatasource(String),

    #[error("no default data source is configured")]
    NoDefaultDatasource,

    #[error("failed to fetch {target}")]
    Fetch {
        target: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to flush {count} event(s)")]
    Flush {
        count: usize,
        #[source]
        source: anyhow::Error,
    },
}
