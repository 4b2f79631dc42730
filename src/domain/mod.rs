// Domain layer - Boards, checks and the evaluation rules
pub mod board;
pub mod check;
pub mod classifier;
pub mod datasource;
pub mod event;
pub mod interpolation;
pub mod series;
