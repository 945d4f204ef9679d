pub mod api;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod gauge;
pub mod logger;
pub mod model;
pub mod particles;
pub mod session;
pub mod view;

pub use dashboard::{Action, Dashboard, ViewState};
pub use error::{PredictorError, Result};
pub use model::{batch_predict, classify, predict_grade, Grade, Label, Score, StudentRecord, Tier};
