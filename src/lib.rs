pub mod analytics;
pub mod config;
pub mod data;
pub mod model;
pub mod report;
pub mod view;

#[cfg(feature = "full")]
pub mod api;

pub use analytics::{Analysis, DeriveConfig, ExpiryConvention, PayoffPoint, PortfolioSummary};
pub use config::AppConfig;
pub use data::{AnalysisError, LoadError, LoadMode, ParseError, SchemaError};
pub use model::{DerivedPosition, LevelType, OptionKind, PositionRow};
pub use view::{DashboardSnapshot, ViewRequest, build_snapshot};
