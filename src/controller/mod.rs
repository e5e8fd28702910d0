pub mod dashboard;
pub mod state;
pub mod view;

pub use dashboard::DashboardController;
pub use state::{FetchState, Phase};
pub use view::{ChartView, DashboardView, TableRow, ViewSettings};
