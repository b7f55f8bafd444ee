mod banner;
mod dashboard;
mod sidebar;

pub use banner::ErrorBanner;
pub use dashboard::DashboardView;
pub use sidebar::Sidebar;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;
