pub mod activity;

pub use activity::ActivityLogService;
