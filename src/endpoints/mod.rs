//! HTTP endpoints for the content publishing report

pub mod report;

pub use report::{report_item_handler, report_list_handler, ReportState};
