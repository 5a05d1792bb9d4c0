//! Output formatting for console and report files

pub mod console;
pub mod html;

pub use console::{
    format_account_info, format_amount, format_duration, format_fee_estimate, format_run_report,
    format_submit_response, format_validation_report, progress_bar, shorten,
};
pub use html::render_transparency_html;
