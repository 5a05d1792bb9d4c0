//! Reading and writing payment CSV files

pub mod csv_format;
pub mod reader;

pub use csv_format::{convert_row, write_template_csv, RawPaymentRow};
pub use reader::PaymentReader;
