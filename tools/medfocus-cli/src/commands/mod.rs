pub mod check_report;
pub mod info;
pub mod replay;
pub mod settings;
