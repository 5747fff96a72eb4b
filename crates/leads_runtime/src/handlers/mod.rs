pub mod email_intake;
pub mod run;
pub mod sheet_sources;
pub mod status_writer;
