pub mod crm;
pub mod csv_store;
pub mod mailbox;
pub mod row_store;
pub mod sheets_api;
