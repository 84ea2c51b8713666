//! Relational store access: stored procedure call sites, the store seam and
//! its MySQL implementation.

pub mod client;
pub mod mysql;
pub mod procedure;

pub use client::{AlertStore, AlertStoreClient, DataStoreClient, StoreRow};
pub use mysql::MySqlAlertStore;
pub use procedure::{
    Procedure, ALERT_PARAMETER, DEFAULT_EVALUATION_PROCEDURE, DEFAULT_TARGET_PROCEDURE,
    PERCENTAGE_CHANGE_COLUMN, SYMBOL_COLUMN, TARGET_ADDRESS_COLUMN,
};
