pub mod audit_log;
pub mod health;
pub mod organizations;
pub mod permissions;
pub mod tasks;
