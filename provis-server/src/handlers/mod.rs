pub mod health;
pub mod instances;
pub mod jobs;
pub mod logs;
pub mod validate;
