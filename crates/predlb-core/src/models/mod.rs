pub mod features;
pub mod record;
pub mod session;
pub mod subject;
pub mod target;
pub mod user;
