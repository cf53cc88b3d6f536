pub mod event;
pub mod generate;
pub mod response;
pub mod status;
