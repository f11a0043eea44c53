pub mod limits;
pub mod response;
pub mod status;
