pub mod entities;
pub mod ownership;
pub mod requests;
pub mod responses;
