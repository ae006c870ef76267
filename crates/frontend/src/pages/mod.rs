pub mod citizen;
pub mod login;
pub mod responder;
