pub mod contact;
pub mod email_address;
pub mod organization;
