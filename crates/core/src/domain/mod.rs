pub mod contact;
pub mod delivery;
pub mod field;
pub mod record;
