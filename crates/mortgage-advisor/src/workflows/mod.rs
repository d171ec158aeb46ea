pub mod affordability;
pub mod chat;
pub mod knowledge;
pub mod router;
