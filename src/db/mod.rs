pub mod connection;
pub mod query;
pub mod repository;
pub mod supabase;
