// Adapters layer: concrete implementations for external systems.

pub mod supabase;

pub use supabase::SupabaseClient;
