pub mod context;
pub mod expression;
pub mod record;
pub mod symbol;
pub mod types;
