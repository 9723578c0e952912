mod context;
mod expression;
mod statement;

pub use context::ParserContext;
