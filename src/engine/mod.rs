pub mod display;
pub mod level;
pub mod masked;
pub mod progressive;
pub mod validate;
pub mod vocabulary;
