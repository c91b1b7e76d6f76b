pub mod models;
pub mod rules;
pub mod seeding;

pub use models::*;
pub use rules::{RuleParser, SemiFinals};
pub use seeding::{SeedSource, Seeding};
