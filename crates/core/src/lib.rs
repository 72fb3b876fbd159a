#![forbid(unsafe_code)]

pub mod answer;
pub mod error;
pub mod generator;
pub mod model;

pub use answer::{AnswerCheck, check_answer, round_to_hundredths};
pub use error::Error;
pub use generator::{generate, generate_default};
