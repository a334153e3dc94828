mod helpers;
mod scanner;

pub use helpers::{DIGITS, LexError, scan_math_op, scan_number};
pub use scanner::Scanner;
