use crate::scanner::Scanner;

pub static DIGITS: &[char] = &['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("malformed number '{lexeme}' at position {pos}")]
    MalformedNumber { lexeme: String, pos: usize },
}

// scan numbers like [0-9]+(\.[0-9]+)?
// No sign: a leading '-' is the parser's business. A dot must be followed by
// at least one digit, "12." is rejected instead of read as an integer.
pub fn scan_number(scanner: &mut Scanner) -> Result<Option<String>, LexError> {
    let start = scanner.pos();
    if !scanner.skip_all(DIGITS) {
        return Ok(None);
    }
    if scanner.accept('.').is_some() && !scanner.skip_all(DIGITS) {
        let lexeme = scanner.lexeme(start);
        scanner.set_pos(start);
        return Err(LexError::MalformedNumber { lexeme, pos: start });
    }
    Ok(Some(scanner.lexeme(start)))
}

// single char operators, looked up in the caller's table
pub fn scan_math_op(scanner: &mut Scanner, ops: &[char]) -> Option<char> {
    scanner.accept_any(ops)
}

///////////////////////////////////////////////////////////////////////////////
