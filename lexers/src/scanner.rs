/// Backtracking cursor over the characters of a source string.
///
/// `pos` counts the characters consumed so far, so it doubles as the index
/// of the next character. Every `accept*` method either consumes what it
/// matched or leaves the position untouched.
#[derive(Clone, Debug)]
pub struct Scanner {
    src: Vec<char>,
    pos: usize,
}

impl Iterator for Scanner {
    type Item = char;
    fn next(&mut self) -> Option<char> {
        let next = self.peek()?;
        self.pos += 1;
        Some(next)
    }
}

impl Scanner {
    pub fn new(source: &str) -> Scanner {
        Scanner {
            src: source.chars().collect(),
            pos: 0,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) -> bool {
        if pos > self.src.len() {
            return false;
        }
        self.pos = pos;
        true
    }

    pub fn len(&self) -> usize {
        self.src.len()
    }

    pub fn is_empty(&self) -> bool {
        self.src.is_empty()
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }

    /// Text between `from` and the current position.
    pub fn lexeme(&self, from: usize) -> String {
        let from = from.min(self.pos);
        self.src[from..self.pos].iter().collect()
    }

    pub fn accept(&mut self, what: char) -> Option<char> {
        if self.peek() == Some(what) {
            return self.next();
        }
        None
    }

    // Advance only if the next char is in the 'any' set
    pub fn accept_any(&mut self, any: &[char]) -> Option<char> {
        match self.peek() {
            Some(next) if any.contains(&next) => self.next(),
            _ => None,
        }
    }

    /// Consume `word` only if the input continues with all of it.
    pub fn accept_word(&mut self, word: &str) -> bool {
        let backtrack = self.pos;
        for c in word.chars() {
            if self.accept(c).is_none() {
                self.pos = backtrack;
                return false;
            }
        }
        true
    }

    // Skip over the 'over' set, result is if the scanner was advanced
    pub fn skip_all(&mut self, over: &[char]) -> bool {
        let mut advanced = false;
        while self.accept_any(over).is_some() {
            advanced = true;
        }
        advanced
    }

    /// Skip blanks, returns false if nothing is left to scan afterwards.
    pub fn skip_spaces(&mut self) -> bool {
        self.skip_all(&[' ']);
        !self.at_end()
    }
}
