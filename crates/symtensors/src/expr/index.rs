//! Abstract index tokens.

use std::fmt;

/// A symbolic index token, one character such as `i` or `α`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AbstractIndex(pub char);

impl AbstractIndex {
    /// Tokens of an index string, one per non-whitespace character.
    ///
    /// ```
    /// use symtensors::expr::AbstractIndex;
    ///
    /// let tokens = AbstractIndex::parse("i j");
    /// assert_eq!(tokens, vec![AbstractIndex('i'), AbstractIndex('j')]);
    /// ```
    pub fn parse(indices: &str) -> Vec<AbstractIndex> {
        indices
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(AbstractIndex)
            .collect()
    }

    #[inline]
    pub fn as_char(self) -> char {
        self.0
    }
}

impl From<char> for AbstractIndex {
    fn from(c: char) -> Self {
        AbstractIndex(c)
    }
}

impl fmt::Display for AbstractIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_whitespace() {
        assert_eq!(AbstractIndex::parse("ab"), AbstractIndex::parse(" a  b "));
        assert!(AbstractIndex::parse("").is_empty());
    }

    #[test]
    fn test_parse_unicode() {
        let tokens = AbstractIndex::parse("αβ");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].to_string(), "β");
    }
}
