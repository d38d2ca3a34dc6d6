/// Splits rule text into tokens. Brackets are always standalone tokens;
/// any run of whitespace separates the rest. Vocabulary and bracket
/// balance are left to the parser.
pub struct Tokens<'t> {
    text: &'t str,
    index: usize,
}

impl<'t> Tokens<'t> {
    pub fn new(text: &'t str) -> Self {
        Tokens { text, index: 0 }
    }
}

impl<'t> Iterator for Tokens<'t> {
    type Item = &'t str;

    fn next(&mut self) -> Option<&'t str> {
        let rest = &self.text[self.index..];
        let skipped = rest.len() - rest.trim_start().len();
        let start = self.index + skipped;
        let rest = &self.text[start..];

        let len = match rest.chars().next()? {
            '(' | ')' => 1,
            _ => rest
                .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
                .unwrap_or(rest.len()),
        };

        self.index = start + len;

        Some(&self.text[start..start + len])
    }
}

/// Tokenizes into a reusable array.
pub fn tokenize(text: &str) -> Vec<&str> {
    Tokens::new(text).collect()
}

#[test]
fn test_tokenize() {
    assert_eq!(
        tokenize("if (input1 is mf1) and (input2 is mf1) then (output1 is mf1)"),
        vec![
            "if", "(", "input1", "is", "mf1", ")", "and", "(", "input2", "is", "mf1", ")", "then", "(", "output1",
            "is", "mf1", ")"
        ]
    );
    assert_eq!(
        tokenize("  if((a is  x))then\t(b is y)  "),
        vec!["if", "(", "(", "a", "is", "x", ")", ")", "then", "(", "b", "is", "y", ")"]
    );
    assert!(tokenize("   ").is_empty());
    assert_eq!(tokenize("a )( b"), vec!["a", ")", "(", "b"]);
}
