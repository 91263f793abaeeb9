//! Token rules for Ember.
//!
//! Priority order matters only for equal-length matches: keywords are
//! listed before the identifier rule so `let` lexes as a keyword while
//! `lettuce` still wins by maximal munch.

use crate::lexer::{LexerRule, TokenKind};

const KEYWORDS: &[&str] = &[
    "function", "type", "inherits", "protocol", "extends", "new", "is", "as", "let", "in",
    "if", "elif", "else", "while", "for",
];

/// Punctuation spellings paired with the pattern that matches them
/// (regex specials escaped).
const SYMBOLS: &[(&str, &str)] = &[
    ("{", "{"),
    ("}", "}"),
    ("(", "\\("),
    (")", "\\)"),
    ("[", "\\["),
    ("]", "\\]"),
    ("||", "\\|\\|"),
    (",", ","),
    (";", ";"),
    (":=", ":="),
    (":", ":"),
    (".", "\\."),
    ("=>", "=>"),
    ("==", "=="),
    ("=", "="),
    ("!=", "!="),
    ("!", "!"),
    ("<=", "<="),
    ("<", "<"),
    (">=", ">="),
    (">", ">"),
    ("+", "\\+"),
    ("-", "\\-"),
    ("*", "\\*"),
    ("/", "/"),
    ("%", "%"),
    ("^", "\\^"),
    ("@@", "@@"),
    ("@", "@"),
    ("&", "&"),
    ("|", "\\|"),
];

/// The full Ember rule set, in priority order.
pub fn ember_rules() -> Vec<LexerRule> {
    let mut rules = vec![
        LexerRule::skip("whitespace", "[ \\t\\r\\n]+"),
        LexerRule::skip("comment", "//[^\\n]*"),
    ];

    for keyword in KEYWORDS {
        rules.push(LexerRule::new(keyword, TokenKind::Symbol, keyword));
    }
    rules.push(LexerRule::new("boolean", TokenKind::Boolean, "true|false"));
    rules.push(LexerRule::new(
        "identifier",
        TokenKind::Identifier,
        "[a-zA-Z_][a-zA-Z0-9_]*",
    ));
    rules.push(LexerRule::new(
        "number",
        TokenKind::Number,
        "[0-9]+(\\.[0-9]+)?",
    ));
    rules.push(LexerRule::new(
        "string",
        TokenKind::String,
        "\"([^\"\\\\]|\\\\.)*\"",
    ));
    for (spelling, pattern) in SYMBOLS {
        rules.push(LexerRule::new(spelling, TokenKind::Symbol, pattern));
    }

    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::build_lexer;
    use crate::regex::RegexCompiler;

    fn lex(source: &str) -> Vec<(String, TokenKind)> {
        let regex = RegexCompiler::new().expect("regex grammar builds");
        let lexer = build_lexer(&regex, ember_rules()).expect("ember rules build");
        lexer
            .run(source)
            .expect("source lexes")
            .into_iter()
            .map(|t| (t.value.to_string(), t.kind))
            .collect()
    }

    #[test]
    fn keywords_literals_and_operators() {
        let tokens = lex("let total = 3.5 + x; // tail comment");
        let kinds: Vec<TokenKind> = tokens.iter().map(|(_, k)| *k).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Symbol,
                TokenKind::Identifier,
                TokenKind::Symbol,
                TokenKind::Number,
                TokenKind::Symbol,
                TokenKind::Identifier,
                TokenKind::Symbol,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[3].0, "3.5");
    }

    #[test]
    fn compound_operators_win_by_maximal_munch() {
        let tokens = lex("a := b == c => d @@ e || f");
        let spellings: Vec<&str> = tokens.iter().map(|(v, _)| v.as_str()).collect();
        assert!(spellings.contains(&":="));
        assert!(spellings.contains(&"=="));
        assert!(spellings.contains(&"=>"));
        assert!(spellings.contains(&"@@"));
        assert!(spellings.contains(&"||"));
    }

    #[test]
    fn strings_may_contain_escaped_quotes() {
        let tokens = lex(r#"print("he said \"hi\"");"#);
        assert!(
            tokens
                .iter()
                .any(|(v, k)| *k == TokenKind::String && v.contains("\\\"hi\\\""))
        );
    }

    #[test]
    fn booleans_are_their_own_kind() {
        let tokens = lex("true & false");
        assert_eq!(tokens[0], ("true".to_string(), TokenKind::Boolean));
        assert_eq!(tokens[2], ("false".to_string(), TokenKind::Boolean));
    }
}
