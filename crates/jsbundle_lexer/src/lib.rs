//! Tokenizer for ECMAScript source text.

mod keywords;
mod lexer;

pub use keywords::{is_always_reserved, is_contextual_keyword, is_strict_reserved};
pub use lexer::Lexer;

#[cfg(test)]
mod tests {
    use super::*;
    use jsbundle_ast::{TokenTag, TokenValue};

    fn tags(src: &str) -> Vec<TokenTag> {
        let mut lexer = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token().expect("lex ok");
            let done = tok.tag == TokenTag::Eof;
            out.push(tok.tag);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn lexes_simple_statement() {
        assert_eq!(
            tags("var x = 1;"),
            vec![TokenTag::Var, TokenTag::Name, TokenTag::Eq, TokenTag::Num, TokenTag::Semi, TokenTag::Eof]
        );
    }

    #[test]
    fn distinguishes_regex_from_division() {
        assert_eq!(tags("a / b"), vec![TokenTag::Name, TokenTag::Slash, TokenTag::Name, TokenTag::Eof]);
        assert_eq!(tags("return /abc/;"), vec![TokenTag::Return, TokenTag::Regexp, TokenTag::Semi, TokenTag::Eof]);
    }

    #[test]
    fn lexes_hex_octal_binary_numbers() {
        let mut lexer = Lexer::new("0x10 0o10 0b10");
        let hex = lexer.next_token().unwrap();
        let oct = lexer.next_token().unwrap();
        let bin = lexer.next_token().unwrap();
        assert_eq!(hex.value, TokenValue::Number { value: 16.0, raw: "0x10".into() });
        assert_eq!(oct.value, TokenValue::Number { value: 8.0, raw: "0o10".into() });
        assert_eq!(bin.value, TokenValue::Number { value: 2.0, raw: "0b10".into() });
    }

    #[test]
    fn lexes_template_literal_with_one_hole() {
        assert_eq!(
            tags("`a${b}c`"),
            vec![
                TokenTag::BackQuote,
                TokenTag::Template,
                TokenTag::DollarBraceL,
                TokenTag::Name,
                TokenTag::Template,
                TokenTag::Eof,
            ]
        );
    }

    #[test]
    fn can_insert_semicolon_across_newline() {
        let mut lexer = Lexer::new("a\nb");
        let a = lexer.next_token().unwrap();
        let _ = a;
        let b = lexer.next_token().unwrap();
        assert!(lexer.can_insert_semicolon(&b));
    }

    #[test]
    fn rejects_unterminated_string() {
        let mut lexer = Lexer::new("\"abc");
        assert!(lexer.next_token().is_err());
    }
}
