use proptest::prelude::*;

use super::{keyword::Keyword, lex, LexErrorKind};
use crate::lexer::token::{LiteralKind, Symbol, TokenKind};

macro_rules! assert_lex_result {
    ($_res:expr,) => {};

    ($res:expr, $token:expr) => {
        assert_eq!($res.next().unwrap().kind, $token);
    };

    ($res:expr, $token:expr, $($rest:tt)*) => {
        assert_lex_result!($res, $token);
        assert_lex_result!($res, $($rest)*)
    };
}

#[test]
fn lexing_works() {
    let mut res = lex("x := foo(1, 2) + 3;")
        .expect("Expected a successful lex")
        .into_iter();

    assert_lex_result!(
        res,
        TokenKind::Ident,
        TokenKind::Symbol(Symbol::Assign),
        TokenKind::Ident,
        TokenKind::Symbol(Symbol::OpenParen),
        TokenKind::Literal(LiteralKind::Decimal),
        TokenKind::Symbol(Symbol::Comma),
        TokenKind::Literal(LiteralKind::Decimal),
        TokenKind::Symbol(Symbol::CloseParen),
        TokenKind::Symbol(Symbol::Plus),
        TokenKind::Literal(LiteralKind::Decimal),
        TokenKind::Symbol(Symbol::Semicolon),
    );

    assert!(res.next().is_none());
}

#[test]
fn keywords_ignore_case() {
    let mut res = lex("BEGIN Begin begin WriteLn")
        .expect("Expected a successful lex")
        .into_iter();

    assert_lex_result!(
        res,
        TokenKind::Keyword(Keyword::Begin),
        TokenKind::Keyword(Keyword::Begin),
        TokenKind::Keyword(Keyword::Begin),
        TokenKind::Keyword(Keyword::WriteLn),
    );
}

#[test]
fn identifiers_keep_spelling() {
    let res = lex("Counter").expect("Expected a successful lex");

    assert_eq!(res[0].kind, TokenKind::Ident);
    assert_eq!(res[0].text, "Counter");
}

#[test]
fn lex_failure_works() {
    let res = lex("x := ∅;").expect_err("Expected a failed lex");

    assert_eq!(res.kind, LexErrorKind::UnexpectedChar('∅'));
    assert_eq!((res.line, res.column), (1, 6));
    assert_eq!(res.span.start, 5);
}

#[test]
fn lex_strings() {
    let res = lex(r#"'fujiwara no mokou' "it's""#).expect("Expected a successful lex");

    assert_eq!(res[0].kind, TokenKind::Literal(LiteralKind::String));
    assert_eq!(res[0].text, "fujiwara no mokou");
    assert_eq!(res[1].text, "it's");
    assert_eq!(res[1].span.length, 6);
}

#[test]
fn lex_string_keeps_escapes_raw() {
    let res = lex(r"'hina\nkagiyama'").expect("Expected a successful lex");

    assert_eq!(res[0].text, "hina\\nkagiyama");
}

#[test]
fn lex_string_unterminated() {
    let res = lex("'hello").expect_err("Expected a failed lex");
    assert_eq!(res.kind, LexErrorKind::UnterminatedString);

    let res = lex("'hello\n'").expect_err("Expected a failed lex");
    assert_eq!(res.kind, LexErrorKind::UnterminatedString);
}

#[test]
fn lex_integers() {
    let res = lex("12345 0x1A 017 0 019").expect("Expected a successful lex");
    let kinds = res.iter().map(|t| t.kind).collect::<Vec<_>>();

    assert_eq!(kinds, vec![
        TokenKind::Literal(LiteralKind::Decimal),
        TokenKind::Literal(LiteralKind::Hex),
        TokenKind::Literal(LiteralKind::Octal),
        TokenKind::Literal(LiteralKind::Decimal),
        TokenKind::Literal(LiteralKind::Decimal),
    ]);

    assert_eq!(res[1].text, "0x1A");
}

#[test]
fn lex_float() {
    let res = lex("1.5").expect("Expected a successful lex");

    assert_eq!(res.len(), 1);
    assert_eq!(res[0].kind, TokenKind::Literal(LiteralKind::Float));
    assert_eq!(res[0].text, "1.5");
}

#[test]
fn dot_after_integer_is_not_a_float() {
    let mut res = lex("end.").expect("Expected a successful lex").into_iter();
    assert_lex_result!(res, TokenKind::Keyword(Keyword::End), TokenKind::Symbol(Symbol::Dot));

    let mut res = lex("1.").expect("Expected a successful lex").into_iter();
    assert_lex_result!(
        res,
        TokenKind::Literal(LiteralKind::Decimal),
        TokenKind::Symbol(Symbol::Dot)
    );
}

#[test]
fn lex_bad_numbers() {
    assert_eq!(
        lex("0x").expect_err("Expected a failed lex").kind,
        LexErrorKind::EmptyHexLiteral
    );

    assert!(matches!(
        lex("99999999999999999999").expect_err("Expected a failed lex").kind,
        LexErrorKind::IntegerTooLarge(_)
    ));
}

#[test]
fn lex_maybe_two_char() {
    let res = lex(": := < <= <> > >= =").expect("Expected a successful lex");
    let kinds = res.iter().map(|t| t.kind).collect::<Vec<_>>();

    assert_eq!(kinds, vec![
        TokenKind::Symbol(Symbol::Colon),
        TokenKind::Symbol(Symbol::Assign),
        TokenKind::Symbol(Symbol::LessThan),
        TokenKind::Symbol(Symbol::LessThanEqual),
        TokenKind::Symbol(Symbol::NotEqual),
        TokenKind::Symbol(Symbol::GreaterThan),
        TokenKind::Symbol(Symbol::GreaterThanEqual),
        TokenKind::Symbol(Symbol::Equals),
    ]);
}

#[test]
fn comments_are_skipped() {
    let res = lex("{ a comment\n spanning lines } x // trailing\n y").expect("Expected a successful lex");

    assert_eq!(res.len(), 2);
    assert_eq!(res[0].text, "x");
    assert_eq!(res[1].text, "y");
    assert_eq!((res[1].line, res[1].column), (3, 2));
}

#[test]
fn unterminated_comment() {
    let res = lex("x { oops").expect_err("Expected a failed lex");

    assert_eq!(res.kind, LexErrorKind::UnterminatedComment);
    assert_eq!(res.column, 3);
}

#[test]
fn positions() {
    let res = lex("program p;\n  x := 10;").expect("Expected a successful lex");
    let positions = res
        .iter()
        .map(|t| (t.line, t.column))
        .collect::<Vec<_>>();

    assert_eq!(positions, vec![(1, 1), (1, 9), (1, 10), (2, 3), (2, 5), (2, 8), (2, 10)]);
    assert_eq!(res[5].span.start, 18);
    assert_eq!(res[5].span.length, 2);
}

proptest! {
    #[test]
    fn lex_doesnt_crash(s in "\\PC*") {
        let _ = lex(&s);
    }

    #[test]
    fn lex_decimal_numbers(n in 1u32..) {
        let text = n.to_string();
        let res = lex(&text).expect("Expected a successful lex");

        prop_assert_eq!(res.len(), 1);
        prop_assert_eq!(res[0].kind, TokenKind::Literal(LiteralKind::Decimal));
        prop_assert_eq!(&res[0].text, &text);
    }

    #[test]
    fn lex_identifiers(ident in "[a-z_][a-z0-9_]{0,10}") {
        let res = lex(&ident).expect("Expected a successful lex");

        prop_assert_eq!(res.len(), 1);
        let expected_kind = match Keyword::from_str(&ident) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Ident,
        };
        prop_assert_eq!(res[0].kind, expected_kind);
    }
}
