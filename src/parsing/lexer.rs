use chumsky::prelude::*;

use super::Spanned;
use crate::common::Span;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    Number(i64),
    String(String),
    Ident(String),
    True,
    False,

    KwVariable,
    KwConstant,
    KwIf,
    KwElse,
    KwWhile,
    KwFor,
    KwTo,
    KwFunction,
    KwReturn,
    KwBreak,
    KwContinue,
    KwAs,

    Plus,
    Minus,
    MultipliedBy,
    DividedBy,
    Modulo,
    IsEqualTo,
    IsNotEqualTo,
    IsGreaterThan,
    IsLessThan,
    IsGreaterOrEqual,
    IsLessOrEqual,
    And,
    Or,
    Not,
    Represents,

    Positive,
    Negative,
    BitwiseNot,
    Ampersand,
    Pipe,
    Caret,

    ParenOpen,
    ParenClose,
    Comma,
    Colon,
    Period,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(value) => write!(f, "{value}"),
            Token::String(value) => write!(f, "{value:?}"),
            Token::Ident(name) => write!(f, "{name}"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::KwVariable => write!(f, "variable"),
            Token::KwConstant => write!(f, "constant"),
            Token::KwIf => write!(f, "if"),
            Token::KwElse => write!(f, "else"),
            Token::KwWhile => write!(f, "while"),
            Token::KwFor => write!(f, "for"),
            Token::KwTo => write!(f, "to"),
            Token::KwFunction => write!(f, "function"),
            Token::KwReturn => write!(f, "return"),
            Token::KwBreak => write!(f, "break"),
            Token::KwContinue => write!(f, "continue"),
            Token::KwAs => write!(f, "as"),
            Token::Plus => write!(f, "plus"),
            Token::Minus => write!(f, "minus"),
            Token::MultipliedBy => write!(f, "multiplied by"),
            Token::DividedBy => write!(f, "divided by"),
            Token::Modulo => write!(f, "modulo"),
            Token::IsEqualTo => write!(f, "is equal to"),
            Token::IsNotEqualTo => write!(f, "is not equal to"),
            Token::IsGreaterThan => write!(f, "is greater than"),
            Token::IsLessThan => write!(f, "is less than"),
            Token::IsGreaterOrEqual => write!(f, "is greater than or equal to"),
            Token::IsLessOrEqual => write!(f, "is less than or equal to"),
            Token::And => write!(f, "and"),
            Token::Or => write!(f, "or"),
            Token::Not => write!(f, "not"),
            Token::Represents => write!(f, "represents"),
            Token::Positive => write!(f, "+"),
            Token::Negative => write!(f, "-"),
            Token::BitwiseNot => write!(f, "~"),
            Token::Ampersand => write!(f, "&"),
            Token::Pipe => write!(f, "|"),
            Token::Caret => write!(f, "^"),
            Token::ParenOpen => write!(f, "("),
            Token::ParenClose => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Colon => write!(f, ":"),
            Token::Period => write!(f, "."),
        }
    }
}

pub fn lex() -> impl Parser<char, Vec<Spanned<Token>>, Error = Simple<char, Span>> {
    let integer = text::int(10).try_map(|text: String, span| {
        text.parse()
            .map(Token::Number)
            .map_err(|_| Simple::custom(span, text))
    });

    // a doubled quote inside a string stands for a literal quote
    let escaped_quote = just("\"\"").to('"');
    let string = escaped_quote
        .or(filter(|c: &char| *c != '"' && *c != '\n' && *c != '\r'))
        .repeated()
        .delimited_by(just('"'), just('"'))
        .collect::<String>()
        .map(Token::String);

    // the multi-word operators must be tried longest-first
    let verbal = choice((
        just("is greater than or equal to").to(Token::IsGreaterOrEqual),
        just("is less than or equal to").to(Token::IsLessOrEqual),
        just("is greater than").to(Token::IsGreaterThan),
        just("is less than").to(Token::IsLessThan),
        just("is not equal to").to(Token::IsNotEqualTo),
        just("is equal to").to(Token::IsEqualTo),
        just("multiplied by").to(Token::MultipliedBy),
        just("divided by").to(Token::DividedBy),
    ));

    let symbol = one_of("+-~&|^(),:.").map(|symb: char| match symb {
        '+' => Token::Positive,
        '-' => Token::Negative,
        '~' => Token::BitwiseNot,
        '&' => Token::Ampersand,
        '|' => Token::Pipe,
        '^' => Token::Caret,
        '(' => Token::ParenOpen,
        ')' => Token::ParenClose,
        ',' => Token::Comma,
        ':' => Token::Colon,
        '.' => Token::Period,
        _ => unreachable!(),
    });

    // identifiers are letters only
    let word = filter(|c: &char| c.is_alphabetic())
        .repeated()
        .at_least(1)
        .collect::<String>();

    let kw_or_ident = word.map(|word: String| match word.as_str() {
        "variable" => Token::KwVariable,
        "constant" => Token::KwConstant,
        "if" => Token::KwIf,
        "else" => Token::KwElse,
        "while" => Token::KwWhile,
        "for" => Token::KwFor,
        "to" => Token::KwTo,
        "function" => Token::KwFunction,
        "return" => Token::KwReturn,
        "break" => Token::KwBreak,
        "continue" => Token::KwContinue,
        "as" => Token::KwAs,
        "true" => Token::True,
        "false" => Token::False,
        "plus" => Token::Plus,
        "minus" => Token::Minus,
        "modulo" => Token::Modulo,
        "and" => Token::And,
        "or" => Token::Or,
        "not" => Token::Not,
        "represents" => Token::Represents,
        _ => Token::Ident(word),
    });

    let token = integer.or(string).or(verbal).or(symbol).or(kw_or_ident);

    token
        .map_with_span(|tok, span| (tok, span))
        .padded()
        .repeated()
        .padded()
        .then_ignore(end())
}
