use super::ExprError;
use crate::value::string_to_number;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Str(String),
    Ident(String),
    Punct(&'static str),
}

const PUNCTUATORS: [&str; 24] = [
    "===", "!==", "==", "!=", "<=", ">=", "&&", "||", "??", "+", "-", "*", "/", "%", "<", ">",
    "!", "(", ")", "[", "]", ".", "?", ":",
];

pub fn tokenize(source: &str) -> Result<Vec<Token>, ExprError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;
    while let Some(&ch) = chars.get(pos) {
        if ch.is_whitespace() {
            pos += 1;
        } else if ch.is_ascii_digit()
            || (ch == '.' && chars.get(pos + 1).is_some_and(char::is_ascii_digit))
        {
            let (number, next) = lex_number(&chars, pos)?;
            tokens.push(Token::Number(number));
            pos = next;
        } else if ch == '"' || ch == '\'' {
            let (text, next) = lex_string(&chars, pos)?;
            tokens.push(Token::Str(text));
            pos = next;
        } else if is_ident_start(ch) {
            let start = pos;
            while chars.get(pos).is_some_and(|next| is_ident_part(*next)) {
                pos += 1;
            }
            tokens.push(Token::Ident(chars[start..pos].iter().collect()));
        } else {
            let Some(punct) = PUNCTUATORS.iter().find(|punct| {
                punct
                    .chars()
                    .enumerate()
                    .all(|(offset, expected)| chars.get(pos + offset) == Some(&expected))
            }) else {
                return Err(ExprError::UnexpectedChar {
                    found: ch,
                    offset: pos,
                });
            };
            tokens.push(Token::Punct(punct));
            pos += punct.len();
        }
    }
    Ok(tokens)
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_ident_part(ch: char) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit()
}

fn lex_number(chars: &[char], start: usize) -> Result<(f64, usize), ExprError> {
    let mut pos = start;
    let radix_prefix = chars.get(start) == Some(&'0')
        && chars
            .get(start + 1)
            .is_some_and(|ch| matches!(ch, 'x' | 'X' | 'o' | 'O' | 'b' | 'B'));
    if radix_prefix {
        pos += 2;
        while chars.get(pos).is_some_and(char::is_ascii_alphanumeric) {
            pos += 1;
        }
    } else {
        while chars.get(pos).is_some_and(char::is_ascii_digit) {
            pos += 1;
        }
        if chars.get(pos) == Some(&'.') {
            pos += 1;
            while chars.get(pos).is_some_and(char::is_ascii_digit) {
                pos += 1;
            }
        }
        if chars.get(pos).is_some_and(|ch| matches!(ch, 'e' | 'E')) {
            pos += 1;
            if chars.get(pos).is_some_and(|ch| matches!(ch, '+' | '-')) {
                pos += 1;
            }
            while chars.get(pos).is_some_and(char::is_ascii_digit) {
                pos += 1;
            }
        }
    }
    let literal: String = chars[start..pos].iter().collect();
    // `3in` style input: an identifier may not follow a number directly.
    if chars.get(pos).is_some_and(|ch| is_ident_start(*ch)) {
        return Err(ExprError::InvalidNumber(literal));
    }
    let number = string_to_number(&literal);
    if number.is_nan() {
        return Err(ExprError::InvalidNumber(literal));
    }
    Ok((number, pos))
}

fn lex_string(chars: &[char], start: usize) -> Result<(String, usize), ExprError> {
    let quote = chars[start];
    let mut out = String::new();
    let mut pos = start + 1;
    loop {
        let Some(&ch) = chars.get(pos) else {
            return Err(ExprError::UnterminatedString);
        };
        pos += 1;
        match ch {
            '\\' => {
                let Some(&escaped) = chars.get(pos) else {
                    return Err(ExprError::UnterminatedString);
                };
                pos += 1;
                match escaped {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    '0' => out.push('\0'),
                    'u' => {
                        let hex: String = chars.iter().skip(pos).take(4).collect();
                        let decoded = u32::from_str_radix(&hex, 16)
                            .ok()
                            .filter(|_| hex.len() == 4)
                            .and_then(char::from_u32);
                        match decoded {
                            Some(decoded) => {
                                out.push(decoded);
                                pos += 4;
                            }
                            None => out.push('u'),
                        }
                    }
                    other => out.push(other),
                }
            }
            '\n' => return Err(ExprError::UnterminatedString),
            _ if ch == quote => return Ok((out, pos)),
            _ => out.push(ch),
        }
    }
}
