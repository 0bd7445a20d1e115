//! Shunting-yard: compiles an infix token stream into postfix (RPN) order.

use crate::error::{CoreError, CoreResult};
use crate::expr::lexer::Token;

/// Compile `tokens` (as produced by [`crate::expr::lexer::tokenize`]) into
/// reverse-Polish order, left-associative, parentheses consumed.
pub fn shunting_yard(tokens: Vec<Token>) -> CoreResult<Vec<Token>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut operators: Vec<Token> = Vec::new();

    for token in tokens {
        match token {
            Token::Number(_) | Token::Variable(_) => output.push(token),
            Token::LParen => operators.push(token),
            Token::RParen => {
                loop {
                    match operators.pop() {
                        Some(Token::LParen) => break,
                        Some(op) => output.push(op),
                        None => {
                            return Err(CoreError::Parse(
                                "unbalanced parentheses: unmatched ')'".to_string(),
                            ))
                        }
                    }
                }
            }
            op if op.is_operator() => {
                while let Some(top) = operators.last() {
                    if top.is_operator() && top.precedence() >= op.precedence() {
                        output.push(operators.pop().unwrap());
                    } else {
                        break;
                    }
                }
                operators.push(op);
            }
            other => {
                return Err(CoreError::Parse(format!(
                    "unexpected token in expression: {other:?}"
                )))
            }
        }
    }

    while let Some(op) = operators.pop() {
        if matches!(op, Token::LParen | Token::RParen) {
            return Err(CoreError::Parse(
                "unbalanced parentheses: unmatched '('".to_string(),
            ));
        }
        output.push(op);
    }

    Ok(output)
}
