use crate::{
    expr::Expression,
    registry::{OperationInfo, OperationKind, Registry, SignMatch},
};
use smol_str::SmolStr;
use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// Parse an [`Expression`] tree from some text, using the operators in
/// `registry`.
///
/// This is the shunting-yard algorithm over the token stream produced by
/// [`Tokens`]: completed subtrees collect on an output stack while
/// operators wait on a pending stack until precedence, associativity or a
/// closing brace forces them to take their operands.
pub fn parse(
    src: &str,
    registry: &Registry,
) -> Result<Expression, ParseError> {
    let tokens = Tokens::new(src, registry);
    let mut output: Vec<Expression> = Vec::new();
    let mut yard: Vec<YardEntry<'_>> = Vec::new();

    for token in tokens {
        match token {
            Token::Value(text) => output.push(value_node(text)),
            Token::Operator(sign) => {
                let info = registry.lookup(&sign).ok_or_else(|| {
                    ParseError::UnknownOperator { sign: sign.clone() }
                })?;

                while let Some(entry) = yard.last() {
                    if !entry.yields_to(info) {
                        break;
                    }
                    pop_and_reduce(&mut yard, &mut output)?;
                }

                yard.push(YardEntry::Operator { sign, info });
            },
            Token::OpenBrace => yard.push(YardEntry::OpenBrace),
            Token::CloseBrace => loop {
                match yard.last() {
                    Some(YardEntry::OpenBrace) => {
                        yard.pop();
                        break;
                    },
                    Some(YardEntry::Operator { .. }) => {
                        pop_and_reduce(&mut yard, &mut output)?;
                    },
                    None => return Err(ParseError::MismatchedBraces),
                }
            },
        }
    }

    while let Some(entry) = yard.last() {
        match entry {
            YardEntry::OpenBrace => return Err(ParseError::MismatchedBraces),
            YardEntry::Operator { .. } => {
                pop_and_reduce(&mut yard, &mut output)?;
            },
        }
    }

    let root = output.pop().ok_or(ParseError::EmptyExpression)?;

    if output.is_empty() {
        Ok(root)
    } else {
        Err(ParseError::MissingOperator)
    }
}

impl FromStr for Expression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s, &Registry::default())
    }
}

/// An entry on the pending ("yard") stack.
#[derive(Debug, Clone, PartialEq)]
enum YardEntry<'r> {
    OpenBrace,
    Operator {
        sign: SmolStr,
        info: &'r OperationInfo,
    },
}

impl<'r> YardEntry<'r> {
    /// Should this pending entry be reduced before `incoming` is pushed?
    fn yields_to(&self, incoming: &OperationInfo) -> bool {
        match self {
            YardEntry::OpenBrace => false,
            YardEntry::Operator { info: top, .. } => {
                if incoming.left_assoc {
                    incoming.priority >= top.priority
                } else {
                    incoming.priority > top.priority
                }
            },
        }
    }
}

fn value_node(text: SmolStr) -> Expression {
    match text.parse::<f64>() {
        Ok(number) => Expression::Constant(number),
        Err(_) => Expression::Variable(text),
    }
}

/// Pop the topmost pending operator and reduce it: take its operands off
/// the output stack, build the node, and push the combined fragment back.
fn pop_and_reduce(
    yard: &mut Vec<YardEntry<'_>>,
    output: &mut Vec<Expression>,
) -> Result<(), ParseError> {
    let (sign, info) = match yard.pop() {
        Some(YardEntry::Operator { sign, info }) => (sign, info),
        other => unreachable!("only operators are reduced, got {:?}", other),
    };

    let missing = || ParseError::MissingOperands { sign: sign.clone() };

    match info.kind {
        OperationKind::Unary(op) => {
            let argument = output.pop().ok_or_else(missing)?;
            output.push(Expression::unary(op, argument));
        },
        OperationKind::Binary(op) => {
            // the output stack is LIFO, so the first fragment popped is the
            // right operand
            let right = output.pop().ok_or_else(missing)?;
            let left = output.pop().ok_or_else(missing)?;
            output.push(Expression::binary(left, op, right));
        },
    }

    Ok(())
}

/// Possible errors that may occur while parsing.
///
/// A failed parse is final for that input: no partial tree is returned and
/// retrying without changing the source cannot succeed.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// An opening brace was never closed, or a closing brace never opened.
    MismatchedBraces,
    /// An operator had fewer operands available than its arity requires.
    MissingOperands { sign: SmolStr },
    /// More than one complete fragment was left with no operator to join
    /// them (e.g. `(1)(2)`).
    MissingOperator,
    /// The input contained no tokens at all.
    EmptyExpression,
    /// The tokenizer produced a sign the registry does not know. Reaching
    /// this means the tokenizer and registry are out of sync.
    UnknownOperator { sign: SmolStr },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MismatchedBraces => {
                write!(f, "The braces are unbalanced")
            },
            ParseError::MissingOperands { sign } => {
                write!(f, "The \"{}\" operator is missing operands", sign)
            },
            ParseError::MissingOperator => write!(
                f,
                "The input leaves multiple values with no operator joining them"
            ),
            ParseError::EmptyExpression => {
                write!(f, "The input contains no expression")
            },
            ParseError::UnknownOperator { sign } => {
                write!(f, "The \"{}\" operator is not registered", sign)
            },
        }
    }
}

impl Error for ParseError {}

/// A single token cut from the source text.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    /// A number or variable name. Anything the registry doesn't claim ends
    /// up here; there is no character-validity check.
    Value(SmolStr),
    /// A registered operator sign.
    Operator(SmolStr),
    OpenBrace,
    CloseBrace,
}

/// A cursor over the source text, cutting one token per call.
///
/// Operator signs are matched greedily against the registry: the candidate
/// grows while it is still an exact sign or the prefix of one, and on a
/// dead end it falls back to the longest exact sign seen. Values soak up
/// every character the registry doesn't claim; the token that terminates a
/// value is buffered in `lookahead` so nothing is lost.
#[derive(Debug, Clone)]
pub(crate) struct Tokens<'a> {
    src: &'a str,
    cursor: usize,
    registry: &'a Registry,
    lookahead: Option<Token>,
}

fn is_separator(c: char) -> bool { c == ' ' || c == '\t' || c == '\n' }

impl<'a> Tokens<'a> {
    pub(crate) fn new(src: &'a str, registry: &'a Registry) -> Self {
        Tokens {
            src,
            cursor: 0,
            registry,
            lookahead: None,
        }
    }

    fn rest(&self) -> &'a str { &self.src[self.cursor..] }

    fn peek(&self) -> Option<char> { self.rest().chars().next() }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += c.len_utf8();
        Some(c)
    }

    fn skip_separators(&mut self) {
        while let Some(c) = self.peek() {
            if !is_separator(c) {
                break;
            }
            self.advance();
        }
    }

    /// Try to cut an operator sign off the front of the remaining source.
    /// Consumes nothing if the text doesn't start with a registered sign.
    fn chomp_operator(&mut self) -> Option<SmolStr> {
        let rest = self.rest();
        let mut longest_exact = None;

        for (index, c) in rest.char_indices() {
            let candidate = &rest[..index + c.len_utf8()];

            match self.registry.classify(candidate) {
                SignMatch::Exact => longest_exact = Some(candidate.len()),
                SignMatch::Prefix => {},
                SignMatch::None => break,
            }
        }

        let length = longest_exact?;
        let sign = SmolStr::from(&rest[..length]);
        self.cursor += length;
        Some(sign)
    }

    /// Cut a value token. The first character is already known not to start
    /// an operator; further characters accumulate one at a time (skipping
    /// any whitespace between them) until a brace, an operator or the end
    /// of input terminates the value.
    fn chomp_value(&mut self) -> Option<SmolStr> {
        let mut text = String::new();
        text.push(self.advance()?);

        loop {
            self.skip_separators();

            let next = match self.peek() {
                Some(c) => c,
                None => break,
            };

            if next == '(' {
                self.advance();
                self.lookahead = Some(Token::OpenBrace);
                break;
            }
            if next == ')' {
                self.advance();
                self.lookahead = Some(Token::CloseBrace);
                break;
            }
            if let Some(sign) = self.chomp_operator() {
                self.lookahead = Some(Token::Operator(sign));
                break;
            }

            match self.advance() {
                Some(c) => text.push(c),
                None => break,
            }
        }

        Some(SmolStr::from(text))
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(buffered) = self.lookahead.take() {
            return Some(buffered);
        }

        self.skip_separators();

        match self.peek()? {
            '(' => {
                self.advance();
                Some(Token::OpenBrace)
            },
            ')' => {
                self.advance();
                Some(Token::CloseBrace)
            },
            _ => match self.chomp_operator() {
                Some(sign) => Some(Token::Operator(sign)),
                None => self.chomp_value().map(Token::Value),
            },
        }
    }
}
