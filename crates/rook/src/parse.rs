//! S-expression reader.
//!
//! Turns program source into the nested token tree the interpreter walks.
//! Every leaf token records the 1-based source line it came from; error
//! reporting leans on those lines throughout the core.

use std::{fmt, rc::Rc};

use crate::error::{Exception, RunResult};

/// A leaf token with its source line.
#[derive(Debug, Clone)]
pub(crate) struct Token {
    /// Raw token text. String literals keep their surrounding quotes; the
    /// literal parser strips them.
    pub text: Rc<str>,
    /// 1-based source line.
    pub line: u32,
}

/// One node of the parsed program tree.
#[derive(Debug, Clone)]
pub(crate) enum Node {
    Token(Token),
    List(Vec<Node>),
}

impl Node {
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Self::Token(tok) => Some(tok),
            Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Self::Token(_) => None,
            Self::List(items) => Some(items.as_slice()),
        }
    }

    /// Line of the first token under this node, scanning depth-first.
    pub fn line(&self) -> Option<u32> {
        match self {
            Self::Token(tok) => Some(tok.line),
            Self::List(items) => items.iter().find_map(Node::line),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(tok) => f.write_str(&tok.text),
            Self::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Incremental tree builder fed one node or delimiter at a time.
struct TreeBuilder {
    /// Finished top-level forms.
    top: Vec<Node>,
    /// Open lists, innermost last.
    stack: Vec<Vec<Node>>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            top: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn open(&mut self) {
        self.stack.push(Vec::new());
    }

    fn close(&mut self, line: u32) -> RunResult<()> {
        let Some(items) = self.stack.pop() else {
            return Err(Exception::syntax_error("unexpected ')'", Some(line)));
        };
        self.emit(Node::List(items), line)
    }

    /// Routes a finished node into the innermost open form, or to the program
    /// when no form is open. Bare tokens at the top level are malformed.
    fn emit(&mut self, node: Node, line: u32) -> RunResult<()> {
        if let Some(open) = self.stack.last_mut() {
            open.push(node);
            return Ok(());
        }
        match node {
            Node::List(_) => {
                self.top.push(node);
                Ok(())
            }
            Node::Token(tok) => Err(Exception::syntax_error(
                format!("unexpected token '{}' outside any form", tok.text),
                Some(line),
            )),
        }
    }

    fn finish(self) -> RunResult<Vec<Node>> {
        if self.stack.is_empty() {
            Ok(self.top)
        } else {
            Err(Exception::syntax_error("unbalanced '(': program ends inside a form", None))
        }
    }
}

/// Parses program source into a sequence of top-level forms.
///
/// Comments run from `#` to end of line. String literals are delimited by
/// double quotes, contain no escape sequences, and must close before the end
/// of their line. Anything that is not a parenthesis, whitespace, comment, or
/// string is a bare word token.
pub(crate) fn parse(source: &str) -> RunResult<Vec<Node>> {
    let mut builder = TreeBuilder::new();

    for (line_idx, line) in source.lines().enumerate() {
        let line_num = u32::try_from(line_idx).unwrap_or(u32::MAX).saturating_add(1);
        let mut chars = line.char_indices();
        let mut word_start: Option<usize> = None;

        let flush = |start: &mut Option<usize>, end: usize, builder: &mut TreeBuilder| -> RunResult<()> {
            if let Some(begin) = start.take() {
                builder.emit(
                    Node::Token(Token {
                        text: Rc::from(&line[begin..end]),
                        line: line_num,
                    }),
                    line_num,
                )?;
            }
            Ok(())
        };

        while let Some((idx, ch)) = chars.next() {
            match ch {
                '#' => {
                    flush(&mut word_start, idx, &mut builder)?;
                    break;
                }
                '(' => {
                    flush(&mut word_start, idx, &mut builder)?;
                    builder.open();
                }
                ')' => {
                    flush(&mut word_start, idx, &mut builder)?;
                    builder.close(line_num)?;
                }
                '"' => {
                    flush(&mut word_start, idx, &mut builder)?;
                    let close = chars.by_ref().find(|&(_, c)| c == '"').map(|(j, _)| j);
                    let Some(close) = close else {
                        return Err(Exception::syntax_error("unterminated string literal", Some(line_num)));
                    };
                    builder.emit(
                        Node::Token(Token {
                            text: Rc::from(&line[idx..=close]),
                            line: line_num,
                        }),
                        line_num,
                    )?;
                }
                c if c.is_whitespace() => {
                    flush(&mut word_start, idx, &mut builder)?;
                }
                _ => {
                    if word_start.is_none() {
                        word_start = Some(idx);
                    }
                }
            }
        }
        flush(&mut word_start, line.len(), &mut builder)?;
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::ErrorKind;

    fn parse_one(source: &str) -> Node {
        let mut forms = parse(source).unwrap();
        assert_eq!(forms.len(), 1);
        forms.remove(0)
    }

    #[test]
    fn words_and_nesting() {
        let node = parse_one("(class main (method void main () (print 1)))");
        assert_eq!(node.to_string(), "(class main (method void main () (print 1)))");
    }

    #[test]
    fn line_numbers_follow_tokens() {
        let forms = parse("(begin\n  (print x)\n  (print y))").unwrap();
        let begin = forms[0].as_list().unwrap();
        assert_eq!(begin[0].as_token().unwrap().line, 1);
        assert_eq!(begin[1].line(), Some(2));
        assert_eq!(begin[2].line(), Some(3));
    }

    #[test]
    fn strings_keep_quotes_and_spaces() {
        let node = parse_one("(print \"hello (world)\")");
        let list = node.as_list().unwrap();
        assert_eq!(&*list[1].as_token().unwrap().text, "\"hello (world)\"");
    }

    #[test]
    fn adjacent_string_and_word_split_cleanly() {
        let node = parse_one("(+ x\"y z\")");
        let list = node.as_list().unwrap();
        assert_eq!(&*list[1].as_token().unwrap().text, "x");
        assert_eq!(&*list[2].as_token().unwrap().text, "\"y z\"");
    }

    #[test]
    fn comments_run_to_end_of_line() {
        let forms = parse("(a b) # trailing (not a form\n(c)").unwrap();
        assert_eq!(forms.len(), 2);
    }

    #[test]
    fn unbalanced_open_is_syntax_error() {
        let err = parse("(class main").unwrap_err();
        assert_eq!(err.kind, ErrorKind::SyntaxError);
    }

    #[test]
    fn unbalanced_close_is_syntax_error() {
        let err = parse("(a))").unwrap_err();
        assert_eq!(err.kind, ErrorKind::SyntaxError);
        assert_eq!(err.line, Some(1));
    }

    #[test]
    fn bare_top_level_token_is_syntax_error() {
        let err = parse("class main").unwrap_err();
        assert_eq!(err.kind, ErrorKind::SyntaxError);
    }

    #[test]
    fn unterminated_string_is_syntax_error() {
        let err = parse("(print \"oops)").unwrap_err();
        assert_eq!(err.kind, ErrorKind::SyntaxError);
    }

    #[test]
    fn empty_source_parses_to_no_forms() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("# only a comment\n").unwrap().is_empty());
    }
}
