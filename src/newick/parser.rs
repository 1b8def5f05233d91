//! Stack-based parser for Newick strings.
//!
//! The parser keeps the currently open internal vertices on a stack:
//! `(` opens a vertex (child of the stack top), `)` closes the top one,
//! `,` separates siblings. A label right after `)` names the closed
//! internal vertex; any other label creates a new tip below the stack top.
//! A `:` always assigns a branch length to the element completed last.

use crate::model::{BranchLength, Tree, VertexIndex};
use crate::newick::defs::NEWICK_LABEL_DELIMITERS;
use crate::parser::byte_parser::ByteParser;
use crate::parser::parsing_error::ParsingError;

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================#=
/// Parser state for a single Newick tree.
///
/// # Example
/// ```
/// use treefish::newick::NewickParser;
/// use treefish::parser::ByteParser;
///
/// let mut byte_parser = ByteParser::for_str("((Atha@1:0.1,Osat@2:0.2)90:0.3,Ppat@3:0.4);");
/// let tree = NewickParser::new().parse(&mut byte_parser).unwrap();
/// assert_eq!(tree.num_leaves(), 3);
/// ```
pub struct NewickParser {
    tree: Tree,
    /// Internal vertices whose `)` has not been seen yet
    open: Vec<VertexIndex>,
    /// Element completed last (tip or closed internal vertex)
    last: Option<VertexIndex>,
    /// Whether the previous token was `)`
    after_close: bool,
}

impl Default for NewickParser {
    fn default() -> Self {
        Self::new()
    }
}

impl NewickParser {
    /// Creates a parser for one tree.
    pub fn new() -> Self {
        Self {
            tree: Tree::new(),
            open: Vec::new(),
            last: None,
            after_close: false,
        }
    }

    /// Parses a single Newick tree terminated by `;` from the given [ByteParser].
    ///
    /// # Returns
    /// * `Ok(Tree)` - The parsed tree
    /// * `Err(ParsingError)` - Unbalanced parentheses, invalid branch length,
    ///   unclosed comment/quote, missing `;` or otherwise malformed input
    pub fn parse(mut self, parser: &mut ByteParser) -> Result<Tree, ParsingError> {
        loop {
            parser.skip_comment_and_whitespace()?;
            let Some(byte) = parser.peek() else {
                return Err(if self.open.is_empty() {
                    ParsingError::unexpected_eof(parser)
                } else {
                    ParsingError::unbalanced_parentheses(parser)
                });
            };

            match byte {
                b'(' => self.open_internal(parser)?,
                b')' => self.close_internal(parser)?,
                b',' => self.separate(parser)?,
                b':' => self.parse_branch_length(parser)?,
                b';' => {
                    parser.next_byte();
                    return self.finish(parser);
                }
                _ => self.parse_label(parser)?,
            }
        }
    }

    /// `(`: new internal vertex below the stack top (or as root).
    fn open_internal(&mut self, parser: &mut ByteParser) -> Result<(), ParsingError> {
        if self.last.is_some() {
            return Err(ParsingError::invalid_newick_string(
                parser,
                "Expected ',' or ')' before '('".to_string(),
            ));
        }
        let index = self.tree.add_vertex(None, None);
        self.attach(parser, index)?;
        parser.next_byte();

        self.open.push(index);
        self.after_close = false;
        Ok(())
    }

    /// `)`: close the stack top, which becomes the last completed element.
    fn close_internal(&mut self, parser: &mut ByteParser) -> Result<(), ParsingError> {
        let Some(index) = self.open.pop() else {
            return Err(ParsingError::unbalanced_parentheses(parser));
        };
        if self.tree[index].is_tip() {
            return Err(ParsingError::invalid_newick_string(
                parser,
                "Empty clade '()'".to_string(),
            ));
        }
        if self.last.is_none() {
            return Err(ParsingError::invalid_newick_string(
                parser,
                "Missing element before ')'".to_string(),
            ));
        }
        parser.next_byte();

        self.last = Some(index);
        self.after_close = true;
        Ok(())
    }

    /// `,`: next sibling follows.
    fn separate(&mut self, parser: &mut ByteParser) -> Result<(), ParsingError> {
        if self.open.is_empty() {
            return Err(ParsingError::invalid_newick_string(
                parser,
                "',' outside of parentheses".to_string(),
            ));
        }
        if self.last.is_none() {
            return Err(ParsingError::invalid_newick_string(
                parser,
                "Missing element before ','".to_string(),
            ));
        }
        parser.next_byte();

        self.last = None;
        self.after_close = false;
        Ok(())
    }

    /// `:number` for the last completed element.
    /// Supports scientific notation (e.g., `1.5e-10`).
    fn parse_branch_length(&mut self, parser: &mut ByteParser) -> Result<(), ParsingError> {
        let Some(index) = self.last else {
            return Err(ParsingError::invalid_newick_string(
                parser,
                "Branch length without vertex".to_string(),
            ));
        };
        parser.next_byte(); // consume ':'
        parser.skip_comment_and_whitespace()?;

        let literal = parser.parse_number_literal();
        let branch_length = literal
            .parse::<f64>()
            .ok()
            .and_then(BranchLength::try_new)
            .ok_or_else(|| ParsingError::invalid_branch_length(parser, literal))?;

        self.tree[index].set_branch_length(Some(branch_length));
        self.after_close = false;
        Ok(())
    }

    /// Label of the just closed internal vertex, or a new tip.
    fn parse_label(&mut self, parser: &mut ByteParser) -> Result<(), ParsingError> {
        let start = parser.position();
        let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        if parser.position() == start {
            let found = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Unexpected character {:?}", found),
            ));
        }

        match self.last {
            Some(index) if self.after_close => {
                self.tree[index].set_label(Some(label));
                self.after_close = false;
            }
            Some(_) => {
                return Err(ParsingError::invalid_newick_string(
                    parser,
                    format!("Expected ',' or ')' before label {:?}", label),
                ));
            }
            None => {
                let index = self.tree.add_vertex(Some(label), None);
                self.attach(parser, index)?;
                self.last = Some(index);
            }
        }

        Ok(())
    }

    /// Makes `index` a child of the stack top, or the root if nothing is open.
    fn attach(&mut self, parser: &ByteParser, index: VertexIndex) -> Result<(), ParsingError> {
        match self.open.last() {
            Some(&parent) => self.tree.attach_child(parent, index),
            None if self.tree.is_root_set() => {
                return Err(ParsingError::invalid_newick_string(
                    parser,
                    "Expected ';' after end of tree".to_string(),
                ));
            }
            None => self.tree.set_root(index),
        }
        Ok(())
    }

    /// `;`: all parentheses must be closed and a root must exist.
    fn finish(self, parser: &ByteParser) -> Result<Tree, ParsingError> {
        if !self.open.is_empty() {
            return Err(ParsingError::unbalanced_parentheses(parser));
        }
        if !self.tree.is_root_set() {
            return Err(ParsingError::invalid_newick_string(
                parser,
                "Empty tree".to_string(),
            ));
        }
        Ok(self.tree)
    }
}
