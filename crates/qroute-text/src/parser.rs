//! Parsers for routing instances and solution streams.
//!
//! Both formats are one-based on the wire; everything returned here is
//! zero-based.

use qroute_ir::{Gate, GateId, Instance, LogicalQubit, Operation, PhysicalQubit, Solution};

use crate::error::{ParseError, ParseResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Parse an instance and check it is structurally valid.
pub fn parse_instance(source: &str) -> ParseResult<Instance> {
    let mut parser = Parser::new(source)?;
    let instance = parser.parse_instance()?;
    parser.expect_end()?;
    instance.validate()?;
    Ok(instance)
}

/// Parse a solution stream for an instance with `num_logical` logical qubits.
///
/// The initial mapping must name every logical qubit exactly once, in any
/// order. Physical images and operation operands are not range-checked here;
/// replay reports those against the instance.
pub fn parse_solution(source: &str, num_logical: u32) -> ParseResult<Solution> {
    let mut parser = Parser::new(source)?;
    parser.parse_solution(num_logical)
}

/// Parser state.
struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    last_line: usize,
}

impl Parser {
    /// Create a new parser from source.
    fn new(source: &str) -> ParseResult<Self> {
        let mut tokens = Vec::new();
        for result in tokenize(source) {
            match result {
                Ok(t) => tokens.push(t),
                Err((line, message)) => return Err(ParseError::LexerError { line, message }),
            }
        }
        Ok(Self {
            tokens,
            pos: 0,
            last_line: 1,
        })
    }

    /// Check if we've reached the end.
    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Line of the current token, or of the last one at end of input.
    fn line(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.last_line, |t| t.line)
    }

    /// Advance and return the current token.
    fn advance(&mut self) -> Option<Token> {
        let spanned = self.tokens.get(self.pos)?;
        self.last_line = spanned.line;
        self.pos += 1;
        Some(spanned.token.clone())
    }

    /// Expect an integer.
    fn integer(&mut self, what: &str) -> ParseResult<u64> {
        let line = self.line();
        match self.advance() {
            Some(Token::Integer(n)) => Ok(n),
            Some(other) => Err(ParseError::UnexpectedToken {
                line,
                expected: what.to_string(),
                found: other.to_string(),
            }),
            None => Err(ParseError::UnexpectedEof(format!("expected {what}"))),
        }
    }

    /// Expect a one-based identifier and return it zero-based.
    fn index(&mut self, what: &str) -> ParseResult<u32> {
        let line = self.line();
        let value = self.integer(what)?;
        to_zero_based(value, line)
    }

    /// Expect a count.
    fn count(&mut self, what: &str) -> ParseResult<u32> {
        let line = self.line();
        let value = self.integer(what)?;
        u32::try_from(value).map_err(|_| ParseError::IndexOverflow { line, value })
    }

    /// Expect a `q<n>` operand and return it zero-based.
    fn qubit_ref(&mut self) -> ParseResult<LogicalQubit> {
        let line = self.line();
        match self.advance() {
            Some(Token::QubitRef(n)) => Ok(LogicalQubit(to_zero_based(n, line)?)),
            Some(other) => Err(ParseError::UnexpectedToken {
                line,
                expected: "qubit operand 'q<n>'".into(),
                found: other.to_string(),
            }),
            None => Err(ParseError::UnexpectedEof("expected qubit operand".into())),
        }
    }

    /// Fail if any token remains.
    fn expect_end(&mut self) -> ParseResult<()> {
        let line = self.line();
        match self.advance() {
            Some(token) => Err(ParseError::TrailingInput {
                line,
                found: token.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn parse_instance(&mut self) -> ParseResult<Instance> {
        let num_logical = self.count("logical qubit count")?;
        let num_gates = self.count("gate count")?;
        let num_dependencies = self.count("dependency count")?;
        let num_physical = self.count("physical qubit count")?;
        let num_links = self.count("link count")?;

        let mut instance = Instance::with_sizes(num_logical, num_physical);

        // Record ids are positional; the leading id column is not trusted.
        for _ in 0..num_gates {
            let line = self.line();
            self.integer("gate id")?;
            let a = LogicalQubit(self.index("logical qubit")?);
            let b = LogicalQubit(self.index("logical qubit")?);
            let gate = Gate::new(a, b).map_err(|_| ParseError::UnexpectedToken {
                line,
                expected: "two distinct logical qubits".into(),
                found: format!("{a} {b}"),
            })?;
            instance.add_gate(gate);
        }

        for _ in 0..num_dependencies {
            self.integer("dependency id")?;
            let producer = GateId(self.index("producer gate id")?);
            let consumer = GateId(self.index("consumer gate id")?);
            instance.add_dependency(producer, consumer);
        }

        for _ in 0..num_links {
            self.integer("link id")?;
            let p = PhysicalQubit(self.index("physical qubit")?);
            let q = PhysicalQubit(self.index("physical qubit")?);
            instance.add_link(p, q);
        }

        Ok(instance)
    }

    fn parse_solution(&mut self, num_logical: u32) -> ParseResult<Solution> {
        let mut mapping: Vec<Option<PhysicalQubit>> = vec![None; num_logical as usize];

        for _ in 0..num_logical {
            let line = self.line();
            let logical = self.index("logical qubit id")?;
            let physical = self.index("physical qubit id")?;
            let slot = mapping
                .get_mut(logical as usize)
                .ok_or(ParseError::MappingOutOfRange {
                    line,
                    logical,
                    num_logical,
                })?;
            if slot.is_some() {
                return Err(ParseError::DuplicateMapping { line, logical });
            }
            *slot = Some(PhysicalQubit(physical));
        }

        // Each logical appeared once over num_logical lines, so all are set.
        let initial_mapping = mapping.into_iter().flatten().collect();

        let mut operations = Vec::new();
        while !self.is_eof() {
            let line = self.line();
            let op = match self.advance() {
                Some(Token::Cnot) => Operation::Cnot(self.qubit_ref()?, self.qubit_ref()?),
                Some(Token::Swap) => Operation::Swap(self.qubit_ref()?, self.qubit_ref()?),
                Some(Token::Word(tag)) => return Err(ParseError::UnknownOperation { line, tag }),
                Some(other) => {
                    return Err(ParseError::UnexpectedToken {
                        line,
                        expected: "'CNOT' or 'SWAP'".into(),
                        found: other.to_string(),
                    });
                }
                None => break,
            };
            operations.push(op);
        }

        Ok(Solution::new(initial_mapping, operations))
    }
}

fn to_zero_based(value: u64, line: usize) -> ParseResult<u32> {
    if value == 0 {
        return Err(ParseError::ZeroIndex { line });
    }
    u32::try_from(value - 1).map_err(|_| ParseError::IndexOverflow { line, value })
}
