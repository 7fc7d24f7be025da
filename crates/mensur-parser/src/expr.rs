//! Arithmetic expressions in bore descriptions.
//!
//! Geometry fields and junction ratios accept `+ - * /`, parentheses,
//! unary minus and previously assigned names. `OPEN`, `CLOSE` and
//! `HALF` are predefined for hole and valve ratios.

use std::collections::HashMap;

/// Variable scope of one description file.
#[derive(Debug, Clone)]
pub(crate) struct Vars {
    values: HashMap<String, f64>,
}

impl Vars {
    pub(crate) fn new() -> Self {
        let mut values = HashMap::new();
        values.insert("OPEN".to_string(), 1.0);
        values.insert("CLOSE".to_string(), 0.0);
        values.insert("HALF".to_string(), 0.5);
        Self { values }
    }

    pub(crate) fn assign(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }
}

#[derive(Debug, PartialEq)]
pub(crate) enum EvalError {
    Undefined(String),
    Malformed(String),
}

/// Evaluate one expression against the current scope.
pub(crate) fn eval(expr: &str, vars: &Vars) -> Result<f64, EvalError> {
    let mut cur = Cursor {
        bytes: expr.as_bytes(),
        pos: 0,
        vars,
    };
    let value = cur.sum()?;
    cur.skip_ws();
    if cur.pos != cur.bytes.len() {
        return Err(EvalError::Malformed(format!(
            "unexpected input after '{}'",
            &expr[..cur.pos]
        )));
    }
    Ok(value)
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    vars: &'a Vars,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn sum(&mut self) -> Result<f64, EvalError> {
        let mut acc = self.product()?;
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b'+') => {
                    self.pos += 1;
                    acc += self.product()?;
                }
                Some(b'-') => {
                    self.pos += 1;
                    acc -= self.product()?;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn product(&mut self) -> Result<f64, EvalError> {
        let mut acc = self.atom()?;
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b'*') => {
                    self.pos += 1;
                    acc *= self.atom()?;
                }
                Some(b'/') => {
                    self.pos += 1;
                    acc /= self.atom()?;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn atom(&mut self) -> Result<f64, EvalError> {
        self.skip_ws();
        match self.peek() {
            Some(b'-') => {
                self.pos += 1;
                Ok(-self.atom()?)
            }
            Some(b'(') => {
                self.pos += 1;
                let value = self.sum()?;
                self.skip_ws();
                if self.peek() != Some(b')') {
                    return Err(EvalError::Malformed("missing ')'".into()));
                }
                self.pos += 1;
                Ok(value)
            }
            Some(b) if b.is_ascii_digit() || b == b'.' => self.number(),
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => self.name(),
            _ => Err(EvalError::Malformed(
                "expected a number, name or '('".into(),
            )),
        }
    }

    fn number(&mut self) -> Result<f64, EvalError> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit() || b == b'.') {
            self.pos += 1;
        }
        // Optional exponent, e.g. 1.2e-3.
        if self.peek().is_some_and(|b| b == b'e' || b == b'E') {
            let mark = self.pos;
            self.pos += 1;
            if self.peek().is_some_and(|b| b == b'+' || b == b'-') {
                self.pos += 1;
            }
            if self.peek().is_some_and(|b| b.is_ascii_digit()) {
                while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                    self.pos += 1;
                }
            } else {
                // A trailing 'e' was a name after all.
                self.pos = mark;
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or_default();
        text.parse()
            .map_err(|_| EvalError::Malformed(format!("bad number '{text}'")))
    }

    fn name(&mut self) -> Result<f64, EvalError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            self.pos += 1;
        }
        let name = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or_default();
        self.vars
            .get(name)
            .ok_or_else(|| EvalError::Undefined(name.to_string()))
    }
}
