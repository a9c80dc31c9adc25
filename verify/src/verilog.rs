use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use yap::{IntoTokens, Tokens};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Expr {
    Const(bool),
    Signal(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Xor(Box<Expr>, Box<Expr>),
}

/// A single-bit, purely combinational Verilog module made of continuous assignments.
#[derive(Clone, Debug, Default)]
pub(crate) struct Module {
    pub name: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub assigns: IndexMap<String, Expr>,
}

struct Parser<T> {
    tokens: T,
}

fn is_identifier(c: &char) -> bool {
    c.is_ascii_alphanumeric() || *c == '_' || *c == '$'
}

impl<T: Tokens<Item = char>> Parser<T> {
    fn blank(&mut self) {
        loop {
            self.tokens.skip_while(|c| c.is_whitespace());
            if self.tokens.tokens("//".chars()) {
                self.tokens.skip_while(|&c| c != '\n');
            } else if self.tokens.tokens("/*".chars()) {
                while !self.tokens.tokens("*/".chars()) {
                    if self.tokens.next().is_none() {
                        return;
                    }
                }
            } else {
                return;
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), String> {
        self.blank();
        if self.tokens.token(expected) {
            Ok(())
        } else {
            Err(format!("expected {expected:?}, found {:?}", self.tokens.peek()))
        }
    }

    fn identifier(&mut self) -> Result<String, String> {
        self.blank();
        if self.tokens.peek().is_some_and(|c| c.is_ascii_digit()) {
            return Err(format!("expected an identifier, found {:?}", self.tokens.peek()));
        }
        let name: String = self.tokens.take_while(is_identifier).collect();
        if name.is_empty() {
            return Err(format!("expected an identifier, found {:?}", self.tokens.peek()));
        }
        Ok(name)
    }

    fn names(&mut self, terminator: char) -> Result<Vec<String>, String> {
        let mut names = Vec::new();
        self.blank();
        if self.tokens.token(terminator) {
            return Ok(names);
        }
        loop {
            names.push(self.identifier()?);
            self.blank();
            if self.tokens.token(',') {
                continue;
            }
            self.expect(terminator)?;
            return Ok(names);
        }
    }

    fn literal(&mut self) -> Result<Expr, String> {
        let digits: String = self.tokens.take_while(|c| c.is_ascii_digit()).collect();
        let bits = if self.tokens.token('\'') {
            if !(self.tokens.token('b') || self.tokens.token('B')) {
                return Err(format!("only binary literals are supported, found {digits}'{:?}", self.tokens.peek()));
            }
            self.tokens.take_while(|c| *c == '0' || *c == '1').collect::<String>()
        } else {
            digits
        };
        match bits.trim_start_matches('0') {
            "" => Ok(Expr::Const(false)),
            "1" => Ok(Expr::Const(true)),
            _ => Err(format!("literal {bits} is wider than one bit")),
        }
    }

    fn primary(&mut self) -> Result<Expr, String> {
        self.blank();
        if self.tokens.token('(') {
            let expr = self.or()?;
            self.expect(')')?;
            Ok(expr)
        } else if self.tokens.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.literal()
        } else {
            Ok(Expr::Signal(self.identifier()?))
        }
    }

    fn unary(&mut self) -> Result<Expr, String> {
        self.blank();
        if self.tokens.token('~') || self.tokens.token('!') {
            Ok(Expr::Not(Box::new(self.unary()?)))
        } else {
            self.primary()
        }
    }

    fn and(&mut self) -> Result<Expr, String> {
        let mut expr = self.unary()?;
        loop {
            self.blank();
            if !self.tokens.token('&') {
                return Ok(expr);
            }
            expr = Expr::And(Box::new(expr), Box::new(self.unary()?));
        }
    }

    fn xor(&mut self) -> Result<Expr, String> {
        let mut expr = self.and()?;
        loop {
            self.blank();
            if !self.tokens.token('^') {
                return Ok(expr);
            }
            expr = Expr::Xor(Box::new(expr), Box::new(self.and()?));
        }
    }

    fn or(&mut self) -> Result<Expr, String> {
        let mut expr = self.xor()?;
        loop {
            self.blank();
            if !self.tokens.token('|') {
                return Ok(expr);
            }
            expr = Expr::Or(Box::new(expr), Box::new(self.xor()?));
        }
    }

    fn module(&mut self) -> Result<Module, String> {
        let mut module = Module::default();
        loop {
            self.blank();
            if self.tokens.peek().is_none() {
                return Err("missing endmodule".into());
            }
            let keyword = self.identifier()?;
            match keyword.as_str() {
                "module" => {
                    module.name = self.identifier()?;
                    self.expect('(')?;
                    self.names(')')?;
                    self.expect(';')?;
                }
                "input" => module.inputs.extend(self.names(';')?),
                "output" => module.outputs.extend(self.names(';')?),
                "wire" => {
                    self.names(';')?;
                }
                "assign" => {
                    let target = self.identifier()?;
                    self.expect('=')?;
                    let expr = self.or()?;
                    self.expect(';')?;
                    if module.assigns.insert(target.clone(), expr).is_some() {
                        return Err(format!("{target:?} is assigned more than once"));
                    }
                }
                "endmodule" => return Ok(module),
                _ => return Err(format!("unsupported statement {keyword:?}")),
            }
        }
    }
}

pub(crate) fn parse_module(text: &str) -> Result<Module, String> {
    Parser { tokens: text.into_tokens() }.module()
}

/// Computes signal values of a module for one input pattern.
pub(crate) struct Evaluator<'a> {
    module: &'a Module,
    values: HashMap<&'a str, bool>,
    active: HashSet<&'a str>,
}

impl<'a> Evaluator<'a> {
    pub fn new(module: &'a Module, inputs: HashMap<&'a str, bool>) -> Self {
        Evaluator { module, values: inputs, active: HashSet::new() }
    }

    pub fn signal(&mut self, name: &'a str) -> Result<bool, String> {
        if let Some(&value) = self.values.get(name) {
            return Ok(value);
        }
        let Some(expr) = self.module.assigns.get(name) else {
            return Err(format!("{name:?} is never driven"));
        };
        if !self.active.insert(name) {
            return Err(format!("combinational loop through {name:?}"));
        }
        let value = self.expr(expr)?;
        self.active.remove(name);
        self.values.insert(name, value);
        Ok(value)
    }

    fn expr(&mut self, expr: &'a Expr) -> Result<bool, String> {
        Ok(match expr {
            Expr::Const(value) => *value,
            Expr::Signal(name) => self.signal(name)?,
            Expr::Not(inner) => !self.expr(inner)?,
            Expr::And(lhs, rhs) => self.expr(lhs)? & self.expr(rhs)?,
            Expr::Or(lhs, rhs) => self.expr(lhs)? | self.expr(rhs)?,
            Expr::Xor(lhs, rhs) => self.expr(lhs)? ^ self.expr(rhs)?,
        })
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::{Evaluator, Expr, parse_module};

    fn signal(name: &str) -> Box<Expr> {
        Box::new(Expr::Signal(name.into()))
    }

    #[test]
    fn test_parse() {
        let module = parse_module(concat!(
            "// Generated by Arche for top for crossbar 2x3\n",
            "module top(a, b, y);\n",
            "input a, b;\n",
            "output y;\n",
            "wire tempW1;\n",
            "assign tempW1 = ~(a | b); // g1\n",
            "assign y = ~tempW1 & 1'b1;\n",
            "endmodule\n",
        ))
        .unwrap();
        assert_eq!(module.name, "top");
        assert_eq!(module.inputs, vec!["a", "b"]);
        assert_eq!(module.outputs, vec!["y"]);
        assert_eq!(module.assigns["tempW1"], Expr::Not(Box::new(Expr::Or(signal("a"), signal("b")))));
        assert_eq!(
            module.assigns["y"],
            Expr::And(Box::new(Expr::Not(signal("tempW1"))), Box::new(Expr::Const(true)))
        );
    }

    #[test]
    fn test_precedence() {
        let module = parse_module("module m(a, b, c, y); assign y = a | b ^ c & 0; endmodule").unwrap();
        assert_eq!(
            module.assigns["y"],
            Expr::Or(
                signal("a"),
                Box::new(Expr::Xor(signal("b"), Box::new(Expr::And(signal("c"), Box::new(Expr::Const(false)))))),
            )
        );
    }

    #[test]
    fn test_errors() {
        assert!(parse_module("module m(a); input a;").is_err());
        assert!(parse_module("module m(y); always @(*) y = 1; endmodule").is_err());
        assert!(parse_module("module m(y); assign y = 4'b1010; endmodule").is_err());
        assert!(parse_module("module m(y); assign y = 1; assign y = 0; endmodule").is_err());
    }

    #[test]
    fn test_evaluate() {
        let module = parse_module(concat!(
            "module m(a, b, y, z);\n",
            "assign t = ~(a | b);\n",
            "assign y = ~t;\n",
            "assign z = q;\n",
            "assign q = ~q;\n",
            "endmodule\n",
        ))
        .unwrap();
        let mut evaluator = Evaluator::new(&module, HashMap::from([("a", false), ("b", true)]));
        assert_eq!(evaluator.signal("y"), Ok(true));
        assert_eq!(evaluator.signal("t"), Ok(false));
        assert!(evaluator.signal("z").is_err());
        assert!(evaluator.signal("nope").is_err());
    }
}
