use crate::ast::{BinaryOp, Expr, Program, Stmt, UnaryOp};
use crate::error::{PengError, Result, RunError, Span};
use crate::value::Value;
use std::collections::HashMap;
use std::io::Write;

/// Largest String, in bytes, that repetition may produce.
const MAX_REPEAT_BYTES: f64 = u32::MAX as f64;

/// Name-to-value bindings for one program run.
///
/// The language has no blocks or functions, so a run owns exactly one flat
/// scope. Assignment defines a name on first use and updates it in place
/// afterwards.
#[derive(Debug, Clone)]
pub struct Scope {
    name: String,
    values: HashMap<String, Value>,
}

impl Scope {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            values: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a copy; the stored binding cannot be reached through it.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }

    pub fn assign(&mut self, name: &str, value: Value) {
        match self.values.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.values.insert(name.to_string(), value);
            }
        }
    }
}

pub struct Evaluator<W: Write> {
    scope: Scope,
    output: W,
}

impl<W: Write> Evaluator<W> {
    pub fn new(output: W) -> Self {
        Self::with_scope(Scope::new("<main>"), output)
    }

    pub fn with_scope(scope: Scope, output: W) -> Self {
        Self { scope, output }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn evaluate_program(&mut self, program: &Program) -> std::result::Result<(), RunError> {
        for statement in &program.statements {
            self.execute_statement(statement)?;
        }
        Ok(())
    }

    pub fn execute_statement(&mut self, stmt: &Stmt) -> std::result::Result<(), RunError> {
        match stmt {
            Stmt::Print { values, .. } => {
                let mut line = Vec::with_capacity(values.len());
                for expr in values {
                    line.push(self.evaluate_expression(expr)?.to_string());
                }
                writeln!(self.output, "{}", line.join(" "))?;
                Ok(())
            }
            Stmt::Assign { name, value, .. } => {
                self.assign(name, value)?;
                Ok(())
            }
        }
    }

    /// Evaluate `value` and bind it to `name`, returning the bound value.
    pub fn assign(&mut self, name: &str, value: &Expr) -> Result<Value> {
        let value = self.evaluate_expression(value)?;
        self.scope.assign(name, value.clone());
        Ok(value)
    }

    pub fn evaluate_expression(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Number { value, .. } => Ok(Value::Number(*value)),
            Expr::Str { value, .. } => Ok(Value::Str(value.clone())),
            Expr::Variable { name, span } => self.scope.get(name).ok_or_else(|| {
                PengError::undefined_identifier(span.clone(), name, self.scope.name())
            }),
            Expr::Binary {
                left,
                operator,
                right,
                span,
            } => {
                let left_val = self.evaluate_expression(left)?;
                let right_val = self.evaluate_expression(right)?;
                evaluate_binary_op(*operator, left_val, right_val, span)
            }
            Expr::Unary {
                operator,
                operand,
                span,
            } => {
                let operand_val = self.evaluate_expression(operand)?;
                evaluate_unary_op(*operator, operand_val, span)
            }
        }
    }
}

fn evaluate_binary_op(operator: BinaryOp, left: Value, right: Value, span: &Span) -> Result<Value> {
    match operator {
        BinaryOp::Add => match (left, right) {
            (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
            (Value::Str(l), Value::Str(r)) => Ok(Value::Str(l + &r)),
            (Value::Str(_), r) => Err(PengError::invalid_operation(
                span.clone(),
                format!("Can't concatenate String with {}", r.type_name()),
            )),
            (l, r) => Err(PengError::invalid_operation(
                span.clone(),
                format!("Can't add {} and {}", l.type_name(), r.type_name()),
            )),
        },
        BinaryOp::Subtract => match (left, right) {
            (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l - r)),
            (Value::Str(_), _) => Err(PengError::invalid_operation(
                span.clone(),
                "'-' is not supported for type String".to_string(),
            )),
            (l, r) => Err(PengError::invalid_operation(
                span.clone(),
                format!("Can't subtract {} from {}", r.type_name(), l.type_name()),
            )),
        },
        BinaryOp::Multiply => match (left, right) {
            (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l * r)),
            (Value::Str(s), Value::Number(n)) | (Value::Number(n), Value::Str(s)) => {
                repeat(&s, n, span)
            }
            (l, r) => Err(PengError::invalid_operation(
                span.clone(),
                format!("Can't multiply {} with {}", l.type_name(), r.type_name()),
            )),
        },
        BinaryOp::Divide => match (left, right) {
            (Value::Number(_), Value::Number(r)) if r == 0.0 => {
                Err(PengError::division_by_zero(span.clone()))
            }
            (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l / r)),
            (Value::Str(_), _) => Err(PengError::invalid_operation(
                span.clone(),
                "'/' is not supported for type String".to_string(),
            )),
            (l, r) => Err(PengError::invalid_operation(
                span.clone(),
                format!("Can't divide {} by {}", l.type_name(), r.type_name()),
            )),
        },
    }
}

fn evaluate_unary_op(operator: UnaryOp, operand: Value, span: &Span) -> Result<Value> {
    match (operator, operand) {
        (UnaryOp::Plus, Value::Number(n)) => Ok(Value::Number(n)),
        (UnaryOp::Negate, Value::Number(n)) => Ok(Value::Number(-n)),
        (operator, operand) => {
            let symbol = match operator {
                UnaryOp::Plus => '+',
                UnaryOp::Negate => '-',
            };
            Err(PengError::invalid_operation(
                span.clone(),
                format!("Unary '{}' is not supported for type {}", symbol, operand.type_name()),
            ))
        }
    }
}

/// `text` repeated `count` times. Negative counts give the empty string.
fn repeat(text: &str, count: f64, span: &Span) -> Result<Value> {
    if count.fract() != 0.0 || !count.is_finite() {
        return Err(PengError::invalid_operation(
            span.clone(),
            format!("Can't repeat a String {} times", count),
        ));
    }
    if count <= 0.0 || text.is_empty() {
        return Ok(Value::Str(String::new()));
    }
    if text.len() as f64 * count > MAX_REPEAT_BYTES {
        return Err(PengError::invalid_operation(
            span.clone(),
            "Repeated String is too large".to_string(),
        ));
    }
    Ok(Value::Str(text.repeat(count as usize)))
}
