//! Calculator tools - addNumber and subtractNumber

use async_trait::async_trait;
use eyre::eyre;
use serde_json::{Number, json};

use super::{ParamType, ParameterSchema, Tool};
use crate::domain::{ExecutionResult, Parameters};

#[derive(Debug, Clone, Copy)]
enum Operation {
    Add,
    Subtract,
}

impl Operation {
    fn label(self) -> &'static str {
        match self {
            Self::Add => "addition",
            Self::Subtract => "subtraction",
        }
    }

    fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
        }
    }

    /// Integer arithmetic when both sides are integers and it fits, float otherwise
    fn apply(self, a: &Number, b: &Number) -> Option<Number> {
        if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
            let exact = match self {
                Self::Add => x.checked_add(y),
                Self::Subtract => x.checked_sub(y),
            };
            if let Some(v) = exact {
                return Some(Number::from(v));
            }
        }

        let (x, y) = (a.as_f64()?, b.as_f64()?);
        let v = match self {
            Self::Add => x + y,
            Self::Subtract => x - y,
        };
        Number::from_f64(v)
    }
}

fn operand<'a>(params: &'a Parameters, name: &str) -> Result<&'a Number, eyre::Error> {
    params
        .get(name)
        .and_then(|v| v.as_number())
        .ok_or_else(|| eyre!("{} is required and must be a number", name))
}

fn calculate(op: Operation, params: &Parameters) -> Result<ExecutionResult, eyre::Error> {
    let a = operand(params, "a")?;
    let b = operand(params, "b")?;
    let result = op
        .apply(a, b)
        .ok_or_else(|| eyre!("{} of {} and {} is not a finite number", op.label(), a, b))?;

    let message = match op {
        Operation::Add => format!("Added {} and {} to get {}", a, b, result),
        Operation::Subtract => format!("Subtracted {} from {} to get {}", b, a, result),
    };

    Ok(ExecutionResult::success(
        json!({
            "operation": op.label(),
            "a": a,
            "b": b,
            "result": result,
            "formula": format!("{} {} {} = {}", a, op.symbol(), b, result),
        }),
        message,
    ))
}

pub struct AddNumberTool;

#[async_trait]
impl Tool for AddNumberTool {
    fn name(&self) -> &'static str {
        "addNumber"
    }

    fn description(&self) -> &'static str {
        "Add two numbers together"
    }

    fn parameters(&self) -> ParameterSchema {
        ParameterSchema::object()
            .required_property("a", ParamType::Number, "First number to add")
            .required_property("b", ParamType::Number, "Second number to add")
    }

    async fn execute(&self, params: &Parameters) -> Result<ExecutionResult, eyre::Error> {
        calculate(Operation::Add, params)
    }
}

pub struct SubtractNumberTool;

#[async_trait]
impl Tool for SubtractNumberTool {
    fn name(&self) -> &'static str {
        "subtractNumber"
    }

    fn description(&self) -> &'static str {
        "Subtract the second number from the first"
    }

    fn parameters(&self) -> ParameterSchema {
        ParameterSchema::object()
            .required_property("a", ParamType::Number, "Number to subtract from")
            .required_property("b", ParamType::Number, "Number to subtract")
    }

    async fn execute(&self, params: &Parameters) -> Result<ExecutionResult, eyre::Error> {
        calculate(Operation::Subtract, params)
    }
}
