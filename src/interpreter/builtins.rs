//! Built-in functions
//!
//! Builtins are resolved by name when an atom has no binding in scope, so a
//! program may shadow any of them with `define` or `let`. Arguments arrive
//! already evaluated, left to right.
//!
//! | Name | Arity | Result |
//! |------|-------|--------|
//! | `add`, `mul` | any | sum / product of numbers |
//! | `sub` | 1+ | negation or left-to-right difference |
//! | `div`, `mod` | 2 | quotient / remainder, errors on zero divisor |
//! | `eq` | 2 | structural equality |
//! | `lt`, `gt`, `le`, `ge` | 2 | numeric comparison |
//! | `not` | 1 | logical negation by truthiness |
//! | `print` | any | writes a line to the output log, returns `null` |
//! | `concat` | any | string of the printed arguments |
//! | `list`, `len`, `first`, `rest` | | list construction and access |
//! | `cell`, `get`, `put`, `free` | | heap cells |
//! | `isnull` | 1 | whether the argument is `null` |

use crate::interpreter::errors::RuntimeError;
use crate::memory::heap::{Heap, HeapObject};
use crate::memory::value::{Address, Value};
use crate::snapshot::OutputLog;
use std::fmt;

/// Accepted argument counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
    Not,
    Print,
    Concat,
    List,
    Len,
    First,
    Rest,
    Cell,
    Get,
    Put,
    Free,
    IsNull,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        let builtin = match name {
            "add" => Builtin::Add,
            "sub" => Builtin::Sub,
            "mul" => Builtin::Mul,
            "div" => Builtin::Div,
            "mod" => Builtin::Mod,
            "eq" => Builtin::Eq,
            "lt" => Builtin::Lt,
            "gt" => Builtin::Gt,
            "le" => Builtin::Le,
            "ge" => Builtin::Ge,
            "not" => Builtin::Not,
            "print" => Builtin::Print,
            "concat" => Builtin::Concat,
            "list" => Builtin::List,
            "len" => Builtin::Len,
            "first" => Builtin::First,
            "rest" => Builtin::Rest,
            "cell" => Builtin::Cell,
            "get" => Builtin::Get,
            "put" => Builtin::Put,
            "free" => Builtin::Free,
            "isnull" => Builtin::IsNull,
            _ => return None,
        };
        Some(builtin)
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Add => "add",
            Builtin::Sub => "sub",
            Builtin::Mul => "mul",
            Builtin::Div => "div",
            Builtin::Mod => "mod",
            Builtin::Eq => "eq",
            Builtin::Lt => "lt",
            Builtin::Gt => "gt",
            Builtin::Le => "le",
            Builtin::Ge => "ge",
            Builtin::Not => "not",
            Builtin::Print => "print",
            Builtin::Concat => "concat",
            Builtin::List => "list",
            Builtin::Len => "len",
            Builtin::First => "first",
            Builtin::Rest => "rest",
            Builtin::Cell => "cell",
            Builtin::Get => "get",
            Builtin::Put => "put",
            Builtin::Free => "free",
            Builtin::IsNull => "isnull",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            Builtin::Add | Builtin::Mul | Builtin::Print | Builtin::Concat | Builtin::List => {
                Arity::AtLeast(0)
            }
            Builtin::Sub => Arity::AtLeast(1),
            Builtin::Div
            | Builtin::Mod
            | Builtin::Eq
            | Builtin::Lt
            | Builtin::Gt
            | Builtin::Le
            | Builtin::Ge
            | Builtin::Put => Arity::Exact(2),
            Builtin::Not
            | Builtin::Len
            | Builtin::First
            | Builtin::Rest
            | Builtin::Cell
            | Builtin::Get
            | Builtin::Free
            | Builtin::IsNull => Arity::Exact(1),
        }
    }
}

/// Mutable runtime state a builtin may touch
pub struct BuiltinEnv<'a> {
    pub heap: &'a mut Heap,
    pub output: &'a mut OutputLog,
}

fn expect_number(builtin: Builtin, value: &Value) -> Result<f64, RuntimeError> {
    value.as_number().ok_or_else(|| RuntimeError::TypeError {
        function: builtin.name().to_string(),
        expected: "number",
        got: value.type_name(),
    })
}

fn expect_ref(builtin: Builtin, value: &Value) -> Result<Address, RuntimeError> {
    value.as_ref_address().ok_or_else(|| RuntimeError::TypeError {
        function: builtin.name().to_string(),
        expected: "ref",
        got: value.type_name(),
    })
}

fn expect_list(builtin: Builtin, value: Value) -> Result<Vec<Value>, RuntimeError> {
    match value {
        Value::List(items) => Ok(items),
        other => Err(RuntimeError::TypeError {
            function: builtin.name().to_string(),
            expected: "list",
            got: other.type_name(),
        }),
    }
}

fn numbers(builtin: Builtin, args: &[Value]) -> Result<Vec<f64>, RuntimeError> {
    args.iter().map(|arg| expect_number(builtin, arg)).collect()
}

fn compare(builtin: Builtin, args: &[Value], op: fn(f64, f64) -> bool) -> Result<Value, RuntimeError> {
    let nums = numbers(builtin, args)?;
    Ok(Value::Bool(op(nums[0], nums[1])))
}

/// Apply `builtin` to already-evaluated arguments
pub fn call_builtin(
    builtin: Builtin,
    args: Vec<Value>,
    env: BuiltinEnv<'_>,
) -> Result<Value, RuntimeError> {
    if !builtin.arity().accepts(args.len()) {
        return Err(RuntimeError::ArityMismatch {
            function: builtin.name().to_string(),
            expected: builtin.arity(),
            got: args.len(),
        });
    }

    match builtin {
        Builtin::Add => Ok(Value::Number(numbers(builtin, &args)?.iter().sum())),
        Builtin::Mul => Ok(Value::Number(numbers(builtin, &args)?.iter().product())),
        Builtin::Sub => {
            let nums = numbers(builtin, &args)?;
            let result = match nums.split_first() {
                Some((first, [])) => -first,
                Some((first, rest)) => rest.iter().fold(*first, |acc, n| acc - n),
                None => 0.0,
            };
            Ok(Value::Number(result))
        }
        Builtin::Div | Builtin::Mod => {
            let nums = numbers(builtin, &args)?;
            if nums[1] == 0.0 {
                return Err(RuntimeError::DivisionByZero {
                    operation: builtin.name(),
                });
            }
            let result = if builtin == Builtin::Div {
                nums[0] / nums[1]
            } else {
                nums[0] % nums[1]
            };
            Ok(Value::Number(result))
        }
        Builtin::Eq => Ok(Value::Bool(args[0] == args[1])),
        Builtin::Lt => compare(builtin, &args, |a, b| a < b),
        Builtin::Gt => compare(builtin, &args, |a, b| a > b),
        Builtin::Le => compare(builtin, &args, |a, b| a <= b),
        Builtin::Ge => compare(builtin, &args, |a, b| a >= b),
        Builtin::Not => Ok(Value::Bool(!args[0].is_truthy())),
        Builtin::Print => {
            let parts: Vec<String> = args.iter().map(Value::to_string).collect();
            env.output.print_line(parts.join(" "));
            Ok(Value::Null)
        }
        Builtin::Concat => Ok(Value::Str(args.iter().map(Value::to_string).collect())),
        Builtin::List => Ok(Value::List(args)),
        Builtin::Len => match &args[0] {
            Value::List(items) => Ok(Value::Number(items.len() as f64)),
            Value::Str(s) => Ok(Value::Number(s.chars().count() as f64)),
            other => Err(RuntimeError::TypeError {
                function: builtin.name().to_string(),
                expected: "list or string",
                got: other.type_name(),
            }),
        },
        Builtin::First => {
            let items = expect_list(builtin, args.into_iter().next().unwrap_or_default())?;
            Ok(items.into_iter().next().unwrap_or_default())
        }
        Builtin::Rest => {
            let items = expect_list(builtin, args.into_iter().next().unwrap_or_default())?;
            Ok(Value::List(items.into_iter().skip(1).collect()))
        }
        Builtin::Cell => {
            let value = args.into_iter().next().unwrap_or_default();
            let addr = env.heap.allocate(HeapObject::Cell(value))?;
            Ok(Value::Ref(addr))
        }
        Builtin::Get => {
            let addr = expect_ref(builtin, &args[0])?;
            Ok(env.heap.read(addr)?.clone())
        }
        Builtin::Put => {
            let addr = expect_ref(builtin, &args[0])?;
            env.heap.write(addr, args[1].clone())?;
            Ok(args[1].clone())
        }
        Builtin::Free => {
            let addr = expect_ref(builtin, &args[0])?;
            env.heap.free(addr)?;
            Ok(Value::Null)
        }
        Builtin::IsNull => Ok(Value::Bool(args[0].is_null())),
    }
}
