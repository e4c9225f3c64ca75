// Execution engine for the list interpreter

use crate::config::RuntimeConfig;
use crate::interpreter::builtins::{call_builtin, Arity, Builtin, BuiltinEnv};
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::forms::SpecialForm;
use crate::memory::context::{Context, ContextRef};
use crate::memory::heap::{Heap, HeapObject, Lambda};
use crate::memory::stack::{CallStack, ExecutionStack, StackItem};
use crate::memory::value::Value;
use crate::parser::ast::{Literal, List, Node, Span, Tree};
use crate::snapshot::{ContextView, OutputLog, Snapshot, SnapshotManager};
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Where a binding form writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BindMode {
    Define, // Root context
    Let,    // Current local context
    Set,    // Nearest existing binding
}

/// Pending work while evaluating one item.
///
/// Every frame carries the call-stack depth whose context it evaluates in.
#[derive(Debug, Clone)]
enum Frame {
    /// Evaluate a node and push its value
    Eval { node: Node, depth: usize },
    /// Evaluate the elements of a call site left to right, then apply
    Collect {
        site: Rc<List>,
        next: usize,
        values: Vec<Value>,
        depth: usize,
    },
    /// Pop a value and bind it
    Bind {
        name: String,
        mode: BindMode,
        depth: usize,
    },
    /// Pop the condition and continue with one branch
    Branch {
        then: Node,
        otherwise: Option<Node>,
        depth: usize,
    },
    /// Evaluate `body[next..]`, keeping only the last value
    Seq {
        body: Rc<[Node]>,
        next: usize,
        depth: usize,
    },
    /// Short-circuit `and` / `or` over `site[next..]`
    Logic {
        is_and: bool,
        site: Rc<List>,
        next: usize,
        depth: usize,
    },
    /// Function body finished: drop its call frame
    Leave,
}

impl Frame {
    fn eval(node: &Node, depth: usize) -> Self {
        Frame::Eval {
            node: node.clone(),
            depth,
        }
    }
}

/// The runtime driver: owns the global context, the work-list and history
pub struct Runtime {
    config: RuntimeConfig,

    /// Root context shared by every stack item
    global: ContextRef,

    /// Pending top-level and deferred items
    stack: ExecutionStack,

    /// Active scopes of the item being evaluated
    calls: CallStack,

    /// Continuation and value stacks of the item being evaluated
    frames: Vec<Frame>,
    values: Vec<Value>,

    heap: Heap,
    output: OutputLog,

    history: SnapshotManager,

    /// Current position in execution history (for stepping backward/forward)
    history_position: usize,

    /// Continuation steps taken so far
    steps: usize,

    /// Span of the top-level item being evaluated
    current_span: Option<Span>,

    /// Value of the most recently completed item
    last_value: Option<Value>,

    finished: bool,
}

impl Runtime {
    pub fn new(config: RuntimeConfig) -> Self {
        Runtime {
            global: Context::root().shared(),
            stack: ExecutionStack::new(),
            calls: CallStack::new(),
            frames: Vec::new(),
            values: Vec::new(),
            heap: Heap::new(config.heap_limit),
            output: OutputLog::new(),
            history: SnapshotManager::new(config.snapshot_limit),
            history_position: 0,
            steps: 0,
            current_span: None,
            last_value: None,
            finished: false,
            config,
        }
    }

    /// Run a program to completion.
    ///
    /// Every top-level list is queued as a [`StackItem`]; items are then
    /// taken first-in-first-out until none remain. The first runtime error
    /// stops execution and is returned; history recorded so far is kept.
    ///
    /// Each call starts a new run: items left over from an aborted run are
    /// dropped, and output, history and the step count start empty. Globals
    /// and the heap persist across runs on the same runtime.
    pub fn execute(&mut self, tree: impl Into<Tree>) -> Result<(), RuntimeError> {
        let program = match tree.into() {
            Tree::Program(program) => program,
            other => {
                return Err(RuntimeError::NotAProgram { found: other.tag() });
            }
        };

        self.reset_run();
        debug!(items = program.lists().len(), "seeding execution stack");
        self.stack
            .initiate(program.lists(), &program.spans, &self.global);

        let result = self.record("start".to_string()).and_then(|_| self.drain());
        if let Err(err) = &result {
            warn!(error = %err, steps = self.steps, "execution aborted");
            if self.config.record {
                let snapshot = self.snapshot(format!("error: {}", err));
                self.history.push_unchecked(snapshot);
            }
        }

        self.finished = true;
        result
    }

    fn reset_run(&mut self) {
        if !self.stack.is_empty() {
            debug!(dropped = self.stack.len(), "discarding items from previous run");
        }
        self.stack.clear();
        self.calls.clear();
        self.frames.clear();
        self.values.clear();
        self.output.clear();
        self.history.clear();
        self.history_position = 0;
        self.steps = 0;
        self.current_span = None;
        self.last_value = None;
        self.finished = false;
    }

    fn drain(&mut self) -> Result<(), RuntimeError> {
        while !self.stack.is_empty() {
            let Some(item) = self.stack.get_next() else {
                break;
            };
            let value = self.call(item)?;
            self.last_value = Some(value);
        }
        Ok(())
    }

    /// Evaluate one stack item in its own local context.
    ///
    /// The item must have been queued against this runtime's global context.
    pub fn call(&mut self, item: StackItem) -> Result<Value, RuntimeError> {
        if !Rc::ptr_eq(&item.root, &self.global) {
            return Err(RuntimeError::ForeignItem { label: item.local.label });
        }

        let StackItem {
            callee, local, span, ..
        } = item;
        let label = local.label.clone();
        debug!(item = %label, form = %callee, "evaluating item");

        self.current_span = span;
        self.frames.clear();
        self.values.clear();
        self.calls.clear();
        self.calls.push_frame(label.clone(), local);

        self.frames.push(Frame::Eval {
            node: Node::List(callee),
            depth: 0,
        });
        self.run_frames()?;

        let value = self.values.pop().unwrap_or_default();
        self.record(format!("{} done => {}", label, value.repr()))?;
        self.calls.clear();
        Ok(value)
    }

    /// Drive the continuation stack until it is empty
    fn run_frames(&mut self) -> Result<(), RuntimeError> {
        while let Some(frame) = self.frames.pop() {
            self.steps += 1;
            if self.steps > self.config.max_steps {
                return Err(RuntimeError::StepLimitExceeded {
                    limit: self.config.max_steps,
                });
            }
            trace!(step = self.steps, frame = ?frame, "step");
            self.step(frame)?;
        }
        Ok(())
    }

    fn step(&mut self, frame: Frame) -> Result<(), RuntimeError> {
        match frame {
            Frame::Eval { node, depth } => self.eval_node(node, depth),

            Frame::Collect {
                site,
                next,
                mut values,
                depth,
            } => {
                if next > 0 {
                    values.push(self.pop_value());
                }
                if let Some(node) = site.items().get(next).cloned() {
                    self.frames.push(Frame::Collect {
                        site,
                        next: next + 1,
                        values,
                        depth,
                    });
                    self.frames.push(Frame::Eval { node, depth });
                    return Ok(());
                }
                self.apply(&site, values)
            }

            Frame::Bind { name, mode, depth } => {
                let value = self.pop_value();
                self.bind(&name, value.clone(), mode, depth)?;
                self.values.push(value);
                Ok(())
            }

            Frame::Branch {
                then,
                otherwise,
                depth,
            } => {
                let condition = self.pop_value();
                match (condition.is_truthy(), otherwise) {
                    (true, _) => self.frames.push(Frame::Eval { node: then, depth }),
                    (false, Some(node)) => self.frames.push(Frame::Eval { node, depth }),
                    (false, None) => self.values.push(Value::Null),
                }
                Ok(())
            }

            Frame::Seq { body, next, depth } => {
                if next > 0 {
                    self.pop_value();
                }
                let node = body[next].clone();
                if next + 1 < body.len() {
                    self.frames.push(Frame::Seq {
                        body,
                        next: next + 1,
                        depth,
                    });
                }
                self.frames.push(Frame::Eval { node, depth });
                Ok(())
            }

            Frame::Logic {
                is_and,
                site,
                next,
                depth,
            } => {
                let value = self.pop_value();
                let decided = if is_and {
                    !value.is_truthy()
                } else {
                    value.is_truthy()
                };
                let rest = if decided {
                    None
                } else {
                    site.items().get(next).cloned()
                };
                match rest {
                    Some(node) => {
                        self.frames.push(Frame::Logic {
                            is_and,
                            site,
                            next: next + 1,
                            depth,
                        });
                        self.frames.push(Frame::Eval { node, depth });
                    }
                    None => self.values.push(value),
                }
                Ok(())
            }

            Frame::Leave => {
                if let Some(frame) = self.calls.pop_frame() {
                    // The return value is still on top of the value stack
                    let result = self.values.last().map(Value::repr).unwrap_or_default();
                    self.record(format!("return from {} => {}", frame.function_name, result))?;
                }
                Ok(())
            }
        }
    }

    fn pop_value(&mut self) -> Value {
        self.values.pop().unwrap_or_default()
    }

    fn eval_node(&mut self, node: Node, depth: usize) -> Result<(), RuntimeError> {
        let site = match node {
            Node::Literal(Literal::Atom(name)) => {
                let value = self.resolve(&name, depth)?;
                self.values.push(value);
                return Ok(());
            }
            Node::Literal(literal) => {
                self.values.push(Value::from_literal(&literal));
                return Ok(());
            }
            Node::List(site) => site,
        };

        if site.is_empty() {
            self.values.push(Value::List(Vec::new()));
            return Ok(());
        }

        if let Some(form) = SpecialForm::of_site(&site) {
            return self.eval_form(form, &site, depth);
        }

        self.frames.push(Frame::Collect {
            values: Vec::with_capacity(site.len()),
            site,
            next: 0,
            depth,
        });
        Ok(())
    }

    /// Resolve an atom: bindings in scope first, then builtins
    fn resolve(&self, name: &str, depth: usize) -> Result<Value, RuntimeError> {
        let bound = match self.calls.frame(depth) {
            Some(frame) => frame.context.lookup(name),
            None => self.global.borrow().lookup(name),
        };

        bound
            .or_else(|| Builtin::from_name(name).map(Value::Builtin))
            .ok_or_else(|| RuntimeError::UnboundSymbol {
                name: name.to_string(),
            })
    }

    fn bind(&mut self, name: &str, value: Value, mode: BindMode, depth: usize) -> Result<(), RuntimeError> {
        match mode {
            BindMode::Define => self.global.borrow_mut().define(name, value),
            BindMode::Let => match self.calls.frame_mut(depth) {
                Some(frame) => frame.context.define(name, value),
                None => self.global.borrow_mut().define(name, value),
            },
            BindMode::Set => {
                let assigned = match self.calls.frame_mut(depth) {
                    Some(frame) => frame.context.assign(name, value),
                    None => self.global.borrow_mut().assign(name, value),
                };
                if !assigned {
                    return Err(RuntimeError::UnboundSymbol {
                        name: name.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn eval_form(&mut self, form: SpecialForm, site: &Rc<List>, depth: usize) -> Result<(), RuntimeError> {
        let args = &site.items()[1..];

        match form {
            SpecialForm::Define | SpecialForm::Let | SpecialForm::Set => {
                form.expect_args(args, 2, Some(2))?;
                let name = form.expect_name(args, 0)?;
                let mode = match form {
                    SpecialForm::Define => BindMode::Define,
                    SpecialForm::Let => BindMode::Let,
                    _ => BindMode::Set,
                };
                self.frames.push(Frame::Bind { name, mode, depth });
                self.frames.push(Frame::eval(&args[1], depth));
            }

            SpecialForm::If => {
                form.expect_args(args, 2, Some(3))?;
                self.frames.push(Frame::Branch {
                    then: args[1].clone(),
                    otherwise: args.get(2).cloned(),
                    depth,
                });
                self.frames.push(Frame::eval(&args[0], depth));
            }

            SpecialForm::Do => self.push_seq(Rc::from(args), depth),

            SpecialForm::And | SpecialForm::Or => {
                let is_and = form == SpecialForm::And;
                match args.first() {
                    Some(first) => {
                        self.frames.push(Frame::Logic {
                            is_and,
                            site: Rc::clone(site),
                            next: 2,
                            depth,
                        });
                        self.frames.push(Frame::eval(first, depth));
                    }
                    // (and) is true, (or) is false
                    None => self.values.push(Value::Bool(is_and)),
                }
            }

            SpecialForm::Quote => {
                form.expect_args(args, 1, Some(1))?;
                self.values.push(Value::from_node(&args[0]));
            }

            SpecialForm::Fn => {
                form.expect_args(args, 1, None)?;
                let lambda = Lambda {
                    name: None,
                    params: form.expect_params(args, 0)?,
                    body: Rc::from(&args[1..]),
                };
                let addr = self.heap.allocate(HeapObject::Lambda(Rc::new(lambda)))?;
                self.values.push(Value::Ref(addr));
            }

            SpecialForm::Defn => {
                form.expect_args(args, 2, None)?;
                let name = form.expect_name(args, 0)?;
                let lambda = Lambda {
                    name: Some(name.clone()),
                    params: form.expect_params(args, 1)?,
                    body: Rc::from(&args[2..]),
                };
                let addr = self.heap.allocate(HeapObject::Lambda(Rc::new(lambda)))?;
                self.global.borrow_mut().define(&name, Value::Ref(addr));
                self.values.push(Value::Ref(addr));
            }

            SpecialForm::Defer => {
                let lists = args
                    .iter()
                    .map(|node| {
                        node.as_list()
                            .map(Rc::clone)
                            .ok_or_else(|| form.invalid(format!("cannot defer {}", node)))
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                for list in lists {
                    debug!(form = %list, pending = self.stack.len(), "deferring list");
                    self.stack.push_list(list, None, &self.global);
                }
                self.values.push(Value::Null);
            }
        }
        Ok(())
    }

    fn push_seq(&mut self, body: Rc<[Node]>, depth: usize) {
        if body.is_empty() {
            self.values.push(Value::Null);
        } else {
            self.frames.push(Frame::Seq {
                body,
                next: 0,
                depth,
            });
        }
    }

    /// Apply the evaluated head of a call site to its evaluated arguments
    fn apply(&mut self, site: &List, mut values: Vec<Value>) -> Result<(), RuntimeError> {
        let args = values.split_off(1);
        let callee = values.pop().unwrap_or_default();

        match callee {
            Value::Builtin(builtin) => {
                let mark = self.output.len();
                let result = call_builtin(
                    builtin,
                    args,
                    BuiltinEnv {
                        heap: &mut self.heap,
                        output: &mut self.output,
                    },
                )?;
                self.output.attribute(mark, self.current_span);
                self.record(format!("{} => {}", site, result.repr()))?;
                self.values.push(result);
                Ok(())
            }
            Value::Ref(addr) => {
                let lambda = match self.heap.get(addr)? {
                    HeapObject::Lambda(lambda) => Rc::clone(lambda),
                    other => {
                        return Err(RuntimeError::NotCallable {
                            value: format!("{} at 0x{:x}", other.kind(), addr),
                        });
                    }
                };
                self.enter(&lambda, args, site)
            }
            other => Err(RuntimeError::NotCallable {
                value: other.repr(),
            }),
        }
    }

    /// Push a call frame for `lambda` and schedule its body
    fn enter(&mut self, lambda: &Lambda, args: Vec<Value>, site: &List) -> Result<(), RuntimeError> {
        if lambda.params.len() != args.len() {
            return Err(RuntimeError::ArityMismatch {
                function: lambda.display_name().to_string(),
                expected: Arity::Exact(lambda.params.len()),
                got: args.len(),
            });
        }

        let mut context = Context::child(&self.global, lambda.display_name());
        for (param, arg) in lambda.params.iter().zip(args) {
            context.define(param, arg);
        }
        self.calls
            .push_frame(lambda.display_name().to_string(), context);
        let depth = self.calls.depth() - 1;

        self.record(format!("call {}", site))?;
        self.frames.push(Frame::Leave);
        self.push_seq(Rc::clone(&lambda.body), depth);
        Ok(())
    }

    /// Capture the current state
    fn snapshot(&self, event: String) -> Snapshot {
        Snapshot {
            event,
            span: self.current_span,
            pending: self
                .stack
                .pending()
                .map(|item| item.callee.to_string())
                .collect(),
            frames: self
                .calls
                .frames()
                .iter()
                .map(|frame| ContextView::of(&frame.context))
                .collect(),
            globals: ContextView::of(&self.global.borrow()),
            heap: self.heap.clone(),
            output: self.output.clone(),
            continuation_depth: self.frames.len(),
            steps: self.steps,
        }
    }

    /// Take a snapshot if recording is enabled
    fn record(&mut self, event: String) -> Result<(), RuntimeError> {
        if !self.config.record {
            return Ok(());
        }
        let snapshot = self.snapshot(event);
        self.history.push(snapshot)
    }

    /// Step backward in history
    pub fn step_backward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position == 0 {
            return Err(RuntimeError::HistoryBoundary("Already at the beginning"));
        }
        self.history_position -= 1;
        Ok(())
    }

    /// Step forward in history
    pub fn step_forward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position + 1 >= self.history.len() {
            return Err(RuntimeError::HistoryBoundary("Already at the end"));
        }
        self.history_position += 1;
        Ok(())
    }

    /// Jump to the first snapshot
    pub fn rewind_to_start(&mut self) {
        self.history_position = 0;
    }

    /// Jump to the last snapshot
    pub fn fast_forward(&mut self) {
        self.history_position = self.history.len().saturating_sub(1);
    }

    /// Snapshot at the current history position
    pub fn current_snapshot(&self) -> Option<&Snapshot> {
        self.history.get(self.history_position)
    }

    pub fn history_position(&self) -> usize {
        self.history_position
    }

    pub fn total_snapshots(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &SnapshotManager {
        &self.history
    }

    pub fn global(&self) -> &ContextRef {
        &self.global
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn output(&self) -> &OutputLog {
        &self.output
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn last_value(&self) -> Option<&Value> {
        self.last_value.as_ref()
    }

    /// Items still queued
    pub fn pending_len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::errors::HeapError;
    use crate::parser::parse_program;
    use pretty_assertions::assert_eq;

    fn run_with(source: &str, config: RuntimeConfig) -> (Runtime, Result<(), RuntimeError>) {
        let mut runtime = Runtime::new(config);
        let result = runtime.execute(parse_program(source));
        (runtime, result)
    }

    fn run(source: &str) -> Runtime {
        let (runtime, result) = run_with(source, RuntimeConfig::unrecorded());
        result.unwrap();
        runtime
    }

    fn run_err(source: &str) -> RuntimeError {
        run_with(source, RuntimeConfig::unrecorded()).1.unwrap_err()
    }

    fn output(source: &str) -> Vec<String> {
        run(source).output().get_output()
    }

    fn global(runtime: &Runtime, name: &str) -> Option<Value> {
        runtime.global().borrow().get_local(name).cloned()
    }

    #[test]
    fn test_rejects_non_programs() {
        let mut runtime = Runtime::new(RuntimeConfig::unrecorded());
        let list = List::new(vec![Node::atom("print")]);
        assert_eq!(
            runtime.execute(list),
            Err(RuntimeError::NotAProgram { found: "List" })
        );
        assert_eq!(
            runtime.execute(Literal::Number(1.0)),
            Err(RuntimeError::NotAProgram { found: "Literal" })
        );
        assert_eq!(runtime.steps(), 0);
    }

    #[test]
    fn test_empty_program() {
        let runtime = run("");
        assert!(runtime.output().is_empty());
        assert!(runtime.last_value().is_none());
        assert!(runtime.is_finished());
    }

    #[test]
    fn test_items_run_in_source_order() {
        assert_eq!(
            output("(print 1) (print 2) (print 3)"),
            vec!["1", "2", "3"]
        );
    }

    #[test]
    fn test_literals_and_last_value() {
        let runtime = run("(add 1 2)");
        assert_eq!(runtime.last_value(), Some(&Value::Number(3.0)));

        let runtime = run("()");
        assert_eq!(runtime.last_value(), Some(&Value::List(Vec::new())));
    }

    #[test]
    fn test_define_is_global_let_is_local() {
        let runtime = run("(define x 10) (let y 5) (print x)");
        assert_eq!(global(&runtime, "x"), Some(Value::Number(10.0)));
        assert_eq!(global(&runtime, "y"), None);
        assert_eq!(runtime.output().get_output(), vec!["10"]);
    }

    #[test]
    fn test_let_is_not_visible_to_later_items() {
        let err = run_err("(let y 5) (print y)");
        assert_eq!(
            err,
            RuntimeError::UnboundSymbol {
                name: "y".to_string()
            }
        );
    }

    #[test]
    fn test_let_within_one_item() {
        assert_eq!(output("(do (let y 5) (print (mul y 2)))"), vec!["10"]);
    }

    #[test]
    fn test_set_updates_global() {
        let runtime = run("(define n 1) (set n (add n 1)) (set n (add n 1))");
        assert_eq!(global(&runtime, "n"), Some(Value::Number(3.0)));
        assert_eq!(
            run_err("(set missing 1)"),
            RuntimeError::UnboundSymbol {
                name: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_if_and_logic() {
        assert_eq!(
            output("(print (if (lt 1 2) \"yes\" \"no\")) (print (if false 1))"),
            vec!["yes", "null"]
        );
        assert_eq!(
            output("(print (and 1 2)) (print (and 1 null 2)) (print (or false 3)) (print (and) (or))"),
            vec!["2", "null", "3", "true false"]
        );
    }

    #[test]
    fn test_logic_short_circuits() {
        // The unbound symbol would fail if it were evaluated
        assert_eq!(output("(print (or 1 nope)) (print (and false nope))"), vec!["1", "false"]);
    }

    #[test]
    fn test_quote() {
        let runtime = run("(define q (quote (a 1 \"s\")))");
        assert_eq!(
            global(&runtime, "q"),
            Some(Value::List(vec![
                Value::Symbol("a".to_string()),
                Value::Number(1.0),
                Value::Str("s".to_string()),
            ]))
        );
    }

    #[test]
    fn test_fn_and_defn() {
        assert_eq!(
            output("(define sq (fn (x) (mul x x))) (print (sq 7))"),
            vec!["49"]
        );
        assert_eq!(
            output("(defn add3 (a b c) (add a b c)) (print (add3 1 2 3))"),
            vec!["6"]
        );
        assert_eq!(output("(print ((fn (x) (add x 1)) 1))"), vec!["2"]);
    }

    #[test]
    fn test_recursion() {
        let source = "
            (defn fib (n) (if (lt n 2) n (add (fib (sub n 1)) (fib (sub n 2)))))
            (print (fib 15))
        ";
        assert_eq!(output(source), vec!["610"]);
    }

    #[test]
    fn test_lambda_cannot_see_caller_locals() {
        let err = run_err("(defn peek () hidden) (do (let hidden 1) (peek))");
        assert_eq!(
            err,
            RuntimeError::UnboundSymbol {
                name: "hidden".to_string()
            }
        );
        assert_eq!(output("(define seen 2) (defn peek () seen) (print (peek))"), vec!["2"]);
    }

    #[test]
    fn test_lambda_arity() {
        assert_eq!(
            run_err("(defn one (x) x) (one 1 2)"),
            RuntimeError::ArityMismatch {
                function: "one".to_string(),
                expected: Arity::Exact(1),
                got: 2,
            }
        );
    }

    #[test]
    fn test_builtins_can_be_shadowed() {
        assert_eq!(output("(define add sub) (print (add 5 3))"), vec!["2"]);
    }

    #[test]
    fn test_not_callable() {
        assert_eq!(
            run_err("(1 2)"),
            RuntimeError::NotCallable {
                value: "1".to_string()
            }
        );
        assert!(matches!(
            run_err("(define c (cell 1)) (c)"),
            RuntimeError::NotCallable { .. }
        ));
    }

    #[test]
    fn test_defer_runs_after_queued_items() {
        let source = "(print 1) (defer (print \"deferred\") (print \"again\")) (print 2)";
        assert_eq!(output(source), vec!["1", "2", "deferred", "again"]);

        assert!(matches!(
            run_err("(defer 1)"),
            RuntimeError::InvalidForm { form: "defer", .. }
        ));
    }

    #[test]
    fn test_invalid_forms() {
        assert!(matches!(
            run_err("(define 1 2)"),
            RuntimeError::InvalidForm { form: "define", .. }
        ));
        assert!(matches!(
            run_err("(if true)"),
            RuntimeError::InvalidForm { form: "if", .. }
        ));
    }

    #[test]
    fn test_heap_cells() {
        let runtime = run("(define c (cell 1)) (put c (add (get c) 41)) (print (get c)) (free c)");
        assert_eq!(runtime.output().get_output(), vec!["42"]);
        assert_eq!(runtime.heap().live_objects(), 0);

        assert!(matches!(
            run_err("(define c (cell 1)) (free c) (get c)"),
            RuntimeError::Heap(HeapError::UseAfterFree { .. })
        ));
    }

    #[test]
    fn test_step_limit() {
        let config = RuntimeConfig::unrecorded().with_max_steps(500);
        let (_, result) = run_with("(defn loop () (loop)) (loop)", config);
        assert_eq!(result, Err(RuntimeError::StepLimitExceeded { limit: 500 }));
    }

    #[test]
    fn test_error_stops_remaining_items() {
        let (runtime, result) = run_with("(print 1) (div 1 0) (print 2)", RuntimeConfig::unrecorded());
        assert_eq!(result, Err(RuntimeError::DivisionByZero { operation: "div" }));
        assert_eq!(runtime.output().get_output(), vec!["1"]);
        assert_eq!(runtime.pending_len(), 1);
    }

    #[test]
    fn test_next_run_discards_aborted_items() {
        let (mut runtime, result) =
            run_with("(div 1 0) (print \"stale\")", RuntimeConfig::default());
        assert!(result.is_err());
        assert_eq!(runtime.pending_len(), 1);

        runtime.execute(parse_program("(print \"fresh\")")).unwrap();
        assert_eq!(runtime.output().get_output(), vec!["fresh"]);
        assert_eq!(runtime.pending_len(), 0);
        assert_eq!(runtime.history_position(), 0);
        assert_eq!(runtime.current_snapshot().unwrap().event, "start");
        assert_eq!(runtime.history().last().unwrap().event, "item #1 done => null");
    }

    #[test]
    fn test_globals_persist_across_runs() {
        let mut runtime = run("(define x 41)");
        runtime.execute(parse_program("(print (add x 1))")).unwrap();
        assert_eq!(runtime.output().get_output(), vec!["42"]);
    }

    #[test]
    fn test_call_rejects_items_from_another_runtime() {
        let mut runtime = Runtime::new(RuntimeConfig::unrecorded());
        let other = Context::root().shared();
        let list = Rc::new(List::new(vec![Node::atom("print"), Node::number(1.0)]));
        let item = StackItem::new(list, &other, None, "item #1".to_string());

        assert_eq!(
            runtime.call(item),
            Err(RuntimeError::ForeignItem {
                label: "item #1".to_string()
            })
        );
        assert!(runtime.output().is_empty());
    }

    #[test]
    fn test_history_recording() {
        let (mut runtime, result) = run_with("(define x (add 1 2)) (print x)", RuntimeConfig::default());
        result.unwrap();

        // start, add, item 1 done, print, item 2 done
        assert_eq!(runtime.total_snapshots(), 5);
        assert_eq!(runtime.current_snapshot().unwrap().event, "start");
        assert_eq!(runtime.current_snapshot().unwrap().pending.len(), 2);
        assert!(runtime.step_backward().is_err());

        runtime.step_forward().unwrap();
        let snapshot = runtime.current_snapshot().unwrap();
        assert_eq!(snapshot.event, "(add 1 2) => 3");
        assert_eq!(snapshot.frames.len(), 1);

        runtime.fast_forward();
        let last = runtime.current_snapshot().unwrap();
        assert_eq!(last.output.get_output(), vec!["3"]);
        assert_eq!(
            last.globals.bindings,
            vec![("x".to_string(), "3".to_string())]
        );
        assert!(runtime.step_forward().is_err());

        runtime.rewind_to_start();
        assert_eq!(runtime.history_position(), 0);
    }

    #[test]
    fn test_history_shows_call_frames() {
        let (runtime, result) = run_with("(defn sq (x) (mul x x)) (sq 3)", RuntimeConfig::default());
        result.unwrap();

        let inside = (0..runtime.total_snapshots())
            .filter_map(|i| runtime.history().get(i))
            .find(|s| s.event == "(mul x x) => 9")
            .unwrap();
        assert_eq!(inside.frames.len(), 2);
        assert_eq!(inside.frames[1].label, "sq");
        assert_eq!(inside.frames[1].bindings, vec![("x".to_string(), "3".to_string())]);
    }

    #[test]
    fn test_error_snapshot_is_kept() {
        let (runtime, result) = run_with("(print 1) (nope)", RuntimeConfig::default());
        assert!(result.is_err());
        let last = runtime.history().last().unwrap();
        assert_eq!(last.event, "error: Unbound symbol 'nope'");
        assert_eq!(last.output.get_output(), vec!["1"]);
    }

    #[test]
    fn test_output_is_attributed_to_items() {
        let program = parse_program("(print 1)\n(print 2)");
        let spans = program.spans.clone();
        let mut runtime = Runtime::new(RuntimeConfig::unrecorded());
        runtime.execute(program).unwrap();

        let lines = &runtime.output().lines;
        assert_eq!(lines[0].span, Some(spans[0]));
        assert_eq!(lines[1].span, Some(spans[1]));
    }
}
