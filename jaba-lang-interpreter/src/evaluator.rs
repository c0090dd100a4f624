use std::rc::Rc;

use jaba_lang_core::ast::{BinaryOperator, Expression, Sign};
use jaba_lang_core::stack::ensure_sufficient_stack;
use tracing::trace;

use crate::environment::Environment;
use crate::object::{Bindings, Closure, EvaluationError, Object};

pub fn eval_expression(
    expression: &Expression,
    environment: &mut Environment,
) -> Result<Object, EvaluationError> {
    ensure_sufficient_stack(|| eval_expression_inner(expression, environment))
}

fn eval_expression_inner(
    expression: &Expression,
    environment: &mut Environment,
) -> Result<Object, EvaluationError> {
    match expression {
        Expression::IntegerLiteral(value) => Ok(Object::Integer(*value)),
        Expression::Identifier(identifier) => environment
            .get(&identifier.name)
            .ok_or_else(|| EvaluationError::UndefinedVariable(identifier.name.clone())),
        Expression::Unary(sign, operand) => {
            let operand = eval_expression(operand, environment)?;
            eval_unary_operation(*sign, operand)
        }
        Expression::Binary(operator, left, right) => {
            // The right side is only evaluated once the left one is known to
            // be an integer.
            let left = expect_integer(*operator, eval_expression(left, environment)?)?;
            let right = expect_integer(*operator, eval_expression(right, environment)?)?;
            eval_binary_operation(*operator, left, right)
        }
        Expression::Ternary {
            condition,
            consequence,
            alternative,
        } => match eval_expression(condition, environment)? {
            Object::Integer(0) => eval_expression(alternative, environment),
            Object::Integer(_) => eval_expression(consequence, environment),
            _ => Err(EvaluationError::NonIntegerCondition),
        },
        Expression::Assignment { identifier, value } => {
            let value = eval_expression(value, environment)?;
            environment.set(identifier.name.clone(), value.clone());
            Ok(value)
        }
        Expression::FunctionLiteral(function) => Ok(Object::Function(function.clone())),
        Expression::Call {
            function,
            arguments,
        } => {
            let callee = eval_expression(function, environment)?;
            eval_call_function(function, callee, arguments, environment)
        }
    }
}

fn eval_unary_operation(sign: Sign, operand: Object) -> Result<Object, EvaluationError> {
    match (sign, operand) {
        (Sign::Plus, operand) => Ok(operand),
        (Sign::Minus, Object::Integer(value)) => Ok(Object::Integer(value.wrapping_neg())),
        (Sign::Minus, _) => Err(EvaluationError::NegateNonInteger),
    }
}

fn expect_integer(operator: BinaryOperator, object: Object) -> Result<i64, EvaluationError> {
    match object {
        Object::Integer(value) => Ok(value),
        _ => Err(EvaluationError::NonIntegerOperand(operator)),
    }
}

fn eval_binary_operation(
    operator: BinaryOperator,
    left: i64,
    right: i64,
) -> Result<Object, EvaluationError> {
    let value = match operator {
        BinaryOperator::Plus => left.wrapping_add(right),
        BinaryOperator::Minus => left.wrapping_sub(right),
        BinaryOperator::Multiply => left.wrapping_mul(right),
        BinaryOperator::Divide | BinaryOperator::Modulo if right == 0 => {
            return Err(EvaluationError::DivisionByZero)
        }
        BinaryOperator::Divide => left.wrapping_div(right),
        BinaryOperator::Modulo => left.wrapping_rem(right),
    };
    Ok(Object::Integer(value))
}

/// Copies every binding of `from` that `frame` does not define yet.
fn merge_missing(frame: &mut Bindings, from: &Bindings) {
    for (name, value) in from {
        if !frame.contains_key(name) {
            frame.insert(name.clone(), value.clone());
        }
    }
}

fn eval_call_function(
    callee_expression: &Expression,
    callee: Object,
    arguments: &[Expression],
    environment: &mut Environment,
) -> Result<Object, EvaluationError> {
    let (function, captured) = match callee {
        Object::Function(function) => (function, None),
        Object::Closure(Closure { function, captured }) => (function, Some(captured)),
        Object::Integer(_) => return Err(EvaluationError::CallNonFunction),
    };

    if function.parameters.len() != arguments.len() {
        return Err(EvaluationError::WrongArgumentCount {
            function: callee_expression.to_string(),
            expected: function.parameters.len(),
            actual: arguments.len(),
        });
    }

    let mut scope = environment.enter_call()?;
    trace!(depth = scope.call_depth(), function = %callee_expression, "call");

    // Arguments still see the caller's frame.
    let mut frame = Bindings::new();
    for (parameter, argument) in function.parameters.iter().zip(arguments) {
        let value = eval_expression(argument, &mut scope)?;
        frame.insert(parameter.name.clone(), value);
    }
    if let Some(captured) = &captured {
        merge_missing(&mut frame, captured);
    }
    merge_missing(&mut frame, scope.frame());

    scope.enter_frame(frame);
    let result = eval_expression(&function.body, &mut scope)?;

    Ok(capture_returned_function(result, &scope))
}

/// A bare function coming out of a call remembers the frame it was returned
/// from, which is what makes `adder(1)(2)` work.
fn capture_returned_function(result: Object, environment: &Environment) -> Object {
    match result {
        Object::Function(function) => Object::Closure(Closure {
            function,
            captured: Rc::new(environment.frame().clone()),
        }),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{evaluate_line, InterpreterError};
    use pretty_assertions::assert_eq;

    fn run_lines(environment: &mut Environment, lines: &[&str]) -> Result<Object, InterpreterError> {
        let mut result = Ok(Object::Integer(0));
        for line in lines {
            result = evaluate_line(line, environment);
        }
        result
    }

    fn test_evaluation(inputs: Vec<(Vec<&str>, Result<Object, EvaluationError>)>) {
        for (lines, output) in inputs {
            let mut environment = Environment::new();
            let result = run_lines(&mut environment, &lines);

            assert_eq!(result, output.map_err(InterpreterError::from), "lines: {lines:?}");
        }
    }

    fn evaluate_ok(environment: &mut Environment, line: &str) -> Object {
        evaluate_line(line, environment).unwrap()
    }

    #[test]
    fn test_arithmetic() {
        let inputs = vec![
            (vec!["5\n"], Ok(Object::Integer(5))),
            (vec!["2 * 3 + 4\n"], Ok(Object::Integer(10))),
            (vec!["2 * (3 + 4)\n"], Ok(Object::Integer(14))),
            (vec!["7 % 3\n"], Ok(Object::Integer(1))),
            (vec!["-7 % 3\n"], Ok(Object::Integer(-1))),
            (vec!["7 / -2\n"], Ok(Object::Integer(-3))),
            (vec!["10 - 4 - 3\n"], Ok(Object::Integer(3))),
            (vec!["-(2 - 5)\n"], Ok(Object::Integer(3))),
            (
                vec!["9223372036854775807 + 1\n"],
                Ok(Object::Integer(i64::MIN)),
            ),
            (vec!["1 / 0\n"], Err(EvaluationError::DivisionByZero)),
            (vec!["1 % 0\n"], Err(EvaluationError::DivisionByZero)),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_unary_operations() {
        let mut environment = Environment::new();
        evaluate_ok(&mut environment, "f = |a| a\n");

        assert!(evaluate_ok(&mut environment, "+f\n").is_callable());
        assert_eq!(evaluate_ok(&mut environment, "+4\n"), Object::Integer(4));
        assert_eq!(
            evaluate_line("-f\n", &mut environment),
            Err(EvaluationError::NegateNonInteger.into())
        );
    }

    #[test]
    fn test_non_integer_operands() {
        let mut environment = Environment::new();
        evaluate_ok(&mut environment, "f = |a| a\n");

        let error = evaluate_line("f + 1\n", &mut environment).unwrap_err();
        assert_eq!(
            error,
            EvaluationError::NonIntegerOperand(BinaryOperator::Plus).into()
        );
        assert_eq!(error.to_string(), "+ cannot be applied to expression");

        // The right operand is skipped once the left one is rejected.
        assert!(evaluate_line("f * (x = 1)\n", &mut environment).is_err());
        assert_eq!(
            evaluate_line("x\n", &mut environment),
            Err(EvaluationError::UndefinedVariable("x".into()).into())
        );

        assert_eq!(
            evaluate_line("1 % f\n", &mut environment),
            Err(EvaluationError::NonIntegerOperand(BinaryOperator::Modulo).into())
        );
    }

    #[test]
    fn test_assignment() {
        let inputs = vec![
            (vec!["x = 5\n", "x\n"], Ok(Object::Integer(5))),
            (vec!["x = 5\n", "x = x + 1\n", "x\n"], Ok(Object::Integer(6))),
            (vec!["a = b = 3\n", "a * b\n"], Ok(Object::Integer(9))),
            (vec!["(a = 2) * a\n"], Ok(Object::Integer(4))),
            (
                vec!["undefinedName\n"],
                Err(EvaluationError::UndefinedVariable("undefinedName".into())),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_assignment_before_failure_persists() {
        let mut environment = Environment::new();
        evaluate_ok(&mut environment, "f = |a| a\n");

        assert!(evaluate_line("(z = 5) + f\n", &mut environment).is_err());
        assert_eq!(evaluate_ok(&mut environment, "z\n"), Object::Integer(5));
    }

    #[test]
    fn test_ternary() {
        let inputs = vec![
            (vec!["1 ? 10 : (1/0)\n"], Ok(Object::Integer(10))),
            (vec!["0 ? (1/0) : 20\n"], Ok(Object::Integer(20))),
            (vec!["-3 ? 1 : 2\n"], Ok(Object::Integer(1))),
            (vec!["0 ? 1 : 0 ? 2 : 3\n"], Ok(Object::Integer(3))),
            (vec!["x = 0 ? 1 : 2\n", "x\n"], Ok(Object::Integer(2))),
            (vec!["1 ? a = 4 : 5\n", "a\n"], Ok(Object::Integer(4))),
            (
                vec!["f = |a| a\n", "f ? 1 : 2\n"],
                Err(EvaluationError::NonIntegerCondition),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_function_application() {
        let inputs = vec![
            (vec!["identity = |x| x\n", "identity(5)\n"], Ok(Object::Integer(5))),
            (vec!["double = |x| x * 2\n", "double(5)\n"], Ok(Object::Integer(10))),
            (vec!["f = |a b| a + b\n", "f(1 2)\n"], Ok(Object::Integer(3))),
            (
                vec!["add = |x y| x + y\n", "add(5 + 5 add(5 5))\n"],
                Ok(Object::Integer(20)),
            ),
            (vec!["(|x| x)(5)\n"], Ok(Object::Integer(5))),
            (vec!["f = |a| a\n", "f(1) + f(2)\n"], Ok(Object::Integer(3))),
            (vec!["one = || 1\n", "one()\n"], Ok(Object::Integer(1))),
            (
                vec!["a = 10\n", "f = |a b| a + b\n", "f(1 a)\n"],
                Ok(Object::Integer(11)),
            ),
            (
                vec!["factorial = |n| n ? n * factorial(n - 1) : 1\n", "factorial(5)\n"],
                Ok(Object::Integer(120)),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_wrong_argument_count() {
        let mut environment = Environment::new();
        evaluate_ok(&mut environment, "f = |a b| a + b\n");

        let error = evaluate_line("f(1)\n", &mut environment).unwrap_err();
        assert_eq!(
            error,
            EvaluationError::WrongArgumentCount {
                function: "f".to_owned(),
                expected: 2,
                actual: 1
            }
            .into()
        );
        assert_eq!(
            error.to_string(),
            "incorrect amount of arguments for \"f\", expected 2 got 1"
        );
        assert_eq!(evaluate_ok(&mut environment, "f(1 2)\n"), Object::Integer(3));
    }

    #[test]
    fn test_call_non_function() {
        let inputs = vec![
            (vec!["5(1)\n"], Err(EvaluationError::CallNonFunction)),
            (vec!["x = 3\n", "x()\n"], Err(EvaluationError::CallNonFunction)),
            (
                vec!["missing(1)\n"],
                Err(EvaluationError::UndefinedVariable("missing".into())),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_currying() {
        let mut environment = Environment::new();
        evaluate_ok(&mut environment, "adder = |a| |b| a + b\n");

        assert_eq!(evaluate_ok(&mut environment, "adder(3)(4)\n"), Object::Integer(7));
        assert_eq!(evaluate_ok(&mut environment, "adder(10)(1)\n"), Object::Integer(11));

        evaluate_ok(&mut environment, "add3 = adder(3)\n");
        evaluate_ok(&mut environment, "add5 = adder(5)\n");
        assert_eq!(evaluate_ok(&mut environment, "add3(1)\n"), Object::Integer(4));
        assert_eq!(evaluate_ok(&mut environment, "add5(1)\n"), Object::Integer(6));
        assert_eq!(evaluate_ok(&mut environment, "add3(1)\n"), Object::Integer(4));
        assert_eq!(evaluate_ok(&mut environment, "add3\n").to_string(), "[Function]");
    }

    #[test]
    fn test_closure_is_a_snapshot() {
        let inputs = vec![
            // captured bindings win over the caller's
            (
                vec!["x = 1\n", "get = |a| || x + a\n", "g = get(10)\n", "x = 100\n", "g()\n"],
                Ok(Object::Integer(11)),
            ),
            // parameters win over captured bindings
            (vec!["mk = |a| |a| a\n", "mk(1)(2)\n"], Ok(Object::Integer(2))),
            // assignments in the body are part of the snapshot
            (
                vec!["mk = |a| (b = a * 2) ? || b : || 0\n", "mk(4)()\n"],
                Ok(Object::Integer(8)),
            ),
            // returned closures are passed through untouched
            (
                vec!["adder = |a| |b| a + b\n", "id = |f| f\n", "id(adder(1))(2)\n"],
                Ok(Object::Integer(3)),
            ),
            (
                vec!["k = |a| || a\n", "k(7)()\n"],
                Ok(Object::Integer(7)),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_calls_do_not_leak_bindings() {
        let mut environment = Environment::new();
        evaluate_ok(&mut environment, "g = |a| y = a\n");

        assert_eq!(evaluate_ok(&mut environment, "g(4)\n"), Object::Integer(4));
        assert_eq!(
            evaluate_line("y\n", &mut environment),
            Err(EvaluationError::UndefinedVariable("y".into()).into())
        );

        evaluate_ok(&mut environment, "h = |a| a / 0\n");
        assert_eq!(
            evaluate_line("h(1)\n", &mut environment),
            Err(EvaluationError::DivisionByZero.into())
        );
        assert_eq!(
            evaluate_line("a\n", &mut environment),
            Err(EvaluationError::UndefinedVariable("a".into()).into())
        );
        assert_eq!(environment.call_depth(), 0);
    }

    #[test]
    fn test_argument_errors_restore_state() {
        let mut environment = Environment::new();
        evaluate_ok(&mut environment, "f = |a| a\n");

        assert_eq!(
            evaluate_line("f(1 / 0)\n", &mut environment),
            Err(EvaluationError::DivisionByZero.into())
        );
        assert_eq!(environment.call_depth(), 0);
        assert_eq!(
            evaluate_line("a\n", &mut environment),
            Err(EvaluationError::UndefinedVariable("a".into()).into())
        );
        assert_eq!(evaluate_ok(&mut environment, "f(2)\n"), Object::Integer(2));
    }

    #[test]
    fn test_depth_overflow_inside_arguments() {
        let mut environment = Environment::new();
        evaluate_ok(&mut environment, "g = |n| g(g(n))\n");

        assert_eq!(
            evaluate_line("g(1)\n", &mut environment),
            Err(EvaluationError::MaxStackSizeExceeded(MAX_DEPTH).into())
        );
        assert_eq!(environment.call_depth(), 0);

        let names: Vec<_> = environment.bindings().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["g"]);

        evaluate_ok(&mut environment, "f = |n| n ? f(n - 1) : 7\n");
        assert_eq!(evaluate_ok(&mut environment, "f(400)\n"), Object::Integer(7));
    }

    #[test]
    fn test_long_operator_chain() {
        let mut environment = Environment::new();
        let line = format!("{}\n", vec!["1"; 10_000].join(" + "));

        assert_eq!(evaluate_ok(&mut environment, &line), Object::Integer(10_000));

        let line = format!("{}\n", vec!["2"; 10_000].join(" - "));
        assert_eq!(evaluate_ok(&mut environment, &line), Object::Integer(-19_996));
    }

    #[test]
    fn test_deeply_nested_expressions() {
        let mut environment = Environment::new();
        let line = format!("{}1{}\n", "(".repeat(5_000), ")".repeat(5_000));
        assert_eq!(evaluate_ok(&mut environment, &line), Object::Integer(1));

        let line = format!("{}5{}\n", "-(".repeat(5_001), ")".repeat(5_001));
        assert_eq!(evaluate_ok(&mut environment, &line), Object::Integer(-5));

        let line = format!("{}0{}\n", "1 ? ".repeat(3_000), " : 2".repeat(3_000));
        assert_eq!(evaluate_ok(&mut environment, &line), Object::Integer(0));
    }

    #[test]
    fn test_recursion_depth_guard() {
        let mut environment = Environment::new();
        evaluate_ok(&mut environment, "loop = |n| loop(n + 1)\n");

        assert_eq!(
            evaluate_line("loop(0)\n", &mut environment),
            Err(EvaluationError::MaxStackSizeExceeded(MAX_DEPTH).into())
        );
        assert_eq!(environment.call_depth(), 0);
        assert!(evaluate_ok(&mut environment, "loop\n").is_callable());
        assert_eq!(
            evaluate_line("n\n", &mut environment),
            Err(EvaluationError::UndefinedVariable("n".into()).into())
        );

        // The session is still usable afterwards.
        evaluate_ok(&mut environment, "f = |n| n ? f(n - 1) : 7\n");
        assert_eq!(evaluate_ok(&mut environment, "f(400)\n"), Object::Integer(7));
    }

    const MAX_DEPTH: usize = crate::environment::MAX_CALL_DEPTH;

    #[test]
    fn test_custom_depth_limit() {
        let mut environment = Environment::with_max_call_depth(3);
        evaluate_ok(&mut environment, "f = |n| n ? f(n - 1) : 0\n");

        assert_eq!(evaluate_ok(&mut environment, "f(2)\n"), Object::Integer(0));
        assert_eq!(
            evaluate_line("f(3)\n", &mut environment),
            Err(EvaluationError::MaxStackSizeExceeded(3).into())
        );
    }
}
