//! Embedding-surface tests: builtins, stream globals, native
//! registration, run lifecycle.

use pretty_assertions::assert_eq;

use rook_ir::BinaryOp;
use rook_value::{EvalErrorKind, Value};

use crate::{InterpreterBuilder, RegisterError, NATIVE_LIB_NAME};

use super::{interpreter, program, run_err, run_ok, set_var};

#[test]
fn print_stringifies_through_the_handler() {
    // print("hello " + 42);
    let interp = run_ok(|b| {
        let print = b.intern("print");
        let hello = b.string_literal("hello ");
        let n = b.int_literal(42);
        let concat = b.binary(BinaryOp::Add, hello, n);
        let call = b.call(print, &[concat]);
        let stmt = b.expr_stmt(call);
        b.block(&[stmt])
    });
    assert_eq!(interp.output(), "hello 42");
}

#[test]
fn print_with_wrong_arity_is_fatal() {
    let err = run_err(|b| {
        let print = b.intern("print");
        let call = b.call(print, &[]);
        let stmt = b.expr_stmt(call);
        b.block(&[stmt])
    });
    assert_eq!(
        err.kind,
        EvalErrorKind::ArgumentCountMismatch {
            function: "print".to_owned(),
            expected: 1,
            found: 0,
        }
    );
}

#[test]
fn stream_globals_are_installed_for_the_run() {
    let interp = run_ok(|b| b.block(&[]));
    for name in ["STDIN", "STDOUT", "STDERR"] {
        let Some(Value::NativePointer(ptr)) = interp.global(name) else {
            panic!("expected `{name}` to be a native pointer global");
        };
        assert_eq!(ptr.tag(), NATIVE_LIB_NAME);
    }
}

#[test]
fn stream_globals_stringify_with_the_library_tag() {
    // msg = "out=" + STDOUT;
    let interp = run_ok(|b| {
        let lhs = b.string_literal("out=");
        let stdout_ref = b.identifier("STDOUT");
        let concat = b.binary(BinaryOp::Add, lhs, stdout_ref);
        let stmt = set_var(b, "msg", concat);
        b.block(&[stmt])
    });
    let Some(Value::Str(msg)) = interp.global("msg") else {
        panic!("expected a string global");
    };
    assert!(msg.as_str().starts_with("out=(rook.lang.file:0x"));
}

#[test]
fn fputs_to_stdout_is_captured() {
    // fputs("via fputs", STDOUT);
    let interp = run_ok(|b| {
        let fputs = b.intern("fputs");
        let text = b.string_literal("via fputs");
        let stdout_ref = b.identifier("STDOUT");
        let call = b.call(fputs, &[text, stdout_ref]);
        let stmt = b.expr_stmt(call);
        b.block(&[stmt])
    });
    assert_eq!(interp.output(), "via fputs");
}

#[test]
fn file_write_then_read_roundtrip() {
    let path = std::env::temp_dir().join(format!("rook_eval_io_{}.txt", std::process::id()));
    let path_text = path.to_string_lossy().into_owned();

    // fh = fopen(path, "w"); fputs("line one\n", fh); fclose(fh);
    // fh = fopen(path, "r"); first = fgets(fh); end = fgets(fh); fclose(fh);
    let interp = run_ok(|b| {
        let fopen = b.intern("fopen");
        let fclose = b.intern("fclose");
        let fgets = b.intern("fgets");
        let fputs = b.intern("fputs");
        let fh = b.intern("fh");

        let path_lit = b.string_literal(&path_text);
        let w_mode = b.string_literal("w");
        let open_w = b.call(fopen, &[path_lit, w_mode]);
        let open_w_stmt = set_var(b, "fh", open_w);

        let text = b.string_literal("line one\n");
        let fh_ref = b.identifier("fh");
        let write = b.call(fputs, &[text, fh_ref]);
        let write_stmt = b.expr_stmt(write);

        let fh_ref = b.identifier("fh");
        let close_w = b.call(fclose, &[fh_ref]);
        let close_w_stmt = b.expr_stmt(close_w);

        let path_lit = b.string_literal(&path_text);
        let r_mode = b.string_literal("r");
        let open_r = b.call(fopen, &[path_lit, r_mode]);
        let reassign = b.assign(fh, open_r);
        let open_r_stmt = b.expr_stmt(reassign);

        let fh_ref = b.identifier("fh");
        let read_first = b.call(fgets, &[fh_ref]);
        let first_stmt = set_var(b, "first", read_first);

        let fh_ref = b.identifier("fh");
        let read_end = b.call(fgets, &[fh_ref]);
        let end_stmt = set_var(b, "end", read_end);

        let fh_ref = b.identifier("fh");
        let close_r = b.call(fclose, &[fh_ref]);
        let close_r_stmt = b.expr_stmt(close_r);

        b.block(&[
            open_w_stmt,
            write_stmt,
            close_w_stmt,
            open_r_stmt,
            first_stmt,
            end_stmt,
            close_r_stmt,
        ])
    });

    assert_eq!(interp.global("first"), Some(Value::string("line one\n")));
    assert_eq!(interp.global("end"), Some(Value::Null));
    std::fs::remove_file(path).unwrap();
}

#[test]
fn fopen_failure_yields_null() {
    let interp = run_ok(|b| {
        let fopen = b.intern("fopen");
        let path = b.string_literal("/nonexistent-dir-for-tests/file.txt");
        let mode = b.string_literal("r");
        let call = b.call(fopen, &[path, mode]);
        let stmt = set_var(b, "fh", call);
        b.block(&[stmt])
    });
    assert_eq!(interp.global("fh"), Some(Value::Null));
}

#[test]
fn host_natives_are_indistinguishable_at_call_sites() {
    fn double_it(
        _interp: &mut crate::Interpreter,
        args: &[Value],
    ) -> crate::EvalResult<Value> {
        match args {
            [Value::Int(n)] => Ok(Value::Int(n * 2)),
            _ => Err(crate::errors::native_error("double_it expects one int")),
        }
    }

    let program = program(|b| {
        let double = b.intern("double_it");
        let n = b.int_literal(21);
        let call = b.call(double, &[n]);
        let stmt = set_var(b, "r", call);
        b.block(&[stmt])
    });
    let mut interp = InterpreterBuilder::new(program)
        .register_native("double_it", double_it)
        .capture_output()
        .build()
        .unwrap();
    interp.run().unwrap();
    assert_eq!(interp.global("r"), Some(Value::Int(42)));
}

#[test]
fn script_function_shadowing_a_builtin_is_fatal() {
    let program = program(|b| {
        let print = b.intern("print");
        let body = b.block(&[]);
        b.define_function(print, &[], body).unwrap();
        b.block(&[])
    });
    let err = InterpreterBuilder::new(program).build().unwrap_err();
    assert_eq!(
        err,
        RegisterError::DuplicateFunction {
            name: "print".to_owned(),
        }
    );
}

#[test]
fn duplicate_native_registration_is_fatal() {
    fn noop(_interp: &mut crate::Interpreter, _args: &[Value]) -> crate::EvalResult<Value> {
        Ok(Value::Null)
    }

    let program = program(|b| b.block(&[]));
    let err = InterpreterBuilder::new(program)
        .register_native("hook", noop)
        .register_native("hook", noop)
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        RegisterError::DuplicateFunction {
            name: "hook".to_owned(),
        }
    );
}

#[test]
fn unknown_function_call_is_fatal() {
    let err = run_err(|b| {
        b.set_line(3);
        let ghost = b.intern("ghost");
        let call = b.call(ghost, &[]);
        let stmt = b.expr_stmt(call);
        b.block(&[stmt])
    });
    assert_eq!(
        err.kind,
        EvalErrorKind::UndefinedFunction {
            name: "ghost".to_owned(),
        }
    );
    assert_eq!(err.line, Some(3));
}

#[test]
fn each_run_resets_the_execution_state() {
    let mut interp = interpreter(|b| {
        let one = b.int_literal(1);
        let stmt = set_var(b, "x", one);
        b.block(&[stmt])
    });

    interp.run().unwrap();
    let first_count = interp.globals.binding_count();

    interp.run().unwrap();
    // Globals were rebuilt from scratch, not appended to.
    assert_eq!(interp.globals.binding_count(), first_count);
    assert_eq!(interp.global("x"), Some(Value::Int(1)));
}

#[test]
fn unary_minus_negates_numbers_only() {
    let interp = run_ok(|b| {
        let seven = b.int_literal(7);
        let neg = b.minus(seven);
        let i_stmt = set_var(b, "i", neg);
        let half = b.double_literal(0.5);
        let neg_half = b.minus(half);
        let d_stmt = set_var(b, "d", neg_half);
        b.block(&[i_stmt, d_stmt])
    });
    assert_eq!(interp.global("i"), Some(Value::Int(-7)));
    assert_eq!(interp.global("d"), Some(Value::Double(-0.5)));

    let err = run_err(|b| {
        let yes = b.bool_literal(true);
        let neg = b.minus(yes);
        let stmt = set_var(b, "x", neg);
        b.block(&[stmt])
    });
    assert_eq!(
        err.kind,
        EvalErrorKind::MinusOperandNotNumeric { found: "boolean" }
    );
}

#[test]
fn assignment_is_an_expression_yielding_the_value() {
    // b = (a = 5) + 1;
    let interp = run_ok(|b| {
        let a = b.intern("a");
        let five = b.int_literal(5);
        let assign_a = b.assign(a, five);
        let one = b.int_literal(1);
        let plus = b.binary(BinaryOp::Add, assign_a, one);
        let stmt = set_var(b, "b", plus);
        b.block(&[stmt])
    });
    assert_eq!(interp.global("a"), Some(Value::Int(5)));
    assert_eq!(interp.global("b"), Some(Value::Int(6)));
}
