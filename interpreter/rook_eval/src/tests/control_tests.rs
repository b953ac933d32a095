//! Control-flow propagation tests: if/elsif, loops, break/continue,
//! return unwinding.

use pretty_assertions::assert_eq;

use rook_ir::BinaryOp;
use rook_value::{EvalErrorKind, Value};

use super::{run_err, run_ok, set_var};

#[test]
fn while_break_stops_the_loop_without_propagating() {
    // i = 0;
    // while (true) { i = i + 1; if (i == 5) { break; } }
    // after = 1;
    let interp = run_ok(|b| {
        let i = b.intern("i");
        let zero = b.int_literal(0);
        let init = set_var(b, "i", zero);

        let i_ref = b.identifier("i");
        let one = b.int_literal(1);
        let plus = b.binary(BinaryOp::Add, i_ref, one);
        let inc = b.assign(i, plus);
        let inc_stmt = b.expr_stmt(inc);

        let i_ref = b.identifier("i");
        let five = b.int_literal(5);
        let at_five = b.binary(BinaryOp::Eq, i_ref, five);
        let brk = b.break_stmt();
        let then = b.block(&[brk]);
        let check = b.if_stmt(at_five, then, vec![], None);

        let body = b.block(&[inc_stmt, check]);
        let forever = b.bool_literal(true);
        let w = b.while_stmt(forever, body);

        let one = b.int_literal(1);
        let after = set_var(b, "after", one);
        b.block(&[init, w, after])
    });
    assert_eq!(interp.global("i"), Some(Value::Int(5)));
    // Break stopped at the loop; the statement after it still ran.
    assert_eq!(interp.global("after"), Some(Value::Int(1)));
}

#[test]
fn continue_skips_to_the_next_condition_check() {
    // sum = 0; i = 0;
    // while (i < 10) { i = i + 1; if (i % 2 == 0) { continue; } sum = sum + i; }
    let interp = run_ok(|b| {
        let sum = b.intern("sum");
        let i = b.intern("i");
        let zero = b.int_literal(0);
        let init_sum = set_var(b, "sum", zero);
        let zero = b.int_literal(0);
        let init_i = set_var(b, "i", zero);

        let i_ref = b.identifier("i");
        let ten = b.int_literal(10);
        let cond = b.binary(BinaryOp::Lt, i_ref, ten);

        let i_ref = b.identifier("i");
        let one = b.int_literal(1);
        let plus = b.binary(BinaryOp::Add, i_ref, one);
        let inc = b.assign(i, plus);
        let inc_stmt = b.expr_stmt(inc);

        let i_ref = b.identifier("i");
        let two = b.int_literal(2);
        let rem = b.binary(BinaryOp::Mod, i_ref, two);
        let zero = b.int_literal(0);
        let even = b.binary(BinaryOp::Eq, rem, zero);
        let cont = b.continue_stmt();
        let then = b.block(&[cont]);
        let skip_even = b.if_stmt(even, then, vec![], None);

        let sum_ref = b.identifier("sum");
        let i_ref = b.identifier("i");
        let add = b.binary(BinaryOp::Add, sum_ref, i_ref);
        let acc = b.assign(sum, add);
        let acc_stmt = b.expr_stmt(acc);

        let body = b.block(&[inc_stmt, skip_even, acc_stmt]);
        let w = b.while_stmt(cond, body);
        b.block(&[init_sum, init_i, w])
    });
    // 1 + 3 + 5 + 7 + 9
    assert_eq!(interp.global("sum"), Some(Value::Int(25)));
}

#[test]
fn return_unwinds_nested_blocks_to_the_call_site() {
    // function f() {
    //     while (true) { if (true) { return 42; } }
    //     print("unreachable");
    // }
    // result = f();
    let interp = run_ok(|b| {
        let f = b.intern("f");
        let forty_two = b.int_literal(42);
        let ret = b.return_stmt(Some(forty_two));
        let ret_block = b.block(&[ret]);
        let yes = b.bool_literal(true);
        let inner_if = b.if_stmt(yes, ret_block, vec![], None);
        let loop_body = b.block(&[inner_if]);
        let forever = b.bool_literal(true);
        let w = b.while_stmt(forever, loop_body);

        let print = b.intern("print");
        let msg = b.string_literal("unreachable");
        let call_print = b.call(print, &[msg]);
        let tail = b.expr_stmt(call_print);

        let f_body = b.block(&[w, tail]);
        b.define_function(f, &[], f_body).unwrap();

        let call = b.call(f, &[]);
        let result = set_var(b, "result", call);
        b.block(&[result])
    });
    assert_eq!(interp.global("result"), Some(Value::Int(42)));
    // Return skipped every remaining statement at every level.
    assert_eq!(interp.output(), "");
}

#[test]
fn elsif_first_true_branch_only() {
    // if (false) { print("T"); }
    // elsif (true) { print("A"); }
    // elsif (true) { print("B"); }
    // else { print("E"); }
    let interp = run_ok(|b| {
        let print = b.intern("print");
        let t_msg = b.string_literal("T");
        let t_call = b.call(print, &[t_msg]);
        let t_stmt = b.expr_stmt(t_call);
        let then_block = b.block(&[t_stmt]);

        let a_msg = b.string_literal("A");
        let a_call = b.call(print, &[a_msg]);
        let a_stmt = b.expr_stmt(a_call);
        let a_block = b.block(&[a_stmt]);

        let b_msg = b.string_literal("B");
        let b_call = b.call(print, &[b_msg]);
        let b_stmt = b.expr_stmt(b_call);
        let b_block = b.block(&[b_stmt]);

        let e_msg = b.string_literal("E");
        let e_call = b.call(print, &[e_msg]);
        let e_stmt = b.expr_stmt(e_call);
        let e_block = b.block(&[e_stmt]);

        let no = b.bool_literal(false);
        let yes_a = b.bool_literal(true);
        let yes_b = b.bool_literal(true);
        let arm_a = b.elsif(yes_a, a_block);
        let arm_b = b.elsif(yes_b, b_block);
        let if_stmt = b.if_stmt(no, then_block, vec![arm_a, arm_b], Some(e_block));
        b.block(&[if_stmt])
    });
    // Only the first true arm ran: not B (exclusive, no fall-through),
    // and not E (an arm did run, even though it finished normally).
    assert_eq!(interp.output(), "A");
}

#[test]
fn else_runs_when_no_branch_matched() {
    let interp = run_ok(|b| {
        let print = b.intern("print");
        let e_msg = b.string_literal("E");
        let e_call = b.call(print, &[e_msg]);
        let e_stmt = b.expr_stmt(e_call);
        let e_block = b.block(&[e_stmt]);

        let then_block = b.block(&[]);
        let no = b.bool_literal(false);
        let no_arm_cond = b.bool_literal(false);
        let empty = b.block(&[]);
        let arm = b.elsif(no_arm_cond, empty);
        let if_stmt = b.if_stmt(no, then_block, vec![arm], Some(e_block));
        b.block(&[if_stmt])
    });
    assert_eq!(interp.output(), "E");
}

#[test]
fn for_loop_runs_init_condition_post() {
    // sum = 0;
    // for (i = 0; i < 5; i = i + 1) { sum = sum + i; }
    let interp = run_ok(|b| {
        let sum = b.intern("sum");
        let i = b.intern("i");
        let zero = b.int_literal(0);
        let init_sum = set_var(b, "sum", zero);

        let zero = b.int_literal(0);
        let init = b.assign(i, zero);

        let i_ref = b.identifier("i");
        let five = b.int_literal(5);
        let cond = b.binary(BinaryOp::Lt, i_ref, five);

        let i_ref = b.identifier("i");
        let one = b.int_literal(1);
        let plus = b.binary(BinaryOp::Add, i_ref, one);
        let post = b.assign(i, plus);

        let sum_ref = b.identifier("sum");
        let i_ref = b.identifier("i");
        let add = b.binary(BinaryOp::Add, sum_ref, i_ref);
        let acc = b.assign(sum, add);
        let acc_stmt = b.expr_stmt(acc);
        let body = b.block(&[acc_stmt]);

        let f = b.for_stmt(Some(init), Some(cond), Some(post), body);
        b.block(&[init_sum, f])
    });
    assert_eq!(interp.global("sum"), Some(Value::Int(10)));
    assert_eq!(interp.global("i"), Some(Value::Int(5)));
}

#[test]
fn for_without_condition_loops_until_break() {
    // i = 0; for (; ; i = i + 1) { if (i == 3) { break; } }
    let interp = run_ok(|b| {
        let i = b.intern("i");
        let zero = b.int_literal(0);
        let init_i = set_var(b, "i", zero);

        let i_ref = b.identifier("i");
        let one = b.int_literal(1);
        let plus = b.binary(BinaryOp::Add, i_ref, one);
        let post = b.assign(i, plus);

        let i_ref = b.identifier("i");
        let three = b.int_literal(3);
        let done = b.binary(BinaryOp::Eq, i_ref, three);
        let brk = b.break_stmt();
        let then = b.block(&[brk]);
        let check = b.if_stmt(done, then, vec![], None);
        let body = b.block(&[check]);

        let f = b.for_stmt(None, None, Some(post), body);
        b.block(&[init_i, f])
    });
    assert_eq!(interp.global("i"), Some(Value::Int(3)));
}

#[test]
fn return_without_value_yields_null() {
    let interp = run_ok(|b| {
        let f = b.intern("f");
        let ret = b.return_stmt(None);
        let body = b.block(&[ret]);
        b.define_function(f, &[], body).unwrap();
        let call = b.call(f, &[]);
        let result = set_var(b, "r", call);
        b.block(&[result])
    });
    assert_eq!(interp.global("r"), Some(Value::Null));
}

#[test]
fn falling_through_a_function_yields_null() {
    let interp = run_ok(|b| {
        let f = b.intern("f");
        let one = b.int_literal(1);
        let stmt = set_var(b, "side", one);
        let body = b.block(&[stmt]);
        b.define_function(f, &[], body).unwrap();
        let call = b.call(f, &[]);
        let result = set_var(b, "r", call);
        b.block(&[result])
    });
    assert_eq!(interp.global("r"), Some(Value::Null));
}

#[test]
fn stray_break_at_top_level_is_fatal() {
    let err = run_err(|b| {
        let brk = b.break_stmt();
        b.block(&[brk])
    });
    assert_eq!(err.kind, EvalErrorKind::StrayControlFlow { signal: "break" });
}

#[test]
fn stray_continue_in_a_function_body_is_fatal() {
    let err = run_err(|b| {
        let f = b.intern("f");
        let cont = b.continue_stmt();
        let body = b.block(&[cont]);
        b.define_function(f, &[], body).unwrap();
        let call = b.call(f, &[]);
        let stmt = b.expr_stmt(call);
        b.block(&[stmt])
    });
    assert_eq!(
        err.kind,
        EvalErrorKind::StrayControlFlow {
            signal: "continue",
        }
    );
}

#[test]
fn non_boolean_condition_is_fatal_with_line() {
    let err = run_err(|b| {
        b.set_line(12);
        let one = b.int_literal(1);
        let empty = b.block(&[]);
        let if_stmt = b.if_stmt(one, empty, vec![], None);
        b.block(&[if_stmt])
    });
    assert_eq!(
        err.kind,
        EvalErrorKind::ConditionTypeMismatch {
            construct: "if",
            found: "int",
        }
    );
    assert_eq!(err.line, Some(12));
    assert_eq!(
        err.to_string(),
        "line 12: if condition must be boolean, got int"
    );
}

#[test]
fn short_circuit_skips_the_poisoned_side() {
    // ok1 = false && (1 / 0 == 1);
    // ok2 = true || (1 / 0 == 1);
    let interp = run_ok(|b| {
        let one = b.int_literal(1);
        let zero = b.int_literal(0);
        let div = b.binary(BinaryOp::Div, one, zero);
        let one = b.int_literal(1);
        let poisoned = b.binary(BinaryOp::Eq, div, one);
        let no = b.bool_literal(false);
        let and = b.binary(BinaryOp::And, no, poisoned);
        let ok1 = set_var(b, "ok1", and);

        let one = b.int_literal(1);
        let zero = b.int_literal(0);
        let div = b.binary(BinaryOp::Div, one, zero);
        let one = b.int_literal(1);
        let poisoned = b.binary(BinaryOp::Eq, div, one);
        let yes = b.bool_literal(true);
        let or = b.binary(BinaryOp::Or, yes, poisoned);
        let ok2 = set_var(b, "ok2", or);

        b.block(&[ok1, ok2])
    });
    assert_eq!(interp.global("ok1"), Some(Value::Bool(false)));
    assert_eq!(interp.global("ok2"), Some(Value::Bool(true)));
}

#[test]
fn non_boolean_logical_operand_is_fatal() {
    let err = run_err(|b| {
        let one = b.int_literal(1);
        let yes = b.bool_literal(true);
        let and = b.binary(BinaryOp::And, one, yes);
        let stmt = set_var(b, "x", and);
        b.block(&[stmt])
    });
    assert_eq!(
        err.kind,
        EvalErrorKind::LogicalOperandNotBoolean {
            op: "&&",
            found: "int",
        }
    );
}
