//! End-to-end interpreter tests: whole programs in, printed output out.

use berd_run::run_source;
use berd_util::ErrorKind;

/// Runs a program and returns its printed output.
fn run(source: &str) -> String {
    let (out, result) = run_source(source, Vec::new());
    if let Err(e) = result {
        panic!("program failed: {e} ({:?})", e.kind);
    }
    String::from_utf8(out).unwrap()
}

/// Runs a program expected to fail, returning output so far and the error.
fn run_err(source: &str) -> (String, berd_util::Diagnostic) {
    let (out, result) = run_source(source, Vec::new());
    let err = result.expect_err("program unexpectedly succeeded");
    (String::from_utf8(out).unwrap(), err)
}

// =============================================================================
// HISTORY
// =============================================================================

#[test]
fn test_history_records_assignments_in_order() {
    let out = run("var var x = 1!  x = 2!  x = 3!  print history(x)!");
    assert_eq!(out, "[1, 2, 3]\n");
}

#[test]
fn test_previous_steps_back() {
    let out = run("var var x = 1!  x = 2!  x = 3!  print previous(x)!  print x!");
    assert_eq!(out, "2\n2\n");
}

#[test]
fn test_previous_then_next_returns() {
    let out = run("var var x = 1!  x = 2!  previous(x)!  print next(x)!");
    assert_eq!(out, "2\n");
}

#[test]
fn test_previous_at_oldest_is_undefined() {
    let out = run("var var x = 1!  print previous(x)!");
    assert_eq!(out, "undefined\n");
}

#[test]
fn test_debug_question_prints_history_for_bare_identifier() {
    let out = run("var var x = 1!  x = 2!  x?");
    assert_eq!(out, "[1, 2]\n");
}

// =============================================================================
// MUTABILITY AND THE CONST STORE
// =============================================================================

#[test]
fn test_const_const_rejects_assignment() {
    let (_, err) = run_err("const const y = 10!  y = 11!");
    assert_eq!(err.kind, ErrorKind::Name);
    assert!(err.span.is_some());
}

#[test]
fn test_triple_const_prints_then_rejects() {
    let (out, err) = run_err("const const const z = 7!\nprint z!\nz = 8!");
    assert_eq!(out, "7\n");
    assert_eq!(err.kind, ErrorKind::Name);
}

#[test]
fn test_triple_const_cannot_be_redeclared() {
    let (_, err) = run_err("const const const z = 7!  const const const z = 8!");
    assert_eq!(err.kind, ErrorKind::Name);
}

#[test]
fn test_const_var_allows_element_edits() {
    let out = run("const var xs = [1, 2]!  xs[0] = 9!  print xs!");
    assert_eq!(out, "[1, 9]\n");
}

#[test]
fn test_var_const_rejects_element_edits() {
    let (_, err) = run_err("var const xs = [1, 2]!  xs[0] = 9!");
    assert_eq!(err.kind, ErrorKind::Name);
}

// =============================================================================
// FOUR-STATE BOOLEANS AND CONTROL FLOW
// =============================================================================

#[test]
fn test_if_maybe_takes_idk() {
    let out = run("if maybe { print \"t\"! } idk { print \"i\"! } else { print \"e\"! }");
    assert_eq!(out, "i\n");
}

#[test]
fn test_if_undefined_takes_else() {
    let out = run("if undefined { print \"t\"! } else { print \"e\"! }");
    assert_eq!(out, "e\n");
}

#[test]
fn test_if_maybe_without_idk_is_noop() {
    let out = run("if maybe { print \"t\"! }  print \"after\"!");
    assert_eq!(out, "after\n");
}

#[test]
fn test_conditional_expression_slots() {
    let out = run("print maybe ? \"t\" : \"f\" :: \"m\" ::: \"u\"!");
    assert_eq!(out, "m\n");
    let out = run("print undefined ? \"t\" : \"f\" :: \"m\" ::: \"u\"!");
    assert_eq!(out, "u\n");
    let out = run("print false ? \"t\"!");
    assert_eq!(out, "undefined\n");
}

#[test]
fn test_while_break_continue() {
    let out = run(
        "var var i = 0!
         var var total = 0!
         while true {
             i = i + 1!
             if i === 2 { continue! }
             if i > 4 { break! }
             total = total + i!
         }
         print total!",
    );
    // 1 + 3 + 4
    assert_eq!(out, "8\n");
}

#[test]
fn test_break_outside_loop_is_context_error() {
    let (_, err) = run_err("break!");
    assert_eq!(err.kind, ErrorKind::Context);
}

#[test]
fn test_try_again_reevaluates_condition() {
    let out = run(
        "var var n = 0!
         if n < 3 {
             n = n + 1!
             try again!
         }
         print n!",
    );
    assert_eq!(out, "3\n");
}

#[test]
fn test_try_again_outside_if_is_context_error() {
    let (_, err) = run_err("try again!");
    assert_eq!(err.kind, ErrorKind::Context);
}

#[test]
fn test_return_outside_function_is_context_error() {
    let (_, err) = run_err("return 5!");
    assert_eq!(err.kind, ErrorKind::Context);
}

// =============================================================================
// WHEN SUBSCRIPTIONS
// =============================================================================

#[test]
fn test_when_fires_per_triggering_mutation() {
    let out = run(
        "var var a = 0!
         when a > 2 { print \"big\"! }
         a = 1!
         a = 3!
         a = 4!",
    );
    assert_eq!(out, "big\nbig\n");
}

#[test]
fn test_when_subscriber_mutations_queue_fifo() {
    let out = run(
        "var var a = 0!
         var var b = 0!
         when a === 1 { b = 1! }
         when b === 1 { print \"chained\"! }
         a = 1!",
    );
    assert_eq!(out, "chained\n");
}

#[test]
fn test_when_pattern_with_guard() {
    let out = run(
        "var var xs = 0!
         when xs matches [lo, hi] where lo < hi { print \"ordered\"! }
         xs = [1, 2]!
         xs = [5, 3]!",
    );
    assert_eq!(out, "ordered\n");
}

#[test]
fn test_runaway_dispatch_hits_safety_bound() {
    let (_, err) = run_err(
        "var var a = 0!
         when a > 0 { a = a + 1! }
         a = 1!",
    );
    assert_eq!(err.kind, ErrorKind::Safety);
}

// =============================================================================
// REVERSE EXECUTION
// =============================================================================

#[test]
fn test_reverse_replays_prints_backwards() {
    let out = run("print \"one\"!  print \"two\"!  reverse!");
    assert_eq!(out, "one\ntwo\ntwo\none\n");
}

#[test]
fn test_forward_restores_direction() {
    // reverse sends the cursor back over "a" and off the front; the
    // forward statement is never reached.
    let out = run("print \"a\"!  reverse!  forward!  print \"b\"!");
    assert_eq!(out, "a\na\n");

    // In forward motion it is a no-op.
    let out = run("forward!  print \"a\"!");
    assert_eq!(out, "a\n");
}

#[test]
fn test_direction_is_local_to_a_block() {
    let out = run("{ print \"x\"! reverse! }  print \"after\"!");
    assert_eq!(out, "x\nx\nafter\n");
}

// =============================================================================
// PRIORITIES AND LIFETIMES
// =============================================================================

#[test]
fn test_lower_priority_redeclaration_is_ignored() {
    let out = run("var var x = 1!!!  var var x = 2!  print x!");
    assert_eq!(out, "1\n");
}

#[test]
fn test_equal_priority_redeclaration_wins() {
    let out = run("var var x = 1!  var var x = 2!  print x!");
    assert_eq!(out, "2\n");
}

#[test]
fn test_line_lifetime_expires_and_falls_back() {
    let out = run(
        "var var x = 1!
         var var x<1> = 2!!
         print x!
         print x!",
    );
    // The two-bang declaration shadows x for one statement, then expires,
    // exposing the original binding again.
    assert_eq!(out, "1\n1\n");
}

#[test]
fn test_infinity_lifetime_never_expires() {
    let out = run("var var x<Infinity> = 9!  print x!  print x!");
    assert_eq!(out, "9\n9\n");
}

#[test]
fn test_expired_variable_becomes_bare_word() {
    let out = run("var var gone<1> = 1!  print gone!  print gone!");
    // After expiry the identifier no longer resolves and prints as its
    // own name.
    assert_eq!(out, "gone\ngone\n");
}

// =============================================================================
// VALUES, OPERATORS, ARRAYS
// =============================================================================

#[test]
fn test_power_run_postfix() {
    let out = run("var var x = 5!  x****!  print x!");
    assert_eq!(out, "125\n");
}

#[test]
fn test_inc_dec_returns_previous_value() {
    let out = run("var var x = 5!  print x++!  print x!");
    assert_eq!(out, "5\n6\n");
}

#[test]
fn test_division_by_zero_is_undefined() {
    let out = run("print 1 / 0!");
    assert_eq!(out, "undefined\n");
}

#[test]
fn test_array_literal_indices_from_minus_one() {
    let out = run("var var xs = [10, 20, 30]!  print xs[-1]!  print xs[1]!  print xs[5]!");
    assert_eq!(out, "10\n30\nundefined\n");
}

#[test]
fn test_bare_word_fallback() {
    let out = run("print hello!");
    assert_eq!(out, "hello\n");
}

#[test]
fn test_number_words() {
    let out = run("print forty two!");
    assert_eq!(out, "42\n");
}

#[test]
fn test_equality_tiers() {
    let out = run("print 1 = \"1\"!  print 1 == true!  print 1 === true!");
    assert_eq!(out, "true\ntrue\nfalse\n");
}

#[test]
fn test_negated_comparison() {
    let out = run("print 1 ;== 2!  print 1 ;< 2!");
    assert_eq!(out, "true\nfalse\n");
}

#[test]
fn test_whitespace_precedence_end_to_end() {
    let out = run("print 2+3 * 4!  print 2 + 3*4!");
    assert_eq!(out, "20\n14\n");
}

#[test]
fn test_min_max_operators() {
    let out = run("print 3 <> 5!  print 3 >< 5!");
    assert_eq!(out, "3\n5\n");
}

#[test]
fn test_clamp_and_wrap() {
    let out = run("print 15 ▷ [0..10]!  print 12 ↻ [0..10)!");
    assert_eq!(out, "10\n2\n");
}

#[test]
fn test_clamp_degenerate_range_is_undefined() {
    let out = run("print 5 ▷ [10..0]!");
    assert_eq!(out, "undefined\n");
}

#[test]
fn test_wrap_zero_width_is_undefined() {
    let out = run("print 5 ↻ [3..3)!");
    assert_eq!(out, "undefined\n");
}

#[test]
fn test_roots_and_trig() {
    // `\` is the square root as a prefix; infix `a \ b` is the b-th root.
    let out = run("print \\9!  print 16 \\ 2!  print ~0!");
    assert_eq!(out, "3\n4\n0\n");
}

#[test]
fn test_root_by_zero_degree_is_undefined() {
    let out = run("print 16 \\ 0!");
    assert_eq!(out, "undefined\n");
}

#[test]
fn test_update_statements() {
    let out = run(
        "var var x = 10!
         x :+ 5!
         x :- 3!
         x :* 2!
         print x!
         x :< 10!
         print x!
         x :?? 99!
         print x!",
    );
    assert_eq!(out, "24\n10\n10\n");
}

#[test]
fn test_nullish_update_fills_undefined() {
    let out = run("var var x = undefined!  x :?? 7!  print x!");
    assert_eq!(out, "7\n");
}

#[test]
fn test_update_clamp_and_wrap() {
    let out = run("var var x = 15!  x :▷ [0..10]!  print x!  x :↻ 7 [0..10)!  print x!");
    assert_eq!(out, "10\n7\n");
}

// =============================================================================
// DELETION
// =============================================================================

#[test]
fn test_deleted_value_errors_on_reappearance() {
    let (_, err) = run_err("delete 3!  print 1 + 2!");
    assert_eq!(err.kind, ErrorKind::Deletion);
    assert!(err.message.contains("deleted"));
}

#[test]
fn test_delete_array_entry() {
    let out = run("var var xs = [1, 2, 3]!  delete xs[0]!  print xs!");
    assert_eq!(out, "[1, 3]\n");
}

#[test]
fn test_delete_non_primitive_is_type_error() {
    let (_, err) = run_err("var var xs = [1]!  delete xs!");
    assert_eq!(err.kind, ErrorKind::Type);
}

// =============================================================================
// FUNCTIONS
// =============================================================================

#[test]
fn test_function_declaration_and_call() {
    let out = run("function add a, b => a + b!  print add 2, 3!");
    assert_eq!(out, "5\n");
}

#[test]
fn test_function_missing_args_are_undefined() {
    let out = run("fn probe a, b => b!  print probe 1!");
    assert_eq!(out, "undefined\n");
}

#[test]
fn test_function_excess_args_are_dropped() {
    let out = run("f first a => a!  print first 1, 2, 3!");
    assert_eq!(out, "1\n");
}

#[test]
fn test_function_block_body_with_return() {
    // A leading `-` never starts an argument, so the negative value is
    // spelled as a subtraction.
    let out = run(
        "function pick n => {
             if n > 0 { return \"pos\"! }
             return \"non-pos\"!
         }
         print pick 5!
         print pick 0 - 1!",
    );
    assert_eq!(out, "pos\nnon-pos\n");
}

#[test]
fn test_paren_call_spelling() {
    let out = run("function add(a, b) => a + b!  print add(2, 3)!");
    assert_eq!(out, "5\n");
}

// =============================================================================
// DESTRUCTURING
// =============================================================================

#[test]
fn test_array_destructuring_with_default_and_rest() {
    let out = run(
        "var var [a, b = 9, ...rest] = [1, undefined, 3, 4]!
         print a!
         print b!
         print rest!",
    );
    assert_eq!(out, "1\n9\n[3, 4]\n");
}

// =============================================================================
// CLASSES
// =============================================================================

#[test]
fn test_class_singleton_instance() {
    let out = run(
        "Player is a class {
             health: 100!
         }
         print Player[\"health\"]!
         Player[\"health\"] = 50!
         print Player[\"health\"]!",
    );
    assert_eq!(out, "100\n50\n");
}

#[test]
fn test_class_bare_word_field_name() {
    let out = run(
        "Player is a class {
             health: 100!
         }
         print Player[health]!",
    );
    // `health` is undeclared, so it evaluates to the string "health".
    assert_eq!(out, "100\n");
}

#[test]
fn test_class_method_with_source_receiver() {
    let out = run(
        "Counter is a class {
             count: 0!
             function bump by => {
                 source[count] = source[count] + by!
                 return source[count]!
             }
         }
         print Counter[bump] 1!
         print Counter[bump](2)!",
    );
    assert_eq!(out, "1\n3\n");
}

#[test]
fn test_class_static_and_fallback() {
    let out = run(
        "Config is a class {
             static version: 3!
             fallback missing: \"n/a\"!
         }
         print Config[version]!
         print Config[nonsense]!",
    );
    assert_eq!(out, "3\nn/a\n");
}

#[test]
fn test_class_field_history() {
    let out = run(
        "Player is a class {
             health: 100!
         }
         Player[health] = 80!
         Player[health] = 60!
         print history(Player[health])!
         print previous(Player[health])!",
    );
    assert_eq!(out, "[100, 80, 60]\n80\n");
}

#[test]
fn test_class_redeclaration_resets_instance() {
    let out = run(
        "Player is a class {
             health: 100!
         }
         Player[health] = 1!
         Player is a class {
             health: 100!
         }
         print Player[health]!",
    );
    assert_eq!(out, "100\n");
}

// =============================================================================
// STRING BUILT-INS
// =============================================================================

#[test]
fn test_split_empty_separator() {
    let out = run("print split(\"abc\", \"\")!");
    assert_eq!(out, "[a, b, c]\n");
}

#[test]
fn test_trim_and_char_at_and_slice() {
    let out = run(
        "print trim(\"  pad  \")!
         print charAt(\"abc\", 1)!
         print charAt(\"abc\", 9)!
         print slice(\"hello\", -2)!",
    );
    assert_eq!(out, "pad\nb\nundefined\nlo\n");
}

#[test]
fn test_lines_drops_trailing_empty() {
    let out = run("print lines(\"a\\nb\\n\")!");
    assert_eq!(out, "[a, b]\n");
}

#[test]
fn test_to_number_variants() {
    let out = run(
        "print toNumber(\"12.5\")!
         print toNumber(\"forty two\")!
         print toNumber(true)!
         print toNumber(\"pelican\")!
         print parseInt(\"7\")!",
    );
    assert_eq!(out, "12.5\n42\n1\nundefined\n7\n");
}

#[test]
fn test_num_array() {
    let out = run("print numArray(0, 3)!");
    assert_eq!(out, "[0, 0, 0]\n");
}

#[test]
fn test_builtin_arity_is_shape_error() {
    let (_, err) = run_err("print trim(\"a\", \"b\")!");
    assert_eq!(err.kind, ErrorKind::Shape);
}

// =============================================================================
// SCOPES
// =============================================================================

#[test]
fn test_block_scope_shadowing() {
    let out = run(
        "var var x = 1!
         {
             var var x = 2!
             print x!
         }
         print x!",
    );
    assert_eq!(out, "2\n1\n");
}

#[test]
fn test_scope_pops_despite_signals() {
    let out = run(
        "var var x = \"outer\"!
         var var i = 0!
         while i < 2 {
             i = i + 1!
             {
                 var var x = \"inner\"!
                 continue!
             }
         }
         print x!",
    );
    assert_eq!(out, "outer\n");
}
