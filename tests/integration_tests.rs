// Parser Robustness Tests for PENG
//
// Table-driven suites that push malformed and edge-case programs through
// the lexer and parser and check that every one either parses or fails
// with the expected diagnostic, without panicking.

use peng::error::PengError;
use peng::lexer::Lexer;
use peng::parser::Parser;

/// Test result for a single test case
#[derive(Debug)]
pub enum TestResult {
    Pass,
    Fail(String),
    Crash(String),
}

/// Individual test case
#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: String,
    pub input: String,
    pub should_succeed: bool,
    pub expected_error_contains: Option<String>,
}

/// Test suite containing multiple test cases
#[derive(Debug)]
pub struct TestSuite {
    pub name: String,
    pub tests: Vec<TestCase>,
}

impl TestSuite {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tests: Vec::new(),
        }
    }

    pub fn add_test(&mut self, test: TestCase) {
        self.tests.push(test);
    }

    /// Run all tests in this suite
    pub fn run(&self) -> TestSuiteResults {
        let mut results = TestSuiteResults::new(&self.name);

        println!("Running test suite: {}", self.name);
        println!("{}", "=".repeat(50));

        for test in &self.tests {
            let result = run_single_test(test);
            results.add_result(&test.name, result);
        }

        results.print_summary();
        results
    }
}

/// Results for a test suite run
#[derive(Debug)]
pub struct TestSuiteResults {
    pub suite_name: String,
    pub results: Vec<(String, TestResult)>,
    pub passed: usize,
    pub failed: usize,
    pub crashed: usize,
}

impl TestSuiteResults {
    pub fn new(suite_name: &str) -> Self {
        Self {
            suite_name: suite_name.to_string(),
            results: Vec::new(),
            passed: 0,
            failed: 0,
            crashed: 0,
        }
    }

    pub fn add_result(&mut self, test_name: &str, result: TestResult) {
        match &result {
            TestResult::Pass => {
                self.passed += 1;
                println!("  ok   {}", test_name);
            }
            TestResult::Fail(msg) => {
                self.failed += 1;
                println!("  FAIL {}: {}", test_name, msg);
            }
            TestResult::Crash(msg) => {
                self.crashed += 1;
                println!("  CRASH {}: {}", test_name, msg);
            }
        }
        self.results.push((test_name.to_string(), result));
    }

    pub fn print_summary(&self) {
        println!();
        println!("Test Suite: {} - Summary", self.suite_name);
        println!("{}", "-".repeat(30));
        println!("Passed:  {}", self.passed);
        println!("Failed:  {}", self.failed);
        println!("Crashed: {}", self.crashed);
        println!("Total:   {}", self.results.len());
        println!();
    }

    pub fn is_all_passed(&self) -> bool {
        self.crashed == 0 && self.failed == 0
    }
}

/// Run a single test case
fn run_single_test(test: &TestCase) -> TestResult {
    // Catch any panics to detect crashes
    let result = std::panic::catch_unwind(|| parse_input(&test.input));

    match result {
        Ok(parse_result) => match (parse_result, test.should_succeed) {
            (Ok(_), true) => TestResult::Pass,
            (Ok(_), false) => {
                TestResult::Fail("Expected parsing to fail, but it succeeded".to_string())
            }
            (Err(error), false) => match &test.expected_error_contains {
                Some(expected) if !error.message.contains(expected) => TestResult::Fail(format!(
                    "Error message '{}' doesn't contain expected text '{}'",
                    error.message, expected
                )),
                _ => TestResult::Pass,
            },
            (Err(error), true) => TestResult::Fail(format!(
                "Expected parsing to succeed, but got error: {}",
                error.message
            )),
        },
        Err(panic_info) => {
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else {
                "Unknown panic".to_string()
            };
            TestResult::Crash(panic_msg)
        }
    }
}

/// Lex and parse input
fn parse_input(input: &str) -> Result<peng::ast::Program, PengError> {
    let tokens = Lexer::new(input, "<test>").scan_tokens()?;
    Parser::new(tokens).parse()
}

/// Test case builder for convenience
impl TestCase {
    pub fn should_succeed(name: &str, input: &str) -> Self {
        Self {
            name: name.to_string(),
            input: input.to_string(),
            should_succeed: true,
            expected_error_contains: None,
        }
    }

    pub fn should_fail(name: &str, input: &str) -> Self {
        Self {
            name: name.to_string(),
            input: input.to_string(),
            should_succeed: false,
            expected_error_contains: None,
        }
    }

    pub fn should_fail_with_message(name: &str, input: &str, expected_msg: &str) -> Self {
        Self {
            name: name.to_string(),
            input: input.to_string(),
            should_succeed: false,
            expected_error_contains: Some(expected_msg.to_string()),
        }
    }
}

// ============================================================================
// Test Suite Creation Functions
// ============================================================================

fn create_malformed_expressions_tests() -> TestSuite {
    let mut suite = TestSuite::new("Malformed Expressions");

    // === PARENTHESES TESTS ===

    suite.add_test(TestCase::should_fail_with_message(
        "unmatched_opening_paren",
        "say (1 + 2",
        "Expected ')', found end of input",
    ));

    suite.add_test(TestCase::should_fail_with_message(
        "unmatched_opening_paren_nested",
        "say ((1 + 2)",
        "Expected ')'",
    ));

    suite.add_test(TestCase::should_fail_with_message(
        "unmatched_opening_paren_before_newline",
        "say (1 + (2 * 3)\nsay 1",
        "Expected ')', found newline",
    ));

    suite.add_test(TestCase::should_fail_with_message(
        "unmatched_closing_paren",
        "say 1 + 2)",
        "found ')'",
    ));

    // The '(' was consumed, so the error from inside the parentheses wins
    // over the one 'say' would report.
    suite.add_test(TestCase::should_fail_with_message(
        "empty_parentheses",
        "say ()",
        "Expected expression after '(', found ')'",
    ));

    suite.add_test(TestCase::should_fail_with_message(
        "empty_parentheses_in_expression",
        "say 1 + ()",
        "Expected expression after '('",
    ));

    suite
}

fn create_edge_case_tests() -> TestSuite {
    let mut suite = TestSuite::new("Edge Cases");

    suite.add_test(TestCase::should_succeed("empty_input", ""));
    suite.add_test(TestCase::should_succeed("only_whitespace", "   \t  "));
    suite.add_test(TestCase::should_succeed("only_newlines", "\n\n\n"));
    suite.add_test(TestCase::should_succeed("blank_lines_between", "x is 1\n\n\nsay x\n"));
    suite.add_test(TestCase::should_succeed("no_trailing_newline", "say 1"));

    suite.add_test(TestCase::should_fail_with_message(
        "unexpected_eof_after_operator",
        "say 1 +",
        "Expected expression after '+', found end of input",
    ));
    suite.add_test(TestCase::should_fail("unexpected_eof_in_expression", "say 1 + ("));

    let deep_parens = format!("say {}1{}", "(".repeat(100), ")".repeat(100));
    suite.add_test(TestCase::should_succeed("deeply_nested_parens", &deep_parens));

    suite
}

fn create_operator_tests() -> TestSuite {
    let mut suite = TestSuite::new("Operator Tests");

    suite.add_test(TestCase::should_succeed("leading_unary_plus", "say + 1"));
    suite.add_test(TestCase::should_succeed("leading_unary_minus", "say -1"));
    suite.add_test(TestCase::should_fail_with_message(
        "missing_right_operand",
        "say 1 *",
        "Expected expression after '*'",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "bare_operator",
        "say +",
        "Expected expression after '+'",
    ));

    // A sign applies to an atom, so it can follow a binary operator once.
    suite.add_test(TestCase::should_succeed("binary_then_sign", "say 1 ++ 2"));
    suite.add_test(TestCase::should_succeed("minus_then_sign", "say 1 -- 2"));
    suite.add_test(TestCase::should_fail_with_message(
        "double_sign",
        "say --1",
        "Expected expression after '-', found '-'",
    ));
    suite.add_test(TestCase::should_fail("triple_plus", "say 1 +++ 2"));
    suite.add_test(TestCase::should_succeed("sign_before_parens", "say -(1 + 2)"));

    suite
}

fn create_statement_tests() -> TestSuite {
    let mut suite = TestSuite::new("Statement Tests");

    suite.add_test(TestCase::should_succeed("simple_assignment", "x is 1"));
    suite.add_test(TestCase::should_succeed("assignment_with_expression", "x is 1 + 2"));
    suite.add_test(TestCase::should_succeed("print_many", "say 1, \"two\", x"));
    suite.add_test(TestCase::should_succeed("keyword_prefix_is_identifier", "sayx is 1"));

    suite.add_test(TestCase::should_fail_with_message(
        "missing_value",
        "x is",
        "Expected expression after 'is', found end of input",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "missing_is",
        "x 5",
        "Expected 'is' after identifier, found '5'",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "bare_expression",
        "5",
        "Expected 'say', variable assignment or newline, found '5'",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "keyword_as_value",
        "say is",
        "Expected expression after 'say', found 'is'",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "missing_print_value",
        "say",
        "Expected expression after 'say'",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "trailing_comma",
        "say 1,",
        "Expected expression after ',', found end of input",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "print_missing_terminator",
        "say 1 2",
        "Expected ',', '+', '-', '*', '/', newline or end of input, found '2'",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "assign_missing_terminator",
        "x is 1 2",
        "Expected '+', '-', '*', '/', newline or end of input, found '2'",
    ));
    suite.add_test(TestCase::should_fail("two_statements_one_line", "x is 1 say x"));

    suite
}

fn create_literal_tests() -> TestSuite {
    let mut suite = TestSuite::new("Literal Tests");

    suite.add_test(TestCase::should_succeed("integer_literal", "say 42"));
    suite.add_test(TestCase::should_succeed("float_literal", "say 3.14"));
    suite.add_test(TestCase::should_succeed("trailing_dot", "say 42."));
    suite.add_test(TestCase::should_succeed("string_literal", "say \"hello\""));
    suite.add_test(TestCase::should_succeed("escaped_quote", "say \"a \\\"b\\\" c\""));

    suite.add_test(TestCase::should_fail_with_message(
        "multiple_dots",
        "say 3.14.159",
        "Invalid character '.'",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "leading_dot",
        "say .42",
        "Unknown character '.'",
    ));
    suite.add_test(TestCase::should_succeed(
        "integer_beyond_i64",
        "say 99999999999999999999",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "unterminated_string",
        "say \"hello",
        "Expected closing '\"'",
    ));
    suite.add_test(TestCase::should_fail_with_message(
        "unterminated_string_with_newline",
        "say \"hello\nworld\"",
        "Expected closing '\"'",
    ));
    suite.add_test(TestCase::should_fail(
        "escaped_closing_quote",
        "say \"hello\\\"",
    ));

    suite
}

// ============================================================================
// Main Test Function
// ============================================================================

#[test]
fn comprehensive_parser_tests() {
    let suites = vec![
        create_malformed_expressions_tests(),
        create_edge_case_tests(),
        create_operator_tests(),
        create_statement_tests(),
        create_literal_tests(),
    ];

    let mut failures = Vec::new();
    for suite in suites {
        let results = suite.run();
        if !results.is_all_passed() {
            failures.push(results.suite_name);
        }
    }

    assert!(failures.is_empty(), "failing suites: {:?}", failures);
}
