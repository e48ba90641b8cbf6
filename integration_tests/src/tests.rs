//! Integration test cases.

use colored::Colorize;
use hc08_driver::commands::{Field, LedState};
use hc08_driver::{Error, Hc08};

use crate::device::SerialTransport;

type Module = Hc08<SerialTransport>;

/// Test result.
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub message: Option<String>,
}

impl TestResult {
    fn pass(name: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: None,
        }
    }

    fn fail(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: Some(message.to_string()),
        }
    }
}

/// Run a test function and print results as it happens.
fn run_test<F>(name: &str, module: &mut Module, test_fn: F) -> TestResult
where
    F: FnOnce(&mut Module) -> TestResult,
{
    print!("  {} ... ", name);
    std::io::Write::flush(&mut std::io::stdout()).ok();

    let mut result = test_fn(module);
    result.name = name.to_string();

    if result.passed {
        println!("{}", "PASS".green().bold());
    } else {
        println!("{}", "FAIL".red().bold());
        if let Some(msg) = &result.message {
            println!("    {}", msg.red());
        }
    }

    result
}

/// Run all tests and return results.
pub fn run_all_tests(module: &mut Module) -> Vec<TestResult> {
    let mut results = Vec::new();

    results.push(run_test("AT is acknowledged with OK", module, test_at));
    results.push(run_test("AT+RX dump parses", module, test_base_param_dump));
    results.push(run_test("Version query answers", module, test_version));
    results.push(run_test("Baud query matches dump", module, test_baud_query));
    results.push(run_test("LED set then query", module, test_led_round_trip));
    results.push(run_test("Advertising interval set then query", module, test_aint_round_trip));
    results.push(run_test("Out of range value rejected locally", module, test_local_validation));

    results
}

/// Print test results summary.
pub fn print_results(results: &[TestResult]) {
    println!("\n{}", "=".repeat(60));
    println!("{}", "Test Results".bold());
    println!("{}", "=".repeat(60));

    let mut passed = 0;
    let mut failed = 0;

    for result in results {
        if result.passed {
            println!("  {} {}", "[PASS]".green().bold(), result.name);
            passed += 1;
        } else {
            println!("  {} {}", "[FAIL]".red().bold(), result.name);
            if let Some(msg) = &result.message {
                println!("         {}", msg.red());
            }
            failed += 1;
        }
    }

    println!("{}", "-".repeat(60));
    println!(
        "  Total: {} passed, {} failed",
        passed.to_string().green(),
        if failed > 0 {
            failed.to_string().red()
        } else {
            failed.to_string().normal()
        }
    );
    println!("{}", "=".repeat(60));
}

/// Send a set command and check the module acknowledged it.
fn acknowledged(module: &mut Module, send: impl FnOnce(&mut Module) -> Result<(), Error>) -> Result<(), Error> {
    send(module)?;
    module.read_answer()?;
    module.check_set()
}

fn reply_text(module: &Module) -> String {
    String::from_utf8_lossy(module.rx_buffer()).into_owned()
}

// --- Individual Tests ---

fn test_at(module: &mut Module) -> TestResult {
    match acknowledged(module, |m| m.cmd_at()) {
        Ok(()) => TestResult::pass("test"),
        Err(e) => TestResult::fail("test", &format!("{} (reply {:?})", e, reply_text(module))),
    }
}

fn test_base_param_dump(module: &mut Module) -> TestResult {
    let result = module
        .cmd_rx()
        .and_then(|_| module.read_answer())
        .and_then(|_| module.parse_base_param());

    match result {
        Ok(()) => {
            let params = module.params();
            print!("({} {:?} {}) ", params.name, params.role, params.baud.bps());
            TestResult::pass("test")
        }
        Err(e) => TestResult::fail("test", &format!("{} (reply {:?})", e, reply_text(module))),
    }
}

fn test_version(module: &mut Module) -> TestResult {
    let result = module.cmd_version().and_then(|_| module.read_answer());

    match result {
        Ok(0) => TestResult::fail("test", "No reply"),
        Ok(_) => {
            print!("({}) ", reply_text(module).trim());
            TestResult::pass("test")
        }
        Err(e) => TestResult::fail("test", &format!("Error: {}", e)),
    }
}

fn test_baud_query(module: &mut Module) -> TestResult {
    let from_dump = (module.params().baud, module.params().parity);

    let result = module
        .query(Field::Baud)
        .and_then(|_| module.read_answer())
        .and_then(|_| module.parse_baud_and_parity());

    match result {
        Ok(()) if (module.params().baud, module.params().parity) == from_dump => {
            TestResult::pass("test")
        }
        Ok(()) => TestResult::fail(
            "test",
            &format!(
                "Query gave {:?}/{:?}, dump gave {:?}/{:?}",
                module.params().baud,
                module.params().parity,
                from_dump.0,
                from_dump.1
            ),
        ),
        Err(e) => TestResult::fail("test", &format!("{} (reply {:?})", e, reply_text(module))),
    }
}

fn test_led_round_trip(module: &mut Module) -> TestResult {
    if let Err(e) = acknowledged(module, |m| m.set_led(LedState::On)) {
        return TestResult::fail("test", &format!("Set failed: {} (reply {:?})", e, reply_text(module)));
    }

    let result = module
        .query(Field::Led)
        .and_then(|_| module.read_answer())
        .and_then(|_| module.parse_led());

    match result {
        Ok(()) if module.params().led == LedState::On => TestResult::pass("test"),
        Ok(()) => TestResult::fail("test", &format!("LED reads {:?}", module.params().led)),
        Err(e) => TestResult::fail("test", &format!("{} (reply {:?})", e, reply_text(module))),
    }
}

fn test_aint_round_trip(module: &mut Module) -> TestResult {
    let wanted = 320;

    if let Err(e) = acknowledged(module, |m| m.set_aint(wanted)) {
        return TestResult::fail("test", &format!("Set failed: {} (reply {:?})", e, reply_text(module)));
    }

    let result = module
        .query(Field::AdvertisingInterval)
        .and_then(|_| module.read_answer())
        .and_then(|_| module.parse_aint());

    match result {
        Ok(()) if module.params().aint == wanted => TestResult::pass("test"),
        Ok(()) => TestResult::fail("test", &format!("Interval reads {}", module.params().aint)),
        Err(e) => TestResult::fail("test", &format!("{} (reply {:?})", e, reply_text(module))),
    }
}

fn test_local_validation(module: &mut Module) -> TestResult {
    match module.set_cint_min_max(100, 50) {
        Err(Error::ValidationFailed) => {}
        other => return TestResult::fail("test", &format!("Expected ValidationFailed, got {:?}", other)),
    }

    // Nothing went out, so the module has nothing to answer
    match module.read_answer() {
        Ok(0) => TestResult::pass("test"),
        Ok(n) => TestResult::fail("test", &format!("Module answered {} bytes: {:?}", n, reply_text(module))),
        Err(e) => TestResult::fail("test", &format!("Error: {}", e)),
    }
}
