//! uCUnit JSON report model.
//!
//! A report is decoded into loosely typed raw records and validated once into
//! [`Report`]. Validation turns every schema deviation into a [`ReportError`]
//! naming the offending field, so conversion itself never fails.

use std::io::Read;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ReportError;

/// Result literal marking a passed check or test case.
pub const PASSED: &str = "passed";

#[derive(Debug, Deserialize)]
struct RawReport {
    name: Option<Value>,
    passed: Option<Value>,
    failed: Option<Value>,
    compiled: Option<Value>,
    time: Option<Value>,
    version: Option<Value>,
    testcases: Option<Value>,
    #[serde(rename = "checksPassed")]
    checks_passed: Option<Value>,
    #[serde(rename = "checksFailed")]
    checks_failed: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawTestCase {
    testcasename: Option<Value>,
    result: Option<Value>,
    checks: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawCheck {
    file: Option<Value>,
    line: Option<Value>,
    msg: Option<Value>,
    args: Option<Value>,
    result: Option<Value>,
}

/// A validated uCUnit test report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Suite identifier
    pub name: String,
    /// Number of passed test cases
    pub passed: u64,
    /// Number of failed test cases
    pub failed: u64,
    /// Build date of the test executable
    pub compiled: String,
    /// Build time of the test executable
    pub time: String,
    /// uCUnit version that produced the report
    pub version: String,
    /// Named test cases, in report order
    pub testcases: Vec<TestCase>,
    /// Number of passed checks, when the report carries it
    pub checks_passed: Option<u64>,
    /// Number of failed checks, when the report carries it
    pub checks_failed: Option<u64>,
    /// Test case records dropped for lacking a `testcasename`
    pub skipped_records: usize,
}

/// One named group of checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    pub result: String,
    /// Checks that carry a result, in report order
    pub checks: Vec<Check>,
}

/// One assertion inside a test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub file: String,
    pub line: String,
    pub msg: String,
    pub args: String,
    pub result: String,
}

impl Report {
    /// Decode and validate a report from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ReportError> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Decode and validate a report from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ReportError> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(value)
    }

    /// Validate an already decoded JSON document.
    pub fn from_value(value: Value) -> Result<Self, ReportError> {
        if !value.is_object() {
            return Err(ReportError::invalid("<root>", "an object"));
        }
        let raw: RawReport = serde_json::from_value(value)?;

        let name = required_string("name", raw.name)?;
        let passed = required_count("passed", raw.passed)?;
        let failed = required_count("failed", raw.failed)?;
        let compiled = required_string("compiled", raw.compiled)?;
        let time = required_string("time", raw.time)?;
        let version = required_string("version", raw.version)?;

        let entries = match raw.testcases {
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(ReportError::invalid("testcases", "an array")),
            None => return Err(ReportError::missing("testcases")),
        };

        let mut testcases = Vec::with_capacity(entries.len());
        let mut skipped_records = 0;
        for (index, entry) in entries.into_iter().enumerate() {
            match validate_testcase(index, entry)? {
                Some(tc) => testcases.push(tc),
                None => skipped_records += 1,
            }
        }

        let checks_passed = optional_count("checksPassed", raw.checks_passed)?;
        let checks_failed = optional_count("checksFailed", raw.checks_failed)?;

        tracing::debug!(
            suite = %name,
            testcases = testcases.len(),
            skipped_records,
            "validated report"
        );

        Ok(Self {
            name,
            passed,
            failed,
            compiled,
            time,
            version,
            testcases,
            checks_passed,
            checks_failed,
            skipped_records,
        })
    }

    /// Total number of test cases, `passed + failed`.
    pub fn total_tests(&self) -> u128 {
        u128::from(self.passed) + u128::from(self.failed)
    }
}

impl TestCase {
    pub fn is_passed(&self) -> bool {
        self.result == PASSED
    }

    /// Concatenated lines of passed checks.
    pub fn passed_lines(&self) -> String {
        self.checks.iter().filter(|c| c.is_passed()).map(Check::to_line).collect()
    }

    /// Concatenated lines of every check that did not pass.
    pub fn failure_lines(&self) -> String {
        self.checks.iter().filter(|c| !c.is_passed()).map(Check::to_line).collect()
    }
}

impl Check {
    pub fn is_passed(&self) -> bool {
        self.result == PASSED
    }

    /// Format as `<file>:<line> <msg>(<args>) <result>\n`.
    pub fn to_line(&self) -> String {
        format!(
            "{}:{} {}({}) {}\n",
            self.file, self.line, self.msg, self.args, self.result
        )
    }
}

fn validate_testcase(index: usize, entry: Value) -> Result<Option<TestCase>, ReportError> {
    let path = format!("testcases[{}]", index);
    if !entry.is_object() {
        return Err(ReportError::invalid(path, "an object"));
    }
    let raw: RawTestCase = serde_json::from_value(entry)?;

    let name = match raw.testcasename {
        Some(Value::String(name)) => xml_text(&format!("{}.testcasename", path), name)?,
        Some(_) => return Err(ReportError::invalid(format!("{}.testcasename", path), "a string")),
        None => return Ok(None),
    };
    let result = required_string(&format!("{}.result", path), raw.result)?;

    let raw_checks = match raw.checks {
        Some(Value::Array(checks)) => checks,
        Some(_) => return Err(ReportError::invalid(format!("{}.checks", path), "an array")),
        None => return Err(ReportError::missing(format!("{}.checks", path))),
    };

    let mut checks = Vec::with_capacity(raw_checks.len());
    for (check_index, value) in raw_checks.into_iter().enumerate() {
        let check_path = format!("{}.checks[{}]", path, check_index);
        if !value.is_object() {
            return Err(ReportError::invalid(check_path, "an object"));
        }
        let raw: RawCheck = serde_json::from_value(value)?;
        if let Some(check) = validate_check(&name, check_index, &check_path, raw)? {
            checks.push(check);
        }
    }

    Ok(Some(TestCase { name, result, checks }))
}

fn validate_check(
    testcase: &str,
    index: usize,
    path: &str,
    raw: RawCheck,
) -> Result<Option<Check>, ReportError> {
    let result = match raw.result {
        Some(Value::String(result)) => xml_text(&format!("{}.result", path), result)?,
        Some(_) => return Err(ReportError::invalid(format!("{}.result", path), "a string")),
        None => return Ok(None),
    };

    let field = |name: &'static str, value: Option<Value>| -> Result<String, ReportError> {
        match value {
            Some(value) => scalar_text(&format!("{}.{}", path, name), value),
            None => Err(ReportError::MalformedCheck {
                testcase: testcase.to_string(),
                index,
                field: name,
            }),
        }
    };

    Ok(Some(Check {
        file: field("file", raw.file)?,
        line: field("line", raw.line)?,
        msg: field("msg", raw.msg)?,
        args: field("args", raw.args)?,
        result,
    }))
}

fn required_string(field: &str, value: Option<Value>) -> Result<String, ReportError> {
    match value {
        Some(Value::String(s)) => xml_text(field, s),
        Some(_) => Err(ReportError::invalid(field, "a string")),
        None => Err(ReportError::missing(field)),
    }
}

fn required_count(field: &str, value: Option<Value>) -> Result<u64, ReportError> {
    match value {
        Some(value) => parse_count(field, &value),
        None => Err(ReportError::missing(field)),
    }
}

fn optional_count(field: &str, value: Option<Value>) -> Result<Option<u64>, ReportError> {
    value.map(|v| parse_count(field, &v)).transpose()
}

/// Counts arrive either as JSON integers or as decimal strings. Integral
/// floats such as `2.0` are accepted too.
fn parse_count(field: &str, value: &Value) -> Result<u64, ReportError> {
    let parsed = match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(integral_count)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ReportError::MalformedCount {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn integral_count(f: f64) -> Option<u64> {
    if f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

fn scalar_text(field: &str, value: Value) -> Result<String, ReportError> {
    match value {
        Value::String(s) => xml_text(field, s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(ReportError::invalid(field, "a string, number or boolean")),
    }
}

/// Reject characters outside the XML 1.0 `Char` production.
fn xml_text(field: &str, s: String) -> Result<String, ReportError> {
    if s.chars().all(is_xml_char) {
        Ok(s)
    } else {
        Err(ReportError::invalid(field, "text without XML control characters"))
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}
