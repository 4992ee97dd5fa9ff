//! JUnit XML document tree.
//!
//! [`convert`] maps a validated [`Report`] onto a [`JUnitSuite`], which is
//! then serialized with quick-xml. The produced layout is:
//!
//! ```text
//! <testsuite name tests errors failures>
//!   <properties>
//!     <property name="compiled" value/>
//!     <property name="time" value/>
//!     <property name="ucunit-version" value/>
//!   </properties>
//!   <testcase name>
//!     <system-out><![CDATA[passed check lines]]></system-out>
//!     <failure>non-passed check lines</failure>   (only if the test case failed)
//!   </testcase>
//! </testsuite>
//! ```

use std::io::Write;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::ReportError;
use crate::model::Report;

/// Conversion switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Emit `checks-passed` / `checks-failed` properties when the report has them
    pub check_counts: bool,
}

/// Root `testsuite` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JUnitSuite {
    pub name: String,
    pub tests: u128,
    pub errors: u64,
    pub failures: u64,
    pub properties: Vec<Property>,
    pub testcases: Vec<JUnitCase>,
}

/// A `property` element inside `properties`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub value: String,
}

/// A `testcase` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JUnitCase {
    pub name: String,
    /// Text of the `system-out` element, always present
    pub system_out: String,
    /// Text of the `failure` element; `None` means no element
    pub failure: Option<String>,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Convert a report with default options.
pub fn convert(report: &Report) -> JUnitSuite {
    convert_with(report, &ConvertOptions::default())
}

/// Convert a report into its JUnit document tree.
pub fn convert_with(report: &Report, options: &ConvertOptions) -> JUnitSuite {
    let mut properties = vec![
        Property::new("compiled", report.compiled.as_str()),
        Property::new("time", report.time.as_str()),
        Property::new("ucunit-version", report.version.as_str()),
    ];
    if options.check_counts {
        if let Some(n) = report.checks_passed {
            properties.push(Property::new("checks-passed", n.to_string()));
        }
        if let Some(n) = report.checks_failed {
            properties.push(Property::new("checks-failed", n.to_string()));
        }
    }

    let testcases: Vec<JUnitCase> = report
        .testcases
        .iter()
        .map(|tc| JUnitCase {
            name: tc.name.clone(),
            system_out: tc.passed_lines(),
            failure: (!tc.is_passed()).then(|| tc.failure_lines()),
        })
        .collect();

    tracing::debug!(
        suite = %report.name,
        testcases = testcases.len(),
        failing = testcases.iter().filter(|tc| tc.failure.is_some()).count(),
        "converted report"
    );

    JUnitSuite {
        name: report.name.clone(),
        tests: report.total_tests(),
        errors: 0,
        failures: report.failed,
        properties,
        testcases,
    }
}

impl JUnitSuite {
    /// Serialize to a string, prolog included.
    pub fn to_xml(&self) -> Result<String, ReportError> {
        let mut buf = Vec::new();
        self.write_xml(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Serialize into any writer.
    pub fn write_xml<W: Write>(&self, out: W) -> Result<(), ReportError> {
        let mut writer = Writer::new(out);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let tests = self.tests.to_string();
        let errors = self.errors.to_string();
        let failures = self.failures.to_string();
        let mut root = BytesStart::new("testsuite");
        root.push_attribute(("name", self.name.as_str()));
        root.push_attribute(("tests", tests.as_str()));
        root.push_attribute(("errors", errors.as_str()));
        root.push_attribute(("failures", failures.as_str()));
        writer.write_event(Event::Start(root))?;

        writer.write_event(Event::Start(BytesStart::new("properties")))?;
        for property in &self.properties {
            let mut element = BytesStart::new("property");
            element.push_attribute(("name", property.name.as_str()));
            element.push_attribute(("value", property.value.as_str()));
            writer.write_event(Event::Empty(element))?;
        }
        writer.write_event(Event::End(BytesEnd::new("properties")))?;

        for testcase in &self.testcases {
            write_testcase(&mut writer, testcase)?;
        }

        writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
        Ok(())
    }
}

fn write_testcase<W: Write>(writer: &mut Writer<W>, testcase: &JUnitCase) -> Result<(), ReportError> {
    let mut element = BytesStart::new("testcase");
    element.push_attribute(("name", testcase.name.as_str()));
    writer.write_event(Event::Start(element))?;

    writer.write_event(Event::Start(BytesStart::new("system-out")))?;
    for section in cdata_sections(&testcase.system_out) {
        writer.write_event(Event::CData(BytesCData::new(section)))?;
    }
    writer.write_event(Event::End(BytesEnd::new("system-out")))?;

    if let Some(ref failure) = testcase.failure {
        writer.write_event(Event::Start(BytesStart::new("failure")))?;
        writer.write_event(Event::Text(BytesText::new(failure.as_str())))?;
        writer.write_event(Event::End(BytesEnd::new("failure")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    Ok(())
}

/// Split text so no section contains `]]>`; adjacent sections concatenate back
/// to the original text.
fn cdata_sections(text: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find("]]>") {
        sections.push(&rest[..pos + 2]);
        rest = &rest[pos + 2..];
    }
    sections.push(rest);
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MINIMAL: &str = r#"{"name":"S","passed":"1","failed":"0","compiled":"d","time":"t","version":"v","testcases":[{"testcasename":"T","result":"passed","checks":[{"file":"f.c","line":"3","msg":"m","args":"a","result":"passed"}]}]}"#;

    fn report(value: serde_json::Value) -> Report {
        Report::from_value(value).unwrap()
    }

    fn failing_report() -> Report {
        report(json!({
            "name": "Suite",
            "passed": 3,
            "failed": "2",
            "compiled": "Jan  1 2018",
            "time": "10:00:00",
            "version": "1.0",
            "testcases": [
                {
                    "testcasename": "Fails",
                    "result": "failed",
                    "checks": [
                        {"file": "a.c", "line": "1", "msg": "IsTrue", "args": "x", "result": "passed"},
                        {"file": "a.c", "line": "2", "msg": "IsEqual", "args": "a < b && c", "result": "failed"}
                    ]
                },
                {
                    "testcasename": "PassesWithFailedCheck",
                    "result": "passed",
                    "checks": [
                        {"file": "b.c", "line": "7", "msg": "IsNull", "args": "p", "result": "failed"}
                    ]
                }
            ]
        }))
    }

    #[test]
    fn test_minimal_report_xml() {
        let report = Report::from_slice(MINIMAL.as_bytes()).unwrap();
        let xml = convert(&report).to_xml().unwrap();
        assert_eq!(
            xml,
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8"?>"#,
                r#"<testsuite name="S" tests="1" errors="0" failures="0">"#,
                r#"<properties>"#,
                r#"<property name="compiled" value="d"/>"#,
                r#"<property name="time" value="t"/>"#,
                r#"<property name="ucunit-version" value="v"/>"#,
                r#"</properties>"#,
                "<testcase name=\"T\"><system-out><![CDATA[f.c:3 m(a) passed\n]]></system-out></testcase>",
                r#"</testsuite>"#
            )
        );
    }

    #[test]
    fn test_suite_counts() {
        let suite = convert(&failing_report());
        assert_eq!(suite.tests, 5);
        assert_eq!(suite.failures, 2);
        assert_eq!(suite.errors, 0);

        let xml = suite.to_xml().unwrap();
        assert!(xml.contains(r#"tests="5" errors="0" failures="2""#));
    }

    #[test]
    fn test_failure_only_for_failed_testcase() {
        let suite = convert(&failing_report());
        assert_eq!(suite.testcases.len(), 2);

        let failed = &suite.testcases[0];
        assert_eq!(failed.system_out, "a.c:1 IsTrue(x) passed\n");
        assert_eq!(
            failed.failure.as_deref(),
            Some("a.c:2 IsEqual(a < b && c) failed\n")
        );

        let passed = &suite.testcases[1];
        assert_eq!(passed.system_out, "");
        assert!(passed.failure.is_none());
    }

    #[test]
    fn test_failure_text_escaped() {
        let xml = convert(&failing_report()).to_xml().unwrap();
        assert!(xml.contains("<failure>a.c:2 IsEqual(a &lt; b &amp;&amp; c) failed\n</failure>"));
        assert_eq!(xml.matches("<failure>").count(), 1);
    }

    #[test]
    fn test_failed_testcase_without_failed_checks_has_empty_failure() {
        let report = report(json!({
            "name": "S", "passed": "0", "failed": "1",
            "compiled": "d", "time": "t", "version": "v",
            "testcases": [{"testcasename": "T", "result": "failed", "checks": [{}]}]
        }));
        let xml = convert(&report).to_xml().unwrap();
        assert!(xml.contains("<system-out><![CDATA[]]></system-out><failure></failure>"));
    }

    #[test]
    fn test_system_out_keeps_markup_raw() {
        let report = report(json!({
            "name": "S", "passed": "1", "failed": "0",
            "compiled": "d", "time": "t", "version": "v",
            "testcases": [{
                "testcasename": "T",
                "result": "passed",
                "checks": [{"file": "f.c", "line": "1", "msg": "IsEqual", "args": "a<b & c", "result": "passed"}]
            }]
        }));
        let xml = convert(&report).to_xml().unwrap();
        assert!(xml.contains("<![CDATA[f.c:1 IsEqual(a<b & c) passed\n]]>"));
    }

    #[test]
    fn test_cdata_terminator_split() {
        assert_eq!(cdata_sections("plain"), vec!["plain"]);
        assert_eq!(cdata_sections(""), vec![""]);
        assert_eq!(cdata_sections("a]]>b"), vec!["a]]", ">b"]);
        assert_eq!(cdata_sections("]]>]]>"), vec!["]]", ">]]", ">"]);
        assert_eq!(cdata_sections("x]]>y]]>z").concat(), "x]]>y]]>z");
    }

    #[test]
    fn test_cdata_terminator_in_message() {
        let suite = JUnitSuite {
            name: "S".to_string(),
            tests: 1,
            errors: 0,
            failures: 0,
            properties: Vec::new(),
            testcases: vec![JUnitCase {
                name: "T".to_string(),
                system_out: "buf[a[i]]>0".to_string(),
                failure: None,
            }],
        };
        let xml = suite.to_xml().unwrap();
        assert!(xml.contains("<system-out><![CDATA[buf[a[i]]]]><![CDATA[>0]]></system-out>"));
    }

    #[test]
    fn test_attribute_escaping() {
        let report = report(json!({
            "name": "A&B \"suite\"", "passed": "0", "failed": "0",
            "compiled": "<d>", "time": "t", "version": "v",
            "testcases": []
        }));
        let xml = convert(&report).to_xml().unwrap();
        assert!(xml.contains(r#"name="A&amp;B &quot;suite&quot;""#));
        assert!(xml.contains(r#"value="&lt;d&gt;""#));
    }

    #[test]
    fn test_unnamed_records_not_emitted() {
        let report = report(json!({
            "name": "S", "passed": "1", "failed": "0",
            "compiled": "d", "time": "t", "version": "v",
            "testcases": [{}, {"testcasename": "Only", "result": "passed", "checks": []}, {}]
        }));
        let xml = convert(&report).to_xml().unwrap();
        assert_eq!(xml.matches("<testcase ").count(), 1);
        assert!(xml.contains(r#"<testcase name="Only">"#));
    }

    #[test]
    fn test_testcase_order_preserved() {
        let report = report(json!({
            "name": "S", "passed": "3", "failed": "0",
            "compiled": "d", "time": "t", "version": "v",
            "testcases": [
                {"testcasename": "c", "result": "passed", "checks": []},
                {"testcasename": "a", "result": "passed", "checks": []},
                {"testcasename": "b", "result": "passed", "checks": []}
            ]
        }));
        let names: Vec<_> = convert(&report).testcases.into_iter().map(|tc| tc.name).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_check_count_properties() {
        let report = report(json!({
            "name": "S", "passed": "1", "failed": "0",
            "compiled": "d", "time": "t", "version": "v",
            "testcases": [],
            "checksPassed": "12", "checksFailed": "0"
        }));

        let plain = convert(&report);
        assert_eq!(plain.properties.len(), 3);

        let extended = convert_with(&report, &ConvertOptions { check_counts: true });
        assert_eq!(
            extended.properties[3..],
            [Property::new("checks-passed", "12"), Property::new("checks-failed", "0")]
        );
    }
}
