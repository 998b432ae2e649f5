//! Integration tests for the public analysis API.
//!
//! These tests run the analyzers over the fixtures in `testdata/` and check
//! the properties every analysis must satisfy.

use std::path::PathBuf;

use stdinfer::{
    analyze_code, generate_input_hints, generate_sample_input, validate_input, InputFormat,
    InputType, Language,
};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn analyze_fixture(name: &str, tag: &str) -> InputFormat {
    let source = std::fs::read_to_string(testdata_path().join(name))
        .unwrap_or_else(|e| panic!("should read {}: {}", name, e));
    analyze_code(&source, tag)
}

/// (name, type, is_array) for each requirement, in order.
fn shape(format: &InputFormat) -> Vec<(String, InputType, bool)> {
    format
        .requirements
        .iter()
        .map(|r| (r.display_name().to_string(), r.input_type, r.is_array))
        .collect()
}

fn req(name: &str, input_type: InputType, is_array: bool) -> (String, InputType, bool) {
    (name.to_string(), input_type, is_array)
}

const FIXTURES: &[(&str, &str)] = &[
    ("sum.c", "c"),
    ("matrix.cpp", "cpp"),
    ("solution.py", "python"),
    ("Main.java", "java"),
    ("prompt.js", "javascript"),
    ("Main.kt", "kotlin"),
    ("Program.cs", "csharp"),
    ("main.go", "go"),
    ("stdin_parse.rs", "rust"),
];

// =============================================================================
// Fixtures
// =============================================================================

#[test]
fn test_c_fixture() {
    let format = analyze_fixture("sum.c", "c");
    assert_eq!(
        shape(&format),
        vec![
            req("a", InputType::Int, false),
            req("b", InputType::Float, false),
            req("name", InputType::Line, false),
            req("c", InputType::Char, false),
        ]
    );
    assert_eq!(format.total_lines, 2);
    assert_eq!(format.confidence, 0.7);
}

#[test]
fn test_cpp_fixture() {
    let format = analyze_fixture("matrix.cpp", "c++");
    assert_eq!(
        shape(&format),
        vec![
            req("rows", InputType::Int, false),
            req("cols", InputType::Int, false),
            req("scale", InputType::Float, false),
            req("title", InputType::Line, false),
            req("sep", InputType::Char, false),
        ]
    );
    assert_eq!(format.total_lines, 3);
}

#[test]
fn test_python_fixture() {
    let format = analyze_fixture("solution.py", "python3");
    assert_eq!(
        shape(&format),
        vec![
            req("n", InputType::Int, false),
            req("nums", InputType::Int, true),
            req("w", InputType::String, false),
            req("h", InputType::String, false),
            req("ratio", InputType::Float, false),
            req("name", InputType::String, false),
            req("line", InputType::Line, false),
        ]
    );
    assert_eq!(format.total_lines, 7);
    assert_eq!(format.confidence, 0.9);
}

#[test]
fn test_java_fixture() {
    let format = analyze_fixture("Main.java", "java");
    assert_eq!(
        shape(&format),
        vec![
            req("n", InputType::Int, false),
            req("avg", InputType::Float, false),
            req("word", InputType::String, false),
            req("title", InputType::Line, false),
            req("k", InputType::Int, false),
        ]
    );
}

#[test]
fn test_javascript_fixture() {
    let format = analyze_fixture("prompt.js", "js");
    assert_eq!(
        shape(&format),
        vec![
            req("name", InputType::String, false),
            req("age", InputType::Int, false),
            req("intInput1", InputType::Int, false),
            req("city", InputType::String, false),
        ]
    );
}

#[test]
fn test_kotlin_fixture() {
    let format = analyze_fixture("Main.kt", "kotlin");
    assert_eq!(
        shape(&format),
        vec![
            req("n", InputType::Int, false),
            req("nums", InputType::Int, true),
            req("words", InputType::String, true),
            req("name", InputType::String, false),
        ]
    );
}

#[test]
fn test_csharp_fixture() {
    let format = analyze_fixture("Program.cs", "c#");
    assert_eq!(
        shape(&format),
        vec![
            req("n", InputType::Int, false),
            req("xs", InputType::Int, true),
            req("d", InputType::Float, false),
            req("name", InputType::String, false),
        ]
    );
}

#[test]
fn test_go_fixture() {
    let format = analyze_fixture("main.go", "golang");
    assert_eq!(
        shape(&format),
        vec![
            req("count", InputType::Int, false),
            req("line", InputType::String, false),
            req("n", InputType::Int, false),
        ]
    );
}

#[test]
fn test_rust_fixture() {
    let format = analyze_fixture("stdin_parse.rs", "rs");
    assert_eq!(
        shape(&format),
        vec![
            req("n", InputType::Int, false),
            req("values", InputType::Int, true),
            req("name", InputType::String, false),
        ]
    );
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_empty_source_for_every_language() {
    for lang in Language::ALL {
        for tag in lang.aliases() {
            let format = analyze_code("", tag);
            assert!(format.requirements.is_empty(), "{} produced requirements", tag);
            assert!(format.errors.is_empty(), "{} produced errors", tag);
        }
    }
}

#[test]
fn test_unsupported_tags_report_one_error() {
    for tag in ["COBOL", "ruby", "", "python4", "typescript"] {
        let format = analyze_code("x = input()", tag);
        assert!(format.requirements.is_empty());
        assert_eq!(format.errors.len(), 1, "tag {:?}", tag);
        assert_eq!(format.confidence, 0.0);
    }
}

#[test]
fn test_analysis_is_idempotent() {
    for (file, tag) in FIXTURES {
        let first = analyze_fixture(file, tag);
        let second = analyze_fixture(file, tag);
        assert_eq!(first.requirements, second.requirements, "{}", file);
        assert_eq!(first.total_lines, second.total_lines);
        assert_eq!(first.confidence, second.confidence);
    }
}

#[test]
fn test_generated_examples_validate() {
    for (file, tag) in FIXTURES {
        let format = analyze_fixture(file, tag);
        assert!(format.has_requirements(), "{} has no requirements", file);
        assert_eq!(format.examples.len(), 3);

        for example in &format.examples {
            let result = validate_input(example, &format);
            assert!(
                result.is_valid,
                "{}: example {:?} rejected: {:?}",
                file, example, result.errors
            );
        }

        let sample = generate_sample_input(&format);
        assert!(format.examples.contains(&sample));
    }
}

#[test]
fn test_specific_rule_wins_over_bare_input() {
    let format = analyze_code("x = int(input())\nx = input()\n", "python");
    assert_eq!(shape(&format), vec![req("x", InputType::Int, false)]);

    let format = analyze_code("val n = readLine()!!.toInt()\n", "kotlin");
    assert_eq!(format.requirements.len(), 1);
}

#[test]
fn test_commented_reads_are_ignored() {
    let format = analyze_code("/* scanf(\"%d\", &n); */\n// gets(buf);\n", "c");
    assert!(format.requirements.is_empty());

    let format = analyze_code("# n = int(input())\nprint('# input()')\n", "python");
    assert!(format.requirements.is_empty());
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_python_cast_then_split() {
    let format = analyze_code("x = int(input())\ny = input().split()\n", "python");
    assert_eq!(
        shape(&format),
        vec![req("x", InputType::Int, false), req("y", InputType::String, true)]
    );
}

#[test]
fn test_c_scanf_strips_address_of() {
    let format = analyze_code("int a; float b;\nscanf(\"%d %f\", &a, &b);\n", "c");
    assert_eq!(
        shape(&format),
        vec![req("a", InputType::Int, false), req("b", InputType::Float, false)]
    );
}

#[test]
fn test_go_conversion_of_read_string() {
    let source = r#"
reader := bufio.NewReader(os.Stdin)
line, _ := reader.ReadString('\n')
n, _ := strconv.Atoi(line)
"#;
    let format = analyze_code(source, "go");
    let lines: Vec<_> = format
        .requirements
        .iter()
        .filter(|r| r.name.as_deref() == Some("line"))
        .collect();
    let ns: Vec<_> = format
        .requirements
        .iter()
        .filter(|r| r.name.as_deref() == Some("n"))
        .collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].input_type, InputType::String);
    assert_eq!(ns.len(), 1);
    assert_eq!(ns[0].input_type, InputType::Int);
}

#[test]
fn test_validate_rejects_non_integer() {
    let format = analyze_code("n = int(input())", "python");
    let result = validate_input("abc\n", &format);
    assert!(!result.is_valid);
    assert_eq!(result.errors, vec!["Invalid int value: \"abc\" for n"]);
}

#[test]
fn test_validate_accepts_u64_max() {
    let source = "let mut s = String::new();\nio::stdin().read_line(&mut s).unwrap();\nlet n: u64 = s.trim().parse().unwrap();\n";
    let format = analyze_code(source, "rust");
    assert_eq!(shape(&format), vec![req("n", InputType::Int, false)]);

    let result = validate_input("18446744073709551615", &format);
    assert!(result.is_valid, "{:?}", result.errors);
}

#[test]
fn test_java_scanner_parameter() {
    let format = analyze_code(
        "static void solve(Scanner in) { int n = in.nextInt(); String s = in.next(); }",
        "java",
    );
    assert_eq!(
        shape(&format),
        vec![req("n", InputType::Int, false), req("s", InputType::String, false)]
    );
}

#[test]
fn test_cobol_is_unsupported() {
    let format = analyze_code("DISPLAY 'HELLO'.", "COBOL");
    assert!(format.requirements.is_empty());
    assert_eq!(
        format.errors,
        vec!["Language COBOL not supported for input analysis"]
    );
    assert_eq!(format.confidence, 0.0);
}

#[test]
fn test_hints_for_single_int() {
    let format = analyze_code("n = int(input())", "python");
    assert_eq!(generate_input_hints(&format), "Line 1: Input integer value for n");
}
