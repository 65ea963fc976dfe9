use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};

use kmpgen::config::GeneratorConfig;
use kmpgen::error::{ErrorKind, KmpgenError, Result};
use kmpgen::materialize::{ProcessOutput, SetupRunner};
use kmpgen::path_guard::PathError;
use kmpgen::report::ErrorPayload;
use kmpgen::{GenerationRequest, Generator};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn test_config() -> GeneratorConfig {
    GeneratorConfig {
        template_root: fixture_path("kmp-template"),
        setup_timeout_secs: 60,
        ..GeneratorConfig::default()
    }
    .validate()
    .unwrap()
}

fn request(output: &Path) -> GenerationRequest {
    GenerationRequest {
        project_name: "WeatherApp".into(),
        package_name: "com.acme.weather".into(),
        output_dir: output.to_str().unwrap().into(),
        bundle_id: None,
    }
}

/// Stands in for the setup script: exits with a fixed code and touches nothing.
struct FakeRunner {
    exit_code: i32,
    calls: Cell<usize>,
}

impl FakeRunner {
    fn exiting(exit_code: i32) -> Self {
        Self {
            exit_code,
            calls: Cell::new(0),
        }
    }
}

impl SetupRunner for FakeRunner {
    fn script(&self) -> &str {
        "setup.sh"
    }

    fn run(&self, _cwd: &Path, _stdin_payload: &str) -> Result<ProcessOutput> {
        self.calls.set(self.calls.get() + 1);
        Ok(ProcessOutput {
            exit_code: Some(self.exit_code),
            stdout: String::new(),
            stderr: format!("fake exit {}", self.exit_code),
            truncated: false,
        })
    }
}

#[cfg(unix)]
#[test]
fn test_generate_then_validate_is_clean() {
    let out = tempfile::tempdir().unwrap();
    let target = out.path().join("out1");
    let generator = Generator::from_config(test_config());

    let report = generator.generate(&request(&target)).unwrap();

    assert!(report.success);
    assert!(report.is_clean(), "unexpected references: {report:?}");
    assert_eq!(report.process_exit_code, Some(0));
    assert_eq!(report.bundle_id, "com.acme.weather");
    assert!(report
        .materialization_diagnostics
        .contains("Configured WeatherApp"));

    let greeting = target.join("shared/src/commonMain/kotlin/com/template/shared/Greeting.kt");
    let content = fs::read_to_string(greeting).unwrap();
    assert!(content.contains("package com.acme.weather.shared"));
    assert!(content.contains("Hello from WeatherApp"));

    let plist = fs::read_to_string(target.join("iosApp/iosApp/Info.plist")).unwrap();
    assert!(plist.contains("<string>com.acme.weather</string>"));

    assert!(!target.join("mcp").exists(), "generator tooling must not leak");
    assert!(!target.join("setup.sh").exists());

    let scan = generator.validate(target.to_str().unwrap()).unwrap();
    assert!(scan.is_clean);
    assert!(scan.references.is_empty());
}

#[cfg(unix)]
#[test]
fn test_generate_passes_custom_bundle_id() {
    let out = tempfile::tempdir().unwrap();
    let target = out.path().join("app");
    let mut req = request(&target);
    req.bundle_id = Some("com.Acme.Weather-iOS".into());

    let report = Generator::from_config(test_config())
        .generate(&req)
        .unwrap();

    assert_eq!(report.bundle_id, "com.Acme.Weather-iOS");
    let plist = fs::read_to_string(target.join("iosApp/iosApp/Info.plist")).unwrap();
    assert!(plist.contains("<string>com.Acme.Weather-iOS</string>"));
}

#[test]
fn test_generate_into_system_directory_is_rejected() {
    let runner = FakeRunner::exiting(0);
    let generator = Generator::new(test_config(), runner);

    let err = generator
        .generate(&request(Path::new("/etc/weather")))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PathSecurity);
    assert!(matches!(
        err,
        KmpgenError::PathSecurity {
            source: PathError::SystemDirectory { .. },
            ..
        }
    ));
    assert!(!Path::new("/etc/weather").exists());
}

#[test]
fn test_generate_into_non_empty_directory_is_rejected() {
    let out = tempfile::tempdir().unwrap();
    fs::write(out.path().join("notes.txt"), "keep me").unwrap();
    let generator = Generator::new(test_config(), FakeRunner::exiting(0));

    let err = generator.generate(&request(out.path())).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PreexistingTarget);
    let entries: Vec<_> = fs::read_dir(out.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec!["notes.txt"]);
    assert_eq!(
        fs::read_to_string(out.path().join("notes.txt")).unwrap(),
        "keep me"
    );
}

#[test]
fn test_generate_twice_into_same_target_fails_second_time() {
    let out = tempfile::tempdir().unwrap();
    let target = out.path().join("twice");
    let generator = Generator::new(test_config(), FakeRunner::exiting(0));

    generator.generate(&request(&target)).unwrap();
    let err = generator.generate(&request(&target)).unwrap_err();

    assert!(matches!(err, KmpgenError::OutputExists { .. }));
}

#[test]
fn test_invalid_identifiers_create_nothing() {
    let out = tempfile::tempdir().unwrap();
    let target = out.path().join("never");
    let generator = Generator::new(test_config(), FakeRunner::exiting(0));

    let mut req = request(&target);
    req.package_name = "com.class.app".into();
    let err = generator.generate(&req).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ReservedName);
    assert!(err.to_string().contains("'class'"));
    assert!(!target.exists());

    let mut req = request(&target);
    req.project_name = "My-App".into();
    assert_eq!(
        generator.generate(&req).unwrap_err().kind(),
        ErrorKind::InputFormat
    );
    assert!(!target.exists());
}

#[test]
fn test_failed_setup_is_an_error_and_leaves_the_copy() {
    let out = tempfile::tempdir().unwrap();
    let target = out.path().join("broken");
    let generator = Generator::new(test_config(), FakeRunner::exiting(2));

    let err = generator.generate(&request(&target)).unwrap_err();

    match &err {
        KmpgenError::SetupFailed {
            exit_code,
            diagnostics,
            ..
        } => {
            assert_eq!(*exit_code, Some(2));
            assert_eq!(diagnostics, "fake exit 2");
        }
        other => panic!("expected SetupFailed, got: {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::ExternalProcess);
    assert!(target.join("settings.gradle.kts").exists());

    let json = serde_json::to_value(ErrorPayload::from(&err)).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["processExitCode"], 2);
    let reported = PathBuf::from(json["targetPath"].as_str().unwrap());
    assert_eq!(reported, fs::canonicalize(&target).unwrap());
}

#[test]
fn test_unparameterized_output_is_a_warning_not_a_failure() {
    let out = tempfile::tempdir().unwrap();
    let target = out.path().join("raw");
    let runner = FakeRunner::exiting(0);
    let generator = Generator::new(test_config(), runner);

    let report = generator.generate(&request(&target)).unwrap();

    assert!(report.success);
    assert!(!report.is_clean());
    let scan = report.scan_report.as_ref().unwrap();
    assert!(scan
        .references
        .iter()
        .any(|r| r.line_text.contains("package com.template.shared")));
    assert!(report.scan_error.is_none());
}

#[test]
fn test_validate_reports_each_line_and_skips_benign_comment() {
    let project = tempfile::tempdir().unwrap();
    let root = project.path();
    fs::create_dir_all(root.join("shared/src")).unwrap();
    fs::write(
        root.join("shared/src/Main.kt"),
        "package com.template.shared\nimport com.template.util.Log\nfun main() {}\n",
    )
    .unwrap();
    fs::write(
        root.join("build.gradle.kts"),
        "// This file was generated from the Groovy template com.template\nplugins {}\n",
    )
    .unwrap();

    let report = kmpgen::validate_project(root.to_str().unwrap()).unwrap();

    assert!(!report.is_clean);
    assert_eq!(report.references.len(), 2);
    assert!(report
        .references
        .iter()
        .all(|r| r.file_path.ends_with("shared/src/Main.kt")));
    assert_eq!(report.references[0].line_number, Some(1));
    assert_eq!(report.references[1].line_number, Some(2));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["isClean"], false);
    assert_eq!(
        json["references"][1]["lineText"],
        "import com.template.util.Log"
    );
}

#[test]
fn test_validate_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    let err = kmpgen::validate_project(missing.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, KmpgenError::ProjectDirMissing { .. }));
    assert_eq!(err.kind(), ErrorKind::Filesystem);
}

#[test]
fn test_validate_rejects_null_bytes() {
    let err = kmpgen::validate_project("/tmp/x\0y").unwrap_err();
    assert!(matches!(
        err,
        KmpgenError::PathSecurity {
            source: PathError::NullByte,
            ..
        }
    ));
}

#[test]
fn test_list_dependencies_from_template() {
    let generator = Generator::new(test_config(), FakeRunner::exiting(0));
    let catalog = generator.list_dependencies().unwrap();

    let core: Vec<_> = catalog.core.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(core, vec!["kotlin", "agp", "compose"]);
    let all: Vec<_> = catalog.all.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(all, vec!["agp", "compose", "kotlin", "ktor"]);
}

#[test]
fn test_generate_report_serializes_camel_case() {
    let out = tempfile::tempdir().unwrap();
    let target = out.path().join("json");
    let generator = Generator::new(test_config(), FakeRunner::exiting(0));

    let report = generator.generate(&request(&target)).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["projectName"], "WeatherApp");
    assert!(json["scanReport"]["isClean"].is_boolean());
    assert!(json["nextSteps"][0].as_str().unwrap().starts_with("cd "));
}
