//! Integration tests for the tabconv binary

#[cfg(test)]
mod cli_tests {
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use std::process::{Command, Output, Stdio};
    use tempfile::tempdir;

    fn run_tabconv(args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_tabconv"))
            .args(args)
            .env_remove("RUST_LOG")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .expect("failed to run tabconv")
    }

    fn run_with_stdin(args: &[&str], input: &[u8]) -> Output {
        let mut child = Command::new(env!("CARGO_BIN_EXE_tabconv"))
            .args(args)
            .env_remove("RUST_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to run tabconv");
        // The process may exit before reading its input
        let _ = child.stdin.take().unwrap().write_all(input);
        child.wait_with_output().unwrap()
    }

    fn path(p: &Path) -> &str {
        p.to_str().unwrap()
    }

    #[test]
    fn test_csv_file_to_stdout_json() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("people.csv");
        fs::write(&input, "name,age\nAda,36\nLin,29\n").unwrap();

        let output = run_tabconv(&[path(&input), "--indent", "0"]);
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
        assert_eq!(
            String::from_utf8_lossy(&output.stdout),
            "[{\"name\":\"Ada\",\"age\":\"36\"},{\"name\":\"Lin\",\"age\":\"29\"}]\n"
        );
    }

    #[test]
    fn test_output_format_from_extension() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("rows.json");
        let output_path = dir.path().join("out/rows.csv");
        fs::write(&input, r#"[{"id": 1, "ok": true}, {"id": 2, "ok": false}]"#).unwrap();

        let output = run_tabconv(&[path(&input), "-o", path(&output_path), "--quiet"]);
        assert!(output.status.success());
        assert_eq!(
            fs::read_to_string(&output_path).unwrap(),
            "id,ok\n1,true\n2,false\n"
        );
    }

    #[test]
    fn test_stdin_requires_input_format() {
        let output = run_with_stdin(&["--stdin"], b"a,b\n1,2\n");
        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("cannot determine input format"));

        let output = run_with_stdin(
            &["--stdin", "--from", "csv", "--to", "json", "--infer-types", "--indent", "0"],
            b"a,b\n1,2\n",
        );
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), "[{\"a\":1,\"b\":2}]\n");
    }

    #[test]
    fn test_stdin_over_size_limit() {
        let output = run_with_stdin(
            &["--stdin", "--from", "csv", "--max-input-size", "8B"],
            b"name,age\nAda,36\nLin,29\n",
        );
        assert!(!output.status.success());
        assert!(output.stdout.is_empty());
        assert!(String::from_utf8_lossy(&output.stderr).contains("Input too large: 9 bytes"));
    }

    #[test]
    fn test_inline_json_to_csv() {
        let output = run_tabconv(&[r#"[{"x": "a,b"}]"#, "--to", "csv"]);
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), "x\n\"a,b\"\n");
    }

    #[test]
    fn test_xlsx_round_trip_through_files() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("data.csv");
        let xlsx = dir.path().join("data.xlsx");
        fs::write(&input, "city;people\nOslo;709037\n").unwrap();

        let output = run_tabconv(&[
            path(&input),
            "-o",
            path(&xlsx),
            "--delimiter",
            "semicolon",
            "--quiet",
        ]);
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
        assert!(fs::read(&xlsx).unwrap().starts_with(b"PK"));

        let output = run_tabconv(&[path(&xlsx), "--to", "csv"]);
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), "city,people\nOslo,709037\n");
    }

    #[test]
    fn test_malformed_input_fails_with_hint() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("broken.json");
        fs::write(&input, r#"{"a": 1,"#).unwrap();

        let output = run_tabconv(&[path(&input), "--to", "csv"]);
        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("JSON parse error"), "{}", stderr);
        assert!(stderr.contains("Tip:"), "{}", stderr);
        assert!(output.stdout.is_empty());
    }

    #[test]
    fn test_unsupported_target_format() {
        let output = run_tabconv(&[r#"{"a": 1}"#, "--to", "yaml"]);
        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("yaml"));
    }

    #[test]
    fn test_validate_only_reports_shape() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("people.csv");
        fs::write(&input, "name,age\nAda,36\nLin,29\n").unwrap();

        let output = run_tabconv(&[path(&input), "--validate-only"]);
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("2 rows, 2 columns"));

        fs::write(&input, "name,age\nAda\n").unwrap();
        let output = run_tabconv(&[path(&input), "--validate-only"]);
        assert!(!output.status.success());
    }

    #[test]
    fn test_abort_on_error_default() {
        let input_dir = tempdir().unwrap();
        fs::write(input_dir.path().join("a_bad.json"), "{ name: invalid }").unwrap();
        fs::write(input_dir.path().join("b_good.json"), r#"{"name": "OK"}"#).unwrap();
        let output_dir = tempdir().unwrap();

        let output = run_tabconv(&[
            path(input_dir.path()),
            "-o",
            path(output_dir.path()),
            "--to",
            "csv",
            "--recursive",
        ]);

        assert!(!output.status.success());
        assert!(!output.stderr.is_empty());
        assert!(!output_dir.path().join("b_good.csv").exists());
    }

    #[test]
    fn test_continue_on_error_flag() {
        let input_dir = tempdir().unwrap();
        fs::write(input_dir.path().join("a_bad.json"), "{ name: invalid }").unwrap();
        fs::write(input_dir.path().join("b_good.json"), r#"{"name": "OK"}"#).unwrap();
        let output_dir = tempdir().unwrap();

        let output = run_tabconv(&[
            path(input_dir.path()),
            "-o",
            path(output_dir.path()),
            "--to",
            "csv",
            "--recursive",
            "--continue-on-error",
            "--stats",
        ]);

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(!output.status.success());
        assert!(stderr.contains("a_bad.json"), "{}", stderr);
        assert!(stderr.contains("Conversion Statistics"), "{}", stderr);
        assert_eq!(
            fs::read_to_string(output_dir.path().join("b_good.csv")).unwrap(),
            "name\nOK\n"
        );
    }

    #[test]
    fn test_directory_requires_output() {
        let input_dir = tempdir().unwrap();
        fs::write(input_dir.path().join("a.csv"), "x\n1\n").unwrap();

        let output = run_tabconv(&[path(input_dir.path()), "--to", "json"]);
        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("Output directory required"));
    }
}
