//! End-to-end tests for the benchmark suite.
//!
//! These tests drive [`machine_bench::run`] against a scripted stand-in for
//! sysbench, then check the artifacts, markers, and report a real run would
//! leave behind.

#![cfg(unix)]

use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::NaiveDateTime;
use machine_bench::{run, Category, SuiteConfig};

/// Writes an executable shell script that answers the version probe like
/// sysbench and then behaves as `body` for every other invocation.
fn fake_sysbench(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake-sysbench");
    let script = format!(
        "#!/bin/sh\n\
         if [ \"$1\" = \"--version\" ]; then\n\
         \x20 echo \"sysbench 1.0.20\"\n\
         \x20 exit 0\n\
         fi\n\
         {body}\n"
    );
    fs::write(&path, script).expect("Failed to write fake sysbench script");

    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

fn config(root: &Path, sysbench: PathBuf, categories: Vec<Category>, repetitions: usize) -> SuiteConfig {
    SuiteConfig {
        root: root.to_path_buf(),
        repetitions,
        sysbench,
        categories,
        pause: Duration::ZERO,
        ..SuiteConfig::default()
    }
}

fn assert_marker(line: &str, prefix: &str) -> NaiveDateTime {
    let timestamp = line
        .strip_prefix(prefix)
        .unwrap_or_else(|| panic!("unexpected marker line: {line}"));
    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S%.6f")
        .unwrap_or_else(|err| panic!("unparseable marker timestamp {timestamp}: {err}"))
}

#[test]
fn cpu_repetitions_are_bracketed_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let calls = dir.path().join("calls.txt");
    let sysbench = fake_sysbench(
        dir.path(),
        &format!("echo \"$@\" >> '{}'\necho \"cpu-output\"", calls.display()),
    );
    let root = dir.path().join("machine-benchmarks");

    let report = run(&config(&root, sysbench, vec![Category::Cpu], 2)).unwrap();

    assert_eq!(report.repetitions, 2);
    assert_eq!(report.tool_version, "sysbench 1.0.20");
    assert_eq!(report.categories.len(), 1);
    assert_eq!(report.categories[0].completed, 2);
    assert_eq!(report.categories[0].failed, 0);
    assert_eq!(report.categories[0].artifact, "machine-sysbench-cpu.txt");

    let specs = fs::read_to_string(root.join("machine-specs.txt")).unwrap();
    assert!(specs.contains("cores"));

    let artifact = fs::read_to_string(root.join("machine-sysbench-cpu.txt")).unwrap();
    let lines: Vec<_> = artifact.lines().collect();
    assert_eq!(lines.len(), 6, "artifact:\n{artifact}");
    let timestamps = [
        assert_marker(lines[0], "CPU Test 0 Start: "),
        assert_marker(lines[2], "CPU Test 0 End: "),
        assert_marker(lines[3], "CPU Test 1 Start: "),
        assert_marker(lines[5], "CPU Test 1 End: "),
    ];
    assert_eq!(lines[1], "cpu-output");
    assert_eq!(lines[4], "cpu-output");
    assert!(
        timestamps.windows(2).all(|pair| pair[0] <= pair[1]),
        "marker timestamps out of order: {timestamps:?}"
    );

    let expected = format!(
        "--test=cpu --cpu-max-prime=20000 --num-threads={} run",
        num_cpus::get()
    );
    let calls = fs::read_to_string(&calls).unwrap();
    assert_eq!(
        calls.lines().collect::<Vec<_>>(),
        [expected.as_str(), expected.as_str()]
    );
}

#[test]
fn fileio_prepares_once_and_cleans_up_its_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    let calls = dir.path().join("calls.txt");
    let sysbench = fake_sysbench(
        dir.path(),
        &format!(
            "echo \"$(pwd) $@\" >> '{}'\n\
             case \"$*\" in *\" run\") echo \"fileio-output\";; esac",
            calls.display()
        ),
    );
    let root = dir.path().join("machine-benchmarks");

    let report = run(&config(&root, sysbench, vec![Category::FileIo], 3)).unwrap();

    assert_eq!(report.categories.len(), 1);
    assert_eq!(report.categories[0].completed, 3);
    assert_eq!(report.categories[0].failed, 0);

    let phases: Vec<_> = fs::read_to_string(&calls)
        .unwrap()
        .lines()
        .map(|line| line.split_whitespace().last().unwrap().to_string())
        .collect();
    assert_eq!(phases, ["prepare", "run", "run", "run", "cleanup"]);

    // Every phase ran inside the temporary working directory, which is gone
    // by the end of the run.
    let expected_tmp = fs::canonicalize(&root).unwrap().join("tmp");
    for line in fs::read_to_string(&calls).unwrap().lines() {
        let workdir = line.split_whitespace().next().unwrap();
        assert_eq!(Path::new(workdir), expected_tmp, "line: {line}");
    }
    assert!(!root.join("tmp").exists());

    let artifact = fs::read_to_string(root.join("machine-sysbench-file.txt")).unwrap();
    let lines: Vec<_> = artifact.lines().collect();
    assert_eq!(lines.len(), 9, "artifact:\n{artifact}");
    for index in 0..3 {
        assert_marker(lines[index * 3], &format!("File Test {index} Start: "));
        assert_eq!(lines[index * 3 + 1], "fileio-output");
        assert_marker(lines[index * 3 + 2], &format!("File Test {index} End: "));
    }
}

#[test]
fn a_failed_repetition_is_counted_and_walked_past() {
    let dir = tempfile::tempdir().unwrap();
    let flag = dir.path().join("already-failed");
    let sysbench = fake_sysbench(
        dir.path(),
        &format!(
            "if [ ! -e '{flag}' ]; then\n\
             \x20 touch '{flag}'\n\
             \x20 echo \"cpu-output-truncated\"\n\
             \x20 exit 1\n\
             fi\n\
             echo \"cpu-output\"",
            flag = flag.display()
        ),
    );
    let root = dir.path().join("machine-benchmarks");

    let report = run(&config(&root, sysbench, vec![Category::Cpu], 2)).unwrap();

    assert_eq!(report.categories[0].completed, 1);
    assert_eq!(report.categories[0].failed, 1);

    // The failed repetition keeps its markers and whatever output the tool
    // got out before dying.
    let artifact = fs::read_to_string(root.join("machine-sysbench-cpu.txt")).unwrap();
    let lines: Vec<_> = artifact.lines().collect();
    assert_eq!(lines.len(), 6, "artifact:\n{artifact}");
    assert_marker(lines[0], "CPU Test 0 Start: ");
    assert_eq!(lines[1], "cpu-output-truncated");
    assert_marker(lines[2], "CPU Test 0 End: ");
    assert_marker(lines[3], "CPU Test 1 Start: ");
    assert_eq!(lines[4], "cpu-output");
    assert_marker(lines[5], "CPU Test 1 End: ");
}

#[test]
fn reset_wipes_previous_artifacts_and_replay_tolerates_missing_ones() {
    let dir = tempfile::tempdir().unwrap();
    let sysbench = fake_sysbench(dir.path(), "echo \"unused\"");
    let root = dir.path().join("machine-benchmarks");

    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("machine-sysbench-cpu.txt"), "stale contents\n").unwrap();

    // No categories selected: the benchmark artifacts never get written, and
    // replaying them must not fail the run.
    let report = run(&config(&root, sysbench, Vec::new(), 2)).unwrap();

    assert!(report.categories.is_empty());
    assert!(root.join("machine-specs.txt").is_file());
    assert!(!root.join("machine-sysbench-cpu.txt").exists());
}
