mod common;

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use crate::common::{init_tracing, seeded_rng, write_config, TestResult};
use daggen::cli::CliArgs;
use daggen::config::ConfigFile;
use daggen::engine::{
    emit_multi, emit_single, generate_multi, generate_single, multi_set_dir, MultiDagRun,
    OutputOptions, SingleDagRun,
};
use daggen::fs::{FileSystem, MockFileSystem};
use daggen::logging::resolve_level;
use daggen::persist::load;
use daggen::types::{PeriodMode, TopologyKind, UtilizationAlgorithm};
use daggen_test_utils::builders::ConfigFileBuilder;
use tempfile::tempdir;

const SINGLE_TOML: &str = r#"
[misc]
save_to_file = true

[single_task]
set_number = 3
workload = 500

[dag_config]
parallelism = 3
layer_num_min = 3
layer_num_max = 5
"#;

const MULTI_TOML: &str = r#"
[misc]
multi_dag = true
cores = 2
util_algorithm = "drs"

[multi_task]
set_number = 2
task_number_per_set = 3
utilization = 1.2
periods = [100, 1000]
"#;

fn args(config: &Path, output: &Path, seed: Option<u64>) -> CliArgs {
    CliArgs {
        config: config.display().to_string(),
        output: output.display().to_string(),
        seed,
        algorithm: None,
        util_algorithm: None,
        period_mode: None,
        log_level: None,
        dry_run: false,
    }
}

#[test]
fn single_mode_writes_every_task() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let config = write_config(dir.path(), SINGLE_TOML)?;
    let out = dir.path().join("data");

    daggen::run(args(&config, &out, None))?;

    for i in 0..3 {
        for ext in ["dot", "json", "gml"] {
            let file = out.join(format!("Tau_{i}.{ext}"));
            assert!(file.exists(), "missing {:?}", file);
        }
    }
    assert!(!out.join("Tau_3.json").exists());
    Ok(())
}

#[test]
fn multi_mode_writes_one_directory_per_taskset() -> TestResult {
    let dir = tempdir()?;
    let config = write_config(dir.path(), MULTI_TOML)?;
    let out = dir.path().join("data");

    daggen::run(args(&config, &out, Some(5)))?;

    for set in 0..2 {
        let set_dir = out.join("data-multi-m2-u1.2").join(set.to_string());
        for i in 0..3 {
            assert!(set_dir.join(format!("Tau_{i}.json")).exists());
        }
    }
    Ok(())
}

#[test]
fn same_seed_reproduces_the_output() -> TestResult {
    let dir = tempdir()?;
    let config = write_config(dir.path(), SINGLE_TOML)?;
    let first = dir.path().join("first");
    let second = dir.path().join("second");
    let third = dir.path().join("third");

    daggen::run(args(&config, &first, Some(99)))?;
    daggen::run(args(&config, &second, Some(99)))?;
    daggen::run(args(&config, &third, Some(100)))?;

    let read = |dir: &PathBuf| fs::read_to_string(dir.join("Tau_0.json"));
    assert_eq!(read(&first)?, read(&second)?);
    assert_ne!(read(&first)?, read(&third)?);
    Ok(())
}

#[test]
fn dry_run_generates_nothing() -> TestResult {
    let dir = tempdir()?;
    let config = write_config(dir.path(), SINGLE_TOML)?;
    let out = dir.path().join("data");

    let mut dry = args(&config, &out, None);
    dry.dry_run = true;
    daggen::run(dry)?;

    assert!(!out.exists());
    Ok(())
}

#[test]
fn invalid_config_fails_the_run() -> TestResult {
    let dir = tempdir()?;
    let config = write_config(dir.path(), "[misc]\ncores = 0\n")?;
    let out = dir.path().join("data");

    let err = daggen::run(args(&config, &out, None)).unwrap_err();
    assert!(err.to_string().contains("cores"), "unexpected error: {err}");
    assert!(!out.exists());
    Ok(())
}

#[test]
fn engine_runs_against_an_in_memory_filesystem() -> TestResult {
    let cfg: ConfigFile = ConfigFileBuilder::new()
        .single_task(2, 300.0)
        .fork_join(3, 0.5, 0.5)
        .build();
    let run = SingleDagRun::from_config(&cfg);
    let tasks = generate_single(&run, &mut seeded_rng(1))?;
    assert_eq!(tasks.len(), 2);

    let fs = MockFileSystem::new();
    let options = OutputOptions {
        print_dag: false,
        save_to_file: true,
        output_dir: "mem".into(),
    };
    emit_single(&fs, &options, &tasks)?;
    assert_eq!(fs.paths().len(), 6);

    let reloaded = load(&fs, Path::new("mem"), 1)?;
    assert_eq!(reloaded.to_string(), tasks[1].to_string());
    Ok(())
}

#[test]
fn multi_engine_respects_save_flag() -> TestResult {
    let cfg = ConfigFileBuilder::new()
        .multi_dag(true)
        .cores(1)
        .multi_task(2, 2, 0.5)
        .periods(&[50, 60], None)
        .layered(2, 3, 4, 0.5)
        .build();
    let run = MultiDagRun::from_config(&cfg)?;
    let tasksets = generate_multi(&run, &mut seeded_rng(3))?;
    assert_eq!(tasksets.len(), 2);

    let fs = MockFileSystem::new();
    let mut options = OutputOptions {
        print_dag: false,
        save_to_file: false,
        output_dir: "mem".into(),
    };
    emit_multi(&fs, &options, 1, &tasksets)?;
    assert!(fs.paths().is_empty());

    options.save_to_file = true;
    emit_multi(&fs, &options, 1, &tasksets)?;
    assert_eq!(fs.paths().len(), 2 * 2 * 3);
    assert!(fs.exists(&multi_set_dir(Path::new("mem"), 1, 0.5, 1)));
    Ok(())
}

#[test]
fn set_directory_name_encodes_cores_and_utilization() {
    assert_eq!(
        multi_set_dir(Path::new("data"), 4, 0.75, 3),
        Path::new("data/data-multi-m4-u0.8/3")
    );
}

#[test]
fn cli_defaults_and_flags() {
    let defaults = CliArgs::parse_from(["daggen"]);
    assert_eq!(defaults.config, "daggen.toml");
    assert_eq!(defaults.output, "data");
    assert_eq!(defaults.seed, None);
    assert!(!defaults.dry_run);

    let parsed = CliArgs::parse_from([
        "daggen", "-c", "alt.toml", "-o", "out", "--seed", "9", "--log-level", "debug",
        "--dry-run",
    ]);
    assert_eq!(parsed.config, "alt.toml");
    assert_eq!(parsed.output, "out");
    assert_eq!(parsed.seed, Some(9));
    assert!(parsed.dry_run);
    assert_eq!(resolve_level(parsed.log_level, None), tracing::Level::DEBUG);
}

#[test]
fn cli_overrides_replace_config_values() {
    let args = CliArgs::parse_from([
        "daggen",
        "--seed",
        "3",
        "--algorithm",
        "nfj",
        "--util-algorithm",
        "drs",
        "--period-mode",
        "range",
    ]);
    assert_eq!(args.algorithm, Some(TopologyKind::ForkJoin));

    let mut raw = ConfigFileBuilder::new().raw();
    args.apply_overrides(&mut raw);
    assert_eq!(raw.misc.rnd_seed, 3);
    assert_eq!(raw.dag_config.algorithm, TopologyKind::ForkJoin);
    assert_eq!(raw.misc.util_algorithm, UtilizationAlgorithm::Drs);
    assert_eq!(raw.multi_task.period_mode, Some(PeriodMode::Range));

    assert!(CliArgs::try_parse_from(["daggen", "--algorithm", "spiral"]).is_err());
}

#[test]
fn overrides_are_validated_with_the_config() -> TestResult {
    let dir = tempdir()?;
    let config = write_config(
        dir.path(),
        "[misc]\nmulti_dag = true\n\n[multi_task]\nperiods = [100, 200, 300]\n",
    )?;
    let out = dir.path().join("data");

    let mut forced = args(&config, &out, None);
    forced.period_mode = Some(PeriodMode::Range);
    let err = daggen::run(forced).unwrap_err();
    assert!(err.to_string().contains("[multi_task].periods"), "unexpected error: {err}");
    assert!(!out.exists());

    daggen::run(args(&config, &out, None))?;
    assert!(out.exists());
    Ok(())
}

#[test]
fn log_level_prefers_cli_then_env() {
    use daggen::cli::LogLevel;

    assert_eq!(resolve_level(Some(LogLevel::Warn), Some("trace")), tracing::Level::WARN);
    assert_eq!(resolve_level(None, Some("trace")), tracing::Level::TRACE);
    assert_eq!(resolve_level(None, Some("nonsense")), tracing::Level::INFO);
    assert_eq!(resolve_level(None, None), tracing::Level::INFO);
}
