//! Integration tests for rulebench
//!
//! These tests verify the end-to-end behavior of the benchmark engine.

use async_trait::async_trait;
use rulebench::prelude::*;
use rulebench::{
    CaseStatus, Diagnostic, EvaluatorError, EvaluatorProvider, Language, ModuleExport,
    RuleEvaluator, RulebenchConfig, SampleRow, calculate_statistics, filter_outliers,
    init_logging,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn no_warmup(iterations: u64) -> BenchmarkConfig {
    BenchmarkConfig {
        name: "integration".to_string(),
        iterations,
        timeout: Duration::from_secs(10),
        warmup: WarmupConfig {
            enabled: false,
            iterations: 0,
        },
    }
}

/// Evaluator whose every call busy-waits for one millisecond
struct SpinEvaluator;

#[async_trait]
impl RuleEvaluator for SpinEvaluator {
    async fn evaluate(
        &self,
        _source: &str,
        _filename: &str,
    ) -> Result<Vec<Diagnostic>, EvaluateError> {
        let start = Instant::now();
        while start.elapsed() < Duration::from_millis(1) {
            std::hint::spin_loop();
        }
        Ok(Vec::new())
    }
}

struct SpinProvider;

#[async_trait]
impl EvaluatorProvider for SpinProvider {
    async fn build(
        &self,
        _rule: &RuleConfig,
        _languages: &[Language],
    ) -> Result<Box<dyn RuleEvaluator>, EvaluatorError> {
        Ok(Box::new(SpinEvaluator))
    }
}

/// Two samples, 10 iterations, no warmup, ~1ms per call
#[tokio::test]
async fn test_end_to_end_one_millisecond_work() {
    init_logging();

    let specs = vec![TestSpec::new(
        "timing",
        vec![TestCase::new(
            "spin",
            "spin for 1ms",
            RuleConfig::new("spin"),
            vec![
                CodeSample::new("first.js", "let a = 1;"),
                CodeSample::new("second.ts", "let b: number = 2;"),
            ],
        )],
    )];

    let report = Runner::new(SpinProvider, no_warmup(10)).run(&specs).await;
    let case = &report.specs[0].cases[0];

    assert_eq!(case.status, CaseStatus::Completed);
    let tasks: Vec<_> = case.tasks().collect();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].filename, "first.js");
    assert_eq!(tasks[1].filename, "second.ts");

    for task in tasks {
        let m = &task.metrics;
        assert_eq!(task.raw_sample_count, 10);
        assert_eq!(m.sample_count + task.outliers_removed, 10);
        assert!(m.sample_count > 0);

        // Every call lasts at least 1ms
        assert!(m.min >= 1.0, "min {} below 1ms", m.min);
        assert!(m.hz <= 1000.0, "hz {} above 1000", m.hz);
        assert!(m.hz > 100.0, "hz {} implausibly low", m.hz);
        assert!((m.period - m.mean / 1000.0).abs() < 1e-12);
        assert!((m.hz * m.period - 1.0).abs() < 1e-9);
    }
}

fn no_var(ctx: &RuleContext<'_>) -> Result<Vec<Finding>, EvaluateError> {
    if ctx.source.contains("@@") {
        return Err(EvaluateError::new("Parsing error: unexpected token @@"));
    }
    Ok(ctx
        .source
        .match_indices("var ")
        .map(|(i, _)| Finding::new("Unexpected var, use let or const instead.", 1, i as u32 + 1))
        .collect())
}

fn registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry.register_builtin("no-var", no_var);
    registry.register_module(
        "plugins/legacy.js",
        ModuleExport::Default(Box::new(ModuleExport::Rule(Arc::new(no_var)))),
    );
    registry
}

/// Failures stay contained at case and sample granularity
#[tokio::test]
async fn test_failures_are_contained() {
    let specs = vec![
        TestSpec::new(
            "style",
            vec![
                TestCase::new(
                    "builtin",
                    "builtin no-var",
                    RuleConfig::new("no-var"),
                    vec![
                        CodeSample::new("a.js", "var a = 1;"),
                        CodeSample::new("broken.js", "let @@ = 1;"),
                        CodeSample::new("c.tsx", "var c = <div/>;"),
                    ],
                ),
                TestCase::new(
                    "missing-module",
                    "plugin that does not exist",
                    RuleConfig::new("ghost/no-var").with_path("plugins/ghost.js"),
                    vec![CodeSample::new("a.js", "var a;")],
                ),
            ],
        ),
        TestSpec::new(
            "plugins",
            vec![
                TestCase::new(
                    "plugin",
                    "default-exported rule",
                    RuleConfig::new("legacy/no-var").with_path("plugins/legacy.js"),
                    vec![CodeSample::new("App.vue", "<script>var x;</script>")],
                ),
                TestCase::new("empty", "no samples", RuleConfig::new("no-var"), vec![]),
            ],
        ),
    ];

    let runner = Runner::new(ModuleEvaluatorProvider::new(registry()), no_warmup(5));
    let cases = specs.iter().flat_map(|s| &s.cases);
    let output = runner.execute(cases).await;

    // builtin: 2 measured + 1 aborted; plugin: 1 measured
    assert_eq!(output.tasks.len(), 3);
    // missing module + empty case + one aborted sample
    assert_eq!(output.warning_count(), 3);
    assert!(output.require_tasks().is_ok());

    let report = runner.report(&specs, &output);
    let style = &report.specs[0];
    let plugins = &report.specs[1];

    assert_eq!(style.cases[0].status, CaseStatus::SampleAborted);
    assert!(matches!(
        &style.cases[0].rows[1],
        SampleRow::Failed { error, .. } if error.contains("@@")
    ));
    assert_eq!(style.cases[1].status, CaseStatus::EvaluatorFailed);
    assert_eq!(style.cases[1].tasks().count(), 0);

    assert_eq!(plugins.cases[0].status, CaseStatus::Completed);
    assert_eq!(plugins.cases[1].status, CaseStatus::NoSamples);
    assert!(matches!(
        &plugins.cases[1].rows[..],
        [SampleRow::Placeholder { reason }] if reason == "no samples"
    ));

    assert_eq!(report.summary.total_cases, 4);
    assert_eq!(report.summary.tasks, 3);

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"evaluator-failed\""));
}

/// Configuration text drives the runner
#[tokio::test]
async fn test_runner_from_toml() {
    let config = RulebenchConfig::from_toml_str(
        r#"
        [benchmark]
        name = "from-toml"
        iterations = 3
        timeout = "2s"

        [benchmark.warmup]
        enabled = true
        iterations = 2
        "#,
    )
    .unwrap();

    let runner = Runner::from_config(ModuleEvaluatorProvider::new(registry()), &config).unwrap();
    let case = TestCase::new(
        "c",
        "case",
        RuleConfig::new("no-var"),
        vec![CodeSample::new("a.js", "var a;")],
    );

    let output = runner.execute([&case]).await;
    assert_eq!(output.tasks.len(), 1);
    assert_eq!(output.tasks[0].raw_sample_count, 3);
    assert_eq!(runner.config().name, "from-toml");
}

/// The filter and calculator compose as documented
#[test]
fn test_filter_then_calculate() {
    let raw = [10.0, 12.0, 15.0, 11.0, 13.0, 100.0, 9.0, 14.0];
    let filtered = filter_outliers(&raw, 1.5);
    let metrics = calculate_statistics(&filtered.filtered_samples);

    assert_eq!(filtered.outliers_removed_count, 1);
    assert_eq!(metrics.sample_count, 7);
    assert!((metrics.mean - 12.0).abs() < 1e-9);
    assert_eq!(metrics.median, 12.0);
    assert_eq!(metrics.min, 9.0);
    assert_eq!(metrics.max, 15.0);
}
