use clap::Parser;
use pretty_assertions::assert_eq;

use scheduler::{AlgorithmConfig, ProcessSpec};

use crate::format::{format_gantt, format_table};
use crate::{Algorithm, Args, Format};

fn args(extra: &[&str]) -> Args {
    let mut argv = vec!["sched-runner"];
    argv.extend_from_slice(extra);
    Args::try_parse_from(argv).unwrap()
}

#[test]
fn defaults_to_json_from_stdin() {
    let args = args(&[]);

    assert_eq!(args.input, "-");
    assert_eq!(args.format, Format::Json);
    assert_eq!(args.algorithm, None);
}

#[test]
fn parses_mlfq_flags() {
    let args = args(&["-a", "mlfq", "--quantums", "2,4,8", "--allotment", "10"]);

    assert_eq!(args.algorithm, Some(Algorithm::Mlfq));
    assert_eq!(
        args.algorithm_config(Algorithm::Mlfq),
        AlgorithmConfig::Mlfq {
            queues: 3,
            quantums: vec![2, 4, 8],
            allotment: Some(10),
        }
    );
}

#[test]
fn full_request_needs_no_flags() {
    let request = args(&[])
        .load_request(r#"{ "algorithm": "SJF", "processes": [{ "arrivalTime": 0, "burstTime": 2 }] }"#)
        .unwrap();

    assert_eq!(request.algorithm, AlgorithmConfig::Sjf);
    assert_eq!(request.processes, vec![ProcessSpec::new(0, 2)]);
}

#[test]
fn flags_override_the_request_algorithm() {
    let request = args(&["--algorithm", "rr", "--quantum", "3"])
        .load_request(r#"{ "algorithm": "FCFS", "processes": [{ "arrivalTime": 1, "burstTime": 2 }] }"#)
        .unwrap();

    assert_eq!(request.algorithm, AlgorithmConfig::Rr { quantum: Some(3) });
}

#[test]
fn bare_process_list_is_accepted_with_an_algorithm() {
    let request = args(&["-a", "stcf"])
        .load_request(r#"[{ "arrivalTime": 0, "burstTime": 1, "io": [] }]"#)
        .unwrap();

    assert_eq!(request.algorithm, AlgorithmConfig::Stcf);
    assert_eq!(request.processes.len(), 1);
}

#[test]
fn bare_process_list_without_algorithm_is_rejected() {
    let error = args(&[])
        .load_request(r#"[{ "arrivalTime": 0, "burstTime": 1 }]"#)
        .unwrap_err();

    assert!(error.to_string().contains("--algorithm"));
}

#[test]
fn table_shows_ticks_metrics_and_gantt() {
    let result = scheduler::simulate(
        &[ProcessSpec::new(1, 2), ProcessSpec::new(1, 1)],
        &AlgorithmConfig::Fcfs,
    )
    .unwrap();

    assert_eq!(format_gantt(&result), "| idle 0-1 | P1 1-3 | P2 3-4 |");

    let table = format_table(&result);
    assert!(table.starts_with("algorithm: FCFS\n"));
    assert!(table.contains("t=   0 cpu=-    ready=[] wait=[] | CPU idle"));
    assert!(table.contains("cpu utilization:         75.00%"));
}

#[test]
fn table_shows_skipped_idle_ticks_as_a_range() {
    let result = scheduler::simulate(&[ProcessSpec::new(40, 1)], &AlgorithmConfig::Fcfs).unwrap();

    assert_eq!(format_gantt(&result), "| idle 0-40 | P1 40-41 |");

    let table = format_table(&result);
    assert!(table.contains("t=0..40 cpu=-    ready=[] wait=[] | CPU idle until tick 40\n"));
    assert!(table.contains("t=  40 cpu=P1   "));
    assert!(table.ends_with("throughput:              0.024\n"));
}
