use scheduler::{Pid, SimulationResult, StepRecord, Timestamp};

fn format_pids(pids: &[Pid]) -> String {
    let names: Vec<String> = pids.iter().map(|pid| pid.to_string()).collect();
    format!("[{}]", names.join(" "))
}

fn format_queues(queues: &[Vec<Pid>]) -> String {
    let queues: Vec<String> = queues.iter().map(|queue| format_pids(queue)).collect();
    queues.join("")
}

/// The tick of a step, or its range when idle ticks were skipped
fn format_ticks(step: &StepRecord) -> String {
    if step.until > step.tick + 1 {
        format!("{}..{}", step.tick, step.until)
    } else {
        step.tick.to_string()
    }
}

fn format_step(step: &StepRecord) -> String {
    let running = step
        .running
        .map(|pid| pid.to_string())
        .unwrap_or_else(|| "-".to_string());

    format!(
        "t={:>4} cpu={:<4} ready={} wait={} | {}",
        format_ticks(step),
        running,
        format_queues(&step.ready_queues),
        format_pids(&step.wait_queue),
        step.explanation
    )
}

/// Text Gantt chart of the CPU, idle stretches included
pub fn format_gantt(result: &SimulationResult) -> String {
    let mut cells = Vec::new();
    let mut now = Timestamp::new(0);

    for span in &result.timeline {
        if span.start > now {
            cells.push(format!(" idle {}-{} |", now, span.start));
        }
        cells.push(format!(" {} {}-{} |", span.pid, span.start, span.end));
        now = span.end;
    }

    format!("|{}", cells.concat())
}

/// Human readable rendering of a whole run
pub fn format_table(result: &SimulationResult) -> String {
    let mut lines = vec![format!("algorithm: {}", result.algorithm)];
    lines.extend(result.steps.iter().map(format_step));

    lines.push(String::new());
    lines.push(format!(
        "{:<5} {:>7} {:>5} {:>9} {:>4} {:>4} {:>7} {:>10}",
        "pid", "arrival", "burst", "scheduled", "end", "io", "waiting", "turnaround"
    ));
    lines.extend(result.processes.iter().map(|report| {
        format!(
            "{:<5} {:>7} {:>5} {:>9} {:>4} {:>4} {:>7} {:>10}",
            report.pid.to_string(),
            report.arrival.get(),
            report.burst,
            report.scheduled_time.get(),
            report.end_time.get(),
            report.io_time,
            report.waiting_time,
            report.turnaround_time
        )
    }));

    lines.push(String::new());
    lines.push(format_gantt(result));

    let summary = &result.summary;
    lines.push(String::new());
    lines.push(format!("average waiting time:    {:.2}", summary.average_waiting_time));
    lines.push(format!("average turnaround time: {:.2}", summary.average_turnaround_time));
    lines.push(format!("cpu utilization:         {:.2}%", summary.cpu_utilization));
    lines.push(format!("throughput:              {:.3}", summary.throughput));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
