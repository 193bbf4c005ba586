use std::io::{self, Write};

use polars::prelude::{AnyValue, DataFrame, PolarsResult};
use schedule_network::input::{self, ProjectSnapshot};
use schedule_network::{AnalysisConfig, ProjectAnalysis, ProjectMetadata, report};
use tracing_subscriber::EnvFilter;

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let cells: Vec<Vec<String>> = (0..df.height())
        .map(|row_idx| {
            columns
                .iter()
                .map(|col| col.get(row_idx).map(|av| render_cell(&av)).unwrap_or_default())
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &cells {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_row(&mut out, &col_names, &widths);
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        push_row(&mut out, row, &widths);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    out.push('|');
    for (cell, width) in cells.iter().zip(widths) {
        out.push(' ');
        out.push_str(cell);
        out.push_str(&" ".repeat(width.saturating_sub(cell.len())));
        out.push_str(" |");
    }
    out.push('\n');
}

fn render_cell(av: &AnyValue) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::Float64(v) => format_number(*v),
        AnyValue::String(s) => s.to_string(),
        _ => av.to_string(),
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.3}")
    }
}

fn print_frame(frame: PolarsResult<DataFrame>) {
    match frame {
        Ok(df) => println!("{}", render_df_as_text_table(&df)),
        Err(e) => println!("Table error: {}", e),
    }
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  load <json|csv> <path>             Load a task snapshot and run the analysis\n  show                               Show the loaded tasks\n  cpm                                Critical path results\n  mpm                                Time-gap (MPM) results and relationship verdicts\n  pert                               PERT estimates, statistics and critical path\n  order [rev]                        Topological order of the activities\n  prob <Tp>                          Probability of finishing within Tp days (PERT)\n  quantile <p>                       Duration met with probability p (PERT)\n  config <json_path>                 Load analysis settings and re-run\n  report <json_path>                 Write the analysis report as JSON\n  export <csv_path>                  Write CPM activity results as CSV\n  quit|exit                          Exit"
    );
}

struct Session {
    snapshot: Option<ProjectSnapshot>,
    config: AnalysisConfig,
    analysis: Option<ProjectAnalysis>,
}

impl Session {
    fn rerun(&mut self) {
        self.analysis = self
            .snapshot
            .as_ref()
            .map(|snapshot| ProjectAnalysis::run(&snapshot.tasks, &self.config));
    }

    fn metadata(&self) -> ProjectMetadata {
        self.snapshot
            .as_ref()
            .map(|snapshot| snapshot.metadata.clone())
            .unwrap_or_default()
    }

    fn analysis(&self) -> Option<&ProjectAnalysis> {
        if self.analysis.is_none() {
            println!("No tasks loaded. Use 'load <json|csv> <path>'.");
        }
        self.analysis.as_ref()
    }
}

fn show_cpm(analysis: &ProjectAnalysis, metadata: &ProjectMetadata) {
    let Some(cpm) = analysis.cpm() else {
        println!("CPM is not enabled in the current config.");
        return;
    };
    if let Some(err) = cpm.failure() {
        println!("CPM calculation failed: {}", err);
    }
    println!("CPM: {}", cpm.summary().to_cli_summary());
    print_frame(report::cpm_frame(cpm, metadata));
}

fn show_mpm(analysis: &ProjectAnalysis, metadata: &ProjectMetadata) {
    let Some(mpm) = analysis.mpm() else {
        println!("MPM is not enabled in the current config.");
        return;
    };
    if mpm.is_init_failed() {
        println!(
            "MPM initialisation failed: {}",
            mpm.failure().map(ToString::to_string).unwrap_or_default()
        );
    }
    if mpm.is_forward_calculation_failed() {
        println!("MPM forward calculation failed.");
    }
    if mpm.is_backward_calculation_failed() {
        println!("MPM backward calculation failed.");
    }
    println!("MPM: {}", mpm.summary().to_cli_summary());
    print_frame(report::mpm_frame(mpm, metadata));
    print_frame(report::relationship_frame(mpm));
    for relationship in mpm.violated_relationships() {
        println!(
            "Violated time gap: {} -> {}",
            relationship.task_id, relationship.related_task_id
        );
    }
}

fn show_pert(analysis: &ProjectAnalysis) {
    let Some(pert) = analysis.pert() else {
        println!("PERT is not enabled in the current config.");
        return;
    };
    if pert.is_init_failed() {
        println!(
            "PERT initialisation failed: {}",
            pert.failure().map(ToString::to_string).unwrap_or_default()
        );
    } else if !pert.has_all_activities_filled_estimations() {
        println!("PERT needs optimistic, modal and pessimistic estimations for every task.");
    }
    println!("PERT: {}", pert.summary().to_cli_summary());
    if let (Some(duration), Some(deviation)) =
        (pert.project_duration(), pert.project_standard_deviation())
    {
        println!(
            "Expected duration: {}, standard deviation: {}",
            format_number(duration),
            format_number(deviation)
        );
    }
    print_frame(report::pert_frame(pert));
}

fn show_order(analysis: &ProjectAnalysis, reverse: bool) {
    let ids: Vec<String> = if let Some(cpm) = analysis.cpm() {
        cpm.topological_sort(reverse)
            .iter()
            .map(|a| a.id.to_string())
            .collect()
    } else if let Some(mpm) = analysis.mpm() {
        mpm.topological_sort(reverse)
            .iter()
            .map(|a| a.id.to_string())
            .collect()
    } else {
        Vec::new()
    };
    if ids.is_empty() {
        println!("No topological order available.");
    } else {
        println!("Order: {}", ids.join(" -> "));
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut session = Session {
        snapshot: None,
        config: AnalysisConfig::default(),
        analysis: None,
    };

    println!("Schedule Network (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "load" => {
                let format = parts.next();
                let path = parts.next();
                let loaded = match (format, path) {
                    (Some("json"), Some(path)) => input::load_snapshot_from_json(path),
                    (Some("csv"), Some(path)) => input::load_tasks_from_csv(path)
                        .map(|tasks| ProjectSnapshot::new(Default::default(), tasks)),
                    _ => {
                        println!("Usage: load <json|csv> <path>");
                        continue;
                    }
                };
                match loaded {
                    Ok(snapshot) => {
                        println!(
                            "Loaded {} tasks from {}",
                            snapshot.tasks.len(),
                            path.unwrap_or_default()
                        );
                        session.snapshot = Some(snapshot);
                        session.rerun();
                    }
                    Err(e) => println!("Load error: {}", e),
                }
            }
            "show" => match &session.snapshot {
                Some(snapshot) => {
                    println!("Project: {}", snapshot.metadata.project_name);
                    print_frame(report::task_frame(&snapshot.tasks));
                }
                None => println!("No tasks loaded. Use 'load <json|csv> <path>'."),
            },
            "cpm" => {
                if let Some(analysis) = session.analysis() {
                    show_cpm(analysis, &session.metadata());
                }
            }
            "mpm" => {
                if let Some(analysis) = session.analysis() {
                    show_mpm(analysis, &session.metadata());
                }
            }
            "pert" => {
                if let Some(analysis) = session.analysis() {
                    show_pert(analysis);
                }
            }
            "order" => {
                let reverse = matches!(parts.next(), Some("rev"));
                if let Some(analysis) = session.analysis() {
                    show_order(analysis, reverse);
                }
            }
            "prob" => {
                let Some(target) = parts.next().and_then(|s| s.parse::<f64>().ok()) else {
                    println!("Usage: prob <Tp>");
                    continue;
                };
                if let Some(analysis) = session.analysis() {
                    match analysis.pert().and_then(|p| p.completion_probability(target)) {
                        Some(probability) => println!(
                            "P(T <= {}) = {:.4}",
                            format_number(target),
                            probability
                        ),
                        None => println!("PERT results are not available."),
                    }
                }
            }
            "quantile" => {
                let Some(probability) = parts.next().and_then(|s| s.parse::<f64>().ok()) else {
                    println!("Usage: quantile <p>");
                    continue;
                };
                if let Some(analysis) = session.analysis() {
                    match analysis.pert().and_then(|p| p.completion_time(probability)) {
                        Some(time) => println!("T({}) = {:.3}", probability, time),
                        None => println!(
                            "No completion time: PERT results missing or p outside (0, 1)."
                        ),
                    }
                }
            }
            "config" => match parts.next() {
                Some(path) => match AnalysisConfig::from_json_file(path) {
                    Ok(config) => {
                        session.config = config;
                        session.rerun();
                        println!("Config loaded from {}", path);
                    }
                    Err(e) => println!("Config error: {}", e),
                },
                None => println!("Usage: config <json_path>"),
            },
            "report" => {
                let Some(path) = parts.next() else {
                    println!("Usage: report <json_path>");
                    continue;
                };
                let Some(snapshot) = &session.snapshot else {
                    println!("No tasks loaded. Use 'load <json|csv> <path>'.");
                    continue;
                };
                if let Some(analysis) = &session.analysis {
                    let report = analysis.report(&snapshot.metadata);
                    match input::export_report_to_json(&report, path) {
                        Ok(()) => println!("Report written to {}", path),
                        Err(e) => println!("Report error: {}", e),
                    }
                }
            }
            "export" => {
                let Some(path) = parts.next() else {
                    println!("Usage: export <csv_path>");
                    continue;
                };
                let Some(analysis) = session.analysis() else {
                    continue;
                };
                match analysis.cpm() {
                    Some(cpm) => {
                        let mut rows = cpm.topological_sort(false);
                        if rows.is_empty() {
                            rows = cpm.activities().iter().collect();
                        }
                        match input::export_activities_to_csv(rows, path) {
                            Ok(()) => println!("Activities written to {}", path),
                            Err(e) => println!("Export error: {}", e),
                        }
                    }
                    None => println!("CPM is not enabled in the current config."),
                }
            }
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
}
